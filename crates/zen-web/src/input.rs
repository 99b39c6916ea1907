use glam::Vec2;
use web_sys as web;
use zen_core::POINTER_SMOOTHING;

/// Latest raw pointer target plus the smoothed value the field actually
/// sees. Smoothing is host-side: one lerp step per rendered frame.
#[derive(Default, Clone, Copy)]
pub struct PointerState {
    pub target: Vec2,
    pub smoothed: Vec2,
}

impl PointerState {
    /// Advance the smoothed pointer one frame toward the raw target.
    pub fn step(&mut self) {
        self.smoothed += (self.target - self.smoothed) * POINTER_SMOOTHING;
    }
}

/// Map a pointer event to normalized [-1, 1] canvas coordinates, Y up.
#[inline]
pub fn pointer_normalized(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let w = rect.width() as f32;
    let h = rect.height() as f32;
    if w <= 0.0 || h <= 0.0 {
        return Vec2::ZERO;
    }
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    Vec2::new((x_css / w) * 2.0 - 1.0, -(y_css / h) * 2.0 + 1.0)
}
