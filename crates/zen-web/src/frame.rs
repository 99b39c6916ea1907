use crate::input::PointerState;
use crate::render;
use glam::{EulerRot, Mat4, Vec2};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;
use zen_core::{
    FrameInput, ParticleField, ROTATION_RATE_X, ROTATION_RATE_Y, TIME_STEP,
};

pub struct FrameContext<'a> {
    pub field: Rc<RefCell<ParticleField>>,
    pub pointer: Rc<RefCell<PointerState>>,
    pub speed: Rc<RefCell<f32>>,

    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,

    pub elapsed_sec: f32,
    pub rotation: Vec2, // x = pitch, y = yaw
}

impl<'a> FrameContext<'a> {
    /// One animation frame: smooth the pointer, advance the field, rotate
    /// the whole cloud, upload and draw.
    pub fn frame(&mut self) {
        let speed = *self.speed.borrow();

        let pointer = {
            let mut p = self.pointer.borrow_mut();
            p.step();
            p.smoothed
        };

        self.elapsed_sec += TIME_STEP * speed;
        let input = FrameInput {
            elapsed_sec: self.elapsed_sec,
            speed,
            pointer,
        };
        self.field.borrow_mut().update(&input);

        self.rotation.y += ROTATION_RATE_Y * speed;
        self.rotation.x += ROTATION_RATE_X * speed;
        let model = Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0);

        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(self.canvas.width(), self.canvas.height());
            let field = self.field.borrow();
            if let Err(e) = g.render(field.positions(), field.sizes(), field.colors(), model) {
                log::error!("render error: {:?}", e);
            }
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    capacity: usize,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, capacity).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let Some(w) = web::window() {
            let _ = w.request_animation_frame(
                tick_clone
                    .borrow()
                    .as_ref()
                    .unwrap()
                    .as_ref()
                    .unchecked_ref(),
            );
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        let _ = w.request_animation_frame(tick.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}
