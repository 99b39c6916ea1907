#![cfg(target_arch = "wasm32")]
use crate::input::PointerState;
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;
use zen_core::{ParticleField, DEFAULT_PARTICLE_COUNT};

mod audio;
mod dom;
mod events;
mod frame;
mod input;
mod render;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("zen-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas_el = document
        .get_element_by_id("zen-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #zen-canvas"))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);

    // Seed from wall clock so each visit drifts differently
    let seed = js_sys::Date::now() as u64;
    let field = Rc::new(RefCell::new(ParticleField::new(
        DEFAULT_PARTICLE_COUNT,
        seed,
    )));
    log::info!("[field] particles={}", field.borrow().count());

    let speed = Rc::new(RefCell::new(1.0_f32));
    let pointer = Rc::new(RefCell::new(PointerState::default()));
    let beat = audio::BeatAudio::new(seed ^ 0x9E37_79B9_7F4A_7C15);

    events::wire_pointer_move(&canvas, pointer.clone());
    events::wire_sliders(&document, speed.clone(), field.clone());
    events::wire_beat_toggle(&document, beat.clone());
    events::wire_global_keydown(beat.clone());

    let gpu = frame::init_gpu(&canvas, field.borrow().count()).await;

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        field,
        pointer,
        speed,
        canvas,
        gpu,
        elapsed_sec: 0.0,
        rotation: Vec2::ZERO,
    }));
    frame::start_loop(frame_ctx);

    Ok(())
}
