use crate::audio::BeatAudio;
use crate::dom;
use crate::input::{pointer_normalized, PointerState};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;
use zen_core::ParticleField;

/// Track the raw pointer target; smoothing happens in the frame loop.
pub fn wire_pointer_move(canvas: &web::HtmlCanvasElement, pointer: Rc<RefCell<PointerState>>) {
    let canvas_for_move = canvas.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        pointer.borrow_mut().target = pointer_normalized(&ev, &canvas_for_move);
    }) as Box<dyn FnMut(web::PointerEvent)>);
    if let Some(w) = web::window() {
        let _ =
            w.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

pub fn wire_sliders(
    document: &web::Document,
    speed: Rc<RefCell<f32>>,
    field: Rc<RefCell<ParticleField>>,
) {
    dom::add_input_listener(document, "speed-slider", move |v| {
        *speed.borrow_mut() = v;
    });
    dom::add_input_listener(document, "hue-slider", move |v| {
        field.borrow_mut().set_hue(v);
    });
}

pub fn wire_beat_toggle(document: &web::Document, beat: Rc<BeatAudio>) {
    let doc = document.clone();
    dom::add_click_listener(document, "beat-toggle", move || {
        beat.toggle();
        if let Some(el) = doc.get_element_by_id("beat-toggle") {
            let playing = beat.is_playing();
            el.set_text_content(Some(if playing {
                "Mute Harmony Beat"
            } else {
                "Enable Harmony Beat"
            }));
            let _ = el.class_list().toggle_with_force("active", playing);
        }
    });
}

/// Space toggles the beat, keyboard parity with the button.
pub fn wire_global_keydown(beat: Rc<BeatAudio>) {
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        if ev.key() == " " {
            beat.toggle();
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(web::KeyboardEvent)>);
    if let Some(w) = web::window() {
        let _ = w.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
