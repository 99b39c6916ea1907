//! WebAudio beat backend.
//!
//! Owns the lazily created `AudioContext` and drives the core
//! [`BeatScheduler`] with a self-re-arming `setTimeout` at the lookahead
//! interval. Each due beat is synthesized as two fire-and-forget layers: a
//! sine kick with exponential frequency/gain decay, and a 50ms noise-buffer
//! hi-hat. Nodes self-terminate as their envelopes land; nothing is cleaned
//! up explicitly.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;
use zen_core::{
    fill_noise, BeatEvent, BeatScheduler, ENVELOPE_FLOOR, KICK_DURATION_SEC, KICK_END_HZ,
    KICK_GAIN, KICK_START_HZ, NOISE_DURATION_SEC, NOISE_GAIN,
};

pub struct BeatAudio {
    ctx: RefCell<Option<web::AudioContext>>,
    scheduler: RefCell<BeatScheduler>,
    timer_id: Cell<Option<i32>>,
    noise_rng: RefCell<StdRng>,
}

impl BeatAudio {
    pub fn new(seed: u64) -> Rc<Self> {
        Rc::new(Self {
            ctx: RefCell::new(None),
            scheduler: RefCell::new(BeatScheduler::new()),
            timer_id: Cell::new(None),
            noise_rng: RefCell::new(StdRng::seed_from_u64(seed)),
        })
    }

    pub fn is_playing(&self) -> bool {
        self.scheduler.borrow().is_playing()
    }

    /// Flip playback. Creates and resumes the audio context on first use;
    /// if the platform rejects audio, logs and stays inactive.
    pub fn toggle(self: &Rc<Self>) {
        if self.ctx.borrow().is_none() {
            match web::AudioContext::new() {
                Ok(c) => *self.ctx.borrow_mut() = Some(c),
                Err(e) => {
                    log::error!("AudioContext error: {:?}", e);
                    return;
                }
            }
        }
        let ctx = match self.ctx.borrow().as_ref() {
            Some(c) => c.clone(),
            None => return,
        };
        // Contexts start suspended until a user gesture; this runs from one.
        if ctx.state() == web::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        if self.is_playing() {
            self.scheduler.borrow_mut().stop();
            if let Some(id) = self.timer_id.take() {
                if let Some(w) = web::window() {
                    w.clear_timeout_with_handle(id);
                }
            }
        } else {
            self.scheduler.borrow_mut().start(ctx.current_time());
            self.run_scheduler(&ctx);
        }
    }

    /// One scheduling step: drain due beats, synthesize them, re-arm the
    /// lookahead timer.
    fn run_scheduler(self: &Rc<Self>, ctx: &web::AudioContext) {
        let mut events: Vec<BeatEvent> = Vec::new();
        self.scheduler
            .borrow_mut()
            .schedule(ctx.current_time(), &mut events);
        for ev in &events {
            self.schedule_beat(ctx, ev.start_time_sec);
        }

        let lookahead_ms = self.scheduler.borrow().lookahead().as_millis() as i32;
        let this = self.clone();
        let ctx_next = ctx.clone();
        let cb = Closure::once_into_js(move || {
            if this.scheduler.borrow().is_playing() {
                this.run_scheduler(&ctx_next);
            }
        });
        if let Some(w) = web::window() {
            match w.set_timeout_with_callback_and_timeout_and_arguments_0(
                cb.unchecked_ref(),
                lookahead_ms,
            ) {
                Ok(id) => self.timer_id.set(Some(id)),
                Err(e) => log::error!("beat timer error: {:?}", e),
            }
        }
    }

    fn schedule_beat(&self, ctx: &web::AudioContext, time: f64) {
        // Tonal kick: sine dropping from 150Hz to near-silence over 0.5s
        if let (Ok(osc), Ok(gain)) = (web::OscillatorNode::new(ctx), web::GainNode::new(ctx)) {
            osc.set_type(web::OscillatorType::Sine);
            let _ = osc.frequency().set_value_at_time(KICK_START_HZ, time);
            let _ = osc
                .frequency()
                .exponential_ramp_to_value_at_time(KICK_END_HZ, time + KICK_DURATION_SEC);
            let _ = gain.gain().set_value_at_time(KICK_GAIN, time);
            let _ = gain
                .gain()
                .exponential_ramp_to_value_at_time(ENVELOPE_FLOOR, time + KICK_DURATION_SEC);
            let _ = osc.connect_with_audio_node(&gain);
            let _ = gain.connect_with_audio_node(&ctx.destination());
            let _ = osc.start_with_when(time);
            let _ = osc.stop_with_when(time + KICK_DURATION_SEC);
        }

        // Subtle hi-hat-like noise burst for texture
        let sr = ctx.sample_rate();
        let len = (sr as f64 * NOISE_DURATION_SEC) as u32;
        if let Ok(buffer) = ctx.create_buffer(1, len, sr) {
            let mut samples = vec![0.0f32; len as usize];
            fill_noise(&mut samples, &mut *self.noise_rng.borrow_mut());
            let _ = buffer.copy_to_channel(&mut samples, 0);
            if let (Ok(src), Ok(gain)) = (
                web::AudioBufferSourceNode::new(ctx),
                web::GainNode::new(ctx),
            ) {
                src.set_buffer(Some(&buffer));
                let _ = gain.gain().set_value_at_time(NOISE_GAIN, time);
                let _ = gain
                    .gain()
                    .exponential_ramp_to_value_at_time(ENVELOPE_FLOOR, time + NOISE_DURATION_SEC);
                let _ = src.connect_with_audio_node(&gain);
                let _ = gain.connect_with_audio_node(&ctx.destination());
                let _ = src.start_with_when(time);
            }
        }
    }
}
