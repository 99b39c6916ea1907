//! Lookahead beat scheduler.
//!
//! Audio timing has to be sample-accurate while the triggering logic runs on
//! a coarse periodic timer, so the scheduler is polled every
//! [`LOOKAHEAD_MS`](crate::constants::LOOKAHEAD_MS) and drains every beat
//! that falls inside the next
//! [`SCHEDULE_AHEAD_SEC`](crate::constants::SCHEDULE_AHEAD_SEC) window into
//! an out-events vec. The 100 ms of slack absorbs timer jitter without
//! audible error, and the drain loop guarantees each beat is emitted exactly
//! once.
//!
//! The scheduler owns no clock: `schedule` takes the current audio-clock
//! time explicitly so the same type runs against `AudioContext.currentTime`
//! on the web, a stream-relative sample clock natively, and plain floats in
//! tests.

use crate::constants::{DEFAULT_TEMPO_BPM, LOOKAHEAD_MS, SCHEDULE_AHEAD_SEC};
use rand::Rng;
use std::time::Duration;

/// A single percussive event, stamped with the audio-clock time it should
/// sound at.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BeatEvent {
    pub start_time_sec: f64,
}

pub struct BeatScheduler {
    is_playing: bool,
    tempo_bpm: f32,
    next_tick_time: f64,
    schedule_ahead_sec: f64,
}

impl Default for BeatScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl BeatScheduler {
    /// Created inactive at the default tempo.
    pub fn new() -> Self {
        Self {
            is_playing: false,
            tempo_bpm: DEFAULT_TEMPO_BPM,
            next_tick_time: 0.0,
            schedule_ahead_sec: SCHEDULE_AHEAD_SEC,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn tempo(&self) -> f32 {
        self.tempo_bpm
    }

    pub fn set_tempo(&mut self, bpm: f32) {
        self.tempo_bpm = bpm;
    }

    /// Audio-clock time of the next unscheduled beat.
    pub fn next_tick_time(&self) -> f64 {
        self.next_tick_time
    }

    /// Activate, re-seeding the beat grid at the current clock. A stopped
    /// scheduler never resumes its previous schedule.
    pub fn start(&mut self, now_sec: f64) {
        self.is_playing = true;
        self.next_tick_time = now_sec;
    }

    /// Deactivate. The host cancels its pending poll timer; sounds already
    /// scheduled decay naturally.
    pub fn stop(&mut self) {
        self.is_playing = false;
    }

    /// One scheduling step: emit every beat that falls before
    /// `now + schedule_ahead` and advance the grid by `60 / tempo` per beat.
    /// No-op while inactive.
    pub fn schedule(&mut self, now_sec: f64, out_events: &mut Vec<BeatEvent>) {
        if !self.is_playing {
            return;
        }
        while self.next_tick_time < now_sec + self.schedule_ahead_sec {
            out_events.push(BeatEvent {
                start_time_sec: self.next_tick_time,
            });
            self.next_tick_time += 60.0 / self.tempo_bpm as f64;
        }
    }

    /// Poll interval the host should re-arm its timer with.
    pub fn lookahead(&self) -> Duration {
        Duration::from_millis(LOOKAHEAD_MS)
    }
}

/// Value of an exponential parameter ramp from `start` to `end` over
/// `duration` seconds, sampled at `t`. Mirrors WebAudio's
/// `exponentialRampToValueAtTime` curve so the native mixer renders the same
/// envelopes the web backend gets from the audio graph. Both endpoints must
/// be non-zero and share a sign.
pub fn exp_ramp(start: f32, end: f32, t: f64, duration: f64) -> f32 {
    if t <= 0.0 {
        return start;
    }
    if t >= duration {
        return end;
    }
    start * (end / start).powf((t / duration) as f32)
}

/// Fill a buffer with uniform random noise in \[-1, 1] for the hi-hat burst.
pub fn fill_noise<R: Rng>(buf: &mut [f32], rng: &mut R) {
    for sample in buf.iter_mut() {
        *sample = rng.gen::<f32>() * 2.0 - 1.0;
    }
}
