use rand::rngs::StdRng;
use rand::SeedableRng;
use zen_core::{
    exp_ramp, fill_noise, BeatEvent, BeatScheduler, ENVELOPE_FLOOR, KICK_GAIN, LOOKAHEAD_MS,
};

#[test]
fn scheduler_is_created_inactive() {
    let mut s = BeatScheduler::new();
    assert!(!s.is_playing());
    let mut events = Vec::new();
    s.schedule(0.0, &mut events);
    assert!(events.is_empty(), "inactive scheduler must not emit");
}

#[test]
fn first_drain_at_t0_emits_exactly_the_immediate_beat() {
    // 0.1s window / 0.5s beat interval at 120 BPM: only the immediate beat
    // qualifies, and the grid advances to 60/120 = 0.5.
    let mut s = BeatScheduler::new();
    assert_eq!(s.tempo(), 120.0);
    s.start(0.0);
    let mut events = Vec::new();
    s.schedule(0.0, &mut events);
    assert_eq!(events, vec![BeatEvent { start_time_sec: 0.0 }]);
    assert_eq!(s.next_tick_time(), 0.5);
}

#[test]
fn restart_reseeds_the_grid_at_the_current_clock() {
    let mut s = BeatScheduler::new();
    s.start(0.0);
    let mut events = Vec::new();
    s.schedule(0.0, &mut events);
    s.stop();
    assert!(!s.is_playing());

    // Toggling back on later must not resume the old schedule.
    s.start(10.0);
    events.clear();
    s.schedule(10.0, &mut events);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].start_time_sec, 10.0);
    assert_eq!(s.next_tick_time(), 10.5);
}

#[test]
fn every_beat_is_scheduled_exactly_once_under_timer_jitter() {
    let mut s = BeatScheduler::new();
    s.start(0.0);
    let mut events = Vec::new();

    // Irregular poll cadence around the nominal 25ms lookahead.
    let jitter = [0.011, 0.043, 0.025, 0.002, 0.071, 0.019, 0.033];
    let mut now = 0.0f64;
    let mut k = 0usize;
    while now < 4.0 {
        s.schedule(now, &mut events);
        now += jitter[k % jitter.len()];
        k += 1;
    }

    assert!(!events.is_empty());
    for (i, ev) in events.iter().enumerate() {
        let expected = i as f64 * 0.5;
        assert!(
            (ev.start_time_sec - expected).abs() < 1e-9,
            "beat {i} scheduled at {} instead of {expected}",
            ev.start_time_sec
        );
    }
}

#[test]
fn tempo_changes_the_beat_interval() {
    let mut s = BeatScheduler::new();
    s.set_tempo(60.0);
    s.start(0.0);
    let mut events = Vec::new();
    s.schedule(0.0, &mut events);
    assert_eq!(s.next_tick_time(), 1.0, "60 BPM means one beat per second");
}

#[test]
fn lookahead_matches_the_poll_interval_constant() {
    let s = BeatScheduler::new();
    assert_eq!(s.lookahead().as_millis() as u64, LOOKAHEAD_MS);
}

#[test]
fn exp_ramp_hits_endpoints_and_decays_monotonically() {
    let dur = 0.5;
    assert_eq!(exp_ramp(KICK_GAIN, ENVELOPE_FLOOR, 0.0, dur), KICK_GAIN);
    assert_eq!(exp_ramp(KICK_GAIN, ENVELOPE_FLOOR, dur, dur), ENVELOPE_FLOOR);

    let mut prev = exp_ramp(KICK_GAIN, ENVELOPE_FLOOR, 0.0, dur);
    for step in 1..=100 {
        let t = dur * step as f64 / 100.0;
        let v = exp_ramp(KICK_GAIN, ENVELOPE_FLOOR, t, dur);
        assert!(v < prev, "envelope not decaying at t={t}: {v} >= {prev}");
        assert!(v > 0.0, "exponential ramp never reaches zero");
        prev = v;
    }
}

#[test]
fn exp_ramp_midpoint_is_the_geometric_mean() {
    // Exponential interpolation: value at t/2 is sqrt(start * end).
    let mid = exp_ramp(150.0, 0.01, 0.25, 0.5);
    let expected = (150.0f32 * 0.01).sqrt();
    assert!((mid - expected).abs() / expected < 1e-4);
}

#[test]
fn fill_noise_stays_in_unit_range() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut buf = vec![0.0f32; 2205]; // 50ms at 44.1kHz
    fill_noise(&mut buf, &mut rng);
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    for &v in &buf {
        assert!((-1.0..=1.0).contains(&v));
        min = min.min(v);
        max = max.max(v);
    }
    // Uniform noise over a couple thousand samples spans most of the range
    assert!(min < -0.9 && max > 0.9, "noise looks degenerate: [{min}, {max}]");
}
