use zen_core::hsl_to_rgb;

fn assert_rgb_close(actual: [f32; 3], expected: [f32; 3]) {
    for i in 0..3 {
        assert!(
            (actual[i] - expected[i]).abs() < 1e-4,
            "channel {i}: {actual:?} vs {expected:?}"
        );
    }
}

#[test]
fn primary_hues_at_field_saturation_and_lightness() {
    // hsl(h, 70%, 60%): chroma 0.56, offset 0.32
    assert_rgb_close(hsl_to_rgb(0.0, 0.7, 0.6), [0.88, 0.32, 0.32]);
    assert_rgb_close(hsl_to_rgb(120.0, 0.7, 0.6), [0.32, 0.88, 0.32]);
    assert_rgb_close(hsl_to_rgb(240.0, 0.7, 0.6), [0.32, 0.32, 0.88]);
}

#[test]
fn secondary_hues() {
    assert_rgb_close(hsl_to_rgb(60.0, 1.0, 0.5), [1.0, 1.0, 0.0]);
    assert_rgb_close(hsl_to_rgb(180.0, 1.0, 0.5), [0.0, 1.0, 1.0]);
    assert_rgb_close(hsl_to_rgb(300.0, 1.0, 0.5), [1.0, 0.0, 1.0]);
}

#[test]
fn zero_saturation_is_grayscale() {
    for l in [0.0, 0.25, 0.5, 0.75, 1.0] {
        assert_rgb_close(hsl_to_rgb(123.0, 0.0, l), [l, l, l]);
    }
}

#[test]
fn lightness_extremes_are_black_and_white() {
    assert_rgb_close(hsl_to_rgb(42.0, 0.7, 0.0), [0.0, 0.0, 0.0]);
    assert_rgb_close(hsl_to_rgb(42.0, 0.7, 1.0), [1.0, 1.0, 1.0]);
}

#[test]
fn hue_wraps_modulo_360() {
    for h in [0.0f32, 90.0, 215.0, 359.0] {
        assert_rgb_close(hsl_to_rgb(h + 360.0, 0.7, 0.6), hsl_to_rgb(h, 0.7, 0.6));
        assert_rgb_close(hsl_to_rgb(h - 360.0, 0.7, 0.6), hsl_to_rgb(h, 0.7, 0.6));
    }
}

#[test]
fn channels_stay_in_unit_range_across_the_wheel() {
    for h in (0..720).step_by(7) {
        let rgb = hsl_to_rgb(h as f32, 0.7, 0.6);
        for (i, c) in rgb.iter().enumerate() {
            assert!(
                (0.0..=1.0).contains(c),
                "hue {h} channel {i} out of range: {c}"
            );
        }
    }
}
