//! CSS-style HSL to RGB conversion for uniform recoloring of the field.

/// Convert HSL to linear RGB triples in \[0, 1\].
///
/// `hue_degrees` wraps modulo 360; `saturation` and `lightness` are in
/// \[0, 1\]. Matches the CSS `hsl()` parse the original visualization fed to
/// its color class.
pub fn hsl_to_rgb(hue_degrees: f32, saturation: f32, lightness: f32) -> [f32; 3] {
    let h = hue_degrees.rem_euclid(360.0);
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    [r1 + m, g1 + m, b1 + m]
}
