//! RGB <-> HSL conversion used by the blend filters.
//!
//! Both directions are pure. Inputs to [`rgb_to_hsl`] are channel fractions
//! in `[0, 1]`; [`hsl_to_rgb`] rounds back to integer channels, so a
//! round-trip is stable within one channel unit.

/// Converts RGB channel fractions in `[0, 1]` to `(hue, saturation, lightness)`
/// with hue in `[0, 360)` and saturation/lightness in `[0, 1]`.
pub fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let lightness = (max + min) / 2.0;

    if delta == 0.0 {
        return (0.0, 0.0, lightness);
    }

    let saturation = delta / (1.0 - (2.0 * lightness - 1.0).abs());
    let sector = if max == r {
        ((g - b) / delta) % 6.0
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    let hue = (sector * 60.0).rem_euclid(360.0);

    (hue, saturation, lightness)
}

/// Converts `(hue, saturation, lightness)` back to integer RGB channels.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = chroma * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - chroma / 2.0;

    let (r, g, b) = match h {
        h if h < 60.0 => (chroma, x, 0.0),
        h if h < 120.0 => (x, chroma, 0.0),
        h if h < 180.0 => (0.0, chroma, x),
        h if h < 240.0 => (0.0, x, chroma),
        h if h < 300.0 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    (to_channel(r + m), to_channel(g + m), to_channel(b + m))
}

fn to_channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}
