//! Packed-u32 color helpers for the render buffer.
//!
//! Colors travel to the host as 0x00RRGGBB values in a flat u32 array, so the
//! HSL temperature scale is converted here instead of on the JS side.

use crate::random::XorShift32;

/// Pack 8-bit channels into 0x00RRGGBB.
#[inline]
pub fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// HSL to packed RGB. Hue in degrees, saturation and lightness in [0, 100].
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> u32 {
    let h = h.rem_euclid(360.0);
    let s = (s / 100.0).clamp(0.0, 1.0);
    let l = (l / 100.0).clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp.rem_euclid(2.0) - 1.0).abs());
    let (r1, g1, b1) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    rgb(
        ((r1 + m) * 255.0).round() as u8,
        ((g1 + m) * 255.0).round() as u8,
        ((b1 + m) * 255.0).round() as u8,
    )
}

/// Map a temperature to the emission color scale: hue and lightness both
/// rise with temperature, full saturation.
pub fn temperature_color(temp: f32) -> u32 {
    let hue = (temp / 60.0).floor();
    let lightness = (temp / 60.0 + 20.0).floor().min(100.0);
    hsl_to_rgb(hue, 100.0, lightness)
}

/// Random bright RGB color, channels in 55..=255.
pub fn random_color(rng: &mut XorShift32) -> u32 {
    let r = rng.next_range(55.0, 256.0) as u8;
    let g = rng.next_range(55.0, 256.0) as u8;
    let b = rng.next_range(55.0, 256.0) as u8;
    rgb(r, g, b)
}
