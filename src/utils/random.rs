//! Random spawning helpers.

use rand::Rng;

use crate::core::types::Color;

pub fn random_between<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..max)
}

/// Random hue at fixed saturation and value (both in percent).
pub fn random_hsv_color<R: Rng + ?Sized>(rng: &mut R, saturation: f64, value: f64) -> Color {
    let hue = rng.gen_range(0.0..360.0);
    hsv_to_rgb(hue, saturation / 100.0, value / 100.0)
}

pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> Color {
    let s = saturation.clamp(0.0, 1.0);
    let v = value.clamp(0.0, 1.0);
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = v * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |f: f64| ((f + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Color::new(channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn primary_hues_map_to_primary_colors() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Color::new(255, 0, 0));
        assert_eq!(hsv_to_rgb(120.0, 1.0, 1.0), Color::new(0, 255, 0));
        assert_eq!(hsv_to_rgb(240.0, 1.0, 1.0), Color::new(0, 0, 255));
        assert_eq!(hsv_to_rgb(42.0, 0.0, 1.0), Color::new(255, 255, 255));
    }

    #[test]
    fn random_between_handles_empty_range() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(random_between(&mut rng, 3.0, 3.0), 3.0);
        let v = random_between(&mut rng, -1.0, 1.0);
        assert!((-1.0..1.0).contains(&v));
    }
}
