//! Blue-to-red "jet" palette for 8-bit intensities.

use image::Rgb;

/// Map an 8-bit intensity to the jet palette: dark blue at 0 through cyan,
/// yellow and orange to dark red at 255.
pub fn jet(value: u8) -> Rgb<u8> {
    let t = value as f32 / 255.0;
    let channel = |offset: f32| {
        let v = (1.5 - (4.0 * t - offset).abs()).clamp(0.0, 1.0);
        (v * 255.0).round() as u8
    };
    Rgb([channel(3.0), channel(2.0), channel(1.0)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jet_endpoints() {
        assert_eq!(jet(0), Rgb([0, 0, 128]));
        assert_eq!(jet(255), Rgb([128, 0, 0]));

        let Rgb([r, g, b]) = jet(128);
        assert!(g > 250);
        assert!(r > 120 && b > 120);
    }
}
