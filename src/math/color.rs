use glam::Vec3;

/// Converts a `0xRRGGBB` sRGB color to linear RGB.
#[must_use]
pub fn hex_to_linear(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec3::new(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b))
}

#[inline]
#[must_use]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_and_black_are_fixed_points() {
        assert_eq!(hex_to_linear(0x00_0000), Vec3::ZERO);
        let white = hex_to_linear(0xff_ffff);
        assert!((white - Vec3::ONE).abs().max_element() < 1e-6);
    }

    #[test]
    fn channels_are_unpacked_in_order() {
        let c = hex_to_linear(0xff_0000);
        assert!(c.x > 0.99 && c.y == 0.0 && c.z == 0.0);
    }
}
