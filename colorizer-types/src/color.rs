//! Colorspace conversions between sRGB and CIE Lab (D65 illuminant).

/// CIE L*a*b* color representation.
///
/// - L: 0.0-100.0 (lightness)
/// - a: approximately -128 to +128 (green-red axis)
/// - b: approximately -128 to +128 (blue-yellow axis)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    /// Lightness component.
    pub l: f32,
    /// Green-red component.
    pub a: f32,
    /// Blue-yellow component.
    pub b: f32,
}

/// D65 standard illuminant reference white point.
const D65_X: f32 = 0.95047;
const D65_Y: f32 = 1.00000;
const D65_Z: f32 = 1.08883;

/// sRGB to XYZ matrix (D65).
const SRGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];

/// XYZ to sRGB matrix (D65).
const XYZ_TO_SRGB: [[f32; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

/// Decodes one sRGB channel value to linear light.
///
/// Input and output are in `[0, 1]`.
#[inline]
#[must_use]
pub fn srgb_to_linear(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Encodes one linear channel value to sRGB.
///
/// Input is clamped to `[0, 1]`.
#[inline]
#[must_use]
pub fn linear_to_srgb(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Luminance of a gamma-encoded RGB triple in `[0, 1]`.
///
/// Used to build the 3-channel grayscale view fed to the feature
/// extractor.
#[inline]
#[must_use]
pub fn luma(r: f32, g: f32, b: f32) -> f32 {
    0.2125 * r + 0.7154 * g + 0.0721 * b
}

#[inline]
fn linear_rgb_to_xyz(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let x = SRGB_TO_XYZ[0][0] * r + SRGB_TO_XYZ[0][1] * g + SRGB_TO_XYZ[0][2] * b;
    let y = SRGB_TO_XYZ[1][0] * r + SRGB_TO_XYZ[1][1] * g + SRGB_TO_XYZ[1][2] * b;
    let z = SRGB_TO_XYZ[2][0] * r + SRGB_TO_XYZ[2][1] * g + SRGB_TO_XYZ[2][2] * b;
    (x, y, z)
}

#[inline]
fn xyz_to_linear_rgb(x: f32, y: f32, z: f32) -> (f32, f32, f32) {
    let r = XYZ_TO_SRGB[0][0] * x + XYZ_TO_SRGB[0][1] * y + XYZ_TO_SRGB[0][2] * z;
    let g = XYZ_TO_SRGB[1][0] * x + XYZ_TO_SRGB[1][1] * y + XYZ_TO_SRGB[1][2] * z;
    let b = XYZ_TO_SRGB[2][0] * x + XYZ_TO_SRGB[2][1] * y + XYZ_TO_SRGB[2][2] * z;
    (r, g, b)
}

/// Lab f(t) function.
#[inline]
fn lab_f(t: f32) -> f32 {
    const DELTA: f32 = 6.0 / 29.0;
    const DELTA_CUBED: f32 = DELTA * DELTA * DELTA; // ~0.008856

    if t > DELTA_CUBED {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

/// Lab f^-1(t) inverse function.
#[inline]
fn lab_f_inv(t: f32) -> f32 {
    const DELTA: f32 = 6.0 / 29.0;

    if t > DELTA {
        t * t * t
    } else {
        3.0 * DELTA * DELTA * (t - 4.0 / 29.0)
    }
}

/// Converts a gamma-encoded sRGB triple in `[0, 1]` to CIE Lab.
#[inline]
#[must_use]
pub fn srgb_to_lab(r: f32, g: f32, b: f32) -> Lab {
    let r = srgb_to_linear(r);
    let g = srgb_to_linear(g);
    let b = srgb_to_linear(b);

    let (x, y, z) = linear_rgb_to_xyz(r, g, b);

    // Normalize by the reference white
    let xn = x / D65_X;
    let yn = y / D65_Y;
    let zn = z / D65_Z;

    let fx = lab_f(xn);
    let fy = lab_f(yn);
    let fz = lab_f(zn);

    let l = 116.0 * fy - 16.0;
    let a = 500.0 * (fx - fy);
    let b = 200.0 * (fy - fz);

    Lab { l, a, b }
}

/// Converts CIE Lab back to a gamma-encoded sRGB triple.
///
/// Out-of-gamut colors are clipped to `[0, 1]` per channel.
#[inline]
#[must_use]
pub fn lab_to_srgb(lab: Lab) -> (f32, f32, f32) {
    let Lab { l, a, b } = lab;

    let fy = (l + 16.0) / 116.0;
    let fx = a / 500.0 + fy;
    let fz = fy - b / 200.0;

    let x = D65_X * lab_f_inv(fx);
    let y = D65_Y * lab_f_inv(fy);
    let z = D65_Z * lab_f_inv(fz);

    let (r, g, b) = xyz_to_linear_rgb(x, y, z);

    (linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_linear_roundtrip() {
        for i in 0..=255u32 {
            #[allow(clippy::cast_precision_loss)]
            let c = i as f32 / 255.0;
            let back = linear_to_srgb(srgb_to_linear(c));
            assert!((c - back).abs() < 1e-4, "channel {c} -> {back}");
        }
    }

    #[test]
    fn lab_white() {
        let lab = srgb_to_lab(1.0, 1.0, 1.0);
        assert!((lab.l - 100.0).abs() < 0.1);
        assert!(lab.a.abs() < 0.1);
        assert!(lab.b.abs() < 0.1);
    }

    #[test]
    fn lab_black() {
        let lab = srgb_to_lab(0.0, 0.0, 0.0);
        assert!(lab.l.abs() < 0.1);
        assert!(lab.a.abs() < 0.1);
        assert!(lab.b.abs() < 0.1);
    }

    #[test]
    fn lab_pure_red() {
        // Reference values for sRGB red under D65
        let lab = srgb_to_lab(1.0, 0.0, 0.0);
        assert!((lab.l - 53.24).abs() < 0.5, "L = {}", lab.l);
        assert!((lab.a - 80.09).abs() < 0.5, "a = {}", lab.a);
        assert!((lab.b - 67.20).abs() < 0.5, "b = {}", lab.b);
    }

    #[test]
    fn lab_roundtrip() {
        let colors = [
            (0.2, 0.4, 0.6),
            (0.9, 0.1, 0.3),
            (0.5, 0.5, 0.5),
            (0.0, 1.0, 0.0),
            (1.0, 1.0, 0.0),
        ];

        for (r, g, b) in colors {
            let lab = srgb_to_lab(r, g, b);
            let (r2, g2, b2) = lab_to_srgb(lab);
            assert!((r - r2).abs() < 1e-3, "r: {r} -> {r2}");
            assert!((g - g2).abs() < 1e-3, "g: {g} -> {g2}");
            assert!((b - b2).abs() < 1e-3, "b: {b} -> {b2}");
        }
    }

    #[test]
    fn gray_has_no_chroma() {
        for v in [0.1f32, 0.3, 0.5, 0.7, 0.9] {
            let lab = srgb_to_lab(v, v, v);
            assert!(lab.a.abs() < 0.05, "a = {} for gray {v}", lab.a);
            assert!(lab.b.abs() < 0.05, "b = {} for gray {v}", lab.b);
        }
    }

    #[test]
    fn luma_weights_sum_to_one() {
        assert!((luma(1.0, 1.0, 1.0) - 1.0).abs() < 1e-4);
        assert!(luma(0.0, 0.0, 0.0).abs() < 1e-6);
    }
}
