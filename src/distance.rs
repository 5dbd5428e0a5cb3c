//! Contains the distance metrics used to compare colors.
//!
//! Two metrics are supported:
//! - [`DistanceMetric::Rgb`]: euclidean distance over the raw `0..=255` sRGB components.
//!   This is cheap but not perceptually uniform (errors are large for blues and greens).
//! - [`DistanceMetric::Lab`]: euclidean distance in the CIELAB color space (CIE76 ΔE).

use palette::{Lab, Srgb};
use std::array;

/// The metric used to measure the dissimilarity of two colors.
///
/// Neither metric is universally better for picking palette colors,
/// so the choice is left to the caller. The default is [`DistanceMetric::Rgb`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Euclidean distance between the `0..=255` sRGB components.
    #[default]
    Rgb,
    /// Euclidean distance between the CIELAB representations of the colors (CIE76 ΔE).
    Lab,
}

impl DistanceMetric {
    /// Returns the distance between two colors under this metric.
    ///
    /// The result is non-negative, symmetric, and zero for identical colors.
    #[must_use]
    pub fn distance(self, x: Srgb<u8>, y: Srgb<u8>) -> f32 {
        match self {
            DistanceMetric::Rgb => rgb_distance(x, y),
            DistanceMetric::Lab => lab_distance(srgb_to_lab(x), srgb_to_lab(y)),
        }
    }
}

/// The linear sRGB to XYZ matrix for the D65 white point.
const SRGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.4124, 0.3576, 0.1805],
    [0.2126, 0.7152, 0.0722],
    [0.0193, 0.1192, 0.9505],
];

/// The XYZ coordinates of the D65 reference white.
const D65_WHITE: [f32; 3] = [0.95047, 1.0, 1.08883];

/// Below this (normalized) value, the CIELAB pivot function is linear.
const LAB_EPSILON: f32 = 0.008856;

/// Decodes an 8-bit sRGB component into a linear `0.0..=1.0` value.
fn srgb_to_linear(component: u8) -> f32 {
    let c = f32::from(component) / 255.0;
    if c > 0.04045 {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

/// The CIELAB pivot function `f(t)`.
fn lab_pivot(t: f32) -> f32 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

/// Converts an sRGB color into CIELAB (D65).
#[must_use]
pub fn srgb_to_lab(color: Srgb<u8>) -> Lab {
    let linear = [color.red, color.green, color.blue].map(srgb_to_linear);

    let [x, y, z] = array::from_fn(|i| {
        let row = SRGB_TO_XYZ[i];
        let xyz = row[0] * linear[0] + row[1] * linear[1] + row[2] * linear[2];
        lab_pivot(xyz / D65_WHITE[i])
    });

    Lab::new(116.0 * y - 16.0, 500.0 * (x - y), 200.0 * (y - z))
}

/// Squared euclidean distance between two points.
pub(crate) fn squared_euclidean_distance<const N: usize>(x: [f32; N], y: [f32; N]) -> f32 {
    let mut dist = 0.0;
    for c in 0..N {
        let d = x[c] - y[c];
        dist += d * d;
    }
    dist
}

/// Returns the components of an sRGB color as `f32`s.
#[inline]
pub(crate) fn srgb_components(color: Srgb<u8>) -> [f32; 3] {
    [color.red, color.green, color.blue].map(f32::from)
}

/// Returns the components of a CIELAB color as an array.
#[inline]
fn lab_components(color: Lab) -> [f32; 3] {
    [color.l, color.a, color.b]
}

/// Euclidean distance between the `0..=255` components of two sRGB colors.
#[must_use]
pub fn rgb_distance(x: Srgb<u8>, y: Srgb<u8>) -> f32 {
    squared_euclidean_distance(srgb_components(x), srgb_components(y)).sqrt()
}

/// Euclidean distance between two CIELAB colors (CIE76 ΔE).
#[must_use]
pub fn lab_distance(x: Lab, y: Lab) -> f32 {
    squared_euclidean_distance(lab_components(x), lab_components(y)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;
    use palette::IntoColor;

    fn assert_lab_near(lab: Lab, expected: [f32; 3], tolerance: f32) {
        for (actual, expected) in lab_components(lab).into_iter().zip(expected) {
            assert!(
                (actual - expected).abs() <= tolerance,
                "{:?} != {expected:?}",
                lab_components(lab)
            );
        }
    }

    #[test]
    fn white_and_black_lab() {
        assert_lab_near(srgb_to_lab(Srgb::new(255, 255, 255)), [100.0, 0.0, 0.0], 0.05);
        assert_lab_near(srgb_to_lab(Srgb::new(0, 0, 0)), [0.0, 0.0, 0.0], 1e-4);
    }

    #[test]
    fn lab_agrees_with_palette_crate() {
        // the matrix here is rounded to 4 places, so allow a small difference
        for color in test_pixels(256) {
            let expected: Lab = color.into_linear().into_color();
            assert_lab_near(srgb_to_lab(color), lab_components(expected), 0.5);
        }
    }

    #[test]
    fn zero_distance_to_self() {
        for color in test_pixels(256) {
            for metric in [DistanceMetric::Rgb, DistanceMetric::Lab] {
                #[allow(clippy::float_cmp)]
                {
                    assert_eq!(metric.distance(color, color), 0.0);
                }
            }
        }
    }

    #[test]
    fn symmetric_and_non_negative() {
        let pixels = test_pixels(128);
        for (&x, &y) in pixels.iter().zip(pixels.iter().rev()) {
            for metric in [DistanceMetric::Rgb, DistanceMetric::Lab] {
                let d = metric.distance(x, y);
                assert!(d >= 0.0);
                #[allow(clippy::float_cmp)]
                {
                    assert_eq!(d, metric.distance(y, x));
                }
            }
        }
    }

    #[test]
    fn known_rgb_distance() {
        let d = rgb_distance(Srgb::new(250, 30, 5), Srgb::new(255, 36, 0));
        assert!((d - 86f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn lab_separates_blues_more_than_rgb() {
        // two blues that are close in RGB but visibly different
        let x = Srgb::new(0, 0, 255);
        let y = Srgb::new(0, 40, 255);
        let z = Srgb::new(40, 0, 255);
        let rgb = (rgb_distance(x, y), rgb_distance(x, z));
        let lab = (
            DistanceMetric::Lab.distance(x, y),
            DistanceMetric::Lab.distance(x, z),
        );
        #[allow(clippy::float_cmp)]
        {
            assert_eq!(rgb.0, rgb.1);
        }
        assert!((lab.0 - lab.1).abs() > 1.0);
    }
}
