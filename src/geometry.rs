// Distance and remapping primitives. Pure functions, no state.

use crate::types::PixelPoint;

/// Euclidean distance between two source-frame points.
pub fn distance(a: PixelPoint, b: PixelPoint) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Affine remap of `value` from `[in_min, in_max]` to `[out_min, out_max]`.
/// Does not clamp: inputs outside the source range extrapolate linearly, so a
/// fingertip slightly outside the active area still moves the pointer past the
/// screen edge proportionally.
pub fn interpolate(value: f32, from: (f32, f32), to: (f32, f32)) -> f32 {
    let (in_min, in_max) = from;
    let (out_min, out_max) = to;
    let span = in_max - in_min;
    if span == 0.0 {
        return out_min;
    }
    out_min + (value - in_min) * (out_max - out_min) / span
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_known_values() {
        assert_eq!(distance(PixelPoint::new(0.0, 0.0), PixelPoint::new(3.0, 4.0)), 5.0);
        assert_eq!(distance(PixelPoint::new(10.0, 10.0), PixelPoint::new(10.0, 10.0)), 0.0);
        assert_eq!(distance(PixelPoint::new(-3.0, -4.0), PixelPoint::new(0.0, 0.0)), 5.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = PixelPoint::new(1.5, 2.5);
        let b = PixelPoint::new(4.5, 6.5);
        assert_eq!(distance(a, b), distance(b, a));
        assert!((distance(a, b) - 5.0).abs() < 0.01);
    }

    #[test]
    fn interpolate_is_linear() {
        assert_eq!(interpolate(5.0, (0.0, 10.0), (0.0, 100.0)), 50.0);
        assert_eq!(interpolate(0.0, (0.0, 10.0), (0.0, 100.0)), 0.0);
        assert_eq!(interpolate(10.0, (0.0, 10.0), (0.0, 100.0)), 100.0);
    }

    #[test]
    fn interpolate_extrapolates_outside_range() {
        assert_eq!(interpolate(-5.0, (0.0, 10.0), (0.0, 100.0)), -50.0);
        assert_eq!(interpolate(15.0, (0.0, 10.0), (0.0, 100.0)), 150.0);
    }

    #[test]
    fn interpolate_degenerate_range() {
        assert_eq!(interpolate(7.0, (5.0, 5.0), (0.0, 100.0)), 0.0);
    }
}
