//! The "jet" colour scale used for entropy values.
//!
//! Channels are piecewise linear over `[0, 1]` and sampled through a
//! 256-entry table, so nearby values share a colour the way a lookup-table
//! colormap does.

use super::Rgb;

const LUT_SIZE: usize = 256;

type Segment = &'static [(f64, f64)];

const RED: Segment = &[(0.0, 0.0), (0.35, 0.0), (0.66, 1.0), (0.89, 1.0), (1.0, 0.5)];
const GREEN: Segment = &[(0.0, 0.0), (0.125, 0.0), (0.375, 1.0), (0.64, 1.0), (0.91, 0.0), (1.0, 0.0)];
const BLUE: Segment = &[(0.0, 0.5), (0.11, 1.0), (0.34, 1.0), (0.65, 0.0), (1.0, 0.0)];

/// Colour for `value`, clamped to `[0, 1]`. `NaN` has no colour.
pub fn jet(value: f64) -> Option<Rgb> {
    if value.is_nan() {
        return None;
    }
    let value = value.clamp(0.0, 1.0);
    let idx = ((value * LUT_SIZE as f64) as usize).min(LUT_SIZE - 1);
    let t = idx as f64 / (LUT_SIZE - 1) as f64;
    Some([channel(RED, t), channel(GREEN, t), channel(BLUE, t)])
}

fn channel(segment: Segment, t: f64) -> u8 {
    let level = segment
        .windows(2)
        .find(|pair| t <= pair[1].0)
        .map(|pair| {
            let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
            y0 + (y1 - y0) * (t - x0) / (x1 - x0)
        })
        .unwrap_or(0.0);
    (level * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::bottom(0.0, [0, 0, 128])]
    #[case::top(1.0, [128, 0, 0])]
    #[case::middle(0.5, [125, 255, 122])]
    fn samples_known_points(#[case] value: f64, #[case] expected: Rgb) {
        assert_eq!(jet(value), Some(expected));
    }

    #[test]
    fn clamps_out_of_range_values() {
        assert_eq!(jet(-3.0), jet(0.0));
        assert_eq!(jet(7.5), jet(1.0));
    }

    #[test]
    fn nan_has_no_colour() {
        assert_eq!(jet(f64::NAN), None);
    }

    #[test]
    fn low_entropy_is_blue_and_high_is_red() {
        let [r, _, b] = jet(0.1).unwrap_or_default();
        assert!(b > r);
        let [r, _, b] = jet(0.9).unwrap_or_default();
        assert!(r > b);
    }
}
