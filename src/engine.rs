use kurbo::Point;
use rand::Rng;

use crate::{
    params::ResolvedLayer,
    source::{SourceImage, luminance},
};

/// One emitted dot, in source-image pixel coordinates.
///
/// The shared unit between the raster and vector paths: both consume the same
/// primitive stream, so their geometry is identical by construction.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DotPrimitive {
    pub center: Point,
    pub diameter: f64,
}

/// Manhattan distance between two RGB8 colors, `0..=765`.
pub fn manhattan_distance(a: [u8; 3], b: [u8; 3]) -> u16 {
    let d = |x: u8, y: u8| u16::from(x.abs_diff(y));
    d(a[0], b[0]) + d(a[1], b[1]) + d(a[2], b[2])
}

/// Produce one layer's halftone separation.
///
/// Walks a sampling grid rotated by the color's screen angle. The unrotated
/// grid sweeps the square `-max(w,h) .. 2*max(w,h)` so that the rotated grid
/// covers the whole image at any angle; rotated points falling outside the
/// image are discarded rather than sampled.
///
/// A sampled pixel belongs to the layer iff its distance to the target sits
/// inside the tolerance band (inclusive on both ends). Matching pixels get a
/// dot sized by luminance: darker source, larger dot. `randomness_percent`
/// jitters the diameter by a uniform factor in `[1-r, 1+r]`; at zero the RNG
/// is never consumed and the output is fully deterministic.
///
/// Inputs are assumed normalized (see [`crate::params::Layer::resolve`]);
/// degenerate cases are skipped, never reported.
pub fn separate<R: Rng>(
    source: &SourceImage,
    layer: &ResolvedLayer,
    rng: &mut R,
) -> Vec<DotPrimitive> {
    let angle = layer.color.screen_angle_degrees.to_radians();
    let (sin, cos) = angle.sin_cos();
    let cell = layer.halftone.cell_size();

    let width = f64::from(source.width());
    let height = f64::from(source.height());
    let extent = width.max(height);
    let start = -extent;
    let end = 2.0 * extent;

    let min_size = layer.halftone.min_dot_size;
    let max_size = layer.halftone.max_dot_size;
    let randomness = f64::from(layer.halftone.randomness_percent) / 100.0;

    let mut dots = Vec::new();

    let mut u = start;
    while u < end {
        let mut v = start;
        while v < end {
            let x = u * cos - v * sin;
            let y = u * sin + v * cos;

            if x >= 0.0 && x < width && y >= 0.0 && y < height {
                let rgb = source.sample(x as u32, y as u32);
                let distance = manhattan_distance(rgb, layer.target_rgb);

                if layer.tolerance.contains(distance) {
                    let mut diameter =
                        min_size + (max_size - min_size) * (1.0 - luminance(rgb));

                    if randomness > 0.0 {
                        diameter *= rng.random_range(1.0 - randomness..=1.0 + randomness);
                    }

                    if diameter > 0.0 {
                        dots.push(DotPrimitive {
                            center: Point::new(x, y),
                            diameter,
                        });
                    }
                }
            }

            v += cell;
        }
        u += cell;
    }

    dots
}
