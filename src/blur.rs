use rayon::prelude::*;

use crate::buffer::{RasterBuffer, CHANNELS};

/// Box blur standing in for a Gaussian.
///
/// Every pixel at least `radius` away from each edge becomes the unweighted
/// mean of its `(2r+1)^2` neighbourhood; the border band keeps its original
/// value. Uniform weights only, no Gaussian falloff.
pub fn box_blur(buffer: &mut RasterBuffer, radius: f32) {
    if !(radius >= 1.0) {
        return;
    }
    let (width, height) = (buffer.width(), buffer.height());
    // Past the image extent the border band already covers everything.
    let r = radius.min(width.max(height) as f32).floor() as usize;
    if width <= 2 * r || height <= 2 * r {
        return;
    }

    let source = buffer.pixels().to_vec();
    let stride = buffer.stride();
    let span = 2 * r + 1;
    let area = (span * span) as u64;

    // Horizontal sums for interior columns of every row.
    let mut row_sums = vec![0u32; width * height * CHANNELS];
    row_sums
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, sums)| {
            let row = &source[y * stride..(y + 1) * stride];
            for x in r..width - r {
                for c in 0..CHANNELS {
                    sums[x * CHANNELS + c] = (x - r..=x + r)
                        .map(|sx| row[sx * CHANNELS + c] as u32)
                        .sum();
                }
            }
        });

    buffer.par_rows_mut().for_each(|(y, row)| {
        if y < r || y >= height - r {
            return;
        }
        for x in r..width - r {
            for c in 0..CHANNELS {
                let total: u64 = (y - r..=y + r)
                    .map(|sy| row_sums[sy * stride + x * CHANNELS + c] as u64)
                    .sum();
                row[x * CHANNELS + c] = ((total + area / 2) / area) as u8;
            }
        }
    });
}

/// Mean of the edge-clamped square of half-size `radius` around `(x, y)`.
/// Radii beyond the larger image side are capped to it.
pub fn neighbourhood_mean(source: &RasterBuffer, x: usize, y: usize, radius: usize) -> [u8; 4] {
    let radius = radius.min(source.width().max(source.height()));
    let r = radius as isize;
    let (cx, cy) = (x as isize, y as isize);
    let mut sum = [0u64; 4];
    for sy in cy - r..=cy + r {
        for sx in cx - r..=cx + r {
            let px = source.clamped_pixel(sx, sy);
            for c in 0..CHANNELS {
                sum[c] += px[c] as u64;
            }
        }
    }
    let count = ((2 * radius + 1) * (2 * radius + 1)) as u64;
    sum.map(|s| ((s + count / 2) / count) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_field_is_unchanged() {
        let mut buffer = RasterBuffer::filled(12, 9, [90, 40, 200, 255]).unwrap();
        let before = buffer.clone();
        box_blur(&mut buffer, 3.0);
        assert_eq!(buffer, before);
    }

    #[test]
    fn border_band_is_left_alone() {
        let mut buffer = RasterBuffer::new(7, 7).unwrap();
        buffer.set_pixel(3, 3, [255, 255, 255, 255]);
        buffer.set_pixel(0, 0, [50, 50, 50, 255]);
        box_blur(&mut buffer, 1.0);
        assert_eq!(buffer.pixel(0, 0), [50, 50, 50, 255]);
        // 255 / 9 rounds to 28
        assert_eq!(buffer.pixel(3, 3)[0], 28);
        assert_eq!(buffer.pixel(2, 2)[0], 28);
        assert_eq!(buffer.pixel(5, 5)[0], 0);
    }

    #[test]
    fn radius_below_one_is_a_no_op() {
        let mut buffer = RasterBuffer::new(5, 5).unwrap();
        buffer.set_pixel(2, 2, [255, 0, 0, 255]);
        let before = buffer.clone();
        box_blur(&mut buffer, 0.0);
        box_blur(&mut buffer, -2.0);
        box_blur(&mut buffer, f32::NAN);
        box_blur(&mut buffer, f32::NAN);
        assert_eq!(buffer, before);
    }

    #[test]
    fn neighbourhood_mean_clamps_at_edges() {
        let mut buffer = RasterBuffer::filled(3, 3, [0, 0, 0, 255]).unwrap();
        buffer.set_pixel(0, 0, [90, 0, 0, 255]);
        // the corner sample is repeated four times in a clamped 3x3 window
        assert_eq!(neighbourhood_mean(&buffer, 0, 0, 1)[0], 40);
        assert_eq!(neighbourhood_mean(&buffer, 1, 1, 0)[0], 0);
    }

    #[test]
    fn huge_radius_leaves_the_buffer_alone() {
        let mut buffer = RasterBuffer::new(6, 4).unwrap();
        buffer.set_pixel(3, 2, [255, 10, 10, 255]);
        let before = buffer.clone();
        box_blur(&mut buffer, 1e30);
        box_blur(&mut buffer, f32::INFINITY);
        assert_eq!(buffer, before);
    }

    #[test]
    fn huge_neighbourhood_is_capped_to_the_image() {
        let buffer = RasterBuffer::filled(5, 3, [40, 80, 120, 255]).unwrap();
        assert_eq!(neighbourhood_mean(&buffer, 2, 1, usize::MAX), [40, 80, 120, 255]);
        assert_eq!(
            neighbourhood_mean(&buffer, 0, 0, usize::MAX),
            neighbourhood_mean(&buffer, 0, 0, 5)
        );
    }
}
