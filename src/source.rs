use crate::error::{ScreentoneError, ScreentoneResult};

/// Decoded source image: tightly packed RGB8, row-major, immutable once built.
#[derive(Clone, Debug)]
pub struct SourceImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl SourceImage {
    pub fn from_rgb8(width: u32, height: u32, data: Vec<u8>) -> ScreentoneResult<Self> {
        if width == 0 || height == 0 {
            return Err(ScreentoneError::validation(
                "source image width/height must be > 0",
            ));
        }
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(3);
        if data.len() != expected {
            return Err(ScreentoneError::validation(format!(
                "source buffer is {} bytes, expected {expected} for {width}x{height} rgb8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_dynamic(img: &image::DynamicImage) -> Self {
        let rgb = img.to_rgb8();
        Self {
            width: rgb.width(),
            height: rgb.height(),
            data: rgb.into_raw(),
        }
    }

    /// Decode-time bound: shrink (never grow) to fit within `max_width` x
    /// `max_height`, preserving aspect ratio.
    pub fn fit_within(img: image::DynamicImage, max_width: u32, max_height: u32) -> Self {
        let img = if img.width() > max_width || img.height() > max_height {
            img.resize(max_width, max_height, image::imageops::FilterType::Triangle)
        } else {
            img
        };
        Self::from_dynamic(&img)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Read one pixel. `x`/`y` must be inside the buffer.
    pub fn sample(&self, x: u32, y: u32) -> [u8; 3] {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

/// Rec.601 luma, normalized to `[0, 1]`.
pub fn luminance(rgb: [u8; 3]) -> f64 {
    (0.299 * f64::from(rgb[0]) + 0.587 * f64::from(rgb[1]) + 0.114 * f64::from(rgb[2])) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgb8_validates_buffer_length() {
        assert!(SourceImage::from_rgb8(2, 2, vec![0; 12]).is_ok());
        assert!(SourceImage::from_rgb8(2, 2, vec![0; 11]).is_err());
        assert!(SourceImage::from_rgb8(0, 2, vec![]).is_err());
    }

    #[test]
    fn sample_reads_row_major_pixels() {
        let img = SourceImage::from_rgb8(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(img.sample(0, 0), [1, 2, 3]);
        assert_eq!(img.sample(1, 0), [4, 5, 6]);
    }

    #[test]
    fn luminance_endpoints() {
        assert_eq!(luminance([0, 0, 0]), 0.0);
        assert!((luminance([255, 255, 255]) - 1.0).abs() < 1e-12);
        assert!(luminance([0, 255, 0]) > luminance([255, 0, 0]));
    }

    #[test]
    fn fit_within_shrinks_but_never_grows() {
        let big = image::DynamicImage::new_rgb8(1600, 600);
        let bounded = SourceImage::fit_within(big, 800, 600);
        assert_eq!(bounded.width(), 800);
        assert_eq!(bounded.height(), 300);

        let small = image::DynamicImage::new_rgb8(40, 30);
        let kept = SourceImage::fit_within(small, 800, 600);
        assert_eq!((kept.width(), kept.height()), (40, 30));
    }
}
