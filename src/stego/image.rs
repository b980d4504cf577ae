//! Image carriers and LSB image steganography.
//!
//! [`PixelGrid`] is the in-memory form every image codec works on: a
//! `rows x cols x channels` grid of 8-bit samples, interleaved row-major.
//! Images are decoded with the `image` crate and must be written back to a
//! lossless container; anything lossy destroys the embedded bits.
//!
//! [`LsbImageCodec`] hides one bit per sample across the flattened grid,
//! followed by a null-byte terminator.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, GenericImageView, ImageBuffer, ImageFormat, Luma, LumaA, Rgb, Rgba};

use super::{lsb, Scheme, StegoCodec, StegoError};

/// Maximum number of channels per pixel (RGBA).
pub const MAX_CHANNELS: usize = 4;

/// An 8-bit pixel grid held entirely in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    rows: usize,
    cols: usize,
    channels: usize,
    samples: Vec<u8>,
}

impl PixelGrid {
    /// Creates a grid from interleaved row-major samples.
    pub fn new(
        rows: usize,
        cols: usize,
        channels: usize,
        samples: Vec<u8>,
    ) -> Result<Self, StegoError> {
        if !(1..=MAX_CHANNELS).contains(&channels) {
            return Err(StegoError::invalid(
                Scheme::ImageContainer,
                format!("expected 1 to {MAX_CHANNELS} channels, got {channels}"),
            ));
        }
        let expected = rows
            .checked_mul(cols)
            .and_then(|pixels| pixels.checked_mul(channels))
            .ok_or_else(|| StegoError::invalid(Scheme::ImageContainer, "grid too large"))?;
        if samples.len() != expected {
            return Err(StegoError::invalid(
                Scheme::ImageContainer,
                format!(
                    "{rows}x{cols}x{channels} grid needs {expected} samples, got {}",
                    samples.len()
                ),
            ));
        }
        Ok(Self {
            rows,
            cols,
            channels,
            samples,
        })
    }

    /// Creates a single-channel grid from rows of samples.
    pub fn grayscale(rows: &[Vec<u8>]) -> Result<Self, StegoError> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return Err(StegoError::invalid(
                Scheme::ImageContainer,
                "rows have different lengths",
            ));
        }
        Self::new(rows.len(), cols, 1, rows.concat())
    }

    /// Loads an image file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StegoError> {
        let image = image::open(path.as_ref()).map_err(|e| {
            StegoError::invalid(
                Scheme::ImageContainer,
                format!("{}: {e}", path.as_ref().display()),
            )
        })?;
        Ok(Self::from_image(image))
    }

    /// Decodes an image from encoded bytes (PNG, BMP, ...).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StegoError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| StegoError::invalid(Scheme::ImageContainer, e.to_string()))?;
        Ok(Self::from_image(image))
    }

    /// Converts a decoded image into a grid.
    ///
    /// 8-bit layouts are kept as-is. Deeper images are reduced to 8 bits per
    /// sample, keeping their gray/color and alpha structure.
    pub fn from_image(image: DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        let (channels, samples) = match image {
            DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
            DynamicImage::ImageLumaA8(buf) => (2, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (4, buf.into_raw()),
            other => {
                let color = other.color();
                match (color.has_color(), color.has_alpha()) {
                    (false, false) => (1, other.to_luma8().into_raw()),
                    (false, true) => (2, other.to_luma_alpha8().into_raw()),
                    (true, false) => (3, other.to_rgb8().into_raw()),
                    (true, true) => (4, other.to_rgba8().into_raw()),
                }
            }
        };
        Self {
            rows: height as usize,
            cols: width as usize,
            channels,
            samples,
        }
    }

    /// Converts the grid back into a decoded image with the same layout.
    pub fn into_image(self) -> Result<DynamicImage, StegoError> {
        let too_large = || StegoError::invalid(Scheme::ImageContainer, "grid too large for an image");
        let width = u32::try_from(self.cols).map_err(|_| too_large())?;
        let height = u32::try_from(self.rows).map_err(|_| too_large())?;
        let samples = self.samples;

        let image = match self.channels {
            1 => ImageBuffer::<Luma<u8>, _>::from_raw(width, height, samples)
                .map(DynamicImage::ImageLuma8),
            2 => ImageBuffer::<LumaA<u8>, _>::from_raw(width, height, samples)
                .map(DynamicImage::ImageLumaA8),
            3 => ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, samples)
                .map(DynamicImage::ImageRgb8),
            _ => ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, samples)
                .map(DynamicImage::ImageRgba8),
        };
        image.ok_or_else(too_large)
    }

    /// Saves the grid, choosing the container from the file extension.
    ///
    /// Only lossless containers are accepted.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StegoError> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path).map_err(|e| StegoError::WriteFailed {
            container: Scheme::ImageContainer,
            reason: e.to_string(),
        })?;
        ensure_lossless(format)?;

        self.clone()
            .into_image()?
            .save_with_format(path, format)
            .map_err(|e| StegoError::WriteFailed {
                container: Scheme::ImageContainer,
                reason: e.to_string(),
            })
    }

    /// Returns the grid encoded as PNG.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, StegoError> {
        let mut bytes = Vec::new();
        self.clone()
            .into_image()?
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| StegoError::WriteFailed {
                container: Scheme::ImageContainer,
                reason: e.to_string(),
            })?;
        Ok(bytes)
    }

    /// Returns `(rows, cols, channels)`.
    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.rows, self.cols, self.channels)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Flat offset of a sample.
    pub fn index(&self, row: usize, col: usize, channel: usize) -> usize {
        (row * self.cols + col) * self.channels + channel
    }

    pub fn sample(&self, row: usize, col: usize, channel: usize) -> u8 {
        self.samples[self.index(row, col, channel)]
    }

    /// All samples in interleaved row-major order.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.samples
    }
}

/// Rejects containers whose compression would destroy embedded bits.
pub fn ensure_lossless(format: ImageFormat) -> Result<(), StegoError> {
    match format {
        ImageFormat::Png
        | ImageFormat::Bmp
        | ImageFormat::Tiff
        | ImageFormat::Pnm
        | ImageFormat::Tga
        | ImageFormat::Qoi => Ok(()),
        other => Err(StegoError::WriteFailed {
            container: Scheme::ImageContainer,
            reason: format!("{other:?} is not a lossless container"),
        }),
    }
}

/// One bit per sample over the flattened grid, terminated by a null byte.
///
/// Samples are walked in the decoder's channel order (RGB/RGBA) with alpha
/// included, so files written by tools that flatten 3-channel BGR with alpha
/// dropped do not read back.
#[derive(Debug, Clone, Copy, Default)]
pub struct LsbImageCodec;

impl StegoCodec for LsbImageCodec {
    type Carrier = PixelGrid;

    fn scheme(&self) -> Scheme {
        Scheme::LsbImage
    }

    fn capacity_bits(&self, carrier: &PixelGrid) -> usize {
        carrier.samples().len()
    }

    fn max_message_chars(&self, carrier: &PixelGrid) -> usize {
        lsb::max_message_chars(carrier.samples().len())
    }

    fn embed(&self, carrier: &mut PixelGrid, text: &str) -> Result<(), StegoError> {
        lsb::embed(carrier.samples_mut(), text, Scheme::LsbImage)
    }

    fn extract(&self, carrier: &PixelGrid) -> String {
        lsb::extract(carrier.samples(), Scheme::LsbImage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_grid(rows: usize, cols: usize, channels: usize) -> PixelGrid {
        let samples = (0..rows * cols * channels)
            .map(|i| ((i * 37 + 11) % 256) as u8)
            .collect();
        PixelGrid::new(rows, cols, channels, samples).unwrap()
    }

    #[test]
    fn test_new_validates_shape() {
        assert!(PixelGrid::new(2, 2, 3, vec![0; 12]).is_ok());
        assert!(matches!(
            PixelGrid::new(2, 2, 3, vec![0; 11]),
            Err(StegoError::InvalidCarrier { .. })
        ));
        assert!(matches!(
            PixelGrid::new(2, 2, 5, vec![0; 20]),
            Err(StegoError::InvalidCarrier { .. })
        ));
        assert!(PixelGrid::grayscale(&[vec![1, 2], vec![3]]).is_err());
    }

    #[test]
    fn test_indexing() {
        let grid = create_test_grid(3, 4, 3);
        assert_eq!(grid.index(1, 2, 1), (4 + 2) * 3 + 1);
        assert_eq!(grid.sample(1, 2, 1), grid.samples()[19]);
    }

    #[test]
    fn test_hide_and_extract_rgb() {
        let mut grid = create_test_grid(20, 20, 3);
        let original = grid.clone();

        LsbImageCodec.embed(&mut grid, "Hello, steganography!").unwrap();
        assert_eq!(grid.dimensions(), original.dimensions());
        assert_eq!(LsbImageCodec.extract(&grid), "Hello, steganography!");

        // each sample moves by at most one
        for (a, b) in grid.samples().iter().zip(original.samples()) {
            assert!(a.abs_diff(*b) <= 1);
        }
    }

    #[test]
    fn test_hide_and_extract_grayscale() {
        let mut grid = create_test_grid(8, 8, 1);
        LsbImageCodec.embed(&mut grid, "gray").unwrap();
        assert_eq!(LsbImageCodec.extract(&grid), "gray");
    }

    #[test]
    fn test_hi_does_not_fit_in_4x4() {
        let mut grid = PixelGrid::new(4, 4, 1, vec![200; 16]).unwrap();
        let err = LsbImageCodec.embed(&mut grid, "Hi").unwrap_err();
        assert!(matches!(
            err,
            StegoError::CapacityExceeded {
                scheme: Scheme::LsbImage,
                needed: 24,
                available: 16,
            }
        ));
        assert!(grid.samples().iter().all(|&s| s == 200));
    }

    #[test]
    fn test_empty_message() {
        let mut grid = create_test_grid(4, 4, 1);
        LsbImageCodec.embed(&mut grid, "").unwrap();
        assert_eq!(LsbImageCodec.extract(&grid), "");
    }

    #[test]
    fn test_capacity() {
        let grid = create_test_grid(10, 10, 3);
        assert_eq!(LsbImageCodec.capacity_bits(&grid), 300);
        assert_eq!(LsbImageCodec.max_message_chars(&grid), 36);
    }

    #[test]
    fn test_png_roundtrip() {
        for channels in 1..=4 {
            let mut grid = create_test_grid(16, 16, channels);
            LsbImageCodec.embed(&mut grid, "Test PNG roundtrip").unwrap();

            let png = grid.to_png_bytes().unwrap();
            let loaded = PixelGrid::from_bytes(&png).unwrap();
            assert_eq!(loaded, grid);
            assert_eq!(LsbImageCodec.extract(&loaded), "Test PNG roundtrip");
        }
    }

    #[test]
    fn test_save_rejects_lossy_container() {
        let dir = tempfile::tempdir().unwrap();
        let grid = create_test_grid(4, 4, 3);
        let err = grid.save(dir.path().join("out.jpg")).unwrap_err();
        assert!(matches!(err, StegoError::WriteFailed { .. }));
        assert!(!dir.path().join("out.jpg").exists());
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let err = PixelGrid::from_bytes(b"definitely not an image").unwrap_err();
        assert!(matches!(
            err,
            StegoError::InvalidCarrier {
                scheme: Scheme::ImageContainer,
                ..
            }
        ));
    }
}
