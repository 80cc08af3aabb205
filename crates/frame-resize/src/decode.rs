//! Image decoding collaborators

use std::path::Path;

use image::RgbImage;
use tracing::debug;

use crate::FrameError;

/// Decodes an image source into an 8-bit RGB buffer.
///
/// Implementations must release any file handle before returning, on both
/// the success and the failure path.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<RgbImage, FrameError>;
}

/// Decoder backed by the `image` crate, reading from the filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageDecoder;

impl ImageDecoder for FsImageDecoder {
    fn decode(&self, path: &Path) -> Result<RgbImage, FrameError> {
        let img = image::open(path).map_err(|source| FrameError::Decode {
            path: path.display().to_string(),
            source,
        })?;
        debug!("Decoded {} ({}x{})", path.display(), img.width(), img.height());
        Ok(img.to_rgb8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_decode_error() {
        let err = FsImageDecoder
            .decode(Path::new("/nonexistent/definitely-missing.png"))
            .unwrap_err();
        assert!(matches!(err, FrameError::Decode { .. }));
    }

    #[test]
    fn test_decode_written_png() {
        let path = std::env::temp_dir().join(format!("frame-resize-{}.png", std::process::id()));
        let img = RgbImage::from_pixel(4, 3, image::Rgb([10, 20, 30]));
        img.save(&path).unwrap();

        let decoded = FsImageDecoder.decode(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.get_pixel(2, 1).0, [10, 20, 30]);
    }
}
