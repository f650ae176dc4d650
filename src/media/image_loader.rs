use std::io::Cursor;
use std::path::Path;

use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use image::{ImageFormat, ImageReader};

use crate::error::MediaError;

/// Natural `(width, height)` of the image at `path`.
///
/// Only the header is decoded, except for GIFs where the first frame is
/// decoded so the logical screen size never wins over the real frame.
pub fn read_dimensions(path: &Path) -> Result<(u32, u32), MediaError> {
    let bytes = std::fs::read(path).map_err(|source| MediaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let decode_err = |source: image::ImageError| MediaError::Decode {
        path: path.to_path_buf(),
        source,
    };

    if image::guess_format(&bytes).ok() == Some(ImageFormat::Gif) {
        let decoder = GifDecoder::new(Cursor::new(bytes)).map_err(decode_err)?;
        let mut frames = decoder.into_frames();
        return match frames.next() {
            Some(frame) => {
                let buf = frame.map_err(decode_err)?.into_buffer();
                Ok((buf.width(), buf.height()))
            }
            None => Err(MediaError::Empty {
                path: path.to_path_buf(),
            }),
        };
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|source| MediaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    reader.into_dimensions().map_err(decode_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_png_dimensions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tall.png");
        image::RgbImage::new(30, 80).save(&path).unwrap();

        assert_eq!(read_dimensions(&path).unwrap(), (30, 80));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_dimensions(&dir.path().join("gone.jpg")).unwrap_err();
        assert!(matches!(err, MediaError::Io { .. }));
    }

    #[test]
    fn test_garbage_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let err = read_dimensions(&path).unwrap_err();
        assert!(matches!(err, MediaError::Decode { .. }));
    }
}
