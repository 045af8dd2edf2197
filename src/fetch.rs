//! Download, validate, and persist a single candidate image.
//!
//! One call is one attempt against one URL. Every failure mode is a value —
//! the caller decides whether to move on to the next candidate. Nothing is
//! written to disk unless the image passes both the quality and format
//! checks, and a file that fails the post-save integrity re-check is removed
//! before the function returns, so a failed attempt never leaves an artifact.

use crate::format::FormatPolicy;
use crate::quality::QualityTier;
use crate::transport::{Transport, TransportError};
use image::ImageReader;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Result of one fetch attempt. Only [`Saved`](DownloadOutcome::Saved)
/// produces a file.
#[derive(Debug)]
pub enum DownloadOutcome {
    /// Image passed all checks and survived the integrity re-check.
    Saved(PathBuf),
    /// Decoded fine but below the requested quality tier.
    RejectedQuality { width: u32, height: u32 },
    /// Decoded fine but the format policy refused it.
    RejectedFormat,
    /// Saved file failed the re-decode; it has been deleted.
    RejectedCorrupt,
    /// Server answered with a non-200 status.
    RejectedHttp(u16),
    /// Transport failure, undecodable body, or write failure.
    Failed(String),
}

impl DownloadOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, DownloadOutcome::Saved(_))
    }
}

/// Fetch `url` and, if it passes `tier` and `policy`, save it as
/// `dest_dir/base_name.<ext>` re-encoded in its declared format.
///
/// No retries happen here; retry-by-candidate-substitution is the caller's
/// loop.
pub fn fetch(
    transport: &impl Transport,
    url: &str,
    dest_dir: &Path,
    base_name: &str,
    policy: FormatPolicy,
    tier: QualityTier,
) -> DownloadOutcome {
    let bytes = match transport.get(url) {
        Ok(bytes) => bytes,
        Err(TransportError::Status(status)) => return DownloadOutcome::RejectedHttp(status),
        Err(TransportError::Failed(msg)) => return DownloadOutcome::Failed(msg),
    };

    let reader = match ImageReader::new(Cursor::new(&bytes)).with_guessed_format() {
        Ok(reader) => reader,
        Err(e) => return DownloadOutcome::Failed(e.to_string()),
    };
    let Some(format) = reader.format() else {
        return DownloadOutcome::Failed("unrecognized image format".to_string());
    };
    let img = match reader.decode() {
        Ok(img) => img,
        Err(e) => return DownloadOutcome::Failed(e.to_string()),
    };

    if !tier.accepts(img.width(), img.height()) {
        return DownloadOutcome::RejectedQuality {
            width: img.width(),
            height: img.height(),
        };
    }
    if !policy.accepts(format, &img) {
        return DownloadOutcome::RejectedFormat;
    }

    let path = dest_dir.join(format!("{}.{}", base_name, policy.extension(format)));
    if let Err(e) = img.save_with_format(&path, format) {
        return DownloadOutcome::Failed(e.to_string());
    }

    if verify_or_remove(&path) {
        DownloadOutcome::Saved(path)
    } else {
        DownloadOutcome::RejectedCorrupt
    }
}

/// Re-open and fully decode a just-written file; delete it if that fails.
///
/// Returns whether the file is intact (and therefore still on disk).
fn verify_or_remove(path: &Path) -> bool {
    match image::open(path) {
        Ok(_) => true,
        Err(_) => {
            std::fs::remove_file(path).ok();
            false
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::transport::tests::MockTransport;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([120, 80, 40]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
            .unwrap();
        buf
    }

    pub fn png_bytes(width: u32, height: u32, alpha: u8) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([120, 80, 40, alpha]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn fetch_one(bytes: Vec<u8>, policy: FormatPolicy, tier: QualityTier) -> (TempDir, DownloadOutcome) {
        let tmp = TempDir::new().unwrap();
        let mock = MockTransport::with_responses(vec![Ok(bytes)]);
        let outcome = fetch(&mock, "http://img", tmp.path(), "pic", policy, tier);
        (tmp, outcome)
    }

    #[test]
    fn saves_jpeg_with_jpg_extension() {
        let (tmp, outcome) = fetch_one(jpeg_bytes(8, 8), FormatPolicy::JpegOnly, QualityTier::Any);
        match outcome {
            DownloadOutcome::Saved(path) => {
                assert_eq!(path, tmp.path().join("pic.jpg"));
                assert!(path.exists());
            }
            other => panic!("expected Saved, got {:?}", other),
        }
    }

    #[test]
    fn saves_any_format_with_declared_extension() {
        let (tmp, outcome) = fetch_one(png_bytes(8, 8, 255), FormatPolicy::Any, QualityTier::Any);
        assert!(outcome.is_saved());
        assert!(tmp.path().join("pic.png").exists());
    }

    #[test]
    fn quality_rejection_writes_nothing() {
        let (tmp, outcome) = fetch_one(jpeg_bytes(8, 8), FormatPolicy::Any, QualityTier::Medium);
        assert!(matches!(
            outcome,
            DownloadOutcome::RejectedQuality { width: 8, height: 8 }
        ));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn format_rejection_writes_nothing() {
        let (tmp, outcome) = fetch_one(png_bytes(8, 8, 255), FormatPolicy::JpegOnly, QualityTier::Any);
        assert!(matches!(outcome, DownloadOutcome::RejectedFormat));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn opaque_png_fails_transparency_policy() {
        let (_tmp, outcome) = fetch_one(
            png_bytes(8, 8, 255),
            FormatPolicy::TransparentPngOnly,
            QualityTier::Any,
        );
        assert!(matches!(outcome, DownloadOutcome::RejectedFormat));
    }

    #[test]
    fn transparent_png_passes_transparency_policy() {
        let (tmp, outcome) = fetch_one(
            png_bytes(8, 8, 128),
            FormatPolicy::TransparentPngOnly,
            QualityTier::Any,
        );
        assert!(outcome.is_saved());
        assert!(tmp.path().join("pic.png").exists());
    }

    #[test]
    fn non_200_status_becomes_rejected_http() {
        let tmp = TempDir::new().unwrap();
        let mock = MockTransport::with_responses(vec![Err(TransportError::Status(404))]);
        let outcome = fetch(
            &mock,
            "http://img",
            tmp.path(),
            "pic",
            FormatPolicy::Any,
            QualityTier::Any,
        );
        assert!(matches!(outcome, DownloadOutcome::RejectedHttp(404)));
    }

    #[test]
    fn transport_failure_becomes_failed() {
        let tmp = TempDir::new().unwrap();
        let mock = MockTransport::with_responses(vec![Err(TransportError::Failed(
            "connection reset".into(),
        ))]);
        let outcome = fetch(
            &mock,
            "http://img",
            tmp.path(),
            "pic",
            FormatPolicy::Any,
            QualityTier::Any,
        );
        assert!(matches!(outcome, DownloadOutcome::Failed(_)));
    }

    #[test]
    fn non_image_body_becomes_failed_and_writes_nothing() {
        let (tmp, outcome) = fetch_one(
            b"<html>not an image</html>".to_vec(),
            FormatPolicy::Any,
            QualityTier::Any,
        );
        assert!(matches!(outcome, DownloadOutcome::Failed(_)));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn corrupt_file_is_removed_by_verification() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.jpg");
        std::fs::write(&path, b"\xff\xd8truncated garbage").unwrap();

        assert!(!verify_or_remove(&path));
        assert!(!path.exists());
    }

    #[test]
    fn intact_file_survives_verification() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ok.png");
        std::fs::write(&path, png_bytes(4, 4, 255)).unwrap();

        assert!(verify_or_remove(&path));
        assert!(path.exists());
    }
}
