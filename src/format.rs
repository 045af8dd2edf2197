//! Format policies: which image encodings (and transparency) are acceptable.
//!
//! The policy inspects the format the decoder recognized, not the URL or any
//! HTTP header — a `.png` URL serving JPEG bytes counts as JPEG. Transparency
//! means at least one pixel is not fully opaque; an RGBA image whose alpha
//! channel is 255 everywhere does not qualify.

use image::{DynamicImage, ImageFormat};

/// Which encodings a downloaded image may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FormatPolicy {
    /// Accept every format the decoder recognizes.
    Any,
    /// Accept only JPEG.
    #[value(name = "jpeg")]
    JpegOnly,
    /// Accept only PNG with at least one non-opaque pixel.
    #[value(name = "transparent-png")]
    TransparentPngOnly,
    /// Accept everything except PNG.
    AnyExceptPng,
}

impl FormatPolicy {
    /// Whether a decoded image of the given declared format passes this policy.
    pub fn accepts(self, format: ImageFormat, img: &DynamicImage) -> bool {
        match self {
            FormatPolicy::Any => true,
            FormatPolicy::JpegOnly => format == ImageFormat::Jpeg,
            FormatPolicy::TransparentPngOnly => {
                format == ImageFormat::Png && has_transparency(img)
            }
            FormatPolicy::AnyExceptPng => format != ImageFormat::Png,
        }
    }

    /// File extension for a saved image that passed this policy.
    ///
    /// Policies that pin a format pin the extension; the pass-through
    /// policies use the declared format's canonical extension.
    pub fn extension(self, format: ImageFormat) -> &'static str {
        match self {
            FormatPolicy::JpegOnly => "jpg",
            FormatPolicy::TransparentPngOnly => "png",
            FormatPolicy::Any | FormatPolicy::AnyExceptPng => {
                format.extensions_str().first().copied().unwrap_or("img")
            }
        }
    }
}

/// True iff the image has an alpha channel with at least one non-opaque pixel.
pub fn has_transparency(img: &DynamicImage) -> bool {
    if !img.color().has_alpha() {
        return false;
    }
    img.to_rgba8().pixels().any(|p| p.0[3] < u8::MAX)
}
