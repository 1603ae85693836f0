//! Output file formats and preview image shape.

use std::fmt;
use std::str::FromStr;

use image::ImageFormat;

/// Aspect ratios accepted by Gemini image models.
const ASPECT_RATIOS: &[&str] = &["1:1", "2:3", "3:2", "3:4", "4:3", "4:5", "5:4", "9:16", "16:9", "21:9"];

/// Resolution classes accepted by Gemini image models.
const IMAGE_SIZES: &[&str] = &["1K", "2K", "4K"];

/// Format a saved artifact is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Written with a `.jpg` extension, alpha dropped.
    Jpeg,
    /// The format the model usually returns.
    #[default]
    Png,
    /// WebP.
    Webp,
}

impl OutputFormat {
    /// File extension used for auto-generated names.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }

    /// Encoder used when the artifact has to be converted.
    #[must_use]
    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Webp => ImageFormat::WebP,
        }
    }

    /// Whether bytes sniffed as `detected` can be written as-is.
    #[must_use]
    pub fn accepts(self, detected: ImageFormat) -> bool {
        self.image_format() == detected
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::Webp),
            _ => Err(format!("Unsupported format '{s}'. Valid: jpeg, png, webp")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Webp => "webp",
        })
    }
}

/// Check the configured preview shape before any request is built.
///
/// # Errors
///
/// Returns an error naming the first unsupported value.
pub fn check_image_shape(aspect_ratio: &str, size: &str) -> Result<(), String> {
    if !ASPECT_RATIOS.contains(&aspect_ratio) {
        return Err(format!("Unsupported aspect ratio '{aspect_ratio}'. Valid: {ASPECT_RATIOS:?}"));
    }
    if !IMAGE_SIZES.contains(&size) {
        return Err(format!("Unsupported size '{size}'. Valid: {}", IMAGE_SIZES.join(", ")));
    }
    Ok(())
}
