//! Artifact decoding, file naming, saving, and photo loading.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;

use crate::error::GatewayError;
use crate::params::OutputFormat;

/// Generate an output filename from a label and format.
///
/// Sanitizes the first 50 characters of the label to kebab-case,
/// appends a unix timestamp, and adds the appropriate file extension.
#[must_use]
pub fn auto_filename(label: &str, format: OutputFormat) -> String {
    let sanitized = sanitize_for_filename(label, 50);
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    format!("{sanitized}-{timestamp}.{}", format.extension())
}

/// Sanitize a string for use in a filename.
///
/// Converts to lowercase, replaces non-alphanumeric chars with hyphens,
/// collapses consecutive hyphens, and trims to max length.
#[must_use]
pub fn sanitize_for_filename(input: &str, max_len: usize) -> String {
    let mut result = String::with_capacity(max_len);
    let mut last_was_hyphen = true; // Prevents leading hyphen

    for ch in input.chars().take(max_len * 2) {
        if result.len() >= max_len {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            result.push('-');
            last_was_hyphen = true;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    if result.is_empty() {
        "preview".to_string()
    } else {
        result
    }
}

/// Resolve the output path: use explicit path or auto-generate.
#[must_use]
pub fn resolve_output_path(explicit: Option<&str>, label: &str, format: OutputFormat) -> PathBuf {
    match explicit {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(auto_filename(label, format)),
    }
}

/// Decode the bytes of a `data:<mime>;base64,<payload>` URI.
///
/// # Errors
///
/// Returns [`GatewayError::Decode`] if the URI is not base64 data.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, GatewayError> {
    let payload = uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(_, payload)| payload)
        .ok_or_else(|| GatewayError::Decode("not a base64 data URI".into()))?;
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| GatewayError::Decode(format!("Failed to decode base64: {e}")))
}

/// Save a data-URI artifact, converting when the actual image format differs.
///
/// The URI's declared MIME type is not trusted; the format is sniffed from
/// the bytes.
///
/// # Errors
///
/// Returns an error if decoding, conversion, or writing fails.
pub fn save_artifact(uri: &str, format: OutputFormat, output_path: &Path) -> Result<(), GatewayError> {
    let data = decode_data_uri(uri)?;
    let detected = image::guess_format(&data)
        .map_err(|e| GatewayError::ImageConversion(format!("Unrecognized image data: {e}")))?;

    if format.accepts(detected) {
        std::fs::write(output_path, data).map_err(GatewayError::Io)
    } else {
        convert_and_save(&data, format, output_path)
    }
}

fn convert_and_save(data: &[u8], format: OutputFormat, output_path: &Path) -> Result<(), GatewayError> {
    let img = image::load_from_memory(data)
        .map_err(|e| GatewayError::ImageConversion(format!("Failed to decode image: {e}")))?;

    // JPEG has no alpha channel.
    let img = if format == OutputFormat::Jpeg {
        image::DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };

    img.save_with_format(output_path, format.image_format())
        .map_err(|e| GatewayError::ImageConversion(format!("Failed to save as {format}: {e}")))
}

/// Read a photo from disk as the base64 payload the vision calls expect.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not an image.
pub fn read_photo_base64(path: &Path) -> Result<String, GatewayError> {
    let data = std::fs::read(path)?;
    image::guess_format(&data).map_err(|_| {
        GatewayError::InvalidArgument(format!("{} is not a supported image", path.display()))
    })?;
    Ok(base64::engine::general_purpose::STANDARD.encode(data))
}
