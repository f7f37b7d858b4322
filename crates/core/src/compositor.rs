//! Branding-overlay image compositor.
//!
//! Scales the generated image to cover the configured output surface
//! (cropping overflow, never letterboxing), stretches the branding
//! overlay across the full surface, and encodes the result as JPEG.
//!
//! The compositor is fail-open: the booth must keep producing output
//! even when branding breaks, so any decode, fetch, or draw error
//! returns the base image bytes unmodified instead of propagating.

use std::io::Write;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{imageops, DynamicImage, GenericImageView, RgbaImage};

use crate::links;

/// JPEG quality of the final encoded composite.
const JPEG_QUALITY: u8 = 92;

/// Errors internal to a composition attempt. Never escape [`Compositor::compose`].
#[derive(Debug, thiserror::Error)]
enum ComposeError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Overlay fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Overlay temp file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raster compositor for final booth output.
pub struct Compositor {
    http: reqwest::Client,
}

impl Compositor {
    /// Create a compositor reusing the process-wide HTTP client
    /// (overlay references may need to be fetched).
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Composite `base` with the configured overlay onto an exactly
    /// `width` x `height` surface and encode as JPEG.
    ///
    /// Never fails: any internal error logs a warning and returns
    /// `base` unmodified.
    pub async fn compose(
        &self,
        base: &[u8],
        overlay_ref: Option<&str>,
        width: u32,
        height: u32,
    ) -> Vec<u8> {
        match self.try_compose(base, overlay_ref, width, height).await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(error = %err, "Composition failed, passing base image through");
                base.to_vec()
            }
        }
    }

    async fn try_compose(
        &self,
        base: &[u8],
        overlay_ref: Option<&str>,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, ComposeError> {
        let base_img = image::load_from_memory(base)?;

        let mut canvas = RgbaImage::new(width, height);
        draw_cover(&mut canvas, &base_img, width, height);

        if let Some(reference) = overlay_ref.map(str::trim).filter(|r| !r.is_empty()) {
            let overlay = self.load_overlay(reference).await?;
            let stretched = overlay.resize_exact(width, height, FilterType::Lanczos3);
            imageops::overlay(&mut canvas, &stretched.to_rgba8(), 0, 0);
        }

        encode_jpeg(canvas)
    }

    /// Resolve and decode the overlay reference.
    ///
    /// Drive share links are rewritten to their directly fetchable form
    /// first. Fetched bytes are decoded in memory; if that fails, fall
    /// back to a transient temp file (released on drop either way).
    async fn load_overlay(&self, reference: &str) -> Result<DynamicImage, ComposeError> {
        let resolved = links::direct_link(reference);

        if let Some(bytes) = decode_data_uri(&resolved) {
            return Ok(image::load_from_memory(&bytes)?);
        }

        let response = self.http.get(&resolved).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        match image::load_from_memory(&bytes) {
            Ok(img) => Ok(img),
            Err(err) => {
                tracing::warn!(error = %err, "Direct overlay decode failed, retrying from disk");
                load_via_temp_file(&bytes)
            }
        }
    }
}

/// Scale `base` to cover the full surface, centered, cropping overflow.
fn draw_cover(canvas: &mut RgbaImage, base: &DynamicImage, width: u32, height: u32) {
    let (bw, bh) = base.dimensions();
    if bw == 0 || bh == 0 {
        return;
    }

    let scale = f64::max(f64::from(width) / f64::from(bw), f64::from(height) / f64::from(bh));
    let sw = (f64::from(bw) * scale).round().max(1.0) as u32;
    let sh = (f64::from(bh) * scale).round().max(1.0) as u32;

    let resized = base.resize_exact(sw, sh, FilterType::Triangle).to_rgba8();
    let x = (i64::from(width) - i64::from(sw)) / 2;
    let y = (i64::from(height) - i64::from(sh)) / 2;
    imageops::overlay(canvas, &resized, x, y);
}

/// Decode via a transient file on disk.
///
/// The temp file is removed when it drops, on the success and the
/// failure path alike.
fn load_via_temp_file(bytes: &[u8]) -> Result<DynamicImage, ComposeError> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(bytes)?;
    file.flush()?;

    let img = image::ImageReader::open(file.path())?
        .with_guessed_format()?
        .decode()?;
    Ok(img)
}

fn encode_jpeg(canvas: RgbaImage) -> Result<Vec<u8>, ComposeError> {
    let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    encoder.encode_image(&rgb)?;
    Ok(out)
}

/// Extract the raw bytes of a base64 `data:` URI.
///
/// Returns `None` for anything that is not a well-formed base64 data-URI.
pub fn decode_data_uri(input: &str) -> Option<Vec<u8>> {
    if !input.starts_with("data:") {
        return None;
    }
    let (_, payload) = input.split_once("base64,")?;
    BASE64.decode(payload.trim()).ok()
}
