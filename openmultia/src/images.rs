//! Image generation.
//!
//! A single image is returned as JPEG; several images come back bundled in a
//! ZIP archive. [`ImageResponse::save`] checks the destination extension
//! against that before writing anything.

use std::path::Path;

use serde::Serialize;

use crate::client::OpenMultia;
use crate::error::{Error, Result};

/// Extension required when saving a single image.
pub const IMAGE_EXTENSION: &str = "jpg";
/// Extension required when saving several images.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Image generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRequest {
    /// Text describing the image.
    pub prompt: String,
    /// Diffusion model.
    pub model: String,
    /// Number of images.
    pub n: u32,
    /// Number of diffusion steps.
    pub number_steps: u32,
    /// Scheduling hint for the server.
    pub priority: i32,
}

impl ImageRequest {
    /// Create a request for one image with default settings.
    #[must_use]
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            n: 1,
            number_steps: 4,
            priority: 1,
        }
    }

    /// Set the number of images.
    #[must_use]
    pub const fn n(mut self, n: u32) -> Self {
        self.n = n;
        self
    }

    /// Set the number of diffusion steps.
    #[must_use]
    pub const fn number_steps(mut self, steps: u32) -> Self {
        self.number_steps = steps;
        self
    }

    /// Set the request priority.
    #[must_use]
    pub const fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// Generated image data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResponse {
    /// Raw bytes: a JPEG, or a ZIP archive when `n > 1`.
    pub data: Vec<u8>,
    /// Number of images requested.
    pub n: u32,
}

impl ImageResponse {
    /// Create a new image response.
    #[must_use]
    pub const fn new(data: Vec<u8>, n: u32) -> Self {
        Self { data, n }
    }

    /// Whether the payload is an archive of several images.
    #[must_use]
    pub const fn is_archive(&self) -> bool {
        self.n > 1
    }

    /// Extension the output path must carry.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        if self.is_archive() {
            ARCHIVE_EXTENSION
        } else {
            IMAGE_EXTENSION
        }
    }

    /// Write the payload to `path`.
    ///
    /// Fails with [`Error::InvalidOutputPath`] without touching the file
    /// system when the extension does not match the payload.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.check_path(path)?;
        std::fs::write(path, &self.data).map_err(|e| Error::io(path, e))
    }

    /// Alias of [`save`](Self::save).
    pub fn stream_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save(path)
    }

    fn check_path(&self, path: &Path) -> Result<()> {
        let expected = self.extension();
        let matches = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(expected));
        if matches {
            return Ok(());
        }

        let message = if self.is_archive() {
            format!(
                "{} images are bundled as a zip archive, use a .{expected} file name",
                self.n
            )
        } else {
            format!("output is a jpg image, use a .{expected} file name")
        };
        Err(Error::invalid_output_path(path, message))
    }
}

/// Images facade.
#[derive(Debug, Clone, Copy)]
pub struct Images<'a> {
    client: &'a OpenMultia,
}

impl<'a> Images<'a> {
    pub(crate) const fn new(client: &'a OpenMultia) -> Self {
        Self { client }
    }

    /// Generate images from a prompt.
    pub async fn generate(&self, request: &ImageRequest) -> Result<ImageResponse> {
        let builder = self.client.post("/images/generations").json(request);
        let response = OpenMultia::send(builder).await?;
        let data = response.bytes().await?.to_vec();

        tracing::debug!(n = request.n, bytes = data.len(), "images generated");
        Ok(ImageResponse::new(data, request.n))
    }
}
