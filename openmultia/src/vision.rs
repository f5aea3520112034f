//! Vision: ask a model about an image.
//!
//! The image is referenced either by URL, forwarded unchanged in
//! `image_url`, or by local path, read and base64-encoded into `image`.
//! Both carry a `mime_type` hint taken from the reference's extension.

use std::path::PathBuf;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::client::OpenMultia;
use crate::error::{Error, Result};
use crate::message::Message;

/// Where the image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Remote image, fetched by the server.
    Url(String),
    /// Local file, sent inline.
    Path(PathBuf),
}

impl ImageSource {
    /// Classify a reference: `http:/` and `https:/` prefixes are URLs,
    /// anything else is a local path.
    #[must_use]
    pub fn parse(reference: &str) -> Self {
        if reference.starts_with("http:/") || reference.starts_with("https:/") {
            Self::Url(reference.to_owned())
        } else {
            Self::Path(PathBuf::from(reference))
        }
    }

    /// Text after the last `.` of the reference.
    #[must_use]
    pub fn mime_hint(&self) -> String {
        let reference = match self {
            Self::Url(url) => url.clone(),
            Self::Path(path) => path.to_string_lossy().into_owned(),
        };
        reference
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_owned()
    }
}

impl From<&str> for ImageSource {
    fn from(reference: &str) -> Self {
        Self::parse(reference)
    }
}

impl From<String> for ImageSource {
    fn from(reference: String) -> Self {
        Self::parse(&reference)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

/// Vision request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionRequest {
    /// Vision model.
    pub model: String,
    /// Conversation accompanying the image.
    pub messages: Vec<Message>,
    /// Image to analyse.
    pub image: ImageSource,
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
    /// Scheduling hint for the server.
    pub priority: i32,
}

impl VisionRequest {
    /// Create a request with default settings.
    #[must_use]
    pub fn new(
        model: impl Into<String>,
        messages: Vec<Message>,
        image: impl Into<ImageSource>,
    ) -> Self {
        Self {
            model: model.into(),
            messages,
            image: image.into(),
            max_tokens: 400,
            priority: 1,
        }
    }

    /// Create a request from a single user prompt.
    #[must_use]
    pub fn prompt(
        model: impl Into<String>,
        prompt: impl Into<String>,
        image: impl Into<ImageSource>,
    ) -> Self {
        Self::new(model, vec![Message::user(prompt)], image)
    }

    /// Set the maximum number of generated tokens.
    #[must_use]
    pub const fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the request priority.
    #[must_use]
    pub const fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Build the wire body, reading local images.
    async fn body(&self) -> Result<VisionBody<'_>> {
        let image = match &self.image {
            ImageSource::Url(url) => ImagePayload::Url(url.clone()),
            ImageSource::Path(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|e| Error::io(path, e))?;
                ImagePayload::Inline(base64::engine::general_purpose::STANDARD.encode(bytes))
            }
        };

        Ok(VisionBody {
            model: &self.model,
            messages: &self.messages,
            max_tokens: self.max_tokens,
            priority: self.priority,
            image,
            mime_type: self.image.mime_hint(),
        })
    }
}

#[derive(Debug, Serialize)]
struct VisionBody<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    priority: i32,
    #[serde(flatten)]
    image: ImagePayload,
    mime_type: String,
}

#[derive(Debug, Serialize)]
enum ImagePayload {
    #[serde(rename = "image")]
    Inline(String),
    #[serde(rename = "image_url")]
    Url(String),
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    content: String,
}

/// Vision facade.
#[derive(Debug, Clone, Copy)]
pub struct Vision<'a> {
    client: &'a OpenMultia,
}

impl<'a> Vision<'a> {
    pub(crate) const fn new(client: &'a OpenMultia) -> Self {
        Self { client }
    }

    /// Ask the model about the image and return its answer.
    pub async fn generate(&self, request: &VisionRequest) -> Result<String> {
        let body = request.body().await?;
        let builder = self.client.post("/vision").json(&body);
        let response = OpenMultia::send(builder).await?;

        let parsed: ContentResponse =
            OpenMultia::decode(response, "JSON body with a `content` field").await?;
        Ok(parsed.content)
    }
}
