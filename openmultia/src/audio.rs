//! Audio endpoints: speech synthesis, transcription and translation.
//!
//! # Example
//!
//! ```rust,ignore
//! use openmultia::prelude::*;
//!
//! let client = OpenMultia::with_base_url("http://127.0.0.1:5000")?;
//!
//! // Text-to-Speech
//! let request = SpeechRequest::new("Bark", "The quick brown fox")
//!     .voice_preset("v2/en_speaker_4");
//! client.audio().speech().create(&request).await?.save("speech.mp3")?;
//!
//! // Speech-to-Text
//! let request = TranscriptionRequest::new("large", "speech.mp3").language("en");
//! let text = client.audio().transcriptions().create(&request).await?;
//! ```

use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::client::OpenMultia;
use crate::error::{Error, Result};

/// Request for generating speech from text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeechRequest {
    /// Text to convert to speech.
    pub prompt: String,
    /// Speech synthesis model.
    #[serde(rename = "model_name")]
    pub model: String,
    /// Voice preset understood by the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_preset: Option<String>,
    /// Scheduling hint for the server.
    pub priority: i32,
}

impl SpeechRequest {
    /// Create a new speech request.
    #[must_use]
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            voice_preset: None,
            priority: 1,
        }
    }

    /// Set the voice preset.
    #[must_use]
    pub fn voice_preset(mut self, preset: impl Into<String>) -> Self {
        self.voice_preset = Some(preset.into());
        self
    }

    /// Set the request priority.
    #[must_use]
    pub const fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// Synthesized audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechResponse {
    /// Raw audio bytes as returned by the server.
    pub audio: Vec<u8>,
}

impl SpeechResponse {
    /// Create a new speech response.
    #[must_use]
    pub const fn new(audio: Vec<u8>) -> Self {
        Self { audio }
    }

    /// Write the audio to a file. The extension is not checked.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, &self.audio).map_err(|e| Error::io(path, e))
    }

    /// Alias of [`save`](Self::save).
    pub fn stream_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save(path)
    }
}

/// Request for transcribing or translating an audio file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionRequest {
    /// Speech recognition model.
    pub model: String,
    /// Local path of the audio file to upload.
    pub file: PathBuf,
    /// Language of the audio.
    pub language: Option<String>,
    /// Text that seeds the decoder.
    pub initial_prompt: Option<String>,
    /// Scheduling hint for the server.
    pub priority: i32,
}

impl TranscriptionRequest {
    /// Create a new transcription request.
    #[must_use]
    pub fn new(model: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            file: file.into(),
            language: None,
            initial_prompt: None,
            priority: 1,
        }
    }

    /// Set the language.
    #[must_use]
    pub fn language(mut self, lang: impl Into<String>) -> Self {
        self.language = Some(lang.into());
        self
    }

    /// Set the initial prompt.
    #[must_use]
    pub fn initial_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.initial_prompt = Some(prompt.into());
        self
    }

    /// Set the request priority.
    #[must_use]
    pub const fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Build the multipart form.
    ///
    /// The file is read to memory here, so no handle outlives this call.
    async fn form(&self) -> Result<Form> {
        let audio = tokio::fs::read(&self.file)
            .await
            .map_err(|e| Error::io(&self.file, e))?;

        let filename = self
            .file
            .file_name()
            .map_or_else(|| "audio".to_owned(), |n| n.to_string_lossy().into_owned());
        let mime = mime_guess::from_path(&self.file).first_or_octet_stream();

        let file_part = Part::bytes(audio)
            .file_name(filename)
            .mime_str(mime.essence_str())?;

        let mut form = Form::new().text("model_name", self.model.clone());
        if let Some(ref lang) = self.language {
            form = form.text("language", lang.clone());
        }
        if let Some(ref prompt) = self.initial_prompt {
            form = form.text("initial_prompt", prompt.clone());
        }

        Ok(form
            .text("priority", self.priority.to_string())
            .part("file", file_part))
    }
}

/// Text body returned by transcription and translation.
#[derive(Debug, Deserialize)]
struct TextResponse {
    text: String,
}

/// Audio facade.
#[derive(Debug, Clone, Copy)]
pub struct Audio<'a> {
    client: &'a OpenMultia,
}

impl<'a> Audio<'a> {
    pub(crate) const fn new(client: &'a OpenMultia) -> Self {
        Self { client }
    }

    /// Speech synthesis.
    #[must_use]
    pub const fn speech(&self) -> Speech<'a> {
        Speech {
            client: self.client,
        }
    }

    /// Audio transcription.
    #[must_use]
    pub const fn transcriptions(&self) -> Transcriptions<'a> {
        Transcriptions {
            client: self.client,
        }
    }

    /// Audio translation to English.
    #[must_use]
    pub const fn translations(&self) -> Translations<'a> {
        Translations {
            client: self.client,
        }
    }
}

/// Speech synthesis endpoint.
#[derive(Debug, Clone, Copy)]
pub struct Speech<'a> {
    client: &'a OpenMultia,
}

impl Speech<'_> {
    /// Synthesize speech from text.
    pub async fn create(&self, request: &SpeechRequest) -> Result<SpeechResponse> {
        let builder = self.client.post("/audio/speech").form(request);
        let response = OpenMultia::send(builder).await?;
        let audio = response.bytes().await?.to_vec();

        Ok(SpeechResponse::new(audio))
    }
}

/// Transcription endpoint.
#[derive(Debug, Clone, Copy)]
pub struct Transcriptions<'a> {
    client: &'a OpenMultia,
}

impl Transcriptions<'_> {
    /// Transcribe an audio file and return the text.
    pub async fn create(&self, request: &TranscriptionRequest) -> Result<String> {
        upload(self.client, "/audio/transcriptions", request).await
    }
}

/// Translation endpoint.
#[derive(Debug, Clone, Copy)]
pub struct Translations<'a> {
    client: &'a OpenMultia,
}

impl Translations<'_> {
    /// Translate an audio file to English and return the text.
    pub async fn create(&self, request: &TranscriptionRequest) -> Result<String> {
        upload(self.client, "/audio/translations", request).await
    }
}

async fn upload(client: &OpenMultia, path: &str, request: &TranscriptionRequest) -> Result<String> {
    let form = request.form().await?;
    let builder = client.post(path).multipart(form);
    let response = OpenMultia::send(builder).await?;

    let parsed: TextResponse = OpenMultia::decode(response, "JSON body with a `text` field").await?;
    Ok(parsed.text)
}
