//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust,ignore
//! use openmultia::prelude::*;
//! ```

pub use crate::audio::{SpeechRequest, SpeechResponse, TranscriptionRequest};
pub use crate::chat::{
    ChatOutput, CompletionChoice, CompletionRequest, CompletionResponse, Created, Stop,
};
pub use crate::client::OpenMultia;
pub use crate::config::MultiaConfig;
pub use crate::error::{Error, Result};
pub use crate::images::{ImageRequest, ImageResponse};
pub use crate::message::{Message, Role};
pub use crate::vision::{ImageSource, VisionRequest};
