//! `OpenMultia` - a Rust client for the `MultIA` inference server.
//!
//! The client mirrors the shape of the common chat-completions SDKs: one
//! root [`OpenMultia`] value composing the chat, audio, images, vision and
//! models facades. Each facade method sends one HTTP request and decodes one
//! response.
//!
//! ```rust,ignore
//! use openmultia::prelude::*;
//!
//! let client = OpenMultia::with_base_url("http://127.0.0.1:5000")?;
//! let request = CompletionRequest::new("Llama2-7b", vec![Message::user("Hi!")]);
//! let output = client.chat().completions().create(&request).await?;
//! ```

pub mod audio;
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod images;
pub mod message;
pub mod models;
pub mod prelude;
pub mod vision;

pub use client::OpenMultia;
pub use config::MultiaConfig;
pub use error::{Error, Result};
