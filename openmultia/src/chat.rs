//! Chat completions.
//!
//! # Example
//!
//! ```rust,ignore
//! use openmultia::prelude::*;
//!
//! let client = OpenMultia::with_base_url("http://127.0.0.1:5000")?;
//! let request = CompletionRequest::new(
//!     "Llama2-7b",
//!     vec![
//!         Message::system("You are a question answering assistant."),
//!         Message::user("Tell me a number from 1 to 100"),
//!     ],
//! )
//! .max_tokens(400)
//! .temperature(0.3);
//!
//! let output = client.chat().completions().create(&request).await?;
//! if let Some(completion) = output.into_completion() {
//!     println!("{}", completion.choices[0].message.content);
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::OpenMultia;
use crate::error::Result;
use crate::message::Message;

/// Stop sequence(s) that end generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stop {
    /// A single stop sequence.
    Single(String),
    /// Several stop sequences.
    Multiple(Vec<String>),
}

impl From<&str> for Stop {
    fn from(s: &str) -> Self {
        Self::Single(s.to_owned())
    }
}

impl From<String> for Stop {
    fn from(s: String) -> Self {
        Self::Single(s)
    }
}

impl From<Vec<String>> for Stop {
    fn from(v: Vec<String>) -> Self {
        Self::Multiple(v)
    }
}

/// Chat completion request.
///
/// Generation parameters are forwarded as-is; the server validates them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// Model to run.
    #[serde(rename = "model_name")]
    pub model: String,
    /// Conversation so far, in turn order.
    pub messages: Vec<Message>,
    /// Number of CPU threads.
    pub n_threads: Option<u32>,
    /// Number of layers offloaded to the GPU.
    pub n_gpu_layers: u32,
    /// Index of the primary GPU.
    pub main_gpu: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
    /// Nucleus sampling threshold.
    pub top_p: f32,
    /// Number of highest-probability tokens considered.
    pub top_k: u32,
    /// Return the raw streaming response instead of a parsed completion.
    pub stream: bool,
    /// Penalty for tokens already present.
    pub presence_penalty: f32,
    /// Penalty proportional to token frequency.
    pub frequency_penalty: f32,
    /// Penalty for repeated sequences.
    pub repeat_penalty: f32,
    /// Stop sequence(s).
    pub stop: Option<Stop>,
    /// Scheduling hint for the server.
    pub priority: i32,
}

impl CompletionRequest {
    /// Create a request with default generation parameters.
    #[must_use]
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            n_threads: None,
            n_gpu_layers: 0,
            main_gpu: 0,
            temperature: 0.2,
            max_tokens: 512,
            top_p: 0.95,
            top_k: 40,
            stream: false,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
            repeat_penalty: 1.1,
            stop: None,
            priority: 1,
        }
    }

    /// Set the number of CPU threads.
    #[must_use]
    pub const fn n_threads(mut self, n: u32) -> Self {
        self.n_threads = Some(n);
        self
    }

    /// Set the number of GPU layers.
    #[must_use]
    pub const fn n_gpu_layers(mut self, n: u32) -> Self {
        self.n_gpu_layers = n;
        self
    }

    /// Set the primary GPU.
    #[must_use]
    pub const fn main_gpu(mut self, index: u32) -> Self {
        self.main_gpu = index;
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the maximum number of generated tokens.
    #[must_use]
    pub const fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set nucleus sampling.
    #[must_use]
    pub const fn top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    /// Set top-k sampling.
    #[must_use]
    pub const fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    /// Request a streaming response.
    #[must_use]
    pub const fn stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    /// Set the presence penalty.
    #[must_use]
    pub const fn presence_penalty(mut self, penalty: f32) -> Self {
        self.presence_penalty = penalty;
        self
    }

    /// Set the frequency penalty.
    #[must_use]
    pub const fn frequency_penalty(mut self, penalty: f32) -> Self {
        self.frequency_penalty = penalty;
        self
    }

    /// Set the repeat penalty.
    #[must_use]
    pub const fn repeat_penalty(mut self, penalty: f32) -> Self {
        self.repeat_penalty = penalty;
        self
    }

    /// Set the stop sequence(s).
    #[must_use]
    pub fn stop(mut self, stop: impl Into<Stop>) -> Self {
        self.stop = Some(stop.into());
        self
    }

    /// Set the request priority.
    #[must_use]
    pub const fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

/// Creation timestamp; servers send either seconds or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Created {
    /// Unix timestamp.
    Unix(i64),
    /// Free-form timestamp string.
    Text(String),
}

/// One candidate answer in a completion.
///
/// `message` is decoded as a typed [`Message`] rather than a free-form
/// object: its role must be `system`, `user` or `assistant` and its content
/// a string. A choice with `"content": null` or any other role fails with
/// [`Error::Decode`](crate::Error::Decode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompletionChoice {
    /// Position of this choice.
    pub index: u32,
    /// Generated message.
    pub message: Message,
    /// Why generation stopped (e.g. "stop", "length").
    pub finish_reason: String,
}

/// Parsed chat completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompletionResponse {
    /// Server-assigned identifier.
    pub id: String,
    /// Creation time.
    pub created: Created,
    /// Model that produced the completion.
    pub model: String,
    /// Object type, e.g. "chat.completion".
    pub object: String,
    /// Token accounting as reported by the server.
    pub usage: Value,
    /// Candidates in server order.
    pub choices: Vec<CompletionChoice>,
}

impl CompletionResponse {
    /// Content of the first choice, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// Result of [`Completions::create`].
#[derive(Debug)]
pub enum ChatOutput {
    /// Fully parsed completion (`stream == false`).
    Completion(CompletionResponse),
    /// Unread transport response (`stream == true`).
    Stream(reqwest::Response),
}

impl ChatOutput {
    /// The parsed completion, if the request was not streamed.
    #[must_use]
    pub fn into_completion(self) -> Option<CompletionResponse> {
        match self {
            Self::Completion(c) => Some(c),
            Self::Stream(_) => None,
        }
    }

    /// The raw response, if the request was streamed.
    #[must_use]
    pub fn into_stream(self) -> Option<reqwest::Response> {
        match self {
            Self::Stream(r) => Some(r),
            Self::Completion(_) => None,
        }
    }
}

/// Chat facade.
#[derive(Debug, Clone, Copy)]
pub struct Chat<'a> {
    client: &'a OpenMultia,
}

impl<'a> Chat<'a> {
    pub(crate) const fn new(client: &'a OpenMultia) -> Self {
        Self { client }
    }

    /// Chat completions.
    #[must_use]
    pub const fn completions(&self) -> Completions<'a> {
        Completions {
            client: self.client,
        }
    }
}

/// Chat completions endpoint.
#[derive(Debug, Clone, Copy)]
pub struct Completions<'a> {
    client: &'a OpenMultia,
}

impl Completions<'_> {
    /// Create a chat completion.
    ///
    /// Streaming requests return the response untouched; the body is left
    /// for the caller to consume.
    pub async fn create(&self, request: &CompletionRequest) -> Result<ChatOutput> {
        let builder = self.client.post("/chat/completions").json(request);
        let response = OpenMultia::send(builder).await?;

        if request.stream {
            return Ok(ChatOutput::Stream(response));
        }

        let completion = OpenMultia::decode(response, "chat completion response").await?;
        Ok(ChatOutput::Completion(completion))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use serde_json::json;

    mod completion_request {
        use super::*;

        #[test]
        fn serializes_defaults() {
            let req = CompletionRequest::new("m", vec![Message::user("hi")]);
            let json = serde_json::to_value(&req).unwrap();

            assert_eq!(json["model_name"], "m");
            assert!(json.get("model").is_none());
            assert!(json["n_threads"].is_null());
            assert_eq!(json["n_gpu_layers"], 0);
            assert_eq!(json["main_gpu"], 0);
            assert_eq!(json["max_tokens"], 512);
            assert_eq!(json["top_k"], 40);
            assert_eq!(json["stream"], false);
            assert!(json["stop"].is_null());
            assert_eq!(json["priority"], 1);
            assert!((json["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
            assert!((json["top_p"].as_f64().unwrap() - 0.95).abs() < 1e-6);
            assert!((json["repeat_penalty"].as_f64().unwrap() - 1.1).abs() < 1e-6);
        }

        #[test]
        fn preserves_message_order_and_roles() {
            let messages = vec![
                Message::system("You are a question answering assistant."),
                Message::user("Tell me a number from 1 to 100"),
                Message::assistant("Sure! The answer is... 42!"),
                Message::user("Do you remember what number you said before?"),
            ];
            let req = CompletionRequest::new("Llama2-7b", messages);
            let json = serde_json::to_value(&req).unwrap();

            assert_eq!(
                json["messages"],
                json!([
                    {"role": "system", "content": "You are a question answering assistant."},
                    {"role": "user", "content": "Tell me a number from 1 to 100"},
                    {"role": "assistant", "content": "Sure! The answer is... 42!"},
                    {"role": "user", "content": "Do you remember what number you said before?"},
                ])
            );
        }

        #[test]
        fn builder_overrides() {
            let req = CompletionRequest::new("m", vec![])
                .n_threads(4)
                .n_gpu_layers(30)
                .main_gpu(1)
                .max_tokens(400)
                .top_k(30)
                .stream(true)
                .stop("DONE")
                .priority(0);
            let json = serde_json::to_value(&req).unwrap();

            assert_eq!(json["n_threads"], 4);
            assert_eq!(json["n_gpu_layers"], 30);
            assert_eq!(json["main_gpu"], 1);
            assert_eq!(json["max_tokens"], 400);
            assert_eq!(json["top_k"], 30);
            assert_eq!(json["stream"], true);
            assert_eq!(json["stop"], "DONE");
            assert_eq!(json["priority"], 0);
        }

        #[test]
        fn stop_list_serializes_as_array() {
            let req = CompletionRequest::new("m", vec![])
                .stop(vec!["</s>".to_owned(), "User:".to_owned()]);
            let json = serde_json::to_value(&req).unwrap();
            assert_eq!(json["stop"], json!(["</s>", "User:"]));
        }
    }

    mod completion_response {
        use super::*;

        #[test]
        fn deserializes_server_body() {
            let body = json!({
                "id": "1",
                "created": "0",
                "model": "m",
                "object": "chat.completion",
                "usage": {},
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "hello"},
                    "finish_reason": "stop"
                }]
            });
            let resp: CompletionResponse = serde_json::from_value(body).unwrap();

            assert_eq!(resp.created, Created::Text("0".to_owned()));
            assert_eq!(resp.choices[0].message.content, "hello");
            assert_eq!(resp.text(), Some("hello"));
        }

        #[test]
        fn accepts_numeric_created() {
            let body = json!({
                "id": "cmpl-9",
                "created": 1_714_000_000,
                "model": "m",
                "object": "chat.completion",
                "usage": {"prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7},
                "choices": []
            });
            let resp: CompletionResponse = serde_json::from_value(body).unwrap();
            assert_eq!(resp.created, Created::Unix(1_714_000_000));
            assert_eq!(resp.usage["total_tokens"], 7);
            assert_eq!(resp.text(), None);
        }

        #[test]
        fn keeps_choice_order() {
            let body = json!({
                "id": "1", "created": 0, "model": "m", "object": "chat.completion", "usage": {},
                "choices": [
                    {"index": 1, "message": {"role": "assistant", "content": "b"}, "finish_reason": "stop"},
                    {"index": 0, "message": {"role": "assistant", "content": "a"}, "finish_reason": "length"}
                ]
            });
            let resp: CompletionResponse = serde_json::from_value(body).unwrap();
            let indices: Vec<u32> = resp.choices.iter().map(|c| c.index).collect();
            assert_eq!(indices, vec![1, 0]);
        }

        #[test]
        fn rejects_missing_field() {
            let body = json!({
                "id": "1", "created": 0, "model": "m", "object": "chat.completion",
                "choices": []
            });
            assert!(serde_json::from_value::<CompletionResponse>(body).is_err());
        }

        #[test]
        fn rejects_null_message_content() {
            let body = json!({
                "id": "1", "created": 0, "model": "m", "object": "chat.completion", "usage": {},
                "choices": [
                    {"index": 0, "message": {"role": "assistant", "content": null}, "finish_reason": "stop"}
                ]
            });
            assert!(serde_json::from_value::<CompletionResponse>(body).is_err());
        }

        #[test]
        fn rejects_unknown_field() {
            let body = json!({
                "id": "1", "created": 0, "model": "m", "object": "chat.completion", "usage": {},
                "choices": [], "system_fingerprint": "x"
            });
            assert!(serde_json::from_value::<CompletionResponse>(body).is_err());
        }
    }
}
