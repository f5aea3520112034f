//! Multi-turn chat completion against a local `MultIA` server.
//!
//! ```bash
//! export MULTIA_BASE_URL=http://127.0.0.1:5000
//! RUST_LOG=openmultia=debug cargo run --example chat
//! ```

#![allow(clippy::print_stdout)]

use openmultia::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = OpenMultia::from_env()?;

    let messages = vec![
        Message::system("You are a question answering assistant."),
        Message::user("Tell me a number from 1 to 100"),
        Message::assistant("Sure! The answer is... 42!"),
        Message::user("Do you remember what number you said before?"),
    ];
    let request = CompletionRequest::new("Llama2-7b", messages)
        .max_tokens(400)
        .n_gpu_layers(30)
        .n_threads(4)
        .temperature(0.3)
        .top_p(0.92)
        .top_k(30)
        .presence_penalty(0.1)
        .frequency_penalty(0.1)
        .repeat_penalty(1.2)
        .stop("DONE")
        .priority(0);

    let output = client.chat().completions().create(&request).await?;
    if let Some(completion) = output.into_completion() {
        for choice in &completion.choices {
            println!("[{}] {}", choice.index, choice.message.content);
        }
    }

    println!("\nAvailable models: {}", client.models().list().await?);

    Ok(())
}
