//! Image generation, speech synthesis, transcription and vision.
//!
//! ```bash
//! export MULTIA_BASE_URL=http://127.0.0.1:5000
//! cargo run --example media
//! ```

#![allow(clippy::print_stdout)]

use openmultia::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let client = OpenMultia::from_env()?;

    let request = ImageRequest::new("sdxl-turbo", "a lighthouse on a cliff at dusk").number_steps(4);
    client.images().generate(&request).await?.save("lighthouse.jpg")?;
    println!("Image saved to lighthouse.jpg");

    let request = ImageRequest::new("sdxl-turbo", "a lighthouse on a cliff at dusk").n(3);
    client.images().generate(&request).await?.save("lighthouses.zip")?;
    println!("Images saved to lighthouses.zip");

    let request = SpeechRequest::new("Bark", "The quick brown fox jumps over the lazy dog")
        .voice_preset("v2/en_speaker_6");
    client.audio().speech().create(&request).await?.save("speech.mp3")?;
    println!("Speech saved to speech.mp3");

    let request = TranscriptionRequest::new("large", "speech.mp3").initial_prompt("fox");
    let text = client.audio().transcriptions().create(&request).await?;
    println!("Transcription: {text}");

    let request = VisionRequest::prompt("Llava_4bit", "describe the image", "lighthouse.jpg");
    let caption = client.vision().generate(&request).await?;
    println!("Caption: {caption}");

    Ok(())
}
