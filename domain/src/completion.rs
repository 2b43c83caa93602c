use crate::{error::Error, gateway::openai::OpenAiClient};
use log::*;
use service::config::Config;

/// Generate text for `prompt` with the upstream completion API.
///
/// A missing API key surfaces here, when a request needs it, rather than at startup.
pub async fn generate_text(config: &Config, prompt: &str) -> Result<String, Error> {
    let client = OpenAiClient::new(config)?;

    let text = client.complete(prompt).await?;
    info!("Generated {} byte(s) of text for prompt", text.len());

    Ok(text)
}
