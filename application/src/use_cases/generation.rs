//! Streamed generation use case.
//!
//! Drives one completion from the model server: decodes the byte stream
//! into records, accumulates the response text and reports the running
//! total after every fragment.

use crate::ports::generation::GenerationPort;
use futures::StreamExt;
use ragchat_domain::util::preview;
use ragchat_domain::{GenerationResult, NdjsonDecoder, StreamRecord};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct GenerationClient {
    transport: Arc<dyn GenerationPort>,
}

impl GenerationClient {
    pub fn new(transport: Arc<dyn GenerationPort>) -> Self {
        Self { transport }
    }

    /// Generate a completion for `prompt`.
    ///
    /// `on_progress` receives the accumulated text (not the delta) each time
    /// a non-empty fragment arrives. The result always carries the text
    /// accumulated so far, including when the stream fails midway.
    pub async fn generate<F>(&self, prompt: &str, mut on_progress: F) -> GenerationResult
    where
        F: FnMut(&str) + Send,
    {
        info!("Generating response for prompt: {}", preview(prompt, 100));

        let mut stream = match self.transport.open_stream(prompt).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Failed to start generation: {}", e);
                return GenerationResult::failure("", e.to_string());
            }
        };

        let mut decoder = NdjsonDecoder::new();
        let mut text = String::new();

        while let Some(delivery) = stream.next().await {
            let bytes = match delivery {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Generation stream failed after {} bytes: {}", text.len(), e);
                    return GenerationResult::failure(text, e.to_string());
                }
            };
            for record in decoder.push(&bytes) {
                if let Err(error) = apply(record, &mut text, &mut on_progress) {
                    return GenerationResult::failure(text, error);
                }
            }
        }

        if let Some(record) = decoder.finish()
            && let Err(error) = apply(record, &mut text, &mut on_progress)
        {
            return GenerationResult::failure(text, error);
        }

        debug!("Generation completed ({} bytes)", text.len());
        GenerationResult::success(text)
    }
}

fn apply<F>(record: StreamRecord, text: &mut String, on_progress: &mut F) -> Result<(), String>
where
    F: FnMut(&str),
{
    match record {
        StreamRecord::Text(fragment) => {
            text.push_str(&fragment);
            on_progress(text.as_str());
            Ok(())
        }
        StreamRecord::Error(error) => {
            warn!("Model server reported an error: {}", error);
            Err(error)
        }
    }
}
