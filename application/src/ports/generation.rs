//! Generation port
//!
//! Opens a streamed completion against the model server. The adapter only
//! moves bytes; decoding records and accumulating text happens in
//! [`GenerationClient`](crate::use_cases::generation::GenerationClient).

use super::service_error::ServiceError;
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Raw transport deliveries of a streamed response.
///
/// Deliveries carry no framing guarantee: a record or a multi-byte character
/// may be split across two of them.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>, ServiceError>>;

#[async_trait]
pub trait GenerationPort: Send + Sync {
    /// Start generating a completion for `prompt`.
    ///
    /// Fails if the request cannot be sent or the server rejects it before
    /// any body is streamed.
    async fn open_stream(&self, prompt: &str) -> Result<ByteStream, ServiceError>;
}
