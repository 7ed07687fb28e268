//! Generation domain.
//!
//! - [`decoder::NdjsonDecoder`]: incremental decoding of streamed records
//! - [`result::GenerationResult`]: accumulated text plus optional failure

pub mod decoder;
pub mod result;
