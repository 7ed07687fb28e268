//! Shared HTTP plumbing for the service adapters.

use ragchat_application::ServiceError;
use reqwest::Response;
use serde::de::DeserializeOwned;

/// Join a base URL and an absolute path without doubling the slash.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

pub(crate) fn transport_error(error: reqwest::Error) -> ServiceError {
    ServiceError::Transport(error.to_string())
}

/// Pass through a success response; turn anything else into
/// [`ServiceError::Status`] carrying the response body.
pub(crate) async fn ensure_success(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ServiceError::status(status.as_u16(), body))
}

/// Check the status, then decode the JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    ensure_success(response)
        .await?
        .json::<T>()
        .await
        .map_err(|e| ServiceError::InvalidResponse(e.to_string()))
}
