use super::ResponseEnvelope;
use crate::error::{Error, ResponseError};
use tracing::error;

/// Name given to transport errors raised for non-success statuses.
pub const ORIGINAL_NAME: &str = "HttpError";

/// Turn a failed response into a readable [`Error::Response`].
///
/// The name becomes `"<original name> - <original message>"` and the message
/// the JSON body. If the body cannot be serialized the original message is
/// kept. The source error is carried along untouched.
pub fn translate(source: reqwest::Error, response: ResponseEnvelope) -> Error {
    let original_message = source.to_string();
    let name = format!("{} - {}", ORIGINAL_NAME, original_message);

    let message = match serde_json::to_string(&response.data) {
        Ok(body) => body,
        Err(e) => {
            error!(error = %e, "Failed to convert response body to string");
            original_message
        }
    };

    Error::Response(Box::new(ResponseError {
        name,
        message,
        response,
        source,
    }))
}
