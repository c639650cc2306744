//! Error types for the catalog client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the author/user does not exist" from "the service returned an unexpected
//! status." All other non-2xx responses land in `HttpError` with the raw
//! status code and body for debugging. Bodies that arrive with a success
//! status but do not match the endpoint's envelope are decode errors.

use thiserror::Error;

/// Errors returned by `GoodreadsClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, TLS, read).
    /// `url` omits the query string, which carries the API key.
    #[error("transport error requesting {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The service returned 404.
    #[error("resource not found")]
    NotFound,

    /// The service returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be decoded into the endpoint's envelope.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The envelope decoded but the singular entity node was absent.
    #[error("response is missing the <{0}> element")]
    MissingElement(&'static str),

    #[error("unknown search field: {0:?}")]
    InvalidSearchField(String),

    #[error("at least one ISBN is required")]
    EmptyIsbnList,
}

impl ApiError {
    /// True for failures caused by a response body the client could not map.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            ApiError::DeserializationError(_) | ApiError::MissingElement(_)
        )
    }
}

impl From<quick_xml::de::DeError> for ApiError {
    fn from(err: quick_xml::de::DeError) -> Self {
        ApiError::DeserializationError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::DeserializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_family() {
        assert!(ApiError::MissingElement("author").is_decode());
        assert!(ApiError::DeserializationError("bad".into()).is_decode());
        assert!(!ApiError::NotFound.is_decode());
        assert!(!ApiError::HttpError { status: 500, body: String::new() }.is_decode());
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            ApiError::HttpError { status: 401, body: "Invalid API key".into() }.to_string(),
            "HTTP 401: Invalid API key"
        );
        assert_eq!(
            ApiError::MissingElement("user").to_string(),
            "response is missing the <user> element"
        );
    }

    #[test]
    fn json_errors_convert_to_deserialization() {
        let err: ApiError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
