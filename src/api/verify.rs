use std::sync::Arc;

use serde_json::Value;
use url::Url;

use super::connection::{Connection, RequestArguments, RequestFiles, Response};
use crate::errors::{ApiError, ClientError};

/// Turns a non-2xx `response` into an error.
///
/// The error is built from the `code`, `message` and `description` fields of
/// a JSON body. Missing fields, or a body that is not JSON at all, fall back
/// to the HTTP status line. Code 401 maps to [`ClientError::Auth`].
///
/// # Errors
///
/// Returns `Err` when the response does not signal success.
pub fn verify_request_succeeded(response: &Response) -> Result<(), ClientError> {
    if response.succeeded() {
        return Ok(());
    }

    let error = match serde_json::from_slice::<Value>(response.body()) {
        Ok(json) => ApiError::new(
            json.get("code")
                .and_then(Value::as_u64)
                .and_then(|code| u16::try_from(code).ok())
                .unwrap_or(response.status_code()),
            json.get("message")
                .and_then(Value::as_str)
                .unwrap_or(response.status_message()),
            json.get("description")
                .and_then(Value::as_str)
                .unwrap_or_default(),
        ),
        Err(_) => ApiError::new(response.status_code(), response.status_message(), ""),
    };
    log::debug!("API request failed: {error}");
    Err(ClientError::from_api_error(error))
}

/// Connection that verifies every response it returns.
///
/// Wraps another connection; failed responses never reach the caller and
/// are reported as [`ClientError::Api`] or [`ClientError::Auth`] instead.
#[derive(Clone)]
pub struct ResponseVerifyingConnection {
    conn: Arc<dyn Connection>,
}

impl ResponseVerifyingConnection {
    pub fn new(conn: Arc<dyn Connection>) -> Self {
        Self { conn }
    }
}

impl Connection for ResponseVerifyingConnection {
    fn api_url(&self) -> &Url {
        self.conn.api_url()
    }

    fn send_get_request_with_args(
        &self,
        url: &Url,
        args: &RequestArguments,
    ) -> Result<Response, ClientError> {
        let response = self.conn.send_get_request_with_args(url, args)?;
        verify_request_succeeded(&response)?;
        Ok(response)
    }

    fn send_post_request(
        &self,
        url: &Url,
        args: &RequestArguments,
        files: &RequestFiles,
    ) -> Result<Response, ClientError> {
        let response = self.conn.send_post_request(url, args, files)?;
        verify_request_succeeded(&response)?;
        Ok(response)
    }
}
