use std::{borrow::Cow, collections::BTreeMap, sync::Arc};

use percent_encoding::percent_decode_str;
use serde_json::Value;
use url::Url;

use crate::{errors::ClientError, file::File, settings::Settings};

/// Ordered `(name, value)` pairs sent with a request.
pub type RequestArguments = Vec<(String, String)>;

/// Files sent with a request, keyed by their argument name.
pub type RequestFiles = BTreeMap<String, File>;

/// Transport used to talk to the API.
///
/// Every call is a self-contained blocking request/response, so one
/// connection can be shared by a service and all resources it creates.
pub trait Connection: Send + Sync {
    /// URL of the API this connection talks to.
    fn api_url(&self) -> &Url;

    /// # Errors
    ///
    /// Returns `Err` on transport failure.
    fn send_get_request_with_args(
        &self,
        url: &Url,
        args: &RequestArguments,
    ) -> Result<Response, ClientError>;

    /// # Errors
    ///
    /// Returns `Err` on transport failure or when a file cannot be read.
    fn send_post_request(
        &self,
        url: &Url,
        args: &RequestArguments,
        files: &RequestFiles,
    ) -> Result<Response, ClientError>;

    /// # Errors
    ///
    /// Returns `Err` on transport failure.
    fn send_get_request(&self, url: &Url) -> Result<Response, ClientError> {
        self.send_get_request_with_args(url, &RequestArguments::new())
    }
}

/// Creates connections for services.
pub trait ConnectionManager: Send + Sync {
    /// # Errors
    ///
    /// Returns `Err` when the settings do not describe a usable API.
    fn new_connection(&self, settings: &Settings) -> Result<Arc<dyn Connection>, ClientError>;
}

/// Fully received response of the API.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Response {
    status_code: u16,
    status_message: String,
    content_disposition: Option<String>,
    body: Vec<u8>,
}

impl Response {
    pub fn new(
        status_code: u16,
        status_message: impl Into<String>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            status_code,
            status_message: status_message.into(),
            content_disposition: None,
            body: body.into(),
        }
    }

    /// Sets the raw `Content-Disposition` header value.
    #[must_use]
    pub fn with_content_disposition(mut self, value: impl Into<String>) -> Self {
        self.content_disposition = Some(value.into());
        self
    }

    pub const fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Status codes other than 2xx signal a failure.
    pub const fn succeeded(&self) -> bool {
        self.status_code >= 200 && self.status_code <= 299
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// # Errors
    ///
    /// Returns `Err` when the body is not valid JSON.
    pub fn body_as_json(&self) -> Result<Value, ClientError> {
        serde_json::from_slice(&self.body).map_err(|e| {
            log::error!("Failed to parse JSON response: {e}");
            log::error!("Response text: {}", String::from_utf8_lossy(&self.body));
            ClientError::from(e)
        })
    }

    /// Body wrapped as a file named after the attachment.
    pub fn body_as_file(&self) -> File {
        File::from_content_with_name(self.body.clone(), self.attached_file_name())
    }

    /// File name from `Content-Disposition: attachment; filename=NAME`.
    ///
    /// Empty when the header is missing or carries no file name.
    pub fn attached_file_name(&self) -> String {
        self.content_disposition
            .as_deref()
            .and_then(file_name_from_content_disposition)
            .unwrap_or_default()
    }
}

/// Parameter names are matched case-insensitively. An RFC 5987
/// `filename*` wins over a plain `filename`.
fn file_name_from_content_disposition(value: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;
    for param in value.split(';') {
        let Some((name, raw)) = param.split_once('=') else {
            continue;
        };
        let name = name.trim();
        let raw = raw.trim();
        if name.eq_ignore_ascii_case("filename") {
            plain = Some(raw.trim_matches('"').to_owned());
        } else if name.eq_ignore_ascii_case("filename*") {
            extended = decode_ext_value(raw);
        }
    }
    extended.or(plain)
}

/// Decodes `charset'language'value`. Only UTF-8 is understood.
fn decode_ext_value(raw: &str) -> Option<String> {
    let mut parts = raw.trim_matches('"').splitn(3, '\'');
    let charset = parts.next()?;
    let _language = parts.next()?;
    let encoded = parts.next()?;
    if !charset.eq_ignore_ascii_case("utf-8") {
        log::debug!("Ignoring file name in unsupported charset {charset}");
        return None;
    }
    percent_decode_str(encoded)
        .decode_utf8()
        .ok()
        .map(Cow::into_owned)
}
