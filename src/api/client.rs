use std::sync::Arc;

use reqwest::{
    blocking::{self, multipart, Client},
    header::{CONTENT_DISPOSITION, USER_AGENT},
};
use url::Url;

use super::connection::{Connection, ConnectionManager, RequestArguments, RequestFiles, Response};
use crate::{errors::ClientError, settings::Settings};

/// Parses the API URL from `settings`.
///
/// # Errors
///
/// Fails if the URL is malformed or cannot be a base. We rely on that
/// invariant when appending path segments.
pub fn parse_api_url(settings: &Settings) -> Result<Url, ClientError> {
    let url = Url::parse(settings.api_url())?;
    if url.cannot_be_a_base() {
        Err(ClientError::CannotBeBase(url))
    } else {
        Ok(url)
    }
}

/// Appends `segments` to the path of `base`.
///
/// # Errors
///
/// Returns `Err` if `base` cannot be a base.
pub fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, ClientError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ClientError::CannotBeBase(base.clone()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Connection to the API over HTTPS.
///
/// Requests are authenticated with HTTP Basic auth where the user name is the
/// API key and the password is empty.
#[derive(Clone)]
pub struct RealConnection {
    api_url: Url,
    settings: Settings,
    client: Client,
}

impl RealConnection {
    /// # Errors
    ///
    /// Fails if the API URL in `settings` is not usable or the HTTP client
    /// cannot be initialized.
    pub fn new(settings: &Settings) -> Result<Self, ClientError> {
        Self::with_client(settings, blocking::Client::builder().build()?)
    }

    /// Like [`RealConnection::new`], sending requests through `client`.
    ///
    /// # Errors
    ///
    /// Fails if the API URL in `settings` is not usable.
    pub fn with_client(settings: &Settings, client: Client) -> Result<Self, ClientError> {
        Ok(Self {
            api_url: parse_api_url(settings)?,
            settings: settings.clone(),
            client,
        })
    }

    fn request(&self, method: reqwest::Method, url: &Url) -> blocking::RequestBuilder {
        self.client
            .request(method, url.clone())
            .basic_auth(self.settings.api_key(), Some(""))
            .header(USER_AGENT, self.settings.user_agent())
    }

    /// Builds a GET request with `args` in the query string.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the request cannot be built.
    pub fn build_get_request(
        &self,
        url: &Url,
        args: &RequestArguments,
    ) -> Result<blocking::Request, ClientError> {
        let mut builder = self.request(reqwest::Method::GET, url);
        if !args.is_empty() {
            builder = builder.query(args);
        }
        Ok(builder.build()?)
    }

    /// Builds a multipart POST request carrying `args` and `files`.
    ///
    /// # Errors
    ///
    /// Returns `Err` when a file cannot be read or the request cannot be built.
    pub fn build_post_request(
        &self,
        url: &Url,
        args: &RequestArguments,
        files: &RequestFiles,
    ) -> Result<blocking::Request, ClientError> {
        let form = Self::multipart_form(args, files)?;
        Ok(self
            .request(reqwest::Method::POST, url)
            .multipart(form)
            .build()?)
    }

    fn multipart_form(
        args: &RequestArguments,
        files: &RequestFiles,
    ) -> Result<multipart::Form, ClientError> {
        let mut form = multipart::Form::new();
        for (name, value) in args {
            form = form.text(name.clone(), value.clone());
        }
        for (name, file) in files {
            let part = multipart::Part::bytes(file.content()?).file_name(file.name().to_owned());
            form = form.part(name.clone(), part);
        }
        Ok(form)
    }

    fn receive(response: blocking::Response) -> Result<Response, ClientError> {
        let status = response.status();
        let content_disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes()?;

        let mut received = Response::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            body.to_vec(),
        );
        if let Some(value) = content_disposition {
            received = received.with_content_disposition(value);
        }
        Ok(received)
    }
}

impl Connection for RealConnection {
    fn api_url(&self) -> &Url {
        &self.api_url
    }

    fn send_get_request_with_args(
        &self,
        url: &Url,
        args: &RequestArguments,
    ) -> Result<Response, ClientError> {
        log::debug!("GET {url} {args:?}");
        let request = self.build_get_request(url, args)?;
        let response = self.client.execute(request)?;
        Self::receive(response)
    }

    fn send_post_request(
        &self,
        url: &Url,
        args: &RequestArguments,
        files: &RequestFiles,
    ) -> Result<Response, ClientError> {
        log::debug!(
            "POST {url} {args:?} files: {:?}",
            files.keys().collect::<Vec<_>>()
        );
        let request = self.build_post_request(url, args, files)?;
        let response = self.client.execute(request)?;
        Self::receive(response)
    }
}

/// Hands out [`RealConnection`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct RealConnectionManager;

impl ConnectionManager for RealConnectionManager {
    fn new_connection(&self, settings: &Settings) -> Result<Arc<dyn Connection>, ClientError> {
        Ok(Arc::new(RealConnection::new(settings)?))
    }
}
