#![allow(clippy::unwrap_used, dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use retdec::{
    api::{Connection, ConnectionManager, RequestArguments, RequestFiles, Response},
    ClientError, PollingPolicy, Settings,
};
use serde_json::Value;
use url::Url;

pub const API_URL: &str = "https://retdec.com/service/api";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub args: RequestArguments,
    /// `(argument id, file name)` pairs.
    pub files: Vec<(String, String)>,
}

/// Connection replaying queued responses and recording every request.
pub struct MockConnection {
    api_url: Url,
    responses: Mutex<VecDeque<Response>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockConnection {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            api_url: Url::parse(API_URL).unwrap(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn respond(&self, response: Response) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn respond_json(&self, json: Value) -> &Self {
        self.respond(Response::new(200, "OK", json.to_string()))
    }

    pub fn respond_error(&self, code: u16, message: &str, description: &str) -> &Self {
        let body = serde_json::json!({
            "code": code,
            "message": message,
            "description": description,
        });
        self.respond(Response::new(code, message, body.to_string()))
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }

    fn record(
        &self,
        method: &'static str,
        url: &Url,
        args: &RequestArguments,
        files: &RequestFiles,
    ) -> Result<Response, ClientError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            url: url.to_string(),
            args: args.clone(),
            files: files
                .iter()
                .map(|(id, file)| (id.clone(), file.name().to_owned()))
                .collect(),
        });
        let response = self.responses.lock().unwrap().pop_front();
        Ok(response.unwrap_or_else(|| panic!("No response queued for {method} {url}")))
    }
}

impl Connection for MockConnection {
    fn api_url(&self) -> &Url {
        &self.api_url
    }

    fn send_get_request_with_args(
        &self,
        url: &Url,
        args: &RequestArguments,
    ) -> Result<Response, ClientError> {
        self.record("GET", url, args, &RequestFiles::new())
    }

    fn send_post_request(
        &self,
        url: &Url,
        args: &RequestArguments,
        files: &RequestFiles,
    ) -> Result<Response, ClientError> {
        self.record("POST", url, args, files)
    }
}

/// Hands out the same [`MockConnection`] every time.
pub struct MockConnectionManager {
    conn: Arc<MockConnection>,
    settings: Mutex<Vec<Settings>>,
}

impl MockConnectionManager {
    pub fn new(conn: &Arc<MockConnection>) -> Arc<Self> {
        Arc::new(Self {
            conn: Arc::clone(conn),
            settings: Mutex::new(Vec::new()),
        })
    }

    /// Settings passed to every `new_connection` call so far.
    pub fn settings_seen(&self) -> Vec<Settings> {
        self.settings.lock().unwrap().clone()
    }
}

impl ConnectionManager for MockConnectionManager {
    fn new_connection(&self, settings: &Settings) -> Result<Arc<dyn Connection>, ClientError> {
        self.settings.lock().unwrap().push(settings.clone());
        Ok(Arc::clone(&self.conn) as Arc<dyn Connection>)
    }
}

/// Polls without sleeping.
pub fn instant_polling() -> PollingPolicy {
    PollingPolicy::new().with_interval(Duration::ZERO)
}

pub fn status(finished: bool) -> Value {
    serde_json::json!({
        "finished": finished,
        "succeeded": finished,
        "failed": false,
        "error": null,
    })
}
