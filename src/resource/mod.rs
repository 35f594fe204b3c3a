//! Long-running remote jobs (analyses, decompilations) and their status.
//!
//! A [`Resource`] starts out pending and turns finished once the service says
//! so. Accessors come in two forms: plain ones (`has_finished`, ...) refresh
//! the status from the API while the resource is still pending, `*_cached`
//! ones only read the last known snapshot and never touch the network.

use std::{
    collections::{btree_map::Entry, BTreeMap},
    fmt,
    sync::Arc,
};

use serde_json::Value;
use url::Url;

use crate::{
    api::{join_segments, Connection, ResponseVerifyingConnection, StatusEnvelope},
    errors::{ClientError, ResourceError},
    file::File,
};

pub use self::{
    analysis::{Analysis, AnalysisKind},
    decompilation::{Decompilation, DecompilationKind, DecompilationStatus},
    polling::{OnError, PollingPolicy},
};

mod analysis;
mod decompilation;
mod polling;

/// What distinguishes one kind of resource from another.
pub trait ResourceKind {
    /// Name of the service owning the resources, e.g. `decompiler`.
    const SERVICE: &'static str;

    /// Plural name of the resources, e.g. `decompilations`.
    const RESOURCES: &'static str;

    /// Status fields specific to this kind.
    type Status: Clone + fmt::Debug + Default;

    /// Reads the kind-specific fields out of a status body.
    fn update_status(status: &mut Self::Status, json: &Value);

    /// Progress reported while waiting, if the kind has any.
    fn progress(_status: &Self::Status) -> Option<u8> {
        None
    }

    /// Error reported when a job of this kind fails.
    fn failure(error: String) -> ResourceError;
}

/// Last known common status of a resource.
///
/// `succeeded`, `failed` and `error` only mean something once `finished` is
/// true.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResourceStatus {
    pub finished: bool,
    pub succeeded: bool,
    pub failed: bool,
    pub error: String,
}

impl From<StatusEnvelope> for ResourceStatus {
    fn from(envelope: StatusEnvelope) -> Self {
        Self {
            finished: envelope.finished,
            succeeded: envelope.succeeded,
            failed: envelope.failed,
            error: envelope.error.unwrap_or_default(),
        }
    }
}

/// A job running on the service, addressed by its identifier.
pub struct Resource<K: ResourceKind> {
    id: String,
    conn: ResponseVerifyingConnection,
    base_url: Url,
    status_url: Url,
    outputs_url: Url,
    status: ResourceStatus,
    kind_status: K::Status,
    outputs: BTreeMap<String, File>,
    polling: PollingPolicy,
}

impl<K: ResourceKind> Resource<K> {
    /// Wraps the resource `id` living behind `conn`.
    ///
    /// Does not access the API.
    ///
    /// # Errors
    ///
    /// Fails if the API URL of `conn` cannot be a base.
    pub fn new(id: impl Into<String>, conn: Arc<dyn Connection>) -> Result<Self, ClientError> {
        let id = id.into();
        let base_url = join_segments(conn.api_url(), &[K::SERVICE, K::RESOURCES, &id])?;
        let status_url = join_segments(&base_url, &["status"])?;
        let outputs_url = join_segments(&base_url, &["outputs"])?;
        Ok(Self {
            id,
            conn: ResponseVerifyingConnection::new(conn),
            base_url,
            status_url,
            outputs_url,
            status: ResourceStatus::default(),
            kind_status: K::Status::default(),
            outputs: BTreeMap::new(),
            polling: PollingPolicy::default(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub const fn status_url(&self) -> &Url {
        &self.status_url
    }

    pub const fn outputs_url(&self) -> &Url {
        &self.outputs_url
    }

    pub const fn polling_policy(&self) -> &PollingPolicy {
        &self.polling
    }

    pub fn set_polling_policy(&mut self, polling: PollingPolicy) -> &mut Self {
        self.polling = polling;
        self
    }

    #[must_use]
    pub fn with_polling_policy(mut self, polling: PollingPolicy) -> Self {
        self.polling = polling;
        self
    }

    /// Fetches the current status from the API.
    ///
    /// Always issues one request and overwrites every cached field with what
    /// the API returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` on transport failure, an error response or a body that is
    /// not a status.
    pub fn update_status(&mut self) -> Result<(), ClientError> {
        let response = self.conn.send_get_request(&self.status_url)?;
        let json = response.body_as_json()?;
        self.status = StatusEnvelope::from_json(&json)?.into();
        K::update_status(&mut self.kind_status, &json);
        log::debug!("Status of {}/{}: {:?}", K::RESOURCES, self.id, self.status);
        Ok(())
    }

    /// Fetches the status unless the resource is already known to be finished.
    ///
    /// # Errors
    ///
    /// See [`Resource::update_status`].
    pub fn update_status_if_needed(&mut self) -> Result<(), ClientError> {
        if self.should_update_status() {
            self.update_status()?;
        }
        Ok(())
    }

    const fn should_update_status(&self) -> bool {
        !self.status.finished
    }

    /// Last known status. Does not access the API.
    pub const fn status(&self) -> &ResourceStatus {
        &self.status
    }

    /// Last known kind-specific status. Does not access the API.
    pub const fn kind_status(&self) -> &K::Status {
        &self.kind_status
    }

    /// May access the API.
    ///
    /// # Errors
    ///
    /// See [`Resource::update_status`].
    pub fn has_finished(&mut self) -> Result<bool, ClientError> {
        self.update_status_if_needed()?;
        Ok(self.status.finished)
    }

    pub const fn has_finished_cached(&self) -> bool {
        self.status.finished
    }

    /// Meaningful only once the resource has finished. May access the API.
    ///
    /// # Errors
    ///
    /// See [`Resource::update_status`].
    pub fn has_succeeded(&mut self) -> Result<bool, ClientError> {
        self.update_status_if_needed()?;
        Ok(self.status.succeeded)
    }

    pub const fn has_succeeded_cached(&self) -> bool {
        self.status.succeeded
    }

    /// Meaningful only once the resource has finished. May access the API.
    ///
    /// # Errors
    ///
    /// See [`Resource::update_status`].
    pub fn has_failed(&mut self) -> Result<bool, ClientError> {
        self.update_status_if_needed()?;
        Ok(self.status.failed)
    }

    pub const fn has_failed_cached(&self) -> bool {
        self.status.failed
    }

    /// Error message of a failed resource. May access the API.
    ///
    /// # Errors
    ///
    /// See [`Resource::update_status`].
    pub fn error(&mut self) -> Result<String, ClientError> {
        self.update_status_if_needed()?;
        Ok(self.status.error.clone())
    }

    pub fn error_cached(&self) -> &str {
        &self.status.error
    }

    /// Returns the output at `url`, downloading it on first use.
    pub(crate) fn output_file_at(&mut self, url: &Url) -> Result<&File, ClientError> {
        match self.outputs.entry(url.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let response = self.conn.send_get_request(url)?;
                let file = response.body_as_file();
                log::info!("Fetched output {} of {}/{}", file.name(), K::RESOURCES, self.id);
                Ok(entry.insert(file))
            }
        }
    }
}

impl<K: ResourceKind> fmt::Debug for Resource<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("kind", &K::RESOURCES)
            .field("id", &self.id)
            .field("status", &self.status)
            .field("kind_status", &self.kind_status)
            .field("cached_outputs", &self.outputs.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
