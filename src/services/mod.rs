//! Entry points of the API: one type per remote service.

use std::sync::Arc;

use url::Url;

use crate::{
    api::{
        join_segments, parse_api_url, resource_id, Connection, ConnectionManager,
        RealConnectionManager, RequestArguments, RequestFiles, ResponseVerifyingConnection,
    },
    arguments::ResourceArguments,
    errors::ClientError,
    resource::{PollingPolicy, Resource, ResourceKind},
    settings::Settings,
};

pub use self::{decompiler::Decompiler, fileinfo::Fileinfo, test::Test};

mod decompiler;
mod fileinfo;

/// State shared by all services.
#[derive(Clone)]
pub(crate) struct ServiceImpl {
    settings: Settings,
    connection_manager: Arc<dyn ConnectionManager>,
    polling: PollingPolicy,
}

impl ServiceImpl {
    pub(crate) fn new(
        settings: Settings,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Result<Self, ClientError> {
        parse_api_url(&settings)?;
        Ok(Self {
            settings,
            connection_manager,
            polling: PollingPolicy::default(),
        })
    }

    pub(crate) fn with_real_connections(settings: Settings) -> Result<Self, ClientError> {
        Self::new(settings, Arc::new(RealConnectionManager))
    }

    pub(crate) const fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) const fn polling_policy(&self) -> &PollingPolicy {
        &self.polling
    }

    pub(crate) fn set_polling_policy(&mut self, polling: PollingPolicy) {
        self.polling = polling;
    }

    pub(crate) fn connection(&self) -> Result<Arc<dyn Connection>, ClientError> {
        self.connection_manager.new_connection(&self.settings)
    }

    /// URL of `segments` below the API URL of `conn`.
    pub(crate) fn url(conn: &dyn Connection, segments: &[&str]) -> Result<Url, ClientError> {
        join_segments(conn.api_url(), segments)
    }

    /// Submits `args` and wraps the created resource.
    ///
    /// The resource reuses the connection the request went through.
    pub(crate) fn run_resource<K: ResourceKind>(
        &self,
        args: &ResourceArguments,
    ) -> Result<Resource<K>, ClientError> {
        let conn = self.connection()?;
        let url = Self::url(conn.as_ref(), &[K::SERVICE, K::RESOURCES])?;

        let request_args: RequestArguments = args
            .arguments()
            .map(|(name, value)| (name.to_owned(), value.to_owned()))
            .collect();
        let files: RequestFiles = args
            .files()
            .map(|(name, file)| (name.to_owned(), file.clone()))
            .collect();

        let response = ResponseVerifyingConnection::new(Arc::clone(&conn))
            .send_post_request(&url, &request_args, &files)?;
        let id = resource_id(&response.body_as_json()?);
        log::info!("Created {}/{id}", K::RESOURCES);

        Ok(Resource::<K>::new(id, conn)?.with_polling_policy(self.polling.clone()))
    }
}
