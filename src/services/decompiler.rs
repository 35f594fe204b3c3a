use std::sync::Arc;

use super::ServiceImpl;
use crate::{
    api::ConnectionManager,
    arguments::{Arguments, DecompilationArguments},
    errors::ClientError,
    resource::{Decompilation, DecompilationKind, PollingPolicy},
    settings::Settings,
};

/// The `decompiler` service.
#[derive(Clone)]
pub struct Decompiler {
    service: ServiceImpl,
}

impl Decompiler {
    /// Decompiler talking to the API over HTTPS.
    ///
    /// # Errors
    ///
    /// Fails when the API URL in `settings` is not usable.
    pub fn new(settings: Settings) -> Result<Self, ClientError> {
        Ok(Self {
            service: ServiceImpl::with_real_connections(settings)?,
        })
    }

    /// # Errors
    ///
    /// Fails when the API URL in `settings` is not usable.
    pub fn with_connection_manager(
        settings: Settings,
        connection_manager: Arc<dyn ConnectionManager>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            service: ServiceImpl::new(settings, connection_manager)?,
        })
    }

    pub const fn settings(&self) -> &Settings {
        self.service.settings()
    }

    /// Policy handed to every decompilation this service starts.
    pub const fn polling_policy(&self) -> &PollingPolicy {
        self.service.polling_policy()
    }

    pub fn set_polling_policy(&mut self, polling: PollingPolicy) -> &mut Self {
        self.service.set_polling_policy(polling);
        self
    }

    #[must_use]
    pub fn with_polling_policy(mut self, polling: PollingPolicy) -> Self {
        self.service.set_polling_policy(polling);
        self
    }

    /// Starts a decompilation. Does not wait for it to finish.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the input cannot be read or the API rejects the
    /// request.
    pub fn run_decompilation(
        &self,
        args: &DecompilationArguments,
    ) -> Result<Decompilation, ClientError> {
        self.service
            .run_resource::<DecompilationKind>(args.resource_arguments())
    }
}
