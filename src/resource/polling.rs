use std::time::Duration;

use backon::{BlockingRetryable, ConstantBuilder};

use super::{Resource, ResourceKind};
use crate::errors::ClientError;

/// What to do when a resource finishes unsuccessfully.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OnError {
    /// Report the failure as [`ClientError::Resource`].
    #[default]
    Raise,
    /// Return normally; the failure stays readable via `has_failed`/`error`.
    Suppress,
}

/// How often and how long to poll a pending resource.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PollingPolicy {
    interval: Duration,
    max_polls: Option<usize>,
}

impl Default for PollingPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            max_polls: None,
        }
    }
}

impl PollingPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// `None` means polling until the resource finishes.
    pub const fn max_polls(&self) -> Option<usize> {
        self.max_polls
    }

    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Gives up after `max_polls` status requests. At least one is always made.
    #[must_use]
    pub const fn with_max_polls(mut self, max_polls: usize) -> Self {
        self.max_polls = Some(max_polls);
        self
    }

    #[must_use]
    pub const fn unbounded(mut self) -> Self {
        self.max_polls = None;
        self
    }

    fn backoff(&self) -> ConstantBuilder {
        let retries = self
            .max_polls
            .map_or(usize::MAX, |polls| polls.saturating_sub(1));
        ConstantBuilder::default()
            .with_delay(self.interval)
            .with_max_times(retries)
    }
}

enum Status {
    InProgress,
    Finished(ClientError),
}

const fn is_in_progress(status: &Status) -> bool {
    match status {
        Status::InProgress => true,
        Status::Finished(_) => false,
    }
}

impl<K: ResourceKind> Resource<K> {
    /// Blocks until the resource finishes.
    ///
    /// Polls the status with the resource's [`PollingPolicy`]. Returns at once
    /// when the resource is already known to be finished.
    ///
    /// # Errors
    ///
    /// Returns `Err` when a status request fails, when the policy runs out of
    /// polls, or, with [`OnError::Raise`], when the resource failed.
    pub fn wait_until_finished(&mut self, on_error: OnError) -> Result<(), ClientError> {
        self.wait(&mut |_| {}, on_error)
    }

    /// Calls `callback` every time the progress reported by the API changes.
    pub(crate) fn wait(
        &mut self,
        callback: &mut dyn FnMut(&Self),
        on_error: OnError,
    ) -> Result<(), ClientError> {
        let policy = self.polling.clone();
        let id = self.id.clone();
        let mut polls = 0_usize;

        let poll = || -> Result<(), Status> {
            if self.has_finished_cached() {
                return Ok(());
            }
            let last_progress = K::progress(&self.kind_status);
            polls += 1;
            self.update_status().map_err(Status::Finished)?;
            if K::progress(&self.kind_status) != last_progress {
                callback(&*self);
            }
            if self.has_finished_cached() {
                Ok(())
            } else {
                Err(Status::InProgress)
            }
        };

        poll.retry(policy.backoff())
            .when(is_in_progress)
            .notify(|_, dur: Duration| {
                log::debug!("{}/{id} has not finished, polling again in {dur:?}", K::RESOURCES);
            })
            .call()
            .map_err(|err| match err {
                // Only reachable with a bounded policy.
                Status::InProgress => ClientError::StillRunning { id, polls },
                Status::Finished(e) => e,
            })?;

        if self.status.failed && on_error == OnError::Raise {
            log::error!("{}/{} failed: {}", K::RESOURCES, self.id, self.status.error);
            return Err(K::failure(self.status.error.clone()).into());
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = PollingPolicy::default();
        assert_eq!(policy.interval(), Duration::from_millis(500));
        assert_eq!(policy.max_polls(), None);
    }

    #[test]
    fn test_policy_builders() {
        let policy = PollingPolicy::new()
            .with_interval(Duration::ZERO)
            .with_max_polls(3);
        assert_eq!(policy.interval(), Duration::ZERO);
        assert_eq!(policy.max_polls(), Some(3));
        assert_eq!(policy.unbounded().max_polls(), None);
    }

    #[test]
    fn test_on_error_defaults_to_raise() {
        assert_eq!(OnError::default(), OnError::Raise);
    }
}
