use serde_json::Value;

use super::{Resource, ResourceKind};
use crate::{
    api::join_segments,
    errors::{ClientError, ResourceError},
    file::File,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct AnalysisKind;

impl ResourceKind for AnalysisKind {
    const SERVICE: &'static str = "fileinfo";
    const RESOURCES: &'static str = "analyses";

    type Status = ();

    fn update_status(_status: &mut Self::Status, _json: &Value) {}

    fn failure(error: String) -> ResourceError {
        ResourceError::Analysis(error)
    }
}

/// Analysis running on the `fileinfo` service.
pub type Analysis = Resource<AnalysisKind>;

impl Resource<AnalysisKind> {
    /// The analysis report, downloaded once and cached.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the output cannot be downloaded.
    pub fn output_file(&mut self) -> Result<&File, ClientError> {
        let url = join_segments(&self.base_url, &["output"])?;
        self.output_file_at(&url)
    }

    /// Content of [`Analysis::output_file`].
    ///
    /// # Errors
    ///
    /// Returns `Err` when the output cannot be downloaded.
    pub fn output(&mut self) -> Result<String, ClientError> {
        self.output_file()?.content_as_string()
    }
}
