use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;

use super::{OnError, Resource, ResourceKind};
use crate::{
    api::join_segments,
    errors::{ClientError, ResourceError},
    file::File,
};

#[derive(Clone, Copy, Debug, Default)]
pub struct DecompilationKind;

/// Decompilation-specific status.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DecompilationStatus {
    /// Percentage between 0 and 100.
    pub completion: u8,
}

impl ResourceKind for DecompilationKind {
    const SERVICE: &'static str = "decompiler";
    const RESOURCES: &'static str = "decompilations";

    type Status = DecompilationStatus;

    fn update_status(status: &mut Self::Status, json: &Value) {
        status.completion = json.get("completion").map_or(0, completion_percent);
    }

    fn progress(status: &Self::Status) -> Option<u8> {
        Some(status.completion)
    }

    fn failure(error: String) -> ResourceError {
        ResourceError::Decompilation(error)
    }
}

/// Reads a completion value, truncating fractions and clamping to 0..=100.
///
/// Anything that is not a number counts as 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn completion_percent(value: &Value) -> u8 {
    if let Some(completion) = value.as_u64() {
        return u8::try_from(completion.min(100)).unwrap_or(100);
    }
    value
        .as_f64()
        .map_or(0, |completion| completion.clamp(0.0, 100.0) as u8)
}

/// Decompilation running on the `decompiler` service.
pub type Decompilation = Resource<DecompilationKind>;

impl Resource<DecompilationKind> {
    /// Completion in percent. May access the API.
    ///
    /// # Errors
    ///
    /// See [`Resource::update_status`].
    pub fn completion(&mut self) -> Result<u8, ClientError> {
        self.update_status_if_needed()?;
        Ok(self.kind_status.completion)
    }

    pub const fn completion_cached(&self) -> u8 {
        self.kind_status.completion
    }

    /// Like [`Resource::wait_until_finished`], calling `callback` whenever the
    /// completion changes.
    ///
    /// # Errors
    ///
    /// See [`Resource::wait_until_finished`].
    pub fn wait_until_finished_with(
        &mut self,
        mut callback: impl FnMut(&Self),
        on_error: OnError,
    ) -> Result<(), ClientError> {
        self.wait(&mut callback, on_error)
    }

    /// The decompiled program in the high-level language.
    ///
    /// Downloaded once; later calls return the cached file.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the output cannot be downloaded.
    pub fn output_hll_file(&mut self) -> Result<&File, ClientError> {
        let url = join_segments(&self.outputs_url, &["hll"])?;
        self.output_file_at(&url)
    }

    /// Content of [`Decompilation::output_hll_file`].
    ///
    /// # Errors
    ///
    /// Returns `Err` when the output cannot be downloaded.
    pub fn output_hll(&mut self) -> Result<String, ClientError> {
        self.output_hll_file()?.content_as_string()
    }

    /// The disassembled input.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the output cannot be downloaded.
    pub fn output_dsm_file(&mut self) -> Result<&File, ClientError> {
        let url = join_segments(&self.outputs_url, &["dsm"])?;
        self.output_file_at(&url)
    }

    /// # Errors
    ///
    /// Returns `Err` when the output cannot be downloaded.
    pub fn output_dsm(&mut self) -> Result<String, ClientError> {
        self.output_dsm_file()?.content_as_string()
    }

    /// Stores the high-level output in `directory` under its attachment name.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the output cannot be downloaded or written.
    pub fn save_output_hll_to(
        &mut self,
        directory: impl AsRef<Utf8Path>,
    ) -> Result<Utf8PathBuf, ClientError> {
        self.output_hll_file()?.save_copy_to(directory)
    }
}
