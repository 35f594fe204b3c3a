//! # retdec
//!
//! A Rust client for the [retdec.com](https://retdec.com) decompilation and
//! file-analysis service.
//!
//! Submitting a file creates a remote job (a [`Decompilation`] or an
//! [`Analysis`]). The job runs on the server; the client polls its status
//! until it finishes and then downloads the outputs.
//!
//! ## Features
//!
//! - **Decompilation**: binary or assembly input, C output and disassembly
//! - **File analysis**: reports on executable formats
//! - **Progress**: completion callbacks while waiting for a decompilation
//! - **Typed errors**: API, authorization and job failures are told apart
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use retdec::{DecompilationArguments, Decompiler, File, OnError, Settings};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let decompiler = Decompiler::new(Settings::new().with_api_key("YOUR-API-KEY"))?;
//!
//! let args = DecompilationArguments::new()
//!     .with_mode("bin")
//!     .with_input_file(File::from_filesystem("hello.exe"));
//! let mut decompilation = decompiler.run_decompilation(&args)?;
//!
//! decompilation.wait_until_finished_with(
//!     |d| println!("{}%", d.completion_cached()),
//!     OnError::Raise,
//! )?;
//! println!("{}", decompilation.output_hll()?);
//! # Ok(())
//! # }
//! ```

/// Transport to the API and verification of its responses
pub mod api;

/// Arguments submitted when creating a resource
pub mod arguments;

/// Error types
pub mod errors;

/// Files sent to and received from the API
pub mod file;

/// Remote jobs and their status
pub mod resource;

/// Services creating the remote jobs
pub mod services;

/// Connection settings
pub mod settings;

pub use arguments::{AnalysisArguments, Arguments, DecompilationArguments, ResourceArguments};
pub use errors::{ApiError, ClientError, ResourceError};
pub use file::File;
pub use resource::{
    Analysis, Decompilation, OnError, PollingPolicy, Resource, ResourceKind, ResourceStatus,
};
pub use services::{Decompiler, Fileinfo, Test};
pub use settings::Settings;
