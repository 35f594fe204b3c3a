use std::collections::BTreeMap;

use crate::file::File;

const INPUT_FILE_ID: &str = "input";
const MODE_ID: &str = "mode";
const SEL_DECOMP_RANGES_ID: &str = "sel_decomp_ranges";
const SEL_DECOMP_DECODING_ID: &str = "sel_decomp_decoding";
const VERBOSE_ID: &str = "verbose";

/// Named string arguments and named files submitted when creating a resource.
///
/// Both maps are ordered by key so the request built from them is
/// deterministic.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResourceArguments {
    arguments: BTreeMap<String, String>,
    files: BTreeMap<String, File>,
}

impl ResourceArguments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arguments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.arguments.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn files(&self) -> impl Iterator<Item = (&str, &File)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Generic access to resource arguments.
///
/// Setters come in two families: `set_*` mutates in place and returns
/// `&mut Self` for chaining, `with_*` leaves `self` alone and returns a
/// modified copy.
pub trait Arguments: Clone {
    fn resource_arguments(&self) -> &ResourceArguments;
    fn resource_arguments_mut(&mut self) -> &mut ResourceArguments;

    fn set_argument(&mut self, id: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.resource_arguments_mut()
            .arguments
            .insert(id.into(), value.into());
        self
    }

    #[must_use]
    fn with_argument(&self, id: impl Into<String>, value: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.set_argument(id, value);
        copy
    }

    fn has_argument(&self, id: &str) -> bool {
        self.resource_arguments().arguments.contains_key(id)
    }

    fn argument(&self, id: &str) -> Option<&str> {
        self.resource_arguments().arguments.get(id).map(String::as_str)
    }

    fn set_file(&mut self, id: impl Into<String>, file: File) -> &mut Self {
        self.resource_arguments_mut().files.insert(id.into(), file);
        self
    }

    #[must_use]
    fn with_file(&self, id: impl Into<String>, file: File) -> Self {
        let mut copy = self.clone();
        copy.set_file(id, file);
        copy
    }

    fn has_file(&self, id: &str) -> bool {
        self.resource_arguments().files.contains_key(id)
    }

    fn file(&self, id: &str) -> Option<&File> {
        self.resource_arguments().files.get(id)
    }
}

impl Arguments for ResourceArguments {
    fn resource_arguments(&self) -> &ResourceArguments {
        self
    }

    fn resource_arguments_mut(&mut self) -> &mut ResourceArguments {
        self
    }
}

/// Arguments of a decompilation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DecompilationArguments(ResourceArguments);

impl Arguments for DecompilationArguments {
    fn resource_arguments(&self) -> &ResourceArguments {
        &self.0
    }

    fn resource_arguments_mut(&mut self) -> &mut ResourceArguments {
        &mut self.0
    }
}

impl DecompilationArguments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the mode: `bin` decompiles an ELF/PE binary, `c` a C source file.
    pub fn set_mode(&mut self, mode: impl Into<String>) -> &mut Self {
        self.set_argument(MODE_ID, mode)
    }

    #[must_use]
    pub fn with_mode(&self, mode: impl Into<String>) -> Self {
        self.with_argument(MODE_ID, mode)
    }

    pub fn has_mode(&self) -> bool {
        self.has_argument(MODE_ID)
    }

    pub fn mode(&self) -> Option<&str> {
        self.argument(MODE_ID)
    }

    /// Sets address ranges for selective decompilation.
    ///
    /// Ranges look like `0x0-0x2eef,0x3000-0x4fff`; addresses are
    /// case-insensitive hexadecimal numbers and may be padded with spaces.
    pub fn set_sel_decomp_ranges(&mut self, ranges: impl Into<String>) -> &mut Self {
        self.set_argument(SEL_DECOMP_RANGES_ID, ranges)
    }

    #[must_use]
    pub fn with_sel_decomp_ranges(&self, ranges: impl Into<String>) -> Self {
        self.with_argument(SEL_DECOMP_RANGES_ID, ranges)
    }

    pub fn has_sel_decomp_ranges(&self) -> bool {
        self.has_argument(SEL_DECOMP_RANGES_ID)
    }

    pub fn sel_decomp_ranges(&self) -> Option<&str> {
        self.argument(SEL_DECOMP_RANGES_ID)
    }

    /// Sets the type of decoding for selective decompilation.
    pub fn set_sel_decomp_decoding(&mut self, decoding: impl Into<String>) -> &mut Self {
        self.set_argument(SEL_DECOMP_DECODING_ID, decoding)
    }

    #[must_use]
    pub fn with_sel_decomp_decoding(&self, decoding: impl Into<String>) -> Self {
        self.with_argument(SEL_DECOMP_DECODING_ID, decoding)
    }

    pub fn has_sel_decomp_decoding(&self) -> bool {
        self.has_argument(SEL_DECOMP_DECODING_ID)
    }

    pub fn sel_decomp_decoding(&self) -> Option<&str> {
        self.argument(SEL_DECOMP_DECODING_ID)
    }

    pub fn set_input_file(&mut self, file: File) -> &mut Self {
        self.set_file(INPUT_FILE_ID, file)
    }

    #[must_use]
    pub fn with_input_file(&self, file: File) -> Self {
        self.with_file(INPUT_FILE_ID, file)
    }

    pub fn has_input_file(&self) -> bool {
        self.has_file(INPUT_FILE_ID)
    }

    pub fn input_file(&self) -> Option<&File> {
        self.file(INPUT_FILE_ID)
    }
}

/// Arguments of a file analysis.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AnalysisArguments(ResourceArguments);

impl Arguments for AnalysisArguments {
    fn resource_arguments(&self) -> &ResourceArguments {
        &self.0
    }

    fn resource_arguments_mut(&mut self) -> &mut ResourceArguments {
        &mut self.0
    }
}

impl AnalysisArguments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a verbose report. Clearing the flag removes the argument.
    pub fn set_verbose(&mut self, verbose: bool) -> &mut Self {
        if verbose {
            self.set_argument(VERBOSE_ID, "1")
        } else {
            self.0.arguments.remove(VERBOSE_ID);
            self
        }
    }

    #[must_use]
    pub fn with_verbose(&self, verbose: bool) -> Self {
        let mut copy = self.clone();
        copy.set_verbose(verbose);
        copy
    }

    pub fn verbose(&self) -> bool {
        self.argument(VERBOSE_ID) == Some("1")
    }

    pub fn set_input_file(&mut self, file: File) -> &mut Self {
        self.set_file(INPUT_FILE_ID, file)
    }

    #[must_use]
    pub fn with_input_file(&self, file: File) -> Self {
        self.with_file(INPUT_FILE_ID, file)
    }

    pub fn has_input_file(&self) -> bool {
        self.has_file(INPUT_FILE_ID)
    }

    pub fn input_file(&self) -> Option<&File> {
        self.file(INPUT_FILE_ID)
    }
}
