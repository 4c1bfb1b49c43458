//! Mono compiler wrapper.
use std::path::Path;

use log::{debug, info};

use crate::{
    args::CommandLine,
    diagnostics::{classify, CompileError},
    error::{McsError, McsResult},
    options::{CompileRequest, CompilerOptions},
    process::{self, ProcessOutput},
    source::TempSource,
};

/// Wrapper around the `mcs` executable.
pub struct MonoCompiler {
    options: CompilerOptions,
}

impl MonoCompiler {
    pub fn new(options: CompilerOptions) -> Self {
        MonoCompiler { options }
    }

    /// Configuration that was used to instantiate the compiler.
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Argument string that [`MonoCompiler::compile`] would pass to the executable.
    pub fn command_line(&self, request: &CompileRequest) -> String {
        CommandLine::new(&self.options, request).to_string()
    }

    /// Compiles the source file named in the request.
    ///
    /// Errors reported by the compiler are returned in the [`CompileResult`].
    /// An `Err` means the compiler could not be run to completion at all.
    pub fn compile(&self, request: &CompileRequest) -> McsResult<CompileResult> {
        let command_line = CommandLine::new(&self.options, request);
        let output = process::run(
            self.options.compiler_path(),
            &command_line,
            self.options.timeout(),
        )?;

        let result = CompileResult::from(output);
        info!(
            "compiled {} with {} error(s), exit code {:?}",
            request.source_path.display(),
            result.errors.len(),
            result.exit_code
        );

        Ok(result)
    }

    /// Writes `source` to a temporary file, compiles it, and removes the file again.
    pub fn compile_source(
        &self,
        source: &str,
        output_assembly: Option<&Path>,
        output_documentation: Option<&Path>,
    ) -> McsResult<CompileResult> {
        // Checked up front so a missing compiler never leaves a file behind.
        let compiler_path = self.options.compiler_path();
        if !compiler_path.is_file() {
            return Err(McsError::MissingExecutable(compiler_path.to_path_buf()));
        }

        let mut temp = TempSource::acquire(source).map_err(McsError::TempFile)?;

        let mut request = CompileRequest::new(temp.path());
        request.output_assembly_path = output_assembly.map(Path::to_path_buf);
        request.output_documentation_path = output_documentation.map(Path::to_path_buf);

        let result = self.compile(&request);

        // Release on every path; a compile failure takes precedence over a cleanup failure.
        let released = temp.release();
        let result = result?;
        released.map_err(McsError::TempFile)?;
        debug!("released {}", temp.path().display());

        Ok(result)
    }
}

/// Outcome of a compiler invocation that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileResult {
    /// Detected errors, in the order the compiler printed them.
    pub errors: Vec<CompileError>,
    /// Exit code of the compiler, when it exited normally.
    pub exit_code: Option<i32>,
    /// Everything the compiler wrote to standard output.
    pub output: Vec<String>,
}

impl CompileResult {
    /// No errors were detected in the output.
    ///
    /// The exit code is not consulted. See [`CompileResult::is_strict_success`].
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// No errors were detected, and the compiler exited with code 0.
    pub fn is_strict_success(&self) -> bool {
        self.is_success() && self.exit_code == Some(0)
    }
}

impl From<ProcessOutput> for CompileResult {
    fn from(output: ProcessOutput) -> Self {
        Self {
            errors: classify(&output.lines),
            exit_code: output.exit_code,
            output: output.lines,
        }
    }
}
