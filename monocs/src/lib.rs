//! Wrapper around the Mono C# compiler (`mcs`).
mod args;
mod compiler;
pub mod constants;
mod diagnostics;
mod error;
mod options;
mod process;
mod source;

pub use self::{
    args::{quote, translate, CommandLine},
    diagnostics::{classify, is_error},
    process::{run, ProcessOutput},
};

pub mod prelude {
    pub use super::{
        compiler::{CompileResult, MonoCompiler},
        diagnostics::CompileError,
        error::{McsError, McsResult},
        options::{CompileRequest, CompilerOptions, LangVersion, Millis, Platform, Target},
        source::TempSource,
    };
}

pub use self::prelude::*;
