//! Entrypoint for CLI
mod error;

use std::{env, error::Error, fs, path::Path, process};

use log::{error, info};
use monocs::prelude::*;

use self::error::AppError;

static USAGE: &str = r#"
usage: monocs CMD [FILE] [OUTPUT]

commands:
    demo    Compile the built-in hello world program
    build   Compile the target C# source file
    args    Print the compiler command line without running it

environment:
    MONOCS_CONFIG   YAML file with compiler options
    MCS             Path to the mcs executable, when no options file is given

examples:
    monocs demo
    monocs build Program.cs Program.exe
    MCS=/usr/bin/mcs monocs args Program.cs
"#;

const HELLO_WORLD: &str = include_str!("hello_world.cs");

/// Compiler path used when neither an options file nor `MCS` is given.
const DEFAULT_COMPILER: &str = "mcs.exe";

fn load_options() -> Result<CompilerOptions, AppError> {
    match env::var_os("MONOCS_CONFIG") {
        Some(filepath) => {
            info!("loading options from {}", Path::new(&filepath).display());
            let file = fs::File::open(&filepath)?;
            Ok(serde_yaml::from_reader(file)?)
        }
        None => {
            let compiler_path = env::var_os("MCS").unwrap_or_else(|| DEFAULT_COMPILER.into());
            Ok(CompilerOptions::mcs_preset(compiler_path))
        }
    }
}

/// Prints every detected error, and reports whether there were none.
fn report(result: &CompileResult) -> bool {
    for error in &result.errors {
        println!("{}", error.message);
    }

    info!(
        "{} error(s), exit code {}",
        result.errors.len(),
        result
            .exit_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    result.is_success()
}

fn run_demo() -> Result<bool, AppError> {
    info!("compiling built-in hello world");

    let compiler = MonoCompiler::new(load_options()?);
    let result = compiler.compile_source(HELLO_WORLD, Some(Path::new("hello_world.exe")), None)?;

    Ok(report(&result))
}

fn run_build(filepath: String, output: Option<String>) -> Result<bool, AppError> {
    let compiler = MonoCompiler::new(load_options()?);
    let result = compiler.compile(&request(filepath, output))?;

    Ok(report(&result))
}

fn print_args(filepath: String, output: Option<String>) -> Result<bool, AppError> {
    let compiler = MonoCompiler::new(load_options()?);
    let arguments = compiler.command_line(&request(filepath, output));

    println!("{} {arguments}", compiler.options().compiler_path().display());

    Ok(true)
}

fn request(filepath: String, output: Option<String>) -> CompileRequest {
    let request = CompileRequest::new(filepath);
    match output {
        Some(output) => request.with_output(output),
        None => request,
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()?;

    let outcome = match parse_args() {
        Some(Cmd::Demo) => run_demo(),
        Some(Cmd::Build { filepath, output }) => run_build(filepath, output),
        Some(Cmd::Args { filepath, output }) => print_args(filepath, output),
        None => {
            print_usage();
            // FreeBSD EX_USAGE (64)
            process::exit(64)
        }
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            error!("{err}");
            return Err(err.into());
        }
    }

    Ok(())
}

fn parse_args() -> Option<Cmd> {
    let mut args = env::args().skip(1);
    match args.next() {
        Some(cmd) => {
            // don't format me T.T
            match cmd.as_str() {
                "demo" => Some(Cmd::Demo),
                "build" => Some(Cmd::Build {
                    filepath: args.next()?,
                    output: args.next(),
                }),
                "args" => Some(Cmd::Args {
                    filepath: args.next()?,
                    output: args.next(),
                }),
                _ => None,
            }
        }
        None => None,
    }
}

fn print_usage() {
    println!("monocs v{}", env!("CARGO_PKG_VERSION"));
    println!("{USAGE}");
}

enum Cmd {
    /// Compile the embedded sample
    Demo,
    /// Compile a file
    Build {
        filepath: String,
        output: Option<String>,
    },
    /// Dry run
    Args {
        filepath: String,
        output: Option<String>,
    },
}
