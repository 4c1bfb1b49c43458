//! Translation of compiler options into an mcs command line.
use std::{
    ffi::OsString,
    fmt::{self, Display, Formatter},
    path::Path,
};

use crate::{
    constants::*,
    options::{CompileRequest, CompilerOptions},
};

/// Builds the argument string for a single compiler invocation.
///
/// The output only depends on the inputs, so identical options
/// and requests always produce an identical command line.
pub fn translate(options: &CompilerOptions, request: &CompileRequest) -> String {
    CommandLine::new(options, request).to_string()
}

/// Arguments of a compiler invocation, kept both as the quoted
/// command line string and as the individual argv entries.
///
/// Paths go into argv untouched, so characters that are legal in a
/// file name never have to survive a round trip through quoting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    text: String,
    argv: Vec<OsString>,
}

impl CommandLine {
    pub fn new(options: &CompilerOptions, request: &CompileRequest) -> Self {
        let args = arguments(options, request);

        let text = args.iter().map(Arg::quoted).collect::<Vec<_>>().join(" ");
        let argv = args.iter().map(Arg::raw).collect();

        Self { text, argv }
    }

    /// Space joined command line, with every path in double quotes.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// One entry per argument, paths unquoted.
    pub fn argv(&self) -> &[OsString] {
        &self.argv
    }
}

impl Display for CommandLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

enum Arg<'a> {
    Flag(String),
    /// Path, with the flag it is attached to.
    Path(&'static str, &'a Path),
}

impl<'a> Arg<'a> {
    fn quoted(&self) -> String {
        match self {
            Self::Flag(flag) => flag.clone(),
            Self::Path(prefix, path) => format!("{prefix}{}", quote(path)),
        }
    }

    fn raw(&self) -> OsString {
        match self {
            Self::Flag(flag) => flag.into(),
            Self::Path(prefix, path) => {
                let mut arg = OsString::from(prefix);
                arg.push(path.as_os_str());
                arg
            }
        }
    }
}

fn arguments<'a>(options: &'a CompilerOptions, request: &'a CompileRequest) -> Vec<Arg<'a>> {
    let mut args = Vec::with_capacity(12);

    args.push(Arg::Path("", &request.source_path));
    args.push(Arg::Flag(format!("{FLAG_PLATFORM}{}", options.platform)));
    args.push(Arg::Flag(format!("{FLAG_TARGET}{}", options.target)));
    args.push(Arg::Flag(format!("{FLAG_SDK}{}", options.sdk_version)));
    args.push(Arg::Flag(format!("{FLAG_RUNTIME}{}", options.sdk_version)));
    args.push(Arg::Flag(switch(FLAG_UNSAFE, options.allow_unsafe)));
    args.push(Arg::Flag(switch(FLAG_OPTIMIZE, options.optimize)));
    args.push(Arg::Flag(format!("{FLAG_LANGVERSION}{}", options.language_version)));
    // Referencing the base library means *not* passing -nostdlib.
    args.push(Arg::Flag(switch(FLAG_NOSTDLIB, !options.reference_base_library)));

    if let Some(path) = non_empty(request.output_assembly_path.as_deref()) {
        args.push(Arg::Path(FLAG_OUT, path));
    }

    if let Some(path) = non_empty(options.icon_path.as_deref()) {
        args.push(Arg::Path(FLAG_WIN32ICON, path));
    }

    if let Some(path) = non_empty(request.output_documentation_path.as_deref()) {
        args.push(Arg::Path(FLAG_DOC, path));
    }

    args
}

/// Wraps a path in double quotes, whether it contains whitespace or not.
pub fn quote(path: impl AsRef<Path>) -> String {
    format!("\"{}\"", path.as_ref().display())
}

fn switch(flag: &str, enabled: bool) -> String {
    format!("{flag}{}", if enabled { '+' } else { '-' })
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|path| !path.as_os_str().is_empty())
}

#[cfg(test)]
mod test {
    use std::ffi::OsStr;

    use super::*;
    use crate::options::{LangVersion, Platform, Target};

    #[test]
    fn test_translate_defaults() {
        let options = CompilerOptions::new("mcs");
        let request = CompileRequest::new("Program.cs");

        assert_eq!(
            translate(&options, &request),
            "\"Program.cs\" -platform:anycpu -target:exe -sdk:4.5 --runtime:v4.5 \
             -unsafe- -optimize- -langversion:Default -nostdlib-"
        );
    }

    #[test]
    fn test_translate_all_paths() {
        let options = CompilerOptions::mcs_preset("mcs")
            .with_platform(Platform::X64)
            .with_target(Target::Library)
            .with_icon("app icon.ico");
        let request = CompileRequest::new("/tmp/my source.cs")
            .with_output("out dir/lib.dll")
            .with_documentation("lib.xml");

        assert_eq!(
            translate(&options, &request),
            "\"/tmp/my source.cs\" -platform:x64 -target:library -sdk:2 --runtime:v2 \
             -unsafe+ -optimize+ -langversion:Experimental -nostdlib- \
             -out:\"out dir/lib.dll\" -win32icon:\"app icon.ico\" -doc:\"lib.xml\""
        );
    }

    #[test]
    fn test_nostdlib_is_inverted() {
        let request = CompileRequest::new("a.cs");

        let referenced = CompilerOptions::new("mcs").with_reference_base_library(true);
        assert!(translate(&referenced, &request).contains(" -nostdlib-"));

        let unreferenced = CompilerOptions::new("mcs").with_reference_base_library(false);
        assert!(translate(&unreferenced, &request).contains(" -nostdlib+"));
    }

    #[test]
    fn test_empty_paths_are_skipped() {
        let mut options = CompilerOptions::new("mcs");
        options.icon_path = Some("".into());
        let request = CompileRequest::new("a.cs")
            .with_output("")
            .with_documentation("");

        let args = translate(&options, &request);
        assert!(!args.contains("-out:"));
        assert!(!args.contains("-win32icon:"));
        assert!(!args.contains("-doc:"));
    }

    #[test]
    fn test_sdk_formatting() {
        let request = CompileRequest::new("a.cs");
        let options = CompilerOptions::new("mcs").with_sdk_version(4.0);
        let args = translate(&options, &request);
        assert!(args.contains(" -sdk:4 "));
        assert!(args.contains(" --runtime:v4 "));
    }

    #[test]
    fn test_langversion_flag() {
        let request = CompileRequest::new("a.cs");
        let options = CompilerOptions::new("mcs").with_language_version(LangVersion::Iso2);
        assert!(translate(&options, &request).contains(" -langversion:ISO-2 "));
    }

    #[test]
    fn test_translate_deterministic() {
        let options = CompilerOptions::mcs_preset("mcs").with_icon("a.ico");
        let request = CompileRequest::new("a.cs").with_output("a.exe");
        assert_eq!(translate(&options, &request), translate(&options, &request));
    }

    #[test]
    fn test_argv_keeps_paths_verbatim() {
        let options = CompilerOptions::new("mcs").with_icon("my \"icon\".ico");
        let request = CompileRequest::new(r"dir\\name.cs").with_output(r"out\");

        let command_line = CommandLine::new(&options, &request);
        let argv = command_line.argv();

        assert_eq!(argv.len(), 11);
        assert_eq!(argv[0].as_os_str(), OsStr::new(r"dir\\name.cs"));
        assert_eq!(argv[8].as_os_str(), OsStr::new("-nostdlib-"));
        assert_eq!(argv[9].as_os_str(), OsStr::new(r"-out:out\"));
        assert_eq!(argv[10].as_os_str(), OsStr::new("-win32icon:my \"icon\".ico"));
        assert!(command_line.as_str().starts_with(r#""dir\\name.cs" -platform:"#));
        assert_eq!(command_line.to_string(), translate(&options, &request));
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("a.cs"), "\"a.cs\"");
        assert_eq!(quote("my file.cs"), "\"my file.cs\"");
    }
}
