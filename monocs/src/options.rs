//! Compiler configuration.
use std::{
    fmt::{self, Display, Formatter},
    path::{Path, PathBuf},
    time::Duration,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Target platform of the output assembly.
///
/// The default is `anycpu`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(rename_all = "lowercase")
)]
pub enum Platform {
    #[default]
    AnyCpu,
    AnyCpu32BitPreferred,
    Arm,
    X86,
    X64,
    Itanium,
}

impl Platform {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::AnyCpu => "anycpu",
            Self::AnyCpu32BitPreferred => "anycpu32bitpreferred",
            Self::Arm => "arm",
            Self::X86 => "x86",
            Self::X64 => "x64",
            Self::Itanium => "itanium",
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// Format of the output assembly.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(rename_all = "lowercase")
)]
pub enum Target {
    #[default]
    Exe,
    WinExe,
    Library,
    Module,
}

impl Target {
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Exe => "exe",
            Self::WinExe => "winexe",
            Self::Library => "library",
            Self::Module => "module",
        }
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// C# language version accepted by `-langversion`.
///
/// ISO-1, ISO-2, 3, 4, 5, Default or Experimental
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LangVersion {
    #[default]
    Default,
    Iso1,
    Iso2,
    V3,
    V4,
    V5,
    Experimental,
}

impl LangVersion {
    /// Token passed to the compiler.
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Iso1 => "ISO-1",
            Self::Iso2 => "ISO-2",
            Self::V3 => "3",
            Self::V4 => "4",
            Self::V5 => "5",
            Self::Experimental => "Experimental",
        }
    }

    /// Parses a command line token. Anything unrecognised is `Default`.
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            "ISO-1" | "ISO_1" => Self::Iso1,
            "ISO-2" | "ISO_2" => Self::Iso2,
            "3" => Self::V3,
            "4" => Self::V4,
            "5" => Self::V5,
            "Experimental" => Self::Experimental,
            _ => Self::Default,
        }
    }
}

impl Display for LangVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for LangVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Numeric versions are commonly written unquoted in YAML.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(token) => Self::from_token(&token),
            Raw::Number(number) => Self::from_token(&number.to_string()),
        })
    }
}

#[cfg(feature = "serde")]
impl Serialize for LangVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_token())
    }
}

/// Time limit, in milliseconds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(transparent)
)]
pub struct Millis(pub u64);

impl From<Millis> for Duration {
    fn from(millis: Millis) -> Self {
        Duration::from_millis(millis.0)
    }
}

/// Compiler configuration parameters.
///
/// Owned by the caller and only ever borrowed by the compiler,
/// so one value can drive any number of compiles.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct CompilerOptions {
    /// Path to the mcs compiler executable.
    pub compiler_path: PathBuf,
    #[cfg_attr(feature = "serde", serde(default))]
    pub platform: Platform,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: Target,
    #[cfg_attr(feature = "serde", serde(default))]
    pub language_version: LangVersion,
    /// SDK version (2, 4, 4.5), also used as the runtime version.
    #[cfg_attr(feature = "serde", serde(default = "default_sdk_version"))]
    pub sdk_version: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub allow_unsafe: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub optimize: bool,
    /// Whether to reference mscorlib.
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub reference_base_library: bool,
    /// Win32 icon embedded in the output.
    #[cfg_attr(feature = "serde", serde(default))]
    pub icon_path: Option<PathBuf>,
    /// Kill the compiler if it runs longer than this.
    #[cfg_attr(feature = "serde", serde(default))]
    pub timeout: Option<Millis>,
}

#[cfg(feature = "serde")]
fn default_sdk_version() -> f64 {
    DEFAULT_SDK_VERSION
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

impl CompilerOptions {
    /// Options matching the defaults of mcs itself.
    pub fn new(compiler_path: impl Into<PathBuf>) -> Self {
        Self {
            compiler_path: compiler_path.into(),
            platform: Platform::default(),
            target: Target::default(),
            language_version: LangVersion::default(),
            sdk_version: DEFAULT_SDK_VERSION,
            allow_unsafe: false,
            optimize: false,
            reference_base_library: true,
            icon_path: None,
            timeout: None,
        }
    }

    /// Optimized, unsafe, experimental build against SDK 2.
    pub fn mcs_preset(compiler_path: impl Into<PathBuf>) -> Self {
        Self::new(compiler_path)
            .with_sdk_version(2.0)
            .with_unsafe(true)
            .with_optimize(true)
            .with_language_version(LangVersion::Experimental)
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_language_version(mut self, language_version: LangVersion) -> Self {
        self.language_version = language_version;
        self
    }

    pub fn with_sdk_version(mut self, sdk_version: f64) -> Self {
        self.sdk_version = sdk_version;
        self
    }

    pub fn with_unsafe(mut self, allow_unsafe: bool) -> Self {
        self.allow_unsafe = allow_unsafe;
        self
    }

    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    pub fn with_reference_base_library(mut self, reference: bool) -> Self {
        self.reference_base_library = reference;
        self
    }

    pub fn with_icon(mut self, icon_path: impl Into<PathBuf>) -> Self {
        self.icon_path = Some(icon_path.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Millis) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn compiler_path(&self) -> &Path {
        &self.compiler_path
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from)
    }
}

/// Files involved in a single compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    pub source_path: PathBuf,
    pub output_assembly_path: Option<PathBuf>,
    pub output_documentation_path: Option<PathBuf>,
}

impl CompileRequest {
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            output_assembly_path: None,
            output_documentation_path: None,
        }
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_assembly_path = Some(path.into());
        self
    }

    pub fn with_documentation(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_documentation_path = Some(path.into());
        self
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_test {
    use super::*;

    fn parse(yaml: &str) -> CompilerOptions {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_missing_fields_use_mcs_defaults() {
        let options = parse("compiler_path: /usr/bin/mcs");
        assert_eq!(options, CompilerOptions::new("/usr/bin/mcs"));
        assert!(options.reference_base_library);
        assert_eq!(options.sdk_version, DEFAULT_SDK_VERSION);
    }

    #[test]
    fn test_command_line_tokens() {
        let options = parse(
            "compiler_path: mcs
platform: anycpu32bitpreferred
target: winexe
language_version: ISO-2
sdk_version: 4
reference_base_library: false
icon_path: app.ico
timeout: 250",
        );

        assert_eq!(options.platform, Platform::AnyCpu32BitPreferred);
        assert_eq!(options.target, Target::WinExe);
        assert_eq!(options.language_version, LangVersion::Iso2);
        assert_eq!(options.sdk_version, 4.0);
        assert!(!options.reference_base_library);
        assert_eq!(options.icon_path, Some(PathBuf::from("app.ico")));
        assert_eq!(options.timeout(), Some(Duration::from_millis(250)));
    }

    fn lang(value: &str) -> LangVersion {
        parse(&format!("{{compiler_path: mcs, language_version: {value}}}")).language_version
    }

    #[test]
    fn test_numeric_lang_version() {
        assert_eq!(lang("3"), LangVersion::V3);
        assert_eq!(lang("'5'"), LangVersion::V5);
        assert_eq!(lang("Experimental"), LangVersion::Experimental);
        assert_eq!(lang("7"), LangVersion::Default);
        assert_eq!(lang("bogus"), LangVersion::Default);
    }

    #[test]
    fn test_unknown_platform_is_rejected() {
        let yaml = "{compiler_path: mcs, platform: sparc}";
        assert!(serde_yaml::from_str::<CompilerOptions>(yaml).is_err());
    }

    #[test]
    fn test_serialize_uses_tokens() {
        let options = CompilerOptions::new("mcs")
            .with_platform(Platform::X64)
            .with_language_version(LangVersion::Iso1);
        let yaml = serde_yaml::to_string(&options).unwrap();

        assert!(yaml.contains("platform: x64"));
        assert!(yaml.contains("language_version: ISO-1"));
        assert_eq!(parse(&yaml), options);
    }
}
