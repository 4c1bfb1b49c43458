//! Constant values of the mcs command line.

/// Extension given to temporary source files.
pub const SOURCE_EXTENSION: &str = "cs";

/// Default SDK version of the mcs compiler when none is specified.
pub const DEFAULT_SDK_VERSION: f64 = 4.5;

/// Token searched for, case-insensitively, in compiler output
/// to decide whether a line reports an error.
pub const ERROR_TOKEN: &str = "error";

/// Number of times a fresh temporary file name is drawn
/// before giving up on collisions.
pub const TEMP_NAME_ATTEMPTS: usize = 16;

/// Interval at which a child process is polled while a deadline is armed.
pub const POLL_INTERVAL_MILLIS: u64 = 10;

/// Windows process creation flag that suppresses the console window.
#[doc(hidden)]
pub const CREATE_NO_WINDOW: u32 = 0x0800_0000;

pub const FLAG_PLATFORM: &str = "-platform:";
pub const FLAG_TARGET: &str = "-target:";
pub const FLAG_SDK: &str = "-sdk:";
pub const FLAG_RUNTIME: &str = "--runtime:v";
pub const FLAG_UNSAFE: &str = "-unsafe";
pub const FLAG_OPTIMIZE: &str = "-optimize";
pub const FLAG_LANGVERSION: &str = "-langversion:";
/// `-nostdlib[+|-]` Does not reference mscorlib.dll library
pub const FLAG_NOSTDLIB: &str = "-nostdlib";
pub const FLAG_OUT: &str = "-out:";
pub const FLAG_WIN32ICON: &str = "-win32icon:";
pub const FLAG_DOC: &str = "-doc:";
