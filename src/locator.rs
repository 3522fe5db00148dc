//! Locates Android SDK command-line tools on disk.
//!
//! Each tool lives in a well-known subdirectory of the SDK root and carries
//! a platform-specific extension on Windows (`.exe` for native binaries,
//! `.bat` for the cmdline-tools scripts). Resolution order for the root:
//! explicit argument, then `ANDROID_HOME`, then `ANDROID_SDK_ROOT`.
//!
//! Lookups are never cached: every call re-walks the filesystem, so changes
//! to the environment or an SDK install between calls are picked up.
//! Absence of a tool is not an error here; [`find_tool`] returns `None` and
//! the caller decides whether that is fatal.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Primary environment variable naming the SDK root.
pub const ANDROID_HOME_ENV: &str = "ANDROID_HOME";

/// Older alias for the SDK root, consulted after [`ANDROID_HOME_ENV`].
pub const ANDROID_SDK_ROOT_ENV: &str = "ANDROID_SDK_ROOT";

/// The SDK command-line tools this crate knows how to locate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdkTool {
    /// The Android debug bridge (platform-tools/).
    Adb,
    /// The emulator launcher (emulator/).
    Emulator,
    /// The SDK package manager (cmdline-tools/<version>/bin/).
    SdkManager,
    /// The AVD manager (cmdline-tools/<version>/bin/).
    AvdManager,
}

impl SdkTool {
    /// Logical tool name, without any platform extension.
    pub fn name(&self) -> &'static str {
        match self {
            SdkTool::Adb => "adb",
            SdkTool::Emulator => "emulator",
            SdkTool::SdkManager => "sdkmanager",
            SdkTool::AvdManager => "avdmanager",
        }
    }

    /// Executable file name on the current platform.
    pub fn file_name(&self) -> String {
        if cfg!(windows) {
            let ext = match self {
                SdkTool::Adb | SdkTool::Emulator => "exe",
                SdkTool::SdkManager | SdkTool::AvdManager => "bat",
            };
            format!("{}.{}", self.name(), ext)
        } else {
            self.name().to_string()
        }
    }

    /// Directories under the SDK root to search, in preference order.
    fn search_dirs(&self, sdk_home: &Path) -> Vec<PathBuf> {
        match self {
            SdkTool::Adb => vec![sdk_home.join("platform-tools")],
            SdkTool::Emulator => vec![
                sdk_home.join("emulator"),
                sdk_home.join("tools").join("bin"),
            ],
            SdkTool::SdkManager | SdkTool::AvdManager => cmdline_tool_dirs(sdk_home),
        }
    }
}

impl FromStr for SdkTool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "adb" => Ok(SdkTool::Adb),
            "emulator" => Ok(SdkTool::Emulator),
            "sdkmanager" => Ok(SdkTool::SdkManager),
            "avdmanager" => Ok(SdkTool::AvdManager),
            other => Err(format!(
                "unknown tool '{}'; expected one of: adb, emulator, sdkmanager, avdmanager",
                other
            )),
        }
    }
}

/// A resolved tool: the logical tool plus the absolute path it was found at.
///
/// The file existed at resolution time. That can still race with deletion
/// before execution; the runner re-checks and reports the race as a failure.
#[derive(Debug, Clone)]
pub struct ToolPath {
    /// Which tool this path was resolved for.
    pub tool: SdkTool,
    /// Absolute path to the executable.
    pub path: PathBuf,
}

/// Resolve the SDK root directory.
///
/// An explicit path always wins over environment configuration. Returns
/// `None` when nothing is configured; the directory is not required to
/// exist (tool lookups inside it will simply find nothing).
pub fn resolve_sdk_home(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(home) = explicit {
        return Some(home.to_path_buf());
    }

    for var in [ANDROID_HOME_ENV, ANDROID_SDK_ROOT_ENV] {
        if let Ok(value) = env::var(var) {
            if !value.is_empty() {
                return Some(PathBuf::from(value));
            }
        }
    }

    None
}

/// Find a tool's executable under the given SDK root (or the environment's
/// root when `sdk_home` is `None`).
///
/// Returns `None` when no root is configured or the tool is not installed.
/// Never errors for a missing tool.
pub fn find_tool(tool: SdkTool, sdk_home: Option<&Path>) -> Option<ToolPath> {
    let home = resolve_sdk_home(sdk_home)?;

    for dir in tool.search_dirs(&home) {
        let candidate = dir.join(tool.file_name());
        if candidate.is_file() {
            return Some(ToolPath {
                tool,
                path: candidate,
            });
        }
    }

    None
}

/// Candidate bin directories for the cmdline tools: `cmdline-tools/latest`
/// first, then the remaining version directories newest-first, then the
/// legacy `tools/bin` location.
fn cmdline_tool_dirs(sdk_home: &Path) -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    let root = sdk_home.join("cmdline-tools");
    if let Ok(entries) = fs::read_dir(&root) {
        let mut names: Vec<String> = entries
            .flatten()
            .filter(|e| e.path().is_dir())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();

        names.sort_by(|a, b| {
            let a_latest = a == "latest";
            let b_latest = b == "latest";
            // "latest" sorts first; otherwise highest version first.
            b_latest
                .cmp(&a_latest)
                .then_with(|| compare_versions(b, a))
        });

        for name in names {
            dirs.push(root.join(name).join("bin"));
        }
    }

    dirs.push(sdk_home.join("tools").join("bin"));
    dirs
}

/// Order version directory names numerically, so `11.0` outranks `9.0`.
///
/// Dot-separated components are compared as integers when both parse;
/// otherwise the comparison falls back to the component strings, which also
/// handles non-version names deterministically.
fn compare_versions(a: &str, b: &str) -> std::cmp::Ordering {
    let mut a_parts = a.split('.');
    let mut b_parts = b.split('.');

    loop {
        match (a_parts.next(), b_parts.next()) {
            (None, None) => return std::cmp::Ordering::Equal,
            (None, Some(_)) => return std::cmp::Ordering::Less,
            (Some(_), None) => return std::cmp::Ordering::Greater,
            (Some(x), Some(y)) => {
                let ordering = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(xn), Ok(yn)) => xn.cmp(&yn),
                    _ => x.cmp(y),
                };
                if ordering != std::cmp::Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}
