//! CLI argument parsing for adbrun.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Adbrun: locate and run Android SDK command-line tools.
///
/// Commands resolve the SDK root from --home, then ANDROID_HOME, then
/// ANDROID_SDK_ROOT, and find the tool under its conventional subdirectory.
/// Commands that forward a tool invocation exit with the tool's own exit
/// code; adbrun's own failures use codes 1-3.
#[derive(Parser, Debug)]
#[command(name = "adbrun")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for adbrun.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List connected devices and emulators.
    ///
    /// Parses `adb devices -l` into structured records. Offline devices
    /// are skipped.
    Devices(DevicesArgs),

    /// Run adb with raw arguments.
    ///
    /// Arguments after the subcommand are passed through verbatim; the
    /// device selector (when given) is injected in front of them.
    Run(RunArgs),

    /// Run a shell command on a device.
    ///
    /// Equivalent to `adb [-s serial] shell <command...>`.
    Shell(ShellArgs),

    /// Install an APK on a device.
    Install(InstallArgs),

    /// Uninstall a package from a device.
    Uninstall(UninstallArgs),

    /// Print the resolved path of an SDK tool.
    ///
    /// Fails with exit code 2 when the tool cannot be located.
    Which(WhichArgs),

    /// Invoke a registered operation with JSON parameters.
    ///
    /// Operations mirror the library's callable surface (device_list,
    /// device_shell, device_app, adb_version, sdk_info) and print their
    /// result as JSON on stdout.
    Call(CallArgs),
}

/// Arguments for the `devices` command.
#[derive(Parser, Debug)]
pub struct DevicesArgs {
    /// Android SDK root. Defaults to ANDROID_HOME / ANDROID_SDK_ROOT.
    #[arg(long)]
    pub home: Option<PathBuf>,

    /// Print devices as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Device serial to target (injected as `-s <serial>`).
    #[arg(short = 's', long = "device")]
    pub device: Option<String>,

    /// Android SDK root. Defaults to ANDROID_HOME / ANDROID_SDK_ROOT.
    #[arg(long)]
    pub home: Option<PathBuf>,

    /// Raw adb arguments (e.g. `adbrun run -- logcat -d`).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    pub args: Vec<String>,
}

/// Arguments for the `shell` command.
#[derive(Parser, Debug)]
pub struct ShellArgs {
    /// Device serial to target (injected as `-s <serial>`).
    #[arg(short = 's', long = "device")]
    pub device: Option<String>,

    /// Android SDK root. Defaults to ANDROID_HOME / ANDROID_SDK_ROOT.
    #[arg(long)]
    pub home: Option<PathBuf>,

    /// Shell command and arguments to run on the device.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    pub command: Vec<String>,
}

/// Arguments for the `install` command.
#[derive(Parser, Debug)]
pub struct InstallArgs {
    /// Path to the APK file.
    pub apk: PathBuf,

    /// Replace the app if it is already installed.
    #[arg(short, long)]
    pub replace: bool,

    /// Device serial to target (injected as `-s <serial>`).
    #[arg(short = 's', long = "device")]
    pub device: Option<String>,

    /// Android SDK root. Defaults to ANDROID_HOME / ANDROID_SDK_ROOT.
    #[arg(long)]
    pub home: Option<PathBuf>,
}

/// Arguments for the `uninstall` command.
#[derive(Parser, Debug)]
pub struct UninstallArgs {
    /// Package name to uninstall (e.g. com.example.app).
    pub package: String,

    /// Keep app data and cache directories.
    #[arg(short = 'k', long)]
    pub keep_data: bool,

    /// Device serial to target (injected as `-s <serial>`).
    #[arg(short = 's', long = "device")]
    pub device: Option<String>,

    /// Android SDK root. Defaults to ANDROID_HOME / ANDROID_SDK_ROOT.
    #[arg(long)]
    pub home: Option<PathBuf>,
}

/// Arguments for the `which` command.
#[derive(Parser, Debug)]
pub struct WhichArgs {
    /// Tool to locate: adb, emulator, sdkmanager, or avdmanager.
    #[arg(default_value = "adb")]
    pub tool: String,

    /// Android SDK root. Defaults to ANDROID_HOME / ANDROID_SDK_ROOT.
    #[arg(long)]
    pub home: Option<PathBuf>,
}

/// Arguments for the `call` command.
#[derive(Parser, Debug)]
pub struct CallArgs {
    /// Operation name to invoke. Omit with --list to see all operations.
    pub operation: Option<String>,

    /// JSON object with the operation's parameters.
    #[arg(long, default_value = "{}")]
    pub params: String,

    /// List registered operations instead of calling one.
    #[arg(long)]
    pub list: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
