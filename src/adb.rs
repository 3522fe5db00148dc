//! High-level adb invocations: device scoping, listing, and app management.
//!
//! Every operation builds a fresh [`ArgumentBuilder`], injects the device
//! serial selector first when one is configured, resolves the adb executable
//! through the locator, and runs it through the process runner. Nothing is
//! shared between invocations.

use crate::error::{AdbrunError, Result};
use crate::locator::{self, SdkTool};
use crate::process::{ArgumentBuilder, CancellationToken, ExecutionResult, runner};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Handle for invoking adb against an optional SDK root and device serial.
#[derive(Debug, Clone, Default)]
pub struct Adb {
    sdk_home: Option<PathBuf>,
    serial: Option<String>,
}

/// One connected device or emulator, parsed from `adb devices -l`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// Device serial number (e.g. `emulator-5554`).
    pub serial: String,
    /// USB bus identifier, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usb: Option<String>,
    /// Product name, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    /// Model name, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Device codename, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// True for emulator serials (`emulator-<port>`).
    pub is_emulator: bool,
}

impl Adb {
    /// Create a handle using the given SDK root, or the environment's root
    /// when `None`.
    pub fn new(sdk_home: Option<PathBuf>) -> Self {
        Self {
            sdk_home,
            serial: None,
        }
    }

    /// Scope subsequent commands to the device with this serial.
    pub fn with_serial(mut self, serial: Option<String>) -> Self {
        self.serial = serial;
        self
    }

    /// Start a builder with the device selector already injected.
    ///
    /// The `-s <serial>` pair always precedes subcommand tokens, and is
    /// appended before any rendering happens.
    fn builder(&self) -> ArgumentBuilder {
        let mut builder = ArgumentBuilder::new();
        if let Some(serial) = &self.serial {
            if !serial.is_empty() {
                builder.append("-s");
                builder.append_quoted(serial);
            }
        }
        builder
    }

    /// Resolve adb and run the built command.
    fn run_adb(
        &self,
        builder: &ArgumentBuilder,
        token: &CancellationToken,
    ) -> Result<ExecutionResult> {
        let tool = locator::find_tool(SdkTool::Adb, self.sdk_home.as_deref()).ok_or_else(|| {
            AdbrunError::ToolNotFound {
                tool: SdkTool::Adb.name().to_string(),
            }
        })?;

        runner::run(&tool, builder, token)
    }

    /// Run adb with caller-supplied raw arguments.
    ///
    /// The exit code comes back as data; the caller interprets it.
    pub fn run(&self, args: &[String], token: &CancellationToken) -> Result<ExecutionResult> {
        let mut builder = self.builder();
        for arg in args {
            builder.append_quoted(arg);
        }
        self.run_adb(&builder, token)
    }

    /// List connected devices and emulators (`adb devices -l`).
    ///
    /// This is a parsed operation, so a non-zero exit here *is* surfaced as
    /// an error carrying the tool's stderr.
    pub fn devices(&self, token: &CancellationToken) -> Result<Vec<DeviceInfo>> {
        let mut builder = self.builder();
        builder.append("devices");
        builder.append("-l");

        let result = self.run_adb(&builder, token)?;
        if !result.success() {
            return Err(AdbrunError::UserError(format!(
                "adb devices exited with code {}: {}",
                result.exit_code,
                result.stderr.trim()
            )));
        }

        Ok(parse_device_list(&result.stdout))
    }

    /// Run a shell command on the device (`adb shell <cmd...>`).
    pub fn shell(&self, command: &[String], token: &CancellationToken) -> Result<ExecutionResult> {
        let mut builder = self.builder();
        builder.append("shell");
        for arg in command {
            builder.append_quoted(arg);
        }
        self.run_adb(&builder, token)
    }

    /// Install an APK (`adb install [-r] <apk>`).
    pub fn install(
        &self,
        apk: &Path,
        replace: bool,
        token: &CancellationToken,
    ) -> Result<ExecutionResult> {
        let mut builder = self.builder();
        builder.append("install");
        if replace {
            builder.append("-r");
        }
        builder.append_quoted(apk.display().to_string());
        self.run_adb(&builder, token)
    }

    /// Uninstall a package (`adb uninstall [-k] <package>`).
    pub fn uninstall(
        &self,
        package: &str,
        keep_data: bool,
        token: &CancellationToken,
    ) -> Result<ExecutionResult> {
        let mut builder = self.builder();
        builder.append("uninstall");
        if keep_data {
            builder.append("-k");
        }
        builder.append_quoted(package);
        self.run_adb(&builder, token)
    }

    /// Report the adb version (`adb version`).
    pub fn version(&self, token: &CancellationToken) -> Result<ExecutionResult> {
        let mut builder = self.builder();
        builder.append("version");
        self.run_adb(&builder, token)
    }
}

/// Parse the output of `adb devices -l`.
///
/// The first line is the "List of devices attached" banner; each following
/// non-empty line is `<serial> <state> [key:value ...]`. Offline devices are
/// skipped, matching the device-bridge's own convention of not targeting
/// them.
pub fn parse_device_list(stdout: &str) -> Vec<DeviceInfo> {
    let mut devices = Vec::new();

    for line in stdout.lines().skip(1) {
        let mut parts = line.split_whitespace();
        let Some(serial) = parts.next() else {
            continue;
        };

        let state = parts.next().unwrap_or("offline");
        if state.eq_ignore_ascii_case("offline") {
            continue;
        }

        let mut info = DeviceInfo {
            serial: serial.to_string(),
            usb: None,
            product: None,
            model: None,
            device: None,
            is_emulator: serial.starts_with("emulator-"),
        };

        for part in parts {
            let Some((key, value)) = part.split_once(':') else {
                continue;
            };
            match key.to_ascii_lowercase().as_str() {
                "usb" => info.usb = Some(value.to_string()),
                "product" => info.product = Some(value.to_string()),
                "model" => info.model = Some(value.to_string()),
                "device" => info.device = Some(value.to_string()),
                _ => {}
            }
        }

        devices.push(info);
    }

    devices
}
