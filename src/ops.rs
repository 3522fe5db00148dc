//! Named-operation registry.
//!
//! The outer protocol layer (whatever envelope hosts this crate) calls
//! operations by name with JSON parameters and gets a JSON value back. The
//! registry is built explicitly at startup: a plain map from operation name
//! to handler function, no runtime type discovery.
//!
//! Handlers are synchronous and self-contained; each one constructs its own
//! [`Adb`](crate::adb::Adb) handle from its parameters, so concurrent calls
//! share no state.

use crate::adb::Adb;
use crate::error::{AdbrunError, Result};
use crate::locator::{self, SdkTool};
use crate::process::CancellationToken;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// An operation handler: JSON parameters in, JSON value out.
pub type Handler = fn(&Value) -> Result<Value>;

/// Registry of callable operations, keyed by name.
pub struct Registry {
    ops: BTreeMap<&'static str, Handler>,
}

impl Registry {
    /// Build the registry with every known operation registered.
    pub fn new() -> Self {
        let mut ops: BTreeMap<&'static str, Handler> = BTreeMap::new();
        ops.insert("device_list", device_list);
        ops.insert("device_shell", device_shell);
        ops.insert("device_app", device_app);
        ops.insert("adb_version", adb_version);
        ops.insert("sdk_info", sdk_info);
        Self { ops }
    }

    /// Registered operation names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.ops.keys().copied().collect()
    }

    /// Invoke an operation by name.
    pub fn call(&self, name: &str, params: &Value) -> Result<Value> {
        let handler = self.ops.get(name).ok_or_else(|| {
            AdbrunError::UserError(format!(
                "unknown operation '{}'\nKnown operations: {}",
                name,
                self.names().join(", ")
            ))
        })?;
        handler(params)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_params<T: for<'de> Deserialize<'de>>(params: &Value) -> Result<T> {
    serde_json::from_value(params.clone())
        .map_err(|e| AdbrunError::UserError(format!("invalid parameters: {}", e)))
}

/// JSON shape shared by operations that forward a raw tool result.
fn result_json(result: &crate::process::ExecutionResult) -> Value {
    json!({
        "success": result.success(),
        "exit_code": result.exit_code,
        "stdout": result.stdout,
        "stderr": result.stderr,
        "cancelled": result.cancelled,
    })
}

#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct DeviceListParams {
    home: Option<PathBuf>,
}

/// Lists connected devices and emulators.
fn device_list(params: &Value) -> Result<Value> {
    let p: DeviceListParams = parse_params(params)?;
    let adb = Adb::new(p.home);
    let devices = adb.devices(&CancellationToken::new())?;
    Ok(json!({ "devices": devices }))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DeviceShellParams {
    command: String,
    #[serde(default)]
    device: Option<String>,
    #[serde(default)]
    home: Option<PathBuf>,
}

/// Runs a shell command on a device and returns the raw result.
fn device_shell(params: &Value) -> Result<Value> {
    let p: DeviceShellParams = parse_params(params)?;

    let tokens = shell_words::split(&p.command).map_err(|e| {
        AdbrunError::UserError(format!("failed to parse shell command '{}': {}", p.command, e))
    })?;
    if tokens.is_empty() {
        return Err(AdbrunError::UserError("shell command is empty".to_string()));
    }

    let adb = Adb::new(p.home).with_serial(p.device);
    let result = adb.shell(&tokens, &CancellationToken::new())?;
    Ok(result_json(&result))
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DeviceAppParams {
    /// "install" or "uninstall".
    action: String,
    /// APK path for install, package name for uninstall.
    package: String,
    #[serde(default)]
    device: Option<String>,
    /// For install: replace an existing app.
    #[serde(default)]
    replace: bool,
    /// For uninstall: keep app data and caches.
    #[serde(default)]
    keep_data: bool,
    #[serde(default)]
    home: Option<PathBuf>,
}

/// Installs or uninstalls an app on a device.
fn device_app(params: &Value) -> Result<Value> {
    let p: DeviceAppParams = parse_params(params)?;
    let adb = Adb::new(p.home).with_serial(p.device);
    let token = CancellationToken::new();

    let result = match p.action.as_str() {
        "install" => adb.install(PathBuf::from(&p.package).as_path(), p.replace, &token)?,
        "uninstall" => adb.uninstall(&p.package, p.keep_data, &token)?,
        other => {
            return Err(AdbrunError::UserError(format!(
                "unknown action '{}'; use 'install' or 'uninstall'",
                other
            )));
        }
    };

    Ok(result_json(&result))
}

#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct AdbVersionParams {
    home: Option<PathBuf>,
}

/// Reports the adb version string.
fn adb_version(params: &Value) -> Result<Value> {
    let p: AdbVersionParams = parse_params(params)?;
    let adb = Adb::new(p.home);
    let result = adb.version(&CancellationToken::new())?;
    Ok(result_json(&result))
}

#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct SdkInfoParams {
    home: Option<PathBuf>,
}

/// Reports the resolved SDK root and which tools were found under it.
fn sdk_info(params: &Value) -> Result<Value> {
    let p: SdkInfoParams = parse_params(params)?;
    let home = locator::resolve_sdk_home(p.home.as_deref());

    let mut tools = serde_json::Map::new();
    for tool in [
        SdkTool::Adb,
        SdkTool::Emulator,
        SdkTool::SdkManager,
        SdkTool::AvdManager,
    ] {
        let found = locator::find_tool(tool, p.home.as_deref())
            .map(|t| Value::String(t.path.display().to_string()))
            .unwrap_or(Value::Null);
        tools.insert(tool.name().to_string(), found);
    }

    Ok(json!({
        "home": home.map(|h| h.display().to_string()),
        "tools": tools,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn registry_lists_all_operations() {
        let registry = Registry::new();
        assert_eq!(
            registry.names(),
            vec![
                "adb_version",
                "device_app",
                "device_list",
                "device_shell",
                "sdk_info"
            ]
        );
    }

    #[test]
    fn unknown_operation_is_a_user_error() {
        let registry = Registry::new();
        let err = registry.call("flash_rom", &json!({})).unwrap_err();
        assert!(matches!(err, AdbrunError::UserError(_)));
        assert!(err.to_string().contains("flash_rom"));
        assert!(err.to_string().contains("device_list"));
    }

    #[test]
    fn malformed_params_are_a_user_error() {
        let registry = Registry::new();
        let err = registry
            .call("device_shell", &json!({ "bogus_field": 1 }))
            .unwrap_err();
        assert!(matches!(err, AdbrunError::UserError(_)));
        assert!(err.to_string().contains("invalid parameters"));
    }

    #[test]
    fn device_app_rejects_unknown_action() {
        let err = device_app(&json!({ "action": "sideload", "package": "x" })).unwrap_err();
        assert!(err.to_string().contains("sideload"));
    }

    #[test]
    fn device_shell_rejects_empty_command() {
        let err = device_shell(&json!({ "command": "   " })).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    #[serial]
    fn sdk_info_reports_missing_tools_as_null() {
        unsafe {
            env::remove_var(crate::locator::ANDROID_HOME_ENV);
            env::remove_var(crate::locator::ANDROID_SDK_ROOT_ENV);
        }
        let sdk = tempfile::TempDir::new().unwrap();

        let value = sdk_info(&json!({ "home": sdk.path() })).unwrap();
        assert_eq!(
            value["home"],
            json!(sdk.path().display().to_string())
        );
        assert_eq!(value["tools"]["adb"], Value::Null);
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn sdk_info_reports_found_tool_paths() {
        unsafe {
            env::remove_var(crate::locator::ANDROID_HOME_ENV);
            env::remove_var(crate::locator::ANDROID_SDK_ROOT_ENV);
        }
        let sdk = tempfile::TempDir::new().unwrap();
        let bin_dir = sdk.path().join("platform-tools");
        std::fs::create_dir_all(&bin_dir).unwrap();
        std::fs::write(bin_dir.join("adb"), "").unwrap();

        let value = sdk_info(&json!({ "home": sdk.path() })).unwrap();
        let adb_path = value["tools"]["adb"].as_str().unwrap();
        assert!(adb_path.ends_with("platform-tools/adb"));
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn device_list_returns_parsed_devices() {
        use std::os::unix::fs::PermissionsExt;

        unsafe {
            env::remove_var(crate::locator::ANDROID_HOME_ENV);
            env::remove_var(crate::locator::ANDROID_SDK_ROOT_ENV);
        }
        let sdk = tempfile::TempDir::new().unwrap();
        let bin_dir = sdk.path().join("platform-tools");
        std::fs::create_dir_all(&bin_dir).unwrap();
        let fake = bin_dir.join("adb");
        std::fs::write(
            &fake,
            "#!/bin/sh\necho 'List of devices attached'\necho 'emulator-5554 device'\n",
        )
        .unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let registry = Registry::new();
        let value = registry
            .call("device_list", &json!({ "home": sdk.path() }))
            .unwrap();

        assert_eq!(value["devices"][0]["serial"], json!("emulator-5554"));
        assert_eq!(value["devices"][0]["is_emulator"], json!(true));
    }
}
