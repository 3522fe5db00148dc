//! Command implementations for adbrun.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Commands that forward a tool invocation relay the tool's
//! captured output verbatim (stdout to stdout, stderr to stderr) and return
//! the tool's own exit code, so scripted callers see exactly what the tool
//! produced.

use crate::adb::Adb;
use crate::cli::{
    CallArgs, Command, DevicesArgs, InstallArgs, RunArgs, ShellArgs, UninstallArgs, WhichArgs,
};
use crate::error::{AdbrunError, Result};
use crate::exit_codes;
use crate::locator::{self, SdkTool};
use crate::ops::Registry;
use crate::process::{CancellationToken, ExecutionResult};
use serde_json::Value;
use std::io::Write;

/// Dispatch a command to its implementation.
///
/// Returns the process exit code to report: adbrun's own codes for
/// locate/call commands, the forwarded tool exit code for invocations.
pub fn dispatch(command: Command) -> Result<i32> {
    match command {
        Command::Devices(args) => cmd_devices(args),
        Command::Run(args) => cmd_run(args),
        Command::Shell(args) => cmd_shell(args),
        Command::Install(args) => cmd_install(args),
        Command::Uninstall(args) => cmd_uninstall(args),
        Command::Which(args) => cmd_which(args),
        Command::Call(args) => cmd_call(args),
    }
}

/// Print a forwarded tool result and map it to an exit code.
fn relay(result: ExecutionResult) -> Result<i32> {
    // Write captured streams verbatim; no trailing-newline normalization.
    print!("{}", result.stdout);
    let _ = std::io::stdout().flush();
    eprint!("{}", result.stderr);

    Ok(result.exit_code)
}

fn cmd_devices(args: DevicesArgs) -> Result<i32> {
    let adb = Adb::new(args.home);
    let devices = adb.devices(&CancellationToken::new())?;

    if args.json {
        let payload = serde_json::to_string_pretty(&devices)
            .map_err(|e| AdbrunError::UserError(format!("failed to serialize devices: {}", e)))?;
        println!("{}", payload);
        return Ok(exit_codes::SUCCESS);
    }

    if devices.is_empty() {
        println!("No devices attached.");
        return Ok(exit_codes::SUCCESS);
    }

    println!("Attached devices ({}):", devices.len());
    println!();
    for device in &devices {
        println!(
            "  {} ({})",
            device.serial,
            if device.is_emulator { "emulator" } else { "device" }
        );
        if let Some(model) = &device.model {
            println!("    Model:    {}", model);
        }
        if let Some(product) = &device.product {
            println!("    Product:  {}", product);
        }
        if let Some(name) = &device.device {
            println!("    Device:   {}", name);
        }
        if let Some(usb) = &device.usb {
            println!("    USB:      {}", usb);
        }
    }

    Ok(exit_codes::SUCCESS)
}

fn cmd_run(args: RunArgs) -> Result<i32> {
    let adb = Adb::new(args.home).with_serial(args.device);
    let result = adb.run(&args.args, &CancellationToken::new())?;
    relay(result)
}

fn cmd_shell(args: ShellArgs) -> Result<i32> {
    let adb = Adb::new(args.home).with_serial(args.device);
    let result = adb.shell(&args.command, &CancellationToken::new())?;
    relay(result)
}

fn cmd_install(args: InstallArgs) -> Result<i32> {
    let adb = Adb::new(args.home).with_serial(args.device);
    let result = adb.install(&args.apk, args.replace, &CancellationToken::new())?;
    relay(result)
}

fn cmd_uninstall(args: UninstallArgs) -> Result<i32> {
    let adb = Adb::new(args.home).with_serial(args.device);
    let result = adb.uninstall(&args.package, args.keep_data, &CancellationToken::new())?;
    relay(result)
}

fn cmd_which(args: WhichArgs) -> Result<i32> {
    let tool: SdkTool = args
        .tool
        .parse()
        .map_err(AdbrunError::UserError)?;

    match locator::find_tool(tool, args.home.as_deref()) {
        Some(found) => {
            println!("{}", found.path.display());
            Ok(exit_codes::SUCCESS)
        }
        None => Err(AdbrunError::ToolNotFound {
            tool: tool.name().to_string(),
        }),
    }
}

fn cmd_call(args: CallArgs) -> Result<i32> {
    let registry = Registry::new();

    if args.list {
        for name in registry.names() {
            println!("{}", name);
        }
        return Ok(exit_codes::SUCCESS);
    }

    let Some(operation) = args.operation else {
        return Err(AdbrunError::UserError(
            "no operation given; pass an operation name or --list".to_string(),
        ));
    };

    let params: Value = serde_json::from_str(&args.params)
        .map_err(|e| AdbrunError::UserError(format!("--params is not valid JSON: {}", e)))?;

    let result = registry.call(&operation, &params)?;
    let payload = serde_json::to_string_pretty(&result)
        .map_err(|e| AdbrunError::UserError(format!("failed to serialize result: {}", e)))?;
    println!("{}", payload);

    Ok(exit_codes::SUCCESS)
}
