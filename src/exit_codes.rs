//! Exit code constants for the adbrun CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unknown operation)
//! - 2: Tool not found (no subprocess was spawned)
//! - 3: Spawn failure (OS refused to start the subprocess)
//!
//! Commands that forward a tool invocation (`run`, `shell`, `install`, ...)
//! exit with the tool's own exit code instead, so a scripted caller sees the
//! same code it would have seen calling the tool directly. Process exit
//! codes are 8-bit on the supported platforms; forwarded codes outside
//! 0-255 are narrowed to 255 via [`to_process_exit`] rather than wrapped.

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid parameters, or unknown operation.
pub const USER_ERROR: i32 = 1;

/// The requested SDK tool could not be located.
pub const TOOL_NOT_FOUND: i32 = 2;

/// The OS refused to create the subprocess.
pub const SPAWN_FAILURE: i32 = 3;

/// Narrow an exit code to the 8-bit range the process exit status carries.
///
/// Forwarded tool codes are normally already in range. Out-of-range values
/// (a negative sentinel, or an exotic code from a wrapper script) collapse
/// to 255 so they still read as failure, never as an accidental success or
/// an unrelated code via two's-complement wrap.
pub fn to_process_exit(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [SUCCESS, USER_ERROR, TOOL_NOT_FOUND, SPAWN_FAILURE];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn exit_codes_match_documented_values() {
        assert_eq!(SUCCESS, 0);
        assert_eq!(USER_ERROR, 1);
        assert_eq!(TOOL_NOT_FOUND, 2);
        assert_eq!(SPAWN_FAILURE, 3);
    }

    #[test]
    fn process_exit_narrows_out_of_range_codes_to_failure() {
        assert_eq!(to_process_exit(0), 0);
        assert_eq!(to_process_exit(7), 7);
        assert_eq!(to_process_exit(255), 255);
        // The cancelled sentinel and other out-of-range codes must still
        // read as failure, never as 0.
        assert_eq!(to_process_exit(-1), 255);
        assert_eq!(to_process_exit(-77), 255);
        assert_eq!(to_process_exit(300), 255);
    }
}
