use crate::document::DocumentError;

// Exit codes for CLI automation
pub const SUCCESS: i32 = 0;
pub const ERROR: i32 = 1;
pub const NOT_FOUND: i32 = 2;
pub const INVALID_INPUT: i32 = 3;

/// Exit code for a command line the parser rejected
///
/// Help and version output still exit successfully.
pub fn exit_code_for_usage(error: &clap::Error) -> i32 {
    if error.use_stderr() {
        INVALID_INPUT
    } else {
        SUCCESS
    }
}

/// Exit code for a failed document operation
pub fn exit_code_for(error: &DocumentError) -> i32 {
    if error.is_not_found() {
        NOT_FOUND
    } else {
        ERROR
    }
}
