// src/types.rs

/// The help text was shown, or the script exited with 0.
pub const EXIT_SUCCESS: i32 = 0;

/// Something failed inside the launcher (bad options, spawn error, ...).
pub const EXIT_INTERNAL_ERROR: i32 = 1;

/// No interpreter is configured or installed for the script's file type.
pub const EXIT_NO_LAUNCHER: i32 = 2;

/// Outcome of one [`crate::engine::ExecutionEngine::execute`] call.
///
/// On the normal path `exit_code` is the script's own exit code, passed
/// through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub exit_code: i32,

    /// The block appended to the diagnostic file for this execution.
    pub diagnostic_text: String,

    /// Message of the internal error, if one ended the execution.
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn is_internal_error(&self) -> bool {
        self.error.is_some()
    }
}
