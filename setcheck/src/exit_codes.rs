//! Stable exit codes for setcheck CLI commands.

/// Every evaluated check passed.
pub const OK: i32 = 0;
/// Invalid arguments, unreadable snapshot or check file, or other errors.
pub const INVALID: i32 = 1;
/// At least one check failed (or was skipped under `fail_fast`).
pub const FAILED: i32 = 2;
