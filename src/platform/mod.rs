// ── Platform layer ────────────────────────────────────────────────────────────
//
// All Win32 FFI lives in the `win32` sub-module, which only exists on
// Windows.  The lexer, key, theme and settings modules stay portable.

#[cfg(windows)]
pub mod win32;
