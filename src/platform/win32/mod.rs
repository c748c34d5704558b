// ── Win32 platform implementation ─────────────────────────────────────────────
//
// The only module tree in the crate where `unsafe` code is permitted.  Every
// `unsafe` block MUST carry a `// SAFETY:` comment that states:
//   • which invariant makes the operation sound, and
//   • what the caller is responsible for maintaining.

#![allow(unsafe_code)]

// ── Sub-modules ───────────────────────────────────────────────────────────────

mod messages;
pub mod syntax_edit;
pub mod window;

use windows::Win32::{
    Foundation::{GetLastError, HINSTANCE, HWND},
    System::LibraryLoader::GetModuleHandleW,
    UI::WindowsAndMessaging::WINDOW_LONG_PTR_INDEX,
};

use crate::error::{Result, SyntaxEditError};

// ── Error helpers ─────────────────────────────────────────────────────────────

/// Capture the current Win32 last-error code and wrap it in a `SyntaxEditError`.
///
/// Call immediately after a Win32 function that signals failure; `GetLastError`
/// reads thread-local state that can be overwritten by any subsequent API call.
pub(crate) fn last_error(function: &'static str) -> SyntaxEditError {
    // SAFETY: GetLastError reads thread-local state; always safe to call.
    let code = unsafe { GetLastError() };
    SyntaxEditError::Win32 {
        function,
        code: code.0,
    }
}

/// Name a `windows::core::Error` after the call that produced it.
pub(crate) fn win32_err(function: &'static str) -> impl FnOnce(windows::core::Error) -> SyntaxEditError {
    move |e| SyntaxEditError::Win32 {
        function,
        code: e.code().0 as u32,
    }
}

/// The executable's module handle, used to register and create windows.
pub(crate) fn module_instance() -> Result<HINSTANCE> {
    // SAFETY: GetModuleHandleW(None) returns the .exe's own HMODULE, which is
    // valid for the process lifetime.
    let hmodule = unsafe { GetModuleHandleW(None) }.map_err(win32_err("GetModuleHandleW"))?;
    Ok(HINSTANCE(hmodule.0))
}

// ── Window extra bytes ────────────────────────────────────────────────────────
//
// `*WindowLongPtrW` only exist on 64-bit targets; 32-bit Windows stores
// pointers in the plain LONG slots.

/// Read the pointer-sized value at `index` in `hwnd`'s extra bytes.
///
/// # Safety
/// `hwnd` must be a live window and `index` inside its `cbWndExtra`
/// (or one of the `GWLP_*` indices).
#[cfg(target_pointer_width = "64")]
pub(crate) unsafe fn window_slot(hwnd: HWND, index: i32) -> isize {
    windows::Win32::UI::WindowsAndMessaging::GetWindowLongPtrW(hwnd, WINDOW_LONG_PTR_INDEX(index))
}

/// See the 64-bit variant.
#[cfg(target_pointer_width = "32")]
pub(crate) unsafe fn window_slot(hwnd: HWND, index: i32) -> isize {
    windows::Win32::UI::WindowsAndMessaging::GetWindowLongW(hwnd, WINDOW_LONG_PTR_INDEX(index))
        as isize
}

/// Store `value` at `index` in `hwnd`'s extra bytes.
///
/// # Safety
/// Same as [`window_slot`].
#[cfg(target_pointer_width = "64")]
pub(crate) unsafe fn set_window_slot(hwnd: HWND, index: i32, value: isize) {
    windows::Win32::UI::WindowsAndMessaging::SetWindowLongPtrW(
        hwnd,
        WINDOW_LONG_PTR_INDEX(index),
        value,
    );
}

/// See the 64-bit variant.
#[cfg(target_pointer_width = "32")]
pub(crate) unsafe fn set_window_slot(hwnd: HWND, index: i32, value: isize) {
    windows::Win32::UI::WindowsAndMessaging::SetWindowLongW(
        hwnd,
        WINDOW_LONG_PTR_INDEX(index),
        value as i32,
    );
}
