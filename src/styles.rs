// ── Window styles and private message codes ──────────────────────────────────
//
// Plain numeric values from winuser.h / richedit.h so that this module has no
// Win32 imports and builds on every host.  The Windows-only tests in
// `platform::win32::syntax_edit` cross-check them against the `windows` crate.

use bitflags::bitflags;

/// First message number available for private window classes.
pub const WM_USER: u32 = 0x0400;

/// First message number available to the application as a whole.
pub const WM_APP: u32 = 0x8000;

/// The old MFC reflection trick: a parent re-sends a child's `WM_COMMAND` or
/// `WM_NOTIFY` to that child as `WM_REFLECT + msg`.
pub const WM_REFLECT: u32 = WM_USER + 0x1C00;

/// Sent to the parent whenever the `[Interface]` private key changes.
///
/// `WPARAM` is the sending control's `HWND`; `LPARAM` points to a
/// NUL-terminated UTF-16 base64 key, or is 0 when there is no valid key.
/// The pointer is only valid for the duration of the `SendMessage` call.
pub const SE_PRIVATE_KEY: u32 = WM_USER + 0x3100;

pub const WM_COMMAND: u32 = 0x0111;
pub const WM_NOTIFY: u32 = 0x004E;

// https://learn.microsoft.com/en-us/windows/win32/winmsg/window-styles
bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EditStyle: u32 {
        const MULTILINE = 0x0000_0004;
        const NOOLEDRAGDROP = 0x0000_0008;
        const WANTRETURN = 0x0000_1000;
        const TABSTOP = 0x0001_0000;
        const HSCROLL = 0x0010_0000;
        const VSCROLL = 0x0020_0000;
        const BORDER = 0x0080_0000;
        const CLIPSIBLINGS = 0x0400_0000;
        const VISIBLE = 0x1000_0000;
        const CHILD = 0x4000_0000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EditExStyle: u32 {
        const CLIENTEDGE = 0x0000_0200;
    }
}

/// Style every syntax edit window must be created with.
pub const SYNTAXEDIT_STYLE: EditStyle = EditStyle::CHILD
    .union(EditStyle::CLIPSIBLINGS)
    .union(EditStyle::MULTILINE)
    .union(EditStyle::VISIBLE)
    .union(EditStyle::VSCROLL)
    .union(EditStyle::HSCROLL)
    .union(EditStyle::BORDER)
    .union(EditStyle::TABSTOP)
    .union(EditStyle::WANTRETURN)
    .union(EditStyle::NOOLEDRAGDROP);

/// Extended style every syntax edit window must be created with.
pub const SYNTAXEDIT_EXTSTYLE: EditExStyle = EditExStyle::CLIENTEDGE;

/// Whether `msg` is one of the reflected notifications the control handles.
pub fn is_reflected(msg: u32) -> bool {
    msg == WM_REFLECT + WM_COMMAND || msg == WM_REFLECT + WM_NOTIFY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_style_matches_header_value() {
        assert_eq!(SYNTAXEDIT_STYLE.bits(), 0x54B1_100C);
        assert_eq!(SYNTAXEDIT_EXTSTYLE.bits(), 0x0000_0200);
    }

    #[test]
    fn composite_style_carries_every_flag() {
        for flag in EditStyle::all().iter() {
            assert!(SYNTAXEDIT_STYLE.contains(flag), "{flag:?} missing");
        }
    }

    #[test]
    fn message_codes_are_distinct_and_private() {
        assert_eq!(WM_REFLECT, 0x2000);
        assert_eq!(SE_PRIVATE_KEY, 0x3500);
        assert_ne!(WM_REFLECT, SE_PRIVATE_KEY);
        for code in [WM_REFLECT, SE_PRIVATE_KEY] {
            assert!((WM_USER..WM_APP).contains(&code), "{code:#x} not private");
        }
    }

    // Reflected codes must not land on the private-key notification or
    // spill into the WM_APP range.
    #[test]
    fn reflected_codes_stay_in_range() {
        for msg in [WM_COMMAND, WM_NOTIFY] {
            let reflected = WM_REFLECT + msg;
            assert!(reflected < WM_APP);
            assert_ne!(reflected, SE_PRIVATE_KEY);
            assert!(is_reflected(reflected));
        }
        assert!(!is_reflected(WM_COMMAND));
        assert!(!is_reflected(SE_PRIVATE_KEY));
    }
}
