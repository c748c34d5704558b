// ── Rich-edit message constants ───────────────────────────────────────────────
//
// Source of truth: richedit.h.  Only the subset the syntax edit control sends
// is listed here.  All EM_* values are sent via
// SendMessageW(hwnd_edit, EM_*, wparam, lparam).

use crate::styles::WM_USER;

// ── Selection & scrolling ─────────────────────────────────────────────────────

/// Read the selection into a `CharRange`.  LPARAM = `*mut CharRange`.
pub(super) const EM_EXGETSEL: u32 = WM_USER + 52;
/// Set the selection from a `CharRange`.  LPARAM = `*const CharRange`.
pub(super) const EM_EXSETSEL: u32 = WM_USER + 55;
/// LPARAM = `*mut POINT` receiving the scroll position in document pixels.
pub(super) const EM_GETSCROLLPOS: u32 = WM_USER + 221;
/// LPARAM = `*const POINT`.
pub(super) const EM_SETSCROLLPOS: u32 = WM_USER + 222;

// ── Formatting ────────────────────────────────────────────────────────────────

/// WPARAM = `SCF_*`; LPARAM = `*const CharFormatW`.
pub(super) const EM_SETCHARFORMAT: u32 = WM_USER + 68;
/// WPARAM = 0; LPARAM = COLORREF.
pub(super) const EM_SETBKGNDCOLOR: u32 = WM_USER + 67;

pub(super) const SCF_SELECTION: usize = 0x0001;
pub(super) const SCF_DEFAULT: usize = 0x0000;
pub(super) const SCF_ALL: usize = 0x0004;

pub(super) const CFM_BOLD: u32 = 0x0000_0001;
pub(super) const CFM_ITALIC: u32 = 0x0000_0002;
pub(super) const CFM_UNDERLINE: u32 = 0x0000_0004;
pub(super) const CFM_FACE: u32 = 0x2000_0000;
pub(super) const CFM_COLOR: u32 = 0x4000_0000;
pub(super) const CFM_SIZE: u32 = 0x8000_0000;

pub(super) const CFE_BOLD: u32 = CFM_BOLD;
pub(super) const CFE_ITALIC: u32 = CFM_ITALIC;
pub(super) const CFE_UNDERLINE: u32 = CFM_UNDERLINE;

/// Twips per typographic point; `CharFormatW::y_height` is in twips.
pub(super) const TWIPS_PER_POINT: i32 = 20;

// ── Events & modes ────────────────────────────────────────────────────────────

/// Returns the previous mask; LPARAM = new `ENM_*` mask.
pub(super) const EM_SETEVENTMASK: u32 = WM_USER + 69;
pub(super) const ENM_CHANGE: u32 = 0x0000_0001;

/// Notification code carried in HIWORD(WPARAM) of WM_COMMAND.
pub(super) const EN_CHANGE: u32 = 0x0300;

/// Only valid while the control is empty.  WPARAM = `TM_*` flags.
pub(super) const EM_SETTEXTMODE: u32 = WM_USER + 89;
pub(super) const TM_RICHTEXT: usize = 2;
pub(super) const TM_MULTILEVELUNDO: usize = 8;
pub(super) const TM_SINGLECODEPAGE: usize = 16;

// ── Text ──────────────────────────────────────────────────────────────────────

/// WPARAM = `*const GetTextEx`; LPARAM = output buffer.
pub(super) const EM_GETTEXTEX: u32 = WM_USER + 94;
/// WPARAM = `*const GetTextLengthEx`.
pub(super) const EM_GETTEXTLENGTHEX: u32 = WM_USER + 95;
/// WPARAM = `*const SetTextEx`; LPARAM = NUL-terminated text.
pub(super) const EM_SETTEXTEX: u32 = WM_USER + 97;

pub(super) const GT_DEFAULT: u32 = 0;
pub(super) const GTL_PRECISE: u32 = 2;
pub(super) const GTL_NUMCHARS: u32 = 8;
pub(super) const ST_DEFAULT: u32 = 0;
pub(super) const CP_UNICODE: u32 = 1200;

// ── Clipboard ─────────────────────────────────────────────────────────────────

/// WPARAM = clipboard format to paste as.
pub(super) const EM_PASTESPECIAL: u32 = WM_USER + 64;

// ── OLE ───────────────────────────────────────────────────────────────────────

/// LPARAM = `*mut *mut IRichEditOle`; the interface comes back AddRef'd.
pub(super) const EM_GETOLEINTERFACE: u32 = WM_USER + 60;
pub(super) const CF_UNICODETEXT: usize = 13;

// ── Structures ────────────────────────────────────────────────────────────────

// https://learn.microsoft.com/en-us/windows/win32/api/richedit/ns-richedit-charrange
#[repr(C)]
#[derive(Default, Clone, Copy)]
pub(super) struct CharRange {
    pub(super) cp_min: i32,
    pub(super) cp_max: i32,
}

// https://learn.microsoft.com/en-us/windows/win32/api/richedit/ns-richedit-charformatw
#[repr(C)]
pub(super) struct CharFormatW {
    pub(super) cb_size: u32,
    pub(super) dw_mask: u32,
    pub(super) dw_effects: u32,
    pub(super) y_height: i32,
    pub(super) y_offset: i32,
    pub(super) cr_text_color: u32,
    pub(super) b_char_set: u8,
    pub(super) b_pitch_and_family: u8,
    pub(super) sz_face_name: [u16; 32],
}

impl CharFormatW {
    pub(super) fn new(mask: u32) -> Self {
        Self {
            cb_size: std::mem::size_of::<Self>() as u32,
            dw_mask: mask,
            dw_effects: 0,
            y_height: 0,
            y_offset: 0,
            cr_text_color: 0,
            b_char_set: 0,
            b_pitch_and_family: 0,
            sz_face_name: [0; 32],
        }
    }

    /// Copy `face` into the fixed-size name buffer, truncating to 31 units.
    pub(super) fn set_face(&mut self, face: &str) {
        self.sz_face_name = [0; 32];
        for (dst, unit) in self.sz_face_name.iter_mut().take(31).zip(face.encode_utf16()) {
            *dst = unit;
        }
    }
}

// richedit.h wraps these in pshpack4.h.
#[repr(C, packed(4))]
pub(super) struct GetTextEx {
    pub(super) cb: u32,
    pub(super) flags: u32,
    pub(super) codepage: u32,
    pub(super) lp_default_char: *const u8,
    pub(super) lp_used_def_char: *mut i32,
}

#[repr(C)]
pub(super) struct GetTextLengthEx {
    pub(super) flags: u32,
    pub(super) codepage: u32,
}

// https://learn.microsoft.com/en-us/windows/win32/api/richedit/ns-richedit-settextex
#[repr(C)]
pub(super) struct SetTextEx {
    pub(super) flags: u32,
    pub(super) codepage: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    // The control rejects CHARFORMAT structures whose cbSize it doesn't know.
    #[test]
    fn charformatw_matches_sdk_size() {
        assert_eq!(std::mem::size_of::<CharFormatW>(), 92);
    }

    #[test]
    fn gettextex_is_pack4() {
        let expected = if cfg!(target_pointer_width = "64") { 28 } else { 20 };
        assert_eq!(std::mem::size_of::<GetTextEx>(), expected);
    }

    #[test]
    fn face_name_is_truncated_and_terminated() {
        let mut cf = CharFormatW::new(CFM_FACE);
        cf.set_face(&"x".repeat(40));
        assert_eq!(cf.sz_face_name[30], u16::from(b'x'));
        assert_eq!(cf.sz_face_name[31], 0);
        cf.set_face("Consolas");
        assert_eq!(cf.sz_face_name[8], 0);
    }
}
