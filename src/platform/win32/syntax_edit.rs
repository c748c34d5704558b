// ── Syntax edit window class ──────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Load msftedit.dll and superclass `RICHEDIT50W` as `WgQuickSyntaxEdit`.
//   • Keep per-window state in the extra window bytes after rich-edit's own.
//   • Re-colour the document whenever its text changes.
//   • Tell the parent (SE_PRIVATE_KEY) and the owner callback when the
//     `[Interface]` private key changes.
//
// Text-change notifications arrive through the MFC-style reflection trick:
// the parent receives EN_CHANGE in WM_COMMAND and bounces it back as
// WM_REFLECT + WM_COMMAND.  Hosts written in Rust call
// `reflect_notification` from their window procedure to do that.

#![allow(unsafe_code)]

use std::{
    cell::{Cell, RefCell},
    ffi::c_void,
    rc::Rc,
    sync::OnceLock,
};

use tracing::{debug, error, info, trace};
use widestring::U16CString;
use windows::{
    core::{w, IUnknown, Interface, PCWSTR},
    Win32::{
        Foundation::{
            GetLastError, BOOL, ERROR_CLASS_ALREADY_EXISTS, HINSTANCE, HWND, LPARAM, LRESULT,
            POINT, WPARAM,
        },
        Graphics::Gdi::InvalidateRect,
        System::LibraryLoader::LoadLibraryW,
        UI::{
            Controls::{
                RichEdit::{tomResume, tomSuspend, ITextDocument},
                NMHDR,
            },
            Input::KeyboardAndMouse::{GetKeyState, VIRTUAL_KEY, VK_CONTROL, VK_INSERT, VK_SHIFT},
            WindowsAndMessaging::{
                CallWindowProcW, CreateWindowExW, DefWindowProcW, GetClassInfoExW,
                GetClassNameW, GetParent, RegisterClassExW, SendMessageW, CS_GLOBALCLASS, HMENU,
                WINDOW_EX_STYLE, WINDOW_STYLE, WM_CREATE, WM_KEYDOWN, WM_NCCREATE, WM_NCDESTROY,
                WM_PASTE, WM_SETREDRAW, WM_SETTEXT, WNDCLASSEXW, WNDPROC,
            },
        },
    },
};

use super::messages::{
    CharFormatW, CharRange, GetTextEx, GetTextLengthEx, SetTextEx, CFE_BOLD, CFE_ITALIC,
    CFE_UNDERLINE, CFM_BOLD, CFM_COLOR, CFM_FACE, CFM_ITALIC, CFM_SIZE, CFM_UNDERLINE,
    CF_UNICODETEXT, CP_UNICODE, EM_EXGETSEL, EM_EXSETSEL, EM_GETSCROLLPOS, EM_GETTEXTEX,
    EM_GETOLEINTERFACE, EM_GETTEXTLENGTHEX, EM_PASTESPECIAL, EM_SETBKGNDCOLOR, EM_SETCHARFORMAT, EM_SETEVENTMASK,
    EM_SETSCROLLPOS, EM_SETTEXTEX, EM_SETTEXTMODE, ENM_CHANGE, EN_CHANGE, GTL_NUMCHARS,
    GTL_PRECISE, GT_DEFAULT, SCF_ALL, SCF_DEFAULT, SCF_SELECTION, ST_DEFAULT, TM_MULTILEVELUNDO,
    TM_RICHTEXT, TM_SINGLECODEPAGE, TWIPS_PER_POINT,
};
use super::{last_error, module_instance, set_window_slot, win32_err, window_slot};
use crate::{
    error::{Result, SyntaxEditError},
    highlight,
    settings::DEFAULT_FONT_SIZE_PT,
    styles::{
        is_reflected, SE_PRIVATE_KEY, SYNTAXEDIT_EXTSTYLE, SYNTAXEDIT_STYLE, WM_COMMAND,
        WM_NOTIFY, WM_REFLECT,
    },
    theme::{self, SpanStyle},
};

// ── Class identity ────────────────────────────────────────────────────────────

/// Name of the registered window class.
pub const CLASS_NAME: &str = "WgQuickSyntaxEdit";
const CLASS_NAME_W: PCWSTR = w!("WgQuickSyntaxEdit");

/// Rich Edit 4.1+ class exported by msftedit.dll.
const BASE_CLASS_NAME: PCWSTR = w!("RICHEDIT50W");

const FONT_FACE: &str = "Consolas";

const WM_REFLECT_COMMAND: u32 = WM_REFLECT + WM_COMMAND;

/// What the superclass needs from `RICHEDIT50W` once registered.
struct BaseClass {
    wnd_proc: WNDPROC,
    /// Offset of our state pointer: right after rich-edit's own extra bytes.
    state_offset: i32,
}

static BASE_CLASS: OnceLock<BaseClass> = OnceLock::new();

// ── Registration ──────────────────────────────────────────────────────────────

/// Register the `WgQuickSyntaxEdit` window class.
///
/// Calling this again after a success is a no-op that returns `Ok(())`.
/// Windows created from the class must use [`SYNTAXEDIT_STYLE`] and
/// [`SYNTAXEDIT_EXTSTYLE`].
pub fn register() -> Result<()> {
    if BASE_CLASS.get().is_some() {
        trace!("syntax edit class already registered");
        return Ok(());
    }

    // SAFETY: w!() yields a static NUL-terminated string.  The module is
    // never freed: the superclass depends on it for the process lifetime.
    unsafe { LoadLibraryW(w!("msftedit.dll")) }.map_err(win32_err("LoadLibraryW (msftedit.dll)"))?;

    let mut base = WNDCLASSEXW {
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        ..Default::default()
    };
    // SAFETY: &mut base is a valid, correctly sized WNDCLASSEXW; system
    // classes are looked up with a null instance.
    unsafe { GetClassInfoExW(HINSTANCE::default(), BASE_CLASS_NAME, &mut base) }
        .map_err(win32_err("GetClassInfoExW (RICHEDIT50W)"))?;

    let class = WNDCLASSEXW {
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        // CS_GLOBALCLASS lets hosts pass any HINSTANCE to CreateWindowExW.
        style: base.style | CS_GLOBALCLASS,
        lpfnWndProc: Some(wnd_proc),
        cbClsExtra: base.cbClsExtra,
        cbWndExtra: base.cbWndExtra + std::mem::size_of::<isize>() as i32,
        hInstance: module_instance()?,
        hIcon: base.hIcon,
        hCursor: base.hCursor,
        hbrBackground: base.hbrBackground,
        lpszMenuName: PCWSTR::null(),
        lpszClassName: CLASS_NAME_W,
        hIconSm: base.hIconSm,
    };

    // SAFETY: class is fully initialised; CLASS_NAME_W is a static string.
    let atom = unsafe { RegisterClassExW(&class) };
    if atom == 0 {
        // SAFETY: read immediately after the failing call.
        let code = unsafe { GetLastError() };
        if code != ERROR_CLASS_ALREADY_EXISTS {
            return Err(last_error("RegisterClassExW"));
        }
        debug!("{CLASS_NAME} was registered elsewhere in this process");
    }

    // A concurrent registration would have stored identical values.
    let _ = BASE_CLASS.set(BaseClass {
        wnd_proc: base.lpfnWndProc,
        state_offset: base.cbWndExtra,
    });
    info!(class = CLASS_NAME, "registered syntax edit window class");
    Ok(())
}

/// Boolean form of [`register`]: `true` on success, `false` (after logging
/// the cause) when the class could not be registered.
pub fn register_syntax_edit() -> bool {
    match register() {
        Ok(()) => true,
        Err(e) => {
            error!("cannot register {CLASS_NAME}: {e}");
            false
        }
    }
}

// ── Message reflection ────────────────────────────────────────────────────────

/// Bounce a child notification back to the syntax edit that sent it.
///
/// Call from the parent's window procedure for `WM_COMMAND` and `WM_NOTIFY`.
/// Returns the child's result when the message came from a syntax edit, or
/// `None` when the parent should handle it itself.
pub fn reflect_notification(msg: u32, wparam: WPARAM, lparam: LPARAM) -> Option<LRESULT> {
    let child = match msg {
        WM_COMMAND => HWND(lparam.0 as *mut c_void),
        WM_NOTIFY if lparam.0 != 0 => {
            // SAFETY: for WM_NOTIFY, LPARAM points to an NMHDR owned by the
            // sender for the duration of the message.
            unsafe { (*(lparam.0 as *const NMHDR)).hwndFrom }
        }
        _ => return None,
    };
    if child.0.is_null() || !is_syntax_edit(child) {
        return None;
    }
    // SAFETY: child is a live syntax edit window (class check above).
    Some(unsafe { SendMessageW(child, WM_REFLECT + msg, wparam, lparam) })
}

/// Whether `hwnd` was created from the `WgQuickSyntaxEdit` class.
pub fn is_syntax_edit(hwnd: HWND) -> bool {
    let mut buf = [0u16; 64];
    // SAFETY: buf is writable for its full length; an invalid hwnd makes
    // GetClassNameW return 0.
    let len = unsafe { GetClassNameW(hwnd, &mut buf) };
    len > 0 && String::from_utf16_lossy(&buf[..len as usize]) == CLASS_NAME
}

// ── Per-window state ──────────────────────────────────────────────────────────

type PrivateKeyCallback = Box<dyn Fn(Option<&str>)>;

struct InstanceState {
    dark: Cell<bool>,
    font_size_pt: Cell<u32>,
    highlighting: Cell<bool>,
    /// `None` until the first notification; then the key last reported.
    last_key: RefCell<Option<Option<String>>>,
    on_private_key: RefCell<Option<PrivateKeyCallback>>,
}

impl InstanceState {
    fn new() -> Self {
        Self {
            dark: Cell::new(false),
            font_size_pt: Cell::new(DEFAULT_FONT_SIZE_PT),
            highlighting: Cell::new(false),
            last_key: RefCell::new(None),
            on_private_key: RefCell::new(None),
        }
    }
}

/// Borrow the state of a syntax edit window.  The returned `Rc` keeps it
/// alive even if the window is destroyed while a handler is running.
///
/// # Safety
/// `hwnd` must be a window of our class (or return `None` for a null slot).
unsafe fn instance_state(hwnd: HWND) -> Option<Rc<InstanceState>> {
    let base = BASE_CLASS.get()?;
    let ptr = window_slot(hwnd, base.state_offset) as *const InstanceState;
    if ptr.is_null() {
        return None;
    }
    // The slot owns one strong count; hand out another.
    Rc::increment_strong_count(ptr);
    Some(Rc::from_raw(ptr))
}

unsafe fn attach_state(hwnd: HWND, base: &BaseClass) {
    let ptr = Rc::into_raw(Rc::new(InstanceState::new()));
    set_window_slot(hwnd, base.state_offset, ptr as isize);
}

unsafe fn release_state(hwnd: HWND, base: &BaseClass) {
    let ptr = window_slot(hwnd, base.state_offset) as *const InstanceState;
    if !ptr.is_null() {
        set_window_slot(hwnd, base.state_offset, 0);
        drop(Rc::from_raw(ptr));
    }
}

// ── Window procedure ──────────────────────────────────────────────────────────

// SAFETY: wnd_proc is registered as lpfnWndProc of the superclass.  Windows
// guarantees hwnd, msg, wparam and lparam are valid for this call.
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let Some(base) = BASE_CLASS.get() else {
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    };

    match msg {
        WM_NCCREATE => {
            attach_state(hwnd, base);
            let result = CallWindowProcW(base.wnd_proc, hwnd, msg, wparam, lparam);
            if result.0 == 0 {
                release_state(hwnd, base);
            }
            result
        }

        WM_NCDESTROY => {
            let result = CallWindowProcW(base.wnd_proc, hwnd, msg, wparam, lparam);
            release_state(hwnd, base);
            result
        }

        WM_CREATE => {
            let result = CallWindowProcW(base.wnd_proc, hwnd, msg, wparam, lparam);
            if result.0 != -1 {
                init_control(hwnd);
                rehighlight(hwnd);
            }
            result
        }

        WM_SETTEXT | EM_SETTEXTEX => {
            let result = CallWindowProcW(base.wnd_proc, hwnd, msg, wparam, lparam);
            rehighlight(hwnd);
            result
        }

        // Rich text from the clipboard would bring its own fonts and colours.
        WM_PASTE => {
            paste_plain_text(hwnd);
            LRESULT(0)
        }
        WM_KEYDOWN if is_paste_shortcut(wparam) => {
            paste_plain_text(hwnd);
            LRESULT(0)
        }

        _ if is_reflected(msg) => {
            if msg == WM_REFLECT_COMMAND && hiword(wparam) == EN_CHANGE {
                rehighlight(hwnd);
            }
            LRESULT(0)
        }

        _ => CallWindowProcW(base.wnd_proc, hwnd, msg, wparam, lparam),
    }
}

fn hiword(wparam: WPARAM) -> u32 {
    ((wparam.0 >> 16) & 0xFFFF) as u32
}

fn is_paste_shortcut(wparam: WPARAM) -> bool {
    let down = |vk: VIRTUAL_KEY| {
        // SAFETY: GetKeyState reads the calling thread's input state.
        unsafe { GetKeyState(vk.0 as i32) < 0 }
    };
    let key = wparam.0 as u16;
    (key == u16::from(b'V') && down(VK_CONTROL))
        || (key == VK_INSERT.0 && down(VK_SHIFT) && !down(VK_CONTROL))
}

// ── Control set-up ────────────────────────────────────────────────────────────

unsafe fn init_control(hwnd: HWND) {
    let Some(state) = instance_state(hwnd) else {
        return;
    };
    // EM_SETTEXTMODE only works on an empty control, so text given to
    // CreateWindowExW (or a dialog template) is set aside and put back.
    // WM_CREATE re-highlights once afterwards.
    state.highlighting.set(true);
    let initial = get_text(hwnd);
    if !initial.is_empty() {
        send_set_text(hwnd, "");
    }
    // Rich text stays on so spans can be coloured; one code page keeps
    // positions in UTF-16 units.
    let _ = SendMessageW(
        hwnd,
        EM_SETTEXTMODE,
        WPARAM(TM_RICHTEXT | TM_MULTILEVELUNDO | TM_SINGLECODEPAGE),
        LPARAM(0),
    );
    if !initial.is_empty() {
        send_set_text(hwnd, &initial);
    }
    state.highlighting.set(false);

    let _ = SendMessageW(hwnd, EM_SETEVENTMASK, WPARAM(0), LPARAM(ENM_CHANGE as isize));
    apply_base_format(hwnd, &state);
}

/// Font, size, base colour and background for the whole control.
unsafe fn apply_base_format(hwnd: HWND, state: &InstanceState) {
    let _undo = UndoSuspended::new(hwnd);
    let dark = state.dark.get();
    let mut cf = CharFormatW::new(CFM_FACE | CFM_SIZE | CFM_COLOR);
    cf.set_face(FONT_FACE);
    cf.y_height = state.font_size_pt.get() as i32 * TWIPS_PER_POINT;
    cf.cr_text_color = theme::foreground(dark);
    set_char_format(hwnd, SCF_DEFAULT, &cf);
    set_char_format(hwnd, SCF_ALL, &cf);
    let _ = SendMessageW(
        hwnd,
        EM_SETBKGNDCOLOR,
        WPARAM(0),
        LPARAM(theme::background(dark) as isize),
    );
}

unsafe fn set_char_format(hwnd: HWND, scope: usize, cf: &CharFormatW) {
    let _ = SendMessageW(
        hwnd,
        EM_SETCHARFORMAT,
        WPARAM(scope),
        LPARAM(cf as *const CharFormatW as isize),
    );
}

fn span_format(style: SpanStyle) -> CharFormatW {
    let mut cf = CharFormatW::new(CFM_COLOR | CFM_BOLD | CFM_ITALIC | CFM_UNDERLINE);
    cf.cr_text_color = style.color;
    if style.bold {
        cf.dw_effects |= CFE_BOLD;
    }
    if style.italic {
        cf.dw_effects |= CFE_ITALIC;
    }
    if style.underline {
        cf.dw_effects |= CFE_UNDERLINE;
    }
    cf
}

unsafe fn paste_plain_text(hwnd: HWND) {
    trace!("pasting clipboard as plain text");
    let _ = SendMessageW(hwnd, EM_PASTESPECIAL, WPARAM(CF_UNICODETEXT), LPARAM(0));
}

// ── Text access ───────────────────────────────────────────────────────────────

/// The document as rich-edit stores it (line breaks are a bare `\r`).
unsafe fn get_text(hwnd: HWND) -> String {
    let gtl = GetTextLengthEx {
        flags: GTL_NUMCHARS | GTL_PRECISE,
        codepage: CP_UNICODE,
    };
    let len = SendMessageW(
        hwnd,
        EM_GETTEXTLENGTHEX,
        WPARAM(&gtl as *const GetTextLengthEx as usize),
        LPARAM(0),
    )
    .0;
    if len <= 0 {
        return String::new();
    }
    let len = len as usize;

    let mut buf = vec![0u16; len + 1];
    let gt = GetTextEx {
        cb: (buf.len() * std::mem::size_of::<u16>()) as u32,
        flags: GT_DEFAULT,
        codepage: CP_UNICODE,
        lp_default_char: std::ptr::null(),
        lp_used_def_char: std::ptr::null_mut(),
    };
    let copied = SendMessageW(
        hwnd,
        EM_GETTEXTEX,
        WPARAM(&gt as *const GetTextEx as usize),
        LPARAM(buf.as_mut_ptr() as isize),
    )
    .0;
    buf.truncate(copied.clamp(0, len as isize) as usize);
    String::from_utf16_lossy(&buf)
}

/// Replace the document with `text` through EM_SETTEXTEX.
unsafe fn send_set_text(hwnd: HWND, text: &str) {
    let wide = U16CString::from_str_truncate(text);
    let st = SetTextEx {
        flags: ST_DEFAULT,
        codepage: CP_UNICODE,
    };
    // SAFETY: st and wide outlive the synchronous call.
    let _ = SendMessageW(
        hwnd,
        EM_SETTEXTEX,
        WPARAM(&st as *const SetTextEx as usize),
        LPARAM(wide.as_ptr() as isize),
    );
}

// ── Undo suspension ───────────────────────────────────────────────────────────

/// The control's TOM document, if it exposes one.
unsafe fn text_document(hwnd: HWND) -> Option<ITextDocument> {
    let mut raw: *mut c_void = std::ptr::null_mut();
    let ok = SendMessageW(
        hwnd,
        EM_GETOLEINTERFACE,
        WPARAM(0),
        LPARAM(&mut raw as *mut *mut c_void as isize),
    );
    if ok.0 == 0 || raw.is_null() {
        trace!("EM_GETOLEINTERFACE returned no interface");
        return None;
    }
    // EM_GETOLEINTERFACE hands out an AddRef'd IRichEditOle.
    let ole = IUnknown::from_raw(raw);
    ole.cast::<ITextDocument>().ok()
}

/// Stops the undo manager from recording while alive, so colouring never
/// shows up as an undo step.  Must not be nested: resume is not counted.
struct UndoSuspended(Option<ITextDocument>);

impl UndoSuspended {
    unsafe fn new(hwnd: HWND) -> Self {
        let document = text_document(hwnd);
        if let Some(doc) = &document {
            let _ = doc.Undo(tomSuspend.0);
        }
        Self(document)
    }
}

impl Drop for UndoSuspended {
    fn drop(&mut self) {
        if let Some(doc) = &self.0 {
            // SAFETY: the guard never outlives the message handler that
            // created it, so the control is still alive.
            unsafe {
                let _ = doc.Undo(tomResume.0);
            }
        }
    }
}

// ── Highlighting ──────────────────────────────────────────────────────────────

unsafe fn rehighlight(hwnd: HWND) {
    let Some(state) = instance_state(hwnd) else {
        return;
    };
    // Formatting below can re-enter through EN_CHANGE.
    if state.highlighting.replace(true) {
        return;
    }

    let text = get_text(hwnd);
    let spans = highlight::highlight(&text);
    let ranges = highlight::utf16_ranges(&text, &spans);
    let dark = state.dark.get();

    let undo = UndoSuspended::new(hwnd);
    let event_mask = SendMessageW(hwnd, EM_SETEVENTMASK, WPARAM(0), LPARAM(0));
    let _ = SendMessageW(hwnd, WM_SETREDRAW, WPARAM(0), LPARAM(0));

    let mut selection = CharRange::default();
    let mut scroll = POINT::default();
    let _ = SendMessageW(
        hwnd,
        EM_EXGETSEL,
        WPARAM(0),
        LPARAM(&mut selection as *mut CharRange as isize),
    );
    let _ = SendMessageW(
        hwnd,
        EM_GETSCROLLPOS,
        WPARAM(0),
        LPARAM(&mut scroll as *mut POINT as isize),
    );

    set_char_format(hwnd, SCF_ALL, &span_format(SpanStyle::plain(theme::foreground(dark))));
    for (span, range) in spans.iter().zip(&ranges) {
        let chars = CharRange {
            cp_min: range.start as i32,
            cp_max: range.end as i32,
        };
        let _ = SendMessageW(
            hwnd,
            EM_EXSETSEL,
            WPARAM(0),
            LPARAM(&chars as *const CharRange as isize),
        );
        set_char_format(hwnd, SCF_SELECTION, &span_format(theme::span_style(span.kind, dark)));
    }

    let _ = SendMessageW(
        hwnd,
        EM_EXSETSEL,
        WPARAM(0),
        LPARAM(&selection as *const CharRange as isize),
    );
    let _ = SendMessageW(
        hwnd,
        EM_SETSCROLLPOS,
        WPARAM(0),
        LPARAM(&scroll as *const POINT as isize),
    );
    let _ = SendMessageW(hwnd, WM_SETREDRAW, WPARAM(1), LPARAM(0));
    let _ = InvalidateRect(hwnd, None, BOOL::from(true));
    let _ = SendMessageW(hwnd, EM_SETEVENTMASK, WPARAM(0), LPARAM(event_mask.0));
    drop(undo);

    state.highlighting.set(false);
    trace!(spans = spans.len(), chars = text.len(), "re-highlighted");

    notify_private_key(hwnd, &state, highlight::private_key_from_spans(&text, &spans));
}

/// Report `key` to the parent and the owner callback if it changed.
unsafe fn notify_private_key(hwnd: HWND, state: &InstanceState, key: Option<String>) {
    {
        let mut last = state.last_key.borrow_mut();
        if last.as_ref() == Some(&key) {
            return;
        }
        *last = Some(key.clone());
    }
    debug!(present = key.is_some(), "private key changed");

    if let Ok(parent) = GetParent(hwnd) {
        let wide = key.as_deref().map(U16CString::from_str_truncate);
        let lparam = wide.as_ref().map_or(0, |w| w.as_ptr() as isize);
        // SAFETY: wide outlives the synchronous SendMessageW call.
        let _ = SendMessageW(parent, SE_PRIVATE_KEY, WPARAM(hwnd.0 as usize), LPARAM(lparam));
    }

    // Taken out while running so the callback may replace itself.
    if let Some(callback) = state.on_private_key.take() {
        callback(key.as_deref());
        let mut slot = state.on_private_key.borrow_mut();
        if slot.is_none() {
            *slot = Some(callback);
        }
    }
}

// ── SyntaxEdit ────────────────────────────────────────────────────────────────

/// A syntax edit child window.
///
/// The `HWND` is destroyed by Windows together with its parent; this handle
/// does not own it.
pub struct SyntaxEdit {
    hwnd: HWND,
}

impl SyntaxEdit {
    /// Register the class if needed and create a control inside `parent`
    /// with control identifier `id`.  The window starts with zero size.
    pub fn create(parent: HWND, id: u16) -> Result<Self> {
        register()?;
        let hinstance = module_instance()?;

        // SAFETY: the class was registered above; parent is a live window
        // supplied by the caller.  For child windows HMENU carries the id.
        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE(SYNTAXEDIT_EXTSTYLE.bits()),
                CLASS_NAME_W,
                PCWSTR::null(),
                WINDOW_STYLE(SYNTAXEDIT_STYLE.bits()),
                0,
                0,
                0,
                0,
                parent,
                HMENU(usize::from(id) as *mut c_void),
                hinstance,
                None,
            )
        }
        .map_err(win32_err("CreateWindowExW (syntax edit)"))?;

        debug!(id, "created syntax edit");
        Ok(Self { hwnd })
    }

    /// Wrap an existing syntax edit window, e.g. one created from a dialog
    /// template.
    pub fn from_hwnd(hwnd: HWND) -> Result<Self> {
        if is_syntax_edit(hwnd) {
            Ok(Self { hwnd })
        } else {
            Err(SyntaxEditError::Win32 {
                function: "SyntaxEdit::from_hwnd",
                code: windows::Win32::Foundation::ERROR_INVALID_WINDOW_HANDLE.0,
            })
        }
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    /// Replace the whole document; the control re-highlights itself.
    pub fn set_text(&self, text: &str) {
        // SAFETY: hwnd is a live syntax edit.
        unsafe { send_set_text(self.hwnd, text) }
    }

    /// The document text.  Line breaks come back as `\r`.
    pub fn text(&self) -> String {
        // SAFETY: hwnd is a live syntax edit.
        unsafe { get_text(self.hwnd) }
    }

    /// Switch palettes and recolour.
    pub fn set_dark_mode(&self, dark: bool) {
        // SAFETY: hwnd is a live window of our class.
        unsafe {
            if let Some(state) = instance_state(self.hwnd) {
                state.dark.set(dark);
                apply_base_format(self.hwnd, &state);
            }
            rehighlight(self.hwnd);
        }
    }

    pub fn set_font_size(&self, points: u32) {
        // SAFETY: hwnd is a live window of our class.
        unsafe {
            if let Some(state) = instance_state(self.hwnd) {
                state.font_size_pt.set(points);
                apply_base_format(self.hwnd, &state);
            }
            rehighlight(self.hwnd);
        }
    }

    /// Recolour the document now, e.g. for hosts that don't reflect
    /// notifications.
    pub fn rehighlight(&self) {
        // SAFETY: hwnd is a live window of our class.
        unsafe { rehighlight(self.hwnd) }
    }

    /// The private key last reported, if any.
    pub fn private_key(&self) -> Option<String> {
        // SAFETY: hwnd is a live window of our class.
        let state = unsafe { instance_state(self.hwnd) }?;
        let last = state.last_key.borrow();
        last.clone().flatten()
    }

    /// Call `callback` whenever the private key changes.  If the control has
    /// already reported a key (or its absence) the callback runs once right
    /// away with it.  Replaces any previous callback.
    pub fn on_private_key_changed<F>(&self, callback: F)
    where
        F: Fn(Option<&str>) + 'static,
    {
        // SAFETY: hwnd is a live window of our class.
        let Some(state) = (unsafe { instance_state(self.hwnd) }) else {
            return;
        };
        let current = state.last_key.borrow().clone();
        if let Some(key) = current {
            callback(key.as_deref());
        }
        *state.on_private_key.borrow_mut() = Some(Box::new(callback));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use windows::Win32::UI::WindowsAndMessaging::{
        DestroyWindow, GetWindowLongW, ES_MULTILINE, ES_WANTRETURN, GWL_EXSTYLE, GWL_STYLE,
        WS_BORDER, WS_CHILD, WS_CLIPSIBLINGS, WS_EX_CLIENTEDGE, WS_HSCROLL, WS_OVERLAPPED,
        WS_TABSTOP, WS_VISIBLE, WS_VSCROLL,
    };

    use crate::styles::EditStyle;

    const DEMO_KEY: &str = "6KpcbNFK4tKBciKBT2Rj6Z/sHBqxdV+p+nuNA5AlWGI=";
    const DEMO: &str = "[Interface]\nPrivateKey = 6KpcbNFK4tKBciKBT2Rj6Z/sHBqxdV+p+nuNA5AlWGI=\n";

    // richedit.h: ES_NOOLEDRAGDROP is not part of the WindowsAndMessaging set.
    const ES_NOOLEDRAGDROP: u32 = 0x0000_0008;
    // winuser.h edit messages.
    const EM_REPLACESEL: u32 = 0x00C2;
    const EM_UNDO: u32 = 0x00C7;

    #[test]
    fn constants_match_sdk_headers() {
        use windows::Win32::UI::WindowsAndMessaging as wm;

        let style = (WS_CHILD
            | WS_CLIPSIBLINGS
            | WS_VISIBLE
            | WS_VSCROLL
            | WS_HSCROLL
            | WS_BORDER
            | WS_TABSTOP)
            .0
            | ES_MULTILINE as u32
            | ES_WANTRETURN as u32
            | ES_NOOLEDRAGDROP;
        assert_eq!(SYNTAXEDIT_STYLE.bits(), style);
        assert_eq!(SYNTAXEDIT_EXTSTYLE.bits(), WS_EX_CLIENTEDGE.0);
        assert_eq!(WM_REFLECT, wm::WM_USER + 0x1C00);
        assert_eq!(SE_PRIVATE_KEY, wm::WM_USER + 0x3100);
        assert_eq!(WM_COMMAND, wm::WM_COMMAND);
        assert_eq!(WM_NOTIFY, wm::WM_NOTIFY);
    }

    fn host_window() -> HWND {
        // SAFETY: STATIC is a system class; a hidden top-level window is
        // enough to parent the control.
        unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE(0),
                w!("STATIC"),
                PCWSTR::null(),
                WS_OVERLAPPED,
                0,
                0,
                400,
                300,
                HWND::default(),
                HMENU::default(),
                HINSTANCE::default(),
                None,
            )
        }
        .expect("create host window")
    }

    #[test]
    fn registering_twice_succeeds() {
        assert!(register_syntax_edit());
        assert!(register_syntax_edit());
        assert!(register().is_ok());
    }

    #[test]
    fn created_window_carries_fixed_styles() {
        let host = host_window();
        let edit = SyntaxEdit::create(host, 7).expect("create syntax edit");
        assert!(is_syntax_edit(edit.hwnd()));
        assert!(!is_syntax_edit(host));

        // SAFETY: edit.hwnd() is live until the host is destroyed below.
        let (style, ex_style) = unsafe {
            (
                GetWindowLongW(edit.hwnd(), GWL_STYLE) as u32,
                GetWindowLongW(edit.hwnd(), GWL_EXSTYLE) as u32,
            )
        };
        // Rich edit shows its scroll bars only while the content overflows
        // and Windows mirrors that in WS_HSCROLL/WS_VSCROLL.  Every other
        // bit is exactly the fixed style.
        let scroll = EditStyle::HSCROLL | EditStyle::VSCROLL;
        assert_eq!(style & !scroll.bits(), (SYNTAXEDIT_STYLE - scroll).bits());
        assert_eq!(ex_style, SYNTAXEDIT_EXTSTYLE.bits());

        // SAFETY: host is a window this test created.
        unsafe {
            let _ = DestroyWindow(host);
        }
    }

    #[test]
    fn set_text_reports_private_key() {
        let host = host_window();
        let edit = SyntaxEdit::create(host, 1).expect("create syntax edit");

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        edit.on_private_key_changed(move |k| sink.borrow_mut().push(k.map(str::to_owned)));

        edit.set_text(DEMO);
        assert!(edit.text().contains("[Interface]"));
        assert_eq!(edit.private_key().as_deref(), Some(DEMO_KEY));

        // Same key again: no duplicate notification.
        edit.set_text(DEMO);
        edit.set_text("[Interface]\n");
        // The first entry is the empty control, reported on creation.
        assert_eq!(*seen.borrow(), vec![None, Some(DEMO_KEY.to_owned()), None]);

        // SAFETY: host is a window this test created.
        unsafe {
            let _ = DestroyWindow(host);
        }
    }

    #[test]
    fn initial_window_text_is_highlighted() {
        let host = host_window();
        register().expect("register class");
        let text = U16CString::from_str_truncate(DEMO);

        // SAFETY: the class is registered and host is live.
        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE(SYNTAXEDIT_EXTSTYLE.bits()),
                CLASS_NAME_W,
                PCWSTR(text.as_ptr()),
                WINDOW_STYLE(SYNTAXEDIT_STYLE.bits()),
                0,
                0,
                300,
                200,
                host,
                HMENU(3 as *mut c_void),
                HINSTANCE::default(),
                None,
            )
        }
        .expect("create syntax edit with text");

        let edit = SyntaxEdit::from_hwnd(hwnd).expect("wrap syntax edit");
        assert!(edit.text().contains("PrivateKey"));
        assert_eq!(edit.private_key().as_deref(), Some(DEMO_KEY));

        // SAFETY: host is a window this test created.
        unsafe {
            let _ = DestroyWindow(host);
        }
    }

    #[test]
    fn colouring_is_not_an_undo_step() {
        let host = host_window();
        let edit = SyntaxEdit::create(host, 2).expect("create syntax edit");
        edit.set_text("[Interface]\n");
        let before = edit.text();

        let end = before.encode_utf16().count() as i32;
        let caret = CharRange {
            cp_min: end,
            cp_max: end,
        };
        let typed = U16CString::from_str_truncate(format!("PrivateKey = {DEMO_KEY}"));
        // SAFETY: edit is live; caret and typed outlive the calls.
        unsafe {
            let _ = SendMessageW(
                edit.hwnd(),
                EM_EXSETSEL,
                WPARAM(0),
                LPARAM(&caret as *const CharRange as isize),
            );
            let _ = SendMessageW(
                edit.hwnd(),
                EM_REPLACESEL,
                WPARAM(1),
                LPARAM(typed.as_ptr() as isize),
            );
        }
        edit.rehighlight();
        assert_eq!(edit.private_key().as_deref(), Some(DEMO_KEY));

        // One undo takes back the typing, not a formatting run.
        // SAFETY: edit is live.
        unsafe {
            let _ = SendMessageW(edit.hwnd(), EM_UNDO, WPARAM(0), LPARAM(0));
        }
        assert_eq!(edit.text(), before);

        // SAFETY: host is a window this test created.
        unsafe {
            let _ = DestroyWindow(host);
        }
    }

    #[test]
    fn from_hwnd_rejects_other_classes() {
        let host = host_window();
        assert!(SyntaxEdit::from_hwnd(host).is_err());
        // SAFETY: host is a window this test created.
        unsafe {
            let _ = DestroyWindow(host);
        }
    }
}
