// ── Demo host window ──────────────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Register and create a top-level window with a menu bar.
//   • Host one syntax edit plus a "Public key:" label under it.
//   • Reflect WM_COMMAND / WM_NOTIFY back to the syntax edit.
//   • Turn SE_PRIVATE_KEY into a derived public key for the label.
//   • Persist the View > Dark Theme choice.
//   • Run the Win32 message loop.

#![allow(unsafe_code)]

use std::{cell::RefCell, ffi::c_void};

use tracing::{debug, info, warn};
use widestring::U16CString;
use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{BOOL, HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM},
        Graphics::Gdi::{GetStockObject, COLOR_WINDOW, DEFAULT_GUI_FONT, HBRUSH},
        UI::HiDpi::{
            GetDpiForWindow, SetProcessDpiAwarenessContext,
            DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
        },
        UI::WindowsAndMessaging::{
            AppendMenuW, CheckMenuItem, CreateMenu, CreateWindowExW, DefWindowProcW,
            DestroyWindow, DispatchMessageW, GetMenu, GetMessageW, LoadCursorW, LoadIconW,
            MessageBoxW, MoveWindow, PostQuitMessage, RegisterClassExW, SendMessageW, SetMenu,
            SetWindowPos, SetWindowTextW, ShowWindow, TranslateMessage, UpdateWindow,
            CREATESTRUCTW, CS_HREDRAW, CS_VREDRAW, CW_USEDEFAULT, GWLP_USERDATA, HMENU,
            IDC_ARROW, IDI_APPLICATION, MB_ICONERROR, MB_OK, MF_BYCOMMAND, MF_CHECKED, MF_POPUP,
            MF_STRING, MF_UNCHECKED, MSG, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOZORDER, SW_SHOW,
            WINDOW_EX_STYLE, WM_CLOSE, WM_COMMAND, WM_CREATE, WM_DESTROY, WM_DPICHANGED,
            WM_NOTIFY, WM_SETFONT, WM_SIZE, WNDCLASSEXW, WS_CHILD, WS_OVERLAPPEDWINDOW,
            WS_VISIBLE,
        },
    },
};

use super::{
    last_error, module_instance, set_window_slot,
    syntax_edit::{self, SyntaxEdit},
    win32_err, window_slot,
};
use crate::{
    error::Result,
    keys,
    settings::{self, Settings},
    styles::SE_PRIVATE_KEY,
};

// ── Window identity ───────────────────────────────────────────────────────────

const CLASS_NAME: PCWSTR = w!("WgQuickSyntaxEditDemo");
const APP_TITLE: &str = "WireGuard SyntaxEdit";

/// Initial window size in 96-DPI pixels.
const DEFAULT_WIDTH: i32 = 900;
const DEFAULT_HEIGHT: i32 = 800;

/// Margin around the children and height of the label row, at 96 DPI.
const MARGIN: i32 = 8;
const LABEL_HEIGHT: i32 = 20;

/// A tunnel configuration to start from.
pub const DEMO_CONFIG: &str = "[Interface]
PrivateKey = 6KpcbNFK4tKBciKBT2Rj6Z/sHBqxdV+p+nuNA5AlWGI=
Address = 192.168.4.84/24
DNS = 8.8.8.8, 8.8.4.4, 1.1.1.1, 1.0.0.1

[Peer]
PublicKey = JRI8Xc0zKP9kXk8qP84NdUQA04h6DLfFbwJn4g+/PFs=
Endpoint = demo.wireguard.com:12912
AllowedIPs = 0.0.0.0/0
";

// ── Control & command IDs ─────────────────────────────────────────────────────

const IDC_EDIT: u16 = 100;

const IDM_FILE_EXIT: usize = 1001;
const IDM_VIEW_DARK: usize = 2001;
const IDM_HELP_ABOUT: usize = 9001;

// ── Per-window state ──────────────────────────────────────────────────────────

/// Owned through GWLP_USERDATA from WM_CREATE until WM_DESTROY.  Handlers
/// re-enter through SendMessageW, so only shared borrows are handed out.
struct WindowState {
    edit: SyntaxEdit,
    label: HWND,
    settings: RefCell<Settings>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Create the demo window and drive the message loop until it is closed.
pub fn run() -> Result<()> {
    // SAFETY: no window exists yet.  Fails harmlessly when a manifest
    // already chose the awareness.
    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }

    let settings = settings::load().unwrap_or_default();
    debug!(?settings, "loaded settings");

    let hinstance = module_instance()?;
    syntax_edit::register()?;
    register_class(hinstance)?;
    let hwnd = create_window(hinstance, &settings)?;

    // SAFETY: hwnd was just returned by CreateWindowExW and is valid.
    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOW);
        let _ = UpdateWindow(hwnd);
    }
    info!("demo window shown");

    message_loop()
}

/// Show a modal error dialog.  Used by `main()` when `run()` fails.
pub fn show_error_dialog(message: &str) {
    let text = U16CString::from_str_truncate(message);
    let title = U16CString::from_str_truncate(format!("{APP_TITLE}: fatal error"));

    // SAFETY: both strings are NUL-terminated and outlive the call; a null
    // owner is allowed.
    unsafe {
        let _ = MessageBoxW(
            HWND::default(),
            PCWSTR(text.as_ptr()),
            PCWSTR(title.as_ptr()),
            MB_OK | MB_ICONERROR,
        );
    }
}

// ── DPI ───────────────────────────────────────────────────────────────────────

/// Dots per inch of the monitor a window is on.  Layout constants are in
/// 96-DPI pixels and go through [`Dpi::px`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Dpi(u32);

impl Dpi {
    const BASE: Dpi = Dpi(96);

    fn of(hwnd: HWND) -> Self {
        // SAFETY: hwnd is a live window; 0 means the call failed.
        match unsafe { GetDpiForWindow(hwnd) } {
            0 => Self::BASE,
            v => Self(v),
        }
    }

    fn px(self, logical: i32) -> i32 {
        logical * self.0 as i32 / Self::BASE.0 as i32
    }
}

// ── Window class registration ─────────────────────────────────────────────────

fn register_class(hinstance: HINSTANCE) -> Result<()> {
    // SAFETY: IDI_APPLICATION and IDC_ARROW are built-in resources.
    let icon = unsafe { LoadIconW(None, IDI_APPLICATION) }.map_err(win32_err("LoadIconW"))?;
    let cursor = unsafe { LoadCursorW(None, IDC_ARROW) }.map_err(win32_err("LoadCursorW"))?;

    let wndclass = WNDCLASSEXW {
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        style: CS_HREDRAW | CS_VREDRAW,
        lpfnWndProc: Some(wnd_proc),
        cbClsExtra: 0,
        cbWndExtra: 0,
        hInstance: hinstance,
        hIcon: icon,
        hCursor: cursor,
        // System colour brushes are passed as index + 1.
        hbrBackground: HBRUSH((COLOR_WINDOW.0 + 1) as usize as *mut c_void),
        lpszMenuName: PCWSTR::null(),
        lpszClassName: CLASS_NAME,
        hIconSm: icon,
    };

    // SAFETY: wndclass is fully initialised; CLASS_NAME is a static string.
    let atom = unsafe { RegisterClassExW(&wndclass) };
    if atom == 0 {
        return Err(last_error("RegisterClassExW"));
    }
    Ok(())
}

// ── Window creation ───────────────────────────────────────────────────────────

fn create_window(hinstance: HINSTANCE, settings: &Settings) -> Result<HWND> {
    let title = U16CString::from_str_truncate(APP_TITLE);

    // SAFETY: CLASS_NAME was registered above.  `settings` outlives the call;
    // WM_CREATE copies it before CreateWindowExW returns.
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            CLASS_NAME,
            PCWSTR(title.as_ptr()),
            WS_OVERLAPPEDWINDOW,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            DEFAULT_WIDTH,
            DEFAULT_HEIGHT,
            HWND::default(),
            HMENU::default(),
            hinstance,
            Some(settings as *const Settings as *const c_void),
        )
    }
    .map_err(win32_err("CreateWindowExW"))?;

    // Resize to the monitor the window actually landed on.
    let dpi = Dpi::of(hwnd);
    if dpi != Dpi::BASE {
        // SAFETY: hwnd is the window just created.
        unsafe {
            let _ = SetWindowPos(
                hwnd,
                HWND::default(),
                0,
                0,
                dpi.px(DEFAULT_WIDTH),
                dpi.px(DEFAULT_HEIGHT),
                SWP_NOMOVE | SWP_NOZORDER,
            );
        }
    }

    let menu = build_menu(settings.dark_mode)?;
    // SAFETY: hwnd and menu are valid handles.
    unsafe { SetMenu(hwnd, menu) }.map_err(win32_err("SetMenu"))?;

    Ok(hwnd)
}

// ── Menu construction ─────────────────────────────────────────────────────────

fn build_menu(dark: bool) -> Result<HMENU> {
    // SAFETY: every handle passed to AppendMenuW was created just above.
    unsafe {
        let bar = CreateMenu().map_err(win32_err("CreateMenu"))?;

        let file = CreateMenu().map_err(win32_err("CreateMenu"))?;
        AppendMenuW(file, MF_STRING, IDM_FILE_EXIT, w!("E&xit\tAlt+F4"))
            .map_err(win32_err("AppendMenuW"))?;

        let view = CreateMenu().map_err(win32_err("CreateMenu"))?;
        let check = if dark { MF_CHECKED } else { MF_UNCHECKED };
        AppendMenuW(view, MF_STRING | check, IDM_VIEW_DARK, w!("&Dark Theme"))
            .map_err(win32_err("AppendMenuW"))?;

        let help = CreateMenu().map_err(win32_err("CreateMenu"))?;
        AppendMenuW(help, MF_STRING, IDM_HELP_ABOUT, w!("&About…"))
            .map_err(win32_err("AppendMenuW"))?;

        AppendMenuW(bar, MF_POPUP, file.0 as usize, w!("&File"))
            .map_err(win32_err("AppendMenuW"))?;
        AppendMenuW(bar, MF_POPUP, view.0 as usize, w!("&View"))
            .map_err(win32_err("AppendMenuW"))?;
        AppendMenuW(bar, MF_POPUP, help.0 as usize, w!("&Help"))
            .map_err(win32_err("AppendMenuW"))?;

        Ok(bar)
    }
}

// ── Message loop ──────────────────────────────────────────────────────────────

fn message_loop() -> Result<()> {
    let mut msg = MSG::default();
    loop {
        // SAFETY: &mut msg is valid; a null HWND accepts all thread messages.
        let ret = unsafe { GetMessageW(&mut msg, HWND::default(), 0, 0) };
        match ret.0 {
            -1 => return Err(last_error("GetMessageW")),
            0 => break,
            _ => unsafe {
                // SAFETY: msg was filled by a successful GetMessageW.
                let _ = TranslateMessage(&msg);
                let _ = DispatchMessageW(&msg);
            },
        }
    }
    Ok(())
}

// ── Window procedure ──────────────────────────────────────────────────────────

/// # Safety
/// `hwnd` must be a demo window; the slot holds a `Box<WindowState>` or 0.
unsafe fn window_state<'a>(hwnd: HWND) -> Option<&'a WindowState> {
    let ptr = window_slot(hwnd, GWLP_USERDATA.0) as *const WindowState;
    ptr.as_ref()
}

// SAFETY: wnd_proc is registered as lpfnWndProc in WNDCLASSEXW.  Windows
// guarantees hwnd, msg, wparam and lparam are valid for this call.
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        // ── Lifecycle ─────────────────────────────────────────────────────────
        WM_CREATE => {
            let cs = &*(lparam.0 as *const CREATESTRUCTW);
            let settings = (cs.lpCreateParams as *const Settings)
                .as_ref()
                .cloned()
                .unwrap_or_default();
            match on_create(hwnd, settings) {
                Ok(()) => LRESULT(0),
                Err(e) => {
                    warn!("cannot create demo window children: {e}");
                    LRESULT(-1)
                }
            }
        }

        WM_CLOSE => {
            let _ = DestroyWindow(hwnd);
            LRESULT(0)
        }

        WM_DESTROY => {
            let ptr = window_slot(hwnd, GWLP_USERDATA.0) as *mut WindowState;
            if !ptr.is_null() {
                set_window_slot(hwnd, GWLP_USERDATA.0, 0);
                drop(Box::from_raw(ptr));
            }
            PostQuitMessage(0);
            LRESULT(0)
        }

        // ── Layout ────────────────────────────────────────────────────────────
        WM_SIZE => {
            let width = (lparam.0 & 0xFFFF) as i32;
            let height = ((lparam.0 >> 16) & 0xFFFF) as i32;
            if let Some(state) = window_state(hwnd) {
                layout(hwnd, state, width, height);
            }
            LRESULT(0)
        }

        WM_DPICHANGED => {
            // LPARAM points to the suggested window rectangle at the new DPI.
            let r = &*(lparam.0 as *const RECT);
            let _ = SetWindowPos(
                hwnd,
                HWND::default(),
                r.left,
                r.top,
                r.right - r.left,
                r.bottom - r.top,
                SWP_NOZORDER | SWP_NOACTIVATE,
            );
            LRESULT(0)
        }

        // ── Notifications ─────────────────────────────────────────────────────
        WM_COMMAND | WM_NOTIFY => {
            if let Some(result) = syntax_edit::reflect_notification(msg, wparam, lparam) {
                return result;
            }
            if msg == WM_COMMAND {
                on_command(hwnd, wparam.0 & 0xFFFF);
            }
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }

        SE_PRIVATE_KEY => {
            // LPARAM is the sender's NUL-terminated UTF-16 key, or 0.
            let key = if lparam.0 == 0 {
                None
            } else {
                PCWSTR(lparam.0 as *const u16).to_string().ok()
            };
            debug!(present = key.is_some(), "SE_PRIVATE_KEY");
            if let Some(state) = window_state(hwnd) {
                update_public_key_label(state.label, key.as_deref());
            }
            LRESULT(0)
        }

        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────────

unsafe fn on_create(hwnd: HWND, settings: Settings) -> Result<()> {
    let hinstance = module_instance()?;
    let edit = SyntaxEdit::create(hwnd, IDC_EDIT)?;

    let label = CreateWindowExW(
        WINDOW_EX_STYLE(0),
        w!("STATIC"),
        w!("Public key: (unknown)"),
        WS_CHILD | WS_VISIBLE,
        0,
        0,
        0,
        0,
        hwnd,
        HMENU::default(),
        hinstance,
        None,
    )
    .map_err(win32_err("CreateWindowExW (label)"))?;
    let font = GetStockObject(DEFAULT_GUI_FONT);
    let _ = SendMessageW(label, WM_SETFONT, WPARAM(font.0 as usize), LPARAM(1));

    edit.set_font_size(settings.font_size());
    edit.set_dark_mode(settings.dark_mode);
    edit.on_private_key_changed(move |key| set_title(hwnd, key.is_some()));

    let state = Box::new(WindowState {
        edit,
        label,
        settings: RefCell::new(settings),
    });
    set_window_slot(hwnd, GWLP_USERDATA.0, Box::into_raw(state) as isize);

    // Set after the state is attached so SE_PRIVATE_KEY finds the label.
    if let Some(state) = window_state(hwnd) {
        state.edit.set_text(DEMO_CONFIG);
    }
    Ok(())
}

unsafe fn on_command(hwnd: HWND, id: usize) {
    match id {
        IDM_FILE_EXIT => {
            let _ = DestroyWindow(hwnd);
        }
        IDM_VIEW_DARK => {
            if let Some(state) = window_state(hwnd) {
                toggle_dark_mode(hwnd, state);
            }
        }
        IDM_HELP_ABOUT => about_dialog(hwnd),
        _ => {}
    }
}

unsafe fn toggle_dark_mode(hwnd: HWND, state: &WindowState) {
    let dark = {
        let mut settings = state.settings.borrow_mut();
        settings.dark_mode = !settings.dark_mode;
        settings.dark_mode
    };
    state.edit.set_dark_mode(dark);

    let check = if dark { MF_CHECKED } else { MF_UNCHECKED };
    let _ = CheckMenuItem(GetMenu(hwnd), IDM_VIEW_DARK as u32, (MF_BYCOMMAND | check).0);

    if let Err(e) = settings::save(&state.settings.borrow()) {
        warn!("cannot save settings: {e}");
    }
    info!(dark, "theme changed");
}

unsafe fn layout(hwnd: HWND, state: &WindowState, width: i32, height: i32) {
    let dpi = Dpi::of(hwnd);
    let margin = dpi.px(MARGIN);
    let label_height = dpi.px(LABEL_HEIGHT);

    let inner_width = (width - 2 * margin).max(0);
    let edit_height = (height - 3 * margin - label_height).max(0);

    let _ = MoveWindow(
        state.edit.hwnd(),
        margin,
        margin,
        inner_width,
        edit_height,
        BOOL::from(true),
    );
    let _ = MoveWindow(
        state.label,
        margin,
        margin * 2 + edit_height,
        inner_width,
        label_height,
        BOOL::from(true),
    );
}

fn public_key_label(private_key: Option<&str>) -> String {
    match private_key.and_then(keys::public_key_from_base64) {
        Some(public) => format!("Public key: {public}"),
        None => "Public key: (unknown)".to_owned(),
    }
}

unsafe fn update_public_key_label(label: HWND, private_key: Option<&str>) {
    let text = U16CString::from_str_truncate(public_key_label(private_key));
    let _ = SetWindowTextW(label, PCWSTR(text.as_ptr()));
}

fn set_title(hwnd: HWND, has_key: bool) {
    let title = if has_key {
        APP_TITLE.to_owned()
    } else {
        format!("{APP_TITLE} (no private key)")
    };
    let title = U16CString::from_str_truncate(title);
    // SAFETY: hwnd is the demo window that owns the edit raising the
    // callback; title outlives the call.
    unsafe {
        let _ = SetWindowTextW(hwnd, PCWSTR(title.as_ptr()));
    }
}

fn about_dialog(hwnd: HWND) {
    let body = U16CString::from_str_truncate(concat!(
        "WireGuard SyntaxEdit ",
        env!("CARGO_PKG_VERSION"),
        "\n\nA syntax-highlighting editor control for WireGuard tunnel configurations.",
    ));
    // SAFETY: body outlives the call; hwnd is the owner from wnd_proc.
    unsafe {
        let _ = MessageBoxW(hwnd, PCWSTR(body.as_ptr()), w!("About"), MB_OK);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight;

    #[test]
    fn layout_scales_with_dpi() {
        assert_eq!(Dpi::BASE.px(MARGIN), MARGIN);
        assert_eq!(Dpi(144).px(LABEL_HEIGHT), 30);
        assert_eq!(Dpi(192).px(DEFAULT_WIDTH), 1800);
    }

    #[test]
    fn demo_config_has_one_private_key() {
        assert_eq!(
            highlight::private_key(DEMO_CONFIG).as_deref(),
            Some("6KpcbNFK4tKBciKBT2Rj6Z/sHBqxdV+p+nuNA5AlWGI=")
        );
    }

    #[test]
    fn label_text_for_missing_or_bad_key() {
        assert_eq!(public_key_label(None), "Public key: (unknown)");
        assert_eq!(public_key_label(Some("not a key")), "Public key: (unknown)");
    }

    #[test]
    fn label_text_shows_derived_key() {
        assert_eq!(
            public_key_label(Some("dwdtCnMYpX08FsFyUbJmRd9ML4frwJkqsXf7pR25LCo=")),
            "Public key: hSDwCYkwp1R0i33ctD73Wg2/Og0mOBr066SpjqqbTmo="
        );
    }
}
