// ── Light/dark span colouring ─────────────────────────────────────────────────
//
// Maps each `SpanKind` to a colour and font effects for the rich-edit
// control.  All colours are COLORREF values (0x00BBGGRR) ready to be written
// into a CHARFORMAT.

use crate::highlight::SpanKind;

// ── Colour macro ──────────────────────────────────────────────────────────────

/// Convert (r, g, b) → Win32 COLORREF.
macro_rules! rgb {
    ($r:expr, $g:expr, $b:expr) => {
        (($b as u32) << 16) | (($g as u32) << 8) | ($r as u32)
    };
}

/// How one span is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanStyle {
    pub color: u32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl SpanStyle {
    pub const fn plain(color: u32) -> Self {
        Self {
            color,
            bold: false,
            italic: false,
            underline: false,
        }
    }

    const fn bold(color: u32) -> Self {
        Self {
            bold: true,
            ..Self::plain(color)
        }
    }

    const fn italic(color: u32) -> Self {
        Self {
            italic: true,
            ..Self::plain(color)
        }
    }

    const fn underline(color: u32) -> Self {
        Self {
            underline: true,
            ..Self::plain(color)
        }
    }
}

// ── Colour palette ────────────────────────────────────────────────────────────

struct Palette {
    bg: u32,
    fg: u32,
    section: u32,
    field: u32,
    key: u32,
    address: u32,
    number: u32,
    comment: u32,
    cmd: u32,
    error: u32,
}

/// Xcode-like light palette the manager has always shipped with.
const LIGHT: Palette = Palette {
    bg: rgb!(0xFF, 0xFF, 0xFF),
    fg: rgb!(0x00, 0x00, 0x00),
    section: rgb!(0x32, 0x6D, 0x74),
    field: rgb!(0x9B, 0x23, 0x93),
    key: rgb!(0x64, 0x38, 0x20),
    address: rgb!(0x0E, 0x0E, 0xFF),
    number: rgb!(0x1C, 0x00, 0xCF),
    comment: rgb!(0x53, 0x65, 0x79),
    cmd: rgb!(0x63, 0x75, 0x89),
    error: rgb!(0xC4, 0x1A, 0x16),
};

/// VS Code Dark+-inspired dark palette.
const DARK: Palette = Palette {
    bg: rgb!(0x1E, 0x1E, 0x1E),
    fg: rgb!(0xD4, 0xD4, 0xD4),
    section: rgb!(0x4E, 0xC9, 0xB0),
    field: rgb!(0xC5, 0x86, 0xC0),
    key: rgb!(0xCE, 0x91, 0x78),
    address: rgb!(0x9C, 0xDC, 0xFE),
    number: rgb!(0xB5, 0xCE, 0xA8),
    comment: rgb!(0x6A, 0x99, 0x55),
    cmd: rgb!(0xDC, 0xDC, 0xAA),
    error: rgb!(0xF4, 0x47, 0x47),
};

fn palette(dark: bool) -> &'static Palette {
    if dark {
        &DARK
    } else {
        &LIGHT
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

pub fn background(dark: bool) -> u32 {
    palette(dark).bg
}

pub fn foreground(dark: bool) -> u32 {
    palette(dark).fg
}

/// Style for a span of `kind` under the light or dark palette.
pub fn span_style(kind: SpanKind, dark: bool) -> SpanStyle {
    let p = palette(dark);
    match kind {
        SpanKind::Section => SpanStyle::bold(p.section),
        SpanKind::Field => SpanStyle::bold(p.field),
        SpanKind::PrivateKey | SpanKind::PublicKey | SpanKind::PresharedKey => {
            SpanStyle::plain(p.key)
        }
        SpanKind::Ip | SpanKind::Host => SpanStyle::plain(p.address),
        SpanKind::Cidr | SpanKind::Port => SpanStyle::plain(p.key),
        SpanKind::Mtu
        | SpanKind::Keepalive
        | SpanKind::Table
        | SpanKind::FwMark
        | SpanKind::SaveConfig => SpanStyle::plain(p.number),
        SpanKind::Comment => SpanStyle::italic(p.comment),
        SpanKind::Delimiter => SpanStyle::plain(p.fg),
        SpanKind::Cmd => SpanStyle::plain(p.cmd),
        SpanKind::Error => SpanStyle::underline(p.error),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
