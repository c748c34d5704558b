//! A syntax-highlighting editor control for WireGuard (`wg-quick`) tunnel
//! configurations, built on the Windows rich-edit control.
//!
//! Call [`register_syntax_edit`] once, then create windows of class
//! `WgQuickSyntaxEdit` with [`SYNTAXEDIT_STYLE`] and [`SYNTAXEDIT_EXTSTYLE`],
//! or use [`SyntaxEdit::create`].  The parent is sent [`SE_PRIVATE_KEY`]
//! whenever the `[Interface]` private key in the text changes.

// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32`.
// Each unsafe block there MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

pub mod error;
pub mod highlight;
pub mod keys;
pub mod platform;
pub mod settings;
pub mod styles;
pub mod theme;

pub use error::{Result, SyntaxEditError};
pub use styles::{
    EditExStyle, EditStyle, SE_PRIVATE_KEY, SYNTAXEDIT_EXTSTYLE, SYNTAXEDIT_STYLE, WM_REFLECT,
};

#[cfg(windows)]
pub use platform::win32::syntax_edit::{
    is_syntax_edit, reflect_notification, register, register_syntax_edit, SyntaxEdit, CLASS_NAME,
};
