// ── Central error type ────────────────────────────────────────────────────────
//
// Every fallible operation in the crate returns `error::Result<T>`.  The
// boolean registration entry point (`register_syntax_edit`) logs the error
// and collapses it to `false`; everything else propagates with `?`.

/// Every error that the syntax edit control can produce.
#[derive(Debug)]
pub enum SyntaxEditError {
    /// A Win32 API call returned a failure code.
    Win32 {
        /// The name of the failing function, for display purposes.
        function: &'static str,
        /// The raw Win32 error code (`GetLastError()` value) or HRESULT.
        code: u32,
    },

    /// A standard I/O error while reading or writing the settings file.
    Io(std::io::Error),

    /// The settings file could not be encoded or decoded.
    Json(serde_json::Error),
}

impl std::fmt::Display for SyntaxEditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Win32 { function, code } => {
                write!(f, "{function} failed (error {code:#010x})")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "settings format error: {e}"),
        }
    }
}

impl std::error::Error for SyntaxEditError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Win32 { .. } => None,
        }
    }
}

impl From<std::io::Error> for SyntaxEditError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SyntaxEditError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

// Lets `?` work on `windows::core::Result<T>` throughout the platform module.
#[cfg(windows)]
impl From<windows::core::Error> for SyntaxEditError {
    fn from(e: windows::core::Error) -> Self {
        // Win32 errors appear as 0x8007xxxx HRESULTs.
        Self::Win32 {
            function: "windows",
            code: e.code().0 as u32,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SyntaxEditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win32_error_display_includes_function_and_hex_code() {
        let e = SyntaxEditError::Win32 {
            function: "RegisterClassExW",
            code: 1410,
        };
        assert_eq!(e.to_string(), "RegisterClassExW failed (error 0x00000582)");
    }

    #[test]
    fn io_error_exposes_source() {
        use std::error::Error as _;
        let e = SyntaxEditError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "APPDATA not set",
        ));
        assert!(e.source().is_some());
        assert!(e.to_string().starts_with("I/O error"));
    }
}
