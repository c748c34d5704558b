// Release builds run as a GUI application (no console window).
// Debug builds keep the console so tracing output is visible.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(windows)]
fn main() {
    use syntaxedit::platform::win32::window;

    init_logging();
    if let Err(e) = window::run() {
        tracing::error!("demo window failed: {e}");
        // The only visible output path in a GUI build.
        window::show_error_dialog(&e.to_string());
        std::process::exit(1);
    }
}

#[cfg(not(windows))]
fn main() {
    init_logging();
    tracing::error!("the syntax edit demo needs Windows");
    std::process::exit(1);
}
