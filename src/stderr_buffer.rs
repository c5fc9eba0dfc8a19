//! Diagnostic output on stderr.
//!
//! Lines are printed only in verbose mode. While the TUI owns the terminal
//! they are held back and flushed once it has been restored.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

static VERBOSE: AtomicBool = AtomicBool::new(false);
static HELD: Mutex<Option<Vec<String>>> = Mutex::new(None);

pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Start holding lines back (call before the TUI takes over the terminal).
pub fn hold() {
    if let Ok(mut guard) = HELD.lock() {
        *guard = Some(Vec::new());
    }
}

/// Stop holding and return everything collected since [`hold`].
pub fn release() -> Vec<String> {
    HELD.lock()
        .ok()
        .and_then(|mut guard| guard.take())
        .unwrap_or_default()
}

/// Emit one line, or store it while held.
pub fn emit(msg: String) {
    if let Ok(mut guard) = HELD.lock() {
        if let Some(held) = guard.as_mut() {
            held.push(msg);
            return;
        }
    }
    eprintln!("{}", msg);
}

/// `eprintln!`-style diagnostics, shown only with `--verbose`.
#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {
        if $crate::stderr_buffer::is_verbose() {
            $crate::stderr_buffer::emit(format!($($arg)*))
        }
    };
}
