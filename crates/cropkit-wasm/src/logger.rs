//! `log` backend that writes to the browser console.
//!
//! Core emits through the `log` facade; this maps each level onto the
//! matching `console.*` method so browser devtools can filter them.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            write_console(record.level(), &format_record(record));
        }
    }

    fn flush(&self) {}
}

/// Install the console logger. Safe to call more than once.
pub fn install(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn format_record(record: &Record<'_>) -> String {
    format!("[{}] {}", record.target(), record.args())
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: Level, message: &str) {
    use wasm_bindgen::JsValue;
    use web_sys::console;

    let value = JsValue::from_str(message);
    match level {
        Level::Error => console::error_1(&value),
        Level::Warn => console::warn_1(&value),
        Level::Info => console::info_1(&value),
        Level::Debug => console::log_1(&value),
        Level::Trace => console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_console(level: Level, message: &str) {
    eprintln!("{:<5} {}", level, message);
}
