//! UART logging for ESP32 firmware
//!
//! Routes the `log` facade to `esp-println`. Call once at startup, before
//! building the composer, so setup warnings are not lost.

pub use log::LevelFilter;

/// Install the UART logger with the given maximum level
pub fn init(level: LevelFilter) {
    esp_println::logger::init_logger(level);
}
