use log::{LevelFilter, Metadata, Record};

use crate::serial_println;

/// Serial-backed sink for the `log` facade. Safe to use from interrupt
/// context: the underlying serial writer disables interrupts while it
/// holds its lock.
struct SerialLogger;

static LOGGER: SerialLogger = SerialLogger;

impl log::Log for SerialLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        serial_println!("[{:5}] {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

pub fn init() {
    lazy_static::initialize(&crate::serial::SERIAL1);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}
