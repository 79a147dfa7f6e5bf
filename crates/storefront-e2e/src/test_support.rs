//! Shared unit-test scaffolding: log capture and mock-backed interactions.

use crate::driver::MockDriver;
use crate::interaction::{InteractionTimeouts, Interactions};
use std::io;
use std::sync::{Arc, Mutex};
use tracing::subscriber::DefaultGuard;

#[derive(Clone, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Formatted tracing output of the current thread while alive
pub(crate) struct LogCapture {
    buffer: Buffer,
    _guard: DefaultGuard,
}

impl LogCapture {
    pub(crate) fn start() -> Self {
        let buffer = Buffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        Self {
            buffer,
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }

    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.buffer.0.lock().unwrap().clone()).unwrap()
    }
}

/// Run `f` and return its output with everything it logged
pub(crate) fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let capture = LogCapture::start();
    let out = f();
    (out, capture.contents())
}

/// Base URL the mock-backed helpers resolve paths against
pub(crate) const MOCK_BASE_URL: &str = "https://demo.nopcommerce.com";

/// Interactions over `driver` with demo timeouts
pub(crate) fn mock_ui(driver: MockDriver) -> (Arc<MockDriver>, Interactions) {
    let driver = Arc::new(driver);
    let ui = Interactions::new(driver.clone(), MOCK_BASE_URL, InteractionTimeouts::default());
    (driver, ui)
}
