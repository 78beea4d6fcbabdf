//! Print handler for configurable script output.
//!
//! Output from `print`/`printf` and the introspection dumps goes through
//! the runtime's print handler so it can be directed to stdout (default),
//! captured to a buffer (tests, embedding), or discarded.

use parking_lot::Mutex;

/// Where script output goes. Enum dispatch - no vtable on the hot path.
pub enum PrintHandler {
    /// Write to stdout (default).
    Stdout,
    /// Capture to a buffer for assertions or embedding.
    Buffer(Mutex<String>),
    /// Discard all output silently.
    Silent,
}

impl PrintHandler {
    /// A capturing handler with an empty buffer.
    pub fn buffer() -> Self {
        PrintHandler::Buffer(Mutex::new(String::new()))
    }

    /// Write without a trailing newline.
    pub fn print(&self, msg: &str) {
        match self {
            PrintHandler::Stdout => print!("{msg}"),
            PrintHandler::Buffer(buf) => buf.lock().push_str(msg),
            PrintHandler::Silent => {}
        }
    }

    /// Write with a trailing newline.
    pub fn println(&self, msg: &str) {
        match self {
            PrintHandler::Stdout => println!("{msg}"),
            PrintHandler::Buffer(buf) => {
                let mut buf = buf.lock();
                buf.push_str(msg);
                buf.push('\n');
            }
            PrintHandler::Silent => {}
        }
    }

    /// Captured output so far (empty for non-buffer handlers).
    pub fn output(&self) -> String {
        match self {
            PrintHandler::Buffer(buf) => buf.lock().clone(),
            _ => String::new(),
        }
    }

    /// Clear captured output (no-op for non-buffer handlers).
    pub fn clear(&self) {
        if let PrintHandler::Buffer(buf) = self {
            buf.lock().clear();
        }
    }
}

impl Default for PrintHandler {
    fn default() -> Self {
        PrintHandler::Stdout
    }
}

impl std::fmt::Debug for PrintHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrintHandler::Stdout => write!(f, "PrintHandler::Stdout"),
            PrintHandler::Buffer(_) => write!(f, "PrintHandler::Buffer"),
            PrintHandler::Silent => write!(f, "PrintHandler::Silent"),
        }
    }
}
