//! Platform input handling
//!
//! Browser keys and pointer presses all collapse into one impulse signal.

/// Keys that flap
pub const IMPULSE_KEYS: [&str; 2] = [" ", "ArrowUp"];
/// `KeyboardEvent.code` values accepted alongside `key`
const IMPULSE_CODES: [&str; 2] = ["Space", "ArrowUp"];

/// A raw input as the host reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInput<'a> {
    /// `KeyboardEvent.key` and `KeyboardEvent.code`
    Key { key: &'a str, code: &'a str },
    /// Mouse, pen or touch press anywhere on the canvas
    Pointer,
}

impl RawInput<'_> {
    pub fn is_impulse(&self) -> bool {
        match self {
            RawInput::Key { key, code } => {
                IMPULSE_KEYS.contains(key) || IMPULSE_CODES.contains(code)
            }
            RawInput::Pointer => true,
        }
    }
}
