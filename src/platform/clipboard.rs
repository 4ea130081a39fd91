use std::time::Duration;

use crate::error::{NotebookError, Result};

/// Somewhere text can be copied to.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// The OS clipboard through arboard.
///
/// The handle is opened lazily on the first write and kept afterwards. On
/// X11 and Wayland the copied text is only served while the handle lives, so
/// a process that exits right after copying should use
/// [`holding`](Self::holding).
#[derive(Default)]
pub struct SystemClipboard {
    #[cfg(not(target_os = "android"))]
    inner: Option<arboard::Clipboard>,
    hold: Option<Duration>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard whose writes block until another program takes over the
    /// selection (a clipboard manager, or the next copy) or `hold` runs out.
    /// Only X11 and Wayland need this; elsewhere writes return at once.
    pub fn holding(hold: Duration) -> Self {
        Self {
            hold: Some(hold),
            ..Self::default()
        }
    }

    pub fn hold(&self) -> Option<Duration> {
        self.hold
    }
}

#[cfg(not(target_os = "android"))]
impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()
                .map_err(|e| NotebookError::Clipboard(format!("unavailable: {e}")))?,
        };

        let result = set_text(&mut clipboard, text, self.hold)
            .map_err(|e| NotebookError::Clipboard(e.to_string()));
        self.inner = Some(clipboard);
        result
    }
}

/// Android/Termux has no clipboard arboard can reach.
#[cfg(target_os = "android")]
impl Clipboard for SystemClipboard {
    fn write_text(&mut self, _text: &str) -> Result<()> {
        Err(NotebookError::Clipboard(
            "the system clipboard is unsupported on Android".to_string(),
        ))
    }
}

#[cfg(all(
    unix,
    not(any(target_os = "macos", target_os = "ios", target_os = "android", target_os = "emscripten"))
))]
fn set_text(
    clipboard: &mut arboard::Clipboard,
    text: &str,
    hold: Option<Duration>,
) -> std::result::Result<(), arboard::Error> {
    use arboard::SetExtLinux;
    use std::time::Instant;

    match hold {
        Some(hold) => {
            tracing::debug!(hold_ms = hold.as_millis() as u64, "holding clipboard selection");
            clipboard
                .set()
                .wait_until(Instant::now() + hold)
                .text(text.to_string())
        }
        None => clipboard.set_text(text.to_string()),
    }
}

#[cfg(not(any(
    target_os = "android",
    all(
        unix,
        not(any(target_os = "macos", target_os = "ios", target_os = "android", target_os = "emscripten"))
    )
)))]
fn set_text(
    clipboard: &mut arboard::Clipboard,
    text: &str,
    _hold: Option<Duration>,
) -> std::result::Result<(), arboard::Error> {
    clipboard.set_text(text.to_string())
}
