//! Side-effect capabilities the notebook reaches out to: the system
//! clipboard, file downloads and the wall clock.
//!
//! Every capability reports success or failure as a `Result`. Whether a
//! failure matters is the caller's decision.

mod clipboard;
mod clock;
mod download;

pub use clipboard::{Clipboard, SystemClipboard};
pub use clock::{Clock, ManualClock, SystemClock};
pub use download::{DirectoryDownloader, Downloader, MARKDOWN_MIME};
