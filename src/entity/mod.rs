mod document;
mod note;

pub use document::DEFAULT_DOCUMENT;
pub use note::{char_count, word_count, Mode, Note};
