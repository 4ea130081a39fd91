mod commands;
mod handlers;

pub use commands::{Cli, Commands};
pub use handlers::{
    handle_copy, handle_export, handle_import, handle_open, handle_path, handle_render,
    handle_show, handle_stats,
};
