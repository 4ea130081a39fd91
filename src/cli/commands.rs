use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "notebook")]
#[command(version, about = "A markdown notebook for ideation, in your terminal")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Notebook home directory (defaults to $NOTEBOOK_HOME, then ~/.notebook)
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive notebook (the default)
    Open,

    /// Print the note text
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the note rendered as plain text
    Render,

    /// Show word and character counts
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Save the note as notebook-<date>.md
    Export {
        /// Directory to export into (defaults to the configured export_dir)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Copy the note to the system clipboard
    Copy {
        /// On X11/Wayland, seconds to keep serving the copy if no clipboard
        /// manager takes it over
        #[arg(long, default_value_t = 30, value_name = "SECS")]
        hold: u64,
    },

    /// Replace the note with the contents of a file
    Import {
        /// File to read the new note from
        #[arg(required_unless_present = "stdin", conflicts_with = "stdin")]
        file: Option<PathBuf>,

        /// Read the new note from stdin
        #[arg(long)]
        stdin: bool,
    },

    /// Print where the note is stored
    Path,
}
