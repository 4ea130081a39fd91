use clap::Parser;
use notebook::cli::{
    handle_copy, handle_export, handle_import, handle_open, handle_path, handle_render,
    handle_show, handle_stats, Cli, Commands,
};

fn main() {
    let cli = Cli::parse();
    let home = cli.home;

    let result = match cli.command.unwrap_or(Commands::Open) {
        Commands::Open => handle_open(home),
        Commands::Show { json } => handle_show(home, json),
        Commands::Render => handle_render(home),
        Commands::Stats { json } => handle_stats(home, json),
        Commands::Export { dir, json } => handle_export(home, dir, json),
        Commands::Copy { hold } => handle_copy(home, hold),
        Commands::Import { file, stdin } => handle_import(home, file, stdin),
        Commands::Path => handle_path(home),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
