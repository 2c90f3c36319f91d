#[macro_use]
extern crate lazy_static;

use clap::Parser;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use tokio::io;
use tracing_subscriber::EnvFilter;

mod archive;
mod backup;
mod config;
mod error;
mod network;
mod slug;

/// Back up all your IMDb lists (ratings, watchlist and custom lists) into a zip file.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// File with your IMDb cookie [default: imdb_cookie.txt next to the executable]
    cookie_path: Option<PathBuf>,

    /// Exit right away instead of waiting for Enter
    #[arg(long)]
    no_pause: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let conf = config::read_config(Path::new(config::CONFIG_FNAME))
        .map(|c| c.with_overrides(cli.cookie_path.clone(), cli.no_pause));
    let keep_open = match &conf {
        Ok(c) => c.keep_open,
        Err(_) => !cli.no_pause,
    };

    let code = match conf {
        Ok(conf) => match backup::backup(&conf).await {
            Ok(path) => {
                println!("Saved {}", path.display());
                0
            }
            Err(err) => {
                eprintln!("{}", err);
                1
            }
        },
        Err(err) => {
            eprintln!("{}", err);
            1
        }
    };

    if keep_open && std::io::stdin().is_terminal() {
        pause().await;
    }
    process::exit(code);
}

/// Keep a console window opened by double click visible until the user has
/// read the output.
async fn pause() {
    println!();
    println!("Press Enter to exit...");
    let _ = io::AsyncBufReadExt::lines(io::BufReader::new(io::stdin()))
        .next_line()
        .await;
}
