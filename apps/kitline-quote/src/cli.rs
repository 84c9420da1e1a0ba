use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kitline-quote")]
#[command(about = "Price carts and reprice orders against the Kitline catalog")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Database path (overrides KITLINE_DB_PATH)
    #[arg(long, short = 'd', global = true)]
    pub db: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Price a cart and print the breakdown as JSON
    Quote {
        /// Cart JSON file (array of cart lines), `-` for stdin
        cart: PathBuf,
    },

    /// Recompute an order's total from its items and persist it
    Reprice {
        /// Order id (UUID)
        order_id: String,
    },
}
