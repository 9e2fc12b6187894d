pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lectern")]
#[command(about = "A terminal viewer for Markdown articles with frontmatter", long_about = None)]
pub struct Cli {
    /// Directory or URL that relative article paths are resolved against
    #[arg(short, long, global = true)]
    pub base: Option<String>,

    /// Config file to use instead of ~/.config/lectern/config.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render an article to the terminal
    Show {
        /// Article path, relative to the base, or an absolute URL
        path: String,

        /// Title to show when the article has none of its own
        #[arg(long)]
        title: Option<String>,
    },
    /// Print an article's frontmatter
    Meta {
        /// Article path, relative to the base, or an absolute URL
        path: String,

        /// Print as a JSON object
        #[arg(long)]
        json: bool,
    },
    /// Write a new article file
    New(NewArgs),
    /// Launch the TUI
    Tui {
        /// Extra article paths to list after the configured library
        paths: Vec<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct NewArgs {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub summary: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    /// Creation date as YYYY-MM-DD (default: today)
    #[arg(long)]
    pub created: Option<String>,

    /// Read the Markdown body from this file
    #[arg(long)]
    pub content_file: Option<PathBuf>,

    /// Start from the sample article
    #[arg(long)]
    pub sample: bool,

    /// Directory to write the article into
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Print the article instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}
