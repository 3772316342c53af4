use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "qotd")]
#[command(about = "Keep a small quote collection and show one when you need it")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional sync endpoint override
    #[arg(long, value_name = "URL")]
    pub remote: Option<String>,

    /// Quick add: qotd "a line worth keeping"
    #[arg(trailing_var_arg = true)]
    pub quote: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a random quote
    Show {
        /// Pick from this category instead of the saved filter
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Add a new quote
    #[command(alias = "new")]
    Add {
        /// Quote text
        text: Vec<String>,
        /// Category to file the quote under
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Edit an existing quote
    Edit {
        /// Quote ID or unique ID prefix
        id: String,
        /// Replacement text (editor opens when both text and category are omitted)
        text: Vec<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List recent quotes
    List {
        /// Filter by category and save it as the active filter
        #[arg(short, long, conflicts_with = "all")]
        category: Option<String>,
        /// Ignore the saved category filter
        #[arg(long)]
        all: bool,
        /// Number of quotes to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List categories with quote counts
    Categories,
    /// Import quotes from a JSON file
    Import {
        /// Path to the JSON payload
        file: PathBuf,
    },
    /// Export the collection as JSON
    Export {
        /// Output path (quotes.json when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Sync the collection with the remote endpoint
    Sync {
        #[command(subcommand)]
        command: Option<SyncCommands>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum SyncCommands {
    /// Sync on a fixed interval until interrupted
    Watch {
        /// Seconds between sync cycles
        #[arg(short, long, default_value = "30")]
        interval: u64,
    },
    /// List recently resolved sync conflicts
    Conflicts {
        /// Number of conflicts to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
