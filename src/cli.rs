use clap::{Parser, Subcommand};
use kanban_client::Status;

#[derive(Parser)]
#[command(name = "kanban")]
#[command(version, about = "Terminal client for a REST-backed kanban board")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// API base URL (overrides KANBAN_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Give up on a request after this many seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a board and its columns
    Show { board: String },
    /// Create a new, empty board
    CreateBoard { name: String },
    /// Rename a board
    RenameBoard { board: String, name: String },
    /// Delete a board and all its cards
    DeleteBoard { board: String },
    /// Add a card to a board
    AddCard {
        board: String,
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Column for the new card (todo, in-progress, done)
        #[arg(short, long, default_value = "todo")]
        status: Status,
    },
    /// Change a card's title or description
    EditCard {
        board: String,
        card: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a card
    DeleteCard { board: String, card: String },
    /// Move a card to a column, optionally at a position
    MoveCard {
        board: String,
        card: String,
        /// Target column (todo, in-progress, done)
        status: Status,
        /// Position in the target column; defaults to the end
        #[arg(short, long)]
        index: Option<usize>,
    },
}

impl Commands {
    /// Board every command operates on; `None` for board creation
    pub fn board_id(&self) -> Option<&str> {
        match self {
            Self::CreateBoard { .. } => None,
            Self::Show { board }
            | Self::RenameBoard { board, .. }
            | Self::DeleteBoard { board }
            | Self::AddCard { board, .. }
            | Self::EditCard { board, .. }
            | Self::DeleteCard { board, .. }
            | Self::MoveCard { board, .. } => Some(board),
        }
    }
}
