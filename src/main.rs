//! `kanban` - terminal client for a REST-backed kanban board.
//!
//! Environment variables:
//! - KANBAN_API_URL: API base URL (default http://localhost:3000/api)
//! - RUST_LOG: log filter (default warn)
//!
//! Exit codes:
//! - 0: Success
//! - 1: The operation was rejected or failed

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use kanban_client::{
    find_card, BoardSession, ClientConfig, HttpBoardApi, Outcome, SessionState,
};

mod cli;

use cli::{Cli, Commands};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("kanban_client=debug,kanban=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_board(state: &SessionState) {
    let Some(board) = &state.board else {
        println!("No board loaded yet");
        return;
    };

    println!("{}", board.name);
    println!("Board ID: {} - {} cards", board.id, state.cards_count());
    for (status, cards) in state.columns.iter() {
        println!();
        println!("{} ({})", status.label(), cards.len());
        for card in cards {
            println!("  {}. {} [{}]", card.order + 1, card.title, card.id);
            if !card.description.is_empty() {
                println!("     {}", card.description);
            }
        }
    }
}

async fn run_command(session: &mut BoardSession<HttpBoardApi>, command: Commands) -> Outcome {
    match command {
        Commands::Show { .. } => Outcome::Applied,
        Commands::CreateBoard { name } => session.create_board(&name).await,
        Commands::RenameBoard { name, .. } => session.rename_board(&name).await,
        Commands::DeleteBoard { .. } => session.delete_board().await,
        Commands::AddCard {
            title,
            description,
            status,
            ..
        } => {
            session.open_create_editor(status);
            session.update_editor(title, description);
            session.submit_editor().await
        }
        Commands::EditCard {
            card,
            title,
            description,
            ..
        } => {
            if let Err(e) = session.open_edit_editor(&card) {
                eprintln!("Error: {}", e);
                return Outcome::Rejected;
            }
            if let Some(editor) = session.state().editor.clone() {
                session.update_editor(
                    title.unwrap_or(editor.title),
                    description.unwrap_or(editor.description),
                );
            }
            session.submit_editor().await
        }
        Commands::DeleteCard { card, .. } => session.delete_card(&card).await,
        Commands::MoveCard {
            card,
            status,
            index,
            ..
        } => {
            let Some(from_status) = find_card(&session.state().columns, &card).map(|c| c.status)
            else {
                eprintln!("Error: card '{}' is not on this board", card);
                return Outcome::Rejected;
            };
            session.drag_start(card, from_status);
            let outcome = match index {
                Some(index) => session.drop_on_card(status, index).await,
                None => session.drop_on_column(status).await,
            };
            session.drag_end();
            outcome
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config = config.with_api_base_url(url);
    }
    if let Some(secs) = cli.timeout {
        config = config.with_request_timeout(Duration::from_secs(secs));
    }
    let api = HttpBoardApi::new(&config).context("Failed to set up the API client")?;
    tracing::debug!("using board api at {}", api.base_url());

    let yes = cli.yes;
    let mut session = BoardSession::new(
        api,
        move |prompt: &str| {
            yes || dialoguer::Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact()
                .unwrap_or(false)
        },
        config,
    );

    if let Some(board_id) = cli.command.board_id() {
        let outcome = session.load_board(board_id).await;
        if outcome != Outcome::Applied {
            if let Some(message) = session.visible_message(Utc::now()) {
                eprintln!("{}", message);
            }
            std::process::exit(1);
        }
    }

    let outcome = run_command(&mut session, cli.command).await;

    if let Some(message) = session.visible_message(Utc::now()) {
        println!("{}", message);
        println!();
    }
    print_board(session.state());

    if matches!(outcome, Outcome::Failed | Outcome::Rejected) {
        std::process::exit(1);
    }
    Ok(())
}
