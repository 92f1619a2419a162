//! Chat log CLI subcommands.
//!
//! `list` prints persisted entries; `clear` deletes them all.

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use confide_types::chat::ChatEntry;
use confide_types::role::Role;

use crate::state::AppState;

/// Chat log subcommands.
#[derive(Subcommand)]
pub enum ChatsCommand {
    /// List persisted chat entries, oldest first.
    #[command(alias = "ls")]
    List {
        /// Only show the most recent N entries.
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Delete every persisted chat entry.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

/// Handle a chats subcommand.
pub async fn handle_chats_command(cmd: ChatsCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        ChatsCommand::List { limit } => list_chats(state, limit, json).await,
        ChatsCommand::Clear { force } => clear_chats(state, force, json).await,
    }
}

/// Keep the last `limit` entries.
fn tail(mut entries: Vec<ChatEntry>, limit: Option<usize>) -> Vec<ChatEntry> {
    if let Some(limit) = limit {
        let skip = entries.len().saturating_sub(limit);
        entries.drain(..skip);
    }
    entries
}

async fn list_chats(state: &AppState, limit: Option<usize>, json: bool) -> Result<()> {
    let entries = tail(state.relay.recorder().list_all().await?, limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!();
        println!("  {} The chat log is empty.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Time").fg(Color::White),
        Cell::new("Client").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for entry in &entries {
        let client_cell = match entry.client.parse::<Role>() {
            Ok(Role::Counselor) => Cell::new(&entry.client).fg(Color::Cyan),
            Ok(Role::Student) => Cell::new(&entry.client).fg(Color::Green),
            Err(_) => Cell::new(&entry.client).fg(Color::DarkGrey),
        };

        table.add_row(vec![
            Cell::new(entry.id),
            Cell::new(entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
            client_cell,
            Cell::new(&entry.message),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!("  {} entries", style(entries.len()).bold());
    println!();

    Ok(())
}

async fn clear_chats(state: &AppState, force: bool, json: bool) -> Result<()> {
    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Permanently delete {} chat entries?",
                style("all").red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let removed = state.relay.recorder().clear_all().await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"message": "All chats have been cleared.", "removed": removed})
        );
    } else {
        println!(
            "  {} All chats have been cleared ({removed} removed).",
            style("✓").red().bold()
        );
    }

    Ok(())
}
