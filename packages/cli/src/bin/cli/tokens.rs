// ABOUTME: CLI commands for managing API tokens
// ABOUTME: Create, list and revoke the tokens that authorize tag mutations

use clap::Subcommand;
use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use quillpad_cli::{Config, DbState};

#[derive(Subcommand)]
pub enum TokenCommands {
    /// Create a new API token and print it once
    Create {
        /// Human readable label for the token
        name: String,
    },
    /// List all API tokens
    List,
    /// Revoke an API token
    Revoke {
        /// Token ID to revoke
        id: String,
    },
}

pub async fn handle_token_command(command: TokenCommands, config: &Config) -> anyhow::Result<()> {
    let db = DbState::init(&config.database()).await?;

    match command {
        TokenCommands::Create { name } => {
            let generated = db.token_storage.create_token(&name).await?;
            println!("{} Created token '{}'", "✓".green().bold(), generated.name);
            println!("  ID:    {}", generated.id);
            println!("  Token: {}", generated.token.yellow());
            println!();
            println!(
                "{}",
                "Store this token now. It cannot be shown again.".bold()
            );
        }
        TokenCommands::List => {
            let tokens = db.token_storage.list_tokens().await?;
            if tokens.is_empty() {
                println!("{}", "No API tokens found".yellow());
                return Ok(());
            }

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "Name", "Created", "Last used", "Active"]);

            for token in tokens {
                table.add_row(vec![
                    token.id,
                    token.name,
                    token.created_at.format("%Y-%m-%d %H:%M").to_string(),
                    token
                        .last_used_at
                        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| "never".to_string()),
                    if token.is_active { "yes" } else { "no" }.to_string(),
                ]);
            }

            println!("{table}");
        }
        TokenCommands::Revoke { id } => {
            if db.token_storage.revoke_token(&id).await? {
                println!("{} Revoked token {}", "✓".green().bold(), id);
            } else {
                anyhow::bail!("Token {} not found", id);
            }
        }
    }

    Ok(())
}
