//! chatdeck CLI - Command line interface for the chatdeck server.

use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};

use chatdeck_client::HttpClient;
use chatdeck_core::{Chat, ChatId};

/// chatdeck CLI - Chat history management tool
#[derive(Parser)]
#[command(name = "chatdeck")]
#[command(about = "CLI for the chatdeck server", long_about = None)]
struct Cli {
    /// Server address
    #[arg(short, long, default_value = "http://127.0.0.1:3000")]
    addr: String,

    /// Print raw JSON instead of tables
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List chats grouped by recency
    List,

    /// Show a chat and its messages
    Show {
        /// Chat ID
        id: String,
    },

    /// Start a new chat
    New {
        /// First user message
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Send a message to a chat and print the reply
    Send {
        /// Chat ID
        id: String,

        /// Message text
        text: String,

        /// Model to answer with
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Rename a chat
    Rename {
        /// Chat ID
        id: String,

        /// New title
        title: String,
    },

    /// Delete a chat
    Delete {
        /// Chat ID
        id: String,
    },

    /// Make a chat the active one
    Select {
        /// Chat ID
        id: String,
    },

    /// List selectable models
    Models,

    /// Check server health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = HttpClient::new(&cli.addr);

    match cli.command {
        Commands::List => list_chats(&client, cli.json).await?,
        Commands::Show { id } => {
            let chat = client.get_chat(&ChatId::new(id)).await?;
            print!("{}", render_chat(&chat, cli.json)?);
        }
        Commands::New { message } => {
            let chat = client.create_chat(message.as_deref()).await?;
            if !cli.json {
                println!("Chat created:");
            }
            print!("{}", render_chat(&chat, cli.json)?);
        }
        Commands::Send { id, text, model } => {
            let reply = client
                .prompt(&ChatId::new(id), &text, model.as_deref())
                .await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&reply)?);
            } else {
                println!("[{}] {}", reply.model, reply.assistant.text());
            }
        }
        Commands::Rename { id, title } => {
            client.rename_chat(&ChatId::new(id.clone()), &title).await?;
            println!("Chat {} renamed to {:?}", id, title);
        }
        Commands::Delete { id } => {
            client.delete_chat(&ChatId::new(id.clone())).await?;
            println!("Chat {} deleted", id);
        }
        Commands::Select { id } => {
            client.select_chat(Some(&ChatId::new(id.clone()))).await?;
            println!("Active chat: {}", id);
        }
        Commands::Models => list_models(&client, cli.json).await?,
        Commands::Health => {
            if client.health().await? {
                println!("OK");
            } else {
                return Err("server reported unhealthy".into());
            }
        }
    }

    Ok(())
}

async fn list_chats(client: &HttpClient, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let groups = client.grouped_chats().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    let active = client.active_chat().await?;
    for group in groups {
        println!("{} ({}):", group.label, group.chats.len());
        for chat in group.chats {
            let marker = if active.as_ref() == Some(&chat.id) { "*" } else { " " };
            println!(
                "{} {:<36}  {:<4}  {:<16}  {}",
                marker,
                chat.id,
                chat.message_count,
                format_timestamp(&chat.updated_at),
                chat.title
            );
        }
        println!();
    }

    Ok(())
}

async fn list_models(client: &HttpClient, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let response = client.models().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("{:<24}  {:<20}  {}", "VALUE", "LABEL", "DEFAULT");
    println!("{}", "-".repeat(56));
    for model in response.models {
        let default = if model.value == response.default_model { "yes" } else { "" };
        println!("{:<24}  {:<20}  {}", model.value, model.label, default);
    }

    Ok(())
}

/// A chat as pretty JSON, or as an indented detail block.
fn render_chat(chat: &Chat, json: bool) -> Result<String, serde_json::Error> {
    if json {
        return serde_json::to_string_pretty(chat).map(|out| out + "\n");
    }

    let mut out = format!(
        "  ID:         {}\n  Title:      {}\n  Created:    {}\n  Updated:    {}\n",
        chat.id,
        chat.title,
        format_timestamp(&chat.created_at),
        format_timestamp(&chat.updated_at)
    );

    if !chat.messages.is_empty() {
        out.push_str("  Messages:\n");
        for message in &chat.messages {
            out.push_str(&format!("    {:>9}: {}\n", message.role.as_str(), message.text()));
        }
    }
    Ok(out)
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
