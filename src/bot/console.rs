use crate::bot::helpers::components;
use crate::commands::{admin, send_message};
use crate::utils::config::Config;
use anyhow::Result;
use serenity::all::ShardManager;
use serenity::http::Http;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleOption {
    DirectMessage,
    PostTicketMenu,
    PostAdminPanel,
    Shutdown,
}

impl ConsoleOption {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::DirectMessage),
            "2" => Some(Self::PostTicketMenu),
            "3" => Some(Self::PostAdminPanel),
            "4" => Some(Self::Shutdown),
            _ => None,
        }
    }
}

const MENU: &str = "\
=== Owner Panel ===
1. Send a direct message to a user
2. Post the ticket menu
3. Post the admin panel
4. Shut down the bot";

/// Operator panel driven from the terminal the bot runs in.
pub struct OwnerConsole {
    http: Arc<Http>,
    config: Arc<Config>,
    shard_manager: Arc<ShardManager>,
}

impl OwnerConsole {
    pub fn new(http: Arc<Http>, config: Arc<Config>, shard_manager: Arc<ShardManager>) -> Self {
        Self {
            http,
            config,
            shard_manager,
        }
    }

    pub async fn run(self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            println!("{}", MENU);
            let Some(line) = prompt(&mut lines, "> ").await? else {
                tracing::info!("[CONSOLE] Input closed, leaving owner panel");
                return Ok(());
            };

            let Some(option) = ConsoleOption::parse(&line) else {
                println!("Unknown option: {}", line.trim());
                continue;
            };

            let outcome = match option {
                ConsoleOption::DirectMessage => self.direct_message(&mut lines).await,
                ConsoleOption::PostTicketMenu => self.post_ticket_menu().await,
                ConsoleOption::PostAdminPanel => self.post_admin_panel().await,
                ConsoleOption::Shutdown => {
                    tracing::info!("[CONSOLE] Shutting down");
                    self.shard_manager.shutdown_all().await;
                    return Ok(());
                }
            };

            if let Err(e) = outcome {
                tracing::error!("[CONSOLE] {:?} failed: {:#}", option, e);
            }
        }
    }

    async fn direct_message(&self, lines: &mut Lines<BufReader<Stdin>>) -> Result<()> {
        let Some(user_id) = prompt(lines, "User ID: ").await? else {
            return Ok(());
        };
        let Some(body) = prompt(lines, "Message: ").await? else {
            return Ok(());
        };

        let message = match send_message::parse_direct_message(&user_id, &body) {
            Ok(message) => message,
            Err(e) => {
                println!("{}", e);
                return Ok(());
            }
        };

        let name = send_message::deliver(
            &self.http,
            self.config.admin_log_channel,
            "Owner console",
            &message,
        )
        .await?;
        println!("Message delivered to {}.", name);
        Ok(())
    }

    async fn post_ticket_menu(&self) -> Result<()> {
        let channel = self
            .config
            .ticket_menu_channel
            .ok_or_else(|| anyhow::anyhow!("TICKET_MENU_CHANNEL_ID is not configured"))?;

        channel
            .send_message(self.http.as_ref(), components::ticket_menu_message())
            .await?;
        println!("Ticket menu posted.");
        Ok(())
    }

    async fn post_admin_panel(&self) -> Result<()> {
        let channel = self
            .config
            .admin_log_channel
            .ok_or_else(|| anyhow::anyhow!("ADMIN_LOG_CHANNEL_ID is not configured"))?;

        channel.send_message(self.http.as_ref(), admin::panel_message()).await?;
        println!("Admin panel posted.");
        Ok(())
    }
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<Option<String>> {
    print!("{}", label);
    std::io::Write::flush(&mut std::io::stdout())?;
    Ok(lines.next_line().await?)
}
