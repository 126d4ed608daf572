use crate::bot::helpers::components;
use crate::bot::{Handler, command_registry, component_router, helpers::command_handler};
use crate::commands;
use crate::utils::ticket::is_ticket_channel;
use serenity::all::{Command, CreateMessage, Interaction, Message, Ready};
use serenity::prelude::*;

#[serenity::async_trait]
impl EventHandler for Handler {
    async fn interaction_create(&self, context: Context, interaction: Interaction) {
        let result = match interaction {
            Interaction::Command(ref command) => {
                command_handler::handle_slash_command(self, &context, command).await
            }

            Interaction::Component(ref component) => {
                component_router::route_component_interaction(self, &context, component).await
            }

            Interaction::Modal(ref modal) => {
                component_router::route_modal_interaction(self, &context, modal).await
            }

            _ => Ok(()),
        };

        // Handle errors
        if let Err(e) = result {
            tracing::error!("[ROUTER] There was an error processing an interaction: {:#}", e);

            let message = commands::error::user_message(&e);
            if let Err(send_err) = commands::error::run(&context, &interaction, &message).await {
                tracing::error!("[ROUTER] Failed to send error response to user: {}", send_err);
            }
        }
    }

    async fn message(&self, context: Context, message: Message) {
        if message.author.bot {
            return;
        }

        // Direct messages get the ticket menu.
        if message.guild_id.is_none() {
            let reply = CreateMessage::new()
                .content("Hi! Pick a reason below to open a ticket with the staff team.")
                .components(vec![components::ticket_reason_menu()]);
            if let Err(e) = message.channel_id.send_message(&context.http, reply).await {
                tracing::warn!("[DM] Failed to send ticket menu to {}: {}", message.author.id, e);
            }
            return;
        }

        let channel_name = match message.channel_id.to_channel(&context).await {
            Ok(channel) => match channel.guild() {
                Some(channel) => channel.name,
                None => return,
            },
            Err(e) => {
                tracing::debug!("[LOG] Could not resolve channel {}: {}", message.channel_id, e);
                return;
            }
        };

        if !is_ticket_channel(&channel_name) {
            return;
        }

        let record = format!(
            "[#{}] {} ({}): {}",
            channel_name, message.author.name, message.author.id, message.content
        );
        if let Err(e) = self.message_log.append(&record).await {
            tracing::warn!("[LOG] Failed to write ticket message log: {}", e);
        }
    }

    async fn ready(&self, context: Context, ready: Ready) {
        tracing::info!("[BOT] {} is ready and connected!", ready.user.name);

        let commands_vec = command_registry::get_all_commands();
        let command_count = commands_vec.len();

        match Command::set_global_commands(&context.http, commands_vec).await {
            Ok(_) => tracing::info!(
                "[CMD] Successfully registered {} global commands",
                command_count
            ),
            Err(e) => tracing::error!("[CMD] Failed to register global commands: {}", e),
        }
    }
}
