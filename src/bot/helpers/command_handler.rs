use crate::bot::Handler;
use crate::bot::helpers::access;
use crate::bot::helpers::components::ephemeral;
use crate::bot::routes::{InteractionKind, Route};
use crate::commands::{self, error};
use anyhow::Result;
use serenity::all::{CommandInteraction, Context};

/// Route a slash command to its handler
pub async fn handle_slash_command(
    handler: &Handler,
    context: &Context,
    command: &CommandInteraction,
) -> Result<()> {
    let name = command.data.name.as_str();

    let Some(route) = Route::resolve(InteractionKind::SlashCommand, name) else {
        tracing::warn!("[ROUTER] Unknown slash command received: '{}'", name);
        command
            .create_response(&context.http, ephemeral(error::UNKNOWN_INTERACTION))
            .await?;
        return Ok(());
    };

    let member_roles = command
        .member
        .as_ref()
        .map(|member| member.roles.clone())
        .unwrap_or_default();

    if !access::authorize(
        context,
        &handler.config.staff,
        route.access(),
        command.guild_id,
        command.user.id,
        &member_roles,
    )
    .await?
    {
        tracing::info!("[ROUTER] {} denied /{}", command.user.id, name);
        command
            .create_response(&context.http, ephemeral(error::ACCESS_DENIED))
            .await?;
        return Ok(());
    }

    match route {
        Route::AdminCommand => commands::admin::run(handler, context, command).await,
        other => {
            tracing::warn!("[ROUTER] {:?} is not a slash command route", other);
            command
                .create_response(&context.http, ephemeral(error::UNKNOWN_INTERACTION))
                .await?;
            Ok(())
        }
    }
}
