use crate::bot::Handler;
use crate::bot::helpers::components::ephemeral;
use crate::utils::permissions::{RoleDirectory, claim_overwrites};
use crate::utils::ticket::TicketError;
use serenity::all::{
    ChannelType, ComponentInteraction, Context, CreateInteractionResponse,
    CreateInteractionResponseMessage, Mentionable,
};

/// Only guild text channels can hold a ticket. An unknown kind is refused.
pub fn is_claimable_channel(kind: Option<ChannelType>) -> bool {
    kind == Some(ChannelType::Text)
}

pub async fn run(
    handler: &Handler,
    context: &Context,
    interaction: &ComponentInteraction,
) -> anyhow::Result<()> {
    let guild_id = interaction.guild_id.ok_or(TicketError::NotATicket)?;

    let kind = match &interaction.channel {
        Some(channel) => Some(channel.kind),
        None => interaction
            .channel_id
            .to_channel(context)
            .await
            .ok()
            .and_then(|channel| channel.guild())
            .map(|channel| channel.kind),
    };
    if !is_claimable_channel(kind) {
        interaction
            .create_response(
                &context.http,
                ephemeral("Tickets can only be claimed inside a text channel."),
            )
            .await?;
        return Ok(());
    }

    let claimer = interaction.user.id;
    let record = handler
        .claim_ticket(interaction.channel_id, claimer, async {
            let roles = guild_id.roles(&context.http).await?;
            let helper =
                RoleDirectory::from_guild(guild_id, &roles).helper(&handler.config.staff)?;

            for overwrite in claim_overwrites(helper, claimer) {
                interaction
                    .channel_id
                    .create_permission(&context.http, overwrite)
                    .await?;
            }
            Ok::<(), anyhow::Error>(())
        })
        .await?;

    let response = CreateInteractionResponseMessage::new().content(format!(
        "{} has claimed ticket #{} and will be assisting you.",
        claimer.mention(),
        record.number
    ));
    interaction
        .create_response(&context.http, CreateInteractionResponse::Message(response))
        .await?;

    if let Err(e) = handler
        .ticket_log
        .append(&format!(
            "Ticket #{} ({}) claimed by {} ({})",
            record.number,
            interaction.channel_id,
            interaction.user.name,
            claimer
        ))
        .await
    {
        tracing::warn!("[TICKET] Failed to write ticket log: {}", e);
    }

    tracing::info!("[TICKET] Ticket #{} claimed by {}", record.number, claimer);

    Ok(())
}
