use crate::bot::Handler;
use crate::bot::helpers::components::{ephemeral, modal_value};
use crate::bot::routes::ids;
use crate::commands::close_ticket::delete_after_notice;
use crate::utils::ticket::TicketStatus;
use serenity::all::{
    Colour, ComponentInteraction, Context, CreateActionRow, CreateEmbed, CreateInputText,
    CreateInteractionResponse, CreateInteractionResponseFollowup, CreateMessage, CreateModal,
    InputTextStyle, Mentionable, ModalInteraction, UserId,
};

const RESOLUTION_INPUT: &str = "resolution";

/// `resolve_ticket` button: ask for a resolution message.
pub async fn run(
    handler: &Handler,
    context: &Context,
    interaction: &ComponentInteraction,
) -> anyhow::Result<()> {
    let record = handler.ticket_in(interaction.channel_id).await?;
    record.status.transition(TicketStatus::Resolved)?;

    let modal = CreateModal::new(ids::RESOLVE_MODAL, format!("Resolve Ticket #{}", record.number))
        .components(vec![CreateActionRow::InputText(
            CreateInputText::new(InputTextStyle::Paragraph, "Resolution", RESOLUTION_INPUT)
                .placeholder("How was this ticket resolved? The ticket owner receives this message.")
                .required(true),
        )]);

    interaction
        .create_response(&context.http, CreateInteractionResponse::Modal(modal))
        .await?;

    Ok(())
}

/// `resolve_modal` submission: notify the creator, then delete the channel.
pub async fn handle_modal(
    handler: &Handler,
    context: &Context,
    interaction: &ModalInteraction,
) -> anyhow::Result<()> {
    let resolution = modal_value(interaction, RESOLUTION_INPUT)
        .map(str::trim)
        .unwrap_or_default();
    if resolution.is_empty() {
        interaction
            .create_response(&context.http, ephemeral("The resolution message cannot be empty."))
            .await?;
        return Ok(());
    }

    let record = handler
        .advance_ticket(interaction.channel_id, TicketStatus::Resolved, None)
        .await?;

    interaction
        .create_response(&context.http, CreateInteractionResponse::Acknowledge)
        .await?;

    let resolver = &interaction.user;
    let creator = UserId::new(record.creator_id);
    let embed = CreateEmbed::new()
        .title(format!("Ticket #{} Resolved", record.number))
        .description(resolution)
        .field("Reason", record.reason.label(), true)
        .field("Resolved By", resolver.name.clone(), true)
        .color(Colour::DARK_GREEN);

    let delivered = match creator
        .direct_message(&context.http, CreateMessage::new().embed(embed))
        .await
    {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(
                "[TICKET] Could not send resolution of ticket #{} to {}: {}",
                record.number,
                creator,
                e
            );
            false
        }
    };

    let mut notice = format!(
        "Ticket resolved by {}. This channel will be deleted in {} seconds.",
        resolver.id.mention(),
        handler.config.deletion_delay.as_secs()
    );
    if !delivered {
        notice.push_str(" (The resolution could not be sent to the ticket owner by DM.)");
    }

    tracing::info!(
        "[TICKET] Ticket #{} resolved by {}",
        record.number,
        resolver.id
    );

    if let Err(e) = delete_after_notice(handler, context, &record, &notice, &resolver.name).await {
        interaction
            .create_followup(
                &context.http,
                CreateInteractionResponseFollowup::new()
                    .content(format!("Failed to delete the ticket channel: {}", e))
                    .ephemeral(true),
            )
            .await?;
    }

    Ok(())
}
