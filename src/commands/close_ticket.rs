use crate::bot::Handler;
use crate::utils::countdown::{ClosingChannel, CountdownOutcome, run_deletion_countdown};
use crate::utils::database::TicketRecord;
use crate::utils::ticket::TicketStatus;
use serenity::all::{
    ChannelId, ComponentInteraction, Context, CreateInteractionResponse,
    CreateInteractionResponseFollowup, Mentionable,
};
use serenity::http::Http;
use std::sync::Arc;

/// A ticket channel as seen by the deletion countdown.
pub struct TicketChannel {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl TicketChannel {
    pub fn new(http: Arc<Http>, channel_id: ChannelId) -> Self {
        Self { http, channel_id }
    }
}

impl ClosingChannel for TicketChannel {
    async fn post_notice(&self, text: &str) -> anyhow::Result<()> {
        self.channel_id.say(self.http.as_ref(), text).await?;
        Ok(())
    }

    async fn delete(&self) -> anyhow::Result<()> {
        self.channel_id.delete(self.http.as_ref()).await?;
        Ok(())
    }
}

pub async fn run(
    handler: &Handler,
    context: &Context,
    interaction: &ComponentInteraction,
) -> anyhow::Result<()> {
    interaction
        .create_response(&context.http, CreateInteractionResponse::Acknowledge)
        .await?;

    let record = handler
        .advance_ticket(interaction.channel_id, TicketStatus::Closed, None)
        .await?;

    tracing::info!(
        "[TICKET] Ticket #{} closed by {}",
        record.number,
        interaction.user.id
    );

    let notice = format!(
        "Ticket closed by {}. This channel will be deleted in {} seconds.",
        interaction.user.id.mention(),
        handler.config.deletion_delay.as_secs()
    );

    if let Err(e) = delete_after_notice(handler, context, &record, &notice, &interaction.user.name).await {
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

/// Run the countdown for a ticket that was just resolved or closed and write
/// the outcome through to the store and log. A failed deletion comes back as
/// an error for the caller to report; it is never retried.
pub async fn delete_after_notice(
    handler: &Handler,
    context: &Context,
    record: &TicketRecord,
    notice: &str,
    actor_name: &str,
) -> anyhow::Result<()> {
    let channel_id = ChannelId::new(record.channel_id);
    let channel = TicketChannel::new(context.http.clone(), channel_id);

    match run_deletion_countdown(&channel, notice, handler.config.deletion_delay).await {
        CountdownOutcome::Deleted => {
            if let Err(e) = handler
                .advance_ticket(channel_id, TicketStatus::Deleted, None)
                .await
            {
                tracing::warn!("[TICKET] Failed to mark ticket #{} deleted: {}", record.number, e);
            }
            if let Err(e) = handler
                .ticket_log
                .append(&format!(
                    "Ticket #{} ({}) {} by {} and deleted",
                    record.number, record.channel_id, record.status, actor_name
                ))
                .await
            {
                tracing::warn!("[TICKET] Failed to write ticket log: {}", e);
            }
            Ok(())
        }
        CountdownOutcome::DeleteFailed(e) => Err(e),
    }
}
