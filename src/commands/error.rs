use crate::utils::cooldown::CooldownActive;
use crate::utils::ticket::TicketError;
use crate::commands::send_message::DirectMessageError;
use serenity::all::{
    Colour, Context, CreateEmbed, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, Interaction,
};

pub const GENERIC_FAILURE: &str = "An unexpected error occurred. Please try again later.";
pub const UNKNOWN_INTERACTION: &str = "Unknown interaction.";
pub const ACCESS_DENIED: &str = "You do not have permission to do that.";

pub fn error_embed(error_message: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("Error")
        .description(error_message)
        .color(Colour::RED)
}

/// Text shown to the invoker for a handler failure. Domain errors carry
/// their own wording; everything else is hidden behind a generic message.
pub fn user_message(error: &anyhow::Error) -> String {
    if let Some(e) = error.downcast_ref::<TicketError>() {
        return e.to_string();
    }
    if let Some(e) = error.downcast_ref::<CooldownActive>() {
        return e.to_string();
    }
    if let Some(e) = error.downcast_ref::<DirectMessageError>() {
        return e.to_string();
    }
    GENERIC_FAILURE.to_string()
}

/// Send an ephemeral error embed for any routed interaction. If the
/// interaction was already acknowledged, fall back to a follow-up.
pub async fn run(
    context: &Context,
    interaction: &Interaction,
    error_message: &str,
) -> anyhow::Result<()> {
    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .embed(error_embed(error_message))
            .ephemeral(true),
    );
    let followup = CreateInteractionResponseFollowup::new()
        .embed(error_embed(error_message))
        .ephemeral(true);

    match interaction {
        Interaction::Command(command) => {
            if command.create_response(&context.http, response).await.is_err() {
                command.create_followup(&context.http, followup).await?;
            }
        }
        Interaction::Component(component) => {
            if component.create_response(&context.http, response).await.is_err() {
                component.create_followup(&context.http, followup).await?;
            }
        }
        Interaction::Modal(modal) => {
            if modal.create_response(&context.http, response).await.is_err() {
                modal.create_followup(&context.http, followup).await?;
            }
        }
        _ => {
            tracing::debug!("[ROUTER] No error reply for this interaction type");
        }
    }

    Ok(())
}
