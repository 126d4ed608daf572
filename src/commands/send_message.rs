use crate::bot::Handler;
use crate::bot::helpers::components::{ephemeral, modal_value};
use crate::bot::routes::ids;
use serenity::all::{
    ChannelId, Colour, ComponentInteraction, Context, CreateActionRow, CreateEmbed,
    CreateInputText, CreateInteractionResponse, CreateMessage, CreateModal, InputTextStyle,
    ModalInteraction, UserId,
};
use serenity::http::Http;
use thiserror::Error;

const USER_ID_INPUT: &str = "user_id";
const MESSAGE_INPUT: &str = "message";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectMessageError {
    #[error("`{0}` is not a valid user id.")]
    InvalidUserId(String),
    #[error("The message cannot be empty.")]
    EmptyMessage,
}

/// A validated admin-to-user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectMessage {
    pub recipient: UserId,
    pub body: String,
}

pub fn parse_direct_message(user_id: &str, body: &str) -> Result<DirectMessage, DirectMessageError> {
    let raw_id = user_id.trim();
    let recipient = match raw_id.parse::<u64>() {
        Ok(id) if id != 0 => UserId::new(id),
        _ => return Err(DirectMessageError::InvalidUserId(raw_id.to_string())),
    };

    let body = body.trim();
    if body.is_empty() {
        return Err(DirectMessageError::EmptyMessage);
    }

    Ok(DirectMessage {
        recipient,
        body: body.to_string(),
    })
}

/// Deliver `message` and mirror it into the admin log channel. Returns the
/// recipient's name. The mirror is best effort.
pub async fn deliver(
    http: &Http,
    admin_log_channel: Option<ChannelId>,
    sender: &str,
    message: &DirectMessage,
) -> anyhow::Result<String> {
    let recipient = message.recipient.to_user(http).await?;

    recipient
        .direct_message(
            http,
            CreateMessage::new().embed(
                CreateEmbed::new()
                    .title("Message from the staff team")
                    .description(&message.body)
                    .color(Colour::BLURPLE),
            ),
        )
        .await?;

    if let Some(channel) = admin_log_channel {
        let mirror = CreateEmbed::new()
            .title("Direct message sent")
            .description(&message.body)
            .field("To", format!("{} ({})", recipient.name, recipient.id), true)
            .field("From", sender, true)
            .color(Colour::DARK_GREY);

        if let Err(e) = channel
            .send_message(http, CreateMessage::new().embed(mirror))
            .await
        {
            tracing::warn!("[ADMIN] Failed to mirror direct message to log channel: {}", e);
        }
    }

    tracing::info!("[ADMIN] {} sent a direct message to {}", sender, recipient.id);

    Ok(recipient.name)
}

/// `send_message` admin action: open the two-field modal.
pub async fn open_modal(context: &Context, interaction: &ComponentInteraction) -> anyhow::Result<()> {
    let modal = CreateModal::new(ids::SEND_MESSAGE_MODAL, "Send Direct Message").components(vec![
        CreateActionRow::InputText(
            CreateInputText::new(InputTextStyle::Short, "User ID", USER_ID_INPUT)
                .placeholder("Numeric Discord user id")
                .required(true),
        ),
        CreateActionRow::InputText(
            CreateInputText::new(InputTextStyle::Paragraph, "Message", MESSAGE_INPUT).required(true),
        ),
    ]);

    interaction
        .create_response(&context.http, CreateInteractionResponse::Modal(modal))
        .await?;

    Ok(())
}

/// `send_message_modal` submission.
pub async fn handle_modal(
    handler: &Handler,
    context: &Context,
    interaction: &ModalInteraction,
) -> anyhow::Result<()> {
    let message = match parse_direct_message(
        modal_value(interaction, USER_ID_INPUT).unwrap_or_default(),
        modal_value(interaction, MESSAGE_INPUT).unwrap_or_default(),
    ) {
        Ok(message) => message,
        Err(e) => {
            interaction
                .create_response(&context.http, ephemeral(e.to_string()))
                .await?;
            return Ok(());
        }
    };

    let content = match deliver(
        &context.http,
        handler.config.admin_log_channel,
        &interaction.user.name,
        &message,
    )
    .await
    {
        Ok(name) => format!("Message delivered to {}.", name),
        Err(e) => {
            tracing::warn!(
                "[ADMIN] Failed to message {}: {}",
                message.recipient,
                e
            );
            format!(
                "Could not deliver the message to {}. They may not exist or may have DMs disabled.",
                message.recipient
            )
        }
    };

    interaction
        .create_response(&context.http, ephemeral(content))
        .await?;

    Ok(())
}
