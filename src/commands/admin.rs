use crate::bot::Handler;
use crate::bot::helpers::components::{self, ephemeral};
use crate::bot::routes::ids;
use crate::commands::{error, send_message};
use crate::utils::ticket_log::{LogView, TicketLog};
use serenity::all::{
    Colour, CommandInteraction, ComponentInteraction, ComponentInteractionDataKind, Context,
    CreateAttachment, CreateCommand, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseMessage, CreateMessage, InteractionContext,
};

/// Entries of the admin sub-menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    ShowLogs,
    ShowBotInfo,
    SendMessage,
    ShowTicketMessages,
}

impl AdminAction {
    pub const MENU: [AdminAction; 4] = [
        Self::ShowLogs,
        Self::ShowBotInfo,
        Self::SendMessage,
        Self::ShowTicketMessages,
    ];

    pub fn from_id(id: &str) -> Option<Self> {
        Self::MENU.into_iter().find(|action| action.id() == id)
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::ShowLogs => "show_logs",
            Self::ShowBotInfo => "show_bot_info",
            Self::SendMessage => "send_message",
            Self::ShowTicketMessages => "show_ticket_messages",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ShowLogs => "Show Ticket Logs",
            Self::ShowBotInfo => "Show Bot Info",
            Self::SendMessage => "Send Message to User",
            Self::ShowTicketMessages => "Show Ticket Messages",
        }
    }
}

/// `/admin`: show the admin panel to the invoker.
pub async fn run(
    _handler: &Handler,
    context: &Context,
    interaction: &CommandInteraction,
) -> anyhow::Result<()> {
    let response = CreateInteractionResponseMessage::new()
        .embed(components::admin_panel_embed())
        .components(vec![components::admin_menu()])
        .ephemeral(true);

    interaction
        .create_response(&context.http, CreateInteractionResponse::Message(response))
        .await?;

    Ok(())
}

/// Admin panel as a regular channel message, for the owner console.
pub fn panel_message() -> CreateMessage {
    CreateMessage::new()
        .embed(components::admin_panel_embed())
        .components(vec![components::admin_menu()])
}

/// `admin_menu` selection.
pub async fn handle_menu(
    handler: &Handler,
    context: &Context,
    interaction: &ComponentInteraction,
) -> anyhow::Result<()> {
    let selected = match &interaction.data.kind {
        ComponentInteractionDataKind::StringSelect { values } => values.first().cloned(),
        _ => None,
    };

    let Some(action) = selected.as_deref().and_then(AdminAction::from_id) else {
        tracing::debug!("[ADMIN] Unknown admin action: {:?}", selected);
        interaction
            .create_response(&context.http, ephemeral(error::UNKNOWN_INTERACTION))
            .await?;
        return Ok(());
    };

    tracing::info!("[ADMIN] {} selected {}", interaction.user.name, action.id());

    match action {
        AdminAction::ShowLogs => show_log(context, interaction, &handler.ticket_log).await,
        AdminAction::ShowTicketMessages => {
            show_log(context, interaction, &handler.message_log).await
        }
        AdminAction::ShowBotInfo => show_bot_info(handler, context, interaction).await,
        AdminAction::SendMessage => send_message::open_modal(context, interaction).await,
    }
}

/// Build the reply for a log: inline text, or the whole file when it does
/// not fit in one message.
pub fn log_response(view: LogView) -> CreateInteractionResponseMessage {
    let message = CreateInteractionResponseMessage::new().ephemeral(true);
    match view {
        LogView::Empty => message.content("The log is empty."),
        LogView::Inline(content) => message.content(content),
        LogView::Attachment { filename, data } => message
            .content("The log is too long to show here, see the attached file.")
            .add_file(CreateAttachment::bytes(data, filename)),
    }
}

async fn show_log(
    context: &Context,
    interaction: &ComponentInteraction,
    log: &TicketLog,
) -> anyhow::Result<()> {
    let view = log.view().await?;
    interaction
        .create_response(
            &context.http,
            CreateInteractionResponse::Message(log_response(view)),
        )
        .await?;
    Ok(())
}

async fn show_bot_info(
    handler: &Handler,
    context: &Context,
    interaction: &ComponentInteraction,
) -> anyhow::Result<()> {
    let last_ticket = handler
        .cooldowns
        .latest()
        .map(|at| format!("<t:{}:F>", at.timestamp()))
        .unwrap_or_else(|| "No tickets since startup".to_string());

    let embed = CreateEmbed::new()
        .title("Bot Info")
        .field("Tickets Opened", handler.counter.current().to_string(), true)
        .field(
            "Open Tickets",
            handler.database.open_ticket_count().await?.to_string(),
            true,
        )
        .field("Users on Cooldown", handler.cooldowns.len().to_string(), true)
        .field("Last Ticket", last_ticket, false)
        .color(Colour::DARK_GOLD);

    interaction
        .create_response(
            &context.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .embed(embed)
                    .ephemeral(true),
            ),
        )
        .await?;

    Ok(())
}

pub fn register() -> CreateCommand {
    CreateCommand::new(ids::ADMIN_COMMAND)
        .description("Open the ticket bot admin panel")
        .contexts(vec![InteractionContext::Guild])
}
