use crate::bot::routes::ids;
use crate::commands::admin::AdminAction;
use crate::utils::reason::TicketReason;
use serenity::all::{
    ActionRowComponent, ButtonStyle, Colour, CreateActionRow, CreateButton, CreateEmbed,
    CreateInteractionResponse, CreateInteractionResponseMessage, CreateMessage, CreateSelectMenu,
    CreateSelectMenuKind, CreateSelectMenuOption, ModalInteraction,
};

/// Helper for building buttons more easily
pub struct ButtonBuilder {
    buttons: Vec<CreateButton>,
}

impl ButtonBuilder {
    pub fn new() -> Self {
        Self {
            buttons: Vec::new(),
        }
    }

    /// Add a primary button
    pub fn primary(mut self, custom_id: impl Into<String>, label: impl Into<String>) -> Self {
        self.buttons.push(
            CreateButton::new(custom_id.into())
                .label(label.into())
                .style(ButtonStyle::Primary),
        );
        self
    }

    /// Add a success button (green)
    pub fn success(mut self, custom_id: impl Into<String>, label: impl Into<String>) -> Self {
        self.buttons.push(
            CreateButton::new(custom_id.into())
                .label(label.into())
                .style(ButtonStyle::Success),
        );
        self
    }

    /// Add a danger button (red)
    pub fn danger(mut self, custom_id: impl Into<String>, label: impl Into<String>) -> Self {
        self.buttons.push(
            CreateButton::new(custom_id.into())
                .label(label.into())
                .style(ButtonStyle::Danger),
        );
        self
    }

    /// Build the action row
    pub fn build(self) -> CreateActionRow {
        CreateActionRow::Buttons(self.buttons)
    }
}

impl Default for ButtonBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Claim / resolve / close buttons under a ticket's intro message.
pub fn ticket_actions_row() -> CreateActionRow {
    ButtonBuilder::new()
        .success(ids::CLAIM_TICKET, "Claim")
        .primary(ids::RESOLVE_TICKET, "Resolve")
        .danger(ids::CLOSE_TICKET, "Close")
        .build()
}

pub fn ticket_reason_menu() -> CreateActionRow {
    let options = TicketReason::MENU
        .iter()
        .map(|reason| {
            CreateSelectMenuOption::new(reason.label(), reason.id())
                .description(reason.description())
        })
        .collect();

    CreateActionRow::SelectMenu(
        CreateSelectMenu::new(ids::TICKET_REASON, CreateSelectMenuKind::String { options })
            .placeholder("Why do you need help?"),
    )
}

/// The public "open a ticket" message posted to the ticket channel.
pub fn ticket_menu_message() -> CreateMessage {
    let embed = CreateEmbed::new()
        .title("Open a Ticket")
        .description(
            "Need help from the staff team? Pick a reason below and a private channel \
             will be created for you.",
        )
        .color(Colour::BLURPLE);

    CreateMessage::new()
        .embed(embed)
        .components(vec![ticket_reason_menu()])
}

pub fn admin_menu() -> CreateActionRow {
    let options = AdminAction::MENU
        .iter()
        .map(|action| CreateSelectMenuOption::new(action.label(), action.id()))
        .collect();

    CreateActionRow::SelectMenu(
        CreateSelectMenu::new(ids::ADMIN_MENU, CreateSelectMenuKind::String { options })
            .placeholder("Choose an admin action"),
    )
}

pub fn admin_panel_embed() -> CreateEmbed {
    CreateEmbed::new()
        .title("Admin Panel")
        .description("Inspect ticket logs, check the bot status, or message a user.")
        .color(Colour::DARK_GOLD)
}

/// Reply only the invoker can see.
pub fn ephemeral(content: impl Into<String>) -> CreateInteractionResponse {
    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    )
}

/// Value typed into the modal input with `custom_id`, if any.
pub fn modal_value<'a>(modal: &'a ModalInteraction, custom_id: &str) -> Option<&'a str> {
    modal
        .data
        .components
        .iter()
        .flat_map(|row| row.components.iter())
        .find_map(|component| match component {
            ActionRowComponent::InputText(input) if input.custom_id == custom_id => {
                input.value.as_deref()
            }
            _ => None,
        })
}
