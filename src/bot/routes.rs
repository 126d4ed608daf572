/// Custom ids attached to components, modals and commands.
pub mod ids {
    pub const TICKET_REASON: &str = "ticket_reason";
    pub const CLAIM_TICKET: &str = "claim_ticket";
    pub const RESOLVE_TICKET: &str = "resolve_ticket";
    pub const CLOSE_TICKET: &str = "close_ticket";
    pub const ADMIN_MENU: &str = "admin_menu";
    pub const RESOLVE_MODAL: &str = "resolve_modal";
    pub const SEND_MESSAGE_MODAL: &str = "send_message_modal";
    pub const ADMIN_COMMAND: &str = "admin";
}

/// Runtime category of an interaction the bot knows how to route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    SelectMenu,
    Button,
    Modal,
    SlashCommand,
}

/// Who may trigger a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Anyone,
    /// Helper or moderator.
    Staff,
    /// Moderator, a manager, or the guild owner.
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    OpenTicket,
    ClaimTicket,
    ResolveTicket,
    CloseTicket,
    AdminMenu,
    ResolveModal,
    SendMessageModal,
    AdminCommand,
}

impl Route {
    /// Look up the handler for `custom_id` within `kind`. The same id in the
    /// wrong category does not match.
    pub fn resolve(kind: InteractionKind, custom_id: &str) -> Option<Route> {
        use InteractionKind::*;

        let route = match (kind, custom_id) {
            (SelectMenu, ids::TICKET_REASON) => Route::OpenTicket,
            (SelectMenu, ids::ADMIN_MENU) => Route::AdminMenu,
            (Button, ids::CLAIM_TICKET) => Route::ClaimTicket,
            (Button, ids::RESOLVE_TICKET) => Route::ResolveTicket,
            (Button, ids::CLOSE_TICKET) => Route::CloseTicket,
            (Modal, ids::RESOLVE_MODAL) => Route::ResolveModal,
            (Modal, ids::SEND_MESSAGE_MODAL) => Route::SendMessageModal,
            (SlashCommand, ids::ADMIN_COMMAND) => Route::AdminCommand,
            _ => return None,
        };
        Some(route)
    }

    pub fn access(self) -> Access {
        match self {
            Route::OpenTicket => Access::Anyone,
            Route::ClaimTicket | Route::ResolveTicket | Route::CloseTicket | Route::ResolveModal => {
                Access::Staff
            }
            Route::AdminMenu | Route::SendMessageModal | Route::AdminCommand => Access::Admin,
        }
    }
}
