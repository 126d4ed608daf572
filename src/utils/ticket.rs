use crate::utils::cooldown::CooldownActive;
use crate::utils::reason::TicketReason;
use chrono::{DateTime, Utc};
use regex::Regex;
use serenity::all::{Colour, CreateEmbed, CreateEmbedFooter, GuildId, Timestamp, UserId};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Prefix shared by every ticket channel name.
pub const CHANNEL_PREFIX: &str = "ticket-";

static UNSAFE_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_-]+").expect("static regex"));

#[derive(Debug, Error)]
pub enum TicketError {
    #[error(transparent)]
    Cooldown(#[from] CooldownActive),
    #[error("The `{0}` role does not exist in this server.")]
    MissingRole(String),
    #[error("This channel is not a ticket.")]
    NotATicket,
    #[error("This ticket is already {from} and cannot be {to}.")]
    InvalidTransition {
        from: TicketStatus,
        to: TicketStatus,
    },
    #[error("There is no server to open the ticket in.")]
    NoGuild,
    #[error("Unknown ticket status `{0}`")]
    UnknownStatus(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TicketStatus {
    Created,
    Claimed,
    Resolved,
    Closed,
    Deleted,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Claimed => "claimed",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
            Self::Deleted => "deleted",
        }
    }

    /// Validate a lifecycle step and return the new status.
    pub fn transition(self, to: TicketStatus) -> Result<TicketStatus, TicketError> {
        use TicketStatus::*;

        match (self, to) {
            (Created | Claimed, Claimed)
            | (Created | Claimed, Resolved | Closed)
            | (Resolved | Closed, Deleted) => Ok(to),
            _ => Err(TicketError::InvalidTransition { from: self, to }),
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = TicketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "claimed" => Ok(Self::Claimed),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            "deleted" => Ok(Self::Deleted),
            other => Err(TicketError::UnknownStatus(other.to_string())),
        }
    }
}

/// Everything needed to open one ticket channel, decided before any API call.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketDraft {
    pub number: u64,
    pub guild_id: GuildId,
    pub creator_id: UserId,
    pub creator_name: String,
    pub reason: TicketReason,
    pub created_at: DateTime<Utc>,
}

impl TicketDraft {
    pub fn channel_name(&self) -> String {
        channel_name(&self.creator_name, self.reason)
    }

    pub fn log_line(&self, channel_name: &str) -> String {
        format!(
            "Ticket #{} opened by {} ({}) in #{} for reason: {}",
            self.number,
            self.creator_name,
            self.creator_id.get(),
            channel_name,
            self.reason.label()
        )
    }

    pub fn intro_embed(&self) -> CreateEmbed {
        CreateEmbed::new()
            .title(format!("Ticket #{}", self.number))
            .description(
                "Thanks for reaching out! A member of the staff team will be with you shortly.\n\
                 Please describe your request in as much detail as you can.",
            )
            .field("Ticket Number", format!("#{}", self.number), true)
            .field("Created By", format!("<@{}>", self.creator_id.get()), true)
            .field("Reason", self.reason.label(), true)
            .footer(CreateEmbedFooter::new("Staff: claim, resolve or close this ticket below"))
            .timestamp(Timestamp::from(self.created_at))
            .color(Colour::BLURPLE)
    }
}

/// `ticket-<username>-<reason-slug>`, lowercased and stripped of characters
/// Discord does not allow in text channel names.
pub fn channel_name(username: &str, reason: TicketReason) -> String {
    let lowered = username.to_lowercase();
    let cleaned = UNSAFE_NAME_CHARS.replace_all(&lowered, "-");
    let cleaned = cleaned.trim_matches('-');
    let user = if cleaned.is_empty() { "user" } else { cleaned };

    format!("{}{}-{}", CHANNEL_PREFIX, user, reason.slug())
}

pub fn is_ticket_channel(name: &str) -> bool {
    name.starts_with(CHANNEL_PREFIX)
}
