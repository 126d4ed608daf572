use serenity::all::{ChannelId, GuildId};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a numeric Discord id, got {value:?}")]
    InvalidId { name: &'static str, value: String },
    #[error("{name} must be a whole number of seconds, got {value:?}")]
    InvalidSeconds { name: &'static str, value: String },
    #[error("{name} must be greater than zero")]
    ZeroInterval { name: &'static str },
    #[error("GUILD_SCOPE must be `interaction` or `all`, got {0:?}")]
    InvalidScope(String),
}

/// Which guilds a ticket is opened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuildScope {
    /// The guild the interaction came from, falling back to `TICKET_GUILD_ID`.
    Interaction,
    /// Every guild the bot is a member of, one ticket per guild.
    AllGuilds,
}

/// Role names the bot looks up in each guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffRoles {
    pub helper: String,
    pub moderator: String,
    pub managers: Vec<String>,
}

impl Default for StaffRoles {
    fn default() -> Self {
        Self {
            helper: "Helper".to_string(),
            moderator: "Moderator".to_string(),
            managers: vec![
                "Minecraft Manager".to_string(),
                "Discord Manager".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token_file: PathBuf,
    pub database_path: PathBuf,
    pub ticket_log_path: PathBuf,
    pub message_log_path: PathBuf,
    pub ticket_menu_channel: Option<ChannelId>,
    pub admin_log_channel: Option<ChannelId>,
    pub ticket_guild: Option<GuildId>,
    pub guild_scope: GuildScope,
    pub category_name: String,
    pub staff: StaffRoles,
    pub cooldown: Duration,
    pub deletion_delay: Duration,
    pub cooldown_sweep_interval: Duration,
    pub owner_console: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token_file: PathBuf::from("token.txt"),
            database_path: PathBuf::from("tickets.sqlite"),
            ticket_log_path: PathBuf::from("ticket_logs.txt"),
            message_log_path: PathBuf::from("ticket_messages.txt"),
            ticket_menu_channel: None,
            admin_log_channel: None,
            ticket_guild: None,
            guild_scope: GuildScope::Interaction,
            category_name: "Tickets".to_string(),
            staff: StaffRoles::default(),
            cooldown: Duration::from_secs(60),
            deletion_delay: Duration::from_secs(10),
            cooldown_sweep_interval: Duration::from_secs(300),
            owner_console: true,
        }
    }
}

impl Config {
    /// Read settings from the process environment and `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let path = |key: &str, default: PathBuf| var(key).map(PathBuf::from).unwrap_or(default);

        let id = |key: &'static str| -> Result<Option<u64>, ConfigError> {
            match var(key) {
                None => Ok(None),
                Some(value) => match value.parse::<u64>() {
                    Ok(id) if id != 0 => Ok(Some(id)),
                    _ => Err(ConfigError::InvalidId { name: key, value }),
                },
            }
        };

        let seconds = |key: &'static str, default: Duration| -> Result<Duration, ConfigError> {
            match var(key) {
                None => Ok(default),
                Some(value) => value
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| ConfigError::InvalidSeconds { name: key, value }),
            }
        };

        let guild_scope = match var("GUILD_SCOPE").as_deref() {
            None | Some("interaction") => GuildScope::Interaction,
            Some("all") => GuildScope::AllGuilds,
            Some(other) => return Err(ConfigError::InvalidScope(other.to_string())),
        };

        let mut staff = defaults.staff.clone();
        if let Some(helper) = var("HELPER_ROLE") {
            staff.helper = helper;
        }
        if let Some(moderator) = var("MODERATOR_ROLE") {
            staff.moderator = moderator;
        }
        if let Some(managers) = var("MANAGER_ROLES") {
            staff.managers = managers
                .split(',')
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect();
        }

        // tokio intervals panic on a zero period.
        let cooldown_sweep_interval =
            seconds("COOLDOWN_SWEEP_SECS", defaults.cooldown_sweep_interval)?;
        if cooldown_sweep_interval.is_zero() {
            return Err(ConfigError::ZeroInterval {
                name: "COOLDOWN_SWEEP_SECS",
            });
        }

        Ok(Self {
            token_file: path("TOKEN_FILE", defaults.token_file),
            database_path: path("DATABASE_PATH", defaults.database_path),
            ticket_log_path: path("TICKET_LOG_PATH", defaults.ticket_log_path),
            message_log_path: path("TICKET_MESSAGE_LOG_PATH", defaults.message_log_path),
            ticket_menu_channel: id("TICKET_MENU_CHANNEL_ID")?.map(ChannelId::new),
            admin_log_channel: id("ADMIN_LOG_CHANNEL_ID")?.map(ChannelId::new),
            ticket_guild: id("TICKET_GUILD_ID")?.map(GuildId::new),
            guild_scope,
            category_name: var("TICKET_CATEGORY").unwrap_or(defaults.category_name),
            staff,
            cooldown: seconds("TICKET_COOLDOWN_SECS", defaults.cooldown)?,
            deletion_delay: seconds("DELETION_DELAY_SECS", defaults.deletion_delay)?,
            cooldown_sweep_interval,
            owner_console: var("OWNER_CONSOLE")
                .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "no" | "off"))
                .unwrap_or(defaults.owner_console),
        })
    }
}
