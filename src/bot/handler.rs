use crate::utils::config::Config;
use crate::utils::cooldown::CooldownTracker;
use crate::utils::database::{Database, TicketRecord};
use crate::utils::reason::TicketReason;
use crate::utils::ticket::{TicketDraft, TicketError, TicketStatus};
use crate::utils::ticket_counter::TicketCounter;
use crate::utils::ticket_log::TicketLog;
use anyhow::Context as _;
use mockable::{Clock, DefaultClock};
use serenity::all::{ChannelId, GuildId, UserId};
use std::future::Future;
use std::sync::Arc;

/// Application state shared by every interaction handler.
pub struct Handler {
    pub config: Arc<Config>,
    pub database: Database,
    pub cooldowns: Arc<CooldownTracker>,
    pub counter: TicketCounter,
    pub ticket_log: TicketLog,
    pub message_log: TicketLog,
}

impl Handler {
    pub async fn new(config: Arc<Config>) -> anyhow::Result<Self> {
        let database = Database::new(&config.database_path)
            .await
            .with_context(|| format!("Failed to open {}", config.database_path.display()))?;

        Ok(Self::with_parts(config, database, Arc::new(DefaultClock)))
    }

    pub fn with_parts(config: Arc<Config>, database: Database, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Handler {
            cooldowns: Arc::new(CooldownTracker::new(config.cooldown, clock)),
            counter: TicketCounter::new(),
            ticket_log: TicketLog::new(config.ticket_log_path.clone()),
            message_log: TicketLog::new(config.message_log_path.clone()),
            database,
            config,
        }
    }

    /// Reserve the creator's cooldown and number one ticket per target guild.
    ///
    /// A rejected attempt leaves both the counter and the cooldown untouched.
    pub fn draft_tickets(
        &self,
        creator_id: UserId,
        creator_name: &str,
        reason: TicketReason,
        guilds: &[GuildId],
    ) -> Result<Vec<TicketDraft>, TicketError> {
        if guilds.is_empty() {
            return Err(TicketError::NoGuild);
        }

        let created_at = self.cooldowns.try_acquire(creator_id.get())?;

        Ok(guilds
            .iter()
            .map(|guild_id| TicketDraft {
                number: self.counter.next(),
                guild_id: *guild_id,
                creator_id,
                creator_name: creator_name.to_string(),
                reason,
                created_at,
            })
            .collect())
    }

    /// Move the ticket in `channel_id` to `to`, failing if the channel is not
    /// a ticket or the step is not allowed from its current status.
    pub async fn advance_ticket(
        &self,
        channel_id: ChannelId,
        to: TicketStatus,
        actor: Option<UserId>,
    ) -> anyhow::Result<TicketRecord> {
        let record = self
            .database
            .get_ticket(channel_id.get())
            .await?
            .ok_or(TicketError::NotATicket)?;

        let next = record.status.transition(to)?;
        let claimed_by = actor.filter(|_| to == TicketStatus::Claimed).map(UserId::get);

        let updated = self
            .database
            .compare_and_set_status(channel_id.get(), record.status, next, claimed_by)
            .await?;

        if !updated {
            let current = self
                .database
                .get_ticket(channel_id.get())
                .await?
                .map(|r| r.status)
                .unwrap_or(TicketStatus::Deleted);
            return Err(TicketError::InvalidTransition { from: current, to }.into());
        }

        Ok(TicketRecord {
            status: next,
            claimed_by: claimed_by.or(record.claimed_by),
            ..record
        })
    }

    /// Claim the ticket in `channel_id` for `claimer`. `grant_access` runs
    /// after the ticket is validated and before the status is stored, so a
    /// failed permission update leaves the ticket unclaimed.
    pub async fn claim_ticket<F>(
        &self,
        channel_id: ChannelId,
        claimer: UserId,
        grant_access: F,
    ) -> anyhow::Result<TicketRecord>
    where
        F: Future<Output = anyhow::Result<()>>,
    {
        let record = self.ticket_in(channel_id).await?;
        record.status.transition(TicketStatus::Claimed)?;

        grant_access.await?;

        self.advance_ticket(channel_id, TicketStatus::Claimed, Some(claimer))
            .await
    }

    /// Ticket record for a channel that must be one.
    pub async fn ticket_in(&self, channel_id: ChannelId) -> anyhow::Result<TicketRecord> {
        Ok(self
            .database
            .get_ticket(channel_id.get())
            .await?
            .ok_or(TicketError::NotATicket)?)
    }
}
