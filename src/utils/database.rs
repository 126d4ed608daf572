use crate::utils::reason::TicketReason;
use crate::utils::ticket::{TicketDraft, TicketStatus};
use chrono::{DateTime, Utc};
use sqlx::{
    Row, SqlitePool as Pool,
    sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow},
};
use std::path::Path;

/// A ticket as remembered between interactions, keyed by its channel.
#[derive(Clone, Debug, PartialEq)]
pub struct TicketRecord {
    pub channel_id: u64,
    pub guild_id: u64,
    pub number: u64,
    pub creator_id: u64,
    pub creator_name: String,
    pub reason: TicketReason,
    pub status: TicketStatus,
    pub claimed_by: Option<u64>,
    pub created_at: DateTime<Utc>,
}

pub struct Database {
    pool: Pool,
}

impl Database {
    pub async fn new(path: &Path) -> Result<Self, sqlx::Error> {
        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(opts).await?;

        Self::setup_tables(&pool).await?;

        Ok(Database { pool })
    }

    /// Private database that lives as long as the pool.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        Self::setup_tables(&pool).await?;

        Ok(Database { pool })
    }

    async fn setup_tables(pool: &Pool) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tickets (
                channel_id INTEGER PRIMARY KEY,
                guild_id INTEGER NOT NULL,
                ticket_number INTEGER NOT NULL,
                creator_id INTEGER NOT NULL,
                creator_name TEXT NOT NULL,
                reason TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'created',
                claimed_by INTEGER,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn insert_ticket(
        &self,
        channel_id: u64,
        draft: &TicketDraft,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO tickets (channel_id, guild_id, ticket_number, creator_id, creator_name, reason, status, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(channel_id as i64)
        .bind(draft.guild_id.get() as i64)
        .bind(draft.number as i64)
        .bind(draft.creator_id.get() as i64)
        .bind(&draft.creator_name)
        .bind(draft.reason.id())
        .bind(TicketStatus::Created.as_str())
        .bind(draft.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_ticket(&self, channel_id: u64) -> Result<Option<TicketRecord>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT channel_id, guild_id, ticket_number, creator_id, creator_name, reason, status, claimed_by, created_at FROM tickets WHERE channel_id = ?"
        )
        .bind(channel_id as i64)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::record_from_row(&row)).transpose()
    }

    /// Move a ticket from `expected` to `status`. Returns false when the
    /// ticket was not in `expected` anymore, e.g. another staff member closed
    /// it first.
    pub async fn compare_and_set_status(
        &self,
        channel_id: u64,
        expected: TicketStatus,
        status: TicketStatus,
        claimed_by: Option<u64>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tickets SET status = ?, claimed_by = COALESCE(?, claimed_by) WHERE channel_id = ? AND status = ?"
        )
        .bind(status.as_str())
        .bind(claimed_by.map(|id| id as i64))
        .bind(channel_id as i64)
        .bind(expected.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Tickets that still have a channel.
    pub async fn open_ticket_count(&self) -> Result<u64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM tickets WHERE status != 'deleted'")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("count") as u64)
    }

    fn record_from_row(row: &SqliteRow) -> Result<TicketRecord, sqlx::Error> {
        let status = row
            .get::<String, _>("status")
            .parse::<TicketStatus>()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(TicketRecord {
            channel_id: row.get::<i64, _>("channel_id") as u64,
            guild_id: row.get::<i64, _>("guild_id") as u64,
            number: row.get::<i64, _>("ticket_number") as u64,
            creator_id: row.get::<i64, _>("creator_id") as u64,
            creator_name: row.get("creator_name"),
            reason: TicketReason::from_id(&row.get::<String, _>("reason")),
            status,
            claimed_by: row.get::<Option<i64>, _>("claimed_by").map(|id| id as u64),
            created_at: row.get("created_at"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serenity::all::{GuildId, UserId};

    fn draft(number: u64) -> TicketDraft {
        TicketDraft {
            number,
            guild_id: GuildId::new(10),
            creator_id: UserId::new(555),
            creator_name: "alice".to_string(),
            reason: TicketReason::Report,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_ticket() {
        let db = Database::in_memory().await.unwrap();
        db.insert_ticket(900, &draft(1)).await.unwrap();

        let record = db.get_ticket(900).await.unwrap().unwrap();
        assert_eq!(record.channel_id, 900);
        assert_eq!(record.guild_id, 10);
        assert_eq!(record.number, 1);
        assert_eq!(record.creator_id, 555);
        assert_eq!(record.creator_name, "alice");
        assert_eq!(record.reason, TicketReason::Report);
        assert_eq!(record.status, TicketStatus::Created);
        assert_eq!(record.claimed_by, None);
        assert_eq!(record.created_at, draft(1).created_at);
    }

    #[tokio::test]
    async fn test_unknown_channel_is_none() {
        let db = Database::in_memory().await.unwrap();
        assert!(db.get_ticket(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_compare_and_set_status() {
        let db = Database::in_memory().await.unwrap();
        db.insert_ticket(900, &draft(1)).await.unwrap();

        assert!(
            db.compare_and_set_status(900, TicketStatus::Created, TicketStatus::Claimed, Some(77))
                .await
                .unwrap()
        );
        assert!(
            !db.compare_and_set_status(900, TicketStatus::Created, TicketStatus::Closed, None)
                .await
                .unwrap()
        );
        assert!(
            db.compare_and_set_status(900, TicketStatus::Claimed, TicketStatus::Closed, None)
                .await
                .unwrap()
        );

        let record = db.get_ticket(900).await.unwrap().unwrap();
        assert_eq!(record.status, TicketStatus::Closed);
        assert_eq!(record.claimed_by, Some(77));
    }

    #[tokio::test]
    async fn test_open_ticket_count_ignores_deleted() {
        let db = Database::in_memory().await.unwrap();
        db.insert_ticket(1, &draft(1)).await.unwrap();
        db.insert_ticket(2, &draft(2)).await.unwrap();
        db.compare_and_set_status(2, TicketStatus::Created, TicketStatus::Closed, None)
            .await
            .unwrap();
        db.compare_and_set_status(2, TicketStatus::Closed, TicketStatus::Deleted, None)
            .await
            .unwrap();

        assert_eq!(db.open_ticket_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_abandoned_ticket_can_be_retired_directly() {
        let db = Database::in_memory().await.unwrap();
        db.insert_ticket(900, &draft(1)).await.unwrap();

        assert!(
            db.compare_and_set_status(900, TicketStatus::Created, TicketStatus::Deleted, None)
                .await
                .unwrap()
        );
        assert_eq!(db.open_ticket_count().await.unwrap(), 0);

        // Nothing to retire when the insert never happened.
        assert!(
            !db.compare_and_set_status(901, TicketStatus::Created, TicketStatus::Deleted, None)
                .await
                .unwrap()
        );
    }
}
