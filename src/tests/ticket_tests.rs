#[cfg(test)]
pub mod tests {
    use crate::bot::Handler;
    use crate::utils::config::Config;
    use crate::utils::cooldown::tests::{FixedClock, start};
    use crate::utils::database::Database;
    use crate::utils::reason::TicketReason;
    use crate::utils::ticket::{TicketError, TicketStatus};
    use chrono::TimeDelta;
    use serenity::all::{ChannelId, GuildId, UserId};
    use std::sync::Arc;
    use tempfile::TempDir;

    const GUILD: GuildId = GuildId::new(10);
    const ALICE: UserId = UserId::new(555);
    const BOB: UserId = UserId::new(666);

    // Helper to build a handler backed by an in-memory store and temp logs
    async fn make_handler(clock: Arc<FixedClock>) -> (Handler, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            ticket_log_path: dir.path().join("ticket_logs.txt"),
            message_log_path: dir.path().join("ticket_messages.txt"),
            ..Config::default()
        };
        let database = Database::in_memory().await.unwrap();
        (Handler::with_parts(Arc::new(config), database, clock), dir)
    }

    // Group 1: ticket creation
    mod creation_tests {
        use super::*;

        #[tokio::test]
        async fn test_giveaway_round_trip() {
            let (handler, _dir) = make_handler(FixedClock::at(start())).await;

            let drafts = handler
                .draft_tickets(ALICE, "alice", TicketReason::from_id("giveaway"), &[GUILD])
                .unwrap();
            assert_eq!(drafts.len(), 1);
            let draft = &drafts[0];

            let channel_name = draft.channel_name();
            assert_eq!(channel_name, "ticket-alice-won-a-giveaway");

            let embed = serde_json::to_value(draft.intro_embed()).unwrap();
            let reason = embed["fields"]
                .as_array()
                .unwrap()
                .iter()
                .find(|field| field["name"] == "Reason")
                .map(|field| field["value"].clone())
                .unwrap();
            assert_eq!(reason, "Won a Giveaway");

            handler
                .ticket_log
                .append(&draft.log_line(&channel_name))
                .await
                .unwrap();
            let log = handler.ticket_log.read().await.unwrap();
            assert!(log.contains("alice"));
            assert!(log.contains("555"));
            assert!(log.contains("Won a Giveaway"));

            handler.database.insert_ticket(900, draft).await.unwrap();
            let record = handler.ticket_in(ChannelId::new(900)).await.unwrap();
            assert_eq!(record.creator_id, ALICE.get());
            assert_eq!(record.reason, TicketReason::Giveaway);
        }

        #[tokio::test]
        async fn test_unknown_reason_still_opens_ticket() {
            let (handler, _dir) = make_handler(FixedClock::at(start())).await;
            let drafts = handler
                .draft_tickets(ALICE, "alice", TicketReason::from_id("refund"), &[GUILD])
                .unwrap();
            assert_eq!(drafts[0].reason.label(), "Unknown");
            assert_eq!(drafts[0].channel_name(), "ticket-alice-unknown");
        }

        #[tokio::test]
        async fn test_cooldown_rejects_without_counting() {
            let clock = FixedClock::at(start());
            let (handler, _dir) = make_handler(clock.clone()).await;

            handler
                .draft_tickets(ALICE, "alice", TicketReason::Support, &[GUILD])
                .unwrap();
            assert_eq!(handler.counter.current(), 1);

            clock.advance(TimeDelta::seconds(45));
            let err = handler
                .draft_tickets(ALICE, "alice", TicketReason::Support, &[GUILD])
                .unwrap_err();
            match err {
                TicketError::Cooldown(active) => assert_eq!(active.remaining_secs, 15),
                other => panic!("expected cooldown, got {:?}", other),
            }
            assert_eq!(handler.counter.current(), 1);

            clock.advance(TimeDelta::seconds(15));
            let drafts = handler
                .draft_tickets(ALICE, "alice", TicketReason::Support, &[GUILD])
                .unwrap();
            assert_eq!(drafts[0].number, 2);
        }

        #[tokio::test]
        async fn test_counter_increases_across_users() {
            let (handler, _dir) = make_handler(FixedClock::at(start())).await;

            let first = handler
                .draft_tickets(ALICE, "alice", TicketReason::Report, &[GUILD])
                .unwrap();
            let second = handler
                .draft_tickets(BOB, "bob", TicketReason::Report, &[GUILD])
                .unwrap();

            assert!(second[0].number > first[0].number);
        }

        #[tokio::test]
        async fn test_all_guilds_scope_numbers_each_guild() {
            let (handler, _dir) = make_handler(FixedClock::at(start())).await;
            let guilds = [GuildId::new(1), GuildId::new(2), GuildId::new(3)];

            let drafts = handler
                .draft_tickets(ALICE, "alice", TicketReason::Report, &guilds)
                .unwrap();

            let numbers: Vec<u64> = drafts.iter().map(|d| d.number).collect();
            assert_eq!(numbers, vec![1, 2, 3]);
            assert_eq!(handler.cooldowns.len(), 1);
        }

        #[tokio::test]
        async fn test_no_guild_leaves_state_untouched() {
            let (handler, _dir) = make_handler(FixedClock::at(start())).await;

            let err = handler
                .draft_tickets(ALICE, "alice", TicketReason::Report, &[])
                .unwrap_err();
            assert!(matches!(err, TicketError::NoGuild));
            assert_eq!(handler.counter.current(), 0);
            assert!(handler.cooldowns.last_created(ALICE.get()).is_none());
        }

        #[tokio::test]
        async fn test_released_cooldown_allows_retry() {
            let (handler, _dir) = make_handler(FixedClock::at(start())).await;

            handler
                .draft_tickets(ALICE, "alice", TicketReason::Report, &[GUILD])
                .unwrap();
            handler.cooldowns.release(ALICE.get());

            assert!(
                handler
                    .draft_tickets(ALICE, "alice", TicketReason::Report, &[GUILD])
                    .is_ok()
            );
        }

        #[tokio::test]
        async fn test_same_user_race_opens_one_ticket() {
            let (handler, _dir) = make_handler(FixedClock::at(start())).await;
            let handler = Arc::new(handler);

            let mut tasks = Vec::new();
            for _ in 0..8 {
                let handler = handler.clone();
                tasks.push(tokio::spawn(async move {
                    handler
                        .draft_tickets(ALICE, "alice", TicketReason::Report, &[GUILD])
                        .is_ok()
                }));
            }

            let mut opened = 0;
            for task in tasks {
                if task.await.unwrap() {
                    opened += 1;
                }
            }
            assert_eq!(opened, 1);
            assert_eq!(handler.counter.current(), 1);
        }
    }

    // Group 2: lifecycle transitions
    mod lifecycle_tests {
        use super::*;
        use std::sync::atomic::{AtomicBool, Ordering};

        async fn opened(handler: &Handler, channel: u64) {
            let drafts = handler
                .draft_tickets(ALICE, "alice", TicketReason::Support, &[GUILD])
                .unwrap();
            handler.database.insert_ticket(channel, &drafts[0]).await.unwrap();
        }

        #[tokio::test]
        async fn test_claim_records_claimer() {
            let (handler, _dir) = make_handler(FixedClock::at(start())).await;
            opened(&handler, 900).await;

            let record = handler
                .advance_ticket(ChannelId::new(900), TicketStatus::Claimed, Some(BOB))
                .await
                .unwrap();
            assert_eq!(record.status, TicketStatus::Claimed);
            assert_eq!(record.claimed_by, Some(BOB.get()));
            assert_eq!(handler.counter.current(), 1);
        }

        #[tokio::test]
        async fn test_failed_permission_update_leaves_ticket_unclaimed() {
            let (handler, _dir) = make_handler(FixedClock::at(start())).await;
            opened(&handler, 900).await;

            let err = handler
                .claim_ticket(ChannelId::new(900), BOB, async {
                    Err(anyhow::anyhow!("missing permissions"))
                })
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), "missing permissions");

            let record = handler.ticket_in(ChannelId::new(900)).await.unwrap();
            assert_eq!(record.status, TicketStatus::Created);
            assert_eq!(record.claimed_by, None);

            let record = handler
                .claim_ticket(ChannelId::new(900), BOB, async { Ok(()) })
                .await
                .unwrap();
            assert_eq!(record.status, TicketStatus::Claimed);
            assert_eq!(record.claimed_by, Some(BOB.get()));
        }

        #[tokio::test]
        async fn test_claim_outside_ticket_grants_nothing() {
            let (handler, _dir) = make_handler(FixedClock::at(start())).await;
            let granted = AtomicBool::new(false);

            let err = handler
                .claim_ticket(ChannelId::new(1234), BOB, async {
                    granted.store(true, Ordering::SeqCst);
                    Ok(())
                })
                .await
                .unwrap_err();

            assert!(matches!(
                err.downcast_ref::<TicketError>(),
                Some(TicketError::NotATicket)
            ));
            assert!(!granted.load(Ordering::SeqCst));
        }

        #[tokio::test]
        async fn test_claim_after_close_grants_nothing() {
            let (handler, _dir) = make_handler(FixedClock::at(start())).await;
            opened(&handler, 900).await;
            handler
                .advance_ticket(ChannelId::new(900), TicketStatus::Closed, None)
                .await
                .unwrap();
            let granted = AtomicBool::new(false);

            let result = handler
                .claim_ticket(ChannelId::new(900), BOB, async {
                    granted.store(true, Ordering::SeqCst);
                    Ok(())
                })
                .await;

            assert!(result.is_err());
            assert!(!granted.load(Ordering::SeqCst));
        }

        #[tokio::test]
        async fn test_close_then_resolve_is_rejected() {
            let (handler, _dir) = make_handler(FixedClock::at(start())).await;
            opened(&handler, 900).await;

            handler
                .advance_ticket(ChannelId::new(900), TicketStatus::Closed, None)
                .await
                .unwrap();
            let err = handler
                .advance_ticket(ChannelId::new(900), TicketStatus::Resolved, None)
                .await
                .unwrap_err();

            assert!(matches!(
                err.downcast_ref::<TicketError>(),
                Some(TicketError::InvalidTransition {
                    from: TicketStatus::Closed,
                    to: TicketStatus::Resolved
                })
            ));
        }

        #[tokio::test]
        async fn test_resolve_without_claim_then_delete() {
            let (handler, _dir) = make_handler(FixedClock::at(start())).await;
            opened(&handler, 900).await;

            handler
                .advance_ticket(ChannelId::new(900), TicketStatus::Resolved, None)
                .await
                .unwrap();
            let record = handler
                .advance_ticket(ChannelId::new(900), TicketStatus::Deleted, None)
                .await
                .unwrap();

            assert_eq!(record.status, TicketStatus::Deleted);
            assert_eq!(handler.database.open_ticket_count().await.unwrap(), 0);
        }

        #[tokio::test]
        async fn test_non_ticket_channel_is_rejected() {
            let (handler, _dir) = make_handler(FixedClock::at(start())).await;

            let err = handler
                .advance_ticket(ChannelId::new(1234), TicketStatus::Claimed, Some(BOB))
                .await
                .unwrap_err();
            assert!(matches!(
                err.downcast_ref::<TicketError>(),
                Some(TicketError::NotATicket)
            ));
        }

        #[tokio::test]
        async fn test_concurrent_close_only_one_wins() {
            let (handler, _dir) = make_handler(FixedClock::at(start())).await;
            opened(&handler, 900).await;
            let handler = Arc::new(handler);

            let a = {
                let handler = handler.clone();
                tokio::spawn(async move {
                    handler
                        .advance_ticket(ChannelId::new(900), TicketStatus::Closed, None)
                        .await
                        .is_ok()
                })
            };
            let b = {
                let handler = handler.clone();
                tokio::spawn(async move {
                    handler
                        .advance_ticket(ChannelId::new(900), TicketStatus::Resolved, None)
                        .await
                        .is_ok()
                })
            };

            let wins = [a.await.unwrap(), b.await.unwrap()]
                .iter()
                .filter(|won| **won)
                .count();
            assert_eq!(wins, 1);
        }
    }
}
