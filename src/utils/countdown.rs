use std::future::Future;
use std::time::Duration;

/// The two channel operations a closing ticket needs.
pub trait ClosingChannel {
    fn post_notice(&self, text: &str) -> impl Future<Output = anyhow::Result<()>> + Send;
    fn delete(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[derive(Debug)]
pub enum CountdownOutcome {
    Deleted,
    DeleteFailed(anyhow::Error),
}

/// Post one notice, wait out `delay`, then delete the channel.
///
/// The wait cannot be cancelled. A failed notice does not stop the deletion
/// and a failed deletion is handed back instead of propagated.
pub async fn run_deletion_countdown<C: ClosingChannel>(
    channel: &C,
    notice: &str,
    delay: Duration,
) -> CountdownOutcome {
    if let Err(e) = channel.post_notice(notice).await {
        tracing::warn!("[TICKET] Failed to post closing notice: {}", e);
    }

    tokio::time::sleep(delay).await;

    match channel.delete().await {
        Ok(()) => CountdownOutcome::Deleted,
        Err(e) => {
            tracing::error!("[TICKET] Failed to delete ticket channel: {}", e);
            CountdownOutcome::DeleteFailed(e)
        }
    }
}

/// Finish setting up a channel that was just created. If any step fails the
/// channel is deleted so no half-built ticket is left in the guild, and the
/// setup error is returned.
pub async fn discard_on_failure<C, T, F>(channel: &C, setup: F) -> anyhow::Result<T>
where
    C: ClosingChannel,
    F: Future<Output = anyhow::Result<T>>,
{
    match setup.await {
        Ok(value) => Ok(value),
        Err(e) => {
            if let Err(delete_err) = channel.delete().await {
                tracing::warn!(
                    "[TICKET] Failed to remove half-created ticket channel: {}",
                    delete_err
                );
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::Instant;

    #[derive(Default)]
    struct RecordingChannel {
        events: Mutex<Vec<(String, Instant)>>,
        fail_notice: bool,
        fail_delete: bool,
    }

    impl RecordingChannel {
        fn events(&self) -> Vec<(String, Instant)> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ClosingChannel for RecordingChannel {
        async fn post_notice(&self, text: &str) -> anyhow::Result<()> {
            self.events
                .lock()
                .unwrap()
                .push((format!("notice:{}", text), Instant::now()));
            if self.fail_notice {
                anyhow::bail!("missing access");
            }
            Ok(())
        }

        async fn delete(&self) -> anyhow::Result<()> {
            self.events
                .lock()
                .unwrap()
                .push(("delete".to_string(), Instant::now()));
            if self.fail_delete {
                anyhow::bail!("unknown channel");
            }
            Ok(())
        }
    }

    const DELAY: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn test_one_notice_then_delete_after_delay() {
        let channel = RecordingChannel::default();
        let outcome = run_deletion_countdown(&channel, "closing", DELAY).await;

        assert!(matches!(outcome, CountdownOutcome::Deleted));
        let events = channel.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].0, "notice:closing");
        assert_eq!(events[1].0, "delete");
        assert!(events[1].1 - events[0].1 >= DELAY);
    }

    #[tokio::test]
    async fn test_failed_delete_is_returned_not_propagated() {
        let channel = RecordingChannel {
            fail_delete: true,
            ..Default::default()
        };
        let outcome = run_deletion_countdown(&channel, "closing", DELAY).await;

        match outcome {
            CountdownOutcome::DeleteFailed(e) => assert_eq!(e.to_string(), "unknown channel"),
            other => panic!("expected failure, got {:?}", other),
        }
        let notices = channel
            .events()
            .iter()
            .filter(|(event, _)| event.starts_with("notice:"))
            .count();
        assert_eq!(notices, 1);
    }

    #[tokio::test]
    async fn test_failed_notice_still_deletes() {
        let channel = RecordingChannel {
            fail_notice: true,
            ..Default::default()
        };
        let outcome = run_deletion_countdown(&channel, "closing", DELAY).await;

        assert!(matches!(outcome, CountdownOutcome::Deleted));
        assert_eq!(channel.events().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_setup_removes_channel() {
        let channel = RecordingChannel::default();
        let result: anyhow::Result<()> =
            discard_on_failure(&channel, async { Err(anyhow::anyhow!("database is locked")) }).await;

        assert_eq!(result.unwrap_err().to_string(), "database is locked");
        let events: Vec<String> = channel.events().into_iter().map(|(e, _)| e).collect();
        assert_eq!(events, vec!["delete"]);
    }

    #[tokio::test]
    async fn test_successful_setup_keeps_channel() {
        let channel = RecordingChannel::default();
        let value = discard_on_failure(&channel, async { Ok(7) }).await.unwrap();

        assert_eq!(value, 7);
        assert!(channel.events().is_empty());
    }

    #[tokio::test]
    async fn test_setup_error_wins_over_delete_error() {
        let channel = RecordingChannel {
            fail_delete: true,
            ..Default::default()
        };
        let result: anyhow::Result<()> =
            discard_on_failure(&channel, async { Err(anyhow::anyhow!("missing access")) }).await;

        assert_eq!(result.unwrap_err().to_string(), "missing access");
        assert_eq!(channel.events().len(), 1);
    }
}
