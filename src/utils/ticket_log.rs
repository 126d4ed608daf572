use chrono::{SecondsFormat, Utc};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// Longest log that is shown inline instead of attached as a file.
pub const INLINE_LIMIT: usize = 2000;

/// Append-only plain-text log, one record per line.
#[derive(Debug, Clone)]
pub struct TicketLog {
    path: PathBuf,
}

/// How a log is shown to an admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogView {
    Empty,
    Inline(String),
    Attachment { filename: String, data: Vec<u8> },
}

impl TicketLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn append(&self, record: &str) -> std::io::Result<()> {
        let line = format!(
            "[{}] {}\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            record.replace('\n', " ")
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Whole log content. A log that was never written reads as empty.
    pub async fn read(&self) -> std::io::Result<String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e),
        }
    }

    pub async fn view(&self) -> std::io::Result<LogView> {
        let content = self.read().await?;
        let filename = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "log.txt".to_string());
        Ok(LogView::render(content, &filename))
    }
}

impl LogView {
    pub fn render(content: String, filename: &str) -> Self {
        if content.trim().is_empty() {
            LogView::Empty
        } else if content.chars().count() <= INLINE_LIMIT {
            LogView::Inline(content)
        } else {
            LogView::Attachment {
                filename: filename.to_string(),
                data: content.into_bytes(),
            }
        }
    }
}
