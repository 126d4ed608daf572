use std::io::{BufRead, ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Failed to read token file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write token file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read token from the console: {0}")]
    Prompt(std::io::Error),
    #[error("No bot token was provided")]
    Empty,
}

/// Resolve the bot token: `DISCORD_TOKEN`, then the token file, then an
/// interactive prompt whose answer is saved to the token file.
pub fn load_token(token_file: &Path) -> Result<String, CredentialError> {
    if let Ok(token) = dotenvy::var("DISCORD_TOKEN")
        && !token.trim().is_empty()
    {
        return Ok(token.trim().to_string());
    }

    if let Some(token) = read_token_file(token_file)? {
        return Ok(token);
    }

    tracing::warn!(
        "[INIT] No token found in the environment or {}",
        token_file.display()
    );
    let stdin = std::io::stdin();
    let token = prompt_token(&mut stdin.lock(), &mut std::io::stdout())?;
    persist_token(token_file, &token)?;
    tracing::info!("[INIT] Token saved to {}", token_file.display());

    Ok(token)
}

/// First line of the token file, or `None` if the file is missing or blank.
pub fn read_token_file(path: &Path) -> Result<Option<String>, CredentialError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content
            .lines()
            .next()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(CredentialError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub fn prompt_token<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<String, CredentialError> {
    write!(output, "Enter the bot token: ").map_err(CredentialError::Prompt)?;
    output.flush().map_err(CredentialError::Prompt)?;

    let mut line = String::new();
    input.read_line(&mut line).map_err(CredentialError::Prompt)?;

    let token = line.trim();
    if token.is_empty() {
        return Err(CredentialError::Empty);
    }
    Ok(token.to_string())
}

pub fn persist_token(path: &Path, token: &str) -> Result<(), CredentialError> {
    std::fs::write(path, format!("{}\n", token)).map_err(|source| CredentialError::Write {
        path: path.to_path_buf(),
        source,
    })
}
