//! Read-only access to the bearer token.
//!
//! The token is owned by the login flow and lives in persistent storage.
//! This crate only reads it, and reads it on every request so a token
//! refreshed elsewhere takes effect on the next poll tick.

use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token file not found: {0}")]
    NotFound(PathBuf),
    #[error("Token is empty")]
    Empty,
    #[error("Token read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Capability injected into the API client instead of a global lookup.
pub trait TokenProvider: Send + Sync {
    fn bearer_token(&self) -> BoxFuture<'_, Result<String, TokenError>>;
}

fn non_empty(raw: &str) -> Result<String, TokenError> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(TokenError::Empty);
    }
    Ok(token.to_string())
}

/// Token stored as a single line in a file (the desktop equivalent of
/// browser local storage).
#[derive(Debug, Clone)]
pub struct FileTokenProvider {
    path: PathBuf,
}

impl FileTokenProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenProvider for FileTokenProvider {
    fn bearer_token(&self) -> BoxFuture<'_, Result<String, TokenError>> {
        async move {
            match tokio::fs::read_to_string(&self.path).await {
                Ok(raw) => non_empty(&raw),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    Err(TokenError::NotFound(self.path.clone()))
                }
                Err(e) => Err(TokenError::Io(e)),
            }
        }
        .boxed()
    }
}

/// Fixed token, for tests and one-shot tools.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider(String);

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenProvider for StaticTokenProvider {
    fn bearer_token(&self) -> BoxFuture<'_, Result<String, TokenError>> {
        futures_util::future::ready(non_empty(&self.0)).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_token_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "abc.def.ghi\n").unwrap();

        let provider = FileTokenProvider::new(&path);
        assert_eq!(provider.bearer_token().await.unwrap(), "abc.def.ghi");
    }

    #[tokio::test]
    async fn file_token_is_reread_on_every_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "first").unwrap();

        let provider = FileTokenProvider::new(&path);
        assert_eq!(provider.bearer_token().await.unwrap(), "first");

        std::fs::write(&path, "second").unwrap();
        assert_eq!(provider.bearer_token().await.unwrap(), "second");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileTokenProvider::new(dir.path().join("absent"));
        assert!(matches!(provider.bearer_token().await, Err(TokenError::NotFound(_))));
    }

    #[tokio::test]
    async fn blank_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "  \n").unwrap();
        assert!(matches!(FileTokenProvider::new(&path).bearer_token().await, Err(TokenError::Empty)));
    }

    #[tokio::test]
    async fn static_token() {
        assert_eq!(StaticTokenProvider::new("t").bearer_token().await.unwrap(), "t");
        assert!(StaticTokenProvider::new("").bearer_token().await.is_err());
    }
}
