//! The boundary segments use to reach the outside world.
//!
//! Segments never spawn processes or open sockets themselves; they ask an
//! [`Environment`] and interpret whatever comes back. Tests substitute a
//! scripted implementation, the binary uses [`SystemEnvironment`].

pub mod system;

pub use system::SystemEnvironment;

use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("command not found: {0}")]
    CommandNotFound(String),
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{command} exited with {code:?}: {stderr}")]
    ExitStatus {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("background task failed: {0}")]
    Join(String),
}

/// Per-request knobs handed to [`Environment::http_request`].
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub headers: HashMap<String, String>,
    pub timeout: Duration,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            headers: HashMap::new(),
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait Environment {
    fn has_command(&self, name: &str) -> bool;

    /// Runs `name args...` and returns its stdout when it exits successfully.
    async fn run_command(&self, name: &str, args: &[&str]) -> Result<String, ProbeError>;

    /// Performs a GET against `url` and returns the raw response body.
    async fn http_request(&self, url: &str, options: &RequestOptions) -> Result<Vec<u8>, ProbeError>;
}

impl<E: Environment + ?Sized> Environment for std::sync::Arc<E> {
    fn has_command(&self, name: &str) -> bool {
        (**self).has_command(name)
    }

    async fn run_command(&self, name: &str, args: &[&str]) -> Result<String, ProbeError> {
        (**self).run_command(name, args).await
    }

    async fn http_request(&self, url: &str, options: &RequestOptions) -> Result<Vec<u8>, ProbeError> {
        (**self).http_request(url, options).await
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn has_command(&self, name: &str) -> bool {
        (**self).has_command(name)
    }

    async fn run_command(&self, name: &str, args: &[&str]) -> Result<String, ProbeError> {
        (**self).run_command(name, args).await
    }

    async fn http_request(&self, url: &str, options: &RequestOptions) -> Result<Vec<u8>, ProbeError> {
        (**self).http_request(url, options).await
    }
}
