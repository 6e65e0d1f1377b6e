use super::{Environment, ProbeError, RequestOptions};
use crate::utils::{debug_with_context, Cache};
use std::time::Duration;
use tokio::process::Command;

/// Environment backed by the real host: `PATH` lookups, child processes and HTTP.
#[derive(Clone)]
pub struct SystemEnvironment {
    commands: Cache<String, bool>,
}

impl SystemEnvironment {
    pub fn new() -> Self {
        Self {
            commands: Cache::new(Duration::from_secs(30)),
        }
    }
}

impl Default for SystemEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for SystemEnvironment {
    fn has_command(&self, name: &str) -> bool {
        self.commands.get_or_insert_with(name.to_string(), || {
            let found = which::which(name).is_ok();
            debug_with_context("env", &format!("has_command({}) = {}", name, found));
            found
        })
    }

    async fn run_command(&self, name: &str, args: &[&str]) -> Result<String, ProbeError> {
        debug_with_context("env", &format!("running {} {}", name, args.join(" ")));

        let output = Command::new(name)
            .args(args)
            .output()
            .await
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::NotFound => ProbeError::CommandNotFound(name.to_string()),
                _ => ProbeError::Spawn {
                    command: name.to_string(),
                    source,
                },
            })?;

        if !output.status.success() {
            return Err(ProbeError::ExitStatus {
                command: name.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn http_request(&self, url: &str, options: &RequestOptions) -> Result<Vec<u8>, ProbeError> {
        debug_with_context("env", &format!("GET {}", url));

        let url = url.to_string();
        let options = options.clone();
        // ureq is blocking; keep it off the async workers.
        tokio::task::spawn_blocking(move || blocking_get(&url, &options))
            .await
            .map_err(|e| ProbeError::Join(e.to_string()))?
    }
}

fn blocking_get(url: &str, options: &RequestOptions) -> Result<Vec<u8>, ProbeError> {
    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(options.timeout))
        .http_status_as_error(false)
        .build()
        .into();

    let mut request = agent.get(url);
    for (name, value) in &options.headers {
        request = request.header(name.as_str(), value.as_str());
    }

    let mut response = request
        .call()
        .map_err(|e| ProbeError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProbeError::Status(status.as_u16()));
    }

    response
        .body_mut()
        .read_to_vec()
        .map_err(|e| ProbeError::Transport(e.to_string()))
}
