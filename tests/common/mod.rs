#![allow(dead_code)]

use powerline_segments::{Environment, ProbeError, RequestOptions};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Scripted stand-in for the host: answers only what a test registered.
#[derive(Default)]
pub struct MockEnvironment {
    installed: HashSet<String>,
    outputs: HashMap<String, Result<String, String>>,
    responses: HashMap<String, Result<Vec<u8>, String>>,
    pub command_calls: Mutex<Vec<String>>,
    pub requests: Mutex<Vec<(String, RequestOptions)>>,
}

fn command_key(name: &str, args: &[&str]) -> String {
    std::iter::once(name)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command(mut self, name: &str) -> Self {
        self.installed.insert(name.to_string());
        self
    }

    pub fn with_output(mut self, name: &str, args: &[&str], output: Result<&str, &str>) -> Self {
        self.outputs.insert(
            command_key(name, args),
            output.map(str::to_string).map_err(str::to_string),
        );
        self
    }

    pub fn with_response(mut self, url: &str, response: Result<&str, &str>) -> Self {
        self.responses.insert(
            url.to_string(),
            response.map(|body| body.as_bytes().to_vec()).map_err(str::to_string),
        );
        self
    }

    pub fn command_calls(&self) -> Vec<String> {
        self.command_calls.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<(String, RequestOptions)> {
        self.requests.lock().unwrap().clone()
    }
}

impl Environment for MockEnvironment {
    fn has_command(&self, name: &str) -> bool {
        self.installed.contains(name)
    }

    async fn run_command(&self, name: &str, args: &[&str]) -> Result<String, ProbeError> {
        let key = command_key(name, args);
        self.command_calls.lock().unwrap().push(key.clone());

        match self.outputs.get(&key) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(stderr)) => Err(ProbeError::ExitStatus {
                command: name.to_string(),
                code: Some(1),
                stderr: stderr.clone(),
            }),
            None => Err(ProbeError::CommandNotFound(name.to_string())),
        }
    }

    async fn http_request(&self, url: &str, options: &RequestOptions) -> Result<Vec<u8>, ProbeError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), options.clone()));

        match self.responses.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(message)) => Err(ProbeError::Transport(message.clone())),
            None => Err(ProbeError::Status(404)),
        }
    }
}
