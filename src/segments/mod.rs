pub mod fossil;
pub mod nightscout;

pub use fossil::*;
pub use nightscout::*;

use crate::environment::ProbeError;
use crate::template;
use crate::utils::debug_with_context;
use serde::Serialize;
use thiserror::Error;

/// Why a segment decided to stay hidden. Never shown to the user.
#[derive(Debug, Error)]
pub enum Disabled {
    #[error("missing required option: {0}")]
    NotConfigured(&'static str),
    #[error("{0} is not installed")]
    ToolUnavailable(String),
    #[error("command failed: {0}")]
    ExecutionError(#[source] ProbeError),
    #[error("request failed: {0}")]
    TransportError(#[source] ProbeError),
    #[error("no results")]
    EmptyResult,
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Where a segment is in its single render pass.
#[derive(Debug)]
pub enum SegmentState<T> {
    Initialized,
    Enabled(T),
    Disabled(Disabled),
}

impl<T> Default for SegmentState<T> {
    fn default() -> Self {
        Self::Initialized
    }
}

impl<T> SegmentState<T> {
    pub fn model(&self) -> Option<&T> {
        match self {
            Self::Enabled(model) => Some(model),
            _ => None,
        }
    }

    pub fn disabled_reason(&self) -> Option<&Disabled> {
        match self {
            Self::Disabled(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }
}

/// Trait for all prompt segments.
///
/// Construction stores configuration and the environment handle without doing
/// any I/O. [`Segment::enabled`] performs the one probe round trip of a render
/// pass; [`Segment::render`] only reads what that probe produced.
#[allow(async_fn_in_trait)]
pub trait Segment {
    /// Canonical data exposed to templates.
    type Model: Serialize;

    /// Get segment name for debugging
    fn name(&self) -> &'static str;

    /// Template used when the configuration supplies none.
    fn default_template(&self) -> &'static str;

    /// Configured template, or the default one.
    fn template(&self) -> &str;

    /// Query the environment once and build the model.
    async fn probe(&self) -> Result<Self::Model, Disabled>;

    fn state(&self) -> &SegmentState<Self::Model>;

    fn state_mut(&mut self) -> &mut SegmentState<Self::Model>;

    /// Runs the probe and records the outcome. Every probe failure reads as `false`.
    async fn enabled(&mut self) -> bool {
        let outcome = self.probe().await;
        let name = self.name();
        *self.state_mut() = match outcome {
            Ok(model) => {
                debug_with_context(name, "enabled");
                SegmentState::Enabled(model)
            }
            Err(reason) => {
                debug_with_context(name, &format!("disabled: {}", reason));
                SegmentState::Disabled(reason)
            }
        };
        self.state().is_enabled()
    }

    /// Renders the template against the model, `None` unless enabled.
    fn render(&self) -> Option<String> {
        self.state()
            .model()
            .map(|model| template::render(self.template(), model))
    }
}
