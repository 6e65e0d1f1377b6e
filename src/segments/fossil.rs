//! Fossil working-tree status.
//!
//! `fossil status` prints a block of `label: value` headers followed by one
//! line per changed file, each starting with an upper-case status keyword.
//! Unknown keywords are skipped, so newer Fossil releases degrade to smaller
//! counts instead of a hidden segment.

use crate::config::FossilConfig;
use crate::environment::Environment;
use crate::segments::{Disabled, Segment, SegmentState};
use crate::utils::debug_with_context;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use strum::EnumString;

pub const FOSSIL_COMMAND: &str = "fossil";
pub const FOSSIL_STATUS_ARGS: &[&str] = &["status"];

/// Header labels whose value names the current branch or tag.
const BRANCH_LABELS: &[&str] = &["tags"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Added,
    Modified,
    Deleted,
    Renamed,
    Conflicted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusKeyword {
    Added,
    AddedByIntegrate,
    AddedByMerge,
    Edited,
    Updated,
    UpdatedByIntegrate,
    UpdatedByMerge,
    Changed,
    Deleted,
    Missing,
    Renamed,
    Conflict,
}

impl StatusKeyword {
    pub fn category(self) -> Category {
        match self {
            Self::Added | Self::AddedByIntegrate | Self::AddedByMerge => Category::Added,
            Self::Edited
            | Self::Updated
            | Self::UpdatedByIntegrate
            | Self::UpdatedByMerge
            | Self::Changed => Category::Modified,
            Self::Deleted | Self::Missing => Category::Deleted,
            Self::Renamed => Category::Renamed,
            Self::Conflict => Category::Conflicted,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub added: u32,
    pub modified: u32,
    pub deleted: u32,
    pub renamed: u32,
    pub conflicted: u32,
}

impl StatusCounts {
    pub fn record(&mut self, category: Category) {
        let counter = match category {
            Category::Added => &mut self.added,
            Category::Modified => &mut self.modified,
            Category::Deleted => &mut self.deleted,
            Category::Renamed => &mut self.renamed,
            Category::Conflicted => &mut self.conflicted,
        };
        *counter += 1;
    }

    pub fn changed(&self) -> bool {
        *self != Self::default()
    }
}

/// `+added ~modified -deleted >renamed !conflicted`, zero counts left out.
impl fmt::Display for StatusCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            ('+', self.added),
            ('~', self.modified),
            ('-', self.deleted),
            ('>', self.renamed),
            ('!', self.conflicted),
        ];

        let mut first = true;
        for (symbol, count) in parts {
            if count == 0 {
                continue;
            }
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{}{}", symbol, count)?;
            first = false;
        }
        Ok(())
    }
}

/// One line of the changed-file listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine<'a> {
    pub keyword: &'a str,
    pub remainder: &'a str,
}

impl<'a> StatusLine<'a> {
    /// Splits a normalized line into its leading keyword and the rest.
    pub fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (keyword, remainder) = line.split_once(' ').unwrap_or((line, ""));
        Some(Self { keyword, remainder })
    }

    pub fn category(&self) -> Option<Category> {
        StatusKeyword::from_str(self.keyword)
            .ok()
            .map(StatusKeyword::category)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FossilStatus {
    pub branch: String,
    pub counts: StatusCounts,
}

fn normalize_line(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn branch_value(line: &str) -> Option<&str> {
    let (label, value) = line.split_once(':')?;
    BRANCH_LABELS
        .contains(&label.trim())
        .then(|| value.trim())
}

/// Reduces `fossil status` output to a branch and per-category counts.
pub fn parse_status(output: &str) -> FossilStatus {
    let mut status = FossilStatus::default();

    for raw in output.lines() {
        let line = normalize_line(raw);
        if line.is_empty() {
            continue;
        }

        if let Some(branch) = branch_value(&line) {
            status.branch = branch.to_string();
            continue;
        }

        if let Some(category) = StatusLine::parse(&line).and_then(|l| l.category()) {
            status.counts.record(category);
        }
    }

    status
}

/// Fields available to fossil templates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FossilInfo {
    pub branch: String,
    pub status: String,
    pub changed: bool,
    pub added: u32,
    pub modified: u32,
    pub deleted: u32,
    pub renamed: u32,
    pub conflicted: u32,
}

impl From<FossilStatus> for FossilInfo {
    fn from(status: FossilStatus) -> Self {
        let counts = status.counts;
        Self {
            branch: status.branch,
            status: counts.to_string(),
            changed: counts.changed(),
            added: counts.added,
            modified: counts.modified,
            deleted: counts.deleted,
            renamed: counts.renamed,
            conflicted: counts.conflicted,
        }
    }
}

pub struct FossilSegment<E> {
    env: E,
    command: String,
    template: Option<String>,
    state: SegmentState<FossilInfo>,
}

impl<E: Environment> FossilSegment<E> {
    pub fn new(config: FossilConfig, env: E) -> Self {
        Self {
            env,
            command: config.command.unwrap_or_else(|| FOSSIL_COMMAND.to_string()),
            template: config.template,
            state: SegmentState::default(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl<E: Environment> Segment for FossilSegment<E> {
    type Model = FossilInfo;

    fn name(&self) -> &'static str {
        "fossil"
    }

    fn default_template(&self) -> &'static str {
        "\u{e725} {{ Branch }}{% if Changed %} {{ Status }}{% endif %}"
    }

    fn template(&self) -> &str {
        self.template.as_deref().unwrap_or(self.default_template())
    }

    async fn probe(&self) -> Result<FossilInfo, Disabled> {
        if !self.env.has_command(&self.command) {
            return Err(Disabled::ToolUnavailable(self.command.clone()));
        }

        let output = self
            .env
            .run_command(&self.command, FOSSIL_STATUS_ARGS)
            .await
            .map_err(Disabled::ExecutionError)?;

        let status = parse_status(&output);
        debug_with_context(
            "fossil",
            &format!("branch={:?}, status={:?}", status.branch, status.counts.to_string()),
        );

        Ok(status.into())
    }

    fn state(&self) -> &SegmentState<FossilInfo> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SegmentState<FossilInfo> {
        &mut self.state
    }
}
