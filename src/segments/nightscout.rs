use crate::config::NightscoutConfig;
use crate::environment::{Environment, RequestOptions, DEFAULT_HTTP_TIMEOUT};
use crate::segments::{Disabled, Segment, SegmentState};
use crate::utils::debug_with_context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;
use std::time::Duration;
use strum::EnumString;

/// Trend label attached to a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum Direction {
    DoubleUp,
    SingleUp,
    FortyFiveUp,
    Flat,
    FortyFiveDown,
    SingleDown,
    DoubleDown,
    #[strum(serialize = "NOT COMPUTABLE")]
    NotComputable,
    #[strum(serialize = "RATE OUT OF RANGE")]
    RateOutOfRange,
    #[strum(serialize = "NONE")]
    NoTrend,
}

impl Direction {
    /// Unknown labels are treated like `NONE`.
    pub fn parse(label: &str) -> Self {
        Self::from_str(label).unwrap_or(Self::NoTrend)
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::DoubleUp => "↑↑",
            Self::SingleUp => "↑",
            Self::FortyFiveUp => "↗",
            Self::Flat => "→",
            Self::FortyFiveDown => "↘",
            Self::SingleDown => "↓",
            Self::DoubleDown => "↓↓",
            Self::NotComputable | Self::RateOutOfRange | Self::NoTrend => "",
        }
    }
}

/// One sensor glucose value.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub sgv: i64,
    pub direction: String,
    pub date: Option<DateTime<Utc>>,
}

impl Reading {
    /// Lenient extraction: only a non-object entry is rejected.
    pub fn from_json(value: &Value) -> Result<Self, Disabled> {
        let entry = value
            .as_object()
            .ok_or_else(|| Disabled::MalformedPayload(format!("reading is not an object: {}", value)))?;

        let sgv = entry
            .get("sgv")
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64)))
            .unwrap_or_default();

        let direction = entry
            .get("direction")
            .and_then(Value::as_str)
            .unwrap_or("NONE")
            .to_string();

        let date = entry
            .get("date")
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
            .and_then(DateTime::<Utc>::from_timestamp_millis);

        Ok(Self { sgv, direction, date })
    }

    pub fn trend(&self) -> Direction {
        Direction::parse(&self.direction)
    }

    pub fn trend_icon(&self) -> &'static str {
        self.trend().icon()
    }
}

/// Parses an entries payload and picks the newest reading.
///
/// The feed is expected newest-first, but selection goes by `date` anyway;
/// undated readings rank last and ties keep feed order. Entries that are not
/// objects are skipped.
pub fn parse_readings(body: &[u8]) -> Result<Reading, Disabled> {
    let entries: Vec<Value> =
        serde_json::from_slice(body).map_err(|e| Disabled::MalformedPayload(e.to_string()))?;

    let readings = entries.iter().filter_map(|entry| match Reading::from_json(entry) {
        Ok(reading) => Some(reading),
        Err(e) => {
            debug_with_context("nightscout", &format!("skipping entry: {}", e));
            None
        }
    });

    let mut newest: Option<Reading> = None;
    for reading in readings {
        let replace = match &newest {
            None => true,
            Some(current) => reading.date > current.date,
        };
        if replace {
            newest = Some(reading);
        }
    }

    newest.ok_or(Disabled::EmptyResult)
}

/// Fields available to nightscout templates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NightscoutInfo {
    pub sgv: i64,
    pub direction: String,
    pub trend_icon: String,
    /// Epoch milliseconds.
    pub date: Option<i64>,
}

impl From<Reading> for NightscoutInfo {
    fn from(reading: Reading) -> Self {
        Self {
            sgv: reading.sgv,
            trend_icon: reading.trend_icon().to_string(),
            date: reading.date.map(|d| d.timestamp_millis()),
            direction: reading.direction,
        }
    }
}

pub struct NightscoutSegment<E> {
    env: E,
    url: Option<String>,
    options: RequestOptions,
    template: Option<String>,
    state: SegmentState<NightscoutInfo>,
}

impl<E: Environment> NightscoutSegment<E> {
    pub fn new(config: NightscoutConfig, env: E) -> Self {
        let timeout = config
            .http_timeout
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT);

        Self {
            env,
            url: config.url,
            options: RequestOptions {
                headers: config.headers.unwrap_or_default(),
                timeout,
            },
            template: config.template,
            state: SegmentState::default(),
        }
    }
}

impl<E: Environment> Segment for NightscoutSegment<E> {
    type Model = NightscoutInfo;

    fn name(&self) -> &'static str {
        "nightscout"
    }

    fn default_template(&self) -> &'static str {
        "\u{e2a1} {{ Sgv }}{{ TrendIcon }}"
    }

    fn template(&self) -> &str {
        self.template.as_deref().unwrap_or(self.default_template())
    }

    async fn probe(&self) -> Result<NightscoutInfo, Disabled> {
        let url = self
            .url
            .as_deref()
            .ok_or(Disabled::NotConfigured("url"))?;

        let body = self
            .env
            .http_request(url, &self.options)
            .await
            .map_err(Disabled::TransportError)?;

        let reading = parse_readings(&body)?;
        debug_with_context(
            "nightscout",
            &format!("sgv={} direction={}", reading.sgv, reading.direction),
        );

        Ok(reading.into())
    }

    fn state(&self) -> &SegmentState<NightscoutInfo> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SegmentState<NightscoutInfo> {
        &mut self.state
    }
}
