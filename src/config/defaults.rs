use crate::config::*;

pub const DEFAULT_SEPARATOR: &str = "  ";

impl Default for Config {
    fn default() -> Self {
        Self {
            separator: None,
            segments: SegmentConfig::default(),
        }
    }
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            fossil: Some(FossilConfig::default()),
            nightscout: Some(NightscoutConfig::default()),
        }
    }
}

impl Default for FossilConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: None,
            template: None,
        }
    }
}

impl Default for NightscoutConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: None,
            headers: None,
            http_timeout: None,
            template: None,
        }
    }
}
