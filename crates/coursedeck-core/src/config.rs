//! Page configuration
//!
//! Every field has a default, so an empty JSON object is a valid config.

use coursedeck_catalog::EnrollMatcher;
use coursedeck_links::UtmTagger;
use coursedeck_tabs::SwipeConfig;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Campaign parameter appended to outbound links, as `key=value`
    pub utm_param: String,
    /// Remember a dismissed info banner for the rest of the session
    pub persist_alert_dismiss: bool,
    pub alert_storage_key: String,
    /// Link texts that mark a course as free to enroll
    pub enroll_keywords: Vec<String>,
    pub gestures: SwipeConfig,
    pub timing: TimingConfig,
    pub main_button: MainButtonConfig,
    pub layout: LayoutConfig,
    /// Default log filter for the browser console
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Duration of the swipe slide animation
    pub tab_settle_ms: u32,
    /// Grace period of the `is-leaving` class on action links
    pub hover_grace_ms: u32,
    pub resize_debounce_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tab_settle_ms: 300,
            hover_grace_ms: 260,
            resize_debounce_ms: 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainButtonConfig {
    pub enabled: bool,
    pub text: String,
    /// Tab while which the button is shown
    pub visible_on_tab: String,
}

impl Default for MainButtonConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            text: "Записаться".to_string(),
            visible_on_tab: "courses".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub card_width: f64,
    pub card_gap: f64,
}

impl LayoutConfig {
    /// Narrowest container that fits two card columns
    pub fn two_column_min_width(&self) -> f64 {
        self.card_width * 2.0 + self.card_gap * 3.0
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            card_width: 140.0,
            card_gap: 10.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            utm_param: "utm_source=pp_tma".to_string(),
            persist_alert_dismiss: false,
            alert_storage_key: "stepik_alert_hidden".to_string(),
            enroll_keywords: vec![
                "записать".to_string(),
                "записаться".to_string(),
                "записан".to_string(),
            ],
            gestures: SwipeConfig::default(),
            timing: TimingConfig::default(),
            main_button: MainButtonConfig::default(),
            layout: LayoutConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.tagger()?;

        let gestures = &self.gestures;
        let thresholds = [
            ("gestures.trigger_distance", gestures.trigger_distance),
            ("gestures.vertical_lock", gestures.vertical_lock),
            ("gestures.scroll_suppress", gestures.scroll_suppress),
            ("layout.card_width", self.layout.card_width),
        ];
        for (name, value) in thresholds {
            if !(value.is_finite() && value > 0.0) {
                return Err(CoreError::Config(format!("{name} must be positive")));
            }
        }

        if self.layout.card_gap < 0.0 {
            return Err(CoreError::Config(
                "layout.card_gap must not be negative".to_string(),
            ));
        }

        if self.alert_storage_key.trim().is_empty() {
            return Err(CoreError::Config(
                "alert_storage_key must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn tagger(&self) -> Result<UtmTagger> {
        Ok(UtmTagger::parse(&self.utm_param)?)
    }

    pub fn enroll_matcher(&self) -> EnrollMatcher {
        EnrollMatcher::new(&self.enroll_keywords)
    }
}
