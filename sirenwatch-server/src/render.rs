//! Console rendering of proximity alerts
//!
//! The native host has no display or speaker, so alerts become log lines.
//! `render` is kept pure so the wording and tone selection can be tested.

use serde::Serialize;

use sirenwatch_core::proximity::{AlertSink, AlertTier, ProximityReading};

/// Below this distance the alert tone gets a second, higher beep
const DOUBLE_BEEP_THRESHOLD_M: f64 = 50.0;

/// Audio cue that accompanies an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertTone {
    Silent,
    /// 1000 Hz for half a second
    Beep,
    /// Beep followed by a 1200 Hz beep
    DoubleBeep,
}

/// What the host shows for a tier notification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertDisplay {
    pub tier: AlertTier,
    pub headline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Whether the pop-up alert is shown
    pub popup: bool,
    pub tone: AlertTone,
}

pub fn render(tier: AlertTier, reading: &ProximityReading) -> AlertDisplay {
    let detail = tier
        .is_alert()
        .then(|| format!("{:.0} meters away", reading.distance_meters));

    let tone = match tier {
        AlertTier::Approaching if reading.distance_meters < DOUBLE_BEEP_THRESHOLD_M => {
            AlertTone::DoubleBeep
        }
        AlertTier::Approaching => AlertTone::Beep,
        AlertTier::Nearby | AlertTier::None => AlertTone::Silent,
    };

    AlertDisplay {
        tier,
        headline: tier.to_string(),
        detail,
        popup: tier == AlertTier::Approaching,
        tone,
    }
}

/// Sink that writes every notification to the log.
#[derive(Debug, Clone, Default)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn notify(&mut self, tier: AlertTier, reading: &ProximityReading) {
        let display = render(tier, reading);
        let detail = display.detail.as_deref().unwrap_or("");
        match display.tier {
            AlertTier::Approaching => {
                log::warn!("{} {} (tone: {:?})", display.headline, detail, display.tone)
            }
            AlertTier::Nearby => log::info!("{} {}", display.headline, detail),
            AlertTier::None => log::info!("{}", display.headline),
        }
    }
}
