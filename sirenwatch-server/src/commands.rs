//! Console commands
//!
//! One command per line on stdin. The single-letter forms match the app's
//! keyboard shortcuts: `e` toggles the emergency and `s` the siren (driver
//! mode only), `a` toggles proximity alerts (local mode only).

use std::str::FromStr;
use strum::{Display, EnumString};
use thiserror::Error;

use sirenwatch_core::driver::DriverEvent;
use sirenwatch_core::proximity::AlertSink;
use sirenwatch_core::scheduler::Scheduler;
use sirenwatch_core::AppMode;

use crate::session::AppSession;

/// Accuracy reported with shared locations, in meters
pub const DEFAULT_ACCURACY_M: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum Command {
    #[strum(to_string = "emergency", serialize = "e", serialize = "space")]
    Emergency,
    #[strum(to_string = "siren", serialize = "s")]
    Siren,
    #[strum(to_string = "alerts", serialize = "a")]
    Alerts,
    #[strum(to_string = "driver")]
    Driver,
    #[strum(to_string = "local")]
    Local,
    #[strum(to_string = "share")]
    Share,
    #[strum(to_string = "nav", serialize = "navigate")]
    Navigate,
    #[strum(to_string = "hide")]
    Hide,
    #[strum(to_string = "show")]
    Show,
    #[strum(to_string = "status")]
    Status,
    #[strum(to_string = "quit", serialize = "q", serialize = "exit")]
    Quit,
}

impl Command {
    /// Parse one input line; blank lines yield `None`
    pub fn parse_line(line: &str) -> Option<Result<Command, CommandError>> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        Some(Command::from_str(line).map_err(|_| CommandError::Unknown(line.to_string())))
    }

    /// Mode the command is restricted to, if any
    pub fn required_mode(&self) -> Option<AppMode> {
        match self {
            Command::Emergency | Command::Siren => Some(AppMode::Driver),
            Command::Alerts => Some(AppMode::Local),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (try: e, s, a, driver, local, share, nav, hide, show, status, quit)")]
    Unknown(String),
    #[error("'{command}' is only available in {required} mode")]
    WrongMode { command: Command, required: AppMode },
    #[error(transparent)]
    Core(#[from] sirenwatch_core::Error),
}

/// What the console should do after a command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Message(String),
    Quit,
}

/// Apply a command to the session.
pub fn execute<S, K>(
    session: &mut AppSession<S, K>,
    command: Command,
    timestamp_ms: u64,
) -> Result<Reply, CommandError>
where
    S: Scheduler,
    K: AlertSink + Clone + 'static,
{
    if let Some(required) = command.required_mode() {
        if session.mode() != required {
            return Err(CommandError::WrongMode { command, required });
        }
    }

    let message = match command {
        Command::Emergency => {
            let events = session.toggle_emergency();
            describe_driver(session.driver().emergency_active, &events)
        }
        Command::Siren => match session.toggle_siren() {
            DriverEvent::SirenStarted => "Siren ON".to_string(),
            _ => "Siren OFF".to_string(),
        },
        Command::Alerts => {
            if session.toggle_alerts() {
                "Proximity alerts ACTIVE".to_string()
            } else {
                "Proximity alerts INACTIVE".to_string()
            }
        }
        Command::Driver => {
            session.switch_mode(AppMode::Driver);
            "Driver mode".to_string()
        }
        Command::Local => {
            session.switch_mode(AppMode::Local);
            "Local mode".to_string()
        }
        Command::Share => {
            let report = session.share_location(DEFAULT_ACCURACY_M, timestamp_ms)?;
            format!(
                "Location shared with emergency dispatch: {:.6}, {:.6} (accuracy {:.0} m)",
                report.latitude, report.longitude, report.accuracy
            )
        }
        Command::Navigate => session.navigation_url()?,
        Command::Hide => {
            session.set_visible(false);
            "Hidden".to_string()
        }
        Command::Show => {
            session.set_visible(true);
            "Visible".to_string()
        }
        Command::Status => serde_json::to_string(&session.status())
            .unwrap_or_else(|e| format!("status unavailable: {}", e)),
        Command::Quit => return Ok(Reply::Quit),
    };
    Ok(Reply::Message(message))
}

fn describe_driver(emergency_active: bool, events: &[DriverEvent]) -> String {
    let mut message = if emergency_active {
        "Emergency ACTIVE".to_string()
    } else {
        "Emergency INACTIVE".to_string()
    };
    if events.contains(&DriverEvent::SirenStarted) {
        message.push_str(", siren ON");
    }
    if events.contains(&DriverEvent::SirenStopped) {
        message.push_str(", siren OFF");
    }
    message
}
