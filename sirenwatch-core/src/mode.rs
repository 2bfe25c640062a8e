//! Application mode
//!
//! The app is either used by an ambulance driver (emergency and siren
//! controls, location sharing) or by a local road user (proximity alerts).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AppMode {
    #[default]
    Driver,
    Local,
}
