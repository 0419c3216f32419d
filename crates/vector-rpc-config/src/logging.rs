//! Log output formats.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Shape of each event the dispatcher writes to stderr.
///
/// Set with `log_format` in the configuration file, `VECTOR_RPC_LOG_FORMAT`
/// or `--log-format`. Names match without regard to case.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// A JSON object per line with the event fields at the top level.
    #[default]
    Json,
    /// Terse text lines for reading in a terminal.
    Compact,
}

/// Raised for a format name other than `json` or `compact`.
pub type LogFormatParseError = strum::ParseError;
