//! Names of the capability modules an operator can expose.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// A capability module that can be enabled on the RPC surface.
#[derive(
    Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ApiName {
    /// Read-only network status queries (`net_*`).
    Net,
    /// Miner control (`miner_*`).
    Miner,
}

/// Error raised when an API list names a module that does not exist.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown api '{name}'")]
pub struct UnknownApiError {
    name: String,
}

impl UnknownApiError {
    /// Returns the offending entry.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl ApiName {
    /// Parses a comma-separated list such as `"net,miner"`.
    ///
    /// Entries are trimmed and empty entries are skipped. Repeated names are
    /// kept once, in the position of their first occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownApiError`] for the first entry that is not a known
    /// module name.
    pub fn parse_list(value: &str) -> Result<Vec<Self>, UnknownApiError> {
        let mut apis = Vec::new();
        for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let api = entry.parse::<Self>().map_err(|_| UnknownApiError {
                name: entry.to_owned(),
            })?;
            if !apis.contains(&api) {
                apis.push(api);
            }
        }
        Ok(apis)
    }

    /// Every module known to the node, in default exposure order.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Net, Self::Miner]
    }
}

/// Ordered, duplicate-free list of enabled modules.
///
/// Configuration files give the list as a TOML array. Environment variables
/// and command-line flags give it as comma-separated text, which is parsed
/// with [`ApiName::parse_list`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "RawApiList", into = "Vec<ApiName>")]
pub struct ApiList(Vec<ApiName>);

impl ApiList {
    /// Wraps `apis`, dropping repeated names after their first occurrence.
    #[must_use]
    pub fn new(apis: impl IntoIterator<Item = ApiName>) -> Self {
        let mut unique = Vec::new();
        for api in apis {
            if !unique.contains(&api) {
                unique.push(api);
            }
        }
        Self(unique)
    }

    /// Enabled modules in merge order.
    #[must_use]
    pub fn as_slice(&self) -> &[ApiName] {
        self.0.as_slice()
    }

    /// Iterates the enabled modules in merge order.
    pub fn iter(&self) -> std::slice::Iter<'_, ApiName> {
        self.0.iter()
    }
}

impl Default for ApiList {
    fn default() -> Self {
        Self(ApiName::all().to_vec())
    }
}

impl From<Vec<ApiName>> for ApiList {
    fn from(apis: Vec<ApiName>) -> Self {
        Self::new(apis)
    }
}

impl From<ApiList> for Vec<ApiName> {
    fn from(list: ApiList) -> Self {
        list.0
    }
}

impl FromStr for ApiList {
    type Err = UnknownApiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ApiName::parse_list(value).map(Self)
    }
}

impl<'a> IntoIterator for &'a ApiList {
    type Item = &'a ApiName;
    type IntoIter = std::slice::Iter<'a, ApiName>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawApiList {
    List(Vec<ApiName>),
    Csv(String),
}

impl TryFrom<RawApiList> for ApiList {
    type Error = UnknownApiError;

    fn try_from(raw: RawApiList) -> Result<Self, Self::Error> {
        match raw {
            RawApiList::List(apis) => Ok(Self::new(apis)),
            RawApiList::Csv(text) => text.parse(),
        }
    }
}
