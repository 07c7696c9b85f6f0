//! Catalog view filters

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AppError;

/// Which slice of the catalog a listing shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListFilter {
    #[default]
    All,
    /// Entries authored by the active user
    #[serde(alias = "my-dreams")]
    Mine,
    CheckedOut,
    Available,
}

impl FromStr for ListFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(ListFilter::All),
            "mine" | "my-dreams" => Ok(ListFilter::Mine),
            "checked-out" | "checkedout" => Ok(ListFilter::CheckedOut),
            "available" => Ok(ListFilter::Available),
            other => Err(AppError::Validation(format!("Unknown filter '{}'", other))),
        }
    }
}

impl std::fmt::Display for ListFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ListFilter::All => "all",
            ListFilter::Mine => "mine",
            ListFilter::CheckedOut => "checked-out",
            ListFilter::Available => "available",
        };
        write!(f, "{}", label)
    }
}
