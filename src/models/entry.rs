//! Library entry (shared dream) model and related types

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, immutable identifier of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntryId {
    fn from(v: u64) -> Self {
        EntryId(v)
    }
}

/// Card colour assigned at creation. Purely presentational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayTag {
    #[serde(rename = "#f8c8dc")]
    Pink,
    #[serde(rename = "#c8b8db")]
    Lavender,
    #[serde(rename = "#a8e6cf")]
    Mint,
    #[serde(rename = "#fff9e6")]
    Cream,
    #[serde(rename = "#ffd4e5")]
    Blush,
    #[serde(rename = "#e8dff5")]
    Lilac,
}

impl DisplayTag {
    pub const PALETTE: [DisplayTag; 6] = [
        DisplayTag::Pink,
        DisplayTag::Lavender,
        DisplayTag::Mint,
        DisplayTag::Cream,
        DisplayTag::Blush,
        DisplayTag::Lilac,
    ];

    /// Pick a palette entry uniformly at random
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        *Self::PALETTE.choose(&mut rng).unwrap_or(&DisplayTag::Pink)
    }

    pub fn hex(&self) -> &'static str {
        match self {
            DisplayTag::Pink => "#f8c8dc",
            DisplayTag::Lavender => "#c8b8db",
            DisplayTag::Mint => "#a8e6cf",
            DisplayTag::Cream => "#fff9e6",
            DisplayTag::Blush => "#ffd4e5",
            DisplayTag::Lilac => "#e8dff5",
        }
    }
}

/// One checkout event in an entry's ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRecord {
    pub user: String,
    #[serde(rename = "date", deserialize_with = "deserialize_checkout_time")]
    pub timestamp: DateTime<Utc>,
}

/// Locale renderings older snapshots stored checkout times in, read as UTC
const LEGACY_CHECKOUT_FORMATS: [&str; 4] = [
    "%m/%d/%Y, %I:%M:%S %p",
    "%d/%m/%Y, %H:%M:%S",
    "%d.%m.%Y, %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

fn parse_checkout_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    LEGACY_CHECKOUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw.trim(), fmt).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_checkout_time<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_checkout_time(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized checkout time '{}'", raw)))
}

/// A shared library entry.
///
/// The reader state is held as a single `Option`, so an entry can never be
/// checked out without a reader or carry a reader while available. The stored
/// form still has both `checkedOut` and `currentReader`; see [`EntryRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EntryRecord", into = "EntryRecord")]
pub struct Entry {
    id: EntryId,
    author: String,
    pub title: String,
    pub created_date: NaiveDate,
    pub description: String,
    pub theme: Option<String>,
    pub recurring: bool,
    current_reader: Option<String>,
    checkout_history: Vec<CheckoutRecord>,
    pub display_tag: DisplayTag,
}

impl Entry {
    /// Build a fresh, available entry from a validated draft
    pub fn new(id: EntryId, author: impl Into<String>, draft: EntryDraft) -> Self {
        Self {
            id,
            author: author.into(),
            title: draft.title.trim().to_string(),
            created_date: draft.date,
            description: draft.description,
            theme: normalize_theme(draft.theme),
            recurring: draft.recurring,
            current_reader: None,
            checkout_history: Vec::new(),
            display_tag: DisplayTag::random(),
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn is_checked_out(&self) -> bool {
        self.current_reader.is_some()
    }

    pub fn current_reader(&self) -> Option<&str> {
        self.current_reader.as_deref()
    }

    pub fn checkout_history(&self) -> &[CheckoutRecord] {
        &self.checkout_history
    }

    /// Number of times this entry has been checked out
    pub fn read_count(&self) -> usize {
        self.checkout_history.len()
    }

    pub fn is_authored_by(&self, user: &str) -> bool {
        self.author == user
    }

    pub fn is_read_by(&self, user: &str) -> bool {
        self.current_reader.as_deref() == Some(user)
    }

    /// Hand the entry to `reader` and record the checkout.
    /// Callers check availability first.
    pub(crate) fn lend_to(&mut self, reader: &str, at: DateTime<Utc>) {
        self.current_reader = Some(reader.to_string());
        self.checkout_history.push(CheckoutRecord {
            user: reader.to_string(),
            timestamp: at,
        });
    }

    /// Clear the reader. The ledger is left as is.
    pub(crate) fn take_back(&mut self) {
        self.current_reader = None;
    }

    /// Case-insensitive match over title, description, author and theme.
    /// `needle` must already be lowercase. Fields are joined with NUL so a
    /// typed needle never spans two of them.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let haystack = format!(
            "{}\0{}\0{}\0{}",
            self.title,
            self.description,
            self.author,
            self.theme.as_deref().unwrap_or("")
        )
        .to_lowercase();
        haystack.contains(needle)
    }
}

/// Input for creating an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub recurring: bool,
}

impl EntryDraft {
    /// A draft dated today, the way the share form starts out
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: Utc::now().date_naive(),
            description: String::new(),
            theme: String::new(),
            recurring: false,
        }
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    pub fn recurring(mut self, recurring: bool) -> Self {
        self.recurring = recurring;
        self
    }
}

fn normalize_theme(theme: String) -> Option<String> {
    let trimmed = theme.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Storage shape of an entry, matching the `sharedDreamLibrary` JSON layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryRecord {
    pub id: EntryId,
    pub title: String,
    pub author: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub recurring: bool,
    pub checked_out: bool,
    #[serde(default)]
    pub current_reader: Option<String>,
    #[serde(default)]
    pub checkout_history: Vec<CheckoutRecord>,
    pub color: DisplayTag,
}

impl TryFrom<EntryRecord> for Entry {
    type Error = String;

    fn try_from(r: EntryRecord) -> Result<Self, Self::Error> {
        if r.checked_out != r.current_reader.is_some() {
            return Err(format!(
                "entry {} has checkedOut={} but currentReader={:?}",
                r.id, r.checked_out, r.current_reader
            ));
        }
        if r.title.trim().is_empty() {
            return Err(format!("entry {} has a blank title", r.id));
        }
        Ok(Entry {
            id: r.id,
            author: r.author,
            title: r.title,
            created_date: r.date,
            description: r.description,
            theme: r.theme,
            recurring: r.recurring,
            current_reader: r.current_reader,
            checkout_history: r.checkout_history,
            display_tag: r.color,
        })
    }
}

impl From<Entry> for EntryRecord {
    fn from(e: Entry) -> Self {
        EntryRecord {
            id: e.id,
            title: e.title,
            author: e.author,
            date: e.created_date,
            description: e.description,
            theme: e.theme,
            recurring: e.recurring,
            checked_out: e.current_reader.is_some(),
            current_reader: e.current_reader,
            checkout_history: e.checkout_history,
            color: e.display_tag,
        }
    }
}
