use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Task status as reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    InProgress,
    Done,
}

impl Status {
    /// Canonical group key, matching the tokens the server itself emits
    pub fn key(self) -> &'static str {
        match self {
            Status::Pending => "beklemede",
            Status::InProgress => "devam_ediyor",
            Status::Done => "tamamlandi",
        }
    }

    /// Resolve a canonical group key back to a status
    pub fn from_key(key: &str) -> Option<Status> {
        match key {
            "beklemede" => Some(Status::Pending),
            "devam_ediyor" => Some(Status::InProgress),
            "tamamlandi" => Some(Status::Done),
            _ => None,
        }
    }

    /// Parse a status token from listing text. Accepts both the Turkish and
    /// English keywords plus the pictogram markers, case- and
    /// diacritic-insensitively. Unrecognized tokens fall back to `Pending`.
    pub fn from_token(token: &str) -> Status {
        match token.trim() {
            "✓" | "✅" => return Status::Done,
            "🔄" | "🚀" | "⚡" => return Status::InProgress,
            "⏳" | "○" => return Status::Pending,
            _ => {}
        }
        match fold_token(token).as_str() {
            "beklemede" | "bekleyen" | "pending" => Status::Pending,
            "devam_ediyor" | "devam" | "in_progress" => Status::InProgress,
            "tamamlandi" | "completed" => Status::Done,
            _ => Status::Pending,
        }
    }

    /// Sort weight: in-progress sorts above pending, done sorts last
    pub fn weight(self) -> u8 {
        match self {
            Status::InProgress => 3,
            Status::Pending => 2,
            Status::Done => 1,
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Canonical group key, matching the server's own tokens
    pub fn key(self) -> &'static str {
        match self {
            Priority::High => "yuksek",
            Priority::Medium => "orta",
            Priority::Low => "dusuk",
        }
    }

    /// Resolve a canonical group key back to a priority
    pub fn from_key(key: &str) -> Option<Priority> {
        match key {
            "yuksek" => Some(Priority::High),
            "orta" => Some(Priority::Medium),
            "dusuk" => Some(Priority::Low),
            _ => None,
        }
    }

    /// Parse a priority token. Unrecognized tokens fall back to `Medium`.
    pub fn from_token(token: &str) -> Priority {
        match fold_token(token).as_str() {
            "yuksek" | "high" => Priority::High,
            "dusuk" | "low" => Priority::Low,
            _ => Priority::Medium,
        }
    }

    /// Parse the single-letter priority marker of the compact grammar
    pub fn from_letter(letter: &str) -> Priority {
        match letter {
            "Y" => Priority::High,
            "D" => Priority::Low,
            _ => Priority::Medium,
        }
    }

    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// Lowercase a token and fold the Turkish diacritics the server mixes freely
/// (`yüksek`/`yuksek`, `tamamlandı`/`tamamlandi`). Spaces become underscores
/// so `devam ediyor` and `devam_ediyor` compare equal.
fn fold_token(token: &str) -> String {
    token
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            'ı' => Some('i'),
            'ş' => Some('s'),
            'ğ' => Some('g'),
            'ü' => Some('u'),
            'ö' => Some('o'),
            'ç' => Some('c'),
            ' ' => Some('_'),
            // `İ`.to_lowercase() leaves a combining dot behind
            '\u{307}' => None,
            _ => Some(c),
        })
        .collect()
}

/// A task record reconstructed from one listing fetch.
///
/// Records are value objects keyed by `id`; none survives a refresh by
/// identity. `children` is derived from indentation during parsing and is
/// never authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    /// Owning project id; empty means unassigned
    #[serde(default)]
    pub project_id: String,
    /// Project display name when the listing carries only that
    #[serde(default)]
    pub project_name: String,
    /// Parent task id; empty means root
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Count of tasks this one depends on
    #[serde(default)]
    pub deps_on: u32,
    /// Count of those dependencies still incomplete
    #[serde(default)]
    pub deps_open: u32,
    /// Count of tasks depending on this one
    #[serde(default)]
    pub dependents: u32,
    /// Nesting depth from indentation; 0 = root
    #[serde(default)]
    pub depth: usize,
    /// Ids of direct children within the currently loaded set (derived)
    #[serde(skip)]
    pub children: Vec<String>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Task {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            status: Status::Pending,
            priority: Priority::Medium,
            project_id: String::new(),
            project_name: String::new(),
            parent_id: String::new(),
            due_date: None,
            created_at: None,
            tags: Vec::new(),
            deps_on: 0,
            deps_open: 0,
            dependents: 0,
            depth: 0,
            children: Vec::new(),
        }
    }

    pub fn has_parent(&self) -> bool {
        !self.parent_id.is_empty()
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date
            .is_some_and(|due| due < today && self.status != Status::Done)
    }
}
