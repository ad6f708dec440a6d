use serde::{Deserialize, Serialize};

/// A project record parsed from the project listing.
///
/// The counts are display hints reported by the server; they may disagree
/// with the number of tasks actually loaded (pagination may not have fetched
/// them all) and must never drive pagination or correctness decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub task_count: u32,
    #[serde(default)]
    pub done_count: u32,
    #[serde(default)]
    pub in_progress_count: u32,
    #[serde(default)]
    pub pending_count: u32,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Project {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            task_count: 0,
            done_count: 0,
            in_progress_count: 0,
            pending_count: 0,
        }
    }
}
