use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::task::{Priority, Status};

/// Dimension used to partition tasks for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Grouping {
    None,
    #[default]
    ByStatus,
    ByPriority,
    ByProject,
    ByTag,
    ByDueDate,
}

/// Sort key applied within a group (and to the flat ungrouped view)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    Title,
    #[default]
    Priority,
    DueDate,
    CreatedDate,
    Status,
}

/// Half-open due-date window `[start, end)`; either bound may be absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DueRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Filter predicate set. All active predicates must hold (logical AND).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskFilter {
    /// Case-insensitive substring match over title, description and tags
    pub search: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub project_id: Option<String>,
    /// At least one overlapping tag is required when non-empty
    pub tags: Vec<String>,
    pub due_range: Option<DueRange>,
    pub overdue: bool,
    pub due_today: bool,
    pub due_this_week: bool,
    pub has_tag: bool,
    pub has_dependency: bool,
    /// Fetch-side switch: list tasks across every project, not just the
    /// active one. Not a per-task predicate.
    pub all_projects: bool,
}

impl TaskFilter {
    /// True when no per-task predicate is active
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.project_id.is_none()
            && self.tags.is_empty()
            && self.due_range.is_none()
            && !self.overdue
            && !self.due_today
            && !self.due_this_week
            && !self.has_tag
            && !self.has_dependency
    }
}

/// Process-local view configuration; the caller owns its session lifecycle
#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub grouping: Grouping,
    pub sorting: SortKey,
    pub sort_ascending: bool,
    pub show_completed: bool,
    pub show_empty_groups: bool,
    pub expanded: BTreeSet<String>,
    pub filter: TaskFilter,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            grouping: Grouping::ByStatus,
            sorting: SortKey::Priority,
            sort_ascending: false,
            show_completed: true,
            show_empty_groups: false,
            expanded: default_expanded_groups(Grouping::ByStatus),
            filter: TaskFilter::default(),
        }
    }
}

/// Groups that start out expanded when a grouping strategy is activated
pub fn default_expanded_groups(grouping: Grouping) -> BTreeSet<String> {
    let mut expanded = BTreeSet::new();
    match grouping {
        Grouping::ByStatus => {
            expanded.insert(Status::InProgress.key().to_string());
            expanded.insert(Status::Pending.key().to_string());
        }
        Grouping::ByPriority => {
            expanded.insert(Priority::High.key().to_string());
            expanded.insert(Priority::Medium.key().to_string());
        }
        Grouping::ByDueDate => {
            expanded.insert("overdue".to_string());
            expanded.insert("today".to_string());
            expanded.insert("this-week".to_string());
        }
        _ => {}
    }
    expanded
}
