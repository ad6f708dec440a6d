use chrono::{Days, NaiveDate};

use crate::model::task::Task;
use crate::model::view::TaskFilter;

/// Does `task` satisfy every active predicate of `filter`?
///
/// Predicates combine with logical AND; an inactive predicate never rejects.
/// Date predicates are evaluated against the supplied `today` so behavior is
/// stable across midnight within one evaluation.
pub fn matches(task: &Task, filter: &TaskFilter, today: NaiveDate) -> bool {
    if let Some(needle) = &filter.search {
        let needle = needle.to_lowercase();
        let hit = task.title.to_lowercase().contains(&needle)
            || task.description.to_lowercase().contains(&needle)
            || task
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }
    if let Some(status) = filter.status
        && task.status != status
    {
        return false;
    }
    if let Some(priority) = filter.priority
        && task.priority != priority
    {
        return false;
    }
    if let Some(project_id) = &filter.project_id
        && task.project_id != *project_id
    {
        return false;
    }
    if !filter.tags.is_empty() && !filter.tags.iter().any(|tag| task.tags.contains(tag)) {
        return false;
    }
    if let Some(range) = filter.due_range {
        let Some(due) = task.due_date else {
            return false;
        };
        if range.start.is_some_and(|start| due < start) {
            return false;
        }
        if range.end.is_some_and(|end| due >= end) {
            return false;
        }
    }
    if filter.overdue && !task.is_overdue(today) {
        return false;
    }
    if filter.due_today && task.due_date != Some(today) {
        return false;
    }
    if filter.due_this_week {
        let week_end = today.checked_add_days(Days::new(7)).unwrap_or(today);
        let in_week = task
            .due_date
            .is_some_and(|due| due >= today && due < week_end);
        if !in_week {
            return false;
        }
    }
    if filter.has_tag && task.tags.is_empty() {
        return false;
    }
    if filter.has_dependency && task.deps_on == 0 && task.dependents == 0 {
        return false;
    }
    true
}

/// Filter a task slice, preserving listing order
pub fn apply<'a>(tasks: &'a [Task], filter: &TaskFilter, today: NaiveDate) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| matches(task, filter, today))
        .collect()
}
