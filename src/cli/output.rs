use serde::Serialize;

use crate::model::project::Project;
use crate::model::task::{Priority, Status, Task};
use crate::model::view::Grouping;
use crate::ops::compose::{GroupNode, NO_PROJECT, NO_TAG};
use crate::parse::detail::{DependencyRef, Summary};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub title: String,
    pub status: Status,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub project_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct GroupJson {
    pub key: String,
    pub label: String,
    pub total: usize,
    pub completed: usize,
    pub overdue: usize,
    pub high_priority: usize,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct BoardJson {
    pub groups: Vec<GroupJson>,
    /// Set when the listing walk stopped early; the board may be incomplete
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

#[derive(Serialize)]
pub struct ProjectJson {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub task_count: u32,
    pub done_count: u32,
    pub in_progress_count: u32,
    pub pending_count: u32,
}

#[derive(Serialize)]
pub struct DependencyJson {
    pub id: String,
    pub title: String,
    pub status: Status,
}

#[derive(Serialize)]
pub struct SummaryJson {
    pub total_tasks: u32,
    pub done: u32,
    pub in_progress: u32,
    pub pending: u32,
    pub total_projects: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_project: Option<String>,
}

pub fn task_json(task: &Task, group: &GroupNode) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        title: task.title.clone(),
        status: task.status,
        priority: task.priority,
        due_date: task.due_date.map(|d| d.to_string()),
        tags: task.tags.clone(),
        project_id: task.project_id.clone(),
        subtasks: task
            .children
            .iter()
            .filter_map(|child| group.tasks.iter().find(|t| t.id == *child))
            .map(|child| task_json(child, group))
            .collect(),
    }
}

pub fn group_json(group: &GroupNode, projects: &[Project]) -> GroupJson {
    GroupJson {
        key: group.key.clone(),
        label: group_label(&group.key, group.grouping, projects),
        total: group.badge.total,
        completed: group.badge.completed,
        overdue: group.badge.overdue,
        high_priority: group.badge.high_priority,
        tasks: group
            .roots
            .iter()
            .filter_map(|root| group.tasks.iter().find(|t| t.id == *root))
            .map(|task| task_json(task, group))
            .collect(),
    }
}

pub fn project_json(project: &Project) -> ProjectJson {
    ProjectJson {
        id: project.id.clone(),
        name: project.name.clone(),
        description: project.description.clone(),
        task_count: project.task_count,
        done_count: project.done_count,
        in_progress_count: project.in_progress_count,
        pending_count: project.pending_count,
    }
}

pub fn summary_json(summary: &Summary) -> SummaryJson {
    SummaryJson {
        total_tasks: summary.total_tasks,
        done: summary.done,
        in_progress: summary.in_progress,
        pending: summary.pending,
        total_projects: summary.total_projects,
        active_project: summary.active_project.clone(),
    }
}

pub fn dependency_json(dep: &DependencyRef) -> DependencyJson {
    DependencyJson {
        id: dep.id.clone(),
        title: dep.title.clone(),
        status: dep.status,
    }
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

/// Human-facing group header label
pub fn group_label(key: &str, grouping: Grouping, projects: &[Project]) -> String {
    match grouping {
        Grouping::None => "All Tasks".to_string(),
        Grouping::ByStatus => match Status::from_key(key) {
            Some(Status::InProgress) => "In Progress".to_string(),
            Some(Status::Pending) => "Pending".to_string(),
            Some(Status::Done) => "Completed".to_string(),
            None => key.to_string(),
        },
        Grouping::ByPriority => match Priority::from_key(key) {
            Some(Priority::High) => "High Priority".to_string(),
            Some(Priority::Medium) => "Medium Priority".to_string(),
            Some(Priority::Low) => "Low Priority".to_string(),
            None => key.to_string(),
        },
        Grouping::ByProject => {
            if key == NO_PROJECT {
                "No Project".to_string()
            } else {
                projects
                    .iter()
                    .find(|p| p.id == key)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| key.to_string())
            }
        }
        Grouping::ByTag => {
            if key == NO_TAG {
                "Untagged".to_string()
            } else {
                format!("#{key}")
            }
        }
        Grouping::ByDueDate => match key {
            "overdue" => "Overdue".to_string(),
            "today" => "Today".to_string(),
            "this-week" => "This Week".to_string(),
            "later" => "Later".to_string(),
            "no-due-date" => "No Due Date".to_string(),
            other => other.to_string(),
        },
    }
}

/// Render the grouped board as an indented text tree
pub fn render_board(groups: &[GroupNode], projects: &[Project], truncated: bool) -> String {
    let mut out = String::new();
    for group in groups {
        let label = group_label(&group.key, group.grouping, projects);
        let mut badge = format!("{}", group.badge.total);
        if group.badge.overdue > 0 {
            badge.push_str(&format!(", {} overdue", group.badge.overdue));
        }
        if group.badge.high_priority > 0 {
            badge.push_str(&format!(", {} high", group.badge.high_priority));
        }
        out.push_str(&format!("{label} ({badge})\n"));

        for root in &group.roots {
            if let Some(task) = group.tasks.iter().find(|t| t.id == *root) {
                render_task(task, group, 1, &mut out);
            }
        }
        out.push('\n');
    }
    if truncated {
        out.push_str("warning: listing incomplete (paging stopped early)\n");
    }
    out
}

fn render_task(task: &Task, group: &GroupNode, indent: usize, out: &mut String) {
    let marker = match task.status {
        Status::Done => "[x]",
        Status::InProgress => "[>]",
        Status::Pending => "[ ]",
    };
    let mut line = format!("{}{marker} {} {}", "  ".repeat(indent), task.title, suffix(task));
    while line.ends_with(' ') {
        line.pop();
    }
    out.push_str(&line);
    out.push('\n');
    for child in &task.children {
        if let Some(child_task) = group.tasks.iter().find(|t| t.id == *child) {
            render_task(child_task, group, indent + 1, out);
        }
    }
}

fn suffix(task: &Task) -> String {
    let mut parts = Vec::new();
    if task.priority == Priority::High {
        parts.push("!".to_string());
    }
    if let Some(due) = task.due_date {
        parts.push(format!("due {due}"));
    }
    if !task.tags.is_empty() {
        parts.push(
            task.tags
                .iter()
                .map(|t| format!("#{t}"))
                .collect::<Vec<_>>()
                .join(" "),
        );
    }
    parts.push(format!("({})", task.id));
    parts.join(" ")
}

/// Render the project listing as aligned text lines
pub fn render_projects(projects: &[Project]) -> String {
    let mut out = String::new();
    for project in projects {
        out.push_str(&format!(
            "{}  {} ({} tasks: {} done, {} active, {} pending)\n",
            project.id,
            project.name,
            project.task_count,
            project.done_count,
            project.in_progress_count,
            project.pending_count,
        ));
    }
    out
}

pub fn render_summary(summary: &Summary) -> String {
    let mut out = format!(
        "{} tasks: {} done, {} in progress, {} pending\n{} projects\n",
        summary.total_tasks,
        summary.done,
        summary.in_progress,
        summary.pending,
        summary.total_projects,
    );
    if let Some(active) = &summary.active_project {
        out.push_str(&format!("active project: {active}\n"));
    }
    out
}

pub fn render_detail(task: &Task, dependencies: &[DependencyRef]) -> String {
    let mut out = format!(
        "{}\n  id: {}\n  status: {}\n  priority: {}\n",
        task.title,
        task.id,
        task.status.key(),
        task.priority.key(),
    );
    if !task.project_id.is_empty() {
        out.push_str(&format!("  project: {}\n", task.project_id));
    }
    if let Some(due) = task.due_date {
        out.push_str(&format!("  due: {due}\n"));
    }
    if !task.tags.is_empty() {
        out.push_str(&format!("  tags: {}\n", task.tags.join(", ")));
    }
    if !task.description.is_empty() {
        out.push_str(&format!("\n{}\n", task.description));
    }
    if !dependencies.is_empty() {
        out.push_str("\ndepends on:\n");
        for dep in dependencies {
            out.push_str(&format!("  - {} ({}) {}\n", dep.title, dep.id, dep.status.key()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_group_labels() {
        assert_eq!(
            group_label("devam_ediyor", Grouping::ByStatus, &[]),
            "In Progress"
        );
        assert_eq!(
            group_label("yuksek", Grouping::ByPriority, &[]),
            "High Priority"
        );
        assert_eq!(group_label("overdue", Grouping::ByDueDate, &[]), "Overdue");
        assert_eq!(group_label(NO_TAG, Grouping::ByTag, &[]), "Untagged");

        let projects = vec![Project::new("p-1", "Altyapı")];
        assert_eq!(group_label("p-1", Grouping::ByProject, &projects), "Altyapı");
        assert_eq!(group_label("p-x", Grouping::ByProject, &projects), "p-x");
    }
}
