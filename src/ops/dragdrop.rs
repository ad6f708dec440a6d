use serde::Deserialize;

use crate::model::task::{Priority, Status, Task};
use crate::model::view::Grouping;
use crate::ops::compose::NO_PROJECT;

/// Which drop-driven edits the user has enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DropPermissions {
    pub status_change: bool,
    pub priority_change: bool,
    pub project_move: bool,
    pub make_subtask: bool,
    pub create_dependency: bool,
    pub remove_parent: bool,
}

impl Default for DropPermissions {
    fn default() -> Self {
        DropPermissions {
            status_change: true,
            priority_change: true,
            project_move: true,
            make_subtask: true,
            create_dependency: true,
            remove_parent: true,
        }
    }
}

/// Where a drag gesture landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    StatusGroup(Status),
    PriorityGroup(Priority),
    /// `None` targets the unassigned-project bucket
    ProjectGroup(Option<String>),
    Task(String),
    EmptyArea,
}

/// A classified, not-yet-executed domain edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    SetStatus { id: String, status: Status },
    SetPriority { id: String, priority: Priority },
    MoveToProject { id: String, project: Option<String> },
    SetParent { id: String, parent: Option<String> },
    AddDependency { id: String, depends_on: String },
}

/// Why a drop was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotPermitted,
    SelfDrop,
    AlreadyThere,
    NoParentToRemove,
    UnsupportedTarget,
}

/// Outcome of classifying one dragged task against one target.
///
/// `Ambiguous` carries every permitted interpretation; the caller picks one
/// and re-dispatches it. No dialog or prompt lives at this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropVerdict {
    Apply(Mutation),
    Ambiguous(Vec<Mutation>),
    Rejected(RejectReason),
}

/// Resolve a group header key to a drop target under the active grouping.
/// Tag and due-date groups accept no drops.
pub fn identify_group_target(key: &str, grouping: Grouping) -> Option<DropTarget> {
    match grouping {
        Grouping::ByStatus => Status::from_key(key).map(DropTarget::StatusGroup),
        Grouping::ByPriority => Priority::from_key(key).map(DropTarget::PriorityGroup),
        Grouping::ByProject => Some(if key == NO_PROJECT {
            DropTarget::ProjectGroup(None)
        } else {
            DropTarget::ProjectGroup(Some(key.to_string()))
        }),
        _ => None,
    }
}

/// Classify one dragged task against a drop target.
pub fn classify(task: &Task, target: &DropTarget, permissions: &DropPermissions) -> DropVerdict {
    match target {
        DropTarget::StatusGroup(status) => {
            if !permissions.status_change {
                return DropVerdict::Rejected(RejectReason::NotPermitted);
            }
            if task.status == *status {
                return DropVerdict::Rejected(RejectReason::AlreadyThere);
            }
            DropVerdict::Apply(Mutation::SetStatus {
                id: task.id.clone(),
                status: *status,
            })
        }
        DropTarget::PriorityGroup(priority) => {
            if !permissions.priority_change {
                return DropVerdict::Rejected(RejectReason::NotPermitted);
            }
            if task.priority == *priority {
                return DropVerdict::Rejected(RejectReason::AlreadyThere);
            }
            DropVerdict::Apply(Mutation::SetPriority {
                id: task.id.clone(),
                priority: *priority,
            })
        }
        DropTarget::ProjectGroup(project) => {
            if !permissions.project_move {
                return DropVerdict::Rejected(RejectReason::NotPermitted);
            }
            let current = (!task.project_id.is_empty()).then(|| task.project_id.clone());
            if current == *project {
                return DropVerdict::Rejected(RejectReason::AlreadyThere);
            }
            DropVerdict::Apply(Mutation::MoveToProject {
                id: task.id.clone(),
                project: project.clone(),
            })
        }
        DropTarget::Task(target_id) => {
            if task.id == *target_id {
                return DropVerdict::Rejected(RejectReason::SelfDrop);
            }
            let mut choices = Vec::new();
            if permissions.make_subtask && task.parent_id != *target_id {
                choices.push(Mutation::SetParent {
                    id: task.id.clone(),
                    parent: Some(target_id.clone()),
                });
            }
            if permissions.create_dependency {
                choices.push(Mutation::AddDependency {
                    id: task.id.clone(),
                    depends_on: target_id.clone(),
                });
            }
            match choices.len() {
                0 => DropVerdict::Rejected(RejectReason::NotPermitted),
                1 => DropVerdict::Apply(choices.remove(0)),
                _ => DropVerdict::Ambiguous(choices),
            }
        }
        DropTarget::EmptyArea => {
            if !permissions.remove_parent {
                return DropVerdict::Rejected(RejectReason::NotPermitted);
            }
            if !task.has_parent() {
                return DropVerdict::Rejected(RejectReason::NoParentToRemove);
            }
            DropVerdict::Apply(Mutation::SetParent {
                id: task.id.clone(),
                parent: None,
            })
        }
    }
}

/// Classify a multi-task drag. Each task is judged independently; one
/// rejection never vetoes the rest.
pub fn classify_many(
    tasks: &[&Task],
    target: &DropTarget,
    permissions: &DropPermissions,
) -> Vec<(String, DropVerdict)> {
    tasks
        .iter()
        .map(|task| (task.id.clone(), classify(task, target, permissions)))
        .collect()
}
