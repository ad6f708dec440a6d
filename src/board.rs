use std::collections::BTreeSet;

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::api::{ApiError, TaskService, pager};
use crate::model::project::Project;
use crate::model::task::Task;
use crate::model::view::{Grouping, SortKey, TaskFilter, ViewConfig, default_expanded_groups};
use crate::ops::compose::{self, GroupNode};
use crate::ops::dragdrop::{
    self, DropPermissions, DropTarget, DropVerdict, Mutation, RejectReason,
};
use crate::ops::selection::Selection;
use crate::parse;
use crate::parse::detail::{DependencyRef, Summary};

/// Per-task outcome of a drop gesture
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    Applied { id: String, mutation: Mutation },
    /// The host must pick one interpretation and pass it to
    /// [`Board::apply_mutation`]
    NeedsChoice { id: String, choices: Vec<Mutation> },
    Rejected { id: String, reason: RejectReason },
    Failed { id: String, error: String },
}

/// Client-side session state: the loaded task forest, the view
/// configuration, the selection, and the service handle.
///
/// All reads are served from the last completed refresh; no edit is applied
/// locally before the server confirms it.
pub struct Board<S: TaskService> {
    service: S,
    tasks: Vec<Task>,
    projects: Vec<Project>,
    config: ViewConfig,
    selection: Selection,
    permissions: DropPermissions,
    /// Total the server reported on the last refresh
    last_total: u32,
    /// The last refresh hit a ceiling or lost a page; the set may be short
    truncated: bool,
}

impl<S: TaskService> Board<S> {
    pub fn new(service: S, config: ViewConfig, permissions: DropPermissions) -> Self {
        Board {
            service,
            tasks: Vec::new(),
            projects: Vec::new(),
            config,
            selection: Selection::new(),
            permissions,
            last_total: 0,
            truncated: false,
        }
    }

    /// Re-fetch everything and rebuild local state.
    ///
    /// Local state is cleared up front so a reader during the fetch sees an
    /// empty board, never a half-merged one. A task-listing failure on the
    /// first page propagates; a project-listing failure only logs, the
    /// tasks already fetched still render.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        self.tasks.clear();
        self.projects.clear();
        self.truncated = false;

        let listing = pager::fetch_all(&self.service, self.config.filter.all_projects).await?;
        self.last_total = listing.last_total;
        self.truncated = listing.truncated;
        self.tasks = listing.tasks;

        match self.service.list_projects().await {
            Ok(text) => self.projects = parse::parse_project_listing(&text),
            Err(err) => warn!(error = %err, "project listing failed, rendering tasks only"),
        }

        let present: BTreeSet<String> = self.tasks.iter().map(|t| t.id.clone()).collect();
        self.selection.retain_present(&present);

        info!(
            tasks = self.tasks.len(),
            projects = self.projects.len(),
            truncated = self.truncated,
            "board refreshed"
        );
        Ok(())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn last_total(&self) -> u32 {
        self.last_total
    }

    /// True when the last refresh may not hold every task the server has
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Build the display tree for today's date
    pub fn compose(&self) -> Vec<GroupNode> {
        self.compose_at(Local::now().date_naive())
    }

    pub fn compose_at(&self, today: NaiveDate) -> Vec<GroupNode> {
        compose::compose(&self.tasks, &self.projects, &self.config, today)
    }

    /// The flat ordering of currently visible task ids: expanded groups
    /// only, roots first, each followed by its in-group descendants
    pub fn visible_order(&self) -> Vec<String> {
        self.visible_order_at(Local::now().date_naive())
    }

    pub fn visible_order_at(&self, today: NaiveDate) -> Vec<String> {
        let mut order = Vec::new();
        for group in self.compose_at(today) {
            let expanded =
                group.grouping == Grouping::None || self.config.expanded.contains(&group.key);
            if !expanded {
                continue;
            }
            let members: BTreeSet<&str> = group.tasks.iter().map(|t| t.id.as_str()).collect();
            for root in &group.roots {
                push_subtree(root, &group.tasks, &members, &mut order);
            }
        }
        order
    }

    /// Switching the grouping invalidates the visible ordering, so the
    /// selection resets and the expansion set reseeds
    pub fn set_grouping(&mut self, grouping: Grouping) {
        if self.config.grouping == grouping {
            return;
        }
        debug!(?grouping, "grouping changed");
        self.config.grouping = grouping;
        self.config.expanded = default_expanded_groups(grouping);
        self.selection.clear();
    }

    pub fn set_sorting(&mut self, key: SortKey, ascending: bool) {
        self.config.sorting = key;
        self.config.sort_ascending = ascending;
    }

    pub fn set_show_completed(&mut self, show: bool) {
        self.config.show_completed = show;
    }

    pub fn set_show_empty_groups(&mut self, show: bool) {
        self.config.show_empty_groups = show;
    }

    pub fn update_filter(&mut self, filter: TaskFilter) {
        self.config.filter = filter;
    }

    pub fn toggle_group(&mut self, key: &str) {
        if !self.config.expanded.remove(key) {
            self.config.expanded.insert(key.to_string());
        }
    }

    pub fn select(&mut self, id: &str) {
        self.selection.select(id);
    }

    pub fn toggle_select(&mut self, id: &str) {
        self.selection.toggle(id);
    }

    pub fn range_select(&mut self, id: &str) {
        let visible = self.visible_order();
        self.selection.select_range(id, &visible);
    }

    pub fn selected_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| self.selection.contains(&t.id))
            .collect()
    }

    /// Classify and dispatch a drop of the given tasks onto `target`.
    ///
    /// Each task is handled independently; one failure or rejection never
    /// aborts the rest. Nothing is changed locally, the caller refreshes
    /// once the outcomes are in.
    pub async fn handle_drop(&self, dragged: &[&Task], target: &DropTarget) -> Vec<DropOutcome> {
        let mut outcomes = Vec::with_capacity(dragged.len());
        for (id, verdict) in dragdrop::classify_many(dragged, target, &self.permissions) {
            let outcome = match verdict {
                DropVerdict::Apply(mutation) => match self.apply_mutation(&mutation).await {
                    Ok(()) => DropOutcome::Applied { id, mutation },
                    Err(err) => {
                        warn!(%id, error = %err, "mutation dispatch failed");
                        DropOutcome::Failed {
                            id,
                            error: err.to_string(),
                        }
                    }
                },
                DropVerdict::Ambiguous(choices) => DropOutcome::NeedsChoice { id, choices },
                DropVerdict::Rejected(reason) => DropOutcome::Rejected { id, reason },
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Dispatch one classified mutation to the service
    pub async fn apply_mutation(&self, mutation: &Mutation) -> Result<(), ApiError> {
        match mutation {
            Mutation::SetStatus { id, status } => self.service.update_status(id, *status).await,
            Mutation::SetPriority { id, priority } => {
                self.service.update_priority(id, *priority).await
            }
            Mutation::MoveToProject { id, project } => {
                self.service.move_to_project(id, project.as_deref()).await
            }
            Mutation::SetParent { id, parent } => {
                self.service.change_parent(id, parent.as_deref()).await
            }
            Mutation::AddDependency { id, depends_on } => {
                self.service.add_dependency(id, depends_on).await
            }
        }
    }

    /// Fetch and parse the detail block of one task
    pub async fn task_detail(&self, id: &str) -> Result<(Task, Vec<DependencyRef>), ApiError> {
        let text = self.service.task_detail(id).await?;
        Ok(parse::detail::parse_task_detail(&text))
    }

    /// Fetch and parse the workspace summary
    pub async fn summary(&self) -> Result<Summary, ApiError> {
        let text = self.service.summary().await?;
        Ok(parse::detail::parse_summary(&text))
    }
}

/// Depth-first append of a root and its descendants that are members of the
/// same group
fn push_subtree(id: &str, tasks: &[Task], members: &BTreeSet<&str>, order: &mut Vec<String>) {
    order.push(id.to_string());
    let Some(task) = tasks.iter().find(|t| t.id == id) else {
        return;
    };
    for child in &task.children {
        if members.contains(child.as_str()) {
            push_subtree(child, tasks, members, order);
        }
    }
}
