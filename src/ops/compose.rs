use chrono::{Days, NaiveDate};
use indexmap::IndexMap;

use crate::model::project::Project;
use crate::model::task::{Priority, Status, Task};
use crate::model::view::{Grouping, SortKey, ViewConfig};
use crate::ops::filter;

/// Pre-computed member counts shown next to a group header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupBadge {
    pub total: usize,
    pub completed: usize,
    pub overdue: usize,
    pub high_priority: usize,
}

/// One partition of the display tree, rebuilt on every compose pass
#[derive(Debug, Clone, PartialEq)]
pub struct GroupNode {
    pub key: String,
    pub grouping: Grouping,
    /// Members in display order
    pub tasks: Vec<Task>,
    /// Ids of the members to show at the group's top level. A member whose
    /// parent is absent from this same group counts as a root so it is
    /// never hidden by the nesting heuristic.
    pub roots: Vec<String>,
    pub badge: GroupBadge,
}

/// Key for tasks with no owning project under by-project grouping
pub const NO_PROJECT: &str = "no-project";
/// Key for untagged tasks under by-tag grouping
pub const NO_TAG: &str = "no-tag";

/// Due-date bucket keys in display order
pub const DUE_BUCKETS: [&str; 5] = ["overdue", "today", "this-week", "later", "no-due-date"];

/// Build the display tree: filter, partition, order groups, sort members.
///
/// The output is derived data; calling this again with unchanged inputs
/// yields structurally identical output.
pub fn compose(
    tasks: &[Task],
    projects: &[Project],
    config: &ViewConfig,
    today: NaiveDate,
) -> Vec<GroupNode> {
    let mut visible: Vec<&Task> = filter::apply(tasks, &config.filter, today);
    if !config.show_completed {
        visible.retain(|task| task.status != Status::Done);
    }

    let mut groups: Vec<GroupNode> = if config.grouping == Grouping::None {
        let mut members: Vec<Task> = visible.into_iter().cloned().collect();
        sort_tasks(&mut members, config.sorting, config.sort_ascending);
        vec![make_node("all".to_string(), Grouping::None, members, today)]
    } else {
        let mut partitions: IndexMap<String, Vec<Task>> = IndexMap::new();
        if config.show_empty_groups {
            for key in canonical_keys(config.grouping, projects) {
                partitions.entry(key).or_default();
            }
        }
        for task in visible {
            partitions
                .entry(group_key(task, config.grouping, today))
                .or_default()
                .push(task.clone());
        }

        order_keys(&mut partitions, config.grouping, projects);
        partitions
            .into_iter()
            .filter(|(_, members)| config.show_empty_groups || !members.is_empty())
            .map(|(key, mut members)| {
                sort_tasks(&mut members, config.sorting, config.sort_ascending);
                make_node(key, config.grouping, members, today)
            })
            .collect()
    };

    if !config.show_empty_groups {
        groups.retain(|group| !group.tasks.is_empty());
    }
    groups
}

fn make_node(key: String, grouping: Grouping, tasks: Vec<Task>, today: NaiveDate) -> GroupNode {
    let badge = GroupBadge {
        total: tasks.len(),
        completed: tasks.iter().filter(|t| t.status == Status::Done).count(),
        overdue: tasks.iter().filter(|t| t.is_overdue(today)).count(),
        high_priority: tasks
            .iter()
            .filter(|t| t.priority == Priority::High)
            .count(),
    };
    let roots = display_roots(&tasks);
    GroupNode {
        key,
        grouping,
        tasks,
        roots,
        badge,
    }
}

/// Partition key of one task under a grouping strategy
pub fn group_key(task: &Task, grouping: Grouping, today: NaiveDate) -> String {
    match grouping {
        Grouping::None => "all".to_string(),
        Grouping::ByStatus => task.status.key().to_string(),
        Grouping::ByPriority => task.priority.key().to_string(),
        Grouping::ByProject => {
            if task.project_id.is_empty() {
                NO_PROJECT.to_string()
            } else {
                task.project_id.clone()
            }
        }
        Grouping::ByTag => task
            .tags
            .first()
            .cloned()
            .unwrap_or_else(|| NO_TAG.to_string()),
        Grouping::ByDueDate => due_bucket(task, today).to_string(),
    }
}

/// Due-date bucket of one task, relative to `today`
pub fn due_bucket(task: &Task, today: NaiveDate) -> &'static str {
    let Some(due) = task.due_date else {
        return "no-due-date";
    };
    if task.is_overdue(today) {
        return "overdue";
    }
    if due == today {
        return "today";
    }
    let week_end = today.checked_add_days(Days::new(7)).unwrap_or(today);
    if due > today && due < week_end {
        "this-week"
    } else {
        // includes done tasks with a past due date, which are not overdue
        "later"
    }
}

/// Canonical key sets shown even when empty
fn canonical_keys(grouping: Grouping, projects: &[Project]) -> Vec<String> {
    match grouping {
        Grouping::ByStatus => [Status::InProgress, Status::Pending, Status::Done]
            .iter()
            .map(|s| s.key().to_string())
            .collect(),
        Grouping::ByPriority => [Priority::High, Priority::Medium, Priority::Low]
            .iter()
            .map(|p| p.key().to_string())
            .collect(),
        Grouping::ByDueDate => DUE_BUCKETS.iter().map(|b| b.to_string()).collect(),
        Grouping::ByProject => projects.iter().map(|p| p.id.clone()).collect(),
        _ => Vec::new(),
    }
}

/// Order the partition keys: fixed strategy order for status, priority and
/// due-date; project name order for projects; alphabetical for tags, with
/// the catch-all key last.
fn order_keys(partitions: &mut IndexMap<String, Vec<Task>>, grouping: Grouping, projects: &[Project]) {
    let rank = |key: &str| -> (usize, String) {
        match grouping {
            Grouping::ByStatus => {
                let fixed = [
                    Status::InProgress.key(),
                    Status::Pending.key(),
                    Status::Done.key(),
                ];
                (position_of(&fixed, key), String::new())
            }
            Grouping::ByPriority => {
                let fixed = [
                    Priority::High.key(),
                    Priority::Medium.key(),
                    Priority::Low.key(),
                ];
                (position_of(&fixed, key), String::new())
            }
            Grouping::ByDueDate => (position_of(&DUE_BUCKETS, key), String::new()),
            Grouping::ByProject => {
                if key == NO_PROJECT {
                    (usize::MAX, String::new())
                } else {
                    let name = projects
                        .iter()
                        .find(|p| p.id == key)
                        .map(|p| p.name.to_lowercase())
                        .unwrap_or_else(|| key.to_string());
                    (0, name)
                }
            }
            _ => {
                if key == NO_TAG {
                    (usize::MAX, String::new())
                } else {
                    (0, key.to_lowercase())
                }
            }
        }
    };
    partitions.sort_by(|ka, _, kb, _| rank(ka).cmp(&rank(kb)));
}

fn position_of(fixed: &[&str], key: &str) -> usize {
    fixed.iter().position(|k| *k == key).unwrap_or(usize::MAX)
}

/// Sort members in place by the configured key and direction.
///
/// Missing due and created dates always sort last, whichever direction is
/// active. Ties keep the incoming (listing) order.
pub fn sort_tasks(tasks: &mut [Task], key: SortKey, ascending: bool) {
    use std::cmp::Ordering;

    let directed = |ord: Ordering| if ascending { ord } else { ord.reverse() };
    tasks.sort_by(|a, b| match key {
        SortKey::Title => directed(title_key(&a.title).cmp(&title_key(&b.title))),
        SortKey::Priority => directed(a.priority.weight().cmp(&b.priority.weight())),
        SortKey::Status => directed(a.status.weight().cmp(&b.status.weight())),
        SortKey::DueDate => compare_dates(a.due_date, b.due_date, ascending),
        SortKey::CreatedDate => compare_dates(a.created_at, b.created_at, ascending),
    });
}

/// Comparison key for title sorting: lowercased, with the Turkish letters
/// folded to their base forms so `Şeker` sorts with `S` instead of past `Z`
fn title_key(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            'ı' => Some('i'),
            'ş' => Some('s'),
            'ğ' => Some('g'),
            'ü' => Some('u'),
            'ö' => Some('o'),
            'ç' => Some('c'),
            // `İ`.to_lowercase() leaves a combining dot behind
            '\u{307}' => None,
            _ => Some(c),
        })
        .collect()
}

fn compare_dates(
    a: Option<NaiveDate>,
    b: Option<NaiveDate>,
    ascending: bool,
) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Some(a), Some(b)) => {
            if ascending {
                a.cmp(&b)
            } else {
                b.cmp(&a)
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Ids to show at the top level of a group. Roots are members with no
/// parent, or whose parent is not a member of this same group. When the
/// heuristic would hide every member of a non-empty group, fall back to
/// showing all of them flat.
fn display_roots(tasks: &[Task]) -> Vec<String> {
    let ids: std::collections::HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    let roots: Vec<String> = tasks
        .iter()
        .filter(|t| !t.has_parent() || !ids.contains(t.parent_id.as_str()))
        .map(|t| t.id.clone())
        .collect();
    if roots.is_empty() && !tasks.is_empty() {
        return tasks.iter().map(|t| t.id.clone()).collect();
    }
    roots
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::view::TaskFilter;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn task(id: &str, status: Status, priority: Priority) -> Task {
        let mut t = Task::new(id, format!("Görev {id}"));
        t.status = status;
        t.priority = priority;
        t
    }

    fn sample() -> Vec<Task> {
        vec![
            task("a", Status::Done, Priority::Low),
            task("b", Status::Pending, Priority::High),
            task("c", Status::InProgress, Priority::Medium),
            task("d", Status::Pending, Priority::Medium),
        ]
    }

    #[test]
    fn test_status_groups_use_fixed_order() {
        let config = ViewConfig::default();
        let groups = compose(&sample(), &[], &config, today());
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["devam_ediyor", "beklemede", "tamamlandi"]);
    }

    #[test]
    fn test_priority_sort_is_descending_by_default() {
        let config = ViewConfig {
            grouping: Grouping::None,
            ..Default::default()
        };
        let groups = compose(&sample(), &[], &config, today());
        assert_eq!(groups.len(), 1);
        let ids: Vec<&str> = groups[0].tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids[0], "b"); // high first
        assert_eq!(ids[3], "a"); // low last
    }

    #[test]
    fn test_show_completed_false_drops_done() {
        let config = ViewConfig {
            show_completed: false,
            ..Default::default()
        };
        let groups = compose(&sample(), &[], &config, today());
        assert!(groups.iter().all(|g| g.key != "tamamlandi"));
        let total: usize = groups.iter().map(|g| g.tasks.len()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_empty_groups_dropped_unless_requested() {
        let tasks = vec![task("x", Status::Pending, Priority::High)];
        let config = ViewConfig::default();
        let groups = compose(&tasks, &[], &config, today());
        assert_eq!(groups.len(), 1);

        let config = ViewConfig {
            show_empty_groups: true,
            ..Default::default()
        };
        let groups = compose(&tasks, &[], &config, today());
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["devam_ediyor", "beklemede", "tamamlandi"]);
        assert!(groups[0].tasks.is_empty());
    }

    #[test]
    fn test_due_date_buckets() {
        let mut overdue = task("o", Status::Pending, Priority::Medium);
        overdue.due_date = NaiveDate::from_ymd_opt(2025, 6, 1);
        let mut today_task = task("t", Status::Pending, Priority::Medium);
        today_task.due_date = Some(today());
        let mut week = task("w", Status::Pending, Priority::Medium);
        week.due_date = NaiveDate::from_ymd_opt(2025, 6, 18);
        let mut later = task("l", Status::Pending, Priority::Medium);
        later.due_date = NaiveDate::from_ymd_opt(2025, 8, 1);
        let none = task("n", Status::Pending, Priority::Medium);

        let config = ViewConfig {
            grouping: Grouping::ByDueDate,
            ..Default::default()
        };
        let tasks = vec![later, none, week, overdue, today_task];
        let groups = compose(&tasks, &[], &config, today());
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["overdue", "today", "this-week", "later", "no-due-date"]
        );
    }

    #[test]
    fn test_project_groups_ordered_by_name_with_catchall_last() {
        let mut p1 = task("1", Status::Pending, Priority::Medium);
        p1.project_id = "id-z".into();
        let mut p2 = task("2", Status::Pending, Priority::Medium);
        p2.project_id = "id-a".into();
        let unassigned = task("3", Status::Pending, Priority::Medium);

        let projects = vec![Project::new("id-z", "Altyapı"), Project::new("id-a", "Zebra")];
        let config = ViewConfig {
            grouping: Grouping::ByProject,
            ..Default::default()
        };
        let groups = compose(&[p1, p2, unassigned], &projects, &config, today());
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["id-z", "id-a", NO_PROJECT]);
    }

    #[test]
    fn test_badge_counts() {
        let mut late = task("late", Status::Pending, Priority::High);
        late.due_date = NaiveDate::from_ymd_opt(2025, 6, 1);
        let done = task("done", Status::Done, Priority::Low);

        let config = ViewConfig {
            grouping: Grouping::None,
            ..Default::default()
        };
        let groups = compose(&[late, done], &[], &config, today());
        let badge = groups[0].badge;
        assert_eq!(badge.total, 2);
        assert_eq!(badge.completed, 1);
        assert_eq!(badge.overdue, 1);
        assert_eq!(badge.high_priority, 1);
    }

    #[test]
    fn test_title_sort_folds_turkish_letters() {
        let mut seker = task("1", Status::Pending, Priority::Medium);
        seker.title = "Şeker işleri".into();
        let mut zebra = task("2", Status::Pending, Priority::Medium);
        zebra.title = "Zebra testi".into();
        let mut sunucu = task("3", Status::Pending, Priority::Medium);
        sunucu.title = "Sunucu bakımı".into();

        let mut tasks = vec![zebra, seker, sunucu];
        sort_tasks(&mut tasks, SortKey::Title, true);
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "2"]);
    }

    #[test]
    fn test_missing_due_dates_sort_last_in_both_directions() {
        let mut dated = task("dated", Status::Pending, Priority::Medium);
        dated.due_date = NaiveDate::from_ymd_opt(2025, 6, 20);
        let undated = task("undated", Status::Pending, Priority::Medium);

        for ascending in [true, false] {
            let mut tasks = vec![undated.clone(), dated.clone()];
            sort_tasks(&mut tasks, SortKey::DueDate, ascending);
            assert_eq!(tasks[1].id, "undated", "ascending={ascending}");
        }
    }

    #[test]
    fn test_roots_prefer_parentless_with_flat_fallback() {
        let mut parent = task("p", Status::Pending, Priority::Medium);
        parent.children = vec!["c".into()];
        let mut child = task("c", Status::Pending, Priority::Medium);
        child.parent_id = "p".into();
        child.depth = 1;

        // both in one group: only the parent is a root
        let node = make_node("g".into(), Grouping::ByStatus, vec![parent, child.clone()], today());
        assert_eq!(node.roots, vec!["p"]);

        // parent filtered out of the group: the child surfaces as pseudo-root
        let node = make_node("g".into(), Grouping::ByStatus, vec![child], today());
        assert_eq!(node.roots, vec!["c"]);
    }

    #[test]
    fn test_compose_is_idempotent() {
        let tasks = sample();
        let config = ViewConfig {
            filter: TaskFilter {
                search: Some("görev".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let first = compose(&tasks, &[], &config, today());
        let second = compose(&tasks, &[], &config, today());
        assert_eq!(first, second);
    }
}
