use std::collections::HashMap;
use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use roster::model::task::{Priority, Status, Task};
use roster::parse::{parse_project_listing, parse_task_listing};

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("could not read fixture {name}: {e}"))
}

/// Every task with a resolvable parent sits exactly one level below it
fn assert_hierarchy_invariant(tasks: &[Task]) {
    let by_id: HashMap<&str, &Task> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();
    for task in tasks {
        if task.parent_id.is_empty() {
            continue;
        }
        if let Some(parent) = by_id.get(task.parent_id.as_str()) {
            assert_eq!(
                task.depth,
                parent.depth + 1,
                "task {} is not one level below its parent {}",
                task.id,
                parent.id
            );
        }
    }
}

#[test]
fn legacy_listing_parses_all_well_formed_units() {
    let tasks = parse_task_listing(&fixture("legacy_listing.md"));

    // the fixture has six header lines, one of which has no ID and is dropped
    assert_eq!(tasks.len(), 5);
    assert_hierarchy_invariant(&tasks);

    let root = &tasks[0];
    assert_eq!(root.title, "Sunucu dağıtımını otomatikleştir");
    assert_eq!(root.status, Status::InProgress);
    assert_eq!(root.priority, Priority::High);
    assert_eq!(root.project_name, "Altyapı");
    assert_eq!(root.tags, vec!["devops", "ci"]);
    assert_eq!(root.children.len(), 2);

    let subtask = &tasks[1];
    assert_eq!(subtask.parent_id, root.id);
    assert_eq!(subtask.deps_open, 1);

    // legacy keyword variants with diacritics still resolve
    let last = tasks.last().unwrap();
    assert_eq!(last.status, Status::InProgress);
    assert_eq!(last.priority, Priority::High);
    assert_eq!(last.dependents, 2);
}

#[test]
fn compact_listing_parses_all_well_formed_units() {
    let tasks = parse_task_listing(&fixture("compact_listing.md"));

    assert_eq!(tasks.len(), 5);
    assert_hierarchy_invariant(&tasks);

    let root = &tasks[0];
    assert_eq!(root.status, Status::InProgress);
    assert_eq!(root.priority, Priority::High);
    assert_eq!(root.project_name, "Altyapı");
    assert!(!root.project_id.is_empty());
    assert_eq!(root.children.len(), 2);

    // summarized tag form leaves the tag list unknown
    let summarized = tasks.iter().find(|t| t.title.contains("Etiket özetli")).unwrap();
    assert!(summarized.tags.is_empty());

    let blocked = tasks.iter().find(|t| t.title.contains("Bekleyen")).unwrap();
    assert_eq!(blocked.deps_open, 2);
}

#[test]
fn no_task_is_dropped_or_duplicated() {
    for name in ["legacy_listing.md", "compact_listing.md"] {
        let tasks = parse_task_listing(&fixture(name));
        let mut ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), before, "duplicate id in {name}");
        assert!(ids.iter().all(|id| !id.is_empty()), "empty id in {name}");
    }
}

#[test]
fn orphan_is_surfaced_at_its_own_depth() {
    // the page starts mid-hierarchy: the first unit is nested but its
    // parent is on an earlier page
    let text = "\
  └─ [beklemede] Yetim görev (orta öncelik)
    ID: aa-orphan
[beklemede] Kök görev (orta öncelik)
  ID: aa-root
";
    let tasks = parse_task_listing(text);
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, "aa-orphan");
    assert!(tasks[0].parent_id.is_empty());
    assert_eq!(tasks[0].depth, 1);
}

#[test]
fn empty_sentinel_yields_empty_forest() {
    assert!(parse_task_listing("Henüz görev bulunmuyor.").is_empty());
}

#[test]
fn project_listing_parses_blocks() {
    let projects = parse_project_listing(&fixture("project_listing.md"));
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].name, "Altyapı");
    assert_eq!(projects[0].task_count, 12);
    assert_eq!(projects[1].name, "Arayüz");
    assert_eq!(projects[1].pending_count, 4);
}
