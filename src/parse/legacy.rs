use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, warn};

use crate::model::task::{Priority, Status, Task};
use crate::parse::hierarchy;

/// Task header: `[<status>] <title> (<priority> öncelik)`, optionally
/// prefixed with a tree connector (`└─ `) or a list dash (`- `)
static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:└─\s*|-\s*)?\[([^\]]+)\]\s+(.+)\s+\((\p{L}+) öncelik\)").unwrap()
});

static ID_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"ID:\s*([0-9a-f-]+)").unwrap());
static PROJECT_ID_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ProjeID:\s*([0-9a-f-]+)").unwrap());
static DUE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Son tarih:\s*(\d{4}-\d{2}-\d{2})").unwrap());
static DEPS_ON_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bağımlı görev sayısı:\s*(\d+)").unwrap());
static DEPS_OPEN_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Tamamlanmamış bağımlılık sayısı:\s*(\d+)").unwrap());
static DEPENDENTS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bu göreve bağımlı sayısı:\s*(\d+)").unwrap());

/// A header whose metadata lines are still being collected
struct PendingUnit {
    task: Task,
    description: Vec<String>,
}

/// Parse the legacy line-oriented listing grammar.
///
/// Each task occupies a header line; the indented lines that follow, up to
/// the next header, carry metadata (`ID:`, `Proje:`, `Son tarih:`, ...) or
/// free-text description. Two indent columns make one depth level.
pub fn parse(text: &str) -> Vec<Task> {
    let mut tasks: Vec<Task> = Vec::new();
    let mut current: Option<PendingUnit> = None;

    for line in text.lines() {
        let trimmed = line.trim();

        if let Some(caps) = HEADER.captures(trimmed) {
            flush(&mut tasks, current.take());

            let mut task = Task::new("", caps[2].trim());
            task.status = Status::from_token(&caps[1]);
            task.priority = Priority::from_token(&caps[3]);
            task.depth = indent_level(line);
            current = Some(PendingUnit {
                task,
                description: Vec::new(),
            });
            continue;
        }

        let Some(unit) = current.as_mut() else {
            continue;
        };

        if trimmed.contains("ID:") && !trimmed.contains("ProjeID:") {
            if let Some(caps) = ID_LINE.captures(trimmed) {
                unit.task.id = caps[1].to_string();
            }
            continue;
        }
        if trimmed.contains("ProjeID:") {
            if let Some(caps) = PROJECT_ID_LINE.captures(trimmed) {
                unit.task.project_id = caps[1].to_string();
            }
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("Proje:") {
            unit.task.project_name = rest.trim().to_string();
            continue;
        }
        if trimmed.contains("Son tarih:") {
            if let Some(caps) = DUE_LINE.captures(trimmed) {
                unit.task.due_date = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok();
            }
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("Etiketler:") {
            unit.task.tags = split_tags(rest);
            continue;
        }
        if let Some(caps) = DEPS_ON_LINE.captures(trimmed) {
            unit.task.deps_on = caps[1].parse().unwrap_or(0);
            continue;
        }
        if let Some(caps) = DEPS_OPEN_LINE.captures(trimmed) {
            unit.task.deps_open = caps[1].parse().unwrap_or(0);
            continue;
        }
        if let Some(caps) = DEPENDENTS_LINE.captures(trimmed) {
            unit.task.dependents = caps[1].parse().unwrap_or(0);
            continue;
        }

        // anything else that is not a section break continues the description
        if !trimmed.is_empty()
            && !trimmed.starts_with('[')
            && !trimmed.starts_with("##")
            && !trimmed.starts_with("└─")
        {
            unit.description.push(trimmed.to_string());
        }
    }
    flush(&mut tasks, current.take());

    hierarchy::link(&mut tasks);
    debug!(count = tasks.len(), "parsed legacy listing");
    tasks
}

/// Append a completed unit to the output, or drop it when no `ID:` line was
/// found — a record without a stable key is worse than a missing record.
fn flush(tasks: &mut Vec<Task>, unit: Option<PendingUnit>) {
    let Some(mut unit) = unit else { return };
    if unit.task.id.is_empty() {
        warn!(title = %unit.task.title, "skipping task unit without ID");
        return;
    }
    if !unit.description.is_empty() {
        unit.task.description = unit.description.join(" ");
    }
    tasks.push(unit.task);
}

/// Indent level of a raw line: 2 leading spaces = 1 level
pub(crate) fn indent_level(line: &str) -> usize {
    let spaces = line.len() - line.trim_start_matches(' ').len();
    spaces / 2
}

pub(crate) fn split_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
