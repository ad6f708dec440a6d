use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::model::project::Project;

static ID_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*ID:\*\*\s*([0-9a-f-]+)").unwrap());
static DESCRIPTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*Tanım:\*\*\s*(.+)").unwrap());
static TASK_COUNT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*Görev Sayısı:\*\*\s*(\d+)").unwrap());
static DONE_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Tamamlanan:\s*(\d+)").unwrap());
static IN_PROGRESS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Devam [Ee]den:\s*(\d+)").unwrap());
static PENDING_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Bekleyen:\s*(\d+)").unwrap());

/// Parse the project listing: `### <pictogram?> Name` headers, each followed
/// by `**ID:**`, `**Tanım:**` and count lines. A block without an ID is
/// dropped, the rest of the listing still parses.
pub fn parse(text: &str) -> Vec<Project> {
    let mut projects: Vec<Project> = Vec::new();
    let mut current: Option<Project> = None;

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("###") {
            flush(&mut projects, current.take());
            current = Some(Project::new("", strip_pictogram(rest.trim())));
            continue;
        }
        let Some(project) = current.as_mut() else {
            continue;
        };

        if let Some(caps) = ID_LINE.captures(line) {
            project.id = caps[1].to_string();
        } else if let Some(caps) = DESCRIPTION_LINE.captures(line) {
            project.description = caps[1].trim().to_string();
        } else if let Some(caps) = TASK_COUNT_LINE.captures(line) {
            project.task_count = caps[1].parse().unwrap_or(0);
        } else if let Some(caps) = DONE_LINE.captures(line) {
            project.done_count = caps[1].parse().unwrap_or(0);
        } else if let Some(caps) = IN_PROGRESS_LINE.captures(line) {
            project.in_progress_count = caps[1].parse().unwrap_or(0);
        } else if let Some(caps) = PENDING_LINE.captures(line) {
            project.pending_count = caps[1].parse().unwrap_or(0);
        }
    }
    flush(&mut projects, current.take());

    debug!(count = projects.len(), "parsed project listing");
    projects
}

fn flush(projects: &mut Vec<Project>, project: Option<Project>) {
    let Some(project) = project else { return };
    if project.id.is_empty() {
        warn!(name = %project.name, "skipping project block without ID");
        return;
    }
    projects.push(project);
}

/// Project headers often lead with a decorative pictogram; drop it
fn strip_pictogram(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if (first as u32) >= 0x2190 => chars.as_str().trim_start().to_string(),
        _ => name.to_string(),
    }
}
