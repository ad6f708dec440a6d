use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use tracing::{debug, warn};

use crate::model::task::{Priority, Status, Task};
use crate::parse::hierarchy;
use crate::parse::legacy::{indent_level, split_tags};

/// Task header of the compact grammar: `[<pictogram>] <title> (<Y|O|D>)`,
/// optionally prefixed with a tree connector for subtasks
static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:└─\s*)?\[(⏳|🚀|✅|✓|🔄)\]\s+(.+?)\s+\(([YOD])\)$").unwrap()
});

/// The ID field always terminates the detail line
static ID_FIELD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"ID:([0-9a-f-]+)$").unwrap());

/// `Tarih: D/M` — day and month only, year assumed current
static SHORT_DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})$").unwrap());

/// Summarized tag form `N adet`: the actual tags are unknown
static TAG_SUMMARY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\s+adet$").unwrap());

/// Project field may carry an embedded id: `Name (uuid)`
static PROJECT_WITH_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)\s*\(([0-9a-f-]{8,})\)$").unwrap());

/// Structural probe: does this listing use the compact pictogram grammar?
pub fn is_compact(text: &str) -> bool {
    const MARKERS: [&str; 5] = ["[⏳]", "[🚀]", "[✅]", "[✓]", "[🔄]"];
    text.lines().any(|line| {
        let t = line.trim_start().trim_start_matches("└─").trim_start();
        MARKERS.iter().any(|marker| t.starts_with(marker))
    })
}

/// Parse the compact two-line-per-task grammar.
///
/// A header line is followed by one or more detail lines
/// (`desc | Tarih: D/M | Etiket: a, b | ID:uuid`); the scan for details stops
/// at the ID field. A unit with no ID is logged and skipped — fabricating a
/// record with an empty key would be worse.
pub fn parse(text: &str) -> Vec<Task> {
    parse_with_today(text, chrono::Local::now().date_naive())
}

/// Entry point with an explicit "today" for the `Tarih:` year assumption
pub fn parse_with_today(text: &str, today: NaiveDate) -> Vec<Task> {
    let lines: Vec<&str> = text.lines().collect();
    let mut tasks: Vec<Task> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        if trimmed.is_empty()
            || trimmed.starts_with('#')
            || trimmed.starts_with("Görevler (")
            || trimmed.starts_with("Proje:")
        {
            i += 1;
            continue;
        }

        let Some(caps) = HEADER.captures(trimmed) else {
            i += 1;
            continue;
        };

        let mut task = Task::new("", caps[2].trim());
        task.status = Status::from_token(&caps[1]);
        task.priority = Priority::from_letter(&caps[3]);
        task.depth = indent_level(line);

        // collect detail lines up to and including the one carrying the ID;
        // a fresh header or a blank line ends the unit early
        let mut detail_parts: Vec<&str> = Vec::new();
        let mut found_id = false;
        let mut j = i + 1;
        while j < lines.len() {
            let d = lines[j].trim();
            if d.is_empty() || HEADER.is_match(d) {
                break;
            }
            detail_parts.push(d);
            j += 1;
            if d.contains("ID:") {
                found_id = true;
                break;
            }
        }

        if !found_id {
            warn!(title = %task.title, "skipping compact task unit without ID field");
            i = j;
            continue;
        }

        let details = detail_parts.join(" ");
        let details = details.trim_end();
        match ID_FIELD.captures(details) {
            Some(id_caps) => task.id = id_caps[1].to_string(),
            None => {
                warn!(title = %task.title, details, "unparsable detail line, unit skipped");
                i = j;
                continue;
            }
        }

        apply_detail_fields(&mut task, details, today);
        tasks.push(task);
        i = j;
    }

    hierarchy::link(&mut tasks);
    debug!(count = tasks.len(), "parsed compact listing");
    tasks
}

/// Split the detail line on `|`: the first segment is the description, the
/// rest are `Field: value` pairs, the last the already-extracted ID.
fn apply_detail_fields(task: &mut Task, details: &str, today: NaiveDate) {
    let mut segments = details.split('|').map(str::trim);

    if let Some(desc) = segments.next() {
        task.description = desc.strip_prefix("- ").unwrap_or(desc).trim().to_string();
    }

    for segment in segments {
        if let Some(value) = segment.strip_prefix("Tarih:") {
            task.due_date = parse_short_date(value.trim(), today);
        } else if let Some(value) = segment
            .strip_prefix("Etiketler:")
            .or_else(|| segment.strip_prefix("Etiket:"))
        {
            let value = value.trim();
            // "3 adet" tells us how many tags exist but not which; an empty
            // list is honest, a guessed one is not
            if !TAG_SUMMARY.is_match(value) {
                task.tags = split_tags(value);
            }
        } else if let Some(value) = segment.strip_prefix("Proje:") {
            let value = value.trim();
            if let Some(caps) = PROJECT_WITH_ID.captures(value) {
                task.project_name = caps[1].trim().to_string();
                task.project_id = caps[2].to_string();
            } else {
                task.project_name = value.to_string();
            }
        } else if let Some(value) = segment.strip_prefix("Bekleyen:") {
            task.deps_open = value.trim().parse().unwrap_or(0);
        }
    }
}

/// `D/M` with the current year assumed
fn parse_short_date(value: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = SHORT_DATE.captures(value)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(today.year(), month, day)
}
