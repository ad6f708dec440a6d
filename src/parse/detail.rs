use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::model::task::{Priority, Status, Task};
use crate::parse::legacy::split_tags;

static ID_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*ID:\*\*\s*([0-9a-f-]+)").unwrap());
static STATUS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*?\*?Durum:?\*?\*?\s*([\w_]+)").unwrap());
static PRIORITY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*?\*?Öncelik:?\*?\*?\s*(\w+)").unwrap());
static DUE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Son Tarih:\s*(\d{4}-\d{2}-\d{2})").unwrap());
static PROJECT_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(ID:\s*([^)]+)\)").unwrap());
static DEPENDENCY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^- (.+) \(ID: ([^)]+)\) - (.+)$").unwrap());

/// One entry of the detail block's dependency section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRef {
    pub title: String,
    pub id: String,
    pub status: Status,
}

/// Parse the single-task markdown detail block: `# title`, bold field lines,
/// an `## Açıklama` body and an optional `## Bağımlılıklar` list.
pub fn parse_task_detail(text: &str) -> (Task, Vec<DependencyRef>) {
    let mut task = Task::new("", "");
    let mut dependencies = Vec::new();
    let lines: Vec<&str> = text.lines().collect();
    let mut in_dependencies = false;

    for (i, line) in lines.iter().enumerate() {
        if let Some(title) = line.strip_prefix("# ") {
            task.title = title.trim().to_string();
        }
        if let Some(caps) = ID_LINE.captures(line) {
            task.id = caps[1].to_string();
        }
        if line.contains("Durum:")
            && let Some(caps) = STATUS_LINE.captures(line)
        {
            task.status = Status::from_token(&caps[1]);
        }
        if line.contains("Öncelik:")
            && let Some(caps) = PRIORITY_LINE.captures(line)
        {
            task.priority = Priority::from_token(&caps[1]);
        }
        if line.contains("Proje:")
            && let Some(caps) = PROJECT_ID.captures(line)
        {
            task.project_id = caps[1].trim().to_string();
        }
        if line.contains("Son Tarih:")
            && let Some(caps) = DUE_LINE.captures(line)
        {
            task.due_date = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok();
        }
        if let Some(rest) = line.strip_prefix("Etiketler:") {
            task.tags = split_tags(rest);
        }

        if *line == "## Açıklama" {
            let body: Vec<&str> = lines[i + 1..]
                .iter()
                .take_while(|l| !l.starts_with('#'))
                .filter(|l| !l.trim().is_empty())
                .copied()
                .collect();
            task.description = body.join("\n").trim().to_string();
        }

        if *line == "## Bağımlılıklar" {
            in_dependencies = true;
            continue;
        }
        if in_dependencies {
            if line.starts_with('#') {
                in_dependencies = false;
            } else if let Some(caps) = DEPENDENCY_LINE.captures(line) {
                dependencies.push(DependencyRef {
                    title: caps[1].to_string(),
                    id: caps[2].to_string(),
                    status: Status::from_token(&caps[3]),
                });
            }
        }
    }

    (task, dependencies)
}

/// Server-reported workspace summary figures (display hints only)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Summary {
    pub total_tasks: u32,
    pub done: u32,
    pub in_progress: u32,
    pub pending: u32,
    pub total_projects: u32,
    pub active_project: Option<String>,
}

/// Parse the summary block (`Toplam görev sayısı: N`, ...)
pub fn parse_summary(text: &str) -> Summary {
    static TOTAL: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"Toplam görev sayısı:\s*(\d+)").unwrap());
    static DONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Tamamlanan:\s*(\d+)").unwrap());
    static IN_PROGRESS: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"Devam eden:\s*(\d+)").unwrap());
    static PENDING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Bekleyen:\s*(\d+)").unwrap());
    static PROJECTS: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"Toplam proje sayısı:\s*(\d+)").unwrap());
    static ACTIVE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Aktif proje:\s*(.+)").unwrap());

    let mut summary = Summary::default();
    for line in text.lines() {
        if let Some(caps) = TOTAL.captures(line) {
            summary.total_tasks = caps[1].parse().unwrap_or(0);
        }
        if let Some(caps) = DONE.captures(line) {
            summary.done = caps[1].parse().unwrap_or(0);
        }
        if let Some(caps) = IN_PROGRESS.captures(line) {
            summary.in_progress = caps[1].parse().unwrap_or(0);
        }
        if let Some(caps) = PENDING.captures(line) {
            summary.pending = caps[1].parse().unwrap_or(0);
        }
        if let Some(caps) = PROJECTS.captures(line) {
            summary.total_projects = caps[1].parse().unwrap_or(0);
        }
        if let Some(caps) = ACTIVE.captures(line) {
            let name = caps[1].trim();
            if !name.contains("Yok") {
                summary.active_project = Some(name.to_string());
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_detail_block() {
        let text = "\
# Sunucu hatasını gider

**ID:** ab-12
**Durum:** devam_ediyor
**Öncelik:** yuksek
Proje: Altyapı (ID: cd-34)
Son Tarih: 2025-08-01
Etiketler: bug, backend

## Açıklama
İstek zaman aşımına uğruyor.
Loglara bakılacak.

## Bağımlılıklar
- Log altyapısı (ID: ef-56) - tamamlandi
- İzleme panosu (ID: ab-78) - beklemede
";
        let (task, deps) = parse_task_detail(text);
        assert_eq!(task.title, "Sunucu hatasını gider");
        assert_eq!(task.id, "ab-12");
        assert_eq!(task.status, Status::InProgress);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.project_id, "cd-34");
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 8, 1));
        assert_eq!(task.tags, vec!["bug", "backend"]);
        assert!(task.description.contains("zaman aşımına"));
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].status, Status::Done);
        assert_eq!(deps[1].id, "ab-78");
    }

    #[test]
    fn test_parse_summary() {
        let text = "\
Toplam görev sayısı: 42
Tamamlanan: 10
Devam eden: 5
Bekleyen: 27
Toplam proje sayısı: 3
Aktif proje: Altyapı
";
        let summary = parse_summary(text);
        assert_eq!(summary.total_tasks, 42);
        assert_eq!(summary.done, 10);
        assert_eq!(summary.in_progress, 5);
        assert_eq!(summary.pending, 27);
        assert_eq!(summary.total_projects, 3);
        assert_eq!(summary.active_project.as_deref(), Some("Altyapı"));

        let none = parse_summary("Aktif proje: Yok");
        assert_eq!(none.active_project, None);
    }
}
