//! Parsers for the server's text listing grammars.
//!
//! The server reports state as semi-structured text in two grammars: a
//! legacy line-oriented one with spelled-out keywords and a compact
//! pictogram one. Both reduce to the same flat `Task` sequence with
//! parent/child edges derived from indentation.

pub mod compact;
pub mod detail;
pub mod hierarchy;
pub mod legacy;
pub mod projects;

use crate::model::project::Project;
use crate::model::task::Task;

/// The server's "no tasks" sentinel line
const EMPTY_SENTINEL: &str = "Henüz görev bulunmuyor";

/// Parse a task listing in whichever grammar the server chose.
///
/// The empty-state sentinel short-circuits to an empty result; otherwise a
/// structural probe picks the compact or legacy parser.
pub fn parse_task_listing(text: &str) -> Vec<Task> {
    if text.contains(EMPTY_SENTINEL) {
        return Vec::new();
    }
    if compact::is_compact(text) {
        compact::parse(text)
    } else {
        legacy::parse(text)
    }
}

/// Parse a project listing block.
pub fn parse_project_listing(text: &str) -> Vec<Project> {
    projects::parse(text)
}
