use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::task::{Priority, Status};
use crate::model::view::{Grouping, SortKey};

#[derive(Parser)]
#[command(name = "roster", about = concat!("roster v", env!("CARGO_PKG_VERSION"), " - task board client"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file path
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Server base URL (overrides the config file)
    #[arg(long, global = true)]
    pub server: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks as a grouped board
    List(ListArgs),
    /// List projects
    Projects,
    /// Show task details
    Show(ShowArgs),
    /// Show workspace summary
    Summary,
    /// Move tasks: change status, priority, project, parent or dependency
    Mv(MvArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Grouping dimension
    #[arg(long = "group-by", value_enum)]
    pub group_by: Option<GroupByArg>,

    /// Sort key within groups
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    /// Sort ascending instead of descending
    #[arg(long)]
    pub asc: bool,

    /// List tasks across every project
    #[arg(long = "all-projects")]
    pub all_projects: bool,

    /// Filter by status
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    /// Filter by priority
    #[arg(long, value_enum)]
    pub priority: Option<PriorityArg>,

    /// Filter by project id
    #[arg(long)]
    pub project: Option<String>,

    /// Case-insensitive text search over title, description and tags
    #[arg(long)]
    pub search: Option<String>,

    /// Require at least one of these tags (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Only overdue tasks
    #[arg(long)]
    pub overdue: bool,

    /// Only tasks due today
    #[arg(long = "due-today")]
    pub due_today: bool,

    /// Only tasks due within the next week
    #[arg(long = "due-this-week")]
    pub due_this_week: bool,

    /// Hide completed tasks
    #[arg(long = "hide-completed")]
    pub hide_completed: bool,

    /// Show groups even when they have no members
    #[arg(long = "show-empty")]
    pub show_empty: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task id
    pub id: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Task id(s) to move
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Set status
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    /// Set priority
    #[arg(long, value_enum)]
    pub priority: Option<PriorityArg>,

    /// Move to project (use "none" for unassigned)
    #[arg(long)]
    pub project: Option<String>,

    /// Make subtask of this task, or create a dependency on it when
    /// subtasking is disabled in the config
    #[arg(long)]
    pub onto: Option<String>,

    /// Detach from the current parent
    #[arg(long)]
    pub root: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GroupByArg {
    None,
    Status,
    Priority,
    Project,
    Tag,
    DueDate,
}

impl From<GroupByArg> for Grouping {
    fn from(arg: GroupByArg) -> Self {
        match arg {
            GroupByArg::None => Grouping::None,
            GroupByArg::Status => Grouping::ByStatus,
            GroupByArg::Priority => Grouping::ByPriority,
            GroupByArg::Project => Grouping::ByProject,
            GroupByArg::Tag => Grouping::ByTag,
            GroupByArg::DueDate => Grouping::ByDueDate,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Title,
    Priority,
    DueDate,
    CreatedDate,
    Status,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Title => SortKey::Title,
            SortArg::Priority => SortKey::Priority,
            SortArg::DueDate => SortKey::DueDate,
            SortArg::CreatedDate => SortKey::CreatedDate,
            SortArg::Status => SortKey::Status,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Pending,
    InProgress,
    Done,
}

impl From<StatusArg> for Status {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => Status::Pending,
            StatusArg::InProgress => Status::InProgress,
            StatusArg::Done => Status::Done,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}
