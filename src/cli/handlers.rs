use std::path::Path;

use thiserror::Error;

use crate::api::ApiError;
use crate::api::http::HttpService;
use crate::board::{Board, DropOutcome};
use crate::cli::commands::{Cli, Commands, ListArgs, MvArgs};
use crate::cli::output;
use crate::io::config_io::{self, ConfigError, RosterConfig};
use crate::model::view::TaskFilter;
use crate::ops::compose::NO_PROJECT;
use crate::ops::dragdrop::{DropTarget, Mutation, RejectReason};

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Usage(String),

    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.clone().unwrap_or_else(|| config_io::CONFIG_FILE.to_string());
    let mut config = config_io::read_config(Path::new(&config_path))?;
    if let Some(server) = &cli.server {
        config.server.url = server.clone();
    }
    let json = cli.json;

    match cli.command {
        Commands::List(args) => cmd_list(args, &config, json).await,
        Commands::Projects => cmd_projects(&config, json).await,
        Commands::Show(args) => cmd_show(&args.id, &config, json).await,
        Commands::Summary => cmd_summary(&config, json).await,
        Commands::Mv(args) => cmd_mv(args, &config, json).await,
    }
}

fn new_board(config: &RosterConfig) -> Board<HttpService> {
    let service = HttpService::new(config.server.url.as_str(), config.server.structured);
    Board::new(service, config.view.to_view_config(), config.drag_drop)
}

async fn cmd_list(args: ListArgs, config: &RosterConfig, json: bool) -> Result<(), CliError> {
    let mut board = new_board(config);

    if let Some(group_by) = args.group_by {
        board.set_grouping(group_by.into());
    }
    if let Some(sort) = args.sort {
        board.set_sorting(sort.into(), args.asc);
    }
    if args.hide_completed {
        board.set_show_completed(false);
    }
    if args.show_empty {
        board.set_show_empty_groups(true);
    }
    board.update_filter(TaskFilter {
        search: args.search,
        status: args.status.map(Into::into),
        priority: args.priority.map(Into::into),
        project_id: args.project,
        tags: args.tags,
        overdue: args.overdue,
        due_today: args.due_today,
        due_this_week: args.due_this_week,
        all_projects: args.all_projects,
        ..Default::default()
    });

    board.refresh().await?;
    let groups = board.compose();

    if json {
        let body = output::BoardJson {
            groups: groups
                .iter()
                .map(|g| output::group_json(g, board.projects()))
                .collect(),
            truncated: board.truncated(),
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!(
            "{}",
            output::render_board(&groups, board.projects(), board.truncated())
        );
    }
    Ok(())
}

async fn cmd_projects(config: &RosterConfig, json: bool) -> Result<(), CliError> {
    let mut board = new_board(config);
    board.refresh().await?;

    if json {
        let body: Vec<_> = board.projects().iter().map(output::project_json).collect();
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!("{}", output::render_projects(board.projects()));
    }
    Ok(())
}

async fn cmd_show(id: &str, config: &RosterConfig, json: bool) -> Result<(), CliError> {
    let board = new_board(config);
    let (task, dependencies) = board.task_detail(id).await?;

    if json {
        let body = serde_json::json!({
            "id": task.id,
            "title": task.title,
            "status": task.status,
            "priority": task.priority,
            "project_id": task.project_id,
            "due_date": task.due_date.map(|d| d.to_string()),
            "tags": task.tags,
            "description": task.description,
            "dependencies": dependencies.iter().map(output::dependency_json).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!("{}", output::render_detail(&task, &dependencies));
    }
    Ok(())
}

async fn cmd_summary(config: &RosterConfig, json: bool) -> Result<(), CliError> {
    let board = new_board(config);
    let summary = board.summary().await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::summary_json(&summary))?
        );
    } else {
        print!("{}", output::render_summary(&summary));
    }
    Ok(())
}

async fn cmd_mv(args: MvArgs, config: &RosterConfig, json: bool) -> Result<(), CliError> {
    let target = mv_target(&args)?;
    let mut board = new_board(config);
    board.refresh().await?;

    let dragged: Vec<_> = board
        .tasks()
        .iter()
        .filter(|t| args.ids.contains(&t.id))
        .collect();
    if dragged.len() != args.ids.len() {
        let known: Vec<&str> = dragged.iter().map(|t| t.id.as_str()).collect();
        let missing: Vec<&String> = args.ids.iter().filter(|id| !known.contains(&id.as_str())).collect();
        return Err(CliError::Usage(format!("unknown task id(s): {missing:?}")));
    }

    let outcomes = board.handle_drop(&dragged, &target).await;
    report_outcomes(&outcomes, json)?;
    Ok(())
}

/// Map the mv flags to exactly one drop target
fn mv_target(args: &MvArgs) -> Result<DropTarget, CliError> {
    let mut targets: Vec<DropTarget> = Vec::new();
    if let Some(status) = args.status {
        targets.push(DropTarget::StatusGroup(status.into()));
    }
    if let Some(priority) = args.priority {
        targets.push(DropTarget::PriorityGroup(priority.into()));
    }
    if let Some(project) = &args.project {
        let project = (project != "none" && project != NO_PROJECT).then(|| project.clone());
        targets.push(DropTarget::ProjectGroup(project));
    }
    if let Some(onto) = &args.onto {
        targets.push(DropTarget::Task(onto.clone()));
    }
    if args.root {
        targets.push(DropTarget::EmptyArea);
    }
    match targets.len() {
        0 => Err(CliError::Usage(
            "mv needs one of --status, --priority, --project, --onto or --root".into(),
        )),
        1 => Ok(targets.remove(0)),
        _ => Err(CliError::Usage(
            "mv accepts exactly one of --status, --priority, --project, --onto, --root".into(),
        )),
    }
}

fn report_outcomes(outcomes: &[DropOutcome], json: bool) -> Result<(), CliError> {
    if json {
        let body: Vec<_> = outcomes
            .iter()
            .map(|outcome| match outcome {
                DropOutcome::Applied { id, mutation } => serde_json::json!({
                    "id": id, "result": "applied", "mutation": describe_mutation(mutation),
                }),
                DropOutcome::NeedsChoice { id, choices } => serde_json::json!({
                    "id": id, "result": "ambiguous",
                    "choices": choices.iter().map(describe_mutation).collect::<Vec<_>>(),
                }),
                DropOutcome::Rejected { id, reason } => serde_json::json!({
                    "id": id, "result": "rejected", "reason": describe_reason(*reason),
                }),
                DropOutcome::Failed { id, error } => serde_json::json!({
                    "id": id, "result": "failed", "error": error,
                }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    for outcome in outcomes {
        match outcome {
            DropOutcome::Applied { id, mutation } => {
                println!("{id}: {}", describe_mutation(mutation));
            }
            DropOutcome::NeedsChoice { id, choices } => {
                println!("{id}: ambiguous, pick one:");
                for choice in choices {
                    println!("  - {}", describe_mutation(choice));
                }
            }
            DropOutcome::Rejected { id, reason } => {
                println!("{id}: rejected ({})", describe_reason(*reason));
            }
            DropOutcome::Failed { id, error } => {
                println!("{id}: failed ({error})");
            }
        }
    }
    Ok(())
}

fn describe_mutation(mutation: &Mutation) -> String {
    match mutation {
        Mutation::SetStatus { status, .. } => format!("status -> {}", status.key()),
        Mutation::SetPriority { priority, .. } => format!("priority -> {}", priority.key()),
        Mutation::MoveToProject { project, .. } => match project {
            Some(project) => format!("project -> {project}"),
            None => "project -> unassigned".to_string(),
        },
        Mutation::SetParent { parent, .. } => match parent {
            Some(parent) => format!("parent -> {parent}"),
            None => "detached to root".to_string(),
        },
        Mutation::AddDependency { depends_on, .. } => format!("depends on {depends_on}"),
    }
}

fn describe_reason(reason: RejectReason) -> &'static str {
    match reason {
        RejectReason::NotPermitted => "not permitted by config",
        RejectReason::SelfDrop => "cannot drop a task onto itself",
        RejectReason::AlreadyThere => "already in that state",
        RejectReason::NoParentToRemove => "task has no parent",
        RejectReason::UnsupportedTarget => "unsupported target",
    }
}
