//! Issue command handlers.
//!
//! Each subcommand drives the same view-models the interactive browser
//! uses, so validation and patch semantics match.

use tabled::Tabled;

use tracker_core::{
    CreateEvent, DetailEvent, DetailSource, Issue, IssueCreate, IssueCreateViewModel,
    IssueDetailViewModel, IssueListViewModel, IssueQuery, IssueService, parse_issue_id,
};

use crate::cli::{CreateArgs, GlobalOpts, IssuesArgs, IssuesCommand, ListArgs, UpdateArgs};
use crate::error::CliError;
use crate::output;

use super::{browse, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct IssueRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Assignee")]
    assignee: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl IssueRow {
    pub(crate) fn new(issue: &Issue, color: bool) -> Self {
        Self {
            id: issue.id,
            title: truncate(&issue.title, 60),
            status: output::paint_status(issue.status, color),
            priority: output::paint_priority(issue.priority, color),
            assignee: issue.assignee.clone().unwrap_or_else(|| "-".into()),
            updated: issue.updated_at.clone(),
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

pub(crate) fn detail(issue: &Issue, color: bool) -> String {
    let mut lines = vec![
        format!("ID:          {}", issue.id),
        format!("Title:       {}", issue.title),
        format!("Status:      {}", output::paint_status(issue.status, color)),
        format!("Priority:    {}", output::paint_priority(issue.priority, color)),
        format!("Assignee:    {}", issue.assignee.as_deref().unwrap_or("-")),
        format!("Created:     {}", issue.created_at),
        format!("Updated:     {}", issue.updated_at),
    ];
    if let Some(desc) = issue.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(String::new());
        lines.push(desc.to_owned());
    }
    lines.join("\n")
}

/// Page footer such as `Page 2 of 3 (25 issues)`.
pub(crate) fn page_summary(list: &IssueListViewModel) -> String {
    let total_pages = list.total_pages();
    if total_pages == 0 {
        return if list.has_active_filters() {
            "No issues match the current filters".into()
        } else {
            "No issues found".into()
        };
    }
    let noun = if list.total_items() == 1 { "issue" } else { "issues" };
    format!(
        "Page {} of {} ({} {noun})",
        list.query().page.saturating_add(1),
        total_pages,
        list.total_items()
    )
}

// ── Query building ──────────────────────────────────────────────────

fn build_query(args: ListArgs, default_page_size: u32) -> IssueQuery {
    let mut query = IssueQuery::new(args.page_size.unwrap_or(default_page_size));
    if let Some(search) = util::non_blank(args.search) {
        query.set_search(search);
    }
    if let Some(status) = args.status {
        query.set_status(Some(status.into()));
    }
    if let Some(priority) = args.priority {
        query.set_priority(Some(priority.into()));
    }
    if let Some(assignee) = util::non_blank(args.assignee) {
        query.set_assignee(assignee);
    }
    match (args.sort_by, args.sort_order) {
        (Some(field), order) => {
            query.sort_by = field.into();
            query.sort_order = order.map_or(tracker_core::SortOrder::Asc, Into::into);
        }
        (None, Some(order)) => query.sort_order = order.into(),
        (None, None) => {}
    }
    // Filters reset paging, so the page goes last.
    query.set_page(args.page.saturating_sub(1));
    query
}

fn draft_from(args: CreateArgs) -> IssueCreate {
    IssueCreate {
        title: args.title,
        description: args.description,
        status: args.status.into(),
        priority: args.priority.into(),
        assignee: args.assignee,
    }
}

fn has_changes(fields: &UpdateArgs) -> bool {
    fields.title.is_some()
        || fields.description.is_some()
        || fields.status.is_some()
        || fields.priority.is_some()
        || fields.assignee.is_some()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    service: &IssueService,
    args: IssuesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color);

    match args.command {
        IssuesCommand::List(list_args) => {
            let query = build_query(list_args, service.config().page_size);
            let mut list = IssueListViewModel::with_query(service.clone(), query);
            list.load_issues().await?;

            let out = output::render_list(
                global.output,
                list.issues(),
                |i| IssueRow::new(i, color),
                |i| i.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            if global.output == crate::cli::OutputFormat::Table && !global.quiet {
                eprintln!("{}", page_summary(&list));
            }
            Ok(())
        }

        IssuesCommand::Get { id } => {
            let mut detail_vm =
                IssueDetailViewModel::new(service.clone(), DetailSource::Route(id));
            detail_vm.load().await?;
            if let Some(issue) = detail_vm.issue() {
                let out = output::render_single(
                    global.output,
                    issue,
                    |i| detail(i, color),
                    |i| i.id.to_string(),
                );
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        IssuesCommand::Create(create_args) => {
            let mut create_vm =
                IssueCreateViewModel::with_draft(service.clone(), draft_from(create_args));
            match create_vm.submit().await? {
                CreateEvent::Created(issue) => {
                    let out = output::render_single(
                        global.output,
                        &issue,
                        |i| detail(i, color),
                        |i| i.id.to_string(),
                    );
                    output::print_output(&out, global.quiet);
                    if !global.quiet {
                        eprintln!("Issue #{} created", issue.id);
                    }
                }
                CreateEvent::Cancelled => {}
            }
            Ok(())
        }

        IssuesCommand::Update { id, fields } => {
            if !has_changes(&fields) {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "give at least one of --title, --description, --status, \
                             --priority, --assignee"
                        .into(),
                });
            }

            let mut detail_vm =
                IssueDetailViewModel::new(service.clone(), DetailSource::Route(id));
            detail_vm.load().await?;
            detail_vm.start_edit();
            if let Some(form) = detail_vm.edit_form_mut() {
                if let Some(title) = fields.title {
                    form.title = title;
                }
                if let Some(description) = fields.description {
                    form.description = description;
                }
                if let Some(status) = fields.status {
                    form.status = status.into();
                }
                if let Some(priority) = fields.priority {
                    form.priority = priority.into();
                }
                if let Some(assignee) = fields.assignee {
                    form.assignee = assignee;
                }
            }

            match detail_vm.save_edit().await? {
                DetailEvent::Updated(issue) => {
                    let out = output::render_single(
                        global.output,
                        &issue,
                        |i| detail(i, color),
                        |i| i.id.to_string(),
                    );
                    output::print_output(&out, global.quiet);
                    if !global.quiet {
                        eprintln!("Issue #{} updated", issue.id);
                    }
                }
                DetailEvent::Unchanged | DetailEvent::Closed => {
                    if !global.quiet {
                        eprintln!("No changes");
                    }
                }
            }
            Ok(())
        }

        IssuesCommand::Delete { id } => {
            let id = parse_issue_id(&id)?;
            let prompt = format!("Delete issue #{id}? This cannot be undone.");
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }
            let ack = service.delete_issue(id).await?;
            if !global.quiet {
                eprintln!(
                    "{}",
                    ack.message.unwrap_or_else(|| format!("Issue #{id} deleted"))
                );
            }
            Ok(())
        }

        IssuesCommand::Browse(browse_args) => browse::run(service, browse_args, global).await,
    }
}
