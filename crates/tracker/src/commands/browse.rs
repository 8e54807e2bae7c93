//! Interactive issue browser.
//!
//! Hosts the list, detail and create view-models in a prompt loop and
//! feeds their events back into the list, the way a page hosts its
//! panels. View-model failures are shown and the session continues;
//! prompt failures end it.

use dialoguer::{Confirm, Input, Select};
use owo_colors::OwoColorize;
use strum::IntoEnumIterator;

use tracker_core::{
    CoreError, DetailSource, DetailState, EditForm, IssueCreate, IssueCreateViewModel,
    IssueDetailViewModel, IssueListViewModel, IssuePriority, IssueQuery, IssueService,
    IssueStatus, SortField, SortIndicator,
};

use crate::cli::{BrowseArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::issues::{self, IssueRow};
use super::util;

// ── Menu actions ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListAction {
    Open,
    NextPage,
    PrevPage,
    GoToPage,
    Search,
    FilterStatus,
    FilterPriority,
    FilterAssignee,
    ClearFilters,
    Sort,
    Create,
    Delete,
    Refresh,
    Quit,
}

impl ListAction {
    fn label(self) -> &'static str {
        match self {
            Self::Open => "Open issue",
            Self::NextPage => "Next page",
            Self::PrevPage => "Previous page",
            Self::GoToPage => "Go to page",
            Self::Search => "Search",
            Self::FilterStatus => "Filter by status",
            Self::FilterPriority => "Filter by priority",
            Self::FilterAssignee => "Filter by assignee",
            Self::ClearFilters => "Clear filters",
            Self::Sort => "Sort",
            Self::Create => "New issue",
            Self::Delete => "Delete issue",
            Self::Refresh => "Refresh",
            Self::Quit => "Quit",
        }
    }

    /// Actions that make sense for the current list state.
    fn available(list: &IssueListViewModel) -> Vec<Self> {
        let has_issues = !list.issues().is_empty();
        let page = list.query().page;
        let pages = list.total_pages();

        let mut actions = Vec::new();
        if has_issues {
            actions.push(Self::Open);
        }
        if page.saturating_add(1) < pages {
            actions.push(Self::NextPage);
        }
        if page > 0 {
            actions.push(Self::PrevPage);
        }
        if pages > 1 {
            actions.push(Self::GoToPage);
        }
        actions.extend([
            Self::Search,
            Self::FilterStatus,
            Self::FilterPriority,
            Self::FilterAssignee,
        ]);
        if list.has_active_filters() {
            actions.push(Self::ClearFilters);
        }
        actions.push(Self::Sort);
        actions.push(Self::Create);
        if has_issues {
            actions.push(Self::Delete);
        }
        actions.extend([Self::Refresh, Self::Quit]);
        actions
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetailAction {
    Edit,
    CopyJson,
    Reload,
    Delete,
    Back,
}

impl DetailAction {
    const ALL: [Self; 5] = [
        Self::Edit,
        Self::CopyJson,
        Self::Reload,
        Self::Delete,
        Self::Back,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Edit => "Edit",
            Self::CopyJson => "Show as JSON",
            Self::Reload => "Reload",
            Self::Delete => "Delete",
            Self::Back => "Back to list",
        }
    }
}

// ── Prompt helpers ──────────────────────────────────────────────────

fn select<T: ToString>(prompt: &str, items: &[T], default: usize) -> Result<usize, CliError> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact()
        .map_err(CliError::prompt)
}

fn input(prompt: &str, initial: &str, allow_empty: bool) -> Result<String, CliError> {
    Input::<String>::new()
        .with_prompt(prompt)
        .with_initial_text(initial)
        .allow_empty(allow_empty)
        .interact_text()
        .map_err(CliError::prompt)
}

/// `None` means "any"; `Some` picks a concrete value.
fn select_optional<T: Copy + ToString + PartialEq>(
    prompt: &str,
    values: &[T],
    current: Option<T>,
) -> Result<Option<T>, CliError> {
    let mut labels = vec!["(any)".to_owned()];
    labels.extend(values.iter().map(ToString::to_string));
    let default = current
        .and_then(|c| values.iter().position(|v| *v == c))
        .map_or(0, |i| i + 1);
    let picked = select(prompt, &labels, default)?;
    Ok(picked.checked_sub(1).and_then(|i| values.get(i).copied()))
}

fn select_value<T: Copy + ToString + PartialEq>(
    prompt: &str,
    values: &[T],
    current: T,
) -> Result<T, CliError> {
    let labels: Vec<String> = values.iter().map(ToString::to_string).collect();
    let default = values.iter().position(|v| *v == current).unwrap_or(0);
    let picked = select(prompt, &labels, default)?;
    Ok(values.get(picked).copied().unwrap_or(current))
}

/// Show a view-model failure and carry on.
fn report<T>(result: Result<T, CoreError>, color: bool) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            if color {
                eprintln!("{}", format!("✗ {e}").red());
            } else {
                eprintln!("✗ {e}");
            }
            None
        }
    }
}

// ── Rendering ───────────────────────────────────────────────────────

fn sort_label(list: &IssueListViewModel) -> String {
    let field = list.query().sort_by;
    let arrow = match list.sort_indicator(field) {
        SortIndicator::Ascending => "▲",
        SortIndicator::Descending => "▼",
        SortIndicator::Unsorted => "",
    };
    format!("{field} {arrow}")
}

fn filter_label(query: &IssueQuery) -> String {
    let mut parts = Vec::new();
    if !query.search.is_empty() {
        parts.push(format!("search \"{}\"", query.search));
    }
    if let Some(status) = query.status {
        parts.push(format!("status {status}"));
    }
    if let Some(priority) = query.priority {
        parts.push(format!("priority {priority}"));
    }
    if !query.assignee.is_empty() {
        parts.push(format!("assignee {}", query.assignee));
    }
    parts.join(", ")
}

/// Page links such as `1 2 [3] 4 5`, one-based.
fn page_links(list: &IssueListViewModel) -> String {
    let current = list.query().page;
    list.visible_pages()
        .into_iter()
        .map(|p| {
            let shown = p.saturating_add(1);
            if p == current {
                format!("[{shown}]")
            } else {
                shown.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_list(list: &IssueListViewModel, color: bool) {
    eprintln!();
    if let Some(message) = list.state().error_message() {
        eprintln!("{message}");
    }
    if !list.issues().is_empty() {
        let rows: Vec<IssueRow> = list.issues().iter().map(|i| IssueRow::new(i, color)).collect();
        eprintln!("{}", output::render_table(&rows));
    }
    let mut footer = issues::page_summary(list);
    let links = page_links(list);
    if !links.is_empty() {
        footer.push_str(&format!("   {links}"));
    }
    eprintln!("{footer}");
    eprintln!("Sorted by {}", sort_label(list));
    if list.has_active_filters() {
        eprintln!("Filters: {}", filter_label(list.query()));
    }
}

// ── Entry point ─────────────────────────────────────────────────────

pub async fn run(
    service: &IssueService,
    args: BrowseArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::ensure_terminal("issues browse")?;
    let color = output::should_color(global.color);

    let page_size = args.page_size.unwrap_or(service.config().page_size);
    let mut list = IssueListViewModel::with_query(service.clone(), IssueQuery::new(page_size));

    if let Some(raw) = args.open {
        let mut detail = IssueDetailViewModel::new(service.clone(), DetailSource::Route(raw));
        detail.load().await?;
        if let Some(issue) = detail.issue().cloned() {
            list.select_issue(&issue);
        }
        detail_loop(&mut list, detail, global, color).await?;
    }

    report(list.load_issues().await, color);

    loop {
        print_list(&list, color);
        let actions = ListAction::available(&list);
        let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
        let Some(&action) = actions.get(select("Action", &labels, 0)?) else {
            continue;
        };

        match action {
            ListAction::Open => {
                if let Some(index) = pick_issue(&list, "Open which issue?")? {
                    list.select_index(index);
                    if let Some(detail) = list.detail_view_model() {
                        detail_loop(&mut list, detail, global, color).await?;
                    }
                }
            }
            ListAction::NextPage => {
                let next = list.query().page.saturating_add(1);
                report(list.on_page_change(next).await, color);
            }
            ListAction::PrevPage => {
                let prev = list.query().page.saturating_sub(1);
                report(list.on_page_change(prev).await, color);
            }
            ListAction::GoToPage => {
                let raw = input("Page number", "", false)?;
                match raw.trim().parse::<u32>() {
                    Ok(n) if n >= 1 => {
                        report(list.on_page_change(n - 1).await, color);
                    }
                    _ => eprintln!("Not a page number: {raw}"),
                }
            }
            ListAction::Search => {
                let current = list.query().search.clone();
                let term = input("Search", &current, true)?;
                report(list.set_search(term.trim()).await, color);
            }
            ListAction::FilterStatus => {
                let statuses: Vec<IssueStatus> = IssueStatus::iter().collect();
                let status = select_optional("Status", &statuses, list.query().status)?;
                report(list.set_status_filter(status).await, color);
            }
            ListAction::FilterPriority => {
                let priorities: Vec<IssuePriority> = IssuePriority::iter().collect();
                let priority = select_optional("Priority", &priorities, list.query().priority)?;
                report(list.set_priority_filter(priority).await, color);
            }
            ListAction::FilterAssignee => {
                let assignee = pick_assignee(&list)?;
                report(list.set_assignee_filter(assignee).await, color);
            }
            ListAction::ClearFilters => {
                report(list.clear_filters().await, color);
            }
            ListAction::Sort => {
                let fields: Vec<SortField> = SortField::iter().collect();
                let labels: Vec<String> = fields
                    .iter()
                    .map(|f| match list.sort_indicator(*f) {
                        SortIndicator::Ascending => format!("{f} ▲"),
                        SortIndicator::Descending => format!("{f} ▼"),
                        SortIndicator::Unsorted => f.to_string(),
                    })
                    .collect();
                let current = fields
                    .iter()
                    .position(|f| *f == list.query().sort_by)
                    .unwrap_or(0);
                if let Some(&field) = fields.get(select("Sort by", &labels, current)?) {
                    report(list.on_sort(field).await, color);
                }
            }
            ListAction::Create => create_flow(&mut list, service, color).await?,
            ListAction::Delete => {
                if let Some(index) = pick_issue(&list, "Delete which issue?")? {
                    if let Some(id) = list.issues().get(index).map(|i| i.id) {
                        if util::confirm(&format!("Delete issue #{id}?"), global.yes)? {
                            report(list.delete_issue(id).await, color);
                        }
                    }
                }
            }
            ListAction::Refresh => {
                report(list.load_issues().await, color);
            }
            ListAction::Quit => return Ok(()),
        }
    }
}

fn pick_issue(list: &IssueListViewModel, prompt: &str) -> Result<Option<usize>, CliError> {
    let mut labels: Vec<String> = list
        .issues()
        .iter()
        .map(|i| format!("#{} {}", i.id, i.title))
        .collect();
    labels.push("(cancel)".into());
    let picked = select(prompt, &labels, 0)?;
    Ok((picked < list.issues().len()).then_some(picked))
}

fn pick_assignee(list: &IssueListViewModel) -> Result<String, CliError> {
    let mut labels = vec!["(any)".to_owned()];
    labels.extend(list.unique_assignees().iter().cloned());
    labels.push("(other)".into());
    let picked = select("Assignee", &labels, 0)?;
    if picked == 0 {
        Ok(String::new())
    } else if picked == labels.len() - 1 {
        input("Assignee name", &list.query().assignee, true).map(|s| s.trim().to_owned())
    } else {
        Ok(labels.get(picked).cloned().unwrap_or_default())
    }
}

// ── Detail panel ────────────────────────────────────────────────────

async fn detail_loop(
    list: &mut IssueListViewModel,
    mut detail: IssueDetailViewModel,
    global: &GlobalOpts,
    color: bool,
) -> Result<(), CliError> {
    loop {
        eprintln!();
        match (detail.state(), detail.issue()) {
            (DetailState::Loading, _) => eprintln!("Loading issue…"),
            (DetailState::NotFound(message), _) => eprintln!("Issue not found: {message}"),
            (DetailState::Loaded, Some(issue)) => eprintln!("{}", issues::detail(issue, color)),
            (DetailState::Loaded, None) => {}
        }

        let labels: Vec<&str> = DetailAction::ALL.iter().map(|a| a.label()).collect();
        let action = DetailAction::ALL
            .get(select("Action", &labels, 0)?)
            .copied()
            .unwrap_or(DetailAction::Back);

        match action {
            DetailAction::Edit => {
                if !detail.start_edit() {
                    eprintln!("Nothing to edit");
                    continue;
                }
                edit_and_save(list, &mut detail, color).await?;
            }
            DetailAction::CopyJson => {
                if let Some(json) = detail.issue_json() {
                    println!("{json}");
                }
            }
            DetailAction::Reload => {
                report(detail.reload_issue().await, color);
            }
            DetailAction::Delete => {
                let Some(id) = detail.issue().map(|i| i.id) else {
                    continue;
                };
                if util::confirm(&format!("Delete issue #{id}?"), global.yes)?
                    && report(list.delete_issue(id).await, color).is_some()
                {
                    return Ok(());
                }
            }
            DetailAction::Back => {
                let event = detail.close();
                report(list.on_detail_event(event).await, color);
                return Ok(());
            }
        }
    }
}

fn prompt_edit_form(form: &mut EditForm) -> Result<(), CliError> {
    form.title = input("Title", &form.title, false)?;
    form.description = input("Description", &form.description, true)?;
    let statuses: Vec<IssueStatus> = IssueStatus::iter().collect();
    form.status = select_value("Status", &statuses, form.status)?;
    let priorities: Vec<IssuePriority> = IssuePriority::iter().collect();
    form.priority = select_value("Priority", &priorities, form.priority)?;
    form.assignee = input("Assignee", &form.assignee, true)?;
    Ok(())
}

async fn edit_and_save(
    list: &mut IssueListViewModel,
    detail: &mut IssueDetailViewModel,
    color: bool,
) -> Result<(), CliError> {
    loop {
        if let Some(form) = detail.edit_form_mut() {
            prompt_edit_form(form)?;
        }
        if let Some(event) = report(detail.save_edit().await, color) {
            report(list.on_detail_event(event).await, color);
            return Ok(());
        }
        // Save failed; the form is still there.
        let retry = Confirm::new()
            .with_prompt("Keep editing?")
            .default(true)
            .interact()
            .map_err(CliError::prompt)?;
        if !retry {
            detail.cancel_edit();
            return Ok(());
        }
    }
}

// ── Create form ─────────────────────────────────────────────────────

fn prompt_draft(draft: &mut IssueCreate) -> Result<(), CliError> {
    draft.title = input("Title", &draft.title, true)?;
    let description = input("Description", draft.description.as_deref().unwrap_or(""), true)?;
    draft.description = util::non_blank(Some(description));
    let statuses: Vec<IssueStatus> = IssueStatus::iter().collect();
    draft.status = select_value("Status", &statuses, draft.status)?;
    let priorities: Vec<IssuePriority> = IssuePriority::iter().collect();
    draft.priority = select_value("Priority", &priorities, draft.priority)?;
    let assignee = input("Assignee", draft.assignee.as_deref().unwrap_or(""), true)?;
    draft.assignee = util::non_blank(Some(assignee));
    Ok(())
}

async fn create_flow(
    list: &mut IssueListViewModel,
    service: &IssueService,
    color: bool,
) -> Result<(), CliError> {
    list.open_create_form();
    let mut create = IssueCreateViewModel::new(service.clone());

    loop {
        prompt_draft(create.draft_mut())?;
        let choice = select("Create this issue?", &["Create", "Edit again", "Cancel"], 0)?;
        match choice {
            0 => {
                if let Some(event) = report(create.submit().await, color) {
                    report(list.on_create_event(event).await, color);
                    return Ok(());
                }
            }
            1 => {}
            _ => {
                let event = create.cancel();
                report(list.on_create_event(event).await, color);
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::TrackerConfig;

    #[allow(clippy::unwrap_used)]
    fn list() -> IssueListViewModel {
        IssueListViewModel::new(IssueService::new(TrackerConfig::default()).unwrap())
    }

    #[test]
    fn empty_list_offers_no_paging_or_open() {
        let actions = ListAction::available(&list());
        assert!(!actions.contains(&ListAction::Open));
        assert!(!actions.contains(&ListAction::NextPage));
        assert!(!actions.contains(&ListAction::PrevPage));
        assert!(!actions.contains(&ListAction::ClearFilters));
        assert_eq!(actions.last(), Some(&ListAction::Quit));
    }

    #[test]
    fn filter_label_lists_active_filters() {
        let mut query = IssueQuery::new(10);
        query.set_search("crash");
        query.set_status(Some(IssueStatus::Open));
        assert_eq!(filter_label(&query), "search \"crash\", status open");
    }

    #[test]
    fn default_sort_label_points_down() {
        assert_eq!(sort_label(&list()), "updated_at ▼");
    }
}
