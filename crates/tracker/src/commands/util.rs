//! Shared helpers for command handlers.

use std::io::IsTerminal;

use tracker_core::{IssuePriority, IssueStatus, SortField, SortOrder};

use crate::cli::{PriorityArg, SortFieldArg, SortOrderArg, StatusArg};
use crate::error::CliError;

// ── Clap value → domain conversions ─────────────────────────────────

impl From<StatusArg> for IssueStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Open => Self::Open,
            StatusArg::InProgress => Self::InProgress,
            StatusArg::Closed => Self::Closed,
        }
    }
}

impl From<PriorityArg> for IssuePriority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Self::Low,
            PriorityArg::Medium => Self::Medium,
            PriorityArg::High => Self::High,
            PriorityArg::Urgent => Self::Urgent,
        }
    }
}

impl From<SortFieldArg> for SortField {
    fn from(arg: SortFieldArg) -> Self {
        match arg {
            SortFieldArg::Id => Self::Id,
            SortFieldArg::Title => Self::Title,
            SortFieldArg::Status => Self::Status,
            SortFieldArg::Priority => Self::Priority,
            SortFieldArg::Assignee => Self::Assignee,
            SortFieldArg::CreatedAt => Self::CreatedAt,
            SortFieldArg::UpdatedAt => Self::UpdatedAt,
        }
    }
}

impl From<SortOrderArg> for SortOrder {
    fn from(arg: SortOrderArg) -> Self {
        match arg {
            SortOrderArg::Asc => Self::Asc,
            SortOrderArg::Desc => Self::Desc,
        }
    }
}

// ── Interaction ─────────────────────────────────────────────────────

/// Fail early when a command needs a terminal for prompts.
pub fn ensure_terminal(action: &str) -> Result<(), CliError> {
    if std::io::stdin().is_terminal() && std::io::stderr().is_terminal() {
        Ok(())
    } else {
        Err(CliError::NonInteractive {
            action: action.into(),
        })
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    ensure_terminal(message)?;
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(CliError::prompt)
}

/// `Some(s)` unless `s` is blank.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
