//! `tracker health` handler.

use tracker_core::{HealthStatus, IssueService};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn detail(health: &HealthStatus, api_url: &str) -> String {
    let mut lines = vec![
        format!("Server:  {api_url}"),
        format!("Status:  {}", health.status),
    ];
    let mut extra: Vec<_> = health.extra.iter().collect();
    extra.sort_by(|a, b| a.0.cmp(b.0));
    for (key, value) in extra {
        let value = value
            .as_str()
            .map_or_else(|| value.to_string(), ToOwned::to_owned);
        lines.push(format!("{key}: {value}"));
    }
    lines.join("\n")
}

pub async fn handle(service: &IssueService, global: &GlobalOpts) -> Result<(), CliError> {
    let api_url = service.config().api_url.to_string();
    let health = service.health().await?;
    tracing::info!(status = %health.status, "health check answered");

    let out = output::render_single(
        global.output,
        &health,
        |h| detail(h, &api_url),
        |h| h.status.clone(),
    );
    output::print_output(&out, global.quiet);

    if health.is_ok() {
        Ok(())
    } else {
        Err(CliError::ApiError {
            code: "health".into(),
            message: format!("server reported status '{}'", health.status),
        })
    }
}
