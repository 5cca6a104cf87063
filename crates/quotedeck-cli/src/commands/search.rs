use serde_json::json;

use quotedeck_core::{DashboardClient, MIN_QUERY_LEN};

use crate::cli::SearchArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &SearchArgs, client: &DashboardClient) -> Result<CommandResult, CliError> {
    if args.limit == 0 {
        return Err(CliError::Command(String::from(
            "--limit must be greater than zero",
        )));
    }

    let query = args.query.trim();
    if query.chars().count() < MIN_QUERY_LEN {
        // Same contract as the interactive search box: short input is
        // answered locally with an empty list, no request issued.
        return Ok(CommandResult::ok(json!({
            "query": query,
            "results": [],
        }))
        .with_warning("query shorter than 2 characters; no request issued"));
    }

    let results = client.search(query, args.limit).await?;

    Ok(CommandResult::ok(json!({
        "query": query,
        "results": results,
    })))
}
