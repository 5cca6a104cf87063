use serde_json::json;

use quotedeck_core::{DashboardClient, TimeRange};

use crate::cli::RankingArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &RankingArgs, client: &DashboardClient) -> Result<CommandResult, CliError> {
    if args.limit == 0 {
        return Err(CliError::Command(String::from(
            "--limit must be greater than zero",
        )));
    }
    let range: TimeRange = args.time_range.parse()?;

    let ranking = client.volatility_ranking(range, args.limit).await?;

    Ok(CommandResult::ok(json!({
        "time_range": range,
        "most_volatile": ranking.most_volatile,
        "least_volatile": ranking.least_volatile,
    })))
}
