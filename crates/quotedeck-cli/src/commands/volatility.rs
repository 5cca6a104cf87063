use serde_json::json;

use quotedeck_core::{DashboardClient, Symbol, TimeRange};

use crate::cli::VolatilityArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(
    args: &VolatilityArgs,
    client: &DashboardClient,
) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let range: TimeRange = args.time_range.parse()?;

    let report = client.volatility(&symbol, range).await?;
    let dropped = report.dropped_points;

    let mut result = CommandResult::ok(json!({
        "time_range": range,
        "report": report,
    }));
    if dropped > 0 {
        result = result.with_warning(format!(
            "{dropped} rolling record(s) dropped during normalization"
        ));
    }
    Ok(result)
}
