use serde_json::json;

use quotedeck_core::{DashboardClient, Symbol};

use crate::cli::ForecastArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &ForecastArgs, client: &DashboardClient) -> Result<CommandResult, CliError> {
    if args.days == 0 {
        return Err(CliError::Command(String::from(
            "--days must be greater than zero",
        )));
    }
    let symbol = Symbol::parse(&args.symbol)?;

    // The forecast body/anchor comes from the symbol's history, the same
    // way the dashboard feeds its forecast view from the loaded chart.
    let view = client.stock(&symbol, None).await?;
    let forecast = client
        .forecast(&symbol, &view.series.points, args.days)
        .await?;

    let mut result = CommandResult::ok(json!({
        "horizon_days": args.days,
        "forecast": &forecast,
    }));
    if forecast.is_empty() {
        result = result.with_warning("backend returned an empty forecast");
    }
    Ok(result)
}
