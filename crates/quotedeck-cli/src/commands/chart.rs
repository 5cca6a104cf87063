use serde_json::json;

use quotedeck_core::{DashboardClient, Period, Symbol};

use crate::cli::ChartArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &ChartArgs, client: &DashboardClient) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let period: Period = args.period.parse()?;

    let series = client.chart(&symbol, period).await?;

    let mut result = CommandResult::ok(json!({
        "symbol": symbol,
        "period": period,
        "series": series.points,
    }));
    if series.dropped > 0 {
        result = result.with_warning(format!(
            "{} chart record(s) dropped during normalization",
            series.dropped
        ));
    }
    Ok(result)
}
