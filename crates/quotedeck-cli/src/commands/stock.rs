use serde_json::json;

use quotedeck_core::{DashboardClient, Period, Symbol};

use crate::cli::StockArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &StockArgs, client: &DashboardClient) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let period = args
        .period
        .as_deref()
        .map(str::parse::<Period>)
        .transpose()?;

    let view = client.stock(&symbol, period).await?;

    let mut result = CommandResult::ok(json!({
        "quote": view.quote,
        "series": view.series.points,
    }));
    if view.series.dropped > 0 {
        result = result.with_warning(format!(
            "{} chart record(s) dropped during normalization",
            view.series.dropped
        ));
    }
    Ok(result)
}
