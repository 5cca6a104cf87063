use serde_json::json;

use quotedeck_core::DashboardClient;

use crate::cli::{MoverDirection, MoversArgs};
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &MoversArgs, client: &DashboardClient) -> Result<CommandResult, CliError> {
    let movers = match args.direction {
        MoverDirection::Gainers => client.top_gainers().await?,
        MoverDirection::Losers => client.top_losers().await?,
    };

    let direction = match args.direction {
        MoverDirection::Gainers => "gainers",
        MoverDirection::Losers => "losers",
    };

    Ok(CommandResult::ok(json!({
        "direction": direction,
        "movers": movers,
    })))
}
