use serde::Serialize;
use serde_json::{json, Value};

use quotedeck_core::{
    DashboardClient, DashboardSession, LoadState, Period, Selected, Symbol, TimeRange,
};

use crate::cli::OverviewArgs;
use crate::error::CliError;

use super::{CommandResult, EnvelopeError};

pub async fn run(args: &OverviewArgs, client: DashboardClient) -> Result<CommandResult, CliError> {
    if args.days == 0 {
        return Err(CliError::Command(String::from(
            "--days must be greater than zero",
        )));
    }
    let symbol = Symbol::parse(&args.symbol)?;
    let period: Period = args.period.parse()?;
    let range: TimeRange = args.time_range.parse()?;

    let mut session = DashboardSession::new(client).with_forecast_horizon(args.days);
    // Without a selection these record preferences only; no fetch happens.
    session.set_period(period).await;
    session.set_time_range(range).await;
    session
        .select(Selected {
            symbol: symbol.clone(),
            company_name: symbol.to_string(),
        })
        .await;

    let coordinator = session.coordinator();
    let mut errors = Vec::new();

    let data = json!({
        "selected": coordinator.selected(),
        "period": coordinator.period(),
        "time_range": coordinator.time_range(),
        "history": render_state(coordinator.history(), "history", &mut errors),
        "volatility": render_state(coordinator.volatility(), "volatility", &mut errors),
        "forecast": render_state(coordinator.forecast(), "forecast", &mut errors),
    });

    Ok(CommandResult::ok(data).with_errors(errors))
}

fn render_state<T: Serialize>(
    state: &LoadState<T>,
    kind: &str,
    errors: &mut Vec<EnvelopeError>,
) -> Value {
    match state {
        LoadState::Idle => json!({"status": "idle"}),
        LoadState::Loading => json!({"status": "loading"}),
        LoadState::Loaded(value) => json!({"status": "loaded", "data": value}),
        LoadState::Failed(message) => {
            errors.push(EnvelopeError {
                code: format!("load.{kind}"),
                message: message.clone(),
                retryable: true,
            });
            json!({"status": "failed", "error": message})
        }
    }
}
