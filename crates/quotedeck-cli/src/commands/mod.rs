mod chart;
mod forecast;
mod movers;
mod overview;
mod ranking;
mod search;
mod stock;
mod volatility;

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use quotedeck_core::{BackendConfig, DashboardClient, FetchError, ReqwestHttpClient, UtcDateTime};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Standard response envelope for all machine-readable outputs.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub meta: EnvelopeMeta,
    pub data: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EnvelopeError>,
}

#[derive(Debug, Serialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    pub generated_at: UtcDateTime,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EnvelopeError {
    pub code: String,
    pub message: String,
    pub retryable: bool,
}

impl EnvelopeError {
    pub fn from_fetch(error: &FetchError) -> Self {
        Self {
            code: error.code().to_owned(),
            message: error.to_string(),
            retryable: error.retryable(),
        }
    }
}

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope, CliError> {
    let config = BackendConfig::from_env().with_timeout_ms(cli.timeout_ms);
    let client = DashboardClient::new(config, Arc::new(ReqwestHttpClient::new()));

    let started = Instant::now();
    debug!(command = ?cli.command, "executing command");
    let result = match &cli.command {
        Command::Search(args) => search::run(args, &client).await?,
        Command::Stock(args) => stock::run(args, &client).await?,
        Command::Chart(args) => chart::run(args, &client).await?,
        Command::Volatility(args) => volatility::run(args, &client).await?,
        Command::Ranking(args) => ranking::run(args, &client).await?,
        Command::Movers(args) => movers::run(args, &client).await?,
        Command::Forecast(args) => forecast::run(args, &client).await?,
        Command::Overview(args) => overview::run(args, client).await?,
    };

    Ok(Envelope {
        meta: EnvelopeMeta {
            request_id: Uuid::new_v4().to_string(),
            generated_at: UtcDateTime::now(),
            latency_ms: started.elapsed().as_millis() as u64,
            warnings: result.warnings,
        },
        data: result.data,
        errors: result.errors,
    })
}
