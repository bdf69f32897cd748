//! CLI command implementations
//!
//! Each command handles exactly one request and exits. The pure halves
//! ([`annotate_request`], [`inspect_message`]) do no I/O.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::compiled::CompiledQueryUnit;
use crate::explain::{decode_message, ExplainAnalyzer};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::schema::{InMemorySchema, SchemaLoader};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_input, write_output, write_response};

/// One explain request as read by `annotate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainRequest {
    /// Schema snapshot the plan refers to
    pub schema: InMemorySchema,
    /// Compiled artifact of the explained query
    pub unit: CompiledQueryUnit,
    /// Raw engine result set; each column is base64 encoded
    pub rows: Vec<Vec<String>>,
}

impl ExplainRequest {
    /// Parse a request body
    pub fn from_slice(bytes: &[u8]) -> CliResult<Self> {
        let request: ExplainRequest = serde_json::from_slice(bytes)?;
        Ok(request)
    }

    /// Schema and span checks on the embedded artifacts
    pub fn validate(&self) -> CliResult<()> {
        SchemaLoader::validate(&self.schema)?;
        self.unit.validate_spans()?;
        Ok(())
    }

    /// Decoded column bytes, row-major
    pub fn decode_rows(&self) -> CliResult<Vec<Vec<Vec<u8>>>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .map(|(c, column)| {
                        STANDARD.decode(column).map_err(|e| {
                            CliError::invalid_request(format!(
                                "rows[{}][{}] is not valid base64: {}",
                                r, c, e
                            ))
                        })
                    })
                    .collect()
            })
            .collect()
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Annotate {
            config,
            input,
            output,
        } => annotate(config.as_deref(), input.as_deref(), output.as_deref()),
        Command::Inspect { input } => inspect(input.as_deref()),
    }
}

/// Annotate one explain request and write the framed message
pub fn annotate(
    config_path: Option<&Path>,
    input: Option<&Path>,
    output: Option<&Path>,
) -> CliResult<()> {
    let config = Config::load_or_default(config_path)?;
    Logger::set_min_severity(config.log_severity()?);
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("correlate", &config.correlate.to_string()),
            ("log_level", &config.log_level),
        ],
    );

    let request = ExplainRequest::from_slice(&read_input(input)?)?;
    let message = annotate_request(&request, &config)?;
    write_output(output, &message)
}

/// Validate `request` and run the explain pipeline over it
pub fn annotate_request(request: &ExplainRequest, config: &Config) -> CliResult<Vec<u8>> {
    request.validate()?;
    log_event_with_fields(
        Event::SchemaLoaded,
        &[("objects", &request.schema.len().to_string())],
    );

    let rows = request.decode_rows()?;
    let analyzer = ExplainAnalyzer::new(&request.schema, config.explain_options());
    Ok(analyzer.analyze(&request.unit, &rows)?)
}

/// Decode a framed message and print it as JSON
pub fn inspect(input: Option<&Path>) -> CliResult<()> {
    let bytes = read_input(input)?;
    write_response(inspect_message(&bytes)?)
}

/// JSON view of a framed message: `{tag, marker, report}`
pub fn inspect_message(bytes: &[u8]) -> CliResult<Value> {
    let decoded = decode_message(bytes)?;
    let report = decoded.report()?;

    Ok(json!({
        "tag": decoded.tag,
        "marker": char::from(decoded.marker).to_string(),
        "report": serde_json::to_value(&report)?,
    }))
}
