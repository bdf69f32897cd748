//! Byte and JSON I/O for the CLI
//!
//! - Input: a file when given, stdin otherwise
//! - `annotate` output: the raw framed message
//! - `inspect` output: single JSON object on stdout

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read all input bytes from `path`, or stdin when `None`
pub fn read_input(path: Option<&Path>) -> CliResult<Vec<u8>> {
    let bytes = match path {
        Some(path) => fs::read(path).map_err(|e| {
            CliError::io_error(format!("Failed to read {}: {}", path.display(), e))
        })?,
        None => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            buf
        }
    };

    if bytes.is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    Ok(bytes)
}

/// Write raw bytes to `path`, or stdout when `None`
pub fn write_output(path: Option<&Path>, bytes: &[u8]) -> CliResult<()> {
    match path {
        Some(path) => fs::write(path, bytes).map_err(|e| {
            CliError::io_error(format!("Failed to write {}: {}", path.display(), e))
        }),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(bytes)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
