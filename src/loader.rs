//! Program loading
//!
//! An `.ls8` file holds one instruction byte per line, written in binary.
//! Everything after `#` is a comment; blank and comment-only lines are skipped.

use crate::error::LoadError;
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Parse program text into bytes
pub fn parse_program(text: &str) -> Result<Vec<u8>, LoadError> {
    let mut program = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let value = line.split('#').next().unwrap_or("").trim();
        if value.is_empty() {
            continue;
        }

        let byte = u8::from_str_radix(value, 2).map_err(|_| LoadError::Malformed {
            line: index + 1,
            text: value.to_string(),
        })?;
        program.push(byte);
    }

    Ok(program)
}

/// Read and parse an `.ls8` program file
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<u8>, LoadError> {
    let path = path.as_ref();
    debug!("Loading LS-8 program: {}", path.display());

    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::FileNotFound(path.display().to_string()),
        _ => LoadError::Io(format!("{}: {}", path.display(), e)),
    })?;

    let program = parse_program(&text)?;
    debug!("Parsed {} bytes from {}", program.len(), path.display());
    Ok(program)
}
