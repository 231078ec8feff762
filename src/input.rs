use crate::error::*;
use slog::Logger;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Reads training text line by line and joins the lines with `\n`.
///
/// A single trailing newline is dropped; blank lines inside the file are
/// kept. Fails if the result is empty.
pub fn read_text(log: &Logger, path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path).context(
        ErrorKind::Open,
        format!("Unable to open file '{}'", path.display()),
    )?;

    let text = join_lines(file)?;
    slog::debug!(
        log, "Read training text";
        "path" => %path.display(), "bytes" => text.len()
    );

    if text.is_empty() {
        return Err(Error::new(ErrorKind::EmptyInput, "Input file is empty"));
    }

    Ok(text)
}

fn join_lines(source: impl Read) -> Result<Vec<u8>> {
    let mut text = Vec::new();

    for line in BufReader::new(source).split(b'\n') {
        let line = line.context(ErrorKind::Read, "failed to read line")?;
        text.extend_from_slice(&line);
        text.push(b'\n');
    }
    text.pop();

    Ok(text)
}
