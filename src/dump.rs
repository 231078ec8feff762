use crate::error::*;
use crate::model::Model;
use std::io::{self, Write};

const KGRAM_INDENT: &[u8] = b"    ";
const CHAR_INDENT: &[u8] = b"        ";

/// Renders the transition table as a brace-delimited object.
///
/// K-grams and their next characters are both emitted in ascending byte
/// order. Keys are inserted verbatim between quotes, without escaping.
pub fn dump(model: &Model) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_dump(model, &mut out)?;
    Ok(out)
}

pub fn write_dump(model: &Model, out: &mut impl Write) -> Result<()> {
    render(model, out).context(ErrorKind::Output, "failed to write transition table")?;
    out.flush()
        .context(ErrorKind::Output, "failed to flush output")
}

fn render(model: &Model, out: &mut impl Write) -> io::Result<()> {
    out.write_all(b"{\n")?;

    for (i, (kgram, row)) in model.rows().enumerate() {
        if i > 0 {
            out.write_all(b",\n")?;
        }
        out.write_all(KGRAM_INDENT)?;
        write_key(out, kgram)?;
        out.write_all(b": {\n")?;

        for (j, (&next, &count)) in row.iter().enumerate() {
            if j > 0 {
                out.write_all(b",\n")?;
            }
            out.write_all(CHAR_INDENT)?;
            write_key(out, &[next])?;
            write!(out, ": {}", count)?;
        }

        out.write_all(b"\n")?;
        out.write_all(KGRAM_INDENT)?;
        out.write_all(b"}")?;
    }

    out.write_all(b"\n}\n")
}

fn write_key(out: &mut impl Write, key: &[u8]) -> io::Result<()> {
    out.write_all(b"\"")?;
    out.write_all(key)?;
    out.write_all(b"\"")
}
