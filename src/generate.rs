use crate::error::*;
use crate::model::{Model, Row};
use rand::Rng;
use slog::Logger;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::io::{self, Write};

/// Source of uniformly distributed integers.
///
/// Generation only ever asks for a value in `[0, bound)`, so anything that
/// can answer that question can drive it, including a fixed script in tests.
pub trait Draw {
    /// Returns a value in `[0, bound)`. `bound` is always at least 1.
    fn below(&mut self, bound: usize) -> usize;
}

impl<R: Rng> Draw for R {
    fn below(&mut self, bound: usize) -> usize {
        self.gen_range(0, bound)
    }
}

/// Picks the character whose cumulative count first exceeds `r`.
///
/// Characters are walked in ascending byte order.
fn choose(row: &Row, r: usize) -> Option<u8> {
    let mut cumulative = 0;
    for (&next, &count) in row {
        cumulative += count;
        if r < cumulative {
            return Some(next);
        }
    }

    None
}

/// Walks the model from `seed`, handing each chosen character to `emit`.
///
/// Only the k-byte cursor is kept; characters are not accumulated. Stops
/// after `length - seed.len()` characters, or early if the cursor has no row.
fn walk<E>(
    model: &Model,
    seed: &[u8],
    length: usize,
    draw: &mut impl Draw,
    mut emit: impl FnMut(u8) -> std::result::Result<(), E>,
) -> std::result::Result<(), E> {
    let mut cursor: VecDeque<u8> = seed.iter().cloned().collect();

    for _ in seed.len()..length {
        let row = match model.row(cursor.make_contiguous()) {
            Some(row) => row,
            None => break,
        };

        let total: usize = row.values().sum();
        let next = match choose(row, draw.below(total)) {
            Some(next) => next,
            None => break,
        };

        emit(next)?;
        cursor.pop_front();
        cursor.push_back(next);
    }

    Ok(())
}

/// Generates `length` characters starting with `seed`.
///
/// The output begins with `seed` verbatim. Each following character is drawn
/// from the current k-gram's row in proportion to its count, and the k-gram
/// then slides forward by one. Generation stops early if the current k-gram
/// has no row.
pub fn sample(model: &Model, seed: &[u8], length: usize, draw: &mut impl Draw) -> Vec<u8> {
    let mut output = seed.to_vec();

    let pushed = walk::<Infallible>(model, seed, length, draw, |next| {
        output.push(next);
        Ok(())
    });
    match pushed {
        Ok(()) => {}
        Err(never) => match never {},
    }

    output
}

/// Same as [`sample`], but writes characters to `out` as they are chosen.
pub fn write_sample(
    model: &Model,
    seed: &[u8],
    length: usize,
    draw: &mut impl Draw,
    out: &mut impl Write,
) -> io::Result<()> {
    out.write_all(seed)?;
    walk(model, seed, length, draw, |next| out.write_all(&[next]))
}

/// Writes one generated level per order in `1..=max_k`.
///
/// Each order gets a freshly built model and starts from the first `k`
/// characters of `text`. Output for a level is `Level {k}: {text}` followed
/// by a `~~~` line.
pub fn sweep(
    log: &Logger,
    text: &[u8],
    max_k: usize,
    length: usize,
    draw: &mut impl Draw,
    out: &mut impl Write,
) -> Result<()> {
    for k in 1..=max_k {
        let model = Model::build(text, k);
        slog::debug!(
            log, "Built model";
            "order" => k, "kgrams" => model.len()
        );

        write!(out, "Level {}: ", k).context(ErrorKind::Output, "failed to write output")?;
        write_sample(&model, &text[..k], length, draw, out)
            .context(ErrorKind::Output, "failed to write output")?;
        out.write_all(b"\n~~~\n")
            .context(ErrorKind::Output, "failed to write output")?;
    }

    out.flush().context(ErrorKind::Output, "failed to flush output")
}
