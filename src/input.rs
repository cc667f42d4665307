//! Interactive collection of the run parameters

use std::io::{self, BufRead, Write};
use std::ops::RangeInclusive;

use crate::simulation::{COUNT_RANGE, DURATION_RANGE, QUADRANT_COUNT, START_RANGE};

/// Ask for a number in `range` until one is given.
///
/// Non-numeric and out-of-range answers are rejected with a message and the
/// question is repeated. End of input is an error.
pub fn prompt_in_range<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    range: RangeInclusive<u32>,
) -> io::Result<u32> {
    let mut line = String::new();
    loop {
        write!(output, "{prompt}")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before a valid number was entered",
            ));
        }

        match line.trim().parse::<u32>() {
            Ok(value) if range.contains(&value) => return Ok(value),
            _ => writeln!(
                output,
                "Invalid input. Please enter a number between {} and {}.",
                range.start(),
                range.end()
            )?,
        }
    }
}

pub fn prompt_start<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<u32> {
    prompt_in_range(
        input,
        output,
        "Select the starting quadrant (1-4): ",
        START_RANGE,
    )
}

pub fn prompt_counts<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<[u32; QUADRANT_COUNT]> {
    writeln!(output, "Enter the number of vehicles for each quadrant (1-100):")?;
    let mut counts = [0; QUADRANT_COUNT];
    for (index, count) in counts.iter_mut().enumerate() {
        *count = prompt_in_range(
            input,
            output,
            &format!("Quadrant {}: ", index + 1),
            COUNT_RANGE,
        )?;
    }
    Ok(counts)
}

pub fn prompt_duration<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<u32> {
    prompt_in_range(
        input,
        output,
        "Enter the total runtime of the program (10-1000 seconds): ",
        DURATION_RANGE,
    )
}
