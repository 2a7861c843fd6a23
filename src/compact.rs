//! Blank-line compaction.

use crate::lines;

/// Runs of at least this many blank lines collapse to a single empty line.
const COLLAPSE_AT: usize = 3;

/// Collapse every run of three or more blank lines into one empty line.
/// Shorter runs are left exactly as they are.
pub fn compact_blank_lines(text: &str) -> String {
    let mut output: Vec<&str> = Vec::new();
    let mut run: Vec<&str> = Vec::new();

    for line in text.lines() {
        if lines::is_blank(line) {
            run.push(line);
            continue;
        }
        flush(&mut run, &mut output);
        output.push(line);
    }
    flush(&mut run, &mut output);
    lines::rejoin(&output, text)
}

fn flush<'a>(run: &mut Vec<&'a str>, output: &mut Vec<&'a str>) {
    if run.len() >= COLLAPSE_AT {
        output.push("");
        run.clear();
    } else {
        output.append(run);
    }
}
