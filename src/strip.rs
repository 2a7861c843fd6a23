//! Comment stripping driven by function-boundary classification.
//!
//! - Body lines lose their `//` comments; comment-only lines are dropped.
//! - Signature lines are kept verbatim.
//! - Outside lines are kept, except standalone `//` lines that do not sit
//!   directly above a recognized declaration.
//!
//! Blank lines before the first non-blank line of the file are dropped.

use crate::catalog::Catalog;
use crate::lines;
use crate::split::{self, Split};
use crate::tracker::{BraceTracker, Classifier, LineClass, ScanState};
use regex::Regex;
use std::sync::LazyLock;

static RE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ \t]*//").unwrap());

/// Strip `text` line by line, returning the surviving lines.
///
/// `is_declaration` decides whether a standalone comment outside any function
/// is documentation for the line that follows it.
pub fn strip_lines<C, D>(text: &str, classifier: &C, is_declaration: D) -> Vec<String>
where
    C: Classifier + ?Sized,
    D: Fn(&str) -> bool,
{
    let input: Vec<&str> = text.lines().collect();
    let mut output = Vec::with_capacity(input.len());
    let mut state = ScanState::default();
    let (mut signature, mut body) = (0usize, 0usize);

    for (i, &line) in input.iter().enumerate() {
        let (next, class) = classifier.classify(state, line);
        state = next;

        if output.is_empty() && lines::is_blank(line) {
            continue;
        }

        match class {
            LineClass::Outside => {
                let documents_next = || input.get(i + 1).is_some_and(|&n| is_declaration(n));
                if !RE_COMMENT.is_match(line) || documents_next() {
                    output.push(line.to_string());
                }
            }
            LineClass::Signature => {
                signature += 1;
                output.push(line.to_string());
            }
            LineClass::Body => {
                body += 1;
                match split::split_comment(line) {
                    Split::NoComment => output.push(line.to_string()),
                    Split::CommentOnly => {}
                    Split::Trailing(code) => output.push(code.to_string()),
                }
            }
        }
    }

    log::debug!(
        "classified {} lines: {signature} signature, {body} body, {} outside",
        input.len(),
        input.len() - signature - body
    );
    output
}

/// Strip with the default tracker, recognizing declarations from `catalog`.
pub fn strip(text: &str, catalog: &Catalog) -> String {
    let kept = strip_lines(text, &BraceTracker, |line| catalog.is_declaration_start(line));
    lines::rejoin(&kept, text)
}
