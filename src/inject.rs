//! Canonical comment injection above known function definitions.
//!
//! Each catalog rule is searched independently over the whole text. A definition
//! claimed by an earlier rule is never claimed again, so at most one comment is
//! inserted per definition. A definition whose nearest preceding non-blank line
//! is already a comment is left alone, which makes injection a fixed point:
//! `inject(inject(x)) == inject(x)`.

use crate::catalog::Catalog;
use crate::lines;
use std::collections::btree_map::{BTreeMap, Entry};

/// One definition matched by a catalog rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Index of the definition line; the comment goes right above it.
    pub line: usize,
    /// Index of the winning rule in catalog order.
    pub rule: usize,
    pub already_commented: bool,
}

fn is_comment_line(line: &str) -> bool {
    let t = line.trim();
    t.starts_with("//") || t.starts_with("/*") || t.starts_with('*') || t.ends_with("*/")
}

fn preceded_by_comment(source: &[&str], index: usize) -> bool {
    source[..index]
        .iter()
        .rev()
        .find(|l| !lines::is_blank(l))
        .is_some_and(|l| is_comment_line(l))
}

/// Locate every definition matched by the catalog, in line order.
pub fn find_matches(text: &str, catalog: &Catalog) -> Vec<Match> {
    let source: Vec<&str> = text.lines().collect();
    let line_starts: Vec<usize> = std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect();

    let mut owners: BTreeMap<usize, usize> = BTreeMap::new();
    for (index, (rule, re)) in catalog.definitions().enumerate() {
        for m in re.find_iter(text) {
            let line = line_starts.partition_point(|&s| s <= m.start()) - 1;
            match owners.entry(line) {
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
                Entry::Occupied(slot) => {
                    log::info!(
                        "line {}: rule `{}` also matches; keeping earlier rule `{}`",
                        line + 1,
                        rule.pattern,
                        catalog.rules()[*slot.get()].pattern,
                    );
                }
            }
        }
    }

    owners
        .into_iter()
        .filter(|&(line, _)| line < source.len())
        .map(|(line, rule)| Match {
            line,
            rule,
            already_commented: preceded_by_comment(&source, line),
        })
        .collect()
}

/// Insert each missing canonical comment above its definition.
pub fn inject(text: &str, catalog: &Catalog) -> String {
    let matches = find_matches(text, catalog);
    if matches.iter().all(|m| m.already_commented) {
        return text.to_string();
    }

    let mut pending = matches.iter().filter(|m| !m.already_commented).peekable();
    let mut output: Vec<&str> = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if let Some(m) = pending.next_if(|m| m.line == i) {
            let rule = &catalog.rules()[m.rule];
            log::debug!("line {}: inserting comment for `{}`", i + 1, rule.pattern);
            output.push(&rule.comment);
        }
        output.push(line);
    }
    lines::rejoin(&output, text)
}
