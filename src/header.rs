//! Header cleanup: drop `//` comments line by line, keeping doc blocks.
//!
//! Headers carry no function bodies worth tracking, so every line is treated
//! alike. Doc-block lines (`/**`, ` * ...`) are never touched.

use crate::compact::compact_blank_lines;
use crate::lines;
use crate::split::{self, Split};

fn is_doc_block_line(line: &str) -> bool {
    let t = line.trim_start();
    t.starts_with("/**") || t.starts_with('*')
}

/// Clean a header's text, then compact blank lines.
pub fn clean_header(text: &str) -> String {
    let kept: Vec<&str> = text
        .lines()
        .filter_map(|line| {
            if is_doc_block_line(line) {
                return Some(line);
            }
            match split::split_comment(line) {
                Split::NoComment => Some(line),
                Split::CommentOnly => None,
                Split::Trailing(code) => Some(code),
            }
        })
        .collect();
    compact_blank_lines(&lines::rejoin(&kept, text))
}
