//! Literal-aware splitting of `//` line comments.
//!
//! A `//` marker is a real comment only when an even number of `"` characters
//! precede it; the first marker passing that test starts the comment.
//!
//! Escaped quotes (`\"`), `'"'` character literals and strings spanning several
//! lines defeat the count. Such lines are left untouched or mis-split; the
//! targeted generator sources never rely on either.

/// Line-comment marker.
pub const MARKER: &str = "//";

/// Outcome of examining one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split<'a> {
    /// No real comment on the line (none at all, or the marker sits inside a literal).
    NoComment,
    /// The whole line is a comment.
    CommentOnly,
    /// Code followed by a comment; holds the right-trimmed code prefix.
    Trailing(&'a str),
}

/// Classify `line` by where its first real `//` falls.
pub fn split_comment(line: &str) -> Split<'_> {
    if line.trim_start().starts_with(MARKER) {
        return Split::CommentOnly;
    }
    line.match_indices(MARKER)
        .map(|(pos, _)| pos)
        .find(|&pos| line[..pos].matches('"').count() % 2 == 0)
        .map_or(Split::NoComment, |pos| Split::Trailing(line[..pos].trim_end()))
}

/// The code portion of `line`: everything before a real comment.
pub fn code_part(line: &str) -> &str {
    match split_comment(line) {
        Split::NoComment => line,
        Split::CommentOnly => "",
        Split::Trailing(code) => code,
    }
}
