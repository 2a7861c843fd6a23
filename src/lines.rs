//! Line splitting and re-joining shared by the text passes.

/// Join `lines` with `\n`, ending with a newline when `original` did.
pub fn rejoin<S: AsRef<str>>(lines: &[S], original: &str) -> String {
    let mut out = String::with_capacity(original.len());
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line.as_ref());
    }
    if original.ends_with('\n') && !lines.is_empty() {
        out.push('\n');
    }
    out
}

/// True for empty or whitespace-only lines.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
