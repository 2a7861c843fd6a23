//! Function-boundary tracking without a C++ grammar.
//!
//! Each line is classified as outside any function, part of a qualified
//! function signature, or inside a function body. The state is an immutable
//! [`ScanState`] threaded from line to line: `classify(state, line)` returns the
//! state for the next line together with the class of the current one.
//!
//! Known imprecision: nested type declarations, lambdas and brace initializers
//! outside functions are not understood, and a return type written on its own
//! line above the qualified name is not recognized as part of the signature.

use crate::split::{self, Split};
use regex::Regex;
use std::sync::LazyLock;

/// `Scope::name(`: a qualification marker followed by an opening parenthesis.
static RE_QUALIFIED_CALL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"::[^(]*\(").unwrap());
static RE_PREPROCESSOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ \t]*#").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineClass {
    #[default]
    Outside,
    Signature,
    Body,
}

/// Per-file scan state. `mode` is the class the next line starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanState {
    pub mode: LineClass,
    pub brace_depth: usize,
    pub body_started: bool,
}

/// Swappable line classifier.
pub trait Classifier {
    fn classify(&self, state: ScanState, line: &str) -> (ScanState, LineClass);
}

/// Brace-depth heuristic seeded by qualified signatures.
pub struct BraceTracker;

impl BraceTracker {
    /// A qualified signature: `::` then `(` in the code part, not a comment
    /// and not a preprocessor directive.
    pub fn is_signature(line: &str) -> bool {
        if RE_PREPROCESSOR.is_match(line) {
            return false;
        }
        match split::split_comment(line) {
            Split::CommentOnly => false,
            Split::NoComment => RE_QUALIFIED_CALL.is_match(line),
            Split::Trailing(code) => RE_QUALIFIED_CALL.is_match(code),
        }
    }
}

impl ScanState {
    /// Apply the braces of `code`. Underflow clamps to zero.
    fn count_braces(self, code: &str) -> (ScanState, LineClass) {
        let opens = code.matches('{').count();
        let closes = code.matches('}').count();
        let raised = self.brace_depth + opens;
        if closes > raised {
            log::debug!("brace depth underflow ({raised} open, {closes} close); clamping to 0");
        }
        let brace_depth = raised.saturating_sub(closes);
        let body_started = self.body_started || opens > 0;

        let line_class = if body_started {
            LineClass::Body
        } else {
            LineClass::Signature
        };
        let next = if body_started && brace_depth == 0 {
            ScanState::default()
        } else {
            ScanState {
                mode: line_class,
                brace_depth,
                body_started,
            }
        };
        (next, line_class)
    }
}

impl Classifier for BraceTracker {
    fn classify(&self, state: ScanState, line: &str) -> (ScanState, LineClass) {
        let code = split::code_part(line);

        // Inside a body only an unindented signature restarts tracking;
        // indented qualified calls such as `std::to_string(` are ordinary code.
        let starts_signature = match state.mode {
            LineClass::Body => !line.starts_with(char::is_whitespace) && Self::is_signature(line),
            LineClass::Outside | LineClass::Signature => Self::is_signature(line),
        };
        if starts_signature {
            let (mut next, _) = ScanState {
                mode: LineClass::Signature,
                brace_depth: 0,
                body_started: false,
            }
            .count_braces(code);
            // A prototype ending in `;` has no body.
            if !next.body_started && code.trim_end().ends_with(';') {
                next = ScanState::default();
            }
            return (next, LineClass::Signature);
        }

        match state.mode {
            LineClass::Outside => (state, LineClass::Outside),
            LineClass::Signature | LineClass::Body => state.count_braces(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LineClass::*;

    fn classes(src: &str) -> Vec<LineClass> {
        let mut state = ScanState::default();
        src.lines()
            .map(|line| {
                let (next, class) = BraceTracker.classify(state, line);
                state = next;
                class
            })
            .collect()
    }

    #[test]
    fn detects_signature() {
        assert!(BraceTracker::is_signature("void IRGenerator::visit(LetStmt *node) {"));
        assert!(BraceTracker::is_signature("IRGenerator::IRGenerator(BuiltinTypes &t)"));
        assert!(!BraceTracker::is_signature("// void IRGenerator::visit(LetStmt *node) {"));
        assert!(!BraceTracker::is_signature("#include <foo::bar(>"));
        assert!(!BraceTracker::is_signature("int main(int argc) {"));
        assert!(!BraceTracker::is_signature("namespace ir {"));
    }

    #[test]
    fn single_line_signature_with_body() {
        let src = "void A::f() {\n    x();\n}\nint y;\n";
        assert_eq!(classes(src), vec![Signature, Body, Body, Outside]);
    }

    #[test]
    fn brace_on_next_line() {
        let src = "void A::f(int a,\n          int b)\n{\n    x();\n}\n";
        assert_eq!(classes(src), vec![Signature, Signature, Body, Body, Body]);
    }

    #[test]
    fn nested_blocks() {
        let src = "void A::f() {\n    if (a) {\n        b();\n    }\n    c();\n}\n// after\n";
        assert_eq!(
            classes(src),
            vec![Signature, Body, Body, Body, Body, Body, Outside]
        );
    }

    #[test]
    fn qualified_calls_inside_body_do_not_reset() {
        let src = "void A::f() {\n    std::string s = std::to_string(1);\n    if (s.empty()) {\n    }\n    g();\n}\n";
        assert_eq!(
            classes(src),
            vec![Signature, Body, Body, Body, Body, Body]
        );
    }

    #[test]
    fn empty_body_on_signature_line() {
        let src = "void A::f() {}\n// next\n";
        assert_eq!(classes(src), vec![Signature, Outside]);
    }

    #[test]
    fn constructor_initializer_list() {
        let src = "A::A(int x)\n    : x_(x) {}\nint y;\n";
        assert_eq!(classes(src), vec![Signature, Body, Outside]);
    }

    #[test]
    fn prototype_is_not_tracked() {
        let src = "void A::f(int x);\nint y = 0;\n";
        assert_eq!(classes(src), vec![Signature, Outside]);
    }

    #[test]
    fn braces_in_comments_are_ignored() {
        let src = "void A::f() {\n    x(); // }\n    y();\n}\n";
        assert_eq!(classes(src), vec![Signature, Body, Body, Body]);
    }

    #[test]
    fn underflow_clamps_to_zero() {
        let (next, class) = BraceTracker.classify(
            ScanState {
                mode: Body,
                brace_depth: 1,
                body_started: true,
            },
            "}}}",
        );
        assert_eq!(class, Body);
        assert_eq!(next, ScanState::default());
    }

    #[test]
    fn stray_close_before_body_keeps_signature() {
        let src = "void A::f()\n}\n{\n}\n";
        assert_eq!(classes(src), vec![Signature, Signature, Body, Body]);
    }

    #[test]
    fn unindented_signature_recovers_from_literal_brace() {
        let src = "void A::f() {\n    emit(\"define void @f() {\");\n}\n\nvoid A::g() {\n    x();\n}\n// after g\n";
        assert_eq!(
            classes(src),
            vec![Signature, Body, Body, Body, Signature, Body, Body, Outside]
        );
    }

    #[test]
    fn namespace_braces_stay_outside() {
        let src = "namespace ir {\nvoid A::f() {\n}\n}\n";
        assert_eq!(classes(src), vec![Outside, Signature, Body, Outside]);
    }
}
