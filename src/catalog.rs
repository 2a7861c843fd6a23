//! Annotation catalog: ordered `pattern → canonical comment` rules.
//!
//! The catalog is configuration data loaded once per run from TOML. Rule order
//! is the declared precedence: when two rules match the same definition, the
//! rule declared first wins.

use crate::error::CatalogError;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Catalog shipped with the binary, covering the IR generator sources.
const BUILTIN_CATALOG: &str = include_str!("../catalog/ir_generator.toml");

/// One `pattern → comment` pair.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AnnotationRule {
    /// Text that must follow `Scope::` in the definition, e.g. `visit(LiteralExpr`.
    pub pattern: String,
    /// Full comment line to insert, marker included.
    pub comment: String,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    scope: Option<String>,
    #[serde(default = "default_return_types")]
    return_types: Vec<String>,
    #[serde(default, rename = "rule")]
    rules: Vec<AnnotationRule>,
}

fn default_return_types() -> Vec<String> {
    ["std::string", "void", "size_t", "bool", "int"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Immutable, validated rule set.
#[derive(Debug, Clone)]
pub struct Catalog {
    scope: Option<String>,
    return_types: Vec<String>,
    rules: Vec<AnnotationRule>,
    /// One definition pattern per rule, in rule order.
    definitions: Vec<Regex>,
    decl_start: Regex,
}

impl Catalog {
    /// Parse and validate a catalog from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(text)?;
        Self::new(file.scope, file.return_types, file.rules)
    }

    /// Read a catalog file from disk.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid catalog {}", path.display()))
    }

    /// The embedded IR generator catalog.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml(BUILTIN_CATALOG)
    }

    pub fn new(
        scope: Option<String>,
        return_types: Vec<String>,
        rules: Vec<AnnotationRule>,
    ) -> Result<Self, CatalogError> {
        if return_types.is_empty() {
            return Err(CatalogError::NoReturnTypes);
        }
        let mut seen = HashSet::new();
        for (index, rule) in rules.iter().enumerate() {
            if rule.pattern.is_empty() {
                return Err(CatalogError::EmptyPattern { index });
            }
            if !rule.comment.trim_start().starts_with("//") {
                return Err(CatalogError::NotAComment {
                    pattern: rule.pattern.clone(),
                    comment: rule.comment.clone(),
                });
            }
            if !seen.insert(rule.pattern.as_str()) {
                log::warn!(
                    "catalog declares pattern `{}` more than once; the first declaration wins",
                    rule.pattern
                );
            }
        }

        let scope = scope.filter(|s| !s.is_empty());
        let types = return_type_alternation(&return_types);
        let decl_start = compile(&format!(r"^\s*(?:{types})\s"))?;
        let definitions = rules
            .iter()
            .map(|rule| compile(&definition_pattern(&types, scope.as_deref(), &rule.pattern)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            scope,
            return_types,
            rules,
            definitions,
            decl_start,
        })
    }

    pub fn rules(&self) -> &[AnnotationRule] {
        &self.rules
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn return_types(&self) -> &[String] {
        &self.return_types
    }

    /// True if `line` opens a declaration with one of the catalog's return types.
    pub fn is_declaration_start(&self, line: &str) -> bool {
        self.decl_start.is_match(line)
    }

    /// Rules paired with their compiled definition patterns, in catalog order.
    pub fn definitions(&self) -> impl Iterator<Item = (&AnnotationRule, &Regex)> {
        self.rules.iter().zip(&self.definitions)
    }
}

/// Pattern matching a definition (not a call, not a bodiless declaration) of
/// `Scope::pattern`. The parameter list may span several lines.
fn definition_pattern(types: &str, scope: Option<&str>, pattern: &str) -> String {
    let scope = scope.map_or_else(|| r"\w+".to_string(), regex::escape);
    format!(
        r"(?m)^(?:{types})\s+{scope}::{}[^{{;]*\{{",
        regex::escape(pattern)
    )
}

/// Compile a pattern assembled from fixed fragments and escaped user text.
/// Only the size limit can reject it.
fn compile(pattern: &str) -> Result<Regex, CatalogError> {
    Ok(Regex::new(pattern)?)
}

fn return_type_alternation(types: &[String]) -> String {
    types
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str, comment: &str) -> AnnotationRule {
        AnnotationRule {
            pattern: pattern.to_string(),
            comment: comment.to_string(),
        }
    }

    #[test]
    fn builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.scope(), Some("IRGenerator"));
        assert_eq!(catalog.rules().len(), 37);
        assert_eq!(catalog.rules()[0].pattern, "visit(LiteralExpr");
    }

    #[test]
    fn parses_rules_in_order() {
        let text = r#"
scope = "Gen"
return_types = ["void"]

[[rule]]
pattern = "b("
comment = "// B"

[[rule]]
pattern = "a("
comment = "// A"
"#;
        let catalog = Catalog::from_toml(text).unwrap();
        let patterns: Vec<_> = catalog.rules().iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["b(", "a("]);
    }

    #[test]
    fn default_return_types_when_omitted() {
        let catalog = Catalog::from_toml("[[rule]]\npattern = \"x(\"\ncomment = \"// x\"\n").unwrap();
        assert_eq!(catalog.return_types().len(), 5);
        assert_eq!(catalog.scope(), None);
    }

    #[test]
    fn rejects_comment_without_marker() {
        let err = Catalog::new(None, default_return_types(), vec![rule("x(", "not a comment")])
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotAComment { .. }), "Got: {err}");
    }

    #[test]
    fn rejects_empty_pattern() {
        let err = Catalog::new(None, default_return_types(), vec![rule("", "// x")]).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyPattern { index: 0 }));
    }

    #[test]
    fn rejects_empty_return_types() {
        let err = Catalog::new(None, vec![], vec![]).unwrap_err();
        assert!(matches!(err, CatalogError::NoReturnTypes));
    }

    #[test]
    fn rejects_bad_toml() {
        assert!(matches!(
            Catalog::from_toml("rule = ["),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn duplicate_patterns_are_allowed() {
        let catalog = Catalog::new(
            None,
            default_return_types(),
            vec![rule("x(", "// first"), rule("x(", "// second")],
        )
        .unwrap();
        assert_eq!(catalog.rules().len(), 2);
    }

    #[test]
    fn declaration_start() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.is_declaration_start("void IRGenerator::visit(LetStmt *node) {"));
        assert!(catalog.is_declaration_start("std::string IRGenerator::get_expr_result(Expr *e) {"));
        assert!(!catalog.is_declaration_start("voidish();"));
        assert!(!catalog.is_declaration_start("return 0;"));
    }

    #[test]
    fn definition_regex_rejects_calls_and_declarations() {
        let catalog = Catalog::builtin().unwrap();
        let (_, re) = catalog.definitions().next().unwrap();
        assert!(re.is_match("void IRGenerator::visit(LiteralExpr *node) {"));
        assert!(!re.is_match("void IRGenerator::visit(LiteralExpr *node);"));
        assert!(!re.is_match("    IRGenerator::visit(LiteralExpr *node) {"));
        assert!(!re.is_match("void Other::visit(LiteralExpr *node) {"));
    }

    #[test]
    fn definition_regex_any_scope() {
        let catalog = Catalog::new(None, vec!["int".into()], vec![rule("run(", "// r")]).unwrap();
        let (_, re) = catalog.definitions().next().unwrap();
        assert!(re.is_match("int Engine::run(int a,\n             int b) {"));
    }

    #[test]
    fn definitions_follow_rule_order() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.definitions().count(), catalog.rules().len());
        let (rule, re) = catalog.definitions().nth(1).unwrap();
        assert_eq!(rule, &catalog.rules()[1]);
        assert!(!re.is_match("void IRGenerator::visit(LiteralExpr *node) {"));
    }

    #[test]
    fn oversized_pattern_is_an_error() {
        let err = Catalog::new(None, vec!["void".into()], vec![rule(&"x".repeat(1 << 22), "// x")])
            .unwrap_err();
        assert!(matches!(err, CatalogError::Pattern(_)), "Got: {err}");
    }
}
