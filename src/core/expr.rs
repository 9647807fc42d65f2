// column expression grammar: `key`, `!key`, `fn(args)`, joined by a separator
use std::sync::LazyLock;

use regex::Regex;

use crate::core::error::ColumnError;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// Letters, digits and underscore, not starting with a digit.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Delimiters of a column selection element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSyntax {
    pub separator: char,
    pub exclusion_marker: char,
}

impl Default for ColumnSyntax {
    fn default() -> Self {
        Self { separator: ';', exclusion_marker: '!' }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubKey<'a> {
    /// Contains `(` or `)`; passed through untouched.
    Function(&'a str),
    /// `!name`, already validated.
    Exclude(&'a str),
    Plain(&'a str),
}

impl ColumnSyntax {
    /// Splits one selection element into trimmed, non-empty sub-keys.
    ///
    /// Separators nested inside parentheses do not split, so `fn(a,b)` stays whole
    /// even when the separator is `,`.
    pub fn split<'a>(&self, element: &'a str) -> Vec<&'a str> {
        let mut out = Vec::new();
        let mut depth: usize = 0;
        let mut start = 0;

        for (i, ch) in element.char_indices() {
            match ch {
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                c if c == self.separator && depth == 0 => {
                    out.push(&element[start..i]);
                    start = i + c.len_utf8();
                }
                _ => {}
            }
        }
        out.push(&element[start..]);

        out.into_iter().map(str::trim).filter(|s| !s.is_empty()).collect()
    }

    pub fn classify<'a>(&self, sub_key: &'a str) -> Result<SubKey<'a>, ColumnError> {
        if sub_key.contains('(') || sub_key.contains(')') {
            return Ok(SubKey::Function(sub_key));
        }

        match sub_key.strip_prefix(self.exclusion_marker) {
            Some("") => Err(ColumnError::EmptyExclusion { expression: sub_key.to_string() }),
            Some(name) if !is_identifier(name) => Err(ColumnError::InvalidExclusion { name: name.to_string() }),
            Some(name) => Ok(SubKey::Exclude(name)),
            None => Ok(SubKey::Plain(sub_key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_rule() {
        assert!(is_identifier("userName"));
        assert!(is_identifier("_id"));
        assert!(is_identifier("col_2"));
        assert!(!is_identifier("2col"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a b"));
    }

    #[test]
    fn split_trims_and_drops_empty_parts() {
        let s = ColumnSyntax::default();
        assert_eq!(s.split("id; name;;!pwd "), vec!["id", "name", "!pwd"]);
        assert_eq!(s.split(""), Vec::<&str>::new());
    }

    #[test]
    fn split_keeps_function_arguments_together() {
        let comma = ColumnSyntax { separator: ',', ..ColumnSyntax::default() };
        assert_eq!(comma.split("id,fn(x,y),!pwd"), vec!["id", "fn(x,y)", "!pwd"]);
        assert_eq!(ColumnSyntax::default().split("fn(x,y)"), vec!["fn(x,y)"]);
    }

    #[test]
    fn classify_sub_keys() {
        let s = ColumnSyntax::default();
        assert_eq!(s.classify("count(id)").unwrap(), SubKey::Function("count(id)"));
        assert_eq!(s.classify("!pwd").unwrap(), SubKey::Exclude("pwd"));
        assert_eq!(s.classify("name").unwrap(), SubKey::Plain("name"));
    }

    #[test]
    fn classify_rejects_bad_exclusions() {
        let s = ColumnSyntax::default();

        let err = s.classify("!").unwrap_err();
        assert!(matches!(err, ColumnError::EmptyExclusion { ref expression } if expression == "!"));
        assert!(err.is_invalid_argument());

        let err = s.classify("!1abc").unwrap_err();
        assert!(matches!(err, ColumnError::InvalidExclusion { ref name } if name == "1abc"));
        assert!(err.is_invalid_argument());
    }
}
