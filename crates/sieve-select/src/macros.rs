//! Named pattern fragments and their expansion.
//!
//! A macro is a regular-expression fragment that may mention other macros
//! with a `#{name}` placeholder. Expansion replaces each placeholder with the
//! referenced macro's own expansion, so the lexical classes of
//! [CSS 2.1 § 4.1.1 Tokenization](https://www.w3.org/TR/CSS21/syndata.html#tokenization)
//! (`ident`, `nmchar`, `escape`, ...) can be written the way the grammar
//! writes them.

use std::collections::{BTreeMap, HashMap};

use crate::error::SelectorError;

/// Built-in lexical macros, written for the `regex` crate's syntax.
///
/// Every group is non-capturing so that the only capture groups in the
/// compiled scanner are the per-rule groups.
const STANDARD_MACROS: &[(&str, &str)] = &[
    ("nl", r"\n|\r\n|\r|\f"),
    ("w", r"[ \t\r\n\f]*"),
    ("nonascii", r"[^\x00-\x7F]"),
    ("num", r"-?(?:[0-9]+|[0-9]*\.[0-9]+)"),
    ("unicode", r"\\[0-9A-Fa-f]{1,6}(?:\r\n|[ \n\r\t\f])?"),
    ("escape", r"#{unicode}|\\[^\n\r\f0-9A-Fa-f]"),
    ("nmchar", r"[_A-Za-z0-9-]|#{nonascii}|#{escape}"),
    ("nmstart", r"[_A-Za-z]|#{nonascii}|#{escape}"),
    ("ident", r"[-@]?(?:#{nmstart})(?:#{nmchar})*"),
    ("name", r"(?:#{nmchar})+"),
    ("string1", r#""(?:[^\n\r\f"]|\\#{nl}|#{nonascii}|#{escape})*""#),
    ("string2", r"'(?:[^\n\r\f']|\\#{nl}|#{nonascii}|#{escape})*'"),
    ("string", r"#{string1}|#{string2}"),
];

/// A validated set of named pattern fragments.
///
/// Construction guarantees that every `#{name}` reference resolves and that
/// the reference graph is acyclic, so [`MacroTable::expand`] succeeds for
/// fragments that only mention known names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroTable {
    definitions: BTreeMap<String, String>,
}

impl MacroTable {
    /// Build a table from `(name, fragment)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::UndefinedMacro`] when a fragment references a
    /// name missing from the table and [`SelectorError::CyclicMacro`] when
    /// references form a cycle.
    pub fn new<I, K, V>(entries: I) -> Result<Self, SelectorError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = Self {
            definitions: entries
                .into_iter()
                .map(|(name, fragment)| (name.into(), fragment.into()))
                .collect(),
        };
        table.check_references()?;
        Ok(table)
    }

    /// The CSS lexical macros used by the standard selector rules.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            definitions: STANDARD_MACROS
                .iter()
                .map(|&(name, fragment)| (name.to_string(), fragment.to_string()))
                .collect(),
        }
    }

    /// Look up a macro's (unexpanded) definition.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.definitions.get(name).map(String::as_str)
    }

    /// Iterate over `(name, fragment)` pairs in name order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.definitions
            .iter()
            .map(|(name, fragment)| (name.as_str(), fragment.as_str()))
    }

    /// Number of macros.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the table has no macros.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Expand every `#{name}` reference in `fragment`.
    ///
    /// References are resolved left to right, each one replaced by its own
    /// fully expanded definition. Only the text of `fragment` and of the
    /// definitions is scanned, never the joined output, so a substitution
    /// that happens to abut text forming `#{...}` leaves that text literal.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::UndefinedMacro`] if `fragment` references a
    /// name that is not in the table and [`SelectorError::CyclicMacro`] if a
    /// definition refers back to a macro that is still being expanded.
    pub fn expand(&self, fragment: &str) -> Result<String, SelectorError> {
        self.expand_within(fragment, &mut Vec::new())
    }

    fn expand_within<'a>(
        &'a self,
        fragment: &str,
        active: &mut Vec<&'a str>,
    ) -> Result<String, SelectorError> {
        let mut expanded = String::with_capacity(fragment.len());
        let mut rest = fragment;
        while let Some((before, name, after)) = split_reference(rest) {
            expanded.push_str(before);
            let (key, definition) = self.definitions.get_key_value(name).ok_or_else(|| {
                SelectorError::UndefinedMacro {
                    name: name.to_string(),
                }
            })?;
            if active.contains(&key.as_str()) {
                return Err(SelectorError::CyclicMacro {
                    name: name.to_string(),
                });
            }
            active.push(key);
            expanded.push_str(&self.expand_within(definition, active)?);
            let _ = active.pop();
            rest = after;
        }
        expanded.push_str(rest);
        Ok(expanded)
    }

    /// Expand every definition against the table itself, producing a table of
    /// fully literal fragments.
    ///
    /// # Errors
    ///
    /// Propagates [`MacroTable::expand`] failures; a table built through
    /// [`MacroTable::new`] or [`MacroTable::standard`] expands cleanly.
    pub fn expand_all(&self) -> Result<Self, SelectorError> {
        let definitions = self
            .definitions
            .iter()
            .map(|(name, fragment)| Ok((name.clone(), self.expand(fragment)?)))
            .collect::<Result<_, SelectorError>>()?;
        Ok(Self { definitions })
    }

    /// Depth-first walk over the reference graph.
    fn check_references(&self) -> Result<(), SelectorError> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            Visiting,
            Done,
        }

        fn visit<'a>(
            table: &'a MacroTable,
            name: &'a str,
            marks: &mut HashMap<&'a str, Mark>,
        ) -> Result<(), SelectorError> {
            match marks.get(name) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::Visiting) => {
                    return Err(SelectorError::CyclicMacro {
                        name: name.to_string(),
                    });
                }
                None => {}
            }
            let fragment = table.get(name).ok_or_else(|| SelectorError::UndefinedMacro {
                name: name.to_string(),
            })?;
            let _ = marks.insert(name, Mark::Visiting);
            for reference in references(fragment) {
                visit(table, reference, marks)?;
            }
            let _ = marks.insert(name, Mark::Done);
            Ok(())
        }

        let mut marks = HashMap::new();
        for name in self.definitions.keys() {
            visit(self, name, &mut marks)?;
        }
        Ok(())
    }
}

impl Default for MacroTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Split `text` around its first reference into the text before it, the
/// referenced name and the text after it.
fn split_reference(text: &str) -> Option<(&str, &str, &str)> {
    let mut from = 0;
    loop {
        let start = from + text[from..].find("#{")?;
        let open = start + 2;
        let end = open + text[open..].find('}')?;
        if end > open {
            return Some((&text[..start], &text[open..end], &text[end + 1..]));
        }
        from = end + 1;
    }
}

/// Iterate over the names referenced by `fragment`, left to right.
///
/// A reference is `#{` followed by one or more characters other than `}` and
/// a closing `}`. `#{}` and an unterminated `#{` are literal text.
pub(crate) const fn references(fragment: &str) -> References<'_> {
    References { rest: fragment }
}

pub(crate) struct References<'a> {
    rest: &'a str,
}

impl<'a> Iterator for References<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let (_, name, after) = split_reference(self.rest)?;
        self.rest = after;
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_references_skip_empty_and_unterminated() {
        let found: Vec<&str> = references("a#{x}b#{}c##{y}#{z").collect();
        assert_eq!(found, vec!["x", "y"]);
    }

    #[test]
    fn test_expand_nested() {
        let table = MacroTable::new([("a", "A#{b}"), ("b", "[#{c}]"), ("c", "C")]).unwrap();
        assert_eq!(table.expand("#{a}|#{a}").unwrap(), "A[C]|A[C]");
    }

    #[test]
    fn test_expand_keeps_literal_hash() {
        // "##{id}" is a literal '#' followed by a reference
        let table = MacroTable::new([("id", "x")]).unwrap();
        assert_eq!(table.expand("##{id}").unwrap(), "#x");
    }

    #[test]
    fn test_expand_does_not_rescan_joined_text() {
        // "#" followed by "{b}" spells a reference only after substitution
        let table = MacroTable::new([("a", "#"), ("b", "#{a}{b}")]).unwrap();
        assert_eq!(table.expand("#{b}").unwrap(), "#{b}");
        assert_eq!(table.expand_all().unwrap().get("b"), Some("#{b}"));
    }

    #[test]
    fn test_expand_reports_cycle_in_unchecked_table() {
        let table = MacroTable {
            definitions: [("loop".to_string(), "x#{loop}".to_string())].into(),
        };
        assert_eq!(
            table.expand("#{loop}"),
            Err(SelectorError::CyclicMacro {
                name: "loop".to_string()
            })
        );
    }

    #[test]
    fn test_expand_undefined_reference() {
        let table = MacroTable::new([("a", "A")]).unwrap();
        assert_eq!(
            table.expand("#{missing}"),
            Err(SelectorError::UndefinedMacro {
                name: "missing".to_string()
            })
        );
    }

    #[test]
    fn test_new_rejects_undefined_reference() {
        let err = MacroTable::new([("a", "#{b}")]).unwrap_err();
        assert_eq!(
            err,
            SelectorError::UndefinedMacro {
                name: "b".to_string()
            }
        );
    }

    #[test]
    fn test_new_rejects_cycle() {
        let err = MacroTable::new([("a", "#{b}"), ("b", "x#{c}"), ("c", "#{a}")]).unwrap_err();
        assert!(matches!(err, SelectorError::CyclicMacro { .. }));

        let err = MacroTable::new([("self", "(#{self})")]).unwrap_err();
        assert_eq!(
            err,
            SelectorError::CyclicMacro {
                name: "self".to_string()
            }
        );
    }

    #[test]
    fn test_standard_table_is_acyclic_and_expands_fully() {
        let table = MacroTable::standard();
        assert!(table.check_references().is_ok());

        let literal = table.expand_all().unwrap();
        assert_eq!(literal.len(), table.len());
        for (name, fragment) in literal.entries() {
            assert_eq!(references(fragment).next(), None, "macro {name} still has references");
        }
    }

    #[test]
    fn test_standard_ident_is_a_valid_regex() {
        let ident = MacroTable::standard().expand("^(?:#{ident})$").unwrap();
        let re = regex::Regex::new(&ident).unwrap();
        for good in ["div", "nav-item", "_x1", "-moz-box", "@media", "caf\u{e9}", r"a\:b"] {
            assert!(re.is_match(good), "{good} should be an ident");
        }
        for bad in ["1abc", "", "a b", "#id", ".cls"] {
            assert!(!re.is_match(bad), "{bad} should not be an ident");
        }
    }
}
