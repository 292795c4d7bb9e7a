//! Selector rules and the compiled scanner.
//!
//! Six rules describe the selector fragments the engine understands. Each
//! rule is a macro-bearing pattern; compiling a [`SelectorConfig`] expands
//! the macros, wraps every rule in a named capture group and joins them into
//! one alternation, the [`Scanner`].

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::error::SelectorError;
use crate::macros::MacroTable;

/// The kind of selector fragment a token was recognised as.
///
/// Variants are declared in resolution priority order: a compound kind comes
/// before the simple kind it extends, so `div#main` is a
/// [`RuleKind::NameAndId`] rather than an element followed by an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
pub enum RuleKind {
    /// `tag#id`
    #[strum(serialize = "name and id")]
    NameAndId,
    /// `#id`
    #[strum(serialize = "id")]
    Id,
    /// `tag.class`
    #[strum(serialize = "name and class")]
    NameAndClass,
    /// `.class`
    #[strum(serialize = "class")]
    Class,
    /// `tag`
    #[strum(serialize = "element")]
    Element,
    /// `:name`, recognised but never matched.
    #[strum(serialize = "pseudo class")]
    PseudoClass,
}

impl RuleKind {
    /// Every kind, compound before simple.
    pub const PRIORITY: [Self; 6] = [
        Self::NameAndId,
        Self::Id,
        Self::NameAndClass,
        Self::Class,
        Self::Element,
        Self::PseudoClass,
    ];

    /// Name of the capture group that carries this kind in the scanner.
    #[must_use]
    pub const fn group_name(self) -> &'static str {
        match self {
            Self::NameAndId => "name_and_id",
            Self::Id => "id",
            Self::NameAndClass => "name_and_class",
            Self::Class => "class",
            Self::Element => "element",
            Self::PseudoClass => "pseudo_class",
        }
    }
}

/// Pattern for each rule kind, before macro expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: BTreeMap<RuleKind, String>,
}

impl RuleTable {
    /// Build a table from `(kind, pattern)` pairs. A later pair for the same
    /// kind replaces an earlier one; kinds left out are never tokenized.
    pub fn new<I, P>(rules: I) -> Self
    where
        I: IntoIterator<Item = (RuleKind, P)>,
        P: Into<String>,
    {
        Self {
            rules: rules
                .into_iter()
                .map(|(kind, pattern)| (kind, pattern.into()))
                .collect(),
        }
    }

    /// The six selector rules of the supported grammar.
    #[must_use]
    pub fn standard() -> Self {
        Self::new([
            (RuleKind::NameAndId, "#{ident}##{ident}"),
            (RuleKind::Id, "##{ident}"),
            (RuleKind::Class, r"\.#{ident}"),
            (RuleKind::NameAndClass, r"#{ident}\.#{ident}"),
            (RuleKind::Element, "#{ident}"),
            (RuleKind::PseudoClass, ":#{ident}"),
        ])
    }

    /// The unexpanded pattern for `kind`, if the table has one.
    #[must_use]
    pub fn get(&self, kind: RuleKind) -> Option<&str> {
        self.rules.get(&kind).map(String::as_str)
    }

    /// Iterate over `(kind, pattern)` pairs in priority order.
    pub fn entries(&self) -> impl Iterator<Item = (RuleKind, &str)> {
        self.rules
            .iter()
            .map(|(&kind, pattern)| (kind, pattern.as_str()))
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Everything a [`Scanner`] is compiled from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Lexical macros referenced by the rules.
    pub macros: MacroTable,
    /// The selector rules.
    pub rules: RuleTable,
}

impl SelectorConfig {
    /// The built-in macros and rules.
    #[must_use]
    pub fn standard() -> Self {
        Self::default()
    }
}

/// The compiled alternation of every rule in a [`SelectorConfig`].
///
/// Each alternative is a named group (see [`RuleKind::group_name`]), so the
/// kind of a match is read off the group that participated rather than off
/// a numeric group index.
#[derive(Debug, Clone)]
pub struct Scanner {
    regex: Regex,
    kinds: Vec<RuleKind>,
}

impl Scanner {
    /// Compile `config` into a scanner.
    ///
    /// Macros are first expanded against themselves, then every rule is
    /// expanded against the literal macros. Alternatives are emitted in
    /// [`RuleKind::PRIORITY`] order, which the regex engine's leftmost-first
    /// semantics turn into "compound rule wins over its simple prefix".
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::UndefinedMacro`] if a rule references an
    /// unknown macro, [`SelectorError::InvalidRule`] if an expanded rule is
    /// not a valid pattern, and [`SelectorError::InvalidScanner`] if the
    /// joined alternation is rejected.
    pub fn compile(config: &SelectorConfig) -> Result<Self, SelectorError> {
        let literal = config.macros.expand_all()?;

        let mut pattern = String::new();
        let mut kinds = Vec::new();
        for kind in RuleKind::iter() {
            let Some(rule) = config.rules.get(kind) else {
                continue;
            };
            let expanded = literal.expand(rule)?;
            if let Err(e) = Regex::new(&expanded) {
                return Err(SelectorError::InvalidRule {
                    kind,
                    message: e.to_string(),
                });
            }
            if !pattern.is_empty() {
                pattern.push('|');
            }
            let _ = write!(pattern, "(?P<{}>{expanded})", kind.group_name());
            kinds.push(kind);
        }

        let regex =
            Regex::new(&pattern).map_err(|e| SelectorError::InvalidScanner(e.to_string()))?;
        Ok(Self { regex, kinds })
    }

    /// The scanner for [`SelectorConfig::standard`], compiled on first use
    /// and shared for the life of the process.
    ///
    /// # Errors
    ///
    /// Returns the compilation error if the built-in tables fail to compile.
    pub fn standard() -> Result<&'static Self, SelectorError> {
        static STANDARD: OnceLock<Result<Scanner, SelectorError>> = OnceLock::new();
        STANDARD
            .get_or_init(|| Self::compile(&SelectorConfig::standard()))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// The full compiled pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Kinds present in this scanner, in priority order.
    #[must_use]
    pub fn kinds(&self) -> &[RuleKind] {
        &self.kinds
    }

    pub(crate) const fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Which rule produced `captures`, checking compound kinds before the
    /// simple kinds they extend.
    pub(crate) fn classify(&self, captures: &Captures<'_>) -> Option<RuleKind> {
        self.kinds
            .iter()
            .copied()
            .find(|kind| captures.name(kind.group_name()).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_matches_declaration_order() {
        assert_eq!(RuleKind::iter().collect::<Vec<_>>(), RuleKind::PRIORITY);
    }

    #[test]
    fn test_rule_kind_display_uses_rule_names() {
        assert_eq!(RuleKind::NameAndId.to_string(), "name and id");
        assert_eq!(RuleKind::Element.to_string(), "element");
        assert_eq!(RuleKind::PseudoClass.to_string(), "pseudo class");
    }

    #[test]
    fn test_standard_scanner_has_every_kind() {
        let scanner = Scanner::standard().unwrap();
        assert_eq!(scanner.kinds(), RuleKind::PRIORITY);
        for kind in RuleKind::PRIORITY {
            assert!(scanner.pattern().contains(&format!("(?P<{}>", kind.group_name())));
        }
        assert!(!scanner.pattern().contains("#{"));
    }

    #[test]
    fn test_standard_scanner_is_shared() {
        let a = Scanner::standard().unwrap();
        let b = Scanner::standard().unwrap();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_compile_reports_undefined_macro_in_rule() {
        let config = SelectorConfig {
            macros: MacroTable::standard(),
            rules: RuleTable::new([(RuleKind::Id, "##{identifier}")]),
        };
        assert_eq!(
            Scanner::compile(&config).unwrap_err(),
            SelectorError::UndefinedMacro {
                name: "identifier".to_string()
            }
        );
    }

    #[test]
    fn test_compile_reports_invalid_rule() {
        let config = SelectorConfig {
            macros: MacroTable::standard(),
            rules: RuleTable::new([(RuleKind::Class, r"\.(#{ident}")]),
        };
        assert!(matches!(
            Scanner::compile(&config),
            Err(SelectorError::InvalidRule {
                kind: RuleKind::Class,
                ..
            })
        ));
    }

    #[test]
    fn test_partial_rule_table_only_scans_its_kinds() {
        let config = SelectorConfig {
            macros: MacroTable::standard(),
            rules: RuleTable::new([(RuleKind::Id, "##{ident}")]),
        };
        let scanner = Scanner::compile(&config).unwrap();
        assert_eq!(scanner.kinds(), &[RuleKind::Id]);
        assert!(scanner.regex().is_match("#main"));
        assert!(!scanner.regex().is_match(".main"));
    }
}
