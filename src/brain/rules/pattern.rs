//! Shared placeholder and pattern machinery used by the char-generic and word-generic rule
//! families (§4.5, §4.6 of the specification).
//!
//! The original system encodes a placeholder as a string sentinel `Ð<NNN>Ð` so that it can
//! live inside an otherwise plain-text pattern. Here a placeholder is a first-class value
//! (`Identifier`, carried inside [`CharToken::Id`] / [`WordToken::Id`]) rather than a magic
//! character sequence, which removes any risk of a teacher-supplied character colliding with
//! the sentinel. [`Identifier::render`] still produces the `Ð<NNN>Ð` text form, used only when
//! formatting a pattern for logs or test fixtures.

use std::fmt;

use itertools::Itertools;

/// A placeholder identity within a pattern. Two placeholders with the same id refer to the
/// same bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(pub u16);

impl Identifier {
    /// Renders the placeholder in its `Ð<NNN>Ð` textual form.
    #[must_use]
    pub fn render(self) -> String {
        format!("Ð{:03}Ð", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// One token of a char-generic pattern word: either a literal character or a placeholder
/// standing for exactly one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharToken {
    /// A character that must match exactly.
    Literal(char),
    /// A placeholder bound to exactly one character.
    Id(Identifier),
}

/// A pattern word is a sequence of tokens; an all-[`CharToken::Literal`] word is a constant
/// word, anything containing an [`CharToken::Id`] is a variable word.
pub type CharWord = Vec<CharToken>;

/// Renders a char-generic word back to its textual form, substituting bound characters for
/// identifiers when `bindings` provides one.
#[must_use]
pub fn render_char_word(word: &[CharToken], bindings: Option<&[(Identifier, char)]>) -> String {
    word.iter()
        .map(|tok| match tok {
            CharToken::Literal(c) => c.to_string(),
            CharToken::Id(id) => bindings
                .and_then(|b| b.iter().find(|(i, _)| *i == *id))
                .map_or_else(|| id.render(), |(_, c)| c.to_string()),
        })
        .collect()
}

/// Collects the distinct identifiers occurring in a char-generic word, in first-seen order.
#[must_use]
pub fn char_word_identifiers(word: &[CharToken]) -> Vec<Identifier> {
    word.iter()
        .filter_map(|tok| match tok {
            CharToken::Id(id) => Some(*id),
            CharToken::Literal(_) => None,
        })
        .unique()
        .collect()
}

/// One token of a word-generic pattern: a literal whitespace-delimited word, a placeholder
/// standing for exactly one whitespace-delimited word, or a compound of several placeholders
/// concatenated with no separator (`FindSubWords`, §4.6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordToken {
    /// A word that must match exactly.
    Literal(String),
    /// A placeholder bound to exactly one word.
    Id(Identifier),
    /// An output word decomposed into a run of input words concatenated with no separator.
    Compound(Vec<Identifier>),
}

/// Collects the distinct identifiers occurring in a word-generic pattern, in first-seen order.
#[must_use]
pub fn word_pattern_identifiers(pattern: &[WordToken]) -> Vec<Identifier> {
    pattern
        .iter()
        .flat_map(|tok| match tok {
            WordToken::Id(id) => vec![*id],
            WordToken::Compound(ids) => ids.clone(),
            WordToken::Literal(_) => Vec::new(),
        })
        .unique()
        .collect()
}

/// Splits a string on whitespace, discarding empty runs — the word-splitting rule shared by
/// every rule family's induction step (§4.5, §4.6).
#[must_use]
pub fn split_words(s: &str) -> Vec<&str> {
    s.split_whitespace().collect()
}

/// Strips one trailing occurrence of `end` and any trailing whitespace before it, as the
/// first step of `AbstractGenericRule` (§4.5).
#[must_use]
pub fn strip_trailing(s: &str, end: &str) -> String {
    let s = s.strip_suffix(end).unwrap_or(s);
    s.trim_end().to_string()
}

/// The per-word variability vector between two aligned witnesses: `true` marks a word that
/// differs between `a` and `b`, `false` marks a word that is identical.
///
/// Returns `None` if the word counts differ (the two inputs are not aligned at the word
/// level, so no char-generic/word-generic rule can explain both at once).
#[must_use]
pub fn variability_vector(a: &[&str], b: &[&str]) -> Option<Vec<bool>> {
    if a.len() != b.len() {
        return None;
    }
    Some(a.iter().zip(b).map(|(x, y)| x != y).collect())
}

/// A candidate is rejected when every word is constant — there is nothing to generalize over.
#[must_use]
pub fn all_constant(vector: &[bool]) -> bool {
    vector.iter().all(|&v| !v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_renders_three_digit_form() {
        assert_eq!(Identifier(7).render(), "Ð007Ð");
        assert_eq!(Identifier(123).render(), "Ð123Ð");
    }

    #[test]
    fn variability_vector_marks_differing_words() {
        let a = split_words("CONSTANT xyz");
        let b = split_words("CONSTANT abc");
        let v = variability_vector(&a, &b).unwrap();
        assert_eq!(v, vec![false, true]);
        assert!(!all_constant(&v));
    }

    #[test]
    fn variability_vector_rejects_mismatched_word_counts() {
        let a = split_words("a b");
        let b = split_words("a b c");
        assert!(variability_vector(&a, &b).is_none());
    }

    #[test]
    fn strip_trailing_removes_end_and_space() {
        assert_eq!(strip_trailing("hello world .", "."), "hello world");
        assert_eq!(strip_trailing("hello world", "."), "hello world");
    }

    #[test]
    fn render_char_word_substitutes_bindings() {
        let word = vec![
            CharToken::Id(Identifier(1)),
            CharToken::Literal('-'),
            CharToken::Id(Identifier(2)),
        ];
        assert_eq!(render_char_word(&word, None), "Ð001Ð-Ð002Ð");
        let bound = [(Identifier(1), 'x'), (Identifier(2), 'y')];
        assert_eq!(render_char_word(&word, Some(&bound)), "x-y");
    }
}
