//! Char-generic-size rules (§4.8): a further generalization over an identifier-group's
//! *length*, induced from two char-generic rules (§4.5) that agree everywhere except one
//! variable word's placeholder count.

use super::char_generic::{CharGenericRule, PatternWord};
use super::pattern::{CharToken, Identifier};

/// A size-generic rule: like [`CharGenericRule`], but the variable word at `group_index` may
/// bind to a run of characters of *any* length, not just the length observed at induction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeGenericRule {
    /// The constant/variable words preceding and following the size-generic group, verbatim.
    pub template: CharGenericRule,
    /// Index into `template.input` of the word whose length generalizes.
    pub group_index: usize,
    /// How the group's characters are reproduced in the output, one entry per output word that
    /// references the group.
    pub output_mapping: Vec<SizeOutputWord>,
}

/// How a single output word is derived from a size-generic input group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeOutputWord {
    /// This output word does not depend on the group; render the template word as-is.
    Verbatim(PatternWord),
    /// This output word repeats the bound characters, one per identifier, in either the
    /// group's order or its reverse, joined by a constant separator (possibly empty) found
    /// between every pair of identifiers in both witnesses — `growLeft`/`growRight` with an
    /// `ending` literal interleaved, per §4.8's `"e+d+c+b+a"` worked case.
    Grown {
        /// `true` if the identifiers run in reverse group order.
        reversed: bool,
        /// The literal glued between every pair of characters; empty for plain concatenation.
        separator: String,
    },
}

/// Induces a size-generic rule from two char-generic rules that differ only in the length of
/// one variable word (and, correspondingly, of the output word(s) derived from it).
///
/// Per §4.8 this runs after every successful char-generic induction, against every
/// previously-known char-generic rule; a pair qualifies only when all non-group words agree.
#[must_use]
pub fn abstract_size_rule(a: &CharGenericRule, b: &CharGenericRule) -> Option<SizeGenericRule> {
    if a.input.len() != b.input.len() || a.output.len() != b.output.len() {
        return None;
    }

    let group_index = find_sole_differing_group(&a.input, &b.input)?;

    for (idx, (wa, wb)) in a.input.iter().zip(b.input.iter()).enumerate() {
        if idx != group_index && wa != wb {
            return None;
        }
    }

    let group_a = as_all_id_word(&a.input[group_index])?;
    let group_b = as_all_id_word(&b.input[group_index])?;
    if group_a.len() == group_b.len() {
        return None;
    }

    let mut output_mapping = Vec::with_capacity(a.output.len());
    for (wa, wb) in a.output.iter().zip(b.output.iter()) {
        match classify_output_word(wa, wb, &group_a, &group_b) {
            Some(classified) => output_mapping.push(classified),
            None => {
                if wa == wb {
                    output_mapping.push(SizeOutputWord::Verbatim(wa.clone()));
                } else {
                    return None;
                }
            }
        }
    }

    Some(SizeGenericRule {
        template: a.clone(),
        group_index,
        output_mapping,
    })
}

fn find_sole_differing_group(a: &[PatternWord], b: &[PatternWord]) -> Option<usize> {
    let mut differing = None;
    for (idx, (wa, wb)) in a.iter().zip(b.iter()).enumerate() {
        if wa != wb {
            if differing.is_some() {
                return None;
            }
            differing = Some(idx);
        }
    }
    differing
}

fn as_all_id_word(word: &PatternWord) -> Option<Vec<Identifier>> {
    match word {
        PatternWord::Variable(chars) => chars
            .iter()
            .map(|tok| match tok {
                CharToken::Id(id) => Some(*id),
                CharToken::Literal(_) => None,
            })
            .collect(),
        PatternWord::Literal(_) => None,
    }
}

fn classify_output_word(
    wa: &PatternWord,
    wb: &PatternWord,
    group_a: &[Identifier],
    group_b: &[Identifier],
) -> Option<SizeOutputWord> {
    let (ids_a, sep_a) = extract_grown(wa, group_a.len())?;
    let (ids_b, sep_b) = extract_grown(wb, group_b.len())?;
    if sep_a != sep_b {
        return None;
    }
    if ids_a == group_a[..] && ids_b == group_b[..] {
        return Some(SizeOutputWord::Grown {
            reversed: false,
            separator: sep_a,
        });
    }
    let rev_a: Vec<Identifier> = group_a.iter().rev().copied().collect();
    let rev_b: Vec<Identifier> = group_b.iter().rev().copied().collect();
    if ids_a == rev_a && ids_b == rev_b {
        return Some(SizeOutputWord::Grown {
            reversed: true,
            separator: sep_a,
        });
    }
    None
}

/// Reads an output word as a run of identifiers glued by a single constant separator: `Id`,
/// `Literal*`, `Id`, `Literal*`, ..., `Id`, with no leading or trailing literal. Returns the
/// identifiers in the order they appear and the separator (empty if identifiers are adjacent).
fn extract_grown(word: &PatternWord, expected_len: usize) -> Option<(Vec<Identifier>, String)> {
    let PatternWord::Variable(chars) = word else {
        return None;
    };
    let mut ids = Vec::new();
    let mut separators: Vec<String> = Vec::new();
    let mut current = String::new();
    for tok in chars {
        match tok {
            CharToken::Id(id) => {
                if !ids.is_empty() {
                    separators.push(std::mem::take(&mut current));
                }
                ids.push(*id);
            }
            CharToken::Literal(c) => {
                if ids.is_empty() {
                    return None;
                }
                current.push(*c);
            }
        }
    }
    if !current.is_empty() || ids.len() != expected_len {
        return None;
    }
    if separators.windows(2).any(|w| w[0] != w[1]) {
        return None;
    }
    Some((ids, separators.into_iter().next().unwrap_or_default()))
}

/// Matches `input` against a size-generic rule's template, binding the group word to however
/// many characters its corresponding input word actually has.
#[must_use]
pub fn apply_size_rule(rule: &SizeGenericRule, input: &str) -> Option<String> {
    let words = super::pattern::split_words(input);
    if words.len() != rule.template.input.len() {
        return None;
    }

    let mut bound_group: Option<Vec<char>> = None;
    for (idx, (pattern_word, actual)) in rule.template.input.iter().zip(words.iter()).enumerate() {
        if idx == rule.group_index {
            bound_group = Some(actual.chars().collect());
            continue;
        }
        match pattern_word {
            PatternWord::Literal(lit) => {
                if lit != actual {
                    return None;
                }
            }
            PatternWord::Variable(_) => {
                // A non-group variable word still needs exact-length agreement with the
                // template word it was induced from; size generalization applies to one
                // group only, so defer to the plain char-generic matcher for the rest.
                if super::char_generic::sentence_matches_pattern(
                    &single_word_rule(pattern_word),
                    actual,
                )
                .is_none()
                {
                    return None;
                }
            }
        }
    }
    let bound_group = bound_group?;

    let mut out_words = Vec::with_capacity(rule.output_mapping.len());
    for word in &rule.output_mapping {
        match word {
            SizeOutputWord::Verbatim(PatternWord::Literal(s)) => out_words.push(s.clone()),
            SizeOutputWord::Verbatim(PatternWord::Variable(_)) => return None,
            SizeOutputWord::Grown { reversed, separator } => {
                let chars: Vec<char> = if *reversed {
                    bound_group.iter().rev().copied().collect()
                } else {
                    bound_group.clone()
                };
                out_words.push(
                    chars
                        .iter()
                        .map(char::to_string)
                        .collect::<Vec<_>>()
                        .join(separator),
                );
            }
        }
    }
    Some(out_words.join(" "))
}

fn single_word_rule(word: &PatternWord) -> CharGenericRule {
    CharGenericRule {
        input: vec![word.clone()],
        output: vec![],
    }
}
