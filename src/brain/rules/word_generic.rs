//! Word-generic rules (§4.6): like char-generic rules, but a placeholder stands for an entire
//! whitespace-delimited word rather than a single character.

use super::pattern::{Identifier, WordToken, split_words, strip_trailing, variability_vector};

/// A word-generic rule: an input pattern of literal/placeholder words and a matching output
/// pattern built from the same placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordGenericRule {
    /// The input pattern.
    pub input: Vec<WordToken>,
    /// The output pattern. Every identifier here also occurs in `input`.
    pub output: Vec<WordToken>,
}

/// Induces a word-generic rule from two witnesses (`AbstractGenericRule`'s word-level sibling,
/// §4.6). Unlike the char-generic family, a variable *word* here becomes a single placeholder
/// regardless of its internal characters.
#[must_use]
pub fn abstract_word_generic_rule(
    i1: &str,
    o1: &str,
    i2: &str,
    o2: &str,
    end: &str,
) -> Option<WordGenericRule> {
    let i1 = strip_trailing(i1, end);
    let i2 = strip_trailing(i2, end);
    let o1 = strip_trailing(o1, end);
    let o2 = strip_trailing(o2, end);

    if i1 == i2 && o1 == o2 {
        return None;
    }

    let words_i1 = split_words(&i1);
    let words_i2 = split_words(&i2);
    let in_variability = variability_vector(&words_i1, &words_i2)?;
    if super::pattern::all_constant(&in_variability) {
        return None;
    }

    let words_o1 = split_words(&o1);
    let words_o2 = split_words(&o2);
    let out_variability = variability_vector(&words_o1, &words_o2)?;

    let mut next_id = 1u16;
    let mut slots: Vec<(Identifier, &str, &str)> = Vec::new();
    let mut input_pattern = Vec::with_capacity(words_i1.len());
    for (idx, variable) in in_variability.iter().enumerate() {
        if *variable {
            let id = Identifier(next_id);
            next_id += 1;
            slots.push((id, words_i1[idx], words_i2[idx]));
            input_pattern.push(WordToken::Id(id));
        } else {
            input_pattern.push(WordToken::Literal(words_i1[idx].to_string()));
        }
    }

    let mut output_pattern = Vec::with_capacity(words_o1.len());
    for (idx, variable) in out_variability.iter().enumerate() {
        if *variable {
            if let Some((id, _, _)) = slots
                .iter()
                .find(|(_, w1, w2)| *w1 == words_o1[idx] && *w2 == words_o2[idx])
            {
                output_pattern.push(WordToken::Id(*id));
            } else {
                let ids = find_sub_words(words_o1[idx], words_o2[idx], &slots)?;
                output_pattern.push(WordToken::Compound(ids));
            }
        } else {
            output_pattern.push(WordToken::Literal(words_o1[idx].to_string()));
        }
    }

    Some(WordGenericRule {
        input: input_pattern,
        output: output_pattern,
    })
}

/// `FindSubWords` (§4.6): when an output word is not itself one of the bound input words,
/// tries to decompose it as a concatenation of input words, consuming the same prefix from
/// both witnesses at each step so the decomposition holds for either presentation.
fn find_sub_words(tok1: &str, tok2: &str, slots: &[(Identifier, &str, &str)]) -> Option<Vec<Identifier>> {
    if tok1.is_empty() && tok2.is_empty() {
        return Some(Vec::new());
    }
    if tok1.is_empty() || tok2.is_empty() {
        return None;
    }
    for (id, w1, w2) in slots {
        if w1.is_empty() || w2.is_empty() {
            continue;
        }
        if let (Some(rest1), Some(rest2)) = (tok1.strip_prefix(w1), tok2.strip_prefix(w2)) {
            if let Some(mut rest) = find_sub_words(rest1, rest2, slots) {
                let mut out = vec![*id];
                out.append(&mut rest);
                return Some(out);
            }
        }
    }
    None
}

/// Matches `input` word-for-word against `rule`, returning the identifier -> word bindings on
/// success.
#[must_use]
pub fn sentence_matches_pattern<'a>(
    rule: &WordGenericRule,
    input: &'a str,
) -> Option<Vec<(Identifier, &'a str)>> {
    let words = split_words(input);
    if words.len() != rule.input.len() {
        return None;
    }
    let mut bindings: Vec<(Identifier, &str)> = Vec::new();
    for (tok, word) in rule.input.iter().zip(words.iter()) {
        match tok {
            WordToken::Literal(lit) => {
                if lit != word {
                    return None;
                }
            }
            WordToken::Id(id) => {
                if let Some((_, bound)) = bindings.iter().find(|(i, _)| i == id) {
                    if bound != word {
                        return None;
                    }
                } else {
                    bindings.push((*id, word));
                }
            }
            // The input pattern is only ever built from literal and single-placeholder words;
            // a compound token only ever appears on the output side.
            WordToken::Compound(_) => return None,
        }
    }
    Some(bindings)
}

fn render_id(id: Identifier, bindings: &[(Identifier, &str)]) -> String {
    bindings
        .iter()
        .find(|(i, _)| *i == id)
        .map_or_else(|| id.render(), |(_, w)| (*w).to_string())
}

/// Renders `rule`'s output pattern with a binding table from [`sentence_matches_pattern`].
#[must_use]
pub fn apply_rule(rule: &WordGenericRule, bindings: &[(Identifier, &str)]) -> String {
    rule.output
        .iter()
        .map(|tok| match tok {
            WordToken::Literal(s) => s.clone(),
            WordToken::Id(id) => render_id(*id, bindings),
            WordToken::Compound(ids) => ids.iter().map(|id| render_id(*id, bindings)).collect(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Matches and applies `rule` against `input` in one step.
#[must_use]
pub fn apply_matching_rule(rule: &WordGenericRule, input: &str) -> Option<String> {
    let bindings = sentence_matches_pattern(rule, input)?;
    Some(apply_rule(rule, &bindings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swaps_first_and_second_word() {
        let rule = abstract_word_generic_rule("swap cat dog", "dog cat", "swap red blue", "blue red", "")
            .unwrap();
        assert_eq!(
            apply_matching_rule(&rule, "swap up down").as_deref(),
            Some("down up")
        );
    }

    #[test]
    fn rejects_all_constant_witnesses() {
        assert!(abstract_word_generic_rule("a b", "c", "a b", "c", "").is_none());
    }

    #[test]
    fn rejects_identical_witnesses() {
        assert!(abstract_word_generic_rule("a b", "b a", "a b", "b a", "").is_none());
    }

    #[test]
    fn output_identifier_must_trace_to_an_input_slot() {
        // "mystery" cannot be explained by either input slot, so induction fails.
        assert!(
            abstract_word_generic_rule("swap cat dog", "mystery cat", "swap red blue", "blue red", "")
                .is_none()
        );
    }

    #[test]
    fn decomposes_a_compound_output_word_into_its_input_slots() {
        let rule =
            abstract_word_generic_rule("join cat dog", "catdog done", "join red blue", "redblue done", "")
                .unwrap();
        assert_eq!(
            rule.output[0],
            WordToken::Compound(vec![Identifier(1), Identifier(2)])
        );
        assert_eq!(
            apply_matching_rule(&rule, "join up down").as_deref(),
            Some("updown done")
        );
    }
}
