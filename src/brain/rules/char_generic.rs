//! Char-generic rules (§4.5): pattern pairs where a placeholder stands for exactly one
//! character, induced from two witness `(input, output)` pairs.

use std::cmp::Ordering;

use itertools::Itertools;

use super::pattern::{
    CharToken, CharWord, Identifier, all_constant, char_word_identifiers, render_char_word,
    split_words, strip_trailing, variability_vector,
};

/// One word of a char-generic pattern: either a word that must match literally, or a word
/// whose characters are a mix of literal characters and single-character placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternWord {
    /// A word that must match (or render) exactly.
    Literal(String),
    /// A word containing at least one placeholder.
    Variable(CharWord),
}

impl PatternWord {
    fn identifiers(&self) -> Vec<Identifier> {
        match self {
            Self::Literal(_) => Vec::new(),
            Self::Variable(word) => char_word_identifiers(word),
        }
    }
}

/// A char-generic rule: one input pattern and one output pattern, each a sequence of words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharGenericRule {
    /// The input pattern.
    pub input: Vec<PatternWord>,
    /// The output pattern. Every identifier here also occurs in `input` (§3 invariant).
    pub output: Vec<PatternWord>,
}

impl CharGenericRule {
    /// All identifiers occurring in the input pattern, used to size a binding table.
    #[must_use]
    pub fn input_identifiers(&self) -> Vec<Identifier> {
        self.input.iter().flat_map(PatternWord::identifiers).unique().collect()
    }

    /// Renders the input pattern back to its textual form, for logs and tests.
    #[must_use]
    pub fn render_input(&self) -> String {
        render_pattern(&self.input)
    }

    /// Renders the output pattern back to its textual form.
    #[must_use]
    pub fn render_output(&self) -> String {
        render_pattern(&self.output)
    }
}

fn render_pattern(words: &[PatternWord]) -> String {
    words
        .iter()
        .map(|w| match w {
            PatternWord::Literal(s) => s.clone(),
            PatternWord::Variable(word) => render_char_word(word, None),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One identifier slot discovered while abstracting the input side: the fresh id, and the
/// character each witness bound to it (used to re-derive output identifiers).
struct Slot {
    id: Identifier,
    w1: char,
    w2: char,
}

/// Builds the input-side pattern for a single word, given its value under both witnesses.
/// Positions that agree across witnesses stay literal; positions that differ get a fresh
/// identifier recorded in `slots`.
fn abstract_word(w1: &str, w2: &str, next_id: &mut u16, slots: &mut Vec<Slot>) -> Option<CharWord> {
    let c1: Vec<char> = w1.chars().collect();
    let c2: Vec<char> = w2.chars().collect();
    if c1.len() != c2.len() {
        return None;
    }
    let mut out = Vec::with_capacity(c1.len());
    for (a, b) in c1.iter().zip(c2.iter()) {
        if a == b {
            out.push(CharToken::Literal(*a));
        } else {
            let id = Identifier(*next_id);
            *next_id += 1;
            slots.push(Slot {
                id,
                w1: *a,
                w2: *b,
            });
            out.push(CharToken::Id(id));
        }
    }
    Some(out)
}

/// Builds the output-side pattern for a single word, reusing identifiers from `slots` when an
/// output position's `(witness1_char, witness2_char)` pair matches a recorded input slot.
fn abstract_output_word(w1: &str, w2: &str, slots: &[Slot]) -> Option<CharWord> {
    let c1: Vec<char> = w1.chars().collect();
    let c2: Vec<char> = w2.chars().collect();
    if c1.len() != c2.len() {
        return None;
    }
    let mut out = Vec::with_capacity(c1.len());
    for (a, b) in c1.iter().zip(c2.iter()) {
        if a == b {
            out.push(CharToken::Literal(*a));
        } else if let Some(slot) = slots.iter().find(|s| s.w1 == *a && s.w2 == *b) {
            out.push(CharToken::Id(slot.id));
        } else {
            return None;
        }
    }
    Some(out)
}

/// Induces a char-generic rule from two witnesses, per §4.5's `AbstractGenericRule`.
///
/// `end` is the trailing delimiter (e.g. the answer-now character) stripped from both inputs
/// before splitting into words.
#[must_use]
pub fn abstract_generic_rule(
    i1: &str,
    o1: &str,
    i2: &str,
    o2: &str,
    end: &str,
) -> Option<CharGenericRule> {
    let i1 = strip_trailing(i1, end);
    let i2 = strip_trailing(i2, end);
    let o1 = strip_trailing(o1, end);
    let o2 = strip_trailing(o2, end);

    if i1 == i2 && o1 == o2 {
        return None;
    }
    if !i1.contains(' ') || !i2.contains(' ') || i1.len() < 3 || i2.len() < 3 {
        return None;
    }

    let words_i1 = split_words(&i1);
    let words_i2 = split_words(&i2);
    let variability = variability_vector(&words_i1, &words_i2)?;
    if all_constant(&variability) {
        return None;
    }

    let words_o1 = split_words(&o1);
    let words_o2 = split_words(&o2);
    if words_o1.len() != words_o2.len() {
        return None;
    }

    let mut next_id = 1u16;
    let mut slots = Vec::new();
    let mut input_pattern = Vec::with_capacity(words_i1.len());
    for (idx, variable) in variability.iter().enumerate() {
        if *variable {
            let word = abstract_word(words_i1[idx], words_i2[idx], &mut next_id, &mut slots)?;
            input_pattern.push(PatternWord::Variable(word));
        } else {
            input_pattern.push(PatternWord::Literal(words_i1[idx].to_string()));
        }
    }

    let mut output_pattern = Vec::with_capacity(words_o1.len());
    for (w1, w2) in words_o1.iter().zip(words_o2.iter()) {
        if w1 == w2 {
            output_pattern.push(PatternWord::Literal((*w1).to_string()));
        } else {
            let word = abstract_output_word(w1, w2, &slots)?;
            output_pattern.push(PatternWord::Variable(word));
        }
    }

    Some(CharGenericRule {
        input: input_pattern,
        output: output_pattern,
    })
}

/// `ValidateEquivalentPatterns` (§4.5): cross-checks a freshly induced rule against every rule
/// already in the store before it is kept. Two rules whose input patterns are comparable — one
/// pins down as a literal everywhere the other leaves a placeholder, and agrees with it
/// everywhere else — describe the same underlying task at different levels of generality, and
/// only the more specific of the two is worth keeping: it matches strictly fewer inputs, but
/// every one of those inputs was actually witnessed, where the more general pattern's extra
/// reach is unverified guesswork. Patterns that disagree on some literal position are unrelated
/// tasks and both survive.
pub fn validate_equivalent_patterns(store: &mut Vec<CharGenericRule>, candidate: CharGenericRule) {
    for (idx, existing) in store.iter().enumerate() {
        match compare_specificity(&candidate.input, &existing.input) {
            Some(Ordering::Greater) => {
                store[idx] = candidate;
                return;
            }
            Some(Ordering::Less | Ordering::Equal) => return,
            None => {}
        }
    }
    store.push(candidate);
}

/// Compares two input patterns position-for-position. `Greater` means `a` pins down at least
/// one position `b` leaves generic while never being looser than `b` anywhere (`a` is more
/// specific); `Less` is the mirror image; `Equal` means neither pattern is looser than the
/// other anywhere; `None` means the two patterns disagree on some literal position (or have
/// different shapes) and so are not comparable at all.
fn compare_specificity(a: &[PatternWord], b: &[PatternWord]) -> Option<Ordering> {
    if a.len() != b.len() {
        return None;
    }
    let mut a_more_specific = false;
    let mut b_more_specific = false;
    for (wa, wb) in a.iter().zip(b) {
        match (wa, wb) {
            (PatternWord::Literal(la), PatternWord::Literal(lb)) => {
                if la != lb {
                    return None;
                }
            }
            (PatternWord::Variable(ca), PatternWord::Variable(cb)) => {
                if ca.len() != cb.len() {
                    return None;
                }
                for (ta, tb) in ca.iter().zip(cb) {
                    match (ta, tb) {
                        (CharToken::Literal(x), CharToken::Literal(y)) => {
                            if x != y {
                                return None;
                            }
                        }
                        (CharToken::Literal(_), CharToken::Id(_)) => a_more_specific = true,
                        (CharToken::Id(_), CharToken::Literal(_)) => b_more_specific = true,
                        (CharToken::Id(_), CharToken::Id(_)) => {}
                    }
                }
            }
            _ => return None,
        }
    }
    match (a_more_specific, b_more_specific) {
        (true, false) => Some(Ordering::Greater),
        (false, true) => Some(Ordering::Less),
        (false, false) => Some(Ordering::Equal),
        (true, true) => None,
    }
}

/// Binds identifiers to characters while matching `input` word-for-word against `rule`'s
/// input pattern (`SentenceMatchesPattern`, §4.5). Returns the binding table on success.
#[must_use]
pub fn sentence_matches_pattern(rule: &CharGenericRule, input: &str) -> Option<Vec<(Identifier, char)>> {
    let words = split_words(input);
    if words.len() != rule.input.len() {
        return None;
    }
    let mut bindings: Vec<(Identifier, char)> = Vec::new();
    for (pattern_word, actual) in rule.input.iter().zip(words.iter()) {
        match pattern_word {
            PatternWord::Literal(lit) => {
                if lit != actual {
                    return None;
                }
            }
            PatternWord::Variable(pattern_chars) => {
                let chars: Vec<char> = actual.chars().collect();
                if chars.len() != pattern_chars.len() {
                    return None;
                }
                for (tok, c) in pattern_chars.iter().zip(chars.iter()) {
                    match tok {
                        CharToken::Literal(lit) => {
                            if lit != c {
                                return None;
                            }
                        }
                        CharToken::Id(id) => {
                            if let Some((_, bound)) = bindings.iter().find(|(i, _)| i == id) {
                                if bound != c {
                                    return None;
                                }
                            } else {
                                bindings.push((*id, *c));
                            }
                        }
                    }
                }
            }
        }
    }
    Some(bindings)
}

/// Renders `rule`'s output pattern using a binding table produced by
/// [`sentence_matches_pattern`] (`ApplyRule`, §4.5).
#[must_use]
pub fn apply_rule(rule: &CharGenericRule, bindings: &[(Identifier, char)]) -> String {
    rule.output
        .iter()
        .map(|w| match w {
            PatternWord::Literal(s) => s.clone(),
            PatternWord::Variable(word) => render_char_word(word, Some(bindings)),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Attempts to match `input` against `rule` and apply it in one step.
#[must_use]
pub fn apply_matching_rule(rule: &CharGenericRule, input: &str) -> Option<String> {
    let bindings = sentence_matches_pattern(rule, input)?;
    Some(apply_rule(rule, &bindings))
}

/// `ApplyCompoundMatchingRule` (§4.5): greedily matches a prefix subset of `input`'s words
/// against any rule, recursively applies the remainder, and joins the pieces with a space.
#[must_use]
pub fn apply_compound_matching_rule(rules: &[CharGenericRule], input: &str) -> Option<String> {
    let words = split_words(input);
    if words.is_empty() {
        return None;
    }
    apply_compound_words(rules, &words)
}

fn apply_compound_words(rules: &[CharGenericRule], words: &[&str]) -> Option<String> {
    if words.is_empty() {
        return Some(String::new());
    }
    for split in (1..=words.len()).rev() {
        let prefix = words[..split].join(" ");
        for rule in rules {
            if let Some(head) = apply_matching_rule(rule, &prefix) {
                if split == words.len() {
                    return Some(head);
                }
                if let Some(tail) = apply_compound_words(rules, &words[split..]) {
                    return Some(if tail.is_empty() {
                        head
                    } else {
                        format!("{head} {tail}")
                    });
                }
            }
        }
    }
    None
}

/// `ApplyClosestRule` (§4.5): scores every rule by fractional word/char overlap against
/// `input` and applies the highest-scoring rule, if any rule scores above zero.
#[must_use]
pub fn apply_closest_rule(rules: &[CharGenericRule], input: &str) -> Option<String> {
    let words = split_words(input);
    if words.is_empty() {
        return None;
    }
    let mut best: Option<(f64, &CharGenericRule)> = None;
    for rule in rules {
        if rule.input.len() != words.len() {
            continue;
        }
        let per_word = 1.0 / rule.input.len() as f64;
        let mut score = 0.0;
        for (pattern_word, actual) in rule.input.iter().zip(words.iter()) {
            match pattern_word {
                PatternWord::Literal(lit) => {
                    if lit == actual {
                        score += per_word;
                    }
                }
                PatternWord::Variable(pattern_chars) => {
                    let chars: Vec<char> = actual.chars().collect();
                    if chars.len() != pattern_chars.len() {
                        continue;
                    }
                    let per_char = per_word / pattern_chars.len() as f64;
                    for (tok, c) in pattern_chars.iter().zip(chars.iter()) {
                        if let CharToken::Literal(lit) = tok {
                            if lit == c {
                                score += per_char;
                            }
                        } else {
                            // An identifier slot always "fits" some character.
                            score += per_char;
                        }
                    }
                }
            }
        }
        if score > 0.0 && best.is_none_or(|(best_score, _)| score > best_score) {
            best = Some((score, rule));
        }
    }
    let (_, rule) = best?;
    apply_matching_rule(rule, input).or_else(|| {
        // The rule scored nonzero but a literal mismatch on some word prevents a strict
        // match; closest-match still commits to its output pattern with best-effort
        // bindings recovered from whichever words do line up.
        let bindings = best_effort_bindings(rule, &words);
        Some(apply_rule(rule, &bindings))
    })
}

fn best_effort_bindings(rule: &CharGenericRule, words: &[&str]) -> Vec<(Identifier, char)> {
    let mut bindings = Vec::new();
    for (pattern_word, actual) in rule.input.iter().zip(words.iter()) {
        if let PatternWord::Variable(pattern_chars) = pattern_word {
            let chars: Vec<char> = actual.chars().collect();
            if chars.len() != pattern_chars.len() {
                continue;
            }
            for (tok, c) in pattern_chars.iter().zip(chars.iter()) {
                if let CharToken::Id(id) = tok {
                    if !bindings.iter().any(|(i, _)| i == id) {
                        bindings.push((*id, *c));
                    }
                }
            }
        }
    }
    bindings
}
