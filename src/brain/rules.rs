//! The rule engine: one module per rule family (§4.4–§4.8), plus the shared placeholder
//! machinery in [`pattern`] and the `AnswerWithRules` priority chain (§4.9).

pub mod char_generic;
pub mod generic_size;
pub mod mapping;
pub mod math;
pub mod pattern;
pub mod word_generic;

use super::alphabet::Alphabet;
use super::log::SuccessfulLog;
use mapping::MappingStore;

/// All five rule stores, aggregated behind the priority chain described in §4.9.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    pub mapping: MappingStore,
    pub char_generic: Vec<char_generic::CharGenericRule>,
    pub char_generic_size: Vec<generic_size::SizeGenericRule>,
    pub word_generic: Vec<word_generic::WordGenericRule>,
    pub math: Vec<math::MathRule>,
}

impl RuleEngine {
    /// Creates an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `NewTask`: rebuilds the mapping store only. The four generic-rule stores survive task
    /// switches by design (§3 Lifecycles).
    pub fn new_task(&mut self) {
        self.mapping = MappingStore::new();
    }

    /// `AnswerWithRules` (§4.9): tries each rule family in priority order and returns the
    /// first non-empty answer.
    #[must_use]
    pub fn answer_with_rules(
        &self,
        input: &str,
        log: &SuccessfulLog,
        alphabet: &Alphabet,
        tried_this_cycle: &[char],
        last_emitted: char,
    ) -> String {
        if let Some(entry) = self.mapping.retrieve(input) {
            if let Some(out) = &entry.output {
                return out.clone();
            }
        }

        for rule in &self.math {
            if let Some(out) = math::apply_math_rule(rule, input) {
                return out;
            }
        }
        for rule in &self.char_generic {
            if let Some(out) = char_generic::apply_matching_rule(rule, input) {
                return out;
            }
        }
        for rule in &self.word_generic {
            if let Some(out) = word_generic::apply_matching_rule(rule, input) {
                return out;
            }
        }
        for rule in &self.char_generic_size {
            if let Some(out) = generic_size::apply_size_rule(rule, input) {
                return out;
            }
        }
        if let Some(out) = apply_compound_rolling_math(&self.math, input) {
            return out;
        }
        if let Some(out) = char_generic::apply_compound_matching_rule(&self.char_generic, input) {
            return out;
        }
        if let Some(out) = word_generic_compound(&self.word_generic, input) {
            return out;
        }
        if let Some(out) = char_generic::apply_closest_rule(&self.char_generic, input) {
            return out;
        }

        let failed = self
            .mapping
            .retrieve(input)
            .map(|e| &e.failed_outputs);

        // A closest-log or most-recent-emission guess this exact input already saw rejected is
        // worse than useless — across a task switch it is the single likeliest stale answer to
        // resurface, so both steps defer to it like every fallback below them already does.
        if let Some(out) = log.closest_output(input) {
            if failed.is_none_or(|f| !f.contains(out)) {
                return out.to_string();
            }
        }
        if let Some((_, out)) = log.last() {
            if failed.is_none_or(|f| !f.contains(out)) {
                return out.to_string();
            }
        }

        if let Some(uniform) = self.mapping.uniform_value() {
            if failed.is_none_or(|f| !f.contains(uniform)) {
                return uniform.to_string();
            }
        }

        if failed.is_none_or(|f| !f.contains(input)) {
            return input.to_string();
        }

        for candidate in self.mapping.retrieve_outputs_sorted_by_freq() {
            if failed.is_none_or(|f| !f.contains(candidate)) {
                return candidate.to_string();
            }
        }

        // The alphabet step's whole purpose is "a character not yet tried for this input" —
        // that has to include single-character outputs this exact input already failed on,
        // or a fixed-point-free task (e.g. a swap with no input mapping to itself) can offer
        // the same wrong character forever once every other branch above is exhausted.
        let already_failed_chars = failed.into_iter().flatten().filter_map(|s| {
            let mut chars = s.chars();
            let only = chars.next()?;
            chars.next().is_none().then_some(only)
        });
        let excluded: Vec<char> = tried_this_cycle.iter().copied().chain(already_failed_chars).collect();
        if let Some(c) = alphabet.first_untried(&excluded) {
            return c.to_string();
        }

        last_emitted.to_string()
    }

    /// `RegisterReward`'s `+` branch (§4.9): records the mapping success, then tries to
    /// generalize against every entry currently in the successful log. Math is tried first per
    /// witness pair; on success the other families are skipped for that pair.
    pub fn register_success(&mut self, input: &str, output: &str, end: &str, log: &SuccessfulLog) {
        self.mapping.successful(input, output);

        for (li, lo) in log.iter() {
            if li == input && lo == output {
                continue;
            }
            if let Some(rule) = math::induce_math_rule(input, output, li, lo, end) {
                push_unique(&mut self.math, rule);
                continue;
            }
            if let Some(rule) = char_generic::abstract_generic_rule(input, output, li, lo, end) {
                for existing in self.char_generic.clone() {
                    if let Some(size_rule) = generic_size::abstract_size_rule(&existing, &rule) {
                        push_unique(&mut self.char_generic_size, size_rule);
                    }
                }
                char_generic::validate_equivalent_patterns(&mut self.char_generic, rule);
                continue;
            }
            if let Some(rule) = word_generic::abstract_word_generic_rule(input, output, li, lo, end) {
                push_unique(&mut self.word_generic, rule);
            }
        }
    }

    /// `RegisterReward`'s `-` branch (§4.9): records the mapping failure. Deletion of a
    /// specific generic rule that produced the rejected answer is the caller's responsibility
    /// (the task-switch arbiter in `brain.rs` knows which rule, if any, was used).
    pub fn register_failure(&mut self, input: &str, output: &str) {
        self.mapping.failed(input, output);
    }
}

fn push_unique<T: PartialEq>(store: &mut Vec<T>, rule: T) {
    if !store.contains(&rule) {
        store.push(rule);
    }
}

fn apply_compound_rolling_math(rules: &[math::MathRule], input: &str) -> Option<String> {
    let words: Vec<&str> = input.split_whitespace().collect();
    if words.len() < 3 {
        return None;
    }
    let mut acc = words[0].to_string();
    for w in &words[1..] {
        let pair = format!("{acc} {w}");
        let mut applied = None;
        for rule in rules {
            if let Some(out) = math::apply_math_rule(rule, &pair) {
                applied = Some(out);
                break;
            }
        }
        acc = applied?;
    }
    Some(acc)
}

fn word_generic_compound(rules: &[word_generic::WordGenericRule], input: &str) -> Option<String> {
    let words = pattern::split_words(input);
    word_generic_compound_words(rules, &words)
}

fn word_generic_compound_words(rules: &[word_generic::WordGenericRule], words: &[&str]) -> Option<String> {
    if words.is_empty() {
        return Some(String::new());
    }
    for split in (1..=words.len()).rev() {
        let prefix = words[..split].join(" ");
        for rule in rules {
            if let Some(head) = word_generic::apply_matching_rule(rule, &prefix) {
                if split == words.len() {
                    return Some(head);
                }
                if let Some(tail) = word_generic_compound_words(rules, &words[split..]) {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_with_rules_prefers_exact_mapping() {
        let mut engine = RuleEngine::new();
        engine.mapping.successful("a", "z");
        let log = SuccessfulLog::new();
        let alphabet = Alphabet::new();
        assert_eq!(engine.answer_with_rules("a", &log, &alphabet, &[], ' '), "z");
    }

    #[test]
    fn answer_with_rules_falls_back_to_echo() {
        let engine = RuleEngine::new();
        let log = SuccessfulLog::new();
        let alphabet = Alphabet::new();
        assert_eq!(engine.answer_with_rules("hello", &log, &alphabet, &[], ' '), "hello");
    }

    #[test]
    fn register_success_induces_char_generic_from_log() {
        let mut engine = RuleEngine::new();
        let mut log = SuccessfulLog::new();
        log.push("CONSTANT abc", "cba");
        engine.register_success("CONSTANT xyz", "zyx", "", &log);
        assert_eq!(engine.char_generic.len(), 1);
    }

    #[test]
    fn new_task_clears_mapping_but_keeps_generics() {
        let mut engine = RuleEngine::new();
        let mut log = SuccessfulLog::new();
        log.push("CONSTANT abc", "cba");
        engine.register_success("CONSTANT xyz", "zyx", "", &log);
        engine.mapping.successful("a", "b");
        engine.new_task();
        assert!(engine.mapping.retrieve("a").is_none());
        assert_eq!(engine.char_generic.len(), 1);
    }
}
