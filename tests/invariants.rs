//! Property tests for the universal invariants, round-trip properties and boundary behaviour
//! of the rule-induction families.

use pretty_assertions::assert_eq;
use stream_brain::brain::alphabet::Alphabet;
use stream_brain::brain::log::SuccessfulLog;
use stream_brain::brain::rules::char_generic::{self, PatternWord};
use stream_brain::brain::rules::math;
use stream_brain::brain::rules::pattern::CharToken;
use stream_brain::brain::rules::RuleEngine;

#[test]
fn char_generic_output_identifiers_are_a_subset_of_input_identifiers() {
    let rule = char_generic::abstract_generic_rule("CONSTANT xyz", "zyx", "CONSTANT abc", "cba", "").unwrap();
    let input_ids = rule.input_identifiers();
    for word in &rule.output {
        if let PatternWord::Variable(tokens) = word {
            for tok in tokens {
                if let CharToken::Id(id) = tok {
                    assert!(input_ids.contains(id), "output identifier {id} missing from input");
                }
            }
        }
    }
}

#[test]
fn char_generic_rule_round_trips_both_witnesses_and_generalizes() {
    let rule = char_generic::abstract_generic_rule("CONSTANT xyz", "zyx", "CONSTANT abc", "cba", "").unwrap();
    assert_eq!(char_generic::apply_matching_rule(&rule, "CONSTANT xyz").as_deref(), Some("zyx"));
    assert_eq!(char_generic::apply_matching_rule(&rule, "CONSTANT abc").as_deref(), Some("cba"));
    assert_eq!(char_generic::apply_matching_rule(&rule, "CONSTANT bkj").as_deref(), Some("jkb"));
}

#[test]
fn math_rule_round_trips_both_witnesses_and_new_operands_in_base() {
    let rule = math::induce_math_rule("19 5", "24", "28 6", "34", "").unwrap();
    assert_eq!(math::apply_math_rule(&rule, "19 5").as_deref(), Some("24"));
    assert_eq!(math::apply_math_rule(&rule, "28 6").as_deref(), Some("34"));
    assert_eq!(math::apply_math_rule(&rule, "100 1").as_deref(), Some("101"));
}

#[test]
fn compound_rolling_math_applies_a_single_step_rule_left_to_right() {
    let rule = math::induce_math_rule("19 5", "24", "28 6", "34", "").unwrap();
    let mut engine = RuleEngine::new();
    engine.math.push(rule);
    let log = SuccessfulLog::new();
    let alphabet = Alphabet::new();
    let answer = engine.answer_with_rules("1 2 3", &log, &alphabet, &[], ' ');
    assert_eq!(answer, "6");
}

#[test]
fn inputs_shorter_than_three_chars_or_without_whitespace_never_produce_a_generic_rule() {
    assert!(char_generic::abstract_generic_rule("a", "b", "c", "d", "").is_none());
    assert!(char_generic::abstract_generic_rule("ab", "ba", "cd", "dc", "").is_none());
}

#[test]
fn identical_witnesses_never_produce_a_generic_rule() {
    assert!(char_generic::abstract_generic_rule("CONSTANT abc", "cba", "CONSTANT abc", "cba", "").is_none());
}

#[test]
fn ambiguous_math_witnesses_produce_no_rule() {
    // "x - 0 = x" fits both addition (x+0) and subtraction (x-0) in every candidate base.
    assert!(math::induce_math_rule("1 0", "1", "2 0", "2", "").is_none());
}

#[test]
fn mapping_uniform_value_tracks_agreement_across_successful_pairs() {
    let mut engine = RuleEngine::new();
    let log = SuccessfulLog::new();
    let alphabet = Alphabet::new();

    engine.mapping.successful("a", "k");
    engine.mapping.successful("b", "k");
    assert_eq!(engine.mapping.uniform_value(), Some("k"));
    // An input with no rule of its own still falls back to the uniform value.
    assert_eq!(engine.answer_with_rules("never-seen", &log, &alphabet, &[], ' '), "k");

    engine.mapping.successful("c", "j");
    assert_eq!(engine.mapping.uniform_value(), None);
}
