//! End-to-end scenarios driving the public `Brain` API, plus a multi-pair learning scenario
//! driven directly against the rule engine for cases `Brain`'s single-character bootstrap mode
//! cannot reach on its own (the generic-rule families need multi-word questions, which only
//! appear once a multi-character task syntax has been discovered).

use pretty_assertions::assert_eq;
use stream_brain::brain::alphabet::Alphabet;
use stream_brain::brain::log::SuccessfulLog;
use stream_brain::brain::rules::RuleEngine;
use stream_brain::Brain;

#[test]
fn single_character_identity_task_converges_and_stays_converged() {
    let mut brain = Brain::new();
    for _ in 0..8 {
        for c in ['p', 'q', 'r'] {
            let reply = brain.answer(c).unwrap();
            let reward = if reply == c { '+' } else { '-' };
            brain.register_reward(reward, false).unwrap();
        }
    }
    for c in ['p', 'q', 'r'] {
        assert_eq!(brain.answer(c).unwrap(), c);
        brain.register_reward('+', false).unwrap();
    }
}

#[test]
fn identity_task_survives_a_long_win_streak_and_a_forced_reset() {
    // A win streak followed by an unexpected rejection of a previously-confirmed answer is
    // exactly the contradiction the task-switch arbiter (§4.9) watches for; whichever of its
    // branches fires, the learner must keep answering sanely afterwards rather than getting
    // stuck or erroring.
    let mut brain = Brain::new();
    for _ in 0..10 {
        let reply = brain.answer('a').unwrap();
        brain.register_reward(if reply == 'a' { '+' } else { '-' }, false).unwrap();
    }
    let reply = brain.answer('a').unwrap();
    assert_eq!(reply, 'a');
    brain.register_reward('-', false).unwrap();

    for _ in 0..4 {
        let reply = brain.answer('a').unwrap();
        assert_eq!(reply, 'a');
        brain.register_reward('+', false).unwrap();
    }
}

#[test]
fn new_task_clears_mapping_but_a_learned_char_generic_rule_survives() {
    let mut engine = RuleEngine::new();
    let mut log = SuccessfulLog::new();
    let alphabet = Alphabet::new();

    log.push("CONSTANT abc", "cba");
    engine.register_success("CONSTANT xyz", "zyx", "", &log);
    log.push("CONSTANT xyz", "zyx");
    engine.mapping.successful("hello", "world");

    assert_eq!(engine.answer_with_rules("hello", &log, &alphabet, &[], ' '), "world");
    assert_eq!(engine.answer_with_rules("CONSTANT def", &log, &alphabet, &[], ' '), "fed");

    engine.new_task();

    assert!(engine.mapping.retrieve("hello").is_none());
    assert_eq!(engine.answer_with_rules("CONSTANT def", &log, &alphabet, &[], ' '), "fed");
}

// The five single-character scenarios below each drive `Brain::answer`/`register_reward`
// character-by-character, the same way a transport would, rather than asserting literal
// equality against any particular reply/reward string: this crate's redesigned induction
// algorithm answers differently tick-by-tick than the system these scenarios were distilled
// from (most visibly, it never emits a blank "thinking" reply before its first real guess), so
// a literal transcript match would be asserting an artifact of a different algorithm rather
// than the scenario's actual content. What's held fixed and checked instead is each scenario's
// semantic target: the function from input character to correct reply that the teacher's
// reward stream encodes.

#[test]
fn scenario_identity_converges_across_the_full_alphabet() {
    // Identity: every character is its own correct answer.
    let mut brain = Brain::new();
    let alphabet = ['a', 'b', 'c', 'd', 'e', 'f', 'g'];
    for _ in 0..6 {
        for c in alphabet {
            let reply = brain.answer(c).unwrap();
            brain.register_reward(if reply == c { '+' } else { '-' }, false).unwrap();
        }
    }
    for c in alphabet {
        assert_eq!(brain.answer(c).unwrap(), c);
        brain.register_reward('+', false).unwrap();
    }
}

#[test]
fn scenario_uniform_output_answers_every_input_with_the_same_character() {
    // Uniform output: every input is rewarded for the same fixed reply, 'a', regardless of
    // what was asked. 'a' converges on its own first presentation since echoing it happens to
    // already be correct; from the second distinct input on, the word-generic family has
    // already generalized a "always answer the literal a" rule from the first two successes,
    // so even a character the learner has never seen before converges immediately.
    let mut brain = Brain::new();
    let target = 'a';
    for c in ['a', 'b', 'c', 'd'] {
        let reply = brain.answer(c).unwrap();
        brain.register_reward(if reply == target { '+' } else { '-' }, false).unwrap();
    }
    for c in ['a', 'b', 'c', 'd', 'e', 'f'] {
        assert_eq!(brain.answer(c).unwrap(), target);
        brain.register_reward('+', false).unwrap();
    }
}

#[test]
fn scenario_inverted_alphabet_learns_the_two_way_swap() {
    // Inverted alphabet: 'a' and 'b' swap identities, a fixed-point-free permutation with no
    // echo to fall back on for either character.
    let mut brain = Brain::new();
    let target = |c: char| if c == 'a' { 'b' } else { 'a' };
    for _ in 0..8 {
        for c in ['a', 'b'] {
            let reply = brain.answer(c).unwrap();
            brain.register_reward(if reply == target(c) { '+' } else { '-' }, false).unwrap();
        }
    }
    for c in ['a', 'b', 'a', 'b'] {
        assert_eq!(brain.answer(c).unwrap(), target(c));
        brain.register_reward('+', false).unwrap();
    }
}

#[test]
fn scenario_moved_rotation_learns_the_three_way_cycle() {
    // Moved rotation: each character maps to the one before it in the repeating a-b-c cycle, a
    // three-way fixed-point-free permutation. Unlike the two-way swap, some characters need
    // two wrong guesses exhausted against the alphabet fallback before the right one surfaces.
    let mut brain = Brain::new();
    let target = |c: char| match c {
        'a' => 'c',
        'b' => 'a',
        'c' => 'b',
        _ => unreachable!(),
    };
    for _ in 0..8 {
        for c in ['a', 'b', 'c'] {
            let reply = brain.answer(c).unwrap();
            brain.register_reward(if reply == target(c) { '+' } else { '-' }, false).unwrap();
        }
    }
    for c in ['a', 'b', 'c', 'a', 'b', 'c'] {
        assert_eq!(brain.answer(c).unwrap(), target(c));
        brain.register_reward('+', false).unwrap();
    }
}

#[test]
fn scenario_task_switch_relearns_after_the_rotation_task_is_replaced() {
    // Task switch: a moved-rotation task runs to convergence and stays confirmed for a long
    // win streak, then the teacher silently replaces it with a two-way swap over a subset of
    // the same alphabet. The contradiction on a long-confirmed answer is exactly what the
    // task-switch arbiter watches for; it must relearn the new mapping rather than getting
    // stuck repeating the old one.
    let mut brain = Brain::new();
    let rotation = |c: char| match c {
        'a' => 'c',
        'b' => 'a',
        'c' => 'b',
        _ => unreachable!(),
    };
    for _ in 0..8 {
        for c in ['a', 'b', 'c'] {
            let reply = brain.answer(c).unwrap();
            brain.register_reward(if reply == rotation(c) { '+' } else { '-' }, false).unwrap();
        }
    }
    for c in ['a', 'b', 'c'] {
        assert_eq!(brain.answer(c).unwrap(), rotation(c));
        brain.register_reward('+', false).unwrap();
    }

    let swapped = |c: char| if c == 'a' { 'b' } else { 'a' };
    for _ in 0..8 {
        for c in ['a', 'b'] {
            let reply = brain.answer(c).unwrap();
            brain.register_reward(if reply == swapped(c) { '+' } else { '-' }, false).unwrap();
        }
    }
    for c in ['a', 'b', 'a', 'b'] {
        assert_eq!(brain.answer(c).unwrap(), swapped(c));
        brain.register_reward('+', false).unwrap();
    }
}

#[test]
fn math_family_generalizes_hexadecimal_subtraction_across_a_task_switch() {
    let mut engine = RuleEngine::new();
    let mut log = SuccessfulLog::new();
    let alphabet = Alphabet::new();

    log.push("FF 1", "FE");
    engine.register_success("1A 1", "19", "", &log);
    assert_eq!(engine.math.len(), 1);
    assert_eq!(engine.answer_with_rules("10 1", &log, &alphabet, &[], ' '), "F");

    engine.new_task();
    assert_eq!(engine.answer_with_rules("10 1", &log, &alphabet, &[], ' '), "F");
}
