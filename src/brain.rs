//! The `Brain` aggregate (§2, §4.9): ties the stream state machine, syntax discoverer, rule
//! engine, alphabet and successful-log together into the two operations a transport needs,
//! `answer` and `register_reward`.

pub mod alphabet;
pub mod log;
pub mod rules;
pub mod stream;
pub mod syntax;

use crate::error::BrainError;
use alphabet::Alphabet;
use log::SuccessfulLog;
use rules::RuleEngine;
use stream::StreamState;
use syntax::SyntaxDescriptor;

const ROLLING_LIMIT: usize = 10_000;
const ROLLING_TRIM_TARGET: usize = 1_000;
const CONSECUTIVE_LOSS_LIMIT: u32 = 100;
const CONSECUTIVE_WIN_LIMIT: u32 = 10;

fn trim_rolling(s: &mut String) {
    if s.chars().count() > ROLLING_LIMIT {
        let keep: String = s
            .chars()
            .rev()
            .take(ROLLING_TRIM_TARGET)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        *s = keep;
    }
}

/// The learner's entire mutable state, constructed once per process (§3 Lifecycles).
#[derive(Debug, Clone)]
pub struct Brain {
    inputs: String,
    rewards: String,
    stream: StreamState,
    syntax: Option<SyntaxDescriptor>,
    rules: RuleEngine,
    alphabet: Alphabet,
    successful_log: SuccessfulLog,
    total_rewards: usize,
    consecutive_wins: u32,
    consecutive_losses: u32,
    tried_this_cycle: Vec<char>,
    last_emitted: char,
    last_question: String,
    last_answer: String,
}

impl Default for Brain {
    fn default() -> Self {
        Self {
            inputs: String::new(),
            rewards: String::new(),
            stream: StreamState::new(),
            syntax: None,
            rules: RuleEngine::new(),
            alphabet: Alphabet::new(),
            successful_log: SuccessfulLog::new(),
            total_rewards: 0,
            consecutive_wins: 0,
            consecutive_losses: 0,
            tried_this_cycle: Vec::new(),
            last_emitted: ' ',
            last_question: String::new(),
            last_answer: String::new(),
        }
    }
}

impl Brain {
    /// Constructs a fresh brain with no learned state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `NewTask(copyDelimiters)` (§3): rebuilds the mapping store and, unless delimiters are to
    /// be preserved, the syntax descriptor too. The generic-rule stores are never touched.
    pub fn new_task(&mut self, copy_delimiters: bool) {
        ::log::info!("task switch: resetting mapping state (copy_delimiters={copy_delimiters})");
        self.rules.new_task();
        if !copy_delimiters {
            self.syntax = None;
            self.total_rewards = 0;
        }
        self.consecutive_wins = 0;
        self.consecutive_losses = 0;
    }

    fn end_delimiter(&self) -> String {
        self.syntax
            .as_ref()
            .and_then(|s| s.answer_now_char)
            .map(String::from)
            .unwrap_or_default()
    }

    /// Drives the stream state machine with one teacher character and returns the agent's
    /// reply for this tick.
    pub fn answer(&mut self, c: char) -> Result<char, BrainError> {
        self.inputs.push(c);
        trim_rolling(&mut self.inputs);
        self.alphabet.observe(c);

        if let Some(syntax) = self.syntax.clone() {
            self.stream.process_state(c, &syntax);
        } else {
            // Before syntax is known every character is its own question (bootstrap mode).
            self.stream = StreamState::new();
        }

        // Delimiters alone already imply a multi-character task even while the rest of the
        // syntax still carries its bootstrap defaults, so `delimiters_known` (not just the
        // length fields) gates whether we're truly in single-character mode.
        let single_char_mode = self
            .syntax
            .as_ref()
            .is_none_or(|s| !s.delimiters_known() && s.input_length <= 1 && s.feedback_length == 0);

        let reply = if self.stream.is_teacher_silent() {
            // No-reward mode (§4.9): the teacher has stopped reacting entirely. Probe the
            // alphabet one character at a time, never repeating a character already tried since
            // the silence began, until something provokes a response.
            let probe = self
                .alphabet
                .first_untried(&self.tried_this_cycle)
                .unwrap_or(self.last_emitted);
            self.tried_this_cycle.push(probe);
            probe
        } else {
            self.tried_this_cycle.clear();
            if single_char_mode {
                let question = c.to_string();
                let answer = self.rules.answer_with_rules(
                    &question,
                    &self.successful_log,
                    &self.alphabet,
                    &self.tried_this_cycle,
                    self.last_emitted,
                );
                let reply = answer.chars().next().unwrap_or(' ');
                self.tried_this_cycle.push(reply);
                self.last_question = question;
                self.last_answer = reply.to_string();
                reply
            } else if self.stream.is_output_left() {
                self.stream.get_output()
            } else if self.stream.should_send_output_now() {
                let question = self.stream.full_input().to_string();
                let answer = self.rules.answer_with_rules(
                    &question,
                    &self.successful_log,
                    &self.alphabet,
                    &self.tried_this_cycle,
                    self.last_emitted,
                );
                self.last_question = question;
                self.last_answer = answer.clone();
                self.stream.set_output(&answer);
                self.stream.get_output()
            } else {
                ' '
            }
        };

        self.last_emitted = reply;
        Ok(reply)
    }

    /// Registers the reward for the most recently completed question/answer cycle.
    pub fn register_reward(&mut self, r: char, from_input: bool) -> Result<(), BrainError> {
        self.rewards.push(r);
        trim_rolling(&mut self.rewards);
        self.stream.set_reward(r, from_input);
        self.total_rewards += 1;

        if self.syntax.is_none() && self.total_rewards >= 4 {
            let discovered = syntax::discover(&self.inputs, &self.rewards)?;
            ::log::info!("syntax discovery complete");
            self.syntax = Some(discovered);
        }

        match r {
            '+' => self.on_success(),
            '-' => self.on_failure(),
            _ => {}
        }
        Ok(())
    }

    fn on_success(&mut self) {
        if self.last_question.is_empty() {
            return;
        }
        let end = self.end_delimiter();
        self.rules.register_success(&self.last_question, &self.last_answer, &end, &self.successful_log);
        self.successful_log.push(&self.last_question, &self.last_answer);
        self.consecutive_wins += 1;
        self.consecutive_losses = 0;
        if !single_char_question(&self.last_question) {
            self.stream.start_next_cycle();
        }
    }

    fn on_failure(&mut self) {
        if self.last_question.is_empty() {
            return;
        }
        self.rules.register_failure(&self.last_question, &self.last_answer);
        self.stream.clear_output();
        // The arbiter must see the pre-reset streak counters — a win-streak-then-contradiction
        // is exactly the case it watches for (§4.9), and resetting first would hide it.
        self.task_switch_arbiter();
        self.consecutive_losses += 1;
        self.consecutive_wins = 0;
        if !single_char_question(&self.last_question) {
            self.stream.start_next_cycle();
        }
    }

    /// The task-switch arbiter (§4.9): decides between a hard reset and softer remediation.
    fn task_switch_arbiter(&mut self) {
        if !self.stream.state_ok() {
            ::log::warn!("state machine signalled a protocol inconsistency; resetting task");
            self.stream.acknowledge_state_violation();
            self.new_task(self.total_rewards > 3);
            return;
        }
        if self.consecutive_losses > CONSECUTIVE_LOSS_LIMIT {
            ::log::warn!("{} consecutive losses; resetting task", self.consecutive_losses);
            self.new_task(self.total_rewards > 3);
            return;
        }
        if self.consecutive_wins >= CONSECUTIVE_WIN_LIMIT {
            ::log::warn!("a confirmed rule just failed after a long win streak; resetting task");
            self.new_task(self.total_rewards > 3);
            return;
        }
        // There is no boilerplate to learn for a single-character task in the first place
        // (feedback_length 0), so "no new boilerplate learned" is vacuous there rather than a
        // sign of drift; without this gate every ordinary contradiction during bootstrap would
        // reset the mapping before a second guess ever gets a chance to land.
        let relearned_nothing = self.syntax.as_ref().is_some_and(|s| s.feedback_length > 0)
            && self
                .syntax
                .as_mut()
                .is_some_and(|syntax| syntax.feedback_words.learn_wrong_feedback_words().is_empty());
        if relearned_nothing {
            // Extend the tolerated bogus-prefix window one character; once it has caught up
            // with the known feedback length there is nothing left to extend, so that alone is
            // also grounds for a reset even under the 4-reward floor.
            let feedback_chars_exhausted = self
                .syntax
                .as_mut()
                .is_none_or(SyntaxDescriptor::extend_feedback_real_chars);
            if self.total_rewards >= 4 || feedback_chars_exhausted {
                ::log::warn!("mapping violated with no new boilerplate learned; resetting task");
                self.new_task(self.total_rewards > 3);
            }
        }
    }
}

fn single_char_question(q: &str) -> bool {
    q.chars().count() <= 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn learns_identity_mapping_over_repeated_presentations() {
        let mut brain = Brain::new();
        for _ in 0..5 {
            let r = brain.answer('a').unwrap();
            let reward = if r == 'a' { '+' } else { '-' };
            brain.register_reward(reward, false).unwrap();
        }
        let r = brain.answer('a').unwrap();
        assert_eq!(r, 'a');
    }

    #[test]
    fn new_task_clears_consecutive_counters() {
        let mut brain = Brain::new();
        brain.consecutive_wins = 5;
        brain.consecutive_losses = 3;
        brain.new_task(true);
        assert_eq!(brain.consecutive_wins, 0);
        assert_eq!(brain.consecutive_losses, 0);
    }

    #[test]
    fn a_contradiction_after_a_long_win_streak_resets_consecutive_wins() {
        let mut brain = Brain::new();
        for _ in 0..(CONSECUTIVE_WIN_LIMIT as usize + 1) {
            let r = brain.answer('a').unwrap();
            let reward = if r == 'a' { '+' } else { '-' };
            brain.register_reward(reward, false).unwrap();
        }
        assert!(brain.consecutive_wins >= CONSECUTIVE_WIN_LIMIT);
        let r = brain.answer('a').unwrap();
        assert_eq!(r, 'a');
        // The arbiter must see the pre-reset win count to take the "long win streak, then a
        // contradiction" branch; `new_task` then clears it back to zero.
        brain.register_reward('-', false).unwrap();
        assert_eq!(brain.consecutive_wins, 0);
    }

    #[test]
    fn teacher_silence_probes_the_alphabet_without_repeating_within_the_episode() {
        // Rewards stay blank throughout, so syntax discovery never succeeds (it needs four
        // `+`/`-` rewards) and every `register_reward` call after the fourth keeps returning a
        // protocol-violation error; that is expected here and ignored, same as any caller that
        // never receives a `+`/`-` reward.
        let mut brain = Brain::new();
        for c in ['x', 'y', 'z'] {
            brain.answer(c).unwrap();
            let _ = brain.register_reward(' ', false);
        }
        let mut probes = Vec::new();
        for _ in 0..52 {
            probes.push(brain.answer(' ').unwrap());
            let _ = brain.register_reward(' ', false);
        }
        // Once 50 consecutive blank characters and 49 blank rewards have accumulated, the
        // learner stops consulting the rule engine and probes 'x', 'y', 'z' in turn instead of
        // repeating the same character forever.
        assert!(probes.contains(&'x'));
        assert!(probes.contains(&'y'));
        assert!(probes.contains(&'z'));
    }

    #[test]
    fn rolling_strings_stay_bounded() {
        let mut brain = Brain::new();
        for _ in 0..(ROLLING_LIMIT + 500) {
            let _ = brain.answer('x');
            let _ = brain.register_reward(' ', false);
        }
        assert!(brain.inputs.chars().count() <= ROLLING_LIMIT);
        assert!(brain.rewards.chars().count() <= ROLLING_LIMIT);
    }
}
