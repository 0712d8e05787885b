//! Stream state machine (§4.1): consumes one teacher character and one reward per tick and
//! drives the input -> output -> feedback cycle.

use super::syntax::SyntaxDescriptor;
use std::collections::VecDeque;

const SILENCE_CHAR_WINDOW: usize = 50;
const SILENCE_REWARD_WINDOW: usize = 49;

/// Where the state machine currently is in one question/answer/feedback cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Accumulating the teacher's question into `full_input`.
    ReceivingInput,
    /// Draining a queued multi-character answer while watching for an early interrupt.
    InLongOutput,
    /// Accumulating the teacher's feedback into `full_feedback`.
    ReceivingFeedback,
}

/// The stream state machine's mutable state (§3 "Character stream state").
#[derive(Debug, Clone)]
pub struct StreamState {
    state: State,
    full_input: String,
    full_output: VecDeque<char>,
    full_feedback: String,
    is_all_ready: bool,
    state_ok: bool,
    reward_in_input_only: bool,
    recent_chars: VecDeque<char>,
    recent_rewards: VecDeque<char>,
}

impl Default for StreamState {
    fn default() -> Self {
        Self {
            state: State::ReceivingInput,
            full_input: String::new(),
            full_output: VecDeque::new(),
            full_feedback: String::new(),
            is_all_ready: false,
            state_ok: true,
            reward_in_input_only: false,
            recent_chars: VecDeque::new(),
            recent_rewards: VecDeque::new(),
        }
    }
}

impl StreamState {
    /// Creates a fresh state machine in `ReceivingInput`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current question input, complete once `is_all_ready` or `should_send_output_now`.
    #[must_use]
    pub fn full_input(&self) -> &str {
        &self.full_input
    }

    /// The accumulated feedback text for the current cycle.
    #[must_use]
    pub fn full_feedback(&self) -> &str {
        &self.full_feedback
    }

    /// Whether the whole question/answer/feedback cycle is complete with no further output
    /// expected from the agent this tick.
    #[must_use]
    pub fn is_all_ready(&self) -> bool {
        self.is_all_ready
    }

    /// Whether a queued multi-character answer still has characters left to drain.
    #[must_use]
    pub fn is_output_left(&self) -> bool {
        !self.full_output.is_empty()
    }

    /// Whether the input tuple is complete and the agent should compute and queue a full
    /// output string now.
    #[must_use]
    pub fn should_send_output_now(&self) -> bool {
        matches!(self.state, State::InLongOutput) && self.full_output.is_empty() && !self.full_input.is_empty()
    }

    /// True when the last 50 teacher chars are all blank and, unless rewards piggyback on the
    /// input stream itself (`reward_in_input_only`, in which case the reward channel carries no
    /// independent silence signal), the last 49 rewards are too.
    #[must_use]
    pub fn is_teacher_silent(&self) -> bool {
        let chars_silent =
            self.recent_chars.len() == SILENCE_CHAR_WINDOW && self.recent_chars.iter().all(|c| *c == ' ');
        if self.reward_in_input_only {
            return chars_silent;
        }
        chars_silent
            && self.recent_rewards.len() == SILENCE_REWARD_WINDOW
            && self.recent_rewards.iter().all(|c| *c == ' ')
    }

    /// Whether the last `SetReward` call arrived attached to an input character rather than a
    /// dedicated reward frame (no-reward mode).
    #[must_use]
    pub fn reward_in_input_only(&self) -> bool {
        self.reward_in_input_only
    }

    /// Whether the state machine still trusts its own transitions. Cleared when an
    /// `InLongOutput` interrupt arrives that the known syntax cannot explain.
    #[must_use]
    pub fn state_ok(&self) -> bool {
        self.state_ok
    }

    /// Queues a full output string for `InLongOutput` draining.
    pub fn set_output(&mut self, output: &str) {
        self.full_output = output.chars().collect();
    }

    /// Pops and returns the next queued output character, or a space if none remain.
    pub fn get_output(&mut self) -> char {
        self.full_output.pop_front().unwrap_or(' ')
    }

    /// Clears any queued output, e.g. after a `-` reward invalidates it.
    pub fn clear_output(&mut self) {
        self.full_output.clear();
    }

    /// Records one reward character (`+`, `-`, or space for silence).
    pub fn set_reward(&mut self, reward: char, from_input: bool) {
        self.reward_in_input_only = from_input;
        self.recent_rewards.push_back(reward);
        if self.recent_rewards.len() > SILENCE_REWARD_WINDOW {
            self.recent_rewards.pop_front();
        }
    }

    /// Feeds one teacher character through the state machine, advancing `state` per §4.1.
    pub fn process_state(&mut self, c: char, syntax: &SyntaxDescriptor) {
        self.recent_chars.push_back(c);
        if self.recent_chars.len() > SILENCE_CHAR_WINDOW {
            self.recent_chars.pop_front();
        }

        match self.state {
            State::ReceivingInput => self.process_receiving_input(c, syntax),
            State::InLongOutput => self.process_in_long_output(c, syntax),
            State::ReceivingFeedback => self.process_receiving_feedback(c, syntax),
        }
    }

    fn process_receiving_input(&mut self, c: char, syntax: &SyntaxDescriptor) {
        self.full_input.push(c);
        let hit_delimiter = syntax.answer_now_char == Some(c);
        let hit_length = syntax.input_length > 0 && self.full_input.chars().count() >= syntax.input_length;
        if !(hit_delimiter || hit_length) {
            return;
        }

        if syntax.feedback_length > 1 {
            self.state = State::InLongOutput;
        } else if syntax.feedback_length == 1 || syntax.answer_now_char.is_none() {
            self.state = State::ReceivingFeedback;
        } else {
            self.is_all_ready = true;
        }
    }

    fn process_in_long_output(&mut self, c: char, syntax: &SyntaxDescriptor) {
        if c == ' ' {
            return;
        }
        let last_emitted_was_delimiter = self.full_output.is_empty();
        if last_emitted_was_delimiter {
            self.full_feedback.push(c);
            self.state = State::ReceivingFeedback;
        } else {
            self.state_ok = false;
        }
    }

    fn process_receiving_feedback(&mut self, c: char, syntax: &SyntaxDescriptor) {
        self.full_feedback.push(c);

        let is_boilerplate_overlap = !syntax.feedback_words.wrong_feedback_words.is_empty()
            && syntax
                .feedback_words
                .wrong_feedback_words
                .starts_with(self.full_feedback.as_str());

        let hit_delimiter = !is_boilerplate_overlap && syntax.next_request_char == Some(c);
        let hit_length = syntax.feedback_length > 0 && self.full_feedback.chars().count() >= syntax.feedback_length;

        if hit_delimiter || hit_length {
            self.is_all_ready = true;
        }
    }

    /// Clears the question tuple and `is_all_ready`, starting a fresh cycle — called by the
    /// controller once it has consumed a completed cycle.
    pub fn start_next_cycle(&mut self) {
        self.full_input.clear();
        self.full_feedback.clear();
        self.is_all_ready = false;
        self.state = State::ReceivingInput;
    }

    /// Resets the `state_ok` flag after the controller has reacted to an inconsistency.
    pub fn acknowledge_state_violation(&mut self) {
        self.state_ok = true;
        self.state = State::ReceivingInput;
        self.full_output.clear();
    }
}
