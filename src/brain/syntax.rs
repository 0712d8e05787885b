//! Syntax discoverer and `FeedbackWords` learner (§4.2, §4.3).

use crate::error::BrainError;

/// The five inferred framing fields (§3 "Syntax descriptor") plus the owned `FeedbackWords`
/// sub-entity.
#[derive(Debug, Clone)]
pub struct SyntaxDescriptor {
    /// Terminates the teacher's question, if a stable delimiter was found.
    pub answer_now_char: Option<char>,
    /// Terminates the teacher's feedback, if a stable delimiter was found.
    pub next_request_char: Option<char>,
    /// Used only when no delimiter was found.
    pub input_length: usize,
    /// 0 means single-character tasks.
    pub feedback_length: usize,
    /// How many trailing feedback characters are meaningful.
    pub feedback_real_chars: usize,
    /// The boilerplate-learning sub-entity.
    pub feedback_words: FeedbackWords,
}

impl Default for SyntaxDescriptor {
    fn default() -> Self {
        Self {
            answer_now_char: None,
            next_request_char: None,
            input_length: 1,
            feedback_length: 0,
            feedback_real_chars: 0,
            feedback_words: FeedbackWords::default(),
        }
    }
}

impl SyntaxDescriptor {
    /// Whether both delimiters are known (`DelimitersKnown`, §4.1).
    #[must_use]
    pub fn delimiters_known(&self) -> bool {
        self.answer_now_char.is_some() && self.next_request_char.is_some()
    }

    /// Extends how many trailing feedback characters the task-switch arbiter tolerates as
    /// bogus prefix before giving up on a mapping violation (§4.9's `feedback-real-chars cannot
    /// be extended further` clause). Returns `true` once the window has caught up with
    /// `feedback_length` — there is nothing left to extend. Per SPEC_FULL.md §9's open question,
    /// this counter is mutated only here, and is deliberately never reset by a task switch: it
    /// keeps growing across tasks for the lifetime of the process, same as the original.
    pub fn extend_feedback_real_chars(&mut self) -> bool {
        if self.feedback_real_chars < self.feedback_length {
            self.feedback_real_chars += 1;
        }
        self.feedback_real_chars >= self.feedback_length
    }
}

/// Learns and remembers the boilerplate wrapping a teacher's feedback (§4.3). Holds the last
/// two full feedback strings in a ring of capacity 2.
#[derive(Debug, Clone, Default)]
pub struct FeedbackWords {
    ring: Vec<String>,
    /// The inferred boilerplate that wraps a real answer (e.g. `"wrong! "`).
    pub wrong_feedback_words: String,
}

impl FeedbackWords {
    /// Records one full feedback string, evicting the oldest once the ring is full.
    pub fn observe(&mut self, feedback: &str) {
        if self.ring.len() >= 2 {
            self.ring.remove(0);
        }
        self.ring.push(feedback.to_string());
    }

    /// `LearnWrongFeedbackWords`: the longest common word-aligned prefix of the last two
    /// samples, falling back to the longest common suffix if that prefix is empty. Requires
    /// both samples to contain whitespace and be at least three characters long.
    pub fn learn_wrong_feedback_words(&mut self) -> &str {
        if let [a, b] = self.ring.as_slice() {
            if a.contains(' ') && b.contains(' ') && a.len() >= 3 && b.len() >= 3 {
                let prefix = common_word_prefix(a, b);
                self.wrong_feedback_words = if prefix.is_empty() {
                    common_suffix(a, b)
                } else {
                    prefix
                };
            }
        }
        &self.wrong_feedback_words
    }

    /// `ParseFeedbackForRewards`: `+` iff the learned boilerplate does not occur in `s`.
    #[must_use]
    pub fn parse_feedback_for_rewards(&self, s: &str) -> char {
        if self.wrong_feedback_words.is_empty() || !s.contains(&self.wrong_feedback_words) {
            '+'
        } else {
            '-'
        }
    }
}

fn common_word_prefix(a: &str, b: &str) -> String {
    let wa: Vec<&str> = a.split_whitespace().collect();
    let wb: Vec<&str> = b.split_whitespace().collect();
    let mut out = Vec::new();
    for (x, y) in wa.iter().zip(wb.iter()) {
        if x == y {
            out.push(*x);
        } else {
            break;
        }
    }
    out.join(" ")
}

fn common_suffix(a: &str, b: &str) -> String {
    let ca: Vec<char> = a.chars().collect();
    let cb: Vec<char> = b.chars().collect();
    let mut n = 0;
    while n < ca.len() && n < cb.len() && ca[ca.len() - 1 - n] == cb[cb.len() - 1 - n] {
        n += 1;
    }
    ca[ca.len() - n..].iter().collect()
}

/// Runs syntax discovery against the rolling `inputs`/`rewards` strings (§4.2). Requires at
/// least four non-blank reward characters; fewer is a protocol violation.
pub fn discover(inputs: &str, rewards: &str) -> Result<SyntaxDescriptor, BrainError> {
    let input_chars: Vec<char> = inputs.chars().collect();
    let reward_chars: Vec<char> = rewards.chars().collect();

    let positions: Vec<usize> = reward_chars
        .iter()
        .enumerate()
        .filter(|(_, c)| **c == '+' || **c == '-')
        .map(|(i, _)| i)
        .take(4)
        .collect();

    if positions.len() < 4 {
        return Err(BrainError::ProtocolViolation {
            detail: format!(
                "syntax discovery requires four rewards, found {}",
                positions.len()
            ),
        });
    }

    let at_positions: Vec<Option<char>> = positions.iter().map(|&p| input_chars.get(p).copied()).collect();

    if let Some(first) = at_positions[0] {
        if !first.is_alphanumeric() && at_positions.iter().all(|c| *c == Some(first)) {
            return Ok(SyntaxDescriptor {
                answer_now_char: Some(first),
                feedback_length: 1,
                ..SyntaxDescriptor::default()
            });
        }
    }

    if at_positions.iter().all(|c| *c == Some(' ')) {
        let mut found: Vec<(char, usize)> = Vec::new();
        for &p in &positions {
            let mut idx = p;
            let mut distance = 0;
            while idx > 0 {
                idx -= 1;
                distance += 1;
                if input_chars[idx] != ' ' {
                    found.push((input_chars[idx], distance));
                    break;
                }
            }
        }
        if found.len() == 4 {
            let candidate = found[0].0;
            if !candidate.is_alphanumeric() && found.iter().all(|(c, _)| *c == candidate) {
                let max_distance = found.iter().map(|(_, d)| *d).max().unwrap_or(0);
                return Ok(SyntaxDescriptor {
                    answer_now_char: Some(candidate),
                    feedback_length: max_distance + 1,
                    ..SyntaxDescriptor::default()
                });
            }
        }
    }

    if let Some(descriptor) = discover_next_request(&input_chars, &positions) {
        return Ok(descriptor);
    }

    if inputs.len() == positions[3] + 1 {
        return Ok(SyntaxDescriptor {
            input_length: 1,
            feedback_length: 0,
            ..SyntaxDescriptor::default()
        });
    }

    Err(BrainError::ProtocolViolation {
        detail: "no stable delimiter structure found in the first four rewards".to_string(),
    })
}

/// Scans leftward from reward positions 2 and 3 for the first matching non-alphanumeric,
/// non-space character, the "from the right" fallback of §4.2 step 4.
fn discover_next_request(input_chars: &[char], positions: &[usize]) -> Option<SyntaxDescriptor> {
    let scan = |p: usize| -> Option<char> {
        let mut idx = p;
        while idx > 0 {
            idx -= 1;
            let c = input_chars[idx];
            if c != ' ' && !c.is_alphanumeric() {
                return Some(c);
            }
            if c.is_alphanumeric() {
                return None;
            }
        }
        None
    };
    let a = scan(positions[1])?;
    let b = scan(positions[2])?;
    if a == b {
        Some(SyntaxDescriptor {
            next_request_char: Some(a),
            ..SyntaxDescriptor::default()
        })
    } else {
        None
    }
}
