//! Advisory rolling terminal display (§6, §9A.3). Has no effect on learning.

use std::collections::VecDeque;

const WINDOW: usize = 20;

/// One observed `(reward, input, reply)` triple.
#[derive(Debug, Clone, Copy)]
pub struct Triple {
    pub reward: char,
    pub input: char,
    pub reply: char,
}

/// A rolling window over the last [`WINDOW`] ticks, rendered to the terminal.
#[derive(Debug, Clone, Default)]
pub struct Display {
    recent: VecDeque<Triple>,
}

impl Display {
    /// Creates an empty display.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one tick, evicting the oldest once the window is full.
    pub fn push(&mut self, reward: char, input: char, reply: char) {
        if self.recent.len() >= WINDOW {
            self.recent.pop_front();
        }
        self.recent.push_back(Triple { reward, input, reply });
    }

    /// Renders the current window as three aligned lines: rewards, inputs, replies.
    #[must_use]
    pub fn render(&self) -> String {
        let rewards: String = self.recent.iter().map(|t| t.reward).collect();
        let inputs: String = self.recent.iter().map(|t| t.input).collect();
        let replies: String = self.recent.iter().map(|t| t.reply).collect();
        format!("reward: {rewards}\ninput:  {inputs}\nreply:  {replies}")
    }

    /// Prints the current window to stdout.
    pub fn print(&self) {
        println!("{}", self.render());
    }
}
