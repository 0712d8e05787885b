//! A symbolic learning agent for an unlabeled teacher stream.
//!
//! The agent receives one character at a time from a teacher process, with no prior knowledge
//! of the wire syntax or the task being asked. It discovers the dialogue syntax from the
//! stream itself (`brain::syntax`), then induces rules from every successful question/answer
//! pair it observes (`brain::rules`) across five independent families: exact mappings,
//! per-character abstractions, per-character abstractions generalized over group length,
//! per-token abstractions, and arithmetic. `brain::Brain` ties these together behind two
//! operations, `answer` and `register_reward`, which is all [`transport::Transport`] needs to
//! drive a session.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod brain;
pub mod display;
pub mod error;
pub mod transport;

pub use brain::Brain;
pub use error::BrainError;
