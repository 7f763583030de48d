//! Example strategies for gambit agents.
//!
//! These are the "easy mode" strategies: enough to play a clue-based game
//! end to end and to serve as starting points for real agents. A strategy
//! only implements the four callbacks; the engine in `gambit-core` does the
//! rest.

pub mod fixed;
pub mod keyword;

pub use fixed::FixedAnswerStrategy;
pub use keyword::KeywordStrategy;
