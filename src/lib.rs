// Quiz core: bank loading, sessions and scoring, the radial mastery chart,
// and persistence. The terminal front end lives in the binary (main.rs).

pub mod bank;
pub mod chart;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod session;
pub mod store;

pub use error::{QuizError, QuizResult};
