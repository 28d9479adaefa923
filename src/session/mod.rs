pub mod advance;
pub mod controller;
pub mod input;
pub mod queue;
pub mod quiz;
pub mod result;

pub use controller::{QuizController, QuizSettings};
pub use result::SessionSnapshot;
