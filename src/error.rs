use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    /// The question cannot be scored fairly: its correct answer is missing
    /// from the options, or an option appears more than once.
    #[error("question {question_id} ({topic}): {problem} (correct answer {correct_answer:?})")]
    DataIntegrity {
        question_id: usize,
        topic: String,
        correct_answer: String,
        problem: &'static str,
    },
    /// An answer or transition arrived for a presentation that is already
    /// resolved, does not exist, or belongs to a frozen session.
    #[error("invalid session state: {0}")]
    InvalidState(String),
    #[error("chart surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("question bank: {0}")]
    Bank(String),
}

impl QuizError {
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        QuizError::InvalidState(msg.into())
    }
}

pub type QuizResult<T> = Result<T, QuizError>;
