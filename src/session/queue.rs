use std::collections::{HashSet, VecDeque};

use rand::Rng;

use crate::bank::Question;
use crate::error::{QuizError, QuizResult};

/// Uniform in-place Fisher-Yates shuffle. Keeps no state between calls.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// One showing of a question, with its own option order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    pub question_id: usize,
    pub topic: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
    /// True until the first incorrect submission.
    pub first_attempt: bool,
    /// Set once by the first correct submission; all later input is rejected.
    pub resolved: bool,
    /// Option indices already submitted incorrectly, in click order.
    pub eliminated: Vec<usize>,
}

impl Presentation {
    pub fn correct_answer(&self) -> &str {
        &self.options[self.correct_index]
    }
}

pub struct QuestionQueue {
    remaining: VecDeque<Question>,
    total: usize,
    shuffle_options: bool,
}

impl QuestionQueue {
    pub fn new<R: Rng + ?Sized>(mut questions: Vec<Question>, rng: &mut R, shuffle_options: bool) -> Self {
        shuffle(&mut questions, rng);
        Self {
            total: questions.len(),
            remaining: questions.into(),
            shuffle_options,
        }
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Remove the head question and build a presentation for it. `Ok(None)`
    /// once the queue is exhausted. A question whose correct answer is not
    /// among its options, or that repeats an option, is still consumed and
    /// reported as `DataIntegrity`.
    pub fn next_presentation<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> QuizResult<Option<(Question, Presentation)>> {
        let Some(question) = self.remaining.pop_front() else {
            return Ok(None);
        };

        let integrity = |problem| QuizError::DataIntegrity {
            question_id: question.id,
            topic: question.topic.clone(),
            correct_answer: question.correct_answer.clone(),
            problem,
        };
        let distinct: HashSet<&str> = question.options.iter().map(String::as_str).collect();
        if distinct.len() != question.options.len() {
            return Err(integrity("options repeat"));
        }

        let mut options = question.options.clone();
        if self.shuffle_options {
            shuffle(&mut options, rng);
        }

        let correct_index = options
            .iter()
            .position(|o| *o == question.correct_answer)
            .ok_or_else(|| integrity("correct answer is not among the options"))?;

        let presentation = Presentation {
            question_id: question.id,
            topic: question.topic.clone(),
            text: question.text.clone(),
            options,
            correct_index,
            explanation: question.explanation.clone(),
            first_attempt: true,
            resolved: false,
            eliminated: Vec::new(),
        };
        Ok(Some((question, presentation)))
    }
}
