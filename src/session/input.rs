use tracing::debug;

use crate::error::{QuizError, QuizResult};
use crate::session::queue::Presentation;
use crate::session::quiz::QuizState;

/// Largest option number reachable from the digit keys.
pub const MAX_DIGIT_OPTIONS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    /// Whether this was the presentation's first submission.
    pub first_attempt: bool,
    /// Points actually applied (negative for losses, after clamping at 0).
    pub delta: i64,
    /// The presentation is now terminal.
    pub resolved: bool,
}

fn open_presentation(state: &QuizState) -> QuizResult<&Presentation> {
    if state.frozen {
        return Err(QuizError::invalid_state("answer on a frozen session"));
    }
    let presentation = state
        .current
        .as_ref()
        .ok_or_else(|| QuizError::invalid_state("answer with no question on screen"))?;
    if presentation.resolved {
        return Err(QuizError::invalid_state(format!(
            "question {} is already resolved",
            presentation.question_id
        )));
    }
    Ok(presentation)
}

/// Score one submission against the open presentation of `topic`.
///
/// The topic total counts each presentation once, on its first submission.
/// `correct` counts it once when it resolves and `first_attempt_correct` only
/// when the first submission was the resolving one.
pub fn submit_answer(state: &mut QuizState, topic: &str, is_correct: bool) -> QuizResult<AnswerOutcome> {
    let presentation = open_presentation(state)?;
    if presentation.topic != topic {
        return Err(QuizError::invalid_state(format!(
            "answer for topic {topic:?} while {:?} is on screen",
            presentation.topic
        )));
    }
    let first_attempt = presentation.first_attempt;

    let stats = state.topic_stats.entry(topic);
    if first_attempt {
        stats.total += 1;
    }

    let delta = if is_correct {
        stats.correct += 1;
        if first_attempt {
            stats.first_attempt_correct += 1;
            state.score.apply_correct_first(&state.policy)
        } else {
            state.score.apply_correct_retry()
        }
    } else {
        state.score.apply_incorrect(&state.policy)
    };

    // open_presentation guaranteed this exists
    if let Some(current) = state.current.as_mut() {
        if is_correct {
            current.resolved = true;
        } else {
            current.first_attempt = false;
        }
    }

    debug!(
        topic,
        is_correct,
        first_attempt,
        delta,
        points = state.score.points,
        streak = state.score.streak,
        lose_streak = state.score.lose_streak,
        "answer scored"
    );

    Ok(AnswerOutcome {
        correct: is_correct,
        first_attempt,
        delta,
        resolved: is_correct,
    })
}

/// Submit the option at `index` of the current presentation.
pub fn submit_option(state: &mut QuizState, index: usize) -> QuizResult<AnswerOutcome> {
    let presentation = open_presentation(state)?;
    if index >= presentation.options.len() {
        return Err(QuizError::invalid_state(format!(
            "option {index} out of range ({} options)",
            presentation.options.len()
        )));
    }
    if presentation.eliminated.contains(&index) {
        return Err(QuizError::invalid_state(format!(
            "option {index} was already tried"
        )));
    }

    let is_correct = index == presentation.correct_index;
    let topic = presentation.topic.clone();
    if !is_correct {
        if let Some(current) = state.current.as_mut() {
            current.eliminated.push(index);
        }
    }
    submit_answer(state, &topic, is_correct)
}

/// Map a pressed digit to an option index of the current presentation.
/// Only 1..=MAX_DIGIT_OPTIONS are bound; anything past the option count is None.
pub fn digit_to_option(ch: char, option_count: usize) -> Option<usize> {
    let digit = ch.to_digit(10)? as usize;
    if digit == 0 || digit > MAX_DIGIT_OPTIONS || digit > option_count {
        return None;
    }
    Some(digit - 1)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::bank::Question;
    use crate::engine::ScoringPolicy;
    use crate::session::quiz::tests::questions;

    fn started(n: usize) -> (QuizState, SmallRng) {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut state = QuizState::new("t", questions(n), ScoringPolicy::default(), true, &mut rng);
        state.advance(&mut rng).unwrap();
        (state, rng)
    }

    fn wrong_index(state: &QuizState) -> usize {
        1 - state.current().unwrap().correct_index
    }

    #[test]
    fn test_first_attempt_correct() {
        let (mut state, _) = started(1);
        let correct = state.current().unwrap().correct_index;
        let topic = state.current().unwrap().topic.clone();
        let outcome = submit_option(&mut state, correct).unwrap();
        assert_eq!(outcome, AnswerOutcome { correct: true, first_attempt: true, delta: 115, resolved: true });
        assert_eq!(state.score().points, 115);
        assert_eq!(state.score().streak, 1);
        assert_eq!(state.score().lose_streak, 0);
        let stats = state.topic_stats().get(&topic).unwrap();
        assert_eq!((stats.total, stats.correct, stats.first_attempt_correct), (1, 1, 1));
    }

    #[test]
    fn test_miss_then_correct() {
        let (mut state, _) = started(1);
        let correct = state.current().unwrap().correct_index;
        let topic = state.current().unwrap().topic.clone();

        let wrong = wrong_index(&state);
        let miss = submit_option(&mut state, wrong).unwrap();
        assert_eq!(miss.delta, 0);
        assert!(!miss.resolved);
        assert_eq!(state.score().lose_streak, 1);

        let hit = submit_option(&mut state, correct).unwrap();
        assert!(!hit.first_attempt);
        assert_eq!(hit.delta, 0);
        assert_eq!(state.score().points, 0);
        assert_eq!(state.score().streak, 0);
        assert_eq!(state.score().lose_streak, 0);
        let stats = state.topic_stats().get(&topic).unwrap();
        assert_eq!((stats.total, stats.correct, stats.first_attempt_correct), (1, 1, 0));
    }

    #[test]
    fn test_resolved_presentation_rejects_further_clicks() {
        let (mut state, _) = started(2);
        let correct = state.current().unwrap().correct_index;
        submit_option(&mut state, correct).unwrap();
        let before = state.score();
        for _ in 0..5 {
            assert!(matches!(submit_option(&mut state, correct), Err(QuizError::InvalidState(_))));
        }
        assert_eq!(state.score(), before);
    }

    #[test]
    fn test_repeated_wrong_option_rejected() {
        let (mut state, _) = started(1);
        let wrong = wrong_index(&state);
        submit_option(&mut state, wrong).unwrap();
        assert!(submit_option(&mut state, wrong).is_err());
        assert_eq!(state.score().lose_streak, 1);
    }

    #[test]
    fn test_out_of_range_and_wrong_topic_rejected() {
        let (mut state, _) = started(1);
        assert!(submit_option(&mut state, 7).is_err());
        assert!(submit_answer(&mut state, "no-such-topic", true).is_err());
        assert_eq!(state.score().points, 0);
        assert!(state.topic_stats().is_empty());
    }

    #[test]
    fn test_no_presentation_rejected() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut state = QuizState::new("t", questions(1), ScoringPolicy::default(), true, &mut rng);
        assert!(matches!(submit_answer(&mut state, "even", true), Err(QuizError::InvalidState(_))));
    }

    #[test]
    fn test_lose_streak_compounds_across_questions() {
        let mut rng = SmallRng::seed_from_u64(9);
        let qs = vec![Question {
            id: 0,
            topic: "x".to_string(),
            text: "q".to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: "a".to_string(),
            explanation: String::new(),
        }];
        let mut state = QuizState::new("t", qs, ScoringPolicy::default(), true, &mut rng);
        state.score.points = 500;
        state.advance(&mut rng).unwrap();
        let correct = state.current().unwrap().correct_index;
        let wrongs: Vec<usize> = (0..4).filter(|&i| i != correct).collect();
        let deltas: Vec<i64> = wrongs
            .iter()
            .map(|&i| submit_option(&mut state, i).unwrap().delta)
            .collect();
        assert_eq!(deltas, vec![-58, -65, -73]);
        // Total counted once per presentation.
        assert_eq!(state.topic_stats().get("x").unwrap().total, 1);
    }

    #[test]
    fn test_digit_to_option() {
        assert_eq!(digit_to_option('1', 4), Some(0));
        assert_eq!(digit_to_option('4', 4), Some(3));
        assert_eq!(digit_to_option('3', 2), None);
        assert_eq!(digit_to_option('5', 6), None);
        assert_eq!(digit_to_option('0', 4), None);
        assert_eq!(digit_to_option('x', 4), None);
    }
}
