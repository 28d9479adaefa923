use std::collections::HashSet;
use std::fmt;

use crate::bank::TestBank;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssueKind {
    EmptyQuestion,
    TooFewOptions,
    DuplicateOption,
    CorrectAnswerMissing,
    PlaceholderExplanation,
}

impl IssueKind {
    pub fn describe(self) -> &'static str {
        match self {
            IssueKind::EmptyQuestion => "question text is empty",
            IssueKind::TooFewOptions => "fewer than two options",
            IssueKind::DuplicateOption => "duplicate option",
            IssueKind::CorrectAnswerMissing => "correctAnswer not among options",
            IssueKind::PlaceholderExplanation => "placeholder explanation",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BankIssue {
    pub test: String,
    pub topic_index: usize,
    pub question_index: usize,
    pub kind: IssueKind,
}

impl fmt::Display for BankIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: topics[{}].questions[{}] {}",
            self.test,
            self.topic_index,
            self.question_index,
            self.kind.describe()
        )
    }
}

fn is_placeholder(explanation: &str) -> bool {
    let lower = explanation.to_lowercase();
    ["auto-generated", "auto generated", "autogenerated"]
        .iter()
        .any(|p| lower.contains(p))
}

/// Report malformed questions. Nothing is dropped; a question whose correct
/// answer is missing still reaches the queue and fails there.
pub fn validate(bank: &TestBank) -> Vec<BankIssue> {
    let mut issues = Vec::new();
    for test in &bank.tests {
        for (topic_index, topic) in test.topics.iter().enumerate() {
            for (question_index, q) in topic.questions.iter().enumerate() {
                let mut push = |kind| {
                    issues.push(BankIssue {
                        test: test.test_name.clone(),
                        topic_index,
                        question_index,
                        kind,
                    })
                };

                if q.question.trim().is_empty() {
                    push(IssueKind::EmptyQuestion);
                }
                if q.options.len() < 2 {
                    push(IssueKind::TooFewOptions);
                }
                let mut seen = HashSet::new();
                if q.options.iter().any(|o| !seen.insert(o.as_str())) {
                    push(IssueKind::DuplicateOption);
                }
                if !q.options.contains(&q.correct_answer) {
                    push(IssueKind::CorrectAnswerMissing);
                }
                if is_placeholder(&q.explanation) {
                    push(IssueKind::PlaceholderExplanation);
                }
            }
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::tests::TWO_TOPICS;

    fn bank_with(question: &str) -> TestBank {
        let json = format!(
            r#"{{"tests": [{{"testName": "T", "topics": [{{"topic": "A", "questions": [{question}]}}]}}]}}"#
        );
        TestBank::from_json(&json).unwrap()
    }

    #[test]
    fn test_clean_bank_has_no_issues() {
        let bank = TestBank::from_json(TWO_TOPICS).unwrap();
        assert!(validate(&bank).is_empty());
    }

    #[test]
    fn test_missing_correct_answer_reported() {
        let bank = bank_with(
            r#"{"question": "q", "options": ["a", "b"], "correctAnswer": "c", "explanation": "x"}"#,
        );
        let issues = validate(&bank);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::CorrectAnswerMissing);
        assert_eq!(issues[0].to_string(), "T: topics[0].questions[0] correctAnswer not among options");
    }

    #[test]
    fn test_degenerate_question_reports_each_problem() {
        let bank = bank_with(
            r#"{"question": " ", "options": ["a"], "correctAnswer": "a", "explanation": "Auto-Generated"}"#,
        );
        let kinds: Vec<IssueKind> = validate(&bank).into_iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::EmptyQuestion,
                IssueKind::TooFewOptions,
                IssueKind::PlaceholderExplanation
            ]
        );
    }

    #[test]
    fn test_duplicate_options_reported() {
        let bank = bank_with(
            r#"{"question": "q", "options": ["a", "a", "b"], "correctAnswer": "b", "explanation": "x"}"#,
        );
        let issues = validate(&bank);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::DuplicateOption);
    }
}
