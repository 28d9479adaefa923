pub mod validate;

use std::fs;
use std::path::Path;

use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::error::{QuizError, QuizResult};

pub use validate::{BankIssue, IssueKind, validate};

#[derive(Embed)]
#[folder = "assets/banks/"]
struct BankAssets;

const SAMPLE_BANK: &str = "sample.json";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TestBank {
    #[serde(default)]
    pub tests: Vec<TestDef>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDef {
    pub test_name: String,
    #[serde(default)]
    pub topics: Vec<TopicDef>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TopicDef {
    pub topic: String,
    #[serde(default)]
    pub questions: Vec<QuestionDef>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDef {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

/// A flattened bank entry. `id` is the position within its test.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: usize,
    pub topic: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

impl TestBank {
    pub fn from_json(json: &str) -> QuizResult<Self> {
        serde_json::from_str(json).map_err(|e| QuizError::Bank(e.to_string()))
    }

    pub fn load(path: &Path) -> QuizResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| QuizError::Bank(format!("{}: {e}", path.display())))?;
        Self::from_json(&content)
    }

    /// The sample bank bundled into the binary.
    pub fn embedded_sample() -> QuizResult<Self> {
        let file = BankAssets::get(SAMPLE_BANK)
            .ok_or_else(|| QuizError::Bank(format!("missing bundled {SAMPLE_BANK}")))?;
        let content = std::str::from_utf8(file.data.as_ref())
            .map_err(|e| QuizError::Bank(e.to_string()))?;
        Self::from_json(content)
    }
}

impl TestDef {
    pub fn questions(&self) -> Vec<Question> {
        self.topics
            .iter()
            .flat_map(|topic| topic.questions.iter().map(move |q| (topic.topic.as_str(), q)))
            .enumerate()
            .map(|(id, (topic, q))| Question {
                id,
                topic: topic.to_string(),
                text: q.question.clone(),
                options: q.options.clone(),
                correct_answer: q.correct_answer.clone(),
                explanation: q.explanation.clone(),
            })
            .collect()
    }

    pub fn question_count(&self) -> usize {
        self.topics.iter().map(|t| t.questions.len()).sum()
    }
}
