//! Question/answer corpus aligned with the vector index
//!
//! The i-th stored vector corresponds to the i-th question and answer.

use crate::error::{RagError, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Aligned question and answer sequences
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QaCorpus {
    questions: Vec<String>,
    answers: Vec<String>,
}

/// One question/answer pair borrowed from the corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QaPair<'a> {
    pub question: &'a str,
    pub answer: &'a str,
}

impl QaPair<'_> {
    /// Render as a markdown Q/A block
    pub fn to_markdown(&self) -> String {
        format!("**Q:** {}\n**A:** {}", self.question, self.answer)
    }
}

impl QaCorpus {
    pub fn new(questions: Vec<String>, answers: Vec<String>) -> Self {
        Self { questions, answers }
    }

    /// Load from a pickled mapping (`.pkl`) or JSON object (`.json`) with
    /// `questions` and `answers` lists
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| RagError::resource(path, e.to_string()))?;
        let reader = BufReader::new(file);

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let corpus: Self = match extension.as_deref() {
            Some("pkl") | Some("pickle") => {
                serde_pickle::from_reader(reader, serde_pickle::DeOptions::new())
                    .map_err(|e| RagError::resource(path, format!("invalid pickle: {}", e)))?
            }
            Some("json") => serde_json::from_reader(reader)
                .map_err(|e| RagError::resource(path, format!("invalid JSON: {}", e)))?,
            _ => {
                return Err(RagError::resource(
                    path,
                    "unsupported text data format (expected .pkl or .json)",
                ))
            }
        };

        if corpus.questions.len() != corpus.answers.len() {
            log::warn!(
                "Text data has {} questions but {} answers; unmatched entries are unreachable",
                corpus.questions.len(),
                corpus.answers.len()
            );
        }

        log::info!(
            "Loaded {} question/answer pairs from {}",
            corpus.len(),
            path.display()
        );

        Ok(corpus)
    }

    /// Pair at an index label, if the label is valid in both sequences
    pub fn entry(&self, label: i64) -> Option<QaPair<'_>> {
        let pos = usize::try_from(label).ok()?;
        let question = self.questions.get(pos)?;
        let answer = self.answers.get(pos)?;
        Some(QaPair { question, answer })
    }

    /// Number of complete pairs
    pub fn len(&self) -> usize {
        self.questions.len().min(self.answers.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }
}
