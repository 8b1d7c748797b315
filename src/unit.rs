//! Text units: one document or sentence, its metadata and its phrase result.

/// Free-form descriptive fields carried through to the artifacts untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub doc_id: Option<String>,
    pub date: Option<String>,
    pub category: Option<String>,
    pub source: Option<String>,
}

/// Outcome of phrase extraction for a single unit.
///
/// Keeps "no phrase found" (`Phrases(vec![])`) apart from "tagging failed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitResult {
    Phrases(Vec<String>),
    Failed(String),
}

impl UnitResult {
    /// Phrases, empty if tagging failed.
    pub fn phrases(&self) -> &[String] {
        match self {
            UnitResult::Phrases(p) => p,
            UnitResult::Failed(_) => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            UnitResult::Phrases(_) => None,
            UnitResult::Failed(reason) => Some(reason),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, UnitResult::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUnit {
    content: String,
    metadata: Metadata,
    result: Option<UnitResult>,
}

impl TextUnit {
    pub fn new(content: String, metadata: Metadata) -> Self {
        Self {
            content,
            metadata,
            result: None,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn result(&self) -> Option<&UnitResult> {
        self.result.as_ref()
    }

    /// Attach the phrase result.
    pub fn set_result(&mut self, result: UnitResult) {
        self.result = Some(result);
    }

    pub fn with_result(mut self, result: UnitResult) -> Self {
        self.set_result(result);
        self
    }
}

impl From<&str> for TextUnit {
    fn from(content: &str) -> Self {
        TextUnit::new(content.to_string(), Metadata::default())
    }
}
