//! Tagged tokens.

/// A surface form and its part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    surface: String,
    tag: String,
}

impl Token {
    pub fn new(surface: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            tag: tag.into(),
        }
    }

    pub fn surface(&self) -> &str {
        &self.surface
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl<S: Into<String>, T: Into<String>> From<(S, T)> for Token {
    fn from((surface, tag): (S, T)) -> Self {
        Token::new(surface, tag)
    }
}

/// Tokens of a single text unit, in text order.
pub type TaggedSequence = Vec<Token>;
