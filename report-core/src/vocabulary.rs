//! Fixed, ordered vocabulary of explainable domain terms.

use std::sync::Arc;

use crate::error_handler::VocabularyError;

/// Terms known to the inspection report page, in priority order.
///
/// `미세누유` precedes `누유` so the longer term claims its region first.
pub const DEFAULT_TERMS: [&str; 11] = [
    "미세누유",
    "누유",
    "판금",
    "용접",
    "교환",
    "부식",
    "침수",
    "주요 골격",
    "DPF",
    "DCT",
    "MDPS",
];

/// Immutable ordered set of explainable terms.
///
/// Duplicates are dropped keeping the first occurrence, so the order of first
/// registration is the matching priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    terms: Arc<[String]>,
}

impl Vocabulary {
    /// Builds a vocabulary from an ordered list of terms.
    ///
    /// # Errors
    /// - [`VocabularyError::Empty`] when no term is given
    /// - [`VocabularyError::EmptyTerm`] when a term is the empty string
    pub fn new<I, S>(terms: I) -> Result<Self, VocabularyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for (i, term) in terms.into_iter().enumerate() {
            let term = term.into();
            if term.is_empty() {
                return Err(VocabularyError::EmptyTerm(i));
            }
            if !out.contains(&term) {
                out.push(term);
            }
        }
        if out.is_empty() {
            return Err(VocabularyError::Empty);
        }
        Ok(Self { terms: out.into() })
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            terms: DEFAULT_TERMS.iter().map(|t| t.to_string()).collect(),
        }
    }
}
