//! Requirement comparison against an indexed capability catalog.
//!
//! Given a list of requirements (typically extracted from a tender document)
//! and a [`DocumentIndex`] built over a capability description, the
//! [`Comparator`] looks up the best-matching chunk for each requirement and
//! classifies the match by similarity thresholds. One input requirement always
//! produces exactly one [`ComparisonRow`], so the output lines up with the
//! input for tabular reports.
//!
//! Requirement extraction and report rendering are left to the caller.

use serde::{Deserialize, Serialize};

use tendex_core::EmbeddingModel;
use tendex_index::chunking::Chunker;
use tendex_index::cleaning::Cleaner;
use tendex_index::loader::DocumentLoader;
use tendex_index::persistence::Persistence;
use tendex_index::{Chunk, DocumentIndex, IndexError, Result};

/// One requirement to check against the capability catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    /// Sequential requirement number from the source document.
    pub number: usize,
    /// Module or subject area the requirement belongs to.
    pub module: String,
    /// Requirement text, used as the similarity query.
    pub text: String,
    /// Whether the requirement is mandatory or optional.
    pub mandatory: bool,
}

impl Requirement {
    /// Creates a mandatory requirement.
    #[must_use]
    pub fn new(number: usize, module: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            number,
            module: module.into(),
            text: text.into(),
            mandatory: true,
        }
    }

    /// Marks the requirement as optional.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.mandatory = false;
        self
    }
}

/// How well the catalog covers a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchLevel {
    /// Best hit scored at or above the meets threshold.
    Meets,
    /// Best hit scored between the partial and meets thresholds.
    PartiallyMeets,
    /// No hit, or the best hit scored below the partial threshold.
    DoesNotMeet,
}

/// Similarity cut-offs for classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum score for [`MatchLevel::Meets`].
    pub meets: f32,
    /// Minimum score for [`MatchLevel::PartiallyMeets`].
    pub partial: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            meets: 0.75,
            partial: 0.5,
        }
    }
}

impl Thresholds {
    /// Creates validated thresholds.
    ///
    /// # Errors
    /// Returns [`IndexError::InvalidParameter`] unless
    /// `0.0 <= partial <= meets <= 1.0`.
    pub fn new(meets: f32, partial: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&meets) || !(0.0..=1.0).contains(&partial) || partial > meets {
            return Err(IndexError::InvalidParameter(format!(
                "thresholds must satisfy 0 <= partial ({partial}) <= meets ({meets}) <= 1"
            )));
        }
        Ok(Self { meets, partial })
    }

    fn classify(&self, score: f32) -> MatchLevel {
        if score >= self.meets {
            MatchLevel::Meets
        } else if score >= self.partial {
            MatchLevel::PartiallyMeets
        } else {
            MatchLevel::DoesNotMeet
        }
    }
}

/// Classified outcome for one requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// The requirement that was checked.
    pub requirement: Requirement,
    /// Best-matching catalog chunk, if any hit came back.
    pub matched: Option<Chunk>,
    /// Similarity score of the best hit (0 when no hit).
    pub score: f32,
    /// Classification of the match.
    pub level: MatchLevel,
}

/// Compares requirements against a capability index.
#[derive(Debug, Clone, Copy, Default)]
pub struct Comparator {
    thresholds: Thresholds,
}

impl Comparator {
    /// Creates a comparator with custom thresholds.
    #[must_use]
    pub const fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// Returns the thresholds in use.
    #[must_use]
    pub const fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Checks every requirement against the catalog index.
    ///
    /// Returns one row per requirement, in input order. An empty catalog
    /// classifies everything as [`MatchLevel::DoesNotMeet`] with score zero.
    ///
    /// # Errors
    /// Propagates [`IndexError::InvalidParameter`] for a requirement with
    /// empty text and [`IndexError::EmbeddingUnavailable`] if a query cannot
    /// be embedded.
    pub async fn compare<M, C, L, P, D>(
        &self,
        catalog: &DocumentIndex<M, C, L, P, D>,
        requirements: &[Requirement],
    ) -> Result<Vec<ComparisonRow>>
    where
        M: EmbeddingModel + Send + Sync + 'static,
        C: Chunker,
        L: Cleaner,
        P: Persistence,
        D: DocumentLoader,
    {
        let mut rows = Vec::with_capacity(requirements.len());
        for requirement in requirements {
            let row = if catalog.is_empty() {
                ComparisonRow {
                    requirement: requirement.clone(),
                    matched: None,
                    score: 0.0,
                    level: MatchLevel::DoesNotMeet,
                }
            } else {
                let best = catalog
                    .search_with_k(&requirement.text, 1)
                    .await?
                    .into_iter()
                    .next();
                match best {
                    Some(hit) => ComparisonRow {
                        requirement: requirement.clone(),
                        matched: Some(hit.chunk),
                        score: hit.score,
                        level: self.thresholds.classify(hit.score),
                    },
                    None => ComparisonRow {
                        requirement: requirement.clone(),
                        matched: None,
                        score: 0.0,
                        level: MatchLevel::DoesNotMeet,
                    },
                }
            };
            tracing::debug!(
                number = row.requirement.number,
                score = row.score,
                level = ?row.level,
                "requirement classified"
            );
            rows.push(row);
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    /// Embeds by keyword counts so similarity is fully controlled.
    #[derive(Clone, Copy)]
    struct KeywordEmbedder;

    impl EmbeddingModel for KeywordEmbedder {
        fn dim(&self) -> usize {
            4
        }

        async fn embed(&self, text: &str) -> tendex_core::Result<Vec<f32>> {
            let mut vector = vec![0.0f32; 4];
            for word in text.split_whitespace() {
                match word {
                    "alpha" => vector[0] += 1.0,
                    "beta" => vector[1] += 1.0,
                    "gamma" => vector[2] += 1.0,
                    _ => vector[3] += 1.0,
                }
            }
            Ok(vector)
        }
    }

    async fn catalog_with(content: &str) -> (tempfile::TempDir, DocumentIndex<KeywordEmbedder>) {
        let dir = tempdir().unwrap();
        let doc = dir.path().join("catalog.txt");
        fs::write(&doc, content).unwrap();
        let index = DocumentIndex::builder(KeywordEmbedder)
            .index_path(dir.path().join("catalog.redb"))
            .build()
            .unwrap();
        index.ensure(&doc).await.unwrap();
        (dir, index)
    }

    #[tokio::test]
    async fn classifies_by_thresholds() {
        let (_dir, catalog) = catalog_with("alpha").await;
        let comparator = Comparator::default();

        let requirements = [
            Requirement::new(1, "core", "alpha"),
            Requirement::new(2, "core", "alpha beta"),
            Requirement::new(3, "core", "gamma").optional(),
        ];
        let rows = comparator.compare(&catalog, &requirements).await.unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].level, MatchLevel::Meets);
        assert!((rows[0].score - 1.0).abs() < 1e-5);
        // cos(alpha, alpha+beta) = 1/sqrt(2), between the two cut-offs.
        assert_eq!(rows[1].level, MatchLevel::PartiallyMeets);
        assert_eq!(rows[2].level, MatchLevel::DoesNotMeet);
        assert!(rows[2].score.abs() < 1e-5);
    }

    #[tokio::test]
    async fn empty_catalog_never_meets() {
        let (_dir, catalog) = catalog_with("").await;
        let rows = Comparator::default()
            .compare(&catalog, &[Requirement::new(1, "core", "alpha")])
            .await
            .unwrap();
        assert_eq!(rows[0].level, MatchLevel::DoesNotMeet);
        assert!(rows[0].matched.is_none());
        assert!(rows[0].score.abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn one_row_per_requirement_in_order() {
        let (_dir, catalog) = catalog_with("alpha beta gamma").await;
        let requirements: Vec<_> = (1..=5)
            .map(|n| Requirement::new(n, "m", "alpha"))
            .collect();
        let rows = Comparator::default()
            .compare(&catalog, &requirements)
            .await
            .unwrap();
        let numbers: Vec<_> = rows.iter().map(|r| r.requirement.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn threshold_validation() {
        assert!(Thresholds::new(0.8, 0.4).is_ok());
        assert!(Thresholds::new(0.4, 0.8).is_err());
        assert!(Thresholds::new(1.2, 0.4).is_err());
    }

    #[test]
    fn match_level_serializes_snake_case() {
        let json = serde_json::to_string(&MatchLevel::PartiallyMeets).unwrap();
        assert_eq!(json, r#""partially_meets""#);
    }
}
