//! Translation quality scoring.
//!
//! Scores come from an external reference-based scorer (BLEURT). Nothing is
//! computed here beyond rounding the returned value to three decimals and
//! mapping it onto the legend bands shown to users.

mod bleurt;

pub use bleurt::BleurtClient;

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::error::{Error, Result};
use crate::util::round3;

/// Score legend shown next to the quality label, in Markdown.
pub const SCORE_LEGEND: &str = "🔍 **BLEURT Score Legend**
- **0.80 – 1.00**: Excellent translation
- **0.60 – 0.79**: Good, minor issues
- **0.40 – 0.59**: Fair, some errors
- **Below 0.40**: Poor quality
";

/// External scorer comparing candidates against references.
///
/// Implementations receive parallel lists of equal length and return one
/// score per pair. Argument order matters: BLEURT is not symmetric.
#[async_trait]
pub trait ScorerService: Send + Sync {
    /// Get the scorer name
    fn name(&self) -> &'static str;

    async fn score_batch(&self, references: &[String], candidates: &[String]) -> Result<Vec<f64>>;
}

/// Scores one translation at a time against its source text.
#[derive(Clone)]
pub struct QualityScorer {
    service: Arc<dyn ScorerService>,
}

impl QualityScorer {
    pub fn new(service: Arc<dyn ScorerService>) -> Self {
        Self { service }
    }

    /// Score `candidate` against `reference`, rounded to three decimals.
    ///
    /// The value is passed through as the scorer returned it; it is not
    /// clamped to the legend's `[0, 1]` range.
    pub async fn score(&self, reference: &str, candidate: &str) -> Result<f64> {
        let references = [reference.to_string()];
        let candidates = [candidate.to_string()];

        let scores = self.service.score_batch(&references, &candidates).await?;

        let [raw] = scores.as_slice() else {
            return Err(Error::ScoringUnavailable(format!(
                "{} returned {} scores for 1 pair",
                self.service.name(),
                scores.len()
            )));
        };

        if !raw.is_finite() {
            return Err(Error::ScoringUnavailable(format!(
                "{} returned a non-finite score",
                self.service.name()
            )));
        }

        debug!("{} raw score {}", self.service.name(), raw);
        Ok(round3(*raw))
    }
}

/// The score field of a translation result: a number or a failure message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QualityScore {
    Score(f64),
    Unavailable(String),
}

impl QualityScore {
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Score(v) => Some(*v),
            Self::Unavailable(_) => None,
        }
    }

    pub fn band(&self) -> Option<ScoreBand> {
        self.value().map(ScoreBand::classify)
    }
}

impl std::fmt::Display for QualityScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Score(v) => write!(f, "{v}"),
            Self::Unavailable(msg) => write!(f, "{msg}"),
        }
    }
}

/// Legend band a score falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    /// Bands in legend order, best first
    pub const ALL: [Self; 4] = [Self::Excellent, Self::Good, Self::Fair, Self::Poor];

    pub fn classify(score: f64) -> Self {
        if score >= 0.80 {
            Self::Excellent
        } else if score >= 0.60 {
            Self::Good
        } else if score >= 0.40 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent translation",
            Self::Good => "Good, minor issues",
            Self::Fair => "Fair, some errors",
            Self::Poor => "Poor quality",
        }
    }

    /// Score range as printed in the legend
    pub const fn range_label(self) -> &'static str {
        match self {
            Self::Excellent => "0.80 – 1.00",
            Self::Good => "0.60 – 0.79",
            Self::Fair => "0.40 – 0.59",
            Self::Poor => "Below 0.40",
        }
    }

    /// CSS class used by the web UI
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Excellent => "score-excellent",
            Self::Good => "score-good",
            Self::Fair => "score-fair",
            Self::Poor => "score-poor",
        }
    }
}

impl std::fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}
