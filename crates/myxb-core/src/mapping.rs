//! Score-to-GPA band tables and lookups.
//!
//! Two ordered band lists exist, one for weighted and one for regular
//! courses. The first entry of each list is the highest band; lookups scan
//! linearly and never re-sort.

use serde::{Deserialize, Serialize};

/// One row of a score mapping table. Both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBand {
    pub min_value: f64,
    pub max_value: f64,
    /// Letter level, e.g. "A+".
    pub level: String,
    pub gpa: f64,
}

impl ScoreBand {
    pub fn contains(&self, score: f64) -> bool {
        score >= self.min_value && score <= self.max_value
    }
}

/// The weighted and non-weighted band lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMappings {
    pub weighted: Vec<ScoreBand>,
    #[serde(alias = "non-weighted")]
    pub non_weighted: Vec<ScoreBand>,
}

/// Round to one decimal place, halves away from zero.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl ScoreMappings {
    pub fn bands(&self, is_weighted: bool) -> &[ScoreBand] {
        if is_weighted {
            &self.weighted
        } else {
            &self.non_weighted
        }
    }

    /// GPA for a score, looked up after rounding the score to one decimal.
    ///
    /// Returns `None` when no band contains the rounded score.
    pub fn score_to_gpa(&self, score: f64, is_weighted: bool) -> Option<f64> {
        let rounded = round_to_tenth(score);
        let gpa = self
            .bands(is_weighted)
            .iter()
            .find(|band| band.contains(rounded))
            .map(|band| band.gpa);
        if gpa.is_none() {
            tracing::warn!(score, rounded, is_weighted, "score matches no GPA band");
        }
        gpa
    }

    /// Letter level for a score.
    ///
    /// Unlike [`score_to_gpa`](Self::score_to_gpa) the score is compared
    /// unrounded, so the two can disagree right below a band edge.
    pub fn score_level(&self, score: f64, is_weighted: bool) -> Option<&str> {
        self.bands(is_weighted)
            .iter()
            .find(|band| band.contains(score))
            .map(|band| band.level.as_str())
    }

    /// GPA of the first (highest) band.
    ///
    /// Band lists are validated non-empty at load time; an empty list yields 0.
    pub fn max_gpa(&self, is_weighted: bool) -> f64 {
        self.bands(is_weighted)
            .first()
            .map(|band| band.gpa)
            .unwrap_or(0.0)
    }
}
