//! Weighted / regular course classification.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Exact-name overrides that take priority over keyword matching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseClassification {
    #[serde(default)]
    pub weighted: BTreeSet<String>,
    #[serde(default)]
    pub unweighted: BTreeSet<String>,
}

/// Substrings that mark advanced (weighted) courses, checked in order.
/// "AS " keeps its trailing space so words merely containing "AS" don't match.
const WEIGHTED_KEYWORDS: [&str; 3] = ["A Level", "AS ", "AP"];

impl CourseClassification {
    /// Whether a subject is graded on the weighted scale.
    pub fn is_weighted(&self, subject_name: &str) -> bool {
        if self.unweighted.contains(subject_name) {
            return false;
        }
        if self.weighted.contains(subject_name) {
            return true;
        }
        WEIGHTED_KEYWORDS
            .iter()
            .any(|keyword| subject_name.contains(keyword))
    }
}
