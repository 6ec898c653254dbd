//! Grading configuration: score bands, course classification, and credit rules.
//!
//! Loaded once at startup from TOML (or JSON, by file extension) and passed
//! by reference to everything that needs it. A malformed configuration is a
//! [`ConfigError`] and must stop the process.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classifier::CourseClassification;
use crate::error::ConfigError;
use crate::mapping::{ScoreBand, ScoreMappings};

/// The grading configuration shipped with myxb.
pub const DEFAULT_GRADING_TOML: &str = include_str!("../data/grading.toml");

/// Immutable grading data shared by the classifier, resolver, and processor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradingConfig {
    #[serde(flatten)]
    pub mappings: ScoreMappings,
    pub classification: CourseClassification,
    /// Subjects always counted at half credit.
    pub half_weight_subjects: Vec<String>,
    /// Subject names containing this keyword are electives.
    pub elective_keyword: String,
}

/// On-disk layout of a grading file.
#[derive(Debug, Deserialize)]
struct RawGradingConfig {
    weighted: Vec<ScoreBand>,
    #[serde(alias = "non-weighted")]
    non_weighted: Vec<ScoreBand>,
    #[serde(default)]
    classification: CourseClassification,
    #[serde(default = "default_half_weight_subjects")]
    half_weight_subjects: Vec<String>,
    #[serde(default = "default_elective_keyword")]
    elective_keyword: String,
}

impl From<RawGradingConfig> for GradingConfig {
    fn from(raw: RawGradingConfig) -> Self {
        Self {
            mappings: ScoreMappings {
                weighted: raw.weighted,
                non_weighted: raw.non_weighted,
            },
            classification: raw.classification,
            half_weight_subjects: raw.half_weight_subjects,
            elective_keyword: raw.elective_keyword,
        }
    }
}

fn default_half_weight_subjects() -> Vec<String> {
    vec!["C-Humanities".to_string()]
}

fn default_elective_keyword() -> String {
    "Ele".to_string()
}

impl GradingConfig {
    /// The embedded default configuration.
    pub fn builtin() -> Result<Self, ConfigError> {
        parse_grading_toml(DEFAULT_GRADING_TOML, "<builtin>")
    }

    /// Whether a subject is weighted, honouring the explicit override lists.
    pub fn is_weighted(&self, subject_name: &str) -> bool {
        self.classification.is_weighted(subject_name)
    }

    /// Whether a subject name marks an elective course.
    pub fn is_elective(&self, subject_name: &str) -> bool {
        !self.elective_keyword.is_empty() && subject_name.contains(&self.elective_keyword)
    }

    pub fn is_half_weight(&self, subject_name: &str) -> bool {
        self.half_weight_subjects.iter().any(|s| s == subject_name)
    }
}

/// Load a grading configuration from a file.
///
/// Files ending in `.json` are parsed as JSON, everything else as TOML.
pub fn load_grading_config(path: &Path) -> Result<GradingConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let source_name = path.display().to_string();

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let config = if is_json {
        parse_grading_json(&content, &source_name)?
    } else {
        parse_grading_toml(&content, &source_name)?
    };

    tracing::debug!(
        path = %path.display(),
        weighted_bands = config.mappings.weighted.len(),
        non_weighted_bands = config.mappings.non_weighted.len(),
        "loaded grading config"
    );
    Ok(config)
}

/// Load from an explicit path, or fall back to the embedded default.
pub fn load_grading_config_or_builtin(path: Option<&Path>) -> Result<GradingConfig, ConfigError> {
    match path {
        Some(p) => load_grading_config(p),
        None => GradingConfig::builtin(),
    }
}

/// Parse and validate a TOML grading configuration.
pub fn parse_grading_toml(content: &str, source_name: &str) -> Result<GradingConfig, ConfigError> {
    let raw: RawGradingConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })?;
    let config = GradingConfig::from(raw);
    validate(&config)?;
    Ok(config)
}

/// Parse and validate a JSON grading configuration.
pub fn parse_grading_json(content: &str, source_name: &str) -> Result<GradingConfig, ConfigError> {
    let raw: RawGradingConfig = serde_json::from_str(content).map_err(|e| ConfigError::Parse {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })?;
    let config = GradingConfig::from(raw);
    validate(&config)?;
    Ok(config)
}

fn validate(config: &GradingConfig) -> Result<(), ConfigError> {
    validate_bands("weighted", &config.mappings.weighted)?;
    validate_bands("non_weighted", &config.mappings.non_weighted)?;
    Ok(())
}

fn validate_bands(list: &str, bands: &[ScoreBand]) -> Result<(), ConfigError> {
    if bands.is_empty() {
        return Err(ConfigError::EmptyBands(list.to_string()));
    }

    let invalid = |index: usize, reason: String| ConfigError::InvalidBand {
        list: list.to_string(),
        index,
        reason,
    };

    for (index, band) in bands.iter().enumerate() {
        if !band.min_value.is_finite() || !band.max_value.is_finite() {
            return Err(invalid(index, "bounds must be finite".into()));
        }
        if band.min_value > band.max_value {
            return Err(invalid(
                index,
                format!(
                    "min_value {} exceeds max_value {}",
                    band.min_value, band.max_value
                ),
            ));
        }
        if !band.gpa.is_finite() {
            return Err(invalid(index, "gpa must be finite".into()));
        }
    }

    if bands.iter().skip(1).any(|b| b.gpa > bands[0].gpa) {
        tracing::warn!(list, "first band is not the highest GPA; max GPA will be understated");
    }
    Ok(())
}
