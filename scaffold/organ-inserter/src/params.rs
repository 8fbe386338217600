//! Parameters for an insertion run.

use std::path::Path;

use scaffold_fit::FitPlan;
use scaffold_markers::ExtractOptions;
use serde::{Deserialize, Serialize};

/// What to do when one organ fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failing organ.
    #[default]
    FailFast,
    /// Record the failure and carry on with the next organ.
    Continue,
}

/// Parameters for [`OrganInserter`](crate::OrganInserter).
///
/// # Example
///
/// ```
/// use organ_inserter::{FailurePolicy, InsertParams};
///
/// let params = InsertParams::new()
///     .with_failure_policy(FailurePolicy::Continue)
///     .with_manifest(true);
///
/// assert!(params.is_pretagged("in/Colon_part.exf"));
/// assert!(!params.is_pretagged("in/heart.exf"));
/// assert_eq!(params.organ_keywords[1], "heart");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsertParams {
    /// Organ keywords searched in file basenames, in priority order.
    pub organ_keywords: Vec<String>,

    /// Tokens marking organ files that are already in scaffold coordinates.
    /// Matching files are tagged in place instead of fitted.
    pub pretagged_tokens: Vec<String>,

    /// Behavior when an organ fails.
    pub failure_policy: FailurePolicy,

    /// Fit plan sent to the fitting service.
    pub fit_plan: FitPlan,

    /// Marker extraction options for the scaffold.
    pub markers: ExtractOptions,

    /// Coordinate field of the organ models. Discovery is used when `None`
    /// or when a model has no field of this name.
    pub model_coordinates: Option<String>,

    /// Write the annotation manifest to the output directory.
    pub write_manifest: bool,

    /// Manifest source column; entry 0 is the scaffold, entry `i + 1` the
    /// `i`-th organ.
    pub sources: Vec<String>,
}

impl Default for InsertParams {
    fn default() -> Self {
        Self {
            organ_keywords: Self::DEFAULT_ORGAN_KEYWORDS
                .iter()
                .map(ToString::to_string)
                .collect(),
            pretagged_tokens: Self::DEFAULT_PRETAGGED_TOKENS
                .iter()
                .map(ToString::to_string)
                .collect(),
            failure_policy: FailurePolicy::default(),
            fit_plan: FitPlan::default(),
            markers: ExtractOptions::default(),
            model_coordinates: Some(Self::DEFAULT_MODEL_COORDINATES.to_string()),
            write_manifest: false,
            sources: Self::DEFAULT_SOURCES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl InsertParams {
    /// Default organ keywords.
    pub const DEFAULT_ORGAN_KEYWORDS: [&'static str; 5] =
        ["lung", "heart", "brainstem", "stomach", "bladder"];

    /// Default coordinate field of the organ models.
    pub const DEFAULT_MODEL_COORDINATES: &'static str = "coordinates";

    /// Default pre-tagged tokens.
    pub const DEFAULT_PRETAGGED_TOKENS: [&'static str; 1] = ["colon"];

    /// Default manifest sources, by input position.
    pub const DEFAULT_SOURCES: [&'static str; 7] = [
        "https://doi.org/10.26275/yibc-wyu2",
        "https://doi.org/10.26275/dqpf-gqdt",
        "https://doi.org/10.26275/rets-qdch",
        "https://doi.org/10.26275/dqpf-gqdt",
        "https://doi.org/10.26275/yum2-z4uf",
        "https://doi.org/10.26275/xq3h-ba2b",
        "colon",
    ];

    /// Create parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the organ keywords.
    #[must_use]
    pub fn with_organ_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.organ_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Set the pre-tagged tokens.
    #[must_use]
    pub fn with_pretagged_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pretagged_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Set the failure policy.
    #[must_use]
    pub const fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Set the fit plan.
    #[must_use]
    pub fn with_fit_plan(mut self, plan: FitPlan) -> Self {
        self.fit_plan = plan;
        self
    }

    /// Set the marker extraction options.
    #[must_use]
    pub fn with_markers(mut self, markers: ExtractOptions) -> Self {
        self.markers = markers;
        self
    }

    /// Name the organ models' coordinate field.
    #[must_use]
    pub fn with_model_coordinates(mut self, name: impl Into<String>) -> Self {
        self.model_coordinates = Some(name.into());
        self
    }

    /// Enable or disable the annotation manifest.
    #[must_use]
    pub const fn with_manifest(mut self, enabled: bool) -> Self {
        self.write_manifest = enabled;
        self
    }

    /// Set the manifest sources.
    #[must_use]
    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    /// True if the file name contains a pre-tagged token, ignoring case.
    #[must_use]
    pub fn is_pretagged<P: AsRef<Path>>(&self, path: P) -> bool {
        let Some(name) = path.as_ref().file_name() else {
            return false;
        };
        let name = name.to_string_lossy().to_lowercase();
        self.pretagged_tokens
            .iter()
            .any(|t| !t.is_empty() && name.contains(&t.to_lowercase()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use scaffold_fit::FitStep;

    #[test]
    fn test_default_params() {
        let params = InsertParams::default();
        assert_eq!(params.failure_policy, FailurePolicy::FailFast);
        assert!(!params.write_manifest);
        assert_eq!(params.fit_plan.steps[0], FitStep::align_markers());
        assert_eq!(params.sources.len(), 7);
        assert_eq!(params.model_coordinates.as_deref(), Some("coordinates"));
    }

    #[test]
    fn test_pretagged_only_checks_file_name() {
        let params = InsertParams::default();
        assert!(params.is_pretagged("COLON.exf"));
        assert!(!params.is_pretagged("colon_dir/heart.exf"));
    }

    #[test]
    fn test_builder_chain() {
        let params = InsertParams::new()
            .with_organ_keywords(["kidney"])
            .with_pretagged_tokens(Vec::<String>::new())
            .with_model_coordinates("fitted coordinates");
        assert_eq!(params.organ_keywords, vec!["kidney".to_string()]);
        assert!(!params.is_pretagged("colon.exf"));
        assert_eq!(params.model_coordinates.as_deref(), Some("fitted coordinates"));
    }
}
