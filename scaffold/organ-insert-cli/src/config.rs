//! Run configuration files.
//!
//! A TOML file holding [`InsertParams`]; every key is optional.
//!
//! ```toml
//! failure_policy = "continue"
//! write_manifest = true
//! organ_keywords = ["lung", "heart", "kidney"]
//!
//! [markers]
//! extension = "exf"
//!
//! [[fit_plan.steps]]
//! kind = "align"
//! markers = true
//! scale = true
//!
//! [[fit_plan.steps]]
//! kind = "fit"
//! strain_penalty = 0.001
//! curvature_penalty = 200.0
//! data_weight = 1000.0
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use organ_inserter::InsertParams;

/// Load parameters from a TOML file.
pub fn load_params(path: &Path) -> Result<InsertParams> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    parse_params(&text).with_context(|| format!("Invalid config {}", path.display()))
}

/// Parse parameters from TOML text.
pub fn parse_params(text: &str) -> Result<InsertParams> {
    Ok(toml::from_str(text)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use organ_inserter::{FailurePolicy, FitStep};

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse_params("").unwrap(), InsertParams::default());
    }

    #[test]
    fn reads_policy_and_plan() {
        let params = parse_params(
            r#"
            failure_policy = "continue"
            pretagged_tokens = ["colon", "oesophagus"]

            [[fit_plan.steps]]
            kind = "align"
            markers = true
            scale = false

            [[fit_plan.steps]]
            kind = "fit"
            strain_penalty = 0.01
            curvature_penalty = 100.0
            data_weight = 500.0
            "#,
        )
        .unwrap();

        assert_eq!(params.failure_policy, FailurePolicy::Continue);
        assert!(params.is_pretagged("oesophagus.exf"));
        assert_eq!(
            params.fit_plan.steps,
            vec![
                FitStep::Align {
                    markers: true,
                    scale: false
                },
                FitStep::Fit {
                    strain_penalty: 0.01,
                    curvature_penalty: 100.0,
                    data_weight: 500.0
                },
            ]
        );
        assert_eq!(params.organ_keywords, InsertParams::default().organ_keywords);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(parse_params("failure_policy = \"sometimes\"").is_err());
    }

    #[test]
    fn missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_params(&dir.path().join("run.toml")).unwrap_err();
        assert!(err.to_string().contains("run.toml"));
    }
}
