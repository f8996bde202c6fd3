//! Scoring configuration and its builder.
//!
//! The options mirror the keyword arguments a caller passes to the scorers:
//! which multiclass AUC strategy to use, whether to report standard errors,
//! whether store weights are honoured, the β of the F-beta score and an
//! optional probability cutoff for binary confusion matrices.

use crate::config::ConfigFormat;
use crate::core::constants::*;
use crate::core::error::{EvalError, Result};
use crate::core::types::*;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options shared by every scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Strategy used by [`crate::metrics::auc::auc`] on stores with more than two classes
    pub multiclass: MulticlassStrategy,
    /// Attach a standard error to accuracy scores
    pub report_se: bool,
    /// Treat every instance as weight 1.0 even if the store carries weights
    pub ignore_weights: bool,
    /// β for the F-beta score
    pub beta: f64,
    /// When set, a binary confusion matrix counts an instance as predicted
    /// positive iff its positive-class probability exceeds the cutoff
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cutoff: Option<f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            multiclass: MulticlassStrategy::default(),
            report_se: false,
            ignore_weights: false,
            beta: DEFAULT_FBETA,
            cutoff: None,
        }
    }
}

impl ScoringConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.beta.is_finite() || self.beta <= 0.0 {
            return Err(EvalError::invalid_parameter(
                "beta",
                self.beta.to_string(),
                "must be a positive finite number",
            ));
        }

        if let Some(cutoff) = self.cutoff {
            if !(0.0..=1.0).contains(&cutoff) {
                return Err(EvalError::invalid_parameter(
                    "cutoff",
                    cutoff.to_string(),
                    "must be in range [0.0, 1.0]",
                ));
            }
        }

        Ok(())
    }

    /// Load configuration from a `.toml` or `.json` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: ScoringConfig = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };
        config.validate()?;

        log::debug!("Loaded scoring config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a `.toml` or `.json` file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// The β used by the F-beta score.
    pub fn beta(&self) -> f64 {
        self.beta
    }
}

/// Builder for [`ScoringConfig`].
#[derive(Debug, Default)]
pub struct ScoringConfigBuilder {
    config: ScoringConfig,
    validation_errors: Vec<String>,
}

impl ScoringConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        ScoringConfigBuilder {
            config: ScoringConfig::default(),
            validation_errors: Vec::new(),
        }
    }

    /// Set the multiclass AUC strategy
    pub fn multiclass(mut self, strategy: MulticlassStrategy) -> Self {
        self.config.multiclass = strategy;
        self
    }

    /// Request standard errors alongside accuracy
    pub fn report_se(mut self, report_se: bool) -> Self {
        self.config.report_se = report_se;
        self
    }

    /// Ignore store weights
    pub fn ignore_weights(mut self, ignore: bool) -> Self {
        self.config.ignore_weights = ignore;
        self
    }

    /// Set β for the F-beta score
    pub fn beta(mut self, beta: f64) -> Self {
        if !beta.is_finite() || beta <= 0.0 {
            self.validation_errors
                .push("beta must be a positive finite number".to_string());
        }
        self.config.beta = beta;
        self
    }

    /// Set the probability cutoff for binary confusion matrices
    pub fn cutoff(mut self, cutoff: f64) -> Self {
        if !(0.0..=1.0).contains(&cutoff) {
            self.validation_errors
                .push("cutoff must be in range [0.0, 1.0]".to_string());
        }
        self.config.cutoff = Some(cutoff);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ScoringConfig> {
        if !self.validation_errors.is_empty() {
            return Err(EvalError::config(self.validation_errors.join("; ")));
        }
        self.config.validate()?;
        Ok(self.config)
    }
}
