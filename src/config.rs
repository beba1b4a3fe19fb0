use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::errors::FaldiscoError;

/// All tunables from spec.md §6, with the documented defaults. Loaded from an
/// optional TOML file and then overridden by explicit CLI flags in `main.rs`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FaldiscoConfig {
    pub sample_size: usize,
    pub key_min_value_count: u64,
    pub key_max_value_count: u64,

    pub constant_value_threshold: f64,
    pub sparse_value_threshold: f64,
    pub unique_selectivity_threshold: f64,

    pub field_exact_match_threshold: f64,
    pub field_row_alignment_threshold: f64,
    pub field_value_alignment_threshold: f64,
    pub field_sparse_non_mfv_alignment_threshold: f64,

    pub alignment_value_row_match_threshold: f64,
    pub alignment_selectivity_ratio_threshold: f64,

    /// `r__x` / `t__y` column names an operator wants logged at `debug!`
    /// instead of `trace!` even when global tracing is off. Never read from
    /// the config file; only ever populated from repeated `--trace-field`
    /// CLI flags.
    #[serde(skip)]
    pub trace_fields: Vec<String>,
}

impl Default for FaldiscoConfig {
    fn default() -> Self {
        FaldiscoConfig {
            sample_size: 2000,
            key_min_value_count: 1,
            key_max_value_count: 1,

            constant_value_threshold: 0.99,
            sparse_value_threshold: 0.95,
            unique_selectivity_threshold: 0.8,

            field_exact_match_threshold: 0.4,
            field_row_alignment_threshold: 0.4,
            field_value_alignment_threshold: 0.6,
            field_sparse_non_mfv_alignment_threshold: 0.9,

            alignment_value_row_match_threshold: 0.3,
            alignment_selectivity_ratio_threshold: 0.0,

            trace_fields: Vec::new(),
        }
    }
}

impl FaldiscoConfig {
    pub fn from_file(path: &Path) -> Result<Self, FaldiscoError> {
        let text = fs::read_to_string(path)?;
        let cfg: FaldiscoConfig = toml::from_str(&text)?;
        Ok(cfg)
    }

    pub fn is_traced(&self, field: &str) -> bool {
        self.trace_fields.iter().any(|f| f == field)
    }
}
