use ahash::AHashMap;
use indexmap::IndexMap;
use log::{debug, info};
use serde::Serialize;

use crate::calculator::{calc, calc_sparse};
use crate::classifier::classify_fields;
use crate::combination::CombinationSet;
use crate::config::FaldiscoConfig;
use crate::cooccurrence::CoOccurrenceTable;
use crate::profiler::{profile_field, FieldProfile};
use crate::sample::{is_nan_like, strip_field_prefix, Sample, FALDISCO_NAN};
use crate::selector;

/// Labels an output row's table columns with; never touched by the core
/// algorithm, just threaded through to the CSV writers.
#[derive(Debug, Clone)]
pub struct TableLabels {
    pub reference_table_namespace: String,
    pub reference_table_name: String,
    pub target_table_namespace: String,
    pub target_table_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlignmentType {
    ExactMatch,
    Alignment,
    SparseExactMatch,
    SparseAlignment,
    SparseNonMfvAlignment,
}

impl AlignmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlignmentType::ExactMatch => "exact_match",
            AlignmentType::Alignment => "alignment",
            AlignmentType::SparseExactMatch => "sparse_exact_match",
            AlignmentType::SparseAlignment => "sparse_alignment",
            AlignmentType::SparseNonMfvAlignment => "sparse_non_mfv_alignment",
        }
    }
}

/// target_field -> ref_field -> alignment_type -> strength, the candidate
/// pool the selector dominance algorithm runs over. Insertion-ordered so
/// output is deterministic across runs on the same sample.
#[derive(Default)]
pub struct PotentialMatches {
    by_target: IndexMap<String, IndexMap<String, IndexMap<AlignmentType, f64>>>,
}

impl PotentialMatches {
    pub fn add_match(&mut self, rf: &str, tf: &str, kind: AlignmentType, strength: f64) {
        self.by_target
            .entry(tf.to_string())
            .or_default()
            .entry(rf.to_string())
            .or_default()
            .insert(kind, strength);
    }

    pub fn target_fields(&self) -> impl Iterator<Item = &str> {
        self.by_target.keys().map(|s| s.as_str())
    }

    pub fn refs_for(&self, tf: &str) -> Vec<&str> {
        match self.by_target.get(tf) {
            Some(m) => m.keys().map(|s| s.as_str()).collect(),
            None => Vec::new(),
        }
    }

    pub fn strength(&self, tf: &str, rf: &str, kind: AlignmentType) -> Option<f64> {
        self.by_target.get(tf)?.get(rf)?.get(&kind).copied()
    }

    pub fn kinds_for(&self, tf: &str, rf: &str) -> Vec<(AlignmentType, f64)> {
        match self.by_target.get(tf).and_then(|m| m.get(rf)) {
            Some(m) => m.iter().map(|(k, v)| (*k, *v)).collect(),
            None => Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FieldAlignmentRow {
    pub reference_table_namespace: String,
    pub reference_table_name: String,
    pub reference_field_name: String,
    pub target_table_namespace: String,
    pub target_table_name: String,
    pub target_field_name: String,
    pub alignment_type: String,
    pub alignment_strength: f64,
}

#[derive(Debug, Serialize)]
pub struct ValueAlignmentRow {
    pub reference_table_namespace: String,
    pub reference_table_name: String,
    pub reference_field_name: String,
    pub target_table_namespace: String,
    pub target_table_name: String,
    pub target_field_name: String,
    pub alignment_type: String,
    pub reference_field_value: String,
    pub target_field_value: String,
    pub alignment_count: u64,
    pub misalignment_count: u64,
}

#[derive(Debug, Serialize)]
pub struct ProfileRow {
    pub table_namespace: String,
    pub table_name: String,
    pub field_name: String,
    pub num_rows: usize,
    pub cardinality: usize,
    pub selectivity: f64,
    pub mfv_count: usize,
    pub min_len: i64,
    pub max_len: i64,
    pub min_value: String,
    pub max_value: String,
    pub is_constant: bool,
    pub is_sparse: bool,
    pub is_unique: bool,
}

#[derive(Default)]
pub struct EngineOutput {
    pub field_alignments: Vec<FieldAlignmentRow>,
    pub value_alignments: Vec<ValueAlignmentRow>,
    pub profiles: Vec<ProfileRow>,
}

pub fn run(sample: &Sample, labels: &TableLabels, cfg: &FaldiscoConfig) -> EngineOutput {
    if sample.num_rows() == 0 {
        info!("empty sample; emitting zero results");
        return EngineOutput::default();
    }

    info!(
        "profiling {} reference fields and {} target fields over {} rows",
        sample.ref_fields.len(),
        sample.target_fields.len(),
        sample.num_rows()
    );

    let mut profiles: AHashMap<String, FieldProfile> = AHashMap::default();
    for field in sample.ref_fields.iter().chain(sample.target_fields.iter()) {
        let profile = profile_field(field, &sample.rows);
        if cfg.is_traced(field) {
            debug!("profile[{}] = {:?}", field, profile);
        }
        profiles.insert(field.clone(), profile);
    }

    let classification = classify_fields(&sample.ref_fields, &sample.target_fields, &profiles, cfg);
    debug!(
        "combinations: alignment={} sparse_alignment={} exact_match={}",
        classification.alignment_combinations.len(),
        classification.sparse_alignment_combinations.len(),
        classification.exact_match_combinations.len(),
    );

    let mut alignment_pairs = CombinationSet::new();
    for (r, t) in &classification.alignment_combinations {
        alignment_pairs.add(r, t);
    }
    let mut sparse_pairs = CombinationSet::new();
    for (r, t) in &classification.sparse_alignment_combinations {
        sparse_pairs.add(r, t);
    }

    let mut cooc = CoOccurrenceTable::new();
    let mut sparse_cooc = CoOccurrenceTable::new();
    let mut exact_counts: AHashMap<(String, String), u64> = AHashMap::default();

    info!("scanning sample rows to build co-occurrence tables");
    for row in &sample.rows {
        for (rf, tf) in &classification.alignment_combinations {
            let (rv, tv) = normalized_pair(&row[rf], &row[tf]);
            cooc.increment(rf, tf, &rv, &tv);
        }
        for (rf, tf) in &classification.sparse_alignment_combinations {
            let (rv, tv) = normalized_pair(&row[rf], &row[tf]);
            sparse_cooc.increment(rf, tf, &rv, &tv);
        }
        for (rf, tf) in &classification.exact_match_combinations {
            let rv = row[rf].as_str();
            let tv = row[tf].as_str();
            let r_nan = is_nan_like(rv);
            let t_nan = is_nan_like(tv);
            let matches = (r_nan && t_nan) || (!r_nan && !t_nan && rv == tv);
            if matches {
                *exact_counts.entry((rf.clone(), tf.clone())).or_insert(0) += 1;
            }
        }
    }

    let mut potential = PotentialMatches::default();

    for ((rf, tf), count) in &exact_counts {
        let strength = *count as f64 / sample.num_rows() as f64;
        if strength >= cfg.field_exact_match_threshold {
            potential.add_match(rf, tf, AlignmentType::ExactMatch, strength);
        }
    }

    info!("computing alignment strengths");
    for rf in alignment_pairs.refs() {
        for tf in alignment_pairs.targets(rf) {
            let check_exact = classification.alignment_exact_match_combinations.contains(&(rf.to_string(), tf.to_string()));
            let result = calc(&cooc, rf, tf, &profiles[tf], check_exact, cfg);
            if result.exact_strength >= cfg.field_exact_match_threshold {
                potential.add_match(rf, tf, AlignmentType::ExactMatch, result.exact_strength);
            }
            if result.alignment >= result.exact_strength
                && result.alignment > cfg.field_row_alignment_threshold
                && result.value_match_strength > cfg.field_value_alignment_threshold
            {
                potential.add_match(rf, tf, AlignmentType::Alignment, result.alignment);
            }
        }
    }

    for rf in sparse_pairs.refs() {
        for tf in sparse_pairs.targets(rf) {
            let check_exact = classification.alignment_exact_match_combinations.contains(&(rf.to_string(), tf.to_string()));
            let result = calc_sparse(&sparse_cooc, rf, tf, &profiles[rf], &profiles[tf], check_exact, cfg);
            if result.exact_strength >= cfg.field_exact_match_threshold {
                potential.add_match(rf, tf, AlignmentType::SparseExactMatch, result.exact_strength);
            }
            if result.alignment >= result.exact_strength
                && result.alignment > cfg.field_row_alignment_threshold
                && result.value_match_strength > cfg.field_value_alignment_threshold
            {
                potential.add_match(rf, tf, AlignmentType::SparseAlignment, result.alignment);
            } else if result.non_mfv_row_alignment > cfg.field_sparse_non_mfv_alignment_threshold {
                potential.add_match(rf, tf, AlignmentType::SparseNonMfvAlignment, result.non_mfv_row_alignment);
            }
        }
    }

    info!("selecting dominant matches per target field");
    let (field_alignments, value_alignments) =
        selector::select(&potential, &profiles, &cooc, &sparse_cooc, labels, cfg);

    let mut profile_rows = Vec::new();
    for field in sample.ref_fields.iter().chain(sample.target_fields.iter()) {
        let p = &profiles[field];
        let (namespace, table) = if sample.ref_fields.contains(field) {
            (labels.reference_table_namespace.clone(), labels.reference_table_name.clone())
        } else {
            (labels.target_table_namespace.clone(), labels.target_table_name.clone())
        };
        profile_rows.push(ProfileRow {
            table_namespace: namespace,
            table_name: table,
            field_name: strip_field_prefix(field).to_string(),
            num_rows: p.num_rows,
            cardinality: p.cardinality,
            selectivity: p.selectivity,
            mfv_count: p.mfv_count,
            min_len: p.min_len,
            max_len: p.max_len,
            min_value: p.min_val.clone().unwrap_or_default(),
            max_value: p.max_val.clone().unwrap_or_default(),
            is_constant: p.is_constant(cfg),
            is_sparse: p.is_sparse(cfg),
            is_unique: p.is_unique(cfg),
        });
    }

    info!(
        "produced {} field alignments, {} value witnesses, {} profiles",
        field_alignments.len(),
        value_alignments.len(),
        profile_rows.len()
    );

    EngineOutput {
        field_alignments,
        value_alignments,
        profiles: profile_rows,
    }
}

/// NaN-like values on either side are rewritten to the shared sentinel
/// before being recorded, so differently-formatted NaN tokens ("nan",
/// "NaN") co-occur under one canonical value instead of being tallied as
/// distinct, non-matching values.
fn normalized_pair(rv: &str, tv: &str) -> (String, String) {
    let rv = if is_nan_like(rv) { FALDISCO_NAN.to_string() } else { rv.to_string() };
    let tv = if is_nan_like(tv) { FALDISCO_NAN.to_string() } else { tv.to_string() };
    (rv, tv)
}
