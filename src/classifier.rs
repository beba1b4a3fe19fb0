use std::collections::HashSet;

use ahash::AHashMap;

use crate::config::FaldiscoConfig;
use crate::profiler::FieldProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
    Constant,
    Sparse,
    Unique,
    Alignable,
}

pub fn classify(profile: &FieldProfile, cfg: &FaldiscoConfig) -> FieldClass {
    if profile.is_constant(cfg) {
        FieldClass::Constant
    } else if profile.is_sparse(cfg) {
        FieldClass::Sparse
    } else if profile.is_unique(cfg) {
        FieldClass::Unique
    } else {
        FieldClass::Alignable
    }
}

/// Two fields can plausibly hold an exact-match relationship only if their
/// value-length and value ranges overlap. Requires both profiles to have
/// seen at least one non-special value.
pub fn can_pair_exact_match(rp: &FieldProfile, tp: &FieldProfile) -> bool {
    match (&rp.min_val, &rp.max_val, &tp.min_val, &tp.max_val) {
        (Some(rmin), Some(rmax), Some(tmin), Some(tmax)) => {
            rp.min_len <= tp.max_len
                && tp.min_len <= rp.max_len
                && rmin.as_str() <= tmax.as_str()
                && tmin.as_str() <= rmax.as_str()
        }
        _ => false,
    }
}

/// The four parallel candidate sets produced once per run, per spec.md §4.2.
pub struct Classification {
    pub alignment_combinations: Vec<(String, String)>,
    pub sparse_alignment_combinations: Vec<(String, String)>,
    pub exact_match_combinations: Vec<(String, String)>,
    pub alignment_exact_match_combinations: HashSet<(String, String)>,
}

pub fn classify_fields(
    ref_fields: &[String],
    target_fields: &[String],
    profiles: &AHashMap<String, FieldProfile>,
    cfg: &FaldiscoConfig,
) -> Classification {
    let mut ref_alignable = Vec::new();
    let mut ref_sparse = Vec::new();
    let mut ref_unique = Vec::new();
    for f in ref_fields {
        match classify(&profiles[f], cfg) {
            FieldClass::Alignable => ref_alignable.push(f.clone()),
            FieldClass::Sparse => ref_sparse.push(f.clone()),
            FieldClass::Unique => ref_unique.push(f.clone()),
            FieldClass::Constant => {}
        }
    }

    let mut target_alignable = Vec::new();
    let mut target_sparse = Vec::new();
    let mut target_unique = Vec::new();
    for f in target_fields {
        match classify(&profiles[f], cfg) {
            FieldClass::Alignable => target_alignable.push(f.clone()),
            FieldClass::Sparse => target_sparse.push(f.clone()),
            FieldClass::Unique => target_unique.push(f.clone()),
            FieldClass::Constant => {}
        }
    }

    let mut alignment_combinations = Vec::new();
    for r in &ref_alignable {
        for t in &target_alignable {
            alignment_combinations.push((r.clone(), t.clone()));
        }
    }

    let mut sparse_alignment_combinations = Vec::new();
    for r in &ref_sparse {
        for t in &target_sparse {
            sparse_alignment_combinations.push((r.clone(), t.clone()));
        }
    }

    let mut exact_match_combinations = Vec::new();
    for r in &ref_unique {
        for t in &target_unique {
            if can_pair_exact_match(&profiles[r], &profiles[t]) {
                exact_match_combinations.push((r.clone(), t.clone()));
            }
        }
    }

    let mut alignment_exact_match_combinations = HashSet::new();
    for (r, t) in alignment_combinations.iter().chain(sparse_alignment_combinations.iter()) {
        if can_pair_exact_match(&profiles[r], &profiles[t]) {
            alignment_exact_match_combinations.insert((r.clone(), t.clone()));
        }
    }

    Classification {
        alignment_combinations,
        sparse_alignment_combinations,
        exact_match_combinations,
        alignment_exact_match_combinations,
    }
}
