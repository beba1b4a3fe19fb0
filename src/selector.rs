use std::collections::HashSet;

use ahash::AHashMap;

use crate::config::FaldiscoConfig;
use crate::cooccurrence::CoOccurrenceTable;
use crate::engine::{AlignmentType, FieldAlignmentRow, PotentialMatches, TableLabels, ValueAlignmentRow};
use crate::profiler::FieldProfile;

/// Which alignment-type triple a target field's candidates are judged
/// against. Carrying this as data (rather than branching on "is this the
/// sparse path") is what lets the dominance algorithm below serve both
/// spec.md §4.6 selector variants from one implementation.
struct MatchKindTriple {
    exact: AlignmentType,
    alignment: AlignmentType,
    non_mfv: Option<AlignmentType>,
}

const NON_SPARSE: MatchKindTriple = MatchKindTriple {
    exact: AlignmentType::ExactMatch,
    alignment: AlignmentType::Alignment,
    non_mfv: None,
};

const SPARSE: MatchKindTriple = MatchKindTriple {
    exact: AlignmentType::SparseExactMatch,
    alignment: AlignmentType::SparseAlignment,
    non_mfv: Some(AlignmentType::SparseNonMfvAlignment),
};

pub fn select(
    potential: &PotentialMatches,
    profiles: &AHashMap<String, FieldProfile>,
    cooc: &CoOccurrenceTable,
    sparse_cooc: &CoOccurrenceTable,
    labels: &TableLabels,
    cfg: &FaldiscoConfig,
) -> (Vec<FieldAlignmentRow>, Vec<ValueAlignmentRow>) {
    let mut field_rows = Vec::new();
    let mut value_rows = Vec::new();

    for tf in potential.target_fields() {
        let is_sparse_target = profiles[tf].is_sparse(cfg);
        let triple = if is_sparse_target { &SPARSE } else { &NON_SPARSE };
        let emitted = select_for_target(tf, potential, profiles, triple, cfg);

        for (rf, kind, strength) in &emitted {
            field_rows.push(FieldAlignmentRow {
                reference_table_namespace: labels.reference_table_namespace.clone(),
                reference_table_name: labels.reference_table_name.clone(),
                reference_field_name: crate::sample::strip_field_prefix(rf).to_string(),
                target_table_namespace: labels.target_table_namespace.clone(),
                target_table_name: labels.target_table_name.clone(),
                target_field_name: crate::sample::strip_field_prefix(tf).to_string(),
                alignment_type: kind.as_str().to_string(),
                alignment_strength: *strength,
            });

            let table = if *kind == AlignmentType::SparseAlignment { sparse_cooc } else { cooc };
            if *kind == AlignmentType::Alignment || *kind == AlignmentType::SparseAlignment {
                let ref_mfv = if *kind == AlignmentType::SparseAlignment {
                    Some(profiles[rf].mfv.as_str())
                } else {
                    None
                };
                let target_mfv = if *kind == AlignmentType::SparseAlignment {
                    Some(profiles[tf].mfv.as_str())
                } else {
                    None
                };
                for witness in record_witnesses(table, rf, tf, ref_mfv, target_mfv) {
                    value_rows.push(ValueAlignmentRow {
                        reference_table_namespace: labels.reference_table_namespace.clone(),
                        reference_table_name: labels.reference_table_name.clone(),
                        reference_field_name: crate::sample::strip_field_prefix(rf).to_string(),
                        target_table_namespace: labels.target_table_namespace.clone(),
                        target_table_name: labels.target_table_name.clone(),
                        target_field_name: crate::sample::strip_field_prefix(tf).to_string(),
                        alignment_type: kind.as_str().to_string(),
                        reference_field_value: witness.0.to_string(),
                        target_field_value: witness.1.to_string(),
                        alignment_count: witness.2,
                        misalignment_count: witness.3,
                    });
                }
            }
        }
    }

    (field_rows, value_rows)
}

/// The dominance algorithm from spec.md §4.6: a running max per match kind,
/// ties broken by lower selectivity (more specific reference field wins),
/// plus the `other_alignments` secondary list gated by a greedily-updated
/// strength/selectivity ratio.
fn select_for_target(
    tf: &str,
    potential: &PotentialMatches,
    profiles: &AHashMap<String, FieldProfile>,
    triple: &MatchKindTriple,
    cfg: &FaldiscoConfig,
) -> Vec<(String, AlignmentType, f64)> {
    let mut max_exact = 0.0f64;
    let mut top_exact: Vec<String> = Vec::new();

    // First pass: the exact-match max has to be final before alignment
    // candidates are judged against it (spec.md §4.6 gates the alignment
    // and other_alignments tracking on "stronger than max_exact_match").
    for rf in potential.refs_for(tf) {
        if let Some(strength) = potential.strength(tf, rf, triple.exact) {
            if strength > max_exact {
                max_exact = strength;
                top_exact = vec![rf.to_string()];
            } else if strength == max_exact {
                top_exact.push(rf.to_string());
            }
        }
    }

    let mut max_alignment = 0.0f64;
    let mut min_selectivity = 1.0f64;
    let mut top_alignments: Vec<String> = Vec::new();

    let mut max_ratio = 0.0f64;
    let mut other_alignments: Vec<String> = Vec::new();

    let mut max_non_mfv = 0.0f64;
    let mut top_non_mfv: Vec<String> = Vec::new();

    for rf in potential.refs_for(tf) {
        for (kind, strength) in potential.kinds_for(tf, rf) {
            if kind == triple.alignment {
                if strength <= max_exact {
                    continue;
                }
                let selectivity = profiles[rf].selectivity;
                let ratio = if selectivity > 0.0 { strength / selectivity } else { 0.0 };
                if ratio >= max_ratio {
                    max_ratio = ratio;
                    other_alignments.push(rf.to_string());
                }
                if strength > max_alignment || (strength == max_alignment && selectivity < min_selectivity) {
                    max_alignment = strength;
                    min_selectivity = selectivity;
                    top_alignments = vec![rf.to_string()];
                } else if strength == max_alignment && selectivity == min_selectivity {
                    top_alignments.push(rf.to_string());
                }
            } else if Some(kind) == triple.non_mfv {
                if strength > max_non_mfv {
                    max_non_mfv = strength;
                    top_non_mfv = vec![rf.to_string()];
                } else if strength == max_non_mfv {
                    top_non_mfv.push(rf.to_string());
                }
            }
        }
    }

    let mut emitted = Vec::new();

    if let Some(non_mfv_kind) = triple.non_mfv {
        if max_non_mfv > max_exact && max_non_mfv > max_alignment && max_non_mfv > 0.0 {
            for rf in &top_non_mfv {
                emitted.push((rf.clone(), non_mfv_kind, max_non_mfv));
            }
        }
    }

    for rf in &top_exact {
        emitted.push((rf.clone(), triple.exact, max_exact));
    }

    if max_exact < max_alignment {
        for rf in &top_alignments {
            emitted.push((rf.clone(), triple.alignment, max_alignment));
        }

        let already: HashSet<&str> = top_alignments.iter().chain(top_exact.iter()).map(|s| s.as_str()).collect();
        let mut seen = HashSet::new();
        let ratio_floor = max_ratio - cfg.alignment_selectivity_ratio_threshold;

        for rf in &other_alignments {
            if already.contains(rf.as_str()) || !seen.insert(rf.as_str()) {
                continue;
            }
            let strength = potential.strength(tf, rf, triple.alignment).unwrap_or(0.0);
            if strength <= max_exact {
                continue;
            }
            let selectivity = profiles[rf].selectivity;
            let ratio = if selectivity > 0.0 { strength / selectivity } else { 0.0 };
            if ratio >= ratio_floor {
                emitted.push((rf.clone(), triple.alignment, strength));
            }
        }
    }

    emitted
}

/// For every distinct reference value observed in an (rf, tf) pair, the
/// most-frequent co-occurring target value and its count, plus how many rows
/// disagreed. Sparse callers suppress rows where either side is sitting at
/// its own MFV (uninformative, not a witness of alignment).
fn record_witnesses(
    table: &CoOccurrenceTable,
    rf: &str,
    tf: &str,
    ref_mfv: Option<&str>,
    target_mfv: Option<&str>,
) -> Vec<(String, String, u64, u64)> {
    let mut out = Vec::new();
    for rvalue in table.rvalues(rf, tf) {
        let mut max_count = 0u64;
        let mut argmax: Option<&str> = None;
        let mut trows = 0u64;
        for (tvalue, count) in table.tvalues(rf, tf, rvalue) {
            if count > max_count {
                max_count = count;
                argmax = Some(tvalue);
            }
            trows += count;
        }
        if ref_mfv == Some(rvalue) || (argmax.is_some() && target_mfv == argmax) {
            continue;
        }
        out.push((
            rvalue.to_string(),
            argmax.unwrap_or("").to_string(),
            max_count,
            trows - max_count,
        ));
    }
    out
}
