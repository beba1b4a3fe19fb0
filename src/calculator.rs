use log::{debug, trace};

use crate::config::FaldiscoConfig;
use crate::cooccurrence::CoOccurrenceTable;
use crate::profiler::FieldProfile;

#[derive(Debug, Clone, Copy, Default)]
pub struct AlignmentCalculation {
    pub alignment: f64,
    pub exact_strength: f64,
    pub value_match_strength: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SparseAlignmentCalculation {
    pub alignment: f64,
    pub exact_strength: f64,
    pub value_match_strength: f64,
    pub non_mfv_row_alignment: f64,
}

/// Standard (non-sparse) strength calculation, spec.md §4.5.1. The
/// zero-division guard on `tvals/ALPHA` collapses to `trows > 0` since a
/// reference value only appears here at all when some target row co-occurred
/// with it, i.e. `trows` is always positive inside this loop — see
/// SPEC_FULL.md §9 resolved Open Question 1.
pub fn calc(
    table: &CoOccurrenceTable,
    rf: &str,
    tf: &str,
    target_profile: &FieldProfile,
    check_exact: bool,
    cfg: &FaldiscoConfig,
) -> AlignmentCalculation {
    let target_mfv: Option<&str> = if target_profile.cardinality > 2 {
        Some(target_profile.mfv.as_str())
    } else {
        None
    };

    let mut aligned_rows = 0u64;
    let mut non_unique_rows = 0u64;
    let mut matching_rows = 0u64;
    let mut total_rows = 0u64;
    let mut matching_values = 0u64;
    let mut total_values = 0u64;

    for rvalue in table.rvalues(rf, tf) {
        let mut max_count = 0u64;
        let mut argmax: Option<&str> = None;
        let mut trows = 0u64;
        let tvalues = table.tvalues(rf, tf, rvalue);
        let tvals = tvalues.len() as u64;

        for (tvalue, count) in tvalues {
            if count > max_count {
                max_count = count;
                argmax = Some(tvalue);
            }
            if check_exact && rvalue == tvalue {
                matching_rows += count;
            }
            trows += count;
        }

        total_rows += trows;
        total_values += tvals;

        let matched = tvals == 1
            || argmax == target_mfv
            || max_count as f64 > trows as f64 * cfg.alignment_value_row_match_threshold;
        if matched {
            matching_values += 1;
        }

        if trows > 1 {
            non_unique_rows += trows;
            aligned_rows += max_count;
        }
    }

    let result = AlignmentCalculation {
        alignment: if non_unique_rows > 0 {
            aligned_rows as f64 / non_unique_rows as f64
        } else {
            0.0
        },
        exact_strength: if total_rows > 0 {
            matching_rows as f64 / total_rows as f64
        } else {
            0.0
        },
        value_match_strength: if total_values > 0 {
            matching_values as f64 / total_values as f64
        } else {
            0.0
        },
    };
    if cfg.is_traced(rf) || cfg.is_traced(tf) {
        debug!(
            "calc({}, {}): alignment={:.3} exact={:.3} value_match={:.3}",
            rf,
            tf,
            result.alignment,
            result.exact_strength,
            result.value_match_strength
        );
    } else {
        trace!(
            "calc({}, {}): alignment={:.3} exact={:.3} value_match={:.3}",
            rf,
            tf,
            result.alignment,
            result.exact_strength,
            result.value_match_strength
        );
    }
    result
}

/// Sparse strength calculation, spec.md §4.5.2. Rows where the reference
/// value is the reference field's MFV and the target value is the target
/// field's MFV are dropped entirely (neither side informative); rows where
/// exactly one side is at its MFV count as "mismatches" against
/// `non_mfv_row_alignment` without contributing to `alignment`.
pub fn calc_sparse(
    table: &CoOccurrenceTable,
    rf: &str,
    tf: &str,
    ref_profile: &FieldProfile,
    target_profile: &FieldProfile,
    check_exact: bool,
    cfg: &FaldiscoConfig,
) -> SparseAlignmentCalculation {
    let ref_mfv = ref_profile.mfv.as_str();
    let target_mfv = target_profile.mfv.as_str();
    let is_unique = ref_profile.is_unique(cfg) || target_profile.is_unique(cfg);

    let mut aligned_rows = 0u64;
    let mut matching_rows = 0u64;
    let mut total_rows = 0u64;
    let mut matching_values = 0u64;
    let mut total_values = 0u64;
    let mut mismatches = 0u64;

    for rvalue in table.rvalues(rf, tf) {
        let mut max_count = 0u64;
        let mut trows = 0u64;
        let mut tvals = 0u64;

        for (tvalue, count) in table.tvalues(rf, tf, rvalue) {
            let rval_is_mfv = rvalue == ref_mfv;
            let tval_is_mfv = tvalue == target_mfv;

            if rval_is_mfv && tval_is_mfv {
                continue;
            }
            if rval_is_mfv || tval_is_mfv {
                mismatches += count;
                total_rows += count;
                trows += count;
                continue;
            }

            if check_exact && rvalue == tvalue {
                matching_rows += count;
            }
            if !is_unique && count > max_count {
                max_count = count;
            }
            total_rows += count;
            trows += count;
            tvals += 1;
        }

        total_values += tvals;
        let matched = tvals == 1
            || max_count as f64 > trows as f64 * cfg.alignment_value_row_match_threshold;
        if matched {
            matching_values += 1;
        }
        if !is_unique {
            aligned_rows += max_count;
        }
    }

    if total_rows == 0 || total_values == 0 {
        return SparseAlignmentCalculation::default();
    }

    let result = SparseAlignmentCalculation {
        alignment: aligned_rows as f64 / total_rows as f64,
        exact_strength: matching_rows as f64 / total_rows as f64,
        value_match_strength: matching_values as f64 / total_values as f64,
        non_mfv_row_alignment: (total_rows - mismatches) as f64 / total_rows as f64,
    };
    if cfg.is_traced(rf) || cfg.is_traced(tf) {
        debug!(
            "calc_sparse({}, {}): alignment={:.3} exact={:.3} value_match={:.3} non_mfv={:.3}",
            rf,
            tf,
            result.alignment,
            result.exact_strength,
            result.value_match_strength,
            result.non_mfv_row_alignment
        );
    } else {
        trace!(
            "calc_sparse({}, {}): alignment={:.3} exact={:.3} value_match={:.3} non_mfv={:.3}",
            rf,
            tf,
            result.alignment,
            result.exact_strength,
            result.value_match_strength,
            result.non_mfv_row_alignment
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(cardinality: usize, mfv: &str, mfv_count: usize, num_rows: usize) -> FieldProfile {
        FieldProfile {
            num_rows,
            cardinality,
            selectivity: cardinality as f64 / num_rows as f64,
            mfv: mfv.to_string(),
            mfv_count,
            min_len: 1,
            max_len: 1,
            min_val: Some("0".into()),
            max_val: Some("9".into()),
        }
    }

    #[test]
    fn perfect_alignment_scores_one() {
        let mut table = CoOccurrenceTable::new();
        for i in 0..10 {
            table.increment("r__a", "t__b", &i.to_string(), &i.to_string());
        }
        let tp = profile(10, "0", 1, 10);
        let result = calc(&table, "r__a", "t__b", &tp, true, &FaldiscoConfig::default());
        assert_eq!(result.alignment, 0.0); // every rvalue has exactly one row, non_unique_rows stays 0
        assert_eq!(result.exact_strength, 1.0);
        assert_eq!(result.value_match_strength, 1.0);
    }

    #[test]
    fn noisy_alignment_is_bounded() {
        let mut table = CoOccurrenceTable::new();
        for _ in 0..8 {
            table.increment("r__a", "t__b", "x", "y");
        }
        for _ in 0..2 {
            table.increment("r__a", "t__b", "x", "z");
        }
        let tp = profile(2, "y", 8, 10);
        let result = calc(&table, "r__a", "t__b", &tp, false, &FaldiscoConfig::default());
        assert!(result.alignment >= 0.0 && result.alignment <= 1.0);
        assert_eq!(result.alignment, 0.8);
    }

    #[test]
    fn sparse_mfv_mfv_rows_dropped() {
        let mut table = CoOccurrenceTable::new();
        for _ in 0..90 {
            table.increment("r__a", "t__b", "MFV_R", "MFV_T");
        }
        for _ in 0..5 {
            table.increment("r__a", "t__b", "x1", "y1");
        }
        for _ in 0..5 {
            table.increment("r__a", "t__b", "x2", "y2");
        }
        let rp = profile(3, "MFV_R", 90, 100);
        let tp = profile(3, "MFV_T", 90, 100);
        let result = calc_sparse(&table, "r__a", "t__b", &rp, &tp, false, &FaldiscoConfig::default());
        assert_eq!(result.non_mfv_row_alignment, 1.0);
    }
}
