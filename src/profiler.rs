use crate::config::FaldiscoConfig;
use crate::sample::{is_special_value, Row};

/// Per-field statistics computed over one pass of the sorted column, per
/// spec.md §4.1. `min_len`/`max_len` stay `-1` when every value in the field
/// is special (no non-special value was ever seen).
#[derive(Debug, Clone)]
pub struct FieldProfile {
    pub num_rows: usize,
    pub cardinality: usize,
    pub selectivity: f64,
    pub mfv: String,
    pub mfv_count: usize,
    pub min_len: i64,
    pub max_len: i64,
    pub min_val: Option<String>,
    pub max_val: Option<String>,
}

impl FieldProfile {
    pub fn is_constant(&self, cfg: &FaldiscoConfig) -> bool {
        self.cardinality <= 1
            || (self.num_rows > 0
                && self.mfv_count as f64 / self.num_rows as f64 > cfg.constant_value_threshold)
    }

    pub fn is_sparse(&self, cfg: &FaldiscoConfig) -> bool {
        !self.is_constant(cfg)
            && self.num_rows > 0
            && self.mfv_count as f64 / self.num_rows as f64 > cfg.sparse_value_threshold
    }

    /// Unique if either the raw selectivity clears the threshold, or it does
    /// once the MFV's rows are discounted — a field can be dominated by one
    /// popular value and still be effectively a key over everything else.
    pub fn is_unique(&self, cfg: &FaldiscoConfig) -> bool {
        if self.is_constant(cfg) || self.is_sparse(cfg) {
            return false;
        }
        if self.selectivity > cfg.unique_selectivity_threshold {
            return true;
        }
        let denom = self.num_rows - self.mfv_count;
        denom > 0 && (self.cardinality - 1) as f64 / denom as f64 > cfg.unique_selectivity_threshold
    }
}

fn update_minmax(
    val: &str,
    min_len: &mut i64,
    max_len: &mut i64,
    min_val: &mut Option<String>,
    max_val: &mut Option<String>,
) {
    if is_special_value(val) {
        return;
    }
    let len = val.len() as i64;
    if *min_len < 0 || len < *min_len {
        *min_len = len;
    }
    if len > *max_len {
        *max_len = len;
    }
    match min_val {
        Some(m) if m.as_str() <= val => {}
        _ => *min_val = Some(val.to_string()),
    }
    match max_val {
        Some(m) if m.as_str() >= val => {}
        _ => *max_val = Some(val.to_string()),
    }
}

/// One stable-sorted pass over `field`'s values across `rows`. Precondition:
/// `rows` is non-empty (callers only profile fields of a non-empty sample).
pub fn profile_field(field: &str, rows: &[Row]) -> FieldProfile {
    let mut vals: Vec<&str> = rows.iter().map(|r| r[field].as_str()).collect();
    vals.sort_unstable();

    let num_rows = vals.len();
    let mut cardinality = 0usize;
    let mut min_len = -1i64;
    let mut max_len = -1i64;
    let mut min_val: Option<String> = None;
    let mut max_val: Option<String> = None;

    let mut prev: Option<&str> = None;
    let mut current_count = 0usize;
    let mut mfv_count = 0usize;
    let mut mfv: Option<&str> = None;

    for &val in &vals {
        match prev {
            Some(p) if p == val => {
                current_count += 1;
            }
            _ => {
                if let Some(p) = prev {
                    if current_count > mfv_count {
                        mfv_count = current_count;
                        mfv = Some(p);
                    }
                }
                cardinality += 1;
                update_minmax(val, &mut min_len, &mut max_len, &mut min_val, &mut max_val);
                current_count = 1;
                prev = Some(val);
            }
        }
    }
    if current_count > mfv_count {
        mfv_count = current_count;
        mfv = prev;
    }

    FieldProfile {
        num_rows,
        cardinality,
        selectivity: cardinality as f64 / num_rows as f64,
        mfv: mfv.unwrap_or("").to_string(),
        mfv_count,
        min_len,
        max_len,
        min_val,
        max_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashMap;

    fn row(val: &str) -> Row {
        let mut m = AHashMap::default();
        m.insert("f".to_string(), val.to_string());
        m
    }

    #[test]
    fn constant_field() {
        let rows: Vec<Row> = (0..10).map(|_| row("x")).collect();
        let p = profile_field("f", &rows);
        assert_eq!(p.cardinality, 1);
        assert_eq!(p.mfv, "x");
        assert_eq!(p.mfv_count, 10);
        assert_eq!(p.selectivity, 0.1);
    }

    #[test]
    fn mfv_tie_keeps_first_sorted_value() {
        let mut rows: Vec<Row> = vec![row("a"), row("a"), row("b"), row("b")];
        rows.sort_by(|x, y| x["f"].cmp(&y["f"]));
        let p = profile_field("f", &rows);
        assert_eq!(p.mfv, "a");
        assert_eq!(p.mfv_count, 2);
    }

    #[test]
    fn special_values_excluded_from_minmax() {
        let rows: Vec<Row> = vec![row("FALDISCO_NULL"), row("abc"), row("z")];
        let p = profile_field("f", &rows);
        assert_eq!(p.min_val.as_deref(), Some("abc"));
        assert_eq!(p.max_val.as_deref(), Some("z"));
    }

    #[test]
    fn all_special_leaves_minmax_absent() {
        let rows: Vec<Row> = vec![row("FALDISCO_NULL"), row("FALDISCO_EMPTY")];
        let p = profile_field("f", &rows);
        assert_eq!(p.min_len, -1);
        assert_eq!(p.max_len, -1);
        assert!(p.min_val.is_none());
        assert!(p.max_val.is_none());
    }
}
