use ahash::AHashMap;

use crate::errors::FaldiscoError;

pub const SPECIAL_VALUE_PREFIX: &str = "FALDISCO_";
pub const FALDISCO_NULL: &str = "FALDISCO_NULL";
pub const FALDISCO_EMPTY: &str = "FALDISCO_EMPTY";
pub const FALDISCO_NAN: &str = "FALDISCO_NAN";

const REF_JOIN_PREFIX: &str = "r_j__";
const REF_PREFIX: &str = "r__";
const TARGET_PREFIX: &str = "t__";

/// True for the three sentinel tokens the sampler writes in place of NULL,
/// empty string, and NaN, plus any future `FALDISCO_`-prefixed sentinel.
pub fn is_special_value(value: &str) -> bool {
    value.starts_with(SPECIAL_VALUE_PREFIX)
}

/// A value is NaN-like if it parses as a float and that float is NaN. Plain
/// strings are never NaN-like.
pub fn is_nan_like(value: &str) -> bool {
    value.trim().parse::<f64>().map(|f| f.is_nan()).unwrap_or(false)
}

/// Strips the column's side prefix, leaving the name the spec and the output
/// tables use.
pub fn strip_field_prefix(column: &str) -> &str {
    if let Some(rest) = column.strip_prefix(REF_JOIN_PREFIX) {
        rest
    } else if let Some(rest) = column.strip_prefix(REF_PREFIX) {
        rest
    } else if let Some(rest) = column.strip_prefix(TARGET_PREFIX) {
        rest
    } else {
        column
    }
}

pub type Row = AHashMap<String, String>;

/// A loaded, schema-validated sample: rows keyed by full (prefixed) column
/// name, plus the classification of those columns into join key / reference
/// fields / target fields.
pub struct Sample {
    pub rows: Vec<Row>,
    pub join_key_column: String,
    pub ref_fields: Vec<String>,
    pub target_fields: Vec<String>,
}

impl Sample {
    /// `header` is the full set of column names observed in the input,
    /// `rows` is parallel row data already keyed by those same names.
    pub fn new(header: &[String], rows: Vec<Row>) -> Result<Self, FaldiscoError> {
        let mut join_keys = Vec::new();
        let mut ref_fields = Vec::new();
        let mut target_fields = Vec::new();

        for column in header {
            if column.starts_with(REF_JOIN_PREFIX) {
                join_keys.push(column.clone());
            } else if column.starts_with(REF_PREFIX) {
                ref_fields.push(column.clone());
            } else if column.starts_with(TARGET_PREFIX) {
                target_fields.push(column.clone());
            } else {
                return Err(FaldiscoError::MissingFieldPrefix { column: column.clone() });
            }
        }

        let join_key_column = match join_keys.len() {
            0 => return Err(FaldiscoError::MissingJoinKeyColumn),
            1 => join_keys.into_iter().next().unwrap(),
            _ => return Err(FaldiscoError::MultipleJoinKeyColumns { columns: join_keys }),
        };

        if ref_fields.is_empty() {
            return Err(FaldiscoError::NoFieldsForSide { side: "reference" });
        }
        if target_fields.is_empty() {
            return Err(FaldiscoError::NoFieldsForSide { side: "target" });
        }

        Ok(Sample { rows, join_key_column, ref_fields, target_fields })
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_value_detection() {
        assert!(is_special_value(FALDISCO_NULL));
        assert!(is_special_value(FALDISCO_EMPTY));
        assert!(is_special_value(FALDISCO_NAN));
        assert!(!is_special_value("hello"));
        assert!(!is_special_value(""));
    }

    #[test]
    fn nan_like_detection() {
        assert!(is_nan_like("nan"));
        assert!(is_nan_like("NaN"));
        assert!(!is_nan_like("1.5"));
        assert!(!is_nan_like("abc"));
    }

    #[test]
    fn strip_prefix_handles_all_three_kinds() {
        assert_eq!(strip_field_prefix("r_j__id"), "id");
        assert_eq!(strip_field_prefix("r__name"), "name");
        assert_eq!(strip_field_prefix("t__name"), "name");
    }

    #[test]
    fn rejects_unprefixed_column() {
        let header = vec!["r_j__id".to_string(), "oops".to_string()];
        let err = Sample::new(&header, vec![]).unwrap_err();
        assert!(matches!(err, FaldiscoError::MissingFieldPrefix { .. }));
    }

    #[test]
    fn rejects_missing_join_key() {
        let header = vec!["r__a".to_string(), "t__b".to_string()];
        let err = Sample::new(&header, vec![]).unwrap_err();
        assert!(matches!(err, FaldiscoError::MissingJoinKeyColumn));
    }
}
