use ahash::AHashMap;
use indexmap::IndexMap;

/// Value co-occurrence counts for a set of (rf, tf) field pairs, per
/// spec.md §4.4: `cell(rf, tf, rvalue, tvalue) -> count`. Nested by pair,
/// then by reference value, then by target value, so the calculator's
/// per-reference-value scan (`tvalues`) never has to filter a flat map.
#[derive(Default, Clone)]
pub struct CoOccurrenceTable {
    cells: AHashMap<(String, String), IndexMap<String, IndexMap<String, u64>>>,
}

impl CoOccurrenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, rf: &str, tf: &str, rvalue: &str, tvalue: &str) {
        let by_rvalue = self
            .cells
            .entry((rf.to_string(), tf.to_string()))
            .or_default();
        let by_tvalue = by_rvalue.entry(rvalue.to_string()).or_default();
        *by_tvalue.entry(tvalue.to_string()).or_insert(0) += 1;
    }

    pub fn rvalues(&self, rf: &str, tf: &str) -> Vec<&str> {
        match self.cells.get(&(rf.to_string(), tf.to_string())) {
            Some(m) => m.keys().map(|s| s.as_str()).collect(),
            None => Vec::new(),
        }
    }

    pub fn tvalues(&self, rf: &str, tf: &str, rvalue: &str) -> Vec<(&str, u64)> {
        match self.cells.get(&(rf.to_string(), tf.to_string())) {
            Some(m) => match m.get(rvalue) {
                Some(inner) => inner.iter().map(|(t, c)| (t.as_str(), *c)).collect(),
                None => Vec::new(),
            },
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_accumulate() {
        let mut t = CoOccurrenceTable::new();
        t.increment("r__a", "t__b", "1", "x");
        t.increment("r__a", "t__b", "1", "x");
        t.increment("r__a", "t__b", "1", "y");
        t.increment("r__a", "t__b", "2", "z");

        assert_eq!(t.rvalues("r__a", "t__b"), vec!["1", "2"]);
        let tv = t.tvalues("r__a", "t__b", "1");
        assert_eq!(tv, vec![("x", 2), ("y", 1)]);
    }

    #[test]
    fn missing_pair_is_empty() {
        let t = CoOccurrenceTable::new();
        assert!(t.rvalues("r__a", "t__b").is_empty());
        assert!(t.tvalues("r__a", "t__b", "1").is_empty());
    }
}
