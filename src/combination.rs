use indexmap::IndexMap;

/// A (reference field -> target field -> payload) map with deterministic,
/// insertion-ordered iteration, grounded on `field_combinations.py`'s nested
/// dict bookkeeping. Used both to enumerate candidate pairs and, via
/// `set`/`get`, to carry a running strength value per pair.
#[derive(Default, Clone)]
pub struct CombinationSet {
    targets_by_ref: IndexMap<String, IndexMap<String, f64>>,
}

impl CombinationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, rf: &str, tf: &str) {
        self.targets_by_ref
            .entry(rf.to_string())
            .or_default()
            .entry(tf.to_string())
            .or_insert(0.0);
    }

    pub fn set(&mut self, rf: &str, tf: &str, value: f64) {
        self.targets_by_ref
            .entry(rf.to_string())
            .or_default()
            .insert(tf.to_string(), value);
    }

    pub fn increment(&mut self, rf: &str, tf: &str, delta: f64) {
        let entry = self
            .targets_by_ref
            .entry(rf.to_string())
            .or_default()
            .entry(tf.to_string())
            .or_insert(0.0);
        *entry += delta;
    }

    pub fn remove(&mut self, rf: &str, tf: &str) {
        if let Some(targets) = self.targets_by_ref.get_mut(rf) {
            targets.shift_remove(tf);
        }
    }

    pub fn get(&self, rf: &str, tf: &str) -> f64 {
        self.targets_by_ref
            .get(rf)
            .and_then(|m| m.get(tf))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn contains(&self, rf: &str, tf: &str) -> bool {
        self.targets_by_ref.get(rf).map_or(false, |m| m.contains_key(tf))
    }

    pub fn refs(&self) -> impl Iterator<Item = &str> {
        self.targets_by_ref.keys().map(|s| s.as_str())
    }

    pub fn targets(&self, rf: &str) -> Vec<&str> {
        match self.targets_by_ref.get(rf) {
            Some(m) => m.keys().map(|s| s.as_str()).collect(),
            None => Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.targets_by_ref.values().map(|m| m.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_lookup() {
        let mut cs = CombinationSet::new();
        cs.add("r__a", "t__b");
        assert!(cs.contains("r__a", "t__b"));
        assert_eq!(cs.get("r__a", "t__b"), 0.0);
        cs.set("r__a", "t__b", 0.75);
        assert_eq!(cs.get("r__a", "t__b"), 0.75);
        assert_eq!(cs.size(), 1);
    }

    #[test]
    fn preserves_insertion_order() {
        let mut cs = CombinationSet::new();
        cs.add("r__a", "t__z");
        cs.add("r__a", "t__b");
        assert_eq!(cs.targets("r__a"), vec!["t__z", "t__b"]);
    }

    #[test]
    fn increment_accumulates() {
        let mut cs = CombinationSet::new();
        cs.increment("r__a", "t__b", 0.25);
        cs.increment("r__a", "t__b", 0.5);
        assert_eq!(cs.get("r__a", "t__b"), 0.75);
    }

    #[test]
    fn remove_drops_the_pair() {
        let mut cs = CombinationSet::new();
        cs.add("r__a", "t__b");
        cs.remove("r__a", "t__b");
        assert!(!cs.contains("r__a", "t__b"));
        assert_eq!(cs.size(), 0);
    }
}
