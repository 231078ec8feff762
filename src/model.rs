use std::collections::BTreeMap;

/// Next-character counts observed after a single k-gram.
///
/// Kept ordered so that walking a row always visits characters in
/// ascending byte order.
pub type Row = BTreeMap<u8, usize>;

/// Order-k character model built from a text treated as a ring.
///
/// Every k-gram that occurs in the text (including the ones spanning the
/// end-to-start boundary) maps to the counts of the characters that
/// followed it. Counts are raw; totals are computed when needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    order: usize,
    rows: BTreeMap<Vec<u8>, Row>,
}

impl Model {
    /// Builds the order-`k` model for `text`.
    ///
    /// The text is padded with its own last `k` characters at the front,
    /// and exactly `text.len()` (k-gram, next character) pairs are counted.
    /// Callers must ensure `1 <= k <= text.len()`.
    pub fn build(text: &[u8], k: usize) -> Model {
        debug_assert!(k >= 1 && k <= text.len());

        let len = text.len();
        let mut wrapped = Vec::with_capacity(len + k);
        wrapped.extend_from_slice(&text[len - k..]);
        wrapped.extend_from_slice(text);

        let mut rows: BTreeMap<Vec<u8>, Row> = BTreeMap::new();
        for window in wrapped.windows(k + 1).take(len) {
            let (kgram, next) = window.split_at(k);
            let row = rows.entry(kgram.to_vec()).or_insert_with(Row::new);
            *row.entry(next[0]).or_insert(0) += 1;
        }

        Model { order: k, rows }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Transition row for `kgram`, if it was observed during training.
    pub fn row(&self, kgram: &[u8]) -> Option<&Row> {
        self.rows.get(kgram)
    }

    /// All k-grams with their rows, in ascending byte order.
    pub fn rows(&self) -> impl Iterator<Item = (&[u8], &Row)> {
        self.rows.iter().map(|(kgram, row)| (kgram.as_slice(), row))
    }

    /// Number of distinct k-grams.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of every count in the model. Equals the training text length.
    pub fn total(&self) -> usize {
        self.rows.values().flat_map(|row| row.values()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn row(pairs: &[(u8, usize)]) -> Row {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn two_character_cycle() {
        let model = Model::build(b"ab", 1);

        assert_eq!(model.order(), 1);
        assert_eq!(model.len(), 2);
        assert_eq!(model.row(b"a"), Some(&row(&[(b'b', 1)])));
        assert_eq!(model.row(b"b"), Some(&row(&[(b'a', 1)])));
    }

    #[test]
    fn repeated_character_accumulates() {
        let model = Model::build(b"aa", 1);

        assert_eq!(model.len(), 1);
        assert_eq!(model.row(b"a"), Some(&row(&[(b'a', 2)])));
    }

    #[test]
    fn order_equal_to_length_yields_rotations() {
        // Wrapped text is "xyzxyz"; each rotation predicts its own first byte.
        let model = Model::build(b"xyz", 3);

        assert_eq!(model.len(), 3);
        assert_eq!(model.row(b"xyz"), Some(&row(&[(b'x', 1)])));
        assert_eq!(model.row(b"yzx"), Some(&row(&[(b'y', 1)])));
        assert_eq!(model.row(b"zxy"), Some(&row(&[(b'z', 1)])));
    }

    #[test]
    fn wraparound_kgrams_are_present() {
        // "abcab" wrapped at k=2 is "ab" + "abcab"
        let model = Model::build(b"abcab", 2);

        assert_eq!(model.row(b"ab"), Some(&row(&[(b'a', 1), (b'c', 1)])));
        assert_eq!(model.row(b"ba"), Some(&row(&[(b'b', 1)])));
        assert_eq!(model.row(b"bc"), Some(&row(&[(b'a', 1)])));
        assert_eq!(model.row(b"ca"), Some(&row(&[(b'b', 1)])));
        assert_eq!(model.total(), 5);
    }

    #[test]
    fn rows_are_sorted() {
        let model = Model::build(b"the cat sat", 1);
        let keys: Vec<&[u8]> = model.rows().map(|(kgram, _)| kgram).collect();

        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    fn text_and_order() -> impl Strategy<Value = (Vec<u8>, usize)> {
        proptest::collection::vec(any::<u8>(), 1..64).prop_flat_map(|text| {
            let len = text.len();
            (Just(text), 1..len + 1)
        })
    }

    proptest! {
        #[test]
        fn counts_sum_to_text_length(input in text_and_order()) {
            let (text, k) = input;
            let model = Model::build(&text, k);
            prop_assert_eq!(model.total(), text.len());
        }

        #[test]
        fn every_row_is_nonempty(input in text_and_order()) {
            let (text, k) = input;
            let model = Model::build(&text, k);
            for (kgram, row) in model.rows() {
                prop_assert_eq!(kgram.len(), k);
                prop_assert!(!row.is_empty());
                prop_assert!(row.values().all(|&count| count >= 1));
            }
        }

        #[test]
        fn construction_is_idempotent(input in text_and_order()) {
            let (text, k) = input;
            prop_assert_eq!(Model::build(&text, k), Model::build(&text, k));
        }
    }
}
