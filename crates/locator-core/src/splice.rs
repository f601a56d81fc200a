/// Text to be inserted at a byte offset of the original source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub offset: usize,
    pub text: String,
}

impl Insertion {
    pub fn new(offset: usize, text: impl Into<String>) -> Self {
        Self {
            offset,
            text: text.into(),
        }
    }
}

/// Applies insertions to `source`, highest offset first, so that every offset keeps
/// referring to the original text while earlier splices are still pending.
///
/// Insertions sharing an offset keep their relative order in the output.
/// Offsets past the end or inside a multi-byte character are ignored.
pub fn apply_insertions(source: &str, mut insertions: Vec<Insertion>) -> String {
    // stable, so same-offset insertions stay in collection order once reversed below
    insertions.sort_by_key(|insertion| insertion.offset);

    let extra: usize = insertions.iter().map(|i| i.text.len()).sum();
    let mut result = String::with_capacity(source.len() + extra);
    result.push_str(source);

    for insertion in insertions.iter().rev() {
        if insertion.offset > source.len() || !source.is_char_boundary(insertion.offset) {
            tracing::debug!(
                offset = insertion.offset,
                len = source.len(),
                "Skipping insertion outside of source bounds"
            );
            continue;
        }
        result.insert_str(insertion.offset, &insertion.text);
    }
    result
}
