/// Direction of an index scan.
///
/// # Variants
/// - `Ascending`: smallest to largest indexed value (byte-wise lexicographic)
/// - `Descending`: largest to smallest indexed value
///
/// # Usage
/// ```rust
/// use docstore::common::SortOrder;
/// use docstore::collection::QueryParams;
///
/// let params = QueryParams::new().order(SortOrder::Descending);
/// assert_eq!(params.sort_order(), SortOrder::Descending);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Smallest to largest
    #[default]
    Ascending,
    /// Largest to smallest
    Descending,
}

impl SortOrder {
    pub fn is_descending(&self) -> bool {
        matches!(self, SortOrder::Descending)
    }
}
