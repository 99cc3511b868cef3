use crate::common::SortOrder;

/// Bounds and direction of an index range scan.
///
/// Both bounds are inclusive. Two combinations are not honoured and fall back
/// to an unbounded scan in the requested direction:
///
/// * descending with only `min` set
/// * ascending with only `max` set
///
/// # Examples
///
/// ```rust
/// use docstore::collection::QueryParams;
///
/// let params = QueryParams::descending().min("val2").max("val4");
/// assert_eq!(params.min_value(), Some("val2"));
/// assert_eq!(params.max_value(), Some("val4"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    order: SortOrder,
    min: Option<String>,
    max: Option<String>,
}

impl QueryParams {
    /// Unbounded ascending scan.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ascending() -> Self {
        Self::new().order(SortOrder::Ascending)
    }

    pub fn descending() -> Self {
        Self::new().order(SortOrder::Descending)
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn min(mut self, min: impl Into<String>) -> Self {
        self.min = Some(min.into());
        self
    }

    pub fn max(mut self, max: impl Into<String>) -> Self {
        self.max = Some(max.into());
        self
    }

    pub fn sort_order(&self) -> SortOrder {
        self.order
    }

    pub fn min_value(&self) -> Option<&str> {
        self.min.as_deref()
    }

    pub fn max_value(&self) -> Option<&str> {
        self.max.as_deref()
    }
}
