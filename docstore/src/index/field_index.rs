use itertools::Either;
use std::collections::{BTreeSet, HashMap};
use std::ops::Bound::{self, Included, Unbounded};

use crate::collection::{Document, QueryParams};
use crate::common::SortOrder;

/// Secondary index over one string-valued document field.
///
/// # Structure
/// - `order`: the distinct indexed values in byte-wise lexicographic order
/// - `holders`: indexed value to the primary keys of the live documents
///   holding it, oldest writer first
///
/// # Duplicate values
/// A value resolves to a single key, the most recent writer among its
/// holders. A range scan returns that document once and never the others.
/// When the resolving document is deleted or moves to another value, the
/// value passes to the latest remaining holder; it leaves the tree only once
/// no live document holds it.
///
/// Documents whose field is missing or not a string are not indexed.
#[derive(Debug, Clone, Default)]
pub(crate) struct FieldIndex {
    field: String,
    order: BTreeSet<String>,
    holders: HashMap<String, Vec<String>>,
}

impl FieldIndex {
    pub fn new(field: &str) -> Self {
        FieldIndex {
            field: field.to_string(),
            order: BTreeSet::new(),
            holders: HashMap::new(),
        }
    }

    /// Builds an index from the documents already stored, keyed by primary key.
    pub fn build<'a>(
        field: &str,
        documents: impl IntoIterator<Item = (&'a String, &'a Document)>,
    ) -> Self {
        let mut index = FieldIndex::new(field);
        for (key, document) in documents {
            index.add_document(key, document);
        }
        index
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn add_document(&mut self, key: &str, document: &Document) {
        if let Some(value) = document.get_str(&self.field) {
            self.insert(value, key);
        }
    }

    pub fn remove_document(&mut self, key: &str, document: &Document) {
        if let Some(value) = document.get_str(&self.field) {
            self.remove(value, key);
        }
    }

    /// Records `key` as the latest writer of `value`.
    pub fn insert(&mut self, value: &str, key: &str) {
        if !self.order.contains(value) {
            self.order.insert(value.to_string());
        }
        let keys = self.holders.entry(value.to_string()).or_default();
        keys.retain(|holder| holder != key);
        keys.push(key.to_string());
    }

    /// Drops `key` from the holders of `value`. Returns `true` when no holder
    /// is left and the value leaves the index.
    pub fn remove(&mut self, value: &str, key: &str) -> bool {
        let Some(keys) = self.holders.get_mut(value) else {
            return false;
        };
        keys.retain(|holder| holder != key);
        if !keys.is_empty() {
            return false;
        }
        self.holders.remove(value);
        self.order.remove(value);
        true
    }

    /// Makes `key` the key `value` resolves to. Fails when `key` does not
    /// hold `value`.
    pub fn promote(&mut self, value: &str, key: &str) -> bool {
        match self.holders.get_mut(value) {
            Some(keys) => match keys.iter().position(|holder| holder == key) {
                Some(at) => {
                    let owner = keys.remove(at);
                    keys.push(owner);
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    /// The key `value` resolves to.
    pub fn lookup(&self, value: &str) -> Option<&str> {
        self.holders
            .get(value)
            .and_then(|keys| keys.last())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn ordered_values(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Every indexed value paired with the key it resolves to.
    pub fn lookup_table(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .filter_map(|value| self.lookup(value).map(|key| (value.as_str(), key)))
    }

    /// Walks the indexed values selected by `params` in the requested direction.
    pub fn scan<'a>(&'a self, params: &'a QueryParams) -> impl Iterator<Item = &'a str> + 'a {
        let range = ScanRange::from_params(params);
        if range.is_empty() {
            return Either::Left(std::iter::empty());
        }

        let values = self
            .order
            .range::<str, _>((range.lower, range.upper))
            .map(String::as_str);
        if range.order.is_descending() {
            Either::Right(Either::Right(values.rev()))
        } else {
            Either::Right(Either::Left(values))
        }
    }
}

/// Resolved bounds of one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScanRange<'a> {
    order: SortOrder,
    lower: Bound<&'a str>,
    upper: Bound<&'a str>,
}

impl<'a> ScanRange<'a> {
    fn from_params(params: &'a QueryParams) -> Self {
        let order = params.sort_order();
        let (lower, upper) = match (order, params.min_value(), params.max_value()) {
            (_, Some(min), Some(max)) => (Included(min), Included(max)),
            (SortOrder::Ascending, Some(min), None) => (Included(min), Unbounded),
            (SortOrder::Descending, None, Some(max)) => (Unbounded, Included(max)),
            // descending with only min, ascending with only max, or no bounds
            _ => (Unbounded, Unbounded),
        };
        ScanRange {
            order,
            lower,
            upper,
        }
    }

    /// `BTreeSet::range` panics on an inverted range, so it is checked first.
    fn is_empty(&self) -> bool {
        match (self.lower, self.upper) {
            (Included(min), Included(max)) => min > max,
            _ => false,
        }
    }
}
