//! An ordered multimap of query parameters.

use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Query parameters as an ordered list of key/value pairs.
///
/// Keys may repeat (ERM endpoints accept several `filters`). Two parameter
/// sets are equal when they hold the same pairs, regardless of order, since
/// servers do not depend on parameter order.
///
/// `QueryParameters` serializes as a sequence of pairs, so it can be passed
/// directly to `reqwest::RequestBuilder::query`.
///
/// # Example
///
/// ```rust
/// use folio_client::QueryParameters;
///
/// let mut params = QueryParameters::new();
/// params.push("filters", "name=~A");
/// params.push("filters", "id>0");
/// params.push("perPage", "100");
///
/// assert_eq!(params.get("perPage"), Some("100"));
/// assert_eq!(params.get_all("filters"), vec!["name=~A", "id>0"]);
///
/// let reordered: QueryParameters =
///     [("perPage", "100"), ("filters", "id>0"), ("filters", "name=~A")].into_iter().collect();
/// assert_eq!(params, reordered);
/// ```
#[derive(Clone, Debug, Default)]
pub struct QueryParameters {
    pairs: Vec<(String, String)>,
}

impl QueryParameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Appends a pair, keeping any existing values for `key`.
    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.pairs.push((key.into(), value.to_string()));
    }

    /// Replaces all values for `key` with a single value.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        self.pairs.retain(|(k, _)| *k != key);
        self.pairs.push((key, value.to_string()));
    }

    /// Removes all values for `key`.
    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    /// Returns the first value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value for `key`, in insertion order.
    #[must_use]
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Returns `true` if at least one value exists for `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Iterates over the pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn sorted(&self) -> Vec<&(String, String)> {
        let mut pairs: Vec<_> = self.pairs.iter().collect();
        pairs.sort();
        pairs
    }
}

impl PartialEq for QueryParameters {
    fn eq(&self, other: &Self) -> bool {
        self.pairs.len() == other.pairs.len() && self.sorted() == other.sorted()
    }
}

impl Eq for QueryParameters {}

impl<K, V> FromIterator<(K, V)> for QueryParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Serialize for QueryParameters {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.pairs.len()))?;
        for (k, v) in &self.pairs {
            seq.serialize_element(&(k, v))?;
        }
        seq.end()
    }
}
