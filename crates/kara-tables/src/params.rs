//! Request query parameters.
//!
//! [`QueryParams`] keeps every `name=value` pair of a query string in its
//! original order, so repeated parameters such as `order=-price&order=name`
//! survive a parse / modify / encode cycle unchanged.

use std::fmt;

use url::form_urlencoded;

/// Ordered, multi-valued query string parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Creates an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a URL query string. A leading `?` is ignored.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        QueryParams {
            pairs: form_urlencoded::parse(query.as_bytes())
                .map(|(name, value)| (name.into_owned(), value.into_owned()))
                .collect(),
        }
    }

    /// Builds a parameter list from explicit pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        QueryParams {
            pairs: pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }

    /// Returns the last value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns every value for `name`, in order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Returns `true` if `name` is present at least once.
    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(key, _)| key == name)
    }

    /// Returns a copy where `name` is replaced by `values`, appended at the end.
    pub fn with_values<I, V>(&self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let mut params = self.without(name);
        params
            .pairs
            .extend(values.into_iter().map(|value| (name.to_string(), value.into())));
        params
    }

    /// Returns a copy where `name` has the single value `value`.
    pub fn with_value(&self, name: &str, value: impl Into<String>) -> Self {
        self.with_values(name, [value.into()])
    }

    /// Returns a copy with every occurrence of `name` removed.
    pub fn without(&self, name: &str) -> Self {
        QueryParams {
            pairs: self
                .pairs
                .iter()
                .filter(|(key, _)| key != name)
                .cloned()
                .collect(),
        }
    }

    /// Returns `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates over all `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Encodes the parameters without a leading `?`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.to_query_string())
    }
}
