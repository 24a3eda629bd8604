//! Query-string serialization.
//!
//! Two styles exist side by side:
//!
//! - object style: a serde struct whose `None` fields are skipped, encoded
//!   with `serde_urlencoded`. Only works for scalar fields.
//! - manual style: `QueryBuilder`, which appends one pair per present scalar
//!   and one pair per array element (`Statuses=a&Statuses=b`).
//!
//! Either way, absent values and empty strings never reach the wire, and a
//! URL never ends in a bare `?`.

use std::fmt::Display;

use serde::Serialize;

/// Ordered list of already-encoded `key=value` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryBuilder {
    pairs: Vec<String>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key=value`, percent-encoding the value.
    pub fn push(mut self, key: &str, value: impl Display) -> Self {
        let value = value.to_string();
        self.pairs
            .push(format!("{key}={}", urlencoding::encode(&value)));
        self
    }

    /// Append `key=value` when `value` is present.
    pub fn push_opt<V: Display>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.push(key, v),
            None => self,
        }
    }

    /// Append `key=value` when `value` is present and non-empty.
    pub fn push_text(self, key: &str, value: Option<&str>) -> Self {
        self.push_opt(key, value.filter(|v| !v.is_empty()))
    }

    /// Append one `key=value` pair per element, in order.
    pub fn push_all<I>(self, key: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        values.into_iter().fold(self, |q, v| q.push(key, v))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The pairs joined with `&`.
    pub fn finish(self) -> String {
        self.pairs.join("&")
    }

    /// `base` with the query appended, or `base` alone when nothing was pushed.
    pub fn append_to(self, base: &str) -> String {
        with_query(base, &self.finish())
    }
}

/// Serialize a flat struct of optional scalars (object style).
pub fn encode_object<T: Serialize>(params: &T) -> Result<String, serde_urlencoded::ser::Error> {
    serde_urlencoded::to_string(params)
}

/// Join `base` and `query`, omitting the `?` for an empty query.
pub fn with_query(base: &str, query: &str) -> String {
    if query.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{query}")
    }
}

/// `None` for absent or empty strings.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrays_become_repeated_pairs() {
        let q = QueryBuilder::new()
            .push("PageNumer", 2)
            .push_all("Statuses", ["Pending", "Paid"])
            .finish();
        assert_eq!(q, "PageNumer=2&Statuses=Pending&Statuses=Paid");
    }

    #[test]
    fn absent_and_empty_values_are_skipped() {
        let q = QueryBuilder::new()
            .push_opt::<u32>("PageSize", None)
            .push_text("SearchValue", Some(""))
            .push_text("SortColumn", None)
            .push_all("Statuses", Vec::<String>::new());
        assert!(q.is_empty());
        assert_eq!(q.append_to("http://h/all-orders"), "http://h/all-orders");
    }

    #[test]
    fn values_are_percent_encoded() {
        let q = QueryBuilder::new()
            .push_text("SearchValue", Some("ali & co"))
            .finish();
        assert_eq!(q, "SearchValue=ali%20%26%20co");
    }

    #[test]
    fn object_style_skips_none() {
        #[derive(Serialize)]
        struct Wire<'a> {
            #[serde(rename = "PageNumer")]
            page: u32,
            #[serde(rename = "SearchValue", skip_serializing_if = "Option::is_none")]
            search: Option<&'a str>,
        }
        let q = encode_object(&Wire { page: 1, search: None }).unwrap();
        assert_eq!(q, "PageNumer=1");
        let q = encode_object(&Wire {
            page: 3,
            search: Some("a b"),
        })
        .unwrap();
        assert_eq!(q, "PageNumer=3&SearchValue=a+b");
    }

    #[test]
    fn with_query_never_leaves_bare_question_mark() {
        assert_eq!(with_query("http://h/x", ""), "http://h/x");
        assert_eq!(with_query("http://h/x", "a=1"), "http://h/x?a=1");
    }
}
