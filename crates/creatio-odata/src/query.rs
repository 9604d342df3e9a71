//! OData query option builder.

/// Builder for the `$`-prefixed OData query options.
///
/// Options are passed through to the service opaquely; the client never
/// interprets filter expressions or field lists. Pairs serialize in a fixed
/// order so outgoing URLs are deterministic.
///
/// # Example
///
/// ```
/// use creatio_odata::QueryOptions;
///
/// let options = QueryOptions::new()
///     .top(5)
///     .select(["Id", "Subject"])
///     .filter("StatusId ne null");
/// assert_eq!(
///     options.to_pairs(),
///     vec![
///         ("$top".to_string(), "5".to_string()),
///         ("$select".to_string(), "Id,Subject".to_string()),
///         ("$filter".to_string(), "StatusId ne null".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    count: Option<bool>,
    skip: Option<u32>,
    top: Option<u32>,
    select: Vec<String>,
    expand: Vec<String>,
    order_by: Option<String>,
    filter: Option<String>,
    value_of: Option<String>,
    raw: Vec<(String, String)>,
}

impl QueryOptions {
    /// Create an empty set of query options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Include the total count of matching items (`$count`).
    pub fn count(mut self, include: bool) -> Self {
        self.count = Some(include);
        self
    }

    /// Skip the first `n` items (`$skip`).
    pub fn skip(mut self, n: u32) -> Self {
        self.skip = Some(n);
        self
    }

    /// Limit the number of items returned (`$top`).
    pub fn top(mut self, n: u32) -> Self {
        self.top = Some(n);
        self
    }

    /// Fields to include in the response (`$select`).
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Related entities to include in the response (`$expand`).
    pub fn expand<I, S>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expand.extend(entities.into_iter().map(Into::into));
        self
    }

    /// Ordering expression (`$orderby`), e.g. `"CreatedOn desc"`.
    pub fn order_by(mut self, expr: impl Into<String>) -> Self {
        self.order_by = Some(expr.into());
        self
    }

    /// Filter expression (`$filter`), passed through uninterpreted.
    pub fn filter(mut self, expr: impl Into<String>) -> Self {
        self.filter = Some(expr.into());
        self
    }

    /// Fetch the raw `$value` of a single field instead of the record.
    ///
    /// Only meaningful together with a record id; appends
    /// `/<field>/$value` to the request path rather than a query pair.
    pub fn value_of(mut self, field: impl Into<String>) -> Self {
        self.value_of = Some(field.into());
        self
    }

    /// Add a raw query parameter, bypassing the named options.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.raw.push((key.into(), value.into()));
        self
    }

    /// Returns the `$value` field projection, if any.
    pub fn value_field(&self) -> Option<&str> {
        self.value_of.as_deref()
    }

    /// Returns true if no query pairs would be emitted.
    pub fn is_empty(&self) -> bool {
        self.to_pairs().is_empty()
    }

    /// Serialize the options into query pairs, in a fixed order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(count) = self.count {
            pairs.push(("$count".to_string(), count.to_string()));
        }
        if let Some(skip) = self.skip {
            pairs.push(("$skip".to_string(), skip.to_string()));
        }
        if let Some(top) = self.top {
            pairs.push(("$top".to_string(), top.to_string()));
        }
        if !self.select.is_empty() {
            pairs.push(("$select".to_string(), self.select.join(",")));
        }
        if !self.expand.is_empty() {
            pairs.push(("$expand".to_string(), self.expand.join(",")));
        }
        if let Some(ref order_by) = self.order_by {
            pairs.push(("$orderby".to_string(), order_by.clone()));
        }
        if let Some(ref filter) = self.filter {
            pairs.push(("$filter".to_string(), filter.clone()));
        }
        pairs.extend(self.raw.iter().cloned());
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_options_produce_no_pairs() {
        assert!(QueryOptions::new().is_empty());
    }

    #[test]
    fn pairs_come_out_in_fixed_order() {
        let options = QueryOptions::new()
            .filter("Name eq 'x'")
            .top(10)
            .skip(20)
            .count(true);
        assert_eq!(
            options.to_pairs(),
            vec![
                ("$count".to_string(), "true".to_string()),
                ("$skip".to_string(), "20".to_string()),
                ("$top".to_string(), "10".to_string()),
                ("$filter".to_string(), "Name eq 'x'".to_string()),
            ]
        );
    }

    #[test]
    fn select_and_expand_join_with_commas() {
        let options = QueryOptions::new()
            .select(["Id", "Subject"])
            .expand(["Contact"]);
        assert_eq!(
            options.to_pairs(),
            vec![
                ("$select".to_string(), "Id,Subject".to_string()),
                ("$expand".to_string(), "Contact".to_string()),
            ]
        );
    }

    #[test]
    fn raw_params_pass_through_after_named_options() {
        let options = QueryOptions::new().top(1).param("foo", "bar");
        assert_eq!(
            options.to_pairs(),
            vec![
                ("$top".to_string(), "1".to_string()),
                ("foo".to_string(), "bar".to_string()),
            ]
        );
    }

    #[test]
    fn value_projection_is_not_a_query_pair() {
        let options = QueryOptions::new().value_of("Subject");
        assert!(options.is_empty());
        assert_eq!(options.value_field(), Some("Subject"));
    }
}
