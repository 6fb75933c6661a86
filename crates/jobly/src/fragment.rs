//! SQL fragments paired with their bound values.

use crate::value::SqlValue;
use std::fmt::Write;
use tokio_postgres::types::ToSql;

/// A SQL fragment using `$1..$n` placeholders and the values they bind.
///
/// Placeholder `$k` binds `values()[k - 1]`. Fragment and values are always
/// produced together by one builder pass.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryFragment {
    fragment: String,
    values: Vec<SqlValue>,
}

impl QueryFragment {
    /// The clause text (no leading `SET`/`WHERE`).
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// `true` when no clause was produced (an unconstrained filter).
    pub fn is_empty(&self) -> bool {
        self.fragment.is_empty()
    }

    /// Index for a placeholder appended after this fragment's own.
    ///
    /// Used for trailing keys, e.g. `... WHERE handle = $<next>`.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }

    /// `" WHERE <fragment>"`, or `""` when the fragment is empty.
    pub fn where_clause(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.fragment)
        }
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values
            .iter()
            .map(|v| v as &(dyn ToSql + Sync))
            .collect()
    }

    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.fragment, self.values)
    }
}

/// Collects clauses and values in one pass.
///
/// A bound clause appends its value first and then renders its placeholder as
/// the current number of values, so absent filters and value-less clauses can
/// never shift the numbering.
#[derive(Debug, Default)]
pub(crate) struct FragmentBuilder {
    clauses: Vec<String>,
    values: Vec<SqlValue>,
}

impl FragmentBuilder {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            clauses: Vec::with_capacity(n),
            values: Vec::with_capacity(n),
        }
    }

    /// Append `<lhs><sep>$<n>` binding `value`.
    pub(crate) fn push_bound(&mut self, lhs: &str, sep: &str, value: SqlValue) {
        self.values.push(value);
        let mut clause = String::with_capacity(lhs.len() + sep.len() + 4);
        clause.push_str(lhs);
        clause.push_str(sep);
        let _ = write!(&mut clause, "${}", self.values.len());
        self.clauses.push(clause);
    }

    /// Append a clause that binds nothing.
    pub(crate) fn push_fixed(&mut self, clause: &str) {
        self.clauses.push(clause.to_string());
    }

    /// Join clauses with `separator`.
    pub(crate) fn finish(self, separator: &str) -> QueryFragment {
        QueryFragment {
            fragment: self.clauses.join(separator),
            values: self.values,
        }
    }
}

/// Count distinct `$n` placeholders in `sql`.
pub fn placeholder_count(sql: &str) -> usize {
    let bytes = sql.as_bytes();
    let mut seen = std::collections::BTreeSet::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            if end > start {
                if let Ok(n) = sql[start..end].parse::<usize>() {
                    seen.insert(n);
                }
            }
            i = end.max(i + 1);
        } else {
            i += 1;
        }
    }
    seen.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clauses_do_not_consume_placeholders() {
        let mut b = FragmentBuilder::default();
        b.push_fixed("equity > 0");
        b.push_bound("title", " ILIKE ", SqlValue::from("%x%"));
        let frag = b.finish(" AND ");
        assert_eq!(frag.fragment(), "equity > 0 AND title ILIKE $1");
        assert_eq!(frag.values(), &[SqlValue::from("%x%")]);
    }

    #[test]
    fn empty_builder_yields_empty_fragment() {
        let frag = FragmentBuilder::default().finish(" AND ");
        assert!(frag.is_empty());
        assert_eq!(frag.where_clause(), "");
        assert!(frag.values().is_empty());
        assert_eq!(frag.next_placeholder(), 1);
    }

    #[test]
    fn where_clause_prefixes_keyword() {
        let mut b = FragmentBuilder::with_capacity(1);
        b.push_bound("salary", " >= ", SqlValue::Int(100));
        let frag = b.finish(" AND ");
        assert_eq!(frag.where_clause(), " WHERE salary >= $1");
        assert_eq!(frag.next_placeholder(), 2);
        assert_eq!(frag.params_ref().len(), 1);
    }

    #[test]
    fn counts_distinct_placeholders() {
        assert_eq!(placeholder_count("a = $1 AND b = $2"), 2);
        assert_eq!(placeholder_count("a = $1 OR a = $1"), 1);
        assert_eq!(placeholder_count("equity > 0"), 0);
        assert_eq!(placeholder_count("$10 $"), 1);
    }
}
