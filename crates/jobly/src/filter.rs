//! WHERE fragments for resource searches.
//!
//! Each resource declares its filters as a static [`FilterSet`]: one entry per
//! recognized name with a fixed clause shape and value transform. Building is a
//! single pass over the declared order, so clause order never depends on the
//! caller's key order.
//!
//! # Example
//!
//! ```ignore
//! use jobly::{FilterCriteria, sql_for_filtering_companies};
//!
//! let criteria = FilterCriteria::new().set("minEmployees", 2).set("nameLike", "c");
//! let filter = sql_for_filtering_companies(&criteria)?;
//!
//! let sql = format!("SELECT handle, name FROM companies{} ORDER BY name", filter.where_clause());
//! let rows = conn.query(&sql, &filter.params_ref()).await?;
//! ```

use crate::error::{JoblyError, JoblyResult};
use crate::fields::FilterCriteria;
use crate::fragment::{FragmentBuilder, QueryFragment};
use crate::value::SqlValue;

/// How a filter value is turned into a bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Coerce to a number (`"2"` becomes `2`).
    Numeric,
    /// Bind as supplied.
    PassThrough,
    /// Wrap as `%value%` for substring matching.
    Contains,
}

impl Transform {
    fn apply(self, filter: &'static str, value: &SqlValue) -> JoblyResult<SqlValue> {
        match self {
            Transform::Numeric => value.to_number().ok_or_else(|| {
                JoblyError::invalid_filter_value(filter, format!("expected a number, got {value:?}"))
            }),
            Transform::PassThrough => Ok(value.clone()),
            Transform::Contains => value
                .to_pattern_text()
                .map(|text| SqlValue::Text(format!("%{text}%")))
                .ok_or_else(|| {
                    JoblyError::invalid_filter_value(filter, format!("expected text, got {value:?}"))
                }),
        }
    }
}

/// The clause a present filter contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    /// `<lhs> $n`, binding the transformed value.
    Bound { lhs: &'static str, transform: Transform },
    /// A fixed predicate with no bound value, applied only when the value is truthy.
    /// Falsy, null and unrecognized values omit it.
    Gate(&'static str),
}

/// One recognized filter name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    pub name: &'static str,
    pub clause: Clause,
}

impl FilterField {
    pub const fn bound(name: &'static str, lhs: &'static str, transform: Transform) -> Self {
        Self {
            name,
            clause: Clause::Bound { lhs, transform },
        }
    }

    pub const fn gate(name: &'static str, predicate: &'static str) -> Self {
        Self {
            name,
            clause: Clause::Gate(predicate),
        }
    }

    /// Whether a present filter binds a value.
    pub fn emits_value(&self) -> bool {
        matches!(self.clause, Clause::Bound { .. })
    }
}

/// The declared filters of one resource, in build order.
#[derive(Debug, Clone, Copy)]
pub struct FilterSet {
    pub resource: &'static str,
    pub fields: &'static [FilterField],
}

impl FilterSet {
    pub const fn new(resource: &'static str, fields: &'static [FilterField]) -> Self {
        Self { resource, fields }
    }

    fn field(&self, name: &str) -> Option<&FilterField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether `name` is a declared filter.
    pub fn recognizes(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Build an ` AND `-joined predicate (no `WHERE` keyword) and its values.
    ///
    /// An empty fragment means "no constraint"; callers must then omit the
    /// `WHERE` keyword (see [`QueryFragment::where_clause`]).
    ///
    /// # Errors
    /// - [`JoblyError::UnrecognizedFilter`] for any key outside this set.
    /// - [`JoblyError::InvalidFilterValue`] when a transform rejects a value.
    pub fn build(&self, criteria: &FilterCriteria) -> JoblyResult<QueryFragment> {
        if let Some(key) = criteria.keys().find(|k| !self.recognizes(k)) {
            return Err(JoblyError::UnrecognizedFilter {
                resource: self.resource,
                key: key.to_string(),
            });
        }

        let mut builder = FragmentBuilder::with_capacity(criteria.len());
        for field in self.fields {
            let Some(value) = criteria.get(field.name) else {
                continue;
            };
            match field.clause {
                Clause::Bound { lhs, transform } => {
                    let bound = transform.apply(field.name, value)?;
                    builder.push_bound(lhs, " ", bound);
                }
                // Anything not recognizably true leaves the gate off.
                Clause::Gate(predicate) => {
                    if value.truthiness().unwrap_or(false) {
                        builder.push_fixed(predicate);
                    }
                }
            }
        }

        let filter = builder.finish(" AND ");
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "jobly.sql",
            resource = self.resource,
            fragment = %filter.fragment(),
            param_count = filter.values().len(),
            "built filter fragment"
        );
        Ok(filter)
    }
}

static COMPANY_FIELDS: [FilterField; 3] = [
    FilterField::bound("minEmployees", r#""num_employees" >="#, Transform::Numeric),
    FilterField::bound("maxEmployees", r#""num_employees" <="#, Transform::Numeric),
    FilterField::bound("nameLike", r#""name" ILIKE"#, Transform::Contains),
];

static JOB_FIELDS: [FilterField; 3] = [
    FilterField::bound("minSalary", "salary >=", Transform::PassThrough),
    FilterField::gate("hasEquity", "equity > 0"),
    FilterField::bound("title", "title ILIKE", Transform::Contains),
];

/// Company search filters.
pub static COMPANY_FILTERS: FilterSet = FilterSet::new("company", &COMPANY_FIELDS);

/// Job search filters.
pub static JOB_FILTERS: FilterSet = FilterSet::new("job", &JOB_FIELDS);

/// WHERE fragment for a company search.
pub fn sql_for_filtering_companies(criteria: &FilterCriteria) -> JoblyResult<QueryFragment> {
    COMPANY_FILTERS.build(criteria)
}

/// WHERE fragment for a job search.
pub fn sql_for_filtering_jobs(criteria: &FilterCriteria) -> JoblyResult<QueryFragment> {
    JOB_FILTERS.build(criteria)
}

#[cfg(test)]
mod tests;
