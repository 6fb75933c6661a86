//! `SET` fragments for partial updates.
//!
//! # Example
//!
//! ```ignore
//! use jobly::{FieldMap, UpdatePayload, sql_for_partial_update};
//!
//! let payload = UpdatePayload::new().set("firstName", "Aliya").set("age", 32);
//! let set = sql_for_partial_update(&payload, &FieldMap::new(&[("firstName", "first_name")]))?;
//!
//! assert_eq!(set.fragment(), r#""first_name"=$1, "age"=$2"#);
//! let sql = format!("UPDATE users SET {} WHERE id = ${}", set.fragment(), set.next_placeholder());
//! ```

use crate::error::{JoblyError, JoblyResult};
use crate::fields::{FieldMap, UpdatePayload};
use crate::fragment::{FragmentBuilder, QueryFragment};
use crate::ident::Ident;

/// Build `"col"=$1, "col"=$2, ...` from `payload`, in payload order.
///
/// Columns come from `fields`, falling back to the payload key. Values are
/// bound unconverted.
///
/// # Errors
/// - [`JoblyError::EmptyPayload`] if `payload` has no keys.
/// - [`JoblyError::Validation`] if a resolved column name is not a valid identifier.
pub fn sql_for_partial_update(
    payload: &UpdatePayload,
    fields: &FieldMap<'_>,
) -> JoblyResult<QueryFragment> {
    if payload.is_empty() {
        return Err(JoblyError::EmptyPayload);
    }

    let mut builder = FragmentBuilder::with_capacity(payload.len());
    for (key, value) in payload.iter() {
        let column = Ident::quoted(fields.column_for(key))?;
        builder.push_bound(&column.to_sql(), "=", value.clone());
    }

    let set = builder.finish(", ");
    #[cfg(feature = "tracing")]
    tracing::debug!(
        target: "jobly.sql",
        fragment = %set.fragment(),
        param_count = set.values().len(),
        "built partial update fragment"
    );
    Ok(set)
}
