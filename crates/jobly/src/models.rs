//! Company and job records over any [`GenericClient`](crate::GenericClient).
//!
//! Searches go through the filter builders and partial updates through
//! [`sql_for_partial_update`](crate::sql_for_partial_update); every other
//! statement is fixed SQL.

mod company;
mod job;

pub use company::{Company, CompanyWithJobs, NewCompany};
pub use job::{Job, NewJob};

use crate::error::{JoblyError, JoblyResult};
use crate::fields::UpdatePayload;

#[cfg(feature = "tracing")]
fn log_statement(sql: &str, param_count: usize) {
    tracing::debug!(target: "jobly.sql", sql = %sql, param_count, "executing statement");
}

#[cfg(not(feature = "tracing"))]
fn log_statement(_sql: &str, _param_count: usize) {}

/// Reject payload keys a resource does not allow to change.
fn ensure_updatable(
    resource: &str,
    payload: &UpdatePayload,
    allowed: &[&str],
) -> JoblyResult<()> {
    match payload.keys().find(|key| !allowed.contains(key)) {
        Some(key) => Err(JoblyError::bad_request(format!(
            "Cannot update {resource} field: {key}"
        ))),
        None => Ok(()),
    }
}
