//! # jobly
//!
//! Parameterized SQL fragments and resource models for a job-board store on Postgres.
//!
//! ## Features
//!
//! - **Partial updates**: `SET` lists built from only the fields a caller supplied
//! - **Search filters**: declared per-resource filter tables produce `WHERE` predicates
//! - **Placeholders in step with values**: every `$n` refers to `values[n - 1]`
//! - **Transaction-friendly**: models accept any `GenericClient`
//!
//! ## Partial update
//!
//! ```ignore
//! use jobly::{FieldMap, UpdatePayload, sql_for_partial_update};
//!
//! let payload = UpdatePayload::new().set("firstName", "Aliya").set("age", 32);
//! let set = sql_for_partial_update(&payload, &FieldMap::new(&[("firstName", "first_name")]))?;
//!
//! assert_eq!(set.fragment(), r#""first_name"=$1, "age"=$2"#);
//! let sql = format!("UPDATE users SET {} WHERE username = ${}", set.fragment(), set.next_placeholder());
//! ```
//!
//! ## Filtering
//!
//! ```ignore
//! use jobly::{Company, FilterCriteria};
//!
//! let criteria: FilterCriteria = serde_json::from_str(r#"{"minEmployees": 2, "nameLike": "c"}"#)?;
//! let companies = Company::find_all(&client, &criteria).await?;
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod fields;
pub mod filter;
pub mod fragment;
pub mod ident;
pub mod models;
pub mod partial_update;
pub mod row;
pub mod value;

pub use auth::{AuthContext, ensure_admin, ensure_admin_or_correct_user, ensure_logged_in};
pub use client::GenericClient;
pub use config::DatabaseConfig;
pub use error::{JoblyError, JoblyResult};
pub use fields::{FieldMap, FilterCriteria, UpdatePayload};
pub use filter::{
    COMPANY_FILTERS, FilterField, FilterSet, JOB_FILTERS, Transform, sql_for_filtering_companies,
    sql_for_filtering_jobs,
};
pub use fragment::{QueryFragment, placeholder_count};
pub use ident::Ident;
pub use models::{Company, CompanyWithJobs, Job, NewCompany, NewJob};
pub use partial_update::sql_for_partial_update;
pub use row::{FromRow, RowExt};
pub use value::SqlValue;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_from, create_pool_with_config};
