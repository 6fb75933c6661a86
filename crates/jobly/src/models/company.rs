use super::{ensure_updatable, log_statement};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::fields::{FieldMap, FilterCriteria, UpdatePayload};
use crate::filter::sql_for_filtering_companies;
use crate::models::Job;
use crate::partial_update::sql_for_partial_update;
use crate::row::{FromRow, RowExt};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

const COLUMNS: &str = "handle, name, description, num_employees, logo_url";

static UPDATE_COLUMNS: FieldMap<'static> =
    FieldMap::new(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")]);

const UPDATABLE: &[&str] = &["name", "description", "numEmployees", "logoUrl"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// Input for [`Company::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// A company together with its jobs, ordered by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyWithJobs {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<Job>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("num_employees")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

fn no_company(handle: &str) -> JoblyError {
    JoblyError::not_found(format!("No company: {handle}"))
}

impl Company {
    /// Insert a company.
    ///
    /// # Errors
    /// [`JoblyError::BadRequest`] if the handle is already taken.
    pub async fn create(conn: &impl GenericClient, data: &NewCompany) -> JoblyResult<Company> {
        let duplicate = conn
            .query_opt(
                "SELECT handle FROM companies WHERE handle = $1",
                &[&data.handle],
            )
            .await?;
        if duplicate.is_some() {
            return Err(duplicate_company(&data.handle));
        }

        let sql = format!(
            "INSERT INTO companies ({COLUMNS}) VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        );
        log_statement(&sql, 5);
        let row = conn
            .query_one(
                &sql,
                &[
                    &data.handle,
                    &data.name,
                    &data.description,
                    &data.num_employees,
                    &data.logo_url,
                ],
            )
            .await
            .map_err(|e| {
                // Lost a race with a concurrent insert of the same handle.
                if e.is_unique_violation() {
                    duplicate_company(&data.handle)
                } else {
                    e
                }
            })?;
        Company::from_row(&row)
    }

    /// All companies matching `criteria`, ordered by name.
    pub async fn find_all(
        conn: &impl GenericClient,
        criteria: &FilterCriteria,
    ) -> JoblyResult<Vec<Company>> {
        let filter = sql_for_filtering_companies(criteria)?;
        let sql = format!(
            "SELECT {COLUMNS} FROM companies{} ORDER BY name",
            filter.where_clause()
        );
        log_statement(&sql, filter.values().len());

        let rows = conn.query(&sql, &filter.params_ref()).await?;
        Company::from_rows(&rows)
    }

    /// One company with its jobs.
    pub async fn get(conn: &impl GenericClient, handle: &str) -> JoblyResult<CompanyWithJobs> {
        let sql = format!("SELECT {COLUMNS} FROM companies WHERE handle = $1");
        log_statement(&sql, 1);
        let row = conn
            .query_opt(&sql, &[&handle])
            .await?
            .ok_or_else(|| no_company(handle))?;
        let company = Company::from_row(&row)?;
        let jobs = Job::for_company(conn, handle).await?;
        Ok(CompanyWithJobs { company, jobs })
    }

    /// Change only the supplied fields.
    ///
    /// Accepts `name`, `description`, `numEmployees` and `logoUrl`.
    pub async fn update(
        conn: &impl GenericClient,
        handle: &str,
        payload: &UpdatePayload,
    ) -> JoblyResult<Company> {
        ensure_updatable("company", payload, UPDATABLE)?;
        let set = sql_for_partial_update(payload, &UPDATE_COLUMNS)?;
        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${} RETURNING {COLUMNS}",
            set.fragment(),
            set.next_placeholder()
        );

        let mut params: Vec<&(dyn ToSql + Sync)> = set.params_ref();
        params.push(&handle);
        log_statement(&sql, params.len());

        let row = conn
            .query_opt(&sql, &params)
            .await?
            .ok_or_else(|| no_company(handle))?;
        Company::from_row(&row)
    }

    /// Delete a company; its jobs go with it.
    pub async fn remove(conn: &impl GenericClient, handle: &str) -> JoblyResult<()> {
        let sql = "DELETE FROM companies WHERE handle = $1";
        log_statement(sql, 1);
        match conn.execute(sql, &[&handle]).await? {
            0 => Err(no_company(handle)),
            _ => Ok(()),
        }
    }
}

fn duplicate_company(handle: &str) -> JoblyError {
    JoblyError::bad_request(format!("Duplicate company: {handle}"))
}
