use super::{ensure_updatable, log_statement};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::fields::{FieldMap, FilterCriteria, UpdatePayload};
use crate::filter::sql_for_filtering_jobs;
use crate::partial_update::sql_for_partial_update;
use crate::row::{FromRow, RowExt};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

const COLUMNS: &str = "id, title, salary, equity, company_handle";

const UPDATABLE: &[&str] = &["title", "salary", "equity"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Input for [`Job::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

fn no_job(id: i32) -> JoblyError {
    JoblyError::not_found(format!("No such job: {id}"))
}

impl Job {
    /// Insert a job for an existing company.
    ///
    /// # Errors
    /// [`JoblyError::NotFound`] if `company_handle` names no company.
    pub async fn create(conn: &impl GenericClient, data: &NewJob) -> JoblyResult<Job> {
        let company = conn
            .query_opt(
                "SELECT handle FROM companies WHERE handle = $1",
                &[&data.company_handle],
            )
            .await?;
        if company.is_none() {
            return Err(JoblyError::not_found(format!(
                "No such company: {}",
                data.company_handle
            )));
        }

        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        log_statement(&sql, 4);
        let row = conn
            .query_one(
                &sql,
                &[
                    &data.title,
                    &data.salary,
                    &data.equity,
                    &data.company_handle,
                ],
            )
            .await?;
        Job::from_row(&row)
    }

    /// All jobs matching `criteria`, ordered by title then id.
    pub async fn find_all(
        conn: &impl GenericClient,
        criteria: &FilterCriteria,
    ) -> JoblyResult<Vec<Job>> {
        let filter = sql_for_filtering_jobs(criteria)?;
        let sql = format!(
            "SELECT {COLUMNS} FROM jobs{} ORDER BY title, id",
            filter.where_clause()
        );
        log_statement(&sql, filter.values().len());

        let rows = conn.query(&sql, &filter.params_ref()).await?;
        Job::from_rows(&rows)
    }

    pub async fn get(conn: &impl GenericClient, id: i32) -> JoblyResult<Job> {
        let sql = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        log_statement(&sql, 1);
        let row = conn.query_opt(&sql, &[&id]).await?.ok_or_else(|| no_job(id))?;
        Job::from_row(&row)
    }

    pub(crate) async fn for_company(
        conn: &impl GenericClient,
        handle: &str,
    ) -> JoblyResult<Vec<Job>> {
        let sql = format!("SELECT {COLUMNS} FROM jobs WHERE company_handle = $1 ORDER BY id");
        log_statement(&sql, 1);
        let rows = conn.query(&sql, &[&handle]).await?;
        Job::from_rows(&rows)
    }

    /// Change only the supplied fields.
    ///
    /// Accepts `title`, `salary` and `equity`; id and company are fixed.
    pub async fn update(
        conn: &impl GenericClient,
        id: i32,
        payload: &UpdatePayload,
    ) -> JoblyResult<Job> {
        ensure_updatable("job", payload, UPDATABLE)?;
        let set = sql_for_partial_update(payload, &FieldMap::empty())?;
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {COLUMNS}",
            set.fragment(),
            set.next_placeholder()
        );

        let mut params: Vec<&(dyn ToSql + Sync)> = set.params_ref();
        params.push(&id);
        log_statement(&sql, params.len());

        let row = conn.query_opt(&sql, &params).await?.ok_or_else(|| no_job(id))?;
        Job::from_row(&row)
    }

    pub async fn remove(conn: &impl GenericClient, id: i32) -> JoblyResult<()> {
        let sql = "DELETE FROM jobs WHERE id = $1";
        log_statement(sql, 1);
        match conn.execute(sql, &[&id]).await? {
            0 => Err(no_job(id)),
            _ => Ok(()),
        }
    }
}
