//! `SQLite` implementation of [`ReportRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use sensorhub_app::ports::ReportRepository;
use sensorhub_domain::device::DeviceSummary;
use sensorhub_domain::error::SensorHubError;
use sensorhub_domain::id::{DeviceId, ReportId, UserId};
use sensorhub_domain::pagination::PageRequest;
use sensorhub_domain::report::{Report, ReportWithDevice};
use sensorhub_domain::time::{parse_rfc3339, to_sortable};

use crate::error::StorageError;
use crate::reading_repo::decode_err;

/// Report row joined with its device.
struct Wrapper(ReportWithDevice);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        let device_id: String = row.try_get("device_id")?;
        let from: String = row.try_get("from_ts")?;
        let to: String = row.try_get("to_ts")?;
        let created_at: String = row.try_get("created_at")?;

        let device_id = DeviceId::from_str(&device_id).map_err(decode_err)?;
        let report = Report {
            id: ReportId::from_str(&id).map_err(decode_err)?,
            user_id: UserId::new(user_id).map_err(decode_err)?,
            device_id,
            from: parse_rfc3339(&from).map_err(decode_err)?,
            to: parse_rfc3339(&to).map_err(decode_err)?,
            file_url: row.try_get("file_url")?,
            created_at: parse_rfc3339(&created_at).map_err(decode_err)?,
        };
        let device = DeviceSummary {
            id: device_id,
            name: row.try_get("device_name")?,
            serial: row.try_get("device_serial")?,
        };

        Ok(Self(ReportWithDevice { report, device }))
    }
}

const INSERT: &str = r"
    INSERT INTO reports (id, user_id, device_id, from_ts, to_ts, file_url, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";

const LIST_BY_USER: &str = r"
    SELECT p.*, d.name AS device_name, d.serial AS device_serial
    FROM reports p JOIN devices d ON d.id = p.device_id
    WHERE p.user_id = ?
    ORDER BY p.created_at DESC, p.rowid DESC
    LIMIT ? OFFSET ?
";

const COUNT_BY_USER: &str = "SELECT COUNT(*) FROM reports WHERE user_id = ?";

/// `SQLite`-backed report repository.
pub struct SqliteReportRepository {
    pool: SqlitePool,
}

impl SqliteReportRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ReportRepository for SqliteReportRepository {
    async fn create(&self, report: Report) -> Result<Report, SensorHubError> {
        sqlx::query(INSERT)
            .bind(report.id.to_string())
            .bind(report.user_id.as_str())
            .bind(report.device_id.to_string())
            .bind(to_sortable(report.from))
            .bind(to_sortable(report.to))
            .bind(&report.file_url)
            .bind(to_sortable(report.created_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(report)
    }

    async fn list_by_user(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Vec<ReportWithDevice>, SensorHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(LIST_BY_USER)
            .bind(user_id.as_str())
            .bind(i64::from(page.limit))
            .bind(i64::from(page.offset))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn count_by_user(&self, user_id: UserId) -> Result<u64, SensorHubError> {
        let total: i64 = sqlx::query_scalar(COUNT_BY_USER)
            .bind(user_id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(u64::try_from(total).unwrap_or_default())
    }
}
