//! `SQLite` implementation of [`ReadingRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, Sqlite, SqlitePool};

use sensorhub_app::ports::{ReadingFilter, ReadingRepository};
use sensorhub_domain::device::DeviceSummary;
use sensorhub_domain::error::SensorHubError;
use sensorhub_domain::id::{DeviceId, ReadingId};
use sensorhub_domain::pagination::PageRequest;
use sensorhub_domain::reading::{Reading, ReadingWithDevice};
use sensorhub_domain::time::{parse_rfc3339, to_sortable};

use crate::error::StorageError;

pub(crate) fn decode_err<E>(err: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::Decode(Box::new(err))
}

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(Reading);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let device_id: String = row.try_get("device_id")?;
        let recorded_at: String = row.try_get("recorded_at")?;

        Ok(Self(Reading {
            id: ReadingId::from_str(&id).map_err(decode_err)?,
            device_id: DeviceId::from_str(&device_id).map_err(decode_err)?,
            tvoc: row.try_get("tvoc")?,
            eco2: row.try_get("eco2")?,
            temperature: row.try_get("temperature")?,
            humidity: row.try_get("humidity")?,
            status_msg: row.try_get("status_msg")?,
            recorded_at: parse_rfc3339(&recorded_at).map_err(decode_err)?,
        }))
    }
}

/// A reading row joined with its device.
struct JoinedWrapper(ReadingWithDevice);

impl<'r> FromRow<'r, SqliteRow> for JoinedWrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let Wrapper(reading) = Wrapper::from_row(row)?;
        let device = DeviceSummary {
            id: reading.device_id,
            name: row.try_get("device_name")?,
            serial: row.try_get("device_serial")?,
        };
        Ok(Self(ReadingWithDevice { reading, device }))
    }
}

const INSERT: &str = r"
    INSERT INTO readings (id, device_id, tvoc, eco2, temperature, humidity, status_msg, recorded_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
";

const SELECT_LATEST_FOR_DEVICE: &str = r"
    SELECT * FROM readings
    WHERE device_id = ?
    ORDER BY recorded_at DESC, rowid DESC
    LIMIT 1
";

const LIST_ALL: &str = r"
    SELECT r.*, d.name AS device_name, d.serial AS device_serial
    FROM readings r JOIN devices d ON d.id = r.device_id
    ORDER BY r.recorded_at DESC, r.rowid DESC
    LIMIT ? OFFSET ?
";

const LIST_BY_DEVICE: &str = r"
    SELECT r.*, d.name AS device_name, d.serial AS device_serial
    FROM readings r JOIN devices d ON d.id = r.device_id
    WHERE r.device_id = ?
    ORDER BY r.recorded_at DESC, r.rowid DESC
    LIMIT ? OFFSET ?
";

const LIST_BY_USER: &str = r"
    SELECT r.*, d.name AS device_name, d.serial AS device_serial
    FROM readings r JOIN devices d ON d.id = r.device_id
    WHERE d.user_id = ?
    ORDER BY r.recorded_at DESC, r.rowid DESC
    LIMIT ? OFFSET ?
";

const COUNT_ALL: &str = "SELECT COUNT(*) FROM readings";
const COUNT_BY_DEVICE: &str = "SELECT COUNT(*) FROM readings WHERE device_id = ?";
const COUNT_BY_USER: &str = r"
    SELECT COUNT(*) FROM readings r JOIN devices d ON d.id = r.device_id
    WHERE d.user_id = ?
";

/// `SQLite`-backed reading repository.
pub struct SqliteReadingRepository {
    pool: SqlitePool,
}

impl SqliteReadingRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ReadingRepository for SqliteReadingRepository {
    async fn create(&self, reading: Reading) -> Result<Reading, SensorHubError> {
        sqlx::query(INSERT)
            .bind(reading.id.to_string())
            .bind(reading.device_id.to_string())
            .bind(reading.tvoc)
            .bind(reading.eco2)
            .bind(reading.temperature)
            .bind(reading.humidity)
            .bind(&reading.status_msg)
            .bind(to_sortable(reading.recorded_at))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(reading)
    }

    async fn latest_for_device(
        &self,
        device_id: DeviceId,
    ) -> Result<Option<Reading>, SensorHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_LATEST_FOR_DEVICE)
            .bind(device_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(row.map(|w| w.0))
    }

    async fn list(
        &self,
        filter: ReadingFilter,
        page: PageRequest,
    ) -> Result<Vec<ReadingWithDevice>, SensorHubError> {
        let query = match &filter {
            ReadingFilter::All => sqlx::query_as::<Sqlite, JoinedWrapper>(LIST_ALL),
            ReadingFilter::Device(id) => {
                sqlx::query_as::<Sqlite, JoinedWrapper>(LIST_BY_DEVICE).bind(id.to_string())
            }
            ReadingFilter::User(user) => {
                sqlx::query_as::<Sqlite, JoinedWrapper>(LIST_BY_USER).bind(user.as_str())
            }
        };

        let rows: Vec<JoinedWrapper> = query
            .bind(i64::from(page.limit))
            .bind(i64::from(page.offset))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn count(&self, filter: ReadingFilter) -> Result<u64, SensorHubError> {
        let query = match &filter {
            ReadingFilter::All => sqlx::query_scalar::<Sqlite, i64>(COUNT_ALL),
            ReadingFilter::Device(id) => {
                sqlx::query_scalar::<Sqlite, i64>(COUNT_BY_DEVICE).bind(id.to_string())
            }
            ReadingFilter::User(user) => {
                sqlx::query_scalar::<Sqlite, i64>(COUNT_BY_USER).bind(user.as_str())
            }
        };

        let total: i64 = query
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(u64::try_from(total).unwrap_or_default())
    }
}
