//! SQLite persistence for areas and forecast rows.

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use jma_forecast::NormalizedForecastRow;

use crate::error::StoreError;
use crate::record::{AreaRecord, ForecastRecord, StoredForecast};

/// SQLite store for fetched forecasts.
///
/// The connection sits behind a mutex; every operation holds the lock for
/// its whole duration, so writes are serialized.
pub struct ForecastStore {
    conn: Mutex<Connection>,
}

impl ForecastStore {
    /// Open (or create) a store at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Create an in-memory store (for testing).
    #[cfg(test)]
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.lock().execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS areas (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                code TEXT UNIQUE,
                name TEXT
            );

            CREATE TABLE IF NOT EXISTS weather_forecast (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                area_id INTEGER,
                forecast_date DATE,
                weather TEXT,
                temperature REAL,
                wind TEXT,
                precipitation_probability INTEGER,
                FOREIGN KEY (area_id) REFERENCES areas(id)
            );

            CREATE INDEX IF NOT EXISTS idx_weather_forecast_area ON weather_forecast(area_id);
            "#,
        )?;
        Ok(())
    }

    /// Insert an area or rename an existing one; returns its id.
    fn upsert_area(conn: &Connection, code: &str, name: &str) -> Result<i64, StoreError> {
        conn.execute(
            r#"
            INSERT INTO areas (code, name) VALUES (?1, ?2)
            ON CONFLICT(code) DO UPDATE SET name = excluded.name
            "#,
            params![code, name],
        )?;

        let id = conn.query_row(
            "SELECT id FROM areas WHERE code = ?1",
            params![code],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Store projected rows for an area.
    ///
    /// The area is upserted before its forecasts, and everything happens in
    /// one transaction: either all rows are saved or none are. Returns the
    /// number of forecast rows written.
    pub fn store_forecast(
        &self,
        area_code: &str,
        area_name: &str,
        rows: &[NormalizedForecastRow],
    ) -> Result<usize, StoreError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let area_id = Self::upsert_area(&tx, area_code, area_name)?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO weather_forecast
                (area_id, forecast_date, weather, temperature, wind, precipitation_probability)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )?;

            for row in rows {
                let record = ForecastRecord::from_row(row);
                stmt.execute(params![
                    area_id,
                    record.forecast_date,
                    record.weather,
                    record.temperature,
                    record.wind,
                    record.precipitation_probability,
                ])?;
            }
        }

        tx.commit()?;
        tracing::info!("Stored {} forecast rows for area {}", rows.len(), area_code);
        Ok(rows.len())
    }

    /// Get an area by code.
    pub fn get_area(&self, code: &str) -> Result<Option<AreaRecord>, StoreError> {
        let conn = self.conn.lock();
        let area = conn
            .query_row(
                "SELECT id, code, name FROM areas WHERE code = ?1",
                params![code],
                Self::row_to_area,
            )
            .optional()?;
        Ok(area)
    }

    /// List all stored areas, ordered by code.
    pub fn list_areas(&self) -> Result<Vec<AreaRecord>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT id, code, name FROM areas ORDER BY code")?;
        let rows = stmt.query_map([], Self::row_to_area)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Forecasts stored for an area, oldest first.
    pub fn list_forecasts(&self, area_code: &str) -> Result<Vec<StoredForecast>, StoreError> {
        if self.get_area(area_code)?.is_none() {
            return Err(StoreError::AreaNotFound(area_code.to_string()));
        }

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            r#"
            SELECT f.id, a.code, a.name, f.forecast_date, f.weather, f.temperature, f.wind, f.precipitation_probability
            FROM weather_forecast f
            JOIN areas a ON a.id = f.area_id
            WHERE a.code = ?1
            ORDER BY f.id ASC
            "#,
        )?;

        let rows = stmt.query_map(params![area_code], |row| {
            Ok(StoredForecast {
                id: row.get(0)?,
                area_code: row.get(1)?,
                area_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                record: ForecastRecord {
                    forecast_date: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                    weather: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                    temperature: row.get(5)?,
                    wind: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
                    precipitation_probability: row.get(7)?,
                },
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Total number of stored forecast rows.
    pub fn forecast_count(&self) -> Result<u32, StoreError> {
        let count = self
            .conn
            .lock()
            .query_row("SELECT COUNT(*) FROM weather_forecast", [], |row| row.get(0))?;
        Ok(count)
    }

    fn row_to_area(row: &rusqlite::Row) -> rusqlite::Result<AreaRecord> {
        Ok(AreaRecord {
            id: row.get(0)?,
            code: row.get(1)?,
            name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        })
    }
}
