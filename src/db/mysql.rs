//! MySQL implementation of the `Database` trait
//!
//! Statements are dynamic (catalog text, not compile-time macros), so rows
//! are decoded by column type into JSON scalars. Aggregates like `SUM(...)`
//! come back as DECIMAL and are narrowed to integers where exact.

use super::{Database, Row, RowSet};
use crate::config::MySqlConfig;
use crate::Result;
use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column, Row as _, TypeInfo, ValueRef};

/// Pooled MySQL access, constructed once at startup and shared by every job
pub struct MySqlDatabase {
    pool: MySqlPool,
}

impl MySqlDatabase {
    /// Connect a bounded pool; excess acquisitions queue rather than fail
    pub async fn connect(config: &MySqlConfig) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.pool_size)
            .connect(&config.url())
            .await?;

        tracing::info!(
            host = %config.host,
            database = %config.database,
            pool_size = config.pool_size,
            "Connected to relational store"
        );

        Ok(Self { pool })
    }
}

#[async_trait]
impl Database for MySqlDatabase {
    async fn fetch_rows(&self, sql: &str) -> Result<RowSet> {
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        rows.iter().map(decode_row).collect()
    }
}

fn decode_row(row: &MySqlRow) -> Result<Row> {
    let mut out = Row::new();
    for (idx, col) in row.columns().iter().enumerate() {
        let value = decode_value(row, idx, col.type_info().name())?;
        out.insert(col.name().to_string(), value);
    }
    Ok(out)
}

fn decode_value(row: &MySqlRow, idx: usize, type_name: &str) -> Result<Value> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let value = match type_name {
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            row.try_get::<i64, _>(idx).map(Value::from)?
        }
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => row.try_get::<u64, _>(idx).map(Value::from)?,
        "BOOLEAN" => row.try_get::<bool, _>(idx).map(Value::from)?,
        "FLOAT" => row.try_get::<f32, _>(idx).map(|v| Value::from(v as f64))?,
        "DOUBLE" => row.try_get::<f64, _>(idx).map(Value::from)?,
        "DECIMAL" => decimal_to_value(row.try_get::<Decimal, _>(idx)?),
        "DATE" => {
            let date = row.try_get::<chrono::NaiveDate, _>(idx)?;
            Value::from(date.format("%Y-%m-%d").to_string())
        }
        "TIME" => {
            let time = row.try_get::<chrono::NaiveTime, _>(idx)?;
            Value::from(time.format("%H:%M:%S").to_string())
        }
        "DATETIME" => {
            let ts = row.try_get::<chrono::NaiveDateTime, _>(idx)?;
            Value::from(ts.format("%Y-%m-%d %H:%M:%S").to_string())
        }
        "TIMESTAMP" => {
            let ts = row.try_get::<chrono::DateTime<chrono::Utc>, _>(idx)?;
            Value::from(ts.naive_utc().format("%Y-%m-%d %H:%M:%S").to_string())
        }
        _ => match row.try_get::<String, _>(idx) {
            Ok(s) => Value::from(s),
            Err(e) => {
                tracing::warn!(
                    column_type = type_name,
                    error = %e,
                    "Undecodable column type, substituting null"
                );
                Value::Null
            }
        },
    };

    Ok(value)
}

fn decimal_to_value(d: Decimal) -> Value {
    if d.is_integer() {
        d.to_i64().map(Value::from).unwrap_or(Value::Null)
    } else {
        d.to_f64().map(Value::from).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_narrowing() {
        assert_eq!(decimal_to_value(Decimal::new(42, 0)), Value::from(42i64));
        assert_eq!(decimal_to_value(Decimal::new(425, 1)), Value::from(42.5f64));
    }
}
