use crate::error::{AppError, AppResult};
use sqlx::SqlitePool;

/// Initialize the database schema for SQLite
///
/// Creates the drivers, cars and car_drivers tables with their indexes
/// and constraints. Safe to call repeatedly.
pub async fn init_schema(pool: &SqlitePool) -> AppResult<()> {
    let drivers_sql = r#"
        CREATE TABLE IF NOT EXISTS drivers (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            first_name TEXT,
            last_name TEXT,
            email TEXT,
            password_hash TEXT NOT NULL,
            license_number TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#;

    sqlx::query(drivers_sql)
        .execute(pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create drivers table: {}", e)))?;

    let cars_sql = r#"
        CREATE TABLE IF NOT EXISTS cars (
            id TEXT PRIMARY KEY,
            model TEXT NOT NULL,
            manufacturer TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#;

    sqlx::query(cars_sql)
        .execute(pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create cars table: {}", e)))?;

    let assignments_sql = r#"
        CREATE TABLE IF NOT EXISTS car_drivers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            car_id TEXT NOT NULL,
            driver_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE(car_id, driver_id),
            FOREIGN KEY (car_id) REFERENCES cars (id) ON DELETE CASCADE,
            FOREIGN KEY (driver_id) REFERENCES drivers (id) ON DELETE CASCADE
        )
        "#;

    sqlx::query(assignments_sql)
        .execute(pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create car_drivers table: {}", e)))?;

    create_indexes(pool).await?;

    Ok(())
}

/// Create performance indexes
async fn create_indexes(pool: &SqlitePool) -> AppResult<()> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_drivers_username ON drivers (LOWER(username))",
        "CREATE INDEX IF NOT EXISTS idx_drivers_license_number ON drivers (license_number)",
        "CREATE INDEX IF NOT EXISTS idx_drivers_created_at ON drivers (created_at)",
        "CREATE INDEX IF NOT EXISTS idx_cars_created_at ON cars (created_at)",
        "CREATE INDEX IF NOT EXISTS idx_car_drivers_car_id ON car_drivers (car_id)",
        "CREATE INDEX IF NOT EXISTS idx_car_drivers_driver_id ON car_drivers (driver_id)",
    ];

    for sql in indexes {
        sqlx::query(sql)
            .execute(pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to create index: {}", e)))?;
    }

    Ok(())
}

/// Drop the schema (for cleanup/testing)
#[allow(dead_code)]
pub async fn drop_schema(pool: &SqlitePool) -> AppResult<()> {
    // Reverse order due to foreign key constraints
    for table in ["car_drivers", "cars", "drivers"] {
        let sql = format!("DROP TABLE IF EXISTS {}", table);
        sqlx::query(&sql)
            .execute(pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to drop table {}: {}", table, e)))?;
    }

    Ok(())
}
