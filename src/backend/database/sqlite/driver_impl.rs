use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use super::SqliteBackend;
use crate::backend::DriverBackend;
use crate::error::{AppError, AppResult};
use crate::models::{CarRef, Driver, DriverLicenseUpdate};
use crate::password::PasswordManager;
use crate::utils::current_datetime;

const DRIVER_COLUMNS: &str =
    "id, username, first_name, last_name, email, license_number, created_at, updated_at";

fn row_to_driver(row: &SqliteRow) -> Driver {
    Driver {
        id: Some(row.get("id")),
        username: row.get("username"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        password: None,
        license_number: row.get("license_number"),
        cars: None,
        created_at: Some(row.get("created_at")),
        updated_at: Some(row.get("updated_at")),
    }
}

/// Map SQLite constraint violations to the client-facing error
fn map_driver_db_error(error: sqlx::Error) -> AppError {
    let error_str = error.to_string();
    if error_str.contains("UNIQUE constraint") {
        if error_str.contains("license_number") {
            AppError::Conflict("License number already exists".to_string())
        } else {
            AppError::Conflict("Username already exists".to_string())
        }
    } else {
        AppError::Database(format!("Driver query failed: {}", error_str))
    }
}

impl SqliteBackend {
    /// Case-insensitive duplicate username check
    async fn check_duplicate_username(&self, username: &str, exclude_id: Option<&str>) -> AppResult<()> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM drivers WHERE LOWER(username) = LOWER(?1) AND id != COALESCE(?2, '')",
        )
        .bind(username)
        .bind(exclude_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::Database(format!("Failed to check duplicate username: {}", e)))?;

        if count > 0 {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        Ok(())
    }

    async fn check_duplicate_license(&self, license_number: &str, exclude_id: Option<&str>) -> AppResult<()> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM drivers WHERE license_number = ?1 AND id != COALESCE(?2, '')",
        )
        .bind(license_number)
        .bind(exclude_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::Database(format!("Failed to check duplicate license: {}", e)))?;

        if count > 0 {
            return Err(AppError::Conflict(
                "License number already exists".to_string(),
            ));
        }

        Ok(())
    }

    /// Cars assigned to a driver, for embedding in single-driver reads
    async fn fetch_assigned_cars(&self, driver_id: &str) -> AppResult<Vec<CarRef>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.model FROM cars c
            JOIN car_drivers cd ON cd.car_id = c.id
            WHERE cd.driver_id = ?1
            ORDER BY c.created_at
            "#,
        )
        .bind(driver_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::Database(format!("Failed to fetch assigned cars: {}", e)))?;

        Ok(rows
            .iter()
            .map(|row| CarRef {
                id: row.get("id"),
                model: row.get("model"),
            })
            .collect())
    }
}

#[async_trait]
impl DriverBackend for SqliteBackend {
    async fn create_driver(&self, driver: &Driver) -> AppResult<Driver> {
        let password = driver
            .password
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("password is required".to_string()))?;

        // Accept pre-hashed passwords from migrations; hash plaintext.
        let password_manager = PasswordManager::default();
        let password_hash = if password_manager.is_hashed_password(password) {
            password.to_string()
        } else {
            password_manager.hash_password(password)?
        };

        self.check_duplicate_username(&driver.username, None).await?;
        self.check_duplicate_license(&driver.license_number, None)
            .await?;

        let id = Uuid::new_v4().to_string();
        let now = current_datetime();

        sqlx::query(
            r#"
            INSERT INTO drivers (id, username, first_name, last_name, email, password_hash, license_number, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&id)
        .bind(&driver.username)
        .bind(&driver.first_name)
        .bind(&driver.last_name)
        .bind(&driver.email)
        .bind(&password_hash)
        .bind(&driver.license_number)
        .bind(&now)
        .bind(&now)
        .execute(self.pool())
        .await
        .map_err(map_driver_db_error)?;

        Ok(Driver {
            id: Some(id),
            username: driver.username.clone(),
            first_name: driver.first_name.clone(),
            last_name: driver.last_name.clone(),
            email: driver.email.clone(),
            password: None,
            license_number: driver.license_number.clone(),
            cars: Some(Vec::new()),
            created_at: Some(now.clone()),
            updated_at: Some(now),
        })
    }

    async fn find_driver_by_id(&self, id: &str) -> AppResult<Option<Driver>> {
        let sql = format!("SELECT {} FROM drivers WHERE id = ?1", DRIVER_COLUMNS);

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find driver: {}", e)))?;

        match row {
            Some(row) => {
                let mut driver = row_to_driver(&row);
                driver.cars = Some(self.fetch_assigned_cars(id).await?);
                Ok(Some(driver))
            }
            None => Ok(None),
        }
    }

    async fn find_driver_by_username(&self, username: &str) -> AppResult<Option<Driver>> {
        let sql = format!(
            "SELECT {} FROM drivers WHERE LOWER(username) = LOWER(?1)",
            DRIVER_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find driver: {}", e)))?;

        Ok(row.map(|row| row_to_driver(&row)))
    }

    async fn find_all_drivers(&self, offset: i64, limit: i64) -> AppResult<(Vec<Driver>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM drivers")
            .fetch_one(self.pool())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count drivers: {}", e)))?;

        let sql = format!(
            "SELECT {} FROM drivers ORDER BY created_at, rowid LIMIT ?1 OFFSET ?2",
            DRIVER_COLUMNS
        );

        let rows = sqlx::query(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list drivers: {}", e)))?;

        Ok((rows.iter().map(row_to_driver).collect(), total))
    }

    async fn update_driver_license(
        &self,
        id: &str,
        update: &DriverLicenseUpdate,
    ) -> AppResult<Option<Driver>> {
        if self.find_driver_by_id(id).await?.is_none() {
            return Ok(None);
        }

        self.check_duplicate_license(&update.license_number, Some(id))
            .await?;

        sqlx::query("UPDATE drivers SET license_number = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(&update.license_number)
            .bind(current_datetime())
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_driver_db_error)?;

        self.find_driver_by_id(id).await
    }

    async fn delete_driver(&self, id: &str) -> AppResult<bool> {
        // Explicit assignment cleanup; the FK cascade is a safety net.
        sqlx::query("DELETE FROM car_drivers WHERE driver_id = ?1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete assignments: {}", e)))?;

        let result = sqlx::query("DELETE FROM drivers WHERE id = ?1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete driver: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_drivers_by_car_id(&self, car_id: &str) -> AppResult<Vec<Driver>> {
        let sql = r#"
            SELECT d.id, d.username, d.first_name, d.last_name, d.email,
                   d.license_number, d.created_at, d.updated_at
            FROM drivers d
            JOIN car_drivers cd ON cd.driver_id = d.id
            WHERE cd.car_id = ?1
            ORDER BY d.username
            "#;

        let rows = sqlx::query(sql)
            .bind(car_id)
            .fetch_all(self.pool())
            .await
            .map_err(|e| AppError::Database(format!("Failed to find drivers for car: {}", e)))?;

        Ok(rows.iter().map(row_to_driver).collect())
    }
}
