use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};
use std::collections::HashSet;
use uuid::Uuid;

use super::SqliteBackend;
use crate::backend::CarBackend;
use crate::error::{AppError, AppResult};
use crate::models::{Car, CarRef, DriverRef};
use crate::utils::current_datetime;

fn row_to_car(row: &SqliteRow) -> Car {
    Car {
        id: Some(row.get("id")),
        model: row.get("model"),
        manufacturer: row.get("manufacturer"),
        drivers: Vec::new(),
        created_at: Some(row.get("created_at")),
        updated_at: Some(row.get("updated_at")),
    }
}

impl SqliteBackend {
    /// Driver refs for a car, ordered by username
    async fn fetch_driver_refs(&self, car_id: &str) -> AppResult<Vec<DriverRef>> {
        let rows = sqlx::query(
            r#"
            SELECT d.id, d.username FROM drivers d
            JOIN car_drivers cd ON cd.driver_id = d.id
            WHERE cd.car_id = ?1
            ORDER BY d.username
            "#,
        )
        .bind(car_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::Database(format!("Failed to fetch driver refs: {}", e)))?;

        Ok(rows
            .iter()
            .map(|row| DriverRef {
                id: row.get("id"),
                username: Some(row.get("username")),
            })
            .collect())
    }

    /// Deduplicate the requested assignment set and reject unknown ids
    async fn resolve_assignment_ids(&self, drivers: &[DriverRef]) -> AppResult<Vec<String>> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();

        for driver_ref in drivers {
            if !seen.insert(driver_ref.id.clone()) {
                continue;
            }

            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM drivers WHERE id = ?1")
                .bind(&driver_ref.id)
                .fetch_one(self.pool())
                .await
                .map_err(|e| AppError::Database(format!("Failed to check driver: {}", e)))?;

            if count == 0 {
                return Err(AppError::BadRequest(format!(
                    "Driver not found: {}",
                    driver_ref.id
                )));
            }

            ids.push(driver_ref.id.clone());
        }

        Ok(ids)
    }
}

#[async_trait]
impl CarBackend for SqliteBackend {
    async fn create_car(&self, car: &Car) -> AppResult<Car> {
        let driver_ids = self.resolve_assignment_ids(&car.drivers).await?;

        let id = Uuid::new_v4().to_string();
        let now = current_datetime();

        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to start transaction: {}", e)))?;

        sqlx::query(
            "INSERT INTO cars (id, model, manufacturer, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&id)
        .bind(&car.model)
        .bind(&car.manufacturer)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create car: {}", e)))?;

        for driver_id in &driver_ids {
            sqlx::query(
                "INSERT INTO car_drivers (car_id, driver_id, created_at) VALUES (?1, ?2, ?3)",
            )
            .bind(&id)
            .bind(driver_id)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(format!("Failed to assign driver: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit transaction: {}", e)))?;

        match self.find_car_by_id(&id).await? {
            Some(created) => Ok(created),
            None => Err(AppError::Internal("Created car missing".to_string())),
        }
    }

    async fn find_car_by_id(&self, id: &str) -> AppResult<Option<Car>> {
        let row = sqlx::query(
            "SELECT id, model, manufacturer, created_at, updated_at FROM cars WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::Database(format!("Failed to find car: {}", e)))?;

        match row {
            Some(row) => {
                let mut car = row_to_car(&row);
                car.drivers = self.fetch_driver_refs(id).await?;
                Ok(Some(car))
            }
            None => Ok(None),
        }
    }

    async fn find_all_cars(&self, offset: i64, limit: i64) -> AppResult<(Vec<Car>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cars")
            .fetch_one(self.pool())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count cars: {}", e)))?;

        let rows = sqlx::query(
            "SELECT id, model, manufacturer, created_at, updated_at FROM cars ORDER BY created_at, rowid LIMIT ?1 OFFSET ?2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::Database(format!("Failed to list cars: {}", e)))?;

        let mut cars = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut car = row_to_car(row);
            let car_id = car.id.clone().unwrap_or_default();
            car.drivers = self.fetch_driver_refs(&car_id).await?;
            cars.push(car);
        }

        Ok((cars, total))
    }

    async fn update_car(&self, id: &str, car: &Car) -> AppResult<Option<Car>> {
        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cars WHERE id = ?1")
            .bind(id)
            .fetch_one(self.pool())
            .await
            .map_err(|e| AppError::Database(format!("Failed to check car: {}", e)))?;

        if exists == 0 {
            return Ok(None);
        }

        let driver_ids = self.resolve_assignment_ids(&car.drivers).await?;
        let now = current_datetime();

        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to start transaction: {}", e)))?;

        sqlx::query("UPDATE cars SET model = ?1, manufacturer = ?2, updated_at = ?3 WHERE id = ?4")
            .bind(&car.model)
            .bind(&car.manufacturer)
            .bind(&now)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(format!("Failed to update car: {}", e)))?;

        // Full replacement of the assignment set
        sqlx::query("DELETE FROM car_drivers WHERE car_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(format!("Failed to clear assignments: {}", e)))?;

        for driver_id in &driver_ids {
            sqlx::query(
                "INSERT INTO car_drivers (car_id, driver_id, created_at) VALUES (?1, ?2, ?3)",
            )
            .bind(id)
            .bind(driver_id)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(format!("Failed to assign driver: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit transaction: {}", e)))?;

        self.find_car_by_id(id).await
    }

    async fn delete_car(&self, id: &str) -> AppResult<bool> {
        // Explicit assignment cleanup; the FK cascade is a safety net.
        sqlx::query("DELETE FROM car_drivers WHERE car_id = ?1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete assignments: {}", e)))?;

        let result = sqlx::query("DELETE FROM cars WHERE id = ?1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete car: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_cars_by_driver_id(&self, driver_id: &str) -> AppResult<Vec<CarRef>> {
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
        .map_err(|e| AppError::Database(format!("Failed to find cars for driver: {}", e)))?;

        Ok(rows
            .iter()
            .map(|row| CarRef {
                id: row.get("id"),
                model: row.get("model"),
            })
            .collect())
    }
}
