use crate::error::AppResult;
use crate::models::{Car, CarRef, Driver, DriverLicenseUpdate};
use async_trait::async_trait;
use std::sync::Arc;

pub mod database;

/// Supported database backend types
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseType {
    SQLite,
}

/// Core backend abstraction for fleet resources
///
/// Any storage backend implements this trait plus the resource-specific
/// traits below. Backends are created through [`BackendFactory`].
#[async_trait]
pub trait Backend: Send + Sync {
    /// Connect and initialize the storage backend
    async fn connect(config: &crate::backend::database::DatabaseBackendConfig) -> AppResult<Self>
    where
        Self: Sized;

    /// Check if the storage backend is healthy and accessible
    async fn health_check(&self) -> AppResult<()>;

    /// Create tables and indexes if needed
    async fn init_schema(&self) -> AppResult<()>;

    /// Clean up resources when storage is no longer needed
    async fn cleanup(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Driver-specific backend operations
#[async_trait]
pub trait DriverBackend: Backend {
    /// Create a new driver; the plaintext password in the payload is
    /// hashed before it reaches storage
    async fn create_driver(&self, driver: &Driver) -> AppResult<Driver>;

    /// Find a driver by ID
    async fn find_driver_by_id(&self, id: &str) -> AppResult<Option<Driver>>;

    /// Find a driver by username (case-insensitive)
    async fn find_driver_by_username(&self, username: &str) -> AppResult<Option<Driver>>;

    /// Find all drivers with offset/limit paging, returning the page and
    /// the total count
    async fn find_all_drivers(&self, offset: i64, limit: i64) -> AppResult<(Vec<Driver>, i64)>;

    /// Replace a driver's license number; the value has already passed
    /// the license rule
    async fn update_driver_license(
        &self,
        id: &str,
        update: &DriverLicenseUpdate,
    ) -> AppResult<Option<Driver>>;

    /// Delete a driver; assignments cascade
    async fn delete_driver(&self, id: &str) -> AppResult<bool>;

    /// Drivers assigned to a specific car
    async fn find_drivers_by_car_id(&self, car_id: &str) -> AppResult<Vec<Driver>>;
}

/// Car-specific backend operations
#[async_trait]
pub trait CarBackend: Backend {
    /// Create a new car with its driver assignment set
    async fn create_car(&self, car: &Car) -> AppResult<Car>;

    /// Find a car by ID with driver refs populated
    async fn find_car_by_id(&self, id: &str) -> AppResult<Option<Car>>;

    /// Find all cars with offset/limit paging, returning the page and the
    /// total count
    async fn find_all_cars(&self, offset: i64, limit: i64) -> AppResult<(Vec<Car>, i64)>;

    /// Full replacement of a car, including its assignment set
    async fn update_car(&self, id: &str, car: &Car) -> AppResult<Option<Car>>;

    /// Delete a car; assignments cascade
    async fn delete_car(&self, id: &str) -> AppResult<bool>;

    /// Cars a specific driver is assigned to
    async fn find_cars_by_driver_id(&self, driver_id: &str) -> AppResult<Vec<CarRef>>;
}

/// Combined backend interface for drivers and cars
pub trait TaxiBackend: DriverBackend + CarBackend {}

/// Automatic implementation for any type that implements both traits
impl<T> TaxiBackend for T where T: DriverBackend + CarBackend {}

/// Factory for creating backend instances
pub struct BackendFactory;

impl BackendFactory {
    /// Create a backend based on configuration
    pub async fn create(
        config: &crate::backend::database::DatabaseBackendConfig,
    ) -> AppResult<Arc<dyn TaxiBackend>> {
        let backend = Self::create_backend(config).await?;
        Ok(Arc::from(backend))
    }

    /// Create a backend based on configuration (returns Box)
    pub async fn create_backend(
        config: &crate::backend::database::DatabaseBackendConfig,
    ) -> AppResult<Box<dyn TaxiBackend>> {
        match config.database_type {
            DatabaseType::SQLite => {
                let backend =
                    crate::backend::database::sqlite::SqliteBackend::connect(config).await?;
                Ok(Box::new(backend))
            }
        }
    }
}
