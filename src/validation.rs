use crate::error::{AppError, AppResult};
use crate::license::validate_license_number;
use crate::models::{Car, Driver};
use email_address::EmailAddress;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Same character set the account username field has always accepted.
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9@.+_-]{1,150}$").unwrap();
}

/// Validates username format: 1-150 characters of letters, digits and @.+_-
pub fn validate_username(username: &str) -> AppResult<()> {
    if username.is_empty() {
        return Err(AppError::BadRequest("username is required".to_string()));
    }

    if !USERNAME_REGEX.is_match(username) {
        return Err(AppError::BadRequest(
            "username may contain up to 150 letters, digits and @.+-_ characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates email format according to RFC 5322
pub fn validate_email(email: &str) -> bool {
    EmailAddress::is_valid(email)
}

/// Validates a Driver payload before it is accepted
///
/// The license number runs through the shared license rule; driver
/// creation and license update report identical messages for the same
/// rejected value.
pub fn validate_driver(driver: &Driver) -> AppResult<()> {
    validate_username(&driver.username)?;

    if let Some(email) = &driver.email {
        if !validate_email(email) {
            return Err(AppError::BadRequest(format!(
                "Invalid email format: {}",
                email
            )));
        }
    }

    validate_license_number(&driver.license_number)?;

    Ok(())
}

/// Validates a Car payload before it is accepted
pub fn validate_car(car: &Car) -> AppResult<()> {
    if car.model.trim().is_empty() {
        return Err(AppError::BadRequest("model is required".to_string()));
    }

    if car.manufacturer.trim().is_empty() {
        return Err(AppError::BadRequest(
            "manufacturer is required".to_string(),
        ));
    }

    Ok(())
}
