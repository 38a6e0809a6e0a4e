use serde::{Deserialize, Serialize};

/// A driver account with its validated license number
///
/// `password` is write-only: it is accepted on create, hashed before it
/// reaches storage, and never serialized back to clients.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    pub license_number: String,
    /// Cars currently assigned to this driver; populated on single reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cars: Option<Vec<CarRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Body of the license update endpoint
///
/// Mirrors driver creation: both call sites run the same license rule,
/// so a rejected value reports the same message from either entry point.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DriverLicenseUpdate {
    pub license_number: String,
}

/// A car with its driver assignment set
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub model: String,
    pub manufacturer: String,
    /// Assigned drivers. On write only `id` is consulted; `username` is
    /// filled in by the backend on read.
    #[serde(default)]
    pub drivers: Vec<DriverRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Reference to a driver embedded in a car representation
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DriverRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Reference to a car embedded in a driver representation
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CarRef {
    pub id: String,
    pub model: String,
}

/// Envelope for list endpoints with offset/limit paging
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
    pub items: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_password_is_never_serialized() {
        let driver = Driver {
            username: "jsmith".to_string(),
            password: Some("Secret123".to_string()),
            license_number: "ABC12345".to_string(),
            ..Default::default()
        };

        let value = serde_json::to_value(&driver).unwrap();
        assert!(value.get("password").is_none());
        assert_eq!(value["username"], "jsmith");
        assert_eq!(value["licenseNumber"], "ABC12345");
    }

    #[test]
    fn test_driver_deserializes_camel_case_payload() {
        let payload = json!({
            "username": "jsmith",
            "firstName": "John",
            "lastName": "Smith",
            "password": "Secret123",
            "licenseNumber": "ABC12345"
        });

        let driver: Driver = serde_json::from_value(payload).unwrap();
        assert_eq!(driver.first_name.as_deref(), Some("John"));
        assert_eq!(driver.password.as_deref(), Some("Secret123"));
        assert_eq!(driver.license_number, "ABC12345");
    }

    #[test]
    fn test_car_drivers_default_to_empty() {
        let payload = json!({
            "model": "Camry",
            "manufacturer": "Toyota"
        });

        let car: Car = serde_json::from_value(payload).unwrap();
        assert!(car.drivers.is_empty());
    }
}
