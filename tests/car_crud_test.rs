use axum_test::TestServer;
use http::StatusCode;
use serde_json::json;

mod common;

async fn create_driver(server: &TestServer, username: &str, license: &str) -> String {
    let response = server
        .post("/api/drivers")
        .json(&common::driver_payload(username, license))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: serde_json::Value = response.json();
    created["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_car_crud_operations() {
    let app = common::setup_test_app(common::create_test_app_config()).await;
    let server = TestServer::new(app).unwrap();

    let alice_id = create_driver(&server, "alice", "ABC11111").await;
    let bob_id = create_driver(&server, "bob", "ABC22222").await;

    // Create car assigned to both drivers
    let create_response = server
        .post("/api/cars")
        .json(&common::car_payload("Camry", "Toyota", &[&alice_id, &bob_id]))
        .await;

    assert_eq!(create_response.status_code(), StatusCode::CREATED);
    let created: serde_json::Value = create_response.json();
    let car_id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["model"], "Camry");
    assert_eq!(created["manufacturer"], "Toyota");

    let drivers = created["drivers"].as_array().unwrap();
    assert_eq!(drivers.len(), 2);
    // Driver refs are ordered by username
    assert_eq!(drivers[0]["username"], "alice");
    assert_eq!(drivers[1]["username"], "bob");

    let headers = create_response.headers();
    let location = headers.get("location").unwrap();
    assert_eq!(location.to_str().unwrap(), format!("/api/cars/{}", car_id));

    // Read car
    let get_response = server.get(&format!("/api/cars/{}", car_id)).await;
    assert_eq!(get_response.status_code(), StatusCode::OK);
    let fetched: serde_json::Value = get_response.json();
    assert_eq!(fetched["id"], car_id.as_str());
    assert_eq!(fetched["drivers"].as_array().unwrap().len(), 2);

    // The assignment is visible from the driver side
    let driver_response = server.get(&format!("/api/drivers/{}", alice_id)).await;
    let driver: serde_json::Value = driver_response.json();
    let cars = driver["cars"].as_array().unwrap();
    assert_eq!(cars.len(), 1);
    assert_eq!(cars[0]["model"], "Camry");

    // Full replacement: new model, only one driver left
    let update_response = server
        .put(&format!("/api/cars/{}", car_id))
        .json(&common::car_payload("Corolla", "Toyota", &[&bob_id]))
        .await;
    assert_eq!(update_response.status_code(), StatusCode::OK);
    let updated: serde_json::Value = update_response.json();
    assert_eq!(updated["model"], "Corolla");
    let drivers = updated["drivers"].as_array().unwrap();
    assert_eq!(drivers.len(), 1);
    assert_eq!(drivers[0]["username"], "bob");

    // Alice no longer sees the car
    let driver_response = server.get(&format!("/api/drivers/{}", alice_id)).await;
    let driver: serde_json::Value = driver_response.json();
    assert!(driver["cars"].as_array().unwrap().is_empty());

    // List cars
    let list_response = server.get("/api/cars").await;
    assert_eq!(list_response.status_code(), StatusCode::OK);
    let list_result: serde_json::Value = list_response.json();
    assert_eq!(list_result["total"], 1);
    assert_eq!(list_result["items"][0]["model"], "Corolla");

    // Delete car
    let delete_response = server.delete(&format!("/api/cars/{}", car_id)).await;
    assert_eq!(delete_response.status_code(), StatusCode::NO_CONTENT);

    let get_deleted = server.get(&format!("/api/cars/{}", car_id)).await;
    assert_eq!(get_deleted.status_code(), StatusCode::NOT_FOUND);

    // Drivers survive car deletion
    let driver_response = server.get(&format!("/api/drivers/{}", bob_id)).await;
    assert_eq!(driver_response.status_code(), StatusCode::OK);
    let driver: serde_json::Value = driver_response.json();
    assert!(driver["cars"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_car_with_unknown_driver_rejected() {
    let app = common::setup_test_app(common::create_test_app_config()).await;
    let server = TestServer::new(app).unwrap();

    let response = server
        .post("/api/cars")
        .json(&common::car_payload("Camry", "Toyota", &["no-such-driver"]))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Driver not found"));
}

#[tokio::test]
async fn test_create_car_without_drivers() {
    let app = common::setup_test_app(common::create_test_app_config()).await;
    let server = TestServer::new(app).unwrap();

    let response = server
        .post("/api/cars")
        .json(&json!({"model": "Model 3", "manufacturer": "Tesla"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: serde_json::Value = response.json();
    assert!(created["drivers"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_car_requires_model_and_manufacturer() {
    let app = common::setup_test_app(common::create_test_app_config()).await;
    let server = TestServer::new(app).unwrap();

    let response = server
        .post("/api/cars")
        .json(&json!({"model": "", "manufacturer": "Tesla"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/cars")
        .json(&json!({"model": "Model 3", "manufacturer": "  "}))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_assignment_is_collapsed() {
    let app = common::setup_test_app(common::create_test_app_config()).await;
    let server = TestServer::new(app).unwrap();

    let alice_id = create_driver(&server, "alice", "ABC11111").await;

    let response = server
        .post("/api/cars")
        .json(&common::car_payload("Camry", "Toyota", &[&alice_id, &alice_id]))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: serde_json::Value = response.json();
    assert_eq!(created["drivers"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_deleting_driver_removes_assignment() {
    let app = common::setup_test_app(common::create_test_app_config()).await;
    let server = TestServer::new(app).unwrap();

    let alice_id = create_driver(&server, "alice", "ABC11111").await;

    let response = server
        .post("/api/cars")
        .json(&common::car_payload("Camry", "Toyota", &[&alice_id]))
        .await;
    let created: serde_json::Value = response.json();
    let car_id = created["id"].as_str().unwrap().to_string();

    let delete_response = server.delete(&format!("/api/drivers/{}", alice_id)).await;
    assert_eq!(delete_response.status_code(), StatusCode::NO_CONTENT);

    let get_response = server.get(&format!("/api/cars/{}", car_id)).await;
    assert_eq!(get_response.status_code(), StatusCode::OK);
    let car: serde_json::Value = get_response.json();
    assert!(car["drivers"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_unknown_car_returns_404() {
    let app = common::setup_test_app(common::create_test_app_config()).await;
    let server = TestServer::new(app).unwrap();

    let response = server
        .put("/api/cars/no-such-id")
        .json(&json!({"model": "Camry", "manufacturer": "Toyota"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
