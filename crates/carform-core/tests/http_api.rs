use carform_core::{ApiError, Car, CarApi, HttpCarApi};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock backend driven from plain (non-async) tests, since the client blocks.
struct Backend {
    server: MockServer,
    runtime: tokio::runtime::Runtime,
}

impl Backend {
    fn start() -> Self {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    fn api(&self) -> HttpCarApi {
        HttpCarApi::new(&self.server.uri(), Duration::from_secs(5)).unwrap()
    }
}

fn x5() -> Car {
    Car {
        license_plate_number: "AB123".to_string(),
        color: "Red".to_string(),
        manufacturer: "BMW".to_string(),
        model: "X5".to_string(),
        year: 2015,
        active: true,
    }
}

fn x5_json() -> serde_json::Value {
    json!({
        "licensePlateNumber": "AB123",
        "color": "Red",
        "manufacturer": "BMW",
        "model": "X5",
        "year": 2015,
        "active": true,
    })
}

#[test]
fn create_posts_car_to_collection() {
    let backend = Backend::start();
    backend.mount(
        Mock::given(method("POST"))
            .and(path("/cars"))
            .and(body_json(x5_json()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true }))),
    );

    let response = backend.api().create(&x5()).unwrap();
    assert!(response.success);
}

#[test]
fn update_puts_car_to_item() {
    let backend = Backend::start();
    let mut car = x5();
    car.model = "X6".to_string();
    let mut body = x5_json();
    body["model"] = json!("X6");

    backend.mount(
        Mock::given(method("PUT"))
            .and(path("/cars/AB123"))
            .and(body_json(body))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true }))),
    );

    let response = backend.api().update("AB123", &car).unwrap();
    assert!(response.success);
}

#[test]
fn conflict_envelope_survives_error_status() {
    let backend = Backend::start();
    backend.mount(
        Mock::given(method("POST"))
            .and(path("/cars"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "success": false,
                "error": { "code": 2, "message": "Car already exists" }
            }))),
    );

    let response = backend.api().create(&x5()).unwrap();
    assert!(response.is_conflict());
}

#[test]
fn list_reads_payload() {
    let backend = Backend::start();
    backend.mount(
        Mock::given(method("GET"))
            .and(path("/cars"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "payload": [x5_json(), { "licensePlateNumber": "ZZ1", "active": false }]
            }))),
    );

    let cars = backend.api().list().unwrap();
    assert_eq!(cars.len(), 2);
    assert_eq!(cars[0], x5());
    assert_eq!(cars[1].license_plate_number, "ZZ1");
    assert!(!cars[1].active);
}

#[test]
fn unsuccessful_list_is_an_error() {
    let backend = Backend::start();
    backend.mount(
        Mock::given(method("GET"))
            .and(path("/cars"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "success": false,
                "error": { "code": 1 }
            }))),
    );

    match backend.api().list() {
        Err(ApiError::Rejected { code }) => assert_eq!(code, Some(1)),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn non_json_body_is_a_serialization_error() {
    let backend = Backend::start();
    backend.mount(
        Mock::given(method("POST"))
            .and(path("/cars"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>")),
    );

    assert!(matches!(
        backend.api().create(&x5()),
        Err(ApiError::Serialization(_))
    ));
}

#[test]
fn unreachable_backend_is_an_http_error() {
    let api = HttpCarApi::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    assert!(matches!(api.create(&x5()), Err(ApiError::Http(_))));
}
