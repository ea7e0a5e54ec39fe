// Vehicle request validation tests (Colombian plates, model year bounds)

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;

use transport_ops::core::AppError;
use transport_ops::vehicles::models::{
    is_valid_colombian_plate, normalize_plate, CreateVehicleRequest, UpdateVehicleRequest,
    Vehicle, VehicleStatus, VehicleType,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn request(plate: &str) -> CreateVehicleRequest {
    CreateVehicleRequest {
        license_plate: plate.to_string(),
        brand: Some("Chevrolet".to_string()),
        model: Some("NPR".to_string()),
        year: Some(2018),
        vehicle_type: VehicleType::Truck,
        status: VehicleStatus::default(),
        acquisition_date: None,
        notes: None,
    }
}

#[test]
fn test_car_and_motorcycle_style_plates() {
    assert!(request("ABC123").validate(today()).is_ok());
    assert!(request("XYZ98A").validate(today()).is_ok());
    assert!(request(" abc123 ").validate(today()).is_ok());
}

#[test]
fn test_malformed_plates_are_rejected() {
    for plate in ["", "AB123", "ABC1234", "1BC123", "ABC-12", "ÁBC123"] {
        assert!(
            matches!(request(plate).validate(today()), Err(AppError::Validation(_))),
            "plate {:?} should be rejected",
            plate
        );
    }
}

#[test]
fn test_model_year_bounds() {
    let mut req = request("ABC123");

    req.year = Some(1949);
    assert!(req.validate(today()).is_err());

    req.year = Some(1950);
    assert!(req.validate(today()).is_ok());

    req.year = Some(2025);
    assert!(req.validate(today()).is_ok());

    req.year = Some(2026);
    assert!(req.validate(today()).is_err());

    req.year = None;
    assert!(req.validate(today()).is_ok());
}

#[test]
fn test_new_vehicle_stores_uppercase_plate() {
    let vehicle = Vehicle::new("user-1", request("kls45b"), Utc::now());

    assert_eq!(vehicle.license_plate, "KLS45B");
    assert_eq!(vehicle.status, VehicleStatus::Active);
    assert_eq!(vehicle.user_id, "user-1");
}

#[test]
fn test_status_defaults_to_active_when_absent() {
    let body = serde_json::json!({
        "license_plate": "TTT111",
        "vehicle_type": "TRAILER"
    });
    let parsed: CreateVehicleRequest = serde_json::from_value(body).unwrap();
    assert_eq!(parsed.status, VehicleStatus::Active);
    assert_eq!(parsed.vehicle_type, VehicleType::Trailer);
}

#[test]
fn test_partial_update() {
    let mut vehicle = Vehicle::new("user-1", request("ABC123"), Utc::now());

    let update = UpdateVehicleRequest {
        license_plate: Some("def456".to_string()),
        status: Some(VehicleStatus::Maintenance),
        ..Default::default()
    };
    assert!(update.validate(today()).is_ok());
    update.apply_to(&mut vehicle, Utc::now());

    assert_eq!(vehicle.license_plate, "DEF456");
    assert_eq!(vehicle.status, VehicleStatus::Maintenance);
    assert_eq!(vehicle.model.as_deref(), Some("NPR"));

    let bad = UpdateVehicleRequest {
        license_plate: Some("12".to_string()),
        ..Default::default()
    };
    assert!(bad.validate(today()).is_err());
}

#[test]
fn test_labels() {
    assert_eq!(VehicleType::Trailer.label(), "Tractomula");
    assert_eq!(VehicleStatus::Maintenance.label(), "En Mantenimiento");
}

proptest! {
    #[test]
    fn test_generated_plates_are_accepted(plate in "[A-Z]{3}[0-9]{2}[0-9A-Z]") {
        prop_assert!(is_valid_colombian_plate(&plate));
        prop_assert!(is_valid_colombian_plate(&plate.to_lowercase()));
        prop_assert_eq!(normalize_plate(&format!("  {}  ", plate.to_lowercase())), plate);
    }

    #[test]
    fn test_plates_with_wrong_length_are_rejected(plate in "[A-Z0-9]{7,10}") {
        prop_assert!(request(&plate).validate(today()).is_err());
    }
}
