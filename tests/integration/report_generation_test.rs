// Integration tests for period reports, the dashboard and maintenance schedules
//
// Fleet used throughout (all amounts in pesos):
//   2024-05-31  URBAN     1.000.000  (outside June)
//   2024-06-15  NATIONAL  1.000.000  + FUEL 200.000 attached
//   2024-06-20  URBAN       500.000
//   2024-06-05  INSURANCE   100.000  (not attached to a trip)
//   2024-06-10  maintenance 150.000

#[macro_use]
#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{http::StatusCode, test};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use helpers::*;
use transport_ops::core::dates::colombia_date;

fn money(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

macro_rules! seed_fleet {
    ($app:expr, $token:expr) => {{
        let vehicle: Value = test::call_and_read_body_json(
            &$app,
            test::TestRequest::post()
                .uri("/api/vehicles")
                .insert_header(bearer(&$token))
                .set_json(TestDataFactory::vehicle_payload("REP001"))
                .to_request(),
        )
        .await;
        let vehicle_id = vehicle["id"].as_str().unwrap().to_string();

        let mut trip_ids = Vec::new();
        for (trip_type, value, date) in [
            ("URBAN", "1000000", "2024-05-31"),
            ("NATIONAL", "1000000", "2024-06-15"),
            ("URBAN", "500000", "2024-06-20"),
        ] {
            let trip: Value = test::call_and_read_body_json(
                &$app,
                test::TestRequest::post()
                    .uri("/api/trips")
                    .insert_header(bearer(&$token))
                    .set_json(TestDataFactory::trip_payload(&vehicle_id, trip_type, value, date))
                    .to_request(),
            )
            .await;
            trip_ids.push(trip["id"].as_str().unwrap().to_string());
        }

        for (trip_id, expense_type, amount, date) in [
            (Some(trip_ids[1].as_str()), "FUEL", "200000", "2024-06-15"),
            (None, "INSURANCE", "100000", "2024-06-05"),
        ] {
            let resp = test::call_service(
                &$app,
                test::TestRequest::post()
                    .uri("/api/expenses")
                    .insert_header(bearer(&$token))
                    .set_json(TestDataFactory::expense_payload(trip_id, expense_type, amount, date))
                    .to_request(),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::CREATED);
        }

        let resp = test::call_service(
            &$app,
            test::TestRequest::post()
                .uri("/api/maintenance")
                .insert_header(bearer(&$token))
                .set_json(TestDataFactory::maintenance_payload(&vehicle_id, "150000", "2024-06-10"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        vehicle_id
    }};
}

#[actix_web::test]
async fn test_month_report_totals() {
    let ctx = TestContext::new();
    let token = ctx.operator_token().await;
    let app = test_app!(ctx);
    seed_fleet!(app, token);

    let report: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/reports/summary?period=month&date=2024-06-15")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;

    let trips = &report["trips"];
    assert_eq!(trips["trip_count"], 2);
    assert_eq!(money(&trips["total_value"]), dec!(1500000));
    assert_eq!(money(&trips["deduction"]), dec!(24000));
    assert_eq!(money(&trips["paid_value"]), dec!(1476000));
    assert_eq!(money(&trips["gross_profit"]), dec!(850000));
    assert_eq!(money(&trips["net_profit"]), dec!(650000));

    assert_eq!(money(&report["expenses"]["total"]), dec!(300000));
    let by_type = report["expenses"]["by_type"].as_array().unwrap();
    assert_eq!(by_type.len(), 2);
    assert_eq!(by_type[0]["expense_type"], "FUEL");
    assert_eq!(by_type[0]["label"], "Combustible");
    assert_eq!(money(&by_type[0]["total"]), dec!(200000));
    assert_eq!(by_type[1]["expense_type"], "INSURANCE");

    assert_eq!(money(&report["maintenance_cost"]), dec!(150000));
    assert_eq!(money(&report["operating_result"]), dec!(400000));

    let display = &report["display"];
    assert_eq!(display["title"], "Junio 2024");
    assert_eq!(display["total_value"], "$\u{a0}1.500.000");
    assert_eq!(display["deduction"], "$\u{a0}24.000");
    assert_eq!(display["net_profit"], "$\u{a0}650.000");
    assert_eq!(display["operating_result"], "$\u{a0}400.000");
    assert_eq!(display["end_date"], "30 de junio de 2024");
}

#[actix_web::test]
async fn test_year_and_week_reports() {
    let ctx = TestContext::new();
    let token = ctx.operator_token().await;
    let app = test_app!(ctx);
    seed_fleet!(app, token);

    let year: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/reports/summary?period=year&date=2024-03-01")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(year["trips"]["trip_count"], 3);
    assert_eq!(money(&year["trips"]["gross_profit"]), dec!(1350000));

    // Week of Sunday 2024-06-09 to Saturday 2024-06-15
    let week: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/reports/summary?period=week&date=2024-06-12")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(week["trips"]["trip_count"], 1);
    assert_eq!(money(&week["expenses"]["total"]), dec!(200000));
    assert_eq!(money(&week["maintenance_cost"]), dec!(150000));
    assert_eq!(money(&week["operating_result"]), dec!(250000));

    // Losses show with a leading minus
    let empty_week: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/reports/summary?period=week&date=2024-06-04")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(empty_week["trips"]["trip_count"], 0);
    assert_eq!(empty_week["display"]["operating_result"], "-$\u{a0}100.000");
}

#[actix_web::test]
async fn test_dashboard_totals() {
    let ctx = TestContext::new();
    let token = ctx.operator_token().await;
    let app = test_app!(ctx);
    seed_fleet!(app, token);

    let dashboard: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/dashboard")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;

    assert_eq!(dashboard["total_trips"], 3);
    assert_eq!(dashboard["active_vehicles"], 1);
    assert_eq!(money(&dashboard["total_revenue"]), dec!(2500000));
    assert_eq!(money(&dashboard["total_net_profit"]), dec!(1150000));
    assert_eq!(money(&dashboard["total_expenses"]), dec!(300000));
    assert_eq!(dashboard["display"]["total_revenue"], "$\u{a0}2.500.000");

    let recent = dashboard["recent_trips"].as_array().unwrap();
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0]["trip_date"], "2024-06-20");
    assert_eq!(recent[0]["vehicle_license_plate"], "REP001");
}

#[actix_web::test]
async fn test_upcoming_maintenance_window() {
    let ctx = TestContext::new();
    let token = ctx.operator_token().await;
    let app = test_app!(ctx);
    let vehicle_id = seed_fleet!(app, token);

    let today = colombia_date(Utc::now());
    for (offset, description) in [(10, "Revisión frenos"), (60, "Cambio de llantas")] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/maintenance")
                .insert_header(bearer(&token))
                .set_json(json!({
                    "vehicle_id": vehicle_id,
                    "maintenance_type": "INSPECTION",
                    "description": description,
                    "cost": "80000",
                    "maintenance_date": today.format("%Y-%m-%d").to_string(),
                    "next_due_date": (today + Duration::days(offset)).format("%Y-%m-%d").to_string()
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let default_window: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/maintenance/upcoming")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    let upcoming = default_window.as_array().unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0]["description"], "Revisión frenos");
    assert_eq!(upcoming[0]["vehicle_license_plate"], "REP001");

    let wide: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/maintenance/upcoming?days=90")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(wide.as_array().unwrap().len(), 2);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/maintenance/upcoming?days=400")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
