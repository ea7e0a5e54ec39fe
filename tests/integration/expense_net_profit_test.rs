// Integration tests: expenses keep the stored trip net profit in sync
//
// net_profit = gross_profit - sum(expenses attached to the trip), refreshed
// on every expense create, update, move and delete. Losses are kept.

#[macro_use]
#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::{http::StatusCode, test};
use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use helpers::*;
use transport_ops::modules::expenses::models::{CreateExpenseRequest, Expense, ExpenseType};

/// Register a vehicle plus one trip of 1.000.000 on it; yields the trip id
macro_rules! create_vehicle_and_trip {
    ($app:expr, $token:expr, $plate:expr, $trip_type:expr) => {{
        let vehicle: Value = test::call_and_read_body_json(
            &$app,
            test::TestRequest::post()
                .uri("/api/vehicles")
                .insert_header(bearer(&$token))
                .set_json(TestDataFactory::vehicle_payload($plate))
                .to_request(),
        )
        .await;

        let trip: Value = test::call_and_read_body_json(
            &$app,
            test::TestRequest::post()
                .uri("/api/trips")
                .insert_header(bearer(&$token))
                .set_json(TestDataFactory::trip_payload(
                    vehicle["id"].as_str().unwrap(),
                    $trip_type,
                    "1000000",
                    "2024-06-15",
                ))
                .to_request(),
        )
        .await;

        trip["id"].as_str().unwrap().to_string()
    }};
}

#[actix_web::test]
async fn test_expenses_reduce_net_profit() {
    let ctx = TestContext::new();
    let token = ctx.operator_token().await;
    let app = test_app!(ctx);

    let trip_id = create_vehicle_and_trip!(app, token, "EXP001", "URBAN");

    for (expense_type, amount) in [("FUEL", "150000"), ("TOLL", "100000")] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/expenses")
                .insert_header(bearer(&token))
                .set_json(TestDataFactory::expense_payload(
                    Some(trip_id.as_str()),
                    expense_type,
                    amount,
                    "2024-06-15",
                ))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let trip: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/trips/{}", trip_id))
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;

    assert_eq!(decimal_field(&trip, "gross_profit"), dec!(500000));
    assert_eq!(decimal_field(&trip, "total_expenses"), dec!(250000));
    assert_eq!(decimal_field(&trip, "net_profit"), dec!(250000));
    assert_eq!(ctx.store.stored_trip(&trip_id).unwrap().net_profit, dec!(250000));
}

#[actix_web::test]
async fn test_loss_is_stored() {
    let ctx = TestContext::new();
    let token = ctx.operator_token().await;
    let app = test_app!(ctx);

    let trip_id = create_vehicle_and_trip!(app, token, "EXP002", "URBAN");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/expenses")
            .insert_header(bearer(&token))
            .set_json(TestDataFactory::expense_payload(
                Some(trip_id.as_str()),
                "MAINTENANCE",
                "750000",
                "2024-06-16",
            ))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    assert_eq!(ctx.store.stored_trip(&trip_id).unwrap().net_profit, dec!(-250000));
}

#[actix_web::test]
async fn test_update_move_and_delete_refresh_trips() {
    let ctx = TestContext::new();
    let token = ctx.operator_token().await;
    let app = test_app!(ctx);

    let first = create_vehicle_and_trip!(app, token, "MOV001", "NATIONAL");
    let second = create_vehicle_and_trip!(app, token, "MOV002", "NATIONAL");

    let expense: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/expenses")
            .insert_header(bearer(&token))
            .set_json(TestDataFactory::expense_payload(
                Some(first.as_str()),
                "FUEL",
                "200000",
                "2024-06-15",
            ))
            .to_request(),
    )
    .await;
    let expense_id = expense["id"].as_str().unwrap().to_string();
    assert_eq!(ctx.store.stored_trip(&first).unwrap().net_profit, dec!(400000));

    // Change the amount
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/expenses/{}", expense_id))
            .insert_header(bearer(&token))
            .set_json(json!({ "amount": "300000" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(ctx.store.stored_trip(&first).unwrap().net_profit, dec!(300000));

    // Move it to the second trip: both are refreshed
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/expenses/{}", expense_id))
            .insert_header(bearer(&token))
            .set_json(json!({ "trip_id": second }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(ctx.store.stored_trip(&first).unwrap().net_profit, dec!(600000));
    assert_eq!(ctx.store.stored_trip(&second).unwrap().net_profit, dec!(300000));

    // Detach it
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/expenses/{}", expense_id))
            .insert_header(bearer(&token))
            .set_json(json!({ "trip_id": "" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let detached: Value = test::read_body_json(resp).await;
    assert_eq!(detached["trip_id"], Value::Null);
    assert_eq!(ctx.store.stored_trip(&second).unwrap().net_profit, dec!(600000));

    // Re-attach and delete
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/expenses/{}", expense_id))
            .insert_header(bearer(&token))
            .set_json(json!({ "trip_id": first }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(ctx.store.stored_trip(&first).unwrap().net_profit, dec!(300000));

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/expenses/{}", expense_id))
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(ctx.store.stored_trip(&first).unwrap().net_profit, dec!(600000));
}

#[actix_web::test]
async fn test_trip_update_keeps_expenses_in_net_profit() {
    let ctx = TestContext::new();
    let token = ctx.operator_token().await;
    let app = test_app!(ctx);

    let trip_id = create_vehicle_and_trip!(app, token, "UPD001", "URBAN");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/expenses")
            .insert_header(bearer(&token))
            .set_json(TestDataFactory::expense_payload(
                Some(trip_id.as_str()),
                "SALARY",
                "100000",
                "2024-06-15",
            ))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let updated: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/trips/{}", trip_id))
            .insert_header(bearer(&token))
            .set_json(json!({ "trip_type": "NATIONAL" }))
            .to_request(),
    )
    .await;

    assert_eq!(decimal_field(&updated, "gross_profit"), dec!(600000));
    assert_eq!(decimal_field(&updated, "net_profit"), dec!(500000));
}

#[actix_web::test]
async fn test_expense_validation() {
    let ctx = TestContext::new();
    let token = ctx.operator_token().await;
    let app = test_app!(ctx);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/expenses")
            .insert_header(bearer(&token))
            .set_json(TestDataFactory::expense_payload(None, "FUEL", "0", "2024-06-15"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Amounts the DECIMAL(15, 2) ledger cannot hold exactly
    for amount in ["100.005", "10000000000000000"] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/expenses")
                .insert_header(bearer(&token))
                .set_json(TestDataFactory::expense_payload(None, "FUEL", amount, "2024-06-15"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "amount {}", amount);
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/expenses")
            .insert_header(bearer(&token))
            .set_json(TestDataFactory::expense_payload(
                Some("missing-trip"),
                "FUEL",
                "1000",
                "2024-06-15",
            ))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Unattached expenses are allowed
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/expenses")
            .insert_header(bearer(&token))
            .set_json(TestDataFactory::expense_payload(
                None,
                "INSURANCE",
                "1200000",
                "2024-06-01",
            ))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let listed: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/expenses?expense_type=INSURANCE")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_trip_update_settles_against_the_ledger() {
    let ctx = TestContext::new();
    let token = ctx.operator_token().await;
    let app = test_app!(ctx);

    let trip_id = create_vehicle_and_trip!(app, token, "LED001", "URBAN");
    let user_id = ctx.store.stored_trip(&trip_id).unwrap().user_id;

    // Another writer lands an expense before its own refresh has run
    let expense = Expense::new(
        &user_id,
        CreateExpenseRequest {
            trip_id: Some(trip_id.clone()),
            description: "Peaje Papiros".to_string(),
            amount: dec!(120000),
            expense_type: ExpenseType::Toll,
            expense_date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            notes: None,
        },
        Utc::now(),
    );
    ctx.store.lock().expenses.push(expense);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/trips/{}", trip_id))
            .insert_header(bearer(&token))
            .set_json(json!({ "notes": "Entrega en bodega norte" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(decimal_field(&updated, "total_expenses"), dec!(120000));
    assert_eq!(decimal_field(&updated, "net_profit"), dec!(380000));
    assert_eq!(ctx.store.stored_trip(&trip_id).unwrap().net_profit, dec!(380000));

    // A later refresh counts every expense in the ledger, not only its own
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/expenses")
            .insert_header(bearer(&token))
            .set_json(TestDataFactory::expense_payload(
                Some(trip_id.as_str()),
                "FUEL",
                "80000",
                "2024-06-15",
            ))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(ctx.store.stored_trip(&trip_id).unwrap().net_profit, dec!(300000));
}
