#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use gestion_api::models::users::Role;
use serde_json::{json, Value};

use common::{seed_user, test_state};

macro_rules! post_json {
    ($app:expr, $cookie:expr, $uri:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri($uri)
            .cookie($cookie.clone())
            .set_json($body)
            .to_request();
        test::call_service(&$app, req).await
    }};
}

#[actix_web::test]
async fn anonymous_users_cannot_edit_the_catalog() {
    let app = test_app!(test_state().await);
    let req = test::TestRequest::post()
        .uri("/api/salon/categories")
        .set_json(json!({ "name": "Uñas" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn clients_cannot_edit_the_catalog() {
    let state = test_state().await;
    seed_user(&state, "clienta", Role::Client).await;
    let app = test_app!(state.clone());
    let cookie = login!(app, "clienta");

    let resp = post_json!(app, cookie, "/api/salon/categories", json!({ "name": "Uñas" }));
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn services_carry_category_and_discounted_price() {
    let state = test_state().await;
    seed_user(&state, "root", Role::Admin).await;
    let app = test_app!(state.clone());
    let admin = login!(app, "root");

    let resp = post_json!(app, admin, "/api/salon/categories", json!({ "name": "Cabello" }));
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let hair = body["id"].as_i64().unwrap();

    let resp = post_json!(app, admin, "/api/salon/categories", json!({ "name": "Uñas" }));
    let body: Value = test::read_body_json(resp).await;
    let nails = body["id"].as_i64().unwrap();

    let resp = post_json!(
        app,
        admin,
        "/api/salon/services",
        json!({ "title": "Corte", "price": 200.0, "discount": 25.0, "category_id": hair })
    );
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let cut = body["id"].as_i64().unwrap();

    post_json!(
        app,
        admin,
        "/api/salon/services",
        json!({ "title": "Manicura", "price": 80.0, "category_id": nails })
    );

    // catalog reads need no session
    let req = test::TestRequest::get()
        .uri(&format!("/api/salon/services/{}", cut))
        .to_request();
    let service: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(service["category"], "Cabello");
    assert_eq!(service["final_price"], 150.0);

    let req = test::TestRequest::get()
        .uri(&format!("/api/salon/services?category_id={}", nails))
        .to_request();
    let services: Value = test::call_and_read_body_json(&app, req).await;
    let services = services.as_array().unwrap();
    assert_eq!(services.len(), 1);
    assert_eq!(services[0]["title"], "Manicura");
    assert_eq!(services[0]["final_price"], 80.0);

    let req = test::TestRequest::get().uri("/api/salon/services").to_request();
    let services: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(services.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn negative_price_is_rejected() {
    let state = test_state().await;
    seed_user(&state, "root", Role::Admin).await;
    let app = test_app!(state.clone());
    let admin = login!(app, "root");

    let resp = post_json!(
        app,
        admin,
        "/api/salon/services",
        json!({ "title": "Tinte", "price": -5.0 })
    );
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");
}

#[actix_web::test]
async fn missing_rows_are_not_found() {
    let state = test_state().await;
    seed_user(&state, "root", Role::Admin).await;
    let app = test_app!(state.clone());
    let admin = login!(app, "root");

    let req = test::TestRequest::get().uri("/api/salon/services/999").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri("/api/salon/categories/999")
        .cookie(admin.clone())
        .set_json(json!({ "name": "Nada" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri("/api/salon/promotions/999")
        .cookie(admin)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn category_in_use_cannot_be_deleted() {
    let state = test_state().await;
    seed_user(&state, "root", Role::Admin).await;
    let app = test_app!(state.clone());
    let admin = login!(app, "root");

    let resp = post_json!(app, admin, "/api/salon/categories", json!({ "name": "Spa" }));
    let body: Value = test::read_body_json(resp).await;
    let spa = body["id"].as_i64().unwrap();
    post_json!(
        app,
        admin,
        "/api/salon/services",
        json!({ "title": "Masaje", "price": 300.0, "category_id": spa })
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/api/salon/categories/{}", spa))
        .cookie(admin.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let resp = post_json!(app, admin, "/api/salon/categories", json!({ "name": "Spa" }));
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn promotions_validate_dates_and_filter_current() {
    let state = test_state().await;
    seed_user(&state, "root", Role::Admin).await;
    let app = test_app!(state.clone());
    let admin = login!(app, "root");

    let resp = post_json!(
        app,
        admin,
        "/api/salon/promotions",
        json!({
            "title": "Backwards",
            "discount_percentage": 10.0,
            "start_date": "2025-08-01",
            "end_date": "2025-07-01",
        })
    );
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = post_json!(
        app,
        admin,
        "/api/salon/promotions",
        json!({
            "title": "Always on",
            "discount_percentage": 15.0,
            "start_date": "2000-01-01",
            "end_date": "2999-12-31",
        })
    );
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = post_json!(
        app,
        admin,
        "/api/salon/promotions",
        json!({
            "title": "Long gone",
            "discount_percentage": 30.0,
            "start_date": "2001-01-01",
            "end_date": "2001-01-31",
        })
    );
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get().uri("/api/salon/promotions").to_request();
    let all: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let req = test::TestRequest::get()
        .uri("/api/salon/promotions?current=true")
        .to_request();
    let current: Value = test::call_and_read_body_json(&app, req).await;
    let current = current.as_array().unwrap();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0]["title"], "Always on");
}

#[actix_web::test]
async fn appointments_join_customer_and_service() {
    let state = test_state().await;
    seed_user(&state, "root", Role::Admin).await;
    let app = test_app!(state.clone());
    let admin = login!(app, "root");

    let resp = post_json!(
        app,
        admin,
        "/api/salon/services",
        json!({ "title": "Peinado", "price": 100.0, "discount": 10.0 })
    );
    let body: Value = test::read_body_json(resp).await;
    let service = body["id"].as_i64().unwrap();

    // customers and bookings come from the public site
    let req = test::TestRequest::post()
        .uri("/api/salon/customers")
        .set_json(json!({ "name": "Ana Pérez", "email": "Ana@Example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let customer = body["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/salon/customers")
        .set_json(json!({ "name": "Ana again", "email": "ana@example.com" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    for when in ["2025-05-02T10:00:00", "2025-05-20T16:30:00", "2025-06-01T09:00:00"] {
        let req = test::TestRequest::post()
            .uri("/api/salon/appointments")
            .set_json(json!({
                "scheduled_at": when,
                "customer_id": customer,
                "service_id": service,
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::post()
        .uri("/api/salon/appointments")
        .set_json(json!({
            "scheduled_at": "2025-05-03T10:00:00",
            "customer_id": 999,
            "service_id": service,
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get().uri("/api/salon/appointments").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/salon/appointments")
        .cookie(admin.clone())
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list[0]["scheduled_at"], "2025-06-01T09:00:00");
    assert_eq!(list[0]["customer"], "Ana Pérez");
    assert_eq!(list[0]["service"], "Peinado");

    let req = test::TestRequest::get()
        .uri("/api/salon/appointments/999")
        .cookie(admin.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/salon/stats")
        .cookie(admin)
        .to_request();
    let stats: Value = test::call_and_read_body_json(&app, req).await;
    let stats = stats.as_array().unwrap();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0]["month"], "2025-06");
    assert_eq!(stats[0]["appointments"], 1);
    assert_eq!(stats[0]["revenue"], 90.0);
    assert_eq!(stats[1]["month"], "2025-05");
    assert_eq!(stats[1]["appointments"], 2);
    assert_eq!(stats[1]["revenue"], 180.0);
}

#[actix_web::test]
async fn rebooking_onto_missing_rows_conflicts() {
    let state = test_state().await;
    seed_user(&state, "root", Role::Admin).await;
    let app = test_app!(state.clone());
    let admin = login!(app, "root");

    let resp = post_json!(
        app,
        admin,
        "/api/salon/services",
        json!({ "title": "Depilación", "price": 50.0 })
    );
    let body: Value = test::read_body_json(resp).await;
    let service = body["id"].as_i64().unwrap();
    let resp = post_json!(
        app,
        admin,
        "/api/salon/customers",
        json!({ "name": "Rosa", "email": "rosa@example.com" })
    );
    let body: Value = test::read_body_json(resp).await;
    let customer = body["id"].as_i64().unwrap();
    let resp = post_json!(
        app,
        admin,
        "/api/salon/appointments",
        json!({ "scheduled_at": "2025-07-01T11:00:00", "customer_id": customer, "service_id": service })
    );
    let body: Value = test::read_body_json(resp).await;
    let appointment = body["id"].as_i64().unwrap();

    for (customer_id, service_id) in [(999, service), (customer, 999)] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/salon/appointments/{}", appointment))
            .cookie(admin.clone())
            .set_json(json!({
                "scheduled_at": "2025-07-02T11:00:00",
                "customer_id": customer_id,
                "service_id": service_id,
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/salon/appointments/{}", appointment))
        .cookie(admin.clone())
        .to_request();
    let stored: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stored["scheduled_at"], "2025-07-01T11:00:00");
    assert_eq!(stored["customer_id"], customer);

    let req = test::TestRequest::put()
        .uri("/api/salon/appointments/999")
        .cookie(admin.clone())
        .set_json(json!({
            "scheduled_at": "2025-07-02T11:00:00",
            "customer_id": customer,
            "service_id": service,
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    // a service with bookings cannot disappear under them
    let req = test::TestRequest::delete()
        .uri(&format!("/api/salon/services/{}", service))
        .cookie(admin)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
}
