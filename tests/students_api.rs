#[macro_use]
mod common;

use actix_web::{
    http::{Method, StatusCode},
    test,
};
use serde_json::{json, Value};

use common::test_state;

#[actix_web::test]
async fn roster_is_open_and_sorted_by_last_name() {
    let app = test_app!(test_state().await);

    for (first, last) in [("Bruno", "Zapata"), ("Carla", "Aguilar"), ("Ana", "Aguilar")] {
        let req = test::TestRequest::post()
            .uri("/api/students")
            .set_json(json!({ "first_name": first, "last_name": last, "course": "3B" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    let req = test::TestRequest::get().uri("/api/students").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
    let students: Value = test::read_body_json(resp).await;
    let names: Vec<(&str, &str)> = students
        .as_array()
        .unwrap()
        .iter()
        .map(|s| {
            (
                s["first_name"].as_str().unwrap(),
                s["last_name"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        names,
        vec![("Ana", "Aguilar"), ("Carla", "Aguilar"), ("Bruno", "Zapata")]
    );
}

#[actix_web::test]
async fn preflight_lists_allowed_methods() {
    let app = test_app!(test_state().await);
    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/api/students")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let headers = resp.headers();
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    assert!(headers
        .get("access-control-allow-methods")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("POST"));
}

#[actix_web::test]
async fn incomplete_student_is_rejected() {
    let app = test_app!(test_state().await);
    let req = test::TestRequest::post()
        .uri("/api/students")
        .set_json(json!({ "first_name": "Solo" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");

    let req = test::TestRequest::post()
        .uri("/api/students")
        .set_json(json!({ "first_name": "Solo", "last_name": "", "email": "not-an-email" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unknown_routes_fall_back_to_default_handler() {
    let app = test_app!(test_state().await);

    let req = test::TestRequest::get().uri("/no/such/page").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete().uri("/no/such/page").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
