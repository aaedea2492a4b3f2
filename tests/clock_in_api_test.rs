mod common;

use axum::http::Method;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rstest::rstest;
use serde_json::{json, Value};

use common::TestApp;

async fn clock_in(app: &TestApp, email: &str, location: &str) -> Value {
    let (status, body) = app
        .request_json(
            Method::POST,
            "/clock-in",
            Some(json!({ "email": email, "location": location })),
        )
        .await;
    assert_eq!(status, 201, "unexpected create response: {body}");
    body
}

fn timestamp_of(record: &Value) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(record["insert_datetime"].as_str().expect("timestamp"))
        .expect("rfc3339 timestamp")
        .with_timezone(&Utc)
}

#[tokio::test]
async fn clock_in_lifecycle() {
    let app = TestApp::new();
    let before = Utc::now() - Duration::seconds(1);

    let created = clock_in(&app, "a@x.com", "NYC").await;
    let id = created["id"].as_str().expect("record id").to_string();
    assert_eq!(id.len(), 24);
    assert_eq!(created["email"], "a@x.com");
    assert_eq!(created["location"], "NYC");
    let stamped = timestamp_of(&created);
    assert!(stamped >= before && stamped <= Utc::now());

    let (status, fetched) = app
        .request_json(Method::GET, &format!("/clock-in/{id}"), None)
        .await;
    assert_eq!(status, 200);
    assert_eq!(fetched, created);

    let (status, updated) = app
        .request_json(
            Method::PUT,
            &format!("/clock-in/{id}"),
            Some(json!({ "location": "LA" })),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(updated["location"], "LA");
    assert_eq!(updated["email"], "a@x.com");
    assert_eq!(updated["insert_datetime"], created["insert_datetime"]);

    let response = app
        .request(Method::DELETE, &format!("/clock-in/{id}"), None)
        .await;
    assert_eq!(response.status(), 204);

    let (status, body) = app
        .request_json(Method::GET, &format!("/clock-in/{id}"), None)
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Not found: Clock-In record not found");
}

#[tokio::test]
async fn empty_update_is_rejected() {
    let app = TestApp::new();
    let created = clock_in(&app, "a@x.com", "NYC").await;
    let uri = format!("/clock-in/{}", created["id"].as_str().unwrap());

    let (status, body) = app.request_json(Method::PUT, &uri, Some(json!({}))).await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "Bad request: No fields provided for update");

    let (_, fetched) = app.request_json(Method::GET, &uri, None).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let app = TestApp::new();
    let uri = "/clock-in/507f1f77bcf86cd799439011";

    let (status, body) = app
        .request_json(Method::PUT, uri, Some(json!({ "location": "LA" })))
        .await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Not found: Clock-In record not found");

    let response = app.request(Method::DELETE, uri, None).await;
    assert_eq!(response.status(), 404);
}

#[rstest]
#[case::get(Method::GET)]
#[case::delete(Method::DELETE)]
#[tokio::test]
async fn malformed_ids_are_bad_requests(#[case] method: Method) {
    let app = TestApp::new();
    let (status, body) = app.request_json(method, "/clock-in/123", None).await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "Bad request: Invalid ID format");
}

#[tokio::test]
async fn filters_by_email_and_location() {
    let app = TestApp::new();
    clock_in(&app, "a@x.com", "NYC").await;
    clock_in(&app, "a@x.com", "LA").await;
    clock_in(&app, "b@x.com", "NYC").await;

    let (status, body) = app
        .request_json(Method::GET, "/clock-in/filter?location=NYC", None)
        .await;
    assert_eq!(status, 200);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = app
        .request_json(
            Method::GET,
            "/clock-in/filter?email=a@x.com&location=NYC",
            None,
        )
        .await;
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["email"], "a@x.com");
    assert_eq!(records[0]["location"], "NYC");

    let (_, listed) = app.request_json(Method::GET, "/clock-in", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn insert_datetime_filter_is_strictly_after() {
    let app = TestApp::new();
    let record = clock_in(&app, "a@x.com", "NYC").await;
    let stamped = timestamp_of(&record);

    let exact = stamped
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace('+', "%2B");
    let (_, body) = app
        .request_json(
            Method::GET,
            &format!("/clock-in/filter?insert_datetime={exact}"),
            None,
        )
        .await;
    assert_eq!(body, json!([]));

    let earlier = (stamped - Duration::minutes(5))
        .naive_utc()
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string();
    let (status, body) = app
        .request_json(
            Method::GET,
            &format!("/clock-in/filter?insert_datetime={earlier}"),
            None,
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!([record]));
}

#[rstest]
#[case::bad_email(json!({ "email": "nope", "location": "NYC" }))]
#[case::empty_location(json!({ "email": "a@x.com", "location": "" }))]
#[case::missing_location(json!({ "email": "a@x.com" }))]
#[tokio::test]
async fn invalid_create_payloads_are_rejected(#[case] payload: Value) {
    let app = TestApp::new();
    let (status, body) = app
        .request_json(Method::POST, "/clock-in", Some(payload))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn malformed_datetime_filter_is_rejected() {
    let app = TestApp::new();
    let response = app
        .request(Method::GET, "/clock-in/filter?insert_datetime=yesterday", None)
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn responses_echo_the_request_id() {
    let app = TestApp::new();
    let response = app.request(Method::GET, "/clock-in/filter", None).await;
    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn collection_route_accepts_a_trailing_slash() {
    let app = TestApp::new();
    let (status, created) = app
        .request_json(
            Method::POST,
            "/clock-in/",
            Some(json!({ "email": "a@x.com", "location": "NYC" })),
        )
        .await;
    assert_eq!(status, 201, "unexpected create response: {created}");

    let (status, listed) = app.request_json(Method::GET, "/clock-in/", None).await;
    assert_eq!(status, 200);
    assert_eq!(listed, json!([created]));
}

#[tokio::test]
async fn empty_location_filter_matches_every_record() {
    let app = TestApp::new();
    clock_in(&app, "a@x.com", "NYC").await;
    clock_in(&app, "b@x.com", "LA").await;

    let (status, body) = app
        .request_json(Method::GET, "/clock-in/filter?location=", None)
        .await;
    assert_eq!(status, 200);
    assert_eq!(body.as_array().unwrap().len(), 2);
}
