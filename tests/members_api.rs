mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use court_booking::domain::MemberRole;

use common::{guest_booking, TestApp};

#[tokio::test]
async fn member_endpoints_require_a_token() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/v1/members").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = app
        .call(Method::GET, "/api/v1/members", None, Some("not-a-jwt"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/v1/payments").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn only_admins_manage_members() {
    let app = TestApp::new().await;
    let player = app.token("p-1", MemberRole::Player);

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/members",
            Some(json!({"firstName": "A", "lastName": "B", "email": "a@example.com"})),
            Some(&player),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, _) = app
        .call(Method::GET, "/api/v1/members", None, Some(&player))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn members_get_sequential_numbers_and_unique_emails() {
    let app = TestApp::new().await;
    let admin = app.admin_token();

    let first = app.create_member("first@example.com").await;
    app.create_member("second@example.com").await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/members",
            Some(json!({"firstName": "Dup", "lastName": "Licate", "email": "FIRST@example.com"})),
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, listed) = app
        .call(Method::GET, "/api/v1/members", None, Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    let numbers: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["memberNumber"].as_str().unwrap())
        .collect();
    assert_eq!(numbers, vec!["M00001", "M00002"]);

    // A member may read their own record but not someone else's.
    let own = app.token(&first, MemberRole::Player);
    let (status, me) = app
        .call(Method::GET, &format!("/api/v1/members/{first}"), None, Some(&own))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["role"], "player");

    let other = app.token("someone-else", MemberRole::Player);
    let (status, _) = app
        .call(Method::GET, &format!("/api/v1/members/{first}"), None, Some(&other))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn invalid_member_payloads_are_rejected() {
    let app = TestApp::new().await;
    let admin = app.admin_token();

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/members",
            Some(json!({"firstName": "A", "lastName": "B", "email": "nope"})),
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/members",
            Some(json!({"firstName": "A", "lastName": "B", "email": "a@b.co", "role": "umpire"})),
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn coaches_write_journal_entries_members_read_them() {
    let app = TestApp::new().await;
    let member_id = app.create_member("student@example.com").await;
    let coach = app.token("coach-1", MemberRole::Coach);
    let uri = format!("/api/v1/members/{member_id}/journal");

    let (status, entry) = app
        .call(
            Method::POST,
            &uri,
            Some(json!({
                "date": "2030-05-01",
                "title": "Backhand",
                "content": "Work on the follow-through.",
                "tags": ["technique"],
            })),
            Some(&coach),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{entry}");
    assert_eq!(entry["authorId"], "coach-1");

    let student = app.token(&member_id, MemberRole::Player);
    let (status, entries) = app.call(Method::GET, &uri, None, Some(&student)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entries.as_array().unwrap().len(), 1);

    let (status, _) = app
        .call(
            Method::POST,
            &uri,
            Some(json!({"date": "2030-05-02", "title": "Self", "content": "Notes"})),
            Some(&student),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/members/nobody/journal",
            Some(json!({"date": "2030-05-02", "title": "Ghost", "content": "Notes"})),
            Some(&coach),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn payments_are_mirrored_onto_reservations() {
    let app = TestApp::new().await;
    let admin = app.admin_token();

    let (_, booked) = app
        .post(
            "/api/v1/reservations",
            guest_booking("1", "2030-06-01", "10:00", "11:00"),
        )
        .await;
    let reservation_id = booked["id"].as_str().unwrap().to_string();

    let (status, payment) = app
        .call(
            Method::POST,
            "/api/v1/payments",
            Some(json!({
                "reservationId": reservation_id,
                "amount": "25.00",
                "currency": "eur",
                "providerReference": "pi_123",
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{payment}");
    assert_eq!(payment["currency"], "EUR");
    assert_eq!(payment["status"], "pending");
    let payment_id = payment["id"].as_str().unwrap().to_string();

    let (status, updated) = app
        .call(
            Method::PUT,
            &format!("/api/v1/payments/{payment_id}/status"),
            Some(json!({"status": "succeeded"})),
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "succeeded");

    let (_, reservation) = app
        .get(&format!("/api/v1/reservations/{reservation_id}"))
        .await;
    assert_eq!(reservation["paymentId"], payment_id.as_str());
    assert_eq!(reservation["paymentStatus"], "succeeded");

    let (status, listed) = app
        .call(
            Method::GET,
            &format!("/api/v1/payments?reservationId={reservation_id}"),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/payments",
            Some(json!({"reservationId": "missing", "amount": "5", "currency": "EUR"})),
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
