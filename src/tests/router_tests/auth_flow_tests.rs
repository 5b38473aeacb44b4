// src/tests/router_tests/auth_flow_tests.rs
use crate::config::Settings;
use crate::tests::utils::{body_json, cookie_from, init_test_app, send};
use http::Method;
use serde_json::json;

#[test]
fn register_then_me_then_logout() {
    let (_dir, ctx) = init_test_app(Settings::default());

    let resp = send(
        &ctx,
        Method::POST,
        "/auth/register",
        None,
        Some(&json!({"email": " Asha@Example.com ", "password": "secret1", "name": "Asha"})),
    );
    assert_eq!(resp.status(), 201);
    let cookie = cookie_from(&resp);
    assert!(cookie.starts_with("session="));
    let body = body_json(resp);
    assert_eq!(body["userRole"], "USER");

    let resp = send(&ctx, Method::GET, "/auth/me", Some(&cookie), None);
    assert_eq!(resp.status(), 200);
    let me = body_json(resp);
    assert_eq!(me["userId"], body["userId"]);
    assert_eq!(me["email"], "asha@example.com");

    let resp = send(&ctx, Method::POST, "/auth/logout", Some(&cookie), None);
    assert_eq!(resp.status(), 200);
    assert_eq!(cookie_from(&resp), "session=");

    let resp = send(&ctx, Method::GET, "/auth/me", Some(&cookie), None);
    assert_eq!(resp.status(), 401);
}

#[test]
fn duplicate_registration_conflicts() {
    let (_dir, ctx) = init_test_app(Settings::default());
    let creds = json!({"email": "dup@example.com", "password": "secret1"});

    let first = send(&ctx, Method::POST, "/auth/register", None, Some(&creds));
    assert_eq!(first.status(), 201);

    let second = send(&ctx, Method::POST, "/auth/register", None, Some(&creds));
    assert_eq!(second.status(), 409);
    assert_eq!(body_json(second)["kind"], "conflict");
}

#[test]
fn registration_rejects_short_passwords() {
    let (_dir, ctx) = init_test_app(Settings::default());

    let resp = send(
        &ctx,
        Method::POST,
        "/auth/register",
        None,
        Some(&json!({"email": "a@example.com", "password": "123"})),
    );
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp)["errors"][0]["path"], "password");
}

#[test]
fn login_checks_the_password() {
    let (_dir, ctx) = init_test_app(Settings::default());
    send(
        &ctx,
        Method::POST,
        "/auth/register",
        None,
        Some(&json!({"email": "b@example.com", "password": "secret1"})),
    );

    let wrong = send(
        &ctx,
        Method::POST,
        "/auth/login",
        None,
        Some(&json!({"email": "b@example.com", "password": "nope"})),
    );
    assert_eq!(wrong.status(), 401);

    let right = send(
        &ctx,
        Method::POST,
        "/auth/login",
        None,
        Some(&json!({"email": "B@example.com", "password": "secret1"})),
    );
    assert_eq!(right.status(), 200);
    assert!(cookie_from(&right).starts_with("session="));
}

#[test]
fn demo_login_reuses_one_admin_account() {
    let (_dir, ctx) = init_test_app(Settings::default());

    let first = body_json(send(&ctx, Method::GET, "/auth/demo", None, None));
    let second = body_json(send(&ctx, Method::GET, "/auth/demo", None, None));

    assert_eq!(first["userRole"], "ADMIN");
    assert_eq!(first["userId"], second["userId"]);
}

#[test]
fn me_without_cookie_is_unauthenticated() {
    let (_dir, ctx) = init_test_app(Settings::default());

    let resp = send(&ctx, Method::GET, "/auth/me", None, None);
    assert_eq!(resp.status(), 401);
    assert_eq!(body_json(resp)["kind"], "unauthenticated");
}
