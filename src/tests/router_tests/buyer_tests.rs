// src/tests/router_tests/buyer_tests.rs
use crate::config::Settings;
use crate::domain::fixtures::apartment_json;
use crate::tests::utils::{body_json, body_string, init_test_app, send, sign_in};
use http::Method;
use serde_json::{json, Value};

fn create(ctx: &crate::router::AppContext, cookie: &str, payload: &Value) -> Value {
    let resp = send(ctx, Method::POST, "/buyers", Some(cookie), Some(payload));
    assert_eq!(resp.status(), 201, "create should succeed");
    body_json(resp)
}

/// The stored record as an update payload carrying its `updatedAt`.
fn edit_of(record: &Value) -> Value {
    let mut payload = apartment_json();
    for key in payload.as_object().unwrap().keys().cloned().collect::<Vec<_>>() {
        payload[&key] = record[&key].clone();
    }
    payload["updatedAt"] = record["updatedAt"].clone();
    payload
}

#[test]
fn buyer_routes_require_a_session() {
    let (_dir, ctx) = init_test_app(Settings::default());

    for (method, uri) in [
        (Method::GET, "/buyers"),
        (Method::POST, "/buyers"),
        (Method::GET, "/buyers/some-id"),
        (Method::PUT, "/buyers/some-id"),
        (Method::DELETE, "/buyers/some-id"),
        (Method::POST, "/buyers/import"),
        (Method::GET, "/buyers/export"),
    ] {
        let resp = send(&ctx, method, uri, Some("session=bogus"), Some(&json!({})));
        assert_eq!(resp.status(), 401, "{uri}");
    }
}

#[test]
fn create_returns_record_and_one_history_entry() {
    let (_dir, ctx) = init_test_app(Settings::default());
    let cookie = sign_in(&ctx, "u1", "USER");

    let created = create(&ctx, &cookie, &apartment_json());
    assert_eq!(created["ownerId"], "u1");
    assert_eq!(created["bhk"], "THREE");
    assert_eq!(created["createdAt"], created["updatedAt"]);

    let id = created["id"].as_str().unwrap();
    let fetched = body_json(send(&ctx, Method::GET, &format!("/buyers/{id}"), Some(&cookie), None));
    let history = fetched["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["diff"]["action"], "CREATE");
    assert_eq!(history[0]["changedAt"], created["updatedAt"]);

    let snapshot = &history[0]["diff"]["newValues"];
    for key in ["id", "fullName", "phone", "bhk", "tags", "status", "updatedAt"] {
        assert_eq!(snapshot[key], created[key], "{key}");
    }
}

#[test]
fn create_validation_errors_are_listed() {
    let (_dir, ctx) = init_test_app(Settings::default());
    let cookie = sign_in(&ctx, "u1", "USER");
    let mut payload = apartment_json();
    payload["bhk"] = Value::Null;

    let resp = send(&ctx, Method::POST, "/buyers", Some(&cookie), Some(&payload));
    assert_eq!(resp.status(), 400);
    let body = body_json(resp);
    assert_eq!(body["kind"], "validation");
    assert_eq!(body["errors"][0]["path"], "bhk");
}

#[test]
fn plot_never_keeps_a_bhk() {
    let (_dir, ctx) = init_test_app(Settings::default());
    let cookie = sign_in(&ctx, "u1", "USER");

    let mut payload = apartment_json();
    payload["propertyType"] = json!("Plot");
    let created = create(&ctx, &cookie, &payload);
    assert_eq!(created["bhk"], Value::Null);

    let apartment = create(&ctx, &cookie, &apartment_json());
    let id = apartment["id"].as_str().unwrap();
    let mut edit = edit_of(&apartment);
    edit["propertyType"] = json!("Plot");
    let resp = send(&ctx, Method::PUT, &format!("/buyers/{id}"), Some(&cookie), Some(&edit));
    assert_eq!(resp.status(), 200);
    assert_eq!(body_json(resp)["bhk"], Value::Null);
}

#[test]
fn update_records_changes_and_rejects_stale_copies() {
    let (_dir, ctx) = init_test_app(Settings::default());
    let cookie = sign_in(&ctx, "u1", "USER");
    let created = create(&ctx, &cookie, &apartment_json());
    let uri = format!("/buyers/{}", created["id"].as_str().unwrap());

    let mut edit = edit_of(&created);
    edit["status"] = json!("Contacted");
    edit["tags"] = json!(["hot", "priority"]);
    let resp = send(&ctx, Method::PUT, &uri, Some(&cookie), Some(&edit));
    assert_eq!(resp.status(), 200);
    let updated = body_json(resp);

    assert_ne!(updated["updatedAt"], created["updatedAt"]);
    let latest = &updated["history"][0];
    assert_eq!(latest["diff"]["action"], "UPDATE");
    assert_eq!(latest["changedAt"], updated["updatedAt"]);
    assert_eq!(
        latest["diff"]["changes"],
        json!({
            "status": {"from": "New", "to": "Contacted"},
            "tags": {"added": ["priority"]}
        })
    );

    // Same edit again, based on the now outdated copy.
    let resp = send(&ctx, Method::PUT, &uri, Some(&cookie), Some(&edit));
    assert_eq!(resp.status(), 409);
    let body = body_json(resp);
    assert_eq!(body["kind"], "stale_write");
    assert!(body["error"].as_str().unwrap().contains("Reload"));
}

#[test]
fn identical_resubmission_writes_no_history() {
    let (_dir, ctx) = init_test_app(Settings::default());
    let cookie = sign_in(&ctx, "u1", "USER");
    let created = create(&ctx, &cookie, &apartment_json());
    let uri = format!("/buyers/{}", created["id"].as_str().unwrap());

    let resp = send(&ctx, Method::PUT, &uri, Some(&cookie), Some(&edit_of(&created)));
    assert_eq!(resp.status(), 200);
    let updated = body_json(resp);

    assert_ne!(updated["updatedAt"], created["updatedAt"]);
    assert_eq!(updated["history"].as_array().unwrap().len(), 1);
}

#[test]
fn non_owner_is_forbidden_but_admin_is_not() {
    let (_dir, ctx) = init_test_app(Settings::default());
    let owner = sign_in(&ctx, "u1", "USER");
    let other = sign_in(&ctx, "u2", "USER");
    let admin = sign_in(&ctx, "boss", "ADMIN");
    let created = create(&ctx, &owner, &apartment_json());
    let uri = format!("/buyers/{}", created["id"].as_str().unwrap());

    let resp = send(&ctx, Method::PUT, &uri, Some(&other), Some(&edit_of(&created)));
    assert_eq!(resp.status(), 403);
    let resp = send(&ctx, Method::DELETE, &uri, Some(&other), None);
    assert_eq!(resp.status(), 403);

    // Others can still read it.
    let resp = send(&ctx, Method::GET, &uri, Some(&other), None);
    assert_eq!(resp.status(), 200);

    let resp = send(&ctx, Method::DELETE, &uri, Some(&admin), None);
    assert_eq!(resp.status(), 200);
    let resp = send(&ctx, Method::GET, &uri, Some(&owner), None);
    assert_eq!(resp.status(), 404);
}

#[test]
fn status_change_goes_through_the_same_guard() {
    let (_dir, ctx) = init_test_app(Settings::default());
    let cookie = sign_in(&ctx, "u1", "USER");
    let created = create(&ctx, &cookie, &apartment_json());
    let uri = format!("/buyers/{}/status", created["id"].as_str().unwrap());
    let change = json!({"status": "Qualified", "updatedAt": created["updatedAt"]});

    let resp = send(&ctx, Method::PUT, &uri, Some(&cookie), Some(&change));
    assert_eq!(resp.status(), 200);
    let updated = body_json(resp);
    assert_eq!(updated["status"], "Qualified");
    assert_eq!(
        updated["history"][0]["diff"]["changes"],
        json!({"status": {"from": "New", "to": "Qualified"}})
    );

    let resp = send(&ctx, Method::PUT, &uri, Some(&cookie), Some(&change));
    assert_eq!(resp.status(), 409);
}

#[test]
fn unknown_buyer_is_not_found() {
    let (_dir, ctx) = init_test_app(Settings::default());
    let cookie = sign_in(&ctx, "u1", "USER");

    let resp = send(&ctx, Method::GET, "/buyers/missing", Some(&cookie), None);
    assert_eq!(resp.status(), 404);
    assert_eq!(body_json(resp)["kind"], "not_found");
}

#[test]
fn list_filters_searches_and_paginates() {
    let (_dir, ctx) = init_test_app(Settings::default());
    let cookie = sign_in(&ctx, "u1", "USER");

    for (name, city) in [("Asha Verma", "Mohali"), ("Ravi Kumar", "Zirakpur"), ("Meera Kapoor", "Mohali")] {
        let mut payload = apartment_json();
        payload["fullName"] = json!(name);
        payload["city"] = json!(city);
        create(&ctx, &cookie, &payload);
    }

    let page = body_json(send(&ctx, Method::GET, "/buyers?city=Mohali&pageSize=1", Some(&cookie), None));
    assert_eq!(page["total"], 2);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["data"].as_array().unwrap().len(), 1);

    let found = body_json(send(&ctx, Method::GET, "/buyers?search=ravi&status=undefined", Some(&cookie), None));
    assert_eq!(found["total"], 1);
    assert_eq!(found["data"][0]["fullName"], "Ravi Kumar");

    let sorted = body_json(send(
        &ctx,
        Method::GET,
        "/buyers?sortBy=fullName&sortOrder=asc",
        Some(&cookie),
        None,
    ));
    assert_eq!(sorted["data"][0]["fullName"], "Asha Verma");

    let resp = send(&ctx, Method::GET, "/buyers?city=Delhi", Some(&cookie), None);
    assert_eq!(resp.status(), 400);
}

#[test]
fn far_out_page_returns_an_empty_page() {
    let (_dir, ctx) = init_test_app(Settings::default());
    let cookie = sign_in(&ctx, "u1", "USER");
    create(&ctx, &cookie, &apartment_json());

    let resp = send(&ctx, Method::GET, "/buyers?page=1000000000000000000", Some(&cookie), None);
    assert_eq!(resp.status(), 200);
    let page = body_json(resp);
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"].as_array().unwrap().len(), 0);
}

#[test]
fn oversized_budget_is_rejected() {
    let (_dir, ctx) = init_test_app(Settings::default());
    let cookie = sign_in(&ctx, "u1", "USER");
    let mut payload = apartment_json();
    payload["budgetMin"] = json!(1e30);
    payload["budgetMax"] = json!(2e30);

    let resp = send(&ctx, Method::POST, "/buyers", Some(&cookie), Some(&payload));
    assert_eq!(resp.status(), 400);
    let body = body_json(resp);
    assert_eq!(body["errors"][0]["path"], "budgetMin");
    assert_eq!(body["errors"][0]["message"], "Budget is too large");
}

#[test]
fn creation_is_rate_limited() {
    let mut settings = Settings::default();
    settings.rate_limit.max_requests = 1;
    let (_dir, ctx) = init_test_app(settings);
    let cookie = sign_in(&ctx, "u1", "USER");

    create(&ctx, &cookie, &apartment_json());
    let resp = send(&ctx, Method::POST, "/buyers", Some(&cookie), Some(&apartment_json()));
    assert_eq!(resp.status(), 429);
    assert_eq!(body_json(resp)["kind"], "rate_limited");
}

#[test]
fn detail_page_renders_history() {
    let (_dir, ctx) = init_test_app(Settings::default());
    let cookie = sign_in(&ctx, "u1", "USER");
    let created = create(&ctx, &cookie, &apartment_json());
    let id = created["id"].as_str().unwrap();

    let resp = send(&ctx, Method::GET, &format!("/buyers/{id}/view"), Some(&cookie), None);
    assert_eq!(resp.status(), 200);
    let html = body_string(resp);
    assert!(html.contains("Asha Verma"));
    assert!(html.contains("Created lead for Asha Verma"));

    let resp = send(&ctx, Method::GET, "/buyers/missing/view", Some(&cookie), None);
    assert_eq!(resp.status(), 404);
    assert!(body_string(resp).contains("Error 404"));
}

#[test]
fn unknown_route_is_not_found() {
    let (_dir, ctx) = init_test_app(Settings::default());
    let resp = send(&ctx, Method::GET, "/nope", None, None);
    assert_eq!(resp.status(), 404);
}
