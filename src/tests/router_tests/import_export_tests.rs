// src/tests/router_tests/import_export_tests.rs
use crate::config::Settings;
use crate::domain::fixtures::apartment_json;
use crate::responses::xlsx::XLSX_CONTENT_TYPE;
use crate::tests::utils::{body_json, init_test_app, send, sign_in};
use astra::Response;
use http::Method;
use serde_json::{json, Value};
use std::io::Read;

fn body_bytes(resp: Response) -> Vec<u8> {
    let mut body = Vec::new();
    resp.into_body().reader().read_to_end(&mut body).unwrap();
    body
}

#[test]
fn import_reports_bad_rows_and_inserts_the_rest() {
    let (_dir, ctx) = init_test_app(Settings::default());
    let cookie = sign_in(&ctx, "u1", "USER");

    let rows: Vec<Value> = (1..=10)
        .map(|i| {
            let mut row = apartment_json();
            row["fullName"] = json!(format!("Lead {i}"));
            if i == 5 {
                row["phone"] = json!("not-a-phone");
            }
            row
        })
        .collect();

    let resp = send(&ctx, Method::POST, "/buyers/import", Some(&cookie), Some(&Value::Array(rows)));
    assert_eq!(resp.status(), 201);
    let report = body_json(resp);
    assert_eq!(report["insertedCount"], 9);
    assert_eq!(report["errors"].as_array().unwrap().len(), 1);
    assert_eq!(report["errors"][0]["row"], 5);

    let listed = body_json(send(&ctx, Method::GET, "/buyers?pageSize=100", Some(&cookie), None));
    assert_eq!(listed["total"], 9);
    for buyer in listed["data"].as_array().unwrap() {
        let uri = format!("/buyers/{}", buyer["id"].as_str().unwrap());
        let fetched = body_json(send(&ctx, Method::GET, &uri, Some(&cookie), None));
        let history = fetched["history"].as_array().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["diff"]["action"], "CREATE");
    }
}

#[test]
fn import_rejects_non_arrays() {
    let (_dir, ctx) = init_test_app(Settings::default());
    let cookie = sign_in(&ctx, "u1", "USER");

    let resp = send(&ctx, Method::POST, "/buyers/import", Some(&cookie), Some(&apartment_json()));
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp)["kind"], "bad_request");
}

#[test]
fn export_returns_a_workbook() {
    let (_dir, ctx) = init_test_app(Settings::default());
    let cookie = sign_in(&ctx, "u1", "USER");
    send(&ctx, Method::POST, "/buyers", Some(&cookie), Some(&apartment_json()));

    let resp = send(&ctx, Method::GET, "/buyers/export?city=Mohali", Some(&cookie), None);
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        XLSX_CONTENT_TYPE
    );
    assert!(resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("buyers.xlsx"));
    assert!(body_bytes(resp).starts_with(b"PK"));
}
