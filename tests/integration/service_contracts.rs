use crate::integration::support::{
    production_downtime, Workspace, INVENTORY_CSV, PRODUCTION_ROWS,
};
use factory_context::config::FactoryConfig;
use factory_context::{DomainContextService, Scalar};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;

fn ids(envelope: &factory_context::Envelope, column: &str) -> Vec<String> {
    envelope
        .data
        .as_ref()
        .expect("data present")
        .iter()
        .map(|r| r[column].to_string())
        .collect()
}

#[test]
fn unknown_domain_names_the_domain() {
    let ws = Workspace::new();
    let envelope = ws.service().call("not_a_domain", "read", &json!({}));
    assert!(!envelope.success);
    assert!(envelope.error.as_deref().unwrap().contains("not_a_domain"));
    assert_eq!(envelope.kind.as_deref(), Some("unknown_domain"));
    assert_eq!(envelope.available_domains.unwrap().len(), 5);
}

#[test]
fn unknown_intent_lists_available_intents() {
    let ws = Workspace::new();
    let envelope = ws.service().call("production", "bogus", &json!({}));
    assert!(!envelope.success);
    let intents = envelope.available_intents.expect("available_intents");
    for intent in ["read", "query", "analyze", "update"] {
        assert!(intents.iter().any(|i| i == intent), "missing {}", intent);
    }
}

#[test]
fn low_stock_query_returns_exactly_low_rows() {
    let ws = Workspace::new();
    let envelope = ws
        .service()
        .call("inventory", "query", &json!({"query": "status==\"low\""}));
    assert!(envelope.success);
    assert_eq!(ids(&envelope, "material_id"), vec!["MAT003", "MAT006"]);
    assert_eq!(envelope.count, Some(2));
    assert_eq!(envelope.query.as_deref(), Some("status==\"low\""));

    let row = &envelope.data.unwrap()[0];
    assert_eq!(row["current_stock"], Scalar::Int(1500));
    assert_eq!(row["reorder_point"], Scalar::Int(500));
}

#[test]
fn read_applies_every_filter_and_reports_all_columns() {
    let ws = Workspace::new();
    let svc = ws.service();

    let envelope = svc.call(
        "inventory",
        "read",
        &json!({"filter": {"status": "sufficient", "lead_time": 5}}),
    );
    assert!(envelope.success);
    assert_eq!(envelope.count, Some(0), "absent column matches nothing");
    assert_eq!(envelope.columns.as_ref().map(Vec::len), Some(8));

    let envelope = svc.call(
        "inventory",
        "read",
        &json!({"filter": {"status": "sufficient", "reorder_point": 800}}),
    );
    assert_eq!(ids(&envelope, "material_id"), vec!["MAT002"]);

    let envelope = svc.call("inventory", "read", &json!({"filter": {"unit_cost": 45}}));
    assert_eq!(ids(&envelope, "material_id"), vec!["MAT006"]);

    let envelope = svc.call("inventory", "read", &Value::Null);
    assert_eq!(envelope.count, Some(6));
}

#[test]
fn empty_query_returns_prefix_in_file_order() {
    let ws = Workspace::new();
    let envelope = ws
        .service()
        .call("inventory", "query", &json!({"query": "", "limit": 3}));
    assert_eq!(
        ids(&envelope, "material_id"),
        vec!["MAT001", "MAT002", "MAT003"]
    );
}

#[test]
fn query_on_absent_column_is_empty_not_error() {
    let ws = Workspace::new();
    let envelope = ws
        .service()
        .call("inventory", "query", &json!({"query": "warehouse == 'east'"}));
    assert!(envelope.success);
    assert_eq!(envelope.count, Some(0));
}

#[test]
fn malformed_queries_fail_with_kind() {
    let ws = Workspace::new();
    let svc = ws.service();
    for expr in ["status = 'low'", "current_stock <", "status > 5", "(status == 'low'"] {
        let envelope = svc.call("inventory", "query", &json!({"query": expr}));
        assert!(!envelope.success, "{} should fail", expr);
        assert_eq!(envelope.kind.as_deref(), Some("malformed_query"));
    }

    let envelope = svc.call("inventory", "query", &json!({"limit": -3}));
    assert_eq!(envelope.kind.as_deref(), Some("invalid_request"));
}

#[test]
fn summary_covers_every_numeric_column() {
    let ws = Workspace::new();
    let envelope = ws
        .service()
        .call("inventory", "analyze", &json!({"type": "summary"}));
    assert!(envelope.success);
    assert_eq!(envelope.total_records, Some(6));
    let analysis = envelope.analysis.unwrap();
    let columns: Vec<&str> = analysis.keys().map(String::as_str).collect();
    assert_eq!(
        columns,
        vec!["current_stock", "reorder_point", "unit_cost", "reorder_needed"]
    );
    let stock = &analysis["current_stock"];
    assert_eq!(stock.count, 6);
    assert_eq!(stock.min, Some(800.0));
    assert_eq!(stock.max, Some(45000.0));

    let json = serde_json::to_value(&analysis["unit_cost"]).unwrap();
    for key in ["count", "mean", "std", "min", "25%", "50%", "75%", "max"] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }
}

#[test]
fn summary_skips_boolean_columns() {
    let ws = Workspace::new();
    let envelope = ws.service().call("quality", "analyze", &json!({}));
    let analysis = envelope.analysis.unwrap();
    assert!(analysis.contains_key("defect_rate"));
    assert!(!analysis.contains_key("rework_required"));
    assert!(!analysis.contains_key("batch_id"));
}

#[test]
fn trends_sum_downtime_over_latest_fifty() {
    let ws = Workspace::new();
    let envelope = ws
        .service()
        .call("production", "analyze", &json!({"type": "trends"}));
    assert!(envelope.success, "{:?}", envelope.error);
    let trends = envelope.trends.unwrap();

    let expected: i64 = (PRODUCTION_ROWS - 50..PRODUCTION_ROWS)
        .map(production_downtime)
        .sum();
    assert_eq!(trends.window, 50);
    assert_eq!(trends.total_downtime, Some(expected as f64));
    assert!(trends.avg_output_rate.is_some());
    assert!(trends.avg_quality.is_some());
}

#[test]
fn trends_outside_production_are_unsupported() {
    let ws = Workspace::new();
    let svc = ws.service();
    let envelope = svc.call("maintenance", "analyze", &json!({"type": "trends"}));
    assert_eq!(envelope.kind.as_deref(), Some("unsupported_analysis"));
    let envelope = svc.call("production", "analyze", &json!({"type": "forecast"}));
    assert_eq!(envelope.kind.as_deref(), Some("unsupported_analysis"));
}

#[test]
fn update_round_trips_and_ignores_unknown_columns() {
    let ws = Workspace::new();
    let svc = ws.service();
    let envelope = svc.call(
        "inventory",
        "update",
        &json!({"id": 2, "updates": {"current_stock": 4500, "status": "sufficient", "colour": "red"}}),
    );
    assert!(envelope.success, "{:?}", envelope.error);
    assert_eq!(
        envelope.updated_columns,
        Some(vec!["current_stock".to_string(), "status".to_string()])
    );
    assert_eq!(envelope.ignored_columns, Some(vec!["colour".to_string()]));
    assert!(envelope.data.is_none());

    let read = svc.call("inventory", "read", &json!({}));
    let rows = read.data.unwrap();
    assert_eq!(rows[2]["material_id"], Scalar::Text("MAT003".into()));
    assert_eq!(rows[2]["current_stock"], Scalar::Int(4500));
    assert_eq!(rows[2]["status"], Scalar::Text("sufficient".into()));
    assert_eq!(rows[5]["current_stock"], Scalar::Int(2500));
    assert_eq!(rows[5]["unit_cost"], Scalar::Float(45.0));

    let on_disk = fs::read_to_string(ws.resource("inventory")).unwrap();
    assert_eq!(on_disk.lines().next(), INVENTORY_CSV.lines().next());
}

#[test]
fn update_on_missing_row_changes_nothing() {
    let ws = Workspace::new();
    let before = fs::read_to_string(ws.resource("inventory")).unwrap();
    let envelope = ws.service().call(
        "inventory",
        "update",
        &json!({"id": 6, "updates": {"current_stock": 1}}),
    );
    assert!(!envelope.success);
    assert_eq!(envelope.kind.as_deref(), Some("no_op_update"));
    assert_eq!(fs::read_to_string(ws.resource("inventory")).unwrap(), before);
}

#[test]
fn missing_resource_is_resource_io() {
    let ws = Workspace::new();
    fs::remove_file(ws.resource("logistics")).unwrap();
    let envelope = ws.service().call("logistics", "read", &json!({}));
    assert_eq!(envelope.kind.as_deref(), Some("resource_io"));
    assert_eq!(envelope.domain.as_deref(), Some("logistics"));
    assert_eq!(envelope.intent.as_deref(), Some("read"));
}

#[test]
fn non_object_data_is_invalid_request() {
    let ws = Workspace::new();
    let envelope = ws.service().call("inventory", "read", &json!("status"));
    assert_eq!(envelope.kind.as_deref(), Some("invalid_request"));
}

#[test]
fn configured_file_override_and_default_limit() {
    let ws = Workspace::new();
    fs::rename(ws.resource("quality"), ws.data_dir().join("qc.csv")).unwrap();

    let mut config = FactoryConfig::default();
    config.storage.data_dir = PathBuf::from("data");
    config
        .storage
        .files
        .insert("quality".to_string(), PathBuf::from("qc.csv"));
    config.query.default_limit = 2;

    let svc = DomainContextService::from_config(&config, ws.root()).unwrap();
    assert!(svc.call("quality", "read", &json!({})).success);
    assert_eq!(svc.call("inventory", "query", &json!({})).count, Some(2));
}

#[test]
fn success_envelope_json_shape() {
    let ws = Workspace::new();
    let json = ws
        .service()
        .call("inventory", "read", &json!({"filter": {"material_id": "MAT003"}}))
        .to_json();
    assert_eq!(json["success"], true);
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["material_id"], "MAT003");
    assert_eq!(json["data"][0]["unit_cost"], 12.3);
    assert!(json.get("error").is_none());
    assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn oversized_queries_fail_cleanly() {
    let ws = Workspace::new();
    let svc = ws.service();

    let chain = vec!["current_stock == 1"; 100_000].join(" or ");
    let nots = format!("{}(status == 'low')", "~".repeat(10_000));
    let parens = format!("{}status == 'low'{}", "(".repeat(10_000), ")".repeat(10_000));
    for expr in [chain, nots, parens] {
        let envelope = svc.call("inventory", "query", &json!({ "query": expr }));
        assert!(!envelope.success);
        assert_eq!(envelope.kind.as_deref(), Some("malformed_query"));
    }

    let wide = vec!["status == 'low'"; 2_000].join(" or ");
    let envelope = svc.call("inventory", "query", &json!({ "query": wide }));
    assert_eq!(envelope.count, Some(2));
}

#[test]
fn update_refuses_values_that_would_retype_a_column() {
    let ws = Workspace::new();
    let svc = ws.service();
    let before = fs::read_to_string(ws.resource("inventory")).unwrap();

    for updates in [
        json!({"reorder_needed": true}),
        json!({"current_stock": "plenty"}),
        json!({"unit_cost": false}),
        json!({"current_stock": 12.5}),
    ] {
        let envelope = svc.call("inventory", "update", &json!({"id": 0, "updates": updates}));
        assert_eq!(envelope.kind.as_deref(), Some("invalid_request"), "{}", updates);
    }
    assert_eq!(fs::read_to_string(ws.resource("inventory")).unwrap(), before);

    let envelope = svc.call("inventory", "query", &json!({"query": "reorder_needed == 1"}));
    assert_eq!(envelope.count, Some(2));
}

#[test]
fn update_converts_compatible_values() {
    let ws = Workspace::new();
    let svc = ws.service();
    let envelope = svc.call(
        "inventory",
        "update",
        &json!({"id": 0, "updates": {
            "current_stock": 4200.0,
            "unit_cost": 30,
            "reorder_needed": "1",
            "supplier": "",
        }}),
    );
    assert!(envelope.success, "{:?}", envelope.error);

    let rows = svc.call("inventory", "read", &json!({})).data.unwrap();
    assert_eq!(rows[0]["current_stock"], Scalar::Int(4200));
    assert_eq!(rows[0]["unit_cost"], Scalar::Float(30.0));
    assert_eq!(rows[0]["reorder_needed"], Scalar::Int(1));
    assert_eq!(rows[0]["supplier"], Scalar::Null);
    assert_eq!(rows[1]["reorder_needed"], Scalar::Int(0));

    let envelope = svc.call("quality", "update", &json!({"id": 1, "updates": {"rework_required": true}}));
    assert!(envelope.success);
    let envelope = svc.call("quality", "read", &json!({"filter": {"rework_required": true}}));
    assert_eq!(envelope.count, Some(2));
}
