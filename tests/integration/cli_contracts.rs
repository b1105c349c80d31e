use crate::integration::support::Workspace;
use factory_context::tooling::{load_config, CliContext, Commands};
use serde_json::Value;
use std::fs;

fn context(ws: &Workspace) -> CliContext {
    let config = ws.write_config("");
    CliContext::new(ws.root().to_path_buf(), Some(config)).expect("cli context")
}

fn json_of(rendered: &str) -> Value {
    serde_json::from_str(rendered).expect("json output")
}

#[test]
fn read_renders_json_envelope() {
    let ws = Workspace::new();
    let cli = context(&ws);
    let out = cli
        .execute(&Commands::Read {
            domain: "inventory".into(),
            filters: vec!["status=low".into()],
            format: "json".into(),
        })
        .unwrap();
    assert!(out.success);
    let json = json_of(&out.rendered);
    assert_eq!(json["count"], 2);
    assert_eq!(json["data"][1]["material_id"], "MAT006");
}

#[test]
fn query_renders_text_table() {
    let ws = Workspace::new();
    let cli = context(&ws);
    let out = cli
        .execute(&Commands::Query {
            domain: "inventory".into(),
            expr: "current_stock < 2000".into(),
            limit: Some(10),
            format: "text".into(),
        })
        .unwrap();
    assert!(out.success);
    assert!(out.rendered.contains("MAT003"));
    assert!(out.rendered.contains("MAT004"));
    assert!(!out.rendered.contains("MAT005"));
}

#[test]
fn update_then_read_sees_new_value() {
    let ws = Workspace::new();
    let cli = context(&ws);
    let out = cli
        .execute(&Commands::Update {
            domain: "inventory".into(),
            id: 0,
            set: vec!["current_stock=4200".into(), "status=low".into()],
            format: "json".into(),
        })
        .unwrap();
    assert!(out.success, "{}", out.rendered);

    let out = cli
        .execute(&Commands::Read {
            domain: "inventory".into(),
            filters: vec!["material_id=MAT001".into()],
            format: "json".into(),
        })
        .unwrap();
    let json = json_of(&out.rendered);
    assert_eq!(json["data"][0]["current_stock"], 4200);
    assert_eq!(json["data"][0]["status"], "low");
}

#[test]
fn failed_envelope_marks_output_unsuccessful() {
    let ws = Workspace::new();
    let cli = context(&ws);
    let out = cli
        .execute(&Commands::Analyze {
            domain: "logistics".into(),
            kind: "trends".into(),
            format: "text".into(),
        })
        .unwrap();
    assert!(!out.success);
    assert!(out.rendered.contains("unsupported_analysis"));
}

#[test]
fn reader_agent_cannot_update() {
    let ws = Workspace::new();
    let before = fs::read_to_string(ws.resource("inventory")).unwrap();
    let cli = context(&ws);
    let out = cli
        .execute(&Commands::Call {
            domain: "inventory".into(),
            intent: "update".into(),
            data: r#"{"id": 0, "updates": {"current_stock": 1}}"#.into(),
            agent: Some("supervisory_agent".into()),
        })
        .unwrap();
    assert!(!out.success);
    assert_eq!(json_of(&out.rendered)["kind"], "unauthorized");
    assert_eq!(fs::read_to_string(ws.resource("inventory")).unwrap(), before);

    let out = cli
        .execute(&Commands::Call {
            domain: "inventory".into(),
            intent: "read".into(),
            data: "{}".into(),
            agent: Some("supervisory_agent".into()),
        })
        .unwrap();
    assert!(out.success);
}

#[test]
fn unknown_agent_is_rejected() {
    let ws = Workspace::new();
    let cli = context(&ws);
    let out = cli
        .execute(&Commands::Call {
            domain: "inventory".into(),
            intent: "read".into(),
            data: "{}".into(),
            agent: Some("ghost_agent".into()),
        })
        .unwrap();
    assert!(!out.success);
    assert!(json_of(&out.rendered)["error"]
        .as_str()
        .unwrap()
        .contains("ghost_agent"));
}

#[test]
fn call_rejects_invalid_json_data() {
    let ws = Workspace::new();
    let cli = context(&ws);
    let result = cli.execute(&Commands::Call {
        domain: "inventory".into(),
        intent: "read".into(),
        data: "{not json".into(),
        agent: None,
    });
    assert!(result.is_err());
}

#[test]
fn agents_json_lists_roster() {
    let ws = Workspace::new();
    let cli = context(&ws);
    let out = cli
        .execute(&Commands::Agents {
            format: "json".into(),
        })
        .unwrap();
    let json = json_of(&out.rendered);
    assert_eq!(json["total"], 6);
    let ids: Vec<&str> = json["agents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["agent_id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"supervisory_agent"));
}

#[test]
fn domains_json_reports_presence() {
    let ws = Workspace::new();
    fs::remove_file(ws.resource("quality")).unwrap();
    let cli = context(&ws);
    let out = cli
        .execute(&Commands::Domains {
            format: "json".into(),
        })
        .unwrap();
    let json = json_of(&out.rendered);
    let domains = json["domains"].as_array().unwrap();
    assert_eq!(domains.len(), 5);
    for entry in domains {
        let expected = entry["domain"] != "quality";
        assert_eq!(entry["exists"], expected, "{}", entry["domain"]);
    }
}

#[test]
fn invalid_format_is_an_error() {
    let ws = Workspace::new();
    let cli = context(&ws);
    let result = cli.execute(&Commands::Read {
        domain: "inventory".into(),
        filters: vec![],
        format: "yaml".into(),
    });
    assert!(result.is_err());
}

#[test]
fn writer_agent_stays_in_its_home_domain() {
    let ws = Workspace::new();
    let before = fs::read_to_string(ws.resource("production")).unwrap();
    let cli = context(&ws);
    let out = cli
        .execute(&Commands::Call {
            domain: "production".into(),
            intent: "update".into(),
            data: r#"{"id": 0, "updates": {"downtime_minutes": 0}}"#.into(),
            agent: Some("inventory_agent".into()),
        })
        .unwrap();
    assert!(!out.success);
    assert_eq!(json_of(&out.rendered)["kind"], "unauthorized");
    assert_eq!(fs::read_to_string(ws.resource("production")).unwrap(), before);
}

#[test]
fn reader_agent_sees_unknown_domain_first() {
    let ws = Workspace::new();
    let cli = context(&ws);
    let out = cli
        .execute(&Commands::Call {
            domain: "not_a_domain".into(),
            intent: "update".into(),
            data: "{}".into(),
            agent: Some("supervisory_agent".into()),
        })
        .unwrap();
    assert!(!out.success);
    assert_eq!(json_of(&out.rendered)["kind"], "unknown_domain");
}

#[test]
fn invalid_config_is_rejected_when_building_context() {
    let ws = Workspace::new();
    let config = ws.write_config("\n[analysis]\ntrend_window = 0\n");
    let loaded = load_config(ws.root(), Some(&config)).expect("loads without checking");
    assert_eq!(loaded.analysis.trend_window, 0);

    let err = CliContext::new(ws.root().to_path_buf(), Some(config))
        .err()
        .expect("context rejects config");
    assert!(err.to_string().contains("trend_window"));
}
