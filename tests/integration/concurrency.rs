use crate::integration::support::Workspace;
use factory_context::Scalar;
use serde_json::json;
use std::fs;
use std::sync::Arc;
use std::thread;

#[test]
fn parallel_updates_to_distinct_rows_are_all_kept() {
    let ws = Workspace::new();
    let mut csv = String::from("material_id,current_stock,status\n");
    for i in 0..8 {
        csv.push_str(&format!("MAT{:03},100,sufficient\n", i));
    }
    fs::write(ws.resource("inventory"), csv).unwrap();

    let svc = Arc::new(ws.service());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let svc = Arc::clone(&svc);
            thread::spawn(move || {
                for round in 0..5 {
                    let envelope = svc.call(
                        "inventory",
                        "update",
                        &json!({"id": i, "updates": {"current_stock": 1000 * i + round}}),
                    );
                    assert!(envelope.success, "{:?}", envelope.error);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let records = svc.call("inventory", "read", &json!({})).data.unwrap();
    assert_eq!(records.len(), 8);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record["current_stock"], Scalar::Int(1000 * i as i64 + 4));
    }
}

#[test]
fn readers_never_observe_partial_writes() {
    let ws = Workspace::new();
    let svc = Arc::new(ws.service());

    let writer = {
        let svc = Arc::clone(&svc);
        thread::spawn(move || {
            for n in 0..20 {
                let envelope = svc.call(
                    "inventory",
                    "update",
                    &json!({"id": n % 6, "updates": {"current_stock": n}}),
                );
                assert!(envelope.success, "{:?}", envelope.error);
            }
        })
    };
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let svc = Arc::clone(&svc);
            thread::spawn(move || {
                for _ in 0..20 {
                    let envelope = svc.call("inventory", "query", &json!({"query": "current_stock >= 0"}));
                    assert!(envelope.success, "{:?}", envelope.error);
                    assert_eq!(envelope.count, Some(6));
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn domains_do_not_block_each_other() {
    let ws = Workspace::new();
    let svc = Arc::new(ws.service());
    let handles: Vec<_> = ["inventory", "maintenance", "logistics", "quality"]
        .into_iter()
        .map(|domain| {
            let svc = Arc::clone(&svc);
            thread::spawn(move || {
                for _ in 0..10 {
                    assert!(svc.call(domain, "read", &json!({})).success);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}
