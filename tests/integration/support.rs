//! Shared CSV fixtures.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use factory_context::store::CsvResourceStore;
use factory_context::DomainContextService;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const INVENTORY_CSV: &str = "\
material_id,material_name,current_stock,reorder_point,unit_cost,supplier,status,reorder_needed
MAT001,Steel Plate,5000,1000,25.5,Supplier A,sufficient,0
MAT002,Aluminum Rod,3200,800,18.75,Supplier B,sufficient,0
MAT003,Welding Wire,1500,500,12.3,Supplier C,low,1
MAT004,Cutting Fluid,800,200,8.5,Supplier D,sufficient,0
MAT005,Bolts M10,45000,10000,0.15,Supplier E,sufficient,0
MAT006,Paint,2500,500,45.0,Supplier F,low,1
";

pub const MAINTENANCE_CSV: &str = "\
machine_id,machine_type,last_maintenance,hours_since_maintenance,predicted_failure_prob,status,priority
M001,Drill,2024-10-15,720,0.15,operational,medium
M002,Welder,2024-11-01,288,0.05,operational,low
M003,Welder,2024-10-20,576,0.25,needs_attention,high
M004,Conveyor,2024-11-05,192,0.08,operational,low
";

pub const LOGISTICS_CSV: &str = "\
shipment_id,order_id,customer,quantity,priority,status
SH001,ORD1001,Customer A,500,high,in_transit
SH002,ORD1002,Customer B,120,normal,delivered
SH003,ORD1003,Customer C,80,low,pending
";

pub const QUALITY_CSV: &str = "\
batch_id,machine_id,defect_rate,quality_score,inspection_status,rework_required
B1234,M003,88.32,11.68,failed,True
B1235,M004,77.71,22.29,passed,False
B1236,M001,75.74,24.26,passed,False
";

/// Rows in the production fixture.
pub const PRODUCTION_ROWS: usize = 60;

/// Timestamp of the `i`-th production record in time order.
pub fn production_timestamp(i: usize) -> NaiveDateTime {
    let start = NaiveDate::from_ymd_opt(2024, 11, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid start");
    start + Duration::minutes(15 * i as i64)
}

pub fn production_downtime(i: usize) -> i64 {
    ((i * 13) % 50) as i64
}

/// Production records stored out of time order: file row `k` holds the
/// `(k * 7) % 60`-th record chronologically.
pub fn production_csv() -> String {
    let mut out = String::from(
        "timestamp,machine_id,temperature,output_rate,quality_score,downtime_minutes,status\n",
    );
    for k in 0..PRODUCTION_ROWS {
        let i = (k * 7) % PRODUCTION_ROWS;
        out.push_str(&format!(
            "{},M00{},{:.2},{:.2},{:.2},{},{}\n",
            production_timestamp(i).format("%Y-%m-%d %H:%M:%S"),
            i % 4 + 1,
            70.0 + (i % 20) as f64,
            90.0 + (i % 10) as f64 * 0.5,
            20.0 + (i % 8) as f64,
            production_downtime(i),
            if i % 9 == 0 { "maintenance" } else { "operational" },
        ));
    }
    out
}

/// Temporary workspace with every domain's resource under `data/`.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let data = dir.path().join("data");
        fs::create_dir_all(&data).expect("data dir");
        fs::write(data.join("inventory_data.csv"), INVENTORY_CSV).expect("inventory");
        fs::write(data.join("production_data.csv"), production_csv()).expect("production");
        fs::write(data.join("maintenance_data.csv"), MAINTENANCE_CSV).expect("maintenance");
        fs::write(data.join("logistics_data.csv"), LOGISTICS_CSV).expect("logistics");
        fs::write(data.join("quality_data.csv"), QUALITY_CSV).expect("quality");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn resource(&self, name: &str) -> PathBuf {
        self.data_dir().join(format!("{}_data.csv", name))
    }

    pub fn service(&self) -> DomainContextService {
        DomainContextService::new(Arc::new(CsvResourceStore::new(self.data_dir())))
    }

    /// Config file pinning everything the CLI tests depend on.
    pub fn write_config(&self, extra: &str) -> PathBuf {
        let path = self.dir.path().join("test-config.toml");
        let body = format!(
            "[storage]\ndata_dir = \"{}\"\n\n[query]\ndefault_limit = 100\n{}",
            self.data_dir().display(),
            extra
        );
        fs::write(&path, body).expect("config file");
        path
    }
}
