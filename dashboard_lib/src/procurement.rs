//! Procurement plan (RUP) records as pipeline rows, plus dashboard summaries.

use dashboard_api::types::ProcurementPackage;
use serde::Serialize;

use crate::pipeline::{FieldValue, Record};

/// Fields searched by the procurement table's search box.
pub const PROCUREMENT_SEARCH_FIELDS: &[&str] = &["package_name", "work_unit_name", "code"];

/// Status value of a package that is currently in force.
pub const ACTIVE_STATUS: &str = "active";

/// Field names accept both the English names and the service's column names.
impl Record for ProcurementPackage {
    fn field(&self, name: &str) -> Option<FieldValue> {
        let value = match name {
            "code" | "kd_rup" => FieldValue::from(self.code.as_str()),
            "work_unit_name" | "nama_satker" => FieldValue::from(self.work_unit_name.as_str()),
            "package_name" | "nama_paket" => FieldValue::from(self.package_name.as_str()),
            "budget" | "pagu" => FieldValue::from(self.budget),
            "procurement_method" | "metode_pengadaan" => {
                FieldValue::from(self.procurement_method.as_str())
            }
            "procurement_type" | "jenis_pengadaan" => {
                FieldValue::from(self.procurement_type.as_str())
            }
            "fiscal_year" | "tahun_anggaran" => FieldValue::from(self.fiscal_year),
            "work_unit_code" | "kd_satker" => FieldValue::from(self.work_unit_code.as_str()),
            "status" | "status_rup" => FieldValue::from(self.status.as_str()),
            _ => return None,
        };
        Some(value)
    }
}

/// Header figures of the procurement dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcurementStats {
    pub total_records: usize,
    pub total_budget: f64,
    pub active_records: usize,
    pub average_budget: f64,
    /// Share of active packages, 0-100.
    pub completion_rate: f64,
}

impl ProcurementStats {
    pub fn from_packages(packages: &[ProcurementPackage]) -> Self {
        let total_records = packages.len();
        let total_budget: f64 = packages.iter().map(|p| p.budget).sum();
        let active_records = packages
            .iter()
            .filter(|p| p.status == ACTIVE_STATUS)
            .count();
        let (average_budget, completion_rate) = if total_records > 0 {
            (
                total_budget / total_records as f64,
                active_records as f64 / total_records as f64 * 100.0,
            )
        } else {
            (0.0, 0.0)
        };
        Self {
            total_records,
            total_budget,
            active_records,
            average_budget,
            completion_rate,
        }
    }
}
