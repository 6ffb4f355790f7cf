//! Procurement plan records (RUP provider packages).

use serde::{Deserialize, Serialize};

/// A published provider procurement package.
///
/// Field names on the wire are the service's Indonesian column names.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProcurementPackage {
    /// Package code (`kd_rup`), unique per package.
    #[serde(rename = "kd_rup")]
    pub code: String,

    #[serde(rename = "nama_satker")]
    pub work_unit_name: String,

    #[serde(rename = "nama_paket")]
    pub package_name: String,

    /// Budget ceiling (`pagu`) in rupiah.
    #[serde(rename = "pagu")]
    pub budget: f64,

    #[serde(rename = "metode_pengadaan")]
    pub procurement_method: String,

    #[serde(rename = "jenis_pengadaan")]
    pub procurement_type: String,

    #[serde(rename = "tahun_anggaran")]
    pub fiscal_year: i32,

    #[serde(rename = "kd_satker")]
    pub work_unit_code: String,

    #[serde(rename = "status_rup")]
    pub status: String,
}
