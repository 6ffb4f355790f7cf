/// Selector for published provider procurement packages.
///
/// The procurement service encodes every parameter in the path:
/// `{base}/RUP-PaketPenyedia-Terumumkan/tipe/{kind}/parameter/{year}:{work_unit}`.
#[derive(Debug, Clone)]
pub struct ProcurementQuery {
    /// Fiscal year (`tahun`).
    pub year: i32,
    /// Work unit code (`kd_satker`).
    pub work_unit: String,
    /// Dataset type selector (`tipe`).
    pub kind: String,
}

impl Default for ProcurementQuery {
    fn default() -> Self {
        Self {
            year: 2025,
            work_unit: "D112".to_string(),
            kind: "4:12".to_string(),
        }
    }
}

impl ProcurementQuery {
    /// Request path under the configured procurement base path.
    pub fn path(&self, base_path: &str) -> String {
        format!(
            "{}/RUP-PaketPenyedia-Terumumkan/tipe/{}/parameter/{}:{}",
            base_path.trim_end_matches('/'),
            self.kind,
            self.year,
            self.work_unit
        )
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn with_work_unit(mut self, work_unit: &str) -> Self {
        self.work_unit = work_unit.to_string();
        self
    }

    pub fn with_kind(mut self, kind: &str) -> Self {
        self.kind = kind.to_string();
        self
    }
}
