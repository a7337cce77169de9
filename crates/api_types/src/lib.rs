//! Wire types of the ledger service read endpoints.
//!
//! The ledger speaks the dashboard's Indonesian field names; every field is
//! accepted under its English name and under its Indonesian alias. Fields whose
//! shape is not trusted (ids, amounts) are kept as raw JSON values and
//! normalized by the engine, so a single dirty record never fails a whole page.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod list {
    use super::*;

    /// Pagination block returned next to `data`.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ListMeta {
        pub page: Option<u32>,
        pub limit: Option<u32>,
        pub total: Option<u64>,
        pub total_page: Option<u32>,
    }

    /// `{ "data": [...], "meta": {...} }` envelope shared by the list endpoints.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ListResponse<T> {
        #[serde(default = "Vec::new")]
        pub data: Vec<T>,
        #[serde(default)]
        pub meta: Option<ListMeta>,
    }

    impl<T> ListResponse<T> {
        /// Returns `true` when the ledger reports pages after `page`.
        ///
        /// A response without `meta` is a single, complete page.
        pub fn has_more_after(&self, page: u32) -> bool {
            self.meta
                .as_ref()
                .and_then(|meta| meta.total_page)
                .is_some_and(|total_page| page < total_page)
        }
    }

    /// Query string of a list request.
    #[derive(Clone, Copy, Debug, Serialize, Deserialize)]
    pub struct ListQuery {
        pub page: u32,
        pub limit: u32,
    }
}

pub mod donation {
    use super::*;

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct DonationView {
        #[serde(default, alias = "id_donasi")]
        pub id: Option<Value>,
        /// Absent, blank or `Anonim` means anonymous.
        #[serde(default, alias = "nama_donatur")]
        pub donor_name: Option<String>,
        #[serde(default, alias = "nominal")]
        pub amount: Option<Value>,
        /// RFC3339 timestamp.
        #[serde(default, alias = "waktu_catat")]
        pub recorded_at: Option<String>,
    }
}

pub mod due {
    use super::*;

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct DueView {
        #[serde(default, alias = "id_syahriah")]
        pub id: Option<Value>,
        #[serde(default, alias = "id_santri")]
        pub student_id: Option<Value>,
        /// Year-month key, `YYYY-MM`.
        #[serde(default, alias = "bulan")]
        pub period: Option<String>,
        #[serde(default, alias = "nominal")]
        pub amount: Option<Value>,
        /// `paid`/`lunas` or `unpaid`/`belum`.
        #[serde(default)]
        pub status: Option<String>,
        #[serde(default, alias = "waktu_bayar")]
        pub paid_at: Option<String>,
    }
}

pub mod expenditure {
    use super::*;

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct ExpenditureView {
        #[serde(default, alias = "id_pemakaian")]
        pub id: Option<Value>,
        #[serde(default, alias = "judul_pemakaian")]
        pub title: Option<String>,
        #[serde(default, alias = "deskripsi")]
        pub description: Option<String>,
        #[serde(default, alias = "nominal_total")]
        pub amount: Option<Value>,
        /// `operational`/`operasional`, `investment`/`investasi`, `other`/`lainnya`.
        #[serde(default, alias = "tipe_pemakaian")]
        pub category: Option<String>,
        /// `dues`/`syahriah`, `donation`/`donasi`, `mixed`/`campuran`.
        #[serde(default, alias = "sumber_dana")]
        pub funding_source: Option<String>,
        /// Part of the amount drawn from dues.
        #[serde(default, alias = "nominal_syahriah")]
        pub dues_portion: Option<Value>,
        /// Part of the amount drawn from donations.
        #[serde(default, alias = "nominal_donasi")]
        pub donation_portion: Option<Value>,
        #[serde(default, alias = "tanggal_pemakaian")]
        pub expenditure_date: Option<String>,
        #[serde(default)]
        pub created_at: Option<String>,
        #[serde(default, alias = "keterangan")]
        pub notes: Option<String>,
    }
}
