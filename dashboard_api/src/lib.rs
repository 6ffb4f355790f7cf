mod client;
mod errors;
mod query;
pub mod request;
pub mod types;
pub use self::client::{Client, DEFAULT_TIMEOUT};
pub use self::errors::{Error, TransportCode};
pub use self::query::{
    ProcurementQuery, ProductQuery, ProductSortBy, Query, QueryCommon, SortDirection,
};
pub use self::request::ApiRequest;
pub use reqwest::Method;
