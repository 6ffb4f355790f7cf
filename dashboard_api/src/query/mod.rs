mod common;
pub use self::common::{Query, QueryCommon, SortDirection};

mod product;
pub use self::product::{ProductQuery, ProductSortBy};

mod procurement;
pub use self::procurement::ProcurementQuery;
