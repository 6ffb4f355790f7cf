mod product;
pub use self::product::{
    Category, DeletedProduct, Dimensions, NewProduct, Product, ProductID, ProductMeta,
    ProductUpdate, ProductsResponse, Review,
};

mod procurement;
pub use self::procurement::ProcurementPackage;
