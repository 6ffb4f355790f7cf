use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Args;
use dashboard_lib::pipeline::ListQuery;
use dashboard_lib::products::{product_stats, PRODUCT_SEARCH_FIELDS};
use dashboard_lib::types::Product;
use dashboard_lib::{ProductQuery, Query, Resource, SortDirection};

use super::{parse_sort_key, Context};
use crate::output::{print_product_stats, print_products, OutputFormat};

#[derive(Args)]
pub struct ProductsArgs {
    /// Get a single product by ID
    #[arg(long)]
    pub id: Option<i64>,

    /// Case-insensitive search over title, description and category
    #[arg(long)]
    pub search: Option<String>,

    /// Only products in this category (exact slug, e.g. smartphones)
    #[arg(long)]
    pub category: Option<String>,

    /// Minimum price (inclusive)
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Maximum price (inclusive)
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Sort field: title, price, rating, stock, category, brand
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Extra tie-breaking sort keys as field[:asc|desc] (repeatable)
    #[arg(long = "then-by")]
    pub then_by: Vec<String>,

    /// Page number
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Results per page
    #[arg(long, default_value = "10")]
    pub page_size: usize,

    /// Maximum products fetched from the catalog (0 fetches all)
    #[arg(long, default_value = "0")]
    pub fetch_limit: u32,

    /// Print summary statistics of the matching products instead of rows
    #[arg(long)]
    pub stats: bool,
}

/// Builds the local pipeline from command-line filters.
pub fn build_list_query(args: &ProductsArgs) -> Result<ListQuery> {
    if let (Some(min), Some(max)) = (args.min_price, args.max_price) {
        if min > max {
            bail!("--min-price ({}) is greater than --max-price ({})", min, max);
        }
    }

    let mut query = ListQuery::new()
        .with_page(args.page)
        .with_page_size(args.page_size);

    if let Some(search) = &args.search {
        query = query.with_search(search, PRODUCT_SEARCH_FIELDS);
    }
    if let Some(category) = &args.category {
        query = query.with_category("category", category);
    }
    if args.min_price.is_some() || args.max_price.is_some() {
        query = query.with_range("price", args.min_price, args.max_price);
    }
    if let Some(field) = &args.sort {
        let direction = if args.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        query = query.with_sort(field, direction);
    }
    for raw in &args.then_by {
        let key = parse_sort_key(raw)?;
        query = query.then_sort(&key.field, key.direction);
    }
    Ok(query)
}

pub async fn run(args: &ProductsArgs, ctx: &Context, format: &OutputFormat) -> Result<()> {
    if let Some(id) = args.id {
        let product = ctx.catalog.get_product(id).await?;
        return print_products(&[product], *format);
    }

    let list_query = build_list_query(args)?;

    let client = Arc::clone(&ctx.catalog);
    let remote = ProductQuery::default().with_limit(args.fetch_limit);
    let products: Resource<Vec<Product>> = Resource::with_fetcher(move || {
        let client = Arc::clone(&client);
        let remote = remote.clone();
        async move { client.get_products(&remote).await.map(|r| r.products) }
    });
    products.refetch().await;

    let state = products.snapshot();
    if let Some(err) = state.error {
        bail!(err);
    }

    if args.stats {
        let matching = list_query.matching(&state.data);
        return print_product_stats(&product_stats(&matching), *format);
    }

    let page = list_query.apply(&state.data);
    eprintln!(
        "Showing {} (page {}/{})",
        page.range_label(),
        page.page,
        page.total_pages.max(1)
    );
    print_products(&page.items, *format)
}
