use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Args;
use dashboard_lib::pipeline::ListQuery;
use dashboard_lib::procurement::{ProcurementStats, PROCUREMENT_SEARCH_FIELDS};
use dashboard_lib::types::ProcurementPackage;
use dashboard_lib::{ProcurementQuery, Resource, SortDirection};

use super::{parse_sort_key, Context};
use crate::output::{print_procurement, print_procurement_stats, OutputFormat};

#[derive(Args)]
pub struct ProcurementArgs {
    /// Fiscal year
    #[arg(long, default_value = "2025")]
    pub year: i32,

    /// Work unit (satker) code
    #[arg(long, default_value = "D112")]
    pub work_unit: String,

    /// Dataset type segment of the endpoint
    #[arg(long, default_value = "4:12")]
    pub kind: String,

    /// Show a single package by its RUP code
    #[arg(long)]
    pub code: Option<String>,

    /// Case-insensitive search over package name, work unit and code
    #[arg(long)]
    pub search: Option<String>,

    /// Only packages with this status (e.g. active)
    #[arg(long)]
    pub status: Option<String>,

    /// Minimum budget in rupiah (inclusive)
    #[arg(long)]
    pub min_budget: Option<f64>,

    /// Maximum budget in rupiah (inclusive)
    #[arg(long)]
    pub max_budget: Option<f64>,

    /// Sort field: budget, package_name, work_unit_name, code, status
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Extra tie-breaking sort keys as field[:asc|desc] (repeatable)
    #[arg(long = "then-by")]
    pub then_by: Vec<String>,

    #[arg(long, default_value = "1")]
    pub page: usize,

    #[arg(long, default_value = "10")]
    pub page_size: usize,

    /// Print the dashboard summary of the matching packages
    #[arg(long)]
    pub stats: bool,
}

pub fn remote_query(args: &ProcurementArgs) -> ProcurementQuery {
    ProcurementQuery::default()
        .with_year(args.year)
        .with_work_unit(&args.work_unit)
        .with_kind(&args.kind)
}

pub fn build_list_query(args: &ProcurementArgs) -> Result<ListQuery> {
    if let (Some(min), Some(max)) = (args.min_budget, args.max_budget) {
        if min > max {
            bail!("--min-budget ({}) is greater than --max-budget ({})", min, max);
        }
    }

    let mut query = ListQuery::new()
        .with_page(args.page)
        .with_page_size(args.page_size);
    if let Some(search) = &args.search {
        query = query.with_search(search, PROCUREMENT_SEARCH_FIELDS);
    }
    if let Some(status) = &args.status {
        query = query.with_category("status", status);
    }
    if args.min_budget.is_some() || args.max_budget.is_some() {
        query = query.with_range("budget", args.min_budget, args.max_budget);
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

pub async fn run(args: &ProcurementArgs, ctx: &Context, format: &OutputFormat) -> Result<()> {
    let remote = remote_query(args);
    let base_path = ctx.config.procurement_path.clone();

    if let Some(code) = &args.code {
        return match ctx
            .procurement
            .find_procurement(code, &remote, &base_path)
            .await?
        {
            Some(package) => print_procurement(&[package], *format),
            None => bail!("no package with code {} in {} {}", code, args.work_unit, args.year),
        };
    }

    let list_query = build_list_query(args)?;

    let client = Arc::clone(&ctx.procurement);
    let packages: Resource<Vec<ProcurementPackage>> = Resource::with_fetcher(move || {
        let client = Arc::clone(&client);
        let remote = remote.clone();
        let base_path = base_path.clone();
        async move { client.get_procurement(&remote, &base_path).await }
    });
    packages.refetch().await;

    let state = packages.snapshot();
    if let Some(err) = state.error {
        bail!(err);
    }

    if args.stats {
        let matching = list_query.matching(&state.data);
        return print_procurement_stats(&ProcurementStats::from_packages(&matching), *format);
    }

    let page = list_query.apply(&state.data);
    eprintln!(
        "Showing {} (page {}/{})",
        page.range_label(),
        page.page,
        page.total_pages.max(1)
    );
    print_procurement(&page.items, *format)
}
