use std::str::FromStr;

use anyhow::Result;
use dashboard_lib::format::{
    format_compact, format_currency, format_number, format_percentage, truncate_text,
};
use dashboard_lib::procurement::ProcurementStats;
use dashboard_lib::products::{
    format_category_name, format_product_price, format_product_rating, ProductStats,
};
use dashboard_lib::types::{Category, ProcurementPackage, Product};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => anyhow::bail!(
                "unknown output format '{}': use table, json, csv or markdown",
                other
            ),
        }
    }
}

#[derive(Tabled, Serialize)]
struct ProductRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: i64,
    #[tabled(rename = "Title")]
    #[serde(rename = "Title")]
    title: String,
    #[tabled(rename = "Category")]
    #[serde(rename = "Category")]
    category: String,
    #[tabled(rename = "Price")]
    #[serde(rename = "Price")]
    price: String,
    #[tabled(rename = "Rating")]
    #[serde(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Stock")]
    #[serde(rename = "Stock")]
    stock: i64,
    #[tabled(rename = "Brand")]
    #[serde(rename = "Brand")]
    brand: String,
}

#[derive(Tabled, Serialize)]
struct CategoryRow {
    #[tabled(rename = "Slug")]
    #[serde(rename = "Slug")]
    slug: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
}

#[derive(Tabled, Serialize)]
struct ProcurementRow {
    #[tabled(rename = "Code")]
    #[serde(rename = "Code")]
    code: String,
    #[tabled(rename = "Package")]
    #[serde(rename = "Package")]
    package: String,
    #[tabled(rename = "Work Unit")]
    #[serde(rename = "Work Unit")]
    work_unit: String,
    #[tabled(rename = "Budget")]
    #[serde(rename = "Budget")]
    budget: String,
    #[tabled(rename = "Method")]
    #[serde(rename = "Method")]
    method: String,
    #[tabled(rename = "Type")]
    #[serde(rename = "Type")]
    kind: String,
    #[tabled(rename = "Status")]
    #[serde(rename = "Status")]
    status: String,
}

#[derive(Tabled, Serialize)]
struct StatRow {
    #[tabled(rename = "Metric")]
    #[serde(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: String,
}

// -- Row builders --

fn build_product_rows(products: &[Product]) -> Vec<ProductRow> {
    products
        .iter()
        .map(|p| ProductRow {
            id: p.id,
            title: truncate_text(&p.title, 40),
            category: format_category_name(&p.category),
            price: format_product_price(p.price),
            rating: format_product_rating(p),
            stock: p.stock,
            brand: p.brand.clone().unwrap_or_default(),
        })
        .collect()
}

fn build_category_rows(categories: &[Category]) -> Vec<CategoryRow> {
    categories
        .iter()
        .map(|c| CategoryRow {
            slug: c.slug.clone(),
            name: c.name.clone(),
        })
        .collect()
}

fn build_procurement_rows(packages: &[ProcurementPackage]) -> Vec<ProcurementRow> {
    packages
        .iter()
        .map(|p| ProcurementRow {
            code: p.code.clone(),
            package: truncate_text(&p.package_name, 48),
            work_unit: p.work_unit_name.clone(),
            budget: format_compact(p.budget, "Rp"),
            method: p.procurement_method.clone(),
            kind: p.procurement_type.clone(),
            status: p.status.clone(),
        })
        .collect()
}

fn stat(metric: &str, value: String) -> StatRow {
    StatRow {
        metric: metric.to_string(),
        value,
    }
}

fn build_product_stat_rows(stats: &ProductStats) -> Vec<StatRow> {
    vec![
        stat("Total Products", format_number(stats.total as f64)),
        stat("Rated 4+", format_number(stats.high_rated as f64)),
        stat("Average Rating", format!("{:.1}", stats.average_rating)),
        stat("Average Price", format_currency(stats.average_price, "USD")),
    ]
}

fn build_procurement_stat_rows(stats: &ProcurementStats) -> Vec<StatRow> {
    vec![
        stat("Total Records", format_number(stats.total_records as f64)),
        stat("Total Budget", format_currency(stats.total_budget, "IDR")),
        stat("Active Records", format_number(stats.active_records as f64)),
        stat("Average Budget", format_currency(stats.average_budget, "IDR")),
        stat("Completion Rate", format_percentage(stats.completion_rate, 1)),
    ]
}

// -- Rendering --

fn render<R: Tabled + Serialize>(rows: Vec<R>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", Table::new(rows)),
        OutputFormat::Markdown => {
            let mut table = Table::new(rows);
            table.with(Style::markdown());
            println!("{}", table);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        OutputFormat::Json => print_json(&rows),
    }
    Ok(())
}

/// JSON output uses the raw records; the other formats use display rows.
pub fn print_products(products: &[Product], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(&products);
            Ok(())
        }
        _ => render(build_product_rows(products), format),
    }
}

pub fn print_categories(categories: &[Category], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(&categories);
            Ok(())
        }
        _ => render(build_category_rows(categories), format),
    }
}

pub fn print_procurement(packages: &[ProcurementPackage], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(&packages);
            Ok(())
        }
        _ => render(build_procurement_rows(packages), format),
    }
}

pub fn print_product_stats(stats: &ProductStats, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(stats);
            Ok(())
        }
        _ => render(build_product_stat_rows(stats), format),
    }
}

pub fn print_procurement_stats(stats: &ProcurementStats, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(stats);
            Ok(())
        }
        _ => render(build_procurement_stat_rows(stats), format),
    }
}

/// Key/value listing for status commands.
pub fn print_key_values(pairs: &[(&str, String)], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = pairs
                .iter()
                .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
                .collect();
            print_json(&map);
            Ok(())
        }
        _ => {
            let rows: Vec<StatRow> = pairs.iter().map(|(k, v)| stat(k, v.clone())).collect();
            render(rows, format)
        }
    }
}

pub fn print_json<T: serde::Serialize + ?Sized>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
