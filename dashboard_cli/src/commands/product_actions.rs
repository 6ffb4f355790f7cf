//! Catalog mutations: create, update and delete products.

use anyhow::{bail, Result};
use clap::Args;
use dashboard_lib::types::{NewProduct, ProductUpdate};
use dashboard_lib::Action;

use super::Context;
use crate::output::{print_json, print_products, OutputFormat};

#[derive(Args)]
pub struct CreateProductArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Category slug
    #[arg(long)]
    pub category: String,

    #[arg(long)]
    pub price: f64,

    #[arg(long, default_value = "0")]
    pub stock: i64,

    #[arg(long, default_value = "")]
    pub brand: String,

    /// Discount in percent
    #[arg(long)]
    pub discount: Option<f64>,
}

#[derive(Args)]
pub struct UpdateProductArgs {
    /// Product ID
    pub id: i64,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub price: Option<f64>,

    #[arg(long)]
    pub stock: Option<i64>,

    #[arg(long)]
    pub brand: Option<String>,

    #[arg(long)]
    pub discount: Option<f64>,
}

#[derive(Args)]
pub struct DeleteProductArgs {
    /// Product ID
    pub id: i64,
}

fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        bail!("price must be a non-negative number (got {})", price);
    }
    Ok(())
}

pub fn new_product(args: &CreateProductArgs) -> Result<NewProduct> {
    validate_price(args.price)?;
    if args.stock < 0 {
        bail!("stock cannot be negative");
    }
    Ok(NewProduct {
        title: args.title.trim().to_string(),
        description: args.description.clone(),
        category: args.category.clone(),
        price: args.price,
        stock: args.stock,
        brand: args.brand.clone(),
        discount_percentage: args.discount,
        ..Default::default()
    })
}

pub fn product_update(args: &UpdateProductArgs) -> Result<ProductUpdate> {
    if let Some(price) = args.price {
        validate_price(price)?;
    }
    let update = ProductUpdate {
        title: args.title.clone(),
        description: args.description.clone(),
        category: args.category.clone(),
        price: args.price,
        stock: args.stock,
        brand: args.brand.clone(),
        discount_percentage: args.discount,
    };
    if update.is_empty() {
        bail!("nothing to update: pass at least one field");
    }
    Ok(update)
}

pub async fn create(args: &CreateProductArgs, ctx: &Context, format: &OutputFormat) -> Result<()> {
    let payload = new_product(args)?;
    let action = Action::new();
    let created = action.run(ctx.catalog.create_product(&payload)).await?;
    eprintln!("Created product {}", created.id);
    print_products(&[created], *format)
}

pub async fn update(args: &UpdateProductArgs, ctx: &Context, format: &OutputFormat) -> Result<()> {
    let payload = product_update(args)?;
    let action = Action::new();
    let updated = action
        .run(ctx.catalog.update_product(args.id, &payload))
        .await?;
    eprintln!("Updated product {}", updated.id);
    print_products(&[updated], *format)
}

pub async fn delete(args: &DeleteProductArgs, ctx: &Context, format: &OutputFormat) -> Result<()> {
    let action = Action::new();
    let deleted = action.run(ctx.catalog.delete_product(args.id)).await?;
    match format {
        OutputFormat::Json => print_json(&deleted),
        _ => println!(
            "Deleted product {} ({}) on {}",
            deleted.id,
            deleted.title.as_deref().unwrap_or("untitled"),
            dashboard_lib::format::format_date_str(&deleted.deleted_on)
        ),
    }
    Ok(())
}
