use anyhow::{bail, Result};
use clap::Args;
use dashboard_lib::types::Category;
use dashboard_lib::Resource;

use super::Context;
use crate::output::{print_categories, OutputFormat};

#[derive(Args)]
pub struct CategoriesArgs {
    /// Only categories whose slug or name contains this text
    #[arg(long)]
    pub search: Option<String>,
}

pub async fn run(args: &CategoriesArgs, ctx: &Context, format: &OutputFormat) -> Result<()> {
    let categories: Resource<Vec<Category>> = Resource::new();
    categories.load(ctx.catalog.get_categories()).await;

    let state = categories.snapshot();
    if let Some(err) = state.error {
        bail!(err);
    }

    let rows: Vec<Category> = match &args.search {
        Some(term) => {
            let needle = term.to_lowercase();
            state
                .data
                .into_iter()
                .filter(|c| {
                    c.slug.to_lowercase().contains(&needle) || c.name.to_lowercase().contains(&needle)
                })
                .collect()
        }
        None => state.data,
    };

    eprintln!("{} categories", rows.len());
    print_categories(&rows, *format)
}
