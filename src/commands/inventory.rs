//! Global listings: relays, hardware products, user settings.

use anyhow::{Context, Result};

use crate::api::types::HardwareProduct;
use crate::api::ConchApi;
use crate::app::output::{cell, print_json, Table};

use super::device::settings_table;
use super::workspace::relays_table;

pub fn products_table(products: &[HardwareProduct]) -> Table {
    let mut table = Table::new(&["ID", "NAME", "ALIAS", "PREFIX", "VENDOR"]);
    for product in products {
        table.add_row(vec![
            product.id.to_string(),
            product.name.clone(),
            product.alias.clone(),
            cell(product.prefix.as_deref()),
            cell(product.vendor.as_deref()),
        ]);
    }
    table
}

pub async fn relays(api: &dyn ConchApi, json: bool) -> Result<()> {
    let relays = api.relays().await.context("Failed to list relays")?;
    if json {
        return print_json(&relays);
    }
    relays_table(&relays).print();
    Ok(())
}

pub async fn hardware_products(api: &dyn ConchApi, json: bool) -> Result<()> {
    let mut products = api.hardware_products().await.context("Failed to list hardware products")?;
    products.sort_by(|a, b| a.name.cmp(&b.name));
    if json {
        return print_json(&products);
    }
    products_table(&products).print();
    Ok(())
}

pub async fn user_settings(api: &dyn ConchApi, json: bool) -> Result<()> {
    let settings = api.user_settings().await.context("Failed to fetch user settings")?;
    if json {
        return print_json(&settings);
    }
    settings_table(&settings).print();
    Ok(())
}
