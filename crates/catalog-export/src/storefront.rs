// Storefront product import (WooCommerce product CSV columns).

use catalog_model::{NormalizedRecord, StockStatus};
use serde::{Deserialize, Serialize};

use crate::{decimal_field, export_slug, sku};

pub const HEADERS: [&str; 18] = [
    "sku",
    "name",
    "published",
    "short_description",
    "description",
    "regular_price",
    "sale_price",
    "stock_quantity",
    "stock_status",
    "manage_stock",
    "categories",
    "images",
    "slug",
    "meta:isbn13",
    "meta:author",
    "meta:publisher",
    "meta:seo_title",
    "meta:seo_description",
];

/// One product row for the storefront importer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontRow {
    pub sku: String,
    pub name: String,
    pub published: String,
    pub short_description: String,
    pub description: String,
    pub regular_price: String,
    pub sale_price: String,
    pub stock_quantity: String,
    pub stock_status: String,
    pub manage_stock: String,
    pub categories: String,
    pub images: String,
    pub slug: String,
    #[serde(rename = "meta:isbn13")]
    pub isbn13: String,
    #[serde(rename = "meta:author")]
    pub author: String,
    /// Not tracked by the catalog; always empty.
    #[serde(rename = "meta:publisher")]
    pub publisher: String,
    #[serde(rename = "meta:seo_title")]
    pub seo_title: String,
    #[serde(rename = "meta:seo_description")]
    pub seo_description: String,
}

impl StorefrontRow {
    /// Values in column order, paired with their headers.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let values = [
            &self.sku,
            &self.name,
            &self.published,
            &self.short_description,
            &self.description,
            &self.regular_price,
            &self.sale_price,
            &self.stock_quantity,
            &self.stock_status,
            &self.manage_stock,
            &self.categories,
            &self.images,
            &self.slug,
            &self.isbn13,
            &self.author,
            &self.publisher,
            &self.seo_title,
            &self.seo_description,
        ];
        HEADERS.into_iter().zip(values.map(String::clone)).collect()
    }
}

/// WooCommerce's spelling of each availability state.
pub fn stock_status_code(status: StockStatus) -> &'static str {
    match status {
        StockStatus::InStock => "instock",
        StockStatus::OutOfStock => "outofstock",
        StockStatus::OnBackorder => "onbackorder",
    }
}

pub fn to_storefront_schema(record: &NormalizedRecord) -> StorefrontRow {
    StorefrontRow {
        sku: format!("LIB-{}", sku(&record.identifier)),
        name: record.title.clone(),
        published: "1".to_string(),
        short_description: record.short_description.clone(),
        description: record.description.clone(),
        regular_price: decimal_field(Some(record.price)),
        sale_price: decimal_field(record.sale_price),
        stock_quantity: record.stock_quantity.to_string(),
        stock_status: stock_status_code(record.stock_status).to_string(),
        manage_stock: "1".to_string(),
        categories: record.category.clone(),
        images: record.image_url.clone().unwrap_or_default(),
        slug: export_slug(record),
        isbn13: record.identifier.clone(),
        author: record.author.clone(),
        publisher: String::new(),
        seo_title: record.seo_title.clone(),
        seo_description: record.short_description.clone(),
    }
}
