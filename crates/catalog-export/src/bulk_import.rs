// Bulk-import rows (WP All Import field names).
//
// Physical attributes and shipping data are required by the importer but
// not tracked by the catalog, so they are always emitted empty.

use catalog_model::NormalizedRecord;
use serde::{Deserialize, Serialize};

use crate::{decimal_field, export_slug, sku};

pub const HEADERS: [&str; 26] = [
    "_id",
    "post_title",
    "post_content",
    "post_excerpt",
    "_sku",
    "_regular_price",
    "_sale_price",
    "_stock",
    "_manage_stock",
    "_virtual",
    "_downloadable",
    "product_cat",
    "tax_status",
    "post_status",
    "post_name",
    "images",
    "post_parent",
    "menu_order",
    "_weight",
    "_length",
    "_width",
    "_height",
    "_shipping_class",
    "attribute_pa_color",
    "attribute_pa_size",
    "attribute_pa_material",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkImportRow {
    #[serde(rename = "_id")]
    pub id: String,
    pub post_title: String,
    pub post_content: String,
    pub post_excerpt: String,
    #[serde(rename = "_sku")]
    pub sku: String,
    #[serde(rename = "_regular_price")]
    pub regular_price: String,
    #[serde(rename = "_sale_price")]
    pub sale_price: String,
    #[serde(rename = "_stock")]
    pub stock: String,
    #[serde(rename = "_manage_stock")]
    pub manage_stock: String,
    #[serde(rename = "_virtual")]
    pub is_virtual: String,
    #[serde(rename = "_downloadable")]
    pub downloadable: String,
    pub product_cat: String,
    pub tax_status: String,
    pub post_status: String,
    pub post_name: String,
    pub images: String,
    pub post_parent: String,
    pub menu_order: String,
    #[serde(rename = "_weight")]
    pub weight: String,
    #[serde(rename = "_length")]
    pub length: String,
    #[serde(rename = "_width")]
    pub width: String,
    #[serde(rename = "_height")]
    pub height: String,
    #[serde(rename = "_shipping_class")]
    pub shipping_class: String,
    pub attribute_pa_color: String,
    pub attribute_pa_size: String,
    pub attribute_pa_material: String,
}

impl BulkImportRow {
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let values = [
            &self.id,
            &self.post_title,
            &self.post_content,
            &self.post_excerpt,
            &self.sku,
            &self.regular_price,
            &self.sale_price,
            &self.stock,
            &self.manage_stock,
            &self.is_virtual,
            &self.downloadable,
            &self.product_cat,
            &self.tax_status,
            &self.post_status,
            &self.post_name,
            &self.images,
            &self.post_parent,
            &self.menu_order,
            &self.weight,
            &self.length,
            &self.width,
            &self.height,
            &self.shipping_class,
            &self.attribute_pa_color,
            &self.attribute_pa_size,
            &self.attribute_pa_material,
        ];
        HEADERS.into_iter().zip(values.map(String::clone)).collect()
    }
}

/// Orderable items go live; everything else is imported as a draft.
pub fn to_bulk_import_schema(record: &NormalizedRecord) -> BulkImportRow {
    let post_status = if record.stock_status.is_orderable() {
        "publish"
    } else {
        "draft"
    };

    BulkImportRow {
        id: record.identifier.clone(),
        post_title: record.seo_title.clone(),
        post_content: record.description.clone(),
        post_excerpt: record.short_description.clone(),
        sku: format!("LIB{}", sku(&record.identifier)),
        regular_price: decimal_field(Some(record.price)),
        sale_price: decimal_field(record.sale_price),
        stock: record.stock_quantity.to_string(),
        manage_stock: "1".to_string(),
        is_virtual: "0".to_string(),
        downloadable: "0".to_string(),
        product_cat: record.category.clone(),
        tax_status: "taxable".to_string(),
        post_status: post_status.to_string(),
        post_name: export_slug(record),
        images: record.image_url.clone().unwrap_or_default(),
        post_parent: String::new(),
        menu_order: "0".to_string(),
        weight: String::new(),
        length: String::new(),
        width: String::new(),
        height: String::new(),
        shipping_class: String::new(),
        attribute_pa_color: String::new(),
        attribute_pa_size: String::new(),
        attribute_pa_material: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::sample_record;
    use catalog_model::StockStatus;

    #[test]
    fn test_bulk_import_mapping() {
        let row = to_bulk_import_schema(&sample_record());
        assert_eq!(row.id, "9788400000001");
        assert_eq!(row.sku, "LIB000001");
        assert_eq!(row.post_title, "Título con UTF-8 | Autor Ejemplo");
        assert_eq!(row.post_status, "publish");
        assert_eq!(row.post_name, "titulo-con-utf-8-autor-ejemplo");
        assert_eq!(row.regular_price, "10.50");
        assert_eq!(row.tax_status, "taxable");
        assert_eq!(row.menu_order, "0");
        assert!(row.weight.is_empty() && row.attribute_pa_material.is_empty());
    }

    #[test]
    fn test_post_status_follows_availability() {
        let mut record = sample_record();
        record.stock_status = StockStatus::OutOfStock;
        assert_eq!(to_bulk_import_schema(&record).post_status, "draft");
        record.stock_status = StockStatus::OnBackorder;
        assert_eq!(to_bulk_import_schema(&record).post_status, "publish");
    }

    #[test]
    fn test_fields_follow_headers() {
        let fields = to_bulk_import_schema(&sample_record()).fields();
        let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, HEADERS);
    }

    #[test]
    fn test_serialized_keys_match_headers() {
        let json = serde_json::to_value(to_bulk_import_schema(&sample_record())).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), HEADERS.len());
        for header in HEADERS {
            assert!(object.contains_key(header), "missing {header}");
        }
    }
}
