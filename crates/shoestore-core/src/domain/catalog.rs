//! Catalog entities: brands, categories, products and their sizes

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Brands and categories share one shape and one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxonomyKind {
    Brand,
    Category,
}

impl TaxonomyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxonomyKind::Brand => "brand",
            TaxonomyKind::Category => "category",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            TaxonomyKind::Brand => "brands",
            TaxonomyKind::Category => "categories",
        }
    }

    pub fn id_column(&self) -> &'static str {
        match self {
            TaxonomyKind::Brand => "idbrand",
            TaxonomyKind::Category => "idcategory",
        }
    }

    pub fn name_column(&self) -> &'static str {
        match self {
            TaxonomyKind::Brand => "brandname",
            TaxonomyKind::Category => "categoryname",
        }
    }

    /// Name used in not-found messages
    pub fn label(&self) -> &'static str {
        match self {
            TaxonomyKind::Brand => "Brand",
            TaxonomyKind::Category => "Category",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taxon {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TaxonInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    pub price: f64,
    pub brand_id: i32,
    pub category_id: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[serde(default)]
    pub image_url: String,

    #[validate(range(min = 0.0))]
    pub price: f64,

    pub brand_id: i32,
    pub category_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSize {
    pub id: i32,
    pub product_id: i32,
    pub size: i32,
    pub quantity: i32,
}
