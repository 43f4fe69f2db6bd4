//! Category and brand reference data.

use webshop_core::{BrandId, CategoryId};

use crate::api::{Brand, Category};

/// Reference data fetched once per session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub categories: Vec<Category>,
    pub brands: Vec<Brand>,
}

impl Catalog {
    #[must_use]
    pub fn category_name(&self, id: CategoryId) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }

    #[must_use]
    pub fn brand_name(&self, id: BrandId) -> Option<&str> {
        self.brands
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.name.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.brands.is_empty()
    }
}
