//! Product search filters.

use webshop_core::{Availability, BrandId, CategoryId, Price};

use crate::api::SearchQuery;
use crate::catalog::Catalog;
use crate::error::ClientError;

/// Filters for `GET /products/search`. Unset fields are not sent.
///
/// Category and brand are chosen by id and sent by name, which is what the
/// backend matches on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub gender: Option<String>,
    pub category_id: Option<CategoryId>,
    pub brand_id: Option<BrandId>,
    pub price_min: Option<Price>,
    pub price_max: Option<Price>,
    pub availability: Option<Availability>,
}

impl SearchFilters {
    /// Build the query string pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnknownCategory`] or [`ClientError::UnknownBrand`]
    /// if an id is not in `catalog`.
    pub fn to_query(&self, catalog: &Catalog) -> Result<SearchQuery, ClientError> {
        let mut query = SearchQuery::new();

        if let Some(gender) = self.gender.as_deref().map(str::trim)
            && !gender.is_empty()
        {
            query.push(("gender", gender.to_string()));
        }

        if let Some(id) = self.category_id {
            let name = catalog
                .category_name(id)
                .ok_or(ClientError::UnknownCategory(id))?;
            query.push(("category", name.to_string()));
        }

        if let Some(id) = self.brand_id {
            let name = catalog
                .brand_name(id)
                .ok_or(ClientError::UnknownBrand(id))?;
            query.push(("brand", name.to_string()));
        }

        if let Some(min) = self.price_min {
            query.push(("price_min", min.amount().to_string()));
        }

        if let Some(max) = self.price_max {
            query.push(("price_max", max.amount().to_string()));
        }

        if let Some(availability) = self.availability {
            query.push(("availability", availability.as_str().to_string()));
        }

        Ok(query)
    }
}
