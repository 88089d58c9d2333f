//! Collections and the product summaries shown in grids.

use crate::ids::{CollectionId, ProductId};
use crate::money::Money;
use crate::catalog::Image;
use serde::{Deserialize, Serialize};

/// Sort keys accepted by the catalog for collections and product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CollectionSortKey {
    /// Merchant-defined order.
    #[default]
    Manual,
    /// Most recently updated.
    UpdatedAt,
    /// Creation date.
    Created,
    /// Alphabetical by title.
    Title,
    /// By price.
    Price,
    /// By sales.
    BestSelling,
}

impl CollectionSortKey {
    /// Enum value used in catalog query variables.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            CollectionSortKey::Manual => "MANUAL",
            CollectionSortKey::UpdatedAt => "UPDATED_AT",
            CollectionSortKey::Created => "CREATED",
            CollectionSortKey::Title => "TITLE",
            CollectionSortKey::Price => "PRICE",
            CollectionSortKey::BestSelling => "BEST_SELLING",
        }
    }

    /// Parse the `?sort=` URL parameter.
    pub fn from_param(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "manual" | "featured" => Some(CollectionSortKey::Manual),
            "updated" | "updated-at" => Some(CollectionSortKey::UpdatedAt),
            "created" | "newest" => Some(CollectionSortKey::Created),
            "title" => Some(CollectionSortKey::Title),
            "price" => Some(CollectionSortKey::Price),
            "best-selling" => Some(CollectionSortKey::BestSelling),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CollectionSortKey::Manual => "Featured",
            CollectionSortKey::UpdatedAt => "Recently updated",
            CollectionSortKey::Created => "Newest",
            CollectionSortKey::Title => "Name",
            CollectionSortKey::Price => "Price",
            CollectionSortKey::BestSelling => "Best selling",
        }
    }
}

/// Cursor pagination state returned with a page of products.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub has_previous_page: bool,
    #[serde(default)]
    pub start_cursor: Option<String>,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// What a product card needs: enough to link to the product and show a price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSummary {
    pub id: ProductId,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub featured_image: Option<Image>,
    /// Lowest variant price.
    pub min_price: Money,
}

impl ProductSummary {
    /// Canonical path of the product page.
    pub fn url(&self) -> String {
        format!("/products/{}", self.handle)
    }
}

/// A collection of products.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collection {
    pub id: CollectionId,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<Image>,
    /// One page of products (empty for featured-collection teasers).
    #[serde(default)]
    pub products: Vec<ProductSummary>,
    #[serde(default)]
    pub page_info: PageInfo,
}

impl Collection {
    pub fn new(id: impl Into<CollectionId>, handle: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            handle: handle.into(),
            title: title.into(),
            description: None,
            image: None,
            products: Vec::new(),
            page_info: PageInfo::default(),
        }
    }

    /// Canonical path of the collection page.
    pub fn url(&self) -> String {
        format!("/collections/{}", self.handle)
    }

    /// Link to the next page, keeping the sort order.
    pub fn next_page_url(&self, sort: CollectionSortKey, reverse: bool) -> Option<String> {
        if !self.page_info.has_next_page {
            return None;
        }
        let cursor = self.page_info.end_cursor.as_deref()?;
        let mut url = format!("{}?after={}", self.url(), cursor);
        if sort != CollectionSortKey::Manual {
            url.push_str(&format!("&sort={}", sort.as_query_value().to_lowercase().replace('_', "-")));
        }
        if reverse {
            url.push_str("&reverse=true");
        }
        Some(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_params() {
        assert_eq!(CollectionSortKey::from_param("price"), Some(CollectionSortKey::Price));
        assert_eq!(CollectionSortKey::from_param("BEST-SELLING"), Some(CollectionSortKey::BestSelling));
        assert_eq!(CollectionSortKey::from_param("random"), None);
        assert_eq!(CollectionSortKey::UpdatedAt.as_query_value(), "UPDATED_AT");
    }

    #[test]
    fn test_next_page_url() {
        let mut collection = Collection::new("c1", "all", "All");
        assert_eq!(collection.next_page_url(CollectionSortKey::Manual, false), None);

        collection.page_info = PageInfo {
            has_next_page: true,
            end_cursor: Some("abc".to_string()),
            ..Default::default()
        };
        assert_eq!(
            collection.next_page_url(CollectionSortKey::Manual, false).as_deref(),
            Some("/collections/all?after=abc")
        );
        assert_eq!(
            collection.next_page_url(CollectionSortKey::BestSelling, true).as_deref(),
            Some("/collections/all?after=abc&sort=best-selling&reverse=true")
        );
    }
}
