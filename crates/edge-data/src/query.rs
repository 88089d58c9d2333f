//! Catalog query documents and variables.

use edge_core::Locale;
use serde::Serialize;
use serde_json::{Map, Value};

/// A named catalog operation with its variables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorefrontQuery {
    /// Operation name, used for logs and to key canned responses.
    #[serde(rename = "operationName")]
    pub name: &'static str,
    #[serde(rename = "query")]
    pub document: &'static str,
    pub variables: Map<String, Value>,
}

impl StorefrontQuery {
    pub fn new(name: &'static str, document: &'static str) -> Self {
        Self {
            name,
            document,
            variables: Map::new(),
        }
    }

    /// Set a variable.
    pub fn with_variable(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.variables.insert(key.to_string(), value.into());
        self
    }

    /// Add the buyer's `country` and `language` context variables.
    pub fn in_context(mut self, locale: &Locale) -> Self {
        self.variables
            .insert("country".to_string(), Value::String(locale.country.clone()));
        self.variables
            .insert("language".to_string(), Value::String(locale.language.clone()));
        self
    }

    pub fn variable(&self, key: &str) -> Option<&Value> {
        self.variables.get(key)
    }

    /// Request body for a GraphQL endpoint.
    pub fn to_body(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Operation documents understood by the catalog.
pub mod documents {
    pub const FEATURED_COLLECTION: &str = "FeaturedCollection";
    pub const RECOMMENDED_PRODUCTS: &str = "RecommendedProducts";
    pub const PRODUCT: &str = "Product";
    pub const COLLECTION: &str = "Collection";
    pub const CART_LINES_ADD: &str = "CartLinesAdd";

    /// Most recently updated collection(s) for the home page.
    pub const FEATURED_COLLECTION_QUERY: &str = r#"
query FeaturedCollection($country: CountryCode, $language: LanguageCode, $first: Int = 1)
  @inContext(country: $country, language: $language) {
  collections(first: $first, sortKey: UPDATED_AT, reverse: true) {
    nodes { id title handle image { id url altText width height } }
  }
}"#;

    /// Most recently updated products for the recommendations grid.
    pub const RECOMMENDED_PRODUCTS_QUERY: &str = r#"
query RecommendedProducts($country: CountryCode, $language: LanguageCode, $first: Int = 4)
  @inContext(country: $country, language: $language) {
  products(first: $first, sortKey: UPDATED_AT, reverse: true) {
    nodes {
      id title handle
      priceRange { minVariantPrice { amount currencyCode } }
      featuredImage { id url altText width height }
    }
  }
}"#;

    /// Product with its options and variants. Variant selection happens locally.
    pub const PRODUCT_QUERY: &str = r#"
query Product($country: CountryCode, $language: LanguageCode, $handle: String!)
  @inContext(country: $country, language: $language) {
  product(handle: $handle) {
    id title handle vendor description
    featuredImage { id url altText width height }
    options {
      name
      optionValues { name swatch { color image { previewImage { url } } } }
    }
    variants(first: 250) {
      nodes {
        id title sku availableForSale
        product { title handle }
        price { amount currencyCode }
        compareAtPrice { amount currencyCode }
        selectedOptions { name value }
        image { id url altText width height }
      }
    }
  }
}"#;

    /// One page of a collection's products.
    pub const COLLECTION_QUERY: &str = r#"
query Collection($country: CountryCode, $language: LanguageCode, $handle: String!, $first: Int, $after: String, $sortKey: ProductCollectionSortKeys, $reverse: Boolean)
  @inContext(country: $country, language: $language) {
  collection(handle: $handle) {
    id handle title description
    image { id url altText width height }
    products(first: $first, after: $after, sortKey: $sortKey, reverse: $reverse) {
      nodes {
        id handle title
        featuredImage { id url altText width height }
        priceRange { minVariantPrice { amount currencyCode } }
      }
      pageInfo { hasPreviousPage hasNextPage startCursor endCursor }
    }
  }
}"#;

    /// Add lines to a cart.
    pub const CART_LINES_ADD_MUTATION: &str = r#"
mutation CartLinesAdd($country: CountryCode, $language: LanguageCode, $cartId: ID!, $lines: [CartLineInput!]!)
  @inContext(country: $country, language: $language) {
  cartLinesAdd(cartId: $cartId, lines: $lines) {
    cart { id totalQuantity }
    userErrors { field message }
  }
}"#;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_context_variables() {
        let query = StorefrontQuery::new(documents::PRODUCT, documents::PRODUCT_QUERY)
            .with_variable("handle", "tee")
            .in_context(&Locale::new("fr", "ca"));
        assert_eq!(query.variable("handle"), Some(&Value::from("tee")));
        assert_eq!(query.variable("country"), Some(&Value::from("CA")));
        assert_eq!(query.variable("language"), Some(&Value::from("FR")));
    }

    #[test]
    fn test_request_body() {
        let query = StorefrontQuery::new(documents::FEATURED_COLLECTION, documents::FEATURED_COLLECTION_QUERY)
            .with_variable("first", 1);
        let body: Value = serde_json::from_slice(&query.to_body().unwrap()).unwrap();
        assert_eq!(body["operationName"], "FeaturedCollection");
        assert_eq!(body["variables"]["first"], 1);
        assert!(body["query"].as_str().unwrap().contains("sortKey: UPDATED_AT, reverse: true"));
    }

    #[test]
    fn test_product_document_takes_only_handle() {
        assert!(documents::PRODUCT_QUERY.contains("$handle: String!)"));
        assert!(!documents::PRODUCT_QUERY.contains("$selectedOptions"));
        assert!(!documents::PRODUCT_QUERY.contains("selectedOrFirstAvailableVariant"));
        assert!(documents::PRODUCT_QUERY.contains("selectedOptions { name value }"));
    }
}
