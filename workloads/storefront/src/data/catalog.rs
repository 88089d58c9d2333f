//! Typed catalog operations used by the pages.

use edge_sdk::edge_data::{documents, CatalogError, DependencyTag, Storefront, StorefrontQuery};
use serde_json::{json, Value};
use turbo_commerce::prelude::*;

use super::wire::{
    CartLinesAddData, CollectionData, FeaturedCollectionData, ProductData, RecommendedProductsData,
};

fn decode_error(operation: &str, error: CommerceError) -> CatalogError {
    CatalogError::Decode {
        operation: operation.to_string(),
        message: error.to_string(),
    }
}

/// Most recently updated collection, if the shop has any.
pub async fn featured_collection(storefront: &Storefront, count: u32) -> Result<Option<Collection>, CatalogError> {
    let query = StorefrontQuery::new(documents::FEATURED_COLLECTION, documents::FEATURED_COLLECTION_QUERY)
        .with_variable("first", count);
    let data: FeaturedCollectionData = storefront.query(DependencyTag::FeaturedCollection, query).await?;

    data.collections
        .nodes
        .into_iter()
        .next()
        .map(|c| c.into_collection())
        .transpose()
        .map_err(|e| decode_error(documents::FEATURED_COLLECTION, e))
}

/// Most recently updated products.
pub async fn recommended_products(storefront: &Storefront, count: u32) -> Result<Vec<ProductSummary>, CatalogError> {
    let query = StorefrontQuery::new(documents::RECOMMENDED_PRODUCTS, documents::RECOMMENDED_PRODUCTS_QUERY)
        .with_variable("first", count);
    let data: RecommendedProductsData = storefront.query(DependencyTag::Recommendations, query).await?;

    data.products
        .nodes
        .into_iter()
        .map(|p| p.into_summary())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| decode_error(documents::RECOMMENDED_PRODUCTS, e))
}

/// Product with its full option graph and variant list.
pub async fn product(storefront: &Storefront, handle: &str) -> Result<Product, CatalogError> {
    let query = StorefrontQuery::new(documents::PRODUCT, documents::PRODUCT_QUERY).with_variable("handle", handle);
    let data: ProductData = storefront.query(DependencyTag::Product, query).await?;

    let product = data.product.ok_or_else(|| CatalogError::NotFound {
        resource: "product",
        handle: handle.to_string(),
    })?;
    product
        .into_product()
        .map_err(|e| decode_error(documents::PRODUCT, e))
}

/// Paging and ordering of a collection page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionPageArgs {
    pub first: u32,
    pub after: Option<String>,
    pub sort: CollectionSortKey,
    pub reverse: bool,
}

impl CollectionPageArgs {
    /// Read `?sort=`, `?reverse=` and `?after=`. Unknown sort keys fall back
    /// to the merchant order.
    pub fn from_query(raw_query: &str, first: u32) -> Self {
        let params = VariantQuery::parse(raw_query);
        Self {
            first,
            after: params.get("after").filter(|a| !a.is_empty()).map(str::to_string),
            sort: params
                .get("sort")
                .and_then(CollectionSortKey::from_param)
                .unwrap_or_default(),
            reverse: params.get("reverse").is_some_and(|r| r == "true" || r == "1"),
        }
    }
}

/// One page of a collection.
pub async fn collection(
    storefront: &Storefront,
    handle: &str,
    args: &CollectionPageArgs,
) -> Result<Collection, CatalogError> {
    let mut query = StorefrontQuery::new(documents::COLLECTION, documents::COLLECTION_QUERY)
        .with_variable("handle", handle)
        .with_variable("first", args.first)
        .with_variable("sortKey", args.sort.as_query_value())
        .with_variable("reverse", args.reverse);
    if let Some(after) = &args.after {
        query = query.with_variable("after", after.as_str());
    }
    let data: CollectionData = storefront.query(DependencyTag::Collection, query).await?;

    let collection = data.collection.ok_or_else(|| CatalogError::NotFound {
        resource: "collection",
        handle: handle.to_string(),
    })?;
    collection
        .into_collection()
        .map_err(|e| decode_error(documents::COLLECTION, e))
}

/// Cart state after a successful add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub id: String,
    pub total_quantity: u32,
}

/// Run the add-lines mutation for a submission.
pub async fn cart_lines_add(
    storefront: &Storefront,
    cart_id: &str,
    submission: &CartSubmission,
) -> Result<CartSummary, CatalogError> {
    let lines: Vec<Value> = submission
        .lines
        .iter()
        .map(|line| json!({ "merchandiseId": line.merchandise_id.as_str(), "quantity": line.quantity }))
        .collect();
    let query = StorefrontQuery::new(documents::CART_LINES_ADD, documents::CART_LINES_ADD_MUTATION)
        .with_variable("cartId", cart_id)
        .with_variable("lines", lines);
    let data: CartLinesAddData = storefront.query(DependencyTag::Cart, query).await?;

    let payload = data.cart_lines_add;
    if !payload.user_errors.is_empty() {
        return Err(CatalogError::GraphQl {
            operation: documents::CART_LINES_ADD.to_string(),
            messages: payload
                .user_errors
                .into_iter()
                .map(|e| match e.field {
                    Some(field) if !field.is_empty() => format!("{}: {}", field.join("."), e.message),
                    _ => e.message,
                })
                .collect(),
        });
    }
    let cart = payload.cart.ok_or_else(|| CatalogError::Decode {
        operation: documents::CART_LINES_ADD.to_string(),
        message: "missing cart".to_string(),
    })?;
    Ok(CartSummary {
        id: cart.id,
        total_quantity: cart.total_quantity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_args() {
        let args = CollectionPageArgs::from_query("sort=price&reverse=true&after=abc", 8);
        assert_eq!(args.sort, CollectionSortKey::Price);
        assert!(args.reverse);
        assert_eq!(args.after.as_deref(), Some("abc"));

        let args = CollectionPageArgs::from_query("sort=bogus", 8);
        assert_eq!(args.sort, CollectionSortKey::Manual);
        assert!(!args.reverse);
        assert_eq!(args.after, None);
    }
}
