//! Add-to-cart submission.

use edge_sdk::edge_data::{CatalogError, Storefront};
use serde::Serialize;
use turbo_commerce::prelude::*;

use crate::data::{cart_lines_add, CartSummary};

/// Why an add-to-cart did not go through.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("A submission is already in flight")]
    Busy,

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Build the line for `variant` and send it with the add-lines mutation.
///
/// The form goes to `Submitting` for the duration of the mutation and ends
/// `Idle` or `Error`. A line that cannot be built leaves the form untouched.
pub async fn add_to_cart<A: Serialize>(
    storefront: &Storefront,
    form: &mut CartForm,
    cart_id: &str,
    variant: Option<&ProductVariant>,
    quantity: u32,
    analytics: Option<&A>,
) -> Result<CartSummary, CartError> {
    let line = CartLineBuilder::build(variant, quantity)?;
    if !form.begin() {
        return Err(CartError::Busy);
    }

    let submission = CartLineBuilder::submission(vec![line], analytics);
    tracing::debug!(
        cart_id,
        lines = submission.lines.len(),
        analytics = %submission.analytics,
        "adding lines to cart"
    );

    let result = cart_lines_add(storefront, cart_id, &submission).await;
    form.finish(result.as_ref().map(|_| ()).map_err(|e| e.to_string()));
    Ok(result?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use edge_sdk::edge_core::Locale;
    use edge_sdk::edge_data::{documents, MemoryCatalog};
    use serde_json::json;

    use super::*;

    fn variant() -> ProductVariant {
        ProductVariant::new("gid://shop/ProductVariant/1", "tee", Money::new(2500, Currency::USD))
            .with_option("Color", "Red")
    }

    #[tokio::test]
    async fn test_add_to_cart_sends_lines() {
        let catalog = Arc::new(MemoryCatalog::new().with_response(
            documents::CART_LINES_ADD,
            json!({ "cartLinesAdd": { "cart": { "id": "cart-1", "totalQuantity": 2 }, "userErrors": [] } }),
        ));
        let storefront = Storefront::new(catalog.clone(), Locale::default());
        let mut form = CartForm::new();

        let summary = add_to_cart(&storefront, &mut form, "cart-1", Some(&variant()), 2, Some(&json!({ "source": "pdp" })))
            .await
            .unwrap();

        assert_eq!(summary.total_quantity, 2);
        assert_eq!(form.status(), &CartFormStatus::Idle);
        let vars = catalog.last_variables(documents::CART_LINES_ADD).unwrap();
        assert_eq!(vars["lines"][0]["merchandiseId"], "gid://shop/ProductVariant/1");
        assert_eq!(vars["lines"][0]["quantity"], 2);
    }

    #[tokio::test]
    async fn test_user_errors_put_form_in_error() {
        let catalog = Arc::new(MemoryCatalog::new().with_response(
            documents::CART_LINES_ADD,
            json!({ "cartLinesAdd": { "cart": null, "userErrors": [{ "field": ["lines"], "message": "Sold out" }] } }),
        ));
        let storefront = Storefront::new(catalog, Locale::default());
        let mut form = CartForm::new();

        let err = add_to_cart::<()>(&storefront, &mut form, "cart-1", Some(&variant()), 1, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::Catalog(CatalogError::GraphQl { .. })));
        assert!(matches!(form.status(), CartFormStatus::Error(message) if message.contains("lines: Sold out")));
    }

    #[tokio::test]
    async fn test_unavailable_variant_is_not_sent() {
        let catalog = Arc::new(MemoryCatalog::new());
        let storefront = Storefront::new(catalog.clone(), Locale::default());
        let mut form = CartForm::new();
        let sold_out = variant().unavailable();

        let err = add_to_cart::<()>(&storefront, &mut form, "cart-1", Some(&sold_out), 1, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::Build(BuildError::Unavailable { .. })));
        assert_eq!(form.status(), &CartFormStatus::Idle);
        assert_eq!(catalog.calls(documents::CART_LINES_ADD), 0);
    }

    #[tokio::test]
    async fn test_resubmission_while_in_flight() {
        let storefront = Storefront::new(Arc::new(MemoryCatalog::new()), Locale::default());
        let mut form = CartForm::new();
        assert!(form.begin());

        let err = add_to_cart::<()>(&storefront, &mut form, "cart-1", Some(&variant()), 1, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::Busy));
    }
}
