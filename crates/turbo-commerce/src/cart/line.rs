//! Add-to-cart line construction.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::catalog::{Image, ProductVariant, VariantOption};
use crate::error::CommerceError;
use crate::ids::{LineItemId, VariantId};
use crate::money::Money;

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: u32 = 9999;

/// Why a cart line could not be built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The selection does not resolve to a variant.
    #[error("No variant selected")]
    NoVariant,

    /// The variant exists but is not for sale.
    #[error("Variant {variant_id} is not available for sale")]
    Unavailable { variant_id: VariantId },

    /// Quantity is zero or above the per-line limit.
    #[error("Invalid quantity {0} (allowed 1..={max})", max = MAX_QUANTITY_PER_ITEM)]
    InvalidQuantity(u32),
}

/// Variant fields the cart shows before the mutation response arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantSnapshot {
    pub id: VariantId,
    pub title: String,
    pub product_title: String,
    pub product_handle: String,
    pub price: Money,
    pub compare_at_price: Option<Money>,
    pub selected_options: Vec<VariantOption>,
    pub image: Option<Image>,
}

impl From<&ProductVariant> for VariantSnapshot {
    fn from(variant: &ProductVariant) -> Self {
        Self {
            id: variant.id.clone(),
            title: variant.display_title(),
            product_title: variant.product_title.clone(),
            product_handle: variant.product_handle.clone(),
            price: variant.price,
            compare_at_price: variant.compare_at_price,
            selected_options: variant.options.clone(),
            image: variant.image.clone(),
        }
    }
}

/// A line to add to the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Variant id the backend adds.
    pub merchandise_id: VariantId,
    pub quantity: u32,
    /// Client-side id used to render the line before the backend confirms it.
    pub optimistic_id: LineItemId,
    pub selected_variant: VariantSnapshot,
}

impl CartLine {
    /// Unit price times quantity.
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        self.selected_variant
            .price
            .try_multiply(i64::from(self.quantity))
            .ok_or(CommerceError::Overflow)
    }
}

/// Payload of an add-lines submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSubmission {
    pub lines: Vec<CartLine>,
    /// Opaque analytics payload forwarded with the mutation.
    pub analytics: Value,
}

/// Builds cart lines from resolved variants.
pub struct CartLineBuilder;

impl CartLineBuilder {
    /// Build a line for the resolved variant.
    ///
    /// Returns an error if:
    /// - No variant is resolved
    /// - The variant is not available for sale
    /// - Quantity is zero or exceeds MAX_QUANTITY_PER_ITEM
    pub fn build(variant: Option<&ProductVariant>, quantity: u32) -> Result<CartLine, BuildError> {
        let variant = variant.ok_or(BuildError::NoVariant)?;
        if !variant.available_for_sale {
            return Err(BuildError::Unavailable {
                variant_id: variant.id.clone(),
            });
        }
        if quantity == 0 || quantity > MAX_QUANTITY_PER_ITEM {
            return Err(BuildError::InvalidQuantity(quantity));
        }

        Ok(CartLine {
            merchandise_id: variant.id.clone(),
            quantity,
            optimistic_id: LineItemId::generate(),
            selected_variant: VariantSnapshot::from(variant),
        })
    }

    /// Bundle lines with an analytics payload.
    ///
    /// A payload that fails to serialize is replaced by an empty object.
    pub fn submission<A: Serialize>(lines: Vec<CartLine>, analytics: Option<&A>) -> CartSubmission {
        let analytics = match analytics.map(serde_json::to_value) {
            Some(Ok(value)) => value,
            Some(Err(e)) => {
                tracing::debug!(error = %e, "analytics payload dropped");
                Value::Object(Default::default())
            }
            None => Value::Object(Default::default()),
        };
        CartSubmission { lines, analytics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;
    use serde::ser::{Error as _, Serializer};

    fn variant() -> ProductVariant {
        let mut v = ProductVariant::new("v-blue", "tee", Money::new(2000, Currency::USD))
            .with_option("Color", "Blue")
            .with_option("Size", "S");
        v.product_title = "Tee".to_string();
        v
    }

    struct Broken;

    impl Serialize for Broken {
        fn serialize<S: Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("cannot serialize"))
        }
    }

    #[test]
    fn test_build_line() {
        let variant = variant();
        let line = CartLineBuilder::build(Some(&variant), 1).unwrap();
        assert_eq!(line.merchandise_id.as_str(), "v-blue");
        assert_eq!(line.quantity, 1);
        assert_eq!(line.selected_variant.title, "Blue / S");
        assert_eq!(line.selected_variant.product_title, "Tee");
        assert_eq!(line.selected_variant.price, Money::new(2000, Currency::USD));
        assert!(line.optimistic_id.as_str().starts_with("optimistic-"));
    }

    #[test]
    fn test_build_without_variant() {
        assert_eq!(CartLineBuilder::build(None, 1), Err(BuildError::NoVariant));
    }

    #[test]
    fn test_build_unavailable_variant() {
        let variant = variant().unavailable();
        for quantity in [1, 2, 50] {
            assert!(matches!(
                CartLineBuilder::build(Some(&variant), quantity),
                Err(BuildError::Unavailable { .. })
            ));
        }
    }

    #[test]
    fn test_build_any_valid_quantity() {
        let variant = variant();
        for quantity in [1, 2, 10, MAX_QUANTITY_PER_ITEM] {
            let line = CartLineBuilder::build(Some(&variant), quantity).unwrap();
            assert_eq!(line.quantity, quantity);
        }
        assert_eq!(
            CartLineBuilder::build(Some(&variant), 0),
            Err(BuildError::InvalidQuantity(0))
        );
        assert_eq!(
            CartLineBuilder::build(Some(&variant), MAX_QUANTITY_PER_ITEM + 1),
            Err(BuildError::InvalidQuantity(MAX_QUANTITY_PER_ITEM + 1))
        );
    }

    #[test]
    fn test_optimistic_ids_are_unique() {
        let variant = variant();
        let a = CartLineBuilder::build(Some(&variant), 1).unwrap();
        let b = CartLineBuilder::build(Some(&variant), 1).unwrap();
        assert_ne!(a.optimistic_id, b.optimistic_id);
    }

    #[test]
    fn test_subtotal() {
        let variant = variant();
        let line = CartLineBuilder::build(Some(&variant), 3).unwrap();
        assert_eq!(line.subtotal().unwrap().amount_cents, 6000);
    }

    #[test]
    fn test_submission_keeps_analytics() {
        let variant = variant();
        let line = CartLineBuilder::build(Some(&variant), 1).unwrap();
        let analytics = serde_json::json!({ "products": [{ "id": "v-blue" }] });
        let submission = CartLineBuilder::submission(vec![line], Some(&analytics));
        assert_eq!(submission.lines.len(), 1);
        assert_eq!(submission.analytics, analytics);
    }

    #[test]
    fn test_submission_degrades_broken_analytics() {
        let variant = variant();
        let line = CartLineBuilder::build(Some(&variant), 1).unwrap();
        let submission = CartLineBuilder::submission(vec![line], Some(&Broken));
        assert_eq!(submission.lines.len(), 1);
        assert_eq!(submission.analytics, serde_json::json!({}));

        let submission = CartLineBuilder::submission::<Value>(Vec::new(), None);
        assert_eq!(submission.analytics, serde_json::json!({}));
    }
}
