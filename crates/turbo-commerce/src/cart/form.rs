//! Add-to-cart form state.

use serde::{Deserialize, Serialize};

use crate::cart::{CartLine, CartLineBuilder};
use crate::catalog::ProductVariant;

/// Status of the cart form, used to block resubmission while in flight.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CartFormStatus {
    #[default]
    Idle,
    Submitting,
    Error(String),
}

/// Tracks one add-to-cart form.
#[derive(Debug, Clone, Default)]
pub struct CartForm {
    status: CartFormStatus,
}

impl CartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &CartFormStatus {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == CartFormStatus::Submitting
    }

    /// Enter `Submitting`. Returns false when a submission is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.status = CartFormStatus::Submitting;
        true
    }

    /// Record the mutation outcome.
    pub fn finish(&mut self, result: Result<(), String>) {
        self.status = match result {
            Ok(()) => CartFormStatus::Idle,
            Err(message) => CartFormStatus::Error(message),
        };
    }
}

/// What the add-to-cart button shows and submits.
#[derive(Debug, Clone, PartialEq)]
pub struct AddToCartControl {
    pub disabled: bool,
    pub label: &'static str,
    /// Empty when the variant cannot be added.
    pub lines: Vec<CartLine>,
}

impl AddToCartControl {
    pub const ADD_LABEL: &'static str = "Add to cart";
    pub const UNAVAILABLE_LABEL: &'static str = "Unavailable";
    pub const SUBMITTING_LABEL: &'static str = "Adding to cart\u{2026}";

    /// Control state for the resolved variant.
    ///
    /// A variant that cannot be built into a line disables the control and
    /// shows the unavailable label instead of an error.
    pub fn for_variant(variant: Option<&ProductVariant>, form: &CartForm) -> Self {
        match CartLineBuilder::build(variant, 1) {
            Ok(line) if form.is_submitting() => Self {
                disabled: true,
                label: Self::SUBMITTING_LABEL,
                lines: vec![line],
            },
            Ok(line) => Self {
                disabled: false,
                label: Self::ADD_LABEL,
                lines: vec![line],
            },
            Err(e) => {
                tracing::trace!(reason = %e, "add to cart disabled");
                Self {
                    disabled: true,
                    label: Self::UNAVAILABLE_LABEL,
                    lines: Vec::new(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Currency, Money};

    fn variant() -> ProductVariant {
        ProductVariant::new("v-1", "tee", Money::new(2000, Currency::USD)).with_option("Color", "Red")
    }

    #[test]
    fn test_form_blocks_resubmission() {
        let mut form = CartForm::new();
        assert!(form.begin());
        assert!(!form.begin());
        form.finish(Ok(()));
        assert_eq!(form.status(), &CartFormStatus::Idle);
        assert!(form.begin());
        form.finish(Err("out of stock".to_string()));
        assert_eq!(form.status(), &CartFormStatus::Error("out of stock".to_string()));
        assert!(form.begin());
    }

    #[test]
    fn test_control_for_available_variant() {
        let variant = variant();
        let control = AddToCartControl::for_variant(Some(&variant), &CartForm::new());
        assert!(!control.disabled);
        assert_eq!(control.label, "Add to cart");
        assert_eq!(control.lines.len(), 1);
    }

    #[test]
    fn test_control_unavailable() {
        let variant = variant().unavailable();
        let control = AddToCartControl::for_variant(Some(&variant), &CartForm::new());
        assert!(control.disabled);
        assert_eq!(control.label, "Unavailable");
        assert!(control.lines.is_empty());

        let control = AddToCartControl::for_variant(None, &CartForm::new());
        assert!(control.disabled);
        assert_eq!(control.label, "Unavailable");
    }

    #[test]
    fn test_control_while_submitting() {
        let variant = variant();
        let mut form = CartForm::new();
        form.begin();
        let control = AddToCartControl::for_variant(Some(&variant), &form);
        assert!(control.disabled);
        assert_eq!(control.label, AddToCartControl::SUBMITTING_LABEL);
    }
}
