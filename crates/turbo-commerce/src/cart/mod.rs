//! Cart module.
//!
//! Builds add-to-cart lines for resolved variants and tracks the form that
//! submits them. The cart itself lives in the commerce backend.

mod form;
mod line;

pub use form::{AddToCartControl, CartForm, CartFormStatus};
pub use line::{
    BuildError, CartLine, CartLineBuilder, CartSubmission, VariantSnapshot, MAX_QUANTITY_PER_ITEM,
};
