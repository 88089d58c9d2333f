//! Storefront domain types and logic for TurboCommerce.
//!
//! This crate holds everything a product page needs to decide what to show
//! and what a click does, without touching a network or a DOM:
//!
//! - **Catalog**: Products, variants, option graphs, collections
//! - **Query**: The URL query contract that encodes a selected variant
//! - **Options**: Classification of option values into render decisions
//! - **Navigation**: Turning a clicked option value into a navigation action
//! - **Cart**: Building add-to-cart lines and tracking the cart form
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_commerce::prelude::*;
//!
//! let query = VariantQuery::parse("color=Blue");
//! let variant = resolve_variant(&product, &query);
//!
//! // Decide what each option control does
//! let options = classify_options(&map_product_options(&product, variant), variant);
//! for option in &options {
//!     for value in &option.values {
//!         let action = navigate(value);
//!         // render a link, a button, or a disabled control
//!     }
//! }
//!
//! // Build the add-to-cart line for the selected variant
//! let line = CartLineBuilder::build(variant, 1)?;
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod navigation;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        classify, classify_options, map_product_options, option_key, resolve_variant,
        Collection, CollectionSortKey, Image, OptionValue, OptionValueDef, PageInfo, Product,
        ProductOption, ProductOptionDef, ProductSummary, ProductVariant, RawOptionValue,
        RawProductOption, Swatch, ValueState, VariantOption, VariantQuery,
    };

    // Navigation
    pub use crate::navigation::{
        navigate, Location, MemoryHistory, NavigateOptions, NavigationAction, NavigationContext,
        NavigationOutcome, PrefetchRequest, ResolutionTicket, VariantLocator, VariantNavigator,
        VariantResolution,
    };

    // Cart
    pub use crate::cart::{
        AddToCartControl, BuildError, CartForm, CartFormStatus, CartLine, CartLineBuilder,
        CartSubmission, VariantSnapshot, MAX_QUANTITY_PER_ITEM,
    };
}
