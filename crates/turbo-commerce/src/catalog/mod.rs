//! Product catalog module.
//!
//! Contains products, variants, option graphs, collections, the variant
//! query contract and option value classification.

mod collection;
mod options;
mod product;
mod query;

pub use collection::{Collection, CollectionSortKey, PageInfo, ProductSummary};
pub use options::{
    classify, classify_options, map_product_options, OptionValue, ProductOption, RawOptionValue,
    RawProductOption, ValueState,
};
pub use product::{
    Image, OptionValueDef, Product, ProductOptionDef, ProductVariant, Swatch, VariantOption,
};
pub use query::{option_key, resolve_variant, VariantQuery};
