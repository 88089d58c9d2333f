//! Product, variant and option-graph types.
//!
//! These are read-only projections of what the catalog returns for a product
//! page. A product's `variants` may include variants that belong to another
//! product resource (children of a combined listing); such variants carry a
//! different `product_handle`.

use crate::ids::{MediaId, ProductId, VariantId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// An image attached to a product, variant, swatch or collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    #[serde(default)]
    pub id: Option<MediaId>,
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl Image {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: None,
            url: url.into(),
            alt_text: None,
            width: None,
            height: None,
        }
    }
}

/// A variant option assignment (e.g., Size: Large).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct VariantOption {
    /// Option name (e.g., "Size", "Color").
    pub name: String,
    /// Option value (e.g., "Large", "Blue").
    pub value: String,
}

impl VariantOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Visual swatch for an option value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Swatch {
    /// CSS color (e.g. `#1d4ed8`).
    #[serde(default)]
    pub color: Option<String>,
    /// Preview image URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Swatch {
    /// Whether the swatch has anything to draw.
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.image_url.is_none()
    }
}

/// One declared value of a product option.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptionValueDef {
    pub name: String,
    #[serde(default)]
    pub swatch: Option<Swatch>,
}

/// A product option axis with its declared values, in display order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductOptionDef {
    pub name: String,
    pub values: Vec<OptionValueDef>,
}

impl ProductOptionDef {
    pub fn new(name: impl Into<String>, values: &[&str]) -> Self {
        Self {
            name: name.into(),
            values: values
                .iter()
                .map(|v| OptionValueDef {
                    name: v.to_string(),
                    swatch: None,
                })
                .collect(),
        }
    }

    /// Options with one value are auto-resolved and never offered as a choice.
    pub fn is_selectable(&self) -> bool {
        self.values.len() > 1
    }

    /// Find a declared value, case-insensitively, returning its canonical name.
    pub fn canonical_value(&self, value: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.name == value)
            .or_else(|| self.values.iter().find(|v| v.name.eq_ignore_ascii_case(value)))
            .map(|v| v.name.as_str())
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// URL handle; the canonical path is `/products/{handle}`.
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    /// Option axes in display order.
    #[serde(default)]
    pub options: Vec<ProductOptionDef>,
    /// Variants of this product plus any combined-listing siblings.
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    #[serde(default)]
    pub featured_image: Option<Image>,
}

impl Product {
    /// Create a product with no options or variants.
    pub fn new(id: impl Into<ProductId>, handle: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            handle: handle.into(),
            title: title.into(),
            description: None,
            vendor: None,
            options: Vec::new(),
            variants: Vec::new(),
            featured_image: None,
        }
    }

    /// Declare an option axis.
    pub fn with_option(mut self, name: &str, values: &[&str]) -> Self {
        self.options.push(ProductOptionDef::new(name, values));
        self
    }

    /// Attach a variant.
    pub fn with_variant(mut self, variant: ProductVariant) -> Self {
        self.variants.push(variant);
        self
    }

    /// Look up an option axis by name (case-insensitive).
    pub fn option(&self, name: &str) -> Option<&ProductOptionDef> {
        self.options
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(name))
    }

    /// Variants that belong to this product resource.
    pub fn own_variants(&self) -> impl Iterator<Item = &ProductVariant> {
        self.variants
            .iter()
            .filter(move |v| v.product_handle == self.handle)
    }

    /// First variant that can be purchased, else the first variant.
    pub fn selected_or_first_available_variant(&self) -> Option<&ProductVariant> {
        self.own_variants()
            .find(|v| v.available_for_sale)
            .or_else(|| self.own_variants().next())
    }

    /// Find a variant by id.
    pub fn variant(&self, id: &VariantId) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| &v.id == id)
    }

    /// Lowest price among this product's own variants.
    pub fn min_price(&self) -> Option<Money> {
        self.own_variants()
            .map(|v| v.price)
            .min_by_key(|m| m.amount_cents)
    }
}

/// A product variant (a concrete option combination).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductVariant {
    /// Unique variant identifier (merchandise id for the cart).
    pub id: VariantId,
    /// Handle of the product resource that owns this variant.
    pub product_handle: String,
    /// Title of the owning product (denormalized for display).
    #[serde(default)]
    pub product_title: String,
    /// Variant title (e.g., "Large / Blue").
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    /// Whether the backend will sell this variant right now.
    pub available_for_sale: bool,
    /// Price of this variant.
    pub price: Money,
    /// Compare-at price (original price for showing discounts).
    #[serde(default)]
    pub compare_at_price: Option<Money>,
    /// Options that define this variant.
    #[serde(default)]
    pub options: Vec<VariantOption>,
    #[serde(default)]
    pub image: Option<Image>,
}

impl ProductVariant {
    /// Create an available variant with no options.
    pub fn new(id: impl Into<VariantId>, product_handle: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            product_handle: product_handle.into(),
            product_title: String::new(),
            title: None,
            sku: None,
            available_for_sale: true,
            price,
            compare_at_price: None,
            options: Vec::new(),
            image: None,
        }
    }

    /// Builder-style option assignment.
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_option(name, value);
        self
    }

    /// Mark the variant as not purchasable.
    pub fn unavailable(mut self) -> Self {
        self.available_for_sale = false;
        self
    }

    /// Add an option to this variant.
    pub fn add_option(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.options.push(VariantOption::new(name, value));
    }

    /// Value assigned to an option (option name is case-insensitive).
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(name))
            .map(|o| o.value.as_str())
    }

    /// True when every given assignment is carried by this variant.
    pub fn matches(&self, selection: &[VariantOption]) -> bool {
        selection
            .iter()
            .all(|s| self.option(&s.name) == Some(s.value.as_str()))
    }

    /// Check if this variant is on sale (has a higher compare_at_price).
    pub fn is_on_sale(&self) -> bool {
        self.compare_at_price
            .map(|cap| cap.currency == self.price.currency && cap.amount_cents > self.price.amount_cents)
            .unwrap_or(false)
    }

    /// Display title, derived from options when the catalog sent none.
    pub fn display_title(&self) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }
        if self.options.is_empty() {
            "Default".to_string()
        } else {
            self.options
                .iter()
                .map(|o| o.value.as_str())
                .collect::<Vec<_>>()
                .join(" / ")
        }
    }
}
