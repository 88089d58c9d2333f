//! Option value classification.
//!
//! The catalog describes every option value with a handful of flags. This
//! module turns those flags into the render decision for one control:
//! whether it is the current selection, whether it can be clicked at all,
//! and where a click leads.

use serde::{Deserialize, Serialize};

use crate::catalog::{Product, ProductVariant, Swatch, VariantOption, VariantQuery};

/// Option value flags as the catalog reports them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOptionValue {
    /// Value name (e.g. "Blue").
    pub name: String,
    /// Handle of the product resource the value's target variant belongs to.
    pub handle: String,
    /// Query selecting the target variant on that resource.
    pub target: VariantQuery,
    pub available: bool,
    pub exists: bool,
    pub is_different_product: bool,
    #[serde(default)]
    pub swatch: Option<Swatch>,
}

/// An option axis as the catalog reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProductOption {
    pub name: String,
    pub values: Vec<RawOptionValue>,
}

/// Render state of an option value control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueState {
    /// Matches the resolved variant.
    Selected,
    /// Leads to a purchasable variant.
    Available,
    /// Leads to a variant that exists but cannot be bought right now.
    Unavailable,
    /// No variant carries this value; not interactive.
    Disabled,
}

impl ValueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueState::Selected => "selected",
            ValueState::Available => "available",
            ValueState::Unavailable => "unavailable",
            ValueState::Disabled => "disabled",
        }
    }

    /// Whether the control reacts to clicks.
    pub fn is_interactive(&self) -> bool {
        !matches!(self, ValueState::Disabled)
    }
}

/// A classified option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValue {
    pub name: String,
    pub handle: String,
    pub target_locator: VariantQuery,
    pub selected: bool,
    pub available: bool,
    pub exists: bool,
    pub is_different_resource: bool,
    pub swatch: Option<Swatch>,
}

impl OptionValue {
    pub fn state(&self) -> ValueState {
        if !self.exists {
            ValueState::Disabled
        } else if self.selected {
            ValueState::Selected
        } else if self.available {
            ValueState::Available
        } else {
            ValueState::Unavailable
        }
    }

    /// Path and query of the target variant.
    pub fn href(&self) -> String {
        if self.target_locator.is_empty() {
            format!("/products/{}", self.handle)
        } else {
            format!("/products/{}?{}", self.handle, self.target_locator)
        }
    }
}

/// An option axis offered to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: String,
    pub values: Vec<OptionValue>,
}

/// Classify one value of `option_name` against the resolved variant.
///
/// A value is selected only when the resolved variant belongs to the same
/// product resource as the value and carries that exact assignment.
pub fn classify(
    option_name: &str,
    raw: &RawOptionValue,
    current: Option<&ProductVariant>,
) -> OptionValue {
    let selected = current
        .map(|variant| {
            variant.product_handle == raw.handle && variant.option(option_name) == Some(raw.name.as_str())
        })
        .unwrap_or(false);

    OptionValue {
        name: raw.name.clone(),
        handle: raw.handle.clone(),
        target_locator: raw.target.clone(),
        selected,
        available: raw.exists && raw.available,
        exists: raw.exists,
        is_different_resource: raw.is_different_product,
        swatch: raw.swatch.clone().filter(|s| !s.is_empty()),
    }
}

/// Classify every selectable option. Options with a single value are dropped.
pub fn classify_options(
    options: &[RawProductOption],
    current: Option<&ProductVariant>,
) -> Vec<ProductOption> {
    options
        .iter()
        .filter(|option| option.values.len() > 1)
        .map(|option| ProductOption {
            name: option.name.clone(),
            values: option
                .values
                .iter()
                .map(|raw| classify(&option.name, raw, current))
                .collect(),
        })
        .collect()
}

/// Derive the raw option flags from a product's variant graph.
///
/// For each value the target is the variant matching the current selection
/// with that option swapped. When the exact combination is missing the first
/// available variant carrying the value is used, then any variant carrying
/// it. Values no variant carries get `exists = false`.
pub fn map_product_options(product: &Product, current: Option<&ProductVariant>) -> Vec<RawProductOption> {
    let selection: &[VariantOption] = current.map(|v| v.options.as_slice()).unwrap_or(&[]);

    product
        .options
        .iter()
        .map(|option| RawProductOption {
            name: option.name.clone(),
            values: option
                .values
                .iter()
                .map(|value| {
                    let desired = substitute(selection, &option.name, &value.name);
                    let target = find_target(product, &desired, &option.name, &value.name);
                    match target {
                        Some(variant) => {
                            let is_different_product = variant.product_handle != product.handle;
                            let target = if is_different_product {
                                VariantQuery::from_options(&variant.options)
                            } else {
                                VariantQuery::for_variant(product, variant)
                            };
                            RawOptionValue {
                                name: value.name.clone(),
                                handle: variant.product_handle.clone(),
                                target,
                                available: variant.available_for_sale,
                                exists: true,
                                is_different_product,
                                swatch: value.swatch.clone(),
                            }
                        }
                        None => RawOptionValue {
                            name: value.name.clone(),
                            handle: product.handle.clone(),
                            target: VariantQuery::for_selection(product, &desired),
                            available: false,
                            exists: false,
                            is_different_product: false,
                            swatch: value.swatch.clone(),
                        },
                    }
                })
                .collect(),
        })
        .collect()
}

fn substitute(selection: &[VariantOption], name: &str, value: &str) -> Vec<VariantOption> {
    let mut desired: Vec<VariantOption> = selection
        .iter()
        .filter(|o| !o.name.eq_ignore_ascii_case(name))
        .cloned()
        .collect();
    desired.push(VariantOption::new(name, value));
    desired
}

fn find_target<'a>(
    product: &'a Product,
    desired: &[VariantOption],
    name: &str,
    value: &str,
) -> Option<&'a ProductVariant> {
    let carries = |v: &&ProductVariant| v.option(name) == Some(value);
    product
        .variants
        .iter()
        .find(|v| v.matches(desired))
        .or_else(|| product.variants.iter().filter(carries).find(|v| v.available_for_sale))
        .or_else(|| product.variants.iter().find(carries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::resolve_variant;
    use crate::money::{Currency, Money};

    fn price() -> Money {
        Money::new(2500, Currency::USD)
    }

    fn tee() -> Product {
        Product::new("p-tee", "tee", "Tee")
            .with_option("Color", &["Red", "Blue", "Green"])
            .with_option("Size", &["S"])
            .with_variant(
                ProductVariant::new("tee-red", "tee", price())
                    .with_option("Color", "Red")
                    .with_option("Size", "S"),
            )
            .with_variant(
                ProductVariant::new("tee-blue", "tee", price())
                    .with_option("Color", "Blue")
                    .with_option("Size", "S")
                    .unavailable(),
            )
    }

    fn raw(name: &str, handle: &str, exists: bool, available: bool, different: bool) -> RawOptionValue {
        RawOptionValue {
            name: name.to_string(),
            handle: handle.to_string(),
            target: VariantQuery::new().with("color", name),
            available,
            exists,
            is_different_product: different,
            swatch: None,
        }
    }

    #[test]
    fn test_single_valued_options_are_suppressed() {
        let product = tee();
        let current = product.selected_or_first_available_variant();
        let options = classify_options(&map_product_options(&product, current), current);
        let names: Vec<_> = options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["Color"]);
    }

    #[test]
    fn test_flags_derived_from_variant_graph() {
        let product = tee();
        let current = product.selected_or_first_available_variant();
        let options = classify_options(&map_product_options(&product, current), current);
        let color = &options[0];

        let red = &color.values[0];
        assert!(red.selected && red.exists && red.available);
        assert_eq!(red.state(), ValueState::Selected);

        let blue = &color.values[1];
        assert!(!blue.selected && blue.exists && !blue.available);
        assert_eq!(blue.state(), ValueState::Unavailable);
        assert_eq!(blue.target_locator.to_string(), "color=Blue");
        assert_eq!(blue.href(), "/products/tee?color=Blue");

        let green = &color.values[2];
        assert!(!green.exists && !green.available);
        assert_eq!(green.state(), ValueState::Disabled);
        assert!(!green.state().is_interactive());
    }

    #[test]
    fn test_target_locator_resolves_to_target_variant() {
        let product = tee();
        let current = product.selected_or_first_available_variant();
        for option in map_product_options(&product, current) {
            for value in option.values.iter().filter(|v| v.exists) {
                let resolved = resolve_variant(&product, &value.target).unwrap();
                assert_eq!(resolved.option(&option.name), Some(value.name.as_str()));
            }
        }
    }

    #[test]
    fn test_not_existing_is_never_available() {
        let value = classify("Color", &raw("Green", "tee", false, true, false), None);
        assert!(!value.available);
        assert_eq!(value.state(), ValueState::Disabled);
    }

    #[test]
    fn test_selected_does_not_conflate_products() {
        let product = tee();
        let current = product.variant(&"tee-red".into());
        let same_name_elsewhere = classify("Color", &raw("Red", "hoodie", true, true, true), current);
        assert!(!same_name_elsewhere.selected);

        let own = classify("Color", &raw("Red", "tee", true, true, false), current);
        assert!(own.selected);
    }

    #[test]
    fn test_combined_listing_value_is_different_resource() {
        let product = Product::new("p-set", "mug-set", "Mug set")
            .with_option("Material", &["Stoneware", "Glass"])
            .with_variant(
                ProductVariant::new("set-stone", "mug-set", price()).with_option("Material", "Stoneware"),
            )
            .with_variant(
                ProductVariant::new("glass-1", "glass-mug", price()).with_option("Material", "Glass"),
            );
        let current = product.selected_or_first_available_variant();
        let options = classify_options(&map_product_options(&product, current), current);

        let glass = &options[0].values[1];
        assert!(glass.is_different_resource);
        assert_eq!(glass.handle, "glass-mug");
        assert_eq!(glass.href(), "/products/glass-mug?material=Glass");
        assert!(!glass.selected);
    }

    #[test]
    fn test_empty_swatch_is_dropped() {
        let mut value = raw("Red", "tee", true, true, false);
        value.swatch = Some(Swatch::default());
        assert_eq!(classify("Color", &value, None).swatch, None);

        value.swatch = Some(Swatch {
            color: Some("#ff0000".to_string()),
            image_url: None,
        });
        assert!(classify("Color", &value, None).swatch.is_some());
    }
}
