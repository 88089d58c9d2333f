//! Variant navigation.
//!
//! Turns a click on a classified option value into a navigation action and
//! applies it to an injected navigation context.

mod context;
mod navigator;
mod resolution;

pub use context::{Location, MemoryHistory, NavigateOptions, NavigationContext};
pub use navigator::{
    navigate, NavigationAction, NavigationOutcome, PrefetchRequest, VariantLocator,
    VariantNavigator,
};
pub use resolution::{ResolutionTicket, VariantResolution};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{classify_options, map_product_options, Product, ProductVariant, VariantQuery};
    use crate::money::{Currency, Money};

    #[test]
    fn test_switching_color_updates_query_in_place() {
        let price = Money::new(2500, Currency::USD);
        let product = Product::new("p-tee", "tee", "Tee")
            .with_option("Color", &["Red", "Blue", "Green"])
            .with_option("Size", &["S"])
            .with_variant(
                ProductVariant::new("tee-red", "tee", price)
                    .with_option("Color", "Red")
                    .with_option("Size", "S"),
            )
            .with_variant(
                ProductVariant::new("tee-blue", "tee", price)
                    .with_option("Color", "Blue")
                    .with_option("Size", "S"),
            );
        let current = product.selected_or_first_available_variant();
        let options = classify_options(&map_product_options(&product, current), current);
        assert_eq!(options.len(), 1);

        let color = &options[0];
        let blue = color.values.iter().find(|v| v.name == "Blue").unwrap();
        assert_eq!(
            navigate(blue),
            NavigationAction::InPlaceQueryUpdate(VariantQuery::parse("color=Blue"))
        );

        let green = color.values.iter().find(|v| v.name == "Green").unwrap();
        assert_eq!(navigate(green), NavigationAction::NoOp);

        let red = color.values.iter().find(|v| v.name == "Red").unwrap();
        assert_eq!(navigate(red), NavigationAction::NoOp);
    }
}
