//! Catalog response shapes and their conversion into domain types.
//!
//! Field names follow the catalog's GraphQL schema (camelCase, amounts as
//! decimal strings). Nothing outside this module sees these types.

use serde::Deserialize;
use turbo_commerce::prelude::*;

#[derive(Debug, Deserialize)]
pub struct Connection<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMoney {
    pub amount: String,
    pub currency_code: String,
}

impl WireMoney {
    fn to_money(&self) -> Result<Money, CommerceError> {
        Money::parse(&self.amount, &self.currency_code)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireImage {
    #[serde(default)]
    pub id: Option<String>,
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl From<WireImage> for Image {
    fn from(image: WireImage) -> Self {
        Image {
            id: image.id.map(MediaId::new),
            url: image.url,
            alt_text: image.alt_text,
            width: image.width,
            height: image.height,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WireUrl {
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSwatchImage {
    #[serde(default)]
    pub preview_image: Option<WireUrl>,
}

#[derive(Debug, Deserialize)]
pub struct WireSwatch {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub image: Option<WireSwatchImage>,
}

impl From<WireSwatch> for Swatch {
    fn from(swatch: WireSwatch) -> Self {
        Swatch {
            color: swatch.color,
            image_url: swatch.image.and_then(|i| i.preview_image).map(|p| p.url),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WireOptionValue {
    pub name: String,
    #[serde(default)]
    pub swatch: Option<WireSwatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireOption {
    pub name: String,
    pub option_values: Vec<WireOptionValue>,
}

#[derive(Debug, Deserialize)]
pub struct WireVariantProduct {
    pub title: String,
    pub handle: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireVariant {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    pub available_for_sale: bool,
    pub product: WireVariantProduct,
    pub price: WireMoney,
    #[serde(default)]
    pub compare_at_price: Option<WireMoney>,
    #[serde(default)]
    pub selected_options: Vec<VariantOption>,
    #[serde(default)]
    pub image: Option<WireImage>,
}

impl WireVariant {
    fn into_variant(self) -> Result<ProductVariant, CommerceError> {
        let price = self.price.to_money()?;
        let compare_at_price = self.compare_at_price.as_ref().map(WireMoney::to_money).transpose()?;
        Ok(ProductVariant {
            id: VariantId::new(self.id),
            product_handle: self.product.handle,
            product_title: self.product.title,
            title: self.title,
            sku: self.sku,
            available_for_sale: self.available_for_sale,
            price,
            compare_at_price,
            options: self.selected_options,
            image: self.image.map(Image::from),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProduct {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub featured_image: Option<WireImage>,
    #[serde(default)]
    pub options: Vec<WireOption>,
    pub variants: Connection<WireVariant>,
}

impl WireProduct {
    pub fn into_product(self) -> Result<Product, CommerceError> {
        let variants = self
            .variants
            .nodes
            .into_iter()
            .map(WireVariant::into_variant)
            .collect::<Result<Vec<_>, _>>()?;
        let options = self
            .options
            .into_iter()
            .map(|option| ProductOptionDef {
                name: option.name,
                values: option
                    .option_values
                    .into_iter()
                    .map(|value| OptionValueDef {
                        name: value.name,
                        swatch: value.swatch.map(Swatch::from),
                    })
                    .collect(),
            })
            .collect();

        Ok(Product {
            id: ProductId::new(self.id),
            handle: self.handle,
            title: self.title,
            description: self.description.filter(|d| !d.is_empty()),
            vendor: self.vendor.filter(|v| !v.is_empty()),
            options,
            variants,
            featured_image: self.featured_image.map(Image::from),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePriceRange {
    pub min_variant_price: WireMoney,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProductSummary {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub featured_image: Option<WireImage>,
    pub price_range: WirePriceRange,
}

impl WireProductSummary {
    pub fn into_summary(self) -> Result<ProductSummary, CommerceError> {
        Ok(ProductSummary {
            min_price: self.price_range.min_variant_price.to_money()?,
            id: ProductId::new(self.id),
            handle: self.handle,
            title: self.title,
            featured_image: self.featured_image.map(Image::from),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub has_previous_page: bool,
    #[serde(default)]
    pub start_cursor: Option<String>,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProductPage {
    pub nodes: Vec<WireProductSummary>,
    #[serde(default)]
    pub page_info: WirePageInfo,
}

#[derive(Debug, Deserialize)]
pub struct WireCollection {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<WireImage>,
    #[serde(default)]
    pub products: Option<WireProductPage>,
}

impl WireCollection {
    pub fn into_collection(self) -> Result<Collection, CommerceError> {
        let (products, page_info) = match self.products {
            Some(page) => {
                let products = page
                    .nodes
                    .into_iter()
                    .map(WireProductSummary::into_summary)
                    .collect::<Result<Vec<_>, _>>()?;
                let info = page.page_info;
                (
                    products,
                    PageInfo {
                        has_next_page: info.has_next_page,
                        has_previous_page: info.has_previous_page,
                        start_cursor: info.start_cursor,
                        end_cursor: info.end_cursor,
                    },
                )
            }
            None => (Vec::new(), PageInfo::default()),
        };

        Ok(Collection {
            id: CollectionId::new(self.id),
            handle: self.handle,
            title: self.title,
            description: self.description.filter(|d| !d.is_empty()),
            image: self.image.map(Image::from),
            products,
            page_info,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct FeaturedCollectionData {
    pub collections: Connection<WireCollection>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendedProductsData {
    pub products: Connection<WireProductSummary>,
}

#[derive(Debug, Deserialize)]
pub struct ProductData {
    pub product: Option<WireProduct>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionData {
    pub collection: Option<WireCollection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCart {
    pub id: String,
    #[serde(default)]
    pub total_quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct UserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesAddPayload {
    #[serde(default)]
    pub cart: Option<WireCart>,
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesAddData {
    pub cart_lines_add: CartLinesAddPayload,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_product_conversion() {
        let wire: WireProduct = serde_json::from_value(json!({
            "id": "gid://shop/Product/1",
            "handle": "tee",
            "title": "Tee",
            "description": "",
            "options": [
                { "name": "Color", "optionValues": [
                    { "name": "Red", "swatch": { "color": "#f00", "image": null } },
                    { "name": "Blue", "swatch": null }
                ]}
            ],
            "variants": { "nodes": [{
                "id": "gid://shop/ProductVariant/11",
                "availableForSale": true,
                "product": { "title": "Tee", "handle": "tee" },
                "price": { "amount": "25.0", "currencyCode": "USD" },
                "compareAtPrice": { "amount": "30.0", "currencyCode": "USD" },
                "selectedOptions": [{ "name": "Color", "value": "Red" }]
            }]}
        }))
        .unwrap();

        let product = wire.into_product().unwrap();
        assert_eq!(product.description, None);
        assert_eq!(product.options[0].values[0].swatch.as_ref().unwrap().color.as_deref(), Some("#f00"));
        let variant = &product.variants[0];
        assert_eq!(variant.price, Money::new(2500, Currency::USD));
        assert!(variant.is_on_sale());
        assert_eq!(variant.option("color"), Some("Red"));
    }

    #[test]
    fn test_bad_currency_is_an_error() {
        let wire: WireProductSummary = serde_json::from_value(json!({
            "id": "1", "handle": "tee", "title": "Tee",
            "priceRange": { "minVariantPrice": { "amount": "1.00", "currencyCode": "dollars" } }
        }))
        .unwrap();
        assert!(wire.into_summary().is_err());
    }
}
