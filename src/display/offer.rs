//! Offer display formatting

use tabled::Tabled;

use crate::config::Settings;
use crate::models::Offer;

#[derive(Tabled)]
struct OfferRow {
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Provider")]
    provider: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Unit price")]
    unit_price: String,
}

/// Format offers as a table, in the order given
pub fn format_offer_list(offers: &[&Offer], settings: &Settings) -> String {
    if offers.is_empty() {
        return "No offers found.".to_string();
    }

    let rows = offers
        .iter()
        .map(|offer| OfferRow {
            product: offer.product.clone(),
            provider: offer.provider.name.clone(),
            location: offer.provider.address.to_string(),
            unit_price: offer.unit_price.format_with_symbol(&settings.currency_symbol),
        })
        .collect();

    super::render(rows, 3)
}
