//! Provider display formatting

use tabled::Tabled;

use crate::config::Settings;
use crate::models::Offer;
use crate::services::ProviderSummary;

#[derive(Tabled)]
struct ProviderRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Street")]
    street: String,
    #[tabled(rename = "Neighborhood")]
    neighborhood: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Offers")]
    offers: usize,
    #[tabled(rename = "Purchases")]
    purchases: usize,
    #[tabled(rename = "Spent")]
    spent: String,
}

/// Format providers with their offer and purchase figures as a table
pub fn format_provider_list(summaries: &[ProviderSummary], settings: &Settings) -> String {
    if summaries.is_empty() {
        return "No providers found.".to_string();
    }

    let rows = summaries
        .iter()
        .map(|s| ProviderRow {
            name: s.provider.name.clone(),
            street: s.provider.address.street.clone(),
            neighborhood: s.provider.address.neighborhood.clone(),
            city: s.provider.address.city.clone(),
            offers: s.offer_count,
            purchases: s.acquisition_count,
            spent: s.spent.format_with_symbol(&settings.currency_symbol),
        })
        .collect();

    format!("{}\n\nTotal: {} providers", super::render(rows, 4), summaries.len())
}

/// Format a single provider with its offers
pub fn format_provider_details(summary: &ProviderSummary, offers: &[&Offer], settings: &Settings) -> String {
    let provider = &summary.provider;
    let symbol = &settings.currency_symbol;

    let mut output = String::new();
    output.push_str(&format!("Provider: {}\n", provider.name));
    output.push_str(&format!("  Street:       {}\n", provider.address.street));
    output.push_str(&format!("  Neighborhood: {}\n", provider.address.neighborhood));
    output.push_str(&format!("  City:         {}\n", provider.address.city));
    if let Some(phone) = &provider.phone {
        output.push_str(&format!("  Phone:        {}\n", phone));
    }
    output.push_str(&format!("  Purchases:    {}\n", summary.acquisition_count));
    output.push_str(&format!("  Spent:        {}\n", summary.spent.format_with_symbol(symbol)));
    output.push_str(&format!("  Created:      {}\n", provider.created_at.format("%Y-%m-%d %H:%M")));
    output.push_str(&format!("  Updated:      {}\n", provider.updated_at.format("%Y-%m-%d %H:%M")));

    if offers.is_empty() {
        output.push_str("\nNo offers.\n");
    } else {
        output.push_str("\nOffers:\n");
        for offer in offers {
            output.push_str(&format!(
                "  {:<30} {:>12}\n",
                offer.product,
                offer.unit_price.format_with_symbol(symbol)
            ));
        }
    }

    output
}
