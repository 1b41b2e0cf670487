//! Territory display formatting

use crate::ledger::TerritoryMap;

/// Format the territory map as an indented tree
pub fn format_territories(territories: &TerritoryMap) -> String {
    if territories.is_empty() {
        return "No territories found.".to_string();
    }

    let mut output = String::new();
    for (city, neighborhoods) in territories {
        output.push_str(&format!("{}\n", city));
        for (neighborhood, streets) in neighborhoods {
            output.push_str(&format!("  {}\n", neighborhood));
            for street in streets {
                output.push_str(&format!("    {}\n", street));
            }
        }
    }
    output
}
