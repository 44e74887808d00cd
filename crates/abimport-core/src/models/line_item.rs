//! Line items extracted from an order confirmation.

use serde::{Deserialize, Serialize};

use crate::template::quantity::normalize_quantity;

/// One priced position from the source document.
///
/// Field names on the wire follow the extraction contract
/// (`Pos`, `Titel`, `Beschreibung`, `Menge`, `Einzelpreis`, `Gesamtpreis`).
/// Prices are carried as the document shows them and are never recomputed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRecord {
    /// Position label as printed, e.g. "01". Not necessarily numeric or unique.
    #[serde(rename = "Pos")]
    pub position_id: String,

    /// Short name of the work item.
    #[serde(rename = "Titel")]
    pub title: String,

    /// Free text, bullets and line breaks kept verbatim.
    #[serde(rename = "Beschreibung")]
    pub description: String,

    /// Quantity as written, e.g. "8 Tage".
    #[serde(rename = "Menge")]
    pub quantity_raw: String,

    #[serde(rename = "Einzelpreis")]
    pub unit_price: String,

    #[serde(rename = "Gesamtpreis")]
    pub total_price: String,
}

impl LineItemRecord {
    /// Planned effort derived from the free-text quantity.
    pub fn effort(&self) -> f64 {
        normalize_quantity(&self.quantity_raw)
    }

    /// A record is usable only with a non-blank title.
    pub fn is_usable(&self) -> bool {
        !self.title.trim().is_empty()
    }
}
