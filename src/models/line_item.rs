use serde::{Deserialize, Serialize};

/// One invoice row.
///
/// `sequence_number` is positional: it is reassigned whenever an earlier
/// row is removed, so it must not be used as a persistent identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub sequence_number: u32,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl LineItem {
    pub fn new(sequence_number: u32, description: &str, quantity: f64, unit_price: f64) -> Self {
        Self {
            sequence_number,
            description: description.to_string(),
            quantity,
            unit_price,
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.quantity * self.unit_price
    }
}
