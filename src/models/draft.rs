use super::line_item::LineItem;
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// The invoice being edited: who it is issued to and its rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    #[serde(default)]
    pub recipient_name: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

/// The two values the export side needs from the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceSummary {
    pub recipient_name: String,
    pub grand_total: f64,
}

impl InvoiceDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row numbered `count + 1`.
    ///
    /// Returns `false` and leaves the draft untouched when the description
    /// is empty or either number is zero (or not a valid non-negative number).
    pub fn add_item(&mut self, description: &str, quantity: f64, unit_price: f64) -> bool {
        if description.is_empty() || !is_positive(quantity) || !is_positive(unit_price) {
            return false;
        }

        let next = self.items.len() as u32 + 1;
        self.items
            .push(LineItem::new(next, description, quantity, unit_price));
        true
    }

    /// Remove the row carrying `sequence_number` and renumber the rest `1..N`.
    pub fn remove_item(&mut self, sequence_number: u32) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.sequence_number != sequence_number);
        let removed = self.items.len() != before;
        self.renumber();
        removed
    }

    pub fn grand_total(&self) -> f64 {
        self.items.iter().map(LineItem::subtotal).sum()
    }

    pub fn summary(&self) -> InvoiceSummary {
        InvoiceSummary {
            recipient_name: self.recipient_name.clone(),
            grand_total: self.grand_total(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn renumber(&mut self) {
        for (idx, item) in self.items.iter_mut().enumerate() {
            item.sequence_number = idx as u32 + 1;
        }
    }

    /// Load a draft previously written with [`InvoiceDraft::save`].
    /// Rows are renumbered in file order, whatever numbers the file carries.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        let mut draft: InvoiceDraft = serde_json::from_str(&content)?;
        draft.renumber();
        Ok(draft)
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}
