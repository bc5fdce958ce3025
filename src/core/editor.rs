use crate::config::Config;
use crate::models::{InvoiceDraft, InvoiceSummary};
use crate::render::{InvoiceProfile, InvoiceView};
use crate::utils::parse_amount;
use chrono::NaiveDate;

/// Pending values of the "new item" entry row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryForm {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl EntryForm {
    pub fn set_description(&mut self, text: &str) {
        self.description = text.trim().to_string();
    }

    /// Raw user input; anything unparsable becomes 0.
    pub fn set_quantity(&mut self, raw: &str) {
        self.quantity = parse_amount(raw);
    }

    pub fn set_price(&mut self, raw: &str) {
        self.unit_price = parse_amount(raw);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Draft plus entry form: everything the editing side of a session owns.
#[derive(Debug, Clone, Default)]
pub struct InvoiceEditor {
    draft: InvoiceDraft,
    pub entry: EntryForm,
}

impl InvoiceEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_draft(draft: InvoiceDraft) -> Self {
        Self {
            draft,
            entry: EntryForm::default(),
        }
    }

    pub fn draft(&self) -> &InvoiceDraft {
        &self.draft
    }

    pub fn set_recipient(&mut self, name: &str) {
        self.draft.recipient_name = name.trim().to_string();
    }

    pub fn add_item(&mut self, description: &str, quantity: f64, unit_price: f64) -> bool {
        self.draft.add_item(description, quantity, unit_price)
    }

    /// Add the entry form as a new row; the form is cleared only on success.
    pub fn submit_entry(&mut self) -> bool {
        let EntryForm {
            description,
            quantity,
            unit_price,
        } = &self.entry;

        let added = self.draft.add_item(description, *quantity, *unit_price);
        if added {
            self.entry.clear();
        }
        added
    }

    pub fn remove_item(&mut self, sequence_number: u32) -> bool {
        self.draft.remove_item(sequence_number)
    }

    pub fn grand_total(&self) -> f64 {
        self.draft.grand_total()
    }

    pub fn summary(&self) -> InvoiceSummary {
        self.draft.summary()
    }

    pub fn replace_draft(&mut self, draft: InvoiceDraft) {
        self.draft = draft;
        self.entry.clear();
    }

    /// Printable view of the current draft.
    pub fn render_view(&self, cfg: &Config, date: NaiveDate) -> InvoiceView {
        InvoiceView::build(&self.draft, &InvoiceProfile::from_config(cfg), date)
    }
}
