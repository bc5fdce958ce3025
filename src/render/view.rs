use crate::config::Config;
use crate::models::InvoiceDraft;
use crate::utils::date;
use crate::utils::formatting::{format_quantity, money};
use chrono::NaiveDate;
use std::path::PathBuf;

/// Identifier of the printable invoice region.
pub const INVOICE_REGION_ID: &str = "invoice-content";

/// Blank rows printed under the items so the table leaves room for handwriting.
pub const BLANK_ROWS: usize = 3;

/// Issuer-side data printed on every invoice, taken from the config.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceProfile {
    pub title: String,
    pub invoice_number: String,
    pub currency: String,
    pub bank: String,
    pub account: String,
    pub holder: String,
    pub signatory_name: String,
    pub signatory_role: String,
    pub signature: Option<PathBuf>,
}

impl InvoiceProfile {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            title: cfg.invoice_title.clone(),
            invoice_number: cfg.invoice_number.clone(),
            currency: cfg.currency.clone(),
            bank: cfg.payment.bank.clone(),
            account: cfg.payment.account.clone(),
            holder: cfg.payment.holder.clone(),
            signatory_name: cfg.signatory.name.clone(),
            signatory_role: cfg.signatory.role.clone(),
            signature: cfg.signatory.signature.clone(),
        }
    }
}

impl Default for InvoiceProfile {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Presentation knobs of the view. Capture hooks mutate a copy of this.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewStyle {
    /// Width of the region in view pixels.
    pub width: u32,
    pub padding: u32,
    pub min_height: u32,
    pub corner_accents: bool,
    pub fold_lines: bool,
    pub paper_edges: bool,
}

impl Default for ViewStyle {
    fn default() -> Self {
        Self {
            width: 595,
            padding: 48,
            min_height: 1000,
            corner_accents: true,
            fold_lines: false,
            paper_edges: false,
        }
    }
}

/// One rendered table row, already formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRow {
    pub number: String,
    pub description: String,
    pub quantity: String,
    pub price: String,
    pub subtotal: String,
}

/// The printable invoice: every string it shows, plus its style.
///
/// This is the explicit handle handed to the export controller; nothing
/// looks it up by identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceView {
    pub id: &'static str,
    pub title: String,
    pub date_issued: String,
    pub invoice_number: String,
    pub issued_to: String,
    pub rows: Vec<ItemRow>,
    pub grand_total: String,
    pub closing: String,
    pub payment_lines: Vec<String>,
    pub signature: Option<PathBuf>,
    pub signatory_name: String,
    pub signatory_role: String,
    pub style: ViewStyle,
}

impl InvoiceView {
    pub fn build(draft: &InvoiceDraft, profile: &InvoiceProfile, issued_on: NaiveDate) -> Self {
        let cur = profile.currency.as_str();

        let rows = draft
            .items
            .iter()
            .map(|item| ItemRow {
                number: item.sequence_number.to_string(),
                description: item.description.clone(),
                quantity: format_quantity(item.quantity),
                price: money(cur, item.unit_price),
                subtotal: money(cur, item.subtotal()),
            })
            .collect();

        let issued_to = if draft.recipient_name.trim().is_empty() {
            "---".to_string()
        } else {
            draft.recipient_name.clone()
        };

        let payment_lines = [&profile.bank, &profile.account, &profile.holder]
            .into_iter()
            .filter(|l| !l.trim().is_empty())
            .cloned()
            .collect();

        Self {
            id: INVOICE_REGION_ID,
            title: profile.title.clone(),
            date_issued: date::issued(issued_on),
            invoice_number: profile.invoice_number.clone(),
            issued_to,
            rows,
            grand_total: money(cur, draft.grand_total()),
            closing: "Thank You".to_string(),
            payment_lines,
            signature: profile.signature.clone(),
            signatory_name: profile.signatory_name.clone(),
            signatory_role: profile.signatory_role.clone(),
            style: ViewStyle::default(),
        }
    }
}
