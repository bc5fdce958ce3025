pub mod draft;
pub mod line_item;

pub use draft::{InvoiceDraft, InvoiceSummary};
pub use line_item::LineItem;
