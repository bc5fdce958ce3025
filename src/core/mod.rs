pub mod editor;

pub use editor::{EntryForm, InvoiceEditor};
