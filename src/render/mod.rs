//! Printable invoice view, its layout, and the raster capture service.

pub mod layout;
pub mod raster;
pub mod view;

pub use raster::{BitmapCapture, CaptureOptions, RasterCapture, paper_finish};
pub use view::{INVOICE_REGION_ID, InvoiceProfile, InvoiceView, ViewStyle};
