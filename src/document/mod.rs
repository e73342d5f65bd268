//! Import and export of whole pages.
//!
//! This module handles:
//! - Assembling the three buffers into a downloadable page
//! - Splitting a page back into markup, style and script
//! - The concatenated document shown by the live preview

mod codec;
mod types;

pub use codec::{export_document, import_document, import_single, preview_document};
pub use types::{ExportOptions, Sources};

/// File name offered for exported pages.
pub const EXPORT_FILE_NAME: &str = "index.html";
