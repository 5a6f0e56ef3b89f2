//! # pdfjson
//!
//! Turns PDF invoices into JSON using a hosted text-generation model.
//!
//! The crate provides the pieces of the extraction pipeline: the fixed
//! instruction template, the AI provider clients, the JSON parsing step and the
//! sequential batch runner. Text extraction is pluggable through the
//! [`pipeline::TextExtractor`] trait; the `pdfjson-pdf` crate implements it for
//! PDF documents.

pub mod errors;
pub mod extract;
pub mod pipeline;
pub mod prompts;
pub mod providers;

pub use errors::ExtractError;
pub use extract::{extract_invoice_json, parse_completion};
pub use pipeline::{
    download_file_name, ExtractedDocument, ExtractionPipeline, TextExtractor, UploadedFile,
};
