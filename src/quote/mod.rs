pub mod client;
pub mod models;

pub use client::{HttpQuoteBackend, QuoteBackend, QuoteError};
pub use models::{parse_quote_body, BackendQuote, QuoteContext, QuoteRequest};
