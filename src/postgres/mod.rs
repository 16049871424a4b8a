mod client;

pub use client::{PgClient, quote_identifier};
