pub mod core;
pub mod exchanges;

pub use core::config::ExchangeConfig;
pub use core::errors::ExchangeError;
pub use core::types::{ApiRequest, Verb};
pub use exchanges::bitmex::{build_rest_client, BitmexBuilder, BitmexRestClient};
