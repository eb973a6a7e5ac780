pub mod builder;
pub mod rest;
pub mod types;

// Re-export main types for easier importing
pub use builder::{build_rest_client, BitmexBuilder, MAINNET_URL, TESTNET_URL};
pub use rest::{BitmexRestClient, API_PREFIX};
pub use types::{
    AmendRequest, ApiKey, CancelAllAfterResponse, NewApiKeyRequest, Order, OrderBookL2,
    OrderRequest, OrderType, Permission, Position, Quote, Side, SuccessResponse, TimeInForce,
    Trade,
};
