use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::exchanges::bitmex::types::{
    AmendRequest, ApiKey, CancelAllAfterResponse, NewApiKeyRequest, Order, OrderBookL2,
    OrderRequest, Position, Quote, SuccessResponse, Trade,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::instrument;

/// Path prefix shared by every BitMEX REST operation
pub const API_PREFIX: &str = "/api/v1";

fn endpoint(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}

#[derive(Serialize)]
struct BulkOrders<'a, T> {
    orders: &'a [T],
}

#[derive(Serialize)]
struct CancelOrders<'a> {
    #[serde(rename = "orderID", skip_serializing_if = "<[String]>::is_empty")]
    order_ids: &'a [String],
    #[serde(rename = "clOrdID", skip_serializing_if = "<[String]>::is_empty")]
    cl_ord_ids: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Serialize)]
struct CancelAll<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    symbol: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Serialize)]
struct CancelAllAfter {
    timeout: u64,
}

#[derive(Serialize)]
struct ApiKeyId<'a> {
    #[serde(rename = "apiKeyID")]
    api_key_id: &'a str,
}

/// Thin typed wrapper around `RestClient` for the BitMEX API
///
/// Every operation is one logical call through the wrapped client, so signing,
/// retry and error classification come from the kernel.
///
/// Write operations (`place_bulk_orders`, `amend_bulk_orders`, the cancel
/// family and the API key mutations) are retried on 5xx like everything
/// else. A 5xx does not prove the exchange rejected the request, so a retried
/// write can be applied twice. Set a `clOrdID` on new orders to detect
/// duplicates, or build the client with `max_attempts = 1`.
pub struct BitmexRestClient<R: RestClient> {
    client: R,
}

impl<R: RestClient> BitmexRestClient<R> {
    pub fn new(client: R) -> Self {
        Self { client }
    }

    /// The underlying call pipeline
    pub fn inner(&self) -> &R {
        &self.client
    }

    /// Open positions, optionally narrowed by a BitMEX `filter` object
    #[instrument(skip(self, filter))]
    pub async fn get_positions(&self, filter: Option<&Value>) -> Result<Vec<Position>, ExchangeError> {
        let filter_str = filter.map(Value::to_string);
        let mut params = Vec::new();
        if let Some(filter) = &filter_str {
            params.push(("filter", filter.as_str()));
        }

        self.client
            .get_json(&endpoint("/position"), &params, true)
            .await
    }

    /// Orders for the account
    ///
    /// # Arguments
    /// * `symbol` - Restrict to one instrument
    /// * `open_only` - Only orders that are still working
    /// * `count` - Maximum number of orders returned
    #[instrument(skip(self))]
    pub async fn get_orders(
        &self,
        symbol: Option<&str>,
        open_only: bool,
        count: Option<u32>,
    ) -> Result<Vec<Order>, ExchangeError> {
        let mut params = Vec::new();

        if let Some(symbol) = symbol {
            params.push(("symbol", symbol));
        }

        let filter_str = json!({ "open": true }).to_string();
        if open_only {
            params.push(("filter", filter_str.as_str()));
        }

        let count_str;
        if let Some(count) = count {
            count_str = count.to_string();
            params.push(("count", &count_str));
        }

        self.client
            .get_json(&endpoint("/order"), &params, true)
            .await
    }

    /// Place several orders in one request. Not idempotent, see the type docs.
    #[instrument(skip(self, orders), fields(count = orders.len()))]
    pub async fn place_bulk_orders(
        &self,
        orders: &[OrderRequest],
    ) -> Result<Vec<Order>, ExchangeError> {
        if orders.is_empty() {
            return Err(ExchangeError::InvalidParameters(
                "Bulk order placement requires at least one order".to_string(),
            ));
        }

        self.client
            .post_json(&endpoint("/order/bulk"), &BulkOrders { orders }, true)
            .await
    }

    /// Amend several orders in one request. Not idempotent, see the type docs.
    #[instrument(skip(self, amends), fields(count = amends.len()))]
    pub async fn amend_bulk_orders(
        &self,
        amends: &[AmendRequest],
    ) -> Result<Vec<Order>, ExchangeError> {
        if amends.is_empty() {
            return Err(ExchangeError::InvalidParameters(
                "Bulk amend requires at least one entry".to_string(),
            ));
        }

        if let Some(index) = amends.iter().position(|amend| !amend.has_identifier()) {
            return Err(ExchangeError::InvalidParameters(format!(
                "Amend entry {} has neither orderID nor origClOrdID",
                index
            )));
        }

        self.client
            .put_json(&endpoint("/order/bulk"), &BulkOrders { orders: amends }, true)
            .await
    }

    /// Cancel orders by exchange id and/or client id
    #[instrument(skip(self))]
    pub async fn cancel_orders(
        &self,
        order_ids: &[String],
        cl_ord_ids: &[String],
        text: Option<&str>,
    ) -> Result<Vec<Order>, ExchangeError> {
        if order_ids.is_empty() && cl_ord_ids.is_empty() {
            return Err(ExchangeError::InvalidParameters(
                "Cancel requires at least one orderID or clOrdID".to_string(),
            ));
        }

        let body = CancelOrders {
            order_ids,
            cl_ord_ids,
            text,
        };
        self.client
            .delete_json(&endpoint("/order"), &body, true)
            .await
    }

    /// Cancel every open order, optionally for one symbol only
    #[instrument(skip(self))]
    pub async fn cancel_all_orders(
        &self,
        symbol: Option<&str>,
        text: Option<&str>,
    ) -> Result<Vec<Order>, ExchangeError> {
        self.client
            .delete_json(&endpoint("/order/all"), &CancelAll { symbol, text }, true)
            .await
    }

    /// Dead man's switch: cancel all orders after `timeout_ms` unless called
    /// again. A timeout of 0 disarms it.
    #[instrument(skip(self))]
    pub async fn cancel_all_after(
        &self,
        timeout_ms: u64,
    ) -> Result<CancelAllAfterResponse, ExchangeError> {
        self.client
            .post_json(
                &endpoint("/order/cancelAllAfter"),
                &CancelAllAfter {
                    timeout: timeout_ms,
                },
                true,
            )
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_api_keys(&self) -> Result<Vec<ApiKey>, ExchangeError> {
        self.client
            .get_json(&endpoint("/apiKey"), &[], true)
            .await
    }

    #[instrument(skip(self, request))]
    pub async fn create_api_key(&self, request: &NewApiKeyRequest) -> Result<ApiKey, ExchangeError> {
        self.client
            .post_json(&endpoint("/apiKey"), request, true)
            .await
    }

    #[instrument(skip(self))]
    pub async fn remove_api_key(&self, api_key_id: &str) -> Result<SuccessResponse, ExchangeError> {
        self.client
            .delete_json(&endpoint("/apiKey"), &ApiKeyId { api_key_id }, true)
            .await
    }

    #[instrument(skip(self))]
    pub async fn enable_api_key(&self, api_key_id: &str) -> Result<ApiKey, ExchangeError> {
        self.client
            .post_json(&endpoint("/apiKey/enable"), &ApiKeyId { api_key_id }, true)
            .await
    }

    #[instrument(skip(self))]
    pub async fn disable_api_key(&self, api_key_id: &str) -> Result<ApiKey, ExchangeError> {
        self.client
            .post_json(&endpoint("/apiKey/disable"), &ApiKeyId { api_key_id }, true)
            .await
    }

    /// Most recent quotes for a symbol, newest first
    #[instrument(skip(self))]
    pub async fn get_quotes(&self, symbol: &str, count: u32) -> Result<Vec<Quote>, ExchangeError> {
        let count_str = count.to_string();
        let params = [
            ("symbol", symbol),
            ("count", count_str.as_str()),
            ("reverse", "true"),
        ];
        self.client
            .get_json(&endpoint("/quote"), &params, false)
            .await
    }

    /// Most recent trades for a symbol, newest first
    #[instrument(skip(self))]
    pub async fn get_trades(&self, symbol: &str, count: u32) -> Result<Vec<Trade>, ExchangeError> {
        let count_str = count.to_string();
        let params = [
            ("symbol", symbol),
            ("count", count_str.as_str()),
            ("reverse", "true"),
        ];
        self.client
            .get_json(&endpoint("/trade"), &params, false)
            .await
    }

    /// L2 book snapshot; a depth of 0 returns the full book
    #[instrument(skip(self))]
    pub async fn get_order_book_l2(
        &self,
        symbol: &str,
        depth: u32,
    ) -> Result<Vec<OrderBookL2>, ExchangeError> {
        let depth_str = depth.to_string();
        let params = [("symbol", symbol), ("depth", depth_str.as_str())];
        self.client
            .get_json(&endpoint("/orderBook/L2"), &params, false)
            .await
    }
}
