use crate::core::errors::ExchangeError;
use crate::core::kernel::codec::timestamp;
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Tag of the array form of a DTC permission.
pub const DTC_PERMISSION_TAG: &str = "sierra-dtc";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    Market,
    Limit,
    Stop,
    StopLimit,
    MarketIfTouched,
    LimitIfTouched,
    Pegged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    Day,
    GoodTillCancel,
    ImmediateOrCancel,
    FillOrKill,
}

/// Scope granted to an API key
///
/// Wire form is either a bare string (`"order"`) or the tagged pair
/// `["sierra-dtc", {"username": "..."}]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Permission {
    Plain(String),
    Dtc { username: String },
}

#[derive(Serialize)]
struct DtcScopeRef<'a> {
    username: &'a str,
}

impl Permission {
    /// Decode from JSON, trying the bare string form first and then the tagged
    /// DTC pair. Any other shape is rejected.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        if let Value::String(name) = value {
            return Ok(Self::Plain(name.clone()));
        }

        if let Value::Array(items) = value {
            if let [Value::String(tag), Value::Object(scope)] = items.as_slice() {
                if tag == DTC_PERMISSION_TAG {
                    return match scope.get("username") {
                        Some(Value::String(username)) => Ok(Self::Dtc {
                            username: username.clone(),
                        }),
                        _ => Err(format!(
                            "{} permission requires a string 'username', got {}",
                            DTC_PERMISSION_TAG, value
                        )),
                    };
                }
            }
        }

        Err(format!("unrecognised permission shape: {}", value))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(name) => f.write_str(name),
            Self::Dtc { username } => write!(f, "{}:{}", DTC_PERMISSION_TAG, username),
        }
    }
}

impl Serialize for Permission {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Plain(name) => serializer.serialize_str(name),
            Self::Dtc { username } => {
                (DTC_PERMISSION_TAG, DtcScopeRef { username }).serialize(serializer)
            }
        }
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub id: String,
    pub secret: String,
    pub name: String,
    pub nonce: i64,
    pub cidr: String,
    pub permissions: Vec<Permission>,
    pub enabled: bool,
    pub user_id: i64,
    #[serde(with = "timestamp")]
    pub created: DateTime<Utc>,
}

/// Body of `POST /apiKey`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApiKeyRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<Permission>,
    pub enabled: bool,
    /// Two-factor token, required by the exchange when creating keys
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Top-of-book snapshot. Absent fields mean that side was not reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ask_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ask_size: Option<i64>,
}

impl Quote {
    /// Combine two partial quotes for the same symbol.
    ///
    /// The result carries the later timestamp. Each price/size field takes the
    /// later quote's value when populated and falls back to the earlier one.
    /// On equal timestamps `other` counts as the later quote.
    pub fn merge(&self, other: &Self) -> Result<Self, ExchangeError> {
        if self.symbol != other.symbol {
            return Err(ExchangeError::InvalidParameters(format!(
                "Cannot merge quotes for different symbols: {} and {}",
                self.symbol, other.symbol
            )));
        }

        let (older, newer) = if other.timestamp >= self.timestamp {
            (self, other)
        } else {
            (other, self)
        };

        Ok(Self {
            timestamp: newer.timestamp,
            symbol: newer.symbol.clone(),
            bid_size: newer.bid_size.or(older.bid_size),
            bid_price: newer.bid_price.or(older.bid_price),
            ask_price: newer.ask_price.or(older.ask_price),
            ask_size: newer.ask_size.or(older.ask_size),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    pub size: i64,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_direction: Option<String>,
    #[serde(rename = "trdMatchID", skip_serializing_if = "Option::is_none")]
    pub trd_match_id: Option<String>,
}

/// One price level of the L2 book. In incremental feeds a level with no
/// size or price has been removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookL2 {
    pub symbol: String,
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl OrderBookL2 {
    pub fn is_removal(&self) -> bool {
        self.size.is_none() && self.price.is_none()
    }
}

/// New order entry for `POST /order/bulk`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_qty: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_px: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_qty: Option<i64>,
    #[serde(rename = "clOrdID", skip_serializing_if = "Option::is_none")]
    pub cl_ord_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ord_type: Option<OrderType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exec_inst: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl OrderRequest {
    fn base(symbol: impl Into<String>, side: Side, quantity: i64, ord_type: OrderType) -> Self {
        Self {
            symbol: symbol.into(),
            side: Some(side),
            order_qty: Some(quantity),
            price: None,
            stop_px: None,
            display_qty: None,
            cl_ord_id: None,
            ord_type: Some(ord_type),
            time_in_force: None,
            exec_inst: None,
            text: None,
        }
    }

    pub fn limit(symbol: impl Into<String>, side: Side, quantity: i64, price: f64) -> Self {
        Self {
            price: Some(price),
            ..Self::base(symbol, side, quantity, OrderType::Limit)
        }
    }

    pub fn market(symbol: impl Into<String>, side: Side, quantity: i64) -> Self {
        Self::base(symbol, side, quantity, OrderType::Market)
    }

    #[must_use]
    pub fn with_cl_ord_id(mut self, cl_ord_id: impl Into<String>) -> Self {
        self.cl_ord_id = Some(cl_ord_id.into());
        self
    }

    #[must_use]
    pub fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = Some(time_in_force);
        self
    }

    #[must_use]
    pub fn with_exec_inst(mut self, exec_inst: impl Into<String>) -> Self {
        self.exec_inst = Some(exec_inst.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Amend entry for `PUT /order/bulk`; identifies the order by exchange id or
/// original client id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmendRequest {
    #[serde(rename = "orderID", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(rename = "origClOrdID", skip_serializing_if = "Option::is_none")]
    pub orig_cl_ord_id: Option<String>,
    #[serde(rename = "clOrdID", skip_serializing_if = "Option::is_none")]
    pub cl_ord_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_qty: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leaves_qty: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_px: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl AmendRequest {
    pub fn by_order_id(order_id: impl Into<String>) -> Self {
        Self {
            order_id: Some(order_id.into()),
            ..Self::default()
        }
    }

    pub fn by_cl_ord_id(orig_cl_ord_id: impl Into<String>) -> Self {
        Self {
            orig_cl_ord_id: Some(orig_cl_ord_id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn with_order_qty(mut self, order_qty: i64) -> Self {
        self.order_qty = Some(order_qty);
        self
    }

    pub fn has_identifier(&self) -> bool {
        self.order_id.is_some() || self.orig_cl_ord_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "orderID")]
    pub order_id: String,
    #[serde(rename = "clOrdID", skip_serializing_if = "Option::is_none")]
    pub cl_ord_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<i64>,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_qty: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_px: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ord_type: Option<OrderType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exec_inst: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ord_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leaves_qty: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cum_qty: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_px: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub transact_time: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<i64>,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub current_qty: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_entry_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquidation_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leverage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unrealised_pnl: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realised_pnl: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Response of `POST /order/cancelAllAfter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelAllAfterResponse {
    #[serde(with = "timestamp")]
    pub now: DateTime<Utc>,
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub cancel_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kernel::JsonCodec;
    use chrono::TimeZone;
    use serde_json::json;

    fn ts(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000 + millis).unwrap()
    }

    fn round_trip<T: JsonCodec + PartialEq + fmt::Debug>(value: &T) {
        let encoded = value.to_json().unwrap();
        assert_eq!(&T::from_json(encoded).unwrap(), value);
    }

    #[test]
    fn test_plain_permission_decodes_from_string() {
        let permission = Permission::from_json(json!("trade")).unwrap();
        assert_eq!(permission, Permission::Plain("trade".to_string()));
    }

    #[test]
    fn test_dtc_permission_decodes_from_tagged_pair() {
        let permission = Permission::from_json(json!(["sierra-dtc", {"username": "bob"}])).unwrap();
        assert_eq!(
            permission,
            Permission::Dtc {
                username: "bob".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_permission_shapes_fail() {
        for bad in [
            json!(["other-tag", {}]),
            json!(["sierra-dtc", {}]),
            json!(["sierra-dtc", {"username": 7}]),
            json!(["sierra-dtc"]),
            json!(["sierra-dtc", {"username": "bob"}, "extra"]),
            json!({"username": "bob"}),
            json!(42),
            json!(null),
        ] {
            assert!(
                matches!(Permission::from_json(bad.clone()), Err(ExchangeError::Decode(_))),
                "accepted {}",
                bad
            );
        }
    }

    #[test]
    fn test_permission_encodes_to_wire_shapes() {
        assert_eq!(
            Permission::Plain("order".to_string()).to_json().unwrap(),
            json!("order")
        );
        assert_eq!(
            Permission::Dtc {
                username: "bob".to_string()
            }
            .to_json()
            .unwrap(),
            json!(["sierra-dtc", {"username": "bob"}])
        );
    }

    #[test]
    fn test_api_key_decodes_mixed_permissions() {
        let key = ApiKey::from_json(json!({
            "id": "LAqUlngMIQkIUjXMUreyu3qn",
            "secret": "chNOOS4KvNXR_Xq4k4c9qsfoKWvnDecLATCRlcBwyKDYnWgO",
            "name": "bot",
            "nonce": 0,
            "cidr": "0.0.0.0/0",
            "permissions": ["order", ["sierra-dtc", {"username": "alice"}]],
            "enabled": true,
            "userId": 12345,
            "created": "2024-01-15T10:30:00.000Z"
        }))
        .unwrap();

        assert_eq!(key.user_id, 12345);
        assert_eq!(
            key.permissions,
            vec![
                Permission::Plain("order".to_string()),
                Permission::Dtc {
                    username: "alice".to_string()
                }
            ]
        );
        round_trip(&key);
    }

    #[test]
    fn test_api_key_with_bad_permission_fails() {
        let err = ApiKey::from_json(json!({
            "id": "x", "secret": "y", "name": "n", "nonce": 0, "cidr": "",
            "permissions": [["other-tag", {}]],
            "enabled": false, "userId": 1, "created": "2024-01-15T10:30:00.000Z"
        }))
        .unwrap_err();

        assert!(matches!(err, ExchangeError::Decode(ref msg) if msg.contains("permission")));
    }

    #[test]
    fn test_entity_round_trips() {
        round_trip(&Quote {
            timestamp: ts(1),
            symbol: "XBTUSD".to_string(),
            bid_size: Some(100),
            bid_price: Some(42_000.5),
            ask_price: None,
            ask_size: None,
        });
        round_trip(&Trade {
            timestamp: ts(2),
            symbol: "XBTUSD".to_string(),
            side: Some(Side::Sell),
            size: 500,
            price: 41_999.0,
            tick_direction: Some("MinusTick".to_string()),
            trd_match_id: None,
        });
        round_trip(&OrderBookL2 {
            symbol: "XBTUSD".to_string(),
            id: 8_799_580_000,
            side: Some(Side::Buy),
            size: None,
            price: None,
        });
        round_trip(&OrderRequest::limit("XBTUSD", Side::Buy, 100, 40_000.0).with_cl_ord_id("c-1"));
        round_trip(&AmendRequest::by_order_id("abc").with_price(40_100.0));
        round_trip(&NewApiKeyRequest {
            name: Some("bot".to_string()),
            cidr: None,
            permissions: vec![Permission::Plain("order".to_string())],
            enabled: true,
            token: None,
        });
        round_trip(&Position {
            account: Some(1),
            symbol: "XBTUSD".to_string(),
            currency: Some("XBt".to_string()),
            current_qty: -10,
            avg_entry_price: Some(40_000.0),
            mark_price: None,
            liquidation_price: None,
            leverage: Some(2.0),
            unrealised_pnl: Some(-1200),
            realised_pnl: None,
            is_open: Some(true),
            timestamp: Some(ts(3)),
        });
        round_trip(&CancelAllAfterResponse {
            now: ts(4),
            cancel_time: Some(ts(60_004)),
        });
    }

    #[test]
    fn test_order_decodes_exchange_field_names() {
        let order = Order::from_json(json!({
            "orderID": "6f1ed1b4-0a47-4e1d-8f73-6b3c5f6b0c59",
            "clOrdID": "c-1",
            "account": 1,
            "symbol": "XBTUSD",
            "side": "Buy",
            "orderQty": 100,
            "price": 40000.0,
            "ordType": "Limit",
            "timeInForce": "GoodTillCancel",
            "ordStatus": "New",
            "leavesQty": 100,
            "cumQty": 0,
            "transactTime": "2024-01-15T10:30:00.123Z",
            "timestamp": "2024-01-15T10:30:00.123Z",
            "workingIndicator": true
        }))
        .unwrap();

        assert_eq!(order.order_id, "6f1ed1b4-0a47-4e1d-8f73-6b3c5f6b0c59");
        assert_eq!(order.ord_type, Some(OrderType::Limit));
        assert_eq!(order.time_in_force, Some(TimeInForce::GoodTillCancel));
        assert!(order.timestamp.is_some());
        round_trip(&order);
    }

    #[test]
    fn test_order_request_wire_names() {
        let encoded = OrderRequest::market("XBTUSD", Side::Sell, 5)
            .with_cl_ord_id("c-9")
            .with_exec_inst("ReduceOnly")
            .to_json()
            .unwrap();

        assert_eq!(
            encoded,
            json!({
                "symbol": "XBTUSD",
                "side": "Sell",
                "orderQty": 5,
                "clOrdID": "c-9",
                "ordType": "Market",
                "execInst": "ReduceOnly"
            })
        );
    }

    #[test]
    fn test_entities_keep_nanosecond_timestamps() {
        let at = DateTime::from_timestamp(1_700_000_000, 123_456_789).unwrap();

        round_trip(&Quote {
            timestamp: at,
            symbol: "XBTUSD".to_string(),
            bid_size: Some(1),
            bid_price: Some(42_000.0),
            ask_price: None,
            ask_size: None,
        });
        round_trip(&CancelAllAfterResponse {
            now: at,
            cancel_time: Some(at + chrono::Duration::seconds(60)),
        });
    }

    #[test]
    fn test_quote_missing_symbol_fails() {
        let err = Quote::from_json(json!({"timestamp": "2024-01-15T10:30:00.000Z"})).unwrap_err();
        assert!(matches!(err, ExchangeError::Decode(ref msg) if msg.contains("symbol")));
    }

    #[test]
    fn test_quote_merge_prefers_populated_and_latest() {
        let older = Quote {
            timestamp: ts(0),
            symbol: "XBTUSD".to_string(),
            bid_size: Some(10),
            bid_price: Some(100.0),
            ask_price: Some(101.0),
            ask_size: Some(20),
        };
        let newer = Quote {
            timestamp: ts(5),
            symbol: "XBTUSD".to_string(),
            bid_size: None,
            bid_price: None,
            ask_price: Some(100.5),
            ask_size: Some(7),
        };

        let expected = Quote {
            timestamp: ts(5),
            symbol: "XBTUSD".to_string(),
            bid_size: Some(10),
            bid_price: Some(100.0),
            ask_price: Some(100.5),
            ask_size: Some(7),
        };

        assert_eq!(older.merge(&newer).unwrap(), expected);
        assert_eq!(newer.merge(&older).unwrap(), expected);
    }

    #[test]
    fn test_quote_merge_rejects_different_symbols() {
        let a = Quote {
            timestamp: ts(0),
            symbol: "XBTUSD".to_string(),
            bid_size: None,
            bid_price: None,
            ask_price: None,
            ask_size: None,
        };
        let b = Quote {
            symbol: "ETHUSD".to_string(),
            ..a.clone()
        };

        assert!(matches!(a.merge(&b), Err(ExchangeError::InvalidParameters(_))));
    }

    #[test]
    fn test_order_book_removal() {
        let level = OrderBookL2::from_json(json!({"symbol": "XBTUSD", "id": 17, "side": "Sell"})).unwrap();
        assert!(level.is_removal());
    }

    #[test]
    fn test_amend_identifier() {
        assert!(AmendRequest::by_cl_ord_id("c-1").has_identifier());
        assert!(!AmendRequest::default().with_price(1.0).has_identifier());
    }
}
