//! # DexScreener-style aggregator source.
//!
//! [`DexSource`] reads `GET {base}/tokens/{contract}` and decodes the
//! aggregator's pair payload into a [`QuoteSnapshot`]: current USD price,
//! 24-hour percentage change, and fully diluted valuation. The body exposes
//! either a `pairs` list (first element used) or a singular `pair` object,
//! and numeric fields arrive as numbers **or** strings depending on the
//! endpoint, so decoding accepts both.
//!
//! ## Rules
//! - Retries happen here (through [`fetch_with_retry`]); the session treats
//!   one `fetch` as one logical read.
//! - An empty contract address (or base URL) short-circuits before the
//!   transport: no network call, an `Unconfigured` outcome, and a one-time
//!   warning per source instance.
//! - A 2xx body with no pair decodes to the empty snapshot - that is absent
//!   data, not an error.

use std::sync::{Arc, Once};

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::FetchError;
use crate::events::{Event, EventKind};
use crate::quotes::QuoteSnapshot;
use crate::source::quote_source::{FetchContext, QuoteSource};
use crate::source::retry::fetch_with_retry;
use crate::source::transport::{HttpTransport, Transport};

/// Default aggregator endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.dexscreener.com/latest/dex";

/// Configuration for a [`DexSource`].
#[derive(Clone, Debug)]
pub struct DexConfig {
    /// Aggregator base URL.
    pub base_url: String,
    /// Token contract address to quote. Empty means unconfigured: every
    /// poll short-circuits to an `Unconfigured` outcome without a request.
    pub contract_address: String,
}

impl Default for DexConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            contract_address: String::new(),
        }
    }
}

impl DexConfig {
    /// Creates a config for the given contract on the default endpoint.
    pub fn for_contract(contract_address: impl Into<String>) -> Self {
        Self {
            contract_address: contract_address.into(),
            ..Self::default()
        }
    }

    /// True if enough is configured to issue a request.
    pub fn is_configured(&self) -> bool {
        !self.base_url.trim().is_empty() && !self.contract_address.trim().is_empty()
    }
}

/// Price-aggregator quote source.
pub struct DexSource {
    cfg: DexConfig,
    transport: Arc<dyn Transport>,
    unconfigured_warned: Once,
}

impl DexSource {
    /// Creates a source backed by the reqwest transport.
    pub fn new(cfg: DexConfig) -> Self {
        Self::with_transport(cfg, Arc::new(HttpTransport::new()))
    }

    /// Creates a source over a caller-supplied transport (tests script this).
    pub fn with_transport(cfg: DexConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            cfg,
            transport,
            unconfigured_warned: Once::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/tokens/{}",
            self.cfg.base_url.trim_end_matches('/'),
            self.cfg.contract_address.trim()
        )
    }
}

#[async_trait]
impl QuoteSource for DexSource {
    fn name(&self) -> &str {
        "dexscreener"
    }

    async fn fetch(&self, ctx: FetchContext) -> Result<QuoteSnapshot, FetchError> {
        if !self.cfg.is_configured() {
            self.unconfigured_warned.call_once(|| {
                log::warn!("no token contract address configured; polls will return no data");
                ctx.bus
                    .publish(Event::new(EventKind::SourceUnconfigured).with_source(self.name()));
            });
            return Err(FetchError::Unconfigured);
        }

        let resp = fetch_with_retry(
            self.transport.as_ref(),
            &self.endpoint(),
            &ctx.retry,
            &ctx.token,
            &ctx.bus,
            self.name(),
        )
        .await?;

        decode_body(&resp.body)
    }
}

/// Decodes an aggregator body into a snapshot.
///
/// Absent pair → empty snapshot. A present pair yields the price from
/// `priceUsd` (falling back to `price`), the 24h change from
/// `priceChange.h24` (falling back to `priceChangeH24`), and `fdv`.
fn decode_body(body: &[u8]) -> Result<QuoteSnapshot, FetchError> {
    let parsed: TokenResponse = serde_json::from_slice(body).map_err(|e| FetchError::Decode {
        reason: e.to_string(),
    })?;

    let pair = match parsed.pairs.into_iter().flatten().next().or(parsed.pair) {
        Some(pair) => pair,
        None => return Ok(QuoteSnapshot::empty()),
    };

    let value = pair
        .price_usd
        .as_ref()
        .or(pair.price.as_ref())
        .and_then(Numeric::as_f64);
    let change = pair
        .price_change
        .as_ref()
        .and_then(|c| c.h24.as_ref())
        .or(pair.price_change_h24.as_ref())
        .and_then(Numeric::as_f64);
    let fdv = pair.fdv.as_ref().and_then(Numeric::as_f64);

    let mut snap = match value {
        Some(v) => QuoteSnapshot::new(v, "dexscreener"),
        None => QuoteSnapshot::empty(),
    };
    snap.change_24h = change;
    snap.fdv = fdv;
    Ok(snap)
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    pairs: Option<Vec<PairBody>>,
    pair: Option<PairBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PairBody {
    price_usd: Option<Numeric>,
    price: Option<Numeric>,
    price_change: Option<PriceChange>,
    price_change_h24: Option<Numeric>,
    fdv: Option<Numeric>,
}

#[derive(Debug, Deserialize)]
struct PriceChange {
    h24: Option<Numeric>,
}

/// Aggregator numbers arrive as JSON numbers or decimal strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Num(f64),
    Text(String),
}

impl Numeric {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Numeric::Num(n) => Some(*n),
            Numeric::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::transport::{HttpResponse, TransportError};
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Fixed {
        status: u16,
        body: &'static str,
        calls: AtomicU32,
    }

    impl Fixed {
        fn new(status: u16, body: &'static str) -> Self {
            Self {
                status,
                body,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl Transport for Fixed {
        async fn get(&self, _url: &str) -> Result<HttpResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(HttpResponse {
                status: self.status,
                body: self.body.as_bytes().to_vec(),
            })
        }
    }

    #[tokio::test]
    async fn test_decodes_string_price_from_pairs_list() {
        let transport = Arc::new(Fixed::new(
            200,
            r#"{"pairs":[{"priceUsd":"1.2345","priceChange":{"h24":-2.5},"fdv":123000}]}"#,
        ));
        let source = DexSource::with_transport(
            DexConfig::for_contract("0x50f88fe97f72cd3e75b9eb4f747f59bceba80d59"),
            transport.clone(),
        );

        let snap = source.fetch(FetchContext::detached()).await.unwrap();
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert!((snap.value.unwrap() - 1.2345).abs() < 1e-9);
        assert_eq!(snap.change_24h, Some(-2.5));
        assert_eq!(snap.fdv, Some(123_000.0));
        assert_eq!(snap.source.as_deref(), Some("dexscreener"));
    }

    #[tokio::test]
    async fn test_singular_pair_and_fallback_fields() {
        let transport = Arc::new(Fixed::new(
            200,
            r#"{"pair":{"price":"0.5","priceChangeH24":"3.1"}}"#,
        ));
        let source = DexSource::with_transport(DexConfig::for_contract("0xabc"), transport);

        let snap = source.fetch(FetchContext::detached()).await.unwrap();
        assert_eq!(snap.value, Some(0.5));
        assert_eq!(snap.change_24h, Some(3.1));
        assert_eq!(snap.fdv, None);
    }

    #[tokio::test]
    async fn test_no_pair_is_empty_not_error() {
        let transport = Arc::new(Fixed::new(200, r#"{"pairs":[]}"#));
        let source = DexSource::with_transport(DexConfig::for_contract("0xabc"), transport);

        let snap = source.fetch(FetchContext::detached()).await.unwrap();
        assert!(snap.is_empty());
        assert!(snap.source.is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_decode_error() {
        let transport = Arc::new(Fixed::new(200, "not json"));
        let source = DexSource::with_transport(DexConfig::for_contract("0xabc"), transport);

        let err = source.fetch(FetchContext::detached()).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_unconfigured_short_circuits_without_network() {
        let transport = Arc::new(Fixed::new(200, "{}"));
        let source = DexSource::with_transport(DexConfig::default(), transport.clone());

        let err = source.fetch(FetchContext::detached()).await.unwrap_err();
        assert_eq!(err, FetchError::Unconfigured);
        let err = source.fetch(FetchContext::detached()).await.unwrap_err();
        assert_eq!(err, FetchError::Unconfigured);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fatal_status_propagates() {
        let transport = Arc::new(Fixed::new(404, ""));
        let source = DexSource::with_transport(DexConfig::for_contract("0xabc"), transport.clone());

        let err = source.fetch(FetchContext::detached()).await.unwrap_err();
        assert_eq!(err, FetchError::FatalHttp { status: 404 });
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_endpoint_joins_base_and_contract() {
        let source = DexSource::with_transport(
            DexConfig {
                base_url: "https://api.dexscreener.com/latest/dex/".into(),
                contract_address: "0xabc".into(),
            },
            Arc::new(Fixed::new(200, "{}")),
        );
        assert_eq!(
            source.endpoint(),
            "https://api.dexscreener.com/latest/dex/tokens/0xabc"
        );
    }

    #[test]
    fn test_unparseable_price_string_yields_no_value() {
        let snap = decode_body(br#"{"pairs":[{"priceUsd":"n/a"}]}"#).unwrap();
        assert!(snap.value.is_none());
    }
}
