use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::macros::format_description;
use time::Date;

use crate::config::OratsConfig;
use crate::fetcher::Fetcher;
use crate::http_client::{HttpClient, HttpRequest};
use crate::normalizer::{take_str, FetchRecord};
use crate::pipeline::FetcherPipeline;
use crate::provider::Provider;
use crate::query::{OptionsChainsQuery, QueryParams};
use crate::transport::transport_for;
use crate::{Credentials, ValidationError};

pub const ORATS_PROVIDER: &str = "ORATS";
pub const TICKERS_FETCHER: &str = "Tickers";

/// Builds the ORATS provider definition with its tickers fetcher.
pub fn orats_provider(config: OratsConfig, http_client: Arc<dyn HttpClient>) -> Provider {
    let transport = transport_for(config.execution, http_client);
    let credential_key = config.credential_key.clone();
    let tickers = FetcherPipeline::new(OratsTickersFetcher::new(config), transport);

    Provider::new(ORATS_PROVIDER, "Data provider for ORATS.")
        .with_website("https://orats.com")
        .with_credential(credential_key)
        .with_fetcher(Arc::new(tickers))
}

/// Fetcher for the ORATS `/datav2/tickers` endpoint: the date range of
/// option-chain history available per ticker.
#[derive(Debug, Clone, Default)]
pub struct OratsTickersFetcher {
    config: OratsConfig,
}

impl OratsTickersFetcher {
    pub fn new(config: OratsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OratsConfig {
        &self.config
    }
}

impl Fetcher for OratsTickersFetcher {
    type Query = OptionsChainsQuery;
    type Record = TickerRecord;

    fn provider(&self) -> &str {
        ORATS_PROVIDER
    }

    fn name(&self) -> &str {
        TICKERS_FETCHER
    }

    fn transform_query(&self, params: &QueryParams) -> Result<Self::Query, ValidationError> {
        OptionsChainsQuery::from_params(params)
    }

    fn build_requests(
        &self,
        query: &Self::Query,
        credentials: Option<&Credentials>,
    ) -> Vec<HttpRequest> {
        let token = Credentials::token_or_empty(credentials, &self.config.credential_key);
        let token = urlencoding::encode(&token);

        query
            .symbols()
            .iter()
            .map(|symbol| {
                let url = format!(
                    "{}?token={token}&ticker={}",
                    self.config.base_url,
                    urlencoding::encode(symbol.as_str())
                );
                HttpRequest::get(url)
                    .with_header("accept", "application/json")
                    .with_timeout_ms(self.config.timeout_ms)
            })
            .collect()
    }
}

/// Available history window for one ticker.
///
/// Fields other than `ticker`, `min` and `max` are passed through in
/// `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerRecord {
    /// Ticker symbol.
    pub ticker: String,
    /// First date with data, `YYYY-MM-DD`.
    pub min: String,
    /// Last date with data, `YYYY-MM-DD`.
    pub max: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TickerRecord {
    pub fn min_date(&self) -> Result<Date, ValidationError> {
        parse_date(&self.min)
    }

    pub fn max_date(&self) -> Result<Date, ValidationError> {
        parse_date(&self.max)
    }
}

impl FetchRecord for TickerRecord {
    fn from_raw(mut raw: Map<String, Value>) -> Result<Self, ValidationError> {
        Ok(Self {
            ticker: take_str(&mut raw, "ticker")?,
            min: take_str(&mut raw, "min")?,
            max: take_str(&mut raw, "max")?,
            extra: raw,
        })
    }
}

fn parse_date(value: &str) -> Result<Date, ValidationError> {
    Date::parse(value, format_description!("[year]-[month]-[day]")).map_err(|_| {
        ValidationError::InvalidDate {
            value: value.to_owned(),
        }
    })
}
