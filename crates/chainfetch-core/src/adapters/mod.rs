mod orats;

pub use orats::{
    orats_provider, OratsTickersFetcher, TickerRecord, ORATS_PROVIDER, TICKERS_FETCHER,
};
