use std::future::Future;
use std::sync::Arc;

use chainfetch_core::{
    orats_provider, ExecutionMode, FetchErrorKind, NoopHttpClient, OratsConfig, Provider,
    ProviderRegistry, QueryParams,
};
use serde_json::{json, Value};

#[derive(Clone)]
struct ProviderCase {
    provider: Provider,
    fetchers: Vec<&'static str>,
}

fn provider_cases() -> Vec<ProviderCase> {
    vec![
        ProviderCase {
            provider: orats_provider(OratsConfig::default(), Arc::new(NoopHttpClient)),
            fetchers: vec!["Tickers"],
        },
        ProviderCase {
            provider: orats_provider(
                OratsConfig::default().with_execution(ExecutionMode::Sequential),
                Arc::new(NoopHttpClient),
            ),
            fetchers: vec!["Tickers"],
        },
    ]
}

fn params(value: Value) -> QueryParams {
    match value {
        Value::Object(map) => map,
        _ => panic!("query params fixture must be an object"),
    }
}

#[test]
fn providers_declare_metadata_and_fetchers() {
    for case in provider_cases() {
        let provider = &case.provider;
        assert!(!provider.name().is_empty(), "provider name must be set");
        assert!(
            !provider.description().is_empty(),
            "provider '{}': description",
            provider.name()
        );
        assert!(
            !provider.credentials().is_empty(),
            "provider '{}': credential keys",
            provider.name()
        );
        assert_eq!(provider.fetcher_names(), case.fetchers);

        for fetcher in provider.fetchers() {
            assert_eq!(fetcher.provider(), provider.name());
        }
    }
}

#[test]
fn fetchers_reject_missing_symbol_before_any_request() {
    for case in provider_cases() {
        let registry = ProviderRegistry::new(vec![case.provider.clone()]).expect("registry");

        for name in &case.fetchers {
            let error = block_on(registry.fetch(name, &params(json!({})), None))
                .expect_err("missing symbol must fail");
            assert_eq!(
                error.kind(),
                FetchErrorKind::InvalidQuery,
                "provider '{}' fetcher '{name}'",
                case.provider.name()
            );
        }
    }
}

#[test]
fn fetchers_report_empty_data_for_empty_upstream() {
    for case in provider_cases() {
        let registry = ProviderRegistry::new(vec![case.provider.clone()]).expect("registry");

        for name in &case.fetchers {
            let query = params(json!({ "symbol": "SPY,QQQ" }));
            let error = block_on(registry.fetch(name, &query, None))
                .expect_err("empty upstream must fail");
            assert!(
                error.is_empty_data(),
                "provider '{}' fetcher '{name}': {error}",
                case.provider.name()
            );
        }
    }
}

fn block_on<F>(future: F) -> F::Output
where
    F: Future,
{
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime should build")
        .block_on(future)
}
