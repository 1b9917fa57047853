//! Queries must overlap their asynchronous work.
//!
//! The collaborators below block until a sibling call signals them, so a
//! query that awaits loads or the external provider one after another never
//! finishes and trips the timeout.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use module_config::{
    BoxError, ConfigFactory, ConfigService, Criterion, DependencyLoader, Environment,
    ExternalProvider, PrioritizedConfig, Rule, Selector,
};
use serde_json::{Value, json};
use tokio::sync::Notify;
use tokio::time::timeout;

const DEADLINE: Duration = Duration::from_secs(2);

#[derive(Clone, Default)]
struct Gates {
    fast_loaded: Arc<Notify>,
    loader_entered: Arc<Notify>,
    provider_entered: Arc<Notify>,
}

/// `slow` only completes after `fast` has been loaded.
struct GatedLoader {
    gates: Gates,
    wait_for_provider: bool,
}

#[async_trait]
impl DependencyLoader for GatedLoader {
    async fn load(&self, id: &str) -> Result<Value, BoxError> {
        match id {
            "fast" => {
                self.gates.fast_loaded.notify_one();
                Ok(json!(1))
            }
            "slow" => {
                self.gates.fast_loaded.notified().await;
                Ok(json!(2))
            }
            "local" => {
                self.gates.loader_entered.notify_one();
                if self.wait_for_provider {
                    self.gates.provider_entered.notified().await;
                }
                Ok(json!("local"))
            }
            other => Err(format!("unknown dependency '{other}'").into()),
        }
    }
}

/// Answers only once the loader has been entered.
struct GatedProvider {
    gates: Gates,
}

#[async_trait]
impl ExternalProvider for GatedProvider {
    async fn select_external(
        &self,
        _module_id: &str,
    ) -> Result<Option<Vec<PrioritizedConfig>>, BoxError> {
        self.gates.provider_entered.notify_one();
        self.gates.loader_entered.notified().await;
        Ok(Some(vec![PrioritizedConfig::new(1, json!({"ext": true}))]))
    }
}

fn service(gates: &Gates, with_provider: bool) -> ConfigService {
    let env = Environment::builder().application("app1").build();
    let builder = ConfigService::builder(env).dependency_loader(GatedLoader {
        gates: gates.clone(),
        wait_for_provider: with_provider,
    });
    if with_provider {
        builder
            .external_provider(GatedProvider {
                gates: gates.clone(),
            })
            .build()
    } else {
        builder.build()
    }
}

#[tokio::test]
async fn dependencies_load_concurrently_and_keep_declared_order() -> Result<()> {
    let gates = Gates::default();
    let mut service = service(&gates, false);
    service.add_rule(
        Rule::new(
            Selector::module("m"),
            ConfigFactory::new(["slow", "fast"], |values| Ok(json!({ "v": values }))),
        ),
        None,
    )?;

    let config = timeout(DEADLINE, service.select("m", None)).await??;
    assert_eq!(config, json!({"v": [2, 1]}));
    Ok(())
}

#[tokio::test]
async fn completion_order_does_not_change_merge_order() -> Result<()> {
    let gates = Gates::default();
    let mut service = service(&gates, false);
    service.add_rule(
        Rule::new(
            Selector::module("m").with(Criterion::Application, "app1"),
            ConfigFactory::new(["fast"], |_| Ok(json!({"v": "specific"}))),
        ),
        None,
    )?;
    service.add_rule(
        Rule::new(
            Selector::module("m"),
            ConfigFactory::new(["slow"], |_| Ok(json!({"v": "generic", "g": true}))),
        ),
        None,
    )?;

    let config = timeout(DEADLINE, service.select("m", None)).await??;
    assert_eq!(config, json!({"v": "specific", "g": true}));
    Ok(())
}

#[tokio::test]
async fn external_fetch_overlaps_local_resolution() -> Result<()> {
    let gates = Gates::default();
    let mut service = service(&gates, true);
    service.add_rule(
        Rule::new(
            Selector::module("m"),
            ConfigFactory::new(["slow", "local", "fast"], |values| Ok(json!({ "v": values }))),
        ),
        None,
    )?;

    let config = timeout(DEADLINE, service.select("m", None)).await??;
    assert_eq!(config, json!({"ext": true, "v": [2, "local", 1]}));
    Ok(())
}
