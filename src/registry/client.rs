//! Eureka REST client.
//!
//! Owned by `main`: constructed from config, started after the HTTP listener is
//! up and stopped during shutdown. Background heartbeat and registry fetch
//! loops run until [`RegistryClient::stop`] cancels them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use reqwest::{Client, Response, StatusCode};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn, Instrument};

use super::instance::{ApplicationsResponse, InstanceInfo, RegistrationRequest};
use crate::config::RegistryConfig;
use crate::errors::{Error, Result};
use crate::observability::metrics::record_registry_request;

/// Result of a single heartbeat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heartbeat {
    Renewed,
    /// The registry no longer knows this instance
    Unknown,
}

pub struct RegistryClient {
    shared: Arc<Shared>,
    cancel: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

struct Shared {
    config: RegistryConfig,
    http: Client,
    instance: InstanceInfo,
    cache: RwLock<HashMap<String, Vec<InstanceInfo>>>,
    registered: AtomicBool,
}

impl RegistryClient {
    pub fn new(config: RegistryConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| Error::config(format!("Failed to build registry HTTP client: {}", e)))?;
        let instance = InstanceInfo::from_config(&config);

        Ok(Self {
            shared: Arc::new(Shared {
                config,
                http,
                instance,
                cache: RwLock::new(HashMap::new()),
                registered: AtomicBool::new(false),
            }),
            cancel: CancellationToken::new(),
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// Instance advertised to the registry
    pub fn instance(&self) -> &InstanceInfo {
        &self.shared.instance
    }

    pub fn is_registered(&self) -> bool {
        self.shared.registered.load(Ordering::SeqCst)
    }

    /// Register (with retries) and launch the background loops.
    ///
    /// A no-op when the registry is disabled or the client already started.
    pub async fn start(&self) -> Result<()> {
        let config = &self.shared.config;
        if !config.enabled {
            debug!("Service registry disabled");
            return Ok(());
        }

        let mut tasks = self.tasks.lock().await;
        if self.cancel.is_cancelled() {
            return Err(Error::registry("Registry client was stopped", None));
        }
        if !tasks.is_empty() {
            return Ok(());
        }

        if config.register_with_registry {
            self.shared.register_with_retry(&self.cancel).await?;
            let shared = self.shared.clone();
            let cancel = self.cancel.clone();
            tasks.push(tokio::spawn(heartbeat_loop(shared, cancel)));
        }

        if config.fetch_registry {
            if let Err(e) = self.shared.fetch_registry().await {
                warn!(error = %e, "Initial registry fetch failed");
            }
            let shared = self.shared.clone();
            let cancel = self.cancel.clone();
            tasks.push(tokio::spawn(fetch_loop(shared, cancel)));
        }

        info!(
            app = %self.shared.instance.app,
            instance_id = %self.shared.instance.instance_id,
            registry = %config.base_url(),
            "Service registry client started"
        );
        Ok(())
    }

    /// Cancel background loops and deregister. Safe to call more than once.
    pub async fn stop(&self) {
        self.cancel.cancel();

        let tasks = std::mem::take(&mut *self.tasks.lock().await);
        for task in tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "Registry background task ended abnormally");
            }
        }

        if self.shared.registered.swap(false, Ordering::SeqCst) {
            match self.shared.deregister().await {
                Ok(()) => info!(
                    instance_id = %self.shared.instance.instance_id,
                    "Deregistered from service registry"
                ),
                Err(e) => warn!(error = %e, "Failed to deregister from service registry"),
            }
        }
    }

    /// Register once, without retries
    pub async fn register(&self) -> Result<()> {
        self.shared.register().await
    }

    /// Send one heartbeat
    pub async fn heartbeat(&self) -> Result<Heartbeat> {
        self.shared.heartbeat().await
    }

    /// Refresh the local registry cache; returns the number of instances seen
    pub async fn fetch_registry(&self) -> Result<usize> {
        self.shared.fetch_registry().await
    }

    /// Cached instances of `app` (case-insensitive)
    pub async fn instances(&self, app: &str) -> Vec<InstanceInfo> {
        self.shared.cache.read().await.get(&app.to_uppercase()).cloned().unwrap_or_default()
    }
}

impl Shared {
    fn app_url(&self) -> String {
        format!("{}/apps/{}", self.config.base_url(), self.instance.app)
    }

    fn instance_url(&self) -> String {
        format!("{}/{}", self.app_url(), self.instance.instance_id)
    }

    async fn register(&self) -> Result<()> {
        let span = crate::registry_span!("register", self.instance.app);
        let result = self.send_registration().instrument(span).await;

        record_registry_request("register", result.is_ok());
        if result.is_ok() {
            self.registered.store(true, Ordering::SeqCst);
        }
        result
    }

    async fn register_with_retry(&self, cancel: &CancellationToken) -> Result<()> {
        let mut attempt: u32 = 0;
        loop {
            let err = match self.register().await {
                Ok(()) => {
                    info!(
                        app = %self.instance.app,
                        instance_id = %self.instance.instance_id,
                        attempts = attempt + 1,
                        "Registered with service registry"
                    );
                    return Ok(());
                }
                Err(err) => err,
            };

            let exhausted =
                self.config.max_retries.is_some_and(|max| attempt + 1 >= max.max(1));
            if exhausted || !err.is_retryable() {
                return Err(err);
            }

            let delay = self.config.retry_backoff(attempt);
            warn!(
                error = %err,
                attempt = attempt + 1,
                retry_in_ms = delay.as_millis() as u64,
                "Registration failed, retrying"
            );

            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(Error::registry("Registration cancelled", None));
                }
                _ = tokio::time::sleep(delay) => {}
            }
            attempt = attempt.saturating_add(1);
        }
    }

    async fn heartbeat(&self) -> Result<Heartbeat> {
        let span = crate::registry_span!("heartbeat", self.instance.app);
        let result = self.send_heartbeat().instrument(span).await;

        record_registry_request("heartbeat", matches!(result, Ok(Heartbeat::Renewed)));
        result
    }

    async fn deregister(&self) -> Result<()> {
        let span = crate::registry_span!("deregister", self.instance.app);
        let result = self.send_deregistration().instrument(span).await;

        record_registry_request("deregister", result.is_ok());
        result
    }

    async fn fetch_registry(&self) -> Result<usize> {
        let span = crate::registry_span!("fetch", self.instance.app);
        let result = self.refresh_cache().instrument(span).await;

        record_registry_request("fetch", result.is_ok());
        result
    }

    async fn send_registration(&self) -> Result<()> {
        let response = self
            .http
            .post(self.app_url())
            .json(&RegistrationRequest { instance: &self.instance })
            .send()
            .await?;
        check(response, "register").await?;
        Ok(())
    }

    async fn send_heartbeat(&self) -> Result<Heartbeat> {
        let response = self.http.put(self.instance_url()).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Heartbeat::Unknown);
        }
        check(response, "heartbeat").await?;
        Ok(Heartbeat::Renewed)
    }

    async fn send_deregistration(&self) -> Result<()> {
        let response = self.http.delete(self.instance_url()).send().await?;
        check(response, "deregister").await?;
        Ok(())
    }

    async fn refresh_cache(&self) -> Result<usize> {
        let url = format!("{}/apps", self.config.base_url());
        let response = self
            .http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let body: ApplicationsResponse = check(response, "fetch").await?.json().await?;

        let mut cache = HashMap::new();
        let mut total = 0;
        for application in body.applications.application {
            total += application.instance.len();
            cache.insert(application.name.to_uppercase(), application.instance);
        }
        *self.cache.write().await = cache;

        debug!(instances = total, "Registry cache refreshed");
        Ok(total)
    }
}

/// Turn a non-success registry answer into [`Error::Registry`]
async fn check(response: Response, operation: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::registry(
        format!("{} returned {}: {}", operation, status, body.trim()),
        Some(status.as_u16()),
    ))
}

async fn heartbeat_loop(shared: Arc<Shared>, cancel: CancellationToken) {
    let mut ticker = interval(shared.config.heartbeat_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // first tick completes immediately; registration just happened
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        match shared.heartbeat().await {
            Ok(Heartbeat::Renewed) => {}
            Ok(Heartbeat::Unknown) => {
                warn!("Registry lost this instance, registering again");
                shared.registered.store(false, Ordering::SeqCst);
                if let Err(e) = shared.register().await {
                    warn!(error = %e, "Re-registration failed");
                }
            }
            Err(e) => warn!(error = %e, "Heartbeat failed"),
        }
    }
    debug!("Heartbeat loop stopped");
}

async fn fetch_loop(shared: Arc<Shared>, cancel: CancellationToken) {
    let mut ticker = interval(shared.config.registry_fetch_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        if let Err(e) = shared.fetch_registry().await {
            warn!(error = %e, "Registry fetch failed");
        }
    }
    debug!("Registry fetch loop stopped");
}
