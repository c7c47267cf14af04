//! Daemon - the main gateway service
//!
//! Seeds the device registry, attaches transport queues and serves the API

use std::sync::Arc;

use crate::api::ApiServerBuilder;
use crate::attributes::AttributeWriter;
use crate::devices::SensorRegistry;
use crate::transport::{FrameSink, LogSink, QueueTransport, RetryPolicy};
use crate::{Config, Error, Result};

/// The gateway daemon
pub struct Daemon {
    config: Config,
    registry: Arc<SensorRegistry>,
    transport: Arc<QueueTransport>,
}

impl Daemon {
    /// Create a daemon that transmits through the logging sink
    ///
    /// # Errors
    ///
    /// Returns error if a configured device cannot be registered
    pub fn new(config: Config) -> Result<Self> {
        Self::with_sink(config, Arc::new(LogSink))
    }

    /// Create a daemon feeding frames to `sink`
    ///
    /// # Errors
    ///
    /// Returns error if a configured device cannot be registered
    pub fn with_sink(config: Config, sink: Arc<dyn FrameSink>) -> Result<Self> {
        let registry = Arc::new(SensorRegistry::new());

        // Explicit ids claim their slots before any id is generated
        let (explicit, generated): (Vec<_>, Vec<_>) = config
            .devices
            .iter()
            .cloned()
            .partition(|registration| registration.id.is_some());
        for registration in explicit.into_iter().chain(generated) {
            let device = registry.register(registration)?;
            tracing::info!(
                device_id = %device.id,
                unique_id = %device.unique_id(),
                nwk = device.nwk,
                "device registered"
            );
        }

        let retry = RetryPolicy {
            max_retries: config.transport.max_retries,
            ..RetryPolicy::default()
        };
        let transport = Arc::new(
            QueueTransport::new(sink, config.transport.queue_capacity).with_retry(retry),
        );

        Ok(Self {
            config,
            registry,
            transport,
        })
    }

    /// Registry seeded from configuration
    #[must_use]
    pub const fn registry(&self) -> &Arc<SensorRegistry> {
        &self.registry
    }

    /// Run until interrupted
    ///
    /// # Errors
    ///
    /// Returns error if the API server fails
    pub async fn run(self) -> Result<()> {
        let workers: Vec<_> = self
            .registry
            .list()
            .iter()
            .map(|device| self.transport.attach(device))
            .collect();

        let writer = AttributeWriter::new(self.registry.clone(), self.transport.clone())
            .with_policy(self.config.responses);

        let server = ApiServerBuilder::new(writer, self.config.api_server.port)
            .api_keys(self.config.api_server.api_keys.clone())
            .build()
            .spawn();

        tracing::info!(devices = self.registry.len(), "attribute gateway ready");

        let result = tokio::select! {
            joined = server => match joined {
                Ok(result) => result,
                Err(e) => Err(Error::Server(format!("API server task failed: {e}"))),
            },
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    tracing::warn!(error = %e, "failed to listen for shutdown signal");
                }
                tracing::info!("shutdown requested");
                Ok(())
            }
        };

        for worker in workers {
            worker.abort();
        }
        result
    }
}
