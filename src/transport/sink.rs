//! Frame sinks sit at the far end of the device queues

use async_trait::async_trait;
use thiserror::Error;

use super::ApsFrame;

/// Failure reported by a sink for a single frame
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("radio busy")]
    Busy,
    #[error("transmit failed: {0}")]
    Transmit(String),
}

/// Consumer of outbound frames (radio stick, serial bridge, test double)
#[async_trait]
pub trait FrameSink: Send + Sync {
    /// Transmit one frame
    async fn transmit(&self, frame: &ApsFrame) -> Result<(), SinkError>;
}

/// Sink that only logs frames, used when no radio is configured
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl FrameSink for LogSink {
    async fn transmit(&self, frame: &ApsFrame) -> Result<(), SinkError> {
        tracing::info!(
            ieee = %frame.dst_ieee,
            nwk = frame.dst_nwk,
            endpoint = frame.dst_endpoint,
            cluster = frame.cluster_id,
            zcl = %hex::encode(&frame.payload),
            "transmit"
        );
        Ok(())
    }
}
