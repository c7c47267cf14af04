//! Per-device bounded queues drained by background tasks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use super::{ApsFrame, AttributeTransport, DispatchOutcome, FrameSink, RejectReason, SinkError};
use crate::devices::{Device, DeviceHandle, IeeeAddress};
use crate::zcl::{self, AttributeWriteCommand};

/// Source endpoint the gateway transmits from
const GATEWAY_ENDPOINT: u8 = 0x01;

/// Default per-device queue depth
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

/// Retry policy for frames the sink reports as busy
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Base delay between retries (doubles each attempt)
    pub base_delay: Duration,
    /// Maximum delay cap
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 1_u32 << attempt.min(16);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Transport that queues frames per device and transmits them in the background
///
/// Frames for one device are drained in submission order by a single task,
/// but callers must not rely on that.
pub struct QueueTransport {
    queues: RwLock<HashMap<IeeeAddress, mpsc::Sender<ApsFrame>>>,
    sink: Arc<dyn FrameSink>,
    capacity: usize,
    retry: RetryPolicy,
    seq: AtomicU8,
}

impl QueueTransport {
    /// Create a transport feeding the given sink
    #[must_use]
    pub fn new(sink: Arc<dyn FrameSink>, capacity: usize) -> Self {
        Self {
            queues: RwLock::new(HashMap::new()),
            sink,
            capacity: capacity.max(1),
            retry: RetryPolicy::default(),
            seq: AtomicU8::new(0),
        }
    }

    /// Override the busy-retry policy
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Attach a queue for the device and spawn its drain task
    ///
    /// Re-attaching replaces the previous queue; the old task exits once its
    /// backlog is drained. Must be called inside a tokio runtime.
    pub fn attach(&self, device: &Device) -> JoinHandle<()> {
        let (tx, rx) = mpsc::channel(self.capacity);
        self.queues.write().insert(device.ieee, tx);

        tracing::debug!(device_id = %device.id, ieee = %device.ieee, "transport queue attached");

        tokio::spawn(drain(
            rx,
            Arc::clone(&self.sink),
            self.retry.clone(),
            device.ieee,
        ))
    }

    /// Detach the device queue; queued frames are still transmitted
    pub fn detach(&self, ieee: IeeeAddress) -> bool {
        self.queues.write().remove(&ieee).is_some()
    }

    fn next_seq(&self) -> u8 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }
}

impl AttributeTransport for QueueTransport {
    fn submit_write(
        &self,
        device: &DeviceHandle,
        command: &AttributeWriteCommand,
    ) -> DispatchOutcome {
        let Some(tx) = self.queues.read().get(&device.ieee).cloned() else {
            return DispatchOutcome::Rejected(RejectReason::UnknownDevice);
        };

        let frame = ApsFrame {
            dst_ieee: device.ieee,
            dst_nwk: device.nwk,
            dst_endpoint: command.endpoint,
            src_endpoint: GATEWAY_ENDPOINT,
            profile_id: zcl::profile::HOME_AUTOMATION,
            cluster_id: command.cluster_id,
            payload: zcl::encode_write_attributes(command, self.next_seq()),
        };

        match tx.try_send(frame) {
            Ok(()) => DispatchOutcome::Accepted,
            Err(TrySendError::Full(_)) => DispatchOutcome::Rejected(RejectReason::QueueFull),
            Err(TrySendError::Closed(_)) => DispatchOutcome::Rejected(RejectReason::LinkDown),
        }
    }
}

/// Drain one device queue into the sink until every sender is gone
async fn drain(
    mut rx: mpsc::Receiver<ApsFrame>,
    sink: Arc<dyn FrameSink>,
    retry: RetryPolicy,
    ieee: IeeeAddress,
) {
    while let Some(frame) = rx.recv().await {
        deliver(sink.as_ref(), &frame, &retry).await;
    }
    tracing::debug!(%ieee, "transport queue closed");
}

async fn deliver(sink: &dyn FrameSink, frame: &ApsFrame, retry: &RetryPolicy) {
    let mut attempt = 0;
    loop {
        match sink.transmit(frame).await {
            Ok(()) => return,
            Err(SinkError::Busy) if attempt < retry.max_retries => {
                tokio::time::sleep(retry.delay_for_attempt(attempt)).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::warn!(ieee = %frame.dst_ieee, error = %e, attempt, "dropping frame");
                return;
            }
        }
    }
}
