//! Hand-off from the synchronous pipeline to the asynchronous transport

use std::sync::Arc;

use crate::devices::DeviceHandle;
use crate::transport::{AttributeTransport, DispatchOutcome};
use crate::zcl::AttributeWriteCommand;

/// Submits write commands and reports the local outcome
///
/// Returns as soon as the transport accepts or refuses the command. There is
/// no retry here and no waiting for the device; a refusal is an ordinary
/// outcome, not an error.
#[derive(Clone)]
pub struct WriteDispatcher {
    transport: Arc<dyn AttributeTransport>,
}

impl WriteDispatcher {
    /// Create a dispatcher over `transport`
    #[must_use]
    pub fn new(transport: Arc<dyn AttributeTransport>) -> Self {
        Self { transport }
    }

    /// Submit one command for the resolved device
    #[must_use]
    pub fn dispatch(
        &self,
        device: &DeviceHandle,
        command: &AttributeWriteCommand,
    ) -> DispatchOutcome {
        let outcome = self.transport.submit_write(device, command);
        match outcome {
            DispatchOutcome::Accepted => tracing::info!(
                device_id = %device.id,
                attribute_id = command.attribute_id,
                value = command.value,
                "attribute write queued"
            ),
            DispatchOutcome::Rejected(reason) => tracing::warn!(
                device_id = %device.id,
                attribute_id = command.attribute_id,
                %reason,
                "attribute write rejected by transport"
            ),
        }
        outcome
    }
}
