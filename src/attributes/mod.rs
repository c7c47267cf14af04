//! Attribute write pipeline
//!
//! Validate → resolve → build → dispatch → format, in one pass. Every step
//! short-circuits, so nothing reaches the transport unless the body was valid
//! and the device resolved.
//!
//! A `"success"` result means the transport queued the write. It is not a
//! device acknowledgment; the device may still never apply the value.

mod dispatch;
mod request;
mod response;

use std::sync::Arc;

pub use dispatch::WriteDispatcher;
pub use request::{AttributeWriteRequest, parse_request};
pub use response::{
    ApiError, ErrorCode, InvalidValueStatus, ResponseItem, ResponsePolicy, WriteResponse,
    WriteStatus,
};

use crate::devices::DeviceRegistry;
use crate::transport::{AttributeTransport, DispatchOutcome};
use crate::zcl::{BASIC_MANUFACTURER_U8, CommandFamily};

/// Runs attribute writes against an injected registry and transport
#[derive(Clone)]
pub struct AttributeWriter {
    registry: Arc<dyn DeviceRegistry>,
    dispatcher: WriteDispatcher,
    family: CommandFamily,
    policy: ResponsePolicy,
}

impl AttributeWriter {
    /// Create a writer for the Basic-cluster manufacturer u8 family
    #[must_use]
    pub fn new(registry: Arc<dyn DeviceRegistry>, transport: Arc<dyn AttributeTransport>) -> Self {
        Self {
            registry,
            dispatcher: WriteDispatcher::new(transport),
            family: BASIC_MANUFACTURER_U8,
            policy: ResponsePolicy::default(),
        }
    }

    /// Override response formatting
    #[must_use]
    pub fn with_policy(mut self, policy: ResponsePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Response formatting in effect
    #[must_use]
    pub const fn policy(&self) -> &ResponsePolicy {
        &self.policy
    }

    /// Handle one write request for the device named in the path
    #[must_use]
    pub fn write(&self, external_id: &str, body: &[u8]) -> WriteResponse {
        let result = self.run(external_id, body);
        if let Err(error) = &result {
            tracing::debug!(
                id = %external_id,
                code = ?error.code,
                description = %error.description,
                "attribute write refused"
            );
        }
        WriteResponse::format(result, &self.policy)
    }

    fn run(&self, external_id: &str, body: &[u8]) -> Result<DispatchOutcome, ApiError> {
        let request = parse_request(external_id, body)?;
        let device = self
            .registry
            .resolve(&request.external_id)
            .ok_or_else(|| ApiError::not_found(external_id))?;
        let command = self.family.build(&request);
        Ok(self.dispatcher.dispatch(&device, &command))
    }
}
