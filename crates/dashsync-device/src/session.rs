//! HttpDeviceSession - IDeviceSession implementation over HTTPS
//!
//! Only [`HttpDeviceConnector`](crate::HttpDeviceConnector) creates sessions,
//! and only after a successful liveness probe.

use dashsync_core::domain::Endpoint;
use dashsync_core::ports::{DeviceReply, IDeviceSession, TransportError};

use crate::client::DeviceClient;
use crate::DeviceError;

/// A liveness-checked device session
#[derive(Debug)]
pub struct HttpDeviceSession {
    client: DeviceClient,
}

impl HttpDeviceSession {
    pub(crate) fn new(client: DeviceClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl IDeviceSession for HttpDeviceSession {
    fn endpoint(&self) -> &Endpoint {
        self.client.endpoint()
    }

    async fn put(
        &mut self,
        remote_path: &str,
        content: Vec<u8>,
    ) -> Result<DeviceReply, TransportError> {
        match self.client.put_web_file(remote_path, content).await {
            Ok((status, body)) => Ok(DeviceReply { status, body }),
            Err(DeviceError::Timeout(after)) => Err(TransportError::Timeout(after)),
            Err(e) => Err(TransportError::Network(e.to_string())),
        }
    }
}
