//! Agency information queries with TTL caching.

use crate::config::VipCoreConfig;
use crate::error::{ApplicationError, VipCoreResult};
use crate::models::{Information, ServiceRequest, ServiceResponse};
use crate::transport::Transport;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use vipcore_common::{CacheMetrics, TtlCache};

const SERVICE_PATH: &str = "1.0/api/service";
const INFORMATION: &str = "information";

/// Client for the vip-core `service` endpoint.
#[derive(Debug)]
pub struct ServiceClient {
    transport: Arc<Transport>,
    information: TtlCache<Arc<Information>>,
}

impl ServiceClient {
    /// Open a client with its own transport.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client cannot be built.
    pub fn open(config: &VipCoreConfig) -> VipCoreResult<Self> {
        let transport = Transport::new(config)?;
        Ok(Self::new(Arc::new(transport), config.cache_ttl))
    }

    /// Create a client on a shared transport.
    #[must_use]
    pub fn new(transport: Arc<Transport>, cache_ttl: Duration) -> Self {
        Self {
            transport,
            information: TtlCache::new("vipcore_information", cache_ttl),
        }
    }

    /// Fetch the information record of an agency.
    ///
    /// # Errors
    ///
    /// Transport and application errors; a response without an
    /// `information` record is [`ApplicationError::Decode`].
    pub async fn get_information(&self, agency_id: &str) -> VipCoreResult<Arc<Information>> {
        self.fetch_information(agency_id, None).await
    }

    /// Same as [`ServiceClient::get_information`], sending a tracking id.
    ///
    /// A cached record is returned without a call.
    ///
    /// # Errors
    ///
    /// Same as [`ServiceClient::get_information`].
    pub async fn get_information_with_tracking_id(
        &self,
        agency_id: &str,
        tracking_id: &str,
    ) -> VipCoreResult<Arc<Information>> {
        self.fetch_information(agency_id, Some(tracking_id)).await
    }

    async fn fetch_information(
        &self,
        agency_id: &str,
        tracking_id: Option<&str>,
    ) -> VipCoreResult<Arc<Information>> {
        let key = format!("{INFORMATION}_{agency_id}");
        if let Some(information) = self.information.get(&key) {
            debug!(agency_id, "Information cache hit");
            return Ok(information);
        }

        let request = ServiceRequest {
            agency_id: agency_id.to_string(),
            service: INFORMATION.to_string(),
            tracking_id: tracking_id.map(str::to_string),
        };
        let response: ServiceResponse = self.transport.post(SERVICE_PATH, &request).await?;

        let information = response
            .information
            .map(Arc::new)
            .ok_or_else(|| ApplicationError::decode("ServiceResponse", "missing information"))?;

        self.information.put(key, Arc::clone(&information));
        Ok(information)
    }

    /// Metrics of the information cache.
    #[must_use]
    pub const fn cache_metrics(&self) -> &CacheMetrics {
        self.information.metrics()
    }

    /// Release the underlying transport.
    pub fn close(&self) {
        self.transport.close();
    }
}
