//! Library rules queries with TTL caching.
//!
//! Two caches sit in front of the `libraryrules` endpoint: rule sets keyed
//! by agency id, and agency search results keyed by the upper-cased
//! `NAME_VALUE` pairs of the search.

use crate::config::VipCoreConfig;
use crate::error::{ApplicationError, VipCoreResult};
use crate::models::{
    LibraryRule, LibraryRuleSet, LibraryRulesRequest, LibraryRulesResponse, RuleValue,
};
use crate::transport::Transport;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use vipcore_common::{CacheMetrics, TtlCache};

const LIBRARY_RULES_PATH: &str = "1.0/api/libraryrules";

/// Client for the vip-core `libraryrules` endpoint.
#[derive(Debug)]
pub struct LibraryRulesClient {
    transport: Arc<Transport>,
    rule_sets: TtlCache<Arc<LibraryRuleSet>>,
    agencies: TtlCache<Arc<HashSet<String>>>,
}

impl LibraryRulesClient {
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
            rule_sets: TtlCache::new("vipcore_rule_sets", cache_ttl),
            agencies: TtlCache::new("vipcore_agencies_by_rule", cache_ttl),
        }
    }

    /// Fetch the rule set of one agency.
    ///
    /// # Errors
    ///
    /// Transport and application errors, or
    /// [`ApplicationError::NoMatchingAgencyInResponse`] if the response holds
    /// no rules for `agency_id`.
    pub async fn get_rule_set(&self, agency_id: &str) -> VipCoreResult<Arc<LibraryRuleSet>> {
        if let Some(rule_set) = self.rule_sets.get(agency_id) {
            debug!(agency_id, "Rule set cache hit");
            return Ok(rule_set);
        }

        let request = LibraryRulesRequest::for_agency(agency_id);
        let response: LibraryRulesResponse =
            self.transport.post(LIBRARY_RULES_PATH, &request).await?;

        let rule_set = response
            .library_rules
            .unwrap_or_default()
            .into_iter()
            .find(|rule_set| rule_set.agency_id == agency_id)
            .map(Arc::new)
            .ok_or_else(|| ApplicationError::NoMatchingAgencyInResponse {
                agency_id: agency_id.to_string(),
            })?;

        self.rule_sets.put(agency_id, Arc::clone(&rule_set));
        Ok(rule_set)
    }

    /// Fetch the rules of one agency.
    ///
    /// # Errors
    ///
    /// Same as [`LibraryRulesClient::get_rule_set`].
    pub async fn get_library_rules(&self, agency_id: &str) -> VipCoreResult<Vec<LibraryRule>> {
        Ok(self.get_rule_set(agency_id).await?.rules.clone())
    }

    /// Whether the agency has `rule` set to true.
    ///
    /// Missing, false and string-valued rules all count as absent.
    ///
    /// # Errors
    ///
    /// Same as [`LibraryRulesClient::get_rule_set`].
    pub async fn has_feature(&self, agency_id: &str, rule: impl AsRef<str>) -> VipCoreResult<bool> {
        Ok(self.get_rule_set(agency_id).await?.has_feature(rule.as_ref()))
    }

    /// Names of the rules the agency has set to true.
    ///
    /// # Errors
    ///
    /// Same as [`LibraryRulesClient::get_rule_set`].
    pub async fn get_allowed_rules(&self, agency_id: &str) -> VipCoreResult<HashSet<String>> {
        Ok(self.get_rule_set(agency_id).await?.allowed_rules())
    }

    /// Agencies whose `rule` has the given value.
    ///
    /// # Errors
    ///
    /// Transport and application errors.
    pub async fn find_agencies_by_rule(
        &self,
        rule: impl AsRef<str>,
        value: impl Into<RuleValue>,
    ) -> VipCoreResult<Arc<HashSet<String>>> {
        let request = LibraryRulesRequest::matching([LibraryRule::new(rule.as_ref(), value)]);
        self.find_agencies(&request).await
    }

    /// Agencies matching every rule of `request`.
    ///
    /// Nothing matching is an empty set.
    ///
    /// # Errors
    ///
    /// [`ApplicationError::ErrorInRequest`] without a call if `request`
    /// carries no rules; otherwise transport and application errors.
    pub async fn find_agencies(
        &self,
        request: &LibraryRulesRequest,
    ) -> VipCoreResult<Arc<HashSet<String>>> {
        if request.library_rules.is_empty() {
            return Err(ApplicationError::ErrorInRequest.into());
        }

        let key = search_key(&request.library_rules);
        if let Some(agencies) = self.agencies.get(&key) {
            debug!(key = %key, "Agency search cache hit");
            return Ok(agencies);
        }

        let response: LibraryRulesResponse =
            self.transport.post(LIBRARY_RULES_PATH, request).await?;

        let agencies: HashSet<String> = response
            .library_rules
            .unwrap_or_default()
            .into_iter()
            .map(|rule_set| rule_set.agency_id)
            .collect();
        let agencies = Arc::new(agencies);

        self.agencies.put(key, Arc::clone(&agencies));
        Ok(agencies)
    }

    /// Metrics of the rule set cache.
    #[must_use]
    pub const fn rule_set_cache_metrics(&self) -> &CacheMetrics {
        self.rule_sets.metrics()
    }

    /// Metrics of the agency search cache.
    #[must_use]
    pub const fn agency_cache_metrics(&self) -> &CacheMetrics {
        self.agencies.metrics()
    }

    /// Release the underlying transport.
    pub fn close(&self) {
        self.transport.close();
    }
}

/// `NAME_VALUE` pairs upper-cased and joined with `_` in request order.
fn search_key(rules: &[LibraryRule]) -> String {
    rules
        .iter()
        .map(|rule| format!("{}_{}", rule.name, rule.value).to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_key_is_upper_case() {
        assert_eq!(
            search_key(&[LibraryRule::new("use_enrichments", true)]),
            "USE_ENRICHMENTS_TRUE"
        );
        assert_eq!(
            search_key(&[LibraryRule::new("Use_Enrichments", RuleValue::Bool(true))]),
            search_key(&[LibraryRule::new("use_enrichments", true)])
        );
        assert_eq!(
            search_key(&[LibraryRule::new("cataloging_template_set", "fbs")]),
            "CATALOGING_TEMPLATE_SET_FBS"
        );
    }

    #[test]
    fn test_search_key_keeps_request_order() {
        let key = search_key(&[
            LibraryRule::new("use_enrichments", true),
            LibraryRule::new("auth_root", false),
        ]);
        assert_eq!(key, "USE_ENRICHMENTS_TRUE_AUTH_ROOT_FALSE");
    }
}
