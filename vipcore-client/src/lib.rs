//! Client for the vip-core library rules and agency information service.
//!
//! Calls are JSON POSTs through a retrying [`Transport`]; results are cached
//! per client with a fixed time to live.
//!
//! ```no_run
//! use vipcore_client::{LibraryRulesClient, Rule, VipCoreConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = VipCoreConfig::from_env()?;
//! let rules = LibraryRulesClient::open(&config)?;
//!
//! if rules.has_feature("010100", Rule::CreateEnrichments).await? {
//!     let agencies = rules.find_agencies_by_rule(Rule::UseEnrichments, true).await?;
//!     println!("{} agencies use enrichments", agencies.len());
//! }
//! rules.close();
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod library_rules;
pub mod models;
pub mod response;
pub mod rule;
pub mod service;
pub mod transport;

pub use config::{ConfigError, VipCoreConfig};
pub use error::{ApplicationError, VipCoreError, VipCoreResult};
pub use library_rules::LibraryRulesClient;
pub use models::{
    BranchName, ErrorMessage, Information, LibraryRule, LibraryRuleSet, LibraryRulesRequest,
    LibraryRulesResponse, RuleValue, ServiceRequest, ServiceResponse,
};
pub use response::read_response;
pub use rule::Rule;
pub use service::ServiceClient;
pub use transport::{RawResponse, TimingLogLevel, Transport};
pub use vipcore_common::{HttpConfig, RetryConfig, TransportError};
