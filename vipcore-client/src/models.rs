//! vip-core request and response types.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Value of a library rule: a flag or a free-form string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleValue {
    /// Boolean rule
    Bool(bool),
    /// String rule
    String(String),
}

impl RuleValue {
    /// The flag value, if this is a boolean rule.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::String(_) => None,
        }
    }

    /// The string value, if this is a string rule.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Bool(_) => None,
            Self::String(value) => Some(value),
        }
    }
}

impl fmt::Display for RuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
        }
    }
}

impl From<bool> for RuleValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for RuleValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for RuleValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// A named rule with exactly one value.
///
/// Serialized as `{"name": .., "bool": ..}` or `{"name": .., "string": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WireLibraryRule", into = "WireLibraryRule")]
pub struct LibraryRule {
    /// Rule name
    pub name: String,
    /// Rule value
    pub value: RuleValue,
}

impl LibraryRule {
    /// Create a rule.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<RuleValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Whether this is a boolean rule set to true.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        matches!(self.value, RuleValue::Bool(true))
    }
}

#[derive(Serialize, Deserialize)]
struct WireLibraryRule {
    name: String,
    #[serde(default, rename = "bool", skip_serializing_if = "Option::is_none")]
    flag: Option<bool>,
    #[serde(default, rename = "string", skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl TryFrom<WireLibraryRule> for LibraryRule {
    type Error = String;

    fn try_from(wire: WireLibraryRule) -> Result<Self, Self::Error> {
        let value = match (wire.flag, wire.text) {
            (Some(flag), None) => RuleValue::Bool(flag),
            (None, Some(text)) => RuleValue::String(text),
            (Some(_), Some(_)) => {
                return Err(format!(
                    "library rule {} has both a bool and a string value",
                    wire.name
                ));
            }
            (None, None) => return Err(format!("library rule {} has no value", wire.name)),
        };
        Ok(Self {
            name: wire.name,
            value,
        })
    }
}

impl From<LibraryRule> for WireLibraryRule {
    fn from(rule: LibraryRule) -> Self {
        let (flag, text) = match rule.value {
            RuleValue::Bool(flag) => (Some(flag), None),
            RuleValue::String(text) => (None, Some(text)),
        };
        Self {
            name: rule.name,
            flag,
            text,
        }
    }
}

/// The rules of one agency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryRuleSet {
    /// Agency the rules belong to
    pub agency_id: String,
    /// Agency type, e.g. `Folkebibliotek`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency_type: Option<String>,
    /// Rules in service order
    #[serde(default, rename = "libraryRule")]
    pub rules: Vec<LibraryRule>,
}

impl LibraryRuleSet {
    /// Look up a rule by name.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&LibraryRule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    /// Whether some rule with this name is a boolean set to true.
    #[must_use]
    pub fn has_feature(&self, name: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.name == name && rule.is_enabled())
    }

    /// Names of every boolean rule set to true.
    #[must_use]
    pub fn allowed_rules(&self) -> HashSet<String> {
        self.rules
            .iter()
            .filter(|rule| rule.is_enabled())
            .map(|rule| rule.name.clone())
            .collect()
    }
}

/// Body of a `libraryrules` call.
///
/// Carries either an agency id (fetch that agency's rules) or rule
/// predicates (find the agencies matching all of them).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryRulesRequest {
    /// Agency to fetch rules for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency_id: Option<String>,
    /// Rule predicates of an agency search
    #[serde(default, rename = "libraryRule", skip_serializing_if = "Vec::is_empty")]
    pub library_rules: Vec<LibraryRule>,
    /// Caller supplied tracking id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
}

impl LibraryRulesRequest {
    /// Request for all rules of one agency.
    #[must_use]
    pub fn for_agency(agency_id: impl Into<String>) -> Self {
        Self {
            agency_id: Some(agency_id.into()),
            ..Self::default()
        }
    }

    /// Request for the agencies matching every given rule.
    #[must_use]
    pub fn matching(rules: impl IntoIterator<Item = LibraryRule>) -> Self {
        Self {
            library_rules: rules.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Attach a tracking id.
    #[must_use]
    pub fn with_tracking_id(mut self, tracking_id: impl Into<String>) -> Self {
        self.tracking_id = Some(tracking_id.into());
        self
    }
}

/// Response of a `libraryrules` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryRulesResponse {
    /// Matching rule sets; absent when nothing matched
    #[serde(default)]
    pub library_rules: Option<Vec<LibraryRuleSet>>,
    /// Echoed tracking id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
}

/// Body of a `service` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    /// Agency to describe
    pub agency_id: String,
    /// Requested service, e.g. `information`
    pub service: String,
    /// Caller supplied tracking id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
}

/// Response of a `service` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    /// The information record
    #[serde(default)]
    pub information: Option<Information>,
    /// Echoed tracking id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
}

/// Branch name with optional language tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchName {
    /// Name
    pub value: String,
    /// Language of the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Descriptive record of an agency.
///
/// Fields the connector does not name are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Information {
    /// Agency id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency_id: Option<String>,
    /// Agency name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency_name: Option<String>,
    /// Agency type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency_type: Option<String>,
    /// Branch id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    /// Branch name, a single name or one per language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<BranchName>,
    /// Branch phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_phone: Option<String>,
    /// Branch email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_email: Option<String>,
    /// Branch type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_type: Option<String>,
    /// Street address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_address: Option<String>,
    /// Postal code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// City
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// ISIL code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isil: Option<String>,
    /// Kvik flag, `YES` or `NO`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kvik: Option<String>,
    /// Norfri flag, `YES` or `NO`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub norfri: Option<String>,
    /// Request order setting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_order: Option<String>,
    /// Sender address of outgoing mail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    /// Reply-to address of outgoing mail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_email: Option<String>,
    /// Any other field of the record
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Error envelope of a rejected call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    /// Error code
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rule_wire_format() {
        let rule: LibraryRule =
            serde_json::from_value(json!({"name": "auth_root", "bool": true})).unwrap();
        assert_eq!(rule, LibraryRule::new("auth_root", true));

        let rule: LibraryRule =
            serde_json::from_value(json!({"name": "cataloging_template_set", "string": "dbc"}))
                .unwrap();
        assert_eq!(rule.value.as_str(), Some("dbc"));

        assert_eq!(
            serde_json::to_value(LibraryRule::new("cataloging_template_set", "fbs")).unwrap(),
            json!({"name": "cataloging_template_set", "string": "fbs"})
        );
    }

    #[test]
    fn test_rule_needs_exactly_one_value() {
        let neither = serde_json::from_value::<LibraryRule>(json!({"name": "auth_root"}));
        assert!(neither.is_err());

        let both = serde_json::from_value::<LibraryRule>(
            json!({"name": "auth_root", "bool": true, "string": "yes"}),
        );
        assert!(both.is_err());

        let null_string: LibraryRule =
            serde_json::from_value(json!({"name": "auth_root", "bool": false, "string": null}))
                .unwrap();
        assert_eq!(null_string.value, RuleValue::Bool(false));
    }

    #[test]
    fn test_rule_set_queries() {
        let set = LibraryRuleSet {
            agency_id: "010100".to_string(),
            agency_type: Some("Other".to_string()),
            rules: vec![
                LibraryRule::new("create_enrichments", true),
                LibraryRule::new("use_enrichments", false),
                LibraryRule::new("cataloging_template_set", "dbc"),
            ],
        };

        assert!(set.has_feature("create_enrichments"));
        assert!(!set.has_feature("use_enrichments"));
        assert!(!set.has_feature("cataloging_template_set"));
        assert!(!set.has_feature("auth_root"));
        assert_eq!(
            set.allowed_rules(),
            HashSet::from(["create_enrichments".to_string()])
        );
        assert_eq!(
            set.rule("cataloging_template_set").map(|r| &r.value),
            Some(&RuleValue::String("dbc".to_string()))
        );
    }

    #[test]
    fn test_request_shapes() {
        assert_eq!(
            serde_json::to_value(LibraryRulesRequest::for_agency("010100")).unwrap(),
            json!({"agencyId": "010100"})
        );
        assert_eq!(
            serde_json::to_value(
                LibraryRulesRequest::matching([LibraryRule::new("use_enrichments", true)])
                    .with_tracking_id("t-1")
            )
            .unwrap(),
            json!({
                "libraryRule": [{"name": "use_enrichments", "bool": true}],
                "trackingId": "t-1"
            })
        );
    }

    #[test]
    fn test_response_without_rules() {
        let response: LibraryRulesResponse =
            serde_json::from_value(json!({"trackingId": "t-1"})).unwrap();
        assert_eq!(response.library_rules, None);

        let response: LibraryRulesResponse =
            serde_json::from_value(json!({"libraryRules": null})).unwrap();
        assert_eq!(response.library_rules, None);
    }

    #[test]
    fn test_information_keeps_unknown_fields() {
        let info: Information = serde_json::from_value(json!({
            "agencyId": "010100",
            "branchName": {"value": "Dansk BiblioteksCenter"},
            "openingHours": "9-16"
        }))
        .unwrap();

        assert_eq!(info.agency_id.as_deref(), Some("010100"));
        assert_eq!(
            info.branch_name.map(|name| name.value).as_deref(),
            Some("Dansk BiblioteksCenter")
        );
        assert_eq!(info.extra.get("openingHours"), Some(&json!("9-16")));
    }

    #[test]
    fn test_information_named_fields() {
        let info: Information = serde_json::from_value(json!({
            "agencyId": "710100",
            "agencyType": "Folkebibliotek",
            "isil": "DK-710100",
            "kvik": "NO",
            "norfri": "NO",
            "requestOrder": "10100",
            "replyToEmail": "noreply@example.org"
        }))
        .unwrap();

        assert_eq!(info.agency_type.as_deref(), Some("Folkebibliotek"));
        assert_eq!(info.isil.as_deref(), Some("DK-710100"));
        assert_eq!(info.kvik.as_deref(), Some("NO"));
        assert_eq!(info.norfri.as_deref(), Some("NO"));
        assert_eq!(info.request_order.as_deref(), Some("10100"));
        assert_eq!(info.reply_to_email.as_deref(), Some("noreply@example.org"));
        assert!(info.extra.is_empty());
    }
}
