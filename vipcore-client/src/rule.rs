//! Known library rule names.

use std::fmt;

/// Library rules vip-core is known to define.
///
/// Query operations accept any `AsRef<str>`, so rules missing here can still
/// be queried by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// May create enrichment records
    CreateEnrichments,
    /// Shown on bibliotek.dk
    PartOfBibliotekDk,
    /// Takes part in Danbib
    PartOfDanbib,
    /// Uses enrichment records
    UseEnrichments,
    /// Uses the local data stream
    UseLocaldataStream,
    /// Uses holdings items
    UseHoldingsItem,
    /// Root cataloguing rights
    AuthRoot,
    /// May edit subjects of common records
    AuthCommonSubjects,
    /// May edit notes of common records
    AuthCommonNotes,
    /// May edit DBC records
    AuthDbcRecords,
    /// May edit public library common records
    AuthPublicLibCommonRecord,
    /// May edit retro records
    AuthRetRecord,
    /// May edit its own common records
    AuthAgencyCommonRecord,
    /// May export holdings
    AuthExportHoldings,
    /// May create common records
    AuthCreateCommonRecord,
    /// May add DK5 codes to PhD theses
    AuthAddDk5ToPhd,
    /// May edit Metakompas data
    AuthMetacompass,
    /// May view Metakompas data
    ViewMetacompass,
    /// Cataloguing template set, a string rule
    CatalogingTemplateSet,
    /// IMS library
    ImsLibrary,
    /// Synchronizes with WorldCat
    WorldcatSynchronize,
    /// Takes part in WorldCat resource sharing
    WorldcatResourceSharing,
    /// Uses central FAUST numbers
    UseCentralFaust,
}

impl Rule {
    /// Every known rule.
    pub const ALL: [Self; 23] = [
        Self::CreateEnrichments,
        Self::PartOfBibliotekDk,
        Self::PartOfDanbib,
        Self::UseEnrichments,
        Self::UseLocaldataStream,
        Self::UseHoldingsItem,
        Self::AuthRoot,
        Self::AuthCommonSubjects,
        Self::AuthCommonNotes,
        Self::AuthDbcRecords,
        Self::AuthPublicLibCommonRecord,
        Self::AuthRetRecord,
        Self::AuthAgencyCommonRecord,
        Self::AuthExportHoldings,
        Self::AuthCreateCommonRecord,
        Self::AuthAddDk5ToPhd,
        Self::AuthMetacompass,
        Self::ViewMetacompass,
        Self::CatalogingTemplateSet,
        Self::ImsLibrary,
        Self::WorldcatSynchronize,
        Self::WorldcatResourceSharing,
        Self::UseCentralFaust,
    ];

    /// Wire name of the rule.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateEnrichments => "create_enrichments",
            Self::PartOfBibliotekDk => "part_of_bibliotek_dk",
            Self::PartOfDanbib => "part_of_danbib",
            Self::UseEnrichments => "use_enrichments",
            Self::UseLocaldataStream => "use_localdata_stream",
            Self::UseHoldingsItem => "use_holdings_item",
            Self::AuthRoot => "auth_root",
            Self::AuthCommonSubjects => "auth_common_subjects",
            Self::AuthCommonNotes => "auth_common_notes",
            Self::AuthDbcRecords => "auth_dbc_records",
            Self::AuthPublicLibCommonRecord => "auth_public_lib_common_record",
            Self::AuthRetRecord => "auth_ret_record",
            Self::AuthAgencyCommonRecord => "auth_agency_common_record",
            Self::AuthExportHoldings => "auth_export_holdings",
            Self::AuthCreateCommonRecord => "auth_create_common_record",
            Self::AuthAddDk5ToPhd => "auth_add_dk5_to_phd",
            Self::AuthMetacompass => "auth_metacompass",
            Self::ViewMetacompass => "view_metacompass",
            Self::CatalogingTemplateSet => "cataloging_template_set",
            Self::ImsLibrary => "ims_library",
            Self::WorldcatSynchronize => "worldcat_synchronize",
            Self::WorldcatResourceSharing => "worldcat_resource_sharing",
            Self::UseCentralFaust => "use_central_faust",
        }
    }

    /// Look up a rule by wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| rule.as_str() == name)
    }
}

impl AsRef<str> for Rule {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<&str> = Rule::ALL.iter().map(Rule::as_str).collect();
        assert_eq!(names.len(), Rule::ALL.len());
    }

    #[test]
    fn test_name_lookup() {
        for rule in Rule::ALL {
            assert_eq!(Rule::from_name(rule.as_str()), Some(rule));
        }
        assert_eq!(Rule::from_name("AUTH_ROOT"), None);
        assert_eq!(Rule::AuthAddDk5ToPhd.to_string(), "auth_add_dk5_to_phd");
    }
}
