use std::{fmt, num::NonZeroU32};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Absent fields decode to their defaults; a `null` trading name list as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessEntity {
    pub entity_name: String,
    pub entity_status_code: EntityStatus,
    pub nzbn: String,
    pub entity_type_code: EntityType,
    pub entity_type_description: String,
    pub entity_status_description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub trading_names: Vec<TradingName>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TradingName {
    pub unique_identifier: String,
    pub name: String,
}

/// One page of entity search results. Fetching further pages is up to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResult {
    pub page_size: u32,
    pub page: u32,
    pub total_items: u32,
    pub sort_by: String,
    pub sort_order: String,
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<BusinessEntity>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Query string for `services/v4/nzbn/entities`; unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SearchQuery {
    pub search_term: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_status: Option<EntityStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<NonZeroU32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<NonZeroU32>,
}

impl SearchQuery {
    pub fn new(search_term: impl Into<String>) -> Self {
        Self {
            search_term: search_term.into(),
            ..Self::default()
        }
    }

    pub fn entity_status(mut self, status: EntityStatus) -> Self {
        self.entity_status = Some(status);
        self
    }

    pub fn entity_type(mut self, entity_type: EntityType) -> Self {
        self.entity_type = Some(entity_type);
        self
    }

    pub fn industry_code(mut self, code: impl Into<String>) -> Self {
        self.industry_code = Some(code.into());
        self
    }

    pub fn page(mut self, page: NonZeroU32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, page_size: NonZeroU32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn to_query_string(&self) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(self)
    }
}

/// Defines an open, string-backed code list: one variant per known code plus
/// `Other` carrying any code the registry adds later.
macro_rules! registry_codes {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $code:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $code,)+
                    Self::Other(code) => code.as_str(),
                }
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, Self::Other(_))
            }
        }

        /// The empty code, used when a record carries none.
        impl Default for $name {
            fn default() -> Self {
                Self::Other(String::new())
            }
        }

        impl From<&str> for $name {
            fn from(code: &str) -> Self {
                match code {
                    $($code => Self::$variant,)+
                    other => Self::Other(other.to_owned()),
                }
            }
        }

        impl From<String> for $name {
            fn from(code: String) -> Self {
                match Self::from(code.as_str()) {
                    Self::Other(_) => Self::Other(code),
                    known => known,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                String::deserialize(deserializer).map(Self::from)
            }
        }
    };
}

registry_codes! {
    /// Registration status of an entity.
    pub enum EntityStatus {
        Registered => "Registered",
        VoluntaryAdministration => "VoluntaryAdministration",
        InReceivership => "InReceivership",
        InLiquidation => "InLiquidation",
        InStatutoryAdministration => "InStatutoryAdministration",
        Inactive => "Inactive",
        RemovedClosed => "RemovedClosed",
    }
}

registry_codes! {
    /// Registry entity type code. The single-letter and upper-case codes are
    /// legacy types still returned for older registrations.
    pub enum EntityType {
        NzCompany => "NZCompany",
        OverseasCompany => "OverseasCompany",
        SoleTrader => "SoleTrader",
        Partnership => "Partnership",
        Trust => "Trust",
        BuildingSociety => "BuildingSociety",
        CharitableTrust => "CharitableTrust",
        CreditUnion => "CreditUnion",
        FriendlySociety => "FriendlySociety",
        IncorporatedSociety => "IncorporatedSociety",
        IndustrialAndProvidentSociety => "IndustrialAndProvidentSociety",
        LimitedPartnershipNz => "LimitedPartnershipNz",
        LimitedPartnershipOverseas => "LimitedPartnershipOverseas",
        SpecialBodies => "SpecialBodies",
        SpecialBody => "SpecialBody",
        TradingTrustLegacy => "Trading_Trust",
        SoleTraderLegacy => "Sole_Trader",
        B => "B",
        I => "I",
        D => "D",
        F => "F",
        N => "N",
        S => "S",
        T => "T",
        Y => "Y",
        Z => "Z",
        GovtCentral => "GovtCentral",
        GovtEdu => "GovtEdu",
        GovtLocal => "GovtLocal",
        GovtOther => "GovtOther",
        Ltd => "LTD",
        Ultd => "ULTD",
        Coop => "COOP",
        Asic => "ASIC",
        NonAsic => "NON_ASIC",
    }
}
