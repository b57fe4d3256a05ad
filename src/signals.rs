//! Conventional device storage keys for consent signals.
//!
//! Ad-tech SDKs read encoded consent strings from well known keys of the platform's
//! key-value storage. This module only names those keys and pairs them with values; writing
//! them is the concern of the caller.

pub const TC_STRING_KEY: &str = "IABTCF_TCString";
pub const GDPR_APPLIES_KEY: &str = "IABTCF_gdprApplies";
pub const US_PRIVACY_STRING_KEY: &str = "IABUSPrivacy_String";
pub const US_PRIVACY_APPLIED_KEY: &str = "IABUSPrivacy_Applied";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SignalValue {
    String(String),
    /// Flags are stored as integers, `1` meaning that the regulation applies.
    Number(i32),
}

impl From<bool> for SignalValue {
    fn from(b: bool) -> Self {
        SignalValue::Number(b.into())
    }
}

/// The consent signals to store after a consent decision.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConsentSignals {
    pub tc_string: Option<String>,
    pub gdpr_applies: bool,
    pub us_privacy_string: Option<String>,
    pub us_privacy_applies: bool,
}

impl ConsentSignals {
    /// Returns the storage entries for these signals. Absent strings are left out, the
    /// applicability flags are always present.
    pub fn entries(&self) -> Vec<(&'static str, SignalValue)> {
        let mut entries = vec![];

        if let Some(s) = &self.tc_string {
            entries.push((TC_STRING_KEY, SignalValue::String(s.clone())));
        }
        entries.push((GDPR_APPLIES_KEY, self.gdpr_applies.into()));

        if let Some(s) = &self.us_privacy_string {
            entries.push((US_PRIVACY_STRING_KEY, SignalValue::String(s.clone())));
        }
        entries.push((US_PRIVACY_APPLIED_KEY, self.us_privacy_applies.into()));

        entries
    }
}
