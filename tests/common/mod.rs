use iab_tcf_encoder::sections::EncodeError;
use iab_tcf_encoder::sections::tcfeuv2::{
    CmpMetadata, ConsentDecision, PublisherPurposes, PublisherRestriction, TcStringEncoderV2,
};
use iab_tcf_encoder::sections::uspv1::UsPrivacyEncoder;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TestCase {
    Tcfeuv2(TcfTestCase),
    Uspv1(UspTestCase),
}

impl TestCase {
    pub fn load_from_file<P: AsRef<Path>>(p: P) -> io::Result<Self> {
        let f = File::open(p)?;
        let tc: Self = serde_json::from_reader(&f)
            .map_err(|e| io::Error::new(ErrorKind::InvalidData, e.to_string()))?;
        Ok(tc)
    }

    pub fn assert_encodes(&self) {
        match self {
            TestCase::Tcfeuv2(tc) => tc.assert_encodes(),
            TestCase::Uspv1(tc) => tc.assert_encodes(),
        }
    }
}

#[derive(Deserialize)]
pub struct TcfTestCase {
    version: Option<u8>,
    metadata: Metadata,
    #[serde(default)]
    decision: Decision,
    #[serde(default)]
    default_consent: bool,
    expected: Option<String>,
    error: Option<String>,
}

impl TcfTestCase {
    fn assert_encodes(&self) {
        let metadata = self.metadata.clone().into();
        let encoder = match self.version {
            Some(v) => TcStringEncoderV2::with_version(v, metadata),
            None => TcStringEncoderV2::new(metadata),
        }
        .with_default_consent(self.default_consent);

        let r = encoder.encode(&self.decision.clone().into());

        match (&self.expected, &self.error, r) {
            (Some(expected), None, Ok(s)) => assert_eq!(&s, expected),
            (None, Some(error), Err(e)) => assert_eq!(error_name(&e), error),
            (_, _, r) => panic!("unexpected result {r:?}"),
        }
    }
}

fn error_name(e: &EncodeError) -> &'static str {
    match e {
        EncodeError::IncompatibleVersion { .. } => "IncompatibleVersion",
        EncodeError::InvalidLanguageCode(_) => "InvalidLanguageCode",
        EncodeError::EmptyValue(_) => "EmptyValue",
        EncodeError::NoVendorsSelected => "NoVendorsSelected",
        EncodeError::UnsupportedSegment(_) => "UnsupportedSegment",
        EncodeError::Write { .. } => "Write",
        _ => "Unknown",
    }
}

#[derive(Clone, Deserialize)]
struct Metadata {
    created: u64,
    last_updated: u64,
    cmp_id: u16,
    cmp_version: u16,
    consent_screen: u8,
    consent_language: String,
    vendor_list_version: u16,
    policy_version: u8,
    is_service_specific: bool,
    use_non_standard_stacks: bool,
    purpose_one_treatment: bool,
    publisher_country_code: String,
}

impl From<Metadata> for CmpMetadata {
    fn from(m: Metadata) -> Self {
        Self {
            created: m.created,
            last_updated: m.last_updated,
            cmp_id: m.cmp_id,
            cmp_version: m.cmp_version,
            consent_screen: m.consent_screen,
            consent_language: m.consent_language,
            vendor_list_version: m.vendor_list_version,
            policy_version: m.policy_version,
            is_service_specific: m.is_service_specific,
            use_non_standard_stacks: m.use_non_standard_stacks,
            purpose_one_treatment: m.purpose_one_treatment,
            publisher_country_code: m.publisher_country_code,
        }
    }
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
struct Decision {
    purpose_consents: BTreeSet<u16>,
    purpose_legitimate_interests: BTreeSet<u16>,
    special_feature_optins: BTreeSet<u16>,
    vendor_consents: BTreeSet<u16>,
    vendor_legitimate_interests: BTreeSet<u16>,
    disclosed_vendors: BTreeSet<u16>,
    allowed_vendors: BTreeSet<u16>,
    publisher_restrictions: Vec<Restriction>,
    publisher_purposes: Purposes,
}

impl From<Decision> for ConsentDecision {
    fn from(d: Decision) -> Self {
        Self {
            purpose_consents: d.purpose_consents,
            purpose_legitimate_interests: d.purpose_legitimate_interests,
            special_feature_optins: d.special_feature_optins,
            vendor_consents: d.vendor_consents,
            vendor_legitimate_interests: d.vendor_legitimate_interests,
            disclosed_vendors: d.disclosed_vendors,
            allowed_vendors: d.allowed_vendors,
            publisher_restrictions: d
                .publisher_restrictions
                .into_iter()
                .map(Into::into)
                .collect(),
            publisher_purposes: d.publisher_purposes.into(),
        }
    }
}

#[derive(Clone, Deserialize)]
struct Restriction {
    purpose_id: u8,
    restriction_type: u8,
    restricted_vendor_ids: BTreeSet<u16>,
}

impl From<Restriction> for PublisherRestriction {
    fn from(r: Restriction) -> Self {
        Self {
            purpose_id: r.purpose_id,
            restriction_type: r.restriction_type.into(),
            restricted_vendor_ids: r.restricted_vendor_ids,
        }
    }
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
struct Purposes {
    consents: BTreeSet<u16>,
    legitimate_interests: BTreeSet<u16>,
    num_custom_purposes: u8,
    custom_consents: BTreeSet<u16>,
    custom_legitimate_interests: BTreeSet<u16>,
}

impl From<Purposes> for PublisherPurposes {
    fn from(p: Purposes) -> Self {
        Self {
            consents: p.consents,
            legitimate_interests: p.legitimate_interests,
            num_custom_purposes: p.num_custom_purposes,
            custom_consents: p.custom_consents,
            custom_legitimate_interests: p.custom_legitimate_interests,
        }
    }
}

#[derive(Deserialize)]
pub struct UspTestCase {
    canonical_purposes: HashMap<String, Vec<String>>,
    consents: HashMap<String, bool>,
    notice: bool,
    lspa: bool,
    expected: String,
}

impl UspTestCase {
    fn assert_encodes(&self) {
        let encoder = UsPrivacyEncoder::new(self.canonical_purposes.clone().into_iter().collect());
        let consents = self.consents.clone().into_iter().collect();

        assert_eq!(
            encoder.encode(&consents, self.notice, self.lspa).to_string(),
            self.expected
        );
    }
}
