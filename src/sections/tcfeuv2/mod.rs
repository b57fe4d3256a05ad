//! IAB TCF v2 TC string encoder.
//!
//! A TC string is made of a mandatory core segment, followed by optional disclosed vendors,
//! allowed vendors and publisher purposes segments, each one encoded independently in URL-safe
//! Base64 and joined with `.` characters.
//!
//! ```
//! # use std::error::Error;
//! #
//! # fn main() -> Result<(), Box<dyn Error>> {
//! use iab_tcf_encoder::sections::tcfeuv2::{CmpMetadata, ConsentDecision, TcStringEncoderV2};
//!
//! let metadata = CmpMetadata {
//!     cmp_id: 2,
//!     cmp_version: 1,
//!     consent_language: "EN".to_string(),
//!     publisher_country_code: "US".to_string(),
//!     ..Default::default()
//! };
//! let decision = ConsentDecision {
//!     purpose_consents: [1, 2, 3].into(),
//!     disclosed_vendors: [5, 6, 7, 8, 9].into(),
//!     ..Default::default()
//! };
//!
//! let tc_string = TcStringEncoderV2::new(metadata).encode(&decision)?;
//!
//! // core and disclosed vendors segments
//! assert_eq!(tc_string.split('.').count(), 2);
//! # Ok(())
//! # }
//! ```
//!
use crate::sections::tcfeuv2::core_segment::CoreSegmentEncoder;
use crate::sections::tcfeuv2::publisher::PublisherSegmentEncoder;
use crate::sections::tcfeuv2::vendors::VendorSegmentEncoder;
use crate::sections::{EncodeError, EncodedSegment, IdSet, SegmentEncoder};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod core_segment;
pub mod publisher;
pub mod vendors;

pub const TCF_EU_V2_VERSION: u8 = 2;

/// Identity and versioning data of the CMP, supplied by the SDK configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CmpMetadata {
    /// Unix timestamp in milliseconds.
    pub created: u64,
    /// Unix timestamp in milliseconds.
    pub last_updated: u64,
    pub cmp_id: u16,
    pub cmp_version: u16,
    pub consent_screen: u8,
    pub consent_language: String,
    pub vendor_list_version: u16,
    pub policy_version: u8,
    pub is_service_specific: bool,
    pub use_non_standard_stacks: bool,
    pub purpose_one_treatment: bool,
    pub publisher_country_code: String,
}

/// The consent choices of a user, built fresh for every encoding request.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConsentDecision {
    pub purpose_consents: IdSet,
    pub purpose_legitimate_interests: IdSet,
    pub special_feature_optins: IdSet,
    pub vendor_consents: IdSet,
    pub vendor_legitimate_interests: IdSet,
    pub disclosed_vendors: IdSet,
    pub allowed_vendors: IdSet,
    pub publisher_restrictions: Vec<PublisherRestriction>,
    pub publisher_purposes: PublisherPurposes,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PublisherRestriction {
    pub purpose_id: u8,
    pub restriction_type: RestrictionType,
    pub restricted_vendor_ids: IdSet,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "u8", into = "u8"))]
pub enum RestrictionType {
    NotAllowed = 0,
    RequireConsent = 1,
    RequireLegitimateInterest = 2,
    Undefined = 3,
}

impl From<u8> for RestrictionType {
    fn from(n: u8) -> Self {
        Self::from_u8(n).unwrap_or(RestrictionType::Undefined)
    }
}

impl From<RestrictionType> for u8 {
    fn from(t: RestrictionType) -> Self {
        t as u8
    }
}

/// Publisher purposes, written in the optional publisher TC segment.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PublisherPurposes {
    pub consents: IdSet,
    pub legitimate_interests: IdSet,
    pub num_custom_purposes: u8,
    pub custom_consents: IdSet,
    pub custom_legitimate_interests: IdSet,
}

/// Encoder for complete TC strings.
///
/// The core segment is mandatory: any failure to encode it fails the whole string.
/// Optional segments which cannot be encoded, usually because the decision holds no data
/// for them, are left out of the output.
#[derive(Clone, Debug)]
pub struct TcStringEncoderV2 {
    core: CoreSegmentEncoder,
    disclosed_vendors: VendorSegmentEncoder,
    allowed_vendors: VendorSegmentEncoder,
    publisher: PublisherSegmentEncoder,
}

impl TcStringEncoderV2 {
    pub fn new(metadata: CmpMetadata) -> Self {
        Self::with_version(TCF_EU_V2_VERSION, metadata)
    }

    /// Creates an encoder for the requested TC string version.
    ///
    /// Only version 2 is supported: any other version will make [`encode`](Self::encode)
    /// fail with [`EncodeError::IncompatibleVersion`].
    pub fn with_version(version: u8, metadata: CmpMetadata) -> Self {
        Self {
            core: CoreSegmentEncoder::with_version(version, metadata),
            disclosed_vendors: VendorSegmentEncoder::disclosed(),
            allowed_vendors: VendorSegmentEncoder::allowed(),
            publisher: PublisherSegmentEncoder,
        }
    }

    /// Encodes vendor segments as the list of vendors *not* present in the decision.
    pub fn with_default_consent(mut self, default_consent: bool) -> Self {
        self.disclosed_vendors = self.disclosed_vendors.with_default_consent(default_consent);
        self.allowed_vendors = self.allowed_vendors.with_default_consent(default_consent);
        self
    }

    pub fn metadata(&self) -> &CmpMetadata {
        self.core.metadata()
    }

    /// Encodes the decision into a TC string.
    ///
    /// # Errors
    ///
    /// Returns an [`EncodeError`] if the core segment cannot be encoded.
    pub fn encode(&self, decision: &ConsentDecision) -> Result<String, EncodeError> {
        Ok(self
            .encode_segments(decision)?
            .iter()
            .map(EncodedSegment::to_string)
            .collect::<Vec<_>>()
            .join("."))
    }

    /// Encodes the decision into its segments, in wire order.
    pub fn encode_segments(
        &self,
        decision: &ConsentDecision,
    ) -> Result<Vec<EncodedSegment>, EncodeError> {
        let core = self.core.encode(decision)?;

        let segments = [
            optional_segment(&self.disclosed_vendors, decision),
            optional_segment(&self.allowed_vendors, decision),
            optional_segment(&self.publisher, decision),
        ];

        Ok(std::iter::once(core)
            .chain(segments.into_iter().flatten())
            .collect())
    }
}

fn optional_segment<E: SegmentEncoder>(
    encoder: &E,
    decision: &ConsentDecision,
) -> Option<EncodedSegment> {
    encoder
        .encode(decision)
        .inspect_err(|e| {
            debug!(segment = %encoder.segment_type(), error = %e, "omitting optional segment");
        })
        .ok()
}
