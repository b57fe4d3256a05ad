use crate::core::range::select;
use crate::core::{DataWrite, Range};
use crate::sections::tcfeuv2::{CmpMetadata, ConsentDecision, TCF_EU_V2_VERSION};
use crate::sections::{EncodeError, SegmentEncoder, SegmentType};
use bitstream_io::BitWrite;

const SPECIAL_FEATURES_BITS: usize = 12;
const PURPOSES_BITS: usize = 24;

/// Encoder for the mandatory core segment of a TC string.
#[derive(Clone, Debug)]
pub struct CoreSegmentEncoder {
    version: u8,
    metadata: CmpMetadata,
}

impl CoreSegmentEncoder {
    pub fn new(metadata: CmpMetadata) -> Self {
        Self::with_version(TCF_EU_V2_VERSION, metadata)
    }

    pub fn with_version(version: u8, metadata: CmpMetadata) -> Self {
        Self { version, metadata }
    }

    pub fn metadata(&self) -> &CmpMetadata {
        &self.metadata
    }
}

impl SegmentEncoder for CoreSegmentEncoder {
    fn segment_type(&self) -> SegmentType {
        SegmentType::Core
    }

    fn write_segment<W: BitWrite>(
        &self,
        decision: &ConsentDecision,
        w: &mut W,
    ) -> Result<(), EncodeError> {
        if self.version != TCF_EU_V2_VERSION {
            return Err(EncodeError::IncompatibleVersion {
                expected: TCF_EU_V2_VERSION,
                found: self.version,
            });
        }

        let m = &self.metadata;
        let consent_language = two_letter_code(&m.consent_language)?;
        let publisher_country_code = two_letter_code(&m.publisher_country_code)?;

        w.write_unsigned::<6, u8>(self.version)?;
        w.write_datetime_as_deciseconds(m.created)?;
        w.write_datetime_as_deciseconds(m.last_updated)?;
        w.write_unsigned::<12, u16>(m.cmp_id)?;
        w.write_unsigned::<12, u16>(m.cmp_version)?;
        w.write_unsigned::<6, u8>(m.consent_screen)?;
        w.write_string(&consent_language)?;
        w.write_unsigned::<12, u16>(m.vendor_list_version)?;
        w.write_unsigned::<6, u8>(m.policy_version)?;
        w.write_bit(m.is_service_specific)?;
        w.write_bit(m.use_non_standard_stacks)?;
        w.write_fixed_bitfield(SPECIAL_FEATURES_BITS, &decision.special_feature_optins)?;
        w.write_fixed_bitfield(PURPOSES_BITS, &decision.purpose_consents)?;
        w.write_fixed_bitfield(PURPOSES_BITS, &decision.purpose_legitimate_interests)?;
        w.write_bit(m.purpose_one_treatment)?;
        w.write_string(&publisher_country_code)?;
        w.write_optimized_integer_range(&select(&decision.vendor_consents))?;
        w.write_optimized_integer_range(&select(&decision.vendor_legitimate_interests))?;

        let restrictions = decision
            .publisher_restrictions
            .iter()
            .map(|r| Range {
                key: r.purpose_id,
                range_type: r.restriction_type.into(),
                ids: &r.restricted_vendor_ids,
            })
            .collect::<Vec<_>>();
        w.write_array_of_ranges(&restrictions)?;

        Ok(())
    }
}

/// Upper-cases a language or country code, and checks it is made of two letters.
fn two_letter_code(s: &str) -> Result<String, EncodeError> {
    let code = s.to_ascii_uppercase();
    if code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(code)
    } else {
        Err(EncodeError::InvalidLanguageCode(s.to_string()))
    }
}
