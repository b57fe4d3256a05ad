use crate::core::DataWrite;
use crate::sections::tcfeuv2::ConsentDecision;
use crate::sections::{EncodeError, SegmentEncoder, SegmentType};
use bitstream_io::BitWrite;

const PURPOSES_BITS: usize = 24;

/// Encoder for the optional publisher purposes segment.
#[derive(Clone, Copy, Debug, Default)]
pub struct PublisherSegmentEncoder;

impl SegmentEncoder for PublisherSegmentEncoder {
    fn segment_type(&self) -> SegmentType {
        SegmentType::PublisherTc
    }

    fn write_segment<W: BitWrite>(
        &self,
        decision: &ConsentDecision,
        w: &mut W,
    ) -> Result<(), EncodeError> {
        let p = &decision.publisher_purposes;
        if p.consents.is_empty() {
            return Err(EncodeError::EmptyValue("publisher purposes consent"));
        }
        if p.legitimate_interests.is_empty() {
            return Err(EncodeError::EmptyValue(
                "publisher purposes legitimate interests",
            ));
        }
        if p.num_custom_purposes == 0 {
            return Err(EncodeError::EmptyValue("number of custom purposes"));
        }

        let n = p.num_custom_purposes as usize;

        w.write_unsigned::<3, u8>(SegmentType::PublisherTc as u8)?;
        w.write_fixed_bitfield(PURPOSES_BITS, &p.consents)?;
        w.write_fixed_bitfield(PURPOSES_BITS, &p.legitimate_interests)?;
        w.write_unsigned::<6, u8>(p.num_custom_purposes)?;
        w.write_fixed_bitfield(n, &p.custom_consents)?;
        w.write_fixed_bitfield(n, &p.custom_legitimate_interests)?;

        Ok(())
    }
}
