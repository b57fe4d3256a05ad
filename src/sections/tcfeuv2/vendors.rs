use crate::core::DataWrite;
use crate::core::range::{inverted, select};
use crate::sections::tcfeuv2::ConsentDecision;
use crate::sections::{EncodeError, IdSet, SegmentEncoder, SegmentType};
use bitstream_io::BitWrite;

/// Encoder for the standalone disclosed vendors and allowed vendors segments.
#[derive(Clone, Debug)]
pub struct VendorSegmentEncoder {
    segment_type: SegmentType,
    default_consent: bool,
}

impl VendorSegmentEncoder {
    /// Creates an encoder for the given segment type.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::UnsupportedSegment`] for anything other than the disclosed
    /// vendors and allowed vendors segments.
    pub fn new(segment_type: SegmentType) -> Result<Self, EncodeError> {
        match segment_type {
            SegmentType::DisclosedVendors | SegmentType::AllowedVendors => Ok(Self {
                segment_type,
                default_consent: false,
            }),
            t => Err(EncodeError::UnsupportedSegment(t)),
        }
    }

    pub fn disclosed() -> Self {
        Self {
            segment_type: SegmentType::DisclosedVendors,
            default_consent: false,
        }
    }

    pub fn allowed() -> Self {
        Self {
            segment_type: SegmentType::AllowedVendors,
            default_consent: false,
        }
    }

    /// When set, the segment lists the vendors missing from the decision, up to the highest
    /// vendor id, always as ranges.
    pub fn with_default_consent(self, default_consent: bool) -> Self {
        Self {
            default_consent,
            ..self
        }
    }

    fn vendors<'a>(&self, decision: &'a ConsentDecision) -> &'a IdSet {
        match self.segment_type {
            SegmentType::AllowedVendors => &decision.allowed_vendors,
            _ => &decision.disclosed_vendors,
        }
    }
}

impl SegmentEncoder for VendorSegmentEncoder {
    fn segment_type(&self) -> SegmentType {
        self.segment_type
    }

    fn write_segment<W: BitWrite>(
        &self,
        decision: &ConsentDecision,
        w: &mut W,
    ) -> Result<(), EncodeError> {
        let vendors = self.vendors(decision);
        if vendors.range(1..).next().is_none() {
            return Err(EncodeError::NoVendorsSelected);
        }

        let encoding = if self.default_consent {
            inverted(vendors)
        } else {
            select(vendors)
        };

        w.write_unsigned::<3, u8>(self.segment_type as u8)?;
        w.write_optimized_integer_range(&encoding)?;

        Ok(())
    }
}
