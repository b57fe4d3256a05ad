//! Traits, helpers, and type definitions shared by the consent string encoders.
//!
//! Two encoders are provided:
//!
//! - [`tcfeuv2`] renders the IAB TCF v2 TC string, made of a mandatory core segment and up to
//!   three optional segments separated by `.` characters.
//! - [`uspv1`] renders the 4 characters CCPA US Privacy string.
//!
//! The two encoders share no wire format, only the error type for the TCF side and a few
//! conventions.
//!
use crate::core::aligned_bytes;
use crate::core::base64::EncodeExt;
use crate::sections::tcfeuv2::ConsentDecision;
use bitstream_io::BitWrite;
use num_derive::FromPrimitive;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::io;
use strum_macros::Display;
use thiserror::Error;

pub mod tcfeuv2;
pub mod uspv1;

pub type IdSet = BTreeSet<u16>;

/// Logical segments of a TC string, with their 3 bits segment type as discriminant.
///
/// The core segment does not carry a segment type on the wire.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Hash, FromPrimitive)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SegmentType {
    Core = 0,
    DisclosedVendors = 1,
    AllowedVendors = 2,
    PublisherTc = 3,
}

/// The error type for consent string encoding operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EncodeError {
    /// Only version 2 of the TCF core segment can be encoded.
    #[error("incompatible version (expected {expected}, found {found})")]
    IncompatibleVersion { expected: u8, found: u8 },
    /// A language or country code is not made of two letters.
    #[error("invalid language code {0:?}")]
    InvalidLanguageCode(String),
    /// A field required by an optional segment is empty.
    #[error("empty value for {0}")]
    EmptyValue(&'static str),
    /// A standalone vendor segment was requested without any vendor.
    #[error("no vendors selected")]
    NoVendorsSelected,
    /// The encoder cannot produce this kind of segment.
    #[error("unsupported segment {0}")]
    UnsupportedSegment(SegmentType),
    /// A value does not fit in its field, or the bit writer failed.
    #[error("unable to write segment: {source}")]
    Write {
        #[from]
        source: io::Error,
    },
}

/// A single segment, padded to a byte boundary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncodedSegment {
    segment_type: SegmentType,
    bytes: Vec<u8>,
}

impl EncodedSegment {
    pub fn segment_type(&self) -> SegmentType {
        self.segment_type
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Formats the segment as URL safe Base64 without padding.
impl fmt::Display for EncodedSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bytes.encode_base64_url())
    }
}

/// An encoder producing one segment of a TC string out of a consent decision.
pub trait SegmentEncoder {
    fn segment_type(&self) -> SegmentType;

    fn write_segment<W: BitWrite>(
        &self,
        decision: &ConsentDecision,
        w: &mut W,
    ) -> Result<(), EncodeError>;

    fn encode(&self, decision: &ConsentDecision) -> Result<EncodedSegment, EncodeError> {
        let bytes = aligned_bytes(|w| self.write_segment(decision, w))?;

        Ok(EncodedSegment {
            segment_type: self.segment_type(),
            bytes,
        })
    }
}
