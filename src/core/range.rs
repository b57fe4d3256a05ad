//! Vendor list encodings.
//!
//! TCF vendor lists are written either as a bit field with one bit per vendor id
//! up to the highest id, or as a list of contiguous id ranges. Both candidates are
//! computed and the one producing fewer bits is written.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

const MAX_VENDOR_ID_BITS: usize = 16;
const IS_RANGE_ENCODING_BITS: usize = 1;
const NUM_ENTRIES_BITS: usize = 12;
const IS_A_RANGE_BITS: usize = 1;
const VENDOR_ID_BITS: usize = 16;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VendorEncoding<'a> {
    BitField {
        max_vendor_id: u16,
        ids: &'a BTreeSet<u16>,
    },
    Range {
        max_vendor_id: u16,
        ranges: Vec<RangeInclusive<u16>>,
    },
}

impl VendorEncoding<'_> {
    pub fn max_vendor_id(&self) -> u16 {
        match self {
            VendorEncoding::BitField { max_vendor_id, .. } => *max_vendor_id,
            VendorEncoding::Range { max_vendor_id, .. } => *max_vendor_id,
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, VendorEncoding::Range { .. })
    }

    /// Number of bits this encoding occupies once written, including the
    /// max vendor id and range flag prefix.
    pub fn bit_len(&self) -> usize {
        let prefix = MAX_VENDOR_ID_BITS + IS_RANGE_ENCODING_BITS;
        match self {
            VendorEncoding::BitField { max_vendor_id, .. } => prefix + *max_vendor_id as usize,
            VendorEncoding::Range { ranges, .. } => prefix + integer_range_bit_len(ranges),
        }
    }
}

/// Number of bits of a range list written without the max vendor id prefix.
pub fn integer_range_bit_len(ranges: &[RangeInclusive<u16>]) -> usize {
    NUM_ENTRIES_BITS
        + ranges
            .iter()
            .map(|r| {
                if r.start() == r.end() {
                    IS_A_RANGE_BITS + VENDOR_ID_BITS
                } else {
                    IS_A_RANGE_BITS + 2 * VENDOR_ID_BITS
                }
            })
            .sum::<usize>()
}

/// Groups ids into contiguous runs. Id 0 is not a valid vendor id and is skipped.
pub fn runs(ids: &BTreeSet<u16>) -> Vec<RangeInclusive<u16>> {
    let mut runs: Vec<RangeInclusive<u16>> = vec![];

    for &id in ids.range(1..) {
        match runs.last_mut() {
            Some(r) if r.end().checked_add(1) == Some(id) => *r = *r.start()..=id,
            _ => runs.push(id..=id),
        }
    }

    runs
}

/// Returns the bit field and range candidates for the given ids, in that order.
pub fn candidates(ids: &BTreeSet<u16>) -> (VendorEncoding<'_>, VendorEncoding<'_>) {
    let max_vendor_id = max_vendor_id(ids);

    (
        VendorEncoding::BitField { max_vendor_id, ids },
        VendorEncoding::Range {
            max_vendor_id,
            ranges: runs(ids),
        },
    )
}

/// Picks the shortest candidate. The bit field wins ties.
pub fn select(ids: &BTreeSet<u16>) -> VendorEncoding<'_> {
    let (bit_field, range) = candidates(ids);
    if range.bit_len() < bit_field.bit_len() {
        range
    } else {
        bit_field
    }
}

/// Range encoding of the ids *missing* from the set within `[1, max]`, where
/// `max` is the highest id of the set.
pub fn inverted(ids: &BTreeSet<u16>) -> VendorEncoding<'_> {
    let max_vendor_id = max_vendor_id(ids);
    let mut ranges = vec![];
    let mut next = 1u16;

    // the max id is part of the set, so there is no trailing gap
    for &id in ids.range(1..) {
        if id > next {
            ranges.push(next..=id - 1);
        }
        next = id.saturating_add(1);
    }

    VendorEncoding::Range {
        max_vendor_id,
        ranges,
    }
}

fn max_vendor_id(ids: &BTreeSet<u16>) -> u16 {
    ids.last().copied().unwrap_or(0)
}
