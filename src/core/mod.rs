use crate::core::range::VendorEncoding;
use bitstream_io::{BigEndian, BitWrite, BitWriter};
use std::collections::BTreeSet;
use std::io;
use std::ops::RangeInclusive;

pub(crate) mod base64;
pub mod range;

/// A list of vendor ids attached to a key and a restriction type, as found in
/// the publisher restrictions of the TCF core segment.
#[derive(Debug, Eq, PartialEq)]
pub struct Range<'a> {
    pub key: u8,
    pub range_type: u8,
    pub ids: &'a BTreeSet<u16>,
}

pub trait DataWrite {
    fn write_string(&mut self, s: &str) -> io::Result<()>;

    fn write_datetime_as_deciseconds(&mut self, unix_millis: u64) -> io::Result<()>;

    fn write_fixed_bitfield(&mut self, bits: usize, ids: &BTreeSet<u16>) -> io::Result<()>;

    fn write_integer_range(&mut self, ranges: &[RangeInclusive<u16>]) -> io::Result<()>;

    fn write_optimized_integer_range(&mut self, encoding: &VendorEncoding) -> io::Result<()>;

    fn write_array_of_ranges(&mut self, ranges: &[Range]) -> io::Result<()>;
}

impl<T> DataWrite for T
where
    T: BitWrite,
{
    fn write_string(&mut self, s: &str) -> io::Result<()> {
        for b in s.bytes() {
            let value = b.checked_sub(b'A').ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("character {:?} out of the 6-bit alphabet", b as char),
                )
            })?;
            self.write_unsigned::<6, u8>(value)?;
        }

        Ok(())
    }

    fn write_datetime_as_deciseconds(&mut self, unix_millis: u64) -> io::Result<()> {
        self.write_unsigned::<36, u64>(unix_millis / 100)
    }

    fn write_fixed_bitfield(&mut self, bits: usize, ids: &BTreeSet<u16>) -> io::Result<()> {
        for i in 1..=bits {
            // ids beyond the field width are dropped
            let set = u16::try_from(i).is_ok_and(|id| ids.contains(&id));
            self.write_bit(set)?;
        }

        Ok(())
    }

    fn write_integer_range(&mut self, ranges: &[RangeInclusive<u16>]) -> io::Result<()> {
        let n = u16::try_from(ranges.len()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("too many range entries ({})", ranges.len()),
            )
        })?;
        self.write_unsigned::<12, u16>(n)?;

        for range in ranges {
            let (start, end) = (*range.start(), *range.end());
            if start == end {
                self.write_bit(false)?;
                self.write_unsigned::<16, u16>(start)?;
            } else {
                self.write_bit(true)?;
                self.write_unsigned::<16, u16>(start)?;
                self.write_unsigned::<16, u16>(end)?;
            }
        }

        Ok(())
    }

    fn write_optimized_integer_range(&mut self, encoding: &VendorEncoding) -> io::Result<()> {
        match encoding {
            VendorEncoding::BitField { max_vendor_id, ids } => {
                self.write_unsigned::<16, u16>(*max_vendor_id)?;
                self.write_bit(false)?;
                self.write_fixed_bitfield(*max_vendor_id as usize, ids)
            }
            VendorEncoding::Range {
                max_vendor_id,
                ranges,
            } => {
                self.write_unsigned::<16, u16>(*max_vendor_id)?;
                self.write_bit(true)?;
                self.write_integer_range(ranges)
            }
        }
    }

    fn write_array_of_ranges(&mut self, ranges: &[Range]) -> io::Result<()> {
        let n = u16::try_from(ranges.len()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("too many ranges ({})", ranges.len()),
            )
        })?;
        self.write_unsigned::<12, u16>(n)?;

        for r in ranges {
            self.write_unsigned::<6, u8>(r.key)?;
            self.write_unsigned::<2, u8>(r.range_type)?;
            self.write_integer_range(&range::runs(r.ids))?;
        }

        Ok(())
    }
}

/// Runs `f` against a big endian bit writer, then pads the output with zeroes
/// up to the next byte boundary.
pub(crate) fn aligned_bytes<F, E>(f: F) -> Result<Vec<u8>, E>
where
    F: FnOnce(&mut BitWriter<&mut Vec<u8>, BigEndian>) -> Result<(), E>,
    E: From<io::Error>,
{
    let mut bytes = vec![];
    {
        let mut w = BitWriter::endian(&mut bytes, BigEndian);
        f(&mut w)?;
        w.byte_align()?;
    }

    Ok(bytes)
}
