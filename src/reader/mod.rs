#![doc = r#"
Byte cursor over a borrowed slice.

Both file formats are read through the same [`Reader`]: the standard MIDI
file's multi-byte fields are big-endian, the resource format's are
little-endian, and both use length-prefixed strings and (for SMF) the MIDI
variable-length quantity. Every read is bounds-checked and failures carry the
byte position where the read started.
"#]

mod error;
pub use error::*;

/// A cursor over a borrowed byte slice with an explicit position.
///
/// Reads never panic; a read past the end of the slice yields
/// [`ReaderErrorKind::OutOfBounds`] at the position the read began.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader over the given bytes, positioned at the start.
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// The current byte offset into the underlying slice.
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes left to read.
    pub const fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Borrow the next `n` bytes and advance past them.
    pub fn read_bytes(&mut self, n: usize) -> ReadResult<&'a [u8]> {
        let start = self.pos;
        let end = start.checked_add(n).ok_or(ReaderError::oob(start))?;
        let slice = self.bytes.get(start..end).ok_or(ReaderError::oob(start))?;
        self.pos = end;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let slice = self.read_bytes(N)?;
        // read_bytes guarantees the length
        Ok(slice.try_into().unwrap())
    }

    /// Look at the next byte without consuming it.
    pub fn peek_u8(&self) -> ReadResult<u8> {
        self.bytes
            .get(self.pos)
            .copied()
            .ok_or(ReaderError::oob(self.pos))
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        let [b] = self.read_array()?;
        Ok(b)
    }

    /// Read a big-endian `u16`.
    pub fn read_u16_be(&mut self) -> ReadResult<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian `u32`.
    pub fn read_u32_be(&mut self) -> ReadResult<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian 24-bit integer into the low bits of a `u32`.
    pub fn read_u24_be(&mut self) -> ReadResult<u32> {
        let [a, b, c] = self.read_array()?;
        Ok(u32::from(a) << 16 | u32::from(b) << 8 | u32::from(c))
    }

    /// Read a little-endian `u16`.
    pub fn read_u16_le(&mut self) -> ReadResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian `i16`.
    pub fn read_i16_le(&mut self) -> ReadResult<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian `u32`.
    pub fn read_u32_le(&mut self) -> ReadResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian `i32`.
    pub fn read_i32_le(&mut self) -> ReadResult<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian `f32`.
    pub fn read_f32_le(&mut self) -> ReadResult<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    /// Read a MIDI variable-length quantity.
    ///
    /// Base-128, most significant group first, continuation bit `0x80`.
    /// A value spanning more than four encoded bytes is an error.
    pub fn read_varint(&mut self) -> ReadResult<u32> {
        let start = self.pos;
        let mut value = 0u32;
        for _ in 0..4 {
            let byte = self.read_u8()?;
            value = value << 7 | u32::from(byte & 0x7F);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(ReaderError::new(start, ReaderErrorKind::VarIntTooLong))
    }

    /// Read a fixed-length UTF-8 string.
    pub fn read_str(&mut self, len: usize) -> ReadResult<String> {
        let start = self.pos;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| ReaderError::new(start, ReaderErrorKind::InvalidString))
    }

    /// Read a string prefixed with its little-endian `u32` length.
    pub fn read_symbol(&mut self) -> ReadResult<String> {
        let len = self.read_u32_le()?;
        self.read_str(len as usize)
    }

    /// Read a little-endian `u32` count followed by that many records.
    pub fn read_list<T>(
        &mut self,
        mut read_one: impl FnMut(&mut Self) -> ReadResult<T>,
    ) -> ReadResult<Vec<T>> {
        let count = self.read_u32_le()?;
        let mut items = Vec::with_capacity(count.min(0x10000) as usize);
        for _ in 0..count {
            items.push(read_one(self)?);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn varint_single_byte() {
        let mut r = Reader::new(&[0x00, 0x40, 0x7F]);
        assert_eq!(r.read_varint().unwrap(), 0);
        assert_eq!(r.read_varint().unwrap(), 0x40);
        assert_eq!(r.read_varint().unwrap(), 0x7F);
    }

    #[test]
    fn varint_multi_byte() {
        let mut r = Reader::new(&[0x81, 0x00]);
        assert_eq!(r.read_varint().unwrap(), 128);
        let mut r = Reader::new(&[0x81, 0x80, 0x00]);
        assert_eq!(r.read_varint().unwrap(), 0x4000);
        let mut r = Reader::new(&[0xFF, 0xFF, 0xFF, 0x7F]);
        assert_eq!(r.read_varint().unwrap(), 0x0FFF_FFFF);
    }

    #[test]
    fn varint_too_long() {
        let mut r = Reader::new(&[0xFF, 0xFF, 0xFF, 0xFF, 0x7F]);
        let err = r.read_varint().unwrap_err();
        assert!(matches!(err.error_kind(), ReaderErrorKind::VarIntTooLong));
        assert_eq!(err.position(), 0);
    }

    #[test]
    fn short_read_reports_start_position() {
        let mut r = Reader::new(&[0x01, 0x02]);
        r.read_u8().unwrap();
        let err = r.read_u32_be().unwrap_err();
        assert!(err.is_out_of_bounds());
        assert_eq!(err.position(), 1);
    }

    #[test]
    fn endian_pairs() {
        let mut r = Reader::new(&[0x12, 0x34, 0x12, 0x34]);
        assert_eq!(r.read_u16_be().unwrap(), 0x1234);
        assert_eq!(r.read_u16_le().unwrap(), 0x3412);
    }

    #[test]
    fn symbol_reads_length_prefixed_text() {
        let mut r = Reader::new(&[0x05, 0x00, 0x00, 0x00, b'd', b'r', b'u', b'm', b's']);
        assert_eq!(r.read_symbol().unwrap(), "drums");
        assert_eq!(r.remaining(), 0);
    }
}
