#![doc = r#"
Byte sink mirroring [`Reader`](crate::reader::Reader).

Writes go to an owned `Vec<u8>` and cannot fail; all fallibility in the
encoders comes from the models themselves, not the sink.
"#]

/// An append-only byte buffer with fixed-width and variable-length writes.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the writer, returning the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Append a single byte.
    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a big-endian `u16`.
    pub fn write_u16_be(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Append a big-endian `u32`.
    pub fn write_u32_be(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Append the low 24 bits of `v`, big-endian.
    pub fn write_u24_be(&mut self, v: u32) {
        self.buf.push((v >> 16) as u8);
        self.buf.push((v >> 8) as u8);
        self.buf.push(v as u8);
    }

    /// Append a little-endian `u16`.
    pub fn write_u16_le(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Append a little-endian `i16`.
    pub fn write_i16_le(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Append a little-endian `u32`.
    pub fn write_u32_le(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Append a little-endian `i32`.
    pub fn write_i32_le(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Append a little-endian `f32`.
    pub fn write_f32_le(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Append a MIDI variable-length quantity, minimally encoded.
    pub fn write_varint(&mut self, value: u32) {
        if value > 0x7F {
            let mut shift = 7;
            while value >> shift > 0x7F {
                shift += 7;
            }
            while shift > 0 {
                self.buf.push((value >> shift & 0x7F) as u8 | 0x80);
                shift -= 7;
            }
        }
        self.buf.push((value & 0x7F) as u8);
    }

    /// Append a string prefixed with its little-endian `u32` length.
    pub fn write_symbol(&mut self, s: &str) {
        self.write_u32_le(s.len() as u32);
        self.buf.extend_from_slice(s.as_bytes());
    }

    /// Append a little-endian `u32` count followed by each record.
    pub fn write_list<T>(&mut self, items: &[T], mut write_one: impl FnMut(&mut Self, &T)) {
        self.write_u32_le(items.len() as u32);
        for item in items {
            write_one(self, item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Reader;
    use pretty_assertions::assert_eq;

    #[test]
    fn varint_matches_known_encodings() {
        let cases: [(u32, &[u8]); 6] = [
            (0, &[0x00]),
            (0x40, &[0x40]),
            (0x7F, &[0x7F]),
            (128, &[0x81, 0x00]),
            (0x4000, &[0x81, 0x80, 0x00]),
            (0x0FFF_FFFF, &[0xFF, 0xFF, 0xFF, 0x7F]),
        ];
        for (value, expected) in cases {
            let mut w = Writer::new();
            w.write_varint(value);
            assert_eq!(w.into_bytes(), expected, "value {value:#x}");
        }
    }

    #[test]
    fn varint_round_trips() {
        for value in [0u32, 1, 127, 128, 16383, 16384, 2_097_151, 2_097_152] {
            let mut w = Writer::new();
            w.write_varint(value);
            let bytes = w.into_bytes();
            assert_eq!(Reader::new(&bytes).read_varint().unwrap(), value);
        }
    }

    #[test]
    fn u24_round_trips() {
        let mut w = Writer::new();
        w.write_u24_be(500_000);
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), 3);
        assert_eq!(Reader::new(&bytes).read_u24_be().unwrap(), 500_000);
    }
}
