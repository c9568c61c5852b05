//! Length-prefixed byte framing
//!
//! Multi-byte integers are fixed-width big-endian. Strings and raw byte
//! slices are framed as `i64 length || bytes`; booleans are a single
//! `0`/`1` byte. Size-typed values go through [`Serializable`], where the
//! deserializer reads exactly `serialized_size()` bytes back.

use crate::error::{Error, Result};

/// Contract for fixed-size values carried inside a frame
pub trait Serializable {
    /// Exact number of bytes `bytes()` produces and `set_bytes` consumes
    fn serialized_size(&self) -> usize;

    /// Canonical encoding
    fn bytes(&self) -> Vec<u8>;

    /// Decode from a canonical encoding of exactly `serialized_size()` bytes
    fn set_bytes(&mut self, bytes: &[u8]) -> Result<()>;
}

/// Growable output buffer with chainable writers
#[derive(Debug, Clone, Default)]
pub struct Serializer {
    buf: Vec<u8>,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_bytes(&mut self, val: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(val);
        self
    }

    pub fn write_i64(&mut self, val: i64) -> &mut Self {
        self.write_bytes(&val.to_be_bytes())
    }

    pub fn write_i32(&mut self, val: i32) -> &mut Self {
        self.write_bytes(&val.to_be_bytes())
    }

    pub fn write_bytes_with_length(&mut self, val: &[u8]) -> &mut Self {
        self.write_i64(val.len() as i64);
        self.write_bytes(val)
    }

    pub fn write_string(&mut self, val: &str) -> &mut Self {
        self.write_bytes_with_length(val.as_bytes())
    }

    pub fn write_bool(&mut self, val: bool) -> &mut Self {
        self.write_bytes(&[u8::from(val)])
    }

    pub fn write_serializable(&mut self, val: &dyn Serializable) -> &mut Self {
        let encoded = val.bytes();
        debug_assert_eq!(encoded.len(), val.serialized_size());
        self.write_bytes(&encoded)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl AsRef<[u8]> for Serializer {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}

/// Cursor over a borrowed frame
#[derive(Debug)]
pub struct Deserializer<'a> {
    buf: &'a [u8],
    cur: usize,
}

impl<'a> Deserializer<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, cur: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.cur
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::StreamEof);
        }
        let out = &self.buf[self.cur..self.cur + len];
        self.cur += len;
        Ok(out)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        let raw = self.read_bytes(8)?;
        Ok(i64::from_be_bytes(raw.try_into().expect("8-byte slice")))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let raw = self.read_bytes(4)?;
        Ok(i32::from_be_bytes(raw.try_into().expect("4-byte slice")))
    }

    /// Reads an i64 length prefix and validates it against the remainder.
    fn read_length(&mut self) -> Result<usize> {
        let len = self.read_i64()?;
        if len < 0 || len as u64 > self.remaining() as u64 {
            return Err(Error::BadLengthPrefix(len));
        }
        Ok(len as usize)
    }

    pub fn read_bytes_with_length(&mut self) -> Result<Vec<u8>> {
        let len = self.read_length()?;
        Ok(self.read_bytes(len)?.to_vec())
    }

    pub fn read_string(&mut self) -> Result<String> {
        let raw = self.read_bytes_with_length()?;
        String::from_utf8(raw).map_err(|_| Error::BadString)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        let raw = self.read_bytes(1)?;
        Ok(raw[0] == 1)
    }

    pub fn read_serializable(&mut self, val: &mut dyn Serializable) -> Result<()> {
        let size = val.serialized_size();
        let raw = self.read_bytes(size)?;
        val.set_bytes(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i64_roundtrip() {
        let mut serializer = Serializer::new();
        serializer.write_i64(23);

        let mut deserializer = Deserializer::new(serializer.as_bytes());
        assert_eq!(deserializer.read_i64().unwrap(), 23);
    }

    #[test]
    fn string_roundtrip() {
        let mut serializer = Serializer::new();
        serializer.write_string("123456");

        let mut deserializer = Deserializer::new(serializer.as_bytes());
        assert_eq!(deserializer.read_string().unwrap(), "123456");
    }

    #[test]
    fn mixed_i32_then_string() {
        let mut serializer = Serializer::new();
        serializer.write_i32(11111).write_string("23456");

        let mut deserializer = Deserializer::new(serializer.as_bytes());
        assert_eq!(deserializer.read_i32().unwrap(), 11111);
        assert_eq!(deserializer.read_string().unwrap(), "23456");
    }

    #[test]
    fn bytes_with_length_then_string() {
        let mut serializer = Serializer::new();
        serializer.write_bytes_with_length(b"123456");
        serializer.write_string("123456");

        let mut deserializer = Deserializer::new(serializer.as_bytes());
        assert_eq!(deserializer.read_bytes_with_length().unwrap(), b"123456");
        assert_eq!(deserializer.read_string().unwrap(), "123456");
    }

    #[test]
    fn bool_roundtrip() {
        let mut serializer = Serializer::new();
        serializer.write_bool(true).write_bool(false);

        let mut deserializer = Deserializer::new(serializer.as_bytes());
        assert!(deserializer.read_bool().unwrap());
        assert!(!deserializer.read_bool().unwrap());
    }

    #[test]
    fn integers_are_big_endian() {
        let mut serializer = Serializer::new();
        serializer.write_i64(1).write_i32(1);
        assert_eq!(
            serializer.as_bytes(),
            &[0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1]
        );
    }

    #[test]
    fn read_past_end_is_eof() {
        let mut deserializer = Deserializer::new(&[0u8; 4]);
        assert!(matches!(deserializer.read_i64(), Err(Error::StreamEof)));
    }

    #[test]
    fn oversized_length_prefix_rejected() {
        let mut serializer = Serializer::new();
        serializer.write_i64(1 << 40);
        let mut deserializer = Deserializer::new(serializer.as_bytes());
        assert!(matches!(
            deserializer.read_bytes_with_length(),
            Err(Error::BadLengthPrefix(_))
        ));
    }
}
