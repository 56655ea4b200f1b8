//! Binary codec primitives for the on-chain wire format
//!
//! The prediction-market program stores accounts and takes instruction
//! arguments in borsh layout: little-endian fixed-width integers, one-byte
//! booleans, 32-byte public keys, `Option<T>` as a one-byte presence flag
//! followed by the payload, and strings as a u32 length prefix followed by
//! raw UTF-8 bytes.
//!
//! `ByteReader` tracks a running cursor so layouts with variable-length
//! fields decode correctly. Reading past the end of the slice, or hitting a
//! boolean/presence flag outside {0, 1}, is a fatal
//! [`ClientError::MalformedAccount`]: there is no lenient parsing.

use crate::error::{ClientError, ClientResult};
use solana_sdk::pubkey::Pubkey;

/// Cursor-based reader over raw account bytes.
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current byte offset into the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor (trailing account padding ends up here).
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, len: usize) -> ClientResult<&'a [u8]> {
        let end = self.pos.checked_add(len).ok_or_else(|| {
            ClientError::MalformedAccount(format!("length overflow at offset {}", self.pos))
        })?;
        if end > self.buf.len() {
            return Err(ClientError::MalformedAccount(format!(
                "unexpected end of data: need {} bytes at offset {}, have {}",
                len,
                self.pos,
                self.buf.len() - self.pos
            )));
        }
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> ClientResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> ClientResult<u16> {
        let bytes: [u8; 2] = self.take(2)?.try_into().unwrap();
        Ok(u16::from_le_bytes(bytes))
    }

    pub fn read_u32(&mut self) -> ClientResult<u32> {
        let bytes: [u8; 4] = self.take(4)?.try_into().unwrap();
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn read_u64(&mut self) -> ClientResult<u64> {
        let bytes: [u8; 8] = self.take(8)?.try_into().unwrap();
        Ok(u64::from_le_bytes(bytes))
    }

    pub fn read_i64(&mut self) -> ClientResult<i64> {
        let bytes: [u8; 8] = self.take(8)?.try_into().unwrap();
        Ok(i64::from_le_bytes(bytes))
    }

    /// One-byte boolean. Anything other than 0 or 1 is malformed.
    pub fn read_bool(&mut self) -> ClientResult<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(ClientError::MalformedAccount(format!(
                "invalid bool byte {} at offset {}",
                other,
                self.pos - 1
            ))),
        }
    }

    pub fn read_pubkey(&mut self) -> ClientResult<Pubkey> {
        let bytes: [u8; 32] = self.take(32)?.try_into().unwrap();
        Ok(Pubkey::new_from_array(bytes))
    }

    /// u32-length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> ClientResult<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            ClientError::MalformedAccount(format!("invalid utf-8 in string field: {e}"))
        })
    }

    /// `Option<T>`: one-byte presence flag, payload only when the flag is 1.
    pub fn read_option<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> ClientResult<T>,
    ) -> ClientResult<Option<T>> {
        match self.read_u8()? {
            0 => Ok(None),
            1 => Ok(Some(read(self)?)),
            other => Err(ClientError::MalformedAccount(format!(
                "invalid option flag {} at offset {}",
                other,
                self.pos - 1
            ))),
        }
    }
}

/// Append-only writer mirroring [`ByteReader`].
///
/// Used for instruction argument encoding and for producing account fixtures
/// in tests.
#[derive(Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn put_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_bool(&mut self, value: bool) {
        self.buf.push(value as u8);
    }

    pub fn put_pubkey(&mut self, value: &Pubkey) {
        self.buf.extend_from_slice(value.as_ref());
    }

    pub fn put_string(&mut self, value: &str) {
        self.put_u32(value.len() as u32);
        self.buf.extend_from_slice(value.as_bytes());
    }

    pub fn put_option<T>(&mut self, value: Option<T>, write: impl FnOnce(&mut Self, T)) {
        match value {
            None => self.put_u8(0),
            Some(inner) => {
                self.put_u8(1);
                write(self, inner);
            }
        }
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
