//! # echo-codec
//!
//! Binary wire codec for Echo signing payloads.
//!
//! The chain's consensus layer signs a packed byte form of every transaction.
//! This crate provides the primitive encoders that form is built from. The
//! codec is write-only: nothing on the client side ever decodes these bytes,
//! responses and notices travel as JSON.
//!
//! ## Encoding Rules
//!
//! - Integers: fixed width, little-endian (`u16`, `u32`, `u64`, `i64`)
//! - `bool` and `u8`: one byte
//! - Strings: 1-byte length prefix + raw UTF-8 bytes
//! - Collections: 1-byte element count + concatenated element encodings
//! - Optional fields: see [`encode_optional`] and [`Presence`]
//!
//! Length prefixes are a single byte. Values longer than
//! [`MAX_PREFIXED_LEN`] wrap when encoded, so callers validate with
//! [`check_length`] before anything reaches the encoder.

#![warn(missing_docs)]
#![warn(clippy::all)]

use bytes::{BufMut, BytesMut};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Largest string or collection length a 1-byte prefix can carry.
pub const MAX_PREFIXED_LEN: usize = u8::MAX as usize;

/// Codec errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A string or collection is too long for its 1-byte length prefix
    #[error("{what} length {len} exceeds the 1-byte prefix limit of {MAX_PREFIXED_LEN}")]
    LengthOverflow {
        /// Field being validated
        what: &'static str,
        /// Actual length
        len: usize,
    },
}

/// A type with a canonical binary wire form.
pub trait Encode {
    /// Append the wire form of `self` to `out`.
    fn encode_to(&self, out: &mut BytesMut);

    /// Encode `self` into a fresh byte vector.
    fn encode(&self) -> Vec<u8> {
        let mut buf = BytesMut::new();
        self.encode_to(&mut buf);
        buf.to_vec()
    }
}

/// Presence-marker convention for an optional field.
///
/// Protocol fields differ here: some carry a leading flag byte before the
/// value, others write the value bare. Both write a single zero byte when the
/// value is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// `0x01` followed by the value
    Flagged,
    /// The value alone
    Bare,
}

/// Encode an optional field using the given presence convention.
pub fn encode_optional<T: Encode + ?Sized>(out: &mut BytesMut, value: Option<&T>, presence: Presence) {
    match (value, presence) {
        (None, _) => out.put_u8(0),
        (Some(v), Presence::Flagged) => {
            out.put_u8(1);
            v.encode_to(out);
        }
        (Some(v), Presence::Bare) => v.encode_to(out),
    }
}

/// Reject lengths that do not fit a 1-byte prefix.
pub fn check_length(what: &'static str, len: usize) -> Result<(), CodecError> {
    if len > MAX_PREFIXED_LEN {
        return Err(CodecError::LengthOverflow { what, len });
    }
    Ok(())
}

/// Write a 1-byte length prefix. Out-of-range lengths wrap.
pub fn put_length(out: &mut BytesMut, len: usize) {
    out.put_u8(len as u8);
}

/// Write a length-prefixed byte string.
pub fn put_prefixed_bytes(out: &mut BytesMut, bytes: &[u8]) {
    put_length(out, bytes.len());
    out.put_slice(bytes);
}

/// Write a counted collection in iteration order.
///
/// The wire order is whatever order `items` yields. Callers encoding maps
/// must iterate an ordered container so re-encoding stays byte-identical.
pub fn put_collection<'a, T, I>(out: &mut BytesMut, items: I)
where
    T: Encode + 'a,
    I: IntoIterator<Item = &'a T>,
    I::IntoIter: ExactSizeIterator,
{
    let iter = items.into_iter();
    put_length(out, iter.len());
    for item in iter {
        item.encode_to(out);
    }
}

impl Encode for u8 {
    fn encode_to(&self, out: &mut BytesMut) {
        out.put_u8(*self);
    }
}

impl Encode for bool {
    fn encode_to(&self, out: &mut BytesMut) {
        out.put_u8(u8::from(*self));
    }
}

impl Encode for u16 {
    fn encode_to(&self, out: &mut BytesMut) {
        out.put_u16_le(*self);
    }
}

impl Encode for u32 {
    fn encode_to(&self, out: &mut BytesMut) {
        out.put_u32_le(*self);
    }
}

impl Encode for u64 {
    fn encode_to(&self, out: &mut BytesMut) {
        out.put_u64_le(*self);
    }
}

impl Encode for i64 {
    fn encode_to(&self, out: &mut BytesMut) {
        out.put_i64_le(*self);
    }
}

impl Encode for str {
    fn encode_to(&self, out: &mut BytesMut) {
        put_prefixed_bytes(out, self.as_bytes());
    }
}

impl Encode for String {
    fn encode_to(&self, out: &mut BytesMut) {
        self.as_str().encode_to(out);
    }
}

/// Fixed-size arrays are written raw, without a length prefix.
impl<const N: usize> Encode for [u8; N] {
    fn encode_to(&self, out: &mut BytesMut) {
        out.put_slice(self);
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode_to(&self, out: &mut BytesMut) {
        (**self).encode_to(out);
    }
}

impl<A: Encode, B: Encode> Encode for (A, B) {
    fn encode_to(&self, out: &mut BytesMut) {
        self.0.encode_to(out);
        self.1.encode_to(out);
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode_to(&self, out: &mut BytesMut) {
        put_collection(out, self.iter());
    }
}

impl<T: Encode> Encode for BTreeSet<T> {
    fn encode_to(&self, out: &mut BytesMut) {
        put_collection(out, self.iter());
    }
}

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    fn encode_to(&self, out: &mut BytesMut) {
        put_length(out, self.len());
        for (key, value) in self {
            key.encode_to(out);
            value.encode_to(out);
        }
    }
}
