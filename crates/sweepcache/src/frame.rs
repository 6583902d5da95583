//! On-arena frame layout and codec.
//!
//! A frame is a little-endian, length-prefixed binary record:
//!
//! ```text
//! [ frame_len: u32 | created_at: i64 | hashed_key: u64 | value: ..frame_len-20 ]
//! ```
//!
//! `frame_len` includes itself; the header is fixed at 20 bytes.

use crate::error::CodecError;

pub(crate) const HEADER_LEN: usize = 20;
const FRAME_LEN_OFFSET: usize = 0;
const CREATED_AT_OFFSET: usize = 4;
const HASHED_KEY_OFFSET: usize = 12;
const VALUE_OFFSET: usize = HEADER_LEN;

/// Total encoded size, in bytes, of a frame carrying `value`.
pub(crate) fn frame_len_for(value: &[u8]) -> usize {
    HEADER_LEN + value.len()
}

/// Encodes `(hashed_key, created_at, value)` into `dst`, returning the number
/// of bytes written. Fails if `dst` is shorter than the frame needs.
pub(crate) fn encode(
    hashed_key: u64,
    created_at: i64,
    value: &[u8],
    dst: &mut [u8],
) -> Result<usize, CodecError> {
    let needed = frame_len_for(value);
    if dst.len() < needed {
        return Err(CodecError::ShortBuffer);
    }

    dst[FRAME_LEN_OFFSET..FRAME_LEN_OFFSET + 4].copy_from_slice(&(needed as u32).to_le_bytes());
    dst[CREATED_AT_OFFSET..CREATED_AT_OFFSET + 8].copy_from_slice(&created_at.to_le_bytes());
    dst[HASHED_KEY_OFFSET..HASHED_KEY_OFFSET + 8].copy_from_slice(&hashed_key.to_le_bytes());
    dst[VALUE_OFFSET..needed].copy_from_slice(value);

    Ok(needed)
}

/// Reads the `frame_len` header field out of a slice that begins at a frame
/// boundary, without validating the rest of the frame.
pub(crate) fn peek_frame_len(src: &[u8]) -> u32 {
    u32::from_le_bytes(src[FRAME_LEN_OFFSET..FRAME_LEN_OFFSET + 4].try_into().unwrap())
}

/// Decodes a full frame, copying the value out into a freshly-allocated buffer.
pub(crate) fn decode(src: &[u8]) -> Result<(u64, i64, Vec<u8>), CodecError> {
    let frame_len = peek_frame_len(src) as usize;
    if frame_len > src.len() || frame_len < HEADER_LEN {
        return Err(CodecError::ShortFrame);
    }

    let created_at =
        i64::from_le_bytes(src[CREATED_AT_OFFSET..CREATED_AT_OFFSET + 8].try_into().unwrap());
    let hashed_key =
        u64::from_le_bytes(src[HASHED_KEY_OFFSET..HASHED_KEY_OFFSET + 8].try_into().unwrap());
    let value = src[VALUE_OFFSET..frame_len].to_vec();

    Ok((hashed_key, created_at, value))
}

/// Convenience accessor: decode just the value.
pub(crate) fn value_of(frame: &[u8]) -> Result<Vec<u8>, CodecError> {
    decode(frame).map(|(_, _, v)| v)
}

/// Convenience accessor: decode just the creation timestamp.
pub(crate) fn timestamp_of(frame: &[u8]) -> Result<i64, CodecError> {
    decode(frame).map(|(_, t, _)| t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let value = b"pikachu";
        let mut buf = vec![0u8; frame_len_for(value)];
        let n = encode(12345678, 1605351329, value, &mut buf).unwrap();
        assert_eq!(n, 27);
        assert_eq!(&buf[0..4], &[0x1B, 0x00, 0x00, 0x00]);

        let (hashed_key, ts, decoded_value) = decode(&buf).unwrap();
        assert_eq!(hashed_key, 12345678);
        assert_eq!(ts, 1605351329);
        assert_eq!(decoded_value, value);
    }

    #[test]
    fn frame_len_for_matches_header_plus_value() {
        assert_eq!(frame_len_for(b""), HEADER_LEN);
        assert_eq!(frame_len_for(b"hello"), HEADER_LEN + 5);
    }

    #[test]
    fn encode_rejects_short_destination() {
        let mut buf = [0u8; 10];
        let err = encode(1, 2, b"too long for this buffer", &mut buf).unwrap_err();
        assert_eq!(err, CodecError::ShortBuffer);
    }

    #[test]
    fn decode_rejects_truncated_frame() {
        let value = b"abc";
        let mut buf = vec![0u8; frame_len_for(value)];
        encode(1, 2, value, &mut buf).unwrap();
        let err = decode(&buf[..buf.len() - 1]).unwrap_err();
        assert_eq!(err, CodecError::ShortFrame);
    }

    #[test]
    fn value_of_and_timestamp_of_match_decode() {
        let value = b"some-value";
        let mut buf = vec![0u8; frame_len_for(value)];
        encode(42, 99, value, &mut buf).unwrap();
        assert_eq!(value_of(&buf).unwrap(), value);
        assert_eq!(timestamp_of(&buf).unwrap(), 99);
    }
}
