//! CryptoNote Base58 encoding/decoding.
//!
//! Not Bitcoin's Base58Check: CryptoNote splits data into 8-byte blocks, each
//! encoding to exactly 11 characters, so addresses have a fixed length for a
//! fixed payload size. A trailing partial block encodes through a size table.
//!
//! Reference: monero/src/common/base58.cpp

use crate::constants::CHECKSUM_SIZE;
use thiserror::Error;
use tiny_keccak::{Hasher, Keccak};

/// Base58 alphabet, shared with Bitcoin.
const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Bytes per full block.
const BLOCK_SIZE: usize = 8;

/// Characters per full encoded block.
const ENCODED_BLOCK_SIZE: usize = 11;

/// Characters produced by a partial block of N bytes.
const PARTIAL_ENCODED_SIZES: [usize; 9] = [0, 2, 3, 5, 6, 7, 9, 10, 11];

/// Bytes recovered from a partial encoded block of N characters; None = invalid.
const fn partial_decoded_size(chars: usize) -> Option<usize> {
    let mut bytes = 0;
    while bytes < PARTIAL_ENCODED_SIZES.len() {
        if PARTIAL_ENCODED_SIZES[bytes] == chars {
            return Some(bytes);
        }
        bytes += 1;
    }
    None
}

const fn build_digit_table() -> [i8; 128] {
    let mut table = [-1i8; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as i8;
        i += 1;
    }
    table
}

static DIGITS: [i8; 128] = build_digit_table();

#[derive(Debug, Error)]
pub enum Base58Error {
    #[error("invalid base58 symbol at position {0}")]
    InvalidSymbol(usize),

    #[error("encoded length {0} has an invalid trailing block of {1} characters")]
    InvalidLength(usize, usize),

    #[error("block {0} decodes beyond its byte width")]
    BlockOverflow(usize),

    #[error("decoded payload too short ({0} bytes)")]
    PayloadTooShort(usize),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("malformed varint prefix")]
    BadVarint,
}

fn checksum(data: &[u8]) -> [u8; CHECKSUM_SIZE] {
    let mut keccak = Keccak::v256();
    let mut digest = [0u8; 32];
    keccak.update(data);
    keccak.finalize(&mut digest);
    let mut out = [0u8; CHECKSUM_SIZE];
    out.copy_from_slice(&digest[..CHECKSUM_SIZE]);
    out
}

fn encode_block(block: &[u8], out: &mut String) {
    let width = PARTIAL_ENCODED_SIZES[block.len()];
    let mut num = block.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64);

    let mut buf = [ALPHABET[0]; ENCODED_BLOCK_SIZE];
    let mut i = width;
    while num > 0 {
        i -= 1;
        buf[i] = ALPHABET[(num % 58) as usize];
        num /= 58;
    }
    for &b in &buf[..width] {
        out.push(b as char);
    }
}

fn decode_block(block: &[u8], block_index: usize, out: &mut Vec<u8>) -> Result<(), Base58Error> {
    let width = partial_decoded_size(block.len())
        .ok_or(Base58Error::InvalidLength(block.len(), block.len()))?;

    let mut num: u64 = 0;
    for (i, &ch) in block.iter().enumerate() {
        let digit = if ch < 128 { DIGITS[ch as usize] } else { -1 };
        if digit < 0 {
            return Err(Base58Error::InvalidSymbol(block_index * ENCODED_BLOCK_SIZE + i));
        }
        num = num
            .checked_mul(58)
            .and_then(|n| n.checked_add(digit as u64))
            .ok_or(Base58Error::BlockOverflow(block_index))?;
    }

    if width < BLOCK_SIZE && num >= 1u64 << (8 * width) {
        return Err(Base58Error::BlockOverflow(block_index));
    }

    for shift in (0..width).rev() {
        out.push((num >> (8 * shift)) as u8);
    }
    Ok(())
}

/// Encode binary data to CryptoNote Base58.
pub fn encode(data: &[u8]) -> String {
    let tail = data.len() % BLOCK_SIZE;
    let mut result = String::with_capacity(
        (data.len() / BLOCK_SIZE) * ENCODED_BLOCK_SIZE + PARTIAL_ENCODED_SIZES[tail],
    );
    for block in data.chunks(BLOCK_SIZE) {
        encode_block(block, &mut result);
    }
    result
}

/// Decode a CryptoNote Base58 string to binary data.
pub fn decode(encoded: &str) -> Result<Vec<u8>, Base58Error> {
    let bytes = encoded.as_bytes();
    let tail = bytes.len() % ENCODED_BLOCK_SIZE;
    if tail > 0 && partial_decoded_size(tail).is_none() {
        return Err(Base58Error::InvalidLength(encoded.len(), tail));
    }

    let mut result = Vec::with_capacity((bytes.len() / ENCODED_BLOCK_SIZE + 1) * BLOCK_SIZE);
    for (i, block) in bytes.chunks(ENCODED_BLOCK_SIZE).enumerate() {
        decode_block(block, i, &mut result)?;
    }
    Ok(result)
}

/// Encode an unsigned LEB128 varint.
pub fn encode_varint(mut value: u64) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(10);
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value > 0 {
            byte |= 0x80;
        }
        bytes.push(byte);
        if value == 0 {
            return bytes;
        }
    }
}

/// Decode an unsigned LEB128 varint from the start of `data`.
/// Returns the value and the number of bytes consumed.
pub fn decode_varint(data: &[u8]) -> Result<(u64, usize), Base58Error> {
    let mut value: u64 = 0;
    for (i, &byte) in data.iter().enumerate().take(10) {
        value |= ((byte & 0x7F) as u64) << (7 * i as u32);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(Base58Error::BadVarint)
}

/// Encode an address: varint prefix tag, payload, then a 4-byte Keccak-256
/// checksum over both, all through the block codec.
pub fn encode_address(tag: u64, data: &[u8]) -> String {
    let mut payload = encode_varint(tag);
    payload.extend_from_slice(data);
    let sum = checksum(&payload);
    payload.extend_from_slice(&sum);
    encode(&payload)
}

/// Decode an address, verify its checksum, and split off the varint tag.
pub fn decode_address(address: &str) -> Result<(u64, Vec<u8>), Base58Error> {
    let decoded = decode(address)?;
    if decoded.len() <= CHECKSUM_SIZE {
        return Err(Base58Error::PayloadTooShort(decoded.len()));
    }

    let (payload, sum) = decoded.split_at(decoded.len() - CHECKSUM_SIZE);
    if checksum(payload) != sum {
        return Err(Base58Error::ChecksumMismatch);
    }

    let (tag, consumed) = decode_varint(payload)?;
    Ok((tag, payload[consumed..].to_vec()))
}
