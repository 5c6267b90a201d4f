use crate::base36::Base36Error;

const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const NO_VALUE: u8 = 255;
const RADIX: u64 = 36;

/// Length of the longest base-36 encoding of a `u64` (`u64::MAX` is
/// `3W5E11264SGSF`).
pub const MAX_ENCODED_LEN: usize = 13;

/// Lookup table for base-36 decoding; lower-case letters are accepted.
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0_u8;
    while i < 36 {
        let c = ALPHABET[i as usize];
        lut[c as usize] = i;
        if c.is_ascii_uppercase() {
            lut[(c + 32) as usize] = i;
        }
        i += 1;
    }
    lut
};

/// Encodes `value` as uppercase base-36 with no padding.
///
/// Total over the whole `u64` domain; the output always matches
/// `^[0-9A-Z]{1,13}$`.
///
/// # Example
///
/// ```
/// use tracking_id::encode_base36;
///
/// assert_eq!(encode_base36(0), "0");
/// assert_eq!(encode_base36(35), "Z");
/// assert_eq!(encode_base36(36), "10");
/// ```
pub fn encode_base36(mut value: u64) -> String {
    let mut buf = [0_u8; MAX_ENCODED_LEN];
    let mut pos = MAX_ENCODED_LEN;
    loop {
        pos -= 1;
        buf[pos] = ALPHABET[(value % RADIX) as usize];
        value /= RADIX;
        if value == 0 {
            break;
        }
    }
    buf[pos..].iter().map(|&b| char::from(b)).collect()
}

/// Decodes base-36 text (either case) into a `u64`.
///
/// # Errors
///
/// - [`Base36Error::InvalidLength`] for empty input or input longer than
///   [`MAX_ENCODED_LEN`]
/// - [`Base36Error::InvalidAscii`] for bytes outside `0-9A-Za-z`
/// - [`Base36Error::Overflow`] when the value exceeds `u64::MAX`
pub fn decode_base36(encoded: &str) -> Result<u64, Base36Error> {
    let len = encoded.len();
    if len == 0 || len > MAX_ENCODED_LEN {
        return Err(Base36Error::InvalidLength { len });
    }

    let mut acc = 0_u64;
    for (index, byte) in encoded.bytes().enumerate() {
        let val = LOOKUP[byte as usize];
        if val == NO_VALUE {
            return Err(Base36Error::InvalidAscii { byte, index });
        }
        acc = acc
            .checked_mul(RADIX)
            .and_then(|acc| acc.checked_add(u64::from(val)))
            .ok_or_else(|| Base36Error::Overflow {
                input: encoded.to_owned(),
            })?;
    }
    Ok(acc)
}
