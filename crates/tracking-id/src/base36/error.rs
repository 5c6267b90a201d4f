/// Errors produced while decoding base-36 text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Base36Error {
    /// The input was empty or longer than [`MAX_ENCODED_LEN`].
    ///
    /// [`MAX_ENCODED_LEN`]: crate::MAX_ENCODED_LEN
    #[error("invalid length: {len}")]
    InvalidLength { len: usize },

    /// The input contained a byte outside `0-9A-Za-z`.
    #[error("invalid ascii byte {byte:#04x} at index {index}")]
    InvalidAscii { byte: u8, index: usize },

    /// The decoded value does not fit the target.
    #[error("decode overflow: {input}")]
    Overflow { input: String },
}

/// A string that is not a well-formed tracking number.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("tracking number {value:?} must match ^[A-Z0-9]{{1,16}}$")]
pub struct InvalidTrackingNumber {
    pub value: String,
}
