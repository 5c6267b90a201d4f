use crate::base36::InvalidTrackingNumber;
use core::{fmt, str::FromStr};

/// Maximum length of a tracking number accepted by the store.
pub const TRACKING_NUMBER_MAX_LEN: usize = 16;

/// Returns true if `value` matches `^[A-Z0-9]{1,16}$`.
pub fn is_valid_tracking_number(value: &str) -> bool {
    (1..=TRACKING_NUMBER_MAX_LEN).contains(&value.len())
        && value
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// An uppercase alphanumeric tracking number of 1 to 16 characters.
///
/// The only way to obtain one is through validation, so holders can rely on
/// the `^[A-Z0-9]{1,16}$` shape.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackingNumber(String);

impl TrackingNumber {
    /// Validates `value` as a tracking number.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTrackingNumber`] if `value` is empty, longer than 16
    /// characters, or contains anything other than `A-Z` and `0-9`.
    pub fn parse(value: impl Into<String>) -> Result<Self, InvalidTrackingNumber> {
        let value = value.into();
        if is_valid_tracking_number(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidTrackingNumber { value })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for TrackingNumber {
    type Err = InvalidTrackingNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for TrackingNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_pattern() {
        for ok in ["A", "0", "1Y2P0IJ32E8E7", "ABCDEFGHIJKLMNOP"] {
            assert_eq!(TrackingNumber::parse(ok).unwrap().as_str(), ok);
        }
    }

    #[test]
    fn rejects_everything_else() {
        for bad in ["", "abc", "ABC-1", "ABCDEFGHIJKLMNOPQ", "ÄB", " A"] {
            let err = TrackingNumber::parse(bad).unwrap_err();
            assert_eq!(err.value, bad);
        }
    }
}
