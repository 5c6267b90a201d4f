//! Order details attached to every tracking number, and the records handed to
//! and returned by a [`Store`].
//!
//! Raw request input arrives as [`TrackingRequestParams`] (plain strings) and
//! is validated into a [`TrackingRequest`]; every field of the latter is a
//! type that can only hold well-formed values.
//!
//! [`Store`]: crate::Store

use crate::base36::TrackingNumber;
use chrono::{DateTime, FixedOffset, Utc};
use core::fmt;
use uuid::Uuid;

/// Longest accepted customer name or slug, in characters.
pub const MAX_CUSTOMER_FIELD_LEN: usize = 255;

/// A request field that failed validation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{field} {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: &'static str,
}

impl ValidationError {
    pub const fn new(field: &'static str, reason: &'static str) -> Self {
        Self { field, reason }
    }
}

/// An ISO 3166-1 alpha-2 country code: exactly two uppercase ASCII letters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    /// # Errors
    ///
    /// Returns the failure reason if `value` is not two uppercase letters.
    pub fn parse(value: &str) -> Result<Self, &'static str> {
        match value.as_bytes() {
            [a, b] if a.is_ascii_uppercase() && b.is_ascii_uppercase() => Ok(Self([*a, *b])),
            _ => Err("must be 2 uppercase letters (ISO 3166-1 alpha-2)"),
        }
    }

    pub fn as_str(&self) -> &str {
        // Both bytes are ASCII uppercase letters.
        core::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A positive weight in kilograms with at most 7 integer and 3 fractional
/// digits, stored as an exact number of thousandths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Weight {
    thousandths: u64,
}

impl Weight {
    const MAX_INTEGER_DIGITS: usize = 7;
    const MAX_FRACTION_DIGITS: usize = 3;

    /// Parses a plain decimal such as `1.234` or `12`.
    ///
    /// # Errors
    ///
    /// Returns the failure reason for non-decimal input, too many digits, or a
    /// value that is not strictly positive.
    pub fn parse(value: &str) -> Result<Self, &'static str> {
        let (integer, fraction) = value.split_once('.').unwrap_or((value, ""));
        if integer.is_empty()
            || (value.contains('.') && fraction.is_empty())
            || !integer.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err("must be a decimal number");
        }

        let significant = integer.trim_start_matches('0');
        if significant.len() > Self::MAX_INTEGER_DIGITS
            || fraction.len() > Self::MAX_FRACTION_DIGITS
        {
            return Err("can have up to 7 integer and 3 decimal places");
        }

        let whole: u64 = significant.parse().unwrap_or(0);
        let mut frac: u64 = fraction.parse().unwrap_or(0);
        for _ in fraction.len()..Self::MAX_FRACTION_DIGITS {
            frac *= 10;
        }

        let thousandths = whole * 1_000 + frac;
        if thousandths == 0 {
            return Err("must be positive");
        }
        Ok(Self { thousandths })
    }

    pub const fn from_thousandths(thousandths: u64) -> Self {
        Self { thousandths }
    }

    pub const fn as_thousandths(&self) -> u64 {
        self.thousandths
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.thousandths / 1_000, self.thousandths % 1_000)
    }
}

/// A kebab-case customer slug such as `redbox-logistics`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CustomerSlug(String);

impl CustomerSlug {
    /// # Errors
    ///
    /// Returns the failure reason if `value` is blank, too long, or not
    /// `^[a-z0-9]+(?:-[a-z0-9]+)*$`.
    pub fn parse(value: &str) -> Result<Self, &'static str> {
        if value.trim().is_empty() {
            return Err("is required");
        }
        if value.chars().count() > MAX_CUSTOMER_FIELD_LEN {
            return Err("cannot exceed 255 characters");
        }
        let kebab = value.split('-').all(|part| {
            !part.is_empty()
                && part
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        });
        if !kebab {
            return Err("must be in kebab-case (e.g., 'redbox-logistics')");
        }
        Ok(Self(value.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn parse_customer_name(value: &str) -> Result<String, &'static str> {
    if value.trim().is_empty() {
        return Err("is required");
    }
    if value.chars().count() > MAX_CUSTOMER_FIELD_LEN {
        return Err("cannot exceed 255 characters");
    }
    Ok(value.to_owned())
}

/// Unvalidated order details, exactly as received.
///
/// Missing fields deserialize as empty strings so they are reported by
/// validation rather than by the deserializer.
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackingRequestParams {
    pub origin_country_id: String,
    pub destination_country_id: String,
    pub weight: String,
    /// Order creation time, RFC 3339.
    pub created_at: String,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_slug: String,
}

/// Validated order details stored alongside a tracking number for auditing.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackingRequest {
    pub origin_country_id: CountryCode,
    pub destination_country_id: CountryCode,
    pub weight: Weight,
    pub order_created_at: DateTime<FixedOffset>,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub customer_slug: CustomerSlug,
}

impl TryFrom<TrackingRequestParams> for TrackingRequest {
    type Error = ValidationError;

    /// Validates each field in declaration order and reports the first
    /// failure.
    fn try_from(params: TrackingRequestParams) -> Result<Self, Self::Error> {
        let field =
            |name: &'static str| move |reason: &'static str| ValidationError::new(name, reason);

        Ok(Self {
            origin_country_id: CountryCode::parse(&params.origin_country_id)
                .map_err(field("origin_country_id"))?,
            destination_country_id: CountryCode::parse(&params.destination_country_id)
                .map_err(field("destination_country_id"))?,
            weight: Weight::parse(&params.weight).map_err(field("weight"))?,
            order_created_at: DateTime::parse_from_rfc3339(&params.created_at)
                .map_err(|_| ValidationError::new("created_at", "must be an RFC 3339 timestamp"))?,
            customer_id: Uuid::parse_str(&params.customer_id)
                .map_err(|_| ValidationError::new("customer_id", "must be a UUID"))?,
            customer_name: parse_customer_name(&params.customer_name)
                .map_err(field("customer_name"))?,
            customer_slug: CustomerSlug::parse(&params.customer_slug)
                .map_err(field("customer_slug"))?,
        })
    }
}

/// A record ready to be inserted: a fresh tracking number plus the order
/// details.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTrackingRecord {
    pub tracking_number: TrackingNumber,
    pub details: TrackingRequest,
}

impl NewTrackingRecord {
    /// Completes the record with the store-assigned row ID and generation
    /// time.
    pub fn into_record(self, id: u64, generated_at: DateTime<Utc>) -> TrackingRecord {
        TrackingRecord {
            id,
            tracking_number: self.tracking_number,
            generated_at,
            details: self.details,
        }
    }
}

/// A persisted tracking number. Created once and never modified.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackingRecord {
    /// Store-internal row ID.
    pub id: u64,
    pub tracking_number: TrackingNumber,
    /// When the store persisted the record.
    pub generated_at: DateTime<Utc>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub details: TrackingRequest,
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::{CountryCode, CustomerSlug, Weight};
    use serde::{Serialize, Serializer};

    impl Serialize for CountryCode {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(self.as_str())
        }
    }

    // Serialized as a string so no precision is lost.
    impl Serialize for Weight {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    impl Serialize for CustomerSlug {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(self.as_str())
        }
    }
}
