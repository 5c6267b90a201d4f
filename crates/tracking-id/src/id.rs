use crate::base36::{Base36Error, decode_base36, encode_base36};
use chrono::{DateTime, Utc};
use core::{fmt, time::Duration};

/// A 64-bit tracking identifier using a Snowflake-style layout.
///
/// - 1 bit reserved (always zero, keeps the value positive as a signed
///   integer)
/// - 41 bits timestamp (ms since the generator's epoch, see [`EPOCH`])
/// - 10 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21            12 11             0
///              +--------------+----------------+----------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | worker ID (10) | sequence (12) |
///              +--------------+----------------+----------------+---------------+
///              |<----------- MSB ---------- 64 bits ----------- LSB ----------->|
/// ```
///
/// Ordering on the raw value matches generation order for a single worker:
/// later timestamps compare greater, and within one millisecond a higher
/// sequence compares greater.
///
/// # Example
///
/// ```
/// use tracking_id::TrackingId;
///
/// let id = TrackingId::from_components(123_456, 5, 0);
/// assert_eq!(id.timestamp(), 123_456);
/// assert_eq!(id.worker_id(), 5);
/// assert_eq!(id.sequence(), 0);
/// ```
///
/// [`EPOCH`]: crate::EPOCH
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackingId {
    id: u64,
}

impl TrackingId {
    /// Bitmask for extracting the 41-bit timestamp field. Occupies bits 22
    /// through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << 41) - 1;

    /// Bitmask for extracting the 10-bit worker ID field. Occupies bits 12
    /// through 21.
    pub const WORKER_ID_MASK: u64 = (1 << 10) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = (1 << 12) - 1;

    /// Number of bits to shift the timestamp to its position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 = 22;

    /// Number of bits to shift the worker ID to its position (bit 12).
    pub const WORKER_ID_SHIFT: u64 = 12;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Packs the three fields into an ID. Values wider than their field are
    /// truncated to the field width.
    pub const fn from_components(timestamp: u64, worker_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let worker_id = (worker_id & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | worker_id | sequence,
        }
    }

    /// Wraps a raw value without validation.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the packed value.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Extracts the timestamp (ms since the epoch) from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the worker ID from the packed ID.
    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    pub const fn max_worker_id() -> u64 {
        Self::WORKER_ID_MASK
    }

    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Returns true if the sequence can be incremented within the current
    /// millisecond.
    pub const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::max_sequence()
    }

    /// Returns a new ID with the sequence incremented.
    pub const fn increment_sequence(&self) -> Self {
        Self::from_components(self.timestamp(), self.worker_id(), self.sequence() + 1)
    }

    /// Returns a new ID for a newer timestamp with the sequence reset to zero.
    pub const fn rollover_to_timestamp(&self, timestamp: u64) -> Self {
        Self::from_components(timestamp, self.worker_id(), 0)
    }

    /// Milliseconds since the Unix epoch at which this ID was generated, given
    /// the epoch its generator was configured with.
    pub fn unix_millis(&self, epoch: Duration) -> u64 {
        (epoch.as_millis() as u64).saturating_add(self.timestamp())
    }

    /// The UTC instant at which this ID was generated, given the epoch its
    /// generator was configured with.
    pub fn generated_at(&self, epoch: Duration) -> Option<DateTime<Utc>> {
        let millis = i64::try_from(self.unix_millis(epoch)).ok()?;
        DateTime::from_timestamp_millis(millis)
    }

    /// Encodes the ID as an uppercase base-36 string (at most 13 characters).
    pub fn encode(&self) -> String {
        encode_base36(self.id)
    }

    /// Decodes a base-36 string back into an ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, contains characters
    /// outside `0-9A-Za-z`, or sets the reserved high bit.
    pub fn decode(encoded: &str) -> Result<Self, Base36Error> {
        let raw = decode_base36(encoded)?;
        if raw >> 63 != 0 {
            return Err(Base36Error::Overflow {
                input: encoded.to_owned(),
            });
        }
        Ok(Self::from_raw(raw))
    }
}

impl From<TrackingId> for u64 {
    fn from(id: TrackingId) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

struct FieldLayout {
    name: &'static str,
    bits: u8,
    value: u64,
}

impl TrackingId {
    fn fields(&self) -> [FieldLayout; 4] {
        [
            FieldLayout {
                name: "reserved",
                bits: 1,
                value: self.id >> 63,
            },
            FieldLayout {
                name: "timestamp",
                bits: 41,
                value: self.timestamp(),
            },
            FieldLayout {
                name: "worker_id",
                bits: 10,
                value: self.worker_id(),
            },
            FieldLayout {
                name: "sequence",
                bits: 12,
                value: self.sequence(),
            },
        ]
    }
}

fn center(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(s.len());
    let left = pad / 2;
    format!("{}{}{}", " ".repeat(left), s, " ".repeat(pad - left))
}

impl fmt::Debug for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.fields();
        let labels: Vec<String> = fields
            .iter()
            .map(|field| format!("{} ({})", field.name, field.bits))
            .collect();
        let widths: Vec<usize> = fields
            .iter()
            .zip(&labels)
            .map(|(field, label)| {
                let dec_len = field.value.to_string().len();
                let hex_len = format!("0x{:x}", field.value).len();
                label.len().max(dec_len).max(hex_len) + 2
            })
            .collect();

        let border = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            write!(f, "        +")?;
            for &w in &widths {
                write!(f, "{}+", "-".repeat(w))?;
            }
            writeln!(f)
        };
        let row = |f: &mut fmt::Formatter<'_>, cells: &[String]| -> fmt::Result {
            write!(f, "        |")?;
            for (cell, &w) in cells.iter().zip(&widths) {
                write!(f, "{}|", center(cell, w))?;
            }
            writeln!(f)
        };

        writeln!(f, "TrackingId {{")?;
        writeln!(f, "    raw id     : 0x{:016x} ({})", self.id, self.id)?;
        writeln!(f, "    base36     : {}", self.encode())?;
        writeln!(f, "    layout     :")?;
        border(f)?;
        row(f, labels.as_slice())?;
        border(f)?;
        let decimals: Vec<String> = fields.iter().map(|x| x.value.to_string()).collect();
        row(f, decimals.as_slice())?;
        let hexes: Vec<String> = fields.iter().map(|x| format!("0x{:x}", x.value)).collect();
        row(f, hexes.as_slice())?;
        border(f)?;
        write!(f, "}}")
    }
}
