//! Motor trim offsets and their persisted calibration record
//!
//! Trim compensates for mechanical asymmetry between the two motors: a
//! signed PWM bias added to each wheel before saturation. The calibration
//! record is serialized to flash using postcard.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest trim magnitude accepted per wheel
pub const MAX_TRIM: i16 = 255;

/// Magic number to identify valid trim data
pub const TRIM_MAGIC: u32 = 0x5457_524D; // "TWRM"

/// Current trim data version
pub const TRIM_VERSION: u8 = 1;

/// Encoded size upper bound for [`TrimCalibration`]
pub const TRIM_RECORD_MAX_LEN: usize = 20;

/// Errors from loading or storing trim calibration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TrimError {
    /// Record could not be encoded into the buffer
    Serialize,
    /// Stored bytes are not a trim record
    Deserialize,
    /// Magic number mismatch
    BadMagic,
    /// Record written by an incompatible firmware
    UnsupportedVersion,
    /// Checksum mismatch
    Corrupted,
}

/// Per-wheel PWM bias
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrimOffsets {
    /// Left wheel bias in PWM counts
    pub left: i16,
    /// Right wheel bias in PWM counts
    pub right: i16,
}

impl TrimOffsets {
    /// No trim on either wheel
    pub const ZERO: Self = Self { left: 0, right: 0 };

    /// Create trim offsets
    ///
    /// A value outside `[-MAX_TRIM, MAX_TRIM]` is replaced by 0, not clamped.
    pub const fn new(left: i16, right: i16) -> Self {
        Self {
            left: sanitize(left),
            right: sanitize(right),
        }
    }

    /// Check whether both requested values were inside the accepted range
    pub const fn in_range(left: i16, right: i16) -> bool {
        sanitize(left) == left && sanitize(right) == right
    }
}

const fn sanitize(value: i16) -> i16 {
    if value < -MAX_TRIM || value > MAX_TRIM {
        0
    } else {
        value
    }
}

/// Trim calibration stored in flash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrimCalibration {
    /// Magic number for validation
    pub magic: u32,
    /// Data format version
    pub version: u8,
    /// Calibrated offsets
    pub offsets: TrimOffsets,
    /// CRC32 over magic, version and offsets
    pub crc: u32,
}

impl Default for TrimCalibration {
    fn default() -> Self {
        Self::new(TrimOffsets::ZERO)
    }
}

impl TrimCalibration {
    /// Create a record for the given offsets with a valid checksum
    pub fn new(offsets: TrimOffsets) -> Self {
        let mut record = Self {
            magic: TRIM_MAGIC,
            version: TRIM_VERSION,
            offsets,
            crc: 0,
        };
        record.crc = record.calculate_crc();
        record
    }

    /// Calculate CRC32 for the record (excluding the crc field itself)
    pub fn calculate_crc(&self) -> u32 {
        let mut crc: u32 = 0xFFFF_FFFF;
        crc = crc32_update(crc, &self.magic.to_le_bytes());
        crc = crc32_update(crc, &[self.version]);
        crc = crc32_update(crc, &self.offsets.left.to_le_bytes());
        crc = crc32_update(crc, &self.offsets.right.to_le_bytes());
        !crc
    }

    /// Validate magic, version and checksum
    pub fn validate(&self) -> Result<(), TrimError> {
        if self.magic != TRIM_MAGIC {
            return Err(TrimError::BadMagic);
        }
        if self.version != TRIM_VERSION {
            return Err(TrimError::UnsupportedVersion);
        }
        if self.crc != self.calculate_crc() {
            return Err(TrimError::Corrupted);
        }
        Ok(())
    }

    /// Serialize into `buffer`, returning the number of bytes written
    #[cfg(feature = "serde")]
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, TrimError> {
        let bytes = postcard::to_slice(self, buffer).map_err(|_| TrimError::Serialize)?;
        Ok(bytes.len())
    }

    /// Deserialize and validate a stored record
    ///
    /// Offsets are sanitized again after the checksum passes.
    #[cfg(feature = "serde")]
    pub fn decode(bytes: &[u8]) -> Result<Self, TrimError> {
        let record: Self = postcard::from_bytes(bytes).map_err(|_| TrimError::Deserialize)?;
        record.validate()?;
        Ok(Self {
            offsets: TrimOffsets::new(record.offsets.left, record.offsets.right),
            ..record
        })
    }
}

/// CRC32 update (IEEE 802.3 polynomial)
fn crc32_update(crc: u32, data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB8_8320;
    let mut crc = crc;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    crc
}
