// Byte size formatting
//
// DSM reports sizes in several units (bytes, KiB, MB). These helpers
// normalize them to bytes and render the compact form DSM's own UI uses:
// one decimal, no space, binary multiples (`"2.7Tb"`).

use std::fmt;

const UNITS: [&str; 8] = ["", "Kb", "Mb", "Gb", "Tb", "Pb", "Eb", "Zb"];

/// Render a byte count as a short human-readable string.
///
/// Values below 512 bytes round down to `"0 Kb"` and values below 1024
/// round up to `"1 Kb"`; anything larger uses the largest unit that keeps
/// the magnitude under 1024.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn bytes_to_readable(num: u64) -> String {
    if num < 512 {
        return "0 Kb".into();
    }
    if num < 1024 {
        return "1 Kb".into();
    }

    let mut value = num as f64;
    for unit in UNITS {
        if value < 1024.0 {
            return format!("{value:3.1}{unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.1}Yb")
}

/// Convert megabytes (binary) to bytes, rounded to one decimal place.
pub fn megabytes_to_bytes(num: f64) -> f64 {
    (num * 1024.0 * 1024.0 * 10.0).round() / 10.0
}

/// A size in bytes as reported by the NAS.
///
/// Accessors hand out the raw count; [`ByteCount::readable`] is the opt-in
/// to the human-readable rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteCount(pub u64);

impl ByteCount {
    /// Build from a KiB figure (utilization counters).
    pub fn from_kib(kib: u64) -> Self {
        Self(kib.saturating_mul(1024))
    }

    /// Build from a whole-MiB figure (installed RAM).
    pub fn from_mib(mib: u64) -> Self {
        Self(mib.saturating_mul(1024 * 1024))
    }

    /// Build from a megabyte figure (share quotas).
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::as_conversions
    )]
    pub fn from_megabytes(mb: f64) -> Self {
        Self(megabytes_to_bytes(mb.max(0.0)).round() as u64)
    }

    pub fn bytes(self) -> u64 {
        self.0
    }

    pub fn readable(self) -> String {
        bytes_to_readable(self.0)
    }
}

impl fmt::Display for ByteCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.readable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_values_floor_to_kilobytes() {
        assert_eq!(bytes_to_readable(0), "0 Kb");
        assert_eq!(bytes_to_readable(511), "0 Kb");
        assert_eq!(bytes_to_readable(512), "1 Kb");
        assert_eq!(bytes_to_readable(1023), "1 Kb");
    }

    #[test]
    fn larger_values_pick_the_unit() {
        assert_eq!(bytes_to_readable(1024), "1.0Kb");
        assert_eq!(bytes_to_readable(5 * 1024 * 1024), "5.0Mb");
        assert_eq!(bytes_to_readable(7_696_581_394_432), "7.0Tb");
        assert_eq!(bytes_to_readable(2_948_623_499_264), "2.7Tb");
        assert_eq!(bytes_to_readable(38_378_964_025_344), "34.9Tb");
    }

    #[test]
    fn megabytes_scale_to_bytes() {
        assert!((megabytes_to_bytes(1.0) - 1_048_576.0).abs() < f64::EPSILON);
        assert_eq!(ByteCount::from_megabytes(2.5).bytes(), 2_621_440);
        assert_eq!(ByteCount::from_kib(4).bytes(), 4096);
        assert_eq!(ByteCount::from_mib(4096).bytes(), 4_294_967_296);
        assert_eq!(ByteCount::from_mib(u64::MAX).bytes(), u64::MAX);
    }

    #[test]
    fn byte_count_displays_readable_form() {
        assert_eq!(ByteCount(1024 * 1024 * 1024).to_string(), "1.0Gb");
    }
}
