//! Device-geometry text parsing. See spec §4.1.

use crate::error::CoreError;
use regex::Regex;
use std::sync::LazyLock;

/// Parsed device geometry, plus capacity derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geometry {
    pub sector_size: u64,
    pub total_sectors: u64,
    pub device_name: String,
}

impl Geometry {
    pub fn total_capacity(&self) -> u64 {
        self.sector_size * self.total_sectors
    }

    pub fn num_buckets(&self, bucket_size: u64) -> u64 {
        self.total_capacity() / bucket_size
    }
}

static SECTOR_SIZE_EQ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Units\s*=\s*sectors of \d+ \S \d+ = (\d+) bytes").unwrap()
});
static SECTOR_SIZE_STAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Units:\s*sectors of \d+ \* \d+ = (\d+) bytes").unwrap()
});
static TOTAL_SECTORS_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"total (\d+) sectors").unwrap());
static DISK_GIB_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Disk (\S+): \d+\.\d+ (?:GiB|TiB), \d+ bytes, (\d+) sectors").unwrap()
});
static DISK_GB_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Disk (\S+): \d+ GB, \d+ bytes").unwrap());
static DISK_NAME_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Disk (\S+):").unwrap());

/// Parse free-form `fdisk`-style geometry text into a [`Geometry`].
///
/// Tries each recognized phrasing in the order listed in spec §4.1, first
/// match wins per field. Fails if any of `sector_size`, `total_sectors`, or
/// `device_name` is never found.
pub fn parse_geometry(text: &str) -> Result<Geometry, CoreError> {
    let sector_size = SECTOR_SIZE_EQ
        .captures(text)
        .or_else(|| SECTOR_SIZE_STAR.captures(text))
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok());

    let mut total_sectors = TOTAL_SECTORS_SUFFIX
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok());

    let mut device_name = None;

    if let Some(c) = DISK_GIB_LINE.captures(text) {
        device_name = c.get(1).map(|m| m.as_str().to_string());
        if total_sectors.is_none() {
            total_sectors = c.get(2).and_then(|m| m.as_str().parse::<u64>().ok());
        }
    }

    if device_name.is_none() {
        if let Some(c) = DISK_GB_LINE.captures(text) {
            device_name = c.get(1).map(|m| m.as_str().to_string());
        }
    }

    if device_name.is_none() {
        if let Some(c) = DISK_NAME_ONLY.captures(text) {
            device_name = c.get(1).map(|m| m.as_str().to_string());
        }
    }

    let sector_size = sector_size.ok_or_else(|| CoreError::GeometryInvalid {
        reason: "no recognized sector-size line".to_string(),
    })?;
    let total_sectors = total_sectors.ok_or_else(|| CoreError::GeometryInvalid {
        reason: "no recognized total-sector-count line".to_string(),
    })?;
    let device_name = device_name.ok_or_else(|| CoreError::GeometryInvalid {
        reason: "no recognized device-name line".to_string(),
    })?;

    Ok(Geometry {
        sector_size,
        total_sectors,
        device_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_units_eq_form() {
        let text = "Units = sectors of 1 * 512 = 512 bytes\n\
                     Disk /dev/sdb: 111.8 GiB, 120034123776 bytes, 234441648 sectors\n";
        let g = parse_geometry(text).unwrap();
        assert_eq!(g.sector_size, 512);
        assert_eq!(g.total_sectors, 234441648);
        assert_eq!(g.device_name, "/dev/sdb");
    }

    #[test]
    fn parses_units_star_form() {
        let text = "Units: sectors of 1 * 512 = 512 bytes\n\
                     total 8192 sectors\n\
                     Disk /dev/sdc: 100 GB, 1000000 bytes\n";
        let g = parse_geometry(text).unwrap();
        assert_eq!(g.sector_size, 512);
        assert_eq!(g.total_sectors, 8192);
        assert_eq!(g.device_name, "/dev/sdc");
    }

    #[test]
    fn missing_sector_size_is_invalid() {
        let text = "Disk /dev/sda: 100 GB, 1000000 bytes\ntotal 8192 sectors\n";
        assert!(matches!(
            parse_geometry(text),
            Err(CoreError::GeometryInvalid { .. })
        ));
    }

    #[test]
    fn derives_capacity_and_bucket_count() {
        let g = Geometry {
            sector_size: 512,
            total_sectors: 2048,
            device_name: "sdb".into(),
        };
        assert_eq!(g.total_capacity(), 1024 * 1024);
        assert_eq!(g.num_buckets(1024 * 1024), 1);
    }
}
