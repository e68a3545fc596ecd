use super::*;

const DTN_EPOCH: time::OffsetDateTime = time::macros::datetime!(2000-01-01 00:00:00 UTC);

/// Seconds between the Unix epoch and the DTN epoch (2000-01-01T00:00:00Z).
pub const DTN_EPOCH_UNIX_SECONDS: u64 = 946_684_800;

/// A point in time, as seconds and nanoseconds since the DTN epoch.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DtnTime {
    pub seconds: u64,
    pub nanoseconds: u32,
}

impl DtnTime {
    pub fn new(seconds: u64, nanoseconds: u32) -> Self {
        Self {
            seconds,
            nanoseconds,
        }
    }

    /// Seconds since the Unix epoch.
    pub fn unix_seconds(&self) -> u64 {
        self.seconds.saturating_add(DTN_EPOCH_UNIX_SECONDS)
    }

    /// Decodes a seconds SDNV followed by a nanoseconds SDNV.
    pub fn parse(reader: &mut Reader) -> Result<Self, Error> {
        Ok(Self {
            seconds: reader.parse().map_field_err("DTN time seconds")?,
            nanoseconds: reader.parse().map_field_err("DTN time nanoseconds")?,
        })
    }
}

impl From<DtnTime> for time::OffsetDateTime {
    fn from(dtn_time: DtnTime) -> Self {
        let seconds = i64::try_from(dtn_time.seconds).unwrap_or(i64::MAX);
        DTN_EPOCH.saturating_add(
            time::Duration::seconds(seconds)
                .saturating_add(time::Duration::nanoseconds(dtn_time.nanoseconds as i64)),
        )
    }
}

impl core::fmt::Display for DtnTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match time::OffsetDateTime::from(*self)
            .format(&time::format_description::well_known::Rfc3339)
        {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(
                f,
                "{}.{:09}s after 2000-01-01T00:00:00Z",
                self.seconds, self.nanoseconds
            ),
        }
    }
}
