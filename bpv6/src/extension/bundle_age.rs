use super::*;
use core::time::Duration;

/// The Bundle Age extension block: the time since the bundle was created,
/// for use by nodes without an accurate clock.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BundleAge {
    pub age: Duration,
}

impl BundleAge {
    /// The wire encoding is a count of microseconds.
    pub(super) fn parse(reader: &mut Reader) -> Result<Self, Error> {
        let micros = reader.parse().map_field_err("bundle age")?;
        Ok(Self {
            age: Duration::from_micros(micros),
        })
    }

    pub fn seconds(&self) -> f64 {
        self.age.as_secs_f64()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn micros() {
        // 1.5 seconds
        let data = hex_literal::hex!("dbc660");
        let age = BundleAge::parse(&mut Reader::new(&data)).unwrap();
        assert_eq!(age.age, Duration::from_millis(1500));
        assert_eq!(age.seconds(), 1.5);
    }

    #[test]
    fn truncated() {
        let data = hex_literal::hex!("db");
        let e = BundleAge::parse(&mut Reader::new(&data)).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Truncated);
    }
}
