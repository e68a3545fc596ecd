use super::*;

/// An inclusive range of custody IDs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CustodyRange {
    pub start: u64,
    pub end: u64,
}

impl CustodyRange {
    fn new(start: u64, length: u64) -> Result<Self, Error> {
        if length == 0 {
            return Err(Error::EmptyCustodyRange);
        }
        Ok(Self {
            start,
            end: start
                .checked_add(length - 1)
                .ok_or(Error::CustodyRangeOverflow)?,
        })
    }

    /// The range that starts `gap` IDs after the end of this one.
    fn next(&self, gap: u64, length: u64) -> Result<Self, Error> {
        let start = self
            .end
            .checked_add(1)
            .and_then(|s| s.checked_add(gap))
            .ok_or(Error::CustodyRangeOverflow)?;
        Self::new(start, length)
    }

    pub fn contains(&self, custody_id: u64) -> bool {
        (self.start..=self.end).contains(&custody_id)
    }
}

/// An aggregate custody signal, acknowledging many custody IDs at once.
#[derive(Default, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AggregateCustodySignal {
    pub status: CustodyStatus,
    pub ranges: Vec<CustodyRange>,
}

impl AggregateCustodySignal {
    /// Decodes the ranges until the record reaches `declared` bytes from
    /// `record_start`. A range cut short by the end of `reader` is truncated.
    pub(super) fn parse(
        reader: &mut Reader,
        record_start: usize,
        declared: usize,
    ) -> Result<Self, Error> {
        let status = CustodyStatus::from(reader.read_u8().map_field_err("custody status")?);

        // The first range is absolute
        let start = reader.parse().map_field_err("custody ID range start")?;
        let length = reader.parse().map_field_err("custody ID range length")?;
        let mut prev = CustodyRange::new(start, length)?;
        let mut ranges = Vec::new();
        ranges.push(prev);

        // Later ranges are relative to the end of the previous one
        while reader.offset() - record_start < declared {
            let gap = reader.parse().map_field_err("custody ID range gap")?;
            let length = reader.parse().map_field_err("custody ID range length")?;
            prev = prev.next(gap, length)?;
            ranges.push(prev);
        }

        Ok(Self { status, ranges })
    }

    pub fn contains(&self, custody_id: u64) -> bool {
        self.ranges.iter().any(|r| r.contains(custody_id))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(data: &[u8], declared: usize) -> Result<AggregateCustodySignal, Error> {
        let mut diagnostics = Vec::new();
        let r = AdministrativeRecord::parse(&mut Reader::new(data), declared, &mut diagnostics)?;
        assert!(diagnostics.is_empty());
        match r.content {
            Record::AggregateCustodySignal(acs) => Ok(acs),
            _ => panic!("Not an aggregate custody signal"),
        }
    }

    #[test]
    fn single_range() {
        let data = hex_literal::hex!("40 80 05 03");
        let acs = parse(&data, data.len()).unwrap();
        assert!(acs.status.succeeded);
        assert_eq!(acs.ranges, [CustodyRange { start: 5, end: 7 }]);
        assert!(acs.contains(5));
        assert!(acs.contains(7));
        assert!(!acs.contains(8));
    }

    #[test]
    fn fill_ranges() {
        // [5,7], then gap 2 -> [10,10], then gap 0 -> [11,14]
        let data = hex_literal::hex!("40 80 05 03 02 01 00 04");
        let acs = parse(&data, data.len()).unwrap();
        assert_eq!(
            acs.ranges,
            [
                CustodyRange { start: 5, end: 7 },
                CustodyRange { start: 10, end: 10 },
                CustodyRange { start: 11, end: 14 }
            ]
        );
    }

    #[test]
    fn ends_on_last_declared_byte() {
        // The final range ends exactly at the declared length
        let data = hex_literal::hex!("40 80 05 03 02 8101 ff");
        let acs = parse(&data, 7).unwrap();
        assert_eq!(
            acs.ranges,
            [
                CustodyRange { start: 5, end: 7 },
                CustodyRange { start: 10, end: 138 }
            ]
        );
    }

    #[test]
    fn range_overruns_declared_length() {
        let data = hex_literal::hex!("40 80 05 03 02 01");
        let e = parse(&data, 5).unwrap_err();
        assert!(matches!(e, Error::RecordOverrun { declared: 5 }));
        assert_eq!(e.kind(), ErrorKind::StructuralMismatch);
    }

    #[test]
    fn range_overruns_payload_at_end_of_buffer() {
        // The declared length and the buffer end together
        let data = hex_literal::hex!("40 80 05 03 02");
        let e = parse(&data, data.len()).unwrap_err();
        assert!(matches!(e, Error::RecordOverrun { declared: 5 }));
    }

    #[test]
    fn first_range_overruns_declared_length() {
        let data = hex_literal::hex!("40 80 05 03");
        let e = parse(&data, 3).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::StructuralMismatch);
    }

    #[test]
    fn empty_range() {
        let data = hex_literal::hex!("40 80 05 00");
        assert!(matches!(
            parse(&data, data.len()),
            Err(Error::EmptyCustodyRange)
        ));
    }

    #[test]
    fn range_overflow() {
        // Starts at u64::MAX with a length of 2
        let data = hex_literal::hex!("40 80 81ffffffffffffffff7f 02");
        let e = parse(&data, data.len()).unwrap_err();
        assert!(matches!(e, Error::CustodyRangeOverflow));
        assert_eq!(e.kind(), ErrorKind::Overflow);
    }

    #[test]
    fn truncated() {
        let data = hex_literal::hex!("40 80 05 03 02");
        let e = parse(&data, 8).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Truncated);
    }
}
