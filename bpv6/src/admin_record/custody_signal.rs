use super::*;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CustodySignalReason {
    #[default]
    NoAdditionalInformation,
    RedundantReception,
    DepletedStorage,
    DestinationEndpointIdUnintelligible,
    NoKnownRouteToDestination,
    NoTimelyContactWithNextNode,
    BlockUnintelligible,
    Unassigned(u8),
}

impl From<CustodySignalReason> for u8 {
    fn from(value: CustodySignalReason) -> Self {
        match value {
            CustodySignalReason::NoAdditionalInformation => 0,
            CustodySignalReason::RedundantReception => 3,
            CustodySignalReason::DepletedStorage => 4,
            CustodySignalReason::DestinationEndpointIdUnintelligible => 5,
            CustodySignalReason::NoKnownRouteToDestination => 6,
            CustodySignalReason::NoTimelyContactWithNextNode => 7,
            CustodySignalReason::BlockUnintelligible => 8,
            CustodySignalReason::Unassigned(v) => v,
        }
    }
}

impl From<u8> for CustodySignalReason {
    fn from(value: u8) -> Self {
        match value {
            0 => CustodySignalReason::NoAdditionalInformation,
            3 => CustodySignalReason::RedundantReception,
            4 => CustodySignalReason::DepletedStorage,
            5 => CustodySignalReason::DestinationEndpointIdUnintelligible,
            6 => CustodySignalReason::NoKnownRouteToDestination,
            7 => CustodySignalReason::NoTimelyContactWithNextNode,
            8 => CustodySignalReason::BlockUnintelligible,
            v => CustodySignalReason::Unassigned(v),
        }
    }
}

/// The status octet shared by custody signals and aggregate custody signals.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CustodyStatus {
    /// Whether custody transfer succeeded.
    pub succeeded: bool,
    pub reason: CustodySignalReason,
}

impl From<u8> for CustodyStatus {
    fn from(value: u8) -> Self {
        Self {
            succeeded: value & 0x80 != 0,
            reason: CustodySignalReason::from(value & 0x7F),
        }
    }
}

#[derive(Default, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CustodySignal {
    pub status: CustodyStatus,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub fragment_info: Option<FragmentInfo>,
    pub signal_time: DtnTime,
    /// The creation timestamp of the subject bundle.
    pub timestamp: CreationTimestamp,
    /// The source endpoint of the subject bundle.
    pub source: String,
    pub source_range: Range<usize>,
}

impl CustodySignal {
    pub(super) fn parse(reader: &mut Reader, is_for_fragment: bool) -> Result<Self, Error> {
        let status = CustodyStatus::from(reader.read_u8().map_field_err("custody status")?);

        let fragment_info = if is_for_fragment {
            Some(parse_fragment_info(reader)?)
        } else {
            None
        };

        let signal_time = DtnTime::parse(reader).map_field_err("time of signal")?;
        let timestamp = CreationTimestamp::parse(reader)?;
        let (source, source_range) = parse_endpoint(reader)?;

        Ok(Self {
            status,
            fragment_info,
            signal_time,
            timestamp,
            source,
            source_range,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn succeeded() {
        let data = hex_literal::hex!("20 80 8768 00 8704 01 05 64746e3a78");
        let mut diagnostics = Vec::new();
        let r = AdministrativeRecord::parse(&mut Reader::new(&data), data.len(), &mut diagnostics)
            .unwrap();
        assert!(diagnostics.is_empty());
        let Record::CustodySignal(cs) = r.content else {
            panic!("Not a custody signal");
        };
        assert!(cs.status.succeeded);
        assert_eq!(cs.status.reason, CustodySignalReason::NoAdditionalInformation);
        assert_eq!(cs.signal_time, DtnTime::new(1000, 0));
        assert_eq!(cs.timestamp.creation_time.seconds, 900);
        assert_eq!(cs.timestamp.sequence_number, 1);
        assert_eq!(cs.source, "dtn:x");
        assert_eq!(cs.fragment_info, None);
    }

    #[test]
    fn refused_fragment() {
        let data = hex_literal::hex!("21 03 00 10 01 00 02 00 00");
        let mut diagnostics = Vec::new();
        let r = AdministrativeRecord::parse(&mut Reader::new(&data), data.len(), &mut diagnostics)
            .unwrap();
        assert!(r.is_for_fragment);
        let Record::CustodySignal(cs) = r.content else {
            panic!("Not a custody signal");
        };
        assert!(!cs.status.succeeded);
        assert_eq!(cs.status.reason, CustodySignalReason::RedundantReception);
        assert_eq!(
            cs.fragment_info,
            Some(FragmentInfo {
                offset: 0,
                total_len: 16
            })
        );
    }

    #[test]
    fn endpoint_overruns_buffer() {
        let data = hex_literal::hex!("20 80 00 00 00 00 09 64746e");
        let mut diagnostics = Vec::new();
        let e = AdministrativeRecord::parse(&mut Reader::new(&data), 16, &mut diagnostics)
            .unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Truncated);
    }

    #[test]
    fn endpoint_overruns_payload() {
        let data = hex_literal::hex!("20 80 00 00 00 00 09 64746e");
        let mut diagnostics = Vec::new();
        let e = AdministrativeRecord::parse(&mut Reader::new(&data), data.len(), &mut diagnostics)
            .unwrap_err();
        assert!(matches!(e, Error::RecordOverrun { declared: 10 }));
        assert_eq!(e.kind(), ErrorKind::StructuralMismatch);
    }

    #[test]
    fn reasons() {
        for code in 0..=u8::MAX {
            assert_eq!(u8::from(CustodySignalReason::from(code)), code);
        }
        assert_eq!(
            CustodyStatus::from(0x84).reason,
            CustodySignalReason::DepletedStorage
        );
    }
}
