use super::*;

/// The status flags of a bundle status report.
///
/// Each flag that is set is followed in the report by the time of the event.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StatusFlags {
    pub received: bool,
    pub custody_accepted: bool,
    pub forwarded: bool,
    pub delivered: bool,
    pub deleted: bool,
    pub acknowledged: bool,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub unrecognised: Option<u8>,
}

impl From<u8> for StatusFlags {
    fn from(value: u8) -> Self {
        let unrecognised = value & !0x3F;
        Self {
            received: value & 0x01 != 0,
            custody_accepted: value & 0x02 != 0,
            forwarded: value & 0x04 != 0,
            delivered: value & 0x08 != 0,
            deleted: value & 0x10 != 0,
            acknowledged: value & 0x20 != 0,
            unrecognised: (unrecognised != 0).then_some(unrecognised),
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum StatusReportReason {
    #[default]
    NoAdditionalInformation,
    LifetimeExpired,
    ForwardedOverUnidirectionalLink,
    TransmissionCanceled,
    DepletedStorage,
    DestinationEndpointIdUnintelligible,
    NoKnownRouteToDestination,
    NoTimelyContactWithNextNode,
    BlockUnintelligible,
    Unassigned(u8),
}

impl From<StatusReportReason> for u8 {
    fn from(value: StatusReportReason) -> Self {
        match value {
            StatusReportReason::NoAdditionalInformation => 0,
            StatusReportReason::LifetimeExpired => 1,
            StatusReportReason::ForwardedOverUnidirectionalLink => 2,
            StatusReportReason::TransmissionCanceled => 3,
            StatusReportReason::DepletedStorage => 4,
            StatusReportReason::DestinationEndpointIdUnintelligible => 5,
            StatusReportReason::NoKnownRouteToDestination => 6,
            StatusReportReason::NoTimelyContactWithNextNode => 7,
            StatusReportReason::BlockUnintelligible => 8,
            StatusReportReason::Unassigned(v) => v,
        }
    }
}

impl From<u8> for StatusReportReason {
    fn from(value: u8) -> Self {
        match value {
            0 => StatusReportReason::NoAdditionalInformation,
            1 => StatusReportReason::LifetimeExpired,
            2 => StatusReportReason::ForwardedOverUnidirectionalLink,
            3 => StatusReportReason::TransmissionCanceled,
            4 => StatusReportReason::DepletedStorage,
            5 => StatusReportReason::DestinationEndpointIdUnintelligible,
            6 => StatusReportReason::NoKnownRouteToDestination,
            7 => StatusReportReason::NoTimelyContactWithNextNode,
            8 => StatusReportReason::BlockUnintelligible,
            v => StatusReportReason::Unassigned(v),
        }
    }
}

#[derive(Default, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StatusReport {
    pub flags: StatusFlags,
    pub reason: StatusReportReason,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub fragment_info: Option<FragmentInfo>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub received: Option<DtnTime>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub custody_accepted: Option<DtnTime>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub forwarded: Option<DtnTime>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub delivered: Option<DtnTime>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub deleted: Option<DtnTime>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub acknowledged: Option<DtnTime>,
    /// The creation timestamp of the subject bundle.
    pub timestamp: CreationTimestamp,
    /// The source endpoint of the subject bundle.
    pub source: String,
    pub source_range: Range<usize>,
}

impl StatusReport {
    pub(super) fn parse(reader: &mut Reader, is_for_fragment: bool) -> Result<Self, Error> {
        let flags = StatusFlags::from(reader.read_u8().map_field_err("status flags")?);
        let reason = StatusReportReason::from(reader.read_u8().map_field_err("reason code")?);

        let fragment_info = if is_for_fragment {
            Some(parse_fragment_info(reader)?)
        } else {
            None
        };

        let mut time_if = |set: bool, field: &'static str| {
            if set {
                DtnTime::parse(reader).map(Some).map_field_err(field)
            } else {
                Ok(None)
            }
        };
        let received = time_if(flags.received, "time of receipt")?;
        let custody_accepted = time_if(flags.custody_accepted, "time of custody acceptance")?;
        let forwarded = time_if(flags.forwarded, "time of forwarding")?;
        let delivered = time_if(flags.delivered, "time of delivery")?;
        let deleted = time_if(flags.deleted, "time of deletion")?;
        let acknowledged = time_if(flags.acknowledged, "time of acknowledgement")?;

        let timestamp = CreationTimestamp::parse(reader)?;
        let (source, source_range) = parse_endpoint(reader)?;

        Ok(Self {
            flags,
            reason,
            fragment_info,
            received,
            custody_accepted,
            forwarded,
            delivered,
            deleted,
            acknowledged,
            timestamp,
            source,
            source_range,
        })
    }
}
