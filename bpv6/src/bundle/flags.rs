use super::*;

/// The class of service priority of a bundle.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Priority {
    #[default]
    Bulk,
    Normal,
    Expedited,
    Reserved,
}

impl From<u8> for Priority {
    fn from(value: u8) -> Self {
        match value & 0x03 {
            0 => Priority::Bulk,
            1 => Priority::Normal,
            2 => Priority::Expedited,
            _ => Priority::Reserved,
        }
    }
}

/// The bundle processing control flags of a primary block.
///
/// Version 5/6 bundles carry the general, class of service and status
/// report request flags in one SDNV; version 4 bundles use three octets.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Flags {
    pub is_fragment: bool,
    pub is_admin_record: bool,
    pub do_not_fragment: bool,
    pub custody_requested: bool,
    pub destination_singleton: bool,
    pub app_ack_requested: bool,
    pub priority: Priority,
    pub receipt_report_requested: bool,
    pub custody_report_requested: bool,
    pub forward_report_requested: bool,
    pub delivery_report_requested: bool,
    pub delete_report_requested: bool,
    /// Version 4 only.
    pub app_ack_report_requested: bool,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub unrecognised: Option<u64>,
}

impl From<u64> for Flags {
    fn from(value: u64) -> Self {
        let mut flags = Self {
            priority: Priority::from((value >> 7) as u8),
            ..Default::default()
        };
        let mut unrecognised = value & !(0x3 << 7);

        for b in (0..=5).chain(14..=18) {
            if value & (1 << b) != 0 {
                match b {
                    0 => flags.is_fragment = true,
                    1 => flags.is_admin_record = true,
                    2 => flags.do_not_fragment = true,
                    3 => flags.custody_requested = true,
                    4 => flags.destination_singleton = true,
                    5 => flags.app_ack_requested = true,
                    14 => flags.receipt_report_requested = true,
                    15 => flags.custody_report_requested = true,
                    16 => flags.forward_report_requested = true,
                    17 => flags.delivery_report_requested = true,
                    _ => flags.delete_report_requested = true,
                }
                unrecognised &= !(1 << b);
            }
        }

        if unrecognised != 0 {
            flags.unrecognised = Some(unrecognised);
        }
        flags
    }
}

impl Flags {
    /// Builds the flags from the three version 4 flag octets.
    ///
    /// Unrecognised bits are reported with the processing flags in the low
    /// octet, then class of service, then status report request flags.
    pub fn from_v4(processing: u8, cos: u8, srr: u8) -> Self {
        let flags = Self {
            is_fragment: processing & 0x01 != 0,
            is_admin_record: processing & 0x02 != 0,
            do_not_fragment: processing & 0x04 != 0,
            custody_requested: processing & 0x08 != 0,
            destination_singleton: processing & 0x10 != 0,
            app_ack_requested: processing & 0x20 != 0,
            priority: Priority::from(cos),
            receipt_report_requested: srr & 0x01 != 0,
            custody_report_requested: srr & 0x02 != 0,
            forward_report_requested: srr & 0x04 != 0,
            delivery_report_requested: srr & 0x08 != 0,
            delete_report_requested: srr & 0x10 != 0,
            app_ack_report_requested: srr & 0x20 != 0,
            unrecognised: None,
        };

        let unrecognised = (processing & !0x3F) as u64
            | (((cos & !0x03) as u64) << 8)
            | (((srr & !0x3F) as u64) << 16);
        Self {
            unrecognised: (unrecognised != 0).then_some(unrecognised),
            ..flags
        }
    }

    pub fn any_report_requested(&self) -> bool {
        self.receipt_report_requested
            || self.custody_report_requested
            || self.forward_report_requested
            || self.delivery_report_requested
            || self.delete_report_requested
            || self.app_ack_report_requested
    }
}
