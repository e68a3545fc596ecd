/*!
Administrative records (RFC 5050 Section 6), carried in the payload of a
bundle whose administrative record flag is set.

The first octet holds the record type in its upper nibble and, in its low
bit, whether the record concerns a fragment. Each record is measured
against the declared length of the payload block that carries it.
*/

use super::*;
use bundle::FragmentInfo;
use creation_timestamp::CreationTimestamp;
use dtn_time::DtnTime;

mod aggregate_custody_signal;
mod custody_signal;
mod status_report;

pub use aggregate_custody_signal::{AggregateCustodySignal, CustodyRange};
pub use custody_signal::{CustodySignal, CustodySignalReason, CustodyStatus};
pub use status_report::{StatusFlags, StatusReport, StatusReportReason};

/// The type-specific content of an administrative record.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Record {
    StatusReport(StatusReport),
    CustodySignal(CustodySignal),
    AggregateCustodySignal(AggregateCustodySignal),
    /// A contact announcement; carries no decoded content.
    Announce,
    /// An unrecognised record type, with its type code.
    Unrecognised(u8),
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AdministrativeRecord {
    pub is_for_fragment: bool,
    /// The range of bytes the record was decoded from.
    pub extent: Range<usize>,
    pub content: Record,
}

impl AdministrativeRecord {
    /// Decodes a record from a payload block of `declared` bytes.
    ///
    /// No read goes beyond `declared` bytes, or the end of `reader` if that
    /// comes first. A field cut short by `declared` is
    /// [`Error::RecordOverrun`]; one cut short by the end of the buffer is
    /// truncation. Unused bytes at the end of a status report or custody
    /// signal are reported as an advisory.
    pub fn parse(
        reader: &mut Reader,
        declared: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Self, Error> {
        let bounded_by_payload = declared <= reader.remaining();
        let mut record = reader
            .take(declared.min(reader.remaining()))
            .map_field_err("administrative record")?;

        Self::parse_record(&mut record, declared, diagnostics).map_err(|e| {
            if bounded_by_payload && e.kind() == ErrorKind::Truncated {
                Error::RecordOverrun { declared }
            } else {
                e
            }
        })
    }

    fn parse_record(
        reader: &mut Reader,
        declared: usize,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Self, Error> {
        let start = reader.offset();
        let header = reader
            .read_u8()
            .map_field_err("administrative record type")?;
        let is_for_fragment = header & 0x01 != 0;

        let content = match header >> 4 {
            1 => Record::StatusReport(StatusReport::parse(reader, is_for_fragment)?),
            2 => Record::CustodySignal(CustodySignal::parse(reader, is_for_fragment)?),
            4 => Record::AggregateCustodySignal(AggregateCustodySignal::parse(
                reader, start, declared,
            )?),
            5 => Record::Announce,
            t => Record::Unrecognised(t),
        };

        if let Record::StatusReport(_) | Record::CustodySignal(_) = content {
            let consumed = reader.offset() - start;
            if consumed < declared {
                diagnostics.push(Diagnostic::advisory(
                    ErrorKind::StructuralMismatch,
                    reader.offset()..(start + declared).min(reader.end()),
                    format!(
                        "{} unused bytes at the end of the administrative record",
                        declared - consumed
                    ),
                ));
            }
        }

        Ok(Self {
            is_for_fragment,
            extent: start..reader.offset(),
            content,
        })
    }
}

// Records concerning a fragment identify it by offset and length
fn parse_fragment_info(reader: &mut Reader) -> Result<FragmentInfo, Error> {
    Ok(FragmentInfo {
        offset: reader.parse().map_field_err("fragment offset")?,
        total_len: reader.parse().map_field_err("fragment length")?,
    })
}

// The endpoint is exactly `len` bytes, with no terminator on the wire
fn parse_endpoint(reader: &mut Reader) -> Result<(String, Range<usize>), Error> {
    let len = reader
        .parse_length()
        .map_field_err("source endpoint ID length")?;
    let range = reader
        .read_bytes(len)
        .map_field_err("source endpoint ID")?;
    let eid = String::from_utf8_lossy(&reader.data()[range.clone()]).into_owned();
    Ok((eid, range))
}
