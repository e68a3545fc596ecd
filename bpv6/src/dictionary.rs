/*!
Resolution of the primary block's endpoint references.

A primary block names four endpoints, each as a pair of offsets. With a
non-empty dictionary each offset indexes a NUL-terminated string within
it. An empty dictionary signals Compressed Bundle Header Encoding (RFC
6260): the offsets are the node and service numbers of an `ipn` endpoint.
*/

use super::*;
use eid::Eid;

/// A scheme/SSP offset pair.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EidReference {
    pub scheme: u64,
    pub ssp: u64,
}

/// The endpoint references of a primary block, in wire order.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EidReferences {
    pub destination: EidReference,
    pub source: EidReference,
    pub report_to: EidReference,
    pub custodian: EidReference,
}

impl EidReferences {
    pub(crate) fn from_offsets(o: [u64; 8]) -> Self {
        Self {
            destination: EidReference {
                scheme: o[0],
                ssp: o[1],
            },
            source: EidReference {
                scheme: o[2],
                ssp: o[3],
            },
            report_to: EidReference {
                scheme: o[4],
                ssp: o[5],
            },
            custodian: EidReference {
                scheme: o[6],
                ssp: o[7],
            },
        }
    }
}

/// The four endpoints named by a primary block.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub destination: Eid,
    pub source: Eid,
    pub report_to: Eid,
    pub custodian: Eid,
}

/// The location of the dictionary within the bundle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Dictionary {
    pub extent: Range<usize>,
}

impl Dictionary {
    /// An empty dictionary means the references are CBHE integers.
    pub fn is_cbhe(&self) -> bool {
        self.extent.is_empty()
    }

    pub fn resolve_all(
        &self,
        data: &[u8],
        refs: &EidReferences,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Endpoints {
        Endpoints {
            destination: self.resolve(data, &refs.destination, "destination", diagnostics),
            source: self.resolve(data, &refs.source, "source", diagnostics),
            report_to: self.resolve(data, &refs.report_to, "report-to", diagnostics),
            custodian: self.resolve(data, &refs.custodian, "custodian", diagnostics),
        }
    }

    pub fn resolve(
        &self,
        data: &[u8],
        r: &EidReference,
        name: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Eid {
        if self.is_cbhe() {
            return Eid::from_cbhe(r.scheme, r.ssp);
        }

        let scheme = self.lookup(data, r.scheme, name, "scheme", diagnostics);
        let ssp = self.lookup(data, r.ssp, name, "SSP", diagnostics);
        match (scheme, ssp) {
            (Some(scheme), Some(ssp)) => Eid::from_parts(&scheme, &ssp),
            _ => Eid::Unresolved,
        }
    }

    fn lookup(
        &self,
        data: &[u8],
        offset: u64,
        name: &str,
        part: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<String> {
        let dict = data.get(self.extent.clone())?;
        let Some(start) = usize::try_from(offset).ok().filter(|o| *o < dict.len()) else {
            diagnostics.push(Diagnostic::advisory(
                ErrorKind::OffsetRange,
                self.extent.clone(),
                format!(
                    "{name} {part} offset {offset} is outside the {} byte dictionary",
                    dict.len()
                ),
            ));
            return None;
        };

        let s = &dict[start..];
        let len = match s.iter().position(|b| *b == 0) {
            Some(len) => len,
            None => {
                diagnostics.push(Diagnostic::advisory(
                    ErrorKind::Truncated,
                    self.extent.start + start..self.extent.end,
                    format!("{name} {part} string is not NUL terminated"),
                ));
                s.len()
            }
        };
        Some(String::from_utf8_lossy(&s[..len]).into_owned())
    }
}
