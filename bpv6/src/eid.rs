use super::*;

/// A resolved bundle endpoint ID.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Eid {
    /// The null endpoint, `dtn:none`.
    #[default]
    Null,
    /// A CBHE `ipn:node.service` endpoint.
    Ipn {
        node_number: u64,
        service_number: u64,
    },
    /// A `scheme:ssp` endpoint assembled from dictionary strings.
    Uri { scheme: Box<str>, ssp: Box<str> },
    /// The dictionary offsets did not identify a string.
    Unresolved,
}

impl Eid {
    pub fn is_null(&self) -> bool {
        matches!(self, Eid::Null)
    }

    /// Builds an endpoint from dictionary strings, recognising `dtn:none`.
    pub fn from_parts(scheme: &str, ssp: &str) -> Self {
        if scheme == "dtn" && ssp == "none" {
            Eid::Null
        } else {
            Eid::Uri {
                scheme: scheme.into(),
                ssp: ssp.into(),
            }
        }
    }

    /// Interprets a CBHE scheme/SSP offset pair as node and service numbers.
    pub fn from_cbhe(node_number: u64, service_number: u64) -> Self {
        if node_number == 0 && service_number == 0 {
            Eid::Null
        } else {
            Eid::Ipn {
                node_number,
                service_number,
            }
        }
    }
}

impl core::fmt::Display for Eid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Eid::Null => f.write_str("dtn:none"),
            Eid::Ipn {
                node_number,
                service_number,
            } => write!(f, "ipn:{node_number}.{service_number}"),
            Eid::Uri { scheme, ssp } => write!(f, "{scheme}:{ssp}"),
            Eid::Unresolved => f.write_str("<unresolved>"),
        }
    }
}
