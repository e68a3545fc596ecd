/*!
Read-only decoder configuration.
*/

/// A CBHE source/destination service number pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServicePair {
    pub source: u64,
    pub destination: u64,
}

impl ServicePair {
    pub fn matches(&self, source: u64, destination: u64) -> bool {
        self.source == source && self.destination == destination
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    // Decode the payload of bundles flagged as administrative records
    pub admin_records: bool, // default true

    // Payloads exchanged between these services are CFDP file delivery PDUs
    pub file_delivery: ServicePair, // default 64 -> 64

    // Payloads exchanged between these services are AMS/AMP management PDUs
    pub management: ServicePair, // default 65 -> 65
}

impl Default for Config {
    fn default() -> Self {
        Self {
            admin_records: true,
            file_delivery: ServicePair {
                source: 64,
                destination: 64,
            },
            management: ServicePair {
                source: 65,
                destination: 65,
            },
        }
    }
}
