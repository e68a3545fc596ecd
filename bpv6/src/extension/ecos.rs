use super::*;

#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EcosFlags {
    pub critical: bool,
    pub streaming: bool,
    pub has_flow_label: bool,
    pub reliable: bool,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub unrecognised: Option<u8>,
}

impl From<u8> for EcosFlags {
    fn from(value: u8) -> Self {
        let unrecognised = value & !0x0F;
        Self {
            critical: value & 0x01 != 0,
            streaming: value & 0x02 != 0,
            has_flow_label: value & 0x04 != 0,
            reliable: value & 0x08 != 0,
            unrecognised: (unrecognised != 0).then_some(unrecognised),
        }
    }
}

/// The Extended Class of Service block.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ExtendedClassOfService {
    pub flags: EcosFlags,
    pub ordinal: u8,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub flow_label: Option<u64>,
}

impl ExtendedClassOfService {
    pub(super) fn parse(
        header: &Header,
        reader: &mut Reader,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Self, Error> {
        let start = reader.offset();
        if !header.flags.must_replicate || header.flags.has_eid_references {
            diagnostics.push(Diagnostic::advisory(
                ErrorKind::StructuralMismatch,
                data_range(reader, start),
                "Extended class of service block must be replicated and carry no EID references",
            ));
        }

        let flags = EcosFlags::from(reader.read_u8().map_field_err("ECOS flags")?);
        let ordinal = reader.read_u8().map_field_err("ECOS ordinal")?;
        let flow_label = if flags.has_flow_label {
            Some(reader.parse().map_field_err("ECOS flow label")?)
        } else {
            None
        };

        Ok(Self {
            flags,
            ordinal,
            flow_label,
        })
    }
}
