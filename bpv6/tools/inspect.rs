use super::*;
use hardy_bpv6::{
    admin_record::{AdministrativeRecord, Record},
    block, bundle,
    config::Config,
    diagnostic::Diagnostic,
    extension,
};
use std::fmt::Write;

#[derive(Parser, Debug)]
#[command(
    about = "Decode a bundle and display its contents",
    long_about = "Decode a bundle and display its contents.\n\n\
        Displays the primary block, every canonical block, any administrative \
        record, and the diagnostics raised while decoding.\n\n\
        Output formats:\n\
        - markdown: Human-readable format (default)\n\
        - json: Machine-readable JSON\n\
        - json-pretty: Pretty-printed JSON"
)]
pub struct Command {
    /// Output format
    #[arg(
        long,
        default_value = "markdown",
        value_name = "FORMAT",
        help = "Output format: markdown (human-readable), json, json-pretty"
    )]
    format: OutputFormat,

    /// Path to the location to write the output to, or stdout if not supplied
    #[arg(short, long, required = false, default_value = "")]
    output: io::Output,

    /// The bundle file to inspect, '-' to use stdin.
    input: io::Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable markdown format
    Markdown,
    /// Machine-readable JSON format
    Json,
    /// Pretty-printed JSON format
    #[value(name = "json-pretty")]
    JsonPretty,
}

#[derive(serde::Serialize)]
struct Report<'a> {
    bundle: &'a bundle::Bundle,
    length: usize,
    #[serde(skip_serializing_if = "<[Diagnostic]>::is_empty")]
    diagnostics: &'a [Diagnostic],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Command {
    pub fn exec(self, config: &Config) -> anyhow::Result<()> {
        let data = self.input.read_all()?;

        let parsed = bundle::ParsedBundle::parse(&data, config)
            .map_err(|e| anyhow::anyhow!("Failed to parse bundle: {e}"))?;

        let mut out = match self.format {
            OutputFormat::Markdown => dump_markdown(&parsed, &data)?,
            OutputFormat::Json | OutputFormat::JsonPretty => {
                let report = Report {
                    bundle: &parsed.bundle,
                    length: parsed.length,
                    diagnostics: &parsed.diagnostics,
                    error: parsed.error.as_ref().map(|e| e.to_string()),
                };
                if self.format == OutputFormat::JsonPretty {
                    serde_json::to_string_pretty(&report)
                } else {
                    serde_json::to_string(&report)
                }
                .map_err(|e| anyhow::anyhow!("Failed to serialize bundle: {e}"))?
            }
        };
        out.push('\n');

        self.output.write_all(out.as_bytes())
    }
}

fn dump_markdown(parsed: &bundle::ParsedBundle, data: &[u8]) -> anyhow::Result<String> {
    let bundle = &parsed.bundle;
    let mut out = String::new();

    if let Some(fragment_info) = &bundle.fragment_info {
        writeln!(
            out,
            "# BPv{} Fragment at offset {} of {}\n",
            bundle.version, fragment_info.offset, fragment_info.total_len
        )?;
    } else {
        writeln!(out, "# BPv{} Bundle\n", bundle.version)?;
    }

    writeln!(out, "Source: {}\n", bundle.source)?;
    writeln!(out, "Destination: {}\n", bundle.destination)?;
    writeln!(out, "Report-To: {}\n", bundle.report_to)?;
    writeln!(out, "Custodian: {}\n", bundle.custodian)?;
    writeln!(out, "Created: {}\n", bundle.timestamp)?;
    writeln!(
        out,
        "Lifetime: {}\n",
        humantime::format_duration(std::time::Duration::from_secs(bundle.lifetime))
    )?;
    writeln!(out, "Priority: {:?}\n", bundle.flags.priority)?;

    if bundle.dictionary.is_cbhe() {
        writeln!(out, "Dictionary: None (CBHE)\n")?;
    } else {
        writeln!(out, "Dictionary: {} bytes\n", bundle.dictionary.extent.len())?;
    }

    dump_bundle_flags(&bundle.flags, &mut out)?;

    let mut notes: Vec<&'static str> = Vec::new();
    if bundle.flags.any_report_requested() && bundle.report_to.is_null() {
        notes.push("Null endpoint EID specified for 'Report To', but status reports are requested.");
    }
    if bundle.flags.custody_requested && bundle.custodian.is_null() {
        notes.push("Custody transfer is requested, but no custodian is named.");
    }
    if !notes.is_empty() {
        writeln!(out, "**Notes:**\n")?;
        for (idx, note) in notes.into_iter().enumerate() {
            writeln!(out, "{}. {note}", idx + 1)?;
        }
        writeln!(out)?;
    }

    for (idx, block) in bundle.blocks.iter().enumerate() {
        dump_block(idx + 1, block, data, &mut out)?;
    }

    if !parsed.diagnostics.is_empty() {
        writeln!(out, "## Diagnostics\n")?;
        for d in &parsed.diagnostics {
            writeln!(out, "* {d}")?;
        }
        writeln!(out)?;
    }

    if let Some(e) = &parsed.error {
        writeln!(
            out,
            "**Decoding stopped at offset {}:** {e}",
            parsed.length
        )?;
    }
    Ok(out)
}

fn dump_bundle_flags(flags: &bundle::Flags, out: &mut String) -> anyhow::Result<()> {
    let names = [
        (flags.is_fragment, "Is a fragment"),
        (flags.is_admin_record, "ADU is an Administrative Record"),
        (flags.do_not_fragment, "Do not fragment"),
        (flags.custody_requested, "Custody transfer requested"),
        (flags.destination_singleton, "Destination is a singleton"),
        (flags.app_ack_requested, "Application acknowledgement requested"),
        (flags.receipt_report_requested, "Reception report requested"),
        (flags.custody_report_requested, "Custody acceptance report requested"),
        (flags.forward_report_requested, "Forwarding report requested"),
        (flags.delivery_report_requested, "Delivery report requested"),
        (flags.delete_report_requested, "Deletion report requested"),
        (
            flags.app_ack_report_requested,
            "Application acknowledgement report requested",
        ),
    ];

    if !names.iter().any(|(set, _)| *set) && flags.unrecognised.is_none() {
        writeln!(out, "Bundle Flags: None\n")?;
        return Ok(());
    }

    writeln!(out, "Bundle Flags:\n")?;
    for (_, name) in names.iter().filter(|(set, _)| *set) {
        writeln!(out, "* {name}")?;
    }
    if let Some(u) = flags.unrecognised {
        writeln!(out, "* Unrecognised: {u:#x}")?;
    }
    writeln!(out)?;
    Ok(())
}

fn block_name(block_type: block::Type) -> String {
    match block_type {
        block::Type::Payload => "Payload".into(),
        block::Type::Authentication => "Bundle Authentication".into(),
        block::Type::Integrity => "Payload Integrity".into(),
        block::Type::Confidentiality => "Payload Confidentiality".into(),
        block::Type::PreviousHopInsertion => "Previous Hop Insertion".into(),
        block::Type::Metadata => "Metadata".into(),
        block::Type::ExtensionSecurity => "Extension Security".into(),
        block::Type::CustodyTransferEnhancement => "Custody Transfer Enhancement".into(),
        block::Type::ExtendedClassOfService => "Extended Class of Service".into(),
        block::Type::BundleAge => "Bundle Age".into(),
        block::Type::Unrecognised(u) => format!("Unrecognised Type {u}"),
    }
}

fn dump_block(
    idx: usize,
    block: &block::Block,
    data: &[u8],
    out: &mut String,
) -> anyhow::Result<()> {
    writeln!(out, "## Block {idx}: {}\n", block_name(block.block_type))?;
    writeln!(
        out,
        "Offset: {}, length {} bytes\n",
        block.extent.start,
        block.data.len()
    )?;

    if block.flags == block::Flags::default() {
        writeln!(out, "Block Flags: None\n")?;
    } else {
        writeln!(out, "Block Flags:\n")?;
        let names = [
            (block.flags.must_replicate, "Must replicate"),
            (block.flags.report_on_failure, "Report on failure"),
            (block.flags.delete_bundle_on_failure, "Delete bundle on failure"),
            (block.flags.last_block, "Last block"),
            (block.flags.discard_block_on_failure, "Discard block on failure"),
            (block.flags.forwarded_unprocessed, "Forwarded without processing"),
            (block.flags.has_eid_references, "Has EID references"),
        ];
        for (_, name) in names.iter().filter(|(set, _)| *set) {
            writeln!(out, "* {name}")?;
        }
        if let Some(u) = block.flags.unrecognised {
            writeln!(out, "* Unrecognised: {u:#x}")?;
        }
        writeln!(out)?;
    }

    match &block.body {
        block::Body::Payload(payload) => {
            if let Some(record) = &payload.admin_record {
                dump_admin_record(record, out)?;
            } else {
                if let Some(p) = payload.sub_protocol {
                    writeln!(out, "Sub-protocol: {p:?}\n")?;
                }
                dump_bytes(&data[block.data.clone()], out)?;
            }
        }
        block::Body::BundleAge(age) => {
            writeln!(out, "Bundle Age: {}\n", humantime::format_duration(age.age))?;
        }
        block::Body::PreviousHop(hop) => writeln!(out, "Previous Hop: {hop}\n")?,
        block::Body::Security(sb) => dump_security(sb, data, out)?,
        block::Body::CustodyTransfer(cteb) => {
            writeln!(out, "Custody ID: {}\n", cteb.custody_id)?;
            writeln!(
                out,
                "Creator: {} {}\n",
                cteb.creator,
                if cteb.valid { "✔" } else { "(not the custodian)" }
            )?;
        }
        block::Body::ExtendedClassOfService(ecos) => {
            writeln!(out, "Ordinal: {}\n", ecos.ordinal)?;
            writeln!(out, "ECOS Flags: {:?}\n", ecos.flags)?;
            if let Some(label) = ecos.flow_label {
                writeln!(out, "Flow Label: {label}\n")?;
            }
        }
        block::Body::Metadata(m) => {
            writeln!(out, "Metadata Type: {}\n", m.metadata_type)?;
            dump_bytes(&data[m.data.clone()], out)?;
        }
        block::Body::Opaque => dump_bytes(&data[block.data.clone()], out)?,
        block::Body::Malformed => writeln!(out, "**Block data is malformed**\n")?,
    }
    Ok(())
}

fn dump_security(
    sb: &extension::SecurityBlock,
    data: &[u8],
    out: &mut String,
) -> anyhow::Result<()> {
    writeln!(
        out,
        "Target: block type {} occurrence {}\n",
        sb.target_block_type, sb.target_block_occurrence
    )?;
    writeln!(
        out,
        "Ciphersuite: {} (flags {:#x})\n",
        sb.ciphersuite_type, sb.ciphersuite_flags
    )?;

    for (title, items) in [("Parameters", &sb.parameters), ("Results", &sb.results)] {
        if items.is_empty() {
            continue;
        }
        writeln!(out, "### {title}\n")?;
        for item in items {
            match &item.value {
                extension::SecurityValue::Bytes(r) => writeln!(
                    out,
                    "* {:?}: {}",
                    item.item_type,
                    hex(&data[r.clone()])
                )?,
                extension::SecurityValue::FragmentRange { offset, length } => writeln!(
                    out,
                    "* {:?}: offset {offset}, length {length}",
                    item.item_type
                )?,
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

fn dump_admin_record(record: &AdministrativeRecord, out: &mut String) -> anyhow::Result<()> {
    match &record.content {
        Record::StatusReport(sr) => {
            writeln!(out, "### Bundle Status Report\n")?;
            writeln!(out, "Reason: {:?}\n", sr.reason)?;
            for (name, time) in [
                ("Received", sr.received),
                ("Custody accepted", sr.custody_accepted),
                ("Forwarded", sr.forwarded),
                ("Delivered", sr.delivered),
                ("Deleted", sr.deleted),
                ("Acknowledged", sr.acknowledged),
            ] {
                if let Some(t) = time {
                    writeln!(out, "* {name}: {t}")?;
                }
            }
            writeln!(out)?;
            writeln!(out, "Subject: {} created {}\n", sr.source, sr.timestamp)?;
            dump_subject_fragment(sr.fragment_info.as_ref(), out)?;
        }
        Record::CustodySignal(cs) => {
            writeln!(out, "### Custody Signal\n")?;
            writeln!(
                out,
                "Custody transfer {}: {:?}\n",
                if cs.status.succeeded {
                    "succeeded"
                } else {
                    "failed"
                },
                cs.status.reason
            )?;
            writeln!(out, "Signalled: {}\n", cs.signal_time)?;
            writeln!(out, "Subject: {} created {}\n", cs.source, cs.timestamp)?;
            dump_subject_fragment(cs.fragment_info.as_ref(), out)?;
        }
        Record::AggregateCustodySignal(acs) => {
            writeln!(out, "### Aggregate Custody Signal\n")?;
            writeln!(
                out,
                "Custody transfer {}: {:?}\n",
                if acs.status.succeeded {
                    "succeeded"
                } else {
                    "failed"
                },
                acs.status.reason
            )?;
            for r in &acs.ranges {
                writeln!(out, "* Custody IDs {}..={}", r.start, r.end)?;
            }
            writeln!(out)?;
        }
        Record::Announce => writeln!(out, "### Announce\n")?,
        Record::Unrecognised(t) => writeln!(out, "### Unrecognised administrative record type {t}\n")?,
    }

    Ok(())
}

fn dump_subject_fragment(
    fragment_info: Option<&bundle::FragmentInfo>,
    out: &mut String,
) -> anyhow::Result<()> {
    if let Some(f) = fragment_info {
        writeln!(
            out,
            "Subject fragment: offset {}, length {}\n",
            f.offset, f.total_len
        )?;
    }
    Ok(())
}

fn dump_bytes(data: &[u8], out: &mut String) -> anyhow::Result<()> {
    writeln!(out, "### Block Specific Data\n")?;

    if data.is_empty() {
        writeln!(out, "None\n")?;
    } else if let Ok(s) = str::from_utf8(data)
        && !s.contains(|c: char| c.is_control())
    {
        writeln!(out, "`{s}`\n")?;
    } else {
        writeln!(out, "{} bytes: {}\n", data.len(), hex(data))?;
    }
    Ok(())
}

fn hex(data: &[u8]) -> String {
    const MAX: usize = 64;
    let mut s = String::with_capacity(data.len().min(MAX) * 2 + 3);
    for b in data.iter().take(MAX) {
        let _ = write!(s, "{b:02x}");
    }
    if data.len() > MAX {
        s.push_str("...");
    }
    s
}
