//! Standard UDS (ISO 14229-1) service catalog.
//!
//! Canonical names for the 25 standard service identifiers, audience-facing
//! descriptions, and the description enrichment used when a CDD file carries
//! no description of its own. Names and descriptions are separate tables:
//! 0x38 has a description but no canonical name.

/// `(SID, canonical name)` for every standard UDS service.
pub static UDS_SERVICE_NAMES: [(u8, &str); 25] = [
    (0x10, "DiagnosticSessionControl"),
    (0x11, "ECUReset"),
    (0x14, "ClearDiagnosticInformation"),
    (0x19, "ReadDTCInformation"),
    (0x22, "ReadDataByIdentifier"),
    (0x23, "ReadMemoryByAddress"),
    (0x24, "ReadScalingDataByIdentifier"),
    (0x27, "SecurityAccess"),
    (0x28, "CommunicationControl"),
    (0x2A, "ReadDataByPeriodicIdentifier"),
    (0x2C, "DynamicallyDefineDataIdentifier"),
    (0x2E, "WriteDataByIdentifier"),
    (0x2F, "InputOutputControlByIdentifier"),
    (0x31, "RoutineControl"),
    (0x34, "RequestDownload"),
    (0x35, "RequestUpload"),
    (0x36, "TransferData"),
    (0x37, "RequestTransferExit"),
    (0x3D, "WriteMemoryByAddress"),
    (0x3E, "TesterPresent"),
    (0x83, "AccessTimingParameter"),
    (0x84, "SecuredDataTransmission"),
    (0x85, "ControlDTCSetting"),
    (0x86, "ResponseOnEvent"),
    (0x87, "LinkControl"),
];

/// `(SID, description)` for every described UDS service.
pub static UDS_DESCRIPTIONS: [(u8, &str); 26] = [
    (
        0x10,
        "Controls diagnostic session state. Allows switching between different diagnostic sessions (default, programming, extended) with different access levels and timeouts.",
    ),
    (
        0x11,
        "Performs ECU reset operations. Supports hard reset, key-off-on reset, and soft reset to restart ECU functionality.",
    ),
    (
        0x14,
        "Clears diagnostic trouble codes (DTCs) and their associated status information from ECU memory.",
    ),
    (
        0x19,
        "Reads diagnostic trouble codes (DTCs) with various subfunctions for different DTC formats and status masks.",
    ),
    (
        0x22,
        "Reads data from ECU memory using Data Identifiers (DIDs). Provides access to real-time data, configuration parameters, and diagnostic information.",
    ),
    (
        0x23,
        "Reads data from ECU memory by specifying memory address and size. Direct memory access for diagnostic purposes.",
    ),
    (
        0x24,
        "Reads scaling information for data identifiers to convert raw values to physical units.",
    ),
    (
        0x27,
        "Provides security access to protected diagnostic functions. Uses seed-key mechanism for authentication.",
    ),
    (
        0x28,
        "Controls communication with ECU. Can disable/enable normal communication and network management.",
    ),
    (
        0x2A,
        "Reads data with periodic transmission. Sets up cyclic data transmission from ECU to tester.",
    ),
    (
        0x2C,
        "Dynamically defines data identifiers by memory address. Creates custom DIDs for specific memory locations.",
    ),
    (
        0x2E,
        "Writes data to ECU memory using Data Identifiers (DIDs). Allows modification of configuration parameters and calibration data.",
    ),
    (
        0x2F,
        "Controls input/output operations. Can force specific states on ECU inputs and outputs for testing purposes.",
    ),
    (
        0x31,
        "Executes diagnostic routines. Starts, stops, and requests results from various diagnostic procedures.",
    ),
    (
        0x34,
        "Initiates download of data to ECU memory. Requests memory allocation for data transfer operations.",
    ),
    (
        0x35,
        "Initiates upload of data from ECU memory. Requests memory allocation for data retrieval operations.",
    ),
    (
        0x36,
        "Transfers data blocks to ECU during download operations. Continues data transfer started with RequestDownload.",
    ),
    (
        0x37,
        "Transfers data blocks from ECU during upload operations. Continues data transfer started with RequestUpload.",
    ),
    (
        0x38,
        "Completes data transfer operations. Finalizes download/upload and verifies data integrity.",
    ),
    (
        0x3D,
        "Writes data to ECU memory by specifying memory address and size. Direct memory write access for diagnostic purposes.",
    ),
    (
        0x3E,
        "Maintains active diagnostic session. Prevents timeout of current diagnostic session through periodic transmission.",
    ),
    (
        0x83,
        "Provides access to diagnostic data related to communication and network management.",
    ),
    (
        0x84,
        "Controls network management and communication flow within the vehicle network.",
    ),
    (
        0x85,
        "Manages diagnostic communication timing parameters and session behavior.",
    ),
    (
        0x86,
        "Controls response behavior for diagnostic requests in functional and physical addressing modes.",
    ),
    (
        0x87,
        "Provides access to vehicle identification and diagnostic capabilities information.",
    ),
];

/// Description attached to a name fragment.
#[derive(Debug, Clone, Copy)]
enum FragmentDescription {
    Sid(u8),
    Text(&'static str),
}

/// Name fragments recognised in free-text service names, checked in order.
static NAME_FRAGMENTS: [(&str, FragmentDescription); 17] = [
    ("DiagnosticSessionControl", FragmentDescription::Sid(0x10)),
    ("ECUReset", FragmentDescription::Sid(0x11)),
    ("ClearDiagnosticInformation", FragmentDescription::Sid(0x14)),
    ("ReadDTCInformation", FragmentDescription::Sid(0x19)),
    ("ReadDataByIdentifier", FragmentDescription::Sid(0x22)),
    ("ReadMemoryByAddress", FragmentDescription::Sid(0x23)),
    ("SecurityAccess", FragmentDescription::Sid(0x27)),
    ("CommunicationControl", FragmentDescription::Sid(0x28)),
    ("WriteDataByIdentifier", FragmentDescription::Sid(0x2E)),
    ("InputOutputControlByIdentifier", FragmentDescription::Sid(0x2F)),
    ("RoutineControl", FragmentDescription::Sid(0x31)),
    ("RequestDownload", FragmentDescription::Sid(0x34)),
    ("RequestUpload", FragmentDescription::Sid(0x35)),
    (
        "TransferData",
        FragmentDescription::Text(
            "Transfers data blocks between tester and ECU during download/upload operations",
        ),
    ),
    // Exit shares the completion text filed under 0x38.
    ("RequestTransferExit", FragmentDescription::Sid(0x38)),
    ("WriteMemoryByAddress", FragmentDescription::Sid(0x3D)),
    ("TesterPresent", FragmentDescription::Sid(0x3E)),
];

/// Canonical UDS name for a service identifier.
pub fn service_name(sid: u8) -> Option<&'static str> {
    UDS_SERVICE_NAMES
        .iter()
        .find(|(id, _)| *id == sid)
        .map(|(_, name)| *name)
}

/// Canonical description for a service identifier.
pub fn service_description(sid: u8) -> Option<&'static str> {
    UDS_DESCRIPTIONS
        .iter()
        .find(|(id, _)| *id == sid)
        .map(|(_, desc)| *desc)
}

/// Description for a service that has no description of its own.
///
/// Tries the numeric SID first, then a case-sensitive substring match of the
/// raw name against the canonical fragments, then a generic sentence.
pub fn enrich_description(service_name: &str, sid: Option<u8>) -> String {
    if let Some(desc) = sid.and_then(service_description) {
        return desc.to_string();
    }

    NAME_FRAGMENTS
        .iter()
        .find(|(fragment, _)| service_name.contains(fragment))
        .and_then(|(_, described)| match *described {
            FragmentDescription::Sid(sid) => service_description(sid),
            FragmentDescription::Text(text) => Some(text),
        })
        .map_or_else(
            || {
                format!(
                    "UDS diagnostic service providing {service_name} functionality according to ISO 14229-1 specification."
                )
            },
            str::to_string,
        )
}
