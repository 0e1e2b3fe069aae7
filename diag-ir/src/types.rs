use serde::Serialize;

// --- Top-level ---

/// Root of the diagnostic model extracted from one CDD file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct DiagnosticDocument {
    pub ecu_name: String,
    pub manufacturer: String,
    pub version: String,
    pub services: Vec<Service>,
    pub dids: Vec<Did>,
    pub communication_params: CommunicationParams,
}

/// Bus-level addressing and timing. Every field is best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct CommunicationParams {
    pub physical_request_id: Option<String>,
    pub physical_response_id: Option<String>,
    pub functional_request_id: Option<String>,
    pub addressing_scheme: Option<String>,
    pub can_id_type: Option<String>,
    pub p2_timeout: Option<String>,
    pub p2_star_timeout: Option<String>,
    pub s3_timeout: Option<String>,
}

impl CommunicationParams {
    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    /// Present parameters as `(key, value)` pairs in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("physical_request_id", &self.physical_request_id),
            ("physical_response_id", &self.physical_response_id),
            ("functional_request_id", &self.functional_request_id),
            ("addressing_scheme", &self.addressing_scheme),
            ("can_id_type", &self.can_id_type),
            ("p2_timeout", &self.p2_timeout),
            ("p2_star_timeout", &self.p2_star_timeout),
            ("s3_timeout", &self.s3_timeout),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.as_deref().map(|v| (k, v)))
    }
}

// --- Services ---

/// One UDS protocol service (`PROTOCOLSERVICE`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub qualifier: String,
    pub description: String,
    /// Only set when a constant `sid` component carries a parseable literal.
    pub uds_service_id: Option<u8>,
    pub supports_functional_addressing: bool,
    pub supports_physical_addressing: bool,
    pub supports_multiple_response: bool,
    pub responds_on_physical: bool,
    pub responds_on_functional: bool,
    pub request: Option<ServiceMessage>,
    pub positive_response: Option<ServiceMessage>,
    pub negative_response: Option<ServiceMessage>,
}

impl Service {
    /// Raw literal of the constant `sid` component, wherever it sits in the
    /// service's messages.
    pub fn sid_literal(&self) -> Option<&str> {
        [&self.request, &self.positive_response, &self.negative_response]
            .into_iter()
            .flatten()
            .flat_map(|msg| &msg.components)
            .find(|c| c.kind == ComponentKind::Constant && c.spec == "sid")
            .and_then(|c| c.literal_value.as_deref())
    }
}

/// Request, positive response or negative response layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceMessage {
    pub id: String,
    pub name: String,
    pub qualifier: String,
    /// Constants first, then statics, then simple proxies.
    pub components: Vec<Component>,
}

/// One field of a request/response payload layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    pub id: String,
    pub name: String,
    pub qualifier: String,
    pub kind: ComponentKind,
    pub mandatory: bool,
    pub spec: String,
    pub bit_length: Option<String>,
    pub literal_value: Option<String>,
    pub data_type_ref: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ComponentKind {
    Constant,
    Static,
    SimpleProxy,
}

impl ComponentKind {
    /// Extraction order inside a message.
    pub const ALL: [ComponentKind; 3] = [Self::Constant, Self::Static, Self::SimpleProxy];

    /// CDD element name for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Constant => "CONSTCOMP",
            Self::Static => "STATICCOMP",
            Self::SimpleProxy => "SIMPLEPROXYCOMP",
        }
    }
}

// --- Data identifiers ---

/// A data identifier. `number_hex` is derived from `number` on construction
/// and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Did {
    pub id: String,
    number: u16,
    number_hex: String,
    pub name: String,
    pub qualifier: String,
    pub description: String,
    pub data_objects: Vec<DataObject>,
}

impl Did {
    pub fn new(id: impl Into<String>, number: u16) -> Self {
        let number_hex = format_did_hex(number);
        Self {
            id: id.into(),
            number,
            name: format!("DID_{number_hex}"),
            qualifier: String::new(),
            description: String::new(),
            data_objects: Vec::new(),
            number_hex,
        }
    }

    pub fn number(&self) -> u16 {
        self.number
    }

    pub fn number_hex(&self) -> &str {
        &self.number_hex
    }
}

/// Canonical DID rendering: `0x` + 4 uppercase hex digits.
pub fn format_did_hex(number: u16) -> String {
    format!("0x{number:04X}")
}

/// Named sub-field of a DID structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataObject {
    pub id: String,
    pub name: String,
    pub qualifier: String,
    pub data_type_ref: String,
    pub spec: String,
}
