//! DiagnosticDocument -> ODX entity collection.
//!
//! Services are always emitted, falling back to synthesized names; DIDs
//! without an identifier or a name are dropped.

use diag_ir::uds::service_name;
use diag_ir::{
    CommunicationParams, Component, ComponentKind, DataObject, DiagnosticDocument, Did, Service,
    ServiceMessage,
};
use serde::Serialize;

use crate::normalize::{normalize_hex, normalize_service_id, parse_hex, positive_response_id, strip_hex_prefix};

pub const DEFAULT_DID_DATA_TYPE: &str = "BYTEFIELD";
pub const DEFAULT_DID_LENGTH: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParamKind {
    ServiceId,
    DataIdentifier,
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamValue {
    /// Coded hex value (`0x22`, `0xF190`).
    Value(String),
    /// Id of the DOP describing the payload.
    StructureRef(String),
}

/// One request or response parameter of an ODX service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamDescriptor {
    pub kind: ParamKind,
    pub name: String,
    #[serde(flatten)]
    pub value: ParamValue,
}

impl ParamDescriptor {
    pub fn service_id(sid_hex: impl Into<String>) -> Self {
        Self {
            kind: ParamKind::ServiceId,
            name: "ServiceId".into(),
            value: ParamValue::Value(sid_hex.into()),
        }
    }

    pub fn data_identifier(did_hex: impl Into<String>) -> Self {
        Self {
            kind: ParamKind::DataIdentifier,
            name: "DID".into(),
            value: ParamValue::Value(did_hex.into()),
        }
    }

    /// Payload of a DID, referencing `DOP.DID_<hex>`.
    pub fn data(did_hex: &str) -> Self {
        let bare = strip_hex_prefix(did_hex);
        Self {
            kind: ParamKind::Data,
            name: format!("DID_{bare}_Data"),
            value: ParamValue::StructureRef(dop_id(bare)),
        }
    }

    pub fn coded_value(&self) -> Option<&str> {
        match &self.value {
            ParamValue::Value(v) => Some(v),
            ParamValue::StructureRef(_) => None,
        }
    }

    pub fn structure_ref(&self) -> Option<&str> {
        match &self.value {
            ParamValue::StructureRef(r) => Some(r),
            ParamValue::Value(_) => None,
        }
    }
}

/// `DOP.DID_<hex>` for a DID hex without prefix.
pub fn dop_id(bare_hex: &str) -> String {
    format!("DOP.DID_{bare_hex}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OdxService {
    pub id: String,
    pub name: String,
    pub service_id_hex: String,
    pub request_params: Vec<ParamDescriptor>,
    pub response_params: Vec<ParamDescriptor>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureField {
    pub name: String,
    pub qualifier: String,
    pub data_type_ref: String,
    pub spec: String,
}

impl From<&DataObject> for StructureField {
    fn from(obj: &DataObject) -> Self {
        Self {
            name: obj.name.clone(),
            qualifier: obj.qualifier.clone(),
            data_type_ref: obj.data_type_ref.clone(),
            spec: obj.spec.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OdxDataIdentifier {
    pub id: String,
    pub identifier_hex: String,
    pub name: String,
    pub description: String,
    pub data_type: String,
    pub length: u32,
    pub structure: Vec<StructureField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct OdxCommParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_response_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functional_request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p2_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p2_star_timeout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_timeout: Option<String>,
}

impl OdxCommParams {
    /// Present parameters in fixed order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("physical_request_id", &self.physical_request_id),
            ("physical_response_id", &self.physical_response_id),
            ("functional_request_id", &self.functional_request_id),
            ("p2_timeout", &self.p2_timeout),
            ("p2_star_timeout", &self.p2_star_timeout),
            ("s3_timeout", &self.s3_timeout),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.as_deref().map(|v| (k, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }
}

impl From<&CommunicationParams> for OdxCommParams {
    fn from(params: &CommunicationParams) -> Self {
        Self {
            physical_request_id: params.physical_request_id.clone(),
            physical_response_id: params.physical_response_id.clone(),
            functional_request_id: params.functional_request_id.clone(),
            p2_timeout: params.p2_timeout.clone(),
            p2_star_timeout: params.p2_star_timeout.clone(),
            s3_timeout: params.s3_timeout.clone(),
        }
    }
}

/// Everything the renderer needs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct OdxCollection {
    pub services: Vec<OdxService>,
    pub data_identifiers: Vec<OdxDataIdentifier>,
    pub communication_params: OdxCommParams,
}

pub fn map_document(doc: &DiagnosticDocument) -> OdxCollection {
    let services: Vec<_> = doc.services.iter().map(map_service).collect();
    let data_identifiers: Vec<_> = doc.dids.iter().filter_map(map_data_identifier).collect();

    let dropped = doc.dids.len() - data_identifiers.len();
    if dropped > 0 {
        log::warn!("{dropped} DID(s) without identifier or name left out of ODX output");
    }
    log::debug!(
        "mapped {} services and {} DIDs to ODX",
        services.len(),
        data_identifiers.len()
    );

    OdxCollection {
        services,
        data_identifiers,
        communication_params: (&doc.communication_params).into(),
    }
}

/// Map one service. Never drops: missing identity falls back to
/// `0x00` / `Service_<hex>`.
pub fn map_service(svc: &Service) -> OdxService {
    let sid = normalize_service_id(&request_sid_text(svc));
    let name = resolve_service_name(&sid, &svc.name);

    let mut request_params = vec![ParamDescriptor::service_id(sid.clone())];
    request_params.extend(
        did_values(svc.request.as_ref()).map(ParamDescriptor::data_identifier),
    );

    let mut response_params = vec![ParamDescriptor::service_id(positive_response_id(&sid))];
    for did in did_values(svc.positive_response.as_ref()) {
        let data = ParamDescriptor::data(&did);
        response_params.push(ParamDescriptor::data_identifier(did));
        response_params.push(data);
    }

    let description = if svc.description.is_empty() {
        format!("{name} service")
    } else {
        svc.description.clone()
    };

    OdxService {
        id: name.replace(' ', ""),
        name,
        service_id_hex: sid,
        request_params,
        response_params,
        description,
    }
}

/// Hex of the numeric SID, else the raw `sid` literal, else empty.
fn request_sid_text(svc: &Service) -> String {
    match svc.uds_service_id {
        Some(sid) => format!("{sid:02X}"),
        None => svc.sid_literal().unwrap_or_default().to_string(),
    }
}

/// Standard UDS name, then the source name, then `Service_<hex>`.
fn resolve_service_name(sid_hex: &str, source_name: &str) -> String {
    let standard = parse_hex(sid_hex)
        .and_then(|v| u8::try_from(v).ok())
        .and_then(service_name);
    match standard {
        Some(name) => name.to_string(),
        None if !source_name.is_empty() => source_name.to_string(),
        None => format!("Service_{}", strip_hex_prefix(sid_hex)),
    }
}

/// Normalized DID values of `id` components that carry a literal.
fn did_values(msg: Option<&ServiceMessage>) -> impl Iterator<Item = String> + '_ {
    msg.into_iter()
        .flat_map(|m| &m.components)
        .filter(|c| c.spec == "id")
        .filter_map(did_literal)
}

fn did_literal(comp: &Component) -> Option<String> {
    let raw = comp.literal_value.as_deref()?.trim();
    if raw.is_empty() {
        return None;
    }
    if comp.kind != ComponentKind::Constant {
        log::debug!("DID literal on non-constant component '{}'", comp.id);
    }
    Some(normalize_hex(raw))
}

pub fn map_data_identifier(did: &Did) -> Option<OdxDataIdentifier> {
    data_identifier_from_parts(
        did.number_hex(),
        &did.name,
        &did.description,
        did.data_objects.iter().map(StructureField::from).collect(),
    )
}

/// Build an ODX DID from raw parts; `None` when identifier or name is empty.
pub fn data_identifier_from_parts(
    identifier: &str,
    name: &str,
    description: &str,
    structure: Vec<StructureField>,
) -> Option<OdxDataIdentifier> {
    if identifier.trim().is_empty() || name.is_empty() {
        return None;
    }
    let identifier_hex = normalize_hex(identifier);
    let bare = strip_hex_prefix(&identifier_hex).to_string();
    Some(OdxDataIdentifier {
        id: format!("DID_{bare}"),
        description: if description.is_empty() {
            format!("Data Identifier {identifier_hex}")
        } else {
            description.to_string()
        },
        identifier_hex,
        name: name.to_string(),
        data_type: DEFAULT_DID_DATA_TYPE.to_string(),
        length: DEFAULT_DID_LENGTH,
        structure,
    })
}
