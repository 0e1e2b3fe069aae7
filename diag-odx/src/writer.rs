//! ODX writer: OdxCollection -> ODX-D XML string.
//!
//! Maps the collection onto odx_model types, then serializes to XML via
//! quick-xml.

use std::collections::{HashMap, HashSet};

use quick_xml::se::Serializer;
use serde::Serialize;
use thiserror::Error;

use crate::mapper::{OdxCollection, OdxCommParams, OdxDataIdentifier, OdxService, ParamDescriptor, ParamKind};
use crate::normalize::parse_hex;
use crate::odx_model::*;

#[derive(Debug, Error)]
pub enum OdxWriteError {
    #[error("XML serialization failed: {0}")]
    SerError(String),
}

/// Header values not carried by the collection itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OdxWriteOptions {
    pub ecu_name: String,
    pub version: String,
}

impl Default for OdxWriteOptions {
    fn default() -> Self {
        Self {
            ecu_name: "ECU".into(),
            version: "1.0.0".into(),
        }
    }
}

/// Write an OdxCollection to an ODX-D XML string.
pub fn write_odx(collection: &OdxCollection, options: &OdxWriteOptions) -> Result<String, OdxWriteError> {
    let odx = collection_to_odx(collection, options);

    let mut xml = String::new();
    let mut ser = Serializer::new(&mut xml);
    ser.indent(' ', 2);
    odx.serialize(ser)
        .map_err(|e| OdxWriteError::SerError(e.to_string()))?;

    Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{xml}\n"))
}

fn collection_to_odx(collection: &OdxCollection, options: &OdxWriteOptions) -> Odx {
    let ecu = short_name(&options.ecu_name);

    let dops: Vec<OdxDataObjectProp> = collection.data_identifiers.iter().map(did_to_dop).collect();
    let dop_lengths: HashMap<String, u32> = collection
        .data_identifiers
        .iter()
        .map(|did| (format!("DOP.{}", did.id), did.length))
        .collect();

    let mut ids = UniqueIds::default();
    let mut diag_services = Vec::new();
    let mut requests = Vec::new();
    let mut pos_responses = Vec::new();

    for svc in &collection.services {
        let name = ids.claim(&short_name(&svc.id));
        diag_services.push(service_to_odx(svc, &name));
        requests.push(OdxRequest {
            id: Some(format!("RQ.{name}")),
            short_name: Some(format!("RQ_{name}")),
            params: params_to_odx(&svc.request_params, &dop_lengths),
        });
        pos_responses.push(OdxResponse {
            id: Some(format!("PR.{name}")),
            short_name: Some(format!("PR_{name}")),
            params: params_to_odx(&svc.response_params, &dop_lengths),
        });
    }

    let base_variant = DiagLayerVariant {
        id: Some(format!("BV.{ecu}")),
        short_name: Some(ecu.clone()),
        long_name: Some(options.ecu_name.clone()),
        sdgs: comm_params_to_sdgs(&collection.communication_params),
        diag_data_dictionary_spec: (!dops.is_empty()).then(|| DiagDataDictionarySpec {
            data_object_props: Some(DataObjectPropsWrapper { items: dops }),
        }),
        diag_comms: (!diag_services.is_empty()).then(|| DiagCommsWrapper {
            items: diag_services,
        }),
        requests: (!requests.is_empty()).then(|| RequestsWrapper { items: requests }),
        pos_responses: (!pos_responses.is_empty()).then(|| PosResponsesWrapper {
            items: pos_responses,
        }),
    };

    Odx {
        xmlns_xsi: Some(XSI_NAMESPACE.into()),
        model_version: Some(ODX_VERSION.into()),
        version: Some(ODX_VERSION.into()),
        diag_layer_container: Some(DiagLayerContainer {
            id: Some(format!("DLC.{ecu}")),
            short_name: Some(ecu),
            long_name: Some(options.ecu_name.clone()),
            admin_data: Some(AdminData {
                language: Some("en-US".into()),
                doc_revisions: Some(DocRevisionsWrapper {
                    items: vec![DocRevision {
                        revision_label: Some(options.version.clone()),
                        state: Some("draft".into()),
                    }],
                }),
            }),
            base_variants: Some(BaseVariantsWrapper {
                items: vec![base_variant],
            }),
        }),
    }
}

fn service_to_odx(svc: &OdxService, name: &str) -> OdxDiagService {
    OdxDiagService {
        id: Some(format!("DS.{name}")),
        short_name: Some(name.to_string()),
        long_name: Some(svc.name.clone()),
        desc: Some(OdxDesc {
            paragraph: svc.description.clone(),
        }),
        request_ref: Some(OdxRef::to(format!("RQ.{name}"))),
        pos_response_refs: Some(PosResponseRefsWrapper {
            items: vec![OdxRef::to(format!("PR.{name}"))],
        }),
    }
}

// --- Param ---

fn params_to_odx(params: &[ParamDescriptor], dop_lengths: &HashMap<String, u32>) -> Option<ParamsWrapper> {
    if params.is_empty() {
        return None;
    }
    let mut byte_position = 0;
    let items = params
        .iter()
        .map(|p| {
            let (odx_param, byte_len) = param_to_odx(p, byte_position, dop_lengths);
            byte_position += byte_len;
            odx_param
        })
        .collect();
    Some(ParamsWrapper { items })
}

/// Returns the param and the number of bytes it occupies.
fn param_to_odx(p: &ParamDescriptor, byte_position: u32, dop_lengths: &HashMap<String, u32>) -> (OdxParam, u32) {
    let mut odx_param = OdxParam {
        xsi_type: None,
        semantic: None,
        short_name: Some(p.name.clone()),
        byte_position: Some(byte_position),
        coded_value: None,
        diag_coded_type: None,
        dop_ref: None,
    };

    let byte_len = match p.kind {
        ParamKind::ServiceId | ParamKind::DataIdentifier => {
            let bits = if p.kind == ParamKind::ServiceId { 8 } else { 16 };
            odx_param.xsi_type = Some("CODED-CONST".into());
            odx_param.semantic = Some(if p.kind == ParamKind::ServiceId { "SERVICE-ID" } else { "ID" }.into());
            odx_param.coded_value = p.coded_value().map(coded_decimal);
            odx_param.diag_coded_type = Some(uint_coded_type(bits));
            bits / 8
        }
        ParamKind::Data => {
            odx_param.xsi_type = Some("VALUE".into());
            odx_param.semantic = Some("DATA".into());
            let dop = p.structure_ref().unwrap_or_default();
            odx_param.dop_ref = Some(OdxRef::to(dop));
            dop_lengths.get(dop).copied().unwrap_or(1)
        }
    };
    (odx_param, byte_len)
}

/// CODED-VALUE is decimal; non-hex values are written as-is.
fn coded_decimal(hex: &str) -> String {
    match parse_hex(hex) {
        Some(v) => v.to_string(),
        None => {
            log::warn!("coded value '{hex}' is not hex, written unchanged");
            hex.to_string()
        }
    }
}

fn uint_coded_type(bits: u32) -> OdxDiagCodedType {
    OdxDiagCodedType {
        xsi_type: Some("STANDARD-LENGTH-TYPE".into()),
        base_data_type: Some("A_UINT32".into()),
        bit_length: Some(bits),
    }
}

// --- DOP ---

fn did_to_dop(did: &OdxDataIdentifier) -> OdxDataObjectProp {
    let base_data_type = format!("A_{}", did.data_type);
    OdxDataObjectProp {
        id: Some(format!("DOP.{}", did.id)),
        short_name: Some(did.id.clone()),
        long_name: Some(did.name.clone()),
        desc: Some(OdxDesc {
            paragraph: did.description.clone(),
        }),
        compu_method: Some(OdxCompuMethod {
            category: Some("IDENTICAL".into()),
        }),
        diag_coded_type: Some(OdxDiagCodedType {
            xsi_type: Some("STANDARD-LENGTH-TYPE".into()),
            base_data_type: Some(base_data_type.clone()),
            bit_length: Some(did.length * 8),
        }),
        physical_type: Some(OdxPhysicalType {
            base_data_type: Some(base_data_type),
        }),
    }
}

// --- SDGs ---

fn comm_params_to_sdgs(params: &OdxCommParams) -> Option<SdgsWrapper> {
    if params.is_empty() {
        return None;
    }
    Some(SdgsWrapper {
        items: vec![OdxSdg {
            sdg_caption: Some(OdxSdgCaption {
                id: Some("SDGC.CommunicationParameters".into()),
                short_name: Some("CommunicationParameters".into()),
            }),
            sds: params
                .entries()
                .map(|(key, value)| OdxSd {
                    si: Some(key.to_string()),
                    value: value.to_string(),
                })
                .collect(),
        }],
    })
}

// --- Naming ---

/// ODX SHORT-NAME: letters, digits and `_` only.
fn short_name(raw: &str) -> String {
    let name: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.is_empty() { "_".into() } else { name }
}

/// Hands out each name once; repeats get the first free `_2`, `_3`, ...
#[derive(Default)]
struct UniqueIds {
    taken: HashSet<String>,
}

impl UniqueIds {
    fn claim(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| self.taken.insert(candidate.clone()))
            .unwrap_or_else(|| base.to_string())
    }
}
