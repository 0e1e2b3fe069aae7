//! ODX XML model.
//!
//! Serde types matching the subset of the ODX 2.2.0 structure that the
//! converter emits. Uses quick-xml with `#[serde(rename = "TAG")]` for ODX
//! element names and `"@ATTR"` for attributes.

use serde::{Deserialize, Serialize};

pub const ODX_VERSION: &str = "2.2.0";
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

// --- Root ---

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "ODX")]
pub struct Odx {
    #[serde(rename = "@xmlns:xsi", default, skip_serializing_if = "Option::is_none")]
    pub xmlns_xsi: Option<String>,
    #[serde(rename = "@MODEL-VERSION", default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    #[serde(rename = "@VERSION", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "DIAG-LAYER-CONTAINER", default, skip_serializing_if = "Option::is_none")]
    pub diag_layer_container: Option<DiagLayerContainer>,
}

// --- DiagLayerContainer ---

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "DIAG-LAYER-CONTAINER")]
pub struct DiagLayerContainer {
    #[serde(rename = "@ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "SHORT-NAME", default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(rename = "LONG-NAME", default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    #[serde(rename = "ADMIN-DATA", default, skip_serializing_if = "Option::is_none")]
    pub admin_data: Option<AdminData>,
    #[serde(rename = "BASE-VARIANTS", default, skip_serializing_if = "Option::is_none")]
    pub base_variants: Option<BaseVariantsWrapper>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BaseVariantsWrapper {
    #[serde(rename = "BASE-VARIANT", default)]
    pub items: Vec<DiagLayerVariant>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiagLayerVariant {
    #[serde(rename = "@ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "SHORT-NAME", default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(rename = "LONG-NAME", default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    #[serde(rename = "SDGS", default, skip_serializing_if = "Option::is_none")]
    pub sdgs: Option<SdgsWrapper>,
    #[serde(rename = "DIAG-DATA-DICTIONARY-SPEC", default, skip_serializing_if = "Option::is_none")]
    pub diag_data_dictionary_spec: Option<DiagDataDictionarySpec>,
    #[serde(rename = "DIAG-COMMS", default, skip_serializing_if = "Option::is_none")]
    pub diag_comms: Option<DiagCommsWrapper>,
    #[serde(rename = "REQUESTS", default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<RequestsWrapper>,
    #[serde(rename = "POS-RESPONSES", default, skip_serializing_if = "Option::is_none")]
    pub pos_responses: Option<PosResponsesWrapper>,
}

// --- List wrappers ---

#[derive(Debug, Serialize, Deserialize)]
pub struct DiagCommsWrapper {
    #[serde(rename = "DIAG-SERVICE", default)]
    pub items: Vec<OdxDiagService>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RequestsWrapper {
    #[serde(rename = "REQUEST", default)]
    pub items: Vec<OdxRequest>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PosResponsesWrapper {
    #[serde(rename = "POS-RESPONSE", default)]
    pub items: Vec<OdxResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PosResponseRefsWrapper {
    #[serde(rename = "POS-RESPONSE-REF", default)]
    pub items: Vec<OdxRef>,
}

// --- DiagService ---

#[derive(Debug, Serialize, Deserialize)]
pub struct OdxDiagService {
    #[serde(rename = "@ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "SHORT-NAME", default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(rename = "LONG-NAME", default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    #[serde(rename = "DESC", default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<OdxDesc>,
    #[serde(rename = "REQUEST-REF", default, skip_serializing_if = "Option::is_none")]
    pub request_ref: Option<OdxRef>,
    #[serde(rename = "POS-RESPONSE-REFS", default, skip_serializing_if = "Option::is_none")]
    pub pos_response_refs: Option<PosResponseRefsWrapper>,
}

// --- Request / Response ---

#[derive(Debug, Serialize, Deserialize)]
pub struct OdxRequest {
    #[serde(rename = "@ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "SHORT-NAME", default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(rename = "PARAMS", default, skip_serializing_if = "Option::is_none")]
    pub params: Option<ParamsWrapper>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OdxResponse {
    #[serde(rename = "@ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "SHORT-NAME", default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(rename = "PARAMS", default, skip_serializing_if = "Option::is_none")]
    pub params: Option<ParamsWrapper>,
}

// --- Params ---

#[derive(Debug, Serialize, Deserialize)]
pub struct ParamsWrapper {
    #[serde(rename = "PARAM", default)]
    pub items: Vec<OdxParam>,
}

/// Generic param; `xsi:type` selects CODED-CONST or VALUE.
#[derive(Debug, Serialize, Deserialize)]
pub struct OdxParam {
    #[serde(rename = "@xsi:type", alias = "@type", default, skip_serializing_if = "Option::is_none")]
    pub xsi_type: Option<String>,
    #[serde(rename = "@SEMANTIC", default, skip_serializing_if = "Option::is_none")]
    pub semantic: Option<String>,
    #[serde(rename = "SHORT-NAME", default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(rename = "BYTE-POSITION", default, skip_serializing_if = "Option::is_none")]
    pub byte_position: Option<u32>,
    // CODED-CONST
    #[serde(rename = "CODED-VALUE", default, skip_serializing_if = "Option::is_none")]
    pub coded_value: Option<String>,
    #[serde(rename = "DIAG-CODED-TYPE", default, skip_serializing_if = "Option::is_none")]
    pub diag_coded_type: Option<OdxDiagCodedType>,
    // VALUE
    #[serde(rename = "DOP-REF", default, skip_serializing_if = "Option::is_none")]
    pub dop_ref: Option<OdxRef>,
}

// --- DiagDataDictionarySpec ---

#[derive(Debug, Serialize, Deserialize)]
pub struct DiagDataDictionarySpec {
    #[serde(rename = "DATA-OBJECT-PROPS", default, skip_serializing_if = "Option::is_none")]
    pub data_object_props: Option<DataObjectPropsWrapper>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DataObjectPropsWrapper {
    #[serde(rename = "DATA-OBJECT-PROP", default)]
    pub items: Vec<OdxDataObjectProp>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OdxDataObjectProp {
    #[serde(rename = "@ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "SHORT-NAME", default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(rename = "LONG-NAME", default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    #[serde(rename = "DESC", default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<OdxDesc>,
    #[serde(rename = "COMPU-METHOD", default, skip_serializing_if = "Option::is_none")]
    pub compu_method: Option<OdxCompuMethod>,
    #[serde(rename = "DIAG-CODED-TYPE", default, skip_serializing_if = "Option::is_none")]
    pub diag_coded_type: Option<OdxDiagCodedType>,
    #[serde(rename = "PHYSICAL-TYPE", default, skip_serializing_if = "Option::is_none")]
    pub physical_type: Option<OdxPhysicalType>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OdxCompuMethod {
    #[serde(rename = "CATEGORY", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OdxDiagCodedType {
    #[serde(rename = "@xsi:type", alias = "@type", default, skip_serializing_if = "Option::is_none")]
    pub xsi_type: Option<String>,
    #[serde(rename = "@BASE-DATA-TYPE", default, skip_serializing_if = "Option::is_none")]
    pub base_data_type: Option<String>,
    #[serde(rename = "BIT-LENGTH", default, skip_serializing_if = "Option::is_none")]
    pub bit_length: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OdxPhysicalType {
    #[serde(rename = "@BASE-DATA-TYPE", default, skip_serializing_if = "Option::is_none")]
    pub base_data_type: Option<String>,
}

// --- Common types ---

#[derive(Debug, Serialize, Deserialize)]
pub struct OdxRef {
    #[serde(rename = "@ID-REF", default, skip_serializing_if = "Option::is_none")]
    pub id_ref: Option<String>,
}

impl OdxRef {
    pub fn to(id: impl Into<String>) -> Self {
        Self {
            id_ref: Some(id.into()),
        }
    }
}

/// `<DESC><p>...</p></DESC>`
#[derive(Debug, Serialize, Deserialize)]
pub struct OdxDesc {
    #[serde(rename = "p", default)]
    pub paragraph: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminData {
    #[serde(rename = "LANGUAGE", default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(rename = "DOC-REVISIONS", default, skip_serializing_if = "Option::is_none")]
    pub doc_revisions: Option<DocRevisionsWrapper>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocRevisionsWrapper {
    #[serde(rename = "DOC-REVISION", default)]
    pub items: Vec<DocRevision>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocRevision {
    #[serde(rename = "REVISION-LABEL", default, skip_serializing_if = "Option::is_none")]
    pub revision_label: Option<String>,
    #[serde(rename = "STATE", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

// --- SDGs ---

#[derive(Debug, Serialize, Deserialize)]
pub struct SdgsWrapper {
    #[serde(rename = "SDG", default)]
    pub items: Vec<OdxSdg>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OdxSdg {
    #[serde(rename = "SDG-CAPTION", default, skip_serializing_if = "Option::is_none")]
    pub sdg_caption: Option<OdxSdgCaption>,
    #[serde(rename = "SD", default)]
    pub sds: Vec<OdxSd>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OdxSdgCaption {
    #[serde(rename = "@ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "SHORT-NAME", default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OdxSd {
    #[serde(rename = "@SI", default, skip_serializing_if = "Option::is_none")]
    pub si: Option<String>,
    #[serde(rename = "$text", default)]
    pub value: String,
}
