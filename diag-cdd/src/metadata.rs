//! Document-level metadata and best-effort communication parameters.

use diag_ir::CommunicationParams;

use crate::locator::{child_text, localized_name};
use crate::tree::XmlNode;

/// `manufacturer` of the first `ECUDOC`; "Unknown" when the attribute is
/// missing, empty when there is no `ECUDOC` at all.
pub fn manufacturer<N: XmlNode>(root: &N) -> String {
    let Some(ecudoc) = root.find_descendant("ECUDOC") else {
        return String::new();
    };
    match ecudoc.attribute("manufacturer") {
        Ok(Some(m)) if !m.trim().is_empty() => m.trim().to_string(),
        Ok(_) => "Unknown".to_string(),
        Err(e) => {
            log::debug!("{e}");
            "Unknown".to_string()
        }
    }
}

/// Qualifier of the first `ECU`, else its localized name.
pub fn ecu_name<N: XmlNode>(root: &N) -> String {
    let Some(ecu) = root.find_descendant("ECU") else {
        return String::new();
    };
    match child_text(ecu, "QUAL") {
        Ok(Some(qual)) => return qual,
        Ok(None) => {}
        Err(e) => log::debug!("{e}"),
    }
    localized_name(ecu).unwrap_or_default()
}

/// `ECUDOC/@version`, else the root's `dtdvers`.
pub fn version<N: XmlNode>(root: &N) -> String {
    root.find_descendant("ECUDOC")
        .and_then(|doc| non_empty_attribute(doc, "version"))
        .or_else(|| non_empty_attribute(root, "dtdvers"))
        .unwrap_or_default()
}

fn non_empty_attribute<N: XmlNode>(node: &N, name: &str) -> Option<String> {
    match node.attribute(name) {
        Ok(v) => v.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()),
        Err(e) => {
            log::debug!("{e}");
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommParam {
    PhysicalRequestId,
    PhysicalResponseId,
    FunctionalRequestId,
    AddressingScheme,
    CanIdType,
    P2,
    P2Star,
    S3,
}

/// Qualifier or tag name (case-insensitive) -> parameter.
static COMM_PARAM_KEYS: [(&str, CommParam); 15] = [
    ("CanPhysReqId", CommParam::PhysicalRequestId),
    ("CanReqId", CommParam::PhysicalRequestId),
    ("CanRespUSDTId", CommParam::PhysicalResponseId),
    ("CanRespId", CommParam::PhysicalResponseId),
    ("CanFuncReqId", CommParam::FunctionalRequestId),
    ("AddressingMode", CommParam::AddressingScheme),
    ("CanAddressingMode", CommParam::AddressingScheme),
    ("CanIdType", CommParam::CanIdType),
    ("P2", CommParam::P2),
    ("P2Max", CommParam::P2),
    ("P2Star", CommParam::P2Star),
    ("P2Ex", CommParam::P2Star),
    ("P2StarMax", CommParam::P2Star),
    ("S3", CommParam::S3),
    ("S3Server", CommParam::S3),
];

fn comm_param_for(key: &str) -> Option<CommParam> {
    COMM_PARAM_KEYS
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, p)| *p)
}

/// Scan the whole tree for known parameter names. The first match of each
/// parameter wins; anything not found stays unset.
pub fn communication_params<N: XmlNode>(root: &N) -> CommunicationParams {
    let mut params = CommunicationParams::default();

    for node in root.descendants() {
        let key = match child_text(node, "QUAL") {
            Ok(Some(qual)) => qual,
            _ => node.name().to_string(),
        };
        let Some(param) = comm_param_for(&key) else {
            continue;
        };
        let slot = match param {
            CommParam::PhysicalRequestId => &mut params.physical_request_id,
            CommParam::PhysicalResponseId => &mut params.physical_response_id,
            CommParam::FunctionalRequestId => &mut params.functional_request_id,
            CommParam::AddressingScheme => &mut params.addressing_scheme,
            CommParam::CanIdType => &mut params.can_id_type,
            CommParam::P2 => &mut params.p2_timeout,
            CommParam::P2Star => &mut params.p2_star_timeout,
            CommParam::S3 => &mut params.s3_timeout,
        };
        if slot.is_some() {
            continue;
        }
        if let Some(value) = param_value(node) {
            log::debug!("communication parameter {key} = {value}");
            *slot = Some(value);
        }
    }
    params
}

fn param_value<N: XmlNode>(node: &N) -> Option<String> {
    if let Some(v) = non_empty_attribute(node, "v") {
        return Some(v);
    }
    node.text()
        .ok()
        .flatten()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Element;
    use pretty_assertions::assert_eq;

    fn parse(xml: &str) -> Element {
        Element::parse(xml).unwrap()
    }

    #[test]
    fn manufacturer_defaults() {
        assert_eq!(manufacturer(&parse("<CANDELA/>")), "");
        assert_eq!(manufacturer(&parse("<CANDELA><ECUDOC/></CANDELA>")), "Unknown");
        assert_eq!(
            manufacturer(&parse(r#"<CANDELA><ECUDOC manufacturer="ACME"/></CANDELA>"#)),
            "ACME"
        );
    }

    #[test]
    fn ecu_name_prefers_qualifier() {
        let root = parse("<C><ECU><NAME><TUV>Engine</TUV></NAME><QUAL>EMS</QUAL></ECU></C>");
        assert_eq!(ecu_name(&root), "EMS");
        let root = parse("<C><ECU><NAME><TUV>Engine</TUV></NAME></ECU></C>");
        assert_eq!(ecu_name(&root), "Engine");
        assert_eq!(ecu_name(&parse("<C/>")), "");
    }

    #[test]
    fn version_falls_back_to_dtd_version() {
        assert_eq!(version(&parse(r#"<C dtdvers="4.2"><ECUDOC version="1.3"/></C>"#)), "1.3");
        assert_eq!(version(&parse(r#"<C dtdvers="4.2"><ECUDOC/></C>"#)), "4.2");
        assert_eq!(version(&parse("<C/>")), "");
    }

    #[test]
    fn comm_params_by_qualifier_or_tag() {
        let root = parse(
            r#"<C>
                <PARAM v="0x7E0"><QUAL>CanPhysReqId</QUAL></PARAM>
                <PARAM v="0x7E8"><QUAL>CanRespUSDTId</QUAL></PARAM>
                <PARAM v="0x7E1"><QUAL>CanPhysReqId</QUAL></PARAM>
                <P2>50</P2>
                <S3 v="5000"/>
            </C>"#,
        );
        let params = communication_params(&root);
        assert_eq!(params.physical_request_id.as_deref(), Some("0x7E0"));
        assert_eq!(params.physical_response_id.as_deref(), Some("0x7E8"));
        assert_eq!(params.p2_timeout.as_deref(), Some("50"));
        assert_eq!(params.s3_timeout.as_deref(), Some("5000"));
        assert_eq!(params.functional_request_id, None);
    }

    #[test]
    fn no_comm_params_is_empty() {
        assert!(communication_params(&parse("<C><X/></C>")).is_empty());
    }
}
