//! `PROTOCOLSERVICE` -> Service, including its request/response layouts.

use diag_ir::uds::service_description;
use diag_ir::{Component, ComponentKind, Service, ServiceMessage, enrich_description};

use crate::error::{EntityKind, SkipLog, SkipReason, Skipped};
use crate::locator::{
    Fallback, PREFERRED_LANGUAGE, attribute_string, child_text, flag, locate_or, locate_text,
    localized_name, raw_id,
};
use crate::tree::XmlNode;

const GENERIC_DESCRIPTION: &str = "UDS diagnostic service";

/// Parse one `PROTOCOLSERVICE`. Skipped messages and components inside it
/// are recorded in `skipped`; the service itself survives them.
pub fn extract_service<N: XmlNode>(elem: &N, skipped: &mut SkipLog) -> Result<Service, Skipped> {
    read_service(elem, skipped).map_err(|reason| Skipped {
        entity: EntityKind::Service,
        id: raw_id(elem),
        reason,
    })
}

fn read_service<N: XmlNode>(elem: &N, skipped: &mut SkipLog) -> Result<Service, SkipReason> {
    let uds_service_id = service_id(elem);
    let name = localized_name(elem);

    let description = match locate_text(elem, "DESC/TUV", Fallback::None, Some(PREFERRED_LANGUAGE)) {
        Some(desc) => desc,
        None => match &name {
            Some(name) => enrich_description(name, uds_service_id),
            None => uds_service_id
                .and_then(service_description)
                .unwrap_or(GENERIC_DESCRIPTION)
                .to_string(),
        },
    };

    Ok(Service {
        id: attribute_string(elem, "id")?.unwrap_or_default(),
        name: name.unwrap_or_else(|| "Unknown Service".to_string()),
        qualifier: child_text(elem, "QUAL")?.unwrap_or_default(),
        description,
        uds_service_id,
        supports_functional_addressing: flag(elem, "func")?,
        supports_physical_addressing: flag(elem, "phys")?,
        supports_multiple_response: flag(elem, "mresp")?,
        responds_on_physical: flag(elem, "respOnPhys")?,
        responds_on_functional: flag(elem, "respOnFunc")?,
        request: message_slot(elem, "REQ", skipped),
        positive_response: message_slot(elem, "POS", skipped),
        negative_response: message_slot(elem, "NEG", skipped),
    })
}

/// UDS SID from the first constant component tagged `sid` anywhere in the
/// service. Unparseable literals leave it unset.
fn service_id<N: XmlNode>(elem: &N) -> Option<u8> {
    let sid_comp = elem
        .descendants_named(ComponentKind::Constant.tag())
        .find(|c| matches!(c.attribute("spec"), Ok(Some(spec)) if spec == "sid"))?;

    let raw = match sid_comp.attribute("v") {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            log::debug!("{e}");
            return None;
        }
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<u8>() {
        Ok(sid) => Some(sid),
        Err(_) => {
            log::debug!("service '{}': SID literal '{raw}' is not a byte", raw_id(elem));
            None
        }
    }
}

fn message_slot<N: XmlNode>(service: &N, tag: &str, skipped: &mut SkipLog) -> Option<ServiceMessage> {
    let elem = service.child(tag)?;
    match extract_message(elem, skipped) {
        Ok(msg) => Some(msg),
        Err(s) => {
            skipped.record(s);
            None
        }
    }
}

/// Parse a `REQ`, `POS` or `NEG` element.
///
/// Components are collected from anywhere below the message, kind by kind:
/// constants, then statics, then simple proxies.
pub fn extract_message<N: XmlNode>(
    elem: &N,
    skipped: &mut SkipLog,
) -> Result<ServiceMessage, Skipped> {
    let skip = |reason: SkipReason| Skipped {
        entity: EntityKind::Message,
        id: raw_id(elem),
        reason,
    };

    let id = attribute_string(elem, "id")
        .map_err(|e| skip(e.into()))?
        .unwrap_or_default();
    let qualifier = child_text(elem, "QUAL")
        .map_err(|e| skip(e.into()))?
        .unwrap_or_default();

    let mut components = Vec::new();
    for kind in ComponentKind::ALL {
        for comp in elem.descendants_named(kind.tag()) {
            match extract_component(comp, kind) {
                Ok(c) => components.push(c),
                Err(s) => skipped.record(s),
            }
        }
    }

    Ok(ServiceMessage {
        id,
        name: locate_or(elem, "NAME/TUV", Fallback::Anywhere, "Message"),
        qualifier,
        components,
    })
}

/// Parse a `CONSTCOMP`, `STATICCOMP` or `SIMPLEPROXYCOMP` element.
pub fn extract_component<N: XmlNode>(elem: &N, kind: ComponentKind) -> Result<Component, Skipped> {
    read_component(elem, kind).map_err(|reason| Skipped {
        entity: EntityKind::Component,
        id: raw_id(elem),
        reason,
    })
}

fn read_component<N: XmlNode>(elem: &N, kind: ComponentKind) -> Result<Component, SkipReason> {
    Ok(Component {
        id: attribute_string(elem, "id")?.unwrap_or_default(),
        name: locate_or(elem, "NAME/TUV", Fallback::Anywhere, "Component"),
        qualifier: child_text(elem, "QUAL")?.unwrap_or_default(),
        kind,
        mandatory: flag(elem, "must")?,
        spec: attribute_string(elem, "spec")?.unwrap_or_default(),
        bit_length: attribute_string(elem, "bl")?,
        literal_value: attribute_string(elem, "v")?,
        data_type_ref: attribute_string(elem, "dtref")?,
    })
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
    fn component_attributes_are_plain_reads() {
        let e = parse(
            r#"<CONSTCOMP id="c1" must="1" spec="sid" bl="8" v="34"><QUAL>SID</QUAL><NAME><TUV>Service Id</TUV></NAME></CONSTCOMP>"#,
        );
        let comp = extract_component(&e, ComponentKind::Constant).unwrap();
        assert_eq!(
            comp,
            Component {
                id: "c1".into(),
                name: "Service Id".into(),
                qualifier: "SID".into(),
                kind: ComponentKind::Constant,
                mandatory: true,
                spec: "sid".into(),
                bit_length: Some("8".into()),
                literal_value: Some("34".into()),
                data_type_ref: None,
            }
        );
    }

    #[test]
    fn component_defaults() {
        let comp = extract_component(&parse("<STATICCOMP/>"), ComponentKind::Static).unwrap();
        assert_eq!(comp.name, "Component");
        assert_eq!(comp.qualifier, "");
        assert!(!comp.mandatory);
        assert_eq!(comp.spec, "");
        assert_eq!(comp.bit_length, None);
    }

    #[test]
    fn undecodable_component_is_skipped_not_its_siblings() {
        let e = parse(
            r#"<REQ><CONSTCOMP id="a" spec="sid" v="16"/><STATICCOMP id="bad" spec="&nope;"/><SIMPLEPROXYCOMP id="c"/></REQ>"#,
        );
        let mut skipped = SkipLog::default();
        let msg = extract_message(&e, &mut skipped).unwrap();
        let ids: Vec<_> = msg.components.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
        assert_eq!(skipped.len(), 1);
        let entry = &skipped.into_inner()[0];
        assert_eq!(entry.entity, EntityKind::Component);
        assert_eq!(entry.id, "bad");
    }

    #[test]
    fn components_are_grouped_by_kind() {
        let e = parse(
            r#"<POS><SIMPLEPROXYCOMP id="p"/><STRUCT><STATICCOMP id="s"/><CONSTCOMP id="k"/></STRUCT></POS>"#,
        );
        let msg = extract_message(&e, &mut SkipLog::default()).unwrap();
        let ids: Vec<_> = msg.components.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["k", "s", "p"]);
    }

    #[test]
    fn sid_is_read_from_anywhere_in_the_service() {
        let e = parse(r#"<PROTOCOLSERVICE><X><CONSTCOMP spec="sid" v="62"/></X></PROTOCOLSERVICE>"#);
        assert_eq!(service_id(&e), Some(62));
    }

    #[test]
    fn out_of_range_sid_is_unset() {
        let e = parse(r#"<PROTOCOLSERVICE><REQ><CONSTCOMP spec="sid" v="300"/></REQ></PROTOCOLSERVICE>"#);
        assert_eq!(service_id(&e), None);
    }

    #[test]
    fn description_without_name_is_generic() {
        let e = parse(r#"<PROTOCOLSERVICE id="s"/>"#);
        let svc = extract_service(&e, &mut SkipLog::default()).unwrap();
        assert_eq!(svc.name, "Unknown Service");
        assert_eq!(svc.description, GENERIC_DESCRIPTION);
        assert!(svc.request.is_none());
    }

    #[test]
    fn nameless_service_uses_sid_description() {
        let e = parse(r#"<PROTOCOLSERVICE><REQ><CONSTCOMP spec="sid" v="62"/></REQ></PROTOCOLSERVICE>"#);
        let svc = extract_service(&e, &mut SkipLog::default()).unwrap();
        assert_eq!(svc.description, service_description(0x3E).unwrap());
    }

    #[test]
    fn explicit_description_is_kept() {
        let e = parse(
            r#"<PROTOCOLSERVICE><NAME><TUV>TesterPresent</TUV></NAME><DESC><TUV>Keep alive</TUV></DESC></PROTOCOLSERVICE>"#,
        );
        let svc = extract_service(&e, &mut SkipLog::default()).unwrap();
        assert_eq!(svc.description, "Keep alive");
    }

    #[test]
    fn undecodable_flag_skips_service() {
        let e = parse(r#"<PROTOCOLSERVICE id="s9" func="&x;"/>"#);
        let err = extract_service(&e, &mut SkipLog::default()).unwrap_err();
        assert_eq!(err.entity, EntityKind::Service);
        assert_eq!(err.id, "s9");
        assert!(matches!(err.reason, SkipReason::Undecodable(_)));
    }
}
