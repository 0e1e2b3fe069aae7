use diag_cdd::{CddParser, EntityKind, SkipReason, parse_cdd};
use diag_ir::uds::service_description;
use diag_ir::{ComponentKind, DiagnosticDocument};
use pretty_assertions::assert_eq;

const MINIMAL: &str = include_str!("../../test-fixtures/cdd/minimal.cdd");
const MALFORMED: &str = include_str!("../../test-fixtures/cdd/malformed.cdd");

fn parse_minimal() -> DiagnosticDocument {
    parse_cdd(MINIMAL).expect("Failed to parse minimal CDD")
}

#[test]
fn test_document_metadata() {
    let doc = parse_minimal();
    assert_eq!(doc.manufacturer, "ACME Automotive");
    assert_eq!(doc.ecu_name, "EMS_ECU");
    assert_eq!(doc.version, "2.1");
}

#[test]
fn test_communication_params() {
    let params = parse_minimal().communication_params;
    let entries: Vec<_> = params.entries().collect();
    assert_eq!(
        entries,
        vec![
            ("physical_request_id", "0x7E0"),
            ("physical_response_id", "0x7E8"),
            ("functional_request_id", "0x7DF"),
            ("addressing_scheme", "normal"),
            ("can_id_type", "11bit"),
            ("p2_timeout", "50"),
            ("p2_star_timeout", "5000"),
            ("s3_timeout", "5000"),
        ]
    );
}

#[test]
fn test_dids_in_document_order() {
    let doc = parse_minimal();
    let hex: Vec<_> = doc.dids.iter().map(|d| d.number_hex()).collect();
    assert_eq!(hex, ["0xF190", "0xF187", "0xFE90"]);
}

#[test]
fn test_did_number_hex_matches_number() {
    for did in parse_minimal().dids {
        assert_eq!(did.number_hex(), format!("0x{:04X}", did.number()));
    }
}

#[test]
fn test_did_fields() {
    let doc = parse_minimal();
    let vin = &doc.dids[0];
    assert_eq!(vin.id, "_did_vin");
    assert_eq!(vin.name, "Vehicle Identification Number");
    assert_eq!(vin.qualifier, "VIN");
    assert_eq!(vin.description, "17 character VIN as stored by the ECU");
    assert_eq!(vin.data_objects.len(), 1);
    assert_eq!(vin.data_objects[0].name, "VIN Characters");
    assert_eq!(vin.data_objects[0].qualifier, "VinChars");
    assert_eq!(vin.data_objects[0].data_type_ref, "_dt_ascii17");
}

#[test]
fn test_prefixed_did_with_localized_name() {
    let doc = parse_minimal();
    let sw = &doc.dids[1];
    assert_eq!(sw.name, "Software Version");
    assert_eq!(sw.qualifier, "Software Version");
    assert_eq!(sw.description, "Major & minor software version");
    let quals: Vec<_> = sw.data_objects.iter().map(|o| o.qualifier.as_str()).collect();
    assert_eq!(quals, ["Major", "Minor"]);
}

#[test]
fn test_did_without_name_uses_hex() {
    let doc = parse_minimal();
    let cal = &doc.dids[2];
    assert_eq!(cal.number_hex(), "0xFE90");
    assert_eq!(cal.name, "DID_0xFE90");
    assert_eq!(cal.qualifier, "CalibrationBlock");
    assert_eq!(cal.description, "");
}

#[test]
fn test_services_in_document_order() {
    let doc = parse_minimal();
    let quals: Vec<_> = doc.services.iter().map(|s| s.qualifier.as_str()).collect();
    assert_eq!(quals, ["DiagnosticSessionControl", "ReadVIN", "TesterPresent"]);
    let sids: Vec<_> = doc.services.iter().map(|s| s.uds_service_id).collect();
    assert_eq!(sids, [Some(0x10), Some(0x22), Some(0x3E)]);
}

#[test]
fn test_session_control_flags_and_messages() {
    let doc = parse_minimal();
    let dsc = &doc.services[0];
    assert!(dsc.supports_functional_addressing);
    assert!(dsc.supports_physical_addressing);
    assert!(!dsc.supports_multiple_response);
    assert!(dsc.responds_on_physical);
    assert!(dsc.responds_on_functional);

    let req = dsc.request.as_ref().unwrap();
    assert_eq!(req.id, "_req_dsc");
    assert_eq!(req.name, "Request");
    let kinds: Vec<_> = req.components.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, [ComponentKind::Constant, ComponentKind::Static]);
    assert_eq!(dsc.positive_response.as_ref().unwrap().name, "Message");
    assert_eq!(dsc.negative_response.as_ref().unwrap().components.len(), 1);
}

#[test]
fn test_missing_description_is_enriched() {
    let doc = parse_minimal();
    assert_eq!(doc.services[0].description, service_description(0x10).unwrap());
    assert_eq!(doc.services[2].description, service_description(0x3E).unwrap());
}

#[test]
fn test_explicit_description_prefers_en_us() {
    let doc = parse_minimal();
    assert_eq!(doc.services[1].description, "Reads the vehicle identification number");
    assert_eq!(doc.services[1].name, "Read VIN");
}

#[test]
fn test_constant_components_come_first() {
    let doc = parse_minimal();
    let req = doc.services[1].request.as_ref().unwrap();
    let ids: Vec<_> = req.components.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["_c_rdbi_sid", "_c_rdbi_did", "_p_rdbi_opt"]);
    assert_eq!(req.components[0].spec, "sid");
    assert_eq!(req.components[1].literal_value.as_deref(), Some("0xF190"));
    assert_eq!(req.components[1].bit_length.as_deref(), Some("16"));
}

#[test]
fn test_service_without_responses_is_kept() {
    let doc = parse_minimal();
    let tp = &doc.services[2];
    assert!(tp.supports_multiple_response);
    assert!(tp.request.is_some());
    assert!(tp.positive_response.is_none());
    assert!(tp.negative_response.is_none());
}

#[test]
fn test_parse_is_idempotent() {
    assert_eq!(parse_minimal(), parse_minimal());
}

#[test]
fn test_parse_report_counts() {
    let (_, report) = CddParser::new().parse_with_report(MINIMAL).unwrap();
    assert_eq!(report.services, 3);
    assert_eq!(report.dids, 3);
    assert!(report.skipped.is_empty());
}

#[test]
fn test_sid_on_request_only_component() {
    let xml = r#"<CANDELA><PROTOCOLSERVICES><PROTOCOLSERVICE>
        <REQ><CONSTCOMP spec="sid" v="16"/></REQ>
    </PROTOCOLSERVICE></PROTOCOLSERVICES></CANDELA>"#;
    let doc = parse_cdd(xml).unwrap();
    assert_eq!(doc.services[0].uds_service_id, Some(16));
}

// --- malformed input ---

#[test]
fn test_malformed_keeps_valid_dids() {
    let doc = parse_cdd(MALFORMED).unwrap();
    let ids: Vec<_> = doc.dids.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["_did_ok", "_did_last"]);
    assert_eq!(doc.dids[0].data_objects.len(), 1);
    assert_eq!(doc.dids[1].name, "DID_0x0201");
}

#[test]
fn test_malformed_keeps_degraded_services() {
    let doc = parse_cdd(MALFORMED).unwrap();
    let ids: Vec<_> = doc.services.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["_ps_badsid", "_ps_badcomp", ""]);

    let bad_sid = &doc.services[0];
    assert_eq!(bad_sid.uds_service_id, None);
    assert_eq!(bad_sid.name, "RoutineControl");
    assert_eq!(bad_sid.description, service_description(0x31).unwrap());
    assert!(bad_sid.supports_physical_addressing);

    let bad_comp = &doc.services[1];
    assert_eq!(bad_comp.uds_service_id, Some(0x2E));
    assert_eq!(bad_comp.name, "Unknown Service");
    assert_eq!(bad_comp.request.as_ref().unwrap().components.len(), 1);
    assert!(bad_comp.positive_response.is_none());

    let empty = &doc.services[2];
    assert_eq!(empty.name, "Unknown Service");
    assert_eq!(empty.description, "UDS diagnostic service");
}

#[test]
fn test_malformed_skip_report() {
    let (_, report) = CddParser::new().parse_with_report(MALFORMED).unwrap();
    let skipped: Vec<_> = report
        .skipped
        .iter()
        .map(|s| (s.entity, s.id.as_str()))
        .collect();
    assert_eq!(
        skipped,
        vec![
            (EntityKind::DataObject, "_do_unit"),
            (EntityKind::Did, "_did_badnum"),
            (EntityKind::Did, "_did_toolarge"),
            (EntityKind::Did, "_did_badqual"),
            (EntityKind::Service, "_ps_badflag"),
            (EntityKind::Component, "_s_bad"),
            (EntityKind::Message, ""),
        ]
    );
    assert!(matches!(
        &report.skipped[1].reason,
        SkipReason::InvalidNumber { attribute: "n", value } if value == "0xF190"
    ));
}

#[test]
fn test_malformed_metadata_defaults() {
    let doc = parse_cdd(MALFORMED).unwrap();
    assert_eq!(doc.manufacturer, "Unknown");
    assert_eq!(doc.ecu_name, "Broken Body Controller");
    assert_eq!(doc.version, "4.2");
    assert!(doc.communication_params.is_empty());
}

#[test]
fn test_structural_failure_is_fatal() {
    assert!(parse_cdd("<CANDELA><DIDS></CANDELA>").is_err());
    assert!(parse_cdd("").is_err());
}
