use anyhow::Result;
use diag_cdd::ParseReport;
use diag_ir::DiagnosticDocument;
use std::path::Path;

use crate::convert::parse_input;

pub fn run_info(input: &Path) -> Result<()> {
    let (doc, report) = parse_input(input)?;
    print!("{}", describe(input, &doc, &report));
    Ok(())
}

fn describe(input: &Path, doc: &DiagnosticDocument, report: &ParseReport) -> String {
    let mut lines = vec![
        format!("File:          {}", input.display()),
        format!("ECU:           {}", doc.ecu_name),
        format!("Manufacturer:  {}", doc.manufacturer),
        format!("Version:       {}", doc.version),
        format!("Services:      {}", report.services),
        format!("DIDs:          {}", report.dids),
        format!("Skipped:       {}", report.skipped.len()),
    ];

    if !doc.communication_params.is_empty() {
        lines.push("ComParams:".to_string());
        for (key, value) in doc.communication_params.entries() {
            lines.push(format!("  {key:<22} {value}"));
        }
    }
    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use diag_cdd::CddParser;

    #[test]
    fn describes_minimal_fixture() {
        let (doc, report) = CddParser::new()
            .parse_with_report(include_str!("../../test-fixtures/cdd/minimal.cdd"))
            .unwrap();
        let text = describe(Path::new("minimal.cdd"), &doc, &report);

        assert!(text.contains("ECU:           EMS_ECU"));
        assert!(text.contains("Manufacturer:  ACME Automotive"));
        assert!(text.contains("Services:      3"));
        assert!(text.contains("DIDs:          3"));
        assert!(text.contains("Skipped:       0"));
        assert!(text.contains("  physical_request_id    0x7E0"));
        assert!(text.contains("  s3_timeout             5000"));
        assert_eq!(text.lines().count(), 16);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn describes_skips_and_omits_empty_params() {
        let (doc, report) = CddParser::new()
            .parse_with_report(include_str!("../../test-fixtures/cdd/malformed.cdd"))
            .unwrap();
        let text = describe(Path::new("malformed.cdd"), &doc, &report);

        assert!(text.contains("Skipped:       7"));
        assert!(!text.contains("ComParams"));
    }
}
