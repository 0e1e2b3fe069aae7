//! CDD parser: XML text -> DiagnosticDocument.
//!
//! Runs in one pass:
//! 1. DOCTYPE removal and tree construction (tree)
//! 2. Document metadata and communication parameters (metadata)
//! 3. DIDs (did_extractor)
//! 4. Protocol services (service_extractor)

use std::path::Path;

use diag_ir::DiagnosticDocument;

use crate::did_extractor::extract_did;
use crate::error::{CddParseError, SkipLog, Skipped};
use crate::metadata;
use crate::service_extractor::extract_service;
use crate::tree::{Element, XmlNode, strip_doctype};

/// Outcome of one parse beyond the document itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseReport {
    pub services: usize,
    pub dids: usize,
    pub skipped: Vec<Skipped>,
}

/// Single-use document assembler. Parsing consumes it.
#[derive(Debug, Default)]
pub struct CddParser {
    document: DiagnosticDocument,
    skipped: SkipLog,
}

impl CddParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(self, xml: &str) -> Result<DiagnosticDocument, CddParseError> {
        self.parse_with_report(xml).map(|(doc, _)| doc)
    }

    /// Read a CDD file fully, then parse it with a report.
    pub fn parse_file(
        self,
        path: &Path,
    ) -> Result<(DiagnosticDocument, ParseReport), CddParseError> {
        let xml = std::fs::read_to_string(path).map_err(|source| CddParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_with_report(&xml)
    }

    /// Parse and also return counts and every skipped entity.
    pub fn parse_with_report(
        mut self,
        xml: &str,
    ) -> Result<(DiagnosticDocument, ParseReport), CddParseError> {
        let root = Element::parse(&strip_doctype(xml))?;

        self.extract_document_info(&root);
        self.extract_dids(&root);
        self.extract_services(&root);

        let report = ParseReport {
            services: self.document.services.len(),
            dids: self.document.dids.len(),
            skipped: self.skipped.into_inner(),
        };
        log::info!(
            "extracted {} services and {} DIDs ({} skipped)",
            report.services,
            report.dids,
            report.skipped.len()
        );
        Ok((self.document, report))
    }

    fn extract_document_info(&mut self, root: &Element) {
        self.document.manufacturer = metadata::manufacturer(root);
        self.document.ecu_name = metadata::ecu_name(root);
        self.document.version = metadata::version(root);
        self.document.communication_params = metadata::communication_params(root);
    }

    fn extract_dids(&mut self, root: &Element) {
        let Some(section) = root.find_descendant("DIDS") else {
            log::warn!("no DIDS section found");
            return;
        };
        for elem in section.children().filter(|c| c.name() == "DID") {
            match extract_did(elem, &mut self.skipped) {
                Ok(did) => self.document.dids.push(did),
                Err(s) => self.skipped.record(s),
            }
        }
        log::debug!("extracted {} DIDs", self.document.dids.len());
    }

    fn extract_services(&mut self, root: &Element) {
        let Some(section) = root.find_descendant("PROTOCOLSERVICES") else {
            log::warn!("no PROTOCOLSERVICES section found");
            return;
        };
        for elem in section.children().filter(|c| c.name() == "PROTOCOLSERVICE") {
            match extract_service(elem, &mut self.skipped) {
                Ok(svc) => self.document.services.push(svc),
                Err(s) => self.skipped.record(s),
            }
        }
        log::debug!("extracted {} services", self.document.services.len());
    }
}

/// Parse CDD text into a DiagnosticDocument.
pub fn parse_cdd(xml: &str) -> Result<DiagnosticDocument, CddParseError> {
    CddParser::new().parse(xml)
}

/// Read a CDD file fully and parse it.
pub fn parse_cdd_file(path: &Path) -> Result<DiagnosticDocument, CddParseError> {
    CddParser::new().parse_file(path).map(|(doc, _)| doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_are_empty_not_fatal() {
        let doc = parse_cdd("<CANDELA><ECUDOC/></CANDELA>").unwrap();
        assert!(doc.services.is_empty());
        assert!(doc.dids.is_empty());
        assert_eq!(doc.manufacturer, "Unknown");
    }

    #[test]
    fn only_direct_dids_of_first_section() {
        let xml = r#"<C>
            <DIDS><DID n="1"/><GROUP><DID n="2"/></GROUP><DID n="3"/></DIDS>
            <DIDS><DID n="4"/></DIDS>
        </C>"#;
        let doc = parse_cdd(xml).unwrap();
        let numbers: Vec<_> = doc.dids.iter().map(|d| d.number()).collect();
        assert_eq!(numbers, [1, 3]);
    }

    #[test]
    fn report_counts_skips() {
        let xml = r#"<C><DIDS><DID id="ok" n="1"/><DID id="bad" n="x"/></DIDS></C>"#;
        let (doc, report) = CddParser::new().parse_with_report(xml).unwrap();
        assert_eq!(doc.dids.len(), 1);
        assert_eq!(report.dids, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].id, "bad");
    }

    #[test]
    fn malformed_xml_is_fatal() {
        assert!(parse_cdd("<C><DIDS></C>").is_err());
    }

    #[test]
    fn parse_file_returns_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ecu.cdd");
        std::fs::write(
            &path,
            r#"<CANDELA><DIDS><DID id="_d" n="61840"><NAME><TUV>VIN</TUV></NAME></DID></DIDS></CANDELA>"#,
        )
        .unwrap();

        let (doc, report) = CddParser::new().parse_file(&path).unwrap();
        assert_eq!(report.dids, 1);
        assert_eq!(report.services, 0);
        assert_eq!(doc.dids[0].number_hex(), "0xF190");
        assert_eq!(parse_cdd_file(&path).unwrap(), doc);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = parse_cdd_file(Path::new("/nonexistent/file.cdd")).unwrap_err();
        assert!(matches!(err, CddParseError::Io { .. }));
    }
}
