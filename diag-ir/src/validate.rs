use crate::types::DiagnosticDocument;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("duplicate DID {0} in '{1}'")]
    DuplicateDid(String, String),
    #[error("duplicate service qualifier '{0}' in '{1}'")]
    DuplicateServiceQualifier(String, String),
    #[error("service '{0}' has no UDS service id")]
    MissingServiceId(String),
    #[error("service '{0}' has no request")]
    MissingRequest(String),
    #[error("empty ECU name")]
    EmptyEcuName,
}

/// Validate a DiagnosticDocument for structural consistency.
pub fn validate_document(doc: &DiagnosticDocument) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if doc.ecu_name.is_empty() && (!doc.services.is_empty() || !doc.dids.is_empty()) {
        errors.push(ValidationError::EmptyEcuName);
    }

    let mut qualifiers = HashSet::new();
    for svc in &doc.services {
        let label = if svc.qualifier.is_empty() {
            &svc.name
        } else {
            &svc.qualifier
        };

        if !svc.qualifier.is_empty() && !qualifiers.insert(svc.qualifier.as_str()) {
            errors.push(ValidationError::DuplicateServiceQualifier(
                svc.qualifier.clone(),
                doc.ecu_name.clone(),
            ));
        }
        if svc.uds_service_id.is_none() {
            errors.push(ValidationError::MissingServiceId(label.clone()));
        }
        if svc.request.is_none() {
            errors.push(ValidationError::MissingRequest(label.clone()));
        }
    }

    // Unlike services, DIDs are keyed by number, not qualifier
    let mut numbers = HashSet::new();
    for did in &doc.dids {
        if !numbers.insert(did.number()) {
            errors.push(ValidationError::DuplicateDid(
                did.number_hex().to_string(),
                doc.ecu_name.clone(),
            ));
        }
    }

    if doc.services.is_empty() && doc.dids.is_empty() {
        log::warn!("document '{}' has no services and no DIDs", doc.ecu_name);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
