//! `DID` -> Did with its `STRUCTURE` data objects.

use diag_ir::{DataObject, Did};

use crate::error::{EntityKind, SkipLog, SkipReason, Skipped};
use crate::locator::{Fallback, PREFERRED_LANGUAGE, attribute_string, child_text, locate_or, locate_text, raw_id};
use crate::tree::XmlNode;

/// Parse one `DID`. Data objects that fail are recorded in `skipped` and the
/// DID keeps the rest.
pub fn extract_did<N: XmlNode>(elem: &N, skipped: &mut SkipLog) -> Result<Did, Skipped> {
    read_did(elem, skipped).map_err(|reason| Skipped {
        entity: EntityKind::Did,
        id: raw_id(elem),
        reason,
    })
}

fn read_did<N: XmlNode>(elem: &N, skipped: &mut SkipLog) -> Result<Did, SkipReason> {
    let number = did_number(elem)?;
    let mut did = Did::new(attribute_string(elem, "id")?.unwrap_or_default(), number);

    if let Some(name) = locate_text(elem, "NAME/TUV", Fallback::Anywhere, Some(PREFERRED_LANGUAGE)) {
        did.name = name;
    }
    did.qualifier = child_text(elem, "QUAL")?.unwrap_or_else(|| did.name.clone());
    did.description =
        locate_text(elem, "DESC/TUV", Fallback::Within, Some(PREFERRED_LANGUAGE)).unwrap_or_default();

    // Only the DID's own structure; sibling DIDs must not leak in.
    if let Some(structure) = elem.child("STRUCTURE") {
        for obj in structure.descendants_named("DATAOBJ") {
            match extract_data_object(obj) {
                Ok(o) => did.data_objects.push(o),
                Err(s) => skipped.record(s),
            }
        }
    }
    Ok(did)
}

/// Decimal `n` attribute; absent means 0.
fn did_number<N: XmlNode>(elem: &N) -> Result<u16, SkipReason> {
    let Some(raw) = elem.attribute("n")? else {
        return Ok(0);
    };
    raw.trim().parse().map_err(|_| SkipReason::InvalidNumber {
        attribute: "n",
        value: raw.into_owned(),
    })
}

/// Parse one `DATAOBJ` below a DID structure.
pub fn extract_data_object<N: XmlNode>(elem: &N) -> Result<DataObject, Skipped> {
    read_data_object(elem).map_err(|reason| Skipped {
        entity: EntityKind::DataObject,
        id: raw_id(elem),
        reason,
    })
}

fn read_data_object<N: XmlNode>(elem: &N) -> Result<DataObject, SkipReason> {
    let name = locate_or(elem, "NAME/TUV", Fallback::Anywhere, "DataObject");
    Ok(DataObject {
        id: attribute_string(elem, "id")?.unwrap_or_default(),
        qualifier: child_text(elem, "QUAL")?.unwrap_or_else(|| name.clone()),
        name,
        data_type_ref: attribute_string(elem, "dtref")?.unwrap_or_default(),
        spec: attribute_string(elem, "spec")?.unwrap_or_default(),
    })
}
