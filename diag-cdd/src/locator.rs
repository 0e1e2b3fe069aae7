//! Tolerant text lookup over inconsistently nested CDD exports.
//!
//! Vendor files place localized `TUV` text at varying depths and do not
//! always tag a language, so lookups try an exact path first and then scan.

use crate::error::NodeError;
use crate::tree::XmlNode;

pub const PREFERRED_LANGUAGE: &str = "en-US";

/// Where to look when the exact path yields nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Exact path only.
    None,
    /// Any descendant carrying the path's leaf tag.
    Anywhere,
    /// Leaf-tag descendants of elements named like the path's first segment.
    Within,
}

/// Best text for `path` under `container`, or `None` when nothing usable exists.
///
/// Never fails: undecodable or empty matches are treated as absent.
pub fn locate_text<N: XmlNode>(
    container: &N,
    path: &str,
    fallback: Fallback,
    lang: Option<&str>,
) -> Option<String> {
    if let Some(text) = pick(&container.select_path(path), lang) {
        return Some(text);
    }

    let leaf = path.rsplit('/').next().unwrap_or(path);
    let candidates: Vec<&N> = match fallback {
        Fallback::None => return None,
        Fallback::Anywhere => container.descendants_named(leaf).collect(),
        Fallback::Within => {
            let scope = path.split('/').next().unwrap_or(path);
            container
                .descendants_named(scope)
                .flat_map(|s| s.descendants_named(leaf))
                .collect()
        }
    };
    pick(&candidates, lang)
}

/// [`locate_text`] with the preferred language and a default label.
pub fn locate_or<N: XmlNode>(container: &N, path: &str, fallback: Fallback, default: &str) -> String {
    locate_text(container, path, fallback, Some(PREFERRED_LANGUAGE))
        .unwrap_or_else(|| default.to_string())
}

/// Localized name (`NAME/TUV`, then any `TUV`).
pub fn localized_name<N: XmlNode>(container: &N) -> Option<String> {
    locate_text(container, "NAME/TUV", Fallback::Anywhere, Some(PREFERRED_LANGUAGE))
}

fn pick<N: XmlNode>(candidates: &[&N], lang: Option<&str>) -> Option<String> {
    let texts: Vec<(&N, String)> = candidates
        .iter()
        .filter_map(|n| usable_text(*n).map(|t| (*n, t)))
        .collect();

    if let Some(lang) = lang {
        let tagged = texts.iter().find(|(n, _)| {
            n.attribute("lang")
                .ok()
                .flatten()
                .is_some_and(|l| l == lang)
        });
        if let Some((_, text)) = tagged {
            return Some(text.clone());
        }
    }
    texts.into_iter().next().map(|(_, t)| t)
}

fn usable_text<N: XmlNode>(node: &N) -> Option<String> {
    let text = node.text().ok().flatten()?;
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Text of a direct child, e.g. `QUAL`. Decoding failures propagate.
pub fn child_text<N: XmlNode>(node: &N, name: &str) -> Result<Option<String>, NodeError> {
    let Some(child) = node.child(name) else {
        return Ok(None);
    };
    Ok(child
        .text()?
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty()))
}

/// Attribute as an owned string; empty values count as absent.
pub fn attribute_string<N: XmlNode>(node: &N, name: &str) -> Result<Option<String>, NodeError> {
    Ok(node
        .attribute(name)?
        .map(|v| v.into_owned())
        .filter(|v| !v.is_empty()))
}

/// `"1"` flags as used by CDD (`must`, `func`, `phys`, ...).
pub fn flag<N: XmlNode>(node: &N, name: &str) -> Result<bool, NodeError> {
    Ok(node.attribute(name)?.as_deref() == Some("1"))
}

/// Source `id` attribute for diagnostics; never fails.
pub fn raw_id<N: XmlNode>(node: &N) -> String {
    node.attribute("id")
        .ok()
        .flatten()
        .map(|v| v.into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Element;

    fn parse(xml: &str) -> Element {
        Element::parse(xml).unwrap()
    }

    #[test]
    fn exact_path_wins() {
        let e = parse("<S><NAME><TUV>Exact</TUV></NAME><X><TUV>Deep</TUV></X></S>");
        assert_eq!(localized_name(&e).as_deref(), Some("Exact"));
    }

    #[test]
    fn falls_back_to_any_depth() {
        let e = parse("<S><X><Y><TUV>Deep</TUV></Y></X></S>");
        assert_eq!(localized_name(&e).as_deref(), Some("Deep"));
    }

    #[test]
    fn prefers_en_us_over_document_order() {
        let e = parse(
            r#"<S><NAME><TUV xml:lang="de-DE">Lesen</TUV><TUV xml:lang="en-US">Read</TUV></NAME></S>"#,
        );
        assert_eq!(localized_name(&e).as_deref(), Some("Read"));
    }

    #[test]
    fn takes_first_without_language_match() {
        let e = parse(r#"<S><X><TUV xml:lang="de-DE">Eins</TUV></X><TUV>Zwei</TUV></S>"#);
        assert_eq!(localized_name(&e).as_deref(), Some("Eins"));
    }

    #[test]
    fn empty_match_does_not_block_fallback() {
        let e = parse("<S><NAME><TUV/></NAME><X><TUV>Deep</TUV></X></S>");
        assert_eq!(localized_name(&e).as_deref(), Some("Deep"));
    }

    #[test]
    fn undecodable_match_degrades_to_default() {
        let e = parse("<S><NAME><TUV>&nope;</TUV></NAME></S>");
        assert_eq!(locate_or(&e, "NAME/TUV", Fallback::Anywhere, "Unknown"), "Unknown");
    }

    #[test]
    fn no_fallback_means_exact_only() {
        let e = parse("<S><X><TUV>Deep</TUV></X></S>");
        assert_eq!(locate_text(&e, "DESC/TUV", Fallback::None, None), None);
    }

    #[test]
    fn within_fallback_stays_in_scope() {
        let e = parse("<D><NAME><TUV>Name</TUV></NAME><DESC><P><TUV>Described</TUV></P></DESC></D>");
        assert_eq!(
            locate_text(&e, "DESC/TUV", Fallback::Within, None).as_deref(),
            Some("Described")
        );

        let no_desc = parse("<D><NAME><TUV>Name</TUV></NAME></D>");
        assert_eq!(locate_text(&no_desc, "DESC/TUV", Fallback::Within, None), None);
    }

    #[test]
    fn child_text_propagates_decode_errors() {
        let e = parse("<S><QUAL>&nope;</QUAL></S>");
        assert!(child_text(&e, "QUAL").is_err());
        let ok = parse("<S><QUAL> Q1 </QUAL></S>");
        assert_eq!(child_text(&ok, "QUAL").unwrap().as_deref(), Some("Q1"));
    }

    #[test]
    fn flags_compare_against_one() {
        let e = parse(r#"<S func="1" phys="0" mresp="true"/>"#);
        assert!(flag(&e, "func").unwrap());
        assert!(!flag(&e, "phys").unwrap());
        assert!(!flag(&e, "mresp").unwrap());
        assert!(!flag(&e, "respOnPhys").unwrap());
    }
}
