//! Maven project descriptor lookup.

use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;

use crate::ScmResult;

fn namespace_of(resolved: &ResolveResult<'_>) -> Option<Vec<u8>> {
    match resolved {
        ResolveResult::Bound(ns) => Some(ns.0.to_vec()),
        _ => None,
    }
}

/// Returns the `version` declared directly under the root `project` element.
///
/// The element must live in the root element's namespace, so a parent's
/// `<parent><version>` or a foreign-namespace `version` is never picked up.
///
/// # Errors
///
/// Returns an error if the document is not well-formed XML.
pub fn project_version(xml: &str) -> ScmResult<Option<String>> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut root_ns = None;
    let mut in_version = false;

    loop {
        match reader.read_resolved_event()? {
            (resolved, Event::Start(start)) => {
                depth += 1;
                let ns = namespace_of(&resolved);
                if depth == 1 {
                    root_ns = ns;
                } else if depth == 2 && start.local_name().as_ref() == b"version" && ns == root_ns
                {
                    in_version = true;
                }
            }
            (_, Event::Text(text)) if in_version => {
                return Ok(Some(text.unescape()?.trim().to_string()));
            }
            (_, Event::End(_)) => {
                depth = depth.saturating_sub(1);
                in_version = false;
            }
            (_, Event::Eof) => return Ok(None),
            _ => {}
        }
    }
}
