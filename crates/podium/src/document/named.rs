use std::path::Path;

use anyhow::{Context, Result};
use lopdf::{Dictionary, Object};
use tracing::debug;

use super::NamedAction;

/// Rect slack, in points, when pairing a named link with a PDFium annotation.
const RECT_TOLERANCE: f32 = 0.5;

/// A `/Link` annotation whose action is `/S /Named`.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedLink {
    /// `[llx, lly, urx, ury]` in PDF space, normalized.
    pub rect: [f32; 4],
    pub action: NamedAction,
}

/// Named link actions of every page, indexed by page.
///
/// PDFium reports these actions as unsupported, so they are read straight
/// from the file's object tree.
pub fn scan(path: &Path) -> Result<Vec<Vec<NamedLink>>> {
    let doc = lopdf::Document::load(path)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let mut pages = Vec::new();
    for page_id in doc.get_pages().into_values() {
        let page = doc.get_object(page_id).and_then(Object::as_dict)?;
        let links = page_links(&doc, page);
        if !links.is_empty() {
            debug!(page = pages.len(), count = links.len(), "Named link actions");
        }
        pages.push(links);
    }
    Ok(pages)
}

fn page_links(doc: &lopdf::Document, page: &Dictionary) -> Vec<NamedLink> {
    let Ok(annots) = page.get(b"Annots") else {
        return Vec::new();
    };
    let Ok((_, Object::Array(annots))) = doc.dereference(annots) else {
        return Vec::new();
    };
    annots
        .iter()
        .filter_map(|annot| match doc.dereference(annot) {
            Ok((_, Object::Dictionary(dict))) => named_link(doc, dict),
            _ => None,
        })
        .collect()
}

fn named_link(doc: &lopdf::Document, annot: &Dictionary) -> Option<NamedLink> {
    if name(annot.get(b"Subtype").ok()?)? != b"Link" {
        return None;
    }
    let action = match doc.dereference(annot.get(b"A").ok()?) {
        Ok((_, Object::Dictionary(action))) => action,
        _ => return None,
    };
    if name(action.get(b"S").ok()?)? != b"Named" {
        return None;
    }
    let action_name = String::from_utf8_lossy(name(action.get(b"N").ok()?)?);
    let rect = match doc.dereference(annot.get(b"Rect").ok()?) {
        Ok((_, Object::Array(values))) if values.len() == 4 => values,
        _ => return None,
    };
    let mut coords = [0.0; 4];
    for (slot, value) in coords.iter_mut().zip(rect) {
        *slot = number(value)?;
    }
    Some(NamedLink {
        rect: normalize(coords),
        action: named_action(&action_name),
    })
}

fn name(object: &Object) -> Option<&[u8]> {
    match object {
        Object::Name(name) => Some(name.as_slice()),
        _ => None,
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

fn normalize([x0, y0, x1, y1]: [f32; 4]) -> [f32; 4] {
    [x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)]
}

pub fn named_action(name: &str) -> NamedAction {
    match name {
        "NextPage" => NamedAction::NextPage,
        "PrevPage" => NamedAction::PrevPage,
        "FirstPage" => NamedAction::FirstPage,
        "LastPage" => NamedAction::LastPage,
        "GoBack" => NamedAction::GoBack,
        "GoForward" => NamedAction::GoForward,
        other => NamedAction::Other(other.to_string()),
    }
}

/// The named action of the link covering `rect` (PDF space), if any.
pub fn find(links: &[NamedLink], rect: [f32; 4]) -> Option<NamedAction> {
    let rect = normalize(rect);
    links
        .iter()
        .find(|link| {
            link.rect
                .iter()
                .zip(rect)
                .all(|(a, b)| (a - b).abs() <= RECT_TOLERANCE)
        })
        .map(|link| link.action.clone())
}
