//! SVG element registry for web builds

use std::collections::BTreeMap;

use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

use super::{RenderSink, Transform};
use crate::sim::{BodyId, HEART_PATH, HEART_VIEWBOX};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// One absolutely positioned `<svg>` per live token inside `container`
pub struct DomSink {
    document: Document,
    container: Element,
    elements: BTreeMap<BodyId, Element>,
    class_name: String,
}

impl DomSink {
    pub fn new(document: Document, container: Element, class_name: &str) -> Self {
        Self {
            document,
            container,
            elements: BTreeMap::new(),
            class_name: class_name.to_string(),
        }
    }

    fn create(&self, id: BodyId) -> Result<Element, JsValue> {
        let svg = self.document.create_element_ns(Some(SVG_NS), "svg")?;
        svg.set_attribute("class", &self.class_name)?;
        svg.set_attribute("data-token", &id.0.to_string())?;
        svg.set_attribute(
            "viewBox",
            &format!("0 0 {} {}", HEART_VIEWBOX, HEART_VIEWBOX),
        )?;
        svg.set_attribute("aria-hidden", "true")?;

        let path = self.document.create_element_ns(Some(SVG_NS), "path")?;
        path.set_attribute("d", HEART_PATH)?;
        path.set_attribute("fill", "currentColor")?;
        svg.append_child(&path)?;

        self.container.append_child(&svg)?;
        Ok(svg)
    }

    /// Remove every element (used on teardown)
    pub fn detach_all(&mut self) {
        for (_, el) in std::mem::take(&mut self.elements) {
            el.remove();
        }
    }
}

impl RenderSink for DomSink {
    fn sync_ids(&mut self, ids: &[BodyId]) {
        let stale: Vec<BodyId> = self
            .elements
            .keys()
            .filter(|id| !ids.contains(*id))
            .copied()
            .collect();
        for id in stale {
            if let Some(el) = self.elements.remove(&id) {
                el.remove();
            }
        }

        for &id in ids {
            if self.elements.contains_key(&id) {
                continue;
            }
            match self.create(id) {
                Ok(el) => {
                    self.elements.insert(id, el);
                }
                Err(e) => log::warn!("Failed to create element for token {}: {:?}", id, e),
            }
        }
    }

    fn apply(&mut self, id: BodyId, transform: &Transform) {
        // Missing element: token was removed between frames
        let Some(el) = self.elements.get(&id) else {
            return;
        };
        let style = format!(
            "position:absolute;left:0;top:0;width:{}px;height:{}px;transform:{};visibility:{}",
            transform.width,
            transform.height,
            transform.css(),
            if transform.visible { "visible" } else { "hidden" },
        );
        let _ = el.set_attribute("style", &style);
    }
}
