//! JSON handoff of an area tree to a renderer.

use serde_json::{Map, Value, json};

use crate::area::{Area, AreaKind, LineArea};
use crate::geometry::{ReferenceRectangle, physical_extent};
use crate::tree::{AreaId, AreaTree};

impl AreaTree {
    /// The tree under the root as JSON, `null` without a root.
    #[must_use]
    pub fn to_json(&self) -> Value {
        self.root().map_or(Value::Null, |r| self.area_to_json(r))
    }

    /// The subtree under `id` as JSON, `null` for an unknown id.
    #[must_use]
    pub fn area_to_json(&self, id: AreaId) -> Value {
        let Ok(area) = self.get(id) else {
            return Value::Null;
        };
        let mut obj = Map::new();
        let _ = obj.insert("kind".to_string(), json!(area.kind.name()));
        if let Some(element) = area.element {
            let _ = obj.insert("element".to_string(), json!(element.0));
        }
        let _ = obj.insert(
            "geometry".to_string(),
            serde_json::to_value(&area.geometry).unwrap_or(Value::Null),
        );
        let extent = self
            .extent(id, ReferenceRectangle::Allocation)
            .unwrap_or_else(|_| physical_extent(area.geometry.writing_mode, area.ipd(), area.bpd()));
        let _ = obj.insert("extent".to_string(), json!({ "width": extent.width, "height": extent.height }));
        kind_to_json(area, &mut obj);

        let children = self.children(id);
        if !children.is_empty() {
            let children: Vec<Value> = children.iter().map(|&c| self.area_to_json(c)).collect();
            let _ = obj.insert("children".to_string(), Value::Array(children));
        }
        Value::Object(obj)
    }
}

fn line_to_json(line: &LineArea, obj: &mut Map<String, Value>) {
    let _ = obj.insert("number".to_string(), json!(line.number));
    let _ = obj.insert("alignment".to_string(), json!(line.alignment.to_string()));
    let _ = obj.insert("color".to_string(), json!(line.color.to_hex_string()));
    if let Some(font) = &line.font {
        let _ = obj.insert("font".to_string(), json!(font.key().to_string()));
    }
    if line.embedding {
        let _ = obj.insert("embedding".to_string(), json!(true));
    }
    let _ = obj.insert(
        "reserve".to_string(),
        json!({ "before": line.before_reserve, "after": line.after_reserve }),
    );
}

fn kind_to_json(area: &Area, obj: &mut Map<String, Value>) {
    match &area.kind {
        AreaKind::PositionedBlock { origin, .. } => {
            let _ = obj.insert("origin".to_string(), json!({ "x": origin.x, "y": origin.y }));
        }
        AreaKind::Line(line) => line_to_json(line, obj),
        AreaKind::Annotation(annotation) => {
            line_to_json(&annotation.line, obj);
            let _ = obj.insert("offset".to_string(), json!(annotation.offset));
            let _ = obj.insert("position".to_string(), json!(annotation.position.to_string()));
        }
        AreaKind::Glyph(glyph) => {
            let _ = obj.insert("font".to_string(), json!(glyph.font.key().to_string()));
            let _ = obj.insert("text".to_string(), json!(glyph.mapping.text));
            let _ = obj.insert(
                "mapping".to_string(),
                serde_json::to_value(&glyph.mapping).unwrap_or(Value::Null),
            );
            if !glyph.decorations.is_empty() {
                let _ = obj.insert(
                    "decorations".to_string(),
                    serde_json::to_value(&glyph.decorations).unwrap_or(Value::Null),
                );
            }
        }
        AreaKind::Space(space) => {
            let _ = obj.insert("text".to_string(), json!(space.text));
        }
        AreaKind::InlineImage(image) | AreaKind::BlockImage(image) => {
            let _ = obj.insert("source".to_string(), json!(image.source));
        }
        AreaKind::Block
        | AreaKind::BoundedBlock { .. }
        | AreaKind::InlineFiller
        | AreaKind::BlockFiller
        | AreaKind::InlineBlock => {}
    }
}
