use std::collections::BTreeMap;

use crate::{
    ids::ElementId,
    model::{Element, TextAlign},
};

/// Render-time overrides keyed by the element's stable id.
///
/// Not part of the persisted template: a caller personalizes a shared
/// template by supplying this map alongside the time cursor.
pub type CustomizationMap = BTreeMap<ElementId, ElementOverride>;

/// Partial property bag overriding an element's authored values.
///
/// Absent fields retain the base value. Fields that do not apply to the
/// element's kind (a font size on a shape) are ignored at resolve time.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementOverride {
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub color: Option<String>,
    pub align: Option<TextAlign>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl ElementOverride {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Extract an override from loose JSON, field by field.
    ///
    /// Wrong-typed fields are dropped with a warning rather than failing the
    /// whole bag; a broken entry must never abort a frame.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let Some(obj) = value.as_object() else {
            if !value.is_null() {
                tracing::warn!("customization entry is not an object; ignoring");
            }
            return Self::default();
        };

        let mut out = Self::default();
        for (key, v) in obj {
            match key.as_str() {
                "text" | "content" => match v.as_str() {
                    Some(s) => out.text = Some(s.to_string()),
                    None => warn_ignored(key),
                },
                "fontSize" => match v.as_f64() {
                    Some(n) => out.font_size = Some(n),
                    None => warn_ignored(key),
                },
                "fontFamily" => match v.as_str() {
                    Some(s) => out.font_family = Some(s.to_string()),
                    None => warn_ignored(key),
                },
                "color" => match v.as_str() {
                    Some(s) => out.color = Some(s.to_string()),
                    None => warn_ignored(key),
                },
                "align" | "textAlign" => {
                    match v.as_str().and_then(|s| {
                        serde_json::from_value::<TextAlign>(serde_json::Value::String(
                            s.trim().to_ascii_lowercase(),
                        ))
                        .ok()
                    }) {
                        Some(a) => out.align = Some(a),
                        None => warn_ignored(key),
                    }
                }
                "x" => match v.as_f64() {
                    Some(n) => out.x = Some(n),
                    None => warn_ignored(key),
                },
                "y" => match v.as_f64() {
                    Some(n) => out.y = Some(n),
                    None => warn_ignored(key),
                },
                "width" => match v.as_f64() {
                    Some(n) => out.width = Some(n),
                    None => warn_ignored(key),
                },
                "height" => match v.as_f64() {
                    Some(n) => out.height = Some(n),
                    None => warn_ignored(key),
                },
                other => {
                    tracing::debug!(field = other, "unknown customization field; ignoring");
                }
            }
        }
        out
    }
}

fn warn_ignored(field: &str) {
    tracing::warn!(field, "customization field has wrong type; ignoring");
}

/// Parse a whole customization map from loose JSON keyed by element id.
///
/// Keys that are not valid element ids are dropped with a warning.
pub fn parse_customizations(value: &serde_json::Value) -> CustomizationMap {
    let mut map = CustomizationMap::new();
    let Some(obj) = value.as_object() else {
        if !value.is_null() {
            tracing::warn!("customizations payload is not an object; ignoring");
        }
        return map;
    };

    for (key, entry) in obj {
        match key.parse::<uuid::Uuid>() {
            Ok(id) => {
                let over = ElementOverride::from_json(entry);
                if !over.is_empty() {
                    map.insert(ElementId(id), over);
                }
            }
            Err(_) => {
                tracing::warn!(key, "customization key is not an element id; ignoring");
            }
        }
    }
    map
}

/// Merge a base element with its override, producing the effective element
/// used for rendering.
///
/// Out-of-range values are coerced rather than rejected: a negative font
/// size clamps to 1, non-positive sizes are dropped. Degenerate output is
/// acceptable; a crash is not.
pub fn resolve(element: &Element, customizations: &CustomizationMap) -> Element {
    let mut effective = element.clone();
    let Some(over) = customizations.get(&element.id()) else {
        return effective;
    };

    {
        let base = effective.base_mut();
        if let Some(x) = over.x.filter(|v| v.is_finite()) {
            base.x = x;
        }
        if let Some(y) = over.y.filter(|v| v.is_finite()) {
            base.y = y;
        }
        if let Some(w) = over.width.filter(|v| v.is_finite() && *v > 0.0) {
            base.width = w;
        }
        if let Some(h) = over.height.filter(|v| v.is_finite() && *v > 0.0) {
            base.height = h;
        }
    }

    match &mut effective {
        Element::Text { style, .. } => {
            if let Some(text) = &over.text {
                style.text = text.clone();
            }
            if let Some(size) = over.font_size.filter(|v| v.is_finite()) {
                style.font_size = size.max(1.0);
            }
            if let Some(family) = &over.font_family {
                style.font_family = family.clone();
            }
            if let Some(color) = &over.color {
                style.color = color.clone();
            }
            if let Some(align) = over.align {
                style.align = align;
            }
        }
        Element::Shape { style, .. } => {
            if let Some(color) = &over.color {
                style.fill_color = color.clone();
            }
        }
        Element::Image { .. }
        | Element::Audio { .. }
        | Element::Video { .. }
        | Element::Sticker { .. } => {}
    }

    effective
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementBase, TextStyle};

    fn text_element() -> Element {
        Element::Text {
            base: ElementBase {
                id: ElementId::new(),
                x: 10.0,
                y: 20.0,
                width: 200.0,
                height: 50.0,
                rotation: 0.0,
                opacity: 1.0,
                visible: true,
                locked: false,
                z_index: 0,
                animation: None,
            },
            style: TextStyle {
                text: "A".to_string(),
                font_size: 24.0,
                font_family: "Arial".to_string(),
                font_weight: "normal".to_string(),
                color: "#000".to_string(),
                align: TextAlign::Left,
            },
        }
    }

    #[test]
    fn present_fields_override_absent_retain() {
        let el = text_element();
        let mut map = CustomizationMap::new();
        map.insert(
            el.id(),
            ElementOverride {
                color: Some("#fff".to_string()),
                ..Default::default()
            },
        );

        let Element::Text { style, .. } = resolve(&el, &map) else {
            panic!("kind changed during resolve");
        };
        assert_eq!(style.text, "A");
        assert_eq!(style.color, "#fff");
    }

    #[test]
    fn missing_entry_returns_base_unchanged() {
        let el = text_element();
        assert_eq!(resolve(&el, &CustomizationMap::new()), el);
    }

    #[test]
    fn negative_font_size_coerces_to_one() {
        let el = text_element();
        let mut map = CustomizationMap::new();
        map.insert(
            el.id(),
            ElementOverride {
                font_size: Some(-12.0),
                ..Default::default()
            },
        );
        let Element::Text { style, .. } = resolve(&el, &map) else {
            panic!("kind changed during resolve");
        };
        assert_eq!(style.font_size, 1.0);
    }

    #[test]
    fn non_positive_size_is_dropped() {
        let el = text_element();
        let mut map = CustomizationMap::new();
        map.insert(
            el.id(),
            ElementOverride {
                width: Some(0.0),
                height: Some(-4.0),
                x: Some(99.0),
                ..Default::default()
            },
        );
        let resolved = resolve(&el, &map);
        assert_eq!(resolved.base().width, 200.0);
        assert_eq!(resolved.base().height, 50.0);
        assert_eq!(resolved.base().x, 99.0);
    }

    #[test]
    fn from_json_drops_wrong_typed_fields_individually() {
        let over = ElementOverride::from_json(&serde_json::json!({
            "text": "Hello",
            "fontSize": "not-a-number",
            "color": "#123456",
            "align": "CENTER",
            "bogus": true,
        }));
        assert_eq!(over.text.as_deref(), Some("Hello"));
        assert_eq!(over.font_size, None);
        assert_eq!(over.color.as_deref(), Some("#123456"));
        assert_eq!(over.align, Some(TextAlign::Center));
    }

    #[test]
    fn parse_customizations_skips_bad_keys() {
        let el = text_element();
        let payload = serde_json::json!({
            el.id().to_string(): { "text": "X" },
            "text_0": { "text": "positional keys are not supported" },
        });
        let map = parse_customizations(&payload);
        assert_eq!(map.len(), 1);
        assert_eq!(map[&el.id()].text.as_deref(), Some("X"));
    }

    #[test]
    fn inapplicable_fields_are_ignored_for_kind() {
        let el = Element::Shape {
            base: ElementBase {
                id: ElementId::new(),
                x: 0.0,
                y: 0.0,
                width: 100.0,
                height: 100.0,
                rotation: 0.0,
                opacity: 1.0,
                visible: true,
                locked: false,
                z_index: 0,
                animation: None,
            },
            style: crate::model::ShapeStyle {
                shape_type: crate::model::ShapeType::Rectangle,
                fill_color: "#4a90d9".to_string(),
                stroke_color: None,
                stroke_width: 0.0,
            },
        };
        let mut map = CustomizationMap::new();
        map.insert(
            el.id(),
            ElementOverride {
                font_size: Some(64.0),
                color: Some("#222".to_string()),
                ..Default::default()
            },
        );
        let Element::Shape { style, .. } = resolve(&el, &map) else {
            panic!("kind changed during resolve");
        };
        // Color maps onto the shape fill; the font size has nowhere to go.
        assert_eq!(style.fill_color, "#222");
    }
}
