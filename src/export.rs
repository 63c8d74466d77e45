use crate::{
    error::{ReelError, ReelResult},
    model::Template,
};

/// Serialize a template into the canonical export JSON consumed by the
/// persistence service, the export job, and the preview endpoint.
///
/// Ids are preserved verbatim, which makes the export/import pair a strict
/// round trip; callers wanting fresh ids duplicate scenes after import.
pub fn export_template(template: &Template) -> ReelResult<serde_json::Value> {
    template.validate()?;
    serde_json::to_value(template).map_err(|e| ReelError::serde(e.to_string()))
}

/// `export_template`, pretty-printed to a string.
pub fn export_template_string(template: &Template) -> ReelResult<String> {
    template.validate()?;
    serde_json::to_string_pretty(template).map_err(|e| ReelError::serde(e.to_string()))
}

/// Parse and validate a canonical template JSON string.
///
/// Unknown transition and animation names inside degrade to "none" during
/// parsing; structural problems (missing fields, wrong shapes) are
/// `ReelError::Serde`, semantic problems (no scenes, bad sizes) are
/// `ReelError::Validation`.
pub fn import_template(json: &str) -> ReelResult<Template> {
    let template: Template =
        serde_json::from_str(json).map_err(|e| ReelError::serde(e.to_string()))?;
    template.validate()?;
    Ok(template)
}

/// `import_template` over an already-parsed JSON value.
pub fn import_template_value(value: serde_json::Value) -> ReelResult<Template> {
    let template: Template =
        serde_json::from_value(value).map_err(|e| ReelError::serde(e.to_string()))?;
    template.validate()?;
    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::CanvasSize,
        edit::TemplateEditor,
        model::ElementKind,
    };

    fn sample_template() -> Template {
        let mut ed = TemplateEditor::new(CanvasSize::new(1080, 1920).unwrap());
        ed.add_element(0, ElementKind::Text).unwrap();
        ed.add_element(0, ElementKind::Shape).unwrap();
        ed.add_scene();
        ed.add_element(1, ElementKind::Audio).unwrap();
        ed.into_template()
    }

    #[test]
    fn export_matches_canonical_shape() {
        let t = sample_template();
        let v = export_template(&t).unwrap();

        assert!(v["version"].is_string());
        assert_eq!(v["canvasSize"]["width"], 1080);
        assert_eq!(v["canvasSize"]["height"], 1920);
        let scenes = v["scenes"].as_array().unwrap();
        assert_eq!(scenes.len(), 2);
        assert!(scenes[0]["id"].is_string());
        assert_eq!(scenes[0]["transition"], "none");
        let el = &scenes[0]["elements"][0];
        assert_eq!(el["type"], "text");
        assert!(el["x"].is_number());
        assert!(el["zIndex"].is_number());
        assert_eq!(el["visible"], true);
    }

    #[test]
    fn round_trip_preserves_everything() {
        let t = sample_template();
        let s = export_template_string(&t).unwrap();
        let back = import_template(&s).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn import_rejects_structural_garbage() {
        assert!(matches!(
            import_template("{\"version\": 1}"),
            Err(ReelError::Serde(_))
        ));
        assert!(matches!(import_template("not json"), Err(ReelError::Serde(_))));
    }

    #[test]
    fn import_rejects_semantically_invalid_templates() {
        let v = serde_json::json!({
            "version": "1.0",
            "canvasSize": { "width": 1080, "height": 1920 },
            "scenes": []
        });
        assert!(matches!(
            import_template_value(v),
            Err(ReelError::Validation(_))
        ));
    }

    #[test]
    fn import_tolerates_unknown_enum_names() {
        let t = sample_template();
        let mut v = export_template(&t).unwrap();
        v["scenes"][0]["transition"] = "hyperspace".into();
        let back = import_template_value(v).unwrap();
        assert_eq!(back.scenes[0].transition, crate::model::Transition::None);
    }
}
