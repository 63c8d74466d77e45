use crate::{
    core::{CanvasSize, clamp_position},
    error::{ReelError, ReelResult},
    ids::{ElementId, SceneId},
    model::{
        Animation, AudioSource, Background, Element, ElementBase, ElementKind, MediaSource, Scene,
        ShapeStyle, ShapeType, StickerRef, Template, TextAlign, TextStyle, Transition,
    },
};

/// Offset applied to a duplicated element so it does not sit exactly on top
/// of its source.
const DUPLICATE_OFFSET: f64 = 20.0;

/// Owns a template plus the current-scene editing focus.
///
/// Every scene-level operation keeps `current_scene` pointing at the same
/// logical scene across deletes and reorders, instead of leaving callers to
/// re-derive it from index arithmetic. Operations fail atomically: on error
/// the template is unchanged.
#[derive(Clone, Debug)]
pub struct TemplateEditor {
    template: Template,
    current_scene: usize,
}

impl TemplateEditor {
    /// Create an editor with a fresh single-scene template.
    pub fn new(canvas_size: CanvasSize) -> Self {
        Self {
            template: Template {
                version: "1.0".to_string(),
                canvas_size,
                scenes: vec![default_scene(1)],
                created_at: None,
                exported_at: None,
            },
            current_scene: 0,
        }
    }

    /// Wrap an existing template; fails if it does not validate.
    pub fn from_template(template: Template) -> ReelResult<Self> {
        template.validate()?;
        Ok(Self {
            template,
            current_scene: 0,
        })
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn into_template(self) -> Template {
        self.template
    }

    pub fn current_scene(&self) -> usize {
        self.current_scene
    }

    /// Move the editing focus to the scene at `index`.
    pub fn set_current_scene(&mut self, index: usize) -> ReelResult<()> {
        if index >= self.template.scenes.len() {
            return Err(ReelError::not_found(format!(
                "scene index {index} out of range"
            )));
        }
        self.current_scene = index;
        Ok(())
    }

    // ---- scene operations ----

    /// Append a new scene with defaults and focus it.
    pub fn add_scene(&mut self) -> &Scene {
        let scene = default_scene(self.template.scenes.len() + 1);
        tracing::debug!(scene = %scene.id, "add scene");
        self.template.scenes.push(scene);
        self.current_scene = self.template.scenes.len() - 1;
        &self.template.scenes[self.current_scene]
    }

    /// Deep-copy the scene at `index`, with a fresh scene id and fresh ids
    /// for every cloned element. The copy is inserted immediately after its
    /// source and becomes current.
    pub fn duplicate_scene(&mut self, index: usize) -> ReelResult<SceneId> {
        let source = self.template.scene(index)?;
        let mut copy = source.clone();
        copy.id = SceneId::new();
        copy.name = format!("{} Copy", source.name);
        for el in &mut copy.elements {
            el.base_mut().id = ElementId::new();
        }

        let id = copy.id;
        self.template.scenes.insert(index + 1, copy);
        self.current_scene = index + 1;
        Ok(id)
    }

    /// Remove the scene at `index`. Refused when it is the only scene.
    pub fn delete_scene(&mut self, index: usize) -> ReelResult<()> {
        if index >= self.template.scenes.len() {
            return Err(ReelError::invalid_operation(format!(
                "cannot delete scene {index}: only {} scene(s)",
                self.template.scenes.len()
            )));
        }
        if self.template.scenes.len() == 1 {
            return Err(ReelError::invalid_operation(
                "cannot delete the last remaining scene",
            ));
        }

        let removed = self.template.scenes.remove(index);
        tracing::debug!(scene = %removed.id, "delete scene");

        self.current_scene = if self.current_scene == index {
            index.saturating_sub(1)
        } else if index < self.current_scene {
            self.current_scene - 1
        } else {
            self.current_scene
        };
        Ok(())
    }

    /// Move the scene at `from` so it ends up at index `to`. The focus
    /// follows the logical scene it pointed at, not the index.
    pub fn reorder_scenes(&mut self, from: usize, to: usize) -> ReelResult<()> {
        let len = self.template.scenes.len();
        if from >= len || to >= len {
            return Err(ReelError::invalid_operation(format!(
                "reorder {from} -> {to} is out of range for {len} scene(s)"
            )));
        }
        if from == to {
            return Ok(());
        }

        let scene = self.template.scenes.remove(from);
        self.template.scenes.insert(to, scene);

        self.current_scene = if self.current_scene == from {
            to
        } else {
            let mut cur = self.current_scene;
            if from < cur {
                cur -= 1;
            }
            if to <= cur {
                cur += 1;
            }
            cur
        };
        Ok(())
    }

    /// Rename the scene at `index`. A name that trims to empty keeps the
    /// old name.
    pub fn rename_scene(&mut self, index: usize, name: &str) -> ReelResult<()> {
        let trimmed = name.trim();
        let scene = self.template.scene_mut(index)?;
        if trimmed.is_empty() {
            return Ok(());
        }
        scene.name = trimmed.to_string();
        Ok(())
    }

    /// Change the logical canvas size and re-clamp every element position
    /// in every scene into the new bounds.
    pub fn set_canvas_size(&mut self, width: u32, height: u32) -> ReelResult<()> {
        let canvas = CanvasSize::new(width, height)?;
        self.template.canvas_size = canvas;
        for scene in &mut self.template.scenes {
            for el in &mut scene.elements {
                let base = el.base_mut();
                let (x, y) = clamp_position(base.x, base.y, base.width, base.height, canvas);
                base.x = x;
                base.y = y;
            }
        }
        Ok(())
    }

    // ---- element operations ----

    /// Append a kind-appropriate default element to the scene at
    /// `scene_index`, centered on the canvas, on top of the existing stack.
    pub fn add_element(&mut self, scene_index: usize, kind: ElementKind) -> ReelResult<ElementId> {
        let canvas = self.template.canvas_size;
        let scene = self.template.scene_mut(scene_index)?;
        let element = default_element(kind, canvas, scene.elements.len() as i32);
        let id = element.id();
        tracing::debug!(%id, kind = kind.as_str(), "add element");
        scene.elements.push(element);
        Ok(id)
    }

    /// Apply a partial patch to the element with `id`.
    ///
    /// Referencing a missing element raises `NotFound` rather than silently
    /// doing nothing, so editor bugs surface early. Invalid values raise
    /// `ValidationError` before anything is written. Position writes are
    /// clamped into canvas bounds.
    pub fn update_element(
        &mut self,
        scene_index: usize,
        id: ElementId,
        patch: &ElementPatch,
    ) -> ReelResult<()> {
        patch.validate()?;
        let canvas = self.template.canvas_size;
        let scene = self.template.scene_mut(scene_index)?;
        let element = scene
            .element_mut(id)
            .ok_or_else(|| ReelError::not_found(format!("element '{id}' not in scene")))?;

        patch.apply(element);

        let base = element.base_mut();
        let (x, y) = clamp_position(base.x, base.y, base.width, base.height, canvas);
        base.x = x;
        base.y = y;
        Ok(())
    }

    /// Remove the element with `id`. Raises `NotFound` when absent.
    /// (Selection state lives with the caller, outside the core.)
    pub fn delete_element(&mut self, scene_index: usize, id: ElementId) -> ReelResult<()> {
        let scene = self.template.scene_mut(scene_index)?;
        let pos = scene
            .elements
            .iter()
            .position(|el| el.id() == id)
            .ok_or_else(|| ReelError::not_found(format!("element '{id}' not in scene")))?;
        scene.elements.remove(pos);
        Ok(())
    }

    /// Clone the element with `id`: fresh id, offset by (+20, +20) clamped
    /// into bounds, pushed to the end with the highest z index so the copy
    /// renders on top.
    pub fn duplicate_element(&mut self, scene_index: usize, id: ElementId) -> ReelResult<ElementId> {
        let canvas = self.template.canvas_size;
        let scene = self.template.scene_mut(scene_index)?;
        let source = scene
            .element(id)
            .ok_or_else(|| ReelError::not_found(format!("element '{id}' not in scene")))?;

        let mut copy = source.clone();
        let new_z = scene.elements.len() as i32;
        {
            let base = copy.base_mut();
            base.id = ElementId::new();
            let (x, y) = clamp_position(
                base.x + DUPLICATE_OFFSET,
                base.y + DUPLICATE_OFFSET,
                base.width,
                base.height,
                canvas,
            );
            base.x = x;
            base.y = y;
            base.z_index = new_z;
        }
        let new_id = copy.id();
        scene.elements.push(copy);
        Ok(new_id)
    }
}

/// Partial update for one element. Absent fields are left untouched;
/// fields that do not apply to the element's kind are ignored.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub z_index: Option<i32>,
    pub animation: Option<Animation>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub font_weight: Option<String>,
    pub color: Option<String>,
    pub align: Option<TextAlign>,
    pub shape_type: Option<ShapeType>,
    pub fill_color: Option<String>,
    pub stroke_color: Option<String>,
    pub stroke_width: Option<f64>,
    pub src: Option<String>,
    pub sticker: Option<String>,
}

impl ElementPatch {
    fn validate(&self) -> ReelResult<()> {
        for (name, v) in [("width", self.width), ("height", self.height)] {
            if let Some(v) = v
                && !(v.is_finite() && v > 0.0)
            {
                return Err(ReelError::validation(format!("{name} must be > 0")));
            }
        }
        if let Some(o) = self.opacity
            && !(0.0..=1.0).contains(&o)
        {
            return Err(ReelError::validation("opacity must be within [0, 1]"));
        }
        if let Some(fs) = self.font_size
            && !(fs.is_finite() && fs > 0.0)
        {
            return Err(ReelError::validation("fontSize must be > 0"));
        }
        if let Some(sw) = self.stroke_width
            && !(sw.is_finite() && sw >= 0.0)
        {
            return Err(ReelError::validation("strokeWidth must be >= 0"));
        }
        Ok(())
    }

    fn apply(&self, element: &mut Element) {
        {
            let base = element.base_mut();
            if let Some(x) = self.x {
                base.x = x;
            }
            if let Some(y) = self.y {
                base.y = y;
            }
            if let Some(w) = self.width {
                base.width = w;
            }
            if let Some(h) = self.height {
                base.height = h;
            }
            if let Some(r) = self.rotation {
                base.rotation = r;
            }
            if let Some(o) = self.opacity {
                base.opacity = o;
            }
            if let Some(v) = self.visible {
                base.visible = v;
            }
            if let Some(l) = self.locked {
                base.locked = l;
            }
            if let Some(z) = self.z_index {
                base.z_index = z;
            }
            if let Some(a) = &self.animation {
                base.animation = Some(a.clone());
            }
        }

        match element {
            Element::Text { style, .. } => {
                if let Some(text) = &self.text {
                    style.text = text.clone();
                }
                if let Some(fs) = self.font_size {
                    style.font_size = fs;
                }
                if let Some(family) = &self.font_family {
                    style.font_family = family.clone();
                }
                if let Some(weight) = &self.font_weight {
                    style.font_weight = weight.clone();
                }
                if let Some(color) = &self.color {
                    style.color = color.clone();
                }
                if let Some(align) = self.align {
                    style.align = align;
                }
            }
            Element::Shape { style, .. } => {
                if let Some(st) = self.shape_type {
                    style.shape_type = st;
                }
                if let Some(fill) = &self.fill_color {
                    style.fill_color = fill.clone();
                }
                if let Some(stroke) = &self.stroke_color {
                    style.stroke_color = Some(stroke.clone());
                }
                if let Some(sw) = self.stroke_width {
                    style.stroke_width = sw;
                }
            }
            Element::Image { source, .. } | Element::Video { source, .. } => {
                if let Some(src) = &self.src {
                    source.src = src.clone();
                }
            }
            Element::Audio { source, .. } => {
                if let Some(src) = &self.src {
                    source.src = src.clone();
                }
            }
            Element::Sticker { reference, .. } => {
                if let Some(sticker) = &self.sticker {
                    reference.sticker = sticker.clone();
                }
            }
        }
    }
}

fn default_scene(number: usize) -> Scene {
    Scene {
        id: SceneId::new(),
        name: format!("Scene {number}"),
        duration: 3.0,
        background: Background::default(),
        transition: Transition::None,
        elements: Vec::new(),
    }
}

fn default_element(kind: ElementKind, canvas: CanvasSize, z_index: i32) -> Element {
    let (width, height) = match kind {
        ElementKind::Text => (200.0, 50.0),
        ElementKind::Shape => (100.0, 100.0),
        ElementKind::Image => (200.0, 150.0),
        ElementKind::Video => (320.0, 180.0),
        ElementKind::Sticker => (80.0, 80.0),
        // Non-visual, but a nominal box keeps the positive-size invariant
        // uniform across kinds.
        ElementKind::Audio => (1.0, 1.0),
    };
    let (x, y) = clamp_position(
        (canvas.width_f64() - width) / 2.0,
        (canvas.height_f64() - height) / 2.0,
        width,
        height,
        canvas,
    );

    let base = ElementBase {
        id: ElementId::new(),
        x,
        y,
        width,
        height,
        rotation: 0.0,
        opacity: 1.0,
        visible: true,
        locked: false,
        z_index,
        animation: None,
    };

    match kind {
        ElementKind::Text => Element::Text {
            base,
            style: TextStyle {
                text: "Sample Text".to_string(),
                font_size: 24.0,
                font_family: "Arial".to_string(),
                font_weight: "normal".to_string(),
                color: "#000000".to_string(),
                align: TextAlign::Center,
            },
        },
        ElementKind::Shape => Element::Shape {
            base,
            style: ShapeStyle {
                shape_type: ShapeType::Rectangle,
                fill_color: "#4a90d9".to_string(),
                stroke_color: None,
                stroke_width: 0.0,
            },
        },
        ElementKind::Image => Element::Image {
            base,
            source: MediaSource {
                src: String::new(),
                alt: None,
            },
        },
        ElementKind::Video => Element::Video {
            base,
            source: MediaSource {
                src: String::new(),
                alt: None,
            },
        },
        ElementKind::Audio => Element::Audio {
            base,
            source: AudioSource { src: String::new() },
        },
        ElementKind::Sticker => Element::Sticker {
            base,
            reference: StickerRef {
                sticker: "star".to_string(),
            },
        },
    }
}
