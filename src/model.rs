use crate::{
    core::CanvasSize,
    error::{ReelError, ReelResult},
    ids::{ElementId, SceneId},
};

/// A multi-scene animated template, the unit of persistence and export.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub version: String,
    pub canvas_size: CanvasSize,
    pub scenes: Vec<Scene>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,
}

impl Template {
    pub fn validate(&self) -> ReelResult<()> {
        if self.canvas_size.width == 0 || self.canvas_size.height == 0 {
            return Err(ReelError::validation("canvas width/height must be > 0"));
        }
        if self.scenes.is_empty() {
            return Err(ReelError::validation(
                "template must contain at least one scene",
            ));
        }

        let mut seen = std::collections::BTreeSet::new();
        for scene in &self.scenes {
            scene.validate()?;
            for el in &scene.elements {
                if !seen.insert(el.id()) {
                    return Err(ReelError::validation(format!(
                        "duplicate element id '{}'",
                        el.id()
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn scene(&self, index: usize) -> ReelResult<&Scene> {
        self.scenes
            .get(index)
            .ok_or_else(|| ReelError::not_found(format!("scene index {index} out of range")))
    }

    pub fn scene_mut(&mut self, index: usize) -> ReelResult<&mut Scene> {
        self.scenes
            .get_mut(index)
            .ok_or_else(|| ReelError::not_found(format!("scene index {index} out of range")))
    }
}

/// One timed segment of the playback timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub id: SceneId,
    pub name: String,
    /// Playback length in seconds; the scene time cursor ranges over `[0, duration)`.
    pub duration: f64,
    pub background: Background,
    pub transition: Transition,
    pub elements: Vec<Element>,
}

impl Scene {
    pub fn validate(&self) -> ReelResult<()> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(ReelError::validation(format!(
                "scene '{}' duration must be > 0 seconds",
                self.name
            )));
        }
        for el in &self.elements {
            el.validate()?;
        }
        Ok(())
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id() == id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| el.id() == id)
    }
}

/// Scene background fill.
///
/// Serialized either as a bare color string or as a `{"type": ...}` object
/// for gradients and image references (the canonical export shape).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "BackgroundRepr", into = "BackgroundRepr")]
pub enum Background {
    Color(String),
    Gradient { colors: Vec<String> },
    Image { src: String },
}

impl Default for Background {
    fn default() -> Self {
        Self::Gradient {
            colors: vec!["#667eea".to_string(), "#764ba2".to_string()],
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum BackgroundRepr {
    Color(String),
    Tagged(TaggedBackground),
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum TaggedBackground {
    Gradient { colors: Vec<String> },
    Image { src: String },
}

impl From<BackgroundRepr> for Background {
    fn from(repr: BackgroundRepr) -> Self {
        match repr {
            BackgroundRepr::Color(c) => Self::Color(c),
            BackgroundRepr::Tagged(TaggedBackground::Gradient { colors }) => {
                Self::Gradient { colors }
            }
            BackgroundRepr::Tagged(TaggedBackground::Image { src }) => Self::Image { src },
        }
    }
}

impl From<Background> for BackgroundRepr {
    fn from(bg: Background) -> Self {
        match bg {
            Background::Color(c) => Self::Color(c),
            Background::Gradient { colors } => Self::Tagged(TaggedBackground::Gradient { colors }),
            Background::Image { src } => Self::Tagged(TaggedBackground::Image { src }),
        }
    }
}

/// Visual transition into the next scene.
///
/// Purely descriptive: consumed by the external video-compositing step, not
/// evaluated by the frame renderer. Unknown names degrade to `None` so a
/// template authored by a newer editor still previews.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Transition {
    #[default]
    None,
    Fade,
    SlideLeft,
    SlideRight,
    SlideUp,
    SlideDown,
    ZoomIn,
    ZoomOut,
    Rotate,
    Flip,
    Dissolve,
    Blur,
    Glow,
}

impl Transition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Fade => "fade",
            Self::SlideLeft => "slideLeft",
            Self::SlideRight => "slideRight",
            Self::SlideUp => "slideUp",
            Self::SlideDown => "slideDown",
            Self::ZoomIn => "zoomIn",
            Self::ZoomOut => "zoomOut",
            Self::Rotate => "rotate",
            Self::Flip => "flip",
            Self::Dissolve => "dissolve",
            Self::Blur => "blur",
            Self::Glow => "glow",
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "fade" => Self::Fade,
            "slideleft" | "slide_left" => Self::SlideLeft,
            "slideright" | "slide_right" => Self::SlideRight,
            "slideup" | "slide_up" => Self::SlideUp,
            "slidedown" | "slide_down" => Self::SlideDown,
            "zoomin" | "zoom_in" => Self::ZoomIn,
            "zoomout" | "zoom_out" => Self::ZoomOut,
            "rotate" => Self::Rotate,
            "flip" => Self::Flip,
            "dissolve" => Self::Dissolve,
            "blur" => Self::Blur,
            "glow" => Self::Glow,
            _ => Self::None,
        }
    }
}

impl serde::Serialize for Transition {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Transition {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_name(&s))
    }
}

/// Entrance/looping animation directive attached to an element.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Animation {
    pub name: AnimationName,
    /// Entrance duration in seconds. Looping animations ignore it.
    #[serde(default = "Animation::default_duration")]
    pub duration: f64,
}

impl Animation {
    fn default_duration() -> f64 {
        1.0
    }

    pub fn new(name: AnimationName) -> Self {
        Self {
            name,
            duration: Self::default_duration(),
        }
    }
}

/// Built-in animation names. Unknown names degrade to `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationName {
    #[default]
    None,
    FadeIn,
    FadeInUp,
    Bounce,
    Glow,
    Typewriter,
    Pulse,
}

impl AnimationName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::FadeIn => "fadeIn",
            Self::FadeInUp => "fadeInUp",
            Self::Bounce => "bounce",
            Self::Glow => "glow",
            Self::Typewriter => "typewriter",
            Self::Pulse => "pulse",
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "fadein" | "fade_in" => Self::FadeIn,
            "fadeinup" | "fade_in_up" => Self::FadeInUp,
            "bounce" => Self::Bounce,
            "glow" => Self::Glow,
            "typewriter" => Self::Typewriter,
            "pulse" => Self::Pulse,
            _ => Self::None,
        }
    }
}

impl serde::Serialize for AnimationName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for AnimationName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_name(&s))
    }
}

/// Geometry and compositing fields shared by every element kind.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementBase {
    pub id: ElementId,
    /// Top-left corner in logical canvas pixels.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees; any real value, normalized mod 360 for display.
    pub rotation: f64,
    /// 0..=1.
    pub opacity: f64,
    pub visible: bool,
    /// Locked elements are excluded from pointer-driven move/resize but
    /// still rendered.
    pub locked: bool,
    pub z_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
}

impl ElementBase {
    fn validate(&self, kind: ElementKind) -> ReelResult<()> {
        if !(self.width.is_finite() && self.width > 0.0)
            || !(self.height.is_finite() && self.height > 0.0)
        {
            return Err(ReelError::validation(format!(
                "{} element '{}' width/height must be > 0",
                kind.as_str(),
                self.id
            )));
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(ReelError::validation(format!(
                "{} element '{}' opacity must be within [0, 1]",
                kind.as_str(),
                self.id
            )));
        }
        Ok(())
    }
}

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
    #[serde(default = "TextStyle::default_weight")]
    pub font_weight: String,
    pub color: String,
    #[serde(default)]
    pub align: TextAlign,
}

impl TextStyle {
    fn default_weight() -> String {
        "normal".to_string()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    #[default]
    Rectangle,
    Circle,
    Triangle,
    Star,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub shape_type: ShapeType,
    pub fill_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default)]
    pub stroke_width: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MediaSource {
    /// URL or opaque asset reference, resolved by the host's asset service.
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AudioSource {
    pub src: String,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StickerRef {
    /// Symbolic sticker reference (emoji or sticker-pack key).
    pub sticker: String,
}

/// One visual or audio layer within a scene, tagged by kind.
///
/// A tagged union rather than one struct of optional fields: a shape cannot
/// carry a font size, a text layer cannot carry a stroke.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Text {
        #[serde(flatten)]
        base: ElementBase,
        #[serde(flatten)]
        style: TextStyle,
    },
    Image {
        #[serde(flatten)]
        base: ElementBase,
        #[serde(flatten)]
        source: MediaSource,
    },
    Shape {
        #[serde(flatten)]
        base: ElementBase,
        #[serde(flatten)]
        style: ShapeStyle,
    },
    Audio {
        #[serde(flatten)]
        base: ElementBase,
        #[serde(flatten)]
        source: AudioSource,
    },
    Video {
        #[serde(flatten)]
        base: ElementBase,
        #[serde(flatten)]
        source: MediaSource,
    },
    Sticker {
        #[serde(flatten)]
        base: ElementBase,
        #[serde(flatten)]
        reference: StickerRef,
    },
}

/// Element kind discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
    Shape,
    Audio,
    Video,
    Sticker,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Shape => "shape",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Sticker => "sticker",
        }
    }
}

impl Element {
    pub fn base(&self) -> &ElementBase {
        match self {
            Self::Text { base, .. }
            | Self::Image { base, .. }
            | Self::Shape { base, .. }
            | Self::Audio { base, .. }
            | Self::Video { base, .. }
            | Self::Sticker { base, .. } => base,
        }
    }

    pub fn base_mut(&mut self) -> &mut ElementBase {
        match self {
            Self::Text { base, .. }
            | Self::Image { base, .. }
            | Self::Shape { base, .. }
            | Self::Audio { base, .. }
            | Self::Video { base, .. }
            | Self::Sticker { base, .. } => base,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Text { .. } => ElementKind::Text,
            Self::Image { .. } => ElementKind::Image,
            Self::Shape { .. } => ElementKind::Shape,
            Self::Audio { .. } => ElementKind::Audio,
            Self::Video { .. } => ElementKind::Video,
            Self::Sticker { .. } => ElementKind::Sticker,
        }
    }

    pub fn id(&self) -> ElementId {
        self.base().id
    }

    pub fn validate(&self) -> ReelResult<()> {
        self.base().validate(self.kind())?;
        match self {
            Self::Text { style, .. } => {
                if !(style.font_size.is_finite() && style.font_size > 0.0) {
                    return Err(ReelError::validation(format!(
                        "text element '{}' fontSize must be > 0",
                        self.id()
                    )));
                }
            }
            Self::Shape { style, .. } => {
                if !(style.stroke_width.is_finite() && style.stroke_width >= 0.0) {
                    return Err(ReelError::validation(format!(
                        "shape element '{}' strokeWidth must be >= 0",
                        self.id()
                    )));
                }
            }
            Self::Image { .. } | Self::Audio { .. } | Self::Video { .. } | Self::Sticker { .. } => {
            }
        }
        Ok(())
    }
}
