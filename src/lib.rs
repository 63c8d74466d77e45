#![forbid(unsafe_code)]

pub mod anim;
pub mod core;
pub mod customize;
pub mod edit;
pub mod error;
pub mod export;
pub mod ids;
pub mod model;
pub mod render;
pub mod services;

pub use anim::{AnimState, GLOW_BLUR_RADIUS, evaluate};
pub use core::{CanvasSize, MAX_ZOOM, MIN_ZOOM, Viewport, clamp_position, normalize_rotation_deg};
pub use customize::{CustomizationMap, ElementOverride, parse_customizations, resolve};
pub use edit::{ElementPatch, TemplateEditor};
pub use error::{ReelError, ReelResult};
pub use export::{export_template, export_template_string, import_template, import_template_value};
pub use ids::{ElementId, SceneId};
pub use model::{
    Animation, AnimationName, Background, Element, ElementBase, ElementKind, Scene, Template,
    Transition,
};
pub use render::{DrawCommand, Placement, render_frame};
pub use services::{
    AssetResolver, ExportJobQueue, ExportState, ExportStatus, InMemoryTemplateStore, TemplateStore,
};
