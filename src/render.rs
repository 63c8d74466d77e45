use crate::{
    anim::{self, AnimState},
    core::{CanvasSize, normalize_rotation_deg},
    customize::{self, CustomizationMap},
    ids::ElementId,
    model::{Background, Element, Scene, ShapeStyle, TextAlign, TextStyle},
};

/// Effective geometry and compositing state for one draw command.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees, normalized into `[0, 360)`.
    pub rotation: f64,
    /// Effective opacity after animation, clamped to `[0, 1]`.
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
}

/// Soft shadow attached to a placement (the glow animation).
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Shadow {
    pub color: String,
    pub blur: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    pub weight: String,
}

/// One renderer-output instruction for the external drawing surface.
///
/// The list is order-sensitive: the background comes first, then elements in
/// ascending z order. Pixel drawing (canvas API, server rasterizer, SVG
/// writer) is the consumer's concern; the renderer's contract ends here.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCommand {
    Background {
        width: u32,
        height: u32,
        fill: Background,
    },
    Text {
        id: ElementId,
        placement: Placement,
        content: String,
        font: FontSpec,
        color: String,
        align: TextAlign,
    },
    Image {
        id: ElementId,
        placement: Placement,
        src: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    Video {
        id: ElementId,
        placement: Placement,
        src: String,
    },
    Shape {
        id: ElementId,
        placement: Placement,
        #[serde(flatten)]
        style: ShapeStyle,
    },
    Sticker {
        id: ElementId,
        placement: Placement,
        sticker: String,
    },
    /// Substitute for a visual element whose media source is missing.
    Placeholder {
        id: ElementId,
        placement: Placement,
        reason: String,
    },
    /// Non-visual: schedule audio playback at a scene-relative time.
    ScheduleAudio {
        id: ElementId,
        src: String,
        at: f64,
    },
}

/// Composite one scene at time cursor `t` (seconds since scene start) into
/// an ordered draw-command list.
///
/// Deterministic: the same `(scene, t, customizations)` triple always
/// produces the same list. Degraded inputs (missing media, unknown
/// animation, malformed overrides) substitute safe defaults and never fail
/// the frame.
#[tracing::instrument(skip(scene, customizations), fields(scene = %scene.id))]
pub fn render_frame(
    scene: &Scene,
    t: f64,
    customizations: &CustomizationMap,
    canvas: CanvasSize,
) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(scene.elements.len() + 1);
    commands.push(DrawCommand::Background {
        width: canvas.width,
        height: canvas.height,
        fill: scene.background.clone(),
    });

    // Explicit zIndex is authoritative; the stable sort keeps authored
    // sequence order for ties.
    let mut order: Vec<usize> = (0..scene.elements.len()).collect();
    order.sort_by_key(|&i| scene.elements[i].base().z_index);

    for i in order {
        let element = &scene.elements[i];
        if !element.base().visible {
            continue;
        }

        let effective = customize::resolve(element, customizations);
        let state = anim::evaluate(effective.base().animation.as_ref(), t);
        if let Some(cmd) = emit_element(&effective, &state) {
            commands.push(cmd);
        }
    }

    commands
}

fn emit_element(element: &Element, state: &AnimState) -> Option<DrawCommand> {
    let placement = placement_for(element, state);

    match element {
        Element::Text { style, .. } => Some(DrawCommand::Text {
            id: element.id(),
            content: revealed_text(&style.text, state.visible_chars),
            font: FontSpec {
                family: style.font_family.clone(),
                size: style.font_size * state.scale,
                weight: style.font_weight.clone(),
            },
            color: style.color.clone(),
            align: style.align,
            placement,
        }),
        Element::Image { source, .. } => {
            if source.src.trim().is_empty() {
                return Some(placeholder(element.id(), placement, "image source missing"));
            }
            Some(DrawCommand::Image {
                id: element.id(),
                placement,
                src: source.src.clone(),
                alt: source.alt.clone(),
            })
        }
        Element::Video { source, .. } => {
            if source.src.trim().is_empty() {
                return Some(placeholder(element.id(), placement, "video source missing"));
            }
            Some(DrawCommand::Video {
                id: element.id(),
                placement,
                src: source.src.clone(),
            })
        }
        Element::Shape { style, .. } => Some(DrawCommand::Shape {
            id: element.id(),
            placement,
            style: style.clone(),
        }),
        Element::Sticker { reference, .. } => Some(DrawCommand::Sticker {
            id: element.id(),
            placement,
            sticker: reference.sticker.clone(),
        }),
        Element::Audio { source, .. } => {
            if source.src.trim().is_empty() {
                tracing::warn!(id = %element.id(), "audio source missing; skipping");
                return None;
            }
            Some(DrawCommand::ScheduleAudio {
                id: element.id(),
                src: source.src.clone(),
                at: 0.0,
            })
        }
    }
}

fn placeholder(id: ElementId, placement: Placement, reason: &str) -> DrawCommand {
    tracing::warn!(%id, reason, "emitting placeholder");
    DrawCommand::Placeholder {
        id,
        placement,
        reason: reason.to_string(),
    }
}

/// Fold the animation state into the element's authored geometry: offset
/// added to the position, uniform scale applied about the center, opacity
/// multiplied and clamped.
fn placement_for(element: &Element, state: &AnimState) -> Placement {
    let base = element.base();
    let x = base.x + state.offset.x;
    let y = base.y + state.offset.y;

    let width = base.width * state.scale;
    let height = base.height * state.scale;
    let cx = x + base.width / 2.0;
    let cy = y + base.height / 2.0;

    Placement {
        x: cx - width / 2.0,
        y: cy - height / 2.0,
        width,
        height,
        rotation: normalize_rotation_deg(base.rotation),
        opacity: (base.opacity * state.opacity_factor).clamp(0.0, 1.0),
        shadow: state.glow_radius.map(|blur| Shadow {
            color: shadow_color(element),
            blur,
        }),
    }
}

/// Glow uses the element's own color; media elements fall back to white.
fn shadow_color(element: &Element) -> String {
    match element {
        Element::Text {
            style: TextStyle { color, .. },
            ..
        } => color.clone(),
        Element::Shape {
            style: ShapeStyle { fill_color, .. },
            ..
        } => fill_color.clone(),
        _ => "#ffffff".to_string(),
    }
}

fn revealed_text(text: &str, visible_chars: Option<usize>) -> String {
    match visible_chars {
        None => text.to_string(),
        Some(n) => text.chars().take(n).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ids::SceneId,
        model::{
            Animation, AnimationName, AudioSource, ElementBase, MediaSource, ShapeType,
            Transition,
        },
    };

    fn base(z_index: i32) -> ElementBase {
        ElementBase {
            id: ElementId::new(),
            x: 100.0,
            y: 100.0,
            width: 200.0,
            height: 50.0,
            rotation: 0.0,
            opacity: 1.0,
            visible: true,
            locked: false,
            z_index,
            animation: None,
        }
    }

    fn text(content: &str, z_index: i32) -> Element {
        Element::Text {
            base: base(z_index),
            style: TextStyle {
                text: content.to_string(),
                font_size: 24.0,
                font_family: "Arial".to_string(),
                font_weight: "normal".to_string(),
                color: "#000000".to_string(),
                align: TextAlign::Left,
            },
        }
    }

    fn scene(elements: Vec<Element>) -> Scene {
        Scene {
            id: SceneId::new(),
            name: "Scene 1".to_string(),
            duration: 3.0,
            background: Background::Color("#ffffff".to_string()),
            transition: Transition::None,
            elements,
        }
    }

    fn canvas() -> CanvasSize {
        CanvasSize::new(1080, 1920).unwrap()
    }

    fn no_custom() -> CustomizationMap {
        CustomizationMap::new()
    }

    #[test]
    fn background_is_always_first() {
        let s = scene(vec![text("hi", 0)]);
        let cmds = render_frame(&s, 0.0, &no_custom(), canvas());
        assert!(matches!(cmds[0], DrawCommand::Background { width: 1080, .. }));
        assert_eq!(cmds.len(), 2);
    }

    #[test]
    fn z_order_wins_over_array_order() {
        let a = text("z2", 2);
        let b = text("z0", 0);
        let c = text("z1", 1);
        let expected = [b.id(), c.id(), a.id()];

        let cmds = render_frame(&scene(vec![a, b, c]), 0.0, &no_custom(), canvas());
        let ids: Vec<ElementId> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn equal_z_keeps_authored_order() {
        let a = text("first", 5);
        let b = text("second", 5);
        let expected = [a.id(), b.id()];
        let cmds = render_frame(&scene(vec![a, b]), 0.0, &no_custom(), canvas());
        let ids: Vec<ElementId> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn hidden_elements_are_skipped() {
        let mut el = text("ghost", 0);
        el.base_mut().visible = false;
        let cmds = render_frame(&scene(vec![el]), 0.0, &no_custom(), canvas());
        assert_eq!(cmds.len(), 1);
    }

    #[test]
    fn missing_image_src_yields_placeholder() {
        let el = Element::Image {
            base: base(0),
            source: MediaSource {
                src: "  ".to_string(),
                alt: None,
            },
        };
        let cmds = render_frame(&scene(vec![el]), 0.0, &no_custom(), canvas());
        assert!(matches!(cmds[1], DrawCommand::Placeholder { .. }));
    }

    #[test]
    fn audio_emits_schedule_command() {
        let el = Element::Audio {
            base: base(0),
            source: AudioSource {
                src: "track.mp3".to_string(),
            },
        };
        let cmds = render_frame(&scene(vec![el]), 1.5, &no_custom(), canvas());
        assert!(
            matches!(&cmds[1], DrawCommand::ScheduleAudio { src, at, .. } if src == "track.mp3" && *at == 0.0)
        );
    }

    #[test]
    fn typewriter_reveals_substring() {
        let mut el = text("HELLO", 0);
        el.base_mut().animation = Some(Animation::new(AnimationName::Typewriter));
        let s = scene(vec![el]);

        let at = |t: f64| -> String {
            let cmds = render_frame(&s, t, &no_custom(), canvas());
            match &cmds[1] {
                DrawCommand::Text { content, .. } => content.clone(),
                other => panic!("expected text command, got {other:?}"),
            }
        };
        assert_eq!(at(0.25), "HE");
        assert_eq!(at(10.0), "HELLO");
    }

    #[test]
    fn fade_in_scales_effective_opacity() {
        let mut el = text("fade", 0);
        el.base_mut().opacity = 0.8;
        el.base_mut().animation = Some(Animation::new(AnimationName::FadeIn));
        let s = scene(vec![el]);

        let opacity_at = |t: f64| -> f64 {
            let cmds = render_frame(&s, t, &no_custom(), canvas());
            match &cmds[1] {
                DrawCommand::Text { placement, .. } => placement.opacity,
                other => panic!("expected text command, got {other:?}"),
            }
        };
        assert_eq!(opacity_at(0.0), 0.0);
        assert!((opacity_at(1.0) - 0.4).abs() < 1e-12);
        assert!((opacity_at(2.0) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn bounce_scales_about_center() {
        let mut el = Element::Shape {
            base: base(0),
            style: ShapeStyle {
                shape_type: ShapeType::Rectangle,
                fill_color: "#4a90d9".to_string(),
                stroke_color: None,
                stroke_width: 0.0,
            },
        };
        el.base_mut().animation = Some(Animation::new(AnimationName::Bounce));
        let s = scene(vec![el]);

        // Peak of the bounce: scale 1.1 about the center (200, 125).
        let cmds = render_frame(&s, 1.0, &no_custom(), canvas());
        let DrawCommand::Shape { placement, .. } = &cmds[1] else {
            panic!("expected shape command");
        };
        assert!((placement.width - 220.0).abs() < 1e-9);
        assert!((placement.height - 55.0).abs() < 1e-9);
        let cx = placement.x + placement.width / 2.0;
        let cy = placement.y + placement.height / 2.0;
        assert!((cx - 200.0).abs() < 1e-9);
        assert!((cy - 125.0).abs() < 1e-9);
    }

    #[test]
    fn glow_attaches_element_colored_shadow() {
        let mut el = text("glow", 0);
        el.base_mut().animation = Some(Animation::new(AnimationName::Glow));
        let cmds = render_frame(&scene(vec![el]), 0.5, &no_custom(), canvas());
        let DrawCommand::Text { placement, .. } = &cmds[1] else {
            panic!("expected text command");
        };
        let shadow = placement.shadow.as_ref().unwrap();
        assert_eq!(shadow.color, "#000000");
        assert_eq!(shadow.blur, crate::anim::GLOW_BLUR_RADIUS);
    }

    #[test]
    fn customizations_apply_before_animation() {
        let mut el = text("base", 0);
        el.base_mut().animation = Some(Animation::new(AnimationName::Typewriter));
        let id = el.id();
        let mut map = CustomizationMap::new();
        map.insert(
            id,
            crate::customize::ElementOverride {
                text: Some("CUSTOM".to_string()),
                ..Default::default()
            },
        );
        let cmds = render_frame(&scene(vec![el]), 0.35, &map, canvas());
        let DrawCommand::Text { content, .. } = &cmds[1] else {
            panic!("expected text command");
        };
        // floor(0.35 / 0.1) = 3 chars of the overridden text.
        assert_eq!(content, "CUS");
    }

    #[test]
    fn render_is_deterministic() {
        let mut el = text("same", 3);
        el.base_mut().animation = Some(Animation::new(AnimationName::Pulse));
        let s = scene(vec![el]);
        let a = render_frame(&s, 1.234, &no_custom(), canvas());
        let b = render_frame(&s, 1.234, &no_custom(), canvas());
        assert_eq!(a, b);
    }

    #[test]
    fn rotation_is_normalized_for_display() {
        let mut el = text("spin", 0);
        el.base_mut().rotation = -90.0;
        let cmds = render_frame(&scene(vec![el]), 0.0, &no_custom(), canvas());
        let DrawCommand::Text { placement, .. } = &cmds[1] else {
            panic!("expected text command");
        };
        assert_eq!(placement.rotation, 270.0);
    }
}
