// ============================================================================
// RENDER COMMANDS & RETAINED SCENE
// ============================================================================
//
// The engine side emits RenderCommands; the rendering surface side keeps a
// Scene and applies them. Commands address drawables through the stable ids
// assigned at scene construction, so the surface mutates existing drawables
// instead of recreating them.

use crate::config::Color;
use crate::geometry::{Drawable, GroupId, PrimitiveId, Shape};
use crate::transform::Transform2D;

/// One mutation of the retained scene.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    /// Replace the affine transform of a whole drawable group.
    SetGroupTransform {
        group: GroupId,
        transform: Transform2D,
    },
    /// Replace the screen rotation of a text drawable. Used for the per-label
    /// counter-rotation on the compass card.
    SetRotation {
        id: PrimitiveId,
        rotation_deg: f64,
    },
    /// Replace the content and color of a text drawable.
    SetText {
        id: PrimitiveId,
        text: String,
        color: Color,
    },
}

/// Ordered list of scene mutations produced by one instrument update.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderCommand {
    pub ops: Vec<RenderOp>,
}

impl RenderCommand {
    pub fn new(ops: Vec<RenderOp>) -> Self {
        Self { ops }
    }
}

/// Surface-side retained scene: the drawables from an instrument's template
/// plus the current transform of each group.
#[derive(Debug, Clone)]
pub struct Scene {
    drawables: Vec<Drawable>,
    group_transforms: [Transform2D; GroupId::COUNT],
}

impl Scene {
    pub fn new(template: &[Drawable]) -> Self {
        Self {
            drawables: template.to_vec(),
            group_transforms: [Transform2D::IDENTITY; GroupId::COUNT],
        }
    }

    pub fn apply(&mut self, command: &RenderCommand) {
        for op in &command.ops {
            match op {
                RenderOp::SetGroupTransform { group, transform } => {
                    self.group_transforms[group.index()] = *transform;
                }
                RenderOp::SetRotation { id, rotation_deg } => {
                    if let Some(drawable) = self.drawables.get_mut(id.0 as usize) {
                        if let Shape::Text {
                            rotation_deg: rot, ..
                        } = &mut drawable.shape
                        {
                            *rot = *rotation_deg;
                        }
                    }
                }
                RenderOp::SetText { id, text, color } => {
                    if let Some(drawable) = self.drawables.get_mut(id.0 as usize) {
                        if let Shape::Text { text: content, .. } = &mut drawable.shape {
                            *content = text.clone();
                        }
                        drawable.style.color = *color;
                    }
                }
            }
        }
    }

    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    pub fn group_transform(&self, group: GroupId) -> Transform2D {
        self.group_transforms[group.index()]
    }
}
