use bitflags::bitflags;
use glam::{EulerRot, Quat, Vec3};

use crate::transform::Transform;

bitflags! {
    /// How an edit should be applied to the live pose.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ApplyFlags: u8 {
        /// Carry the delta rigidly onto every descendant of the edited bone.
        const PROPAGATE = 1 << 0;
        /// Also apply the laterally-reflected delta to the left/right
        /// counterpart bone.
        const MIRROR = 1 << 1;
    }
}

/// A user-authored delta for a single named bone.
///
/// Replaced wholesale whenever the user edits the bone, never partially
/// mutated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoneEdit {
    pub translation: Vec3,
    /// Euler angles in degrees, XYZ order.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for BoneEdit {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl BoneEdit {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn from_rotation(rotation: Vec3) -> Self {
        Self {
            rotation,
            ..Default::default()
        }
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// An identity edit leaves the bone exactly where the host posed it.
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    pub fn rotation_quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x.to_radians(),
            self.rotation.y.to_radians(),
            self.rotation.z.to_radians(),
        )
    }

    /// The laterally-reflected version of this edit, for the left/right
    /// counterpart bone.
    ///
    /// Reflection across the YZ plane maps a rotation with axis `a` and angle
    /// `t` to axis `M*a`, angle `-t`, which negates the Y and Z euler
    /// components and keeps X. Translation flips its X component, scale is
    /// unchanged.
    pub fn mirrored(&self) -> Self {
        Self {
            translation: Vec3::new(-self.translation.x, self.translation.y, self.translation.z),
            rotation: Vec3::new(self.rotation.x, -self.rotation.y, -self.rotation.z),
            scale: self.scale,
        }
    }

    /// Compose this edit onto `base`, the bone's current model-space
    /// transform.
    ///
    /// The order is fixed and not commutative: the rotation delta is applied
    /// after the bone's existing rotation (it acts in the bone's local frame),
    /// the translation delta is rotated by the composed rotation before it is
    /// added, and scale multiplies component-wise.
    pub fn compose_onto(&self, base: &Transform) -> Transform {
        let rotation = (base.rotation * self.rotation_quat()).normalize();
        Transform {
            translation: base.translation + rotation * self.translation,
            rotation,
            scale: base.scale * self.scale,
        }
    }
}

/// An edit attached to a live bone, together with how it should be applied.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AttachedEdit {
    pub edit: BoneEdit,
    pub flags: ApplyFlags,
}
