use glam::{Mat4, Quat, Vec3};

/// A translation, rotation and non-uniform scale that can be converted into a
/// 4x4 matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Create a new transform from a translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Default::default()
        }
    }

    /// Create a new transform from euler angles (radians) as a rotation.
    pub fn from_euler_rotation(rotation: Vec3) -> Self {
        Self::from_rotation(Quat::from_euler(
            glam::EulerRot::XYZ,
            rotation.x,
            rotation.y,
            rotation.z,
        ))
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic() {
        let transform = Transform::default().to_mat4();
        assert_eq!(transform, Mat4::IDENTITY);

        let transform = Transform::default()
            .with_rotation(Quat::from_xyzw(0.0, 0.0, 0.0, 1.0))
            .to_mat4();
        assert_eq!(transform, Mat4::IDENTITY);

        let transform = Transform::default()
            .with_translation(Vec3::new(10.0, 8.0, 6.0))
            .to_mat4();
        assert_eq!(transform, Mat4::from_translation(Vec3::new(10.0, 8.0, 6.0)));
    }

    #[test]
    fn scale_feeds_the_matrix() {
        let transform = Transform::default()
            .with_scale(Vec3::new(2.0, 1.0, 1.0))
            .to_mat4();
        assert_eq!(transform, Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0)));
    }
}
