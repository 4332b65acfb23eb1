pub mod armature;
pub mod bone;
pub mod edit;
pub mod host;
pub mod mirror;
pub mod profile;
pub mod transform;

pub mod prelude {
    pub use super::armature::{Armature, ArmatureId, ArmatureIdAllocator, RebuildError};
    pub use super::bone::{BoneId, ModelBone, UNNAMED_BONE};
    pub use super::edit::{ApplyFlags, AttachedEdit, BoneEdit};
    pub use super::host::{
        BONE_SENTINEL, BoneIndex, BoneRecord, HostPose, LiveObject, LiveScene, PartialInfo,
        SkeletonSnapshot, SnapshotError,
    };
    pub use super::mirror::mirrored_name;
    pub use super::profile::Profile;
    pub use super::transform::Transform;
    pub use glam::{Mat4, Quat, Vec3};
}
