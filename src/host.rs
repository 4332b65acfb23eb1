use thiserror::Error;

use crate::transform::Transform;

pub type BoneIndex = u32;

/// Marks a bone without a parent in a snapshot's parent-index relation.
pub const BONE_SENTINEL: BoneIndex = BoneIndex::MAX;

/// What a host adapter can report while its skeleton is being walked.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Missing partial skeleton ({0})")]
    MissingPartial(usize),

    #[error("Empty partial skeleton ({0})")]
    EmptyPartial(usize),

    #[error("Unreadable bone ({partial}, {bone})")]
    UnreadableBone { partial: usize, bone: usize },
}

/// A single bone as reported by the host skeleton.
#[derive(Clone, Debug)]
pub struct BoneRecord {
    /// Absent for structural gaps in the host skeleton.
    pub name: Option<String>,
    /// Index of the parent bone within the same partial skeleton, or
    /// [BONE_SENTINEL] for a root.
    pub parent: BoneIndex,
}

#[derive(Clone, Copy, Debug)]
pub struct PartialInfo {
    pub bone_count: usize,
    /// For partials after the first: the index of the bone in partial 0 this
    /// partial hangs off.
    pub connected_parent_index: BoneIndex,
}

/// A host skeleton's shape at a single point in time.
///
/// Borrowed for the duration of one rebuild and never stored; the host may
/// reshape its skeleton between frames.
pub trait SkeletonSnapshot {
    fn partial_count(&self) -> usize;

    fn partial(&self, partial: usize) -> Result<PartialInfo, SnapshotError>;

    fn bone(&self, partial: usize, bone: usize) -> Result<BoneRecord, SnapshotError>;
}

/// Read/write access to the host's live model-space pose, addressed by
/// (partial index, bone index).
///
/// Borrowed for the duration of one apply pass and never cached across
/// frames. Coordinates that no longer exist read as `None` and refuse writes.
/// A bone shared between partials is written once, through its partial 0
/// coordinates; mirroring that write into any per-partial buffers the native
/// representation keeps is the adapter's concern.
pub trait HostPose {
    fn model_transform(&self, partial: usize, bone: usize) -> Option<Transform>;

    /// The skeleton's default, unedited transform for this bone.
    fn reference_transform(&self, partial: usize, bone: usize) -> Option<Transform>;

    /// Returns whether the write landed.
    fn set_model_transform(&mut self, partial: usize, bone: usize, transform: Transform) -> bool;
}

/// A live game object the host currently owns.
pub trait LiveObject {
    fn name(&self) -> &str;

    /// Absent while the object has no skeleton attached.
    fn skeleton(&self) -> Option<&dyn SkeletonSnapshot>;
}

/// The host's table of live objects.
pub trait LiveScene {
    /// The first live object whose name satisfies `predicate`.
    fn find_first_matching(&self, predicate: &dyn Fn(&str) -> bool) -> Option<&dyn LiveObject>;
}
