mod apply;
mod rebuild;


use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::HashMap;
use generational_arena::Arena;

use crate::{
    bone::{BoneId, ModelBone},
    edit::{ApplyFlags, AttachedEdit, BoneEdit},
    host::LiveScene,
    profile::Profile,
};

pub use rebuild::RebuildError;

static NEXT_ARMATURE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique diagnostic id for an armature. Only ever used in logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArmatureId(u64);

impl std::fmt::Display for ArmatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "armature {}", self.0)
    }
}

/// Hands out monotonically increasing [ArmatureId]s. The process-wide
/// allocator backs [Armature::new]; tests can inject their own for
/// deterministic ids.
#[derive(Debug)]
pub struct ArmatureIdAllocator {
    next: AtomicU64,
}

impl ArmatureIdAllocator {
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    pub fn next(&self) -> ArmatureId {
        ArmatureId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// The in-memory mirror of one live skeleton: a forest of [ModelBone]s
/// grouped into partial skeletons, plus the logic to rebuild that forest from
/// host snapshots and to apply attached edits back onto the host pose.
pub struct Armature {
    id: ArmatureId,
    profile: Arc<dyn Profile>,
    is_visible: bool,
    snap_to_reference: bool,
    bones: Arena<ModelBone>,
    partials: Vec<Vec<BoneId>>,
    by_name: HashMap<String, BoneId>,
}

impl Armature {
    pub fn new(profile: Arc<dyn Profile>) -> Self {
        Self::with_id(profile, ArmatureId(NEXT_ARMATURE_ID.fetch_add(1, Ordering::Relaxed)))
    }

    pub fn with_allocator(profile: Arc<dyn Profile>, allocator: &ArmatureIdAllocator) -> Self {
        Self::with_id(profile, allocator.next())
    }

    fn with_id(profile: Arc<dyn Profile>, id: ArmatureId) -> Self {
        Self {
            id,
            profile,
            is_visible: true,
            snap_to_reference: false,
            bones: Arena::new(),
            partials: Vec::new(),
            by_name: HashMap::default(),
        }
    }

    pub fn id(&self) -> ArmatureId {
        self.id
    }

    pub fn profile(&self) -> &Arc<dyn Profile> {
        &self.profile
    }

    pub fn is_built(&self) -> bool {
        !self.partials.is_empty()
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.is_visible = visible;
    }

    /// Whether edits are composed against the reference pose instead of the
    /// live pose. Only ever honored while the profile is open in the editor.
    pub fn snap_to_reference(&self) -> bool {
        self.snap_to_reference && self.profile.is_open_in_editor()
    }

    /// Setting `true` while the profile is not open in the editor clears the
    /// flag instead; snapping is a transient editor-scoped override, not a
    /// persisted property.
    pub fn set_snap_to_reference(&mut self, snap: bool) {
        self.snap_to_reference = snap && self.profile.is_open_in_editor();
    }

    pub fn partial_count(&self) -> usize {
        self.partials.len()
    }

    pub fn partial_len(&self, partial: usize) -> Option<usize> {
        self.partials.get(partial).map(Vec::len)
    }

    /// Number of distinct bones in the forest. Every partial after the first
    /// shares exactly one bone (its root) with partial 0, so the naive sum
    /// over-counts by `partial_count - 1`.
    pub fn bone_count(&self) -> usize {
        let total: usize = self.partials.iter().map(Vec::len).sum();
        total - self.partials.len().saturating_sub(1)
    }

    pub fn bone_id_at(&self, partial: usize, bone: usize) -> Option<BoneId> {
        self.partials.get(partial)?.get(bone).copied()
    }

    pub fn bone_at(&self, partial: usize, bone: usize) -> Option<&ModelBone> {
        self.bones.get(self.bone_id_at(partial, bone)?)
    }

    pub fn bone_named(&self, name: &str) -> Option<&ModelBone> {
        self.bones.get(*self.by_name.get(name)?)
    }

    /// Every distinct bone in the forest; aliased bones appear once.
    pub fn bones(&self) -> impl Iterator<Item = &ModelBone> {
        self.bones.iter().map(|(_, bone)| bone)
    }

    /// Replace the edit stored on the bone at `(partial, bone)`. Returns
    /// `false` for stale coordinates and for placeholder bones. Does not
    /// touch the host pose; the change lands on the next apply pass.
    pub fn update_bone_edit(
        &mut self,
        partial: usize,
        bone: usize,
        edit: Option<BoneEdit>,
        flags: ApplyFlags,
    ) -> bool {
        let Some(id) = self.bone_id_at(partial, bone) else {
            return false;
        };
        let Some(node) = self.bones.get_mut(id) else {
            return false;
        };
        if node.is_placeholder() {
            return false;
        }
        node.update_edit(edit.map(|edit| AttachedEdit { edit, flags }));
        true
    }

    /// Re-read every named bone's edit from the profile, after the
    /// configuration layer changed out from under us.
    pub fn refresh_edits(&mut self) {
        for (_, bone) in self.bones.iter_mut() {
            if bone.is_placeholder() {
                continue;
            }
            let attached = self.profile.edit_for(&bone.name).map(|edit| AttachedEdit {
                edit,
                flags: self.profile.flags_for(&bone.name),
            });
            bone.update_edit(attached);
        }
    }

    /// Search `scene` for the first live object this armature's profile
    /// applies to and, when unbuilt or forced, rebuild from its skeleton.
    ///
    /// Returns whether a matching object was found, independent of rebuild
    /// success; failures are logged and the previous forest is kept. Safe to
    /// retry every frame.
    pub fn try_link(&mut self, scene: &dyn LiveScene, force_rebuild: bool) -> bool {
        let Some(object) = scene.find_first_matching(&|name| self.profile.applies_to(name))
        else {
            return false;
        };

        if !self.is_built() || force_rebuild {
            match object.skeleton() {
                Some(snapshot) => {
                    if let Err(err) = self.rebuild(Some(snapshot)) {
                        tracing::warn!("{} -> rebuild failed: {}", self.id, err);
                    }
                }
                None => {
                    tracing::debug!("{} -> {} has no skeleton yet", self.id, object.name());
                }
            }
        }

        true
    }

    /// Tear down the forest. The armature becomes unbuilt, not destroyed; a
    /// later [Armature::try_link] can build it again.
    pub fn unlink(&mut self) {
        if !self.is_built() {
            return;
        }
        self.bones.clear();
        self.partials.clear();
        self.by_name.clear();
        tracing::info!("{} -> unlinked", self.id);
    }
}
