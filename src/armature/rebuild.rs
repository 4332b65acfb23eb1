use ahash::HashMap;
use generational_arena::Arena;
use thiserror::Error;

use crate::{
    armature::Armature,
    bone::{BoneId, ModelBone},
    edit::AttachedEdit,
    host::{BONE_SENTINEL, BoneIndex, SkeletonSnapshot, SnapshotError},
};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RebuildError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("Connected parent bone index out of range ({partial} -> {connected_parent_index})")]
    ConnectionOutOfRange {
        partial: usize,
        connected_parent_index: BoneIndex,
    },

    #[error("Parent listed after child ({partial}, {bone} -> {parent})")]
    ParentOutOfOrder {
        partial: usize,
        bone: usize,
        parent: BoneIndex,
    },
}

/// A fully built candidate forest, swapped into the armature only once the
/// whole snapshot walk has succeeded.
struct Forest {
    bones: Arena<ModelBone>,
    partials: Vec<Vec<BoneId>>,
    by_name: HashMap<String, BoneId>,
}

impl Forest {
    fn insert(&mut self, bone: ModelBone) -> BoneId {
        let named = !bone.is_placeholder();
        let name = bone.name.clone();
        let parent = bone.parent;
        let id = self.bones.insert(bone);
        if named {
            // First occurrence wins for duplicate names across partials.
            self.by_name.entry(name).or_insert(id);
        }
        if let Some(parent) = parent
            && let Some(parent_bone) = self.bones.get_mut(parent)
        {
            parent_bone.children.push(id);
        }
        id
    }
}

impl Armature {
    /// Re-derive the bone forest from `snapshot`.
    ///
    /// An absent snapshot is a no-op: the armature keeps its last
    /// successfully built forest. On any error during the walk the previous
    /// forest stays intact; a partially built forest is never observable.
    pub fn rebuild(
        &mut self,
        snapshot: Option<&dyn SkeletonSnapshot>,
    ) -> Result<(), RebuildError> {
        let Some(snapshot) = snapshot else {
            return Ok(());
        };

        let forest = self.build_forest(snapshot)?;
        self.bones = forest.bones;
        self.partials = forest.partials;
        self.by_name = forest.by_name;

        tracing::info!(
            "{} -> rebuilt: {} bones over {} partial skeletons",
            self.id,
            self.bone_count(),
            self.partial_count(),
        );

        Ok(())
    }

    fn build_forest(&self, snapshot: &dyn SkeletonSnapshot) -> Result<Forest, RebuildError> {
        let mut forest = Forest {
            bones: Arena::new(),
            partials: Vec::with_capacity(snapshot.partial_count()),
            by_name: HashMap::default(),
        };

        for partial in 0..snapshot.partial_count() {
            let info = snapshot.partial(partial)?;
            if info.bone_count == 0 {
                return Err(SnapshotError::EmptyPartial(partial).into());
            }

            let mut ids: Vec<BoneId> = Vec::with_capacity(info.bone_count);

            for bone in 0..info.bone_count {
                let id = if bone == 0 && partial > 0 {
                    // The shared root: alias the already-built partial 0 bone
                    // this partial hangs off, never a fresh node.
                    let connected = info.connected_parent_index as usize;
                    *forest.partials[0].get(connected).ok_or(
                        RebuildError::ConnectionOutOfRange {
                            partial,
                            connected_parent_index: info.connected_parent_index,
                        },
                    )?
                } else {
                    let record = snapshot.bone(partial, bone)?;

                    let parent = match record.parent {
                        BONE_SENTINEL => None,
                        parent if (parent as usize) < bone => Some(ids[parent as usize]),
                        parent => {
                            return Err(RebuildError::ParentOutOfOrder {
                                partial,
                                bone,
                                parent,
                            });
                        }
                    };

                    match record.name {
                        Some(name) => {
                            let mut node = ModelBone::new(name, partial, bone, parent);
                            node.edit = self.profile.edit_for(&node.name).map(|edit| {
                                AttachedEdit {
                                    edit,
                                    flags: self.profile.flags_for(&node.name),
                                }
                            });
                            forest.insert(node)
                        }
                        None => forest.insert(ModelBone::placeholder(partial, bone, parent)),
                    }
                };

                ids.push(id);
            }

            forest.partials.push(ids);
        }

        Ok(forest)
    }
}
