use crate::edit::AttachedEdit;

pub type BoneId = generational_arena::Index;

/// Sentinel name given to structural gaps in the host skeleton. Bones with
/// this name keep coordinate indexing dense but never carry edits and are
/// excluded from name lookups.
pub const UNNAMED_BONE: &str = "<unnamed>";

/// A single bone inside an armature's forest.
///
/// Uniquely positioned by (partial index, bone index), but possibly aliased:
/// a partial's shared root is the same instance as a bone of partial 0, and
/// keeps the partial 0 coordinates as its own.
#[derive(Clone, Debug)]
pub struct ModelBone {
    pub(crate) name: String,
    pub(crate) partial_index: usize,
    pub(crate) bone_index: usize,
    pub(crate) parent: Option<BoneId>,
    pub(crate) children: Vec<BoneId>,
    pub(crate) edit: Option<AttachedEdit>,
}

impl ModelBone {
    pub(crate) fn new(
        name: String,
        partial_index: usize,
        bone_index: usize,
        parent: Option<BoneId>,
    ) -> Self {
        Self {
            name,
            partial_index,
            bone_index,
            parent,
            children: Vec::new(),
            edit: None,
        }
    }

    pub(crate) fn placeholder(
        partial_index: usize,
        bone_index: usize,
        parent: Option<BoneId>,
    ) -> Self {
        Self::new(UNNAMED_BONE.to_string(), partial_index, bone_index, parent)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn partial_index(&self) -> usize {
        self.partial_index
    }

    pub fn bone_index(&self) -> usize {
        self.bone_index
    }

    pub fn parent(&self) -> Option<BoneId> {
        self.parent
    }

    /// Child bones, derived from the snapshot's parent-index relation at
    /// rebuild time. For a shared root this spans every partial that hangs
    /// off it.
    pub fn children(&self) -> &[BoneId] {
        &self.children
    }

    pub fn edit(&self) -> Option<&AttachedEdit> {
        self.edit.as_ref()
    }

    pub fn is_placeholder(&self) -> bool {
        self.name == UNNAMED_BONE
    }

    /// Replace the bone's current edit. Does not touch the host pose; the
    /// new edit takes effect on the next apply pass.
    pub fn update_edit(&mut self, edit: Option<AttachedEdit>) {
        self.edit = edit;
    }
}
