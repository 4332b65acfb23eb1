use crate::edit::{ApplyFlags, BoneEdit};

/// The per-character configuration store, owned by the configuration layer.
///
/// The armature holds a shared handle to a profile and reads it during
/// rebuild (to attach edits by bone name) and when deciding which live object
/// it applies to. It never writes through this trait.
pub trait Profile {
    /// The edit the user authored for `bone_name`, if any.
    fn edit_for(&self, bone_name: &str) -> Option<BoneEdit>;

    /// How the edit for `bone_name` should be applied.
    fn flags_for(&self, bone_name: &str) -> ApplyFlags {
        let _ = bone_name;
        ApplyFlags::empty()
    }

    /// Whether this profile applies to the live object called `object_name`.
    fn applies_to(&self, object_name: &str) -> bool;

    /// Whether this profile is the one currently open for editing.
    fn is_open_in_editor(&self) -> bool {
        false
    }
}
