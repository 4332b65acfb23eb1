use crate::{
    armature::Armature,
    bone::{BoneId, ModelBone},
    edit::{ApplyFlags, BoneEdit},
    host::HostPose,
    mirror::mirrored_name,
    transform::Transform,
};

impl Armature {
    /// Apply every bone's attached edit onto the host pose.
    ///
    /// Bones are visited partial by partial in bone-index order, which the
    /// host guarantees lists parents before children; a propagated edit is
    /// therefore always composed before any of the affected descendants get
    /// their own edits applied. Shared roots are applied once, through their
    /// partial 0 coordinates.
    pub fn apply_all(&mut self, pose: &mut dyn HostPose) {
        if !self.is_built() || !self.is_visible {
            return;
        }

        // The snap override is editor-scoped; drop it as soon as the profile
        // is no longer the one open for editing.
        if self.snap_to_reference && !self.profile.is_open_in_editor() {
            self.snap_to_reference = false;
        }
        let snap = self.snap_to_reference;

        for (partial, ids) in self.partials.iter().enumerate() {
            for (index, &id) in ids.iter().enumerate() {
                if partial > 0 && index == 0 {
                    // Shared root, already applied as part of partial 0.
                    continue;
                }
                self.apply_bone(pose, id, snap);
            }
        }
    }

    fn apply_bone(&self, pose: &mut dyn HostPose, id: BoneId, snap: bool) {
        let Some(bone) = self.bones.get(id) else {
            return;
        };

        match bone.edit {
            Some(attached) => self.apply_edit(pose, bone, &attached.edit, attached.flags, snap),
            None if snap => {
                // Snapping also pulls unedited bones back to the reference
                // pose while the editor has the profile open.
                let (partial, index) = (bone.partial_index, bone.bone_index);
                if let Some(current) = pose.model_transform(partial, index)
                    && let Some(reference) = pose.reference_transform(partial, index)
                    && reference != current
                {
                    pose.set_model_transform(partial, index, reference);
                }
            }
            None => {}
        }
    }

    /// Compose `edit` onto the bone's live transform and write it back,
    /// honoring propagation and mirroring. Stale coordinates make the whole
    /// operation a no-op for that bone; we never write through coordinates
    /// the host no longer recognizes.
    fn apply_edit(
        &self,
        pose: &mut dyn HostPose,
        bone: &ModelBone,
        edit: &BoneEdit,
        flags: ApplyFlags,
        snap: bool,
    ) {
        let (partial, index) = (bone.partial_index, bone.bone_index);
        let Some(current) = pose.model_transform(partial, index) else {
            return;
        };
        let base = if snap {
            pose.reference_transform(partial, index).unwrap_or(current)
        } else {
            current
        };

        let edited = edit.compose_onto(&base);
        if !pose.set_model_transform(partial, index, edited) {
            return;
        }

        if flags.contains(ApplyFlags::PROPAGATE) {
            self.propagate_delta(pose, bone, edit, &base, &edited);
        }

        if flags.contains(ApplyFlags::MIRROR)
            && let Some(counterpart_name) = mirrored_name(&bone.name)
            && let Some(counterpart) = self.bone_named(&counterpart_name)
        {
            self.apply_edit(
                pose,
                counterpart,
                &edit.mirrored(),
                flags.difference(ApplyFlags::MIRROR),
                snap,
            );
        }
    }

    /// Carry the anchor bone's delta rigidly onto its whole subtree: each
    /// descendant's offset from the anchor is rotated (and scaled) by the
    /// model-space delta and re-anchored at the edited position, so moving a
    /// limb root moves the limb as one piece.
    ///
    /// Descendant transforms only depend on their own pre-edit state and the
    /// anchor's, so visit order within the subtree does not matter.
    fn propagate_delta(
        &self,
        pose: &mut dyn HostPose,
        anchor: &ModelBone,
        edit: &BoneEdit,
        base: &Transform,
        edited: &Transform,
    ) {
        let delta_rotation = (edited.rotation * base.rotation.inverse()).normalize();

        let mut pending: Vec<BoneId> = anchor.children.clone();
        while let Some(id) = pending.pop() {
            let Some(bone) = self.bones.get(id) else {
                continue;
            };
            pending.extend_from_slice(&bone.children);

            let (partial, index) = (bone.partial_index, bone.bone_index);
            let Some(current) = pose.model_transform(partial, index) else {
                continue;
            };

            let offset = current.translation - base.translation;
            let carried = Transform {
                translation: edited.translation + delta_rotation * (offset * edit.scale),
                rotation: (delta_rotation * current.rotation).normalize(),
                scale: current.scale * edit.scale,
            };
            pose.set_model_transform(partial, index, carried);
        }
    }
}
