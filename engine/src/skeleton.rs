use {
    crate::{
        bone::{Bone, SkeletonBone},
        config::SkeletonConfig,
        joint::{JointStyle, SkeletonJoint, Tracking, JOINT_NAMES},
        primitive::{Material, MeshCache, Renderable, Shape},
        scene::{Global3, Local3},
        tracking::{AnchorId, BodyAnchor, SkeletonPose},
    },
    hecs::{Entity, World},
    std::collections::HashMap,
};

/// Marks every entity spawned for a skeleton.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkeletonPart {
    pub skeleton: Entity,
}

/// Visual overlay of a single tracked body.
///
/// Joints are drawn as spheres and bones as cylinders, all children of
/// one skeleton entity. Every entity is created once by [`spawn`] and
/// only moved afterwards.
///
/// [`spawn`]: BodySkeleton::spawn
#[derive(Debug)]
pub struct BodySkeleton {
    entity: Entity,
    anchor: AnchorId,
    joints: HashMap<&'static str, Entity>,
    bones: HashMap<Bone, Entity>,
    stretch_bones: bool,
}

impl BodySkeleton {
    /// Creates primitives for every known joint and bone under `parent`
    /// and places them according to the body's current pose.
    pub fn spawn<P>(
        world: &mut World,
        parent: Entity,
        body: &BodyAnchor<P>,
        config: &SkeletonConfig,
        meshes: &mut MeshCache,
    ) -> Self
    where
        P: SkeletonPose,
    {
        let entity =
            world.spawn((Local3::identity(parent), Global3::identity()));
        let part = SkeletonPart { skeleton: entity };

        let joints = JOINT_NAMES
            .iter()
            .map(|&name| {
                let style = JointStyle::of(name);
                let shape = Shape::sphere(style.radius(config.joint_radius));
                let color = match style.tracking {
                    Tracking::Tracked => config.tracked_color(),
                    Tracking::Interpolated => config.interpolated_color(),
                };

                let joint = world.spawn((
                    Renderable {
                        shape,
                        mesh: meshes.get(shape),
                        material: Material::new(
                            color,
                            config.joint_roughness,
                            false,
                        ),
                        // Shown once the sensor reports it.
                        visible: false,
                    },
                    Local3::identity(entity),
                    Global3::identity(),
                    part,
                ));
                (name, joint)
            })
            .collect();

        let bone_shape = if config.stretch_bones {
            Shape::cylinder(config.bone_diameter / 2.0, 1.0)
        } else {
            Shape::cylinder(config.bone_diameter / 2.0, config.bone_diameter)
        };

        let bones = Bone::ALL
            .iter()
            .map(|&bone| {
                let bone_entity = world.spawn((
                    Renderable {
                        shape: bone_shape,
                        mesh: meshes.get(bone_shape),
                        material: Material::new(
                            config.bone_color(),
                            config.bone_roughness,
                            config.bone_metallic,
                        ),
                        // Shown once both ends are seen.
                        visible: false,
                    },
                    Local3::identity(entity),
                    Global3::identity(),
                    part,
                ));
                (bone, bone_entity)
            })
            .collect();

        let skeleton = BodySkeleton {
            entity,
            anchor: body.id,
            joints,
            bones,
            stretch_bones: config.stretch_bones,
        };

        tracing::info!(
            "Body {:?} detected, skeleton spawned with {} joints and {} bones",
            body.id,
            skeleton.joints.len(),
            skeleton.bones.len()
        );

        skeleton.update(world, body);
        skeleton
    }

    /// Moves joints and bones to the body's current pose.
    ///
    /// Joints the sensor has no estimate for keep their last placement,
    /// as does every bone with such a joint at either end.
    pub fn update<P>(&self, world: &mut World, body: &BodyAnchor<P>)
    where
        P: SkeletonPose,
    {
        for (&name, &entity) in &self.joints {
            if let Some((position, orientation)) = body.joint_transform(name) {
                if let Ok(mut local) = world.get_mut::<Local3>(entity) {
                    local.set_position(position);
                    local.set_orientation(orientation);
                }
                if let Ok(mut renderable) = world.get_mut::<Renderable>(entity)
                {
                    renderable.visible = true;
                }
            }
        }

        let mut skipped = 0;
        for (&bone, &entity) in &self.bones {
            let skeleton_bone = match skeleton_bone(bone, body) {
                Some(skeleton_bone) => skeleton_bone,
                None => {
                    skipped += 1;
                    continue;
                }
            };

            if let Ok(mut local) = world.get_mut::<Local3>(entity) {
                local.set_position(skeleton_bone.center());
                if let Some(orientation) = skeleton_bone.orientation() {
                    local.set_orientation(orientation);
                }
                if self.stretch_bones {
                    local.scale.z = skeleton_bone.length();
                }
            }

            if let Ok(mut renderable) = world.get_mut::<Renderable>(entity) {
                renderable.visible = true;
            }
        }

        tracing::trace!(
            "Body {:?} updated, {} bones skipped",
            body.id,
            skipped
        );
    }

    /// Removes every entity of this skeleton from the world.
    pub fn despawn(self, world: &mut World) {
        let parts: Vec<Entity> = world
            .query::<&SkeletonPart>()
            .iter()
            .filter(|(_, part)| part.skeleton == self.entity)
            .map(|(entity, _)| entity)
            .collect();

        for entity in parts {
            let _ = world.despawn(entity);
        }
        let _ = world.despawn(self.entity);

        tracing::info!("Body {:?} lost, skeleton despawned", self.anchor);
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Anchor this skeleton was created for.
    pub fn anchor(&self) -> AnchorId {
        self.anchor
    }

    pub fn joint(&self, name: &str) -> Option<Entity> {
        self.joints.get(name).copied()
    }

    pub fn bone(&self, bone: Bone) -> Option<Entity> {
        self.bones.get(&bone).copied()
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }
}

/// Resolves both bone ends to world space.
///
/// `None` if the sensor misses either joint.
pub fn skeleton_bone<P>(
    bone: Bone,
    body: &BodyAnchor<P>,
) -> Option<SkeletonBone<'static>>
where
    P: SkeletonPose,
{
    let (from, to) = bone.joints();
    Some(SkeletonBone {
        from: SkeletonJoint {
            name: from,
            position: body.joint_position(from)?,
        },
        to: SkeletonJoint {
            name: to,
            position: body.joint_position(to)?,
        },
    })
}

#[cfg(test)]
mod tests {
    use {super::*, crate::tracking::JointTransforms, nalgebra as na};

    fn offset(x: f32, y: f32, z: f32) -> na::Matrix4<f32> {
        na::Matrix4::new_translation(&na::Vector3::new(x, y, z))
    }

    fn body(skeleton: JointTransforms) -> BodyAnchor {
        BodyAnchor {
            id: AnchorId(1),
            transform: offset(0.0, 1.0, -2.0),
            skeleton,
        }
    }

    fn full_pose() -> JointTransforms {
        JOINT_NAMES
            .iter()
            .enumerate()
            .map(|(i, &name)| {
                (name, offset(i as f32 * 0.01, i as f32 * 0.02, 0.0))
            })
            .collect()
    }

    fn spawn(world: &mut World, body: &BodyAnchor) -> BodySkeleton {
        let root = world.spawn((Global3::identity(),));
        let config = SkeletonConfig::default();
        let mut meshes = MeshCache::new(config.mesh_detail);
        BodySkeleton::spawn(world, root, body, &config, &mut meshes)
    }

    fn renderables(world: &World) -> usize {
        world.query::<&Renderable>().iter().count()
    }

    #[test]
    fn spawn_creates_one_primitive_per_joint_and_bone() {
        let mut world = World::new();
        let body = body(full_pose());
        let skeleton = spawn(&mut world, &body);

        assert_eq!(skeleton.joint_count(), JOINT_NAMES.len());
        assert_eq!(skeleton.bone_count(), Bone::ALL.len());
        assert_eq!(renderables(&world), JOINT_NAMES.len() + Bone::ALL.len());

        skeleton.update(&mut world, &body);
        skeleton.update(&mut world, &body);
        assert_eq!(renderables(&world), JOINT_NAMES.len() + Bone::ALL.len());
    }

    #[test]
    fn joint_is_placed_at_root_plus_offset() {
        let mut world = World::new();
        let mut pose = full_pose();
        let rotation = na::UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3);
        pose.insert(
            "head_joint",
            na::Isometry3::from_parts(
                na::Translation3::new(0.0, 0.7, 0.05),
                rotation,
            )
            .to_homogeneous(),
        );
        let skeleton = spawn(&mut world, &body(pose));

        let head = skeleton.joint("head_joint").unwrap();
        let local = *world.get::<Local3>(head).unwrap();
        let expected = na::Point3::new(0.0, 1.7, -1.95);
        assert!((local.position() - expected).norm() < 1e-5);
        assert!(local.orientation().angle_to(&rotation) < 1e-4);
    }

    #[test]
    fn bone_is_centered_and_stretched() {
        let mut world = World::new();
        let mut pose = full_pose();
        pose.insert("left_arm_joint", offset(0.2, 0.4, 0.0));
        pose.insert("left_forearm_joint", offset(0.5, 0.0, 0.0));
        let body = body(pose);
        let skeleton = spawn(&mut world, &body);

        let entity = skeleton.bone(Bone::LeftArmToLeftForearm).unwrap();
        let local = *world.get::<Local3>(entity).unwrap();

        let from = body.joint_position("left_arm_joint").unwrap();
        let to = body.joint_position("left_forearm_joint").unwrap();
        assert!((local.position() - na::center(&from, &to)).norm() < 1e-5);
        assert!((local.scale.z - na::distance(&from, &to)).abs() < 1e-5);
        assert!((local.scale.z - 0.5).abs() < 1e-5);

        let axis = local.orientation() * na::Vector3::z();
        assert!((axis - (to - from).normalize()).norm() < 1e-5);
        assert!(world.get::<Renderable>(entity).unwrap().visible);
    }

    #[test]
    fn bone_with_missing_end_keeps_previous_state() {
        let mut world = World::new();
        let mut pose = full_pose();
        let skeleton = spawn(&mut world, &body(pose.clone()));

        let entity = skeleton.bone(Bone::LeftLegToLeftFoot).unwrap();
        let before = *world.get::<Local3>(entity).unwrap();

        pose.remove("left_foot_joint");
        pose.insert("left_leg_joint", offset(3.0, 3.0, 3.0));
        skeleton.update(&mut world, &body(pose));

        assert_eq!(*world.get::<Local3>(entity).unwrap(), before);

        // The other bone at the moved joint follows it.
        let upper = skeleton.bone(Bone::LeftUpLegToLeftLeg).unwrap();
        let upper = *world.get::<Local3>(upper).unwrap();
        assert_ne!(upper.position(), before.position());
    }

    #[test]
    fn bones_unresolved_at_spawn_start_hidden() {
        let mut world = World::new();
        let mut pose = full_pose();
        pose.remove("right_hand_joint");
        let skeleton = spawn(&mut world, &body(pose.clone()));

        let hand = skeleton.bone(Bone::RightForearmToRightHand).unwrap();
        assert!(!world.get::<Renderable>(hand).unwrap().visible);
        assert_eq!(renderables(&world), JOINT_NAMES.len() + Bone::ALL.len());

        pose.insert("right_hand_joint", offset(0.9, 1.0, 0.0));
        skeleton.update(&mut world, &body(pose));
        assert!(world.get::<Renderable>(hand).unwrap().visible);
    }

    #[test]
    fn joints_unresolved_at_spawn_start_hidden() {
        let mut world = World::new();
        let mut pose = full_pose();
        pose.remove("left_hand_joint");
        let skeleton = spawn(&mut world, &body(pose.clone()));

        let hand = skeleton.joint("left_hand_joint").unwrap();
        assert!(!world.get::<Renderable>(hand).unwrap().visible);
        let hips = skeleton.joint("hips_joint").unwrap();
        assert!(world.get::<Renderable>(hips).unwrap().visible);

        pose.insert("left_hand_joint", offset(0.7, 0.45, 0.0));
        skeleton.update(&mut world, &body(pose));

        let local = *world.get::<Local3>(hand).unwrap();
        let expected = na::Point3::new(0.7, 1.45, -2.0);
        assert!((local.position() - expected).norm() < 1e-5);
        assert!(world.get::<Renderable>(hand).unwrap().visible);
    }

    #[test]
    fn joint_styles_drive_materials() {
        let mut world = World::new();
        let skeleton = spawn(&mut world, &body(full_pose()));
        let config = SkeletonConfig::default();

        let toe = skeleton.joint("left_toes_joint").unwrap();
        let toe = world.get::<Renderable>(toe).unwrap();
        assert_eq!(toe.shape, Shape::sphere(0.05 * 0.5));
        assert_eq!(toe.material.albedo, config.interpolated_color());

        let hips = skeleton.joint("hips_joint").unwrap();
        let hips = world.get::<Renderable>(hips).unwrap();
        assert_eq!(hips.shape, Shape::sphere(0.05));
        assert_eq!(hips.material.albedo, config.tracked_color());
        assert!(!hips.material.metallic);
    }

    #[test]
    fn despawn_removes_everything() {
        let mut world = World::new();
        let skeleton = spawn(&mut world, &body(full_pose()));
        let entity = skeleton.entity();
        let other = spawn(&mut world, &body(full_pose()));

        skeleton.despawn(&mut world);

        assert_eq!(renderables(&world), JOINT_NAMES.len() + Bone::ALL.len());
        assert!(world.entity(entity).is_err());

        other.despawn(&mut world);
        assert_eq!(renderables(&world), 0);
    }
}
