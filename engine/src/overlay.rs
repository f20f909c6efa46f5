use {
    crate::{
        config::SkeletonConfig,
        primitive::MeshCache,
        skeleton::BodySkeleton,
        tracking::{Anchor, SkeletonPose},
    },
    hecs::{Entity, World},
};

/// Keeps the skeleton overlay in sync with tracking session callbacks.
///
/// Skeleton is spawned on first body update, moved on every following
/// one and despawned when its anchor is removed.
#[derive(Debug)]
pub struct BodyOverlay {
    anchor: Entity,
    config: SkeletonConfig,
    meshes: MeshCache,
    skeleton: Option<BodySkeleton>,
}

impl BodyOverlay {
    pub fn new(anchor: Entity, config: SkeletonConfig) -> Self {
        BodyOverlay {
            anchor,
            meshes: MeshCache::new(config.mesh_detail),
            config,
            skeleton: None,
        }
    }

    pub fn skeleton(&self) -> Option<&BodySkeleton> {
        self.skeleton.as_ref()
    }

    pub fn meshes(&self) -> &MeshCache {
        &self.meshes
    }

    pub fn session_did_update<P>(
        &mut self,
        world: &mut World,
        anchors: &[Anchor<P>],
    ) where
        P: SkeletonPose,
    {
        for anchor in anchors {
            let body = match anchor {
                Anchor::Body(body) => body,
                Anchor::Other { id, kind } => {
                    tracing::debug!(
                        "Anchor {:?} ({}) is not a body, ignored",
                        id,
                        kind
                    );
                    continue;
                }
            };

            match &self.skeleton {
                Some(skeleton) => skeleton.update(world, body),
                None => {
                    self.skeleton = Some(BodySkeleton::spawn(
                        world,
                        self.anchor,
                        body,
                        &self.config,
                        &mut self.meshes,
                    ));
                }
            }
        }
    }

    pub fn session_did_remove<P>(
        &mut self,
        world: &mut World,
        anchors: &[Anchor<P>],
    ) {
        let tracked = match &self.skeleton {
            Some(skeleton) => skeleton.anchor(),
            None => return,
        };

        let lost = anchors.iter().any(|anchor| {
            anchor.as_body().map(|body| body.id) == Some(tracked)
        });

        if lost {
            if let Some(skeleton) = self.skeleton.take() {
                skeleton.despawn(world);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            bone::Bone,
            joint::JOINT_NAMES,
            primitive::Renderable,
            scene::Global3,
            tracking::{AnchorId, BodyAnchor, JointTransforms},
        },
        nalgebra as na,
    };

    fn body(id: u64, root: na::Vector3<f32>) -> Anchor {
        Anchor::Body(BodyAnchor {
            id: AnchorId(id),
            transform: na::Matrix4::new_translation(&root),
            skeleton: JOINT_NAMES
                .iter()
                .map(|&name| (name, na::Matrix4::identity()))
                .collect::<JointTransforms>(),
        })
    }

    fn plane(id: u64) -> Anchor {
        Anchor::Other {
            id: AnchorId(id),
            kind: "plane".to_owned(),
        }
    }

    fn setup() -> (World, BodyOverlay) {
        let mut world = World::new();
        let anchor = world.spawn((Global3::identity(),));
        (world, BodyOverlay::new(anchor, SkeletonConfig::default()))
    }

    fn renderables(world: &World) -> usize {
        world.query::<&Renderable>().iter().count()
    }

    #[test]
    fn skeleton_is_created_lazily_once() {
        let (mut world, mut overlay) = setup();
        assert!(overlay.skeleton().is_none());

        overlay.session_did_update(
            &mut world,
            &[body(1, na::Vector3::zeros())],
        );
        let skeleton = overlay.skeleton().unwrap().entity();
        assert_eq!(renderables(&world), JOINT_NAMES.len() + Bone::ALL.len());

        overlay.session_did_update(&mut world, &[body(1, na::Vector3::x())]);
        assert_eq!(overlay.skeleton().unwrap().entity(), skeleton);
        assert_eq!(renderables(&world), JOINT_NAMES.len() + Bone::ALL.len());
    }

    #[test]
    fn non_body_anchors_are_skipped() {
        let (mut world, mut overlay) = setup();

        overlay.session_did_update(&mut world, &[plane(5)]);
        assert!(overlay.skeleton().is_none());
        assert_eq!(renderables(&world), 0);

        // Body after a foreign anchor in the same batch is still handled.
        overlay.session_did_update(
            &mut world,
            &[plane(5), body(2, na::Vector3::zeros())],
        );
        assert!(overlay.skeleton().is_some());
    }

    #[test]
    fn removing_tracked_body_despawns_skeleton() {
        let (mut world, mut overlay) = setup();
        overlay.session_did_update(
            &mut world,
            &[body(1, na::Vector3::zeros())],
        );

        overlay.session_did_remove(
            &mut world,
            &[plane(5), body(9, na::Vector3::zeros())],
        );
        assert!(overlay.skeleton().is_some());

        overlay.session_did_remove(
            &mut world,
            &[body(1, na::Vector3::zeros())],
        );
        assert!(overlay.skeleton().is_none());
        assert_eq!(renderables(&world), 0);

        overlay.session_did_update(
            &mut world,
            &[body(3, na::Vector3::zeros())],
        );
        assert_eq!(overlay.skeleton().unwrap().anchor(), AnchorId(3));
        assert_eq!(renderables(&world), JOINT_NAMES.len() + Bone::ALL.len());
    }

    #[test]
    fn meshes_are_shared_between_joints() {
        let (mut world, mut overlay) = setup();
        overlay.session_did_update(
            &mut world,
            &[body(1, na::Vector3::zeros())],
        );

        // One sphere per distinct joint radius plus the bone cylinder.
        assert_eq!(overlay.meshes().len(), 6);
    }
}
