use {
    crate::engine::{System, SystemContext},
    ahash::RandomState,
    bumpalo::collections::Vec as BVec,
    hecs::{ComponentError, Entity, World},
    nalgebra as na,
    std::collections::HashSet,
};

/// Placement of an entity relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Local3 {
    pub parent: Entity,
    pub iso: na::Isometry3<f32>,
    pub scale: na::Vector3<f32>,
}

impl Local3 {
    pub fn identity(parent: Entity) -> Self {
        Local3 {
            parent,
            iso: na::Isometry3::identity(),
            scale: na::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn from_iso(parent: Entity, iso: na::Isometry3<f32>) -> Self {
        Local3 {
            parent,
            iso,
            scale: na::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn position(&self) -> na::Point3<f32> {
        na::Point3::from(self.iso.translation.vector)
    }

    pub fn set_position(&mut self, position: na::Point3<f32>) {
        self.iso.translation.vector = position.coords;
    }

    pub fn orientation(&self) -> na::UnitQuaternion<f32> {
        self.iso.rotation
    }

    pub fn set_orientation(&mut self, rotation: na::UnitQuaternion<f32>) {
        self.iso.rotation = rotation;
    }
}

/// World placement of an entity.
///
/// Non-uniform scale under rotation is kept in `skew`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Global3 {
    pub iso: na::Isometry3<f32>,
    pub skew: na::Matrix3<f32>,
}

impl Global3 {
    pub fn identity() -> Self {
        Global3 {
            iso: na::Isometry3::identity(),
            skew: na::Matrix3::identity(),
        }
    }

    pub fn from_iso(iso: na::Isometry3<f32>) -> Self {
        Global3 {
            iso,
            skew: na::Matrix3::identity(),
        }
    }

    pub fn append_local(&self, local: &Local3) -> Self {
        let total = self.to_homogeneous()
            * local.iso.to_homogeneous()
            * na::Matrix4::new_nonuniform_scaling(&local.scale);
        let rotation = self.iso.rotation * local.iso.rotation;

        let translation = total.column(3).xyz();
        let rotskew = total.remove_column(3).remove_row(3);
        let skew = rotation.inverse().to_rotation_matrix() * rotskew;

        Global3 {
            iso: na::Isometry3::from_parts(translation.into(), rotation),
            skew,
        }
    }

    pub fn position(&self) -> na::Point3<f32> {
        na::Point3::from(self.iso.translation.vector)
    }

    pub fn to_homogeneous(&self) -> na::Matrix4<f32> {
        self.iso.to_homogeneous() * self.skew.to_homogeneous()
    }
}

/// Propagates `Local3` down the hierarchy into `Global3`.
///
/// Entities whose parent was despawned are despawned as well.
pub struct SceneSystem;

type Updated = HashSet<Entity, RandomState>;

impl System for SceneSystem {
    fn run(&mut self, ctx: SystemContext<'_>) {
        let mut nodes = BVec::new_in(ctx.bump);
        nodes.extend(
            ctx.world
                .query::<&Local3>()
                .with::<Global3>()
                .iter()
                .map(|(entity, local)| (entity, *local)),
        );

        let mut updated = Updated::with_hasher(RandomState::new());
        let mut resolving = Updated::with_hasher(RandomState::new());
        let mut despawn = BVec::new_in(ctx.bump);

        for (entity, local) in nodes.iter() {
            if !updated.contains(entity) {
                update_global(
                    *entity,
                    local,
                    ctx.world,
                    &mut updated,
                    &mut resolving,
                    &mut despawn,
                );
            }
        }

        for entity in despawn {
            let _ = ctx.world.despawn(entity);
        }
    }
}

/// Computes `Global3` of `entity`, resolving its ancestors first.
///
/// `resolving` holds the chain currently being walked. Meeting one of
/// those again means the hierarchy has a cycle.
fn update_global(
    entity: Entity,
    local: &Local3,
    world: &World,
    updated: &mut Updated,
    resolving: &mut Updated,
    despawn: &mut BVec<'_, Entity>,
) -> Option<Global3> {
    resolving.insert(entity);
    let parent_global =
        parent_global(entity, local, world, updated, resolving, despawn);
    resolving.remove(&entity);
    updated.insert(entity);

    let global = match parent_global {
        Some(parent_global) => parent_global.append_local(local),
        None => {
            despawn.push(entity);
            return None;
        }
    };

    if let Ok(mut global_ref) = world.get_mut::<Global3>(entity) {
        *global_ref = global;
    }
    Some(global)
}

fn parent_global(
    entity: Entity,
    local: &Local3,
    world: &World,
    updated: &mut Updated,
    resolving: &mut Updated,
    despawn: &mut BVec<'_, Entity>,
) -> Option<Global3> {
    let parent = local.parent;

    let parent_local = match world.get::<Local3>(parent) {
        Ok(parent_local) => Some(*parent_local),
        Err(ComponentError::MissingComponent(_)) => None,
        Err(ComponentError::NoSuchEntity) => return None,
    };

    match parent_local {
        Some(_) if resolving.contains(&parent) => {
            tracing::warn!(
                "Entity ({:?}) is its own ancestor and shall be despawned",
                entity
            );
            None
        }
        Some(_) if updated.contains(&parent) => {
            if despawn.contains(&parent) {
                return None;
            }
            world.get::<Global3>(parent).ok().map(|global| *global)
        }
        Some(parent_local) => update_global(
            parent,
            &parent_local,
            world,
            updated,
            resolving,
            despawn,
        ),
        None => match world.get::<Global3>(parent) {
            // Parent is a root node.
            Ok(global) => Some(*global),
            Err(_) => {
                tracing::warn!(
                    "Entity's ({:?}) parent is not in scene \
                     and shall be despawned",
                    entity
                );
                None
            }
        },
    }
}
