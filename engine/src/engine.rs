use {
    crate::{
        config::SkeletonConfig,
        overlay::BodyOverlay,
        scene::{Global3, SceneSystem},
        tracking::{Anchor, SkeletonPose},
    },
    bumpalo::Bump,
    hecs::{Entity, World},
};

pub struct SystemContext<'a> {
    pub world: &'a mut World,
    pub bump: &'a Bump,
}

pub trait System {
    fn run(&mut self, ctx: SystemContext<'_>);
}

impl<F> System for F
where
    F: FnMut(SystemContext<'_>),
{
    fn run(&mut self, ctx: SystemContext<'_>) {
        self(ctx)
    }
}

/// Root data structure of the overlay.
///
/// Owns the scene, the skeleton attached to it and the systems
/// run once per frame.
pub struct Engine {
    pub world: World,
    pub overlay: BodyOverlay,
    anchor: Entity,
    schedule: Vec<Box<dyn System>>,
    bump: Bump,
}

impl Engine {
    pub fn new(config: SkeletonConfig) -> Self {
        let mut world = World::new();
        let anchor = world.spawn((Global3::identity(),));

        let mut engine = Engine {
            world,
            overlay: BodyOverlay::new(anchor, config),
            anchor,
            schedule: Vec::new(),
            bump: Bump::new(),
        };
        engine.add_system(SceneSystem);
        engine
    }

    /// Entity the skeleton is attached to.
    pub fn anchor(&self) -> Entity {
        self.anchor
    }

    /// Adds a system to this engine.
    /// Systems run in the order they were added.
    pub fn add_system<S>(&mut self, system: S) -> &mut Self
    where
        S: System + 'static,
    {
        self.schedule.push(Box::new(system));
        self
    }

    /// Tracking session reported new or changed anchors.
    pub fn session_did_update<P>(&mut self, anchors: &[Anchor<P>])
    where
        P: SkeletonPose,
    {
        self.overlay.session_did_update(&mut self.world, anchors);
    }

    /// Tracking session stopped tracking anchors.
    pub fn session_did_remove<P>(&mut self, anchors: &[Anchor<P>]) {
        self.overlay.session_did_remove(&mut self.world, anchors);
    }

    pub fn advance(&mut self) {
        for system in &mut self.schedule {
            system.run(SystemContext {
                world: &mut self.world,
                bump: &self.bump,
            });
        }

        self.bump.reset();
    }
}
