//! Skeletal overlay for body tracking.
//!
//! Every frame the tracking session reports a body anchor with
//! root-relative joint transforms. [`Engine`] keeps a scene of joint
//! spheres and bone cylinders following that body.

pub mod bone;
pub mod config;
pub mod engine;
pub mod joint;
pub mod overlay;
pub mod primitive;
pub mod scene;
pub mod skeleton;
pub mod tracking;

pub use {
    self::{
        bone::{Bone, SkeletonBone},
        config::{Config, ConfigError, SkeletonConfig},
        engine::{Engine, System, SystemContext},
        joint::{
            JointCategory, JointStyle, SkeletonJoint, Tracking, JOINT_NAMES,
        },
        overlay::BodyOverlay,
        primitive::{Material, MeshCache, MeshData, Renderable, Shape},
        scene::{Global3, Local3, SceneSystem},
        skeleton::{BodySkeleton, SkeletonPart},
        tracking::{Anchor, AnchorId, BodyAnchor, JointTransforms, SkeletonPose},
    },
    hecs,
    nalgebra as na,
};
