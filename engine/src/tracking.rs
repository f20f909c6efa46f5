//! Data handed over by the body-tracking session on every frame.

use {nalgebra as na, std::collections::HashMap};

/// Identifier of an anchor, stable for the lifetime of what it tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(pub u64);

/// Lookup of root-relative joint transforms by canonical joint name.
pub trait SkeletonPose {
    /// Transform of the joint relative to the skeleton root,
    /// `None` if the sensor has no estimate for it this frame.
    fn model_transform(&self, joint: &str) -> Option<na::Matrix4<f32>>;
}

/// Joint transforms keyed by joint name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JointTransforms {
    transforms: HashMap<String, na::Matrix4<f32>>,
}

impl JointTransforms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, joint: impl Into<String>, tr: na::Matrix4<f32>) {
        self.transforms.insert(joint.into(), tr);
    }

    pub fn remove(&mut self, joint: &str) -> Option<na::Matrix4<f32>> {
        self.transforms.remove(joint)
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl SkeletonPose for JointTransforms {
    fn model_transform(&self, joint: &str) -> Option<na::Matrix4<f32>> {
        self.transforms.get(joint).copied()
    }
}

impl<S> std::iter::FromIterator<(S, na::Matrix4<f32>)> for JointTransforms
where
    S: Into<String>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (S, na::Matrix4<f32>)>,
    {
        JointTransforms {
            transforms: iter
                .into_iter()
                .map(|(name, tr)| (name.into(), tr))
                .collect(),
        }
    }
}

/// Detected human body.
#[derive(Clone, Debug)]
pub struct BodyAnchor<P = JointTransforms> {
    pub id: AnchorId,

    /// World transform of the skeleton root (hips).
    pub transform: na::Matrix4<f32>,

    pub skeleton: P,
}

impl<P> BodyAnchor<P>
where
    P: SkeletonPose,
{
    pub fn root_position(&self) -> na::Point3<f32> {
        translation(&self.transform)
    }

    /// World position and orientation of a joint.
    pub fn joint_transform(
        &self,
        joint: &str,
    ) -> Option<(na::Point3<f32>, na::UnitQuaternion<f32>)> {
        let model = self.skeleton.model_transform(joint)?;
        let offset = translation(&model).coords;
        Some((self.root_position() + offset, rotation(&model)))
    }

    /// World position of a joint.
    pub fn joint_position(&self, joint: &str) -> Option<na::Point3<f32>> {
        let model = self.skeleton.model_transform(joint)?;
        Some(self.root_position() + translation(&model).coords)
    }
}

/// Anything the tracking session reports.
#[derive(Clone, Debug)]
pub enum Anchor<P = JointTransforms> {
    Body(BodyAnchor<P>),

    /// Planes, images, faces and the like. Not drawn.
    Other { id: AnchorId, kind: String },
}

impl<P> Anchor<P> {
    pub fn id(&self) -> AnchorId {
        match self {
            Anchor::Body(body) => body.id,
            Anchor::Other { id, .. } => *id,
        }
    }

    pub fn as_body(&self) -> Option<&BodyAnchor<P>> {
        match self {
            Anchor::Body(body) => Some(body),
            Anchor::Other { .. } => None,
        }
    }
}

/// Translation column of an affine transform.
pub fn translation(m: &na::Matrix4<f32>) -> na::Point3<f32> {
    na::Point3::from(m.column(3).xyz())
}

/// Rotational part of an affine transform, with any scale stripped.
pub fn rotation(m: &na::Matrix4<f32>) -> na::UnitQuaternion<f32> {
    let axes = [
        m.column(0).xyz(),
        m.column(1).xyz(),
        m.column(2).xyz(),
    ];

    if axes.iter().any(|axis| axis.norm() <= f32::EPSILON) {
        return na::UnitQuaternion::identity();
    }

    let basis = na::Matrix3::from_columns(&[
        axes[0].normalize(),
        axes[1].normalize(),
        axes[2].normalize(),
    ]);

    na::UnitQuaternion::from_rotation_matrix(
        &na::Rotation3::from_matrix_unchecked(basis),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "{} != {}", a, b);
    }

    #[test]
    fn joint_position_is_offset_plus_root() {
        let mut skeleton = JointTransforms::new();
        skeleton.insert(
            "head_joint",
            na::Matrix4::new_translation(&na::Vector3::new(0.0, 0.6, 0.1)),
        );

        let root = na::Isometry3::new(
            na::Vector3::new(1.0, 1.0, -2.0),
            na::Vector3::y() * std::f32::consts::FRAC_PI_2,
        );

        let body = BodyAnchor {
            id: AnchorId(1),
            transform: root.to_homogeneous(),
            skeleton,
        };

        // Root rotation is not applied to the offset.
        let head = body.joint_position("head_joint").unwrap();
        assert_close(head.x, 1.0);
        assert_close(head.y, 1.6);
        assert_close(head.z, -1.9);

        assert!(body.joint_position("nose_joint").is_none());
    }

    #[test]
    fn rotation_is_extracted_without_scale() {
        let rot = na::UnitQuaternion::from_euler_angles(0.3, -0.2, 1.1);
        let m = na::Isometry3::from_parts(
            na::Translation3::new(0.5, 0.0, 0.0),
            rot,
        )
        .to_homogeneous()
            * na::Matrix4::new_scaling(2.5);

        let extracted = rotation(&m);
        assert!(extracted.angle_to(&rot) < 1e-4);
        assert_close(translation(&m).x, 0.5);
    }

    #[test]
    fn joint_transform_reports_joint_rotation() {
        let rot = na::UnitQuaternion::from_euler_angles(0.0, 0.0, 0.7);
        let skeleton: JointTransforms = vec![(
            "left_hand_joint",
            na::Isometry3::from_parts(na::Translation3::new(0.3, 0.2, 0.0), rot)
                .to_homogeneous(),
        )]
        .into_iter()
        .collect();

        let body = BodyAnchor {
            id: AnchorId(7),
            transform: na::Matrix4::new_translation(&na::Vector3::new(
                0.0, 1.0, 0.0,
            )),
            skeleton,
        };

        let (position, orientation) =
            body.joint_transform("left_hand_joint").unwrap();
        assert_close(position.x, 0.3);
        assert_close(position.y, 1.2);
        assert!(orientation.angle_to(&rot) < 1e-4);
    }

    #[test]
    fn anchor_kinds() {
        let other: Anchor = Anchor::Other {
            id: AnchorId(3),
            kind: "plane".to_owned(),
        };
        assert_eq!(other.id(), AnchorId(3));
        assert!(other.as_body().is_none());
    }
}
