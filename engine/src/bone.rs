use {crate::joint::SkeletonJoint, nalgebra as na};

/// Bone segments drawn between pairs of skeleton joints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bone {
    LeftShoulderToLeftArm,
    LeftArmToLeftForearm,
    LeftForearmToLeftHand,

    RightShoulderToRightArm,
    RightArmToRightForearm,
    RightForearmToRightHand,

    Spine7ToLeftShoulder,
    Spine7ToRightShoulder,
    Neck1ToSpine7,
    Spine7ToSpine6,
    Spine6ToSpine5,

    HipsToLeftUpLeg,
    LeftUpLegToLeftLeg,
    LeftLegToLeftFoot,

    HipsToRightUpLeg,
    RightUpLegToRightLeg,
    RightLegToRightFoot,
}

impl Bone {
    pub const ALL: [Bone; 17] = [
        Bone::LeftShoulderToLeftArm,
        Bone::LeftArmToLeftForearm,
        Bone::LeftForearmToLeftHand,
        Bone::RightShoulderToRightArm,
        Bone::RightArmToRightForearm,
        Bone::RightForearmToRightHand,
        Bone::Spine7ToLeftShoulder,
        Bone::Spine7ToRightShoulder,
        Bone::Neck1ToSpine7,
        Bone::Spine7ToSpine6,
        Bone::Spine6ToSpine5,
        Bone::HipsToLeftUpLeg,
        Bone::LeftUpLegToLeftLeg,
        Bone::LeftLegToLeftFoot,
        Bone::HipsToRightUpLeg,
        Bone::RightUpLegToRightLeg,
        Bone::RightLegToRightFoot,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Bone::LeftShoulderToLeftArm => "left_shoulder_to_left_arm",
            Bone::LeftArmToLeftForearm => "left_arm_to_left_forearm",
            Bone::LeftForearmToLeftHand => "left_forearm_to_left_hand",
            Bone::RightShoulderToRightArm => "right_shoulder_to_right_arm",
            Bone::RightArmToRightForearm => "right_arm_to_right_forearm",
            Bone::RightForearmToRightHand => "right_forearm_to_right_hand",
            Bone::Spine7ToLeftShoulder => "spine7_to_left_shoulder",
            Bone::Spine7ToRightShoulder => "spine7_to_right_shoulder",
            Bone::Neck1ToSpine7 => "neck1_to_spine7",
            Bone::Spine7ToSpine6 => "spine7_to_spine6",
            Bone::Spine6ToSpine5 => "spine6_to_spine5",
            Bone::HipsToLeftUpLeg => "hips_to_left_up_leg",
            Bone::LeftUpLegToLeftLeg => "left_up_leg_to_left_leg",
            Bone::LeftLegToLeftFoot => "left_leg_to_left_foot",
            Bone::HipsToRightUpLeg => "hips_to_right_up_leg",
            Bone::RightUpLegToRightLeg => "right_up_leg_to_right_leg",
            Bone::RightLegToRightFoot => "right_leg_to_right_foot",
        }
    }

    /// Joint names of both bone ends, `(from, to)`.
    pub fn joints(self) -> (&'static str, &'static str) {
        match self {
            Bone::LeftShoulderToLeftArm => {
                ("left_shoulder_1_joint", "left_arm_joint")
            }
            Bone::LeftArmToLeftForearm => {
                ("left_arm_joint", "left_forearm_joint")
            }
            Bone::LeftForearmToLeftHand => {
                ("left_forearm_joint", "left_hand_joint")
            }
            Bone::RightShoulderToRightArm => {
                ("right_shoulder_1_joint", "right_arm_joint")
            }
            Bone::RightArmToRightForearm => {
                ("right_arm_joint", "right_forearm_joint")
            }
            Bone::RightForearmToRightHand => {
                ("right_forearm_joint", "right_hand_joint")
            }
            Bone::Spine7ToLeftShoulder => {
                ("spine_7_joint", "left_shoulder_1_joint")
            }
            Bone::Spine7ToRightShoulder => {
                ("spine_7_joint", "right_shoulder_1_joint")
            }
            Bone::Neck1ToSpine7 => ("neck_1_joint", "spine_7_joint"),
            Bone::Spine7ToSpine6 => ("spine_7_joint", "spine_6_joint"),
            Bone::Spine6ToSpine5 => ("spine_6_joint", "spine_5_joint"),
            Bone::HipsToLeftUpLeg => ("hips_joint", "left_upLeg_joint"),
            Bone::LeftUpLegToLeftLeg => ("left_upLeg_joint", "left_leg_joint"),
            Bone::LeftLegToLeftFoot => ("left_leg_joint", "left_foot_joint"),
            Bone::HipsToRightUpLeg => ("hips_joint", "right_upLeg_joint"),
            Bone::RightUpLegToRightLeg => {
                ("right_upLeg_joint", "right_leg_joint")
            }
            Bone::RightLegToRightFoot => {
                ("right_leg_joint", "right_foot_joint")
            }
        }
    }
}

/// Segment between two resolved joints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkeletonBone<'a> {
    pub from: SkeletonJoint<'a>,
    pub to: SkeletonJoint<'a>,
}

impl SkeletonBone<'_> {
    /// Midpoint between both joints.
    pub fn center(&self) -> na::Point3<f32> {
        na::center(&self.from.position, &self.to.position)
    }

    /// Straight line distance between both joints.
    pub fn length(&self) -> f32 {
        na::distance(&self.from.position, &self.to.position)
    }

    /// Rotation taking `+Z` onto the `from -> to` direction.
    ///
    /// Returns `None` when both joints coincide.
    pub fn orientation(&self) -> Option<na::UnitQuaternion<f32>> {
        let axis = self.to.position - self.from.position;
        if axis.norm() <= f32::EPSILON {
            return None;
        }

        let rotation = na::UnitQuaternion::rotation_between(
            &na::Vector3::z(),
            &axis,
        )
        .unwrap_or_else(|| {
            // Antiparallel to +Z: any half-turn around a perpendicular axis.
            na::UnitQuaternion::from_axis_angle(
                &na::Vector3::x_axis(),
                std::f32::consts::PI,
            )
        });

        Some(rotation)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::joint::JOINT_NAMES};

    fn joint(name: &str, x: f32, y: f32, z: f32) -> SkeletonJoint<'_> {
        SkeletonJoint {
            name,
            position: na::Point3::new(x, y, z),
        }
    }

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "{} != {}", a, b);
    }

    #[test]
    fn bone_ends_are_known_joints() {
        for bone in Bone::ALL.iter() {
            let (from, to) = bone.joints();
            assert!(JOINT_NAMES.contains(&from), "{}", from);
            assert!(JOINT_NAMES.contains(&to), "{}", to);
        }
    }

    #[test]
    fn bone_names_are_unique() {
        let mut names: Vec<_> = Bone::ALL.iter().map(|b| b.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Bone::ALL.len());
    }

    #[test]
    fn center_is_mean_of_ends() {
        let bone = SkeletonBone {
            from: joint("a", 1.0, -2.0, 0.5),
            to: joint("b", 3.0, 4.0, -1.5),
        };
        let center = bone.center();
        assert_close(center.x, 2.0);
        assert_close(center.y, 1.0);
        assert_close(center.z, -0.5);
    }

    #[test]
    fn length_is_euclidean_distance() {
        let bone = SkeletonBone {
            from: joint("a", 0.0, 0.0, 0.0),
            to: joint("b", 2.0, 3.0, 6.0),
        };
        assert_close(bone.length(), 7.0);
    }

    #[test]
    fn orientation_points_z_from_first_to_second() {
        let bone = SkeletonBone {
            from: joint("a", 1.0, 1.0, 1.0),
            to: joint("b", 1.0, 3.0, 1.0),
        };
        let rotation = bone.orientation().unwrap();
        let z = rotation * na::Vector3::z();
        assert_close(z.x, 0.0);
        assert_close(z.y, 1.0);
        assert_close(z.z, 0.0);
    }

    #[test]
    fn orientation_handles_backward_bone() {
        let bone = SkeletonBone {
            from: joint("a", 0.0, 0.0, 1.0),
            to: joint("b", 0.0, 0.0, -1.0),
        };
        let z = bone.orientation().unwrap() * na::Vector3::z();
        assert_close(z.z, -1.0);
    }

    #[test]
    fn degenerate_bone_has_no_orientation() {
        let bone = SkeletonBone {
            from: joint("a", 0.5, 0.5, 0.5),
            to: joint("b", 0.5, 0.5, 0.5),
        };
        assert!(bone.orientation().is_none());
        assert_close(bone.length(), 0.0);
    }
}
