use nalgebra as na;

/// Joint names of the default 3D body skeleton, in sensor index order.
pub const JOINT_NAMES: [&str; 91] = [
    "root",
    "hips_joint",
    "left_upLeg_joint",
    "left_leg_joint",
    "left_foot_joint",
    "left_toes_joint",
    "left_toesEnd_joint",
    "right_upLeg_joint",
    "right_leg_joint",
    "right_foot_joint",
    "right_toes_joint",
    "right_toesEnd_joint",
    "spine_1_joint",
    "spine_2_joint",
    "spine_3_joint",
    "spine_4_joint",
    "spine_5_joint",
    "spine_6_joint",
    "spine_7_joint",
    "left_shoulder_1_joint",
    "left_arm_joint",
    "left_forearm_joint",
    "left_hand_joint",
    "left_handIndexStart_joint",
    "left_handIndex_1_joint",
    "left_handIndex_2_joint",
    "left_handIndex_3_joint",
    "left_handIndexEnd_joint",
    "left_handMidStart_joint",
    "left_handMid_1_joint",
    "left_handMid_2_joint",
    "left_handMid_3_joint",
    "left_handMidEnd_joint",
    "left_handPinkyStart_joint",
    "left_handPinky_1_joint",
    "left_handPinky_2_joint",
    "left_handPinky_3_joint",
    "left_handPinkyEnd_joint",
    "left_handRingStart_joint",
    "left_handRing_1_joint",
    "left_handRing_2_joint",
    "left_handRing_3_joint",
    "left_handRingEnd_joint",
    "left_handThumbStart_joint",
    "left_handThumb_1_joint",
    "left_handThumb_2_joint",
    "left_handThumbEnd_joint",
    "neck_1_joint",
    "neck_2_joint",
    "neck_3_joint",
    "neck_4_joint",
    "head_joint",
    "jaw_joint",
    "chin_joint",
    "left_eye_joint",
    "left_eyeLowerLid_joint",
    "left_eyeUpperLid_joint",
    "left_eyeball_joint",
    "nose_joint",
    "right_eye_joint",
    "right_eyeLowerLid_joint",
    "right_eyeUpperLid_joint",
    "right_eyeball_joint",
    "right_shoulder_1_joint",
    "right_arm_joint",
    "right_forearm_joint",
    "right_hand_joint",
    "right_handIndexStart_joint",
    "right_handIndex_1_joint",
    "right_handIndex_2_joint",
    "right_handIndex_3_joint",
    "right_handIndexEnd_joint",
    "right_handMidStart_joint",
    "right_handMid_1_joint",
    "right_handMid_2_joint",
    "right_handMid_3_joint",
    "right_handMidEnd_joint",
    "right_handPinkyStart_joint",
    "right_handPinky_1_joint",
    "right_handPinky_2_joint",
    "right_handPinky_3_joint",
    "right_handPinkyEnd_joint",
    "right_handRingStart_joint",
    "right_handRing_1_joint",
    "right_handRing_2_joint",
    "right_handRing_3_joint",
    "right_handRingEnd_joint",
    "right_handThumbStart_joint",
    "right_handThumb_1_joint",
    "right_handThumb_2_joint",
    "right_handThumbEnd_joint",
];

/// Whether the sensor tracks a joint directly or only drags it along
/// with its closest tracked parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tracking {
    Tracked,
    Interpolated,
}

/// Visual weight class of a joint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JointCategory {
    Neck,
    Face,
    Spine,
    Hand,
    Finger,
    Toe,
    Body,
}

impl JointCategory {
    /// Classifies joint by its canonical name. First matching rule wins.
    pub fn of(name: &str) -> Self {
        match name {
            "neck_1_joint" | "neck_2_joint" | "neck_3_joint"
            | "neck_4_joint" | "head_joint" | "left_shoulder_1_joint"
            | "right_shoulder_1_joint" => JointCategory::Neck,
            "jaw_joint" | "chin_joint" | "left_eye_joint"
            | "left_eyeLowerLid_joint" | "left_eyeUpperLid_joint"
            | "left_eyeball_joint" | "nose_joint" | "right_eye_joint"
            | "right_eyeLowerLid_joint" | "right_eyeUpperLid_joint"
            | "right_eyeball_joint" => JointCategory::Face,
            _ if name.starts_with("spine_") => JointCategory::Spine,
            "left_hand_joint" | "right_hand_joint" => JointCategory::Hand,
            _ if name.starts_with("left_hand")
                || name.starts_with("right_hand") =>
            {
                JointCategory::Finger
            }
            _ if name.starts_with("left_toes")
                || name.starts_with("right_toes") =>
            {
                JointCategory::Toe
            }
            _ => JointCategory::Body,
        }
    }

    pub fn style(self) -> JointStyle {
        let (radius_scale, tracking) = match self {
            JointCategory::Neck => (0.5, Tracking::Tracked),
            JointCategory::Face => (0.2, Tracking::Interpolated),
            JointCategory::Spine => (0.75, Tracking::Tracked),
            JointCategory::Hand => (1.0, Tracking::Tracked),
            JointCategory::Finger => (0.25, Tracking::Interpolated),
            JointCategory::Toe => (0.5, Tracking::Interpolated),
            JointCategory::Body => (1.0, Tracking::Tracked),
        };

        JointStyle {
            radius_scale,
            tracking,
        }
    }
}

/// Creation-time look of a joint sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointStyle {
    /// Multiplier applied to the configured base joint radius.
    pub radius_scale: f32,
    pub tracking: Tracking,
}

impl JointStyle {
    pub fn of(name: &str) -> Self {
        JointCategory::of(name).style()
    }

    pub fn radius(&self, base: f32) -> f32 {
        base * self.radius_scale
    }
}

/// Joint resolved to world space for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkeletonJoint<'a> {
    pub name: &'a str,
    pub position: na::Point3<f32>,
}
