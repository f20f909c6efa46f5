use {
    crate::config::ViewerConfig,
    bodyrig::{Anchor, AnchorId, BodyAnchor, JointTransforms, JOINT_NAMES},
    nalgebra as na,
    rand::{rngs::StdRng, Rng as _, SeedableRng as _},
    std::f32::consts::PI,
};

const BODY_ANCHOR: u64 = 1;
const PLANE_ANCHOR: u64 = 1000;

/// Anchors reported by the session for one frame.
pub struct Frame {
    pub index: u32,
    pub updated: Vec<Anchor>,
    pub removed: Vec<Anchor>,
}

/// Stand-in for a body tracking session.
///
/// Plays a body standing on a fixed rest pose, swinging arms and legs
/// while drifting forward.
pub struct MockSession {
    config: ViewerConfig,
    rest: Vec<(&'static str, na::Vector3<f32>)>,
    rng: StdRng,
    frame: u32,
    body: Option<AnchorId>,
    next_anchor: u64,
}

impl MockSession {
    pub fn new(config: ViewerConfig) -> Self {
        MockSession {
            config,
            rest: JOINT_NAMES
                .iter()
                .map(|&name| (name, rest_offset(name)))
                .collect(),
            rng: StdRng::seed_from_u64(0x5eed),
            frame: 0,
            body: None,
            next_anchor: BODY_ANCHOR,
        }
    }

    pub fn next_frame(&mut self) -> Frame {
        let index = self.frame;
        self.frame += 1;

        let mut updated = Vec::new();
        let mut removed = Vec::new();

        let lost_at = self.config.lose_tracking_at;
        let reacquire_after = (self.config.fps / 2.0).max(1.0) as u32;

        match (self.body, lost_at) {
            (Some(id), Some(at)) if index == at => {
                tracing::info!("Session lost body {:?}", id);
                removed.push(self.body_anchor(id, index));
                self.body = None;
            }
            (Some(id), _) => updated.push(self.body_anchor(id, index)),
            (None, Some(at)) if index > at && index < at + reacquire_after => {}
            (None, _) => {
                let id = AnchorId(self.next_anchor);
                self.next_anchor += 1;
                self.body = Some(id);
                updated.push(self.body_anchor(id, index));
            }
        }

        if self.config.foreign_anchors && index % 20 == 0 {
            updated.insert(
                0,
                Anchor::Other {
                    id: AnchorId(PLANE_ANCHOR),
                    kind: "plane".to_owned(),
                },
            );
        }

        Frame {
            index,
            updated,
            removed,
        }
    }

    fn body_anchor(&mut self, id: AnchorId, index: u32) -> Anchor {
        let t = index as f32 / self.config.fps;
        let swing = self.config.sway * (PI * t).sin();

        let walked = self.config.walk_speed * t;
        let root = na::Vector3::new(0.0, 1.0, -2.0 + walked);

        let jitter = self.config.jitter;
        let mut skeleton = JointTransforms::new();

        for &(name, rest) in &self.rest {
            // Hand estimate drops out now and then.
            if name == "left_hand_joint" && index % 15 == 7 {
                continue;
            }

            let (pivot, rotation) = limb_rotation(name, swing);
            let mut offset = pivot + rotation * (rest - pivot);

            if jitter > 0.0 {
                offset += na::Vector3::new(
                    self.rng.gen_range(-jitter..jitter),
                    self.rng.gen_range(-jitter..jitter),
                    self.rng.gen_range(-jitter..jitter),
                );
            }

            let model = na::Isometry3::from_parts(offset.into(), rotation);
            skeleton.insert(name, model.to_homogeneous());
        }

        Anchor::Body(BodyAnchor {
            id,
            transform: na::Matrix4::new_translation(&root),
            skeleton,
        })
    }
}

/// Side of the body a joint belongs to, `1.0` for left.
fn side(name: &str) -> Option<f32> {
    if name.starts_with("left_") {
        Some(1.0)
    } else if name.starts_with("right_") {
        Some(-1.0)
    } else {
        None
    }
}

/// Swing of the limb a joint belongs to, as a pivot and rotation about it.
fn limb_rotation(
    name: &str,
    swing: f32,
) -> (na::Vector3<f32>, na::UnitQuaternion<f32>) {
    let side = match side(name) {
        Some(side) => side,
        None => return (na::Vector3::zeros(), na::UnitQuaternion::identity()),
    };

    let part = &name[if side > 0.0 { 5 } else { 6 }..];

    if part.starts_with("arm")
        || part.starts_with("forearm")
        || part.starts_with("hand")
    {
        let pivot = rest_offset(if side > 0.0 {
            "left_arm_joint"
        } else {
            "right_arm_joint"
        });
        // Arms flap up and down around the shoulders.
        let rotation = na::UnitQuaternion::from_axis_angle(
            &na::Vector3::z_axis(),
            side * swing,
        );
        (pivot, rotation)
    } else if part.starts_with("leg")
        || part.starts_with("foot")
        || part.starts_with("toes")
    {
        let pivot = rest_offset(if side > 0.0 {
            "left_upLeg_joint"
        } else {
            "right_upLeg_joint"
        });
        // Legs step in opposite phase.
        let rotation = na::UnitQuaternion::from_axis_angle(
            &na::Vector3::x_axis(),
            side * swing,
        );
        (pivot, rotation)
    } else {
        (na::Vector3::zeros(), na::UnitQuaternion::identity())
    }
}

/// Offset of a joint from the hips in a standing T-pose, in meters.
/// Body faces `+Z`, left is `+X`.
fn rest_offset(name: &str) -> na::Vector3<f32> {
    let (sx, part) = match side(name) {
        Some(s) if s > 0.0 => (s, &name[5..]),
        Some(s) => (s, &name[6..]),
        None => (0.0, name),
    };

    let v = |x: f32, y: f32, z: f32| na::Vector3::new(sx * x, y, z);

    match part {
        "root" | "hips_joint" => na::Vector3::zeros(),

        "upLeg_joint" => v(0.1, -0.05, 0.0),
        "leg_joint" => v(0.1, -0.5, 0.0),
        "foot_joint" => v(0.1, -0.92, 0.0),
        "toes_joint" => v(0.1, -0.97, 0.12),
        "toesEnd_joint" => v(0.1, -0.97, 0.18),

        "shoulder_1_joint" => v(0.08, 0.47, 0.0),
        "arm_joint" => v(0.18, 0.45, 0.0),
        "forearm_joint" => v(0.46, 0.45, 0.0),
        "hand_joint" => v(0.72, 0.45, 0.0),

        "eye_joint" => v(0.03, 0.74, 0.08),
        "eyeLowerLid_joint" => v(0.03, 0.73, 0.085),
        "eyeUpperLid_joint" => v(0.03, 0.75, 0.085),
        "eyeball_joint" => v(0.03, 0.74, 0.07),

        "head_joint" => v(0.0, 0.7, 0.0),
        "jaw_joint" => v(0.0, 0.66, 0.05),
        "chin_joint" => v(0.0, 0.63, 0.08),
        "nose_joint" => v(0.0, 0.71, 0.1),

        _ if part.starts_with("spine_") => {
            let n = digit(part).unwrap_or(1);
            v(0.0, 0.07 * n as f32, 0.0)
        }
        _ if part.starts_with("neck_") => {
            let n = digit(part).unwrap_or(1);
            v(0.0, 0.48 + 0.04 * n as f32, 0.0)
        }
        _ if part.starts_with("hand") => finger_offset(part, sx),

        _ => {
            tracing::warn!("No rest offset for joint '{}'", name);
            na::Vector3::zeros()
        }
    }
}

/// Fingers spread from the hand along the arm axis.
fn finger_offset(part: &str, sx: f32) -> na::Vector3<f32> {
    let fingers = [
        ("handThumb", 0.05),
        ("handIndex", 0.03),
        ("handMid", 0.01),
        ("handRing", -0.01),
        ("handPinky", -0.03),
    ];

    let (finger, z) = fingers
        .iter()
        .copied()
        .find(|(finger, _)| part.starts_with(finger))
        .unwrap_or(("hand", 0.0));

    let segment = match &part[finger.len()..] {
        "Start_joint" => 0,
        "End_joint" => 4,
        rest => digit(rest).unwrap_or(0),
    };

    let hand = na::Vector3::new(sx * 0.72, 0.45, 0.0);
    hand + na::Vector3::new(sx * (0.03 + 0.025 * segment as f32), 0.0, z)
}

fn digit(s: &str) -> Option<u32> {
    s.chars().find_map(|c| c.to_digit(10))
}
