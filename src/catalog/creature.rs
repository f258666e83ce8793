//! Built-in creature catalog.
//!
//! Authored speculatively against many rigs (bipeds, quadrupeds, winged and
//! tailed creatures); any given model satisfies only a subset.

use glam::Vec3;

use super::{ControlCatalog, ControlDefinition, JointSpec, MorphSpec, Side, ValueRange};

pub const GROUP_HEAD: &str = "Head";
pub const GROUP_NECK: &str = "Neck";
pub const GROUP_JAW: &str = "Jaw";
pub const GROUP_SPINE: &str = "Spine";
pub const GROUP_TAIL: &str = "Tail";
pub const GROUP_FRONT_LIMBS: &str = "Front Limbs";
pub const GROUP_HIND_LIMBS: &str = "Hind Limbs";
pub const GROUP_WINGS: &str = "Wings";
pub const GROUP_EXPRESSION: &str = "Expression";

const GROUP_ORDER: [&str; 9] = [
    GROUP_HEAD,
    GROUP_NECK,
    GROUP_JAW,
    GROUP_SPINE,
    GROUP_TAIL,
    GROUP_FRONT_LIMBS,
    GROUP_HIND_LIMBS,
    GROUP_WINGS,
    GROUP_EXPRESSION,
];

const FRONT_LIMB_KEYWORDS: &[&str] = &["shoulder", "upperarm", "arm", "foreleg", "front"];
const FRONT_LIMB_PREFERRED: &[&str] = &["shoulder", "upperarm"];
const HIND_LIMB_KEYWORDS: &[&str] = &["thigh", "upleg", "hip", "leg", "hind"];
const HIND_LIMB_PREFERRED: &[&str] = &["thigh", "upleg"];
const SPINE_KEYWORDS: &[&str] = &["spine", "chest", "torso", "body"];

pub(super) fn creature_catalog() -> ControlCatalog {
    let controls = vec![
        // === Head ===
        ControlDefinition::joint(
            "headPitch",
            "Head Pitch",
            GROUP_HEAD,
            0,
            JointSpec::new(Vec3::X, &["head"], ValueRange::symmetric(0.7, 0.01)),
        ),
        ControlDefinition::joint(
            "headYaw",
            "Head Yaw",
            GROUP_HEAD,
            1,
            JointSpec::new(Vec3::Y, &["head"], ValueRange::symmetric(0.9, 0.01)),
        ),
        ControlDefinition::joint(
            "headRoll",
            "Head Roll",
            GROUP_HEAD,
            2,
            JointSpec::new(Vec3::Z, &["head"], ValueRange::symmetric(0.5, 0.01)),
        ),
        // === Neck ===
        ControlDefinition::joint(
            "neckPitch",
            "Neck Pitch",
            GROUP_NECK,
            0,
            JointSpec::new(Vec3::X, &["neck"], ValueRange::symmetric(0.5, 0.01)),
        ),
        ControlDefinition::joint(
            "neckYaw",
            "Neck Yaw",
            GROUP_NECK,
            1,
            JointSpec::new(Vec3::Y, &["neck"], ValueRange::symmetric(0.6, 0.01)),
        ),
        // === Jaw ===
        ControlDefinition::joint(
            "jawOpen",
            "Jaw Open",
            GROUP_JAW,
            0,
            JointSpec::new(Vec3::X, &["jaw", "mouth", "mandible"], ValueRange::new(0.0, 0.6, 0.01, 0.0))
                .with_preferred(&["jaw"]),
        ),
        ControlDefinition::morph(
            "mouthOpen",
            "Mouth Open",
            GROUP_JAW,
            1,
            MorphSpec::new(&["mouth", "jaw"], ValueRange::new(0.0, 1.0, 0.01, 0.0))
                .with_preferred(&["open"]),
        ),
        // === Spine ===
        ControlDefinition::joint(
            "spineBend",
            "Spine Bend",
            GROUP_SPINE,
            0,
            JointSpec::new(Vec3::X, SPINE_KEYWORDS, ValueRange::symmetric(0.4, 0.01))
                .with_preferred(&["spine"]),
        ),
        ControlDefinition::joint(
            "spineTwist",
            "Spine Twist",
            GROUP_SPINE,
            1,
            JointSpec::new(Vec3::Y, SPINE_KEYWORDS, ValueRange::symmetric(0.4, 0.01))
                .with_preferred(&["spine"]),
        ),
        // === Tail ===
        ControlDefinition::joint(
            "tailCurl",
            "Tail Curl",
            GROUP_TAIL,
            0,
            JointSpec::new(Vec3::X, &["tail"], ValueRange::symmetric(0.8, 0.01)),
        ),
        ControlDefinition::joint(
            "tailSwing",
            "Tail Swing",
            GROUP_TAIL,
            1,
            JointSpec::new(Vec3::Y, &["tail"], ValueRange::symmetric(0.8, 0.01)),
        ),
        // === Limbs ===
        ControlDefinition::joint(
            "frontLeftLift",
            "Front Left Lift",
            GROUP_FRONT_LIMBS,
            0,
            JointSpec::new(Vec3::X, FRONT_LIMB_KEYWORDS, ValueRange::symmetric(1.0, 0.01))
                .with_preferred(FRONT_LIMB_PREFERRED)
                .with_side(Side::Left),
        ),
        ControlDefinition::joint(
            "frontRightLift",
            "Front Right Lift",
            GROUP_FRONT_LIMBS,
            1,
            JointSpec::new(Vec3::X, FRONT_LIMB_KEYWORDS, ValueRange::symmetric(1.0, 0.01))
                .with_preferred(FRONT_LIMB_PREFERRED)
                .with_side(Side::Right),
        ),
        ControlDefinition::joint(
            "hindLeftLift",
            "Hind Left Lift",
            GROUP_HIND_LIMBS,
            0,
            JointSpec::new(Vec3::X, HIND_LIMB_KEYWORDS, ValueRange::symmetric(1.0, 0.01))
                .with_preferred(HIND_LIMB_PREFERRED)
                .with_side(Side::Left),
        ),
        ControlDefinition::joint(
            "hindRightLift",
            "Hind Right Lift",
            GROUP_HIND_LIMBS,
            1,
            JointSpec::new(Vec3::X, HIND_LIMB_KEYWORDS, ValueRange::symmetric(1.0, 0.01))
                .with_preferred(HIND_LIMB_PREFERRED)
                .with_side(Side::Right),
        ),
        // === Wings ===
        ControlDefinition::joint(
            "wingLeftFlap",
            "Left Wing Flap",
            GROUP_WINGS,
            0,
            JointSpec::new(Vec3::Z, &["wing"], ValueRange::symmetric(1.2, 0.01))
                .with_side(Side::Left),
        ),
        ControlDefinition::joint(
            "wingRightFlap",
            "Right Wing Flap",
            GROUP_WINGS,
            1,
            JointSpec::new(Vec3::Z, &["wing"], ValueRange::symmetric(1.2, 0.01))
                .with_side(Side::Right),
        ),
        // === Expression ===
        ControlDefinition::morph(
            "blink",
            "Blink",
            GROUP_EXPRESSION,
            0,
            MorphSpec::new(&["blink", "eye"], ValueRange::new(0.0, 1.0, 0.01, 0.0))
                .with_preferred(&["blink"]),
        ),
        ControlDefinition::morph(
            "smile",
            "Smile",
            GROUP_EXPRESSION,
            1,
            MorphSpec::new(&["smile", "happy", "joy"], ValueRange::new(0.0, 1.0, 0.01, 0.0)),
        ),
        ControlDefinition::morph(
            "snarl",
            "Snarl",
            GROUP_EXPRESSION,
            2,
            MorphSpec::new(&["snarl", "angry", "anger"], ValueRange::new(0.0, 1.0, 0.01, 0.0)),
        ),
    ];

    let group_order = GROUP_ORDER.iter().map(|g| (*g).to_string()).collect();

    ControlCatalog::new(controls, group_order).unwrap_or_else(|err| {
        log::error!("Built-in creature catalog is invalid: {err}");
        ControlCatalog {
            group_order: GROUP_ORDER.iter().map(|g| (*g).to_string()).collect(),
            controls: Vec::new(),
        }
    })
}
