//! Pose Controller Tests
//!
//! Tests for:
//! - Lifecycle: bind, rebind, dispose, zero-control models
//! - set_value clamping, coercion and no-op results
//! - Morph targets written immediately, joints on apply
//! - Composition order and idempotence of apply_pose_adjustments
//! - prepare_frame / base orientation capture
//! - reset_pose and display ordering

use std::sync::Arc;

use glam::{Quat, Vec3};
use rigpose::catalog::{ControlCatalog, ControlDefinition, ControlKind, JointSpec, MorphSpec, Side, ValueRange};
use rigpose::pose::{BindingTarget, PoseController};
use rigpose::rig::RigModel;
use rigpose::scene::{MorphTargets, Node, NodeHandle, Scene, Skeleton};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Same rotation, ignoring quaternion sign.
fn quat_approx(a: Quat, b: Quat) -> bool {
    a.dot(b).abs() > 1.0 - EPSILON
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct Rig {
    scene: Scene,
    model: NodeHandle,
    head: NodeHandle,
    tail_l: NodeHandle,
    tail_r: NodeHandle,
    body: NodeHandle,
}

/// Root, Head, Tail_L, Tail_R on one skinned Body with Blink/Smile morphs.
/// Head starts with a non-identity rest rotation.
fn build_rig() -> Rig {
    let mut scene = Scene::new();
    let model = scene.add_node(Node::new("Model"));
    let root = scene.add_joint("Root", Some(model));
    let head = scene.add_joint("Head", Some(root));
    let tail_l = scene.add_joint("Tail_L", Some(root));
    let tail_r = scene.add_joint("Tail_R", Some(root));
    scene.set_joint_rotation(head, head_rest());

    let skeleton = scene.add_skeleton(Skeleton::new("Skin", vec![root, head, tail_l, tail_r], 0));
    let body = scene.add_to_parent(Node::new("Body"), model);
    scene.bind_skin(body, skeleton);
    scene.set_morph_targets(body, MorphTargets::new(&["Blink", "Smile"]));

    Rig {
        scene,
        model,
        head,
        tail_l,
        tail_r,
        body,
    }
}

fn head_rest() -> Quat {
    Quat::from_rotation_y(0.3)
}

fn test_catalog() -> Arc<ControlCatalog> {
    let controls = vec![
        ControlDefinition::joint(
            "headPitch",
            "Head Pitch",
            "Head",
            0,
            JointSpec::new(Vec3::X, &["head"], ValueRange::symmetric(0.7, 0.01)),
        ),
        ControlDefinition::joint(
            "headRoll",
            "Head Roll",
            "Head",
            1,
            JointSpec::new(Vec3::Z, &["head"], ValueRange::symmetric(0.5, 0.01)),
        ),
        ControlDefinition::joint(
            "tailRight",
            "Tail Right",
            "Tail",
            0,
            JointSpec::new(Vec3::Y, &["tail"], ValueRange::symmetric(0.8, 0.01))
                .with_side(Side::Right),
        ),
        ControlDefinition::morph(
            "blink",
            "Blink",
            "Face",
            0,
            MorphSpec::new(&["blink"], ValueRange::new(0.0, 1.0, 0.01, 0.0)),
        ),
        ControlDefinition::joint(
            "wingFlap",
            "Wing Flap",
            "Wings",
            0,
            JointSpec::new(Vec3::Z, &["wing"], ValueRange::symmetric(1.0, 0.01)),
        ),
    ];
    let groups = ["Head", "Tail", "Face"].map(String::from).to_vec();
    Arc::new(ControlCatalog::new(controls, groups).unwrap())
}

fn bound_rig() -> (Rig, PoseController<NodeHandle>) {
    init_logger();
    let mut rig = build_rig();
    let controller = PoseController::with_model(test_catalog(), &mut rig.scene, rig.model);
    (rig, controller)
}

fn head_rotation(rig: &Rig) -> Quat {
    rig.scene.joint_rotation(rig.head).unwrap()
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn new_controller_is_unbound() {
    let controller: PoseController<NodeHandle> = PoseController::new(test_catalog());
    assert!(!controller.is_bound());
    assert!(controller.controls().is_empty());
    assert!(controller.values().is_empty());
}

#[test]
fn bind_reports_matched_controls_only() {
    let (rig, controller) = bound_rig();
    assert!(controller.is_bound());
    assert_eq!(controller.root(), Some(rig.model));

    let ids: Vec<String> = controller.controls().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["headPitch", "headRoll", "tailRight", "blink"]);
    assert!(controller.binding_of("wingFlap").is_none());
}

#[test]
fn bind_targets_expected_nodes() {
    let (rig, controller) = bound_rig();

    assert!(matches!(
        controller.binding_of("tailRight"),
        Some(BindingTarget::Joint { joint, .. }) if joint == rig.tail_r
    ));
    assert_ne!(
        controller.binding_of("tailRight"),
        controller.binding_of("headPitch")
    );
    assert!(matches!(
        controller.binding_of("blink"),
        Some(BindingTarget::Morph { mesh, slot: 0 }) if mesh == rig.body
    ));
    assert!(!controller
        .joint_groups()
        .iter()
        .any(|group| group.joint == rig.tail_l));
}

#[test]
fn joint_groups_follow_catalog_order() {
    let (rig, controller) = bound_rig();
    let groups = controller.joint_groups();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].joint, rig.head);
    assert_eq!(groups[0].controls.len(), 2);
    assert!(quat_approx(groups[0].rest_orientation, head_rest()));
}

#[test]
fn model_without_skin_binds_with_zero_controls() {
    let mut scene = Scene::new();
    let model = scene.add_node(Node::new("Rock"));
    let controller = PoseController::with_model(test_catalog(), &mut scene, model);

    assert!(controller.is_bound());
    assert!(controller.controls().is_empty());
    assert!(controller.inventory().is_some_and(|inv| inv.is_empty()));
}

#[test]
fn dispose_is_idempotent_and_makes_calls_noops() {
    let (mut rig, mut controller) = bound_rig();
    controller.dispose();
    controller.dispose();

    assert!(!controller.is_bound());
    assert!(controller.controls().is_empty());
    assert_eq!(controller.set_value(&mut rig.scene, "headPitch", 0.5), None);
    assert!(controller.reset_pose(&mut rig.scene).is_empty());

    let before = head_rotation(&rig);
    controller.apply_pose_adjustments(&mut rig.scene);
    controller.prepare_frame(&mut rig.scene);
    assert_eq!(head_rotation(&rig), before);
}

#[test]
fn rebinding_replaces_previous_rig() {
    let (_, mut controller) = bound_rig();

    let mut scene = Scene::new();
    let model = scene.add_node(Node::new("Serpent"));
    let tail = scene.add_joint("Tail_R", Some(model));
    let skeleton = scene.add_skeleton(Skeleton::new("Skin", vec![tail], 0));
    let mesh = scene.add_to_parent(Node::new("Scales"), model);
    scene.bind_skin(mesh, skeleton);

    let count = controller.bind(&mut scene, model);
    assert_eq!(count, 1);
    assert_eq!(controller.root(), Some(model));
    assert!(controller.value("headPitch").is_none());
    assert!(controller.value("tailRight").is_some());
}

#[test]
fn rebinding_same_model_keeps_rest_orientation() {
    let (mut rig, mut controller) = bound_rig();
    controller.set_value(&mut rig.scene, "headPitch", 0.5);
    controller.apply_pose_adjustments(&mut rig.scene);

    controller.bind(&mut rig.scene, rig.model);

    assert!(quat_approx(controller.joint_groups()[0].rest_orientation, head_rest()));
    assert!(quat_approx(head_rotation(&rig), head_rest()));
    assert_eq!(controller.value("headPitch"), Some(0.0));

    controller.set_value(&mut rig.scene, "headPitch", 0.3);
    controller.apply_pose_adjustments(&mut rig.scene);
    controller.reset_pose(&mut rig.scene);
    assert!(quat_approx(head_rotation(&rig), head_rest()));
}

#[test]
fn controllers_sharing_a_catalog_are_independent() {
    let catalog = test_catalog();
    let mut a = build_rig();
    let mut b = build_rig();
    let mut first = PoseController::with_model(Arc::clone(&catalog), &mut a.scene, a.model);
    let second = PoseController::with_model(catalog, &mut b.scene, b.model);

    first.set_value(&mut a.scene, "headPitch", 0.4);
    assert!(approx(first.value("headPitch").unwrap(), 0.4));
    assert!(approx(second.value("headPitch").unwrap(), 0.0));
}

// ============================================================================
// set_value
// ============================================================================

#[test]
fn set_value_clamps_to_max() {
    let (mut rig, mut controller) = bound_rig();

    let accepted = controller.set_value(&mut rig.scene, "headPitch", 2.0);
    assert_eq!(accepted, Some(0.7));
    assert_eq!(controller.values().get("headPitch"), Some(0.7));
    assert_eq!(controller.values().get_by_label("Head Pitch"), Some(0.7));
}

#[test]
fn set_value_clamps_to_min() {
    let (mut rig, mut controller) = bound_rig();
    assert_eq!(controller.set_value(&mut rig.scene, "headRoll", -9.0), Some(-0.5));
}

#[test]
fn set_value_nan_stores_min() {
    let (mut rig, mut controller) = bound_rig();
    assert_eq!(controller.set_value(&mut rig.scene, "headPitch", f32::NAN), Some(-0.7));
    assert_eq!(controller.value("headPitch"), Some(-0.7));
}

#[test]
fn set_value_text_coerces_numbers() {
    let (mut rig, mut controller) = bound_rig();
    assert_eq!(controller.set_value_text(&mut rig.scene, "headPitch", " 0.25 "), Some(0.25));
    assert_eq!(controller.set_value_text(&mut rig.scene, "headPitch", "abc"), Some(-0.7));
}

#[test]
fn set_value_unchanged_returns_none() {
    let (mut rig, mut controller) = bound_rig();
    assert_eq!(controller.set_value(&mut rig.scene, "headPitch", 0.0), None);

    controller.set_value(&mut rig.scene, "headPitch", 0.3);
    assert_eq!(controller.set_value(&mut rig.scene, "headPitch", 0.300_001), None);
}

#[test]
fn set_value_unknown_id_is_noop() {
    let (mut rig, mut controller) = bound_rig();
    let before = controller.values();

    assert_eq!(controller.set_value(&mut rig.scene, "doesNotExist", 0.5), None);
    assert_eq!(controller.set_value(&mut rig.scene, "wingFlap", 0.5), None);
    assert_eq!(controller.values(), before);
}

#[test]
fn morph_values_are_written_immediately() {
    let (mut rig, mut controller) = bound_rig();

    controller.set_value(&mut rig.scene, "blink", 0.6);
    assert_eq!(rig.scene.morph_weight(rig.body, 0), Some(0.6));
    assert_eq!(rig.scene.morph_weight(rig.body, 1), Some(0.0));
}

#[test]
fn bind_writes_morph_defaults() {
    let mut rig = build_rig();
    rig.scene.set_morph_weight(rig.body, 0, 0.9);

    let _controller = PoseController::with_model(test_catalog(), &mut rig.scene, rig.model);
    assert_eq!(rig.scene.morph_weight(rig.body, 0), Some(0.0));
}

#[test]
fn joint_values_wait_for_apply() {
    let (mut rig, mut controller) = bound_rig();

    controller.set_value(&mut rig.scene, "headPitch", 0.4);
    assert!(quat_approx(head_rotation(&rig), head_rest()));

    controller.apply_pose_adjustments(&mut rig.scene);
    let expected = head_rest() * Quat::from_axis_angle(Vec3::X, 0.4);
    assert!(quat_approx(head_rotation(&rig), expected));
}

// ============================================================================
// Composition
// ============================================================================

#[test]
fn controls_on_one_joint_compose_in_catalog_order() {
    let (mut rig, mut controller) = bound_rig();

    controller.set_value(&mut rig.scene, "headPitch", 0.5);
    controller.set_value(&mut rig.scene, "headRoll", 0.4);
    controller.apply_pose_adjustments(&mut rig.scene);

    let pitch = Quat::from_axis_angle(Vec3::X, 0.5);
    let roll = Quat::from_axis_angle(Vec3::Z, 0.4);
    let catalog_order = head_rest() * pitch * roll;
    let reversed = head_rest() * roll * pitch;

    assert!(quat_approx(head_rotation(&rig), catalog_order));
    assert!(!quat_approx(head_rotation(&rig), reversed));
}

#[test]
fn repeated_apply_does_not_accumulate() {
    let (mut rig, mut controller) = bound_rig();

    controller.set_value(&mut rig.scene, "headPitch", 0.3);
    controller.apply_pose_adjustments(&mut rig.scene);
    let once = head_rotation(&rig);
    controller.apply_pose_adjustments(&mut rig.scene);
    controller.apply_pose_adjustments(&mut rig.scene);

    assert!(quat_approx(head_rotation(&rig), once));
}

#[test]
fn changing_a_value_recomposes_from_base() {
    let (mut rig, mut controller) = bound_rig();

    controller.set_value(&mut rig.scene, "headPitch", 0.3);
    controller.apply_pose_adjustments(&mut rig.scene);
    controller.set_value(&mut rig.scene, "headPitch", -0.2);
    controller.apply_pose_adjustments(&mut rig.scene);

    let expected = head_rest() * Quat::from_axis_angle(Vec3::X, -0.2);
    assert!(quat_approx(head_rotation(&rig), expected));
}

#[test]
fn apply_marks_joint_dirty_for_world_update() {
    let (mut rig, mut controller) = bound_rig();
    rig.scene.update_matrix_world();

    controller.set_value(&mut rig.scene, "headPitch", 0.5);
    controller.apply_pose_adjustments(&mut rig.scene);
    assert!(rig.scene.get_node(rig.head).unwrap().transform.is_dirty());

    rig.scene.update_matrix_world();
    let node = rig.scene.get_node(rig.head).unwrap();
    assert!(!node.transform.is_dirty());
    let (_, world_rotation, _) = node.world_matrix().to_scale_rotation_translation();
    assert!(quat_approx(world_rotation, head_rotation(&rig)));
}

// ============================================================================
// Frame protocol
// ============================================================================

#[test]
fn prepare_frame_restores_base_orientation() {
    let (mut rig, mut controller) = bound_rig();

    controller.set_value(&mut rig.scene, "headPitch", 0.3);
    controller.apply_pose_adjustments(&mut rig.scene);
    controller.prepare_frame(&mut rig.scene);
    assert!(quat_approx(head_rotation(&rig), head_rest()));

    controller.apply_pose_adjustments(&mut rig.scene);
    let expected = head_rest() * Quat::from_axis_angle(Vec3::X, 0.3);
    assert!(quat_approx(head_rotation(&rig), expected));
}

#[test]
fn prepare_frame_discards_external_motion() {
    let mut rig = build_rig();
    let mut controller = PoseController::with_model(test_catalog(), &mut rig.scene, rig.model);
    controller.reset_pose(&mut rig.scene);

    rig.scene.set_joint_rotation(rig.head, Quat::from_rotation_x(1.0));
    controller.prepare_frame(&mut rig.scene);
    assert!(quat_approx(head_rotation(&rig), head_rest()));
}

#[test]
fn external_motion_becomes_the_new_base() {
    let (mut rig, mut controller) = bound_rig();
    controller.set_value(&mut rig.scene, "headPitch", 0.3);
    controller.apply_pose_adjustments(&mut rig.scene);

    // Idle sway layered by another system.
    let sway = Quat::from_rotation_z(0.1);
    rig.scene.set_joint_rotation(rig.head, sway);
    controller.apply_pose_adjustments(&mut rig.scene);

    let expected = sway * Quat::from_axis_angle(Vec3::X, 0.3);
    assert!(quat_approx(head_rotation(&rig), expected));
    assert!(quat_approx(controller.joint_groups()[0].base_orientation.unwrap(), sway));
}

// ============================================================================
// reset_pose
// ============================================================================

#[test]
fn reset_restores_rest_and_defaults() {
    let (mut rig, mut controller) = bound_rig();
    controller.set_value(&mut rig.scene, "headPitch", 0.6);
    controller.set_value(&mut rig.scene, "blink", 1.0);
    controller.apply_pose_adjustments(&mut rig.scene);

    let values = controller.reset_pose(&mut rig.scene);

    assert_eq!(values.get("headPitch"), Some(0.0));
    assert_eq!(values.get("blink"), Some(0.0));
    assert_eq!(rig.scene.morph_weight(rig.body, 0), Some(0.0));
    assert!(quat_approx(head_rotation(&rig), head_rest()));
}

#[test]
fn reset_twice_is_idempotent() {
    let (mut rig, mut controller) = bound_rig();
    controller.set_value(&mut rig.scene, "headRoll", 0.2);
    controller.apply_pose_adjustments(&mut rig.scene);

    let first = controller.reset_pose(&mut rig.scene);
    let head_first = head_rotation(&rig);
    let second = controller.reset_pose(&mut rig.scene);

    assert_eq!(first, second);
    assert!(quat_approx(head_rotation(&rig), head_first));
}

#[test]
fn reset_on_fresh_bind_matches_initial_values() {
    let (mut rig, mut controller) = bound_rig();
    let initial = controller.values();
    assert_eq!(controller.reset_pose(&mut rig.scene), initial);
}

#[test]
fn reset_applies_non_zero_joint_defaults() {
    let mut rig = build_rig();
    let catalog = ControlCatalog::new(
        vec![ControlDefinition::joint(
            "headTilt",
            "Head Tilt",
            "Head",
            0,
            JointSpec::new(Vec3::X, &["head"], ValueRange::new(-1.0, 1.0, 0.01, 0.2)),
        )],
        vec!["Head".to_string()],
    )
    .unwrap();
    let mut controller = PoseController::with_model(Arc::new(catalog), &mut rig.scene, rig.model);

    let expected = head_rest() * Quat::from_axis_angle(Vec3::X, 0.2);
    assert!(quat_approx(head_rotation(&rig), expected));

    controller.set_value(&mut rig.scene, "headTilt", -0.5);
    controller.apply_pose_adjustments(&mut rig.scene);
    controller.reset_pose(&mut rig.scene);
    assert!(quat_approx(head_rotation(&rig), expected));
}

// ============================================================================
// Display metadata
// ============================================================================

#[test]
fn controls_expose_slider_metadata() {
    let (_, controller) = bound_rig();
    let controls = controller.controls();
    let pitch = controls.iter().find(|c| c.id == "headPitch").unwrap();

    assert_eq!(pitch.label, "Head Pitch");
    assert_eq!(pitch.group, "Head");
    assert_eq!(pitch.kind, ControlKind::Joint);
    assert_eq!((pitch.min, pitch.max, pitch.step, pitch.default), (-0.7, 0.7, 0.01, 0.0));
}

#[test]
fn display_order_uses_group_rank_then_order_then_label() {
    let mut scene = Scene::new();
    let model = scene.add_node(Node::new("Model"));
    let root = scene.add_joint("Root", Some(model));
    let skeleton = scene.add_skeleton(Skeleton::new("Skin", vec![root], 0));
    let mesh = scene.add_to_parent(Node::new("Face"), model);
    scene.bind_skin(mesh, skeleton);
    scene.set_morph_targets(mesh, MorphTargets::new(&["a", "b", "c", "d", "e"]));

    let any = || MorphSpec::new(&[], ValueRange::new(0.0, 1.0, 0.1, 0.0));
    let catalog = ControlCatalog::new(
        vec![
            ControlDefinition::morph("b0", "Zed", "B", 0, any()),
            ControlDefinition::morph("x0", "Unknown", "Zzz", 0, any()),
            ControlDefinition::morph("a1z", "Alpha", "A", 1, any()),
            ControlDefinition::morph("a1a", "Aardvark", "A", 1, any()),
            ControlDefinition::morph("a0", "Zulu", "A", 0, any()),
        ],
        vec!["A".to_string(), "B".to_string()],
    )
    .unwrap();

    let controller = PoseController::with_model(Arc::new(catalog), &mut scene, model);
    let ids: Vec<String> = controller.values().iter().map(|v| v.id.clone()).collect();
    assert_eq!(ids, vec!["a0", "a1a", "a1z", "b0", "x0"]);

    let groups: Vec<String> = controller
        .controls_by_group()
        .into_iter()
        .map(|(group, _)| group)
        .collect();
    assert_eq!(groups, vec!["A", "B", "Zzz"]);
}
