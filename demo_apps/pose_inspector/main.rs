//! Pose Inspector
//!
//! Builds a procedural winged creature, binds a control catalog to it and
//! prints the resulting sliders. A few slider edits are then run through the
//! per-frame protocol while a fake idle sway moves the spine.
//!
//! Usage: `pose_inspector [catalog.json]` (defaults to the built-in
//! creature catalog). Set `RUST_LOG=debug` for binding details.

use std::sync::Arc;

use anyhow::Context;
use glam::{Quat, Vec3};
use rigpose::rig::RigModel;
use rigpose::scene::SkeletonKey;
use rigpose::{ControlCatalog, MorphTargets, Node, NodeHandle, PoseController, Scene, Skeleton};

struct Creature {
    scene: Scene,
    model: NodeHandle,
    spine: NodeHandle,
    skeleton: SkeletonKey,
}

fn build_creature() -> Creature {
    let mut scene = Scene::new();
    let model = scene.add_node(Node::new("Wyvern"));
    let armature = scene.add_to_parent(Node::new("Armature"), model);

    let hips = scene.add_joint("Hips", Some(armature));
    let spine = scene.add_joint("Spine", Some(hips));
    let neck = scene.add_joint("Neck", Some(spine));
    let head = scene.add_joint("Head", Some(neck));
    let jaw = scene.add_joint("Jaw", Some(head));
    let tail_01 = scene.add_joint("Tail_01", Some(hips));
    let tail_02 = scene.add_joint("Tail_02", Some(tail_01));
    let shoulder_l = scene.add_joint("Shoulder_L", Some(spine));
    let shoulder_r = scene.add_joint("Shoulder_R", Some(spine));
    let thigh_l = scene.add_joint("Thigh_L", Some(hips));
    let thigh_r = scene.add_joint("Thigh_R", Some(hips));
    let wing_l = scene.add_joint("Wing.L", Some(spine));
    let wing_r = scene.add_joint("Wing.R", Some(spine));

    let offsets = [
        (spine, Vec3::new(0.0, 0.2, 0.4)),
        (neck, Vec3::new(0.0, 0.3, 0.5)),
        (head, Vec3::new(0.0, 0.2, 0.3)),
        (tail_01, Vec3::new(0.0, 0.0, -0.6)),
        (tail_02, Vec3::new(0.0, 0.0, -0.6)),
        (wing_l, Vec3::new(0.3, 0.2, 0.0)),
        (wing_r, Vec3::new(-0.3, 0.2, 0.0)),
    ];
    for (joint, offset) in offsets {
        if let Some(node) = scene.get_node_mut(joint) {
            node.transform.position = offset;
        }
    }

    let bones = vec![
        hips, spine, neck, head, jaw, tail_01, tail_02, shoulder_l, shoulder_r, thigh_l, thigh_r,
        wing_l, wing_r,
    ];
    let skeleton = scene.add_skeleton(Skeleton::new("WyvernSkin", bones, 0));
    let body = scene.add_to_parent(Node::new("Body"), model);
    scene.bind_skin(body, skeleton);
    scene.set_morph_targets(
        body,
        MorphTargets::new(&["Blink", "Smile", "Snarl", "MouthOpen"]),
    );

    scene.update_matrix_world();
    Creature {
        scene,
        model,
        spine,
        skeleton,
    }
}

fn load_catalog() -> anyhow::Result<ControlCatalog> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(ControlCatalog::creature());
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read catalog file {path}"))?;
    ControlCatalog::from_json_str(&text).with_context(|| format!("invalid catalog in {path}"))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let catalog = Arc::new(load_catalog()?);
    let mut creature = build_creature();
    let mut pose = PoseController::with_model(catalog, &mut creature.scene, creature.model);
    let head = creature
        .scene
        .find_node_by_name(creature.model, "Head")
        .context("creature has no Head joint")?;
    let skeleton = creature
        .scene
        .skins
        .get(creature.skeleton)
        .context("creature skeleton vanished")?;
    if let Some(root_bone) = skeleton.root_bone() {
        log::info!(
            "Skeleton '{}' rooted at {:?}, {} bones",
            skeleton.name,
            creature.scene.get_node(root_bone).map(|n| n.name.as_str()),
            skeleton.bones.len()
        );
    }

    println!("Bound {} of {} controls", pose.controls().len(), pose.catalog().len());
    for (group, controls) in pose.controls_by_group() {
        println!("[{group}]");
        for control in controls {
            println!(
                "  {:<22} {:>6.2} .. {:<6.2} step {:.2} ({:?})",
                control.label, control.min, control.max, control.step, control.kind
            );
        }
    }

    // Slider edits, as a HUD would deliver them.
    let edits = [("headPitch", "0.35"), ("headYaw", "-2"), ("blink", "0.8"), ("tailSwing", "nope")];
    for (id, text) in edits {
        match pose.set_value_text(&mut creature.scene, id, text) {
            Some(value) => log::info!("{id} <- {text:?} stored as {value:.3}"),
            None => log::info!("{id} <- {text:?} ignored"),
        }
    }
    pose.apply_pose_adjustments(&mut creature.scene);

    for frame in 0..3 {
        pose.prepare_frame(&mut creature.scene);

        let sway = Quat::from_rotation_y(0.05 * (frame as f32 + 1.0).sin());
        let spine = creature.scene.joint_rotation(creature.spine).unwrap_or(Quat::IDENTITY);
        creature.scene.set_joint_rotation(creature.spine, spine * sway);
        creature.scene.mark_world_dirty(creature.spine);

        pose.apply_pose_adjustments(&mut creature.scene);
        creature.scene.update_matrix_world();

        let head_node = creature.scene.get_node(head).context("head joint vanished")?;
        log::info!("frame {frame}: head at {:?}", head_node.world_matrix().translation);
        if let Some(skeleton) = creature.scene.skins.get(creature.skeleton) {
            let positions = skeleton.bone_world_positions(&creature.scene.nodes);
            log::debug!("frame {frame}: bone positions {positions:?}");
        }
    }

    let values = pose.reset_pose(&mut creature.scene);
    println!("{}", serde_json::to_string_pretty(&values)?);

    pose.dispose();
    Ok(())
}
