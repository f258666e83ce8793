//! Control Binder
//!
//! Resolves catalog definitions against a scanned rig. Matching is a set of
//! pure functions over an inventory snapshot so it can be tested without a
//! model; the only state threaded through a bind is the set of morph slots
//! already claimed.
//!
//! # Matching rules
//!
//! - Names and keywords compare case-insensitively by substring.
//! - Morph targets: keyword hits among unclaimed slots, narrowed to
//!   preferred-keyword hits when there are any, first in encounter order.
//!   A slot is claimed by at most one control.
//! - Joints: keyword hits, restricted by side if requested, narrowed to
//!   preferred-keyword hits when there are any, then the shallowest joint
//!   wins with the name as tie-break. Joints may be shared by controls.

use std::hash::Hash;

use rustc_hash::FxHashSet;

use crate::catalog::{BindingSpec, ControlCatalog, JointSpec, MorphSpec, Side};
use crate::pose::state::{BindingTarget, BoundControl};
use crate::rig::{JointEntry, MorphTargetEntry, RigInventory};

pub struct ControlBinder;

impl ControlBinder {
    /// Binds every definition of `catalog` that finds a target.
    ///
    /// The result is in catalog order; unmatched definitions are skipped.
    pub fn bind<H: Copy + Eq + Hash>(
        catalog: &ControlCatalog,
        inventory: &RigInventory<H>,
    ) -> Vec<BoundControl<H>> {
        let mut claimed: FxHashSet<(H, usize)> = FxHashSet::default();
        let mut bound = Vec::with_capacity(catalog.len());

        for def in catalog.definitions() {
            let target = match &def.binding {
                BindingSpec::Morph(spec) => {
                    match_morph_target(spec, &inventory.morph_targets, &claimed).map(|entry| {
                        claimed.insert((entry.mesh, entry.slot));
                        BindingTarget::Morph {
                            mesh: entry.mesh,
                            slot: entry.slot,
                        }
                    })
                }
                BindingSpec::Joint(spec) => {
                    match_joint(spec, &inventory.joints).map(|entry| BindingTarget::Joint {
                        joint: entry.handle,
                        axis: spec.axis,
                    })
                }
            };

            match target {
                Some(target) => bound.push(BoundControl::new(def.clone(), target)),
                None => log::trace!("Control '{}' found no target, skipped", def.id),
            }
        }

        bound
    }
}

/// Picks the morph slot for `spec` among slots not in `claimed`.
pub fn match_morph_target<'a, H: Copy + Eq + Hash>(
    spec: &MorphSpec,
    targets: &'a [MorphTargetEntry<H>],
    claimed: &FxHashSet<(H, usize)>,
) -> Option<&'a MorphTargetEntry<H>> {
    let candidates: Vec<&MorphTargetEntry<H>> = targets
        .iter()
        .filter(|t| !claimed.contains(&(t.mesh, t.slot)))
        .filter(|t| spec.keywords.is_empty() || contains_any(&t.name, &spec.keywords))
        .collect();

    narrow_to_preferred(candidates, &spec.preferred, |t| t.name.as_str())
        .into_iter()
        .next()
}

/// Picks the joint for `spec`: shallowest first, then smallest name.
pub fn match_joint<'a, H>(
    spec: &JointSpec,
    joints: &'a [JointEntry<H>],
) -> Option<&'a JointEntry<H>> {
    let candidates: Vec<&JointEntry<H>> = joints
        .iter()
        .filter(|j| contains_any(&j.name, &spec.keywords))
        .filter(|j| spec.side.is_none_or(|side| matches_side(&j.name, side)))
        .collect();

    narrow_to_preferred(candidates, &spec.preferred, |j| j.name.as_str())
        .into_iter()
        .min_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.name.cmp(&b.name)))
}

/// Whether a lowercase joint name denotes `side`.
///
/// An explicit marker decides first: a `left`/`l` (`right`/`r`) token
/// between non-alphanumeric separators, or a token starting with the full
/// word (`leftarm`). A name explicitly marked for the other side never
/// matches. Otherwise an `_l`/`.l` marker anywhere or a trailing `l` counts.
#[must_use]
pub fn matches_side(name: &str, side: Side) -> bool {
    if has_side_token(name, side) {
        return true;
    }
    if has_side_token(name, side.opposite()) {
        return false;
    }

    let (_, letter) = side.tokens();
    name.contains(&format!("_{letter}"))
        || name.contains(&format!(".{letter}"))
        || name.ends_with(letter)
}

fn has_side_token(name: &str, side: Side) -> bool {
    let (word, letter) = side.tokens();
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| token == letter || token.starts_with(word))
}

fn contains_any(name: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|keyword| name.contains(keyword.to_lowercase().as_str()))
}

/// Keeps only candidates hitting a preferred keyword, unless none do.
fn narrow_to_preferred<'a, T>(
    candidates: Vec<&'a T>,
    preferred: &[String],
    name_of: impl Fn(&T) -> &str,
) -> Vec<&'a T> {
    if preferred.is_empty() {
        return candidates;
    }

    let narrowed: Vec<&T> = candidates
        .iter()
        .copied()
        .filter(|c| contains_any(name_of(*c), preferred))
        .collect();

    if narrowed.is_empty() {
        candidates
    } else {
        narrowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_tokens_between_separators() {
        assert!(matches_side("arm.l", Side::Left));
        assert!(matches_side("mixamorig:leftarm", Side::Left));
        assert!(matches_side("l_shoulder", Side::Left));
        assert!(matches_side("wing_r_01", Side::Right));
        assert!(!matches_side("wing_r_01", Side::Left));
    }

    #[test]
    fn side_suffix_markers() {
        assert!(matches_side("tail_l", Side::Left));
        assert!(matches_side("tail_r", Side::Right));
        assert!(!matches_side("tail_l", Side::Right));
        assert!(matches_side("arml", Side::Left));
        assert!(matches_side("armr", Side::Right));
    }

    #[test]
    fn side_word_prefix_outranks_trailing_letter() {
        assert!(matches_side("mixamorig:leftshoulder", Side::Left));
        assert!(!matches_side("mixamorig:leftshoulder", Side::Right));
        assert!(matches_side("mixamorig:rightshoulder", Side::Right));
        assert!(!matches_side("mixamorig:rightupleg", Side::Left));
    }

    #[test]
    fn side_rejects_unmarked_names() {
        assert!(!matches_side("head", Side::Left));
        assert!(!matches_side("spine", Side::Right));
    }

    #[test]
    fn preferred_narrowing_falls_back_to_all() {
        let names = ["neck", "head"];
        let candidates: Vec<&&str> = names.iter().collect();

        let narrowed = narrow_to_preferred(candidates.clone(), &["head".to_string()], |n| *n);
        assert_eq!(narrowed, vec![&"head"]);

        let fallback = narrow_to_preferred(candidates, &["jaw".to_string()], |n| *n);
        assert_eq!(fallback.len(), 2);
    }
}
