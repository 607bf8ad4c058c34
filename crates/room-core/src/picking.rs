//! Hit resolution for clicks on the room.
//!
//! Every node carrying one of the special names is tagged once when the
//! scene is set up; a click then walks up from the hit node through its ancestors
//! and stops at the first node with a target behaviour.

use crate::config::SceneNames;
use crate::focus::CaseId;
use crate::scene::{NodeId, SceneGraph};
use crate::showcase::Showcase;
use fnv::FnvHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Behavior {
    /// Plays a sound; the walk continues.
    EasterEgg,
    /// Opens or closes the team gallery.
    TeamTrigger,
    Tv,
    Case(CaseId),
}

/// Semantic target of a click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pick {
    TeamTrigger,
    Tv,
    Case(CaseId),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PickResolution {
    /// An easter egg was passed on the way up.
    pub easter_egg: bool,
    pub target: Option<Pick>,
}

#[derive(Clone, Debug, Default)]
pub struct BehaviorTable {
    map: FnvHashMap<NodeId, Behavior>,
}

impl BehaviorTable {
    /// Collect behaviours for the named nodes present in `scene` and for
    /// every showcase case.
    pub fn build(scene: &SceneGraph, names: &SceneNames, showcase: &Showcase) -> Self {
        let mut table = Self::default();
        for (name, behavior) in [
            (&names.easter_egg, Behavior::EasterEgg),
            (&names.team_trigger, Behavior::TeamTrigger),
            (&names.tv_screen, Behavior::Tv),
        ] {
            let mut tagged = 0;
            for (node, _) in scene.iter().filter(|(_, n)| &n.name == name) {
                table.insert(node, behavior);
                tagged += 1;
            }
            if tagged == 0 {
                log::warn!("[pick] no node named '{}'", name);
            }
        }
        for case in showcase.iter() {
            table.insert(case.node, Behavior::Case(case.id));
        }
        table
    }

    pub fn insert(&mut self, node: NodeId, behavior: Behavior) {
        self.map.insert(node, behavior);
    }

    pub fn get(&self, node: NodeId) -> Option<Behavior> {
        self.map.get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Node carrying `behavior`, if any.
    pub fn node_for(&self, behavior: Behavior) -> Option<NodeId> {
        self.map
            .iter()
            .find_map(|(id, b)| (*b == behavior).then_some(*id))
    }
}

/// Walk up from `hit` and resolve the first target behaviour.
pub fn resolve_hit(table: &BehaviorTable, scene: &SceneGraph, hit: NodeId) -> PickResolution {
    let mut res = PickResolution::default();
    for node in scene.ancestors(hit) {
        let target = match table.get(node) {
            Some(Behavior::EasterEgg) => {
                res.easter_egg = true;
                None
            }
            Some(Behavior::TeamTrigger) => Some(Pick::TeamTrigger),
            Some(Behavior::Tv) => Some(Pick::Tv),
            Some(Behavior::Case(c)) => Some(Pick::Case(c)),
            None => None,
        };
        if target.is_some() {
            res.target = target;
            break;
        }
    }
    res
}
