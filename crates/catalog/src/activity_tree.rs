use directory_models::ActivityNode;
use std::collections::{HashMap, HashSet, VecDeque};

/// Deepest level searched below a root activity; the root itself is level 1.
pub const MAX_ACTIVITY_DEPTH: usize = 3;

/// In-memory parent/child index over the activity table.
pub struct ActivityTree {
    nodes: Vec<ActivityNode>,
    children: HashMap<i64, Vec<i64>>,
}

impl ActivityTree {
    pub fn from_activities(activities: &[ActivityNode]) -> Self {
        let mut nodes = activities.to_vec();
        nodes.sort_by_key(|node| node.id);

        let mut children: HashMap<i64, Vec<i64>> = HashMap::new();
        for node in &nodes {
            if let Some(parent_id) = node.parent_id {
                children.entry(parent_id).or_default().push(node.id);
            }
        }

        Self { nodes, children }
    }

    pub fn get(&self, id: i64) -> Option<&ActivityNode> {
        self.nodes
            .binary_search_by_key(&id, |node| node.id)
            .ok()
            .map(|index| &self.nodes[index])
    }

    /// Lowest-id root activity whose name contains `fragment`, ignoring case.
    pub fn first_root_matching(&self, fragment: &str) -> Option<&ActivityNode> {
        self.nodes
            .iter()
            .filter(|node| node.parent_id.is_none())
            .find(|node| contains_ignore_case(&node.name, fragment))
    }

    /// `root` and its descendants down to `max_depth` levels, breadth first.
    pub fn subtree_ids(&self, root: i64, max_depth: usize) -> Vec<i64> {
        if max_depth == 0 || self.get(root).is_none() {
            return Vec::new();
        }

        let mut ids = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([(root, 1usize)]);
        while let Some((id, level)) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            ids.push(id);
            if level == max_depth {
                continue;
            }
            if let Some(children) = self.children.get(&id) {
                queue.extend(children.iter().map(|child| (*child, level + 1)));
            }
        }
        ids
    }
}

/// Unicode-aware substring match; an empty fragment matches everything.
pub fn contains_ignore_case(haystack: &str, fragment: &str) -> bool {
    haystack.to_lowercase().contains(&fragment.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i64, name: &str, parent_id: Option<i64>) -> ActivityNode {
        ActivityNode {
            id,
            name: name.to_string(),
            parent_id,
        }
    }

    fn sample() -> ActivityTree {
        ActivityTree::from_activities(&[
            node(4, "Автомобили", None),
            node(1, "Еда", None),
            node(2, "Мясная продукция", Some(1)),
            node(3, "Молочная продукция", Some(1)),
            node(5, "Грузовые", Some(4)),
            node(6, "Легковые", Some(4)),
            node(7, "Запчасти", Some(6)),
            node(8, "Аксессуары", Some(6)),
            node(9, "Шины", Some(7)),
        ])
    }

    #[test]
    fn subtree_stops_at_third_level() {
        let tree = sample();
        assert_eq!(tree.subtree_ids(4, MAX_ACTIVITY_DEPTH), vec![4, 5, 6, 7, 8]);
        assert_eq!(tree.subtree_ids(1, MAX_ACTIVITY_DEPTH), vec![1, 2, 3]);
    }

    #[test]
    fn subtree_depth_is_counted_from_given_node() {
        let tree = sample();
        assert_eq!(tree.subtree_ids(6, MAX_ACTIVITY_DEPTH), vec![6, 7, 8, 9]);
        assert_eq!(tree.subtree_ids(6, 1), vec![6]);
        assert!(tree.subtree_ids(6, 0).is_empty());
    }

    #[test]
    fn unknown_root_yields_nothing() {
        assert!(sample().subtree_ids(42, MAX_ACTIVITY_DEPTH).is_empty());
    }

    #[test]
    fn cycles_terminate() {
        let tree = ActivityTree::from_activities(&[node(1, "a", Some(2)), node(2, "b", Some(1))]);
        assert_eq!(tree.subtree_ids(1, 10), vec![1, 2]);
    }

    #[test]
    fn root_lookup_ignores_case_and_children() {
        let tree = sample();
        assert_eq!(tree.first_root_matching("еда").map(|n| n.id), Some(1));
        assert_eq!(tree.first_root_matching("АВТО").map(|n| n.id), Some(4));
        assert!(tree.first_root_matching("Мясная").is_none());
        // empty fragment picks the lowest id root
        assert_eq!(tree.first_root_matching("").map(|n| n.id), Some(1));
    }
}
