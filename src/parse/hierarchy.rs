use crate::model::task::Task;

/// Derive parent/child edges from indentation depth.
///
/// A fold over the ordered task sequence carrying a depth-tracked stack: on
/// each task at depth D every stack entry at depth >= D is popped; the
/// surviving top, if any, is the parent. Every task stays in the flat
/// sequence — nesting is an annotation, never a reason to drop a record.
pub fn link(tasks: &mut [Task]) {
    let mut stack: Vec<(usize, usize)> = Vec::new(); // (index, depth)

    for i in 0..tasks.len() {
        let depth = tasks[i].depth;
        while stack.last().is_some_and(|&(_, d)| d >= depth) {
            stack.pop();
        }
        if let Some(&(parent_idx, _)) = stack.last() {
            tasks[i].parent_id = tasks[parent_idx].id.clone();
            let child_id = tasks[i].id.clone();
            tasks[parent_idx].children.push(child_id);
        }
        stack.push((i, depth));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, depth: usize) -> Task {
        let mut t = Task::new(id, id.to_uppercase());
        t.depth = depth;
        t
    }

    #[test]
    fn test_links_children_to_nearest_shallower_task() {
        let mut tasks = vec![task("a", 0), task("b", 1), task("c", 2), task("d", 1)];
        link(&mut tasks);

        assert_eq!(tasks[1].parent_id, "a");
        assert_eq!(tasks[2].parent_id, "b");
        assert_eq!(tasks[3].parent_id, "a");
        assert_eq!(tasks[0].children, vec!["b", "d"]);
        assert_eq!(tasks[1].children, vec!["c"]);
    }

    #[test]
    fn test_siblings_at_root_stay_unparented() {
        let mut tasks = vec![task("a", 0), task("b", 0)];
        link(&mut tasks);
        assert!(tasks[0].parent_id.is_empty());
        assert!(tasks[1].parent_id.is_empty());
    }

    #[test]
    fn test_depth_jump_without_intermediate_level() {
        // depth can jump from 0 to 2 when an intermediate unit was unparsed;
        // the task still attaches to the nearest surviving shallower task
        let mut tasks = vec![task("a", 0), task("c", 2)];
        link(&mut tasks);
        assert_eq!(tasks[1].parent_id, "a");
        assert_eq!(tasks[1].depth, 2);
    }

    #[test]
    fn test_leading_nested_task_is_an_orphan_root() {
        // a page can start mid-hierarchy; the nested task keeps its depth but
        // gets no parent, and is still present in the flat sequence
        let mut tasks = vec![task("x", 1), task("y", 0)];
        link(&mut tasks);
        assert!(tasks[0].parent_id.is_empty());
        assert_eq!(tasks[0].depth, 1);
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn test_depth_invariant_holds_for_resolved_parents() {
        let mut tasks = vec![
            task("a", 0),
            task("b", 1),
            task("c", 2),
            task("d", 2),
            task("e", 1),
            task("f", 0),
        ];
        link(&mut tasks);
        let by_id: std::collections::HashMap<_, _> =
            tasks.iter().map(|t| (t.id.clone(), t.clone())).collect();
        for t in &tasks {
            if let Some(parent) = by_id.get(&t.parent_id) {
                assert_eq!(t.depth, parent.depth + 1);
            }
        }
    }
}
