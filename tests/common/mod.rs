#![allow(dead_code)]

use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use walktree::{Node, Tree, TreeResult};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Root with children 0 (key 0) and 9 (key 9). 0 has children 1, 2. 9 has
/// children 3, 4. 3 has children 6, 8 (added as 8 then 6). 8 has children
/// 5, 7 (added as 7 then 5). Every edge key equals the payload of the child.
pub fn example_tree() -> (Tree<(), i32>, Node<()>) {
    let mut tree = Tree::new(());
    let root = build_example(&mut tree).unwrap();
    (tree, root)
}

fn build_example(t: &mut Tree<(), i32>) -> TreeResult<Node<()>> {
    let root = t.create_empty_node();
    let n0 = root.add_sorted_child_value(t, 0, 0.0)?;
    let n9 = root.add_sorted_child_value(t, 9, 9.0)?;
    n0.add_sorted_child_value(t, 1, 1.0)?;
    n0.add_sorted_child_value(t, 2, 2.0)?;
    let n3 = n9.add_sorted_child_value(t, 3, 3.0)?;
    n9.add_sorted_child_value(t, 4, 4.0)?;
    let n8 = n3.add_sorted_child_value(t, 8, 8.0)?;
    n3.add_sorted_child_value(t, 6, 6.0)?;
    n8.add_sorted_child_value(t, 7, 7.0)?;
    n8.add_sorted_child_value(t, 5, 5.0)?;
    Ok(root)
}

/// Finds the first node below `root` (in pre-order) carrying `value`.
pub fn find(t: &Tree<(), i32>, root: Node<()>, value: i32) -> Node<()> {
    let mut stack = vec![root];
    while let Some(n) = stack.pop() {
        if n.data(t).unwrap() == Some(&value) {
            return n;
        }
        stack.extend(n.children(t).unwrap().rev());
    }
    panic!("no node carries {}", value);
}

pub fn values(t: &Tree<(), i32>, nodes: &[Node<()>]) -> Vec<i32> {
    nodes.iter().map(|n| *n.data(t).unwrap().unwrap()).collect()
}

pub fn depth(t: &Tree<(), i32>, node: Node<()>) -> usize {
    let mut depth = 0;
    let mut cur = node;
    while let Some(p) = cur.parent(t).unwrap() {
        depth += 1;
        cur = p;
    }
    depth
}
