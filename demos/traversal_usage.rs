extern crate walktree;

use walktree::{BreadthFirstTraversal, DepthFirstTraversal, Node, Order, Traversal, Tree, TreeResult, ValueFirstTraversal};

fn print_tree(t: &Tree<(), String>, root: Node<()>, title: &str) -> TreeResult<()> {
    println!("{}", title);
    let mut stack = vec![(0, root)];
    while let Some((depth, node)) = stack.pop() {
        for _ in 0..depth {
            print!("  ");
        }
        println!("- {}", node.data(t)?.map(String::as_str).unwrap_or("(none)"));
        for child in node.children(t)?.rev() {
            stack.push((depth + 1, child));
        }
    }
    println!();
    Ok(())
}

fn print_sequence<O: Order>(t: &Tree<(), String>, iter: &mut Traversal<(), O>, title: &str) -> TreeResult<()> {
    let mut names = Vec::new();
    iter.apply(t, |d| names.push(d.cloned().unwrap_or_default()))?;
    println!("{}", title);
    println!("  {:?}", names);
    println!();
    Ok(())
}

fn main() -> TreeResult<()> {
    // Create the backing tree structure
    let mut tree: Tree<(), String> = Tree::new(());

    // Build the tree; the sort keys rank the nodes for value-first traversal
    let root = {
        let t = &mut tree;
        let root = t.create_node("Root".into());
        let a = root.add_sorted_child_value(t, "Parent A".into(), 1.0)?;
        a.add_sorted_child_value(t, "Child A2".into(), 5.0)?;
        a.add_sorted_child_value(t, "Child A1".into(), 4.0)?;
        let b = root.add_sorted_child_value(t, "Parent B".into(), 3.0)?;
        b.append_child_value(t, "Child B1".into())?;
        let c = root.add_sorted_child_value(t, "Parent C".into(), 2.0)?;
        c.append_child_value(t, "Child C1".into())?;
        c.append_child_value(t, "Child C2".into())?;

        print_tree(t, root, "=== Tree Structure ===")?;

        root
    };

    println!("=== Size ===");
    println!("  {} nodes below the root", root.size(&tree)?);
    println!();

    let mut depth = DepthFirstTraversal::new(&tree, root)?;
    let mut breadth = BreadthFirstTraversal::new(&tree, root)?;
    let mut value = ValueFirstTraversal::new(&tree, root)?;
    print_sequence(&tree, &mut depth, "=== Depth First ===")?;
    print_sequence(&tree, &mut breadth, "=== Breadth First ===")?;
    print_sequence(&tree, &mut value, "=== Value First ===")?;

    // Walk backwards with the cursor
    {
        println!("=== Breadth First, Backwards ===");
        breadth.to_end();
        loop {
            println!("  {}", breadth.data(&tree)?.map(String::as_str).unwrap_or("(none)"));
            if !breadth.step_back()? {
                break;
            }
        }
        println!();
    }

    // Restructure, then refresh the cached sequence
    {
        let c = root.child(&tree, 1)?.expect("root has a second child");
        c.cut(&mut tree)?;
        print_sequence(&tree, &mut depth, "=== Depth First, Before Update (stale) ===")?;
        depth.update(&tree)?;
        print_sequence(&tree, &mut depth, "=== Depth First, After Cutting Parent C ===")?;

        let freed = c.free(&mut tree);
        println!("=== Freed Parent C ===");
        println!("  released payloads {:?}", freed);
        println!();
    }

    // Update payloads in place
    {
        value.update(&tree)?;
        value.apply_mut(&mut tree, |d| {
            if let Some(name) = d {
                name.push_str(" - Updated");
            }
        })?;
        print_tree(&tree, root, "=== Updated Through Value First ===")?;
    }

    Ok(())
}
