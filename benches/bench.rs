use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use bst_viz::{Order, Tree};

/// Inserts `xs` so that, without any balancing, the tree ends up full.
fn fill_balanced(tree: &mut Tree<i32>, xs: &[i32]) {
    if xs.is_empty() {
        return;
    }
    let mid = xs.len() / 2;
    tree.insert(xs[mid]).ok();
    fill_balanced(tree, &xs[..mid]);
    fill_balanced(tree, &xs[mid + 1..]);
}

/// Helper to bench a function on a BST.
/// It creates a group for the given name and closure and runs it for various sizes of a balanced
/// tree and of a degenerate one built from ascending inserts.
fn bench_helper(c: &mut Criterion, name: &str, f: impl Fn(&mut Tree<i32>, i32)) {
    let mut group = c.benchmark_group(name);

    for num_levels in [3, 7, 11] {
        let num_nodes = 2usize.pow(num_levels as u32) - 1;
        let largest_element_in_tree = num_nodes as i32 - 1;
        let xs: Vec<i32> = (0..num_nodes as i32).collect();

        let balanced = {
            let mut tree = Tree::new();
            fill_balanced(&mut tree, &xs);
            tree
        };
        let ascending: Tree<i32> = xs.iter().copied().collect();

        for (shape, tree) in [("balanced", balanced), ("ascending", ascending)] {
            let id = BenchmarkId::new(shape, num_nodes);

            group.bench_function(id, |b| {
                b.iter_custom(|iters| {
                    let mut time = std::time::Duration::ZERO;
                    for _ in 0..iters {
                        let mut tree = black_box(tree.clone());
                        let instant = std::time::Instant::now();
                        f(&mut tree, black_box(largest_element_in_tree));
                        time += instant.elapsed();
                    }
                    time
                })
            });
        }
    }

    group.finish();
}

pub fn criterion_benchmark(c: &mut Criterion) {
    bench_helper(c, "search", |tree, i| {
        black_box(tree.search(&i));
    });
    bench_helper(c, "search-miss", |tree, i| {
        black_box(tree.search(&(i + 1)));
    });
    bench_helper(c, "insert", |tree, i| {
        tree.insert(i + 1).ok();
    });
    bench_helper(c, "delete", |tree, i| {
        tree.delete(&i).ok();
    });
    bench_helper(c, "delete-root", |tree, _| {
        if let Some(root) = tree.root().map(|n| *n.value()) {
            tree.delete(&root).ok();
        }
    });
    bench_helper(c, "inorder", |tree, _| {
        black_box(tree.traverse(Order::In));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
