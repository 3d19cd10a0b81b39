//! Position-indexed d-ary heap used as a re-prioritizable task queue.
//!
//! Run with: cargo run --example basic_heap

use boundkit::ds::PositionIndexedHeap;
use boundkit::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct Task {
    deadline: u32,
    name: &'static str,
}

fn main() -> Result<(), ConfigError> {
    let queue = PositionIndexedHeap::new(4)?;

    let build = Task { deadline: 30, name: "build" };
    let test = Task { deadline: 20, name: "test" };
    let deploy = Task { deadline: 50, name: "deploy" };

    queue.add(build.clone());
    queue.add(test);
    queue.add(deploy.clone());

    // Deploy became urgent.
    queue.update_priority(&deploy, Task { deadline: 5, name: "deploy" });
    queue.remove(&build);

    while let Some(task) = queue.top() {
        println!("{} @ {}", task.name, task.deadline);
    }
    Ok(())
}

// Expected output:
// deploy @ 5
// test @ 20
