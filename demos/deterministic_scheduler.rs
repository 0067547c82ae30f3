use rs_lockmgr::{build_lock_manager, LockManagerConfig, LockMode, LockingMode};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// 事务：读集和写集
struct Txn {
    name: &'static str,
    reads: Vec<&'static str>,
    writes: Vec<&'static str>,
}

fn txn(name: &'static str, reads: &[&'static str], writes: &[&'static str]) -> Txn {
    Txn {
        name,
        reads: reads.to_vec(),
        writes: writes.to_vec(),
    }
}

fn run(mode: LockingMode, txns: &[Txn]) {
    println!("=== {:?} ===", mode);

    let ready: Arc<Mutex<VecDeque<usize>>> = Arc::new(Mutex::new(VecDeque::new()));
    let config = LockManagerConfig::new().with_mode(mode);
    let mut lm = build_lock_manager(&config, Arc::clone(&ready));

    // 按全局顺序一次性申请每个事务的全部锁
    let mut runnable = VecDeque::new();
    for (id, t) in txns.iter().enumerate() {
        let mut granted = true;
        for &key in &t.reads {
            granted &= lm.read_lock(id, key);
        }
        for &key in &t.writes {
            granted &= lm.write_lock(id, key);
        }
        println!(
            "  {} requested {} lock(s): {}",
            t.name,
            t.reads.len() + t.writes.len(),
            if granted { "runnable" } else { "waiting" }
        );
        if granted {
            runnable.push_back(id);
        }
    }

    let mut owners = Vec::new();
    if let Ok(state) = lm.status(&"x", &mut owners) {
        let names: Vec<&str> = owners.iter().map(|&id| txns[id].name).collect();
        println!("  x is {} by {:?}", state, names);
        assert_ne!(state, LockMode::Unlocked);
    }

    let mut step = 1;
    while let Some(id) = runnable.pop_front() {
        let t = &txns[id];
        println!("  step {}: execute {}", step, t.name);
        step += 1;
        for key in t.reads.iter().chain(t.writes.iter()) {
            if let Err(e) = lm.release(id, key) {
                eprintln!("  protocol violation: {}", e);
                return;
            }
        }
        let mut newly_ready = ready.lock().unwrap();
        runnable.extend(newly_ready.drain(..));
    }

    let stats = lm.stats();
    println!(
        "  {} request(s), {} granted immediately, {} handed off on release\n",
        stats.total_requests(),
        stats.immediate_grants,
        stats.cascade_grants
    );
}

fn main() {
    let txns = vec![
        txn("T1", &["x"], &["y"]),
        txn("T2", &["x"], &[]),
        txn("T3", &[], &["x"]),
        txn("T4", &["x", "y"], &[]),
        txn("T5", &["z"], &["z2"]),
    ];

    run(LockingMode::SharedExclusive, &txns);
    run(LockingMode::ExclusiveOnly, &txns);
}
