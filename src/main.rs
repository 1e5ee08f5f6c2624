use std::thread;

use simtop::{Config, Dashboard};

fn main() {
    env_logger::init();

    let config = Config::load();
    log::info!(
        "starting monitor: {} processes, process tick {}ms, resource tick {}ms, history {}",
        config.process_count,
        config.process_interval_ms,
        config.resource_interval_ms,
        config.history_capacity
    );

    // Persist the effective (sanitized) config so it exists to edit.
    if let Err(e) = config.save() {
        log::warn!("could not persist config: {e}");
    }

    let report_interval = config.resource_interval();
    let mut dashboard = Dashboard::new(config);
    dashboard.start();

    loop {
        thread::sleep(report_interval);

        let res = dashboard.resources();
        let visible = dashboard.visible();
        log::info!(
            "cpu {:5.1}%  mem {:7.1}/{:.0} MB  disk r/w {:5.1}/{:5.1} MB/s  history {}",
            res.cpu.total,
            res.memory.used,
            res.memory.total,
            res.disk.read,
            res.disk.write,
            dashboard.history().len()
        );
        if let Some(p) = visible.first() {
            log::info!(
                "top: {} (pid {}, {}) cpu {:.1}%  mem {:.1} MB  prio {}",
                p.name,
                p.pid,
                p.status.letter(),
                p.cpu,
                p.memory,
                p.priority
            );
        }
    }
}
