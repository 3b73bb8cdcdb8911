use std::cmp::Ordering;
use std::fmt::Write;

use crate::model::{BrokerStorageFree, PartitionSizes, TopicPartitionSize};

const SI_UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// SI-unit byte size: `9 B`, `1.5 kB`, `83 MB`.
pub fn humanize_bytes(bytes: u64) -> String {
    if bytes < 10 {
        return format!("{} B", bytes);
    }

    let exp = ((bytes as f64).ln() / 1000f64.ln()).floor() as usize;
    let exp = exp.min(SI_UNITS.len() - 1);
    let val = ((bytes as f64 / 1000f64.powi(exp as i32)) * 10.0 + 0.5).floor() / 10.0;

    if val < 10.0 {
        format!("{:.1} {}", val, SI_UNITS[exp])
    } else {
        format!("{:.0} {}", val, SI_UNITS[exp])
    }
}

/// Human readable listing of both snapshots, used instead of writing them on a dry run.
///
/// Partitions are listed in ascending numeric order whatever order the samples came in.
pub fn render_report(brokers: &BrokerStorageFree, partitions: &TopicPartitionSize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "partition mapping");
    for (topic, sizes) in partitions {
        let _ = writeln!(out, "topic: {}", topic);
        for (partition, size) in sorted_partitions(sizes) {
            let _ = writeln!(
                out,
                "partition {:<4} size: {}",
                partition,
                humanize_bytes(size as u64)
            );
        }
    }

    let _ = writeln!(out, "fetched metrics");
    for (broker_id, storage) in brokers {
        let _ = writeln!(
            out,
            "broker #{:<4} {:>15}: {}",
            broker_id,
            "storage free",
            humanize_bytes(storage.storage_free as u64)
        );
    }

    out
}

// Numeric partitions first, ascending; anything else after, lexicographically.
fn sorted_partitions(sizes: &PartitionSizes) -> Vec<(&str, f64)> {
    let mut entries: Vec<(&str, f64)> = sizes
        .iter()
        .map(|(partition, size)| (partition.as_str(), size.size))
        .collect();

    entries.sort_by(|(a, _), (b, _)| match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    });

    entries
}
