//! Lightweight parse/extract/format benchmark harness for local baselines.
//!
//! Run from repository root:
//! `cargo run -p itemkey_core --example key_benchmark --release`

use std::time::{Duration, Instant};

use itemkey_core::{key_extent, parse_key};

const SAMPLES: &[(&str, &str)] = &[
    ("bare", "system.cpu.load"),
    ("simple", "net.if.in[eth0,bytes]"),
    (
        "quoted",
        r#"log[/var/log/syslog,"error: \"disk\", code=5",,100,skip]"#,
    ),
    ("nested", "web.page.perf[[a,[b,c]],\"d,e\",[f]]"),
    ("legacy", "jmx[java.lang:type=Memory][HeapMemoryUsage.used]"),
];

fn per_iter_us(elapsed: Duration, iterations: usize) -> f64 {
    elapsed.as_secs_f64() * 1_000_000.0 / iterations as f64
}

fn run_benchmark(label: &str, input: &str, iterations: usize) {
    let parse_start = Instant::now();
    for _ in 0..iterations {
        let _ = parse_key(input);
    }
    let parse_elapsed = parse_start.elapsed();

    let key = parse_key(input);
    let format_start = Instant::now();
    for _ in 0..iterations {
        let _ = key.to_key_string();
    }
    let format_elapsed = format_start.elapsed();

    let expr = format!("{input}.last(0)");
    let extract_start = Instant::now();
    for _ in 0..iterations {
        let _ = key_extent(&expr);
    }
    let extract_elapsed = extract_start.elapsed();

    println!("Benchmark: {label} (valid={})", key.is_valid());
    println!("  input_chars: {}", input.chars().count());
    println!(
        "  parse:   total={:?}, per_iter={:.3} us",
        parse_elapsed,
        per_iter_us(parse_elapsed, iterations)
    );
    println!(
        "  format:  total={:?}, per_iter={:.3} us",
        format_elapsed,
        per_iter_us(format_elapsed, iterations)
    );
    println!(
        "  extract: total={:?}, per_iter={:.3} us",
        extract_elapsed,
        per_iter_us(extract_elapsed, iterations)
    );
}

fn main() {
    let iterations = std::env::var("ITEMKEY_BENCH_ITERS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(100_000);

    for (label, input) in SAMPLES {
        run_benchmark(label, input, iterations);
    }
}
