//! Performance benchmark comparing serial and parallel stepping

use std::time::Instant;

use life_grid::{Algorithm, AutomatonGrid};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn benchmark(algorithm: Algorithm, size: i32, iterations: u32) -> Result<f64, life_grid::GridError> {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mut grid = AutomatonGrid::new(size, size)?;
    grid.randomize(&mut rng, 0.3);

    let start = Instant::now();
    for _ in 0..iterations {
        match algorithm {
            Algorithm::Serial => grid.step(),
            Algorithm::Parallel => grid.step_parallel(),
        }
    }
    log::debug!("{size}x{size} {} finished with {} alive", algorithm.name(), grid.alive_count());
    Ok(start.elapsed().as_secs_f64() * 1000.0 / iterations as f64)
}

fn main() -> Result<(), life_grid::GridError> {
    env_logger::init();

    println!("=== Game of Life Step Benchmark ===\n");
    for algorithm in Algorithm::all() {
        println!("{:>10}: {}", algorithm.name(), algorithm.description());
    }
    println!();

    let sizes = [50, 100, 500, 1000, 2000];
    let iterations = 20;

    println!("{:>10} {:>12} {:>12} {:>10}", "Size", "Serial", "Parallel", "Speedup");
    println!("{:-<48}", "");

    for size in sizes {
        let serial_ms = benchmark(Algorithm::Serial, size, iterations)?;
        let parallel_ms = benchmark(Algorithm::Parallel, size, iterations)?;

        println!(
            "{:>10} {:>12.3} {:>12.3} {:>9.1}x",
            format!("{}x{}", size, size),
            serial_ms,
            parallel_ms,
            serial_ms / parallel_ms.max(f64::EPSILON)
        );
    }

    let size = 2000usize;
    let cells = size * size;
    let ms = benchmark(Algorithm::Parallel, size as i32, iterations)?;
    println!(
        "\nParallel at {size}x{size}: {:.2} ms/gen, {:.1}M cells/sec",
        ms,
        cells as f64 / (ms / 1000.0) / 1_000_000.0
    );

    Ok(())
}
