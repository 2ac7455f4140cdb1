mod catalog;
mod dna;
mod engine;
mod fitness;
mod grid;
mod mutate;
mod settings;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::process::ExitCode;

use crate::catalog::generate_boxes;
use crate::engine::Engine;
use crate::fitness::{Evaluation, evaluate};
use crate::grid::Mask;
use crate::settings::AppSettings;

fn main() -> ExitCode {
    // configure Rayon's global thread pool once at startup so worker threads
    // get nice names like "rayon-0".
    let _ = rayon::ThreadPoolBuilder::new()
        .thread_name(|i| format!("rayon-{i}"))
        .build_global();

    // optional first argument: path to a settings file; missing file = defaults.
    let path = std::env::args().nth(1).unwrap_or_else(|| "settings.json".to_owned());
    let settings = match AppSettings::load(&path) {
        Ok(s) => {
            println!("loaded settings from {path}");
            s
        }
        Err(_) => {
            println!("no settings at {path}, using defaults");
            AppSettings::default()
        }
    };

    if let Err(err) = settings.validate() {
        eprintln!("invalid configuration: {err}");
        return ExitCode::FAILURE;
    }

    // one seeded generator drives the whole run: catalog first, then the
    // engine continues the same stream.
    let mut rng = Pcg32::seed_from_u64(settings.seed);
    let boxes = generate_boxes(
        settings.box_count,
        settings.min_box_width,
        settings.max_box_width,
        settings.min_box_height,
        settings.max_box_height,
        &mut rng,
    );
    let mask = settings.build_mask();

    println!("running optimization with {} boxes...", settings.box_count);
    println!(
        "parameters: {} generations, population size {}, mutation rate {}",
        settings.generations, settings.population_size, settings.mutation_rate
    );
    println!();

    let result = Engine::new(boxes.clone(), mask.clone(), settings.evolution_params(), rng).run();

    // re-materialize full placements for display; the engine only keeps scores.
    let best = match &result.best {
        Some(best) => best.individual.clone(),
        None => {
            // no generation ever placed a box; fall back to the final
            // generation's best-sorted survivor so the report stays honest.
            println!("no individual ever placed a box; showing a final-generation survivor");
            result.worst.individual.clone()
        }
    };
    let best_eval = evaluate(&best, &mask, &boxes);
    let worst_eval = evaluate(&result.worst.individual, &mask, &boxes);

    println!("{}", "=".repeat(50));
    println!("OPTIMIZATION RESULTS");
    println!("{}", "=".repeat(50));
    println!("first generation:");
    println!("  best score:     {} boxes placed", result.first_gen_best_score);
    println!("  worst score:    {} boxes placed", result.first_gen_worst_score);
    println!();
    println!("final:");
    println!("  best score:     {} boxes placed", best_eval.score);
    println!("  worst score:    {} boxes placed", worst_eval.score);
    println!();
    println!("improvement:");
    println!(
        "  best:           {:+} boxes",
        best_eval.score as i64 - result.first_gen_best_score as i64
    );
    println!(
        "  worst:          {:+} boxes",
        worst_eval.score as i64 - result.first_gen_worst_score as i64
    );
    println!();
    println!("execution time:   {:.3} seconds", result.execution_time.as_secs_f64());
    println!("{}", "=".repeat(50));
    println!();
    println!("best placement ({} of {} boxes):", best_eval.score, boxes.len());
    print!("{}", render_ascii(&best_eval, &mask));

    ExitCode::SUCCESS
}

/// draw the placement over the mask: '#' blocked, '.' empty, letters cycling
/// A..Z for placement ids.
fn render_ascii(eval: &Evaluation, mask: &Mask) -> String {
    let mut cells = vec![b'.'; mask.width() * mask.height()];
    for row in 0..mask.height() {
        for col in 0..mask.width() {
            if !mask.is_available(row, col) {
                cells[row * mask.width() + col] = b'#';
            }
        }
    }
    for p in &eval.placements {
        let glyph = b'A' + ((p.id - 1) % 26) as u8;
        for row in p.row..p.row + p.height {
            for col in p.col..p.col + p.width {
                cells[row * mask.width() + col] = glyph;
            }
        }
    }

    let mut out = String::with_capacity((mask.width() + 1) * mask.height());
    for row in 0..mask.height() {
        for col in 0..mask.width() {
            out.push(cells[row * mask.width() + col] as char);
        }
        out.push('\n');
    }
    out
}
