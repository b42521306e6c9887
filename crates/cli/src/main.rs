use anyhow::{Context, Result};
use clap::Parser;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use saccade_core::render::{self, Frame};
use saccade_core::{EnvConfig, Patch, PatchLibrary, SaccadeEnv};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Run one seeded episode of the saccade environment with a random
/// foveation policy and print a JSON summary.
#[derive(Parser, Debug)]
#[command(name = "saccade")]
struct Args {
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 64)]
    canvas_size: usize,
    #[arg(long, default_value_t = 28)]
    patch_size: usize,
    #[arg(long, default_value_t = 4)]
    num_box_per_side: usize,
    #[arg(long, default_value_t = 100)]
    seq_len: usize,
    #[arg(long, default_value_t = 2)]
    num_active_patches: usize,
    /// Number of synthetic patches generated for the library.
    #[arg(long, default_value_t = 10)]
    library_size: usize,
    /// Sample a step record every this many steps.
    #[arg(long, default_value_t = 10)]
    sample_every: usize,
    /// Write the final composed frame as a binary PPM.
    #[arg(long)]
    frame: Option<PathBuf>,
}

/// Generate a library of filled discs with varying radius and intensity,
/// standing in for digit bitmaps.
fn synthetic_library(count: usize, side: usize, seed: u64) -> Result<PatchLibrary> {
    let mut rng = ChaCha12Rng::seed_from_u64(seed);
    let mut patches = Vec::with_capacity(count);
    for _ in 0..count {
        let intensity: u8 = rng.random_range(120..=255);
        let radius = rng.random_range(side as f64 * 0.2..=side as f64 * 0.5);
        let center = side as f64 / 2.0;
        let mut data = vec![0u8; side * side];
        for r in 0..side {
            for c in 0..side {
                let dr = r as f64 + 0.5 - center;
                let dc = c as f64 + 0.5 - center;
                if (dr * dr + dc * dc).sqrt() <= radius {
                    data[r * side + c] = intensity;
                }
            }
        }
        patches.push(Patch::new(side, data)?);
    }
    Ok(PatchLibrary::new(side, patches)?)
}

fn write_ppm(frame: &Frame, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    write!(file, "P6\n{} {}\n255\n", frame.width(), frame.height())?;
    file.write_all(frame.data())?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let library = synthetic_library(
        args.library_size,
        args.patch_size,
        args.seed.wrapping_add(1),
    )
    .context("building synthetic patch library")?;
    let config = EnvConfig {
        canvas_size: args.canvas_size,
        patch_size: args.patch_size,
        num_box_per_side: args.num_box_per_side,
        seq_len: args.seq_len,
        num_active_patches: args.num_active_patches,
        seed: args.seed,
    };
    let mut env = SaccadeEnv::new(library, config).context("constructing environment")?;

    let mut policy_rng = ChaCha12Rng::seed_from_u64(args.seed.wrapping_add(2));
    let summary = env
        .run_episode(
            |_, loc_size| policy_rng.random_range(0..loc_size),
            args.sample_every,
        )
        .context("running episode")?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if let Some(path) = args.frame {
        let frame = render::render_env(&env);
        write_ppm(&frame, &path)
            .with_context(|| format!("writing frame to {}", path.display()))?;
        eprintln!("wrote frame to {}", path.display());
    }
    Ok(())
}
