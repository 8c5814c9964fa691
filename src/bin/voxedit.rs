//! Edit script runner: applies strokes and region growing to a raw volume.
//!
//! Usage: cargo run --release --bin voxedit -- [OPTIONS]
//!
//! Options:
//!   --script <PATH>   JSON edit script (volume layout + commands)
//!   --input <PATH>    Raw volume, native byte order, x fastest
//!   --output <PATH>   Where to write the edited volume
//!   --roi <PATH>      Optional u8 mask with the same dims; 0 = locked
//!   --diff <PATH>     Optional file for the flattened undo history

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use voxedit::core::{logging, Result};
use voxedit::session::{EditScript, EditSession};
use voxedit::volume::{ScalarKind, Volume, VoxelScalar};

struct Args {
    script: PathBuf,
    input: PathBuf,
    output: PathBuf,
    roi: Option<PathBuf>,
    diff: Option<PathBuf>,
}

fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let (Some(script), Some(input), Some(output)) = (
        parse_path_arg(&args, "--script"),
        parse_path_arg(&args, "--input"),
        parse_path_arg(&args, "--output"),
    ) else {
        eprintln!("usage: voxedit --script <json> --input <raw> --output <raw> [--roi <raw>] [--diff <file>]");
        return ExitCode::from(2);
    };
    let args = Args {
        script,
        input,
        output,
        roi: parse_path_arg(&args, "--roi"),
        diff: parse_path_arg(&args, "--diff"),
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let script = EditScript::load(&args.script)?;
    log::info!(
        "Script {}: {} volume {:?}, {} commands",
        args.script.display(),
        script.volume.dims(),
        script.volume.scalar,
        script.commands.len()
    );

    match script.volume.scalar {
        ScalarKind::U8 => run_typed::<u8>(&script, args),
        ScalarKind::I8 => run_typed::<i8>(&script, args),
        ScalarKind::U16 => run_typed::<u16>(&script, args),
        ScalarKind::I16 => run_typed::<i16>(&script, args),
        ScalarKind::U32 => run_typed::<u32>(&script, args),
        ScalarKind::I32 => run_typed::<i32>(&script, args),
        ScalarKind::F32 => run_typed::<f32>(&script, args),
        ScalarKind::F64 => run_typed::<f64>(&script, args),
    }
}

fn run_typed<T: VoxelScalar>(script: &EditScript, args: &Args) -> Result<()> {
    let dims = script.volume.dims();
    let spacing = script.volume.spacing();

    let volume = Volume::<T>::from_raw_bytes(dims, spacing, &std::fs::read(&args.input)?)?;
    let mut session = EditSession::new(volume, &script.session);
    if let Some(path) = &args.roi {
        let roi = Volume::<u8>::from_raw_bytes(dims, spacing, &std::fs::read(path)?)?;
        session = session.with_roi(roi)?;
    }

    let start = Instant::now();
    for (i, command) in script.commands.iter().enumerate() {
        log::debug!("[{}/{}] {}", i + 1, script.commands.len(), command.name());
        session.run(command)?;
    }
    log::info!(
        "Ran {} commands in {:.1}ms ({} undoable steps, {} bytes of history)",
        script.commands.len(),
        start.elapsed().as_secs_f64() * 1000.0,
        session.history().len(),
        session.history().byte_size()
    );

    if let Some(path) = &args.diff {
        save_history(&session, path)?;
    }
    std::fs::write(&args.output, session.volume().as_bytes())?;
    log::info!("Wrote {}", args.output.display());
    Ok(())
}

fn save_history<T: VoxelScalar>(session: &EditSession<T>, path: &Path) -> Result<()> {
    match session.flattened_history()? {
        Some(diff) => {
            diff.save(path)?;
            log::info!("Wrote {} diff entries to {}", diff.len(), path.display());
        }
        None => log::warn!("No edits recorded, skipping {}", path.display()),
    }
    Ok(())
}

fn parse_path_arg(args: &[String], flag: &str) -> Option<PathBuf> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from)
}
