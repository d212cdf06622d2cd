use std::path::PathBuf;
use std::process::ExitCode;

use transform_lab::scenes::{
    Exercise, FovScene, HomogeneousScene, LinearScene, OrbitScene, UnknownExercise,
};
use transform_lab::{AppConfig, GeometryLoader, Scene, run_with_config};

const DEFAULT_MESH: &str = "assets/cube.ply";

const USAGE: &str = "usage: transform-lab <fov|linear|homogeneous|orbits> [mesh.ply|mesh.stl]

environment:
  TRANSFORM_LAB_FONT  TTF/OTF file for panel labels
  TRANSFORM_LAB_SEED  seed for random points and orbits
  RUST_LOG            log filter, e.g. debug";

#[derive(Debug, PartialEq)]
struct Args {
    exercise: Exercise,
    mesh: PathBuf,
}

#[derive(Debug, PartialEq, thiserror::Error)]
enum ArgsError {
    #[error("missing exercise")]
    MissingExercise,
    #[error(transparent)]
    UnknownExercise(#[from] UnknownExercise),
    #[error("unexpected argument {0:?}")]
    Unexpected(String),
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, ArgsError> {
    let exercise = args.next().ok_or(ArgsError::MissingExercise)?.parse::<Exercise>()?;
    let mesh = args.next().map_or_else(|| PathBuf::from(DEFAULT_MESH), PathBuf::from);
    if let Some(extra) = args.next() {
        return Err(ArgsError::Unexpected(extra));
    }
    Ok(Args { exercise, mesh })
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}\n\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let config = AppConfig::from_env().title(args.exercise.title());
    let seed = config.seed_or_random();

    let scene: Box<dyn Scene> = if args.exercise.uses_mesh() {
        let mesh = match GeometryLoader::from_file(&args.mesh).build() {
            Ok(mesh) => mesh,
            Err(err) => {
                log::error!("could not load {}: {err}", args.mesh.display());
                return ExitCode::FAILURE;
            }
        };
        match args.exercise {
            Exercise::Linear => Box::new(LinearScene::new(mesh)),
            Exercise::Homogeneous => Box::new(HomogeneousScene::new(mesh)),
            _ => {
                log::info!("orbit seed {seed}");
                Box::new(OrbitScene::new(mesh, seed))
            }
        }
    } else {
        log::info!("point seed {seed}");
        Box::new(FovScene::new(seed))
    };

    match run_with_config(config, scene) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event loop failed: {err}");
            ExitCode::FAILURE
        }
    }
}
