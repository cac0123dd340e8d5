mod cli;

use std::process::ExitCode;

use particle_field::{render_snapshot, save_png, FieldConfig, FieldError, SnapshotOptions};

use cli::{check_snapshot_size, env_flag, Args, USAGE};

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), FieldError> {
    let args = Args::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => FieldConfig::from_json_file(path)?,
        None => FieldConfig::new(),
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let env_reduced = std::env::var("PARTICLE_FIELD_REDUCED_MOTION").ok();
    let reduced_motion = args.reduced_motion || env_flag(env_reduced.as_deref());

    match &args.snapshot {
        Some(path) => {
            check_snapshot_size(args.size, args.dpr, config.max_dpr)?;
            let options = SnapshotOptions {
                width: args.size.0,
                height: args.size.1,
                device_pixel_ratio: args.dpr,
                frames: args.frames,
                reduced_motion,
                ..Default::default()
            };
            let snapshot = render_snapshot(&config, &options);
            save_png(&snapshot.surface, path)
        }
        None => particle_field::window::run(config, reduced_motion),
    }
}
