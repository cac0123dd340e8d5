//! Command line parsing for the `particle-field` binary.

use std::path::PathBuf;

use particle_field::{clamp_device_pixel_ratio, FieldError};

/// Largest snapshot edge in physical pixels (wgpu's default texture limit).
pub const MAX_SNAPSHOT_DIMENSION: u32 = 8192;

pub const USAGE: &str = "\
Usage: particle-field [OPTIONS]

Options:
  --config <path.json>   Load field settings from a JSON file
  --reduced-motion       Start with reduced motion (field stays off)
  --seed <u64>           Seed particle creation
  --snapshot <out.png>   Render headlessly to a PNG instead of opening a window
  --frames <n>           Frames to simulate for --snapshot (default 120)
  --size <WxH>           Logical viewport for --snapshot (default 1280x720)
  --dpr <f>              Device pixel ratio for --snapshot (default 1)
  -h, --help             Print this help

Environment:
  PARTICLE_FIELD_REDUCED_MOTION=1   Same as --reduced-motion
  RUST_LOG=info                     Log verbosity";

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub reduced_motion: bool,
    pub seed: Option<u64>,
    pub snapshot: Option<PathBuf>,
    pub frames: u32,
    pub size: (f32, f32),
    pub dpr: f32,
    pub help: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            config: None,
            reduced_motion: false,
            seed: None,
            snapshot: None,
            frames: 120,
            size: (1280.0, 720.0),
            dpr: 1.0,
            help: false,
        }
    }
}

impl Args {
    /// Parse arguments (without the program name).
    pub fn parse<I, S>(args: I) -> Result<Self, FieldError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = Args::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            let mut value = |name: &str| {
                args.next()
                    .ok_or_else(|| FieldError::Usage(format!("{} needs a value", name)))
            };
            match arg.as_str() {
                "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
                "--reduced-motion" => parsed.reduced_motion = true,
                "--seed" => parsed.seed = Some(parse_number(&value("--seed")?, "--seed")?),
                "--snapshot" => parsed.snapshot = Some(PathBuf::from(value("--snapshot")?)),
                "--frames" => parsed.frames = parse_number(&value("--frames")?, "--frames")?,
                "--size" => parsed.size = parse_size(&value("--size")?)?,
                "--dpr" => parsed.dpr = parse_number(&value("--dpr")?, "--dpr")?,
                "-h" | "--help" => parsed.help = true,
                other => return Err(FieldError::Usage(format!("unknown argument: {}\n\n{}", other, USAGE))),
            }
        }

        Ok(parsed)
    }
}

/// Truthy values of `PARTICLE_FIELD_REDUCED_MOTION`.
pub fn env_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

/// Reject snapshots whose physical buffer would exceed
/// [`MAX_SNAPSHOT_DIMENSION`] on either edge.
pub fn check_snapshot_size(size: (f32, f32), dpr: f32, max_dpr: f32) -> Result<(), FieldError> {
    let scale = clamp_device_pixel_ratio(dpr, max_dpr);
    let (width, height) = ((size.0 * scale).floor(), (size.1 * scale).floor());
    let limit = MAX_SNAPSHOT_DIMENSION as f32;
    if width <= limit && height <= limit {
        Ok(())
    } else {
        Err(FieldError::Usage(format!(
            "snapshot of {}x{} px exceeds the {} px limit; lower --size or --dpr",
            width, height, MAX_SNAPSHOT_DIMENSION
        )))
    }
}

fn parse_number<T: std::str::FromStr>(text: &str, name: &str) -> Result<T, FieldError> {
    text.parse()
        .map_err(|_| FieldError::Usage(format!("invalid value for {}: {}", name, text)))
}

fn parse_size(text: &str) -> Result<(f32, f32), FieldError> {
    let invalid = || FieldError::Usage(format!("invalid --size {}, expected WxH", text));
    let (w, h) = text.split_once(['x', 'X']).ok_or_else(invalid)?;
    let w: f32 = w.trim().parse().map_err(|_| invalid())?;
    let h: f32 = h.trim().parse().map_err(|_| invalid())?;
    if w > 0.0 && h > 0.0 {
        Ok((w, h))
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse(Vec::<String>::new()).unwrap();
        assert_eq!(args, Args::default());
    }

    #[test]
    fn test_snapshot_arguments() {
        let args = Args::parse([
            "--snapshot", "out.png", "--frames", "30", "--size", "1024x600", "--dpr", "2", "--seed", "9",
        ])
        .unwrap();
        assert_eq!(args.snapshot, Some(PathBuf::from("out.png")));
        assert_eq!(args.frames, 30);
        assert_eq!(args.size, (1024.0, 600.0));
        assert_eq!(args.dpr, 2.0);
        assert_eq!(args.seed, Some(9));
    }

    #[test]
    fn test_missing_value_is_usage_error() {
        assert!(matches!(Args::parse(["--seed"]), Err(FieldError::Usage(_))));
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(Args::parse(["--size", "wide"]).is_err());
        assert!(Args::parse(["--size", "0x10"]).is_err());
        assert!(Args::parse(["--frames", "-1"]).is_err());
        assert!(Args::parse(["--bogus"]).is_err());
    }

    #[test]
    fn test_snapshot_size_limit() {
        assert!(check_snapshot_size((1280.0, 720.0), 2.0, 2.0).is_ok());
        assert!(check_snapshot_size((4096.0, 4096.0), 2.0, 2.0).is_ok());
        // DPR 3 is clamped to 2 before sizing.
        assert!(check_snapshot_size((4000.0, 3000.0), 3.0, 2.0).is_ok());
        assert!(matches!(
            check_snapshot_size((100_000.0, 100_000.0), 2.0, 2.0),
            Err(FieldError::Usage(_))
        ));
        assert!(check_snapshot_size((8193.0, 10.0), 1.0, 2.0).is_err());
    }

    #[test]
    fn test_env_flag() {
        assert!(env_flag(Some("1")));
        assert!(env_flag(Some("TRUE")));
        assert!(!env_flag(Some("0")));
        assert!(!env_flag(None));
    }
}
