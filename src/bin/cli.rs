use anyhow::{bail, Context, Result};
use ecolumina_capture::{BlurVerdict, CaptureGate, CaptureMode, EcoLuminaConfig, Frame};
use std::env;
use std::path::{Path, PathBuf};

const USAGE: &str = "Usage: ecolumina-cli <command> [args]

Commands:
  check <image>... [--threshold N] [--scale F] [--lenient] [--config PATH] [--json]
  capture <image> <out.jpg> [--lenient] [--config PATH]
  config [--config PATH]
  --version";

fn main() -> Result<()> {
    ecolumina_capture::init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("{}", USAGE);
        std::process::exit(1);
    }

    let command = &args[1];
    match command.as_str() {
        "--version" | "version" => {
            println!("ecolumina-cli {}", ecolumina_capture::VERSION);
            Ok(())
        }
        "check" => cmd_check(&args[2..]),
        "capture" => cmd_capture(&args[2..]),
        "config" => cmd_config(&args[2..]),
        _ => {
            eprintln!("Unknown command: {}\n\n{}", command, USAGE);
            std::process::exit(1);
        }
    }
}

/// Command-line flags before the config file is consulted
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    config_path: Option<PathBuf>,
    threshold: Option<f64>,
    scale: Option<f64>,
    lenient: bool,
    json: bool,
    positional: Vec<String>,
}

/// Options shared by all commands
struct Options {
    config: EcoLuminaConfig,
    mode: CaptureMode,
    json: bool,
    positional: Vec<String>,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let value = args.get(i).context("--config needs a path")?;
                parsed.config_path = Some(PathBuf::from(value));
            }
            "--threshold" => {
                i += 1;
                let value = args.get(i).context("--threshold needs a value")?;
                parsed.threshold = Some(value.parse().context("invalid --threshold")?);
            }
            "--scale" => {
                i += 1;
                let value = args.get(i).context("--scale needs a value")?;
                parsed.scale = Some(value.parse().context("invalid --scale")?);
            }
            "--lenient" => parsed.lenient = true,
            "--json" => parsed.json = true,
            other => parsed.positional.push(other.to_string()),
        }
        i += 1;
    }

    Ok(parsed)
}

fn resolve_options(args: CliArgs) -> Result<Options> {
    let path = args.config_path.unwrap_or_else(EcoLuminaConfig::default_path);
    let mut config = EcoLuminaConfig::load_from_file(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;

    if let Some(t) = args.threshold {
        config.detector.threshold = t;
    }
    if let Some(s) = args.scale {
        config.detector.downscale_factor = s;
    }
    config.validate()?;

    let mode = if args.lenient {
        CaptureMode::LenientSkipCheck
    } else {
        config.capture.default_mode
    };

    Ok(Options {
        config,
        mode,
        json: args.json,
        positional: args.positional,
    })
}

fn parse_options(args: &[String]) -> Result<Options> {
    resolve_options(parse_args(args)?)
}

fn load_frame(path: &Path) -> Result<Frame> {
    let img = image::open(path)
        .with_context(|| format!("failed to decode image {}", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(Frame::from_rgba(
        img.into_raw(),
        width,
        height,
        path.display().to_string(),
    ))
}

fn cmd_check(args: &[String]) -> Result<()> {
    let opts = parse_options(args)?;
    if opts.positional.is_empty() {
        bail!("check needs at least one image");
    }

    let gate = CaptureGate::from_config(&opts.config);
    for path in &opts.positional {
        let frame = load_frame(Path::new(path))?;
        let verdict = gate.assess(&frame, opts.mode);
        println!("{}", check_report(path, &verdict, opts.json)?);
    }
    Ok(())
}

/// One line of `check` output for an image
fn check_report(path: &str, verdict: &BlurVerdict, json: bool) -> Result<String> {
    if json {
        let value = match verdict {
            BlurVerdict::Skipped => serde_json::json!({
                "path": path,
                "skipped": true,
                "is_blurry": false,
            }),
            BlurVerdict::Sharp(m) | BlurVerdict::Blurry(m) => serde_json::json!({
                "path": path,
                "metrics": m,
                "is_blurry": m.is_blurry,
            }),
            BlurVerdict::Unmeasured(e) => serde_json::json!({
                "path": path,
                "metrics": null,
                "error": e.to_string(),
                "is_blurry": false,
            }),
        };
        return Ok(serde_json::to_string(&value)?);
    }

    Ok(match verdict {
        BlurVerdict::Skipped => format!("{}: skipped (lenient mode)", path),
        BlurVerdict::Sharp(m) | BlurVerdict::Blurry(m) => format!(
            "{}: {} (variance {:.2}, threshold {:.2}, {} samples)",
            path,
            if m.is_blurry { "blurry" } else { "sharp" },
            m.variance,
            m.threshold,
            m.sample_count
        ),
        BlurVerdict::Unmeasured(e) => format!("{}: sharp (check skipped: {})", path, e),
    })
}

fn cmd_capture(args: &[String]) -> Result<()> {
    let opts = parse_options(args)?;
    let (input, output) = match opts.positional.as_slice() {
        [input, output] => (input, output),
        _ => bail!("Usage: ecolumina-cli capture <image> <out.jpg> [--lenient] [--config PATH]"),
    };

    let gate = CaptureGate::from_config(&opts.config);
    let frame = load_frame(Path::new(input))?;

    match gate.capture(&frame, opts.mode) {
        Ok(photo) => {
            std::fs::write(output, &photo.jpeg)
                .with_context(|| format!("failed to write {}", output))?;
            println!("Saved {}x{} capture to {}", photo.width, photo.height, output);
            Ok(())
        }
        Err(e) if e.is_blurry() => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_config(args: &[String]) -> Result<()> {
    let opts = parse_options(args)?;
    print!("{}", toml::to_string_pretty(&opts.config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecolumina_capture::testing::uniform_frame;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_flags() {
        let parsed = parse_args(&args(&[
            "a.png",
            "--lenient",
            "--threshold",
            "12.5",
            "--json",
            "b.png",
        ]))
        .unwrap();

        assert!(parsed.lenient);
        assert!(parsed.json);
        assert_eq!(parsed.threshold, Some(12.5));
        assert_eq!(parsed.positional, vec!["a.png", "b.png"]);

        assert!(parse_args(&args(&["--scale"])).is_err());
        assert!(parse_args(&args(&["--threshold", "abc"])).is_err());
    }

    #[test]
    fn test_lenient_flag_selects_skip_mode() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("ecolumina.toml");
        let config_arg = config_path.display().to_string();

        let strict = parse_options(&args(&["--config", &config_arg, "a.png"])).unwrap();
        assert_eq!(strict.mode, CaptureMode::Strict);

        let lenient =
            parse_options(&args(&["--config", &config_arg, "--lenient", "a.png"])).unwrap();
        assert_eq!(lenient.mode, CaptureMode::LenientSkipCheck);
    }

    #[test]
    fn test_check_reports_skip_in_lenient_mode() {
        let gate = CaptureGate::default();
        let flat = uniform_frame(100, 100, 128);

        let lenient = gate.assess(&flat, CaptureMode::LenientSkipCheck);
        assert_eq!(
            check_report("flat.png", &lenient, false).unwrap(),
            "flat.png: skipped (lenient mode)"
        );
        let json: serde_json::Value =
            serde_json::from_str(&check_report("flat.png", &lenient, true).unwrap()).unwrap();
        assert_eq!(json["skipped"], true);
        assert_eq!(json["is_blurry"], false);

        let strict = gate.assess(&flat, CaptureMode::Strict);
        let line = check_report("flat.png", &strict, false).unwrap();
        assert!(line.starts_with("flat.png: blurry"));
    }
}
