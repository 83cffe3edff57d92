use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;
use victor_spx::can::{SimulatedDevice, SocketCanChannel};
use victor_spx::config::file::{load_configuration, save_configuration, to_toml_string};
use victor_spx::settings::{Settings, DEFAULT_SETTINGS_FILE};
use victor_spx::{ParameterChannel, StatusCode, VictorSpx, VictorSpxConfiguration};

const USAGE: &str = "\
Usage: spx-config [--sim] [--settings <file>] <command>

Commands:
  apply <file.toml>    Write a configuration to the device
  dump [file.toml]     Read the configuration from the device
  defaults             Print the default configuration
  factory-default      Restore the device defaults";

#[derive(Debug, PartialEq)]
enum Command {
    Apply(PathBuf),
    Dump(Option<PathBuf>),
    Defaults,
    FactoryDefault,
}

#[derive(Debug, PartialEq)]
struct Args {
    command: Command,
    simulate: bool,
    settings_file: PathBuf,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut simulate = false;
    let mut settings_file = PathBuf::from(DEFAULT_SETTINGS_FILE);
    let mut positional = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sim" => simulate = true,
            "--settings" => {
                let path = args.next().ok_or_else(|| anyhow!("--settings needs a file"))?;
                settings_file = PathBuf::from(path);
            }
            "-h" | "--help" => bail!("{}", USAGE),
            flag if flag.starts_with('-') => bail!("Unknown option {}\n\n{}", flag, USAGE),
            other => positional.push(other.to_string()),
        }
    }

    let mut positional = positional.into_iter();
    let command = match positional.next().as_deref() {
        Some("apply") => {
            let file = positional.next().ok_or_else(|| anyhow!("apply needs a file\n\n{}", USAGE))?;
            Command::Apply(PathBuf::from(file))
        }
        Some("dump") => Command::Dump(positional.next().map(PathBuf::from)),
        Some("defaults") => Command::Defaults,
        Some("factory-default") => Command::FactoryDefault,
        Some(other) => bail!("Unknown command {}\n\n{}", other, USAGE),
        None => bail!("{}", USAGE),
    };

    if let Some(extra) = positional.next() {
        bail!("Unexpected argument {}\n\n{}", extra, USAGE);
    }

    Ok(Args {
        command,
        simulate,
        settings_file,
    })
}

fn check(status: StatusCode, operation: &str) -> Result<()> {
    if status.is_ok() {
        Ok(())
    } else {
        bail!("{} finished with {} ({})", operation, status, status.code())
    }
}

fn run<C: ParameterChannel>(victor: &mut VictorSpx<C>, command: &Command, timeout_ms: u64) -> Result<()> {
    match command {
        Command::Apply(path) => {
            let config = load_configuration(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            check(victor.config_all_settings(&config, timeout_ms), "Configure")
        }
        Command::Dump(path) => {
            let mut config = VictorSpxConfiguration::DEFAULT;
            let status = victor.get_all_configs(&mut config, timeout_ms);
            match path {
                Some(path) => save_configuration(path, &config)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => print!("{}", to_toml_string(&config)?),
            }
            check(status, "Read")
        }
        Command::FactoryDefault => check(victor.config_factory_default(timeout_ms), "Factory default"),
        Command::Defaults => print_defaults(),
    }
}

fn print_defaults() -> Result<()> {
    print!("{}", to_toml_string(&VictorSpxConfiguration::DEFAULT)?);
    Ok(())
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("victor_spx=debug,spx_config=debug,info")
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;

    // No device needed
    if args.command == Command::Defaults {
        return print_defaults();
    }

    let settings = Settings::load(&args.settings_file)
        .with_context(|| format!("Failed to load settings {}", args.settings_file.display()))?;

    if args.simulate || settings.simulate {
        let device = SimulatedDevice::new(settings.device_number);
        let mut victor = VictorSpx::new(settings.device_number, device)
            .map_err(|status| anyhow!("Invalid device number {}: {}", settings.device_number, status))?;
        let result = run(&mut victor, &args.command, settings.timeout_ms);
        info!("Simulated device accepted {} writes", victor.base().channel().writes().len());
        result
    } else {
        let channel = SocketCanChannel::open(&settings.interface, settings.device_number)?;
        let mut victor = VictorSpx::new(settings.device_number, channel)
            .map_err(|status| anyhow!("Invalid device number {}: {}", settings.device_number, status))?;
        run(&mut victor, &args.command, settings.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_apply() {
        let parsed = args(&["--sim", "apply", "arm.toml"]).unwrap();
        assert_eq!(parsed.command, Command::Apply(PathBuf::from("arm.toml")));
        assert!(parsed.simulate);
        assert_eq!(parsed.settings_file, PathBuf::from(DEFAULT_SETTINGS_FILE));
    }

    #[test]
    fn test_parse_dump_and_settings() {
        let parsed = args(&["dump", "--settings", "bench.toml"]).unwrap();
        assert_eq!(parsed.command, Command::Dump(None));
        assert_eq!(parsed.settings_file, PathBuf::from("bench.toml"));
        assert!(!parsed.simulate);
    }

    #[test]
    fn test_parse_errors() {
        assert!(args(&[]).is_err());
        assert!(args(&["apply"]).is_err());
        assert!(args(&["flash"]).is_err());
        assert!(args(&["--verbose", "defaults"]).is_err());
        assert!(args(&["defaults", "extra"]).is_err());
    }

    #[test]
    fn test_run_dump_on_simulated_device() {
        let mut victor = VictorSpx::new(2, SimulatedDevice::new(2)).unwrap();
        let path = std::env::temp_dir().join(format!("victor-spx-dump-{}.toml", std::process::id()));

        // The fresh device reports the firmware sensor selection
        run(&mut victor, &Command::Dump(Some(path.clone())), 10).unwrap();
        let dumped = load_configuration(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(dumped.base, VictorSpxConfiguration::DEFAULT.base);
        assert_eq!(dumped.sum0_term, VictorSpxConfiguration::DEFAULT.sum0_term);
    }

    #[test]
    fn test_run_reports_error_status() {
        let mut device = SimulatedDevice::new(0);
        device.inject_fault(victor_spx::ParamEnum::FeedbackSensorType, StatusCode::RxTimeout);
        let mut victor = VictorSpx::new(0, device).unwrap();
        assert!(run(&mut victor, &Command::FactoryDefault, 10).is_err());
    }
}
