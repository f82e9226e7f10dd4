use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

use lomen::config::Config;
use lomen::layout::LIGHT_BAR_ZONES;
use lomen::{platform, Color, LightingStatus, LightingWorker, Zone, ZoneColors};

/// Keyboard lighting control for HP OMEN laptops
#[derive(Parser, Debug)]
#[command(
    name = "lomen",
    version,
    after_help = "Colors are names (red, darkorange, or a name from the config file) \
                  or 6-digit hex codes (#FF00FF or FF00FF).\n\
                  Without arguments, shows the lighting status."
)]
struct Cli {
    /// Show keyboard lighting status (after applying any changes)
    #[arg(short, long)]
    info: bool,

    /// Color of the first (right) zone
    #[arg(short, long, value_name = "COLOR")]
    right: Option<String>,

    /// Color of the second (center) zone
    #[arg(short, long, value_name = "COLOR")]
    center: Option<String>,

    /// Color of the third (left) zone
    #[arg(short, long, value_name = "COLOR")]
    left: Option<String>,

    /// Color of the fourth (game) zone
    #[arg(short, long, value_name = "COLOR")]
    game: Option<String>,

    /// Color for every zone not given explicitly
    #[arg(short, long, value_name = "COLOR")]
    all: Option<String>,

    /// Turn the keyboard backlight on
    #[arg(long, conflicts_with = "off")]
    on: bool,

    /// Turn the keyboard backlight off
    #[arg(long)]
    off: bool,

    /// Light bar colors, one per light bar zone
    #[arg(long, value_name = "C1,C2,C3,C4", conflicts_with = "light_bar_preset")]
    light_bar: Option<String>,

    /// Apply the light bar colors stored in the config file
    #[arg(long)]
    light_bar_preset: bool,

    /// Config file (default: <config dir>/lomen/config.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seconds to wait for the firmware before giving up
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

/// Validated changes to apply, in order
#[derive(Debug, Default, PartialEq)]
struct Request {
    lighting: Option<bool>,
    colors: ZoneColors,
    light_bar: Option<[Color; LIGHT_BAR_ZONES]>,
    info: bool,
}

impl Request {
    fn from_cli(cli: &Cli, config: &Config, no_args: bool) -> Result<Self> {
        let parse = |s: &Option<String>| -> Result<Option<Color>> {
            s.as_deref()
                .map(|s| config.parse_color(s))
                .transpose()
                .map_err(Into::into)
        };

        let zones = ZoneColors {
            right: parse(&cli.right)?,
            center: parse(&cli.center)?,
            left: parse(&cli.left)?,
            game: parse(&cli.game)?,
        };
        let colors = zones.or(parse(&cli.all)?);

        let lighting = match (cli.on, cli.off) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };

        let light_bar = if let Some(list) = &cli.light_bar {
            let parsed = list
                .split(',')
                .map(|s| config.parse_color(s))
                .collect::<lomen::Result<Vec<_>>>()?;
            let Ok(colors) = <[Color; LIGHT_BAR_ZONES]>::try_from(parsed) else {
                bail!("--light-bar needs exactly {} colors", LIGHT_BAR_ZONES);
            };
            Some(colors)
        } else if cli.light_bar_preset {
            match config.light_bar {
                Some(colors) => Some(colors),
                None => bail!("No light_bar preset in the config file"),
            }
        } else {
            None
        };

        Ok(Self {
            lighting,
            colors,
            light_bar,
            info: cli.info || no_args,
        })
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let no_args = std::env::args_os().len() <= 1;
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    // Validate everything before touching the firmware
    let request = Request::from_cli(&cli, &config, no_args)?;
    let timeout = cli.timeout.map(Duration::from_secs).or(config.timeout());

    let worker = LightingWorker::spawn(platform::connect, timeout)
        .context("Failed to open the HP BIOS WMI interface")?;

    if let Some(enabled) = request.lighting {
        worker
            .call(move |l| l.set_lighting_on(enabled))
            .context("Failed to switch keyboard lighting")?;
    }

    if !request.colors.is_empty() {
        let colors = request.colors;
        worker
            .call(move |l| l.set_colors(&colors))
            .context("Failed to set zone colors")?;
    }

    if let Some(colors) = request.light_bar {
        worker
            .call(move |l| l.set_light_bar_colors(&colors))
            .context("Failed to set light bar colors")?;
    }

    if request.info {
        let status = worker
            .call(|l| l.status())
            .context("Failed to read lighting status")?;
        print_status(&status);
    }

    Ok(())
}

fn print_status(status: &LightingStatus) {
    print!("{}", format_status(status));
}

fn format_status(status: &LightingStatus) -> String {
    let yes_no = |b: bool| if b { "Yes" } else { "No" };
    let unknown = "Unknown";
    let mut out = String::new();
    out.push_str(&format!("Keyboard type: {}\n", status.keyboard_type));
    out.push_str(&format!(
        "Lighting supported: {}\n",
        yes_no(status.lighting_supported)
    ));
    out.push_str(&format!(
        "Light bar supported: {}\n",
        status.light_bar_supported.map_or(unknown, yes_no)
    ));
    out.push_str(&format!(
        "Lighting: {}\n",
        status
            .lighting_on
            .map_or(unknown, |on| if on { "On" } else { "Off" })
    ));
    out.push_str("Zone colors:\n");
    for zone in Zone::ALL {
        if let Some(color) = status.colors.get(zone) {
            out.push_str(&format!("    {:<8}{}\n", zone.name(), color));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lomen::KeyboardType;

    fn request(args: &[&str]) -> Result<Request> {
        let cli = Cli::try_parse_from(std::iter::once("lomen").chain(args.iter().copied()))?;
        Request::from_cli(&cli, &Config::default(), args.is_empty())
    }

    #[test]
    fn test_no_args_shows_info() {
        let req = request(&[]).unwrap();
        assert_eq!(
            req,
            Request {
                info: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_all_fills_unset_zones() {
        let req = request(&["-r", "#FF0000", "--all", "blue"]).unwrap();
        assert_eq!(req.colors.right, Some(Color::new(255, 0, 0)));
        assert_eq!(req.colors.center, Some(Color::new(0, 0, 255)));
        assert_eq!(req.colors.game, Some(Color::new(0, 0, 255)));
        assert!(!req.info);
    }

    #[test]
    fn test_unspecified_zones_stay_unset() {
        let req = request(&["-g", "00ff00"]).unwrap();
        assert_eq!(req.colors.game, Some(Color::new(0, 255, 0)));
        assert_eq!(req.colors.right, None);
        assert_eq!(req.colors.left, None);
    }

    #[test]
    fn test_invalid_color_rejected() {
        assert!(request(&["-r", "#12345"]).is_err());
    }

    #[test]
    fn test_on_off() {
        assert_eq!(request(&["--on"]).unwrap().lighting, Some(true));
        assert_eq!(request(&["--off"]).unwrap().lighting, Some(false));
        assert!(request(&["--on", "--off"]).is_err());
    }

    #[test]
    fn test_light_bar() {
        let req = request(&["--light-bar", "red,lime,blue,#010203"]).unwrap();
        assert_eq!(
            req.light_bar,
            Some([
                Color::new(255, 0, 0),
                Color::new(0, 255, 0),
                Color::new(0, 0, 255),
                Color::new(1, 2, 3),
            ])
        );
        assert!(request(&["--light-bar", "red,blue"]).is_err());
        assert!(request(&["--light-bar-preset"]).is_err());
    }

    fn status() -> LightingStatus {
        LightingStatus {
            keyboard_type: KeyboardType::Rgb,
            lighting_supported: true,
            light_bar_supported: Some(false),
            lighting_on: Some(true),
            colors: ZoneColors::uniform(Color::new(0x12, 0x34, 0x56)),
        }
    }

    #[test]
    fn test_format_status() {
        let out = format_status(&status());
        assert!(out.contains("Keyboard type: RGB\n"));
        assert!(out.contains("Lighting supported: Yes\n"));
        assert!(out.contains("Light bar supported: No\n"));
        assert!(out.contains("Lighting: On\n"));
        assert_eq!(out.matches("#123456").count(), 4);
    }

    #[test]
    fn test_format_status_unknown_fields() {
        // Unrecognized lighting level and rejected gaming flags query
        let out = format_status(&LightingStatus {
            light_bar_supported: None,
            lighting_on: None,
            ..status()
        });
        assert!(out.contains("Keyboard type: RGB\n"));
        assert!(out.contains("Lighting supported: Yes\n"));
        assert!(out.contains("Light bar supported: Unknown\n"));
        assert!(out.contains("Lighting: Unknown\n"));
        for zone in Zone::ALL {
            assert!(out.contains(&format!("    {:<8}#123456\n", zone.name())));
        }
    }
}
