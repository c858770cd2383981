//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Flags for the globe viewer. Anything given here wins over `config.ron`
/// for this run only; the file is never rewritten.
#[derive(Parser, Debug, Default)]
#[command(name = "globe", version, about = "Animated 3D Earth with a starfield")]
pub struct CliArgs {
    /// Initial window width in logical pixels.
    #[arg(long, value_name = "PX")]
    pub width: Option<u32>,

    /// Initial window height in logical pixels.
    #[arg(long, value_name = "PX")]
    pub height: Option<u32>,

    /// Borderless fullscreen on the current monitor (true/false).
    #[arg(long, value_name = "BOOL")]
    pub fullscreen: Option<bool>,

    /// Skip every texture fetch; the planet shows its procedural map.
    #[arg(long)]
    pub offline: bool,

    /// Starfield seed, for a reproducible sky.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Colour map location: an http(s) URL or a local file.
    #[arg(long, value_name = "URL|PATH")]
    pub diffuse: Option<String>,

    /// Level or full filter directive, e.g. `debug` or `globe_scene=trace`.
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Directory holding `config.ron` (default: the platform config dir).
    #[arg(long, value_name = "DIR")]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Layer command-line values over a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        let window = &mut self.window;
        window.width = args.width.unwrap_or(window.width);
        window.height = args.height.unwrap_or(window.height);
        window.fullscreen = args.fullscreen.unwrap_or(window.fullscreen);

        // `--offline` can only switch fetching off, never back on.
        self.textures.offline |= args.offline;
        if let Some(url) = &args.diffuse {
            self.textures.diffuse_url.clone_from(url);
        }

        if args.seed.is_some() {
            self.starfield.seed = args.seed;
        }
        if let Some(level) = &args.log_level {
            self.debug.log_level.clone_from(level);
        }
    }
}
