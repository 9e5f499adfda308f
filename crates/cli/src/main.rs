mod map;

use crate::map::render_map;
use anyhow::{anyhow, bail, Context};
use config::{Config, File};
use isle::{timed, ObjectKind, World, WorldConfig};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    process,
};
use structopt::StructOpt;
use strum::{Display, EnumString, IntoEnumIterator};

/// CLI for generating islands via the Isle generation kit.
#[derive(Debug, StructOpt)]
#[structopt(name = "isle")]
struct Opt {
    /// Path to a config file that defines the world to be generated. Supported
    /// formats: JSON, TOML. Any field left out gets its default value.
    #[structopt(short, long)]
    config: Option<PathBuf>,

    /// Path to an existing .bin world file to load
    #[structopt(short, long)]
    bin: Option<PathBuf>,

    /// If given, the generated world will be saved to this directory. The
    /// exact files that appear in the directory are defined by the output
    /// formats. See `--output-formats` for more info
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// The format(s) to output the world in. Supported formats:
    ///
    /// bin - Binary representation that can be reloaded by this CLI and
    ///   other tools later. Use this for persisting & sharing worlds
    ///
    /// cfg - The full config object used for the world, in TOML format
    ///
    /// json - JSON representation. Similar to the binary format, but slower
    ///   and much less compact
    ///
    /// map - Top-down text preview of the world
    #[structopt(short = "f", long)]
    output_formats: Vec<OutputFormat>,

    /// The logging level to use during world generation. See
    /// https://docs.rs/log/0.4.11/log/enum.LevelFilter.html for options
    #[structopt(long, default_value = "info")]
    log_level: LevelFilter,
}

/// Different output formats.
#[derive(Copy, Clone, Debug, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
enum OutputFormat {
    // If you change this, make sure to update the help text for
    // `--output-formats`!
    /// Export the world in a serialized binary format, which can be
    /// deserialized later to recover the world
    Bin,
    /// Export the world's full config in a human-readable file
    Cfg,
    /// Export the world in a serialized JSON format, which can be deserialized
    /// later to recover the world. This is similar to the bin format, but is
    /// human readable at the cost of being slower and much less compact
    Json,
    /// Render the world as a text map
    Map,
}

impl OutputFormat {
    fn file_ext(self) -> &'static str {
        match self {
            Self::Bin => "bin",
            Self::Cfg => "toml",
            Self::Json => "json",
            Self::Map => "txt",
        }
    }
}

fn load_config(config_path: &Path) -> anyhow::Result<WorldConfig> {
    // Load config
    let mut settings = Config::new();
    let config_path = config_path.to_str().ok_or_else(|| {
        anyhow!("invalid character in path {:?}", config_path)
    })?;
    settings
        .merge(File::with_name(config_path))
        .context("error reading config file")?;
    settings.try_into().context("error reading config")
}

/// Generate an output form of the world in the given format.
fn gen_output(
    output_dir: &Path,
    output_format: OutputFormat,
    world: &World,
) -> anyhow::Result<()> {
    fn generate_bytes(
        output_format: OutputFormat,
        world: &World,
    ) -> anyhow::Result<Vec<u8>> {
        Ok(match output_format {
            // Serialize the entire world via CBOR
            OutputFormat::Bin => world.to_bin()?,
            // Serialize just the world config via toml
            OutputFormat::Cfg => toml::to_string_pretty(world.config())
                .context("error serializing config")?
                .into_bytes(),
            // Serialize the entire world via JSON
            OutputFormat::Json => world.to_json()?.into_bytes(),
            OutputFormat::Map => render_map(world).into_bytes(),
        })
    }

    let output_file_path = output_dir
        .join("world")
        .with_extension(output_format.file_ext());

    timed!(
        format!(
            "Generating {} output and writing to {:?}",
            output_format, &output_file_path
        ),
        log::Level::Info,
        {
            let bytes = generate_bytes(output_format, world)?;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&output_file_path)
                .with_context(|| {
                    format!("error opening output file {:?}", &output_file_path)
                })?;
            file.write_all(&bytes).with_context(|| {
                format!("error writing to file {:?}", &output_file_path)
            })?;
        }
    );

    Ok(())
}

/// Log a short summary of what ended up in the world
fn log_summary(world: &World) {
    let grid = world.grid();
    info!(
        "{} water cells, {} river(s), camp at {}",
        grid.count(|cell| cell.is_water()),
        world.rivers(),
        world.camp()
    );
    match world.player() {
        Some(player) => info!("Player spawns at {}", player),
        None => info!("No player spawn"),
    }
    for kind in ObjectKind::iter().filter(|kind| *kind != ObjectKind::Camp) {
        info!("{}: {}", kind, world.objects_of(kind).count());
    }
}

/// Run the CLI with some options
fn run(opt: Opt) -> anyhow::Result<()> {
    SimpleLogger::new().with_level(opt.log_level).init()?;

    let world = match opt {
        Opt {
            config: Some(config_path),
            bin: None,
            ..
        } => {
            // Load world config and use it to generate a new world
            let config = load_config(&config_path)?;
            World::generate(config)?
        }
        Opt {
            config: None,
            bin: Some(input_path),
            ..
        } => {
            // Load existing world from a file
            let file = OpenOptions::new()
                .read(true)
                .open(&input_path)
                .with_context(|| {
                    format!("error opening world file {:?}", input_path)
                })?;
            let world = World::from_bin(file)?;
            info!("Loaded world from {:?}", &input_path);
            world
        }
        _ => bail!(
            "must pass exactly one of --config (to generate a new world) \
            or --bin (to load an existing world)"
        ),
    };
    log_summary(&world);

    // If an output dir was specified, write out output format(s) there
    if let Some(output_dir) = opt.output {
        if opt.output_formats.is_empty() {
            bail!("output dir was specified, but no output formats were given")
        }
        fs::create_dir_all(&output_dir)?;

        for output_format in opt.output_formats {
            gen_output(&output_dir, output_format, &world)?;
        }
    }

    Ok(())
}

fn main() {
    let exit_code = match run(Opt::from_args()) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            1
        }
    };
    process::exit(exit_code);
}
