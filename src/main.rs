//! Venue Designer CLI
//!
//! Usage:
//!   venue-designer [OPTIONS] <COMMAND>
//!
//! Commands:
//!   plan      Produce a procedural layout (grid or perimeter)
//!   render    Render a layout JSON file to SVG or PNG
//!   generate  Ask the AI service for a layout (needs GEMINI_API_KEY)
//!
//! Options:
//!   -c, --config <FILE>  Designer configuration (TOML format)
//!   -v, --verbose        Log debug output to stderr
//!   -h, --help           Print help

use std::cell::RefCell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;

use venue_designer::notify::TracingSink;
use venue_designer::session::generate_layout;
use venue_designer::{
    DesignerConfig, DesignerError, GeminiClient, ImageData, Layout, PlanVariant, SvgConfig,
    VenueDesigner, ViewTransform,
};

#[derive(Parser)]
#[command(name = "venue-designer")]
#[command(about = "Interactive event-venue layout designer")]
struct Cli {
    /// Designer configuration file (TOML format)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Produce a procedural layout
    Plan {
        /// Which arrangement to produce
        #[arg(long, default_value = "grid")]
        variant: PlanVariant,

        /// Canvas width in pixels
        #[arg(long)]
        width: Option<f64>,

        /// Canvas height in pixels
        #[arg(long)]
        height: Option<f64>,

        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a layout JSON file
    Render {
        /// Layout JSON file
        layout: PathBuf,

        #[arg(long, default_value_t = 1.0)]
        zoom: f64,

        #[arg(long, default_value_t = 0.0)]
        pan_x: f64,

        #[arg(long, default_value_t = 0.0)]
        pan_y: f64,

        /// Venue photo drawn behind the canvas
        #[arg(short, long)]
        background: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = Format::Svg)]
        format: Format,

        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Ask the AI service for a layout
    Generate {
        /// Description of the event
        #[arg(short, long)]
        prompt: String,

        /// Venue photo to fit the layout to
        #[arg(long)]
        photo: Option<PathBuf>,

        /// Real-world venue size sent along with the photo
        #[arg(long, default_value = "20m x 30m")]
        dimensions: String,

        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Output file (stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Svg,
    Png,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), DesignerError> {
    let config = match &cli.config {
        Some(path) => DesignerConfig::from_file(path)?,
        None => DesignerConfig::default(),
    };

    match cli.command {
        Command::Plan {
            variant,
            width,
            height,
            format,
            output,
        } => {
            let mut config = config;
            if width.is_some() || height.is_some() {
                let canvas = config.canvas.clone();
                config.canvas = canvas.with_size(
                    width.unwrap_or(config.canvas.width),
                    height.unwrap_or(config.canvas.height),
                );
                config.validate()?;
            }
            let mut designer = designer(config);
            designer.apply_plan(variant);
            write_output(&designer, format, output.as_deref())
        }
        Command::Render {
            layout,
            zoom,
            pan_x,
            pan_y,
            background,
            format,
            output,
        } => {
            let layout = Layout::from_json(&fs::read_to_string(&layout)?)?;
            let mut designer = designer(config);
            designer.replace_layout(layout);
            designer.set_view(ViewTransform::new(zoom, pan_x, pan_y));
            if let Some(path) = background {
                designer.set_reference_photo(Some(ImageData::from_file(&path)?));
            }
            write_output(&designer, format, output.as_deref())
        }
        Command::Generate {
            prompt,
            photo,
            dimensions,
            format,
            output,
        } => {
            let client = GeminiClient::from_env()?;
            let mut designer = designer(config);
            designer.set_layout_prompt(prompt);
            designer.set_venue_dimensions(dimensions);
            if let Some(path) = photo {
                designer.set_reference_photo(Some(ImageData::from_file(&path)?));
            }

            let designer = RefCell::new(designer);
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(generate_layout(&designer, &client))?;

            let designer = designer.into_inner();
            write_output(&designer, format, output.as_deref())
        }
    }
}

fn designer(config: DesignerConfig) -> VenueDesigner {
    VenueDesigner::new(config, Rc::new(TracingSink))
}

fn write_output(
    designer: &VenueDesigner,
    format: Format,
    output: Option<&Path>,
) -> Result<(), DesignerError> {
    let bytes = match format {
        Format::Json => designer.layout().to_json()?.into_bytes(),
        Format::Svg => designer.svg(&SvgConfig::default()).into_bytes(),
        Format::Png => designer.png(&SvgConfig::default())?,
    };

    match output {
        Some(path) => fs::write(path, bytes)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes)?;
            if format != Format::Png {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
        }
    }
    Ok(())
}
