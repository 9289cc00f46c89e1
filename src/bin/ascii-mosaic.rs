use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use ascii_mosaic::{
    Canvas, CharPreset, FontBook, ManualClock, PngSequenceSink, Player, PlayerOpts, Preview,
    PreviewOpts, Settings, StandaloneDocument, assets::decode::sniff_image_format,
    export::standalone::DATA_ELEMENT_ID,
};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ascii-mosaic", version, about = "Render images as animated ASCII mosaics")]
struct Cli {
    /// More log output (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one frame as a PNG.
    Frame(FrameArgs),
    /// Print or write the glyph grid as plain text.
    Text(TextArgs),
    /// Write a self-contained HTML page that plays the mosaic.
    Html(HtmlArgs),
    /// Run a scripted pointer path and write every frame as a PNG.
    Play(PlayArgs),
}

#[derive(Args, Debug)]
struct MosaicArgs {
    /// Settings JSON (camelCase keys). Flags below override it.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Character preset: standard, simple, blocks, matrix, minimal.
    #[arg(long)]
    preset: Option<CharPreset>,
    #[arg(long)]
    grid_size: Option<u32>,
    #[arg(long)]
    font_size: Option<u32>,
    #[arg(long)]
    characters: Option<String>,
    #[arg(long)]
    contrast: Option<f32>,
    #[arg(long)]
    min_brightness: Option<f32>,
    #[arg(long)]
    text_opacity: Option<f32>,
    #[arg(long)]
    invert: bool,
    #[arg(long)]
    font_family: Option<String>,
    #[arg(long)]
    text_color: Option<String>,
    #[arg(long)]
    background_color: Option<String>,
    /// Canvas width in pixels.
    #[arg(long)]
    width: Option<u32>,
    /// Canvas height in pixels.
    #[arg(long)]
    height: Option<u32>,
    /// Seed glyph selection for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
    /// Pointer position `X,Y` applied before the frame; repeatable.
    #[arg(long, value_parser = parse_point)]
    pointer: Vec<(f32, f32)>,
    #[command(flatten)]
    mosaic: MosaicArgs,
}

#[derive(Args, Debug)]
struct TextArgs {
    #[arg(long = "in")]
    in_path: PathBuf,
    /// Output file; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
    #[command(flatten)]
    mosaic: MosaicArgs,
}

#[derive(Args, Debug)]
struct HtmlArgs {
    #[arg(long = "in")]
    in_path: PathBuf,
    #[arg(long)]
    out: PathBuf,
    #[command(flatten)]
    mosaic: MosaicArgs,
}

#[derive(Args, Debug)]
struct PlayArgs {
    /// Input image, or a standalone HTML document written by `html`.
    #[arg(long = "in")]
    in_path: PathBuf,
    /// Directory for `frame_NNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,
    #[arg(long, default_value_t = 60)]
    frames: u32,
    #[arg(long, default_value_t = 30)]
    fps: u32,
    /// Pointer waypoints `X,Y;X,Y;...` visited evenly over the run.
    #[arg(long, value_parser = parse_path)]
    path: Option<PointerPath>,
    #[command(flatten)]
    mosaic: MosaicArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Text(args) => cmd_text(args),
        Command::Html(args) => cmd_html(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_point(s: &str) -> Result<(f32, f32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let x = x.trim().parse::<f32>().map_err(|e| format!("bad x in '{s}': {e}"))?;
    let y = y.trim().parse::<f32>().map_err(|e| format!("bad y in '{s}': {e}"))?;
    Ok((x, y))
}

#[derive(Clone, Debug)]
struct PointerPath(Vec<(f32, f32)>);

fn parse_path(s: &str) -> Result<PointerPath, String> {
    s.split(';')
        .filter(|p| !p.trim().is_empty())
        .map(parse_point)
        .collect::<Result<Vec<_>, _>>()
        .map(PointerPath)
}

impl MosaicArgs {
    fn settings_over(&self, base: Settings) -> anyhow::Result<Settings> {
        let mut s = match &self.settings {
            Some(path) => Settings::from_json_file(path)?,
            None => base,
        };
        if let Some(preset) = self.preset {
            s.characters = preset.characters().to_string();
        }
        if let Some(v) = self.grid_size {
            s.grid_size = v;
        }
        if let Some(v) = self.font_size {
            s.font_size = v;
        }
        if let Some(v) = &self.characters {
            s.characters = v.clone();
        }
        if let Some(v) = self.contrast {
            s.contrast = v;
        }
        if let Some(v) = self.min_brightness {
            s.min_brightness = v;
        }
        if let Some(v) = self.text_opacity {
            s.text_opacity = v;
        }
        if self.invert {
            s.invert = true;
        }
        if let Some(v) = &self.font_family {
            s.font_family = v.clone();
        }
        if let Some(v) = &self.text_color {
            s.text_color = v.clone();
        }
        if let Some(v) = &self.background_color {
            s.background_color = v.clone();
        }
        s.validate()?;
        Ok(s)
    }

    fn canvas_over(&self, base: Canvas) -> anyhow::Result<Canvas> {
        Ok(Canvas::new(
            self.width.unwrap_or(base.width),
            self.height.unwrap_or(base.height),
        )?)
    }

    fn preview(&self, settings: Settings, canvas: Canvas) -> anyhow::Result<Preview<ManualClock>> {
        let opts = PreviewOpts {
            canvas,
            seed: self.seed,
            fonts: FontBook::system(),
            ..PreviewOpts::default()
        };
        Ok(Preview::new(ManualClock::new(), settings, opts)?)
    }

    /// Preview with `in_path` loaded, or `None` if the input is not an image.
    fn load(&self, in_path: &Path) -> anyhow::Result<Option<Preview<ManualClock>>> {
        let settings = self.settings_over(Settings::default())?;
        let canvas = self.canvas_over(Canvas::DEFAULT)?;
        let mut preview = self.preview(settings, canvas)?;

        let bytes = read_input(in_path)?;
        if !preview.load_image(&bytes)? {
            return Ok(None);
        }
        Ok(Some(preview))
    }
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read input '{}'", path.display()))
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let Some(mut preview) = args.mosaic.load(&args.in_path)? else {
        return Ok(());
    };

    if !args.pointer.is_empty() {
        for (x, y) in &args.pointer {
            preview.pointer_move(*x, *y);
        }
        preview.clock().advance(Duration::from_secs(1) / 60);
        preview.pump()?;
    }

    let png = preview
        .export_png()?
        .context("no frame to export")?;
    write_output(&args.out, &png)
}

fn cmd_text(args: TextArgs) -> anyhow::Result<()> {
    let Some(preview) = args.mosaic.load(&args.in_path)? else {
        return Ok(());
    };
    let text = preview
        .export_plain_text()
        .context("no grid to export")?;

    match &args.out {
        Some(path) => write_output(path, text.as_bytes()),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

fn cmd_html(args: HtmlArgs) -> anyhow::Result<()> {
    let Some(preview) = args.mosaic.load(&args.in_path)? else {
        return Ok(());
    };
    let html = preview
        .export_standalone()?
        .context("no image to export")?;
    write_output(&args.out, html.as_bytes())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let bytes = read_input(&args.in_path)?;

    let mut preview = if sniff_image_format(&bytes).is_some() {
        let settings = args.mosaic.settings_over(Settings::default())?;
        let canvas = args.mosaic.canvas_over(Canvas::DEFAULT)?;
        let mut preview = args.mosaic.preview(settings, canvas)?;
        preview.load_image(&bytes)?;
        preview
    } else {
        let html = match std::str::from_utf8(&bytes) {
            Ok(html) if html.contains(DATA_ELEMENT_ID) => html,
            _ => {
                tracing::info!(path = %args.in_path.display(), "ignoring non-image input");
                return Ok(());
            }
        };
        let doc = StandaloneDocument::parse(html)
            .with_context(|| format!("read standalone document '{}'", args.in_path.display()))?;
        let settings = args.mosaic.settings_over(doc.settings)?;
        let canvas = args.mosaic.canvas_over(doc.canvas)?;
        let mut preview = args.mosaic.preview(settings, canvas)?;
        preview.load_source(doc.source)?;
        preview
    };

    let player = Player::new(PlayerOpts {
        frames: args.frames,
        fps: args.fps,
        path: args.path.map(|p| p.0).unwrap_or_default(),
    })?;
    let mut sink = PngSequenceSink::new(&args.out_dir);
    let report = player.run(&mut preview, &mut sink)?;

    eprintln!(
        "wrote {} frames to {} ({} scrambles)",
        report.frames,
        args.out_dir.display(),
        report.scrambles
    );
    Ok(())
}
