use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "fxgraph", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame of the output node as a PNG.
    Frame(FrameArgs),
    /// Render the full frame range of a writer node into a directory of PNGs.
    Sequence(SequenceArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input graph JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame number.
    #[arg(long, default_value_t = 0)]
    frame: i64,

    /// View index.
    #[arg(long, default_value_t = 0)]
    view: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Number of tile worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Skip the cache lookup for the output node.
    #[arg(long)]
    no_cache: bool,
}

#[derive(Parser, Debug)]
struct SequenceArgs {
    /// Input graph JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory receiving one PNG per frame and view.
    #[arg(long)]
    out_dir: PathBuf,

    /// Number of tile worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sequence(args) => cmd_sequence(args),
    }
}

fn load_graph(path: &Path, threads: Option<usize>) -> anyhow::Result<fxgraph::Graph> {
    let desc = fxgraph::GraphDesc::from_path(path)?;
    let project = fxgraph::Project::new(fxgraph::ProjectOpts {
        render: fxgraph::RenderOpts {
            threads,
            ..fxgraph::RenderOpts::default()
        },
        default_format: desc.format,
    })?;
    Ok(desc.build(&project)?)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let graph = load_graph(&args.in_path, args.threads)?;
    let output = graph.output();
    let time = fxgraph::SequenceTime(args.frame);

    let window = output
        .region_of_definition(time)?
        .clip_infinite_to(output.render_format().to_rect());
    let image = output.render_roi(
        time,
        fxgraph::RenderScale::FULL,
        fxgraph::ViewIndex(args.view),
        window,
        args.no_cache,
    )?;
    let image = image.with_context(|| format!("frame {} rendered to nothing", args.frame))?;

    write_png(&args.out, &image)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    let graph = load_graph(&args.in_path, args.threads)?;
    let output = Arc::clone(graph.output());
    let pattern = match output.param("file")? {
        fxgraph::ParamValue::Text(s) => s,
        other => anyhow::bail!("writer 'file' parameter is not text: {other:?}"),
    };

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    let mut sink = PngDirSink {
        dir: args.out_dir.clone(),
        pattern,
        views: output.render_views_count(),
    };

    let driver = fxgraph::OutputDriver::new(output)?;
    let stats = driver.render_full_sequence(&mut sink)?;
    eprintln!(
        "wrote {} image(s) for {} frame(s) to {} ({} empty)",
        stats.images_written,
        stats.frames_total,
        args.out_dir.display(),
        stats.empty_images
    );
    Ok(())
}

struct PngDirSink {
    dir: PathBuf,
    pattern: String,
    views: u32,
}

impl fxgraph::FrameSink for PngDirSink {
    fn write_frame(
        &mut self,
        time: fxgraph::SequenceTime,
        view: fxgraph::ViewIndex,
        image: Option<&fxgraph::Image>,
    ) -> fxgraph::FxResult<()> {
        let Some(image) = image else {
            tracing::warn!(frame = time.0, view = view.0, "empty frame skipped");
            return Ok(());
        };
        let mut name = fxgraph::file_name_for(&self.pattern, time.0)?;
        if self.views > 1 {
            name = format!("v{}_{name}", view.0);
        }
        write_png(&self.dir.join(name), image).map_err(fxgraph::FxError::Other)
    }
}

// Image rows run bottom-up; PNG rows run top-down.
fn write_png(path: &Path, image: &fxgraph::Image) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let stride = image.stride();
    let flipped: Vec<u8> = image
        .data()
        .chunks_exact(stride.max(1))
        .rev()
        .flatten()
        .copied()
        .collect();
    let bounds = image.bounds();
    image::save_buffer_with_format(
        path,
        &flipped,
        bounds.width(),
        bounds.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}
