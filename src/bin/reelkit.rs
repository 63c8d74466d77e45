use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "reelkit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a template JSON file.
    Validate(ValidateArgs),
    /// Render one frame of a scene to a draw-command list (JSON).
    Frame(FrameArgs),
    /// Re-emit a template as canonical export JSON.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input template JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input template JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Scene index (0-based).
    #[arg(long, default_value_t = 0)]
    scene: usize,

    /// Time cursor in seconds since scene start.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Optional customizations JSON (object keyed by element id).
    #[arg(long)]
    customizations: Option<PathBuf>,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input template JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn read_template(path: &Path) -> anyhow::Result<reelkit::Template> {
    let f = File::open(path).with_context(|| format!("open template '{}'", path.display()))?;
    let r = BufReader::new(f);
    let value: serde_json::Value =
        serde_json::from_reader(r).with_context(|| "parse template JSON")?;
    Ok(reelkit::import_template_value(value)?)
}

fn write_output(out: Option<&Path>, contents: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(path, contents)
                .with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{contents}"),
    }
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let template = read_template(&args.in_path)?;
    eprintln!(
        "ok: {} scene(s), {} element(s), canvas {}x{}",
        template.scenes.len(),
        template
            .scenes
            .iter()
            .map(|s| s.elements.len())
            .sum::<usize>(),
        template.canvas_size.width,
        template.canvas_size.height
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let template = read_template(&args.in_path)?;
    let scene = template.scene(args.scene)?;

    let customizations = match &args.customizations {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("open customizations '{}'", path.display()))?;
            let value: serde_json::Value =
                serde_json::from_str(&raw).with_context(|| "parse customizations JSON")?;
            reelkit::parse_customizations(&value)
        }
        None => reelkit::CustomizationMap::new(),
    };

    let commands =
        reelkit::render_frame(scene, args.time, &customizations, template.canvas_size);
    let json = serde_json::to_string_pretty(&commands).with_context(|| "serialize frame")?;
    write_output(args.out.as_deref(), &json)
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let template = read_template(&args.in_path)?;
    let json = reelkit::export_template_string(&template)?;
    write_output(args.out.as_deref(), &json)
}
