//! thlabel: generate Thai envelope label PDFs from pasted-style text files

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use label_data::{example_sender, parse_recipients, parse_sender, DEFAULT_GREETING};
use layout::{
    GreetingPosition, GreetingSettings, LabelJob, LabelRenderer, LogoSettings, PaperProfile,
    StampSettings,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate envelope label PDFs, one page per recipient")]
struct Args {
    /// Sender text file (6 lines); the built-in example is used when omitted
    #[arg(short, long)]
    sender: Option<PathBuf>,

    /// Recipient text file (4 lines per block, blocks separated by blank
    /// lines); the built-in example set is used when omitted or empty
    #[arg(short, long)]
    recipients: Option<PathBuf>,

    /// Paper preset
    #[arg(short, long, value_enum, default_value_t = Paper::A4)]
    paper: Paper,

    /// Greeting word preceding the recipient title; empty disables it
    #[arg(short, long, default_value = DEFAULT_GREETING)]
    greeting: String,

    /// Where the greeting sits relative to the recipient block
    #[arg(long, value_enum, default_value_t = GreetingPos::Left)]
    greeting_position: GreetingPos,

    /// Stamp text file; providing one enables the stamp box
    #[arg(long)]
    stamp: Option<PathBuf>,

    /// Logo image (PNG or JPEG); providing one enables the logo
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Logo height in mm, overriding the paper preset's default
    #[arg(long)]
    logo_height: Option<f64>,

    /// Regular TTF font
    #[arg(long, default_value = "fonts/THSarabunNew.ttf")]
    font: PathBuf,

    /// Bold TTF font; bold text uses the regular face when omitted
    #[arg(long)]
    bold_font: Option<PathBuf>,

    /// Output PDF path
    #[arg(short, long, default_value = "envelope-labels.pdf")]
    output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Paper {
    /// A4 landscape, 297 x 210 mm
    A4,
    /// Envelope, 235 x 108 mm
    Envelope,
}

impl From<Paper> for PaperProfile {
    fn from(paper: Paper) -> Self {
        match paper {
            Paper::A4 => PaperProfile::A4Landscape,
            Paper::Envelope => PaperProfile::Envelope108x235,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GreetingPos {
    Left,
    Top,
}

impl From<GreetingPos> for GreetingPosition {
    fn from(pos: GreetingPos) -> Self {
        match pos {
            GreetingPos::Left => GreetingPosition::Left,
            GreetingPos::Top => GreetingPosition::Top,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let sender = match &args.sender {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading sender file {}", path.display()))?;
            parse_sender(&text)
        }
        None => example_sender(),
    };

    let recipients = match &args.recipients {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading recipients file {}", path.display()))?;
            parse_recipients(&text)
        }
        None => label_data::example_recipients(),
    };

    let stamp = match &args.stamp {
        Some(path) => StampSettings {
            enabled: true,
            text: std::fs::read_to_string(path)
                .with_context(|| format!("reading stamp file {}", path.display()))?
                .trim_end()
                .to_string(),
        },
        None => StampSettings::default(),
    };

    let mut renderer = LabelRenderer::new(
        std::fs::read(&args.font)
            .with_context(|| format!("reading font {}", args.font.display()))?,
    );
    if let Some(path) = &args.bold_font {
        renderer = renderer.with_bold(
            std::fs::read(path).with_context(|| format!("reading bold font {}", path.display()))?,
        );
    }

    let logo = match &args.logo {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("reading logo {}", path.display()))?;
            let dims = pdf_core::image::get_dimensions(&bytes)
                .with_context(|| format!("decoding logo {}", path.display()))?;
            renderer.attach_logo("logo", bytes);
            LogoSettings {
                enabled: true,
                source_ref: "logo".to_string(),
                aspect_ratio: dims.aspect_ratio(),
                custom_height_mm: args.logo_height,
            }
        }
        None => LogoSettings::default(),
    };

    let job = LabelJob {
        paper: args.paper.into(),
        sender,
        recipients,
        stamp,
        greeting: GreetingSettings {
            text: args.greeting.clone(),
            position: args.greeting_position.into(),
        },
        logo,
    };

    let page_count = job.recipients.len();
    renderer
        .render_to_file(&job, &args.output)
        .context("rendering labels")?;

    println!(
        "Wrote {} ({page_count} page{})",
        args.output.display(),
        if page_count == 1 { "" } else { "s" }
    );

    Ok(())
}
