//! PDF → YAML extraction.
//!
//! Runs the external layout-extraction tool into a temporary work
//! directory, feeds its positioned-text dump through the state machine,
//! associates sign images, carries difficulty ratings over from a prior
//! revision, and writes the YAML question list.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{bail, Context};
use clap::Args;
use glob::glob;
use tracing::info;

use exam_core::matching::DifficultyIndex;
use exam_core::source::{SourceMap, Subject};
use exam_core::types::Question;
use exam_core::{images, layout, LayoutParser, ParserConfig};

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Path to the question-bank PDF to extract
    #[arg(long)]
    pub input_pdf: PathBuf,

    /// Existing YAML file to copy difficulty ratings from
    #[arg(long)]
    pub existing_yaml: Option<PathBuf>,

    /// Path to write the YAML question list to
    #[arg(long)]
    pub output_yaml: PathBuf,

    /// Directory to store question images in (sign documents only)
    #[arg(long)]
    pub output_image_dir: Option<PathBuf>,
}

pub fn run(args: ExtractArgs) -> anyhow::Result<()> {
    let base = args
        .input_pdf
        .file_stem()
        .and_then(|stem| stem.to_str())
        .context("input PDF has no usable file name")?;
    let source = SourceMap::default().lookup(base)?;
    let file_id = source.file_id();

    let tempdir = tempfile::tempdir()?;
    let workdir = tempdir.path().join(&file_id);
    fs::create_dir_all(&workdir)?;
    let xml_path = workdir.join(format!("{base}.xml"));

    info!(pdf = %args.input_pdf.display(), %file_id, "extracting layout");
    let status = Command::new("pdftohtml")
        .arg("-xml")
        .arg(&args.input_pdf)
        .arg(&xml_path)
        .stdout(Stdio::null())
        .status()
        .context("failed to launch pdftohtml")?;
    if !status.success() {
        bail!("pdftohtml exited with {status}");
    }

    let xml = fs::read_to_string(&xml_path)?;
    let pages = layout::parse_layout(&xml)?;
    let mut questions = LayoutParser::new(ParserConfig::default()).parse(&pages);
    info!(count = questions.len(), "parsed questions");

    if let Some(image_dir) = &args.output_image_dir {
        if source.subject != Subject::Signs {
            bail!("--output-image-dir only applies to sign documents, {base:?} is a rules document");
        }
        let image_paths = list_images(&workdir)?;
        let sorted = images::assign_images(&mut questions, &file_id, &image_paths)?;
        images::content_address(&mut questions, &sorted, image_dir)?;
        info!(count = sorted.len(), dir = %image_dir.display(), "stored question images");
    }

    // after the image pipeline, so content-addressed names participate
    // in the fingerprints
    if let Some(existing) = &args.existing_yaml {
        let prior = Question::load_list(existing)?;
        DifficultyIndex::from_questions(&prior).apply(&mut questions);
    }

    Question::save_list(&questions, &args.output_yaml)?;
    info!(yaml = %args.output_yaml.display(), "wrote question list");
    Ok(())
}

fn list_images(workdir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let pattern = workdir.join("*.png");
    let pattern = pattern
        .to_str()
        .context("work directory path is not valid UTF-8")?;
    let mut paths = Vec::new();
    for entry in glob(pattern)? {
        paths.push(entry?);
    }
    Ok(paths)
}
