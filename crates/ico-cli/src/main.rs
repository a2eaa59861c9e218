use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ico_codec::{encode_bmp_file, open_icon, png_dimensions, save_icon, IcoFile, ImagePayload, PngEntry};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "ico")]
#[command(about = "Inspect, unpack, and build Windows .ico files.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the icon directory and what each entry decoded to.
    Inspect(InspectArgs),
    /// Write each decodable image out as a .png or .bmp file.
    Extract(ExtractArgs),
    /// Pack PNG files into a .ico (sizes are read from each PNG's IHDR).
    Build(BuildArgs),
}

#[derive(Debug, Parser)]
struct InspectArgs {
    /// Icon file to read.
    file: PathBuf,

    /// Emit a machine-readable JSON report instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Parser)]
struct ExtractArgs {
    /// Icon file to unpack.
    file: PathBuf,

    /// Output directory. Defaults to the icon's own directory.
    #[arg(long = "out-dir")]
    out_dir: Option<PathBuf>,
}

#[derive(Debug, Parser)]
struct BuildArgs {
    /// Output .ico path.
    output: PathBuf,

    /// Input PNG files, one per icon size, packed in the given order.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    entry_count: u16,
    images: Vec<ImageReport>,
    skipped: Vec<SkippedReport>,
}

#[derive(Debug, Serialize)]
struct ImageReport {
    index: usize,
    width: u32,
    height: u32,
    declared_bits_per_pixel: u16,
    kind: &'static str,
    payload_bytes: usize,
}

#[derive(Debug, Serialize)]
struct SkippedReport {
    index: usize,
    width: u32,
    height: u32,
    reason: String,
}

fn payload_kind(payload: &ImagePayload) -> &'static str {
    match payload {
        ImagePayload::Png(_) => "png",
        ImagePayload::Bmp(_) => "bmp",
    }
}

fn payload_bytes(payload: &ImagePayload) -> usize {
    match payload {
        ImagePayload::Png(png) => png.len(),
        ImagePayload::Bmp(image) => image.rgba().len(),
    }
}

fn build_report(ico: &IcoFile) -> InspectReport {
    InspectReport {
        entry_count: ico.directory.entry_count,
        images: ico
            .images
            .iter()
            .map(|image| ImageReport {
                index: image.index,
                width: image.entry.width,
                height: image.entry.height,
                declared_bits_per_pixel: image.entry.bits_per_pixel,
                kind: payload_kind(&image.payload),
                payload_bytes: payload_bytes(&image.payload),
            })
            .collect(),
        skipped: ico
            .skipped
            .iter()
            .map(|failure| SkippedReport {
                index: failure.index,
                width: failure.entry.width,
                height: failure.entry.height,
                reason: failure.error.to_string(),
            })
            .collect(),
    }
}

fn inspect(args: &InspectArgs) -> Result<(), String> {
    let ico = open_icon(&args.file).map_err(|e| e.to_string())?;
    let report = build_report(&ico);

    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(());
    }

    println!("{}: {} entries", args.file.display(), report.entry_count);
    for image in &report.images {
        println!(
            "  #{} {}x{} {}bpp {} ({} bytes)",
            image.index,
            image.width,
            image.height,
            image.declared_bits_per_pixel,
            image.kind,
            image.payload_bytes,
        );
    }
    for skipped in &report.skipped {
        println!(
            "  #{} {}x{} skipped: {}",
            skipped.index, skipped.width, skipped.height, skipped.reason,
        );
    }
    Ok(())
}

fn output_stem(file: &Path) -> String {
    file.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("icon")
        .to_owned()
}

fn extract(args: &ExtractArgs) -> Result<(), String> {
    let ico = open_icon(&args.file).map_err(|e| e.to_string())?;

    let out_dir = match &args.out_dir {
        Some(dir) => dir.clone(),
        None => match args.file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        },
    };
    fs::create_dir_all(&out_dir)
        .map_err(|e| format!("cannot create `{}`: {e}", out_dir.display()))?;

    let stem = output_stem(&args.file);
    for image in &ico.images {
        let (extension, bytes) = match &image.payload {
            ImagePayload::Png(png) => ("png", png.clone()),
            ImagePayload::Bmp(bmp) => ("bmp", encode_bmp_file(bmp)),
        };
        let name = format!(
            "{stem}-{}-{}x{}.{extension}",
            image.index, image.entry.width, image.entry.height,
        );
        let path = out_dir.join(name);
        fs::write(&path, bytes).map_err(|e| format!("cannot write `{}`: {e}", path.display()))?;
        println!("wrote {}", path.display());
    }

    for failure in &ico.skipped {
        eprintln!("skipped entry #{}: {}", failure.index, failure.error);
    }
    Ok(())
}

fn build(args: &BuildArgs) -> Result<(), String> {
    let mut entries = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        let png = fs::read(input).map_err(|e| format!("cannot read `{}`: {e}", input.display()))?;
        let (width, height) = png_dimensions(&png)
            .ok_or_else(|| format!("`{}` is not a PNG file", input.display()))?;
        if width != height {
            return Err(format!(
                "`{}` is {width}x{height}; icon images must be square",
                input.display(),
            ));
        }
        entries.push(PngEntry { size: width, png });
    }

    save_icon(&args.output, &entries).map_err(|e| e.to_string())?;

    let sizes: Vec<String> = entries.iter().map(|e| e.size.to_string()).collect();
    println!(
        "wrote {} ({} images: {})",
        args.output.display(),
        entries.len(),
        sizes.join(", "),
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Inspect(args) => inspect(&args),
        Command::Extract(args) => extract(&args),
        Command::Build(args) => build(&args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}
