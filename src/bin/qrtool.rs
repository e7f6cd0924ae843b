use clap::{Parser, Subcommand};
use log::LevelFilter;
use qrscan::{
    Binarizer, BinaryImage, ContentType, OtsuBinarizer, Payload, QrScanner, ScanConfig,
    ThresholdBinarizer,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "qrtool", version, about = "qrscan CLI tools")]
struct Cli {
    /// Log pipeline decisions at debug level
    #[arg(long, short, global = true)]
    verbose: bool,
    /// Fixed luma threshold instead of Otsu's method
    #[arg(long, global = true)]
    threshold: Option<u8>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode the symbol in a single image
    Scan {
        #[arg(long)]
        image: PathBuf,
    },
    /// Print the finder trio and the geometry estimated from it
    Finders {
        #[arg(long)]
        image: PathBuf,
    },
    /// Print the sampled module grid
    Matrix {
        #[arg(long)]
        image: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let scanner = QrScanner::new(ScanConfig::from_env());
    match &cli.command {
        Command::Scan { image } => with_image(image, cli.threshold, |binary| scan_cmd(&scanner, binary)),
        Command::Finders { image } => {
            with_image(image, cli.threshold, |binary| finders_cmd(&scanner, binary))
        }
        Command::Matrix { image } => {
            with_image(image, cli.threshold, |binary| matrix_cmd(&scanner, binary))
        }
    }
}

/// Load and binarize `path`, then run `command`. Unreadable images exit with 2.
fn with_image(
    path: &Path,
    threshold: Option<u8>,
    command: impl FnOnce(&BinaryImage) -> ExitCode,
) -> ExitCode {
    let gray = match image::open(path) {
        Ok(img) => img.to_luma8(),
        Err(err) => {
            eprintln!("Failed to load image {}: {}", path.display(), err);
            return ExitCode::from(2);
        }
    };
    let binary = match threshold {
        Some(threshold) => ThresholdBinarizer { threshold }.binarize(&gray),
        None => OtsuBinarizer.binarize(&gray),
    };
    println!("Image: {} ({}x{})", path.display(), binary.width(), binary.height());
    command(&binary)
}

fn scan_cmd(scanner: &QrScanner, binary: &BinaryImage) -> ExitCode {
    let start = Instant::now();
    let result = scanner.decode(binary);
    let elapsed = start.elapsed();

    match result {
        Ok(decoded) => {
            println!(
                "Decoded: version={} error_correction={:?} mask={} segments={} ({:.2?})",
                decoded.version,
                decoded.format.ec_level,
                decoded.format.mask.bits(),
                decoded.segments.len(),
                elapsed
            );
            let kind = match decoded.data.content_type {
                ContentType::Text => "text",
                ContentType::Binary => "binary",
                ContentType::Action => "action",
            };
            match &decoded.data.payload {
                Payload::Text(text) => println!("Content ({kind}): {text}"),
                Payload::Binary(bytes) => {
                    let hex: Vec<String> = bytes.iter().map(|b| format!("{b:02x}")).collect();
                    println!("Content ({kind}, {} bytes): {}", bytes.len(), hex.join(" "));
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("No symbol decoded: {err} ({elapsed:.2?})");
            ExitCode::from(1)
        }
    }
}

fn finders_cmd(scanner: &QrScanner, binary: &BinaryImage) -> ExitCode {
    let sampled = match scanner.sample(binary) {
        Ok(sampled) => sampled,
        Err(err) => {
            println!("Location failed: {err}");
            return ExitCode::from(1);
        }
    };

    let trio = &sampled.trio;
    for (name, pattern) in [
        ("top-left", &trio.top_left),
        ("top-right", &trio.top_right),
        ("bottom-left", &trio.bottom_left),
    ] {
        println!(
            "  {:<12} center=({:.1}, {:.1}) extent={:.1}x{:.1}",
            name,
            pattern.centroid.x,
            pattern.centroid.y,
            pattern.estimated_width,
            pattern.estimated_height
        );
    }
    println!(
        "Geometry: module_size={:.2} rotation={:.1}deg version={}",
        sampled.geometry.module_size,
        sampled.geometry.rotation.to_degrees(),
        sampled.geometry.version
    );
    println!("Sampled version: {}", sampled.symbol.version());
    match sampled.alignment {
        Some(centre) => println!("Alignment: ({:.1}, {:.1})", centre.x, centre.y),
        None => println!("Alignment: none (affine sampling)"),
    }
    ExitCode::SUCCESS
}

fn matrix_cmd(scanner: &QrScanner, binary: &BinaryImage) -> ExitCode {
    match scanner.sample(binary) {
        Ok(sampled) => {
            println!("Version {} ({} modules)", sampled.symbol.version(), sampled.symbol.size());
            print!("{}", sampled.symbol);
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("Location failed: {err}");
            ExitCode::from(1)
        }
    }
}
