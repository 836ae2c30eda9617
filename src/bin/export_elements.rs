use std::env;
use std::path::PathBuf;
use std::process;

use dotenv::dotenv;
use element_export_core::domains::element::{ingest, RawElement};
use element_export_core::domains::export::{ExportFormat, ExportRequest, ExportService, ExportServiceImpl};
use element_export_core::ExportConfig;

const USAGE: &str =
    "Usage: export_elements <input.json> <output> [--format csv|json|xlsx] [--categories A,B,...]";

struct Args {
    input: PathBuf,
    output: PathBuf,
    format: Option<ExportFormat>,
    categories: Option<Vec<String>>,
}

fn parse_args() -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut format = None;
    let mut categories = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--format" => {
                let value = args.next().ok_or("--format needs a value")?;
                format = Some(value.parse::<ExportFormat>()?);
            }
            "--categories" => {
                let value = args.next().ok_or("--categories needs a value")?;
                categories = Some(
                    value
                        .split(',')
                        .map(|name| name.trim().to_string())
                        .filter(|name| !name.is_empty())
                        .collect(),
                );
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ if arg.starts_with("--") => return Err(format!("Unknown option {}\n{}", arg, USAGE)),
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    if positional.len() != 2 {
        return Err(USAGE.to_string());
    }
    let output = positional.pop().unwrap_or_default();
    let input = positional.pop().unwrap_or_default();

    Ok(Args { input, output, format, categories })
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(&args.input)
        .map_err(|e| format!("Cannot read {}: {}", args.input.display(), e))?;
    let elements: Vec<RawElement> = serde_json::from_str(&text)?;
    let rows = ingest(elements);

    let service = ExportServiceImpl::new(ExportConfig::from_env());

    let stats = service.stats(&rows, None);
    println!("📊 Elements: {}", stats.total_elements);
    println!("   Point locations: {}", stats.point_locations);
    println!("   Curve locations: {}", stats.curve_locations);
    println!("   No location:     {}", stats.no_locations);
    println!("   Categories:      {}", stats.category_count);

    println!("\n📂 Categories");
    for category in service.category_summary(&rows) {
        println!("   {}", category);
    }

    if let Some(selected) = &args.categories {
        let subset = service.stats(&rows, Some(selected.as_slice()));
        println!("\n🔎 Selected {} categories: {} elements", selected.len(), subset.total_elements);
    }

    let format = args
        .format
        .unwrap_or_else(|| ExportFormat::from_extension(&args.output));
    let request = ExportRequest {
        format,
        destination_path: args.output,
        selected_categories: args.categories,
    };

    let progress = |percent: u8| log::debug!("progress {}%", percent);
    let metadata = service.export(&rows, &request, Some(&progress))?;

    println!(
        "\n✅ Wrote {} rows ({} bytes) as {} to {} in {} ms",
        metadata.rows_written,
        metadata.bytes_written,
        metadata.format,
        metadata.destination.display(),
        metadata.duration_ms
    );

    Ok(())
}

fn main() {
    dotenv().ok();
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            process::exit(1);
        }
    };

    if let Err(e) = run(args) {
        eprintln!("❌ Export failed: {}", e);
        process::exit(1);
    }
}
