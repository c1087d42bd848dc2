//! OCR benchmark CLI for snip-translate.
//!
//! Runs the configured OCR engine (config file and `SNIP_TRANSLATE_*`
//! overrides apply) and the cleanup rules over image files.
//!
//! Usage:
//!   ocr-bench <image.png>                  Single image, raw and cleaned text
//!   ocr-bench <image.png> --translate      Also run the configured translator
//!   ocr-bench --batch <directory>          All images in directory → CSV output

use snip_translate::config::AppConfig;
use snip_translate::ocr::{OcrEngine, TextRecognizer};
use snip_translate::text::clean_ocr_text;
use snip_translate::translate::{ScriptTranslator, TranslationRequest, Translator};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage:");
        eprintln!("  ocr-bench <image.png> [--translate]");
        eprintln!("  ocr-bench --batch <directory>");
        std::process::exit(1);
    }

    let config = AppConfig::load().unwrap_or_else(|e| fail(&e.to_string()));
    let engine = OcrEngine::from_config(&config.ocr).unwrap_or_else(|e| fail(&e.to_string()));
    eprintln!("Engine: {} ({})", engine.name(), config.ocr.language);

    if args[1] == "--batch" {
        let Some(dir) = args.get(2) else {
            fail("--batch requires a directory path");
        };
        run_batch(&engine, Path::new(dir)).await;
    } else {
        let translate = args.iter().any(|a| a == "--translate");
        run_single(&engine, &config, Path::new(&args[1]), translate).await;
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

struct Recognized {
    raw: String,
    clean: String,
    latency_ms: f64,
}

async fn recognize_file(engine: &OcrEngine, path: &Path) -> Result<Recognized, String> {
    let image = image::open(path).map_err(|e| format!("Cannot open {}: {}", path.display(), e))?;

    let start = Instant::now();
    let raw = engine
        .recognize(image, &CancellationToken::new())
        .await
        .map_err(|e| e.to_string())?;
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

    let clean = clean_ocr_text(&raw);
    Ok(Recognized {
        raw,
        clean,
        latency_ms,
    })
}

/// Runs OCR on a single image and prints the result.
async fn run_single(engine: &OcrEngine, config: &AppConfig, image_path: &Path, translate: bool) {
    let result = recognize_file(engine, image_path)
        .await
        .unwrap_or_else(|e| fail(&format!("OCR failed: {}", e)));

    println!("--- Raw ---\n{}", result.raw.trim_end());
    println!("--- Cleaned ---\n{}", result.clean);
    eprintln!("--- OCR latency: {:.0}ms ---", result.latency_ms);

    if translate {
        let translator = ScriptTranslator::from_config(&config.translator);
        let request = TranslationRequest {
            source_lang: config.source_lang.clone(),
            target_lang: config.target_lang.clone(),
            text: result.clean,
        };
        let start = Instant::now();
        match translator.translate(&request, &CancellationToken::new()).await {
            Ok(text) => println!("--- Translated ---\n{}", text.trim()),
            Err(e) => fail(&format!("Translation failed: {}", e)),
        }
        eprintln!(
            "--- Translation latency: {:.0}ms ---",
            start.elapsed().as_secs_f64() * 1000.0
        );
    }
}

fn image_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .map(|ext| ext == "png" || ext == "jpg" || ext == "jpeg")
                .unwrap_or(false)
        })
        .collect();
    entries.sort();
    Ok(entries)
}

/// Runs OCR on all images in a directory, outputs CSV.
async fn run_batch(engine: &OcrEngine, dir: &Path) {
    if !dir.is_dir() {
        fail(&format!("Not a directory: {}", dir.display()));
    }

    let entries = image_files(dir)
        .unwrap_or_else(|e| fail(&format!("Failed to read {}: {}", dir.display(), e)));
    if entries.is_empty() {
        fail(&format!("No image files found in {}", dir.display()));
    }

    println!("filename,raw_chars,clean_chars,latency_ms");

    let mut latencies: Vec<f64> = Vec::new();

    for image_path in &entries {
        let filename = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match recognize_file(engine, image_path).await {
            Ok(result) => {
                println!(
                    "{},{},{},{:.1}",
                    filename,
                    result.raw.chars().count(),
                    result.clean.chars().count(),
                    result.latency_ms
                );
                latencies.push(result.latency_ms);
                std::io::stdout().flush().ok();
            }
            Err(e) => eprintln!("  WARNING: OCR failed for {}: {}", filename, e),
        }
    }

    if let Some(summary) = Summary::from_latencies(latencies) {
        eprintln!("\n--- Benchmark Summary ---");
        eprintln!("  Images processed: {}", summary.count);
        eprintln!("  Median latency:   {:.1}ms", summary.median);
        eprintln!("  Average latency:  {:.1}ms", summary.average);
        eprintln!("  P99 latency:      {:.1}ms", summary.p99);
    }
}

#[derive(Debug, PartialEq)]
struct Summary {
    count: usize,
    median: f64,
    average: f64,
    p99: f64,
}

impl Summary {
    fn from_latencies(mut latencies: Vec<f64>) -> Option<Self> {
        if latencies.is_empty() {
            return None;
        }
        latencies.sort_by(|a, b| a.total_cmp(b));

        let count = latencies.len();
        let p99_idx = ((count as f64 * 0.99).ceil() as usize).min(count - 1);
        Some(Self {
            count,
            median: latencies[count / 2],
            average: latencies.iter().sum::<f64>() / count as f64,
            p99: latencies[p99_idx],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_run_has_no_summary() {
        assert_eq!(Summary::from_latencies(Vec::new()), None);
    }

    #[test]
    fn summary_of_unsorted_latencies() {
        let summary = Summary::from_latencies(vec![30.0, 10.0, 20.0, 40.0]).unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.median, 30.0);
        assert_eq!(summary.average, 25.0);
        assert_eq!(summary.p99, 40.0);
    }

    #[test]
    fn single_sample_is_every_statistic() {
        let summary = Summary::from_latencies(vec![12.5]).unwrap();
        assert_eq!((summary.median, summary.average, summary.p99), (12.5, 12.5, 12.5));
    }

    #[test]
    fn only_images_are_picked_up_in_order() {
        let dir = std::env::temp_dir().join(format!("ocr-bench-files-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["b.png", "a.jpg", "notes.txt", "c.jpeg"] {
            std::fs::write(dir.join(name), b"").unwrap();
        }

        let names: Vec<String> = image_files(&dir)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        let _ = std::fs::remove_dir_all(&dir);

        assert_eq!(names, vec!["a.jpg", "b.png", "c.jpeg"]);
    }
}
