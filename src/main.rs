use std::path::{Path, PathBuf};
use std::process::ExitCode;

use block_cropper::config::job::JobFile;
use block_cropper::config::merged::MergedConfig;
use block_cropper::config::{self};
use block_cropper::pipeline::CancelToken;
use block_cropper::pipeline::job_runner::JobConfig;
use block_cropper::pipeline::orchestrator::run_all_jobs;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: block_cropper <jobs.yaml>...");
        eprintln!("  Crop content blocks from document pages and repack them into a PDF.");
        return if args.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("block_cropper {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut job_configs: Vec<JobConfig> = Vec::new();
    let mut parallel_workers = 0;

    for job_file_arg in &args {
        let job_file_path = Path::new(job_file_arg);

        // Load settings from the same directory as the job file.
        let settings = match config::load_settings_for_job(job_file_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("ERROR: Failed to load settings for {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        let yaml_content = match std::fs::read_to_string(job_file_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("ERROR: Failed to read job file {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        let job_file: JobFile = match serde_yml::from_str(&yaml_content) {
            Ok(jf) => jf,
            Err(e) => {
                eprintln!("ERROR: Failed to parse job file {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        // Resolve job file directory for relative paths.
        let job_dir = job_file_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        for job in &job_file.jobs {
            let merged = MergedConfig::new(&settings, job);
            if let Err(e) = merged.validate() {
                eprintln!("ERROR: {}: {e}", job.input);
                return ExitCode::FAILURE;
            }
            parallel_workers = parallel_workers.max(merged.parallel_workers);

            let (pages, excluded_crops) = match (job.page_selection(), job.excluded_crops()) {
                (Ok(p), Ok(x)) => (p, x),
                (Err(e), _) | (_, Err(e)) => {
                    eprintln!("ERROR: {}: {e}", job.input);
                    return ExitCode::FAILURE;
                }
            };

            job_configs.push(JobConfig {
                input_path: resolve_path(&job_dir, &job.input),
                output_path: resolve_path(&job_dir, &job.output),
                pages,
                excluded_crops,
                preview_dir: job.preview_dir.as_deref().map(|d| resolve_path(&job_dir, d)),
                dpi: merged.dpi,
                params: merged.params,
                layout: merged.layout,
            });
        }
    }

    let results = run_all_jobs(&job_configs, parallel_workers, &CancelToken::new());

    let mut has_error = false;
    for (i, result) in results.iter().enumerate() {
        match result {
            Ok(job_result) => {
                for failure in &job_result.failures {
                    eprintln!(
                        "WARN: {} page {}: {}",
                        job_result.input_path.display(),
                        failure.page_index + 1,
                        failure.error
                    );
                }
                eprintln!(
                    "OK: {} -> {} ({} crops on {} pages)",
                    job_result.input_path.display(),
                    job_result.output_path.display(),
                    job_result.crops_packed,
                    job_result.output_pages
                );
            }
            Err(e) => {
                eprintln!(
                    "ERROR: {} -> {}: {e}",
                    job_configs[i].input_path.display(),
                    job_configs[i].output_path.display()
                );
                has_error = true;
            }
        }
    }

    if has_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Resolve a potentially relative path against a base directory.
/// If the path is already absolute, return it as-is.
fn resolve_path(base_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}
