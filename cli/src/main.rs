//! migrate-mods - Command-line interface for the migration engine.
//!
//! Copies the TrackerCSRTV2 header and implementation into a target OpenCV
//! tree, printing each phase to stdout. Diagnostics go to stderr via tracing.

use std::path::PathBuf;

use clap::Parser;
use migrate_engine::{
    build_report, create_job, run_job, validate_paths, verify_markers, ChecksumAlgorithm,
    JobOptions, Mapping, MigrateError, MigrationJob, MigrationObserver, OperationRecord,
    PreviewRecord, RunMode, NEXT_STEPS,
};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

const EXAMPLES: &str = "\
Examples:
  # Preview
  migrate-mods \\
    --source \"d:/workspace/T3/src3rd.mv/opencv-4.10.0\" \\
    --target \"/mnt/d/workspace/T3/src/opencv_src\" \\
    --dry-run

  # Execute with backups
  migrate-mods \\
    --source \"d:/workspace/T3/src3rd.mv/opencv-4.10.0\" \\
    --target \"/mnt/d/workspace/T3/src/opencv_src\" \\
    --backup";

/// Migrate the TrackerCSRTV2 modifications into another OpenCV tree
#[derive(Parser, Debug)]
#[command(name = "migrate-mods")]
#[command(version)]
#[command(about = "OpenCV TrackerCSRTV2 modification migration tool")]
#[command(after_help = EXAMPLES)]
struct Args {
    /// Source OpenCV directory (contains the modified files)
    #[arg(long, value_name = "PATH")]
    source: PathBuf,

    /// Target OpenCV directory (new directory layout)
    #[arg(long, value_name = "PATH")]
    target: PathBuf,

    /// Only show what would be done; do not copy anything
    #[arg(long)]
    dry_run: bool,

    /// Back up existing target files before overwriting
    #[arg(long)]
    backup: bool,

    /// Compare source and target checksums after copying: sha256 or blake3
    #[arg(long, value_name = "ALGORITHM")]
    verify_hash: Option<String>,

    /// Enable debug diagnostics on stderr
    #[arg(long)]
    verbose: bool,
}

/// Prints each mapping as it is processed
struct CliObserver;

impl MigrationObserver for CliObserver {
    fn on_job_started(&self, job: &MigrationJob) {
        let mode = match job.options.mode {
            RunMode::Preview => "preview mode",
            RunMode::Execute => "execute mode",
        };
        println!("📁 Migrating files ({})...", mode);
    }

    fn on_mapping_started(&self, job: &MigrationJob, _index: usize, mapping: &Mapping) {
        println!();
        println!("📄 Processing: {}", mapping.description);
        println!("   Source: {}", job.source_path(mapping).display());
        println!("   Target: {}", job.target_path(mapping).display());
    }

    fn on_mapping_previewed(&self, _job: &MigrationJob, _index: usize, preview: &PreviewRecord) {
        if let Some(dir) = &preview.would_create_dir {
            println!("   Action: [preview] would create directory {}", dir.display());
        }
        println!("   Action: [preview] would copy file");
        if preview.would_overwrite {
            println!("   Note: target file exists and would be overwritten");
        }
        if let Some(backup) = &preview.would_backup {
            println!("   Backup: would back up to {}", backup.display());
        }
    }

    fn on_mapping_completed(&self, _job: &MigrationJob, _index: usize, operation: &OperationRecord) {
        if let Some(dir) = &operation.created_dir {
            println!("   ✅ Created directory: {}", dir.display());
        }
        if let Some(backup) = &operation.backup_path {
            println!("   💾 Backup: {}", backup.display());
        }
        if let Some(integrity) = &operation.integrity {
            if integrity.matches() {
                println!("   ✅ Checksum match ({})", integrity.source);
            } else {
                println!(
                    "   ⚠️  Checksum mismatch: source {} target {}",
                    integrity.source, integrity.destination
                );
            }
        }
        println!("   ✅ Copied {} bytes", operation.bytes_copied);
    }

    fn on_job_completed(&self, _job: &MigrationJob) {}
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed (tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    println!("🚀 OpenCV TrackerCSRTV2 modification migration");
    println!("{}", "=".repeat(50));

    let exit_code = match run_cli(&args) {
        Ok(()) => 0,
        Err(e) => {
            println!();
            println!("❌ Error: {}", e);
            match error_hint(&e) {
                Some(hint) => println!("💡 {}", hint),
                None => error!(os_error = ?e.raw_os_error(), "migration aborted: {}", e),
            }
            1
        }
    };

    std::process::exit(exit_code);
}

/// Advice printed after configuration errors; I/O failures get none.
fn error_hint(err: &MigrateError) -> Option<&'static str> {
    if !err.is_configuration_error() {
        return None;
    }
    Some(match err {
        MigrateError::InvalidArgument { .. } => "Supported --verify-hash values: sha256, blake3",
        MigrateError::SameFile { .. } => "--source and --target must be different OpenCV trees",
        _ => "Check the --source and --target paths",
    })
}

/// Main CLI logic - separated for testability
fn run_cli(args: &Args) -> Result<(), MigrateError> {
    let checksum = args
        .verify_hash
        .as_deref()
        .map(str::parse::<ChecksumAlgorithm>)
        .transpose()
        .map_err(|reason| MigrateError::InvalidArgument { reason })?;

    let options = JobOptions {
        mode: if args.dry_run {
            RunMode::Preview
        } else {
            RunMode::Execute
        },
        backup: args.backup,
        checksum,
    };

    debug!(
        source = %args.source.display(),
        target = %args.target.display(),
        mode = %options.mode,
        backup = options.backup,
        checksum = ?options.checksum,
        "parsed options"
    );
    let mut job = create_job(&args.source, &args.target, options);

    println!("🔍 Validating directory layout...");
    let validation = match validate_paths(&job) {
        Ok(validation) => validation,
        Err(MigrateError::MissingSourceFiles { paths }) => {
            println!("❌ The following source files are missing:");
            for path in &paths {
                println!("   - {}", path.display());
            }
            return Err(MigrateError::MissingSourceFiles { paths });
        }
        Err(e) => return Err(e),
    };

    if !validation.missing_target_dirs.is_empty() {
        println!("⚠️  The following target directories are missing and will be created:");
        for dir in &validation.missing_target_dirs {
            println!("   - {}", dir.display());
        }
    }
    println!("✅ Directory layout validated");

    let observer = CliObserver;
    run_job(&mut job, Some(&observer))?;

    let checks = verify_markers(&job);
    if !checks.is_empty() {
        println!();
        println!("🔍 Verifying modifications...");
        for check in &checks {
            if check.found {
                println!("   ✅ {}", check.description);
            } else {
                println!("   ❌ Not found: {} ({})", check.token, check.target_path.display());
            }
        }
    }

    println!();
    println!("📊 Migration report");
    println!("{}", "=".repeat(50));
    print!("{}", build_report(&job));

    println!();
    if job.is_preview() {
        println!("💡 This was a preview. Remove --dry-run to perform the migration.");
    } else {
        println!("✅ Migration complete!");
        println!();
        println!("Next steps:");
        for (i, step) in NEXT_STEPS.iter().enumerate() {
            println!("{}. {}", i + 1, step);
        }
    }

    Ok(())
}
