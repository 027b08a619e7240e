//! Toxic Filter - whole-word denylist filtering for JSONL corpora
//!
//! Main entry point for the command-line application.

use clap::Parser;
use std::path::PathBuf;
use std::process;

use toxic_filter::batch::{pool_size, BatchCoordinator};
use toxic_filter::cli::Args;
use toxic_filter::logging;
use toxic_filter::matcher::Matcher;
use toxic_filter::output::Stream;
use toxic_filter::progress::{
    print_banner, print_bullet, print_error, print_header, print_info, print_success,
    print_summary, print_warning,
};
use toxic_filter::wordset::WordSet;

/// Exit status in `--strict` mode when some files failed
const EXIT_PARTIAL: i32 = 2;

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    match run(args) {
        Ok(true) => {}
        Ok(false) => process::exit(EXIT_PARTIAL),
        Err(e) => {
            print_error(&format!("{}", e));

            // Print chain of errors
            let mut source = e.source();
            while let Some(err) = source {
                print_error(&format!("  Caused by: {}", err));
                source = err.source();
            }

            process::exit(1);
        }
    }
}

/// Returns `false` only when `--strict` is set and some file failed
fn run(args: Args) -> anyhow::Result<bool> {
    logging::init(logging::level_for(args.quiet, args.verbose), args.log_target())?;

    if !args.quiet {
        print_banner();
    }

    let config = args.batch_config()?;
    let source = args.input_source()?;

    let words = WordSet::load(&args.denylist)?;
    let matcher = Matcher::new(&words)?;
    log::info!("Initialized matcher with {} toxic words", matcher.len());
    if matcher.is_empty() {
        log::warn!("Denylist {:?} contains no words; every record will be clean", args.denylist);
    }

    let files = source.resolve()?;

    if !args.quiet {
        print_header("Configuration");
        print_info(&format!("Denylist:     {:?} ({} words)", args.denylist, matcher.len()));
        print_info(&format!("Input files:  {}", files.len()));
        print_info(&format!("Output dir:   {:?}", config.processor.output_dir));
        print_info(&format!(
            "Threads:      {}",
            pool_size(files.len(), args.threads)
        ));
    }

    if args.dry_run {
        dry_run_report(&files, &config.processor.output_dir);
        return Ok(true);
    }

    if files.is_empty() {
        print_warning("No files found to process!");
    }

    let summary = BatchCoordinator::new(&matcher, config).run(&files)?;
    summary.log();

    if !args.quiet {
        print_summary(&summary, args.top_words);
        if !summary.has_failures() {
            print_success("All files processed successfully");
        }
    }

    Ok(!(args.strict && summary.has_failures()))
}

/// Dry run report
fn dry_run_report(files: &[PathBuf], output_dir: &std::path::Path) {
    print_header("DRY RUN - No files will be written");

    for path in files {
        print_bullet(&format!("{:?}", path));
        for stream in Stream::ALL {
            print_info(&format!("  -> {:?}", stream.path_for(output_dir, path)));
        }
    }
}
