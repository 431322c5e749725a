//! The `curator categorize` command: sort the source folder into the gallery.

use clap::Args;
use curator_core::{Categorizer, Config, RunOptions};
use indicatif::{ProgressBar, ProgressStyle};

/// Arguments for the `categorize` command.
#[derive(Args, Debug, Default)]
pub struct CategorizeArgs {
    /// Log classifications without copying files or writing the summary
    #[arg(long)]
    pub dry_run: bool,

    /// Remove the existing gallery before copying
    #[arg(long)]
    pub clean: bool,

    /// Only process the first N files, by name (0 = all)
    #[arg(long, default_value = "0")]
    pub limit: usize,
}

impl CategorizeArgs {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            dry_run: self.dry_run,
            clean: self.clean,
            limit: self.limit,
        }
    }
}

/// Execute the categorize command.
pub fn execute(args: CategorizeArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let options = args.run_options();

    let source_dir = config.source_dir();
    if !source_dir.is_dir() {
        anyhow::bail!(
            "Source directory not found: {}\n\n  Hint: Set `paths.root` or `paths.source_dir` \
             in your config (see `curator config path`).",
            source_dir.display()
        );
    }

    let categorizer = Categorizer::with_clip(config)?;
    let files = categorizer.discover(options.limit)?;
    tracing::info!("Found {} image(s) in {:?}", files.len(), source_dir);
    if options.dry_run {
        tracing::info!("Dry run: no files will be copied and no summary written");
    }

    let progress = create_progress_bar(files.len() as u64)?;
    let report = categorizer.run(&files, &options, |placed| {
        progress.set_message(placed.source.clone());
        progress.inc(1);
    });
    progress.finish_and_clear();
    let report = report?;

    for category in report.summary.categories() {
        let count = report.summary.get(category).map_or(0, |r| r.len());
        tracing::debug!("  {category}: {count}");
    }

    println!(
        "Processed {} images into {}",
        report.processed(),
        report.gallery_dir.display()
    );
    if let Some(path) = &report.summary_file {
        println!("Summary saved to {}", path.display());
    }

    Ok(())
}

fn create_progress_bar(total: u64) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )?
            .progress_chars("##-"),
    );
    pb.set_message("Categorizing photos");
    Ok(pb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorize_args_default_is_full_real_run() {
        let options = CategorizeArgs::default().run_options();
        assert!(!options.dry_run);
        assert!(!options.clean);
        assert_eq!(options.limit, 0);
    }

    #[test]
    fn categorize_args_map_to_run_options() {
        let args = CategorizeArgs {
            dry_run: true,
            clean: true,
            limit: 2,
        };
        let options = args.run_options();
        assert!(options.dry_run && options.clean);
        assert_eq!(options.limit, 2);
    }

    #[test]
    fn progress_bar_template_is_valid() {
        let pb = create_progress_bar(5).unwrap();
        assert_eq!(pb.length(), Some(5));
    }
}
