use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::services::cleaning;

pub fn run(input: PathBuf, output: Option<PathBuf>) {
    println!("🧹 Cleaning dataset: {}", input.display());

    match run_clean(&input, output) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_clean(input: &Path, output: Option<PathBuf>) -> Result<()> {
    let mut dataset = cleaning::load_dataset(input)?;
    println!("📄 Loaded {} rows", dataset.rows());

    let report = cleaning::clean(&mut dataset)?;

    println!("\nMissing values before cleaning:");
    println!("  Salary: {}", report.missing_before.salary);
    println!("  Age:    {}", report.missing_before.age);
    println!("  Gender: {}", report.missing_before.gender);

    println!("\nMissing values after cleaning:");
    println!("  Salary: {}", report.missing_after.salary);
    println!("  Age:    {}", report.missing_after.age);
    println!("  Gender: {}", report.missing_after.gender);

    println!("\nRepairs applied:");
    println!("  Salary mean used for imputation: {:.2}", report.salary_mean);
    println!("  Age mean used for imputation:    {:.2}", report.age_mean);
    println!("  Age outliers demoted to missing: {}", report.age_outliers);
    println!("  Gender values collapsed:         {}", report.gender_collapsed);

    let output = output.unwrap_or_else(|| default_output_path(input));
    cleaning::write_dataset(&dataset, &output)?;

    println!("\n✅ Wrote {} rows to {}", report.rows, output.display());
    Ok(())
}

/// `data/Uncleaned.csv` -> `data/Uncleaned_cleaned.csv`
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());
    input.with_file_name(format!("{}_cleaned.csv", stem))
}
