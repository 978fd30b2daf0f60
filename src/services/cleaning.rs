//! Offline dataset cleaning: salary repair, age outlier imputation and
//! gender canonicalization over a delimited tabular file.
//!
//! The routine is a single pass over an in-memory table. Means are computed
//! once, before any fill, and sentinel replacement happens before the salary
//! mean so the imputed value is not skewed.

use std::io::Read;
use std::path::Path;

use csv::{Reader, StringRecord, Writer};

use crate::error::{AppError, Result};

/// Sentinel string found in the Salary column of the source data.
pub const SALARY_SENTINEL: &str = "Sixty Thousand";

/// Numeric value the sentinel resolves to.
pub const SALARY_SENTINEL_VALUE: f64 = 60000.0;

/// Valid age domain, inclusive. Values outside are demoted to missing.
pub const AGE_MIN: f64 = 18.0;
pub const AGE_MAX: f64 = 60.0;

const GENDER_MALE: &str = "Male";
const GENDER_FEMALE: &str = "Female";
const GENDER_OTHER: &str = "Others";

/// An in-memory tabular dataset with resolved indices for the three governed
/// columns. All other columns pass through cleaning untouched.
pub struct Dataset {
    headers: StringRecord,
    records: Vec<StringRecord>,
    salary_idx: usize,
    age_idx: usize,
    gender_idx: usize,
}

impl Dataset {
    pub fn rows(&self) -> usize {
        self.records.len()
    }
}

/// Per-column count of missing (empty) cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnCounts {
    pub salary: usize,
    pub age: usize,
    pub gender: usize,
}

/// Summary of one cleaning run, reported for observability only.
#[derive(Debug)]
pub struct CleaningReport {
    pub rows: usize,
    pub missing_before: ColumnCounts,
    pub missing_after: ColumnCounts,
    pub salary_mean: f64,
    pub age_mean: f64,
    pub age_outliers: usize,
    pub gender_collapsed: usize,
}

/// Load a dataset from a CSV file, wholesale into memory.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let reader = Reader::from_path(path)?;
    parse_dataset(reader)
}

fn parse_dataset<R: Read>(mut reader: Reader<R>) -> Result<Dataset> {
    let headers = reader.headers()?.clone();

    let find = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| AppError::Config(format!("missing required column '{}'", name)))
    };

    let salary_idx = find("Salary")?;
    let age_idx = find("Age")?;
    let gender_idx = find("Gender")?;

    let mut records = Vec::new();
    for result in reader.records() {
        records.push(result?);
    }

    Ok(Dataset {
        headers,
        records,
        salary_idx,
        age_idx,
        gender_idx,
    })
}

/// Count missing values in the three governed columns.
pub fn missing_counts(dataset: &Dataset) -> ColumnCounts {
    let count = |idx: usize| {
        dataset
            .records
            .iter()
            .filter(|r| r.get(idx).map_or(true, |c| c.trim().is_empty()))
            .count()
    };

    ColumnCounts {
        salary: count(dataset.salary_idx),
        age: count(dataset.age_idx),
        gender: count(dataset.gender_idx),
    }
}

/// Clean the dataset in place.
///
/// Salary: sentinel replaced with its numeric value, remaining cells coerced
/// to numbers (non-numeric cells are an error), missing cells filled with the
/// column mean. Age: out-of-range values demoted to missing, then all missing
/// cells filled with the mean of the in-range values. Gender: anything
/// outside the canonical set collapses to "Others".
///
/// An entirely missing numeric column has no defined mean and fails fast.
pub fn clean(dataset: &mut Dataset) -> Result<CleaningReport> {
    let missing_before = missing_counts(dataset);
    let rows = dataset.records.len();

    // Salary: sentinel replacement must happen before the mean is computed.
    let mut salaries: Vec<Option<f64>> = Vec::with_capacity(rows);
    for record in &dataset.records {
        let cell = record.get(dataset.salary_idx).unwrap_or("").trim();
        if cell.is_empty() {
            salaries.push(None);
        } else if cell == SALARY_SENTINEL {
            salaries.push(Some(SALARY_SENTINEL_VALUE));
        } else {
            let value = cell.parse::<f64>().map_err(|_| {
                AppError::Parse(format!("Salary value '{}' is not numeric", cell))
            })?;
            salaries.push(Some(value));
        }
    }

    let salary_mean = mean(&salaries).ok_or_else(|| {
        AppError::InvalidInput("Salary column is entirely missing; mean is undefined".to_string())
    })?;
    for salary in &mut salaries {
        salary.get_or_insert(salary_mean);
    }

    // Age: out-of-range values become missing first, then everything missing
    // is filled with the mean of the values still considered valid.
    let mut age_outliers = 0;
    let mut ages: Vec<Option<f64>> = Vec::with_capacity(rows);
    for record in &dataset.records {
        let cell = record.get(dataset.age_idx).unwrap_or("").trim();
        if cell.is_empty() {
            ages.push(None);
            continue;
        }
        let value = cell
            .parse::<f64>()
            .map_err(|_| AppError::Parse(format!("Age value '{}' is not numeric", cell)))?;
        if (AGE_MIN..=AGE_MAX).contains(&value) {
            ages.push(Some(value));
        } else {
            age_outliers += 1;
            ages.push(None);
        }
    }

    let age_mean = mean(&ages).ok_or_else(|| {
        AppError::InvalidInput("Age column has no valid values; mean is undefined".to_string())
    })?;
    for age in &mut ages {
        age.get_or_insert(age_mean);
    }

    // Gender + write-back of the repaired numeric columns.
    let mut gender_collapsed = 0;
    for (i, record) in dataset.records.iter_mut().enumerate() {
        let mut fields: Vec<String> = record.iter().map(String::from).collect();

        fields[dataset.salary_idx] = format_value(salaries[i].unwrap_or(salary_mean));
        fields[dataset.age_idx] = format_value(ages[i].unwrap_or(age_mean));

        let gender = fields[dataset.gender_idx].trim();
        if gender != GENDER_MALE && gender != GENDER_FEMALE {
            gender_collapsed += 1;
            fields[dataset.gender_idx] = GENDER_OTHER.to_string();
        }

        *record = StringRecord::from(fields);
    }

    let missing_after = missing_counts(dataset);

    Ok(CleaningReport {
        rows,
        missing_before,
        missing_after,
        salary_mean,
        age_mean,
        age_outliers,
        gender_collapsed,
    })
}

/// Write the dataset back out with all columns preserved.
pub fn write_dataset(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(&dataset.headers)?;
    for record in &dataset.records {
        writer.write_record(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Mean of the present values; `None` when every value is missing.
fn mean(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    if present.is_empty() {
        return None;
    }
    Some(present.iter().sum::<f64>() / present.len() as f64)
}

/// Render a numeric cell without a trailing ".0" for whole numbers.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset_from(csv_text: &str) -> Dataset {
        let reader = Reader::from_reader(csv_text.as_bytes());
        parse_dataset(reader).unwrap()
    }

    fn column(dataset: &Dataset, idx: usize) -> Vec<String> {
        dataset
            .records
            .iter()
            .map(|r| r.get(idx).unwrap_or("").to_string())
            .collect()
    }

    #[test]
    fn test_age_outliers_replaced_by_mean_of_valid() {
        let mut dataset = dataset_from(
            "Salary,Age,Gender\n\
             100,15,Male\n\
             100,25,Male\n\
             100,70,Male\n\
             100,40,Male\n",
        );

        let report = clean(&mut dataset).unwrap();
        assert_eq!(report.age_outliers, 2);
        assert_eq!(report.age_mean, 32.5);
        assert_eq!(
            column(&dataset, dataset.age_idx),
            vec!["32.5", "25", "32.5", "40"]
        );
    }

    #[test]
    fn test_salary_sentinel_resolves_before_mean() {
        let mut dataset = dataset_from(
            "Salary,Age,Gender\n\
             Sixty Thousand,30,Male\n\
             50000,30,Male\n\
             70000,30,Male\n\
             ,30,Male\n",
        );

        let report = clean(&mut dataset).unwrap();
        // mean(60000, 50000, 70000) = 60000, computed after the sentinel is
        // replaced and before the missing cell is filled.
        assert_eq!(report.salary_mean, 60000.0);
        assert_eq!(
            column(&dataset, dataset.salary_idx),
            vec!["60000", "50000", "70000", "60000"]
        );
    }

    #[test]
    fn test_gender_normalization() {
        let mut dataset = dataset_from(
            "Salary,Age,Gender\n\
             100,30,Male\n\
             100,30,Female\n\
             100,30,Other\n\
             100,30,\n\
             100,30,unknown\n",
        );

        let report = clean(&mut dataset).unwrap();
        assert_eq!(report.gender_collapsed, 3);
        assert_eq!(
            column(&dataset, dataset.gender_idx),
            vec!["Male", "Female", "Others", "Others", "Others"]
        );
    }

    #[test]
    fn test_no_missing_values_after_clean() {
        let mut dataset = dataset_from(
            "Name,Salary,Age,Gender\n\
             a,Sixty Thousand,15,Male\n\
             b,,25,\n\
             c,50000,,Other\n\
             d,70000,40,Female\n",
        );

        let before = missing_counts(&dataset);
        assert_eq!(before.salary, 1);
        assert_eq!(before.age, 1);
        assert_eq!(before.gender, 1);

        let report = clean(&mut dataset).unwrap();
        assert_eq!(
            report.missing_after,
            ColumnCounts {
                salary: 0,
                age: 0,
                gender: 0
            }
        );

        for record in &dataset.records {
            let gender = record.get(dataset.gender_idx).unwrap();
            assert!(matches!(gender, "Male" | "Female" | "Others"));
        }
    }

    #[test]
    fn test_passthrough_columns_untouched() {
        let mut dataset = dataset_from(
            "Name,Salary,Age,Gender,City\n\
             alice,50000,30,Female,Pune\n\
             bob,70000,35,Male,Delhi\n",
        );

        clean(&mut dataset).unwrap();
        assert_eq!(column(&dataset, 0), vec!["alice", "bob"]);
        assert_eq!(column(&dataset, 4), vec!["Pune", "Delhi"]);
    }

    #[test]
    fn test_non_numeric_salary_is_an_error() {
        let mut dataset = dataset_from(
            "Salary,Age,Gender\n\
             Seventy Thousand,30,Male\n",
        );

        match clean(&mut dataset) {
            Err(AppError::Parse(msg)) => assert!(msg.contains("Seventy Thousand")),
            other => panic!("expected parse error, got {:?}", other.map(|r| r.rows)),
        }
    }

    #[test]
    fn test_entirely_missing_column_fails_fast() {
        let mut dataset = dataset_from(
            "Salary,Age,Gender\n\
             ,30,Male\n\
             ,35,Female\n",
        );
        assert!(matches!(
            clean(&mut dataset),
            Err(AppError::InvalidInput(_))
        ));

        // Ages that are all out of range leave no valid values either.
        let mut dataset = dataset_from(
            "Salary,Age,Gender\n\
             100,12,Male\n\
             100,99,Female\n",
        );
        assert!(matches!(
            clean(&mut dataset),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_missing_required_column() {
        let reader = Reader::from_reader("Salary,Years,Gender\n100,30,Male\n".as_bytes());
        assert!(matches!(
            parse_dataset(reader),
            Err(AppError::Config(_))
        ));
    }
}
