use crate::application::ml::batch::{BatchOutcome, BatchRecord};
use crate::domain::customer::CustomerProfile;
use anyhow::{Context, Result};
use std::io::{Read, Write};

/// Reads customer rows from CSV with a header line.
///
/// A row that fails to deserialize is kept as `Err` so the batch can report it
/// in place instead of aborting.
pub fn read_profiles<R: Read>(reader: R) -> Vec<Result<CustomerProfile, String>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    rdr.deserialize::<CustomerProfile>()
        .map(|row| row.map_err(|e| format!("CSV deserialize error: {}", e)))
        .collect()
}

/// Writes one `row,label,probability,error` record per outcome
pub fn write_outcomes<W: Write>(writer: W, outcomes: &[BatchOutcome]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(true).from_writer(writer);
    for outcome in outcomes {
        wtr.serialize(BatchRecord::from(outcome))
            .with_context(|| format!("Failed to write batch row {}", outcome.row))?;
    }
    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prediction::{ChurnLabel, PredictionResult};

    const INPUT: &str = "\
credit_score,gender,age,tenure,balance,products_number,credit_card,active_member,estimated_salary,country
650, Female,35,5,50000.0,1,1,1,100000.0,France
700,Male,forty,3,0.0,2,0,1,85000.0,Spain
";

    #[test]
    fn test_read_profiles_keeps_bad_rows() {
        let rows = read_profiles(INPUT.as_bytes());
        assert_eq!(rows.len(), 2);

        let first = rows[0].as_ref().unwrap();
        assert_eq!(first.gender, "Female");
        assert_eq!(first.country, "France");
        assert_eq!(first.balance, 50000.0);

        assert!(rows[1].as_ref().unwrap_err().contains("CSV deserialize error"));
    }

    #[test]
    fn test_write_outcomes() {
        let outcomes = vec![
            BatchOutcome {
                row: 1,
                result: Ok(PredictionResult::new(ChurnLabel::Churned, 0.75)),
            },
            BatchOutcome {
                row: 2,
                result: Err("Invalid input: age".to_string()),
            },
        ];

        let mut buf = Vec::new();
        write_outcomes(&mut buf, &outcomes).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "row,label,probability,error");
        assert_eq!(lines[1], "1,1,0.75,");
        assert_eq!(lines[2], "2,,,Invalid input: age");
    }
}
