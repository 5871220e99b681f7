use std::io::Write;
use std::path::Path;

use log::info;

use super::fit_engine::{FIT_TABLE_HEADER, FitTable};
use crate::error::QcmdError;

/// Writes the frequency table, a blank line, then the dissipation table.
/// Each table starts with its own header row.
pub fn write_fit_tables<W: Write>(
    mut writer: W,
    frequency: &FitTable,
    dissipation: &FitTable,
) -> Result<(), QcmdError> {
    if frequency.is_empty() && dissipation.is_empty() {
        return Err(QcmdError::NoFitResults);
    }

    write_table(&mut writer, frequency)?;
    writer.write_all(b"\n")?;
    write_table(&mut writer, dissipation)?;

    writer.flush()?;
    Ok(())
}

fn write_table<W: Write>(writer: &mut W, table: &FitTable) -> Result<(), QcmdError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);

    csv_writer.write_record(FIT_TABLE_HEADER)?;
    for result in table.results() {
        csv_writer.write_record(result.row())?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn export_fit_tables(
    path: &Path,
    frequency: &FitTable,
    dissipation: &FitTable,
) -> Result<(), QcmdError> {
    if frequency.is_empty() && dissipation.is_empty() {
        return Err(QcmdError::NoFitResults);
    }

    let file = std::fs::File::create(path)?;
    write_fit_tables(std::io::BufWriter::new(file), frequency, dissipation)?;

    info!("Exported fit results to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitter::fit_engine::{FitResult, SegmentFit};
    use crate::fitter::linear::LinearFitter;
    use crate::reader::Channel;

    fn table(channel: Channel, labels: &[&str]) -> FitTable {
        let mut table = FitTable::new(channel);
        for (i, label) in labels.iter().enumerate() {
            table.fits.push(SegmentFit {
                result: FitResult {
                    label: (*label).to_owned(),
                    slope: -1.5,
                    intercept: 2.0,
                    r_value: -0.998,
                    p_value: 0.0,
                    k2: if i == 0 { Some(1.234) } else { None },
                    p_normal: if i == 0 { Some(0.54) } else { None },
                },
                fitter: LinearFitter::new(label, vec![], vec![]),
            });
        }
        table
    }

    #[test]
    fn writes_two_tables_separated_by_a_blank_line() {
        let frequency = table(Channel::Frequency, &["F3 1", "F5 1"]);
        let dissipation = table(Channel::Dissipation, &["D3 1"]);

        let mut buffer = Vec::new();
        write_fit_tables(&mut buffer, &frequency, &dissipation).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let expected = "\
ID,Slope,Intercept,R value,P value,K2,P val Error
F3 1,-1.5,2,-0.998,0,1.234,0.54
F5 1,-1.5,2,-0.998,0,-,-

ID,Slope,Intercept,R value,P value,K2,P val Error
D3 1,-1.5,2,-0.998,0,1.234,0.54
";
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_frequency_table_still_writes_its_header() {
        let frequency = FitTable::new(Channel::Frequency);
        let dissipation = table(Channel::Dissipation, &["D5 2"]);

        let mut buffer = Vec::new();
        write_fit_tables(&mut buffer, &frequency, &dissipation).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "ID,Slope,Intercept,R value,P value,K2,P val Error",
                "",
                "ID,Slope,Intercept,R value,P value,K2,P val Error",
                "D5 2,-1.5,2,-0.998,0,1.234,0.54",
            ]
        );
        assert!(!text.contains("\"\""));
    }

    #[test]
    fn nothing_to_export_is_an_error() {
        let frequency = FitTable::new(Channel::Frequency);
        let dissipation = FitTable::new(Channel::Dissipation);

        let mut buffer = Vec::new();
        let err = write_fit_tables(&mut buffer, &frequency, &dissipation).unwrap_err();
        assert!(matches!(err, QcmdError::NoFitResults));
        assert!(buffer.is_empty());
    }

    #[test]
    fn export_writes_file() {
        let path = std::env::temp_dir().join("qcmd_analyser_export_test.csv");
        let frequency = table(Channel::Frequency, &["F3 1"]);
        let dissipation = FitTable::new(Channel::Dissipation);

        export_fit_tables(&path, &frequency, &dissipation).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "F3 1,-1.5,2,-0.998,0,1.234,0.54");
        assert_eq!(lines[2], "");
    }

    #[test]
    fn missing_directory_reports_not_found() {
        let path = std::env::temp_dir()
            .join("qcmd_analyser_no_such_dir")
            .join("fits.csv");
        let frequency = table(Channel::Frequency, &["F3 1"]);
        let dissipation = FitTable::new(Channel::Dissipation);

        let err = export_fit_tables(&path, &frequency, &dissipation).unwrap_err();
        assert!(err.is_not_found());
    }
}
