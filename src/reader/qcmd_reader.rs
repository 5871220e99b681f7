use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::sensor_data::SensorReading;
use crate::error::QcmdError;

/// Columns per sensor in a multi-sensor export:
/// `time, F1, D1, F3, D3, F5, D5, F7, D7, F9, D9, F11, D11, F13, D13`.
pub const MULTI_SENSOR_STANZA: usize = 15;

/// Columns in a single-sensor export: `time, F3..F13, D3..D13`.
pub const SINGLE_SENSOR_COLUMNS: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Tab separated, one 15 column stanza per sensor, baseline normalised.
    MultiSensorTab,
    /// Comma separated, one sensor, values kept as recorded.
    SingleSensorComma,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Self {
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        if is_csv {
            FileFormat::SingleSensorComma
        } else {
            FileFormat::MultiSensorTab
        }
    }

    pub fn delimiter(self) -> u8 {
        match self {
            FileFormat::MultiSensorTab => b'\t',
            FileFormat::SingleSensorComma => b',',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FileFormat::MultiSensorTab => "Multi-sensor (tab)",
            FileFormat::SingleSensorComma => "Single-sensor (comma)",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QcmdData {
    pub format: FileFormat,
    pub num_sensors: usize,
    pub sensors: Vec<SensorReading>,
}

impl QcmdData {
    pub fn sensor(&self, index: usize) -> Option<&SensorReading> {
        self.sensors.get(index)
    }
}

pub fn read_file(path: &Path, format: FileFormat) -> Result<QcmdData, QcmdError> {
    log::info!("Reading {} as {}", path.display(), format.name());
    let file = File::open(path)?;
    read_from(file, format)
}

pub fn read_from<R: Read>(reader: R, format: FileFormat) -> Result<QcmdData, QcmdError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(format.delimiter())
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut num_sensors: Option<usize> = None;
    let mut sensors: Vec<SensorReading> = Vec::new();
    let mut skipped_rows = 0usize;

    for (line, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                log::debug!("Skipping line {}: {err}", line + 1);
                skipped_rows += 1;
                continue;
            }
        };

        // the first row fixes the number of sensors, header or not
        let count = *num_sensors.get_or_insert_with(|| {
            let count = match format {
                FileFormat::MultiSensorTab => record.len() / MULTI_SENSOR_STANZA,
                FileFormat::SingleSensorComma => 1,
            };
            sensors = vec![SensorReading::new(); count];
            count
        });

        if record.iter().all(str::is_empty) {
            continue;
        }

        let fields: Vec<&str> = record.iter().collect();
        match format {
            FileFormat::MultiSensorTab => {
                for (index, stanza) in fields.chunks(MULTI_SENSOR_STANZA).take(count).enumerate() {
                    if !push_multi_sensor_stanza(&mut sensors[index], stanza) {
                        skipped_rows += 1;
                    }
                }
            }
            FileFormat::SingleSensorComma => {
                if !push_single_sensor_row(&mut sensors[0], &fields) {
                    skipped_rows += 1;
                }
            }
        }
    }

    if sensors.iter().all(SensorReading::is_empty) {
        return Err(QcmdError::NoData);
    }

    if format == FileFormat::MultiSensorTab {
        for sensor in &mut sensors {
            sensor.normalise();
        }
    }

    log::info!(
        "Read {} sensor(s), {} samples, {} malformed row(s) skipped",
        sensors.len(),
        sensors.first().map_or(0, SensorReading::len),
        skipped_rows
    );

    Ok(QcmdData {
        format,
        num_sensors: sensors.len(),
        sensors,
    })
}

fn parse_fields(fields: &[&str]) -> Option<Vec<f64>> {
    fields.iter().map(|field| field.parse::<f64>().ok()).collect()
}

fn push_multi_sensor_stanza(sensor: &mut SensorReading, stanza: &[&str]) -> bool {
    if stanza.len() < MULTI_SENSOR_STANZA {
        return false;
    }
    let Some(values) = parse_fields(stanza) else {
        return false;
    };

    // skip the fundamental pair at columns 1 and 2
    let frequency = std::array::from_fn(|h| values[3 + 2 * h]);
    let dissipation = std::array::from_fn(|h| values[4 + 2 * h]);
    sensor.push_sample(values[0], frequency, dissipation);
    true
}

fn push_single_sensor_row(sensor: &mut SensorReading, fields: &[&str]) -> bool {
    if fields.len() < SINGLE_SENSOR_COLUMNS {
        return false;
    }
    let Some(values) = parse_fields(&fields[..SINGLE_SENSOR_COLUMNS]) else {
        return false;
    };

    let frequency = std::array::from_fn(|h| values[1 + h]);
    let dissipation = std::array::from_fn(|h| values[7 + h]);
    sensor.push_sample(values[0], frequency, dissipation);
    true
}
