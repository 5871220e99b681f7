pub mod qcmd_reader;
pub mod sensor_data;

pub use qcmd_reader::{FileFormat, QcmdData, read_file};
pub use sensor_data::{Channel, Harmonic, SensorReading};
