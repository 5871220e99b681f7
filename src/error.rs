use std::error::Error;
use std::fmt::Display;

#[derive(Debug)]
pub enum QcmdError {
    File(std::io::Error),
    Csv(csv::Error),
    NoData,
    NoFitResults,
}

impl QcmdError {
    pub fn is_not_found(&self) -> bool {
        match self {
            QcmdError::File(err) => err.kind() == std::io::ErrorKind::NotFound,
            QcmdError::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(io) => io.kind() == std::io::ErrorKind::NotFound,
                _ => false,
            },
            QcmdError::NoData | QcmdError::NoFitResults => false,
        }
    }
}

impl From<std::io::Error> for QcmdError {
    fn from(err: std::io::Error) -> QcmdError {
        QcmdError::File(err)
    }
}

impl From<csv::Error> for QcmdError {
    fn from(err: csv::Error) -> QcmdError {
        QcmdError::Csv(err)
    }
}

impl Display for QcmdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QcmdError::File(x) => write!(f, "File I/O error: {x}"),
            QcmdError::Csv(x) => write!(f, "Error reading delimited data: {x}"),
            QcmdError::NoData => write!(f, "File contained no usable sensor readings"),
            QcmdError::NoFitResults => {
                write!(f, "No fit results to export, fit the selected data first")
            }
        }
    }
}

impl Error for QcmdError {}
