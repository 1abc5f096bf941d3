use thiserror::Error;

pub type IoResult<T> = Result<T, IoError>;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("reading alignment report: {0}")]
    Read(#[from] std::io::Error),
    #[error("parsing BLAST XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("malformed hit record: {0}")]
    Malformed(String),
}
