use thiserror::Error;

#[derive(Debug, Error)]
pub enum VizError {
    #[error("malformed record: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("record field error: {0}")]
    Field(#[source] serde_json::Error),
    #[error("line is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("device read failed: {0}")]
    Device(#[from] std::io::Error),
    #[error("failed to open serial port {port}: {source}")]
    Serial {
        port: String,
        #[source]
        source: serialport::Error,
    },
    #[error("failed to render frame: {0}")]
    Plot(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Coarse classification the driver loop matches on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Decode,
    Field,
    Device,
    Render,
    Config,
}

impl VizError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VizError::Decode(_) | VizError::Utf8(_) => ErrorKind::Decode,
            VizError::Field(_) => ErrorKind::Field,
            VizError::Device(_) | VizError::Serial { .. } => ErrorKind::Device,
            VizError::Plot(_) => ErrorKind::Render,
            VizError::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<serde_json::Error> for VizError {
    fn from(value: serde_json::Error) -> Self {
        use serde_json::error::Category;
        match value.classify() {
            Category::Data => VizError::Field(value),
            Category::Io => VizError::Device(value.into()),
            Category::Syntax | Category::Eof => VizError::Decode(value),
        }
    }
}

impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for VizError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        VizError::Plot(format!("{value:?}"))
    }
}

impl From<toml::de::Error> for VizError {
    fn from(value: toml::de::Error) -> Self {
        VizError::Config(value.to_string())
    }
}
