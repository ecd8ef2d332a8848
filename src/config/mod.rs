use std::path::PathBuf;

/// Top-level host configuration
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub width: u32,
    pub height: u32,
    pub variant: ClockVariant,
    /// Milliseconds between ticks
    pub interval_ms: u64,
    pub output_mode: OutputMode,
    pub output_path: PathBuf,
    /// Initial palette overrides as a JSON mapping
    pub colors: Option<String>,
    /// Stop after this many ticks; 0 runs until interrupted
    pub frames: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            width: 144,
            height: 144,
            variant: ClockVariant::default(),
            interval_ms: 1000,
            output_mode: OutputMode::default(),
            output_path: PathBuf::from("clock.png"),
            colors: None,
            frames: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClockVariant {
    /// Seven-segment HH:MM
    #[default]
    Digital,
    Analog,
}

impl std::str::FromStr for ClockVariant {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "digital" | "segment" => Ok(ClockVariant::Digital),
            "analog" | "analogue" => Ok(ClockVariant::Analog),
            _ => Err(format!("Unknown clock variant: {s}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Overwrite a PNG file every tick
    #[default]
    Png,
    /// Print the data URI to stdout, one line per tick
    DataUri,
    /// Draw only
    None,
}

impl std::str::FromStr for OutputMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(OutputMode::Png),
            "datauri" | "data-uri" | "stdout" => Ok(OutputMode::DataUri),
            "none" | "off" => Ok(OutputMode::None),
            _ => Err(format!("Unknown output mode: {s}")),
        }
    }
}
