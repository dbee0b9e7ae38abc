use std::fmt;

/// Sizes of one packing run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub input_size: usize,
    pub output_size: usize,
    pub multi_row: bool,
}

impl Report {
    /// Output size in percent of the input size, `None` for empty input
    pub fn percent(&self) -> Option<f64> {
        if self.input_size == 0 {
            return None;
        }
        Some(self.output_size as f64 / self.input_size as f64 * 100.0)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Embedded image has {}", if self.multi_row { "multiple rows" } else { "single row" })?;
        writeln!(f, "Input size: {} bytes", self.input_size)?;
        writeln!(f, "Output PNG file size: {} bytes", self.output_size)?;
        match self.percent() {
            Some(p) => write!(f, "PNG is {p:3.2} percent of input"),
            None => write!(f, "PNG size ratio undefined for empty input"),
        }
    }
}
