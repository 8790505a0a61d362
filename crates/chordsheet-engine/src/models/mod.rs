pub mod chart_file;

pub use chart_file::ChartFile;
