//! Command-line interface definitions and argument parsing

use std::path::Path;

use clap::Parser;

/// Retail analytics CLI: ABC revenue tiers and FRM customer segmentation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input CSV file (columns: key, item, date, price, customer)
    #[arg(short, long, default_value = "data.csv")]
    pub input: String,

    /// Directory for generated chart images
    #[arg(short, long, default_value = "output")]
    pub output: String,

    /// Number of products in the top-performers view
    #[arg(long, default_value = "5")]
    pub top: usize,

    /// Write the full analysis bundle (tables, rollups, charts) as JSON
    #[arg(long)]
    pub export: Option<String>,

    /// Skip PNG chart rendering
    #[arg(long)]
    pub no_charts: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Output directory as a path.
    pub fn output_dir(&self) -> &Path {
        Path::new(&self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["brewforge"]).unwrap();
        assert_eq!(args.input, "data.csv");
        assert_eq!(args.output, "output");
        assert_eq!(args.top, 5);
        assert_eq!(args.export, None);
        assert!(!args.no_charts);
        assert!(!args.verbose);
    }

    #[test]
    fn test_parse_overrides() {
        let args = Args::try_parse_from([
            "brewforge",
            "--input",
            "sales.csv",
            "--top",
            "10",
            "--export",
            "report.json",
            "--no-charts",
            "--verbose",
        ])
        .unwrap();

        assert_eq!(args.input, "sales.csv");
        assert_eq!(args.top, 10);
        assert_eq!(args.export.as_deref(), Some("report.json"));
        assert!(args.no_charts);
        assert!(args.verbose);
    }
}
