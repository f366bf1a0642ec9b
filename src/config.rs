use crate::choropleth::Year;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "dengue-map",
    version,
    about = "Choropleth of dengue cases per Peruvian department"
)]
pub struct Cli {
    /// CSV with a `Departamentos` column and one column per year
    #[arg(long, default_value = "dengue.csv")]
    pub cases: PathBuf,

    /// GeoJSON FeatureCollection with a `NOMBDEP` property per department
    #[arg(long, default_value = "peru_departamental_simple.geojson")]
    pub boundaries: PathBuf,

    /// Year shown first (2019-2024)
    #[arg(long, global = true, default_value = "2019")]
    pub year: Year,

    /// Write logs here while the terminal map owns the screen
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Interactive terminal map (default)
    View,
    /// Write a standalone HTML map with a year selector
    Export {
        #[arg(long, short)]
        out: PathBuf,
    },
    /// Print the style of every department for `--year` as JSON lines
    Styles,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::View)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["dengue-map"]).unwrap();
        assert_eq!(cli.cases, PathBuf::from("dengue.csv"));
        assert_eq!(cli.boundaries, PathBuf::from("peru_departamental_simple.geojson"));
        assert_eq!(cli.year, Year::first());
        assert_eq!(cli.command(), Command::View);
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn test_year_after_subcommand() {
        let cli = Cli::try_parse_from(["dengue-map", "styles", "--year", "2023"]).unwrap();
        assert_eq!(cli.command(), Command::Styles);
        assert_eq!(cli.year.get(), 2023);
    }

    #[test]
    fn test_export_requires_out() {
        assert!(Cli::try_parse_from(["dengue-map", "export"]).is_err());
        let cli = Cli::try_parse_from(["dengue-map", "export", "-o", "mapa.html"]).unwrap();
        assert_eq!(
            cli.command(),
            Command::Export {
                out: PathBuf::from("mapa.html")
            }
        );
    }

    #[test]
    fn test_unsupported_year_rejected() {
        assert!(Cli::try_parse_from(["dengue-map", "--year", "2018"]).is_err());
    }
}
