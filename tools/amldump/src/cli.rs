//! Command-line interface definitions for amldump.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Decode ACPI DSDT/SSDT tables into one namespace and inspect it.
#[derive(Parser)]
#[command(name = "amldump", version, about)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Table file to load. Repeat for SSDTs; files load in the order given.
    #[arg(long = "table", short = 't', required = true)]
    pub tables: Vec<PathBuf>,

    /// Treat files as raw AML after skipping this many bytes
    /// (accepts `36`, `0x24` or `044`).
    #[arg(long, value_parser = parse_skip)]
    pub skip: Option<usize>,

    /// TOML file with decoder settings.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Raise log verbosity; repeat for more.
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List every bound object.
    Objects,
    /// List devices under `\_SB` with their hardware ids.
    Devices,
    /// Print the object bound at a path.
    Lookup {
        /// Absolute path, e.g. `\_SB.PCI0._HID`.
        path: String,
    },
    /// List bound objects at and below a path.
    Walk {
        /// Absolute path to start from.
        root: String,
    },
}

fn parse_skip(text: &str) -> Result<usize, String> {
    let value =
        hadron_aml::decode_integer_literal(text.as_bytes()).map_err(|err| err.to_string())?;
    usize::try_from(value).map_err(|_| format!("{value} is too large"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn tables_and_subcommand() {
        let cli = Cli::try_parse_from([
            "amldump", "-t", "dsdt.dat", "--table", "ssdt1.dat", "-vv", "lookup", "\\_SB.PCI0",
        ])
        .unwrap();
        assert_eq!(
            cli.tables,
            [PathBuf::from("dsdt.dat"), PathBuf::from("ssdt1.dat")]
        );
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.command,
            Command::Lookup {
                path: "\\_SB.PCI0".into()
            }
        );
    }

    #[test]
    fn skip_uses_literal_syntax() {
        for (text, expected) in [("36", 36), ("0x24", 36), ("044", 36)] {
            let cli =
                Cli::try_parse_from(["amldump", "-t", "a.aml", "--skip", text, "devices"]).unwrap();
            assert_eq!(cli.skip, Some(expected));
        }
        assert!(Cli::try_parse_from(["amldump", "-t", "a.aml", "--skip", "0x", "devices"]).is_err());
    }

    #[test]
    fn table_is_required() {
        assert!(Cli::try_parse_from(["amldump", "objects"]).is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["amldump", "-t", "a", "-q", "-v", "objects"]).is_err());
    }
}
