use crate::listing::{run_catalog_list, ListArgs};
use crate::server;
use amenity_catalog::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Amenity Catalog",
    about = "Serve and inspect the property amenity catalog",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect the configured catalog from the command line
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Print the amenity hierarchy visible to a user
    List(ListArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Catalog {
            command: CatalogCommand::List(args),
        } => run_catalog_list(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amenity_catalog::catalog::AvailabilityFilter;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_catalog_list_arguments() {
        let cli = Cli::try_parse_from([
            "amenity-catalog-api",
            "catalog",
            "list",
            "--user",
            "resident-1",
            "--filter",
            "house-space",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Catalog {
                command: CatalogCommand::List(args),
            }) => {
                assert_eq!(args.user, "resident-1");
                assert_eq!(args.filter, AvailabilityFilter::HouseSpace);
                assert!(!args.json);
            }
            other => panic!("expected catalog list, got {other:?}"),
        }
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["amenity-catalog-api"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
