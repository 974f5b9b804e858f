use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct NewtonExplorerArgs {
    #[command(subcommand)]
    pub command: Option<CommandsEnum>,
}

#[derive(Debug, Subcommand)]
pub enum CommandsEnum {
    /// Solve every problem in a parameter file, writing plots and tables to `out/`.
    Render(ParameterFilePath),
    /// Open an interactive pan/zoom window; N/P step through the problems.
    Explore(ExploreArgs),
}

#[derive(Debug, Args)]
pub struct ParameterFilePath {
    pub params_path: String,

    #[clap(long, short)]
    pub date_time_out: bool,
}

#[derive(Debug, Args)]
pub struct ExploreArgs {
    /// Parameter file; the built-in default problems are used when omitted.
    pub params_path: Option<String>,

    /// Which entry of the `problems` list to show first.
    #[clap(long, short, default_value_t = 0)]
    pub problem_index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explore_parameter_file_is_optional() {
        let args = NewtonExplorerArgs::try_parse_from(["newton-sqrt-explorer", "explore"]).unwrap();
        match args.command {
            Some(CommandsEnum::Explore(explore)) => {
                assert_eq!(explore.params_path, None);
                assert_eq!(explore.problem_index, 0);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let args = NewtonExplorerArgs::try_parse_from([
            "newton-sqrt-explorer",
            "explore",
            "demos/edge_cases.json",
            "--problem-index",
            "2",
        ])
        .unwrap();
        match args.command {
            Some(CommandsEnum::Explore(explore)) => {
                assert_eq!(explore.params_path.as_deref(), Some("demos/edge_cases.json"));
                assert_eq!(explore.problem_index, 2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand() {
        let args = NewtonExplorerArgs::try_parse_from(["newton-sqrt-explorer"]).unwrap();
        assert!(args.command.is_none());
    }
}
