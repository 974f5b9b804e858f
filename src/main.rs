use clap::Parser;

use newton_sqrt_explorer::cli::args::{CommandsEnum, NewtonExplorerArgs};
use newton_sqrt_explorer::cli::explore::explore_newton_problems;
use newton_sqrt_explorer::cli::render::render_newton_problems;
use newton_sqrt_explorer::core::file_io::{
    build_output_path_with_date_time, extract_base_name, maybe_date_time_string, FilePrefix,
};
use newton_sqrt_explorer::newton::params::{read_parameter_file, NewtonParams};

fn file_prefix(project: &str, base_name: &str, datetime: &Option<String>) -> FilePrefix {
    let directory_path = build_output_path_with_date_time(project, base_name, datetime)
        .unwrap_or_else(|err| panic!("ERROR:  Unable to create output directory: {}", err));
    FilePrefix {
        directory_path,
        file_base: base_name.to_owned(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: NewtonExplorerArgs = NewtonExplorerArgs::parse();

    match &args.command {
        Some(CommandsEnum::Render(params)) => {
            let newton_params = read_parameter_file(&params.params_path)?;
            let base_name = extract_base_name(&params.params_path);
            render_newton_problems(
                &newton_params,
                file_prefix(
                    "render",
                    base_name,
                    &maybe_date_time_string(params.date_time_out),
                ),
            )?;
        }

        Some(CommandsEnum::Explore(params)) => {
            let (newton_params, base_name) = match &params.params_path {
                Some(path) => (read_parameter_file(path)?, extract_base_name(path)),
                None => (NewtonParams::default(), "default"),
            };
            explore_newton_problems(
                newton_params,
                params.problem_index,
                file_prefix("explore", base_name, &None),
            )?;
        }

        None => {
            println!("INFO:  No command given; solving the default problems.");
            render_newton_problems(
                &NewtonParams::default(),
                file_prefix("render", "default", &None),
            )?;
            println!("INFO:  Opening the explorer; press N/P to switch problems.");
            explore_newton_problems(
                NewtonParams::default(),
                0,
                file_prefix("explore", "default", &None),
            )?;
        }
    }
    Ok(())
}
