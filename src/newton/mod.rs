pub mod params;
pub mod report;
pub mod solver;
pub mod visualization;

use std::io::Write;

use serde::Serialize;

use crate::core::{
    file_io::{serialize_to_json_or_panic, FilePrefix},
    image_utils::write_image_to_file_or_panic,
    stopwatch::Stopwatch,
};

use params::{NewtonParams, PlotParams, Problem};
use solver::{solve, Solution, SolverParams};

/// Everything needed to reproduce a single rendered problem.
#[derive(Serialize, Debug)]
struct ProblemRecord<'a> {
    problem: &'a Problem,
    solver: &'a SolverParams,
    plot: &'a PlotParams,
}

/// File-name friendly label for a problem, e.g. `02_sqrt_20`.
pub fn problem_file_base(index: usize, problem: &Problem) -> String {
    let target = format!("{}", problem.target_value)
        .replace('.', "p")
        .replace('-', "m");
    format!("{:02}_sqrt_{}", index, target)
}

/// Solves one problem, prints its progress table, and writes the plot, the
/// iteration table, the parameters, and timing diagnostics to disk.
pub fn render_problem(
    problem: &Problem,
    solver_params: &SolverParams,
    plot_params: &PlotParams,
    file_prefix: &FilePrefix,
) -> Result<Solution, Box<dyn std::error::Error>> {
    let mut stopwatch = Stopwatch::new("Newton-Raphson Render Stopwatch".to_owned());

    serialize_to_json_or_panic(
        file_prefix.full_path_with_suffix(".json"),
        &ProblemRecord {
            problem,
            solver: solver_params,
            plot: plot_params,
        },
    );

    let solution = solve(problem.target_value, problem.initial_guess, solver_params);
    stopwatch.record_split("solve".to_owned());

    report::display_solution(&mut std::io::stdout().lock(), problem, &solution)?;
    serialize_to_json_or_panic(
        file_prefix.full_path_with_suffix("_iterations.json"),
        &solution,
    );
    stopwatch.record_split("report".to_owned());

    let scene = visualization::build_plot_scene(problem, &solution, plot_params);
    let image_specification = visualization::fit_view(&scene, plot_params);
    let imgbuf = scene.rasterize(&image_specification);
    stopwatch.record_split("rasterize".to_owned());

    write_image_to_file_or_panic(file_prefix.full_path_with_suffix(".png"), |f| {
        imgbuf.save(f)
    });
    stopwatch.record_split("write_png".to_owned());

    let mut diagnostics_file = file_prefix.create_file_with_suffix("_diagnostics.txt");
    writeln!(
        diagnostics_file,
        "{}",
        visualization::plot_title(problem, &solution)
    )?;
    writeln!(diagnostics_file, "termination: {:?}", solution.termination)?;
    writeln!(diagnostics_file, "view: {:?}", image_specification)?;
    stopwatch.display(&mut diagnostics_file)?;

    Ok(solution)
}

/// Renders every problem in `params`, each into its own sub-directory of
/// `file_prefix`.
pub fn render_all(
    params: &NewtonParams,
    file_prefix: &FilePrefix,
) -> Result<Vec<Solution>, Box<dyn std::error::Error>> {
    params
        .problems
        .iter()
        .enumerate()
        .map(|(index, problem)| {
            let base = problem_file_base(index, problem);
            let mut problem_prefix = file_prefix.with_sub_directory(&base)?;
            problem_prefix.file_base = base;
            render_problem(problem, &params.solver, &params.plot, &problem_prefix)
        })
        .collect()
}
