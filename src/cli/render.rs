use crate::core::file_io::FilePrefix;
use crate::newton::{params::NewtonParams, render_all, solver::Solution};

/// Renders every problem in `params` and prints a one-line summary of each.
pub fn render_newton_problems(
    params: &NewtonParams,
    file_prefix: FilePrefix,
) -> Result<Vec<Solution>, Box<dyn std::error::Error>> {
    println!(
        "INFO:  Rendering {} problem(s) into {}",
        params.problems.len(),
        file_prefix.directory_path.display()
    );
    let solutions = render_all(params, &file_prefix)?;

    for (problem, solution) in params.problems.iter().zip(solutions.iter()) {
        println!(
            "INFO:  sqrt({}) ~= {:.9}  after {} iteration(s);  {:?}",
            problem.target_value,
            solution.estimate(),
            solution.records.len(),
            solution.termination
        );
    }
    Ok(solutions)
}
