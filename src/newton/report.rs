use std::io::{self, Write};

use super::{
    params::Problem,
    solver::{IterationRecord, Solution, Termination},
};

pub fn write_header<W: Write>(writer: &mut W, problem: &Problem) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(
        writer,
        "--- Solving for sqrt({}) with x0={:?} ---",
        problem.target_value, problem.initial_guess
    )?;
    writeln!(
        writer,
        "{:<5} {:<12} {:<12} {:<12}",
        "Iter", "x_curr", "f(x)", "Error"
    )
}

pub fn write_record<W: Write>(writer: &mut W, record: &IterationRecord) -> io::Result<()> {
    writeln!(
        writer,
        "{:<5} {:<12.6} {:<12.6} {:<12.6}",
        record.index, record.x_curr, record.f_x, record.error
    )
}

pub fn write_termination<W: Write>(writer: &mut W, termination: &Termination) -> io::Result<()> {
    match termination {
        Termination::Converged { root } => writeln!(writer, "Converged to {:.6}", root),
        Termination::SingularSlope { x } => writeln!(
            writer,
            "Stopped: derivative vanished at x = {:.6}",
            x
        ),
        Termination::IterationLimit { x } => writeln!(
            writer,
            "Stopped: iteration limit reached, last estimate {:.6}",
            x
        ),
    }
}

/// Prints the full progress table for one problem.
pub fn display_solution<W: Write>(
    writer: &mut W,
    problem: &Problem,
    solution: &Solution,
) -> io::Result<()> {
    write_header(writer, problem)?;
    for record in solution.records.records() {
        write_record(writer, record)?;
    }
    write_termination(writer, &solution.termination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::newton::solver::{solve, SolverParams};

    fn render_to_string(problem: &Problem) -> String {
        let solution = solve(
            problem.target_value,
            problem.initial_guess,
            &SolverParams::default(),
        );
        let mut buffer = Vec::new();
        display_solution(&mut buffer, problem, &solution).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_table_for_square_root_of_three() {
        let text = render_to_string(&Problem {
            target_value: 3.0,
            initial_guess: 2.0,
        });
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "--- Solving for sqrt(3) with x0=2.0 ---");
        assert_eq!(lines[2], "Iter  x_curr       f(x)         Error       ");
        assert_eq!(lines[3], "1     2.000000     1.000000     0.250000    ");
        assert_eq!(*lines.last().unwrap(), "Converged to 1.732051");
    }

    #[test]
    fn test_table_for_singular_start() {
        let text = render_to_string(&Problem {
            target_value: 3.0,
            initial_guess: 0.0,
        });
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], "Stopped: derivative vanished at x = 0.000000");
    }

    #[test]
    fn test_table_for_iteration_limit() {
        let problem = Problem {
            target_value: 99.0,
            initial_guess: 10.0,
        };
        let params = SolverParams {
            tolerance: 1e-12,
            max_iterations: 2,
        };
        let solution = solve(problem.target_value, problem.initial_guess, &params);
        let mut buffer = Vec::new();
        display_solution(&mut buffer, &problem, &solution).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        // Header (3 lines), two records, then the stop message.
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[3], "1     10.000000    1.000000     0.050000    ");
        assert_eq!(
            lines[5],
            format!(
                "Stopped: iteration limit reached, last estimate {:.6}",
                solution.estimate()
            )
        );
    }
}
