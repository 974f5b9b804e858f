#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use newton_sqrt_explorer::newton::params::default_problems;
    use newton_sqrt_explorer::newton::solver::{solve, SolverParams, Termination};

    #[test]
    fn test_square_root_of_three() {
        let solution = solve(3.0, 2.0, &SolverParams::default());
        let records = solution.records.records();

        assert_eq!(records[0].x_curr, 2.0);
        assert_eq!(records[0].f_x, 1.0);
        assert_eq!(records[0].error, 0.25);
        assert_eq!(records[1].x_curr, 1.75);

        assert!(solution.termination.is_converged());
        assert_relative_eq!(solution.estimate(), 1.7320508075688772, epsilon = 1e-9);
    }

    #[test]
    fn test_square_root_of_ninety_nine() {
        let params = SolverParams {
            tolerance: 1e-6,
            max_iterations: 10,
        };
        let solution = solve(99.0, 10.0, &params);
        assert!(solution.records.len() < 10);
        assert!(solution.termination.is_converged());
        assert_relative_eq!(solution.estimate(), 9.9498743710662, epsilon = 1e-9);
    }

    #[test]
    fn test_default_problems_all_converge() {
        for problem in default_problems() {
            let solution = solve(
                problem.target_value,
                problem.initial_guess,
                &SolverParams::default(),
            );
            assert!(
                solution.termination.is_converged(),
                "sqrt({}) did not converge: {:?}",
                problem.target_value,
                solution.termination
            );
            assert_relative_eq!(
                solution.estimate(),
                problem.target_value.sqrt(),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_convergence_over_a_range_of_targets() {
        let params = SolverParams {
            tolerance: 1e-9,
            max_iterations: 100,
        };
        for target_value in [0.25, 1.0, 2.0, 10.0, 12345.0, 1e8] {
            for initial_guess in [0.5, 1.0, 7.0, 300.0] {
                let solution = solve(target_value, initial_guess, &params);
                assert!(solution.termination.is_converged());
                assert_relative_eq!(
                    solution.estimate(),
                    f64::sqrt(target_value),
                    max_relative = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_solve_is_idempotent() {
        let params = SolverParams::default();
        assert_eq!(solve(7.0, 3.0, &params), solve(7.0, 3.0, &params));
    }

    #[test]
    fn test_zero_initial_guess_stops_immediately() {
        let solution = solve(3.0, 0.0, &SolverParams::default());
        assert!(solution.records.is_empty());
        assert_eq!(solution.termination, Termination::SingularSlope { x: 0.0 });
    }

    #[test]
    fn test_negative_guess_converges_to_negative_root() {
        let solution = solve(16.0, -3.0, &SolverParams::default());
        assert_relative_eq!(solution.estimate(), -4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_errors_shrink_quadratically_near_the_root() {
        let params = SolverParams {
            tolerance: 1e-15,
            max_iterations: 20,
        };
        let solution = solve(20.0, 4.0, &params);
        let errors: Vec<f64> = solution.records.records().iter().map(|r| r.error).collect();
        // Once close, each step error is roughly proportional to the square of the previous one.
        assert!(errors[2] < errors[1] * errors[1]);
        assert!(errors[1] < errors[0]);
    }
}
