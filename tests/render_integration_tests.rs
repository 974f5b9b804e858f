#[cfg(test)]
mod tests {
    use newton_sqrt_explorer::core::file_io::FilePrefix;
    use newton_sqrt_explorer::newton::params::{NewtonParams, PlotParams, Problem};
    use newton_sqrt_explorer::newton::render_all;
    use newton_sqrt_explorer::newton::solver::{SolverParams, Solution};
    use std::path::PathBuf;

    #[test]
    fn test_render_writes_all_outputs() {
        let directory_path: PathBuf = ["out", "test", "render_integration"].iter().collect();
        std::fs::create_dir_all(&directory_path).expect("Unable to create `out` directory");

        let mut plot = PlotParams::default();
        plot.fit_image.resolution = [160, 100];
        let params = NewtonParams {
            problems: vec![
                Problem {
                    target_value: 3.0,
                    initial_guess: 2.0,
                },
                Problem {
                    target_value: 5.0,
                    initial_guess: 0.0,
                },
            ],
            solver: SolverParams::default(),
            plot,
        };

        let solutions = render_all(
            &params,
            &FilePrefix {
                directory_path: directory_path.clone(),
                file_base: "unused".to_owned(),
            },
        )
        .expect("render failed");
        assert_eq!(solutions.len(), 2);
        assert!(solutions[1].records.is_empty());

        for base in ["00_sqrt_3", "01_sqrt_5"] {
            let problem_directory = directory_path.join(base);
            for suffix in [".json", "_iterations.json", ".png", "_diagnostics.txt"] {
                let path = problem_directory.join(format!("{}{}", base, suffix));
                assert!(path.exists(), "missing output file: {:?}", path);
            }
            let image = image::open(problem_directory.join(format!("{}.png", base)))
                .expect("unable to read rendered png");
            assert_eq!((image.width(), image.height()), (160, 100));
        }

        let text = std::fs::read_to_string(directory_path.join("00_sqrt_3/00_sqrt_3_iterations.json"))
            .expect("unable to read iteration table");
        let solution: Solution = serde_json::from_str(&text).expect("unable to parse iteration table");
        assert_eq!(solution, solutions[0]);
    }
}
