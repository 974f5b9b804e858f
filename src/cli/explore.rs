use pixels::{Pixels, SurfaceTexture};
use std::collections::HashSet;
use std::io::Write;
use std::time::{Duration, Instant};
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, MouseButton, MouseScrollDelta, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use crate::{
    core::{
        file_io::FilePrefix,
        render_window::{PlotWindow, RenderWindow},
        stopwatch::Stopwatch,
        view_control::{PanVelocityCommand, ScalarDirection, ZoomVelocityCommand},
    },
    newton::{
        params::{NewtonParams, Problem},
        problem_file_base,
        report::display_solution,
        solver::{solve, Solution},
        visualization::{build_plot_scene, fit_view, plot_title},
    },
};

const ZOOM_RATE: f64 = 0.8; // natural log of view size per second
const PAN_RATE: f64 = 0.4; // view widths per second
const SCROLL_ZOOM_PER_LINE: f64 = 0.9; // view scale per scroll-wheel notch
const PIXELS_PER_SCROLL_LINE: f64 = 40.0; // for touchpads that report pixel deltas
const ACTIVE_LOOP_TICK_MS: u64 = 10;

#[derive(Default)]
struct RawInputState {
    held_keys: HashSet<VirtualKeyCode>,
    pressed_keys_this_frame: HashSet<VirtualKeyCode>,
    left_button_held: bool,
    last_cursor_pixel: Option<[f64; 2]>,
    drag_delta_this_frame: [f64; 2],
    scroll_lines_this_frame: f64,
}

impl RawInputState {
    fn observe_window_event(&mut self, event: &WindowEvent, pixels: &Pixels) {
        match event {
            WindowEvent::KeyboardInput { input, .. } => {
                if let Some(keycode) = input.virtual_keycode {
                    match input.state {
                        ElementState::Pressed => {
                            self.held_keys.insert(keycode);
                            self.pressed_keys_this_frame.insert(keycode);
                        }
                        ElementState::Released => {
                            self.held_keys.remove(&keycode);
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let pixel = window_to_pixel(pixels, (position.x as f32, position.y as f32));
                if let (true, Some(previous)) = (self.left_button_held, self.last_cursor_pixel) {
                    self.drag_delta_this_frame[0] += pixel[0] - previous[0];
                    self.drag_delta_this_frame[1] += pixel[1] - previous[1];
                }
                self.last_cursor_pixel = Some(pixel);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.left_button_held = *state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_lines_this_frame += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y as f64,
                    MouseScrollDelta::PixelDelta(position) => position.y / PIXELS_PER_SCROLL_LINE,
                };
            }
            WindowEvent::CursorLeft { .. } => {
                self.last_cursor_pixel = None;
                self.left_button_held = false;
            }
            WindowEvent::Focused(false) => {
                self.held_keys.clear();
                self.pressed_keys_this_frame.clear();
                self.left_button_held = false;
            }
            _ => {}
        }
    }

    fn key_held(&self, key: VirtualKeyCode) -> bool {
        self.held_keys.contains(&key)
    }

    fn key_pressed_this_frame(&self, key: VirtualKeyCode) -> bool {
        self.pressed_keys_this_frame.contains(&key)
    }

    fn is_active(&self) -> bool {
        !self.held_keys.is_empty() || self.left_button_held
    }

    fn end_frame(&mut self) {
        self.pressed_keys_this_frame.clear();
        self.drag_delta_this_frame = [0.0, 0.0];
        self.scroll_lines_this_frame = 0.0;
    }
}

/// Window position to (fractional, unclamped) position in the pixel buffer.
fn window_to_pixel(pixels: &Pixels, position: (f32, f32)) -> [f64; 2] {
    match pixels.window_pos_to_pixel(position) {
        Ok((x, y)) => [x as f64, y as f64],
        Err((x, y)) => [x as f64, y as f64],
    }
}

fn pan_command_from_key_press(raw: &RawInputState) -> PanVelocityCommand {
    // Pan control:  arrow keys
    PanVelocityCommand {
        direction: [
            ScalarDirection::from_key_pair(
                raw.key_held(VirtualKeyCode::Left),
                raw.key_held(VirtualKeyCode::Right),
            ),
            ScalarDirection::from_key_pair(
                raw.key_held(VirtualKeyCode::Down),
                raw.key_held(VirtualKeyCode::Up),
            ),
        ],
        pan_rate: PAN_RATE,
    }
}

fn zoom_command_from_key_press(raw: &RawInputState) -> ZoomVelocityCommand {
    // Zoom control:  W (in) and S (out)
    ZoomVelocityCommand {
        zoom_direction: ScalarDirection::from_key_pair(
            raw.key_held(VirtualKeyCode::S),
            raw.key_held(VirtualKeyCode::W),
        ),
        zoom_rate: ZOOM_RATE,
    }
}

/// Window title: the plot title plus a readout of the point under the cursor.
fn window_title(base_title: &str, window: &PlotWindow, raw: &RawInputState) -> String {
    match raw.last_cursor_pixel {
        Some(pixel) => {
            let point = window.point_at_pixel(pixel);
            format!("{}  |  x = {:.5}, y = {:.5}", base_title, point[0], point[1])
        }
        None => base_title.to_owned(),
    }
}

/// Tracks which problem of a parameter set is on screen. The explorer steps
/// through the problems with N (next) and P (previous), wrapping at the ends.
#[derive(Debug)]
pub struct ProblemBrowser {
    params: NewtonParams,
    index: usize,
}

impl ProblemBrowser {
    pub fn new(params: NewtonParams, index: usize) -> Result<Self, String> {
        if index >= params.problems.len() {
            return Err(format!(
                "problem index {} is out of range ({} problem(s) in file)",
                index,
                params.problems.len()
            ));
        }
        Ok(Self { params, index })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn problem(&self) -> &Problem {
        &self.params.problems[self.index]
    }

    /// @return: true iff a different problem is now selected.
    pub fn step(&mut self, direction: ScalarDirection) -> bool {
        let count = self.params.problems.len();
        let next = match direction {
            ScalarDirection::Pos => (self.index + 1) % count,
            ScalarDirection::Neg => (self.index + count - 1) % count,
            ScalarDirection::Zero => self.index,
        };
        let changed = next != self.index;
        self.index = next;
        changed
    }

    /// Solves the selected problem, writes its progress table to `writer`, and
    /// builds a window onto its plot. Snapshots are named after the problem.
    pub fn open_window<W: Write>(
        &self,
        writer: &mut W,
        time: f64,
        file_prefix: &FilePrefix,
    ) -> std::io::Result<(String, PlotWindow)> {
        let problem = self.problem();
        let solution: Solution =
            solve(problem.target_value, problem.initial_guess, &self.params.solver);
        display_solution(writer, problem, &solution)?;

        let scene = build_plot_scene(problem, &solution, &self.params.plot);
        let image_specification = fit_view(&scene, &self.params.plot);
        let problem_prefix = FilePrefix {
            directory_path: file_prefix.directory_path.clone(),
            file_base: problem_file_base(self.index, problem),
        };
        Ok((
            plot_title(problem, &solution),
            PlotWindow::new(time, scene, &image_specification, problem_prefix),
        ))
    }
}

fn problem_step_from_key_press(raw: &RawInputState) -> ScalarDirection {
    // Problem selection:  P (previous) and N (next)
    ScalarDirection::from_key_pair(
        raw.key_pressed_this_frame(VirtualKeyCode::P),
        raw.key_pressed_this_frame(VirtualKeyCode::N),
    )
}

/**
 * Opens a window onto the plot of one problem, printing its table first.
 * Supported features:
 * -- left-click and drag to pan
 * -- scroll wheel to zoom about the cursor
 * -- arrow keys for pan control, W/S keys for zoom control
 * -- N/P to switch to the next/previous problem
 * -- R to reset the view, Space to save a snapshot, Escape to exit
 */
pub fn explore_newton_problems(
    params: NewtonParams,
    problem_index: usize,
    file_prefix: FilePrefix,
) -> Result<(), Box<dyn std::error::Error>> {
    let browser = ProblemBrowser::new(params, problem_index)?;
    explore(browser, file_prefix)
}

/// Runs the GUI event loop. Does not return unless window setup fails.
pub fn explore(
    mut browser: ProblemBrowser,
    file_prefix: FilePrefix,
) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new();
    let mut raw_input = RawInputState::default();
    let stopwatch = Stopwatch::new("Newton-Raphson Explorer".to_owned());

    let (mut title, mut render_window) =
        browser.open_window(&mut std::io::stdout().lock(), 0.0, &file_prefix)?;
    println!("INFO:  {}", title);

    let window = {
        let resolution = render_window.image_specification().resolution;
        let logical_size = LogicalSize::new(resolution[0] as f64, resolution[1] as f64);
        WindowBuilder::new()
            .with_title(&title)
            .with_inner_size(logical_size)
            .with_min_inner_size(logical_size)
            .build(&event_loop)?
    };

    let mut pixels = {
        let window_size = window.inner_size();
        let resolution = render_window.image_specification().resolution;
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
        Pixels::new(resolution[0], resolution[1], surface_texture)?
    };

    // GUI application main loop:
    event_loop.run(move |event, _, control_flow| {
        *control_flow = if raw_input.is_active() || render_window.redraw_required() {
            ControlFlow::WaitUntil(Instant::now() + Duration::from_millis(ACTIVE_LOOP_TICK_MS))
        } else {
            ControlFlow::Wait
        };

        if let Event::WindowEvent { event, .. } = &event {
            raw_input.observe_window_event(event, &pixels);

            match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                    return;
                }
                WindowEvent::Resized(size) => {
                    if pixels.resize_surface(size.width, size.height).is_err() {
                        println!("ERROR:  unable to resize surface. Aborting.");
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                    window.request_redraw();
                }
                WindowEvent::CursorMoved { .. } | WindowEvent::CursorLeft { .. } => {
                    window.set_title(&window_title(&title, &render_window, &raw_input));
                }
                _ => {}
            }
        }

        if let Event::RedrawRequested(_) = event {
            render_window.draw(pixels.frame_mut());
            if pixels.render().is_err() {
                println!("ERROR:  unable to render pixels. Aborting.");
                *control_flow = ControlFlow::Exit;
                return;
            }
        }

        if let Event::MainEventsCleared = event {
            if raw_input.key_pressed_this_frame(VirtualKeyCode::Escape) {
                *control_flow = ControlFlow::Exit;
                return;
            }

            let mut view_changed = false;

            if browser.step(problem_step_from_key_press(&raw_input)) {
                let time = stopwatch.total_elapsed_seconds();
                match browser.open_window(&mut std::io::stdout().lock(), time, &file_prefix) {
                    Ok((new_title, new_window)) => {
                        println!("INFO:  {}", new_title);
                        title = new_title;
                        render_window = new_window;
                        view_changed = true;
                    }
                    Err(err) => {
                        eprintln!("ERROR:  unable to switch problems: {}", err);
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                }
            }

            if raw_input.key_pressed_this_frame(VirtualKeyCode::R) {
                render_window.reset();
                view_changed = true;
            }

            view_changed |= render_window.drag(raw_input.drag_delta_this_frame);

            if raw_input.scroll_lines_this_frame != 0.0 {
                if let Some(pixel) = raw_input.last_cursor_pixel {
                    let scale = SCROLL_ZOOM_PER_LINE.powf(raw_input.scroll_lines_this_frame);
                    view_changed |= render_window.zoom_about_pixel(pixel, scale);
                }
            }

            view_changed |= render_window.update(
                stopwatch.total_elapsed_seconds(),
                &pan_command_from_key_press(&raw_input),
                &zoom_command_from_key_press(&raw_input),
            );

            // The hover readout depends on the view, not only on the cursor.
            if view_changed {
                window.set_title(&window_title(&title, &render_window, &raw_input));
            }

            if render_window.redraw_required() {
                window.request_redraw();
            }

            if raw_input.key_pressed_this_frame(VirtualKeyCode::Space) {
                render_window.render_to_file();
            }

            raw_input.end_frame();
        }
    });
}
