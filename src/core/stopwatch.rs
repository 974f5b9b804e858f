use std::{
    io::{self, Write},
    time::{Duration, Instant},
};

/// A named interval recorded by the `Stopwatch`.
pub struct Split {
    pub name: String,
    pub duration: Duration,
}

/// Wall-clock timer for the render pipeline. Splits are written to the
/// diagnostics file alongside each rendered plot.
pub struct Stopwatch {
    pub name: String,
    splits: Vec<Split>,
    start_total: Instant,
    start_split: Instant,
}

impl Stopwatch {
    pub fn new(name: String) -> Stopwatch {
        let now = Instant::now();
        Stopwatch {
            name,
            splits: Vec::default(),
            start_total: now,
            start_split: now,
        }
    }

    pub fn total_elapsed(&self) -> Duration {
        self.start_total.elapsed()
    }

    pub fn total_elapsed_seconds(&self) -> f64 {
        self.total_elapsed().as_secs_f64()
    }

    pub fn record_split(&mut self, name: String) -> Duration {
        let duration = self.start_split.elapsed();
        self.start_split = Instant::now();
        self.splits.push(Split { name, duration });
        duration
    }

    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    pub fn display<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(
            writer,
            "Stopwatch: {};  Total elapsed duration: {:?}",
            self.name,
            self.total_elapsed()
        )?;
        for split in self.splits.iter() {
            writeln!(writer, "  {}: {:?}", split.name, split.duration)?;
        }
        Ok(())
    }
}
