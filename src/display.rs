//! Renderers for the intersection
//!
//! `ConsoleRenderer` redraws an ASCII intersection on every phase change,
//! `LogRenderer` emits one log line per phase for headless runs.

use log::{info, warn};
use std::io::{self, Write};

use crate::simulation::{Light, Phase, Quadrant, Renderer, Snapshot};

const ROAD_EDGE: &str = "                             |         |         |";
const LANE_EDGE: &str = "                             |    |    |    |    |";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

fn light_letter(light: Light) -> char {
    match light {
        Light::Green => 'G',
        Light::Yellow => 'Y',
        Light::Red => 'R',
    }
}

/// Arrow drawn on a quadrant's lane when traffic flows through it
fn flow_arrow(quadrant: Quadrant) -> char {
    match quadrant {
        Quadrant::First => '>',
        Quadrant::Second => 'v',
        Quadrant::Third => '<',
        Quadrant::Fourth => '^',
    }
}

/// Arrows for every lane. Traffic moves on all lanes except the one
/// opposite the active quadrant.
fn arrows(active: Quadrant) -> [char; 4] {
    let blocked = active.next().next();
    Quadrant::ALL.map(|q| if q == blocked { ' ' } else { flow_arrow(q) })
}

/// Draws the intersection as ASCII art on a terminal or any writer
pub struct ConsoleRenderer<W> {
    out: W,
    clear: bool,
}

impl ConsoleRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: io::stdout(),
            clear: true,
        }
    }
}

impl<W: Write> ConsoleRenderer<W> {
    /// Render into `out` without terminal escape codes
    pub fn new(out: W) -> Self {
        Self { out, clear: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw_map(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        let l = Quadrant::ALL.map(|q| light_letter(snapshot.light(q)));
        let a = arrows(snapshot.active);
        let out = &mut self.out;

        for line in [ROAD_EDGE, LANE_EDGE, ROAD_EDGE, LANE_EDGE, ROAD_EDGE] {
            writeln!(out, "{line}")?;
        }
        writeln!(out, "                             |    |    4{}   |    |", l[3])?;
        writeln!(
            out,
            "------------------------------              {}    ------------------------------",
            a[3]
        )?;
        writeln!(out, "                                            {}", a[3])?;
        writeln!(
            out,
            "--  --  --  --  --  --  --  --{0}{0}{0}           {1}    --  --  --  --  --  --  --  --",
            a[2], a[3]
        )?;
        writeln!(out)?;
        writeln!(
            out,
            "----------------------------3{}                   1{}----------------------------",
            l[2], l[0]
        )?;
        writeln!(out)?;
        writeln!(
            out,
            "--  --  --  --  --  --  --  --    {0}           {1}{1}{1}--  --  --  --  --  --  --  --",
            a[1], a[0]
        )?;
        writeln!(out, "                                  {}", a[1])?;
        writeln!(
            out,
            "------------------------------    {}    2{}        ------------------------------",
            a[1], l[1]
        )?;
        for line in [LANE_EDGE, ROAD_EDGE, LANE_EDGE, ROAD_EDGE, LANE_EDGE, ROAD_EDGE] {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    fn draw_status(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        let out = &mut self.out;
        writeln!(
            out,
            "Current {} Light: {}\n",
            match snapshot.phase {
                Phase::Green => "Green",
                Phase::Yellow => "Yellow",
            },
            snapshot.active
        )?;

        for quadrant in Quadrant::ALL {
            let remaining = snapshot.remaining[quadrant].as_secs();
            let count = snapshot.counts[quadrant];
            let worker = snapshot.workers[quadrant].as_deref().unwrap_or("-");
            match snapshot.light(quadrant) {
                Light::Green => writeln!(
                    out,
                    "{quadrant}: [GREEN: {remaining} Seconds Remaining]\n  - (Vehicles on Go: {count})"
                )?,
                Light::Yellow => writeln!(
                    out,
                    "{quadrant}: [YELLOW: {remaining} Seconds Remaining]\n  - (Vehicles on Queue: {count})"
                )?,
                Light::Red => writeln!(
                    out,
                    "{quadrant}: RED: {remaining} Seconds Remaining\n  - (Vehicles on Queue: {count})"
                )?,
            }
            writeln!(out, "  - (Worker: {worker})\n")?;
        }
        Ok(())
    }

    /// Write one full frame
    pub fn draw(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        if self.clear {
            write!(self.out, "{CLEAR_SCREEN}")?;
        }
        self.draw_map(snapshot)?;
        self.draw_status(snapshot)?;
        self.out.flush()
    }
}

impl<W: Write + Send> Renderer for ConsoleRenderer<W> {
    fn render(&mut self, snapshot: &Snapshot) {
        if let Err(e) = self.draw(snapshot) {
            warn!("Failed to draw intersection: {}", e);
        }
    }
}

/// Logs each phase instead of drawing it
#[derive(Debug, Default)]
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn render(&mut self, snapshot: &Snapshot) {
        let queues: Vec<String> = snapshot
            .counts
            .iter()
            .map(|(q, count)| {
                format!(
                    "{}={} ({}s)",
                    q.label(),
                    count,
                    snapshot.remaining[q].as_secs()
                )
            })
            .collect();
        info!(
            "{} {} | queues: {}",
            snapshot.active,
            snapshot.phase,
            queues.join(", ")
        );
    }
}
