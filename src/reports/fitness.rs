//! CTL / ATL / TSB snapshot.

use super::{Painter, NO_DATA};
use crate::metrics::analytics::Fitness;

/// The three fitness lines, shared with the week report footer.
pub fn fitness_lines(fitness: &Fitness, painter: &Painter) -> String {
    [
        format!("CTL: Chronic training load (42 day TSS average) ..... {}", fitness.ctl),
        format!("ATL: Acute training load (7 day TSS average) ........ {}", fitness.atl),
        format!("TSB: Training stress balance (CTL-ATL) .............. {}", fitness.tsb),
    ]
    .iter()
    .map(|line| format!("{}\n", painter.bold(line)))
    .collect()
}

/// Render today's fitness, or the empty-data message.
pub fn render_fitness(fitness: Option<Fitness>, painter: &Painter) -> String {
    match fitness {
        Some(fitness) => fitness_lines(&fitness, painter),
        None => format!("{}\n", NO_DATA),
    }
}
