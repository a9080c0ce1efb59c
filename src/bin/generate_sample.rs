use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rust_xlsxwriter::Workbook;

/// Write a synthetic raw WFM export for demos and manual testing.
#[derive(Parser)]
#[command(name = "generate-sample")]
struct Args {
    #[arg(long, default_value = "sample_raw_report.xlsx")]
    output: PathBuf,
    #[arg(long, default_value_t = 12)]
    agents: u32,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const FIRST_NAMES: [&str; 8] = ["Camille", "Louis", "Inès", "Hugo", "Chloé", "Nathan", "Léa", "Yanis"];
const LAST_NAMES: [&str; 6] = ["Martin", "Bernard", "Dubois", "Moreau", "Laurent", "Girard"];

/// States an agent block draws from; some repeat on purpose.
const STATES: [&str; 14] = [
    "Pause",
    "Meeting",
    "Back Office",
    "Attente",
    "En attente",
    "Preview",
    "Numérotation",
    "Training",
    "Mailing",
    "Rappel",
    "OJT",
    "BUG IT",
    "Détachement",
    "Aucun contexte démarré",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform integer in `0..n`.
    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }
}

/// Durations come out either in the platform's `1h2'3` notation or as
/// `HH:MM:SS`, like real exports.
fn duration_text(rng: &mut SimpleRng, seconds: u64) -> String {
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if rng.below(3) == 0 {
        format!("{h:02}:{m:02}:{s:02}")
    } else {
        format!("{h}h{m}'{s}")
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    // Row 0 is left blank: the export has no usable header.
    let mut row: u32 = 1;
    let mut data_rows = 0;
    for _ in 0..args.agents {
        let id = 1000 + rng.below(9000);
        let name = format!(
            "Agent {id} - {} {}",
            rng.pick(&FIRST_NAMES),
            rng.pick(&LAST_NAMES)
        );
        let n_states = 4 + rng.below(6);

        for i in 0..n_states {
            if i == 0 {
                sheet.write_string(row, 0, name.as_str())?;
            }
            // Breaks are over-represented so repeated ones show up.
            let state = if rng.below(4) == 0 { "Pause" } else { rng.pick(&STATES) };
            let occurrences = rng.below(12);
            let total = occurrences * (5 + rng.below(150));

            sheet.write_string(row, 1, state)?;
            sheet.write_string(row, 2, format!("{}%", rng.below(100)))?;
            sheet.write_string(row, 3, "-")?;
            sheet.write_number(row, 4, occurrences as f64)?;
            sheet.write_string(row, 5, "-")?;
            sheet.write_string(row, 6, duration_text(&mut rng, total))?;
            if rng.below(5) == 0 {
                sheet.write_string(row, 8, "x")?;
            }
            row += 1;
            data_rows += 1;
        }
        // Blank spacer row between agent blocks.
        row += 1;
    }

    workbook
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    println!(
        "Wrote {data_rows} state rows for {} agents to {}",
        args.agents,
        args.output.display()
    );
    Ok(())
}
