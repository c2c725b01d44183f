use linkform::engine::RoundMetrics;
use linkform::{CombinationTrace, ParseResultVerbose, Reading};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

const MAX_LINKS_PER_ROUND: usize = 5;

pub fn print_run(res: &ParseResultVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    let input = res.result.ids.join(" ");
    println!(
        "\n{}",
        palette.bold(palette.paint(format!("⚙  Linking: \"{}\" ({})", input, res.result.locale), ansi::CYAN))
    );

    if !res.details.pseudo.is_empty() {
        println!("  {} {}", palette.paint("pseudo:", ansi::YELLOW), palette.dim(res.details.pseudo.join(", ")));
    }

    println!("\n{}", palette.paint("━━━ Combinations ━━━", ansi::GRAY));
    for (idx, trace) in res.details.combinations.iter().enumerate() {
        print_combination(idx, trace, &palette);
    }
    if res.details.truncated {
        println!(
            "  {}",
            palette.paint(
                format!("… stopped after {} combinations (--max-variants)", res.details.combinations.len()),
                ansi::YELLOW
            )
        );
    }

    println!("\n{}", palette.paint("━━━ Readings ━━━", ansi::GRAY));
    if res.result.readings.is_empty() {
        println!("{}", palette.dim("  No meaning formed"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • No rule matched an adjacent pair");
        println!("  • Every bound source was hidden in the first round");
        println!("  • A single word has nothing to link to");
        println!("\n{}", palette.dim("  Tip: Set LINKFORM_DEBUG_ROUNDS=1 to see every pair decision"));
    } else {
        for (idx, reading) in res.result.readings.iter().enumerate() {
            print_reading(idx, reading, &palette);
        }
    }

    let rounds: usize = res.details.combinations.iter().map(|c| c.metrics.rounds.len()).sum();
    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Combinations: {}  │  Rounds: {}",
        palette.paint(format!("{:?}", res.details.total), ansi::GREEN),
        palette.paint(res.details.combinations.len().to_string(), ansi::CYAN),
        palette.dim(rounds.to_string()),
    );
    println!();
}

fn print_combination(idx: usize, trace: &CombinationTrace, palette: &ansi::Palette) {
    let status = if trace.formed {
        palette.paint("✓ formed", ansi::GREEN)
    } else if trace.diverged {
        palette.paint("✗ round limit reached", ansi::YELLOW)
    } else {
        palette.dim("✗ no meaning")
    };
    println!(
        "  {} {} {} {}",
        palette.paint(format!("[{}]", idx), ansi::GRAY),
        palette.paint(&trace.signature, ansi::BLUE),
        palette.dim("│"),
        status
    );

    for round in &trace.metrics.rounds {
        print_round(round, palette);
    }
}

fn print_round(round: &RoundMetrics, palette: &ansi::Palette) {
    println!(
        "    {} {}  {} {}  {} {}",
        palette.paint(format!("Round {}:", round.round), ansi::BLUE),
        palette.dim(&round.signature),
        palette.dim("bound:"),
        palette.paint(format!("{}/{}", round.pairs_bound, round.pairs_evaluated), ansi::YELLOW),
        palette.dim("carried:"),
        palette.paint(round.carried.to_string(), ansi::YELLOW),
    );

    for link in round.links.iter().take(MAX_LINKS_PER_ROUND) {
        println!("      {}", palette.dim(link));
    }
    if round.links.len() > MAX_LINKS_PER_ROUND {
        println!("      {}", palette.dim(format!("... +{} more", round.links.len() - MAX_LINKS_PER_ROUND)));
    }
}

fn print_reading(idx: usize, reading: &Reading, palette: &ansi::Palette) {
    println!(
        "  {} {} {} {}",
        palette.paint(format!("[{}]", idx), ansi::GRAY),
        palette.bold(palette.paint(&reading.signature, ansi::GREEN)),
        palette.dim("│ base:"),
        palette.paint(reading.meaning.base().to_string(), ansi::CYAN),
    );
    for link in reading.meaning.siblings() {
        println!("      {} {}", palette.paint(link.to_string(), ansi::YELLOW), palette.dim(link.describe()));
    }
}
