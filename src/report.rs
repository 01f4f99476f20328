use crate::types::{Outcome, Tally, Verdict};
use colored::{ColoredString, Colorize};
use std::io::{self, Write};

const BANNER: &str = r#"  _______        _     ______             _
 |__   __|      | |   |  ____|           (_)
    | | ___  ___| |_  | |__   _ __   __ _ _ _ __   ___
    | |/ _ \/ __| __| |  __| | '_ \ / _` | | '_ \ / _ \
    | |  __/\__ \ |_  | |____| | | | (_| | | | | |  __/
    |_|\___||___/\__| |______|_| |_|\__, |_|_| |_|\___|
                                     __/ |
                                    |___/
"#;

const RULE: &str = "--------------------------------------------------";
const DOUBLE_RULE: &str = "==================================================";

/// Receives run events in order. Each hook may fail only on output errors.
pub trait Reporter {
    fn on_run_start(&mut self, suite: &str) -> io::Result<()>;

    fn on_discovery_complete(&mut self, method_count: usize) -> io::Result<()>;

    /// Called before the method is invoked.
    fn on_case_start(&mut self, method: &str, input: Option<&str>) -> io::Result<()>;

    fn on_case_complete(&mut self, outcome: &Outcome) -> io::Result<()>;

    fn on_run_complete(&mut self, tally: &Tally) -> io::Result<()>;
}

pub fn colored_tag(verdict: Verdict) -> ColoredString {
    match verdict {
        Verdict::Pass => verdict.tag().green(),
        Verdict::Fail => verdict.tag().red(),
        Verdict::Error => verdict.tag().yellow(),
    }
}

fn colored_count(verdict: Verdict, count: usize) -> ColoredString {
    let text = count.to_string();
    match verdict {
        Verdict::Pass => text.green(),
        Verdict::Fail => text.red(),
        Verdict::Error => text.yellow(),
    }
}

/// Plain console output, one line per case.
pub struct ConsoleReporter<W: Write> {
    out: W,
    banner: bool,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, banner: true }
    }

    pub fn without_banner(mut self) -> Self {
        self.banner = false;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn on_run_start(&mut self, suite: &str) -> io::Result<()> {
        if self.banner {
            write!(self.out, "{}", BANNER.cyan())?;
        }
        writeln!(self.out, "Loading test suite: {suite}")?;
        writeln!(self.out, "{RULE}")?;
        self.out.flush()
    }

    fn on_discovery_complete(&mut self, method_count: usize) -> io::Result<()> {
        writeln!(self.out, "Found {method_count} test methods. Starting execution...")?;
        writeln!(self.out)?;
        self.out.flush()
    }

    fn on_case_start(&mut self, method: &str, input: Option<&str>) -> io::Result<()> {
        write!(self.out, "Test [{method}]")?;
        if let Some(input) = input {
            write!(self.out, " with args ({input})")?;
        }
        write!(self.out, " ... ")?;
        self.out.flush()
    }

    fn on_case_complete(&mut self, outcome: &Outcome) -> io::Result<()> {
        writeln!(self.out, "{} {}", colored_tag(outcome.verdict()), outcome)?;
        self.out.flush()
    }

    fn on_run_complete(&mut self, tally: &Tally) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{DOUBLE_RULE}")?;
        writeln!(self.out, "                  TEST SUMMARY")?;
        writeln!(self.out, "{DOUBLE_RULE}")?;
        for (label, verdict) in [("PASS:  ", Verdict::Pass), ("FAIL:  ", Verdict::Fail), ("ERROR: ", Verdict::Error)] {
            writeln!(self.out, "{label}{}", colored_count(verdict, tally.get(verdict)))?;
        }
        writeln!(self.out, "TOTAL: {}", tally.total())?;
        writeln!(self.out, "{DOUBLE_RULE}")?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ErrorCause, Thrown};

    fn render(f: impl FnOnce(&mut ConsoleReporter<Vec<u8>>) -> io::Result<()>) -> String {
        colored::control::set_override(false);
        let mut reporter = ConsoleReporter::new(Vec::new()).without_banner();
        f(&mut reporter).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn case_line_with_args() {
        let text = render(|r| {
            r.on_case_start("square_fail", Some("3"))?;
            r.on_case_complete(&Outcome::Fail {
                expected: "10".into(),
                actual: "9".into(),
            })
        });
        assert_eq!(text, "Test [square_fail] with args (3) ... [FAIL] Expected: 10, Got: 9\n");
    }

    #[test]
    fn case_line_without_args() {
        let text = render(|r| {
            r.on_case_start("return_seven", None)?;
            r.on_case_complete(&Outcome::Pass { checked: true })
        });
        assert_eq!(text, "Test [return_seven] ... [PASS] OK\n");
    }

    #[test]
    fn error_line_names_thrown_type() {
        let text = render(|r| {
            r.on_case_start("boom", Some("some text"))?;
            r.on_case_complete(&Outcome::Error(ErrorCause::Target(Thrown {
                type_name: "RuntimeError".into(),
                message: "Something exploded!".into(),
            })))
        });
        assert!(text.ends_with("[ERROR] Exception: RuntimeError\n"));
    }

    #[test]
    fn summary_block() {
        let mut tally = Tally::default();
        tally.record(Verdict::Pass);
        tally.record(Verdict::Fail);
        tally.record(Verdict::Pass);
        let text = render(|r| r.on_run_complete(&tally));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2].trim(), "TEST SUMMARY");
        assert_eq!(lines[4], "PASS:  2");
        assert_eq!(lines[5], "FAIL:  1");
        assert_eq!(lines[6], "ERROR: 0");
        assert_eq!(lines[7], "TOTAL: 3");
    }

    #[test]
    fn run_header() {
        let text = render(|r| {
            r.on_run_start("demo::Suite")?;
            r.on_discovery_complete(4)
        });
        assert_eq!(
            text,
            format!("Loading test suite: demo::Suite\n{RULE}\nFound 4 test methods. Starting execution...\n\n")
        );
    }
}
