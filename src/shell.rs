//! Terminal front end
//!
//! A line-oriented session over a [`Tracker`]. Each input line is one input
//! event (slider move, checkbox, text edit, button press); the session
//! parses it into a [`Command`], applies it through the tracker's
//! operations and renders the chart or calendar as plain text.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::tracker::calendar::{format_average, GRID_COLUMNS};
use crate::tracker::{
    parse_date, CalendarCell, ChartView, ChartWindow, DisplayMonth, DraftUpdate, Rating, Series,
    Symptom, Tracker, TrackerError, TrackerResult,
};

/// One input line; the first word names the command
#[derive(Parser, Debug)]
#[command(name = "tracker", multicall = true, disable_help_subcommand = true)]
#[command(help_template = "Commands:\n{subcommands}")]
struct CommandLine {
    #[command(subcommand)]
    command: Command,
}

/// One parsed input line
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Rate a symptom
    Set {
        #[arg(ignore_case = true)]
        symptom: Symptom,
        #[arg(value_parser = clap::value_parser!(u8).range(0..=10))]
        rating: u8,
    },

    /// Mark a bowel movement
    Stool {
        #[arg(ignore_case = true)]
        state: Switch,
    },

    /// Mark a period day
    Period {
        #[arg(ignore_case = true)]
        state: Switch,
    },

    /// One-line diary note
    Diary {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },

    /// Entry date (YYYY-MM-DD)
    Date {
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },

    /// Record the entry
    Submit,

    /// Chart window
    Window {
        #[arg(ignore_case = true)]
        window: ChartWindow,
    },

    /// Show or hide a chart line
    Toggle {
        #[arg(ignore_case = true)]
        series: Series,
    },

    /// Render the chart
    Chart,

    /// Render the calendar
    #[command(alias = "cal")]
    Calendar,

    /// Previous calendar month
    Prev,

    /// Next calendar month
    Next,

    /// Jump to a calendar month (YYYY-MM)
    Month {
        #[arg(value_parser = parse_month)]
        month: DisplayMonth,
    },

    /// Show the current entry
    Draft,

    /// Dump the full state as JSON
    State,

    /// List commands
    #[command(alias = "?")]
    Help,

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

/// Checkbox state
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    #[value(aliases = ["yes", "true", "1"])]
    On,
    #[value(aliases = ["no", "false", "0"])]
    Off,
}

impl From<Switch> for bool {
    fn from(switch: Switch) -> Self {
        switch == Switch::On
    }
}

fn parse_month(arg: &str) -> TrackerResult<DisplayMonth> {
    let invalid = || TrackerError::InvalidDate(arg.to_string());
    let (year, month) = arg.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    DisplayMonth::new(year, month)
}

impl FromStr for Command {
    type Err = clap::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        CommandLine::try_parse_from(line.split_whitespace()).map(|parsed| parsed.command)
    }
}

/// Whether the session keeps reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// An interactive tracker session
pub struct Session {
    tracker: Tracker,
    /// Fixed clock for reproducible output; `None` uses the system clock
    pinned_now: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(tracker: Tracker) -> Self {
        Self {
            tracker,
            pinned_now: None,
        }
    }

    /// Session whose "now" never moves
    pub fn pinned(tracker: Tracker, now: DateTime<Utc>) -> Self {
        Self {
            tracker,
            pinned_now: Some(now),
        }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    fn now(&self) -> DateTime<Utc> {
        self.pinned_now.unwrap_or_else(Utc::now)
    }

    /// Read commands until end of input or `quit`
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            match trimmed.parse::<Command>() {
                Ok(command) => {
                    if self.execute(command, out)? == Flow::Quit {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(line = trimmed, kind = ?e.kind(), "rejected input");
                    writeln!(out, "{}", e.to_string().trim_end())?;
                }
            }
        }
        out.flush()
    }

    /// Apply one command and render its result
    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> io::Result<Flow> {
        match command {
            Command::Set { symptom, rating } => {
                let rating = Rating::clamped(rating.into());
                self.tracker
                    .update_draft_field(DraftUpdate::Rating(symptom, rating));
                writeln!(out, "{} = {}", symptom, rating)?;
            }
            Command::Stool { state } => {
                let value = state.into();
                self.tracker.update_draft_field(DraftUpdate::Stool(value));
                writeln!(out, "stool = {}", on_off(value))?;
            }
            Command::Period { state } => {
                let value = state.into();
                self.tracker.update_draft_field(DraftUpdate::Period(value));
                writeln!(out, "period = {}", on_off(value))?;
            }
            Command::Diary { words } => {
                self.tracker
                    .update_draft_field(DraftUpdate::Diary(words.join(" ")));
            }
            Command::Date { date } => {
                self.tracker.update_draft_field(DraftUpdate::Date(date));
                writeln!(out, "date = {}", date)?;
            }
            Command::Submit => {
                let today = self.now().date_naive();
                let record = self.tracker.submit_entry_on(today);
                writeln!(
                    out,
                    "Recorded {}: average {}",
                    record.date,
                    format_average(record.average)
                )?;
            }
            Command::Window { window } => {
                self.tracker.set_chart_window(window);
                writeln!(out, "window = {}", window.label())?;
            }
            Command::Toggle { series } => {
                let visible = self.tracker.toggle_series_visibility(series);
                writeln!(
                    out,
                    "{} {}",
                    series,
                    if visible { "shown" } else { "hidden" }
                )?;
            }
            Command::Chart => {
                let view = self.tracker.chart_view_at(self.now());
                write_chart(out, &view)?;
            }
            Command::Calendar => self.write_calendar(out)?,
            Command::Prev => {
                self.tracker.navigate_month(-1);
                self.write_calendar(out)?;
            }
            Command::Next => {
                self.tracker.navigate_month(1);
                self.write_calendar(out)?;
            }
            Command::Month { month } => {
                self.tracker.set_month(month);
                self.write_calendar(out)?;
            }
            Command::Draft => self.write_draft(out)?,
            Command::State => {
                let json = serde_json::to_string_pretty(self.tracker.state())
                    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
                writeln!(out, "{}", json)?;
            }
            Command::Help => {
                let help = CommandLine::command().render_help();
                writeln!(out, "{}", help.to_string().trim_end())?;
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn write_draft(&self, out: &mut impl Write) -> io::Result<()> {
        let draft = self.tracker.draft();
        writeln!(out, "Entry for {}", draft.date)?;
        for symptom in Symptom::all() {
            writeln!(out, "  {:<9} {:>2}", symptom, draft.rating.get(*symptom))?;
        }
        writeln!(out, "  {:<9} {}", "stool", on_off(draft.rating.stool))?;
        writeln!(out, "  {:<9} {}", "period", on_off(draft.rating.period))?;
        writeln!(out, "  {:<9} {}", "diary", draft.diary)?;
        Ok(())
    }

    fn write_calendar(&self, out: &mut impl Write) -> io::Result<()> {
        let month = self.tracker.view().month;
        let cells = self.tracker.derive_calendar_cells();
        write_calendar(out, &month.title(), &self.tracker.weekday_labels(), &cells)
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

/// Render the chart view as a table, one column per visible series
pub fn write_chart(out: &mut impl Write, view: &ChartView) -> io::Result<()> {
    let (low, high) = view.y_domain;
    writeln!(
        out,
        "Symptoms over {} (from {}, scale {}-{})",
        view.window.label(),
        view.cutoff,
        format_average(low),
        format_average(high)
    )?;

    if view.is_empty() {
        writeln!(out, "No data for the selected window")?;
        return Ok(());
    }

    write!(out, "{:<10}", "Date")?;
    for line in &view.lines {
        write!(out, " | {:>8}", line.series)?;
    }
    writeln!(out)?;
    writeln!(out, "{}", "-".repeat(10 + view.lines.len() * 11))?;

    for (row, record) in view.records.iter().enumerate() {
        write!(out, "{:<10}", record.date)?;
        for line in &view.lines {
            let value = line.points.get(row).map(|p| p.value).unwrap_or_default();
            write!(out, " | {:>8}", format_average(value))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn cell_text(cell: &CalendarCell) -> String {
    let mut text = if cell.in_month {
        format!("{:>2}", cell.day())
    } else {
        format!("({})", cell.day())
    };
    if let Some(average) = cell.average_label() {
        text.push(' ');
        text.push_str(&average);
    }
    if cell.has_stool() {
        text.push('s');
    }
    if cell.has_period() {
        text.push('p');
    }
    text
}

/// Render the month grid, seven cells per row
pub fn write_calendar(
    out: &mut impl Write,
    title: &str,
    weekday_labels: &[&str; 7],
    cells: &[CalendarCell],
) -> io::Result<()> {
    writeln!(out, "{}", title)?;
    let header: Vec<String> = weekday_labels.iter().map(|l| format!("{:<9}", l)).collect();
    writeln!(out, "{}", header.join("").trim_end())?;

    for week in cells.chunks(GRID_COLUMNS) {
        let row: Vec<String> = week.iter().map(|c| format!("{:<9}", cell_text(c))).collect();
        writeln!(out, "{}", row.join("").trim_end())?;
    }

    let notes: Vec<String> = cells
        .iter()
        .filter(|c| c.in_month)
        .filter_map(|c| {
            let record = c.record.as_ref()?;
            (!record.diary.is_empty()).then(|| format!("  {}: {}", c.date, record.diary))
        })
        .collect();
    if !notes.is_empty() {
        writeln!(out, "Diary:")?;
        for note in notes {
            writeln!(out, "{}", note)?;
        }
    }
    writeln!(
        out,
        "Numbers after the day are the symptom average (0-10); s = stool, p = period."
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::TrackerOptions;
    use chrono::TimeZone;
    use clap::error::ErrorKind;

    fn session() -> Session {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        let tracker = Tracker::starting_on(TrackerOptions::default(), now.date_naive());
        Session::pinned(tracker, now)
    }

    fn run(session: &mut Session, script: &str) -> String {
        let mut out = Vec::new();
        session.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "set pain 7".parse::<Command>().unwrap(),
            Command::Set {
                symptom: Symptom::Pain,
                rating: 7
            }
        );
        assert_eq!(
            "diary  slept badly ".parse::<Command>().unwrap(),
            Command::Diary {
                words: vec!["slept".to_string(), "badly".to_string()]
            }
        );
        assert_eq!(
            "stool on".parse::<Command>().unwrap(),
            Command::Stool { state: Switch::On }
        );
        assert_eq!(
            "period No".parse::<Command>().unwrap(),
            Command::Period { state: Switch::Off }
        );
        assert_eq!(
            "toggle average".parse::<Command>().unwrap(),
            Command::Toggle {
                series: Series::Average
            }
        );
        assert_eq!(
            "window 1Y".parse::<Command>().unwrap(),
            Command::Window {
                window: ChartWindow::OneYear
            }
        );
        assert_eq!(
            "month 2023-12".parse::<Command>().unwrap(),
            Command::Month {
                month: DisplayMonth::new(2023, 12).unwrap()
            }
        );
        assert_eq!("cal".parse::<Command>().unwrap(), Command::Calendar);
        assert_eq!("?".parse::<Command>().unwrap(), Command::Help);
        assert_eq!("exit".parse::<Command>().unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_errors() {
        let kind = |line: &str| line.parse::<Command>().unwrap_err().kind();

        assert_eq!(kind("set pain 11"), ErrorKind::ValueValidation);
        assert_eq!(kind("set pain"), ErrorKind::MissingRequiredArgument);
        assert_eq!(kind("date tomorrow"), ErrorKind::ValueValidation);
        assert_eq!(kind("month 2024-13"), ErrorKind::ValueValidation);
        assert_eq!(kind("window forever"), ErrorKind::InvalidValue);
        assert_eq!(kind("toggle stool"), ErrorKind::InvalidValue);
        assert_eq!(kind("dance"), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn test_session_submit_and_chart() {
        let mut s = session();
        let output = run(
            &mut s,
            "set fatigue 4\nset pain 2\nset headache 6\nset heart 8\ndate 2024-03-10\nsubmit\nwindow 1week\ntoggle pain\nchart\n",
        );

        assert!(output.contains("Recorded 2024-03-10: average 5"));
        assert!(output.contains("Symptoms over 1 week (from 2024-03-08, scale 0-10)"));
        assert!(output.contains("2024-03-10"));
        assert!(!output.contains("|     pain"));
        assert_eq!(s.tracker().records().len(), 1);
        assert_eq!(s.tracker().draft().date.to_string(), "2024-03-15");
    }

    #[test]
    fn test_session_continues_after_error() {
        let mut s = session();
        let output = run(&mut s, "set pain 12\nbogus\nset pain 3\nquit\nset pain 9\n");

        assert!(output.contains("12 is not in 0..=10"));
        assert!(output.contains("'bogus'"));
        assert_eq!(s.tracker().draft().rating.pain.value(), 3);
    }

    #[test]
    fn test_session_calendar() {
        let mut s = session();
        let output = run(
            &mut s,
            "set heart 10\nstool on\ndiary racing\ndate 2024-03-10\nsubmit\ncalendar\nprev\n",
        );

        assert!(output.contains("March 2024"));
        assert!(output.contains("10 2.5s"));
        assert!(output.contains("2024-03-10: racing"));
        assert!(output.contains("February 2024"));
        assert_eq!(s.tracker().view().month, DisplayMonth::new(2024, 2).unwrap());
    }

    #[test]
    fn test_calendar_grid_has_six_weeks() {
        let s = session();
        let mut out = Vec::new();
        s.write_calendar(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        // title + header + six weeks + legend
        assert_eq!(text.lines().count(), 9);
        assert!(text.lines().nth(2).unwrap().starts_with("(25)"));
    }

    #[test]
    fn test_help_lists_commands() {
        let mut s = session();
        let output = run(&mut s, "help\n");
        for name in ["set", "submit", "window", "toggle", "calendar", "quit"] {
            assert!(output.contains(name), "missing {name}");
        }
        assert!(output.contains("Rate a symptom"));
    }

    #[test]
    fn test_state_dump_is_json() {
        let mut s = session();
        let output = run(&mut s, "submit\nstate\n");
        let json_start = output.find('{').unwrap();
        let value: serde_json::Value = serde_json::from_str(&output[json_start..]).unwrap();
        assert_eq!(value["records"].as_array().unwrap().len(), 1);
        assert_eq!(value["view"]["window"], "2weeks");
    }
}
