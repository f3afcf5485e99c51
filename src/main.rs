mod app;
mod calendar;
mod config;
mod dataset;
mod github;
mod help;
mod level;
mod loader;
mod logging;
mod mock;
mod source;
mod theme;
mod year;
use crate::app::App;
use crate::calendar::{ContributionGrid, HeatmapState};
use crate::config::Config;
use crate::github::GitHubClient;
use crate::loader::{Loader, RequestKey};
use crate::logging::LogTarget;
use crate::source::ContributionSource;
use crate::theme::LevelPalette;
use crate::year::CalendarYear;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use rand::{SeedableRng, rngs::StdRng};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use time::{Date, OffsetDateTime};
use tracing::{info, warn};

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        username: String,
        year: Option<CalendarYear>,
        seed: Option<u64>,
        offline: bool,
        json: bool,
        log_file: Option<PathBuf>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut username = None;
        let mut year = None;
        let mut seed = None;
        let mut offline = false;
        let mut json = false;
        let mut log_file = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('y') | Arg::Long("year") => year = Some(parser.value()?.parse()?),
                Arg::Long("seed") => seed = Some(parser.value()?.parse()?),
                Arg::Long("offline") => offline = true,
                Arg::Long("json") => json = true,
                Arg::Long("log-file") => log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if username.is_none() => username = Some(value.string()?),
                _ => return Err(arg.unexpected()),
            }
        }
        let Some(username) = username else {
            return Err("missing USERNAME argument".into());
        };
        Ok(Command::Run {
            username,
            year,
            seed,
            offline,
            json,
            log_file,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                username,
                year,
                seed,
                offline,
                json,
                log_file,
            } => {
                let target = match (log_file.as_deref(), json) {
                    (Some(path), _) => LogTarget::File(path),
                    (None, true) => LogTarget::Stderr,
                    (None, false) => LogTarget::Discard,
                };
                logging::init(target)?;
                let today = local_today();
                let year = match year {
                    Some(y) => y,
                    None => CalendarYear::of(today).context("current date is out of range")?,
                };
                let rng = match seed {
                    Some(n) => StdRng::seed_from_u64(n),
                    None => StdRng::from_entropy(),
                };
                let client = if offline {
                    None
                } else {
                    let client = GitHubClient::new(Config::from_env().token)
                        .context("failed to set up HTTP client")?;
                    if !client.has_token() {
                        info!(
                            var = config::TOKEN_VAR,
                            "no GitHub token set; sample data will be shown"
                        );
                    }
                    Some(client)
                };
                let mut source = ContributionSource::new(client, today, rng);
                if json {
                    let dataset = source.contributions(&username, year);
                    let grid = ContributionGrid::build(year, &dataset);
                    let out = serde_json::to_string_pretty(&grid)
                        .context("failed to serialize contribution grid")?;
                    println!("{out}");
                    Ok(())
                } else {
                    let heatmap = HeatmapState::new(today, RequestKey::new(username, year));
                    with_terminal(|mut terminal| {
                        terminal.hide_cursor().context("failed to hide cursor")?;
                        App::new(heatmap, Loader::spawn(source), LevelPalette).run(terminal)?;
                        Ok(())
                    })
                }
            }
            Command::Help => {
                println!("Usage: contribcal [<options>] <username>");
                println!();
                println!("Show a GitHub user's contributions as a yearly terminal heatmap");
                println!();
                println!("Options:");
                println!("  -y, --year <YEAR>   Show the given year [default: this year]");
                println!("      --seed <N>      Seed the sample data generator");
                println!("      --offline       Never contact GitHub; show sample data");
                println!("      --json          Print the calendar grid as JSON and exit");
                println!("      --log-file <PATH>");
                println!("                      Write log messages to the given file");
                println!("  -h, --help          Display this help message and exit");
                println!("  -V, --version       Show the program version and exit");
                println!();
                println!(
                    "Contributions are fetched with the token in ${}.",
                    config::TOKEN_VAR
                );
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn local_today() -> Date {
    match OffsetDateTime::now_local() {
        Ok(now) => now.date(),
        Err(e) => {
            warn!(error = %e, "could not determine local time zone; using UTC");
            OffsetDateTime::now_utc().date()
        }
    }
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_args(args.iter().copied()))
    }

    #[test]
    fn test_username_only() {
        assert_eq!(
            parse(&["octocat"]).unwrap(),
            Command::Run {
                username: String::from("octocat"),
                year: None,
                seed: None,
                offline: false,
                json: false,
                log_file: None,
            }
        );
    }

    #[test]
    fn test_all_options() {
        assert_eq!(
            parse(&[
                "--year",
                "2023",
                "--seed=42",
                "--offline",
                "--json",
                "--log-file",
                "cal.log",
                "octocat"
            ])
            .unwrap(),
            Command::Run {
                username: String::from("octocat"),
                year: Some(CalendarYear::new(2023).unwrap()),
                seed: Some(42),
                offline: true,
                json: true,
                log_file: Some(PathBuf::from("cal.log")),
            }
        );
    }

    #[test]
    fn test_short_year() {
        let Command::Run { year, .. } = parse(&["-y", "1999", "octocat"]).unwrap() else {
            panic!("expected Command::Run");
        };
        assert_eq!(year, Some(CalendarYear::new(1999).unwrap()));
    }

    #[test]
    fn test_bad_year() {
        assert!(parse(&["--year", "20x5", "octocat"]).is_err());
        assert!(parse(&["--year", "0", "octocat"]).is_err());
        assert!(parse(&["--year", "10000", "octocat"]).is_err());
    }

    #[test]
    fn test_missing_username() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["--offline"]).is_err());
    }

    #[test]
    fn test_extra_argument() {
        assert!(parse(&["octocat", "hubot"]).is_err());
    }

    #[test]
    fn test_help_wins() {
        assert_eq!(parse(&["octocat", "--help"]).unwrap(), Command::Help);
        assert_eq!(parse(&["-V"]).unwrap(), Command::Version);
    }
}
