use crate::error::*;
use std::convert::TryFrom;
use std::path::PathBuf;
use structopt::StructOpt;

const DUMP_FLAG: &str = "-m";

pub const SEED_VAR: &str = "KGRAMGEN_SEED";
pub const LOG_VAR: &str = "KGRAMGEN_LOG";

/// Exactly three positional arguments.
///
/// Help and version flags are disabled and leading hyphens are accepted, so
/// every token on the command line counts toward the three.
#[derive(Debug, StructOpt)]
#[structopt(
    name = "kgramgen",
    about = "Generates text from order-k character models of a training file",
    raw(setting = "structopt::clap::AppSettings::AllowLeadingHyphen"),
    raw(setting = "structopt::clap::AppSettings::DisableHelpFlags"),
    raw(setting = "structopt::clap::AppSettings::DisableVersion")
)]
pub struct Opts {
    #[structopt(
        name = "PATH",
        parse(from_os_str),
        help = "Text file to use as training data"
    )]
    pub path: PathBuf,

    #[structopt(
        name = "MAX_K",
        help = "Highest model order. Must be between 1 and the length of the text."
    )]
    pub max_k: String,

    #[structopt(
        name = "N|-m",
        help = "Number of characters to generate for every order from 1 to MAX_K \
                (at least MAX_K), or `-m` to print the transition table for MAX_K"
    )]
    pub length: String,
}

/// What to do with the order-`max_k` models once the input is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Generate { length: usize },
    Dump,
}

impl Opts {
    /// Validates `MAX_K` against the length of the training text.
    pub fn order(&self, text_len: usize) -> Result<usize> {
        let k = parse_integer(&self.max_k).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidOrder,
                format!("k value '{}' is out of range", self.max_k),
            )
        })?;

        if k < 1 {
            return Err(Error::new(
                ErrorKind::OrderTooSmall,
                "k value must be at least 1",
            ));
        }

        if k as u64 > text_len as u64 {
            return Err(Error::new(
                ErrorKind::OrderTooLarge,
                format!(
                    "k value ({}) is larger than text length ({})",
                    k, text_len
                ),
            ));
        }

        usize::try_from(k).context(
            ErrorKind::InvalidOrder,
            format!("k value '{}' is out of range", self.max_k),
        )
    }

    /// Validates the third argument against an already validated order.
    pub fn mode(&self, max_k: usize) -> Result<Mode> {
        if self.length == DUMP_FLAG {
            return Ok(Mode::Dump);
        }

        let not_numeric = || {
            Error::new(
                ErrorKind::InvalidLength,
                format!("n value '{}' is not numeric and is not '-m'", self.length),
            )
        };

        let n = parse_integer(&self.length).ok_or_else(not_numeric)?;
        if n < max_k as i64 {
            return Err(Error::new(
                ErrorKind::LengthTooSmall,
                format!("n value ({}) must be at least k ({})", n, max_k),
            ));
        }

        let length = usize::try_from(n).map_err(|_| not_numeric())?;
        Ok(Mode::Generate { length })
    }
}

/// Settings taken from the environment rather than the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Seed for the random source; the current time is used when unset.
    pub seed: Option<u64>,
    pub log_level: slog::Level,
}

impl Settings {
    pub fn from_env() -> Result<Settings> {
        let seed = std::env::var(SEED_VAR).ok();
        let level = std::env::var(LOG_VAR).ok();
        Settings::parse(
            seed.as_ref().map(String::as_str),
            level.as_ref().map(String::as_str),
        )
    }

    pub fn parse(seed: Option<&str>, log_level: Option<&str>) -> Result<Settings> {
        let seed = match seed {
            Some(raw) => Some(raw.trim().parse::<u64>().context(
                ErrorKind::Usage,
                format!("{} must be an unsigned integer, got '{}'", SEED_VAR, raw),
            )?),
            None => None,
        };

        let log_level = match log_level {
            Some(raw) => raw.trim().parse::<slog::Level>().map_err(|_| {
                Error::new(
                    ErrorKind::Usage,
                    format!(
                        "{} must be a log level such as 'info' or 'debug', got '{}'",
                        LOG_VAR, raw
                    ),
                )
            })?,
            None => slog::Level::Warning,
        };

        Ok(Settings { seed, log_level })
    }
}

/// Accepts an optional sign followed by one or more ASCII digits.
fn parse_integer(raw: &str) -> Option<i64> {
    let digits = match raw.as_bytes().first() {
        Some(b'+') | Some(b'-') => &raw[1..],
        _ => raw,
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    raw.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(max_k: &str, length: &str) -> Opts {
        Opts::from_iter_safe(&["kgramgen", "input.txt", max_k, length]).unwrap()
    }

    #[test]
    fn integers_allow_a_sign() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("+7"), Some(7));
        assert_eq!(parse_integer("-3"), Some(-3));
        assert_eq!(parse_integer("-"), None);
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer("4x"), None);
        assert_eq!(parse_integer(" 4"), None);
        assert_eq!(parse_integer("99999999999999999999"), None);
    }

    #[test]
    fn hyphenated_arguments_are_positional() {
        let parsed = opts("-2", "-m");

        assert_eq!(parsed.max_k, "-2");
        assert_eq!(parsed.length, "-m");
    }

    #[test]
    fn help_and_version_flags_are_positional() {
        for flag in &["-h", "--help", "-V", "--version", "-v", "--seed"] {
            let parsed = opts("2", flag);

            assert_eq!(parsed.length, *flag);
            assert_eq!(parsed.mode(2).unwrap_err().kind(), ErrorKind::InvalidLength);
        }
    }

    #[test]
    fn wrong_argument_count_is_rejected() {
        assert!(Opts::from_iter_safe(&["kgramgen"]).is_err());
        assert!(Opts::from_iter_safe(&["kgramgen", "in.txt", "2"]).is_err());
        assert!(Opts::from_iter_safe(&["kgramgen", "in.txt", "2", "5", "extra"]).is_err());
        assert!(Opts::from_iter_safe(&["kgramgen", "in.txt", "2", "5", "-v"]).is_err());
        assert!(Opts::from_iter_safe(&["kgramgen", "--help"]).is_err());
    }

    #[test]
    fn settings_default_when_unset() {
        let settings = Settings::parse(None, None).unwrap();

        assert_eq!(settings.seed, None);
        assert_eq!(settings.log_level, slog::Level::Warning);
    }

    #[test]
    fn settings_parse_values() {
        let settings = Settings::parse(Some("1234"), Some("debug")).unwrap();

        assert_eq!(settings.seed, Some(1234));
        assert_eq!(settings.log_level, slog::Level::Debug);
    }

    #[test]
    fn settings_reject_garbage() {
        assert_eq!(
            Settings::parse(Some("soon"), None).unwrap_err().kind(),
            ErrorKind::Usage
        );
        assert_eq!(
            Settings::parse(None, Some("loud")).unwrap_err().kind(),
            ErrorKind::Usage
        );
    }

    #[test]
    fn order_bounds() {
        assert_eq!(opts("abc", "5").order(10).unwrap_err().kind(), ErrorKind::InvalidOrder);
        assert_eq!(opts("0", "5").order(10).unwrap_err().kind(), ErrorKind::OrderTooSmall);
        assert_eq!(opts("-4", "5").order(10).unwrap_err().kind(), ErrorKind::OrderTooSmall);
        assert_eq!(opts("11", "5").order(10).unwrap_err().kind(), ErrorKind::OrderTooLarge);
        assert_eq!(opts("10", "10").order(10).unwrap(), 10);
        assert_eq!(opts("1", "1").order(1).unwrap(), 1);
    }

    #[test]
    fn mode_selection() {
        assert_eq!(opts("3", "-m").mode(3).unwrap(), Mode::Dump);
        assert_eq!(opts("3", "3").mode(3).unwrap(), Mode::Generate { length: 3 });
        assert_eq!(opts("3", "x").mode(3).unwrap_err().kind(), ErrorKind::InvalidLength);
        assert_eq!(opts("3", "-M").mode(3).unwrap_err().kind(), ErrorKind::InvalidLength);
        assert_eq!(opts("3", "2").mode(3).unwrap_err().kind(), ErrorKind::LengthTooSmall);
        assert_eq!(opts("3", "-9").mode(3).unwrap_err().kind(), ErrorKind::LengthTooSmall);
    }
}
