//! Command-line parsing and dispatch for the `stepchain` binary.

use crate::error::{Error, Result};
use crate::node::{AddressReport, Node, ResolveReport, VerifyReport};
use serde::Serialize;

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Resolve {
        height: u64,
    },
    Addresses {
        height: u64,
    },
    Verify {
        height: u64,
        share: i64,
        pairs: Vec<(String, i64)>,
    },
    Help,
}

/// Result of running a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Resolve(ResolveReport),
    Addresses(AddressReport),
    Verify(VerifyReport),
}

impl Report {
    /// Check if the command achieved what was asked.
    pub fn is_success(&self) -> bool {
        match self {
            Report::Resolve(report) => matches!(report, ResolveReport::Resolved { .. }),
            Report::Addresses(report) => !report.addresses.is_empty(),
            Report::Verify(report) => report.sufficient,
        }
    }
}

pub fn print_usage() {
    eprintln!("stepchain - Resolve agreed step records and check payouts");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  stepchain resolve <height>                              Resolve the step for a height");
    eprintln!("  stepchain addresses <height>                            List expected payout addresses");
    eprintln!("  stepchain verify <height> <share> <address>=<amount>... Check a payout");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STEPCHAIN_DATA_DIR               Data directory (default: ./stepchain-data)");
    eprintln!("  STEPCHAIN_SEED_DIR               Shipped records (default: .)");
    eprintln!("  STEPCHAIN_SERIES                 Series file name (default: receiver.csv)");
    eprintln!("  STEPCHAIN_STEP                   Bucket width (default: 4000)");
    eprintln!("  STEPCHAIN_FETCH_TIMEOUT_SECS     Per-peer budget (default: 10)");
    eprintln!("  STEPCHAIN_PROTOCOL_TAG           Format sentinel tag (default: pluribusunum)");
    eprintln!("  STEPCHAIN_BOOTSTRAP_URL          Download address of the index-0 record");
    eprintln!("  STEPCHAIN_ACCEPT_INVALID_CERTS   Accept invalid TLS certificates (default: false)");
}

impl Command {
    /// Parse arguments, not including the program name.
    pub fn parse(args: &[String]) -> Result<Self> {
        let Some(name) = args.first() else {
            return Ok(Command::Help);
        };

        match name.as_str() {
            "resolve" => Ok(Command::Resolve {
                height: number(args, 1, "height")?,
            }),
            "addresses" => Ok(Command::Addresses {
                height: number(args, 1, "height")?,
            }),
            "verify" => {
                let height = number(args, 1, "height")?;
                let share = number(args, 2, "share")?;
                let pairs = args[3..]
                    .iter()
                    .map(|arg| pair(arg))
                    .collect::<Result<Vec<_>>>()?;
                if pairs.is_empty() {
                    return Err(Error::Usage(
                        "verify requires at least one <address>=<amount>".to_string(),
                    ));
                }
                Ok(Command::Verify { height, share, pairs })
            }
            "help" | "-h" | "--help" => Ok(Command::Help),
            other => Err(Error::Usage(format!("unknown command: {}", other))),
        }
    }
}

fn number<T: std::str::FromStr>(args: &[String], at: usize, what: &str) -> Result<T> {
    let raw = args
        .get(at)
        .ok_or_else(|| Error::Usage(format!("{} requires a {} argument", args[0], what)))?;
    raw.parse()
        .map_err(|_| Error::Usage(format!("invalid {}: {}", what, raw)))
}

fn pair(arg: &str) -> Result<(String, i64)> {
    let (address, amount) = arg
        .rsplit_once('=')
        .ok_or_else(|| Error::Usage(format!("expected <address>=<amount>, got {}", arg)))?;
    let address = address.trim();
    if address.is_empty() {
        return Err(Error::Usage(format!("missing address in {}", arg)));
    }
    let amount = amount
        .trim()
        .parse()
        .map_err(|_| Error::Usage(format!("invalid amount in {}", arg)))?;
    Ok((address.to_string(), amount))
}

/// Run `command` against `node`.
pub async fn run(node: &Node, command: Command) -> Result<Report> {
    match command {
        Command::Resolve { height } => Ok(Report::Resolve(node.resolve(height).await)),
        Command::Addresses { height } => Ok(Report::Addresses(node.addresses(height).await)),
        Command::Verify { height, share, pairs } => {
            Ok(Report::Verify(node.verify(height, share, &pairs).await))
        }
        Command::Help => Err(Error::Usage("help has no report".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse(&args("resolve 4200")).unwrap(), Command::Resolve { height: 4200 });
        assert_eq!(Command::parse(&args("addresses 7")).unwrap(), Command::Addresses { height: 7 });
        assert_eq!(
            Command::parse(&args("verify 10 300 A=100 B=200")).unwrap(),
            Command::Verify {
                height: 10,
                share: 300,
                pairs: vec![("A".to_string(), 100), ("B".to_string(), 200)],
            }
        );
        assert_eq!(Command::parse(&[]).unwrap(), Command::Help);
        assert_eq!(Command::parse(&args("--help")).unwrap(), Command::Help);
    }

    #[test]
    fn rejects_bad_arguments() {
        for line in [
            "resolve",
            "resolve tall",
            "resolve -1",
            "verify 10 300",
            "verify 10 300 A",
            "verify 10 300 =5",
            "verify 10 300 A=lots",
            "launch",
        ] {
            assert!(
                matches!(Command::parse(&args(line)), Err(Error::Usage(_))),
                "{} should be rejected",
                line
            );
        }
    }

    #[test]
    fn reports_serialize_with_status() {
        let report = Report::Resolve(ResolveReport::Partial {
            height: 35,
            target: 3,
            reached: 1,
            text: "x\n".to_string(),
        });
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "partial");
        assert_eq!(json["reached"], 1);
        assert!(!report.is_success());
    }
}
