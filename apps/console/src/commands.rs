//! # Console Commands
//!
//! Parses one input line into a [`Command`] and runs it against the
//! [`SessionManager`].
//!
//! ```text
//! enter   <mall> <entry> <plate> <S|M|L>
//! exit    <plate>
//! status  <mall>
//! history <mall> <plate>
//! malls
//! help
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use mallpark_core::validation::validate_plate_number;
use mallpark_core::{EntryRequest, ExitReceipt, VehicleSize};
use mallpark_engine::SessionManager;

use crate::error::ApiError;

pub const USAGE: &str = "commands: enter <mall> <entry> <plate> <S|M|L> | exit <plate> | \
                         status <mall> | history <mall> <plate> | malls | help | quit";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Enter(EntryRequest),
    Exit { plate_number: String },
    Status { mall_id: String },
    History { mall_id: String, plate_number: String },
    Malls,
    Help,
    Quit,
}

impl Command {
    /// Parses a line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, ApiError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        let command = match words.as_slice() {
            ["enter", mall, entry, plate, size] => {
                let entry_index = entry
                    .parse::<usize>()
                    .map_err(|_| ApiError::validation(format!("entry must be a number, got '{}'", entry)))?;
                validate_plate_number(plate)?;
                let vehicle_size: VehicleSize = size.parse()?;
                Command::Enter(EntryRequest::new(*mall, entry_index, *plate, vehicle_size))
            }
            ["exit", plate] => {
                validate_plate_number(plate)?;
                Command::Exit {
                    plate_number: plate.to_string(),
                }
            }
            ["status", mall] => Command::Status {
                mall_id: mall.to_string(),
            },
            ["history", mall, plate] => Command::History {
                mall_id: mall.to_string(),
                plate_number: plate.to_string(),
            },
            ["malls"] => Command::Malls,
            ["help"] => Command::Help,
            ["exit"] => return Err(ApiError::validation("exit requires a plate number")),
            ["quit"] => Command::Quit,
            _ => return Err(ApiError::unknown_command(format!("cannot parse '{}'; {}", line, USAGE))),
        };

        Ok(Some(command))
    }
}

/// Exit output as the caller sees it.
#[derive(Debug, Serialize)]
struct ExitReply<'a> {
    session_id: &'a str,
    /// Formatted as "60.00".
    charge: String,
    charge_cents: i64,
    slot_id: &'a str,
    fixed_starting_rate: bool,
}

impl<'a> From<&'a ExitReceipt> for ExitReply<'a> {
    fn from(receipt: &'a ExitReceipt) -> Self {
        ExitReply {
            session_id: receipt.session_id(),
            charge: receipt.charge.to_string(),
            charge_cents: receipt.charge.cents(),
            slot_id: &receipt.session.slot_id,
            fixed_starting_rate: receipt.session.is_fixed_starting_rate,
        }
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::new(crate::error::ErrorCode::Internal, e.to_string()))
}

/// Runs a command at `now`. `Quit` is handled by the caller.
pub fn execute(manager: &SessionManager, command: Command, now: DateTime<Utc>) -> Result<Value, ApiError> {
    match command {
        Command::Enter(request) => to_value(&manager.enter_at(request, now)?),
        Command::Exit { plate_number } => {
            let receipt = manager.exit(&plate_number, now)?;
            to_value(&ExitReply::from(&receipt))
        }
        Command::Status { mall_id } => to_value(&manager.mall_snapshot(&mall_id)?),
        Command::History { mall_id, plate_number } => {
            to_value(&manager.vehicle_history(&mall_id, &plate_number)?)
        }
        Command::Malls => Ok(json!(manager.mall_ids())),
        Command::Help | Command::Quit => Ok(json!(USAGE)),
    }
}

/// Wraps a command result in the response envelope.
pub fn respond(result: Result<Value, ApiError>) -> Value {
    match result {
        Ok(data) => json!({ "ok": true, "data": data }),
        Err(error) => json!({ "ok": false, "error": error }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::{Duration, TimeZone};
    use mallpark_engine::ParkingConfig;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn run(manager: &SessionManager, line: &str, now: DateTime<Utc>) -> Value {
        let result = Command::parse(line).and_then(|cmd| match cmd {
            Some(cmd) => execute(manager, cmd, now),
            None => Ok(Value::Null),
        });
        respond(result)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("enter north 1 ABC123 m").unwrap(),
            Some(Command::Enter(EntryRequest::new("north", 1, "ABC123", VehicleSize::M)))
        );
        assert_eq!(
            Command::parse("  exit ABC123 ").unwrap(),
            Some(Command::Exit {
                plate_number: "ABC123".to_string()
            })
        );
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("# comment").unwrap(), None);
        assert_eq!(Command::parse("quit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Command::parse("park ABC").unwrap_err().code, ErrorCode::UnknownCommand);
        assert_eq!(
            Command::parse("enter north x ABC123 S").unwrap_err().code,
            ErrorCode::ValidationError
        );
        assert_eq!(
            Command::parse("enter north 0 ABC123 XL").unwrap_err().code,
            ErrorCode::ValidationError
        );
        assert_eq!(
            Command::parse("exit ABC#1").unwrap_err().code,
            ErrorCode::ValidationError
        );
    }

    #[test]
    fn test_bare_exit_does_not_quit() {
        let err = Command::parse("exit").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "exit requires a plate number");
        assert_eq!(Command::parse(" quit ").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn test_enter_exit_round() {
        let manager = SessionManager::from_config(ParkingConfig::sample()).unwrap();

        let reply = run(&manager, "enter north 2 ABC123 L", t0());
        assert_eq!(reply["ok"], true);
        assert_eq!(reply["data"]["slot_id"], "N-5");

        let reply = run(&manager, "enter north 2 ABC123 L", t0());
        assert_eq!(reply["ok"], false);
        assert_eq!(reply["error"]["code"], "VEHICLE_ALREADY_PARKED");

        let reply = run(&manager, "exit ABC123", t0() + Duration::hours(4));
        assert_eq!(reply["ok"], true);
        assert_eq!(reply["data"]["charge"], "140.00");
        assert_eq!(reply["data"]["charge_cents"], 14000);

        let reply = run(&manager, "history north ABC123", t0());
        assert_eq!(reply["data"].as_array().unwrap().len(), 1);

        let reply = run(&manager, "exit ABC123", t0() + Duration::hours(5));
        assert_eq!(reply["error"]["code"], "VEHICLE_NOT_PARKED");
    }

    #[test]
    fn test_status_and_malls() {
        let manager = SessionManager::from_config(ParkingConfig::sample()).unwrap();

        let reply = run(&manager, "malls", t0());
        assert_eq!(reply["data"], json!(["north", "south"]));

        let reply = run(&manager, "status south", t0());
        assert_eq!(reply["data"]["slots"].as_array().unwrap().len(), 3);

        let reply = run(&manager, "status west", t0());
        assert_eq!(reply["error"]["code"], "NOT_FOUND");
    }
}
