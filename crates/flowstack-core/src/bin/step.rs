// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Stack set step CLI
//!
//! Loads a persisted stack set, resolves the action that follows the given
//! one, and prints the result. Useful for replaying a call's flow offline.
//!
//! Usage:
//!
//! ```text
//! flowstack-step --stack-set <path> --stack <uuid> --action <uuid> [--no-release] [--output <path>]
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use flowstack_core::{
    Action, EngineConfig, IdGenerator, StackHandler, StackSet, validate_stack_set,
};

fn print_usage() {
    eprintln!(
        r#"Usage: flowstack-step [OPTIONS]

Resolve the next action of a persisted stack set.

OPTIONS:
    --stack-set <path>   Path to stack set JSON file (required)
    --stack <uuid>       Stack the current action ran in (required)
    --action <uuid>      Current action ID, or 00000000-0000-0000-0000-000000000001 to start (required)
    --no-release         Keep exhausted stacks instead of deleting them
    --output <path>      Write the resulting stack set to this path
    --help               Show this help message

ENVIRONMENT:
    FLOWSTACK_MAX_STACK_TRAVERSAL   Bound on stacks visited per resolution (default: 100)

EXAMPLES:
    # Start a call from the top of the main stack
    flowstack-step --stack-set call.json --stack 00000000-0000-0000-0000-000000000001 \
        --action 00000000-0000-0000-0000-000000000001

    # Advance and persist the updated stack set
    flowstack-step --stack-set call.json --stack <uuid> --action <uuid> --output call.json
"#
    );
}

#[derive(Debug)]
struct Args {
    stack_set_path: PathBuf,
    stack_id: Uuid,
    action_id: Uuid,
    release_stack: bool,
    output_path: Option<PathBuf>,
}

fn parse_uuid(flag: &str, value: &str) -> Result<Uuid, String> {
    Uuid::parse_str(value).map_err(|e| format!("Invalid {} '{}': {}", flag, value, e))
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = std::env::args().collect();
    parse_args_from_vec(&args)
}

fn parse_args_from_vec(args: &[String]) -> Result<Args, String> {
    let mut stack_set_path: Option<PathBuf> = None;
    let mut stack_id: Option<Uuid> = None;
    let mut action_id: Option<Uuid> = None;
    let mut release_stack = true;
    let mut output_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--stack-set" => {
                i += 1;
                let path = args.get(i).ok_or("--stack-set requires a path")?;
                stack_set_path = Some(PathBuf::from(path));
            }
            "--stack" => {
                i += 1;
                let value = args.get(i).ok_or("--stack requires an ID")?;
                stack_id = Some(parse_uuid("--stack", value)?);
            }
            "--action" => {
                i += 1;
                let value = args.get(i).ok_or("--action requires an ID")?;
                action_id = Some(parse_uuid("--action", value)?);
            }
            "--no-release" => {
                release_stack = false;
            }
            "--output" => {
                i += 1;
                let path = args.get(i).ok_or("--output requires a path")?;
                output_path = Some(PathBuf::from(path));
            }
            arg => {
                return Err(format!("Unknown argument: {}", arg));
            }
        }
        i += 1;
    }

    let stack_set_path = stack_set_path.ok_or("--stack-set is required")?;
    let stack_id = stack_id.ok_or("--stack is required")?;
    let action_id = action_id.ok_or("--action is required")?;

    Ok(Args {
        stack_set_path,
        stack_id,
        action_id,
        release_stack,
        output_path,
    })
}

fn load_stack_set(path: &Path) -> Result<StackSet> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Error reading stack set file {:?}", path))?;
    let set = serde_json::from_str(&raw).context("Error parsing stack set JSON")?;
    Ok(set)
}

/// JSON printed on stdout for a resolved step.
fn step_output(stack_id: Uuid, action: &Action) -> Value {
    json!({
        "stack_id": stack_id,
        "action": action,
    })
}

/// Load, resolve and optionally write back the stack set. Returns the stdout JSON.
fn step<G: IdGenerator>(handler: &StackHandler<G>, args: &Args) -> Result<Value> {
    let mut set = load_stack_set(&args.stack_set_path)?;

    let report = validate_stack_set(&set);
    for e in &report.errors {
        warn!(error = %e, "Stack set failed validation");
    }
    for w in &report.warnings {
        warn!(warning = %w, "Stack set validation warning");
    }

    // The engine only reads the id of the current action.
    let current = Action {
        id: args.action_id,
        ..Default::default()
    };
    let (stack_id, next) =
        handler.get_next_action(&mut set, args.stack_id, &current, args.release_stack);

    info!(
        stack_id = %stack_id,
        action_id = %next.id,
        action_type = %next.action_type,
        stacks = set.len(),
        "Resolved next action"
    );

    if let Some(output_path) = &args.output_path {
        let out = serde_json::to_string_pretty(&set)?;
        fs::write(output_path, out)
            .with_context(|| format!("Error writing stack set to {:?}", output_path))?;
    }

    Ok(step_output(stack_id, &next))
}

fn run(args: Args) -> Result<()> {
    let config = EngineConfig::from_env().context("Configuration error")?;
    let handler = StackHandler::new().with_config(config);

    let result = step(&handler, &args)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn main() -> ExitCode {
    // Load .env file (from crate directory or parent directories)
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "flowstack_core=info,flowstack_step=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowstack_core::{ActionType, Stack, stack};

    // Helper to create args vector from string slice
    fn args(a: &[&str]) -> Vec<String> {
        a.iter().map(|s| s.to_string()).collect()
    }

    const MAIN: &str = "00000000-0000-0000-0000-000000000001";
    const START: &str = "00000000-0000-0000-0000-000000000001";

    fn uid(n: u128) -> Uuid {
        Uuid::from_u128((0xa000_0000_u128 << 96) | n)
    }

    fn write_stack_set(dir: &Path, set: &StackSet) -> PathBuf {
        let path = dir.join("call.json");
        fs::write(&path, serde_json::to_string(set).unwrap()).unwrap();
        path
    }

    fn step_args(path: PathBuf, stack_id: Uuid, action_id: Uuid) -> Args {
        Args {
            stack_set_path: path,
            stack_id,
            action_id,
            release_stack: true,
            output_path: None,
        }
    }

    // ==========================================================================
    // parse_args_from_vec tests
    // ==========================================================================

    #[test]
    fn test_parse_full_args() {
        let result = parse_args_from_vec(&args(&[
            "flowstack-step",
            "--stack-set",
            "call.json",
            "--stack",
            MAIN,
            "--action",
            START,
            "--output",
            "out.json",
        ]))
        .unwrap();

        assert_eq!(result.stack_set_path, PathBuf::from("call.json"));
        assert_eq!(result.stack_id, stack::ID_MAIN);
        assert_eq!(result.action_id, flowstack_core::action::ID_START);
        assert!(result.release_stack);
        assert_eq!(result.output_path, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_parse_no_release() {
        let result = parse_args_from_vec(&args(&[
            "flowstack-step",
            "--no-release",
            "--stack-set",
            "call.json",
            "--stack",
            MAIN,
            "--action",
            START,
        ]))
        .unwrap();

        assert!(!result.release_stack);
        assert_eq!(result.output_path, None);
    }

    #[test]
    fn test_parse_missing_required() {
        let cases = [
            (
                vec!["flowstack-step", "--stack", MAIN, "--action", START],
                "--stack-set is required",
            ),
            (
                vec!["flowstack-step", "--stack-set", "call.json", "--action", START],
                "--stack is required",
            ),
            (
                vec!["flowstack-step", "--stack-set", "call.json", "--stack", MAIN],
                "--action is required",
            ),
        ];
        for (argv, expected) in cases {
            let err = parse_args_from_vec(&args(&argv)).unwrap_err();
            assert_eq!(err, expected);
        }
    }

    #[test]
    fn test_parse_flag_without_value() {
        let err = parse_args_from_vec(&args(&["flowstack-step", "--stack-set"])).unwrap_err();
        assert_eq!(err, "--stack-set requires a path");

        let err = parse_args_from_vec(&args(&["flowstack-step", "--action"])).unwrap_err();
        assert_eq!(err, "--action requires an ID");

        let err = parse_args_from_vec(&args(&["flowstack-step", "--output"])).unwrap_err();
        assert_eq!(err, "--output requires a path");
    }

    #[test]
    fn test_parse_invalid_uuid() {
        let err = parse_args_from_vec(&args(&[
            "flowstack-step",
            "--stack-set",
            "call.json",
            "--stack",
            "not-a-uuid",
            "--action",
            START,
        ]))
        .unwrap_err();
        assert!(err.starts_with("Invalid --stack 'not-a-uuid'"), "{}", err);

        let err = parse_args_from_vec(&args(&["flowstack-step", "--action", "42"])).unwrap_err();
        assert!(err.starts_with("Invalid --action '42'"), "{}", err);
    }

    #[test]
    fn test_parse_unknown_argument() {
        let err = parse_args_from_vec(&args(&["flowstack-step", "--verbose"])).unwrap_err();
        assert_eq!(err, "Unknown argument: --verbose");
    }

    // ==========================================================================
    // step tests
    // ==========================================================================

    #[test]
    fn test_step_output_shape() {
        let next = Action::new(uid(1), ActionType::Answer);
        let value = step_output(stack::ID_MAIN, &next);

        assert_eq!(value["stack_id"], MAIN);
        assert_eq!(value["action"]["id"], uid(1).to_string());
        assert_eq!(value["action"]["type"], "answer");
        assert_eq!(value.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_step_resolves_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let set = StackSet::new(vec![
            Action::new(uid(1), ActionType::Answer),
            Action::new(uid(2), ActionType::Hangup),
        ]);
        let path = write_stack_set(dir.path(), &set);

        let value = step(
            &StackHandler::new(),
            &step_args(path, stack::ID_MAIN, uid(1)),
        )
        .unwrap();

        assert_eq!(value["stack_id"], MAIN);
        assert_eq!(value["action"]["id"], uid(2).to_string());
        assert_eq!(value["action"]["type"], "hangup");
    }

    #[test]
    fn test_step_writes_released_stack_set() {
        let dir = tempfile::tempdir().unwrap();
        let handler = StackHandler::new();
        let mut set = StackSet::new(vec![
            Action::new(uid(1), ActionType::FetchFlow),
            Action::new(uid(2), ActionType::Hangup),
        ]);
        let sub = Stack {
            id: uid(50),
            actions: vec![Action::new(uid(10), ActionType::Play)],
            return_stack_id: stack::ID_MAIN,
            return_action_id: uid(1),
        };
        handler.insert_stack(&mut set, sub).unwrap();
        let path = write_stack_set(dir.path(), &set);
        let output = dir.path().join("out.json");

        let mut args = step_args(path.clone(), uid(50), uid(10));
        args.output_path = Some(output.clone());
        let value = step(&handler, &args).unwrap();

        assert_eq!(value["stack_id"], MAIN);
        assert_eq!(value["action"]["id"], uid(2).to_string());

        let written = load_stack_set(&output).unwrap();
        assert!(!written.contains(uid(50)));
        assert_eq!(written.len(), 1);
        // The input file is left untouched.
        assert!(load_stack_set(&path).unwrap().contains(uid(50)));
    }

    #[test]
    fn test_step_no_release_keeps_exhausted_stack() {
        let dir = tempfile::tempdir().unwrap();
        let handler = StackHandler::new();
        let mut set = StackSet::new(vec![Action::new(uid(1), ActionType::FetchFlow)]);
        let sub = Stack {
            id: uid(50),
            actions: vec![Action::new(uid(10), ActionType::Play)],
            return_stack_id: stack::ID_MAIN,
            return_action_id: uid(1),
        };
        handler.insert_stack(&mut set, sub).unwrap();
        let path = write_stack_set(dir.path(), &set);
        let output = dir.path().join("out.json");

        let mut args = step_args(path, uid(50), uid(10));
        args.release_stack = false;
        args.output_path = Some(output.clone());
        let value = step(&handler, &args).unwrap();

        assert_eq!(value["action"]["id"], flowstack_core::action::ID_FINISH.to_string());
        assert!(load_stack_set(&output).unwrap().contains(uid(50)));
    }

    #[test]
    fn test_step_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = step_args(dir.path().join("missing.json"), stack::ID_MAIN, uid(1));

        let err = step(&StackHandler::new(), &args).unwrap_err();
        assert!(format!("{:#}", err).contains("Error reading stack set file"));
    }

    #[test]
    fn test_step_invalid_json_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("call.json");
        fs::write(&path, "{not json").unwrap();

        let args = step_args(path, stack::ID_MAIN, uid(1));
        let err = step(&StackHandler::new(), &args).unwrap_err();
        assert!(format!("{:#}", err).contains("Error parsing stack set JSON"));
    }
}
