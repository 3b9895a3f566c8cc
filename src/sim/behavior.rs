//! Level scripts
//!
//! A level carries a list of one-line instructions that are re-read and run
//! top to bottom every frame:
//!
//! ```text
//! if <col> <row> == <value> > <then> > <else>
//! set <col> <row> <value>
//! open <door>
//! close <door>
//! jump <line>
//! continue
//! ```
//!
//! Nothing is cached between frames; scripts communicate only through the
//! tiles and door flags they change.

use thiserror::Error;

use super::entity::Entity;
use super::tile::{Tile, TileError, TileGrid};

/// Instructions executed per frame before the interpreter gives up
pub const MAX_BEHAVIOR_STEPS: usize = 1024;

const BRANCH_SEPARATOR: &str = " > ";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BehaviorError {
    #[error("invalid behavior token \"{0}\"")]
    UnknownToken(String),
    #[error("`{0}` is missing an operand")]
    MissingOperand(&'static str),
    #[error("expected a number, found \"{0}\"")]
    NotANumber(String),
    #[error("`if` has no branch to run")]
    MissingBranch,
    #[error(transparent)]
    Tile(#[from] TileError),
    #[error("cell ({col}, {row}) is outside the map")]
    OutOfBounds { col: i64, row: i64 },
    #[error("jump target must be a line number starting at 1")]
    BadJumpTarget,
}

/// Comparison operator of an `if`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison<'a> {
    Equals,
    /// Anything else never matches
    Other(&'a str),
}

/// One parsed line; `if` branches stay as text until they are taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction<'a> {
    If {
        col: i64,
        row: i64,
        comparison: Comparison<'a>,
        value: i64,
        then: &'a str,
        otherwise: Option<&'a str>,
    },
    Set {
        col: i64,
        row: i64,
        tile: Tile,
    },
    Open(&'a str),
    Close(&'a str),
    /// Zero-based index to resume at
    Jump(usize),
    Continue,
}

fn number(token: Option<&str>, op: &'static str) -> Result<i64, BehaviorError> {
    let token = token.ok_or(BehaviorError::MissingOperand(op))?;
    token
        .parse()
        .map_err(|_| BehaviorError::NotANumber(token.to_string()))
}

impl<'a> Instruction<'a> {
    pub fn parse(line: &'a str) -> Result<Self, BehaviorError> {
        let mut tokens = line.split_whitespace();
        let head = tokens.next().unwrap_or("");

        match head {
            "if" => {
                let mut parts = line.splitn(3, BRANCH_SEPARATOR);
                let mut cond = parts.next().unwrap_or("").split_whitespace().skip(1);
                let col = number(cond.next(), "if")?;
                let row = number(cond.next(), "if")?;
                let comparison = match cond.next() {
                    Some("==") => Comparison::Equals,
                    Some(other) => Comparison::Other(other),
                    None => return Err(BehaviorError::MissingOperand("if")),
                };
                let value = number(cond.next(), "if")?;
                let then = parts.next().ok_or(BehaviorError::MissingBranch)?;
                Ok(Instruction::If {
                    col,
                    row,
                    comparison,
                    value,
                    then,
                    otherwise: parts.next(),
                })
            }
            "set" => {
                let col = number(tokens.next(), "set")?;
                let row = number(tokens.next(), "set")?;
                let tile = Tile::try_from(number(tokens.next(), "set")?)?;
                Ok(Instruction::Set { col, row, tile })
            }
            "open" => tokens
                .next()
                .map(Instruction::Open)
                .ok_or(BehaviorError::MissingOperand("open")),
            "close" => tokens
                .next()
                .map(Instruction::Close)
                .ok_or(BehaviorError::MissingOperand("close")),
            "jump" => {
                let line_no = number(tokens.next(), "jump")?;
                if line_no < 1 {
                    return Err(BehaviorError::BadJumpTarget);
                }
                Ok(Instruction::Jump((line_no - 1) as usize))
            }
            "continue" => Ok(Instruction::Continue),
            other => Err(BehaviorError::UnknownToken(other.to_string())),
        }
    }
}

/// What the main loop does after an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next,
    Jump(usize),
}

/// Summary of one frame of script execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BehaviorReport {
    /// Top-level instructions executed
    pub steps: usize,
    /// (line index, error) for every aborted line
    pub errors: Vec<(usize, BehaviorError)>,
    /// Stopped at `MAX_BEHAVIOR_STEPS`
    pub truncated: bool,
}

/// Run a level script once against the current map and entities
pub fn run_frame(lines: &[String], grid: &mut TileGrid, entities: &mut [Entity]) -> BehaviorReport {
    let mut report = BehaviorReport::default();
    let mut pc = 0;

    while pc < lines.len() {
        if report.steps >= MAX_BEHAVIOR_STEPS {
            log::warn!("Behavior script exceeded {} steps this frame", MAX_BEHAVIOR_STEPS);
            report.truncated = true;
            break;
        }
        report.steps += 1;

        let line = lines[pc].as_str();
        match execute_line(line, grid, entities) {
            Ok(Flow::Jump(target)) => {
                pc = target;
                continue;
            }
            Ok(Flow::Next) => {}
            Err(err) => {
                log::error!("Behavior line {} \"{}\": {}", pc + 1, line, err);
                report.errors.push((pc, err));
            }
        }
        pc += 1;
    }

    report
}

fn execute_line(
    line: &str,
    grid: &mut TileGrid,
    entities: &mut [Entity],
) -> Result<Flow, BehaviorError> {
    match Instruction::parse(line)? {
        Instruction::If {
            col,
            row,
            comparison,
            value,
            then,
            otherwise,
        } => {
            let matched = match comparison {
                Comparison::Equals => grid.get(col, row).is_some_and(|t| t.code() == value),
                Comparison::Other(op) => {
                    log::warn!("Unsupported comparison \"{}\" treated as false", op);
                    false
                }
            };
            match (matched, otherwise) {
                (true, _) => execute_line(then, grid, entities),
                (false, Some(branch)) => execute_line(branch, grid, entities),
                (false, None) => Ok(Flow::Next),
            }
        }
        Instruction::Set { col, row, tile } => {
            if grid.set(col, row, tile) {
                Ok(Flow::Next)
            } else {
                Err(BehaviorError::OutOfBounds { col, row })
            }
        }
        Instruction::Open(tag) => {
            toggle_doors(entities, tag, true);
            Ok(Flow::Next)
        }
        Instruction::Close(tag) => {
            toggle_doors(entities, tag, false);
            Ok(Flow::Next)
        }
        Instruction::Jump(target) => Ok(Flow::Jump(target)),
        Instruction::Continue => Ok(Flow::Next),
    }
}

fn toggle_doors(entities: &mut [Entity], tag: &str, open: bool) {
    let mut matched = false;
    for door in entities.iter_mut().filter_map(Entity::as_door_mut) {
        if door.tag == tag {
            if open {
                door.opening = true;
            } else {
                door.closing = true;
            }
            matched = true;
        }
    }
    if !matched {
        log::debug!("No door tagged \"{}\"", tag);
    }
}
