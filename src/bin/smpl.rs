// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Command line front end for SMPL expressions

use std::process;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use smpl::{Environment, SmplEngine, TypeEnvironment, Value, ValueType, parse};

#[derive(Parser)]
#[command(name = "smpl")]
#[command(about = "Evaluate, type check and format SMPL expressions")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression
    Eval {
        /// Expression to evaluate
        #[arg(allow_hyphen_values = true)]
        expression: String,
        /// Variable binding, NAME=VALUE
        #[arg(long = "var", value_parser = parse_binding)]
        vars: Vec<(String, Value)>,
    },
    /// Infer the type of an expression
    Check {
        /// Expression to check
        #[arg(allow_hyphen_values = true)]
        expression: String,
        /// Variable declaration, NAME:TYPE
        #[arg(long = "var", value_parser = parse_declaration)]
        vars: Vec<(String, ValueType)>,
    },
    /// Print an expression in canonical fully parenthesized form
    Fmt {
        /// Expression to format
        #[arg(allow_hyphen_values = true)]
        expression: String,
    },
    /// Dump the syntax tree of an expression
    Parse {
        /// Expression to parse
        #[arg(allow_hyphen_values = true)]
        expression: String,
    },
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new().filter_level(level).init();

    if let Err(err) = run(cli.command) {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    let mut engine = SmplEngine::new();
    match command {
        Commands::Eval { expression, vars } => {
            let env: Environment = vars.into_iter().collect();
            let value = engine
                .evaluate(&expression, &env)
                .with_context(|| format!("evaluating '{expression}'"))?;
            println!("{value}");
        }
        Commands::Check { expression, vars } => {
            let env: TypeEnvironment = vars.into_iter().collect();
            let value_type = engine
                .check(&expression, &env)
                .with_context(|| format!("checking '{expression}'"))?;
            println!("{value_type}");
        }
        Commands::Fmt { expression } => {
            let text = engine
                .format(&expression)
                .with_context(|| format!("formatting '{expression}'"))?;
            println!("{text}");
        }
        Commands::Parse { expression } => {
            let exp = parse(&expression).with_context(|| format!("parsing '{expression}'"))?;
            log::debug!("{} node(s), depth {}", exp.node_count(), exp.depth());
            println!("{exp:#?}");
        }
    }
    Ok(())
}

fn parse_binding(arg: &str) -> anyhow::Result<(String, Value)> {
    let Some((name, value)) = arg.split_once('=') else {
        bail!("expected NAME=VALUE, got '{arg}'");
    };
    let value = value.parse::<Value>()?;
    Ok((name.trim().to_string(), value))
}

fn parse_declaration(arg: &str) -> anyhow::Result<(String, ValueType)> {
    let Some((name, value_type)) = arg.split_once(':') else {
        bail!("expected NAME:TYPE, got '{arg}'");
    };
    let value_type = value_type.trim().parse::<ValueType>()?;
    Ok((name.trim().to_string(), value_type))
}
