//! # `flakeid`
//!
//! Command-line front end for the `flakeid` crate.
//!
//! ```bash
//! flakeid generate -n 5
//! flakeid --node-bits 8 --node 42 generate --template "user-%z"
//! flakeid encode 2424242424242424242
//! flakeid decode 23953MG16DJDJ
//! flakeid inspect 23953MG16DJDJ
//! ```
//!
//! Generator settings may also be set through `SNOWFLAKEID_NODE`,
//! `SNOWFLAKEID_NODE_BITS` and `SNOWFLAKEID_EPOCH_MS`, including from a `.env`
//! file in the working directory.

mod commands;
mod config;
mod telemetry;

use std::io::{BufWriter, Write};

use clap::Parser;

use crate::{
    config::{CliArgs, CliConfig},
    telemetry::init_tracing,
};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let config = CliConfig::try_from(args)?;

    init_tracing();
    tracing::debug!(?config, "starting");

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    commands::run(&config, &mut out)?;
    out.flush()?;
    Ok(())
}
