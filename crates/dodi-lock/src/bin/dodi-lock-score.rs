// Copyright 2026 Boundless Foundation, Inc.
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

use std::path::PathBuf;

use alloy::providers::{Provider, ProviderBuilder};
use anyhow::{bail, Context, Result};
use clap::Parser;
use dodi_lock::{Snapshot, StrategyOptions};
use url::Url;

/// Compute dodi-lock voting power for a list of addresses.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// RPC URL of the chain hosting the voting power contract.
    #[clap(long, env = "RPC_URL")]
    rpc_url: Url,

    /// JSON file holding the strategy options.
    #[clap(long)]
    options: PathBuf,

    /// Block number to score at, or "latest".
    #[clap(long, default_value = "latest")]
    snapshot: Snapshot,

    /// Space the scores are computed for.
    #[clap(long, default_value = "")]
    space: String,

    /// File with one address per line, read in addition to positional addresses.
    #[clap(long)]
    addresses_file: Option<PathBuf>,

    /// Addresses to score.
    addresses: Vec<String>,

    /// Whether to log in JSON format.
    #[clap(long, env, default_value_t = false)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        .from_env_lossy();

    if args.log_json {
        tracing_subscriber::fmt()
            .with_ansi(false)
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    }

    let options_json = std::fs::read_to_string(&args.options)
        .with_context(|| format!("Failed to read options from {}", args.options.display()))?;
    let options = StrategyOptions::from_json(&options_json).context("Invalid strategy options")?;

    let mut addresses = args.addresses.clone();
    if let Some(path) = &args.addresses_file {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read addresses from {}", path.display()))?;
        addresses.extend(
            contents.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string),
        );
    }
    if addresses.is_empty() {
        bail!("No addresses given");
    }

    let provider = ProviderBuilder::new().connect_http(args.rpc_url.clone());
    let network = provider.get_chain_id().await.context("Failed to fetch chain ID")?;

    let scores =
        dodi_lock::strategy(&args.space, network, provider, &addresses, &options, args.snapshot)
            .await
            .context("Failed to compute voting power")?;

    println!("{}", serde_json::to_string_pretty(&scores)?);

    Ok(())
}
