//! seedcast CLI - score influencer lists and pick budgeted seed sets.
//!
//! # Usage
//!
//! ```bash
//! # Score a fixed influencer list (6 diffusion rounds, ceiling 1000)
//! seedcast evaluate --edges friendships.csv --costs costs.csv --influencers 3266,809,3892
//!
//! # Rank, select greedily under a budget, score, and write `{id1}_{id2}.csv`
//! seedcast select --edges friendships.csv --costs costs.csv --budget 1000 --ids 123 456
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use seedcast::{
    io, CampaignConfig, CandidateConfig, Evaluation, GreedyConfig, NodeId, SelectionGuard,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "seedcast")]
#[command(
    about = "Budgeted influencer selection under stochastic purchase diffusion",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Inputs {
    /// Friendship edge list (CSV with header, two node-id columns)
    #[arg(long)]
    edges: PathBuf,

    /// Cost table (CSV with `user` and `cost` columns)
    #[arg(long)]
    costs: PathBuf,

    /// Diffusion rounds before scoring
    #[arg(long, default_value = "6")]
    rounds: usize,

    /// Maximum total cost of the influencer list
    #[arg(long, default_value = "1000")]
    ceiling: f64,

    /// RNG seed
    #[arg(long, default_value = "42")]
    seed: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a fixed influencer list
    Evaluate {
        #[command(flatten)]
        inputs: Inputs,

        /// Comma-separated influencer ids
        #[arg(long, value_delimiter = ',', required = true)]
        influencers: Vec<NodeId>,
    },

    /// Select a seed set greedily and score it
    Select {
        #[command(flatten)]
        inputs: Inputs,

        /// Greedy selection budget
        #[arg(long, default_value = "1000")]
        budget: f64,

        /// Monte-Carlo trials per marginal-gain estimate
        #[arg(long, default_value = "50")]
        iterations: usize,

        /// Number of centrality-ranked candidates
        #[arg(long, default_value = "100")]
        top_n: usize,

        /// Skip candidates costing more than this
        #[arg(long, default_value = "300")]
        max_cost: f64,

        /// Stop after this many committed seeds
        #[arg(long)]
        max_rounds: Option<usize>,

        /// Stop selecting after this many seconds
        #[arg(long)]
        time_limit_secs: Option<u64>,

        /// Write `{FIRST}_{SECOND}.csv` with the selected seeds
        #[arg(long, num_args = 2, value_names = ["FIRST", "SECOND"])]
        ids: Option<Vec<String>>,

        /// Directory for the submission file
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).compact().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Evaluate { inputs, influencers } => cmd_evaluate(&inputs, &influencers),
        Commands::Select {
            inputs,
            budget,
            iterations,
            top_n,
            max_cost,
            max_rounds,
            time_limit_secs,
            ids,
            out_dir,
        } => {
            let mut config = campaign_config(&inputs);
            config.candidates = CandidateConfig { top_n, max_cost, ..CandidateConfig::default() };
            config.greedy = GreedyConfig {
                budget,
                iterations,
                guard: SelectionGuard {
                    max_rounds,
                    time_limit: time_limit_secs.map(Duration::from_secs),
                },
                ..GreedyConfig::default()
            };
            cmd_select(&inputs, &config, ids.as_deref(), &out_dir)
        }
    }
}

fn campaign_config(inputs: &Inputs) -> CampaignConfig {
    CampaignConfig {
        ceiling: inputs.ceiling,
        rounds: inputs.rounds,
        seed: inputs.seed,
        ..CampaignConfig::default()
    }
}

fn load(inputs: &Inputs) -> Result<(seedcast::SocialGraph, seedcast::CostTable)> {
    let graph = io::read_edge_list(&inputs.edges)
        .with_context(|| format!("reading edge list {}", inputs.edges.display()))?;
    let costs = io::read_cost_table(&inputs.costs)
        .with_context(|| format!("reading cost table {}", inputs.costs.display()))?;
    Ok((graph, costs))
}

/// Print the outcome; a ceiling violation is an expected stop, not a failure.
fn report(outcome: seedcast::Result<Evaluation>) -> Result<Option<Evaluation>> {
    match outcome {
        Ok(eval) => {
            println!("Influencers cost: {}", eval.cost);
            for (round, purchased) in eval.purchased_per_round.iter().enumerate().skip(1) {
                println!("finished round {round} ({purchased} purchased)");
            }
            println!("*************** Your final score is {} ***************", eval.score);
            Ok(Some(eval))
        }
        Err(seedcast::Error::BudgetExceeded { cost, ceiling }) => {
            println!("Influencers cost: {cost}");
            println!(
                "*************** Influencers are too expensive! (ceiling {ceiling}) ***************"
            );
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_evaluate(inputs: &Inputs, influencers: &[NodeId]) -> Result<()> {
    let (graph, costs) = load(inputs)?;
    let config = campaign_config(inputs);
    report(seedcast::evaluate(&graph, &costs, influencers, &config))?;
    Ok(())
}

fn cmd_select(
    inputs: &Inputs,
    config: &CampaignConfig,
    ids: Option<&[String]>,
    out_dir: &std::path::Path,
) -> Result<()> {
    let (graph, costs) = load(inputs)?;

    let plan = match seedcast::plan(&graph, &costs, config) {
        Ok(plan) => plan,
        Err(e @ seedcast::Error::BudgetExceeded { .. }) => {
            report(Err(e))?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let seeds = plan.selection.ids();
    println!("candidates: {}", plan.candidates.len());
    println!(
        "final influencers: {}",
        seeds.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",")
    );
    println!("spent: {} ({:?})", plan.selection.spent, plan.selection.termination);
    report(Ok(plan.evaluation))?;

    if let Some([first, second]) = ids {
        let path = io::write_submission(out_dir, first, second, &seeds)
            .with_context(|| format!("writing submission to {}", out_dir.display()))?;
        println!("wrote {}", path.display());
    }
    Ok(())
}
