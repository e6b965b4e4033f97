use build_sim::compare::compare_builds_with;
use build_sim::config::{self, Command, FormatArg};
use build_sim::engine::run_survival_loop_detailed;
use build_sim::error::Result;
use build_sim::monte_carlo::run_monte_carlo_with;
use build_sim::output::{Formatter, HumanFormatter, JsonFormatter, SummaryFormatter};
use build_sim::stats::SimulationContext;
use build_sim::validation::build_report;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = config::parse_args()?;

    let output = match cli.command {
        Command::Simulate(args) => {
            let config = config::build_config(&args)?;
            let table = config::load_skill_table(config.skill_table.as_deref())?;
            let mut rng = config::seeded_rng(config.seed);
            let ctx = if config.random_factor {
                SimulationContext::with_random_factor(&table, &mut rng)
            } else {
                SimulationContext::new(&table)
            };
            let run = run_survival_loop_detailed(
                &config.character,
                &ctx,
                config.food.as_ref(),
                config.max_ticks,
                &mut rng,
            );
            formatter_for(args.shared.format).single_run(&run)
        }
        Command::MonteCarlo(args) => {
            let config = config::build_config(&args)?;
            let table = config::load_skill_table(config.skill_table.as_deref())?;
            let stats = run_monte_carlo_with(
                &config.character,
                config.food.as_ref(),
                &table,
                &config::monte_carlo_options(&config),
            );
            formatter_for(args.shared.format).monte_carlo(&stats)
        }
        Command::Compare(args) => {
            let config = config::build_shared_config(&args.shared)?;
            let build_a = config::load_build(&args.build_a)?;
            let build_b = config::load_build(&args.build_b)?;
            let table = config::load_skill_table(config.skill_table.as_deref())?;
            let result = compare_builds_with(
                &build_a,
                &build_b,
                config.food.as_ref(),
                &table,
                &config::monte_carlo_options(&config),
            );
            formatter_for(args.shared.format).comparison(&result)
        }
        Command::ShowBuild(args) => {
            let config = config::build_config(&args)?;
            let table = config::load_skill_table(config.skill_table.as_deref())?;
            let ctx = SimulationContext::new(&table);
            let report = build_report(&config.character, &ctx);
            formatter_for(args.shared.format).build(&report)
        }
        Command::ListSkills(args) => {
            let table = config::load_skill_table(args.skill_table.as_deref())?;
            formatter_for(args.format).skills(&table)
        }
    };

    print!("{}", output);
    Ok(())
}

fn formatter_for(format: FormatArg) -> Box<dyn Formatter> {
    match format {
        FormatArg::Human => Box::new(HumanFormatter),
        FormatArg::Summary => Box::new(SummaryFormatter),
        FormatArg::Json => Box::new(JsonFormatter),
    }
}
