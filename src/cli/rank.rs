//! Ranking commands (analyze, suggest, cycles, strategies)
//!
//! Batches come from a file, stdin (`-`), or the project's task store when no
//! file is given.

use anyhow::Result;
use chrono::{Local, NaiveDate};

use super::output::Output;
use crate::domain::{Batch, Cycles, DependencyGraph, IntakeError};
use crate::scoring::{Ranker, Ranking, Strategy};
use crate::storage::{BatchSource, Config, Project};

/// Options shared by the ranking commands
pub struct RankArgs<'a> {
    pub file: Option<&'a str>,
    pub strategy: Option<&'a str>,
    pub today: Option<NaiveDate>,
}

/// Loads the batch named on the command line, or the project's stored tasks
pub fn load_batch(output: &Output, file: Option<&str>) -> Result<Batch> {
    let batch = match file {
        Some(arg) => {
            let source = BatchSource::from_arg(arg);
            output.verbose_ctx("batch", &format!("Reading {:?} as {:?}", source, source.format()));
            Batch::from_inputs(source.read()?).inspect_err(|e| report_intake_error(output, e))?
        }
        None => {
            let project = Project::open_current()?;
            let store = project.task_store();
            output.verbose_ctx("batch", &format!("Reading task store: {}", store.path().display()));
            Batch::from_tasks(store.read_all()?)
        }
    };

    output.verbose_ctx("batch", &format!("Loaded {} tasks", batch.len()));
    for warning in batch.warnings() {
        output.warning(warning);
    }

    Ok(batch)
}

/// In JSON mode, lists the rejected records on stdout before the command fails
fn report_intake_error(output: &Output, error: &IntakeError) {
    if !output.is_json() {
        return;
    }
    match error {
        IntakeError::InvalidRecords(errors) => {
            output.data(&serde_json::json!({ "errors": errors }));
        }
    }
}

/// Picks the strategy from the flag, then the project config
fn resolve_strategy(output: &Output, config: &Config, flag: Option<&str>) -> Strategy {
    let Some(name) = flag else {
        return config.project.strategy();
    };
    match name.parse::<Strategy>() {
        Ok(strategy) => strategy,
        Err(e) => {
            output.verbose_ctx("strategy", &format!("{}; using {}", e, Strategy::default()));
            Strategy::default()
        }
    }
}

fn build_ranker(output: &Output, config: &Config, args: &RankArgs) -> Ranker {
    let strategy = resolve_strategy(output, config, args.strategy);
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    output.verbose_ctx(
        "rank",
        &format!("Strategy {}, reference date {}", strategy, today),
    );
    Ranker::new(strategy, today)
}

fn rank_batch<'a>(output: &Output, ranker: &Ranker, batch: &'a Batch) -> Result<Ranking<'a>> {
    let ranking = ranker.rank(batch.tasks())?;
    output.verbose_ctx(
        "rank",
        &format!(
            "Scored {} tasks, found {} cycles",
            ranking.len(),
            ranking.cycles.len()
        ),
    );
    Ok(ranking)
}

/// Score a batch and print every task, highest score first
pub fn analyze(output: &Output, config: &Config, args: RankArgs) -> Result<()> {
    let batch = load_batch(output, args.file)?;
    let ranker = build_ranker(output, config, &args);
    let ranking = rank_batch(output, &ranker, &batch)?;

    if output.is_json() {
        let sorted: Vec<_> = ranking
            .results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "id": r.task.id,
                    "title": r.task.title,
                    "score": r.score,
                    "priority": r.priority,
                    "explanation": r.explanation,
                    "circular_dependency": r.circular_dependency,
                    "task": r.task,
                })
            })
            .collect();
        output.data(&serde_json::json!({
            "sorted_tasks": sorted,
            "cycles": ranking.cycles,
        }));
        return Ok(());
    }

    if ranking.is_empty() {
        println!("No tasks to rank.");
        return Ok(());
    }

    println!(
        "Ranked tasks ({}), as of {}:",
        ranking.len(),
        ranker.today()
    );
    println!("{:<5} {:>8}  {:<8} {:<20} TITLE", "RANK", "SCORE", "PRIORITY", "ID");
    println!("{}", "-".repeat(80));
    for (i, result) in ranking.results.iter().enumerate() {
        let marker = if result.circular_dependency { " [cycle]" } else { "" };
        println!(
            "{:<5} {:>8.2}  {:<8} {:<20} {}{}",
            i + 1,
            result.score,
            result.priority,
            result.task.id,
            result.task.title,
            marker
        );
        println!("{:<26}{}", "", result.explanation);
    }

    print_cycles(&ranking.cycles);
    Ok(())
}

/// Show the top tasks to work on next
pub fn suggest(output: &Output, config: &Config, args: RankArgs, limit: Option<usize>) -> Result<()> {
    let batch = load_batch(output, args.file)?;
    let limit = limit.unwrap_or(config.project.suggest_limit);

    if batch.is_empty() {
        if output.is_json() {
            output.data(&serde_json::json!({
                "suggestions": [],
                "message": "no tasks found",
            }));
        } else {
            println!("No tasks found.");
        }
        return Ok(());
    }

    let ranker = build_ranker(output, config, &args);
    let ranking = rank_batch(output, &ranker, &batch)?;
    let top = ranking.top(limit);

    if output.is_json() {
        let suggestions: Vec<_> = top
            .iter()
            .map(|r| {
                serde_json::json!({
                    "id": r.task.id,
                    "title": r.task.title,
                    "score": r.score,
                    "priority": r.priority,
                    "why": r.explanation,
                })
            })
            .collect();
        output.data(&serde_json::json!({
            "suggestions": suggestions,
            "cycles": ranking.cycles,
        }));
        return Ok(());
    }

    println!("Suggested next ({} of {}):", top.len(), ranking.len());
    for (i, result) in top.iter().enumerate() {
        println!(
            "{}. {} - {} ({:.2}, {})",
            i + 1,
            result.task.id,
            result.task.title,
            result.score,
            result.priority
        );
        println!("   why: {}", result.explanation);
    }

    print_cycles(&ranking.cycles);
    Ok(())
}

/// Print only the dependency cycles of a batch
pub fn cycles(output: &Output, file: Option<&str>) -> Result<()> {
    let batch = load_batch(output, file)?;
    let cycles = DependencyGraph::from_tasks(batch.tasks()).find_cycles();
    output.verbose_ctx("cycles", &format!("Found {} cycles", cycles.len()));

    if output.is_json() {
        output.data(&serde_json::json!({ "cycles": cycles }));
    } else if cycles.is_empty() {
        println!("No circular dependencies.");
    } else {
        print_cycles(&cycles);
    }

    Ok(())
}

/// List the available strategies and their weights
pub fn strategies(output: &Output) -> Result<()> {
    if output.is_json() {
        let items: Vec<_> = Strategy::ALL
            .iter()
            .map(|s| {
                serde_json::json!({
                    "name": s.name(),
                    "description": s.description(),
                    "weights": s.weights(),
                })
            })
            .collect();
        output.data(&items);
        return Ok(());
    }

    println!(
        "{:<16} {:>8} {:>10} {:>7} {:>10}  DESCRIPTION",
        "NAME", "URGENCY", "IMPORTANCE", "EFFORT", "DEPENDENCY"
    );
    println!("{}", "-".repeat(100));
    for strategy in Strategy::ALL {
        let w = strategy.weights();
        println!(
            "{:<16} {:>8} {:>10} {:>7} {:>10}  {}",
            strategy.name(),
            w.urgency,
            w.importance,
            w.effort,
            w.dependency,
            strategy.description()
        );
    }

    Ok(())
}

fn print_cycles(cycles: &Cycles) {
    if cycles.is_empty() {
        return;
    }
    println!();
    println!("Circular dependencies ({}):", cycles.len());
    for cycle in cycles.iter() {
        println!("  {}", cycle.join(" -> "));
    }
}
