mod config;
mod executor;

use anyhow::Result;
use appdex::{FuzzyMatcher, Index, IndexConfig, Matcher, SubstringMatcher};
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Search query; all indexed entries are listed when omitted
    query: Option<String>,

    /// Launch the top match instead of printing results
    #[arg(short, long)]
    run: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = config::load_config()?;

    let matcher: Box<dyn Matcher + Send> = if config.search.fuzzy {
        Box::new(FuzzyMatcher::new())
    } else {
        Box::new(SubstringMatcher::new(config.search.case_sensitive))
    };

    let index = Index::new(
        matcher,
        IndexConfig {
            max_age: Duration::from_secs(config.index.index_age),
            sort: config.index.sort,
            ..IndexConfig::default()
        },
    );
    index.reindex();

    let entries = match &args.query {
        Some(query) => index.search(query),
        None => index.all_entries(),
    };

    if args.run {
        match entries.first() {
            Some(entry) => executor::execute(entry, &config)?,
            None => eprintln!("no match to launch"),
        }
        return Ok(());
    }

    for entry in &entries {
        println!("{}\t{}", entry.name, entry.exec);
    }

    Ok(())
}
