use anyhow::Result;

use pamyat::collector::coordinator::unique_union;
use pamyat::config::Config;
use pamyat::models::QueryType;
use pamyat::storage::IdLedger;

pub fn stats(config: Config) -> Result<()> {
    println!("Ledger statistics");
    println!("=================");

    let mut corpora = Vec::new();

    for query_type in QueryType::all() {
        let path = config.storage.ledger_path(query_type);

        if !path.exists() {
            println!("  ids by {}: no ledger at {}", query_type.noun(), path.display());
            continue;
        }

        let ledger = IdLedger::open(&path)?;
        let ids = ledger.all()?;
        let unique = ledger.unique_count()?;

        println!(
            "  ids by {}: {} appended, {} unique",
            query_type.noun(),
            ids.len(),
            unique
        );

        corpora.push(ids);
    }

    println!();
    println!("Total unique ids: {}", unique_union(corpora.iter()));

    Ok(())
}
