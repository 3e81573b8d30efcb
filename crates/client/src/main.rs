use api_types::transaction::{Transaction, TransactionType};
use clap::Parser;

use cashbook_client::{
    AppError, Client, Result,
    aggregation::{self, CategoryBreakdown},
    config::{self, AppConfig, Args, Command},
    editor::{Editor, EditorError},
    sync::TransactionsSync,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = config::load(&args)?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!("cashbook_client={}", config.level))
        .init();

    let sync = TransactionsSync::new(Client::new(&config.base_url)?);
    run(&sync, &config, args.command).await
}

async fn run(sync: &TransactionsSync<Client>, config: &AppConfig, command: Command) -> Result<()> {
    match command {
        Command::List { kind } => {
            let txs = sync.transactions(kind).await?;
            if txs.is_empty() {
                println!("No transactions.");
            }
            for tx in &txs {
                print_transaction(tx);
            }
        }
        Command::Add {
            kind,
            amount,
            category,
            date,
            description,
        } => {
            let date = match date {
                Some(date) => date,
                None => chrono::Utc::now()
                    .with_timezone(&config.timezone()?)
                    .date_naive(),
            };

            let mut editor = Editor::new(kind);
            editor.set_amount(amount);
            editor.set_category(category);
            editor.set_description(description);
            editor.set_date(Some(date));

            let tx = submit(&mut editor, sync).await?;
            println!("Added {}", tx.id);
        }
        Command::Edit {
            id,
            amount,
            category,
            date,
            description,
        } => {
            let tx = sync
                .transactions(None)
                .await?
                .into_iter()
                .find(|tx| tx.id == id)
                .ok_or_else(|| AppError::InvalidArgument(format!("no transaction {id}")))?;

            let mut editor = Editor::new(tx.kind);
            editor.start_edit(tx)?;
            if let Some(amount) = amount {
                editor.set_amount(amount);
            }
            if let Some(category) = category {
                editor.set_category(category);
            }
            if let Some(description) = description {
                editor.set_description(description);
            }
            if let Some(date) = date {
                editor.set_date(Some(date));
            }

            let tx = submit(&mut editor, sync).await?;
            println!("Updated {}", tx.id);
        }
        Command::Delete { id } => {
            sync.delete(&id).await?;
            println!("Deleted {id}");
        }
        Command::Summary { kind } => {
            let txs = sync.transactions(Some(kind)).await?;
            print_summary(kind, &aggregation::breakdown(&txs)?);
        }
    }

    Ok(())
}

async fn submit(
    editor: &mut Editor,
    sync: &TransactionsSync<Client>,
) -> std::result::Result<Transaction, EditorError> {
    let result = editor.submit(sync).await;
    if let Err(EditorError::Invalid(errors)) = &result {
        for err in errors.iter() {
            eprintln!("  {:?}: {err}", err.field());
        }
    }
    result
}

fn print_transaction(tx: &Transaction) {
    println!(
        "{}  {}  {:<7}  {:>12}  {:<16}  {}",
        tx.id, tx.date, tx.kind, tx.amount, tx.category, tx.description
    );
}

fn print_summary(kind: TransactionType, breakdown: &CategoryBreakdown) {
    match breakdown {
        CategoryBreakdown::NoData => {
            println!("No {kind} data to display. Add some transactions first.");
        }
        CategoryBreakdown::Totals { categories, total } => {
            for category in categories {
                println!(
                    "{:<16}  {:>12}  {:>6}",
                    category.category,
                    category.total,
                    category.percentage_label()
                );
            }
            println!("{:<16}  {:>12}", "Total", total);
        }
    }
}
