// ==========================================
// Translator Docs - command line entry point
// ==========================================

use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;
use translator_docs::app::{get_default_db_path, AppState};
use translator_docs::cli::{Args, Command};
use translator_docs::domain::NewTranslator;
use translator_docs::logging;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.json_logs {
        logging::init_json();
    } else {
        logging::init();
    }

    let db_path = args.db.clone().unwrap_or_else(get_default_db_path);
    tracing::info!(version = translator_docs::VERSION, db_path = %db_path, "translator-docs starting");

    let state = AppState::new(db_path.clone())
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("cannot initialize database at {}", db_path))?;

    match args.command {
        Command::InitDb => {
            println!("database ready: {}", state.db_path);
        }
        Command::Import { files } => {
            let mut failed = 0usize;
            for (file, result) in files.iter().zip(state.import_api.import_files(files.clone()).await) {
                match result {
                    Ok(batch) => print_json(&batch)?,
                    Err(e) => {
                        failed += 1;
                        eprintln!("{}: {}", file.display(), e);
                    }
                }
            }
            if failed > 0 {
                bail!("{} of {} imports could not be recorded", failed, files.len());
            }
        }
        Command::List { page, size } => {
            print_json(&state.import_api.list_imports(page, size).await?)?;
        }
        Command::Search { text, page, size } => {
            print_json(&state.import_api.search_imports(&text, page, size).await?)?;
        }
        Command::Show { id } => {
            print_json(&state.import_api.get_import(id).await?)?;
        }
        Command::Delete { id } => {
            state.import_api.delete_import(id).await?;
            println!("import record {} deleted", id);
        }
        Command::AddTranslator {
            name,
            email,
            source_language,
            target_language,
        } => {
            let translator = state.translator_repo.insert(&NewTranslator {
                name,
                email,
                source_language,
                target_language,
            })?;
            print_json(&translator)?;
        }
        Command::SetConfig { key, value } => {
            state.config_manager.set_config_value(&key, &value)?;
            println!("{} = {}", key, value);
        }
    }

    Ok(())
}
