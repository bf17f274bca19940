use anyhow::{anyhow, Result};
use memoryping_bot::config::data_dir_from_env;
use memoryping_bot::storage::store::{check_files, reset_files, FileStatus};
use std::env;
use std::io;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("check");

    dotenvy::dotenv().ok();
    let data_dir = data_dir_from_env();

    match command {
        "check" => check_data(&data_dir),
        "reset" => reset_data(&data_dir),
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            std::process::exit(1);
        }
    }
}

fn check_data(data_dir: &Path) -> Result<()> {
    println!("🔍 Checking data files in {}", data_dir.display());

    if !data_dir.is_dir() {
        println!("⚠️  Data directory does not exist yet; it is created on first start");
        return Ok(());
    }

    let mut malformed = 0;
    for (collection, status) in check_files(data_dir) {
        match status {
            FileStatus::Missing => println!("  • {:<16} missing (starts empty)", collection.file_name()),
            FileStatus::Valid { entries } => {
                println!("  • {:<16} ok, {} entries", collection.file_name(), entries)
            }
            FileStatus::Malformed { error } => {
                malformed += 1;
                println!("  • {:<16} MALFORMED: {}", collection.file_name(), error);
            }
        }
    }

    if malformed > 0 {
        println!("💡 Malformed files are moved aside to .corrupt on the next start");
        return Err(anyhow!("{} malformed data file(s)", malformed));
    }
    println!("✅ All data files are readable");
    Ok(())
}

fn reset_data(data_dir: &Path) -> Result<()> {
    println!("⚠️  WARNING: This will delete ALL reminders, stats, moods and habits!");
    println!("🤔 Are you sure you want to continue? (yes/no)");

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    if input.trim().to_lowercase() != "yes" {
        println!("❌ Reset cancelled.");
        return Ok(());
    }

    let removed = reset_files(data_dir)?;
    println!("🗑️  Deleted {} data file(s) from {}", removed, data_dir.display());
    println!("✅ Data reset completed!");
    Ok(())
}

fn print_help() {
    println!("🧠 MemoryPing - Data Maintenance Tool");
    println!();
    println!("USAGE:");
    println!("    datactl [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("    check          Check that every data file parses (default)");
    println!("    reset          Delete all data files - DESTRUCTIVE!");
    println!("    help           Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    DATA_DIR       Directory holding the JSON files (default: ./data)");
    println!();
}
