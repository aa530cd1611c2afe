use std::io;
use std::path::Path;
use std::sync::Arc;

use atm_bank::app::{build_bank, build_notification_sender, Console};
use atm_bank::utils::error::{AtmError, ErrorSeverity};
use atm_bank::utils::{logger, validation::Validate};
use atm_bank::{CliConfig, LocalStorage, NotificationSender, TomlConfig};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let mut config = match TomlConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if cli.json_logs || config.json_logs() {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose, config.log_level());
    }

    tracing::info!("Starting atm-bank with config {}", cli.config);

    // Overrides from the command line are relative to the working directory.
    let cwd = std::env::current_dir()?;
    if let Some(atms) = &cli.atms {
        config.bank.atms_file = cwd.join(atms).to_string_lossy().into_owned();
    }
    if let Some(accounts) = &cli.accounts {
        config.bank.accounts_file = cwd.join(accounts).to_string_lossy().into_owned();
    }

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    // Seed paths in the config file are relative to the file itself.
    let base_dir = Path::new(&cli.config)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let storage = LocalStorage::new(base_dir);

    let email_enabled = config.email_enabled() && !cli.no_email;
    let sender: Arc<dyn NotificationSender> = Arc::new(build_notification_sender(&config, email_enabled));

    let mut bank = match build_bank(&config, &storage, Arc::clone(&sender)) {
        Ok(bank) => bank,
        Err(e) => exit_with(&e),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());

    if let Err(e) = console.run(&mut bank, sender) {
        exit_with(&e);
    }

    tracing::info!("Session ended");
    Ok(())
}

fn exit_with(e: &AtmError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
