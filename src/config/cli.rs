use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "atm-bank")]
#[command(about = "Console ATM simulator with email notifications")]
pub struct CliConfig {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "atm-bank.toml")]
    pub config: String,

    /// Override the ATM seed file from the config
    #[arg(long)]
    pub atms: Option<String>,

    /// Override the account seed file from the config
    #[arg(long)]
    pub accounts: Option<String>,

    /// Do not send email notifications even if configured
    #[arg(long)]
    pub no_email: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
