use std::io::{self, BufRead, Write};

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use tracing::error;

use tpmprov::adapters::SimConnector;
use tpmprov::ports::Reporter;
use tpmprov::use_cases::{provision_primary, AuthMode, ProvisionConfig};

// ANSI colors (works on most terminals)
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

const TOTAL_STEPS: usize = 6;

#[derive(Parser, Debug)]
#[command(name = "tpmprov")]
#[command(about = "Provision a storage primary key in a TPM 2.0 module", version)]
pub struct Cli {
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Run unattended: never pause for operator confirmation between steps
    #[arg(long)]
    pub auto: bool,

    /// Transport configuration (defaults to $TPM_TCTI, else device:/dev/tpmrm0)
    #[arg(long)]
    pub tcti: Option<String>,

    /// How to authorize the creation command
    #[arg(long, default_value = "session")]
    pub auth: AuthArg,

    /// Free-text note echoed into the banner
    pub message: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AuthArg {
    /// Empty password-style credential, no session
    Password,
    /// HMAC session established first
    Session,
}

impl From<AuthArg> for AuthMode {
    fn from(arg: AuthArg) -> Self {
        match arg {
            AuthArg::Password => AuthMode::Password,
            AuthArg::Session => AuthMode::HmacSession,
        }
    }
}

/// Colored step-banner reporter with an operator-confirmation pause
/// before each step unless `--auto` was given.
struct ConsoleReporter {
    auto: bool,
    step: usize,
}

impl ConsoleReporter {
    fn new(auto: bool) -> Self {
        ConsoleReporter { auto, step: 0 }
    }

    fn pause_if_needed(&self) {
        if self.auto || self.step == 0 {
            return;
        }
        print!("\n{BOLD}{CYAN}Press enter to continue...{RESET}");
        let _ = io::stdout().flush();
        let mut line = String::new();
        let _ = io::stdin().lock().read_line(&mut line);
    }
}

impl Reporter for ConsoleReporter {
    fn step(&mut self, title: &str) {
        self.pause_if_needed();
        self.step += 1;
        println!("\n{BOLD}{CYAN}==[ STEP {}/{} ]== {}{RESET}", self.step, TOTAL_STEPS, title);
    }

    fn success(&mut self, msg: &str) {
        println!("{GREEN}[ OK ] {RESET}{msg}");
    }

    fn warn(&mut self, msg: &str) {
        println!("{YELLOW}[WARN] {RESET}{msg}");
    }

    fn fail(&mut self, msg: &str) {
        println!("{RED}[FAIL] {RESET}{msg}");
    }

    fn kv(&mut self, key: &str, value: &str) {
        println!("  {DIM}{key}{RESET}: {value}");
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    let mut config = cli
        .tcti
        .clone()
        .map(ProvisionConfig::new)
        .unwrap_or_else(ProvisionConfig::from_env);
    config.auth_mode = cli.auth.into();

    let mut ui = ConsoleReporter::new(cli.auto);
    ui.step("input & configuration");
    ui.kv("auto mode", if cli.auto { "active" } else { "inactive" });
    ui.kv("message", &format!("\"{}\"", cli.message));
    ui.kv("transport", &config.transport_config);

    // The shipped binary demonstrates the pipeline against the in-memory
    // simulator; a hardware driver binding plugs in through the same
    // Connector port.
    let connector = SimConnector::new();
    match provision_primary(&connector, &mut ui, &config) {
        Ok(report) => {
            ui.success(&format!(
                "provisioned {} ({} handle(s) flushed)",
                report.key, report.flushed
            ));
            Ok(())
        }
        Err(e) => {
            error!("provisioning failed: {e}");
            std::process::exit(1);
        }
    }
}
