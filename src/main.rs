use clap::Parser;
use gvmkit_bootstrap::install;
use gvmkit_bootstrap::runtime::RealRuntime;
use std::path::PathBuf;

/// gvmkit-bootstrap - installer for the prebuilt gvmkit-build binary
///
/// Downloads the release archive matching this machine's OS and CPU
/// architecture, extracts it into the install root, and can run or remove
/// the installed binary.
///
/// Examples:
///   gvmkit-bootstrap install          # Fetch and install the release binary
///   gvmkit-bootstrap run -- --help    # Run the installed binary
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Install root directory (overrides defaults; also via GVMKIT_ROOT)
    #[arg(
        long = "root",
        short = 'r',
        env = "GVMKIT_ROOT",
        value_name = "PATH",
        global = true
    )]
    pub install_root: Option<PathBuf>,

    /// Repository base URL (defaults to the bundled repository)
    #[arg(long = "base-url", value_name = "URL", global = true)]
    pub base_url: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Download and install the release binary for this platform
    Install(InstallArgs),

    /// Run the installed binary, forwarding arguments and exit code
    Run(RunArgs),

    /// Remove the installed binary
    Uninstall(UninstallArgs),
}

#[derive(clap::Args, Debug)]
pub struct InstallArgs {}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Arguments forwarded to the installed binary
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct UninstallArgs {}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;

    let outcome = match cli.command {
        Commands::Install(_) => install::install(runtime, cli.install_root, cli.base_url)
            .await
            .map(|()| 0),
        Commands::Run(args) => install::run(runtime, &args.args, cli.install_root, cli.base_url),
        Commands::Uninstall(_) => {
            install::uninstall(runtime, cli.install_root, cli.base_url).map(|()| 0)
        }
    };

    match outcome {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(1);
        }
    }
}
