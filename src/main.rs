use clap::Parser;
use pagewalk::cli::commands::{cmd_audit, cmd_run};
use pagewalk::cli::config::{Cli, Commands, load_config, resolve_base_url};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());
    let base_url = resolve_base_url(cli.base_url.as_deref(), &config);

    match cli.command {
        Commands::Run {
            suite,
            format,
            output,
        } => {
            let all_passed = cmd_run(
                &suite,
                &format,
                output.as_deref(),
                &base_url,
                &config,
                cli.verbose,
            )?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Audit {
            expected,
            use_badge,
            strict,
            screenshot,
        } => {
            let passed = cmd_audit(
                expected,
                use_badge,
                strict,
                screenshot.as_deref(),
                &base_url,
                &config,
                cli.verbose,
            )?;
            if !passed {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
