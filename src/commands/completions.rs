//! Shell completions command

use clap::CommandFactory;

use crate::cli::CompletionsArgs;
use crate::error::{MarketplaceError, Result};

/// Generate shell completions
pub fn run(args: CompletionsArgs) -> Result<()> {
    let shell_name = args.shell.to_lowercase();
    let shell = match shell_name.as_str() {
        "bash" => clap_complete::Shell::Bash,
        "elvish" => clap_complete::Shell::Elvish,
        "fish" => clap_complete::Shell::Fish,
        "powershell" | "pwsh" => clap_complete::Shell::PowerShell,
        "zsh" => clap_complete::Shell::Zsh,
        _ => {
            return Err(MarketplaceError::Internal {
                message: format!(
                    "unknown shell '{}' (supported: bash, elvish, fish, powershell, zsh)",
                    args.shell
                ),
            });
        }
    };

    let mut cmd = <crate::cli::Cli as CommandFactory>::command();
    clap_complete::generate(shell, &mut cmd, "nova", &mut std::io::stdout().lock());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated_completions(shell: clap_complete::Shell) -> Vec<u8> {
        let mut buffer = Vec::new();
        let mut cmd = <crate::cli::Cli as CommandFactory>::command();
        clap_complete::generate(shell, &mut cmd, "nova", &mut buffer);
        buffer
    }

    #[test]
    fn test_completions_generate_output() {
        for shell in [
            clap_complete::Shell::Bash,
            clap_complete::Shell::Zsh,
            clap_complete::Shell::Fish,
        ] {
            assert!(
                !generated_completions(shell).is_empty(),
                "no completion output for {shell:?}"
            );
        }
    }

    #[test]
    fn test_unknown_shell_is_error() {
        let args = CompletionsArgs {
            shell: "tcsh".to_string(),
        };
        assert!(run(args).is_err());
    }
}
