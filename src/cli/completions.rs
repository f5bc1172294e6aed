//! Arguments for the completions command

use clap::Args;

/// Arguments for completions command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    nova completions bash > ~/.bash_completion.d/nova\n\n\
                  Generate zsh completions:\n    nova completions zsh > ~/.zfunc/_nova\n\n\
                  Generate fish completions:\n    nova completions fish > ~/.config/fish/completions/nova.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
