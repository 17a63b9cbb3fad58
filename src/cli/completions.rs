use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    ars-installer completions --shell bash > ~/.bash_completion.d/ars-installer\n\n\
                  Generate zsh completions:\n    ars-installer completions --shell zsh > ~/.zfunc/_ars-installer\n\n\
                  Generate fish completions:\n    ars-installer completions --shell fish > ~/.config/fish/completions/ars-installer.fish\n\n\
                  Generate PowerShell completions:\n    ars-installer completions --shell powershell")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long, short = 's')]
    pub shell: String,
}
