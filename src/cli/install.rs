use clap::Parser;
use std::path::PathBuf;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install into the default directory:\n    ars-installer install\n\n\
                   Install somewhere else without prompting:\n    ars-installer install --dir /opt/ars --yes\n\n\
                   Only fetch, configure and build:\n    ars-installer install --no-deps --no-shortcuts --no-launch")]
pub struct InstallArgs {
    /// Installation directory (defaults to ~/AudienceResponseSystem)
    #[arg(long, short = 'd', value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Do not install missing system dependencies
    #[arg(long)]
    pub no_deps: bool,

    /// Do not create shortcuts
    #[arg(long)]
    pub no_shortcuts: bool,

    /// Do not start the application after installing
    #[arg(long)]
    pub no_launch: bool,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::{Cli, Commands};
    use super::*;

    fn parse(args: &[&str]) -> InstallArgs {
        let mut argv = vec!["ars-installer", "install"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Install(args) => args,
            other => panic!("Expected Install command, got {other:?}"),
        }
    }

    #[test]
    fn test_install_defaults() {
        let args = parse(&[]);
        assert_eq!(args.dir, None);
        assert!(!args.no_deps);
        assert!(!args.no_shortcuts);
        assert!(!args.no_launch);
        assert!(!args.yes);
    }

    #[test]
    fn test_install_all_flags() {
        let args = parse(&[
            "--dir",
            "/tmp/ars",
            "--no-deps",
            "--no-shortcuts",
            "--no-launch",
            "-y",
        ]);
        assert_eq!(args.dir, Some(PathBuf::from("/tmp/ars")));
        assert!(args.no_deps);
        assert!(args.no_shortcuts);
        assert!(args.no_launch);
        assert!(args.yes);
    }

    #[test]
    fn test_install_rejects_positional_source() {
        assert!(Cli::try_parse_from(["ars-installer", "install", "github:someone/else"]).is_err());
    }
}
